//! Attention heuristic for choosing the crop window.
//!
//! Scores every pixel of a downscaled grayscale copy by edge strength and local
//! variance, projects the scores onto the axis that has slack, and slides the
//! crop window along that axis to find the busiest region.

use image::{imageops, GrayImage, RgbImage};

/// Downscale factor applied before scoring.
const SCALE: u32 = 4;
const EDGE_WEIGHT: f32 = 0.6;
const VARIANCE_WEIGHT: f32 = 0.4;

/// Per-pixel saliency over a downscaled copy of the source, row-major.
struct SaliencyMap {
    width: u32,
    height: u32,
    scores: Vec<f32>,
}

impl SaliencyMap {
    fn compute(img: &RgbImage) -> Self {
        let (width, height) = img.dimensions();
        let gray = imageops::grayscale(img);

        let small_width = (width / SCALE).max(1);
        let small_height = (height / SCALE).max(1);
        let small: GrayImage = imageops::resize(
            &gray,
            small_width,
            small_height,
            imageops::FilterType::Triangle,
        );

        let mut scores = vec![0.0f32; (small_width * small_height) as usize];
        let px = |x: u32, y: u32| small.get_pixel(x, y)[0] as f32;

        for y in 1..small_height.saturating_sub(1) {
            for x in 1..small_width.saturating_sub(1) {
                let gx = px(x + 1, y) - px(x - 1, y);
                let gy = px(x, y + 1) - px(x, y - 1);
                let edge_strength = (gx * gx + gy * gy).sqrt();

                let mut sum = 0.0f32;
                let mut sum_sq = 0.0f32;
                for dy in 0..3 {
                    for dx in 0..3 {
                        let v = px(x + dx - 1, y + dy - 1);
                        sum += v;
                        sum_sq += v * v;
                    }
                }
                let mean = sum / 9.0;
                let variance = (sum_sq / 9.0 - mean * mean).max(0.0);

                scores[(y * small_width + x) as usize] =
                    edge_strength * EDGE_WEIGHT + variance * VARIANCE_WEIGHT;
            }
        }

        Self {
            width: small_width,
            height: small_height,
            scores,
        }
    }

    fn column_totals(&self) -> Vec<f32> {
        (0..self.width)
            .map(|x| {
                (0..self.height)
                    .map(|y| self.scores[(y * self.width + x) as usize])
                    .sum()
            })
            .collect()
    }

    fn row_totals(&self) -> Vec<f32> {
        self.scores
            .chunks(self.width as usize)
            .map(|row| row.iter().sum())
            .collect()
    }
}

/// Returns the top-left corner of the most salient `crop_w`×`crop_h` window.
///
/// Images with no preference (e.g. flat colour) get a centred window.
pub fn crop_origin(img: &RgbImage, crop_w: u32, crop_h: u32) -> (u32, u32) {
    let (width, height) = img.dimensions();
    if width <= crop_w && height <= crop_h {
        return (0, 0);
    }

    let map = SaliencyMap::compute(img);
    let x = if width > crop_w {
        best_window(&map.column_totals(), width, crop_w)
    } else {
        0
    };
    let y = if height > crop_h {
        best_window(&map.row_totals(), height, crop_h)
    } else {
        0
    };
    (x, y)
}

/// Slides a window over the projected totals and maps the winning offset back
/// to full-resolution coordinates. Ties go to the offset nearest the centre.
fn best_window(totals: &[f32], full_len: u32, window: u32) -> u32 {
    let slack = full_len.saturating_sub(window);
    let n = totals.len();
    let k = ((window as f64 / full_len as f64) * n as f64).round() as usize;
    let k = k.clamp(1, n.max(1));
    if n <= k {
        return slack / 2;
    }

    let mut sums = Vec::with_capacity(n - k + 1);
    let mut running: f32 = totals[..k].iter().sum();
    sums.push(running);
    for offset in 1..=(n - k) {
        running += totals[offset + k - 1] - totals[offset - 1];
        sums.push(running);
    }

    let max = sums.iter().copied().fold(f32::MIN, f32::max);
    let min = sums.iter().copied().fold(f32::MAX, f32::min);
    let tolerance = f32::EPSILON * 16.0 * max.abs().max(1.0);
    if max - min <= tolerance {
        return slack / 2;
    }

    let positions = sums.len() - 1;
    let centre = positions as f64 / 2.0;
    let best_offset = sums
        .iter()
        .enumerate()
        .filter(|&(_, s)| max - *s <= tolerance)
        .map(|(offset, _)| offset)
        .min_by(|a, b| {
            let da = (*a as f64 - centre).abs();
            let db = (*b as f64 - centre).abs();
            da.total_cmp(&db)
        })
        .unwrap_or(positions / 2);

    let mapped = (best_offset as f64 / positions as f64) * slack as f64;
    (mapped.round() as u32).min(slack)
}
