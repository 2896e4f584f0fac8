use maud::{html, DOCTYPE};

pub const SUBJECT: &str = "Your campaign caption is ready";

pub fn render_text(decorated_caption: &str) -> String {
    format!(
        "Here is your generated caption:\n\n{decorated_caption}\n\n\
         Your 720x720 thumbnail is attached as thumbnail.jpg.\n"
    )
}

/// HTML body. The caption is escaped and keeps its line breaks.
pub fn render_html(decorated_caption: &str) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                title { (SUBJECT) }
            }
            body style="font-family: -apple-system, Segoe UI, Helvetica, Arial, sans-serif; color: #1a1a1a;" {
                h2 { "Here is your generated caption" }
                div style="white-space: pre-wrap; font-size: 16px; line-height: 1.5; padding: 16px; background: #f6f6f6; border-radius: 8px;" {
                    (decorated_caption)
                }
                p style="color: #666666; font-size: 13px;" {
                    "Your 720×720 thumbnail is attached as thumbnail.jpg."
                }
            }
        }
    }
    .into_string()
}
