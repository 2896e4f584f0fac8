// Caption synthesis LLM prompt templates.

pub const CAPTION_SYSTEM: &str = "\
You are a social media copywriter. \
Write ONE concise, energetic social caption for the campaign brief you are given. \
Keep the caption under 220 characters. \
Open with a hook, match the brand's tone, and close with a clear call to action. \
You MUST respond with strict JSON only — no markdown fences, no explanations — \
in exactly this shape: {\"caption\": \"string\", \"hashtags\": [\"string\"]}. \
Include at most 6 hashtags.";

pub const CAPTION_PROMPT: &str = r#"Write a social caption for this campaign brief.

BRIEF:
{brief}

Return ONLY the JSON object: {"caption": "...", "hashtags": ["...", "..."]}"#;

pub fn build_caption_prompt(brief: &str) -> String {
    CAPTION_PROMPT.replace("{brief}", brief)
}
