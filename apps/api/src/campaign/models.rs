use bytes::Bytes;
use serde::Serialize;

/// The multipart fields as they arrived, before any checks.
#[derive(Debug, Clone, Default)]
pub struct RawCampaignForm {
    pub email: Option<String>,
    pub prompt: Option<String>,
    pub photo: Option<Bytes>,
}

/// A request that passed validation. Lives for one pipeline run only.
#[derive(Debug, Clone)]
pub struct CampaignRequest {
    pub email: String,
    pub brief_text: String,
    pub photo_bytes: Bytes,
    pub photo_size: usize,
}

/// The JSON body returned to the caller on success.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    #[serde(rename = "caption")]
    pub decorated_caption: String,
    pub thumbnail_data_url: String,
    pub email_id: String,
}
