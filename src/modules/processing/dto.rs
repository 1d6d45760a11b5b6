use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Multipart form accepted by `/api/add-emoji`. Schema-only; the handler
/// reads the fields straight from the multipart stream.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct AddEmojiForm {
    /// The video to process.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    /// Desired overlay glyph. Accepted but not applied yet; the overlay
    /// is currently a fixed character.
    pub emoji: Option<String>,
}
