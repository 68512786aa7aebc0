use crate::{
    error::{Result, StabilityError},
    models::presets::FinishReason,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One generated artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageResponse {
    pub base64: String,
    #[serde(rename = "finishReason")]
    pub finish_reason: FinishReason,
    pub seed: u32,
}

impl ImageResponse {
    /// Decodes the base64 payload into raw image bytes.
    pub fn image_bytes(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(self.base64.as_bytes())
            .map_err(|e| StabilityError::DecodeError(format!("invalid base64 image: {}", e)))
    }

    pub fn is_success(&self) -> bool {
        self.finish_reason == FinishReason::Success
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.image_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

/// Envelope returned by the generation endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub artifacts: Vec<ImageResponse>,
}
