use base64::{engine::general_purpose::STANDARD, Engine};

use crate::domain::DomainError;

/// Inline image sent next to the user prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    media_type: String,
    data: String,
}

impl ImageAttachment {
    /// Parse a `data:<mime>;base64,<payload>` URL as produced by browsers' FileReader
    pub fn from_data_url(data_url: &str) -> Result<Self, DomainError> {
        let rest = data_url
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| DomainError::missing_input("imageData must be a data URL"))?;

        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| DomainError::missing_input("imageData has no payload"))?;

        let media_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| DomainError::missing_input("imageData must be base64 encoded"))?;

        if !media_type.starts_with("image/") {
            return Err(DomainError::missing_input(format!(
                "imageData has unsupported media type '{}'",
                media_type
            )));
        }

        if payload.is_empty() || STANDARD.decode(payload).is_err() {
            return Err(DomainError::missing_input("imageData payload is not valid base64"));
        }

        Ok(Self {
            media_type: media_type.to_string(),
            data: payload.to_string(),
        })
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Base64 payload without the data URL header
    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}
