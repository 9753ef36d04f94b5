use serde::de::DeserializeOwned;
use serde::Serialize;

/// Declared shape of a structured completion.
///
/// Deserialization checks field presence and types; `validate` checks the
/// semantic rules serde cannot express and may normalize values.
pub trait ResponseSchema: DeserializeOwned + Serialize + Sized {
    /// Short name used in error messages and logs
    const NAME: &'static str;

    fn validate(self) -> Result<Self, String>;
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("'{}' must not be empty", field))
    } else {
        Ok(())
    }
}
