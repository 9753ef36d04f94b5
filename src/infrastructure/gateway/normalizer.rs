use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::chemistry::ResponseSchema;
use crate::domain::DomainError;

static LEADING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*```[A-Za-z0-9_-]*[ \t]*").unwrap());

static TRAILING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```\s*$").unwrap());

/// Remove a surrounding markdown code fence (with or without a language tag) and trim
pub fn strip_code_fences(raw: &str) -> &str {
    let start = LEADING_FENCE.find(raw).map(|m| m.end()).unwrap_or(0);
    let body = &raw[start..];

    let end = TRAILING_FENCE
        .find(body)
        .map(|m| m.start())
        .unwrap_or(body.len());

    body[..end].trim()
}

/// Parse a completion as JSON after stripping fences
pub fn parse_json(raw: &str) -> Result<serde_json::Value, DomainError> {
    serde_json::from_str(strip_code_fences(raw))
        .map_err(|e| DomainError::malformed_response(format!("Invalid JSON: {}", e), raw))
}

/// Parse a completion into `T` and apply its validation rules
pub fn parse<T: ResponseSchema>(raw: &str) -> Result<T, DomainError> {
    let value = parse_json(raw)?;

    let payload: T = serde_json::from_value(value).map_err(|e| {
        DomainError::malformed_response(
            format!("Response does not match the {} schema: {}", T::NAME, e),
            raw,
        )
    })?;

    payload.validate().map_err(|reason| {
        DomainError::malformed_response(
            format!("Invalid {} response: {}", T::NAME, reason),
            raw,
        )
    })
}
