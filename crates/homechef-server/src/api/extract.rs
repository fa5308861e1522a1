//! Extractors whose rejections render as the usual `{"message"}` body.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Trimmed, non-empty value of a required field.
pub fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Validation(format!("{field} is required")))
}

/// Like [`required`] but returns the value untouched; passwords are never
/// trimmed.
pub fn required_secret(value: Option<String>, field: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::Validation(format!("{field} is required")))
}

/// `None` for absent or blank optional fields.
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(
            required(Some("  Amara ".into()), "name").unwrap(),
            "Amara"
        );
        assert!(required(Some("   ".into()), "name").is_err());
        assert!(required(None, "name").is_err());
    }

    #[test]
    fn test_required_secret_keeps_whitespace() {
        assert_eq!(
            required_secret(Some(" pass word ".into()), "password").unwrap(),
            " pass word "
        );
        assert!(required_secret(Some("  ".into()), "password").is_err());
    }

    #[test]
    fn test_optional_blank_is_none() {
        assert_eq!(optional(Some("".into())), None);
        assert_eq!(optional(Some(" x ".into())), Some("x".into()));
    }
}
