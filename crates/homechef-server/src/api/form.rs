//! Multipart form reader shared by seller registration and dish upload.

use std::collections::HashMap;

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};

use crate::error::ApiError;

/// Name of the file field carrying an optional image.
const IMAGE_FIELD: &str = "image";

#[derive(Debug)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub data: Bytes,
}

/// A fully buffered multipart form: text fields by name (repeatable) and at
/// most one image.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, Vec<String>>,
    image: Option<UploadedImage>,
}

impl FormData {
    /// First value of a field, trimmed; `None` when absent or blank.
    pub fn text(&self, key: &str) -> Option<String> {
        self.fields
            .get(key)
            .and_then(|values| values.first())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn require(&self, key: &str) -> Result<String, ApiError> {
        self.text(key)
            .ok_or_else(|| ApiError::Validation(format!("{key} is required")))
    }

    /// First value of a field exactly as sent.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Every value sent for a repeatable field.
    pub fn all(&self, key: &str) -> &[String] {
        self.fields.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn take_image(&mut self) -> Option<UploadedImage> {
        self.image.take()
    }
}

#[async_trait]
impl<S> FromRequest<S> for FormData
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state).await.map_err(|e| {
            ApiError::Validation(format!("Expected a multipart form: {}", e.body_text()))
        })?;

        let mut form = FormData::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::Validation(format!("Multipart error: {e}")))?
        {
            let name = field.name().unwrap_or("").to_string();

            if name == IMAGE_FIELD && field.file_name().is_some() {
                let file_name = field.file_name().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(format!("Failed to read image: {e}")))?;
                // browsers send an empty part when no file was chosen
                if !data.is_empty() {
                    form.image = Some(UploadedImage { file_name, data });
                }
                continue;
            }

            let value = field
                .text()
                .await
                .map_err(|e| ApiError::Validation(format!("Failed to read field {name}: {e}")))?;
            form.fields.entry(name).or_default().push(value);
        }

        Ok(form)
    }
}
