use std::path::{Component, Path, PathBuf};

use homechef_shared::constants::IMAGE_EXTENSIONS;
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;

/// URL prefix under which stored images are served and recorded in rows.
pub const PUBLIC_PREFIX: &str = "uploads";

/// Stores uploaded dish and chef images as `<uuid>.<ext>` files in one
/// directory.
#[derive(Debug, Clone)]
pub struct ImageStore {
    base_path: PathBuf,
    max_size: usize,
}

impl ImageStore {
    pub async fn new(base_path: PathBuf, max_size: usize) -> Result<Self, ApiError> {
        fs::create_dir_all(&base_path).await.map_err(|e| {
            ApiError::Storage(format!(
                "Failed to create upload directory '{}': {}",
                base_path.display(),
                e
            ))
        })?;

        info!(path = %base_path.display(), "Image store initialized");

        Ok(Self {
            base_path,
            max_size,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Write an uploaded image and return its public relative path
    /// (`uploads/<uuid>.<ext>`).
    pub async fn store_image(
        &self,
        file_name: Option<&str>,
        data: &[u8],
    ) -> Result<String, ApiError> {
        if data.is_empty() {
            return Err(ApiError::Validation("Uploaded image is empty".to_string()));
        }
        if data.len() > self.max_size {
            return Err(ApiError::Validation(format!(
                "Image too large: {} bytes (max {})",
                data.len(),
                self.max_size
            )));
        }

        let ext = image_extension(file_name)?;
        let stored_name = format!("{}.{}", Uuid::new_v4(), ext);
        let path = self.base_path.join(&stored_name);

        fs::write(&path, data).await.map_err(|e| {
            ApiError::Storage(format!("Failed to write image {stored_name}: {e}"))
        })?;

        debug!(file = %stored_name, size = data.len(), "Stored image");
        Ok(format!("{PUBLIC_PREFIX}/{stored_name}"))
    }

    /// Remove a previously stored image given its public relative path.
    pub async fn delete_image(&self, relative: &str) -> Result<(), ApiError> {
        let path = self.resolve(relative)?;

        fs::remove_file(&path)
            .await
            .map_err(|e| ApiError::Storage(format!("Failed to delete image {relative}: {e}")))?;

        debug!(file = %relative, "Deleted image");
        Ok(())
    }

    /// Map `uploads/<name>` to a file inside the base directory. Anything
    /// other than one plain file name after the prefix is rejected.
    fn resolve(&self, relative: &str) -> Result<PathBuf, ApiError> {
        let name = relative
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(relative);

        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(file)), None) => Ok(self.base_path.join(file)),
            _ => Err(ApiError::Validation("Invalid image path".to_string())),
        }
    }
}

/// Lower-cased extension of an uploaded file name, if it is an accepted
/// image type.
fn image_extension(file_name: Option<&str>) -> Result<String, ApiError> {
    let ext = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(ApiError::Validation(format!(
            "Only image files are allowed ({})",
            IMAGE_EXTENSIONS.join(", ")
        )))
    }
}
