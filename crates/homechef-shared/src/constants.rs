/// Application name
pub const APP_NAME: &str = "HomeChef";

/// Lifetime of a login token in seconds (3 hours)
pub const TOKEN_TTL_SECS: i64 = 3 * 60 * 60;

/// Upper bound accepted for a configured token lifetime (one year).
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

/// Lowest and highest accepted feedback rating
pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// Separator used when category tags are flattened into one column
pub const CATEGORY_SEPARATOR: &str = ", ";

/// Maximum uploaded image size in bytes (10 MiB)
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// Image extensions accepted by the upload endpoints
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Default HTTP API port
pub const DEFAULT_HTTP_PORT: u16 = 5000;
