//! Server configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the server can start with zero
//! configuration for local development.

use std::net::SocketAddr;
use std::path::PathBuf;

use ed25519_dalek::SigningKey;
use homechef_shared::constants::{
    DEFAULT_HTTP_PORT, MAX_IMAGE_SIZE, MAX_TOKEN_TTL_SECS, TOKEN_TTL_SECS,
};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP (axum) API server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:5000`
    pub http_addr: SocketAddr,

    /// SQLite database file.
    /// Env: `DATABASE_PATH`
    /// Default: `./homechef.db`
    pub database_path: PathBuf,

    /// Directory where uploaded images are written and served from.
    /// Env: `UPLOAD_DIR`
    /// Default: `./uploads`
    pub upload_dir: PathBuf,

    /// Maximum size of one uploaded image, in bytes.
    /// Env: `MAX_UPLOAD_SIZE`
    /// Default: 10 MiB
    pub max_upload_size: usize,

    /// Ed25519 secret key used to sign login tokens (hex-encoded, 64 chars).
    /// Env: `TOKEN_SIGNING_KEY`
    /// Default: none; a random key is generated at startup, so tokens do
    /// not survive a restart.
    pub token_signing_key: Option<SigningKey>,

    /// Login token lifetime in seconds.
    /// Env: `TOKEN_TTL_SECS`
    /// Default: 3 hours, at most one year
    pub token_ttl_secs: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], DEFAULT_HTTP_PORT).into(),
            database_path: PathBuf::from("./homechef.db"),
            upload_dir: PathBuf::from("./uploads"),
            max_upload_size: MAX_IMAGE_SIZE,
            token_signing_key: None,
            token_ttl_secs: TOKEN_TTL_SECS,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(value = %addr, "Invalid HTTP_ADDR, using default");
            }
        }

        if let Ok(path) = std::env::var("DATABASE_PATH") {
            config.database_path = PathBuf::from(path);
        }

        if let Ok(path) = std::env::var("UPLOAD_DIR") {
            config.upload_dir = PathBuf::from(path);
        }

        if let Ok(val) = std::env::var("MAX_UPLOAD_SIZE") {
            match val.parse::<usize>() {
                Ok(n) if n > 0 => config.max_upload_size = n,
                _ => tracing::warn!(value = %val, "Invalid MAX_UPLOAD_SIZE, using default"),
            }
        }

        if let Ok(hex_key) = std::env::var("TOKEN_SIGNING_KEY") {
            match parse_signing_key(&hex_key) {
                Ok(key) => config.token_signing_key = Some(key),
                Err(e) => {
                    tracing::warn!(error = %e, "Invalid TOKEN_SIGNING_KEY, a random key will be used");
                }
            }
        }

        if let Ok(val) = std::env::var("TOKEN_TTL_SECS") {
            match parse_token_ttl(&val) {
                Some(n) => config.token_ttl_secs = n,
                None => tracing::warn!(
                    value = %val,
                    max = MAX_TOKEN_TTL_SECS,
                    "Invalid TOKEN_TTL_SECS, using default"
                ),
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}

/// A positive lifetime no longer than [`MAX_TOKEN_TTL_SECS`].
fn parse_token_ttl(raw: &str) -> Option<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|n| (1..=MAX_TOKEN_TTL_SECS).contains(n))
}

/// Parse a 64-character hex string into an Ed25519 signing key.
fn parse_signing_key(hex_key: &str) -> Result<SigningKey, String> {
    let bytes = hex::decode(hex_key.trim()).map_err(|e| format!("invalid hex: {e}"))?;
    let secret: [u8; 32] = bytes
        .try_into()
        .map_err(|b: Vec<u8>| format!("expected 32 bytes, got {}", b.len()))?;
    Ok(SigningKey::from_bytes(&secret))
}
