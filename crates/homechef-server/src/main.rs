//! # homechef-server
//!
//! HTTP backend for the HomeChef food marketplace.
//!
//! This binary provides:
//! - **Identity** routes: customer signup, seller registration, login with a
//!   signed token, profile reads and updates
//! - **Catalog** routes: dish browsing, uploads with images, deletion and
//!   customer feedback
//! - **Orders**: atomic placement, per-seller listings and the status
//!   lifecycle
//! - **Saved recipes** and read-only **admin** reports
//! - Static serving of uploaded images under `/uploads`

mod api;
mod config;
mod error;
mod image_store;
mod store;

use std::sync::Arc;

use ed25519_dalek::SigningKey;
use homechef_shared::constants::APP_NAME;
use homechef_store::Database;
use rand::rngs::OsRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::AppState;
use crate::config::ServerConfig;
use crate::image_store::ImageStore;
use crate::store::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("info,homechef_server=debug,homechef_store=debug")
            }),
        )
        .init();

    info!("Starting {} server v{}", APP_NAME, env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env();
    info!(
        http_addr = %config.http_addr,
        database = %config.database_path.display(),
        uploads = %config.upload_dir.display(),
        max_upload_size = config.max_upload_size,
        "Loaded configuration"
    );

    // -----------------------------------------------------------------------
    // 3. Initialize subsystems
    // -----------------------------------------------------------------------

    // Database (runs pending migrations)
    let database = Database::open_at(&config.database_path)?;

    // Image store (creates directory if missing)
    let images = Arc::new(ImageStore::new(config.upload_dir.clone(), config.max_upload_size).await?);

    let signing_key = match config.token_signing_key.clone() {
        Some(key) => key,
        None => {
            warn!("TOKEN_SIGNING_KEY not set, generating an ephemeral key; tokens will not survive a restart");
            SigningKey::generate(&mut OsRng)
        }
    };

    let http_addr = config.http_addr;
    let app_state = AppState {
        store: Store::new(database),
        images,
        signing_key: Arc::new(signing_key),
        config: Arc::new(config),
    };

    // -----------------------------------------------------------------------
    // 4. Run the HTTP API server (blocks until shutdown)
    // -----------------------------------------------------------------------
    tokio::select! {
        result = api::serve(app_state, http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
