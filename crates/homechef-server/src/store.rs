//! Async gateway to the SQLite database.
//!
//! `rusqlite` is blocking, so every call runs on tokio's blocking pool with
//! the connection held behind a mutex for the duration of the closure.

use std::sync::{Arc, Mutex};

use homechef_store::Database;

use crate::error::ApiError;

#[derive(Clone)]
pub struct Store {
    db: Arc<Mutex<Database>>,
}

impl Store {
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    /// Run `f` against the database on the blocking pool.
    pub async fn call<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T, ApiError> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let mut guard = db
                .lock()
                .map_err(|_| ApiError::Internal("database lock poisoned".to_string()))?;
            f(&mut *guard)
        })
        .await?
    }
}
