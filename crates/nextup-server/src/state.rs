//! Shared server state.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Duration;
use nextup_core::auth::TokenSigner;
use nextup_core::storage::TaskDb;

use crate::error::ApiError;

/// State shared across request handlers.
///
/// rusqlite connections are not Sync, so the database handle sits behind a
/// mutex; every handler does a single short transaction under the lock.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<TaskDb>>,
    pub signer: TokenSigner,
    pub token_ttl: Duration,
}

impl AppState {
    pub fn new(db: TaskDb, signer: TokenSigner, token_ttl: Duration) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            signer,
            token_ttl,
        }
    }

    /// Lock the database, mapping a poisoned lock to a 500.
    pub fn db(&self) -> Result<MutexGuard<'_, TaskDb>, ApiError> {
        self.db
            .lock()
            .map_err(|_| ApiError::internal("database lock poisoned"))
    }
}
