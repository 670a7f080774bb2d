//! crates/coursebook_core/src/credentials.rs
//!
//! `CredentialStore` implementations that need nothing outside the process.

use crate::domain::{Token, User};
use crate::ports::CredentialStore;
use std::sync::{Mutex, MutexGuard};

/// The store selected when no durable storage exists. Reads as empty, writes vanish.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCredentialStore;

impl CredentialStore for NoopCredentialStore {
    fn get(&self) -> Option<(Token, User)> {
        None
    }

    fn set(&self, _token: &Token, _user: &User) {}

    fn remove(&self) {}
}

/// Keeps the pair in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    record: Mutex<Option<(Token, User)>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds a pair, as if written by an earlier run.
    pub fn with_record(token: Token, user: User) -> Self {
        Self {
            record: Mutex::new(Some((token, user))),
        }
    }

    fn record(&self) -> MutexGuard<'_, Option<(Token, User)>> {
        // A panic elsewhere cannot leave a half-written pair behind, so the data is still usable.
        self.record.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Option<(Token, User)> {
        self.record().clone()
    }

    fn set(&self, token: &Token, user: &User) {
        *self.record() = Some((token.clone(), user.clone()));
    }

    fn remove(&self) {
        *self.record() = None;
    }
}
