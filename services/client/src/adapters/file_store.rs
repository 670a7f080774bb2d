//! services/client/src/adapters/file_store.rs
//!
//! The durable `CredentialStore`: two keyed records kept as files in one directory.
//! `auth_token` holds the raw bearer token, `auth_user` the JSON user snapshot.

use coursebook_core::domain::{Token, User};
use coursebook_core::ports::CredentialStore;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

pub const TOKEN_KEY: &str = "auth_token";
pub const USER_KEY: &str = "auth_user";

/// A `CredentialStore` backed by a directory on disk.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    dir: PathBuf,
}

impl FileCredentialStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Opens the store only if `dir` exists or can be created.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let store = Self::new(dir);
        fs::create_dir_all(&store.dir)?;
        Ok(store)
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    fn read(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.path(key)) {
            Ok(contents) if !contents.is_empty() => Some(contents),
            Ok(_) => None,
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Failed to read credential record '{}': {}", key, e);
                None
            }
        }
    }

    /// Replaces a record in one step: readers see the old file or the new one.
    fn write(&self, key: &str, contents: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let staging = self
            .dir
            .join(format!(".{}.{}.tmp", key, Uuid::new_v4().simple()));
        if let Err(e) = write_private(&staging, contents) {
            let _ = fs::remove_file(&staging);
            return Err(e);
        }
        fs::rename(&staging, self.path(key)).map_err(|e| {
            let _ = fs::remove_file(&staging);
            e
        })
    }

    fn delete(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

fn write_private(path: &Path, contents: &str) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Option<(Token, User)> {
        let token = self.read(TOKEN_KEY)?;
        let user_json = self.read(USER_KEY)?;
        match serde_json::from_str::<User>(&user_json) {
            Ok(user) => Some((Token::new(token), user)),
            Err(e) => {
                warn!("Stored user record is unreadable, ignoring it: {}", e);
                None
            }
        }
    }

    fn set(&self, token: &Token, user: &User) {
        let user_json = match serde_json::to_string(user) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize user for storage: {}", e);
                return;
            }
        };
        let result = self
            .write(USER_KEY, &user_json)
            .and_then(|_| self.write(TOKEN_KEY, token.as_str()));
        match result {
            Ok(()) => debug!(dir = %self.dir.display(), "Credentials stored."),
            Err(e) => {
                // The pair must never mix records from two sessions.
                warn!(
                    "Failed to store credentials in {}, clearing both records: {}",
                    self.dir.display(),
                    e
                );
                self.remove();
            }
        }
    }

    fn remove(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.delete(key) {
                warn!("Failed to remove credential record '{}': {}", key, e);
            }
        }
    }
}
