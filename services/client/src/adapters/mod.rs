pub mod file_store;
pub mod http_gateway;

pub use file_store::FileCredentialStore;
pub use http_gateway::HttpGateway;

use coursebook_core::ports::CredentialStore;
use coursebook_core::NoopCredentialStore;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Picks the credential store once, at startup. Without a usable directory the
/// session still works but is forgotten when the process exits.
pub fn credential_store(dir: Option<&Path>) -> Arc<dyn CredentialStore> {
    match dir {
        Some(dir) => match FileCredentialStore::open(dir) {
            Ok(store) => {
                info!("Keeping credentials in {}", dir.display());
                Arc::new(store)
            }
            Err(e) => {
                warn!(
                    "Credentials directory {} is unusable ({}); sessions will not persist.",
                    dir.display(),
                    e
                );
                Arc::new(NoopCredentialStore)
            }
        },
        None => {
            info!("No credentials directory configured; sessions will not persist.");
            Arc::new(NoopCredentialStore)
        }
    }
}
