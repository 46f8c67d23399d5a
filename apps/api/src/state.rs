use std::sync::Arc;

use crate::auth::google::IdentityProvider;
use crate::blob::BlobStore;
use crate::config::Config;
use crate::drive::DriveUploader;
use crate::llm_client::TextGenerator;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
/// Every outbound collaborator sits behind a trait object so tests can swap it.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub blobs: Arc<dyn BlobStore>,
    pub llm: Arc<dyn TextGenerator>,
    pub identity: Arc<dyn IdentityProvider>,
    pub drive: Arc<dyn DriveUploader>,
    pub config: Config,
}
