use std::sync::Arc;

use async_trait::async_trait;
use db::{DBService, DbErr};
use services::services::{
    auth::AuthService,
    config::{Config, ConfigError},
    ingest::IngestService,
    storage::StorageService,
};
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Database(#[from] DbErr),
}

/// Wires the database and the service set behind one handle that the
/// HTTP layer clones into request handlers.
#[async_trait]
pub trait Deployment: Clone + Send + Sync + 'static {
    async fn new() -> Result<Self, DeploymentError>;

    fn config(&self) -> &Arc<RwLock<Config>>;
    fn db(&self) -> &DBService;
    fn auth(&self) -> &AuthService;
    fn storage(&self) -> &StorageService;
    fn ingest(&self) -> &IngestService;
}
