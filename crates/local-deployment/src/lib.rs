use std::sync::Arc;

use async_trait::async_trait;
use db::DBService;
use deployment::{Deployment, DeploymentError};
use services::services::{
    auth::AuthService,
    color::ColorService,
    config::{Config, load_config_from_file, save_config_to_file},
    ingest::IngestService,
    metadata::MetadataService,
    storage::StorageService,
};
use tokio::sync::RwLock;
use utils::assets::config_path;

#[derive(Clone)]
pub struct LocalDeployment {
    config: Arc<RwLock<Config>>,
    db: DBService,
    auth: AuthService,
    storage: StorageService,
    ingest: IngestService,
}

#[async_trait]
impl Deployment for LocalDeployment {
    async fn new() -> Result<Self, DeploymentError> {
        let config = Self::load_runtime_config().await?;
        let (auth, storage, ingest) = Self::build_services(&config);

        let db = DBService::new().await?;
        Self::spawn_orphan_sweep(storage.clone(), db.clone());

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            db,
            auth,
            storage,
            ingest,
        })
    }

    fn config(&self) -> &Arc<RwLock<Config>> {
        &self.config
    }

    fn db(&self) -> &DBService {
        &self.db
    }

    fn auth(&self) -> &AuthService {
        &self.auth
    }

    fn storage(&self) -> &StorageService {
        &self.storage
    }

    fn ingest(&self) -> &IngestService {
        &self.ingest
    }
}

impl LocalDeployment {
    /// Loads the config file, then writes it back so normalization repairs
    /// and first-run defaults (like the token secret) are persisted.
    async fn load_runtime_config() -> Result<Config, DeploymentError> {
        let config = load_config_from_file(&config_path()).await;
        save_config_to_file(&config, &config_path()).await?;
        Ok(config)
    }

    fn build_services(config: &Config) -> (AuthService, StorageService, IngestService) {
        let auth = AuthService::new(
            config.auth.token_secret.clone(),
            config.auth.token_ttl_hours,
        );
        let storage = StorageService::new(config.upload_dir());
        let ingest = IngestService::new(
            storage.clone(),
            MetadataService::new(),
            ColorService::new(
                config.color.sample_stride,
                config.color.default_color.clone(),
            ),
        );
        (auth, storage, ingest)
    }

    fn spawn_orphan_sweep(storage: StorageService, db: DBService) {
        tokio::spawn(async move {
            tracing::info!("Starting orphaned upload sweep...");
            if let Err(e) = storage.sweep_orphans(&db.pool).await {
                tracing::error!("Failed to sweep orphaned uploads: {}", e);
            }
        });
    }
}
