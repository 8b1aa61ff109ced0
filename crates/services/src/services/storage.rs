use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    time::Duration,
};

use db::{models::photo::Photo, DbErr, DbPool};
use thiserror::Error;
use uuid::Uuid;

/// Files younger than this are left alone by the orphan sweep so uploads
/// still in flight are never collected.
const ORPHAN_GRACE: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Error)]
pub enum StorageServiceError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Database(#[from] DbErr),
}

pub type Result<T> = std::result::Result<T, StorageServiceError>;

#[derive(Debug, Clone)]
pub struct StoredFile {
    pub file_name: String,
    pub path: PathBuf,
    pub url: String,
}

#[derive(Clone)]
pub struct StorageService {
    root: PathBuf,
}

impl StorageService {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes the upload under a collision-free generated name and returns
    /// where it landed, both on disk and as a public URL path.
    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<StoredFile> {
        tokio::fs::create_dir_all(&self.root).await?;
        let file_name = unique_name(original_name);
        let path = self.root.join(&file_name);
        tokio::fs::write(&path, bytes).await?;
        let url = format!("/uploads/{file_name}");
        Ok(StoredFile {
            file_name,
            path,
            url,
        })
    }

    /// Best-effort removal. A file that is already gone, or that the
    /// filesystem refuses to delete, is logged and otherwise ignored.
    pub async fn delete(&self, path: &Path) {
        match tokio::fs::remove_file(path).await {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("File already removed: {}", path.display());
            }
            Err(err) => {
                tracing::warn!("Failed to remove {}: {}", path.display(), err);
            }
        }
    }

    /// Deletes files in the upload root that no photo record points at.
    /// Returns how many files were removed.
    pub async fn sweep_orphans(&self, pool: &DbPool) -> Result<usize> {
        if !self.root.exists() {
            return Ok(0);
        }
        let known: HashSet<PathBuf> = Photo::all_file_paths(pool)
            .await?
            .into_iter()
            .map(PathBuf::from)
            .collect();

        let mut removed = 0;
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let Ok(meta) = entry.metadata().await else {
                continue;
            };
            if !meta.is_file() || known.contains(&path) {
                continue;
            }
            let age = meta
                .modified()
                .ok()
                .and_then(|t| t.elapsed().ok())
                .unwrap_or(Duration::ZERO);
            if age < ORPHAN_GRACE {
                continue;
            }
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    tracing::debug!("Removed orphaned upload {}", path.display());
                    removed += 1;
                }
                Err(err) => {
                    tracing::warn!("Failed to remove orphan {}: {}", path.display(), err);
                }
            }
        }
        if removed > 0 {
            tracing::info!("Orphan sweep removed {} file(s)", removed);
        }
        Ok(removed)
    }
}

/// `photo-<millis>-<uuid>` plus the original extension, lowercased. The
/// original base name never reaches the filesystem.
fn unique_name(original_name: &str) -> String {
    let ext = Path::new(original_name)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default();
    format!(
        "photo-{}-{}{}",
        chrono::Utc::now().timestamp_millis(),
        Uuid::new_v4().simple(),
        ext
    )
}
