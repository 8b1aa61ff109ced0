use std::path::Path;

use chrono::Utc;
use db::{
    models::{
        album::Album,
        photo::{CreatePhoto, Photo},
    },
    DbErr, DbPool,
};
use thiserror::Error;
use uuid::Uuid;

use super::{
    color::ColorService,
    metadata::MetadataService,
    storage::{StorageService, StorageServiceError},
};

#[derive(Debug, Error)]
pub enum IngestServiceError {
    #[error("Photo title is required")]
    EmptyTitle,
    #[error("Album not found")]
    AlbumNotFound,
    #[error("Photo not found")]
    PhotoNotFound,
    #[error(transparent)]
    Storage(#[from] StorageServiceError),
    #[error(transparent)]
    Database(#[from] DbErr),
}

pub type Result<T> = std::result::Result<T, IngestServiceError>;

/// One file pulled out of a multipart request, fully buffered.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Summary of a multi-file upload. Files are counted exactly once,
/// as either uploaded or failed.
#[derive(Debug)]
pub struct BatchOutcome {
    pub total: usize,
    pub uploaded: usize,
    pub failed: usize,
    pub photos: Vec<Photo>,
}

/// Drives a photo from raw upload bytes to a persisted record: metadata
/// and color extraction are best-effort, the file write and the record
/// insert are not, and the album count is recomputed after every change.
#[derive(Clone)]
pub struct IngestService {
    storage: StorageService,
    metadata: MetadataService,
    color: ColorService,
}

impl IngestService {
    pub fn new(storage: StorageService, metadata: MetadataService, color: ColorService) -> Self {
        Self {
            storage,
            metadata,
            color,
        }
    }

    /// Ingests a single titled upload into an album the user owns.
    pub async fn ingest_one(
        &self,
        pool: &DbPool,
        user_id: Uuid,
        album_id: Uuid,
        file: UploadedFile,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<Photo> {
        // Field validation reports before the album lookup does.
        let title = title.map(|t| t.trim().to_string()).unwrap_or_default();
        if title.is_empty() {
            return Err(IngestServiceError::EmptyTitle);
        }
        let album = Album::find_by_id_for_user(pool, album_id, user_id)
            .await?
            .ok_or(IngestServiceError::AlbumNotFound)?;

        let photo = self
            .persist_file(pool, user_id, &album, file, title, description)
            .await?;
        Album::recount_photos(pool, album.id).await?;
        Ok(photo)
    }

    /// Ingests a set of untitled uploads. Titles default to the filename
    /// without its extension. Failures are isolated per file; the album
    /// count is reconciled once after the whole batch.
    pub async fn ingest_batch(
        &self,
        pool: &DbPool,
        user_id: Uuid,
        album_id: Uuid,
        files: Vec<UploadedFile>,
    ) -> Result<BatchOutcome> {
        let album = Album::find_by_id_for_user(pool, album_id, user_id)
            .await?
            .ok_or(IngestServiceError::AlbumNotFound)?;

        let total = files.len();
        let mut failed = 0;
        let mut photos = Vec::new();
        for file in files {
            let file_name = file.file_name.clone();
            let title = default_title(&file_name);
            match self
                .persist_file(pool, user_id, &album, file, title, None)
                .await
            {
                Ok(photo) => photos.push(photo),
                Err(err) => {
                    tracing::warn!("Skipping batch file {:?}: {}", file_name, err);
                    failed += 1;
                }
            }
        }
        Album::recount_photos(pool, album.id).await?;

        Ok(BatchOutcome {
            total,
            uploaded: photos.len(),
            failed,
            photos,
        })
    }

    /// Removes the stored file (best-effort), then the record, then
    /// reconciles the count of the album the photo belonged to.
    pub async fn delete_photo(&self, pool: &DbPool, user_id: Uuid, photo: &Photo) -> Result<()> {
        self.storage.delete(Path::new(&photo.file_path)).await;
        let rows = Photo::delete(pool, photo.id, user_id).await?;
        if rows == 0 {
            return Err(IngestServiceError::PhotoNotFound);
        }
        Album::recount_photos(pool, photo.album_id).await?;
        Ok(())
    }

    /// The shared per-file pipeline: derive what we can from the bytes,
    /// write the file, insert the record. A failed insert deletes the
    /// just-written file and reports the insert error, not the cleanup.
    async fn persist_file(
        &self,
        pool: &DbPool,
        user_id: Uuid,
        album: &Album,
        file: UploadedFile,
        title: String,
        description: Option<String>,
    ) -> Result<Photo> {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(IngestServiceError::EmptyTitle);
        }
        let description = description.map(|d| d.trim().to_string()).unwrap_or_default();

        let meta = self.metadata.extract(&file.bytes).unwrap_or_default();
        let dominant_color = self.color.dominant_hex(&file.bytes);
        let dimensions = match (meta.width, meta.height) {
            (Some(w), Some(h)) => Some((w, h)),
            _ => self.metadata.probe_dimensions(&file.bytes),
        };
        let acquisition_date = meta.taken_at.unwrap_or_else(Utc::now);

        let stored = self.storage.store(&file.file_name, &file.bytes).await?;

        let data = CreatePhoto {
            album_id: album.id,
            title,
            description,
            acquisition_date,
            size_bytes: file.bytes.len() as i64,
            dominant_color,
            file_name: file.file_name,
            file_path: stored.path.to_string_lossy().into_owned(),
            file_url: stored.url,
            mime_type: file.mime_type,
            width: dimensions.map(|(w, _)| w as i32),
            height: dimensions.map(|(_, h)| h as i32),
        };

        match Photo::create(pool, &data, user_id).await {
            Ok(photo) => Ok(photo),
            Err(err) => {
                self.storage.delete(&stored.path).await;
                Err(err.into())
            }
        }
    }
}

fn default_title(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().trim().to_string())
        .unwrap_or_default()
}
