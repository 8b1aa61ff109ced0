use axum::{
    Extension, Json, Router,
    extract::{Multipart, Path, Query, State, multipart::Field},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::{
    album::Album,
    photo::{Photo, PhotoSortKey, SortOrder, UpdatePhoto},
    user::User,
};
use deployment::Deployment;
use serde::{Deserialize, Serialize};
use services::services::{config::UploadConfig, ingest::UploadedFile};
use utils::{format::format_size, response::ApiResponse};
use uuid::Uuid;

use crate::{DeploymentImpl, error::ApiError, middleware::load_photo_middleware};

/// A photo record plus the human-readable size the gallery renders.
#[derive(Debug, Serialize)]
pub struct PhotoResponse {
    #[serde(flatten)]
    pub photo: Photo,
    pub size_formatted: String,
}

impl From<Photo> for PhotoResponse {
    fn from(photo: Photo) -> Self {
        let size_formatted = format_size(photo.size_bytes.max(0) as u64);
        Self {
            photo,
            size_formatted,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AlbumSummary {
    pub id: Uuid,
    pub title: String,
    pub photo_count: i64,
}

#[derive(Debug, Serialize)]
pub struct PhotoListing {
    pub album: AlbumSummary,
    pub photos: Vec<PhotoResponse>,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub total: usize,
    pub uploaded: usize,
    pub failed: usize,
    pub photos: Vec<PhotoResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PhotoListQuery {
    #[serde(rename = "sortBy")]
    pub sort_by: PhotoSortKey,
    pub order: SortOrder,
}

pub async fn upload_photo(
    State(deployment): State<DeploymentImpl>,
    Extension(user): Extension<User>,
    Path(album_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, ResponseJson<ApiResponse<PhotoResponse>>), ApiError> {
    let limits = upload_limits(&deployment).await;

    let mut file = None;
    let mut title = None;
    let mut description = None;
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => file = Some(read_file_field(field, limits.max_upload_bytes).await?),
            "title" => title = Some(field.text().await?),
            "description" => description = Some(field.text().await?),
            _ => {}
        }
    }
    let Some(file) = file else {
        return Err("No image uploaded".into());
    };

    let photo = deployment
        .ingest()
        .ingest_one(
            &deployment.db().pool,
            user.id,
            album_id,
            file,
            title,
            description,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success_with_message(
            photo.into(),
            "Photo uploaded",
        )),
    ))
}

pub async fn upload_multiple_photos(
    State(deployment): State<DeploymentImpl>,
    Extension(user): Extension<User>,
    Path(album_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, ResponseJson<ApiResponse<BatchResponse>>), ApiError> {
    let limits = upload_limits(&deployment).await;

    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("photos") {
            continue;
        }
        if files.len() >= limits.max_batch_files {
            return Err(ApiError::BadRequest(format!(
                "A batch may contain at most {} files",
                limits.max_batch_files
            )));
        }
        files.push(read_file_field(field, limits.max_upload_bytes).await?);
    }
    if files.is_empty() {
        return Err("No images uploaded".into());
    }

    let outcome = deployment
        .ingest()
        .ingest_batch(&deployment.db().pool, user.id, album_id, files)
        .await?;
    let message = format!("{} of {} photos uploaded", outcome.uploaded, outcome.total);
    let response = BatchResponse {
        total: outcome.total,
        uploaded: outcome.uploaded,
        failed: outcome.failed,
        photos: outcome.photos.into_iter().map(PhotoResponse::from).collect(),
    };
    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success_with_message(response, &message)),
    ))
}

pub async fn get_photos_by_album(
    State(deployment): State<DeploymentImpl>,
    Extension(user): Extension<User>,
    Path(album_id): Path<Uuid>,
    Query(query): Query<PhotoListQuery>,
) -> Result<ResponseJson<ApiResponse<PhotoListing>>, ApiError> {
    let pool = &deployment.db().pool;
    let album = Album::find_by_id_for_user(pool, album_id, user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Album not found".to_string()))?;
    let photos = Photo::find_by_album(pool, album.id, query.sort_by, query.order).await?;

    Ok(ResponseJson(ApiResponse::success(PhotoListing {
        album: AlbumSummary {
            id: album.id,
            title: album.title,
            photo_count: album.photo_count,
        },
        photos: photos.into_iter().map(PhotoResponse::from).collect(),
    })))
}

pub async fn get_photo(
    Extension(photo): Extension<Photo>,
) -> ResponseJson<ApiResponse<PhotoResponse>> {
    ResponseJson(ApiResponse::success(photo.into()))
}

pub async fn update_photo(
    Extension(photo): Extension<Photo>,
    Extension(user): Extension<User>,
    State(deployment): State<DeploymentImpl>,
    Json(payload): Json<UpdatePhoto>,
) -> Result<ResponseJson<ApiResponse<PhotoResponse>>, ApiError> {
    let updates = UpdatePhoto {
        title: payload.title.map(|t| t.trim().to_string()),
        description: payload.description.map(|d| d.trim().to_string()),
    };
    if matches!(&updates.title, Some(title) if title.is_empty()) {
        return Err("Title cannot be empty".into());
    }
    if updates.title.is_none() && updates.description.is_none() {
        return Err("No fields to update".into());
    }

    let photo = Photo::update(&deployment.db().pool, photo.id, user.id, &updates).await?;
    Ok(ResponseJson(ApiResponse::success_with_message(
        photo.into(),
        "Photo updated",
    )))
}

pub async fn delete_photo(
    Extension(photo): Extension<Photo>,
    Extension(user): Extension<User>,
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    deployment
        .ingest()
        .delete_photo(&deployment.db().pool, user.id, &photo)
        .await?;
    Ok(ResponseJson(ApiResponse::success_with_message(
        (),
        "Photo deleted",
    )))
}

async fn upload_limits(deployment: &DeploymentImpl) -> UploadConfig {
    deployment.config().read().await.uploads.clone()
}

/// Buffers one multipart file field, rejecting it as soon as it grows past
/// the configured upload limit.
async fn read_file_field(
    mut field: Field<'_>,
    max_upload_bytes: u64,
) -> Result<UploadedFile, ApiError> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let mime_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        if (bytes.len() + chunk.len()) as u64 > max_upload_bytes {
            return Err(ApiError::PayloadTooLarge(format!(
                "File exceeds the {} upload limit",
                format_size(max_upload_bytes)
            )));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(UploadedFile {
        file_name,
        mime_type,
        bytes,
    })
}

pub fn router(deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    let photo_id_router = Router::new()
        .route("/", get(get_photo).put(update_photo).delete(delete_photo))
        .layer(from_fn_with_state(
            deployment.clone(),
            load_photo_middleware::<DeploymentImpl>,
        ));

    Router::new()
        .route("/photos/upload/{album_id}", post(upload_photo))
        .route(
            "/photos/upload-multiple/{album_id}",
            post(upload_multiple_photos),
        )
        .route("/photos/album/{album_id}", get(get_photos_by_album))
        .nest("/photos/{photo_id}", photo_id_router)
}
