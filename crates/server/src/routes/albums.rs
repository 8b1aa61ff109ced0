use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use db::models::{
    album::{Album, CreateAlbum, UpdateAlbum},
    photo::{Photo, PhotoSortKey, SortOrder},
    user::User,
};
use deployment::Deployment;
use serde::{Deserialize, Serialize};
use utils::{format::format_size, response::ApiResponse};
use uuid::Uuid;

use crate::{
    DeploymentImpl, error::ApiError, middleware::load_album_middleware,
    routes::photos::PhotoResponse,
};

// Title defaults to empty so a missing field reports as a validation
// failure, not a deserialization one.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateAlbumRequest {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AlbumDetail {
    pub album: Album,
    pub photos: Vec<PhotoResponse>,
}

#[derive(Debug, Serialize)]
pub struct ShareInfo {
    pub share_token: String,
    pub share_url: String,
}

/// Album view for unauthenticated visitors; the owner and the sharing
/// internals stay private.
#[derive(Debug, Serialize)]
pub struct PublicAlbum {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub photo_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Album> for PublicAlbum {
    fn from(album: Album) -> Self {
        Self {
            id: album.id,
            title: album.title,
            description: album.description,
            photo_count: album.photo_count,
            created_at: album.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PublicPhoto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub acquisition_date: DateTime<Utc>,
    pub size_formatted: String,
    pub dominant_color: String,
    pub file_url: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

impl From<Photo> for PublicPhoto {
    fn from(photo: Photo) -> Self {
        Self {
            id: photo.id,
            title: photo.title,
            description: photo.description,
            acquisition_date: photo.acquisition_date,
            size_formatted: format_size(photo.size_bytes.max(0) as u64),
            dominant_color: photo.dominant_color,
            file_url: photo.file_url,
            width: photo.width,
            height: photo.height,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PublicAlbumDetail {
    pub album: PublicAlbum,
    pub photos: Vec<PublicPhoto>,
}

pub async fn list_albums(
    State(deployment): State<DeploymentImpl>,
    Extension(user): Extension<User>,
) -> Result<ResponseJson<ApiResponse<Vec<Album>>>, ApiError> {
    let albums = Album::find_all_for_user(&deployment.db().pool, user.id).await?;
    Ok(ResponseJson(ApiResponse::success(albums)))
}

pub async fn create_album(
    State(deployment): State<DeploymentImpl>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateAlbumRequest>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Album>>), ApiError> {
    let data = CreateAlbum {
        title: payload.title.trim().to_string(),
        description: payload.description.map(|d| d.trim().to_string()),
    };
    if data.title.is_empty() {
        return Err("Album title is required".into());
    }

    let album = Album::create(&deployment.db().pool, &data, user.id).await?;
    tracing::debug!("Created album '{}' for {}", album.title, user.email);
    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success_with_message(album, "Album created")),
    ))
}

pub async fn get_album(
    Extension(album): Extension<Album>,
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<AlbumDetail>>, ApiError> {
    let photos = Photo::find_by_album(
        &deployment.db().pool,
        album.id,
        PhotoSortKey::default(),
        SortOrder::default(),
    )
    .await?;

    Ok(ResponseJson(ApiResponse::success(AlbumDetail {
        album,
        photos: photos.into_iter().map(PhotoResponse::from).collect(),
    })))
}

pub async fn update_album(
    Extension(album): Extension<Album>,
    Extension(user): Extension<User>,
    State(deployment): State<DeploymentImpl>,
    Json(payload): Json<UpdateAlbum>,
) -> Result<ResponseJson<ApiResponse<Album>>, ApiError> {
    let updates = UpdateAlbum {
        title: payload.title.map(|t| t.trim().to_string()),
        description: payload.description.map(|d| d.trim().to_string()),
    };
    if matches!(&updates.title, Some(title) if title.is_empty()) {
        return Err("Title cannot be empty".into());
    }
    if updates.title.is_none() && updates.description.is_none() {
        return Err("No fields to update".into());
    }

    let album = Album::update(&deployment.db().pool, album.id, user.id, &updates).await?;
    Ok(ResponseJson(ApiResponse::success_with_message(
        album,
        "Album updated",
    )))
}

pub async fn delete_album(
    Extension(album): Extension<Album>,
    Extension(user): Extension<User>,
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    if album.photo_count > 0 {
        return Err("Cannot delete an album that still has photos. Delete the photos first.".into());
    }

    let rows = Album::delete(&deployment.db().pool, album.id, user.id).await?;
    if rows == 0 {
        return Err(ApiError::NotFound("Album not found".to_string()));
    }
    Ok(ResponseJson(ApiResponse::success_with_message(
        (),
        "Album deleted",
    )))
}

pub async fn share_album(
    Extension(album): Extension<Album>,
    Extension(user): Extension<User>,
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<ShareInfo>>, ApiError> {
    let token = generate_share_token();
    Album::set_share_token(&deployment.db().pool, album.id, user.id, &token).await?;

    Ok(ResponseJson(ApiResponse::success_with_message(
        ShareInfo {
            share_url: format!("/api/albums/public/{token}"),
            share_token: token,
        },
        "Share link generated",
    )))
}

pub async fn unshare_album(
    Extension(album): Extension<Album>,
    Extension(user): Extension<User>,
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<Album>>, ApiError> {
    let album = Album::clear_share_token(&deployment.db().pool, album.id, user.id).await?;
    Ok(ResponseJson(ApiResponse::success_with_message(
        album,
        "Sharing disabled",
    )))
}

pub async fn get_public_album(
    State(deployment): State<DeploymentImpl>,
    Path(share_token): Path<String>,
) -> Result<ResponseJson<ApiResponse<PublicAlbumDetail>>, ApiError> {
    let pool = &deployment.db().pool;
    let album = Album::find_by_share_token(pool, &share_token)
        .await?
        .ok_or_else(|| ApiError::NotFound("Album not found or not public".to_string()))?;
    let photos =
        Photo::find_by_album(pool, album.id, PhotoSortKey::default(), SortOrder::default()).await?;

    Ok(ResponseJson(ApiResponse::success(PublicAlbumDetail {
        album: PublicAlbum::from(album),
        photos: photos.into_iter().map(PublicPhoto::from).collect(),
    })))
}

fn generate_share_token() -> String {
    let bytes: [u8; 32] = rand::random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

pub fn router(deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    let album_id_router = Router::new()
        .route("/", get(get_album).put(update_album).delete(delete_album))
        .route("/share", post(share_album).delete(unshare_album))
        .layer(from_fn_with_state(
            deployment.clone(),
            load_album_middleware::<DeploymentImpl>,
        ));

    Router::new()
        .route("/albums", get(list_albums).post(create_album))
        .nest("/albums/{album_id}", album_id_router)
}

pub fn public_router() -> Router<DeploymentImpl> {
    Router::new().route("/albums/public/{share_token}", get(get_public_album))
}
