use std::{fmt::Display, future::Future};

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use db::{
    DBService,
    models::{album::Album, photo::Photo, user::User},
};
use deployment::Deployment;
use uuid::Uuid;

pub trait ModelLoaderDeps {
    fn db_service(&self) -> &DBService;
}

impl<D> ModelLoaderDeps for D
where
    D: Deployment,
{
    fn db_service(&self) -> &DBService {
        self.db()
    }
}

async fn fetch_model_or_status<M, E, Fut>(
    model_name: &'static str,
    model_id: Uuid,
    load_future: Fut,
) -> Result<M, StatusCode>
where
    E: Display,
    Fut: Future<Output = Result<Option<M>, E>>,
{
    match load_future.await {
        Ok(Some(model)) => Ok(model),
        Ok(None) => {
            tracing::warn!("{model_name} {model_id} not found");
            Err(StatusCode::NOT_FOUND)
        }
        Err(error) => {
            tracing::error!("Failed to fetch {model_name} {model_id}: {error}");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn load_request_extension<M, E, Fut>(
    request: Request,
    next: Next,
    model_name: &'static str,
    model_id: Uuid,
    load_future: Fut,
) -> Result<Response, StatusCode>
where
    M: Clone + Send + Sync + 'static,
    E: Display,
    Fut: Future<Output = Result<Option<M>, E>>,
{
    let model = fetch_model_or_status(model_name, model_id, load_future).await?;
    let mut request = request;
    request.extensions_mut().insert(model);
    Ok(next.run(request).await)
}

/// The signed-in user, put there by `require_auth`, which runs before
/// any model loader.
fn request_user(request: &Request) -> Result<&User, StatusCode> {
    request
        .extensions()
        .get::<User>()
        .ok_or(StatusCode::UNAUTHORIZED)
}

/// Lookups are scoped to the requesting user, so someone else's album
/// loads as 404 rather than 403.
pub async fn load_album_middleware<S>(
    State(deployment): State<S>,
    Path(album_id): Path<Uuid>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode>
where
    S: ModelLoaderDeps,
{
    let user_id = request_user(&request)?.id;
    load_request_extension(
        request,
        next,
        "Album",
        album_id,
        Album::find_by_id_for_user(&deployment.db_service().pool, album_id, user_id),
    )
    .await
}

pub async fn load_photo_middleware<S>(
    State(deployment): State<S>,
    Path(photo_id): Path<Uuid>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode>
where
    S: ModelLoaderDeps,
{
    let user_id = request_user(&request)?.id;
    load_request_extension(
        request,
        next,
        "Photo",
        photo_id,
        Photo::find_by_id_for_user(&deployment.db_service().pool, photo_id, user_id),
    )
    .await
}
