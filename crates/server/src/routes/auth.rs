use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::user::User;
use deployment::Deployment;
use serde::{Deserialize, Serialize};
use utils::response::ApiResponse;

use crate::{DeploymentImpl, error::ApiError};

// Fields default to empty so a missing field reports as a validation
// failure, not a deserialization one.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

pub async fn register(
    State(deployment): State<DeploymentImpl>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<AuthResponse>>), ApiError> {
    let (user, token) = deployment
        .auth()
        .register(
            &deployment.db().pool,
            &payload.name,
            &payload.email,
            &payload.password,
        )
        .await?;

    tracing::info!("Registered account for {}", user.email);
    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success_with_message(
            AuthResponse { token, user },
            "Account created",
        )),
    ))
}

pub async fn login(
    State(deployment): State<DeploymentImpl>,
    Json(payload): Json<LoginRequest>,
) -> Result<ResponseJson<ApiResponse<AuthResponse>>, ApiError> {
    let (user, token) = deployment
        .auth()
        .login(&deployment.db().pool, &payload.email, &payload.password)
        .await?;

    Ok(ResponseJson(ApiResponse::success_with_message(
        AuthResponse { token, user },
        "Login successful",
    )))
}

pub async fn profile(
    Extension(user): Extension<User>,
) -> Result<ResponseJson<ApiResponse<User>>, ApiError> {
    Ok(ResponseJson(ApiResponse::success(user)))
}

/// A request only reaches this handler once `require_auth` has accepted
/// its token, so there is nothing left to check.
pub async fn validate(
    Extension(user): Extension<User>,
) -> Result<ResponseJson<ApiResponse<User>>, ApiError> {
    Ok(ResponseJson(ApiResponse::success_with_message(
        user,
        "Token is valid",
    )))
}

pub fn public_router() -> Router<DeploymentImpl> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn protected_router() -> Router<DeploymentImpl> {
    Router::new()
        .route("/auth/profile", get(profile))
        .route("/auth/validate", get(validate))
}
