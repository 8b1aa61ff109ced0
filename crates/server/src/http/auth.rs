use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use db::models::user::User;
use deployment::Deployment;
use utils::response::ApiResponse;

use crate::DeploymentImpl;

fn parse_authorization_bearer(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    let (prefix, rest) = trimmed.split_once(' ')?;
    if !prefix.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = rest.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

fn unauthorized(req: &Request, reason: &'static str) -> Response {
    tracing::warn!(
        path = %req.uri().path(),
        method = %req.method(),
        reason,
        "Unauthorized API request"
    );
    let response = ApiResponse::<()>::error("Unauthorized. Please sign in again.");
    (StatusCode::UNAUTHORIZED, Json(response)).into_response()
}

/// Verifies the bearer token and stashes the signed-in [`User`] as a
/// request extension for handlers and model loaders downstream.
pub async fn require_auth(
    State(deployment): State<DeploymentImpl>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_authorization_bearer)
        .map(str::to_string)
    else {
        return unauthorized(&req, "missing_token");
    };

    let user_id = match deployment.auth().verify_token(&token) {
        Ok(user_id) => user_id,
        Err(_) => return unauthorized(&req, "invalid_token"),
    };

    let user = match User::find_by_id(&deployment.db().pool, user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return unauthorized(&req, "unknown_user"),
        Err(err) => {
            tracing::error!("Failed to load user {user_id}: {err}");
            let response = ApiResponse::<()>::error("Internal server error");
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response();
        }
    };

    req.extensions_mut().insert(user);
    next.run(req).await
}
