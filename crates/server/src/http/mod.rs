use axum::{Router, extract::DefaultBodyLimit, middleware::from_fn_with_state, routing::get};
use deployment::Deployment;
use services::services::config::UploadConfig;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{DeploymentImpl, routes};

mod auth;

pub fn router(deployment: DeploymentImpl) -> Router {
    let protected_routes = Router::new()
        .merge(routes::auth::protected_router())
        .merge(routes::albums::router(&deployment))
        .merge(routes::photos::router(&deployment))
        .layer(from_fn_with_state(deployment.clone(), auth::require_auth));

    let api_routes = Router::new()
        .merge(routes::auth::public_router())
        .merge(routes::albums::public_router())
        .merge(protected_routes);

    // Router assembly is synchronous, so read the upload settings without
    // awaiting. Nothing else holds the config lock this early.
    let (upload_dir, limits) = deployment
        .config()
        .try_read()
        .map(|config| (config.upload_dir(), config.uploads.clone()))
        .unwrap_or_else(|_| (utils::assets::uploads_dir(), UploadConfig::default()));
    // Big enough for a full batch of maximum-size files.
    let body_limit =
        (limits.max_upload_bytes as usize).saturating_mul(limits.max_batch_files.max(1));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(deployment)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use deployment::Deployment;
    use image::{ImageFormat, Rgb, RgbImage};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::{DeploymentImpl, test_support::TestEnvGuard};

    const BOUNDARY: &str = "fotovault-test-boundary";

    async fn setup_app() -> (TestEnvGuard, Router) {
        let temp_root = std::env::temp_dir().join(format!("fv-test-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&temp_root).unwrap();
        let env_guard = TestEnvGuard::new(&temp_root);

        let deployment = DeploymentImpl::new().await.unwrap();
        (env_guard, super::router(deployment))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn bare_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn get_request(uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    fn json_request(
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: &serde_json::Value,
    ) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn file_part(name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
        let mut part = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
             filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        part.extend_from_slice(bytes);
        part.extend_from_slice(b"\r\n");
        part
    }

    fn text_part(name: &str, value: &str) -> Vec<u8> {
        format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
            .into_bytes()
    }

    fn multipart_request(uri: &str, token: &str, parts: &[Vec<u8>]) -> Request<Body> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(part);
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn png_bytes(color: [u8; 3]) -> Vec<u8> {
        let img = RgbImage::from_pixel(16, 16, Rgb(color));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    async fn register_user(app: &Router, email: &str) -> String {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/register",
                None,
                &serde_json::json!({ "name": "Test", "email": email, "password": "hunter22" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        body["data"]["token"].as_str().unwrap().to_string()
    }

    async fn create_album(app: &Router, token: &str, title: &str) -> String {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/albums",
                Some(token),
                &serde_json::json!({ "title": title }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        body["data"]["id"].as_str().unwrap().to_string()
    }

    async fn upload_photo(
        app: &Router,
        token: &str,
        album_id: &str,
        title: &str,
        file_name: &str,
        color: [u8; 3],
    ) -> serde_json::Value {
        let response = app
            .clone()
            .oneshot(multipart_request(
                &format!("/api/photos/upload/{album_id}"),
                token,
                &[
                    file_part("file", file_name, "image/png", &png_bytes(color)),
                    text_part("title", title),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Photo uploaded");
        body["data"].clone()
    }

    #[tokio::test]
    async fn health_is_public() {
        let (_guard, app) = setup_app().await;

        let response = app.oneshot(bare_request("GET", "/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "FotoVault API is running");
    }

    #[tokio::test]
    async fn api_requires_a_bearer_token() {
        let (_guard, app) = setup_app().await;

        let response = app
            .clone()
            .oneshot(bare_request("GET", "/api/albums"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Unauthorized. Please sign in again.");

        let response = app
            .oneshot(get_request("/api/albums", "not-a-real-token"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn register_login_and_validate() {
        let (_guard, app) = setup_app().await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/register",
                None,
                &serde_json::json!({
                    "name": "Ana",
                    "email": "ana@example.com",
                    "password": "hunter22"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Account created");
        assert!(body["data"]["token"].as_str().unwrap().len() > 20);
        assert_eq!(body["data"]["user"]["email"], "ana@example.com");
        assert!(body["data"]["user"].get("password_hash").is_none());

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                None,
                &serde_json::json!({ "email": "ana@example.com", "password": "hunter22" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Login successful");
        let token = body["data"]["token"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                None,
                &serde_json::json!({ "email": "ana@example.com", "password": "wrong" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Invalid email or password");

        let response = app
            .clone()
            .oneshot(get_request("/api/auth/validate", &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Token is valid");
        assert_eq!(body["data"]["email"], "ana@example.com");

        let response = app
            .oneshot(get_request("/api/auth/profile", &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["message"].is_null());
        assert_eq!(body["data"]["name"], "Ana");
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let (_guard, app) = setup_app().await;
        register_user(&app, "dupe@example.com").await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/auth/register",
                None,
                &serde_json::json!({
                    "name": "Again",
                    "email": "dupe@example.com",
                    "password": "hunter22"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Email is already registered");
    }

    #[tokio::test]
    async fn photo_lifecycle_through_the_api() {
        let (_guard, app) = setup_app().await;
        let token = register_user(&app, "life@example.com").await;
        let album_id = create_album(&app, &token, "Trip").await;

        let png = png_bytes([255, 0, 0]);
        let response = app
            .clone()
            .oneshot(multipart_request(
                &format!("/api/photos/upload/{album_id}"),
                &token,
                &[
                    file_part("file", "sunset.png", "image/png", &png),
                    text_part("title", "Sunset"),
                    text_part("description", "  over the bay "),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Photo uploaded");
        let photo = &body["data"];
        assert_eq!(photo["title"], "Sunset");
        assert_eq!(photo["description"], "over the bay");
        assert_eq!(photo["dominant_color"], "#e00000");
        assert_eq!(photo["width"], 16);
        assert_eq!(photo["height"], 16);
        assert_eq!(photo["file_name"], "sunset.png");
        assert!(photo["size_formatted"].as_str().unwrap().ends_with(" Bytes"));
        let photo_id = photo["id"].as_str().unwrap().to_string();
        let file_url = photo["file_url"].as_str().unwrap().to_string();
        assert!(file_url.starts_with("/uploads/"));

        // The stored file is served back byte for byte.
        let response = app
            .clone()
            .oneshot(bare_request("GET", &file_url))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(bytes.as_ref(), png.as_slice());

        let response = app
            .clone()
            .oneshot(get_request(&format!("/api/albums/{album_id}"), &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["album"]["photo_count"], 1);
        assert_eq!(body["data"]["photos"][0]["id"], photo_id.as_str());

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/photos/{photo_id}"),
                Some(&token),
                &serde_json::json!({ "title": "Dusk" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Photo updated");
        assert_eq!(body["data"]["title"], "Dusk");

        let response = app
            .clone()
            .oneshot(json_request(
                "DELETE",
                &format!("/api/photos/{photo_id}"),
                Some(&token),
                &serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Photo deleted");

        let response = app
            .clone()
            .oneshot(get_request(&format!("/api/albums/{album_id}"), &token))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["data"]["album"]["photo_count"], 0);

        let response = app.oneshot(bare_request("GET", &file_url)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn batch_upload_counts_per_file() {
        let (_guard, app) = setup_app().await;
        let token = register_user(&app, "batch@example.com").await;
        let album_id = create_album(&app, &token, "Batch").await;

        let response = app
            .clone()
            .oneshot(multipart_request(
                &format!("/api/photos/upload-multiple/{album_id}"),
                &token,
                &[
                    file_part("photos", "red.png", "image/png", &png_bytes([255, 0, 0])),
                    file_part("photos", "blue.png", "image/png", &png_bytes([0, 0, 255])),
                    file_part("photos", "broken.jpg", "image/jpeg", b"not an image"),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["message"], "3 of 3 photos uploaded");
        assert_eq!(body["data"]["total"], 3);
        assert_eq!(body["data"]["uploaded"], 3);
        assert_eq!(body["data"]["failed"], 0);
        let titles: Vec<&str> = body["data"]["photos"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["red", "blue", "broken"]);

        let response = app
            .oneshot(multipart_request(
                &format!("/api/photos/upload-multiple/{album_id}"),
                &token,
                &[text_part("note", "no files here")],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "No images uploaded");
    }

    #[tokio::test]
    async fn upload_validation_errors() {
        let (_guard, app) = setup_app().await;
        let token = register_user(&app, "checks@example.com").await;
        let album_id = create_album(&app, &token, "Checks").await;

        let response = app
            .clone()
            .oneshot(multipart_request(
                &format!("/api/photos/upload/{album_id}"),
                &token,
                &[text_part("title", "Sunset")],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "No image uploaded");

        let response = app
            .clone()
            .oneshot(multipart_request(
                &format!("/api/photos/upload/{album_id}"),
                &token,
                &[file_part("file", "a.png", "image/png", &png_bytes([1, 2, 3]))],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Photo title is required");

        // The title check reports before the album lookup.
        let response = app
            .clone()
            .oneshot(multipart_request(
                &format!("/api/photos/upload/{}", Uuid::new_v4()),
                &token,
                &[
                    file_part("file", "a.png", "image/png", &png_bytes([1, 2, 3])),
                    text_part("title", "   "),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(multipart_request(
                &format!("/api/photos/upload/{}", Uuid::new_v4()),
                &token,
                &[
                    file_part("file", "a.png", "image/png", &png_bytes([1, 2, 3])),
                    text_part("title", "Lost"),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Album not found");
    }

    #[tokio::test]
    async fn album_deletion_refuses_nonempty_albums() {
        let (_guard, app) = setup_app().await;
        let token = register_user(&app, "keeper@example.com").await;
        let album_id = create_album(&app, &token, "Keepers").await;
        let photo = upload_photo(&app, &token, &album_id, "Only one", "one.png", [9, 9, 9]).await;

        let response = app
            .clone()
            .oneshot(json_request(
                "DELETE",
                &format!("/api/albums/{album_id}"),
                Some(&token),
                &serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(
            body["message"],
            "Cannot delete an album that still has photos. Delete the photos first."
        );

        let response = app
            .clone()
            .oneshot(json_request(
                "DELETE",
                &format!("/api/photos/{}", photo["id"].as_str().unwrap()),
                Some(&token),
                &serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(json_request(
                "DELETE",
                &format!("/api/albums/{album_id}"),
                Some(&token),
                &serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Album deleted");

        let response = app
            .oneshot(get_request(&format!("/api/albums/{album_id}"), &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn sharing_exposes_a_sanitized_public_view() {
        let (_guard, app) = setup_app().await;
        let token = register_user(&app, "share@example.com").await;
        let album_id = create_album(&app, &token, "Public trip").await;
        upload_photo(&app, &token, &album_id, "Sea", "sea.png", [0, 0, 255]).await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/albums/{album_id}/share"),
                Some(&token),
                &serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Share link generated");
        let share_token = body["data"]["share_token"].as_str().unwrap().to_string();
        assert_eq!(share_token.len(), 64);
        let share_url = body["data"]["share_url"].as_str().unwrap().to_string();
        assert_eq!(share_url, format!("/api/albums/public/{share_token}"));

        // No auth header on the public view.
        let response = app
            .clone()
            .oneshot(bare_request("GET", &share_url))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let album = &body["data"]["album"];
        assert_eq!(album["title"], "Public trip");
        assert_eq!(album["photo_count"], 1);
        assert!(album.get("share_token").is_none());
        assert!(album.get("user_id").is_none());
        let photo = &body["data"]["photos"][0];
        assert_eq!(photo["dominant_color"], "#0000e0");
        assert!(photo.get("file_path").is_none());
        let file_url = photo["file_url"].as_str().unwrap().to_string();
        let response = app
            .clone()
            .oneshot(bare_request("GET", &file_url))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(json_request(
                "DELETE",
                &format!("/api/albums/{album_id}/share"),
                Some(&token),
                &serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Sharing disabled");
        assert_eq!(body["data"]["is_public"], false);

        let response = app.oneshot(bare_request("GET", &share_url)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Album not found or not public");
    }

    #[tokio::test]
    async fn ownership_is_enforced_across_users() {
        let (_guard, app) = setup_app().await;
        let owner = register_user(&app, "owner@example.com").await;
        let intruder = register_user(&app, "intruder@example.com").await;
        let album_id = create_album(&app, &owner, "Private").await;
        let photo = upload_photo(&app, &owner, &album_id, "Mine", "mine.png", [5, 5, 5]).await;
        let photo_id = photo["id"].as_str().unwrap();

        let response = app
            .clone()
            .oneshot(get_request(&format!("/api/albums/{album_id}"), &intruder))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/photos/{photo_id}"),
                Some(&intruder),
                &serde_json::json!({ "title": "Taken" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .clone()
            .oneshot(multipart_request(
                &format!("/api/photos/upload/{album_id}"),
                &intruder,
                &[
                    file_part("file", "sneak.png", "image/png", &png_bytes([7, 7, 7])),
                    text_part("title", "Sneak"),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Album not found");

        // Nothing changed for the owner.
        let response = app
            .oneshot(get_request(&format!("/api/albums/{album_id}"), &owner))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["data"]["album"]["photo_count"], 1);
        assert_eq!(body["data"]["photos"][0]["title"], "Mine");
    }

    #[tokio::test]
    async fn album_updates_validate_their_payload() {
        let (_guard, app) = setup_app().await;
        let token = register_user(&app, "edits@example.com").await;
        let album_id = create_album(&app, &token, "Drafts").await;

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/albums/{album_id}"),
                Some(&token),
                &serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "No fields to update");

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/albums/{album_id}"),
                Some(&token),
                &serde_json::json!({ "title": "   " }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Title cannot be empty");

        let response = app
            .oneshot(json_request(
                "PUT",
                &format!("/api/albums/{album_id}"),
                Some(&token),
                &serde_json::json!({ "description": " first summer trip " }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Album updated");
        assert_eq!(body["data"]["description"], "first summer trip");
    }

    #[tokio::test]
    async fn photo_listing_honors_sort_params() {
        let (_guard, app) = setup_app().await;
        let token = register_user(&app, "sorted@example.com").await;
        let album_id = create_album(&app, &token, "Sorted").await;
        upload_photo(&app, &token, &album_id, "Bravo", "b.png", [2, 2, 2]).await;
        upload_photo(&app, &token, &album_id, "Alpha", "a.png", [1, 1, 1]).await;

        let response = app
            .clone()
            .oneshot(get_request(
                &format!("/api/photos/album/{album_id}?sortBy=title&order=asc"),
                &token,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["album"]["photo_count"], 2);
        let titles: Vec<&str> = body["data"]["photos"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["Alpha", "Bravo"]);

        // Unknown sort keys are rejected rather than silently remapped.
        let response = app
            .oneshot(get_request(
                &format!("/api/photos/album/{album_id}?sortBy=sneaky"),
                &token,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
