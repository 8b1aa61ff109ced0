use axum::response::Json as ResponseJson;
use utils::response::ApiResponse;

pub async fn health_check() -> ResponseJson<ApiResponse<&'static str>> {
    ResponseJson(ApiResponse::success_with_message(
        "OK",
        "FotoVault API is running",
    ))
}
