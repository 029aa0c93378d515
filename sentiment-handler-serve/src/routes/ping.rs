use axum::http::StatusCode;

/// Health check. The router is only served once the model is loaded.
pub(crate) async fn ping() -> StatusCode {
    StatusCode::OK
}
