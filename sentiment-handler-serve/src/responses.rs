use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sentiment_handler::Error;
use serde_json::json;

/// A generic error response.
#[derive(Debug)]
pub(crate) struct ErrorResponse {
    /// The HTTP status code.
    code: StatusCode,
    /// The description of the error.
    message: String,
}

impl ErrorResponse {
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn code(&self) -> StatusCode {
        self.code
    }
}

impl From<Error> for ErrorResponse {
    fn from(error: Error) -> Self {
        let code = match &error {
            Error::UnsupportedContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Error::UnsupportedAccept(_) => StatusCode::NOT_ACCEPTABLE,
            Error::MissingInputKey(_) | Error::InvalidInputField { .. } => StatusCode::BAD_REQUEST,
            // Malformed request bodies surface as wrapped `serde_json` errors
            Error::Wrapped(wrapped) if wrapped.error.is::<serde_json::Error>() => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if code.is_server_error() {
            tracing::error!("Failed to process request: {}", error);
        }
        Self::new(code, error.to_string())
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "code": self.code.as_u16(),
                "message": self.message,
            }
        }));

        (self.code, body).into_response()
    }
}
