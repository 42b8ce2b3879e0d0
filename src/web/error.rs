// src/web/error.rs
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde_json::json;
use thiserror::Error;

use crate::error::TaggerError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("All fields are required.")]
    MissingFields,

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("User already exists.")]
    UserExists,

    #[error("Invalid username or password.")]
    InvalidCredentials,

    #[error("Login required.")]
    Unauthorized,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Malformed request body: {message}")]
    MalformedPayload { status: StatusCode, message: String },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedPayload {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

/// `Json` extractor whose failures render through `AppError`.
#[derive(Debug, Clone)]
pub struct AppJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(AppJson(value))
    }
}

impl From<TaggerError> for AppError {
    fn from(err: TaggerError) -> Self {
        match err {
            TaggerError::InvalidInput(reason) => AppError::InvalidInput(reason),
            other => AppError::Internal(other.into()),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingFields | AppError::PasswordMismatch | AppError::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::UserExists => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::MalformedPayload { status, .. } => *status,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let AppError::Internal(e) = &self {
            error!("Request failed: {:?}", e);
        }

        (
            status,
            Json(json!({"error": self.to_string(), "success": false})),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::MissingFields.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::PasswordMismatch.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::UserExists.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_tagger_errors_convert() {
        let invalid: AppError = TaggerError::invalid_input("rating out of range").into();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let load: AppError = TaggerError::model_load("model.json", "missing").into();
        assert_eq!(load.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_json_rejection_renders_error_body() {
        let request = axum::http::Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(axum::body::Body::from(r#"{"price_range":2}"#))
            .unwrap();

        let rejection = AppJson::<crate::web::schema::LoginRequest>::from_request(request, &())
            .await
            .unwrap_err();
        assert_eq!(rejection.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Malformed request body"));
    }

    #[tokio::test]
    async fn test_missing_content_type_is_rejected() {
        let request = axum::http::Request::builder()
            .method("POST")
            .body(axum::body::Body::from("{}"))
            .unwrap();
        let rejection = AppJson::<serde_json::Value>::from_request(request, &())
            .await
            .unwrap_err();
        assert_eq!(rejection.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_into_response_keeps_status() {
        let response = AppError::UserExists.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
