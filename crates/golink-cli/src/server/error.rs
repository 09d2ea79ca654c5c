use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use golink_core::RegistryError;
use serde_json::json;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

pub enum AppError {
    /// No unique link under this name
    NotFound { name: String, message: String },
    Registry(RegistryError),
    Internal(String),
}

impl AppError {
    pub fn not_found(name: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::NotFound {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl From<RegistryError> for AppError {
    fn from(e: RegistryError) -> Self {
        AppError::Registry(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound { name, message } => (
                StatusCode::NOT_FOUND,
                Json(json!({"error": message, "name": name})),
            )
                .into_response(),
            AppError::Registry(e @ RegistryError::EmptyName) => (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": e.to_string()})),
            )
                .into_response(),
            AppError::Registry(RegistryError::Storage(e)) => {
                error!("Failed to save links: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": format!("Failed to save links: {}", e),
                        "suggestion": e.recovery_suggestion(),
                    })),
                )
                    .into_response()
            }
            AppError::Internal(message) => {
                error!("{}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": message})),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use golink_core::StorageError;
    use std::io;
    use std::path::PathBuf;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_storage_error_body_carries_suggestion() {
        let err = AppError::from(RegistryError::Storage(StorageError::PermissionDenied {
            path: PathBuf::from("/data/links.json.tmp"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        }));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to save links: Permission denied"));
        assert_eq!(
            body["suggestion"],
            "Check file and directory permissions on the data directory."
        );
    }

    #[tokio::test]
    async fn test_storage_error_without_suggestion_is_null() {
        let err = AppError::from(RegistryError::Storage(StorageError::WriteError {
            path: PathBuf::from("/data/links.json.tmp"),
            source: io::Error::new(io::ErrorKind::Other, "device went away"),
        }));

        let body = body_json(err.into_response()).await;
        assert!(body["suggestion"].is_null());
    }

    #[tokio::test]
    async fn test_empty_name_is_bad_request() {
        let response = AppError::from(RegistryError::EmptyName).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
