use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use catalog::CatalogError;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("{resource} with id {id} not found")]
    NotFound { resource: &'static str, id: String },

    #[error("Missing query")]
    MissingQuery,

    #[error("{}", .0.body_text())]
    MalformedPayload(#[from] JsonRejection),
}

impl AppError {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        AppError::NotFound {
            resource,
            id: id.into(),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Catalog(err) => err.code(),
            AppError::NotFound { .. } => "NOT_FOUND",
            AppError::MissingQuery | AppError::MalformedPayload(_) => "VALIDATION_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Catalog(CatalogError::NotFound { .. }) | AppError::NotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            AppError::Catalog(CatalogError::Validation(_))
            | AppError::MissingQuery
            | AppError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        debug!("Request failed with {status}: {self}");

        let body = json!({ "error": self.to_string(), "code": self.code() });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::from(CatalogError::not_found("Dish", "d")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(CatalogError::validation("name is required")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::MissingQuery.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_codes() {
        assert_eq!(AppError::not_found("Recipe", "r").code(), "NOT_FOUND");
        assert_eq!(
            AppError::from(CatalogError::validation("x")).code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            AppError::not_found("Recipe", "r").to_string(),
            "Recipe with id r not found"
        );
    }
}
