use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("{resource} with id {id} not found")]
    NotFound { resource: &'static str, id: String },

    #[error("{0}")]
    Validation(String),
}

impl CatalogError {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        CatalogError::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CatalogError::Validation(message.into())
    }

    /// Machine readable code carried alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::NotFound { .. } => "NOT_FOUND",
            CatalogError::Validation(_) => "VALIDATION_ERROR",
        }
    }
}

/// Rejects empty or whitespace-only required fields.
pub(crate) fn require(field: &str, value: &str) -> CatalogResult<()> {
    if value.trim().is_empty() {
        return Err(CatalogError::validation(format!("{field} is required")));
    }

    Ok(())
}
