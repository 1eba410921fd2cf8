use thiserror::Error;

use crate::domain::guard::DuplicateKey;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CategoryIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CategoryNameError {
    #[error("Category name must not be blank")]
    Blank,

    #[error("Category name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("Category name is not valid, please enter letters and spaces")]
    InvalidCharacters,
}

/// Top-level error for all category operations
#[derive(Debug, Clone, Error)]
pub enum CategoryError {
    #[error("Invalid category ID: {0}")]
    InvalidCategoryId(#[from] CategoryIdError),

    #[error("Invalid category name: {0}")]
    InvalidName(#[from] CategoryNameError),

    #[error("There is no category for {0}")]
    NotFound(String),

    #[error("{0} category is already exists")]
    NameAlreadyExists(String),

    #[error("{0} is same with the old category name")]
    SameName(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<DuplicateKey> for CategoryError {
    fn from(err: DuplicateKey) -> Self {
        let name = err.0.strip_prefix("category:").unwrap_or(&err.0);
        CategoryError::NameAlreadyExists(name.to_string())
    }
}

impl From<anyhow::Error> for CategoryError {
    fn from(err: anyhow::Error) -> Self {
        CategoryError::Unknown(err.to_string())
    }
}
