use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    #[error("Invalid pagination argument: {0}")]
    InvalidArgument(String),
}

impl PaginationError {
    pub fn invalid(message: impl Into<String>) -> Self {
        PaginationError::InvalidArgument(message.into())
    }
}
