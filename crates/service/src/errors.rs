use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("email already exists: {0}")]
    DuplicateEmail(String),
}

impl ServiceError {
    /// Whether this is the duplicate-email outcome of an add.
    pub fn is_duplicate_email(&self) -> bool {
        matches!(self, Self::DuplicateEmail(_))
    }
}
