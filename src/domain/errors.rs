use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Access denied: authentication required")]
    Unauthenticated,
    #[error("Access denied")]
    Forbidden,
    #[error("Object not found! Id: {id}, Type: {kind}")]
    NotFound { kind: &'static str, id: String },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Data integrity violation: {0}")]
    DataIntegrity(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        DomainError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}
