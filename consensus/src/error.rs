use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsensusError {
    #[error("validator is not initialized")]
    NotInitialized,

    #[error("validator is already initialized")]
    AlreadyInitialized,

    #[error("invalid signature")]
    SignatureInvalid,

    #[error("participant {0} is not registered")]
    NotRegistered(String),

    #[error("participant {0} is inactive")]
    Inactive(String),

    #[error("submitter {0} is not an author of the submission")]
    NotAuthor(String),

    #[error("masked vector has {got} categories, expected {expected}")]
    CategoryMismatch { expected: usize, got: usize },

    #[error("store error: {0}")]
    Store(String),
}
