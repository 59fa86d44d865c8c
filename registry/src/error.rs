use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("caller is not the trust authority")]
    Unauthorized,

    #[error("participant {0} is already registered")]
    AlreadyRegistered(String),

    #[error("participant {0} is not registered")]
    NotRegistered(String),

    #[error("participant {0} is inactive")]
    Inactive(String),
}
