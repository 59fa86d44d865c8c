use thiserror::Error;

#[derive(Debug, Error)]
pub enum MaskingError {
    #[error("seal error: {0}")]
    Seal(#[from] ivs_crypto::SealError),

    #[error("record encoding error: {0}")]
    Encoding(String),
}
