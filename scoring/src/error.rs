use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("sealed record error: {0}")]
    SealedRecord(#[from] ivs_masking::MaskingError),
}
