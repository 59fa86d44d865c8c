use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("participant {0} is not present in the exposure graph")]
    UnknownParticipant(String),
}
