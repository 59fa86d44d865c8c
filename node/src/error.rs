use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("consensus error: {0}")]
    Consensus(#[from] ivs_consensus::ConsensusError),

    #[error("registry error: {0}")]
    Registry(#[from] ivs_registry::RegistryError),

    #[error("graph error: {0}")]
    Graph(#[from] ivs_graph::GraphError),

    #[error("scoring error: {0}")]
    Scoring(#[from] ivs_scoring::ScoringError),

    #[error("store error: {0}")]
    Store(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("node channel closed")]
    ChannelClosed,
}
