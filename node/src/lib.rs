//! Validator node shell and Trust Authority orchestration.
//!
//! The consensus core is synchronous; this crate drives it from an async
//! actor: an inbox of submissions, vote requests, and gossip, with quorum
//! polls running concurrently against peers over channels. Validators can
//! be moved to separate processes by replacing the channel transport — the
//! core never touches a socket.

pub mod authority;
pub mod config;
pub mod error;
pub mod node;
pub mod ordering;
pub mod stats;

pub use authority::{ScoreReport, TrustAuthority};
pub use config::NodeConfig;
pub use error::NodeError;
pub use node::{NodeHandle, NodeRequest, ValidatorNode};
pub use ordering::SequenceBuffer;
pub use stats::NodeStats;
