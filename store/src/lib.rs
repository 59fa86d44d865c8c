//! Abstract storage traits for the IVS protocol.
//!
//! The ledger collaborator that durably persists committed contact edges
//! and masked statuses lives outside this core. Every backend implements
//! these traits; the rest of the codebase depends only on them and treats
//! the store as append-only and externally durable.

pub mod error;
pub mod memory;

pub use error::StoreError;
pub use memory::MemoryStore;

use ivs_messages::{ContactEdge, StatusUpdate};
use ivs_types::ParticipantId;

/// Append-only persistence of committed contact edges.
///
/// The store keeps one commit per accepted submission; logical
/// deduplication of an unordered pair is the exposure graph's concern.
pub trait EdgeStore {
    fn append_edge(&self, edge: &ContactEdge) -> Result<(), StoreError>;

    fn read_all_edges(&self) -> Result<Vec<ContactEdge>, StoreError>;
}

/// Persistence of committed masked status vectors, keyed by owner.
///
/// A later append for the same owner supersedes the earlier one;
/// `read_status` returns the latest.
pub trait StatusStore {
    fn append_status(&self, update: &StatusUpdate) -> Result<(), StoreError>;

    fn read_status(&self, id: &ParticipantId) -> Result<Option<StatusUpdate>, StoreError>;
}
