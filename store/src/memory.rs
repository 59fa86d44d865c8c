//! In-memory store backend for tests and in-process nodes.

use ivs_messages::{ContactEdge, StatusUpdate};
use ivs_types::ParticipantId;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::{EdgeStore, StatusStore, StoreError};

/// Non-durable backend holding everything behind mutexes.
#[derive(Default)]
pub struct MemoryStore {
    edges: Mutex<Vec<ContactEdge>>,
    statuses: Mutex<HashMap<ParticipantId, StatusUpdate>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EdgeStore for MemoryStore {
    fn append_edge(&self, edge: &ContactEdge) -> Result<(), StoreError> {
        let mut edges = self
            .edges
            .lock()
            .map_err(|_| StoreError::Backend("edge lock poisoned".into()))?;
        edges.push(edge.clone());
        Ok(())
    }

    fn read_all_edges(&self) -> Result<Vec<ContactEdge>, StoreError> {
        let edges = self
            .edges
            .lock()
            .map_err(|_| StoreError::Backend("edge lock poisoned".into()))?;
        Ok(edges.clone())
    }
}

impl StatusStore for MemoryStore {
    fn append_status(&self, update: &StatusUpdate) -> Result<(), StoreError> {
        let mut statuses = self
            .statuses
            .lock()
            .map_err(|_| StoreError::Backend("status lock poisoned".into()))?;
        statuses.insert(update.owner.clone(), update.clone());
        Ok(())
    }

    fn read_status(&self, id: &ParticipantId) -> Result<Option<StatusUpdate>, StoreError> {
        let statuses = self
            .statuses
            .lock()
            .map_err(|_| StoreError::Backend("status lock poisoned".into()))?;
        Ok(statuses.get(id).cloned())
    }
}
