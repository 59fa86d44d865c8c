//! The Trust Authority's collection of unsealed noise records.

use ivs_masking::unseal_record;
use ivs_types::{NoiseRecord, ParticipantId, PrivateKey};
use std::collections::HashMap;
use tracing::debug;

use crate::error::ScoringError;

/// Maps `(participant, category)` to the noise factor that masked it.
///
/// Populated from the sealed copies every masking participant transmits to
/// the TA. A record supersedes the previous one for the same owner, matching
/// re-masking semantics. Never shared with validators.
#[derive(Default)]
pub struct NoiseVault {
    records: HashMap<ParticipantId, Vec<f64>>,
}

impl NoiseVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record directly (TA-local path, e.g. tests).
    pub fn insert(&mut self, record: NoiseRecord) {
        self.records.insert(record.owner.clone(), record.factors);
    }

    /// Unseal a participant-sealed record and store it.
    /// Returns the owner on success.
    pub fn ingest_sealed(
        &mut self,
        blob: &[u8],
        ta_private: &PrivateKey,
    ) -> Result<ParticipantId, ScoringError> {
        let record = unseal_record(blob, ta_private)?;
        let owner = record.owner.clone();
        debug!(owner = %owner, categories = record.factors.len(), "ingested sealed noise record");
        self.insert(record);
        Ok(owner)
    }

    /// The noise factor for one participant's category, if known.
    pub fn factor(&self, id: &ParticipantId, category: usize) -> Option<f64> {
        self.records.get(id).and_then(|f| f.get(category)).copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ivs_crypto::generate_keypair;
    use ivs_masking::seal_record;

    #[test]
    fn ingest_sealed_roundtrip() {
        let ta = generate_keypair();
        let record = NoiseRecord {
            owner: ParticipantId::from("p1"),
            factors: vec![1.01, 0.002],
        };
        let blob = seal_record(&record, &ta.public).unwrap();

        let mut vault = NoiseVault::new();
        let owner = vault.ingest_sealed(&blob, &ta.private).unwrap();

        assert_eq!(owner, ParticipantId::from("p1"));
        assert_eq!(vault.factor(&owner, 0), Some(1.01));
        assert_eq!(vault.factor(&owner, 1), Some(0.002));
        assert_eq!(vault.factor(&owner, 2), None);
    }

    #[test]
    fn remasking_supersedes() {
        let mut vault = NoiseVault::new();
        let owner = ParticipantId::from("p1");
        vault.insert(NoiseRecord {
            owner: owner.clone(),
            factors: vec![1.01],
        });
        vault.insert(NoiseRecord {
            owner: owner.clone(),
            factors: vec![0.99],
        });
        assert_eq!(vault.len(), 1);
        assert_eq!(vault.factor(&owner, 0), Some(0.99));
    }
}
