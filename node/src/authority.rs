//! The Trust Authority.
//!
//! Sole party able to register participants, sign seed snapshots, unseal
//! noise-record copies, and perform exact noise cancellation. Owns its own
//! registry and vault; validators get registry views cloned from here.

use ivs_crypto::{generate_keypair, sign_payload};
use ivs_graph::{compute_raw_score, ExposureGraph, RawScore};
use ivs_messages::SeedSnapshot;
use ivs_registry::IdentityRegistry;
use ivs_scoring::{cancel_noise, classify, Classification, CorrectedScore, NoiseVault};
use ivs_store::{EdgeStore, StatusStore};
use ivs_types::{KeyPair, ParticipantId, PolicyParams, VerificationKey, Signature, Timestamp};
use tracing::info;

use crate::error::NodeError;

/// Everything a scoring request produces. Computed fresh per request and
/// never persisted by this core.
#[derive(Debug)]
pub struct ScoreReport {
    pub raw: RawScore,
    pub corrected: CorrectedScore,
    pub classification: Classification,
}

pub struct TrustAuthority {
    id: ParticipantId,
    keys: KeyPair,
    params: PolicyParams,
    registry: IdentityRegistry,
    vault: NoiseVault,
}

impl TrustAuthority {
    /// Create a TA with a fresh key pair.
    pub fn generate(id: ParticipantId, params: PolicyParams) -> Self {
        Self::new(id, generate_keypair(), params)
    }

    pub fn new(id: ParticipantId, keys: KeyPair, params: PolicyParams) -> Self {
        let registry = IdentityRegistry::new(id.clone(), params.staleness_window_secs);
        Self {
            id,
            keys,
            params,
            registry,
            vault: NoiseVault::new(),
        }
    }

    pub fn public_key(&self) -> &VerificationKey {
        &self.keys.public
    }

    pub fn params(&self) -> &PolicyParams {
        &self.params
    }

    /// The TA's registry — clone it to seed a validator's local view.
    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    /// Register a participant (the TA is always an authorized caller of its
    /// own registry).
    pub fn register_participant(
        &mut self,
        id: ParticipantId,
        verification_key: VerificationKey,
        now: Timestamp,
    ) -> Result<(), NodeError> {
        info!(
            participant = %id,
            key = hex::encode(verification_key.as_bytes()),
            "trust authority registering participant"
        );
        let caller = self.id.clone();
        self.registry
            .register(&caller, id, verification_key, now)?;
        Ok(())
    }

    /// Sign a seed snapshot for validator initialization.
    pub fn sign_snapshot(&self, snapshot: &SeedSnapshot) -> Signature {
        sign_payload(&snapshot.signing_payload(), &self.keys.private)
    }

    /// An empty, signed snapshot for bootstrapping a new deployment.
    pub fn bootstrap_snapshot(&self, now: Timestamp) -> (SeedSnapshot, Signature) {
        let snapshot = SeedSnapshot::empty(now);
        let signature = self.sign_snapshot(&snapshot);
        (snapshot, signature)
    }

    /// Accept a participant's sealed noise record into the vault.
    pub fn ingest_sealed_record(&mut self, blob: &[u8]) -> Result<ParticipantId, NodeError> {
        Ok(self.vault.ingest_sealed(blob, &self.keys.private)?)
    }

    /// Score a participant against a committed exposure graph: bounded
    /// propagation, exact noise cancellation, classification.
    pub fn score(
        &self,
        target: &ParticipantId,
        graph: &ExposureGraph,
    ) -> Result<ScoreReport, NodeError> {
        let raw = compute_raw_score(
            graph,
            target,
            self.params.max_hops,
            &self.params.severity_factors,
            self.params.base_score,
        )?;
        let corrected = cancel_noise(&raw, &self.vault);
        let classification = classify(&corrected, &self.params);
        Ok(ScoreReport {
            raw,
            corrected,
            classification,
        })
    }

    /// Score against the ledger collaborator's committed state instead of a
    /// live validator's graph.
    pub fn score_from_store<S>(
        &self,
        target: &ParticipantId,
        store: &S,
    ) -> Result<ScoreReport, NodeError>
    where
        S: EdgeStore + StatusStore,
    {
        let mut graph = ExposureGraph::new();
        for edge in store
            .read_all_edges()
            .map_err(|e| NodeError::Store(e.to_string()))?
        {
            graph.add_edge(&edge.a, &edge.b);
        }
        for participant in self.registry.participants() {
            if let Some(update) = store
                .read_status(&participant.id)
                .map_err(|e| NodeError::Store(e.to_string()))?
            {
                graph.set_status(&participant.id, update.masked);
            }
        }
        self.score(target, &graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ivs_masking::seal_record;
    use ivs_types::{MaskedVector, NoiseRecord, RiskTier};

    fn ta() -> TrustAuthority {
        TrustAuthority::generate(ParticipantId::from("TA"), PolicyParams::ivs_defaults())
    }

    #[test]
    fn registration_is_ta_scoped() {
        let mut authority = ta();
        let kp = ivs_crypto::keypair_from_seed(&[1u8; 32]);
        authority
            .register_participant(ParticipantId::from("alice"), kp.public, Timestamp::new(1))
            .unwrap();
        assert!(authority.registry().is_active(&ParticipantId::from("alice")));
    }

    #[test]
    fn duplicate_registration_surfaces_error() {
        let mut authority = ta();
        let kp1 = ivs_crypto::keypair_from_seed(&[1u8; 32]);
        let kp2 = ivs_crypto::keypair_from_seed(&[2u8; 32]);
        let id = ParticipantId::from("alice");
        authority
            .register_participant(id.clone(), kp1.public, Timestamp::new(1))
            .unwrap();
        assert!(authority
            .register_participant(id, kp2.public, Timestamp::new(2))
            .is_err());
    }

    #[test]
    fn sealed_record_reaches_the_vault() {
        let mut authority = ta();
        let record = NoiseRecord {
            owner: ParticipantId::from("alice"),
            factors: vec![1.0, 0.001, 0.002, 0.003, 0.004],
        };
        let blob = seal_record(&record, authority.public_key()).unwrap();

        let owner = authority.ingest_sealed_record(&blob).unwrap();
        assert_eq!(owner, ParticipantId::from("alice"));
    }

    #[test]
    fn scoring_runs_raw_cancel_classify() {
        let mut authority = ta();
        let record = NoiseRecord {
            owner: ParticipantId::from("bob"),
            factors: vec![1.0, 0.001, 0.001, 0.001, 0.001],
        };
        let blob = seal_record(&record, authority.public_key()).unwrap();
        authority.ingest_sealed_record(&blob).unwrap();

        let mut graph = ExposureGraph::new();
        graph.add_edge(&ParticipantId::from("alice"), &ParticipantId::from("bob"));
        let mut entries = vec![0.001; 5];
        entries[0] = 1.0;
        graph.set_status(&ParticipantId::from("bob"), MaskedVector(entries));

        let report = authority.score(&ParticipantId::from("alice"), &graph).unwrap();

        // base 5 plus one direct-contact contribution of 1/severity^0 = 1.
        assert!((report.corrected.0[0] - 6.0).abs() < 1e-9);
        assert_eq!(report.classification.overall, RiskTier::Safe);
    }
}
