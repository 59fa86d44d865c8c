//! Per-validator state machine and submission verification pipeline.

use ivs_crypto::verify_payload;
use ivs_graph::ExposureGraph;
use ivs_messages::{SeedSnapshot, Submission, SubmissionEnvelope};
use ivs_registry::IdentityRegistry;
use ivs_store::{EdgeStore, StatusStore};
use ivs_types::{ParticipantId, PolicyParams, VerificationKey, Signature, Timestamp};
use tracing::{debug, info, warn};

use crate::error::ConsensusError;
use crate::quorum::QuorumDecision;

/// Validator lifecycle. Only the seed snapshot moves a validator out of
/// `Uninitialized`; the node shell promotes it to `Operational` once peer
/// links are wired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidatorPhase {
    Uninitialized,
    Initialized,
    Operational,
}

/// Result of driving one submission through quorum, in the shape the
/// submitter sees. `QuorumNotReached` is a normal rejection outcome, not a
/// hard failure — the submitter owns any retry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Committed { votes: usize, required: usize },
    QuorumNotReached { votes: usize, required: usize },
    Rejected(String),
}

/// A single validator node's consensus state.
///
/// Owns its registry view and its copy of the exposure graph exclusively —
/// no two validators share mutable memory, and replicas may transiently
/// diverge until gossip propagates.
pub struct Validator {
    label: String,
    phase: ValidatorPhase,
    registry: IdentityRegistry,
    graph: ExposureGraph,
    params: PolicyParams,
    ta_public: VerificationKey,
}

impl Validator {
    pub fn new(
        label: impl Into<String>,
        registry: IdentityRegistry,
        params: PolicyParams,
        ta_public: VerificationKey,
    ) -> Self {
        Self {
            label: label.into(),
            phase: ValidatorPhase::Uninitialized,
            registry,
            graph: ExposureGraph::new(),
            params,
            ta_public,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn phase(&self) -> ValidatorPhase {
        self.phase
    }

    pub fn graph(&self) -> &ExposureGraph {
        &self.graph
    }

    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    /// Local registry view; the wiring layer applies TA registrations here.
    pub fn registry_mut(&mut self) -> &mut IdentityRegistry {
        &mut self.registry
    }

    pub fn params(&self) -> &PolicyParams {
        &self.params
    }

    fn require_initialized(&self) -> Result<(), ConsensusError> {
        if self.phase == ValidatorPhase::Uninitialized {
            return Err(ConsensusError::NotInitialized);
        }
        Ok(())
    }

    /// `Uninitialized -> Initialized` on a seed snapshot carrying a valid
    /// TA signature. On a bad signature the validator stays exactly where
    /// it was.
    pub fn initialize(
        &mut self,
        snapshot: &SeedSnapshot,
        signature: &Signature,
    ) -> Result<(), ConsensusError> {
        if self.phase != ValidatorPhase::Uninitialized {
            return Err(ConsensusError::AlreadyInitialized);
        }
        if !verify_payload(&snapshot.signing_payload(), signature, &self.ta_public) {
            warn!(validator = %self.label, "seed snapshot signature rejected");
            return Err(ConsensusError::SignatureInvalid);
        }

        for (a, b) in &snapshot.edges {
            self.graph.add_edge(a, b);
        }
        for (id, masked) in &snapshot.statuses {
            self.graph.set_status(id, masked.clone());
        }
        self.phase = ValidatorPhase::Initialized;
        info!(
            validator = %self.label,
            edges = snapshot.edges.len(),
            statuses = snapshot.statuses.len(),
            "validator initialized from seed snapshot"
        );
        Ok(())
    }

    /// Promote to `Operational` once the node shell has wired peer links.
    pub fn mark_operational(&mut self) -> Result<(), ConsensusError> {
        self.require_initialized()?;
        self.phase = ValidatorPhase::Operational;
        Ok(())
    }

    /// Verify a submission against this validator's own registry view.
    ///
    /// `Ok(())` is an approval vote; any error is a rejection with no state
    /// change and no broadcast. Staleness is refreshed lazily on every
    /// signer before its prior state is trusted.
    pub fn evaluate(
        &mut self,
        envelope: &SubmissionEnvelope,
        now: Timestamp,
    ) -> Result<(), ConsensusError> {
        self.require_initialized()?;

        if !envelope.submitter_is_author() {
            return Err(ConsensusError::NotAuthor(envelope.submitter.to_string()));
        }

        match &envelope.payload {
            Submission::Edge(edge) => {
                let payload = edge.signing_payload();
                self.check_signer(&edge.a, &payload, &edge.signature_a, now)?;
                self.check_signer(&edge.b, &payload, &edge.signature_b, now)?;
            }
            Submission::Status(update) => {
                if update.masked.len() != self.params.num_categories {
                    return Err(ConsensusError::CategoryMismatch {
                        expected: self.params.num_categories,
                        got: update.masked.len(),
                    });
                }
                let payload = update.signing_payload();
                self.check_signer(&update.owner, &payload, &update.signature, now)?;
            }
        }
        Ok(())
    }

    fn check_signer(
        &mut self,
        id: &ParticipantId,
        payload: &[u8; 32],
        signature: &Signature,
        now: Timestamp,
    ) -> Result<(), ConsensusError> {
        self.registry.mark_stale_if_expired(id, now);
        let Some(participant) = self.registry.get(id) else {
            return Err(ConsensusError::NotRegistered(id.to_string()));
        };
        if !participant.is_active() {
            return Err(ConsensusError::Inactive(id.to_string()));
        }
        if !self.registry.verify_signature(id, payload, signature) {
            return Err(ConsensusError::SignatureInvalid);
        }
        Ok(())
    }

    /// Tally a finished quorum poll under this validator's policy.
    pub fn quorum(&self, approvals: usize, total_voters: usize) -> QuorumDecision {
        QuorumDecision::tally(approvals, total_voters, self.params.consensus_threshold)
    }

    /// Apply an accepted submission to local graph state and the ledger
    /// collaborator, and refresh the submitter's liveness.
    ///
    /// Callers only invoke this after the quorum poll for the submission
    /// has fully resolved.
    pub fn commit<S>(
        &mut self,
        envelope: &SubmissionEnvelope,
        store: &S,
        now: Timestamp,
    ) -> Result<(), ConsensusError>
    where
        S: EdgeStore + StatusStore,
    {
        self.require_initialized()?;

        match &envelope.payload {
            Submission::Edge(edge) => {
                store
                    .append_edge(edge)
                    .map_err(|e| ConsensusError::Store(e.to_string()))?;
                let fresh = self.graph.add_edge(&edge.a, &edge.b);
                debug!(
                    validator = %self.label,
                    a = %edge.a,
                    b = %edge.b,
                    fresh,
                    "edge committed"
                );
            }
            Submission::Status(update) => {
                store
                    .append_status(update)
                    .map_err(|e| ConsensusError::Store(e.to_string()))?;
                self.graph.set_status(&update.owner, update.masked.clone());
                debug!(validator = %self.label, owner = %update.owner, "status committed");
            }
        }
        self.registry.touch(&envelope.submitter, now);
        Ok(())
    }

    /// Handle a gossiped commit from a peer: re-validate independently and
    /// apply. A forwarded commit is never trusted blindly; a submission
    /// that fails local verification is dropped.
    pub fn receive_gossip<S>(
        &mut self,
        envelope: &SubmissionEnvelope,
        store: &S,
        now: Timestamp,
    ) -> Result<(), ConsensusError>
    where
        S: EdgeStore + StatusStore,
    {
        self.evaluate(envelope, now)?;
        self.commit(envelope, store, now)
    }
}
