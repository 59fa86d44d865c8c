//! Owned participant registry with TA-gated registration.

use ivs_crypto::verify_payload;
use ivs_types::{
    Participant, ParticipantId, ParticipantStatus, VerificationKey, Signature, Timestamp,
};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::error::RegistryError;

/// Registry of participants and their verification keys.
///
/// Each validator and the Trust Authority own their own instance; instances
/// converge through committed submissions, not shared memory. Cloning the
/// TA's instance is how a freshly wired validator gets its view.
#[derive(Clone)]
pub struct IdentityRegistry {
    /// Identity of the Trust Authority — the only caller allowed to register.
    ta_id: ParticipantId,
    /// Seconds without a committed submission before a participant goes stale.
    staleness_window_secs: u64,
    participants: HashMap<ParticipantId, Participant>,
}

impl IdentityRegistry {
    pub fn new(ta_id: ParticipantId, staleness_window_secs: u64) -> Self {
        Self {
            ta_id,
            staleness_window_secs,
            participants: HashMap::new(),
        }
    }

    /// Register a participant. TA-only.
    ///
    /// On success the participant starts `Active` with its registration
    /// timestamp recorded. Participants are never deleted.
    pub fn register(
        &mut self,
        caller: &ParticipantId,
        id: ParticipantId,
        verification_key: VerificationKey,
        now: Timestamp,
    ) -> Result<(), RegistryError> {
        if caller != &self.ta_id {
            return Err(RegistryError::Unauthorized);
        }
        if self.participants.contains_key(&id) {
            return Err(RegistryError::AlreadyRegistered(id.to_string()));
        }
        info!(participant = %id, "registered participant");
        self.participants.insert(
            id.clone(),
            Participant {
                id,
                verification_key,
                registered_at: now,
                last_seen: now,
                status: ParticipantStatus::Active,
            },
        );
        Ok(())
    }

    /// Verify a signature from a participant over `payload`.
    ///
    /// Returns `true` iff the participant is registered, active, and the
    /// signature validates against its stored key. Returns `false` — never
    /// an error — on any failure, including an unknown id.
    pub fn verify_signature(
        &self,
        id: &ParticipantId,
        payload: &[u8],
        signature: &Signature,
    ) -> bool {
        let Some(participant) = self.participants.get(id) else {
            return false;
        };
        if !participant.status.can_submit() {
            return false;
        }
        verify_payload(payload, signature, &participant.verification_key)
    }

    /// Lazily flip a participant to `Inactive` once the staleness window has
    /// elapsed since its last committed submission.
    ///
    /// Called by validators before trusting a participant's prior state, not
    /// on a background timer. Returns whether the flip happened.
    pub fn mark_stale_if_expired(&mut self, id: &ParticipantId, now: Timestamp) -> bool {
        let Some(participant) = self.participants.get_mut(id) else {
            return false;
        };
        if participant.status == ParticipantStatus::Active
            && participant
                .last_seen
                .has_expired(self.staleness_window_secs, now)
        {
            participant.status = ParticipantStatus::Inactive;
            info!(participant = %id, "participant went stale");
            return true;
        }
        false
    }

    /// Refresh a participant's `last_seen` after one of its submissions
    /// commits. This is what the staleness window measures against.
    pub fn touch(&mut self, id: &ParticipantId, now: Timestamp) {
        if let Some(participant) = self.participants.get_mut(id) {
            participant.last_seen = now;
            debug!(participant = %id, at = %now, "touched participant");
        }
    }

    pub fn get(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.get(id)
    }

    pub fn is_active(&self, id: &ParticipantId) -> bool {
        self.participants
            .get(id)
            .map(|p| p.is_active())
            .unwrap_or(false)
    }

    /// All registered participants, in no particular order.
    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}
