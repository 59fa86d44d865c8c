//! Network message types for IVS node-to-node communication.
//!
//! Also defines the canonical signing payloads for every signed artifact:
//! contact edges (signed by both endpoints), status updates (signed by the
//! owner), and seed snapshots (signed by the Trust Authority). Canonical
//! bytes are Blake2b digests over the stable field encoding, so signatures
//! are independent of serde framing.

use ivs_crypto::blake2b_256_multi;
use ivs_types::{MaskedVector, ParticipantId, Signature, Timestamp};
use serde::{Deserialize, Serialize};

/// Wire protocol version carried in every header.
pub const PROTOCOL_VERSION: u16 = 1;

/// Header present on every network message.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MessageHeader {
    pub message_type: MessageType,
    pub protocol_version: u16,
    pub timestamp: Timestamp,
}

impl MessageHeader {
    pub fn new(message_type: MessageType, timestamp: Timestamp) -> Self {
        Self {
            message_type,
            protocol_version: PROTOCOL_VERSION,
            timestamp,
        }
    }
}

/// All message types in the protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageType {
    // Participant → validator
    SubmitEdge,
    SubmitStatus,

    // Validator ↔ validator
    VoteRequest,
    VoteResponse,
    CommitGossip,

    // Trust Authority → validator
    SeedSnapshot,
}

/// A mutually signed record that two participants were in proximity.
///
/// The pair is unordered: both endpoints sign the same canonical payload,
/// which sorts the ids before hashing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContactEdge {
    pub a: ParticipantId,
    pub b: ParticipantId,
    pub timestamp: Timestamp,
    pub signature_a: Signature,
    pub signature_b: Signature,
}

impl ContactEdge {
    /// The endpoints in canonical (sorted) order.
    pub fn unordered_pair(&self) -> (&ParticipantId, &ParticipantId) {
        if self.a <= self.b {
            (&self.a, &self.b)
        } else {
            (&self.b, &self.a)
        }
    }

    /// The payload both endpoints sign.
    pub fn signing_payload(&self) -> [u8; 32] {
        edge_signing_payload(&self.a, &self.b, self.timestamp)
    }
}

/// Canonical signing payload for a contact edge; symmetric in (a, b).
pub fn edge_signing_payload(
    a: &ParticipantId,
    b: &ParticipantId,
    timestamp: Timestamp,
) -> [u8; 32] {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    blake2b_256_multi(&[
        b"ivs-edge",
        first.as_bytes(),
        b"|",
        second.as_bytes(),
        b"|",
        &timestamp.as_secs().to_le_bytes(),
    ])
}

/// A masked status vector signed by its owner.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub owner: ParticipantId,
    pub masked: MaskedVector,
    pub timestamp: Timestamp,
    pub signature: Signature,
}

impl StatusUpdate {
    pub fn signing_payload(&self) -> [u8; 32] {
        status_signing_payload(&self.owner, &self.masked, self.timestamp)
    }
}

/// Canonical signing payload for a status update.
pub fn status_signing_payload(
    owner: &ParticipantId,
    masked: &MaskedVector,
    timestamp: Timestamp,
) -> [u8; 32] {
    let mut entries = Vec::with_capacity(masked.len() * 8);
    for entry in masked.entries() {
        entries.extend_from_slice(&entry.to_le_bytes());
    }
    blake2b_256_multi(&[
        b"ivs-status",
        owner.as_bytes(),
        b"|",
        &entries,
        b"|",
        &timestamp.as_secs().to_le_bytes(),
    ])
}

/// The two state-changing submission kinds.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Submission {
    Edge(ContactEdge),
    Status(StatusUpdate),
}

/// A submission together with its ordering metadata.
///
/// `sequence` is the submitter's own issue counter; validators apply one
/// participant's submissions in sequence order while interleaving different
/// participants freely.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmissionEnvelope {
    pub submitter: ParticipantId,
    pub sequence: u64,
    pub payload: Submission,
}

impl SubmissionEnvelope {
    /// Whether the submitter is a legitimate author of the payload:
    /// an endpoint of the edge, or the owner of the status.
    pub fn submitter_is_author(&self) -> bool {
        match &self.payload {
            Submission::Edge(edge) => self.submitter == edge.a || self.submitter == edge.b,
            Submission::Status(update) => self.submitter == update.owner,
        }
    }
}

/// Ask a peer validator to independently verify a submission.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VoteRequestMessage {
    pub header: MessageHeader,
    pub envelope: SubmissionEnvelope,
}

/// A peer validator's verdict on a submission.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VoteResponseMessage {
    pub header: MessageHeader,
    pub approve: bool,
}

/// Fire-and-forget announcement of a locally committed submission.
/// Receivers re-validate independently; a gossiped commit is never trusted
/// blindly.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommitGossipMessage {
    pub header: MessageHeader,
    pub envelope: SubmissionEnvelope,
}

/// The exposure-graph snapshot a validator initializes from.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeedSnapshot {
    pub edges: Vec<(ParticipantId, ParticipantId)>,
    pub statuses: Vec<(ParticipantId, MaskedVector)>,
    pub timestamp: Timestamp,
}

impl SeedSnapshot {
    /// Empty snapshot for bootstrapping a brand-new deployment.
    pub fn empty(timestamp: Timestamp) -> Self {
        Self {
            edges: Vec::new(),
            statuses: Vec::new(),
            timestamp,
        }
    }

    /// The payload the Trust Authority signs.
    pub fn signing_payload(&self) -> [u8; 32] {
        let mut buf = Vec::new();
        for (a, b) in &self.edges {
            buf.extend_from_slice(a.as_bytes());
            buf.push(0);
            buf.extend_from_slice(b.as_bytes());
            buf.push(0);
        }
        for (id, masked) in &self.statuses {
            buf.extend_from_slice(id.as_bytes());
            buf.push(0);
            for entry in masked.entries() {
                buf.extend_from_slice(&entry.to_le_bytes());
            }
        }
        blake2b_256_multi(&[
            b"ivs-snapshot",
            &buf,
            &self.timestamp.as_secs().to_le_bytes(),
        ])
    }
}
