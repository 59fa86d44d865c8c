//! Fundamental types for the IVS protocol.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: participant identities, keys, timestamps, status/masked
//! vectors, policy parameters, and state enums.

pub mod keys;
pub mod params;
pub mod participant;
pub mod state;
pub mod time;
pub mod vector;

pub use keys::{KeyPair, PrivateKey, Signature, VerificationKey};
pub use params::PolicyParams;
pub use participant::{Participant, ParticipantId};
pub use state::{ParticipantStatus, RiskTier};
pub use time::Timestamp;
pub use vector::{Contribution, MaskedVector, NoiseRecord, StatusVector};
