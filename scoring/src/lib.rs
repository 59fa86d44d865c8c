//! Noise cancellation and risk classification.
//!
//! Exact cancellation needs the full set of noise records, which only the
//! Trust Authority can assemble (every participant seals it a copy) — so
//! while the arithmetic here is simple, the vault makes it a TA-only
//! capability in a deployed system.

pub mod cancel;
pub mod classify;
pub mod error;
pub mod vault;

pub use cancel::{cancel_noise, CorrectedScore};
pub use classify::{classify, tier_for, Classification};
pub use error::ScoringError;
pub use vault::NoiseVault;
