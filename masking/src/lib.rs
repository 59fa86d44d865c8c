//! Noise masking engine for the IVS protocol.
//!
//! Produces the obfuscated status vectors that validators and aggregators
//! may combine arithmetically without learning the true booleans, while the
//! masking participant (and the Trust Authority, via a sealed copy) retain
//! the noise needed to cancel it exactly.

pub mod error;
pub mod masker;
pub mod sealed;

pub use error::MaskingError;
pub use masker::{
    mask, unmask_range, NEGATIVE_FACTOR_MAX, POSITIVE_FACTOR_MAX, POSITIVE_FACTOR_MIN,
    POSITIVE_THRESHOLD,
};
pub use sealed::{seal_record, unseal_record};
