//! Cryptographic primitives for the IVS protocol.
//!
//! - **Ed25519 over SHA-256 payload digests** for signing and verification
//! - **Blake2b** for canonical submission payloads
//! - **Sealed box** (ephemeral X25519 + ChaCha20-Poly1305) for transmitting
//!   noise records to the Trust Authority

pub mod hash;
pub mod keys;
pub mod sealed;
pub mod sign;

pub use hash::{blake2b_256, blake2b_256_multi};
pub use keys::{generate_keypair, keypair_from_seed};
pub use sealed::{seal, unseal, SealError};
pub use sign::{sign_payload, verify_payload};
