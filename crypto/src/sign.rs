//! Submission signing and verification.
//!
//! Every signed artifact (contact edge, status update, seed snapshot)
//! signs the SHA-256 digest of its canonical payload rather than the raw
//! bytes, so the signed input has a fixed size regardless of how large the
//! submission grows.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use ivs_types::{PrivateKey, Signature, VerificationKey};
use sha2::{Digest, Sha256};

/// Sign a canonical payload with a private key.
pub fn sign_payload(payload: &[u8], private_key: &PrivateKey) -> Signature {
    let digest = Sha256::digest(payload);
    let signing_key = SigningKey::from_bytes(&private_key.0);
    Signature(signing_key.sign(&digest).to_bytes())
}

/// Verify a signature over a canonical payload.
///
/// Returns `true` only for a valid signature from the holder of
/// `verification_key`; `false` otherwise, including for malformed keys.
/// Never panics — registries call this on wholly untrusted input.
pub fn verify_payload(
    payload: &[u8],
    signature: &Signature,
    verification_key: &VerificationKey,
) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(&verification_key.0) else {
        return false;
    };
    let digest = Sha256::digest(payload);
    let dalek_sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    verifying_key.verify(&digest, &dalek_sig).is_ok()
}
