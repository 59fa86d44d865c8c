//! Sealed box for one-way transmission to the Trust Authority.
//!
//! A participant seals its noise record against the TA's identity key; the
//! TA needs no second key pair because the Ed25519 keys convert to X25519
//! (Edwards to Montgomery) for the Diffie-Hellman step. The sender uses an
//! ephemeral X25519 pair, so sealing is one-way and each blob is unique.
//! The AEAD is ChaCha20-Poly1305 keyed by a Blake2b digest of the shared
//! secret; the nonce is the first 12 bytes of the ephemeral public key,
//! unique per seal because the ephemeral key is fresh each time.
//!
//! Blob layout: `ephemeral_public (32) || ciphertext || auth tag (16)`.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use ed25519_dalek::SigningKey;
use ivs_types::{PrivateKey, VerificationKey};
use rand::RngCore;
use thiserror::Error;
use x25519_dalek::{PublicKey as X25519Public, StaticSecret};

use crate::hash::blake2b_256_multi;

/// Bytes added to the plaintext by sealing (ephemeral key + auth tag).
pub const SEAL_OVERHEAD: usize = 32 + 16;

#[derive(Debug, Error)]
pub enum SealError {
    #[error("recipient key is not a valid Ed25519 point")]
    InvalidRecipientKey,

    #[error("sealed blob is too short")]
    TruncatedBlob,

    #[error("authentication check failed")]
    Authentication,
}

/// An Ed25519 private key as an X25519 scalar.
///
/// `SigningKey::to_scalar_bytes()` yields the unclamped scalar that pairs
/// with the Montgomery form of the corresponding verification key.
fn exchange_secret(private: &PrivateKey) -> StaticSecret {
    StaticSecret::from(SigningKey::from_bytes(&private.0).to_scalar_bytes())
}

/// An Ed25519 verification key mapped to its X25519 (Montgomery) form.
/// `None` if the key bytes are not a valid curve point.
fn exchange_public(public: &VerificationKey) -> Option<X25519Public> {
    let verifying_key = ed25519_dalek::VerifyingKey::from_bytes(&public.0).ok()?;
    Some(X25519Public::from(verifying_key.to_montgomery().to_bytes()))
}

fn derive_cipher(shared: &[u8; 32]) -> ChaCha20Poly1305 {
    let sym_key = blake2b_256_multi(&[shared, b"ivs-sealed-record"]);
    ChaCha20Poly1305::new_from_slice(&sym_key).expect("valid key length")
}

/// Seal `data` so that only the holder of `recipient`'s private key can
/// recover it.
pub fn seal(data: &[u8], recipient: &VerificationKey) -> Result<Vec<u8>, SealError> {
    let recipient_x = exchange_public(recipient).ok_or(SealError::InvalidRecipientKey)?;

    let mut ephemeral_bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut ephemeral_bytes);
    let ephemeral_secret = StaticSecret::from(ephemeral_bytes);
    let ephemeral_public = X25519Public::from(&ephemeral_secret);

    let shared = ephemeral_secret.diffie_hellman(&recipient_x);
    let cipher = derive_cipher(shared.as_bytes());

    let mut nonce_bytes = [0u8; 12];
    nonce_bytes.copy_from_slice(&ephemeral_public.as_bytes()[..12]);
    let nonce = Nonce::from(nonce_bytes);

    let ciphertext = cipher
        .encrypt(&nonce, data)
        .map_err(|_| SealError::Authentication)?;

    let mut blob = Vec::with_capacity(32 + ciphertext.len());
    blob.extend_from_slice(ephemeral_public.as_bytes());
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Recover the plaintext from a sealed blob using the recipient's private
/// key.
pub fn unseal(blob: &[u8], recipient_private: &PrivateKey) -> Result<Vec<u8>, SealError> {
    if blob.len() < SEAL_OVERHEAD {
        return Err(SealError::TruncatedBlob);
    }

    let mut ephemeral_public_bytes = [0u8; 32];
    ephemeral_public_bytes.copy_from_slice(&blob[..32]);
    let ephemeral_public = X25519Public::from(ephemeral_public_bytes);

    let shared = exchange_secret(recipient_private).diffie_hellman(&ephemeral_public);
    let cipher = derive_cipher(shared.as_bytes());

    let mut nonce_bytes = [0u8; 12];
    nonce_bytes.copy_from_slice(&ephemeral_public_bytes[..12]);
    let nonce = Nonce::from(nonce_bytes);

    cipher
        .decrypt(&nonce, &blob[32..])
        .map_err(|_| SealError::Authentication)
}
