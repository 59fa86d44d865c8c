//! Identity key generation.
//!
//! One Ed25519 key pair per participant, generated on the sensing device
//! (or, for the Trust Authority, wherever the TA runs). The seed-derived
//! constructor exists so tests can build reproducible identities without a
//! key store.

use ed25519_dalek::SigningKey;
use ivs_types::{KeyPair, PrivateKey, VerificationKey};
use rand::rngs::OsRng;

/// Generate a fresh identity key pair from the OS random source.
pub fn generate_keypair() -> KeyPair {
    let signing_key = SigningKey::generate(&mut OsRng);
    KeyPair {
        public: VerificationKey(signing_key.verifying_key().to_bytes()),
        private: PrivateKey(signing_key.to_bytes()),
    }
}

/// Derive a key pair deterministically from a 32-byte seed.
pub fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
    let signing_key = SigningKey::from_bytes(seed);
    KeyPair {
        public: VerificationKey(signing_key.verifying_key().to_bytes()),
        private: PrivateKey(signing_key.to_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_pairs_are_distinct_and_nonzero() {
        let kp1 = generate_keypair();
        let kp2 = generate_keypair();
        assert_ne!(kp1.public.0, [0u8; 32]);
        assert_ne!(kp1.private.0, [0u8; 32]);
        assert_ne!(kp1.public.0, kp2.public.0);
    }

    #[test]
    fn seed_derivation_is_deterministic() {
        let kp1 = keypair_from_seed(&[42u8; 32]);
        let kp2 = keypair_from_seed(&[42u8; 32]);
        assert_eq!(kp1.public.0, kp2.public.0);
        assert_eq!(kp1.private.0, kp2.private.0);

        let other = keypair_from_seed(&[43u8; 32]);
        assert_ne!(kp1.public.0, other.public.0);
    }

    #[test]
    fn seeded_pair_signs_like_a_generated_one() {
        let kp = keypair_from_seed(&[7u8; 32]);
        let sig = crate::sign_payload(b"probe", &kp.private);
        assert!(crate::verify_payload(b"probe", &sig, &kp.public));
    }
}
