//! Key material for participant identity.
//!
//! Every participant (and the Trust Authority) holds one Ed25519 key pair.
//! The public half is the *verification key* the registry stores and checks
//! submissions against; the private half never leaves the owner's device.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The 32-byte public half of a participant's key pair, as recorded in the
/// identity registry and used to verify submission signatures.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerificationKey(pub [u8; 32]);

impl VerificationKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// The 32-byte private half of a participant's key pair.
///
/// Intentionally implements neither `Debug`, `Serialize`, nor `Clone`, so
/// it cannot leak through logs or wire types by accident. Zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(pub [u8; 32]);

/// A 64-byte Ed25519 signature over a canonical submission payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature(pub [u8; 64]);

impl Signature {
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

// serde's derive stops at 32-byte arrays, so the 64-byte signature gets a
// manual visitor that accepts both byte-string and sequence encodings.
impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SigVisitor;

        impl<'de> serde::de::Visitor<'de> for SigVisitor {
            type Value = Signature;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "64 bytes")
            }

            fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
                let arr: [u8; 64] = v
                    .try_into()
                    .map_err(|_| E::invalid_length(v.len(), &self))?;
                Ok(Signature(arr))
            }

            fn visit_seq<A: serde::de::SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> Result<Self::Value, A::Error> {
                let mut arr = [0u8; 64];
                for (i, byte) in arr.iter_mut().enumerate() {
                    *byte = seq
                        .next_element()?
                        .ok_or_else(|| serde::de::Error::invalid_length(i, &self))?;
                }
                Ok(Signature(arr))
            }
        }

        deserializer.deserialize_bytes(SigVisitor)
    }
}

/// A participant's full key pair.
///
/// Construct via `ivs_crypto::generate_keypair()` or
/// `ivs_crypto::keypair_from_seed()`; this struct is intentionally just
/// data.
pub struct KeyPair {
    pub public: VerificationKey,
    pub private: PrivateKey,
}
