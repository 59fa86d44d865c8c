//! Sealed noise-record copies for the Trust Authority.
//!
//! The masking participant produces one sealed copy of every noise record
//! it generates; only the TA's private key opens it. Sealed blobs are the
//! sole path by which noise factors leave the masking device.

use ivs_types::{NoiseRecord, PrivateKey, VerificationKey};
use tracing::debug;

use crate::error::MaskingError;

/// Seal a noise record for the Trust Authority.
pub fn seal_record(record: &NoiseRecord, ta_public: &VerificationKey) -> Result<Vec<u8>, MaskingError> {
    let bytes =
        bincode::serialize(record).map_err(|e| MaskingError::Encoding(e.to_string()))?;
    let blob = ivs_crypto::seal(&bytes, ta_public)?;
    debug!(owner = %record.owner, bytes = blob.len(), "sealed noise record");
    Ok(blob)
}

/// Open a sealed noise record. TA-side only.
pub fn unseal_record(blob: &[u8], ta_private: &PrivateKey) -> Result<NoiseRecord, MaskingError> {
    let bytes = ivs_crypto::unseal(blob, ta_private)?;
    bincode::deserialize(&bytes).map_err(|e| MaskingError::Encoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ivs_crypto::{generate_keypair, keypair_from_seed};
    use ivs_types::ParticipantId;

    fn record() -> NoiseRecord {
        NoiseRecord {
            owner: ParticipantId::from("p1"),
            factors: vec![1.02, 0.001, 0.97, 0.0, 0.004],
        }
    }

    #[test]
    fn seal_unseal_roundtrip() {
        let ta = generate_keypair();
        let blob = seal_record(&record(), &ta.public).unwrap();
        let opened = unseal_record(&blob, &ta.private).unwrap();
        assert_eq!(opened, record());
    }

    #[test]
    fn only_ta_key_opens_record() {
        let ta = keypair_from_seed(&[1u8; 32]);
        let other = keypair_from_seed(&[2u8; 32]);

        let blob = seal_record(&record(), &ta.public).unwrap();
        assert!(unseal_record(&blob, &other.private).is_err());
    }
}
