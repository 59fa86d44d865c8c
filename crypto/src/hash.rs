//! Blake2b digests for canonical payload construction.
//!
//! Canonical signing payloads hash their fields in sequence so that the
//! signature binds every field without an intermediate allocation.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

/// 256-bit Blake2b digest over a sequence of byte slices, hashed in order.
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// 256-bit Blake2b digest of a single buffer.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    blake2b_256_multi(&[data])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_hashes_the_concatenation() {
        assert_eq!(
            blake2b_256_multi(&[b"alice", b"|", b"bob"]),
            blake2b_256(b"alice|bob"),
        );
    }

    #[test]
    fn part_boundaries_do_not_matter_but_content_does() {
        let h1 = blake2b_256_multi(&[b"ab", b"c"]);
        let h2 = blake2b_256_multi(&[b"a", b"bc"]);
        assert_eq!(h1, h2);
        assert_ne!(h1, blake2b_256_multi(&[b"ab", b"d"]));
    }

    #[test]
    fn empty_input_digest_is_stable_and_nonzero() {
        let h = blake2b_256(b"");
        assert_eq!(h, blake2b_256(b""));
        assert_ne!(h, [0u8; 32]);
    }
}
