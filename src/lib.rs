//! Arithmetization core for a virtual machine's execution trace: extends the
//! base processor table with permutation and evaluation accumulators under
//! verifier challenges, emits the matching transition and boundary constraint
//! polynomials, and commits to serialized rows with a salted Merkle tree.
//!
//! Challenge sampling, low degree testing and proof orchestration live in the
//! outer protocol; this crate only covers the accumulator algebra, constraint
//! shapes and commitment mechanics.

use sha2::{Digest, Sha256};

pub mod error;
pub mod math;
pub mod merkle;
pub mod vm;

pub fn digest_sha2(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}
