//! Salted Merkle commitment over serialized trace rows.
//!
//! Every leaf digest mixes in a fresh random salt, so the commitment hides
//! low-entropy leaf payloads in addition to binding them. The tree is built
//! once over an immutable leaf sequence; any change to the leaves requires a
//! rebuild.

use rand::{RngCore, thread_rng};

use crate::digest_sha2;
use crate::error::{Error, Result};

/// Salt length in bytes, fixed for every leaf.
pub const SALT_LEN: usize = 32;

#[derive(Debug)]
pub struct SaltedMerkleTree {
    /// One salt per leaf, in leaf order.
    salts: Vec<[u8; SALT_LEN]>,
    /// Digests by level: `levels[0]` are the salted leaf digests, the last
    /// level holds the single root digest.
    levels: Vec<Vec<[u8; 32]>>,
}

impl SaltedMerkleTree {
    /// Commits to an ordered sequence of leaf payloads.
    ///
    /// The leaf count must be a power of two (at least one); anything else is
    /// a caller bug. Salts come from the thread-local CSPRNG, so two trees
    /// over identical leaves have unrelated digests.
    pub fn new(leaves: &[Vec<u8>]) -> Self {
        assert!(
            !leaves.is_empty() && leaves.len().is_power_of_two(),
            "leaf count must be a power of two, got {}",
            leaves.len()
        );

        let mut rng = thread_rng();
        let mut salts = Vec::with_capacity(leaves.len());
        let mut current: Vec<[u8; 32]> = Vec::with_capacity(leaves.len());
        for leaf in leaves {
            let mut salt = [0u8; SALT_LEN];
            rng.fill_bytes(&mut salt);
            current.push(leaf_digest(&salt, leaf));
            salts.push(salt);
        }

        let mut levels = vec![current];
        while levels[levels.len() - 1].len() > 1 {
            let level = &levels[levels.len() - 1];
            let mut next_level = Vec::with_capacity(level.len() / 2);
            for pair in level.chunks(2) {
                next_level.push(node_digest(&pair[0], &pair[1]));
            }
            levels.push(next_level);
        }

        tracing::debug!(
            leaves = leaves.len(),
            depth = levels.len() - 1,
            "built salted merkle tree"
        );

        Self { salts, levels }
    }

    /// Number of committed leaves.
    pub fn num_leaves(&self) -> usize {
        self.levels[0].len()
    }

    /// The root digest.
    pub fn root(&self) -> [u8; 32] {
        self.levels[self.levels.len() - 1][0]
    }

    /// Opens one leaf: its salt plus the sibling digests from leaf level to
    /// root level.
    pub fn open(&self, index: usize) -> Result<([u8; SALT_LEN], Vec<[u8; 32]>)> {
        let leaves = self.num_leaves();
        if index >= leaves {
            return Err(Error::IndexOutOfRange { index, leaves });
        }

        let mut path = Vec::with_capacity(self.levels.len() - 1);
        let mut node = index;
        for level in &self.levels[..self.levels.len() - 1] {
            path.push(level[node ^ 1]);
            node /= 2;
        }

        Ok((self.salts[index], path))
    }

    /// Checks an opening against a root.
    ///
    /// Total and side-effect-free: every failure mode, from a wrong payload to
    /// a corrupted path entry, collapses into `false`.
    pub fn verify(
        root: [u8; 32],
        index: usize,
        salt: [u8; SALT_LEN],
        path: &[[u8; 32]],
        payload: &[u8],
    ) -> bool {
        let mut digest = leaf_digest(&salt, payload);
        let mut node = index;
        for sibling in path {
            digest = if node % 2 == 0 {
                node_digest(&digest, sibling)
            } else {
                node_digest(sibling, &digest)
            };
            node /= 2;
        }
        digest == root
    }
}

fn leaf_digest(salt: &[u8; SALT_LEN], payload: &[u8]) -> [u8; 32] {
    let mut combined = Vec::with_capacity(SALT_LEN + payload.len());
    combined.extend_from_slice(salt);
    combined.extend_from_slice(payload);
    digest_sha2(&combined)
}

fn node_digest(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut combined = [0u8; 64];
    combined[..32].copy_from_slice(left);
    combined[32..].copy_from_slice(right);
    digest_sha2(&combined)
}
