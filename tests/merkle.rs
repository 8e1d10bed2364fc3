//! Mutation matrix for the salted Merkle commitment: honest openings verify,
//! and every class of corrupted opening material fails, across all indices of
//! a 64-leaf tree with random-length random payloads.

use rand::{Rng, RngCore, thread_rng};
use trace_air::merkle::{SALT_LEN, SaltedMerkleTree};

const N: usize = 64;

fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    thread_rng().fill_bytes(&mut bytes);
    bytes
}

fn random_leaves() -> Vec<Vec<u8>> {
    let mut rng = thread_rng();
    // lengths vary; a floor of 8 bytes keeps accidental duplicate leaves out
    (0..N).map(|_| random_bytes(rng.gen_range(8..256))).collect()
}

fn random_digest() -> [u8; 32] {
    let mut digest = [0u8; 32];
    thread_rng().fill_bytes(&mut digest);
    digest
}

fn other_index(i: usize) -> usize {
    (i + 1 + thread_rng().gen_range(0..N - 1)) % N
}

#[test]
fn honest_openings_verify() {
    let leaves = random_leaves();
    let tree = SaltedMerkleTree::new(&leaves);
    let root = tree.root();
    for (i, leaf) in leaves.iter().enumerate() {
        let (salt, path) = tree.open(i).unwrap();
        assert_eq!(path.len(), 6);
        assert!(SaltedMerkleTree::verify(root, i, salt, &path, leaf));
    }
}

#[test]
fn unrelated_payload_fails() {
    let leaves = random_leaves();
    let tree = SaltedMerkleTree::new(&leaves);
    let root = tree.root();
    for i in 0..N {
        let (salt, path) = tree.open(i).unwrap();
        assert!(!SaltedMerkleTree::verify(
            root,
            i,
            salt,
            &path,
            &random_bytes(51)
        ));
    }
}

#[test]
fn swapped_leaf_fails() {
    let leaves = random_leaves();
    let tree = SaltedMerkleTree::new(&leaves);
    let root = tree.root();
    for i in 0..N {
        let (salt, path) = tree.open(i).unwrap();
        assert!(!SaltedMerkleTree::verify(
            root,
            i,
            salt,
            &path,
            &leaves[other_index(i)]
        ));
    }
}

#[test]
fn swapped_index_fails() {
    let leaves = random_leaves();
    let tree = SaltedMerkleTree::new(&leaves);
    let root = tree.root();
    for i in 0..N {
        let (salt, path) = tree.open(i).unwrap();
        assert!(!SaltedMerkleTree::verify(
            root,
            other_index(i),
            salt,
            &path,
            &leaves[i]
        ));
    }
}

#[test]
fn false_root_fails() {
    let leaves = random_leaves();
    let tree = SaltedMerkleTree::new(&leaves);
    for (i, leaf) in leaves.iter().enumerate() {
        let (salt, path) = tree.open(i).unwrap();
        assert!(!SaltedMerkleTree::verify(
            random_digest(),
            i,
            salt,
            &path,
            leaf
        ));
    }
}

#[test]
fn corrupted_path_entry_fails() {
    let leaves = random_leaves();
    let tree = SaltedMerkleTree::new(&leaves);
    let root = tree.root();
    for (i, leaf) in leaves.iter().enumerate() {
        let (salt, path) = tree.open(i).unwrap();
        for j in 0..path.len() {
            let mut fake_path = path.clone();
            fake_path[j] = random_digest();
            assert!(!SaltedMerkleTree::verify(root, i, salt, &fake_path, leaf));
        }
    }
}

#[test]
fn false_salt_fails() {
    let leaves = random_leaves();
    let tree = SaltedMerkleTree::new(&leaves);
    let root = tree.root();
    for (i, leaf) in leaves.iter().enumerate() {
        let (_, path) = tree.open(i).unwrap();
        let mut fake_salt = [0u8; SALT_LEN];
        thread_rng().fill_bytes(&mut fake_salt);
        assert!(!SaltedMerkleTree::verify(root, i, fake_salt, &path, leaf));
    }
}

#[test]
fn single_leaf_tree() {
    let leaf = random_bytes(17);
    let tree = SaltedMerkleTree::new(std::slice::from_ref(&leaf));
    let (salt, path) = tree.open(0).unwrap();
    // with one leaf the root is the salted leaf digest itself
    assert!(path.is_empty());
    assert!(SaltedMerkleTree::verify(tree.root(), 0, salt, &path, &leaf));
}
