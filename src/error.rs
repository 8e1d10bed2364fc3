//! Error taxonomy for the arithmetization layer.
//!
//! Commitment verification is deliberately absent here: `SaltedMerkleTree::verify`
//! returns a plain boolean, so adversarial inputs cannot distinguish failure
//! reasons. Internal invariant violations (such as a wrong base constraint
//! count) are asserts, not errors.

pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// The base trace has no rows.
    #[error("execution trace is empty")]
    EmptyTrace,

    /// A base trace row does not have the processor table width.
    #[error("row {row} has width {got}, expected {expected}")]
    RowWidth {
        row: usize,
        got: usize,
        expected: usize,
    },

    /// A Merkle opening was requested for a leaf that does not exist.
    #[error("leaf index {index} out of range for tree with {leaves} leaves")]
    IndexOutOfRange { index: usize, leaves: usize },
}
