//! The serializable container: tree shape, leaf symbols and message bits.

use crate::bit::Bit;
use crate::error::ContainerError;
use std::fmt;

/// Largest leaf count whose biased value (`L - 1`) still fits in one byte.
pub const MAX_LEAVES: usize = 256;

/// A Huffman-coded message together with the tree needed to decode it.
///
/// The writer borrows this read-only, so a container can be written any
/// number of times.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedData {
    /// One bit per node of a full binary tree (`2 * leaves - 1` bits)
    pub tree_shape: Vec<Bit>,

    /// Leaf symbols in traversal order
    pub tree_leaves: Vec<u8>,

    /// Encoded payload, any length
    pub message_bits: Vec<Bit>,
}

impl EncodedData {
    /// Create a container from its three parts without validating it.
    pub fn new(tree_shape: Vec<Bit>, tree_leaves: Vec<u8>, message_bits: Vec<Bit>) -> Self {
        Self {
            tree_shape,
            tree_leaves,
            message_bits,
        }
    }

    /// Number of distinct leaf symbols.
    pub fn leaf_count(&self) -> usize {
        self.tree_leaves.len()
    }

    /// Tree shape plus message bit count.
    pub fn total_bits(&self) -> usize {
        self.tree_shape.len() + self.message_bits.len()
    }

    /// Check the structural invariants that every writable container obeys.
    ///
    /// # Errors
    /// - `ContainerError::TooFewLeaves` if fewer than two leaves
    /// - `ContainerError::TooManyLeaves` if more than 256 leaves
    /// - `ContainerError::TreeShapeMismatch` if the shape is not `2L - 1` bits
    pub fn validate(&self) -> Result<(), ContainerError> {
        let leaves = self.leaf_count();
        if leaves < 2 {
            return Err(ContainerError::TooFewLeaves { count: leaves });
        }
        if leaves > MAX_LEAVES {
            return Err(ContainerError::TooManyLeaves { count: leaves });
        }

        let expected = tree_bits_for(leaves);
        if self.tree_shape.len() != expected {
            return Err(ContainerError::TreeShapeMismatch {
                leaves,
                expected,
                actual: self.tree_shape.len(),
            });
        }
        Ok(())
    }
}

/// Number of nodes, and so tree-shape bits, in a full binary tree with `leaves` leaves.
#[inline]
pub fn tree_bits_for(leaves: usize) -> usize {
    (2 * leaves).saturating_sub(1)
}

fn write_bits(f: &mut fmt::Formatter<'_>, bits: &[Bit]) -> fmt::Result {
    f.write_str("{")?;
    for (i, bit) in bits.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{bit}")?;
    }
    f.write_str("}")
}

/// Debug rendering: `{treeShape:{1, 0, 0}, treeLeaves:{'A', 'B'}, messageBits:{...}}`.
impl fmt::Display for EncodedData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{treeShape:")?;
        write_bits(f, &self.tree_shape)?;

        f.write_str(", treeLeaves:{")?;
        for (i, &leaf) in self.tree_leaves.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if leaf.is_ascii_graphic() || leaf == b' ' {
                write!(f, "'{}'", leaf as char)?;
            } else {
                write!(f, "\\x{leaf:02x}")?;
            }
        }
        f.write_str("}")?;

        f.write_str(", messageBits:")?;
        write_bits(f, &self.message_bits)?;
        f.write_str("}")
    }
}
