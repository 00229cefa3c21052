//! Sample container generation.
//!
//! Produces random but structurally valid containers so the codec can be
//! exercised without a Huffman encoder in front of it.
//!
//! # Design
//!
//! Generated containers have:
//! - Distinct leaf symbols drawn from the full byte range
//! - A random full binary tree shape in preorder (1 = internal, 0 = leaf)
//! - A random message of the requested length
//!
//! The same seed always yields the same container.

use huffpack_core::{Bit, EncodedData};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Generate a valid container.
///
/// # Arguments
/// - `seed`: random seed for determinism
/// - `leaf_count`: number of distinct leaves (clamped to 2..=256)
/// - `message_bits`: length of the random message
pub fn generate_container(seed: u64, leaf_count: usize, message_bits: usize) -> EncodedData {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let leaf_count = leaf_count.clamp(2, 256);

    let mut leaves: Vec<u8> = (0..=255u8).collect();
    leaves.shuffle(&mut rng);
    leaves.truncate(leaf_count);

    let mut tree_shape = Vec::with_capacity(2 * leaf_count - 1);
    push_subtree(&mut rng, leaf_count, &mut tree_shape);

    let message = (0..message_bits)
        .map(|_| Bit::from(rng.gen::<bool>()))
        .collect();

    EncodedData::new(tree_shape, leaves, message)
}

/// Append the preorder shape of a random full binary tree with `leaves` leaves.
fn push_subtree(rng: &mut ChaCha8Rng, leaves: usize, shape: &mut Vec<Bit>) {
    if leaves == 1 {
        shape.push(Bit::ZERO);
        return;
    }

    shape.push(Bit::ONE);
    let left = rng.gen_range(1..leaves);
    push_subtree(rng, left, shape);
    push_subtree(rng, leaves - left, shape);
}
