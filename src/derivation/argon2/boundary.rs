//! Initialization and finalization for Argon2.
//!
//! This module handles the boundary operations of the Argon2 algorithm:
//! computing the initial hash H0, seeding the first blocks of every lane,
//! and deriving the final tag from the filled memory.

use zeroize::Zeroizing;

use super::block::{Block, BlockRegion};
use super::memory::MemoryLayout;
use super::params::BLOCK_SIZE;
use crate::hash::{blake2b_long, Blake2b};

/// Computes the initial hash H0 from a raw parameter block.
///
/// RFC 9106 §3.2 defines H0 as
///
/// ```text
/// H0 = BLAKE2b(p || T || m || t || v || y || |P| || P || |S| || S || |K| || K || |X| || X)
/// ```
///
/// which is exactly the parameter block layout, so the block is hashed
/// without being re-assembled.
pub(crate) fn initial_hash(parameter_block: &[u8]) -> Zeroizing<[u8; 64]> {
    let mut h0 = Zeroizing::new([0u8; 64]);
    let mut state = Blake2b::new(64);
    state.update(parameter_block);
    state.finalize_into(&mut h0[..]);
    h0
}

/// Writes the first two blocks of each lane: `B[i][j] = H'^(1024)(H0 || j || i)`.
pub(crate) fn seed_lanes(region: &mut BlockRegion<'_>, layout: &MemoryLayout, h0: &[u8; 64]) {
    let mut bytes = Zeroizing::new([0u8; BLOCK_SIZE]);

    for lane in 0..layout.lanes {
        for column in 0..2u32 {
            let column_word = column.to_le_bytes();
            let lane_word = lane.to_le_bytes();
            blake2b_long(&mut bytes[..], &[&h0[..], &column_word[..], &lane_word[..]]);
            region.store(layout.index(lane, column), &Block::load(&bytes[..]));
        }
    }
}

/// XORs the last block of every lane and compresses it into `tag`.
///
/// All lanes contribute to the output, so no lane can be skipped.
pub(crate) fn finalize(region: &BlockRegion<'_>, layout: &MemoryLayout, tag: &mut [u8]) {
    let mut final_block = Block::ZERO;

    for lane in 0..layout.lanes {
        final_block.xor_assign(&region.load(layout.index(lane, layout.lane_len - 1)));
    }

    let mut bytes = Zeroizing::new([0u8; BLOCK_SIZE]);
    final_block.store(&mut bytes[..]);
    blake2b_long(tag, &[&bytes[..]]);
}
