//! Memory organization and filling algorithm for Argon2.
//!
//! Memory is organized as a matrix of lanes (rows) and columns, with each
//! cell containing a 1024-byte block. Lanes are filled one after another
//! within each slice.

use super::block::{Block, BlockRegion};
use super::params::{BLOCK_SIZE, EngineConfig, SYNC_POINTS, Variant};

/// Number of 64-bit reference pairs held by one address block.
const ADDRESSES_PER_BLOCK: u32 = 128;

/// Memory layout parameters for Argon2.
///
/// - Total memory is `m' = 4p · ⌊m / 4p⌋` blocks, divided into `lanes`
///   rows of `lane_len` blocks.
/// - Each lane is divided into 4 slices of `segment_len` blocks.
#[derive(Debug, Clone)]
pub(crate) struct MemoryLayout {
    pub lanes: u32,
    pub lane_len: u32,
    pub segment_len: u32,
    pub total_blocks: u32,
}

/// Position of the segment being filled.
#[derive(Debug, Clone, Copy)]
struct Position {
    pass: u32,
    slice: u32,
    lane: u32,
}

impl MemoryLayout {
    pub(crate) fn new(config: &EngineConfig) -> Self {
        let lanes = config.parallelism;
        let total_blocks = (config.memory_kib / (SYNC_POINTS * lanes)) * (SYNC_POINTS * lanes);
        let lane_len = total_blocks / lanes;
        let segment_len = lane_len / SYNC_POINTS;

        Self {
            lanes,
            lane_len,
            segment_len,
            total_blocks,
        }
    }

    /// Bytes of working region occupied by the block matrix.
    pub(crate) fn bytes_needed(&self) -> usize {
        self.total_blocks as usize * BLOCK_SIZE
    }

    #[inline]
    pub(crate) fn index(&self, lane: u32, index_in_lane: u32) -> usize {
        (lane * self.lane_len + index_in_lane) as usize
    }

    /// Fills all memory blocks over the specified number of passes.
    ///
    /// Slice boundaries act as synchronization points: a lane can only
    /// reference blocks of other lanes that belong to finished slices.
    pub(crate) fn fill(&self, region: &mut BlockRegion<'_>, passes: u32, variant: Variant) {
        for pass in 0..passes {
            for slice in 0..SYNC_POINTS {
                for lane in 0..self.lanes {
                    let pos = Position { pass, slice, lane };
                    self.fill_segment(region, pos, passes, variant);
                }
            }
        }
    }

    fn fill_segment(
        &self,
        region: &mut BlockRegion<'_>,
        pos: Position,
        passes: u32,
        variant: Variant,
    ) {
        let data_independent = variant.data_independent(pos.pass, pos.slice);

        let mut counter = 0u32;
        let mut addresses = Block::ZERO;
        let next_addresses = |counter: &mut u32| {
            *counter += 1;
            Block::address_block(
                pos.pass,
                pos.lane,
                pos.slice,
                self.total_blocks,
                passes,
                variant,
                *counter,
            )
        };

        if data_independent {
            addresses = next_addresses(&mut counter);
        }

        let start = if pos.pass == 0 && pos.slice == 0 { 2 } else { 0 };

        for i in start..self.segment_len {
            let index_in_lane = pos.slice * self.segment_len + i;
            let prev_idx = match index_in_lane {
                0 => self.lane_len - 1,
                n => n - 1,
            };

            let prev = region.load(self.index(pos.lane, prev_idx));

            let pseudo_rand = if data_independent {
                if i != 0 && i % ADDRESSES_PER_BLOCK == 0 {
                    addresses = next_addresses(&mut counter);
                }
                addresses.0[(i % ADDRESSES_PER_BLOCK) as usize]
            } else {
                prev.0[0]
            };

            let (ref_lane, ref_idx) = self.reference(pos, i, pseudo_rand);
            let reference = region.load(self.index(ref_lane, ref_idx));
            let next = Block::compress(&prev, &reference);

            let cur = self.index(pos.lane, index_in_lane);
            if pos.pass == 0 {
                region.store(cur, &next);
            } else {
                region.xor_store(cur, &next);
            }
        }
    }

    /// Maps the pseudo-random word `J1 || J2` to a reference block
    /// (RFC 9106 §3.4.1.3).
    ///
    /// J2 selects the lane (the current lane during the very first slice),
    /// J1 selects a block inside the reference area through the phi
    /// function, which biases toward recently written blocks.
    fn reference(&self, pos: Position, index_in_segment: u32, pseudo_rand: u64) -> (u32, u32) {
        let j1 = pseudo_rand as u32;
        let j2 = (pseudo_rand >> 32) as u32;

        let ref_lane = if pos.pass == 0 && pos.slice == 0 {
            pos.lane
        } else {
            j2 % self.lanes
        };

        let finished = if pos.pass == 0 {
            pos.slice * self.segment_len
        } else {
            self.lane_len - self.segment_len
        };

        let area = if ref_lane == pos.lane {
            (finished + index_in_segment).saturating_sub(1)
        } else if index_in_segment == 0 {
            finished.saturating_sub(1)
        } else {
            finished
        };

        if area == 0 {
            return (ref_lane, 0);
        }

        let area = area as u64;
        let x = (j1 as u64 * j1 as u64) >> 32;
        let relative = area - 1 - ((area * x) >> 32);

        let start = if pos.pass == 0 || pos.slice == SYNC_POINTS - 1 {
            0
        } else {
            (pos.slice + 1) * self.segment_len
        };

        let ref_idx = ((start as u64 + relative) % self.lane_len as u64) as u32;
        (ref_lane, ref_idx)
    }
}
