//! Block operations for Argon2.
//!
//! This module defines the fundamental 1024-byte block structure and the
//! compression function G that forms the core of the Argon2 algorithm.
//! The compression function is based on the BLAKE2b round function but
//! uses additional multiplication operations for enhanced diffusion.
//!
//! Blocks are not stored as `Block` values: they live as raw bytes inside
//! the engine's working region and are loaded/stored around each
//! compression (see [`BlockRegion`]).

use core::array;

use super::params::{BLOCK_SIZE, Variant};

const WORDS: usize = BLOCK_SIZE / 8;

/// A 1024-byte memory block (128 × 64-bit words).
///
/// Each block is zeroed on drop.
#[derive(Debug, Clone)]
pub(crate) struct Block(pub(crate) [u64; WORDS]);

impl Block {
    pub(crate) const ZERO: Self = Self([0u64; WORDS]);

    pub(crate) fn xor_assign(&mut self, other: &Block) {
        self.0
            .iter_mut()
            .zip(other.0.iter())
            .for_each(|(a, b)| *a ^= b);
    }

    pub(crate) fn load(bytes: &[u8]) -> Self {
        let mut block = Block::ZERO;
        for (word, chunk) in block.0.iter_mut().zip(bytes.chunks_exact(8)) {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(chunk);
            *word = u64::from_le_bytes(raw);
        }
        block
    }

    pub(crate) fn store(&self, out: &mut [u8]) {
        for (chunk, word) in out.chunks_exact_mut(8).zip(self.0.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
    }

    /// Compression function G (RFC 9106 §3.5).
    ///
    /// Computes G(X, Y) = P(P(X ⊕ Y)) ⊕ X ⊕ Y, where P is applied first
    /// to the eight rows of 16 consecutive words, then to the eight columns
    /// made of interleaved word pairs.
    pub(crate) fn compress(x: &Self, y: &Self) -> Self {
        let mut r = x.clone();
        r.xor_assign(y);

        let mut z = r.clone();

        for row in 0..8 {
            let lanes: [usize; 16] = array::from_fn(|k| 16 * row + k);
            z.permute(&lanes);
        }

        for col in 0..8 {
            let lanes: [usize; 16] = array::from_fn(|k| 2 * col + 16 * (k / 2) + k % 2);
            z.permute(&lanes);
        }

        z.xor_assign(&r);
        z
    }

    fn permute(&mut self, idx: &[usize; 16]) {
        let mut v: [u64; 16] = array::from_fn(|k| self.0[idx[k]]);
        permute_p(&mut v);
        for (k, &i) in idx.iter().enumerate() {
            self.0[i] = v[k];
        }
    }

    /// Generates an address block for data-independent indexing.
    ///
    /// The address block is G(0, G(0, Z)) where Z holds the position,
    /// the memory and pass counts, the variant and a running counter.
    pub(crate) fn address_block(
        pass: u32,
        lane: u32,
        slice: u32,
        total_blocks: u32,
        passes: u32,
        variant: Variant,
        counter: u32,
    ) -> Self {
        let mut input = Block::ZERO;
        input.0[0] = pass as u64;
        input.0[1] = lane as u64;
        input.0[2] = slice as u64;
        input.0[3] = total_blocks as u64;
        input.0[4] = passes as u64;
        input.0[5] = variant.as_word() as u64;
        input.0[6] = counter as u64;

        let tmp = Block::compress(&Block::ZERO, &input);
        Block::compress(&Block::ZERO, &tmp)
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        self.0.iter_mut().for_each(|v| *v = 0);
    }
}

/// The working region viewed as a matrix of 1024-byte blocks.
pub(crate) struct BlockRegion<'a> {
    bytes: &'a mut [u8],
}

impl<'a> BlockRegion<'a> {
    pub(crate) fn new(bytes: &'a mut [u8]) -> Self {
        Self { bytes }
    }

    fn span(index: usize) -> core::ops::Range<usize> {
        index * BLOCK_SIZE..(index + 1) * BLOCK_SIZE
    }

    pub(crate) fn load(&self, index: usize) -> Block {
        Block::load(&self.bytes[Self::span(index)])
    }

    pub(crate) fn store(&mut self, index: usize, block: &Block) {
        block.store(&mut self.bytes[Self::span(index)]);
    }

    /// Stores `existing ⊕ block` (version 1.3 behaviour on later passes).
    pub(crate) fn xor_store(&mut self, index: usize, block: &Block) {
        let mut merged = self.load(index);
        merged.xor_assign(block);
        self.store(index, &merged);
    }
}

/// Multiply-add used by Argon2's GB: `x + y + 2 · lo32(x) · lo32(y)`.
#[inline(always)]
fn fblamka(x: u64, y: u64) -> u64 {
    let lo = (x as u32 as u64).wrapping_mul(y as u32 as u64);
    x.wrapping_add(y).wrapping_add(lo.wrapping_mul(2))
}

/// GB mixing function (Argon2 variant of BLAKE2b's G), with rotations
/// 32, 24, 16 and 63.
#[inline(always)]
fn gb(v: &mut [u64; 16], a: usize, b: usize, c: usize, d: usize) {
    v[a] = fblamka(v[a], v[b]);
    v[d] = (v[d] ^ v[a]).rotate_right(32);
    v[c] = fblamka(v[c], v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(24);
    v[a] = fblamka(v[a], v[b]);
    v[d] = (v[d] ^ v[a]).rotate_right(16);
    v[c] = fblamka(v[c], v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(63);
}

/// P permutation: GB over the columns, then over the diagonals, of a 4×4
/// matrix of words.
#[inline(always)]
fn permute_p(v: &mut [u64; 16]) {
    gb(v, 0, 4, 8, 12);
    gb(v, 1, 5, 9, 13);
    gb(v, 2, 6, 10, 14);
    gb(v, 3, 7, 11, 15);

    gb(v, 0, 5, 10, 15);
    gb(v, 1, 6, 11, 12);
    gb(v, 2, 7, 8, 13);
    gb(v, 3, 4, 9, 14);
}
