//! BLAKE2b hashing state and the H' variable-length construction.

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::computations::compress;
use super::{BLOCK_LEN, IV, MAX_OUT_LEN};

/// Incremental BLAKE2b state.
///
/// Input may be fed in any number of [`update`](Blake2b::update) calls; the
/// final block is only compressed by [`finalize_into`](Blake2b::finalize_into),
/// so the state never needs to know the total length up front.
///
/// The chaining value and buffered input are wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Blake2b {
    h: [u64; 8],
    buf: [u8; BLOCK_LEN],
    buf_len: usize,
    counter: u128,
    out_len: usize,
}

impl Blake2b {
    /// Creates an unkeyed state producing `out_len` bytes (1..=64).
    pub fn new(out_len: usize) -> Self {
        debug_assert!((1..=MAX_OUT_LEN).contains(&out_len));

        let mut h = IV;
        h[0] ^= 0x0101_0000 ^ out_len as u64;

        Self {
            h,
            buf: [0u8; BLOCK_LEN],
            buf_len: 0,
            counter: 0,
            out_len,
        }
    }

    pub fn update(&mut self, mut input: &[u8]) {
        while !input.is_empty() {
            if self.buf_len == BLOCK_LEN {
                self.counter += BLOCK_LEN as u128;
                compress(&mut self.h, &self.buf, self.counter, false);
                self.buf_len = 0;
            }

            let take = (BLOCK_LEN - self.buf_len).min(input.len());
            self.buf[self.buf_len..self.buf_len + take].copy_from_slice(&input[..take]);
            self.buf_len += take;
            input = &input[take..];
        }
    }

    /// Writes the digest into `out`, which must be exactly `out_len` bytes.
    pub fn finalize_into(mut self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), self.out_len);

        self.counter += self.buf_len as u128;
        self.buf[self.buf_len..].fill(0);
        compress(&mut self.h, &self.buf, self.counter, true);

        let mut full = [0u8; MAX_OUT_LEN];
        for (chunk, word) in full.chunks_exact_mut(8).zip(self.h.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        out.copy_from_slice(&full[..self.out_len]);
        full.zeroize();
    }
}

/// One-shot BLAKE2b with a 1..=64 byte digest.
pub fn blake2b(out_len: usize, input: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; out_len];
    let mut state = Blake2b::new(out_len);
    state.update(input);
    state.finalize_into(&mut out);
    out
}

/// Variable-length hash function H' (RFC 9106 §3.3).
///
/// Fills `out` with `H'^T(parts[0] || parts[1] || ...)` where `T` is
/// `out.len()`. Digests of up to 64 bytes are a single BLAKE2b call over
/// `LE32(T) || X`; longer outputs chain 64-byte digests and keep the first
/// half of each.
pub fn blake2b_long(out: &mut [u8], parts: &[&[u8]]) {
    let tag_len = out.len();
    let prefix = (tag_len as u32).to_le_bytes();

    if tag_len <= MAX_OUT_LEN {
        let mut state = Blake2b::new(tag_len);
        state.update(&prefix);
        parts.iter().for_each(|p| state.update(p));
        state.finalize_into(out);
        return;
    }

    let mut v = [0u8; MAX_OUT_LEN];
    let mut state = Blake2b::new(MAX_OUT_LEN);
    state.update(&prefix);
    parts.iter().for_each(|p| state.update(p));
    state.finalize_into(&mut v);

    out[..32].copy_from_slice(&v[..32]);
    let mut pos = 32;

    while tag_len - pos > MAX_OUT_LEN {
        let mut state = Blake2b::new(MAX_OUT_LEN);
        state.update(&v);
        state.finalize_into(&mut v);

        out[pos..pos + 32].copy_from_slice(&v[..32]);
        pos += 32;
    }

    let mut state = Blake2b::new(tag_len - pos);
    state.update(&v);
    state.finalize_into(&mut out[pos..]);
    v.zeroize();
}
