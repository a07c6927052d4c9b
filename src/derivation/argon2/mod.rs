//! Argon2 memory-hard hashing (RFC 9106), run in place.
//!
//! Argon2 fills a large memory area with blocks that depend on each other,
//! making the hash expensive to compute with less memory than configured.
//! This implementation is the computation behind the native engine: it
//! works directly inside the engine's working region, reading its inputs
//! from the parameter block placed there and writing the tag back to the
//! start of the region.
//!
//! # Algorithm Overview
//!
//! 1. **Initialization**: H0 = BLAKE2b-512 of the parameter block.
//! 2. **Lane initialization**: the first two blocks of each lane are
//!    expanded from H0 with H' (variable-length BLAKE2b).
//! 3. **Memory filling**: every other block is G(previous, reference),
//!    XORed into the existing block on later passes.
//! 4. **Finalization**: the last block of each lane is XORed together and
//!    hashed with H' into the tag.
//!
//! # Variants
//!
//! - **Argon2d** (`y = 0`): reference blocks chosen from the previous
//!   block's contents. This is the default.
//! - **Argon2i** (`y = 1`): reference blocks chosen from address blocks
//!   derived from a counter, independently of the data.
//! - **Argon2id** (`y = 2`): Argon2i addressing for the first two slices
//!   of the first pass, Argon2d afterwards.

pub(crate) mod block;
pub(crate) mod boundary;
pub mod core;
pub(crate) mod memory;
pub mod params;

pub use self::core::{Argon2Error, hash_region};
pub use self::params::{
    BLOCK_SIZE, ConfigError, EngineConfig, MAX_LANES, MAX_MEMORY_KIB, MIN_SALT_LEN, TAG_LENGTH,
    VERSION, Variant,
};
