use thiserror::Error;

use super::block::BlockRegion;
use super::boundary::{finalize, initial_hash, seed_lanes};
use super::memory::MemoryLayout;
use super::params::{ConfigError, EngineConfig, MIN_SALT_LEN, TAG_LENGTH};
use crate::codec::{self, CodecError, Header};

/// Reasons the engine refuses a parameter block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Argon2Error {
    #[error("invalid engine configuration: {0}")]
    InvalidParams(#[from] ConfigError),

    #[error("malformed parameter block: {0}")]
    Codec(#[from] CodecError),

    /// The parameter block length points past the working region.
    #[error("parameter block of {len} bytes exceeds the {available}-byte region")]
    BlockOutOfRegion { len: usize, available: usize },

    /// A header word differs from the engine's compiled-in configuration.
    #[error("header word {field} is {actual}, engine expects {expected}")]
    HeaderMismatch {
        field: &'static str,
        expected: u32,
        actual: u32,
    },

    /// Salt must be at least 8 bytes.
    #[error("salt of {0} bytes is shorter than 8")]
    InvalidSalt(usize),

    #[error("working region of {available} bytes cannot hold {needed} bytes of blocks")]
    RegionTooSmall { needed: usize, available: usize },
}

/// Runs Argon2 over a working region that starts with a parameter block.
///
/// `region` is the engine memory from the base offset onwards and its first
/// `block_len` bytes hold the parameter block. The block is validated
/// against `config` (every header word must match, salt must be at least 8
/// bytes, and the four fields must end exactly at `block_len`), then the
/// region is used as Argon2 block memory. On success the tag occupies the
/// first [`TAG_LENGTH`] bytes of the region.
///
/// Intermediate blocks are left in the region; wiping it is the caller's
/// responsibility.
pub fn hash_region(
    region: &mut [u8],
    block_len: usize,
    config: &EngineConfig,
) -> Result<(), Argon2Error> {
    config.validate()?;

    let available = region.len();
    let block = region
        .get(..block_len)
        .ok_or(Argon2Error::BlockOutOfRegion {
            len: block_len,
            available,
        })?;

    let decoded = codec::decode(block)?;

    if let Some((field, expected, actual)) = decoded.header.mismatch(&Header::for_config(config)) {
        return Err(Argon2Error::HeaderMismatch {
            field,
            expected,
            actual,
        });
    }

    if decoded.salt.len() < MIN_SALT_LEN {
        return Err(Argon2Error::InvalidSalt(decoded.salt.len()));
    }

    let layout = MemoryLayout::new(config);
    let needed = layout.bytes_needed();
    if needed > available {
        return Err(Argon2Error::RegionTooSmall { needed, available });
    }

    let h0 = initial_hash(block);

    let mut blocks = BlockRegion::new(&mut region[..needed]);
    seed_lanes(&mut blocks, &layout, &h0);
    layout.fill(&mut blocks, config.iterations, config.variant);

    let mut tag = [0u8; TAG_LENGTH as usize];
    finalize(&blocks, &layout, &mut tag);
    region[..tag.len()].copy_from_slice(&tag);
    tag.iter_mut().for_each(|b| *b = 0);

    Ok(())
}
