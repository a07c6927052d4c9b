//! Engine configuration for Argon2.
//!
//! The native engine is "compiled" with one [`EngineConfig`]: every parameter
//! block it receives must carry exactly these header words, mirroring a
//! precompiled engine whose parameters are fixed at build time. The same
//! configuration is used host-side to encode parameter blocks and size the
//! working region that is zeroed after each call.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Argon2 version 1.3.
pub const VERSION: u32 = 0x13;

/// Length of the output tag in bytes.
pub const TAG_LENGTH: u32 = 32;

/// Minimum accepted salt length in bytes.
pub const MIN_SALT_LEN: usize = 8;

/// Size of one Argon2 memory block in bytes.
pub const BLOCK_SIZE: usize = 1024;

/// Largest accepted number of lanes (RFC 9106: 2^24 - 1).
pub const MAX_LANES: u32 = 0x00FF_FFFF;

/// Largest accepted memory size in KiB (2 GiB).
pub const MAX_MEMORY_KIB: u32 = 2 * 1024 * 1024;

/// Number of slices (synchronization points) per pass.
pub(crate) const SYNC_POINTS: u32 = 4;

/// Argon2 variant, encoded as the `y` word of the parameter block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u32)]
pub enum Variant {
    /// Data-dependent addressing throughout.
    D = 0,
    /// Data-independent addressing throughout.
    I = 1,
    /// Data-independent for the first half of the first pass.
    Id = 2,
}

impl Variant {
    pub fn as_word(self) -> u32 {
        self as u32
    }

    pub fn from_word(word: u32) -> Option<Self> {
        match word {
            0 => Some(Variant::D),
            1 => Some(Variant::I),
            2 => Some(Variant::Id),
            _ => None,
        }
    }

    /// Whether block references are derived from address blocks rather
    /// than from the previous block's contents.
    pub(crate) fn data_independent(self, pass: u32, slice: u32) -> bool {
        match self {
            Variant::D => false,
            Variant::I => true,
            Variant::Id => pass == 0 && slice < SYNC_POINTS / 2,
        }
    }
}

/// Fixed engine parameters.
///
/// # Defaults
///
/// - `parallelism`: 1 lane
/// - `memory_kib`: 65536 (64 MiB)
/// - `iterations`: 4 passes
/// - `variant`: Argon2d
///
/// Tag length ([`TAG_LENGTH`]) and version ([`VERSION`]) are not
/// configurable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of lanes (at most [`MAX_LANES`]). Lanes are filled one after another; no threads are
    /// spawned for them.
    pub parallelism: u32,
    /// Memory size in KiB (minimum 8 × lanes, maximum [`MAX_MEMORY_KIB`]).
    pub memory_kib: u32,
    /// Number of passes over memory (minimum 1).
    pub iterations: u32,
    pub variant: Variant,
}

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("parallelism must be at least 1")]
    TooFewLanes,
    #[error("parallelism must be at most {}, got {lanes}", MAX_LANES)]
    TooManyLanes { lanes: u32 },
    #[error("iterations must be at least 1")]
    TooFewPasses,
    #[error("memory must be at least 8 KiB per lane, got {memory_kib} KiB for {lanes} lanes")]
    MemoryTooSmall { memory_kib: u32, lanes: u32 },
    #[error("memory must be at most {} KiB, got {memory_kib} KiB", MAX_MEMORY_KIB)]
    MemoryTooLarge { memory_kib: u32 },
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.parallelism < 1 {
            return Err(ConfigError::TooFewLanes);
        }

        if self.parallelism > MAX_LANES {
            return Err(ConfigError::TooManyLanes {
                lanes: self.parallelism,
            });
        }

        if self.iterations < 1 {
            return Err(ConfigError::TooFewPasses);
        }

        if self.memory_kib < 8u32.saturating_mul(self.parallelism) {
            return Err(ConfigError::MemoryTooSmall {
                memory_kib: self.memory_kib,
                lanes: self.parallelism,
            });
        }

        if self.memory_kib > MAX_MEMORY_KIB {
            return Err(ConfigError::MemoryTooLarge {
                memory_kib: self.memory_kib,
            });
        }

        Ok(())
    }

    /// Size in bytes of the working region starting at the engine base.
    ///
    /// This is the span zeroed after every invocation.
    pub fn region_len(&self) -> usize {
        BLOCK_SIZE * self.memory_kib as usize
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallelism: 1,
            memory_kib: 64 * 1024,
            iterations: 4,
            variant: Variant::D,
        }
    }
}
