//! In-process Argon2 engine.
//!
//! Behaves like a precompiled engine module: it owns a linear memory, places
//! its working region at a fixed base offset, accepts only parameter blocks
//! matching the configuration it was built with, and reports the outcome as
//! a 0/1 status instead of an error.

use tracing::debug;

use super::{Engine, EngineError};
use crate::derivation::argon2::{ConfigError, EngineConfig, hash_region};

/// Argon2 engine backed by a heap buffer of `BASE + 1024 × memory_kib` bytes.
pub struct NativeEngine {
    memory: Vec<u8>,
    config: EngineConfig,
}

impl NativeEngine {
    /// Base offset of the working region. The bytes below it stand in for
    /// the static data a compiled module keeps ahead of its block array and
    /// are never touched by hashing.
    pub const BASE: usize = 1024;

    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            memory: vec![0u8; Self::BASE + config.region_len()],
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl Engine for NativeEngine {
    fn base(&self) -> usize {
        Self::BASE
    }

    fn memory(&self) -> &[u8] {
        &self.memory
    }

    fn memory_mut(&mut self) -> &mut [u8] {
        &mut self.memory
    }

    fn invoke(&mut self, len: u32) -> Result<i32, EngineError> {
        let region = &mut self.memory[Self::BASE..];

        match hash_region(region, len as usize, &self.config) {
            Ok(()) => Ok(1),
            Err(e) => {
                debug!(error = %e, "native engine declined parameter block");
                Ok(0)
            }
        }
    }
}
