use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

use super::sanitizer::WorkingRegion;
use crate::channel::{Digest, HashRequest};
use crate::codec::{self, CodecError, Header};
use crate::derivation::argon2::EngineConfig;
use crate::engine::{Engine, EngineError};

/// Why a single request produced no digest.
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("working region of {len} bytes at offset {base} exceeds engine memory of {memory} bytes")]
    RegionOutOfBounds {
        base: usize,
        len: usize,
        memory: usize,
    },

    #[error("could not encode parameter block: {0}")]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("engine panicked")]
    Panicked,

    #[error("engine reported failure")]
    Rejected,
}

/// Runs requests through a loaded engine.
pub struct Invoker {
    engine: Box<dyn Engine>,
    config: EngineConfig,
    header: Header,
}

impl Invoker {
    pub fn new(engine: Box<dyn Engine>, config: EngineConfig) -> Self {
        Self {
            engine,
            header: Header::for_config(&config),
            config,
        }
    }

    pub fn engine(&self) -> &dyn Engine {
        self.engine.as_ref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Encodes the request at the engine base, invokes the engine and
    /// copies the digest out.
    ///
    /// The working region is zeroed before this returns on every path.
    pub fn invoke(&mut self, request: &HashRequest) -> Result<Digest, ComputeError> {
        let mut region = WorkingRegion::acquire(self.engine.as_mut(), self.config.region_len())?;

        let len = codec::encode(region.bytes_mut(), &self.header, &request.fields())?;

        let status = panic::catch_unwind(AssertUnwindSafe(|| region.engine_mut().invoke(len)))
            .map_err(|_| ComputeError::Panicked)??;

        if status == 0 {
            return Err(ComputeError::Rejected);
        }

        let mut digest = Digest::default();
        let n = digest.len();
        digest.copy_from_slice(&region.bytes()[..n]);
        Ok(digest)
    }
}
