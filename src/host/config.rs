use serde::{Deserialize, Serialize};

use crate::derivation::argon2::EngineConfig;
use crate::engine::{Engine, EngineLoader, EngineSource, LoadError};

/// Configuration of a [`Hasher`](super::Hasher).
///
/// Deserializes from any serde format; missing fields take their defaults:
///
/// ```json
/// {
///   "engine": { "parallelism": 1, "memory_kib": 65536, "iterations": 4, "variant": "d" },
///   "source": { "wasm": { "sibling": "dist/hasher.min.js" } }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HasherConfig {
    pub engine: EngineConfig,
    pub source: EngineSource,
}

impl EngineLoader for HasherConfig {
    fn load(&self) -> Result<Box<dyn Engine>, LoadError> {
        self.source.load(&self.engine)
    }
}
