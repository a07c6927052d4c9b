//! Where engines come from.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Engine, LoadError, NativeEngine, WasmEngine};
use crate::derivation::argon2::EngineConfig;

/// Qualifiers stripped from a host script name before deriving its module
/// name, e.g. `hasher.min.js` → `hasher.wasm`.
const SCRIPT_QUALIFIERS: [&str; 5] = [".min", ".src", ".es5", ".es6", ".es7"];

/// Selects the engine a worker loads.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineSource {
    /// The Argon2 implementation of this crate.
    #[default]
    Native,
    /// A WebAssembly engine module.
    Wasm(ModuleSource),
}

/// Location of a WebAssembly engine module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleSource {
    /// A module file at an explicit path.
    Path(PathBuf),
    /// The module named after a host file; see [`sibling_module_path`].
    Sibling(PathBuf),
    /// Module bytes supplied directly.
    Bytes(Vec<u8>),
}

impl ModuleSource {
    /// Path the module is read from, if it comes from the filesystem.
    pub fn path(&self) -> Option<PathBuf> {
        match self {
            ModuleSource::Path(path) => Some(path.clone()),
            ModuleSource::Sibling(host) => Some(sibling_module_path(host)),
            ModuleSource::Bytes(_) => None,
        }
    }

    pub fn retrieve(&self) -> Result<Vec<u8>, LoadError> {
        let path = match self {
            ModuleSource::Bytes(bytes) => return Ok(bytes.clone()),
            other => other.path().unwrap_or_default(),
        };

        debug!(path = %path.display(), "reading engine module");
        fs::read(&path).map_err(|source| LoadError::Retrieve { path, source })
    }
}

impl EngineSource {
    /// Retrieves and instantiates the selected engine.
    pub fn load(&self, config: &EngineConfig) -> Result<Box<dyn Engine>, LoadError> {
        config.validate()?;

        match self {
            EngineSource::Native => Ok(Box::new(NativeEngine::new(*config)?)),
            EngineSource::Wasm(module) => {
                let engine = {
                    let bytes = module.retrieve()?;
                    WasmEngine::from_bytes(&bytes)?
                };
                Ok(Box::new(engine))
            }
        }
    }
}

/// Derives an engine module path from the path of the file hosting it.
///
/// A `.js` host drops that extension and any trailing build qualifiers
/// (`.min`, `.src`, `.es5`, `.es6`, `.es7`) before `.wasm` is appended.
/// Any other host simply has its extension replaced by `wasm`.
pub fn sibling_module_path(host: &Path) -> PathBuf {
    let Some(name) = host.file_name().and_then(|name| name.to_str()) else {
        return host.with_extension("wasm");
    };

    match name.strip_suffix(".js") {
        Some(mut stem) => {
            while let Some(shorter) = SCRIPT_QUALIFIERS
                .iter()
                .find_map(|qualifier| stem.strip_suffix(qualifier))
            {
                stem = shorter;
            }
            host.with_file_name(format!("{stem}.wasm"))
        }
        None => host.with_extension("wasm"),
    }
}
