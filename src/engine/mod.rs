//! Hashing engines and how they are loaded.
//!
//! An engine is an opaque, precompiled hashing component. The worker only
//! relies on the contract expressed by [`Engine`]:
//!
//! - a mutable linear memory,
//! - a base offset `B` at which the parameter block is written and from
//!   which the `1024 × memory_kib` working region extends,
//! - a single entry point taking the parameter block length, writing a
//!   32-byte digest back at `B` and returning nonzero on success.
//!
//! Two engines are provided:
//!
//! - [`native::NativeEngine`]: the Argon2 implementation of this crate
//!   running over an owned buffer.
//! - [`wasm::WasmEngine`]: a WebAssembly module hosted with `wasmtime`,
//!   exporting `memory`, a global `B` and a function `argon2`.
//!
//! Engines are produced by an [`EngineLoader`], which the worker runs
//! once, off its message loop, so requests can be queued while the engine
//! is still being retrieved and compiled.

use std::path::PathBuf;

use thiserror::Error;

use crate::derivation::argon2::ConfigError;

pub mod native;
pub mod source;
pub mod wasm;

pub use native::NativeEngine;
pub use source::{EngineSource, ModuleSource, sibling_module_path};
pub use wasm::WasmEngine;

/// The export contract of a hashing engine.
pub trait Engine: Send {
    /// Offset of the parameter block and working region in [`memory`](Engine::memory).
    fn base(&self) -> usize;

    fn memory(&self) -> &[u8];

    fn memory_mut(&mut self) -> &mut [u8];

    /// Hashes the `len`-byte parameter block at the base offset.
    ///
    /// Returns the engine's raw status: nonzero means the digest was
    /// written at the base offset. An `Err` means the engine faulted
    /// (for example a WebAssembly trap) rather than declining the input.
    fn invoke(&mut self, len: u32) -> Result<i32, EngineError>;
}

/// Faults raised while executing an engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("engine trapped: {0}")]
    Trap(String),
}

/// Produces a ready engine. Called once per worker.
pub trait EngineLoader: Send + Sync {
    fn load(&self) -> Result<Box<dyn Engine>, LoadError>;
}

impl<F> EngineLoader for F
where
    F: Fn() -> Result<Box<dyn Engine>, LoadError> + Send + Sync,
{
    fn load(&self) -> Result<Box<dyn Engine>, LoadError> {
        self()
    }
}

/// Errors raised while retrieving or instantiating an engine.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read engine module {}: {source}", .path.display())]
    Retrieve {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid engine configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("engine module failed to compile: {0}")]
    Compile(String),

    #[error("engine module failed to instantiate: {0}")]
    Instantiate(String),

    #[error("engine module does not export `{0}`")]
    MissingExport(&'static str),

    #[error("engine export `{name}` is unusable: {reason}")]
    BadExport { name: &'static str, reason: String },

    #[error("engine unavailable: {0}")]
    Unavailable(String),
}
