//! Argon2 password hashing off the caller's thread.
//!
//! Hashing is delegated to a worker context: a dedicated thread that loads
//! a precompiled Argon2 engine, hashes requests one at a time and answers
//! with 32-byte digests. Callers get a future per request; the worker is
//! started lazily on the first call and shared afterwards.
//!
//! The engine's working memory (64 MiB by default) is zeroed after every
//! invocation, so no password-derived state outlives a call.
//!
//! # Module overview
//!
//! - `host`
//!   The public facade: [`Hasher`], [`hash`], call registry and worker
//!   bootstrap.
//!
//! - `channel`
//!   Request and response messages and the one-way ports carrying them
//!   between host and worker.
//!
//! - `worker`
//!   The worker context: startup buffering, engine invocation and working
//!   region sanitization.
//!
//! - `engine`
//!   The engine export contract, the native engine, and WebAssembly
//!   engines hosted with `wasmtime`.
//!
//! - `codec`
//!   The parameter block written at the engine base before each call.
//!
//! - `derivation`
//!   Argon2d/i/id (RFC 9106), computed in place over a working region.
//!
//! - `hash`
//!   BLAKE2b (RFC 7693) and the variable-length H' built on it.
//!
//! # Example
//!
//! ```no_run
//! use argon2_worker::{Credentials, Hasher, HasherConfig};
//!
//! # async fn demo() -> Result<(), argon2_worker::HashError> {
//! let hasher = Hasher::new(HasherConfig::default());
//! let digest = hasher
//!     .hash(Credentials::new("correct horse", "battery staple"))?
//!     .await?;
//! assert_eq!(digest.len(), 32);
//! # Ok(())
//! # }
//! ```

pub mod channel;
pub mod codec;
pub mod derivation;
pub mod engine;
pub mod hash;
pub mod host;
pub mod worker;

pub use channel::{Credentials, Digest, ValidationError};
pub use derivation::argon2::{EngineConfig, Variant};
pub use engine::{Engine, EngineLoader, EngineSource, LoadError, ModuleSource};
pub use host::{
    BootstrapState, HashCall, HashError, Hasher, HasherConfig, InitError, default_hasher, hash,
};
