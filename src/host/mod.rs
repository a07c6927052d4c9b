//! The host side: the public hashing facade.
//!
//! [`Hasher::hash`] validates input, allocates a callid, registers the call
//! and posts the request to the worker, starting it on first use. A router
//! thread settles calls as responses come back.

pub mod bootstrap;
pub mod config;
pub mod core;
pub mod registry;

pub use self::bootstrap::{BootstrapState, InitError};
pub use self::config::HasherConfig;
pub use self::core::{HashCall, HashError, Hasher, default_hasher, hash};
pub use self::registry::CallRegistry;
