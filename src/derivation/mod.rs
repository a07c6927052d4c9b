//! Key derivation and password hashing functions.
//!
//! Currently includes Argon2 (d, i and id variants), as executed by the
//! native engine.

pub mod argon2;

pub use self::argon2::{EngineConfig, Variant, hash_region};
