//! Hash algorithms exposed by the crate.
//!
//! Currently includes BLAKE2b, the primitive Argon2 is built on.

pub mod blake2b;

/// Re-export of the BLAKE2b convenience functions.
pub use self::blake2b::core::{Blake2b, blake2b, blake2b_long};
