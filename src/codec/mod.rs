//! Parameter block codec.
//!
//! The hashing engine takes no arguments besides a length: everything it
//! needs is marshaled into its linear memory at the base offset `B` first.
//!
//! ```text
//! B + 0   parallelism      u32 LE
//! B + 4   tag length       u32 LE
//! B + 8   memory (KiB)     u32 LE
//! B + 12  iterations       u32 LE
//! B + 16  version          u32 LE
//! B + 20  variant          u32 LE
//! B + 24  |password| u32 LE, password bytes
//!         |salt|     u32 LE, salt bytes
//!         |key|      u32 LE, key bytes
//!         |ad|       u32 LE, associated data bytes
//! ```
//!
//! An absent or empty field is a zero length prefix with no payload. The
//! layout is byte-for-byte the H0 input of RFC 9106 §3.2, which lets the
//! engine hash the block as-is.
//!
//! [`encode`] is used by the worker before each invocation;
//! [`decode`] is its exact inverse and is used by the native engine to
//! validate what it received.

pub mod core;

pub use self::core::{CodecError, DecodedBlock, Fields, HEADER_LEN, Header, decode, encode};
