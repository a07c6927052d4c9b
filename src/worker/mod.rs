//! The worker context.
//!
//! A worker is a dedicated thread that owns one engine. It receives
//! requests over its inbox, buffers them until the engine is loaded, and
//! answers each with exactly one response. The engine's working region is
//! zeroed after every invocation.

pub mod core;
pub mod invoker;
pub mod queue;
pub mod sanitizer;

pub use self::core::{WorkerEvent, spawn};
pub use self::invoker::{ComputeError, Invoker};
pub use self::queue::{Mode, StartupQueue};
pub use self::sanitizer::WorkingRegion;
