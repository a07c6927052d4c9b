//! Message passing between the host and the worker context.
//!
//! The two sides share no state: requests travel to the worker and
//! responses travel back over unbounded one-way channels. Sends never
//! block, so the host can post requests before the worker has finished
//! starting.

pub mod message;
pub mod port;

pub use message::{Credentials, Digest, HashRequest, HashResponse, ValidationError};
pub use port::{ChannelClosed, Inbox, Port, channel};
