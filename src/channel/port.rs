use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tokio::sync::mpsc;

/// The receiving side is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("message channel closed")]
pub struct ChannelClosed;

/// Sending half of a one-way channel.
///
/// Clones share the channel and its send counter.
pub struct Port<M> {
    tx: mpsc::UnboundedSender<M>,
    sent: Arc<AtomicU64>,
}

/// Receiving half of a one-way channel, read from a dedicated thread.
pub struct Inbox<M> {
    rx: mpsc::UnboundedReceiver<M>,
}

pub fn channel<M>() -> (Port<M>, Inbox<M>) {
    let (tx, rx) = mpsc::unbounded_channel();

    (
        Port {
            tx,
            sent: Arc::new(AtomicU64::new(0)),
        },
        Inbox { rx },
    )
}

impl<M> Port<M> {
    pub fn post(&self, message: impl Into<M>) -> Result<(), ChannelClosed> {
        self.tx.send(message.into()).map_err(|_| ChannelClosed)?;
        self.sent.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Number of messages posted through this port and its clones.
    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    /// A raw sender into the same channel that is not counted by [`sent`](Port::sent).
    ///
    /// For events raised inside the receiving context itself.
    pub(crate) fn unmetered(&self) -> mpsc::UnboundedSender<M> {
        self.tx.clone()
    }
}

impl<M> Clone for Port<M> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            sent: Arc::clone(&self.sent),
        }
    }
}

impl<M> Inbox<M> {
    /// Blocks until a message arrives, or returns `None` once every sender
    /// is dropped and the queue is drained.
    ///
    /// Must not be called from within an async runtime.
    pub fn recv_blocking(&mut self) -> Option<M> {
        self.rx.blocking_recv()
    }
}
