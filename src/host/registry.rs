use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::debug;

use super::core::{HashCall, HashError};
use crate::channel::{Digest, HashResponse, Inbox};

pub(crate) type Settlement = Result<Digest, HashError>;

/// Pending calls by callid.
///
/// Callids start at 1 and only increase. Each pending call is settled at
/// most once: settling removes it.
#[derive(Default)]
pub struct CallRegistry {
    last_callid: AtomicU64,
    pending: Mutex<HashMap<u64, oneshot::Sender<Settlement>>>,
}

impl CallRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next callid and registers it as pending.
    ///
    /// The returned call resolves when [`settle`](Self::settle) sees a
    /// response for its callid.
    pub fn register(&self) -> HashCall {
        let callid = self.last_callid.fetch_add(1, Ordering::Relaxed) + 1;
        let (tx, rx) = oneshot::channel();

        let previous = self.pending.lock().insert(callid, tx);
        debug_assert!(previous.is_none(), "callid {callid} registered twice");

        HashCall::new(callid, rx)
    }

    /// Settles the call a worker response belongs to.
    ///
    /// Returns `false` for responses matching no pending call, which are
    /// ignored.
    pub fn settle(&self, response: HashResponse) -> bool {
        let callid = response.callid();
        let outcome = match response.data() {
            Some(digest) => Ok(*digest),
            None => Err(HashError::Rejected { callid }),
        };
        self.resolve(callid, outcome)
    }

    /// Fails a pending call without a worker response.
    pub(crate) fn reject(&self, callid: u64, error: HashError) -> bool {
        self.resolve(callid, Err(error))
    }

    fn resolve(&self, callid: u64, outcome: Settlement) -> bool {
        let Some(tx) = self.pending.lock().remove(&callid) else {
            debug!(callid, "ignoring response for unknown call");
            return false;
        };

        // The caller may have dropped its HashCall.
        let _ = tx.send(outcome);
        true
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    /// Most recently allocated callid, 0 if none.
    pub fn last_callid(&self) -> u64 {
        self.last_callid.load(Ordering::Relaxed)
    }
}

/// Routes worker responses into `registry` until the response channel
/// closes.
pub(crate) fn spawn_router(
    registry: Arc<CallRegistry>,
    mut inbox: Inbox<HashResponse>,
) -> io::Result<()> {
    thread::Builder::new()
        .name("argon2-router".into())
        .spawn(move || {
            while let Some(response) = inbox.recv_blocking() {
                registry.settle(response);
            }
            debug!("response channel closed, router exiting");
        })?;

    Ok(())
}
