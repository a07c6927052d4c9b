use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, OnceLock};
use std::task::{Context, Poll};

use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use super::bootstrap::{Bootstrap, BootstrapState, InitError};
use super::config::HasherConfig;
use super::registry::{CallRegistry, Settlement};
use crate::channel::{Credentials, Digest, HashRequest, ValidationError};
use crate::derivation::argon2::EngineConfig;
use crate::engine::EngineLoader;

#[derive(Debug, Error)]
pub enum HashError {
    /// Raised synchronously by [`Hasher::hash`]; no call was started.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("hashing worker unavailable: {0}")]
    Initialization(#[from] InitError),

    /// The worker answered without a digest.
    #[error("call {callid} failed")]
    Rejected { callid: u64 },

    /// The call can no longer be answered.
    #[error("call {callid} was abandoned")]
    Disconnected { callid: u64 },
}

/// Asynchronous password hashing on a shared worker.
///
/// Cheap to clone; clones share the worker and the callid sequence. The
/// worker is started by the first call to [`hash`](Hasher::hash).
#[derive(Clone)]
pub struct Hasher {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Arc<CallRegistry>,
    bootstrap: Bootstrap,
}

impl Hasher {
    pub fn new(config: HasherConfig) -> Self {
        let engine = config.engine;
        Self::with_loader(engine, config)
    }

    /// A hasher whose worker obtains its engine from `loader`.
    ///
    /// `config` must match the parameters the loaded engine was built for.
    pub fn with_loader<L>(config: EngineConfig, loader: L) -> Self
    where
        L: EngineLoader + 'static,
    {
        let registry = Arc::new(CallRegistry::new());
        let bootstrap = Bootstrap::new(config, Arc::new(loader), Arc::clone(&registry));

        Self {
            inner: Arc::new(Inner {
                registry,
                bootstrap,
            }),
        }
    }

    /// Submits a hash and returns a future for its digest.
    ///
    /// Invalid credentials are rejected here, before a callid is allocated
    /// or the worker is started. Every other failure is reported through
    /// the returned [`HashCall`].
    pub fn hash(&self, credentials: Credentials) -> Result<HashCall, HashError> {
        credentials.validate()?;

        let inner = &*self.inner;
        let worker = inner.bootstrap.worker();

        let call = inner.registry.register();
        let callid = call.callid();

        let worker = match worker {
            Ok(worker) => worker,
            Err(e) => {
                inner.registry.reject(callid, HashError::Initialization(e));
                return Ok(call);
            }
        };

        if worker.post(HashRequest::validated(callid, credentials)).is_err() {
            warn!(callid, "worker is gone, failing call");
            inner
                .registry
                .reject(callid, HashError::Disconnected { callid });
        } else {
            debug!(callid, "hash request posted");
        }

        Ok(call)
    }

    /// Requests posted to the worker so far.
    pub fn requests_sent(&self) -> u64 {
        self.inner.bootstrap.running().map_or(0, |w| w.sent())
    }

    /// Attempts made to start the worker: 0 before the first call, then 1.
    pub fn workers_started(&self) -> usize {
        self.inner.bootstrap.attempts()
    }

    pub fn worker_state(&self) -> BootstrapState {
        self.inner.bootstrap.state()
    }

    /// Calls submitted but not yet settled.
    pub fn pending_calls(&self) -> usize {
        self.inner.registry.pending()
    }
}

/// A submitted hash.
///
/// Resolves once, to the digest or to the reason there is none. There is
/// no timeout: a call the worker never answers stays pending.
#[derive(Debug)]
#[must_use = "a HashCall does nothing unless awaited"]
pub struct HashCall {
    callid: u64,
    receiver: oneshot::Receiver<Settlement>,
}

impl HashCall {
    pub(super) fn new(callid: u64, receiver: oneshot::Receiver<Settlement>) -> Self {
        Self { callid, receiver }
    }

    pub fn callid(&self) -> u64 {
        self.callid
    }
}

impl Future for HashCall {
    type Output = Result<Digest, HashError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let callid = self.callid;
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|settled| settled.unwrap_or(Err(HashError::Disconnected { callid })))
    }
}

static DEFAULT_HASHER: OnceLock<Hasher> = OnceLock::new();

/// The process-wide hasher, using [`HasherConfig::default`].
pub fn default_hasher() -> &'static Hasher {
    DEFAULT_HASHER.get_or_init(|| Hasher::new(HasherConfig::default()))
}

/// Hashes with the process-wide hasher.
///
/// ```no_run
/// # async fn demo() -> Result<(), argon2_worker::HashError> {
/// use argon2_worker::Credentials;
///
/// let digest = argon2_worker::hash(Credentials::new("hunter2", "NaCl saltsalt"))?.await?;
/// assert_eq!(digest.len(), 32);
/// # Ok(())
/// # }
/// ```
pub fn hash(credentials: Credentials) -> Result<HashCall, HashError> {
    default_hasher().hash(credentials)
}
