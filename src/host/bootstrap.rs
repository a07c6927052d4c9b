use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use thiserror::Error;
use tracing::{info, warn};

use super::registry::{self, CallRegistry};
use crate::channel::{self, ChannelClosed, HashRequest, Port};
use crate::derivation::argon2::EngineConfig;
use crate::engine::EngineLoader;
use crate::worker::{self, WorkerEvent};

/// The worker context could not be started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitError {
    #[error("could not spawn {thread} thread: {reason}")]
    Spawn { thread: &'static str, reason: String },
}

impl InitError {
    fn spawn(thread: &'static str) -> impl FnOnce(std::io::Error) -> Self {
        move |e| InitError::Spawn {
            thread,
            reason: e.to_string(),
        }
    }
}

/// Where the shared worker stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    NotStarted,
    Running,
    Failed,
}

/// The host's link to a running worker.
pub(crate) struct WorkerHandle {
    port: Port<WorkerEvent>,
}

impl WorkerHandle {
    pub(crate) fn post(&self, request: HashRequest) -> Result<(), ChannelClosed> {
        self.port.post(request)
    }

    pub(crate) fn sent(&self) -> u64 {
        self.port.sent()
    }
}

/// Starts the shared worker on first use.
///
/// Concurrent first callers wait for the single start attempt and share its
/// result. A failed start is permanent.
pub(crate) struct Bootstrap {
    cell: OnceLock<Result<WorkerHandle, InitError>>,
    attempts: AtomicUsize,
    config: EngineConfig,
    loader: Arc<dyn EngineLoader>,
    registry: Arc<CallRegistry>,
}

impl Bootstrap {
    pub(crate) fn new(
        config: EngineConfig,
        loader: Arc<dyn EngineLoader>,
        registry: Arc<CallRegistry>,
    ) -> Self {
        Self {
            cell: OnceLock::new(),
            attempts: AtomicUsize::new(0),
            config,
            loader,
            registry,
        }
    }

    pub(crate) fn worker(&self) -> Result<&WorkerHandle, InitError> {
        self.cell.get_or_init(|| self.start()).as_ref().map_err(Clone::clone)
    }

    /// The running worker, without starting one.
    pub(crate) fn running(&self) -> Option<&WorkerHandle> {
        self.cell.get().and_then(|started| started.as_ref().ok())
    }

    pub(crate) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }

    pub(crate) fn state(&self) -> BootstrapState {
        match self.cell.get() {
            None => BootstrapState::NotStarted,
            Some(Ok(_)) => BootstrapState::Running,
            Some(Err(_)) => BootstrapState::Failed,
        }
    }

    fn start(&self) -> Result<WorkerHandle, InitError> {
        self.attempts.fetch_add(1, Ordering::Relaxed);

        let started = self.spawn_contexts();
        match &started {
            Ok(_) => info!("hashing worker started"),
            Err(e) => warn!(error = %e, "hashing worker failed to start"),
        }
        started
    }

    fn spawn_contexts(&self) -> Result<WorkerHandle, InitError> {
        let (responses, inbox) = channel::channel();

        registry::spawn_router(Arc::clone(&self.registry), inbox)
            .map_err(InitError::spawn("router"))?;

        let port = worker::spawn(self.config, Arc::clone(&self.loader), responses)
            .map_err(InitError::spawn("worker"))?;

        Ok(WorkerHandle { port })
    }
}
