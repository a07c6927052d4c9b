use std::io;
use std::sync::Arc;
use std::thread;

use tokio::sync::mpsc;
use tracing::{debug, info};

use super::queue::StartupQueue;
use crate::channel::{self, HashRequest, HashResponse, Inbox, Port};
use crate::derivation::argon2::EngineConfig;
use crate::engine::{Engine, EngineLoader, LoadError};

/// Messages delivered to the worker context.
pub enum WorkerEvent {
    Request(HashRequest),
    /// Raised once, from inside the worker context, when loading finishes.
    EngineLoaded(Result<Box<dyn Engine>, LoadError>),
}

impl From<HashRequest> for WorkerEvent {
    fn from(request: HashRequest) -> Self {
        WorkerEvent::Request(request)
    }
}

/// Starts a worker context and returns the port feeding it.
///
/// The worker answers on `responses`. Engine loading starts immediately on
/// a separate thread; requests received meanwhile are buffered.
pub fn spawn(
    config: EngineConfig,
    loader: Arc<dyn EngineLoader>,
    responses: Port<HashResponse>,
) -> io::Result<Port<WorkerEvent>> {
    let (port, inbox) = channel::channel();
    let events = port.unmetered();

    thread::Builder::new()
        .name("argon2-worker".into())
        .spawn(move || {
            start_loading(loader, events);
            run(inbox, config, responses);
        })?;

    Ok(port)
}

fn start_loading(loader: Arc<dyn EngineLoader>, events: mpsc::UnboundedSender<WorkerEvent>) {
    let fallback = events.clone();

    let spawned = thread::Builder::new()
        .name("argon2-engine-loader".into())
        .spawn(move || {
            let outcome = loader.load();
            let _ = events.send(WorkerEvent::EngineLoaded(outcome));
        });

    if let Err(e) = spawned {
        let _ = fallback.send(WorkerEvent::EngineLoaded(Err(LoadError::Unavailable(format!(
            "could not spawn loader thread: {e}"
        )))));
    }
}

fn run(mut inbox: Inbox<WorkerEvent>, config: EngineConfig, responses: Port<HashResponse>) {
    info!(
        parallelism = config.parallelism,
        memory_kib = config.memory_kib,
        iterations = config.iterations,
        variant = ?config.variant,
        "worker started"
    );

    let mut queue = StartupQueue::new(config);

    while let Some(event) = inbox.recv_blocking() {
        match event {
            WorkerEvent::Request(request) => queue.dispatch(request, &responses),
            WorkerEvent::EngineLoaded(outcome) => queue.activate(outcome, &responses),
        }
    }

    debug!("worker inbox closed, exiting");
}
