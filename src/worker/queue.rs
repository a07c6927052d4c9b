use tracing::{debug, warn};

use super::invoker::Invoker;
use crate::channel::{ChannelClosed, HashRequest, HashResponse, Port};
use crate::derivation::argon2::EngineConfig;
use crate::engine::{Engine, LoadError};

/// Dispatch mode of the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The engine is still loading; requests are held back.
    Buffering,
    /// Requests are hashed as they arrive.
    Ready,
    /// The engine could not be loaded; every request fails.
    Failed,
}

enum State {
    Buffering(Vec<HashRequest>),
    Ready(Invoker),
    Failed,
}

/// Holds requests until the engine is loaded, then dispatches them.
///
/// Leaves buffering exactly once. Requests buffered up to that point are
/// answered most recent first.
pub struct StartupQueue {
    config: EngineConfig,
    state: State,
}

impl StartupQueue {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            state: State::Buffering(Vec::new()),
        }
    }

    pub fn mode(&self) -> Mode {
        match self.state {
            State::Buffering(_) => Mode::Buffering,
            State::Ready(_) => Mode::Ready,
            State::Failed => Mode::Failed,
        }
    }

    pub fn dispatch(&mut self, request: HashRequest, responses: &Port<HashResponse>) {
        let callid = request.callid();
        if let Err(e) = self.handle(request, responses) {
            warn!(callid, error = %e, "could not deliver hash response");
        }
    }

    /// Leaves buffering with the result of loading the engine and drains
    /// everything buffered so far.
    pub fn activate(
        &mut self,
        outcome: Result<Box<dyn Engine>, LoadError>,
        responses: &Port<HashResponse>,
    ) {
        let State::Buffering(pending) = &mut self.state else {
            warn!("engine load reported after startup completed, ignoring");
            return;
        };
        let mut pending = std::mem::take(pending);

        self.state = match outcome {
            Ok(engine) => State::Ready(Invoker::new(engine, self.config)),
            Err(e) => {
                warn!(error = %e, "hashing engine failed to load");
                State::Failed
            }
        };

        debug!(mode = ?self.mode(), buffered = pending.len(), "draining startup queue");

        while let Some(request) = pending.pop() {
            let callid = request.callid();
            if let Err(e) = self.handle(request, responses) {
                warn!(callid, error = %e, "error while draining startup queue");
            }
        }
    }

    fn handle(
        &mut self,
        request: HashRequest,
        responses: &Port<HashResponse>,
    ) -> Result<(), ChannelClosed> {
        let callid = request.callid();

        let response = match &mut self.state {
            State::Buffering(pending) => {
                debug!(callid, "engine not ready, buffering request");
                pending.push(request);
                return Ok(());
            }
            State::Ready(invoker) => match invoker.invoke(&request) {
                Ok(digest) => HashResponse::completed(callid, digest),
                Err(e) => {
                    warn!(callid, error = %e, "hash failed");
                    HashResponse::failed(callid)
                }
            },
            State::Failed => HashResponse::failed(callid),
        };

        drop(request);
        responses.post(response)
    }
}
