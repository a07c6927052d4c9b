#![allow(dead_code)]

use std::sync::Arc;
use std::sync::mpsc;

use argon2_worker::codec;
use argon2_worker::engine::{Engine, EngineError, EngineLoader, LoadError};
use argon2_worker::hash::blake2b;
use argon2_worker::{EngineConfig, Variant};
use parking_lot::Mutex;

pub const FAKE_BASE: usize = 64;

/// Smallest valid single-lane configuration.
pub fn small_config() -> EngineConfig {
    EngineConfig {
        parallelism: 1,
        memory_kib: 8,
        iterations: 1,
        variant: Variant::D,
    }
}

pub fn hex(s: &str) -> Vec<u8> {
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
        .collect()
}

/// Fake engine that records the password of every parameter block it is
/// given and answers with BLAKE2b-256 of that password.
pub struct Recorder {
    memory: Vec<u8>,
    seen: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl Recorder {
    pub fn new(config: &EngineConfig, seen: Arc<Mutex<Vec<Vec<u8>>>>) -> Self {
        Self {
            memory: vec![0u8; FAKE_BASE + config.region_len()],
            seen,
        }
    }
}

impl Engine for Recorder {
    fn base(&self) -> usize {
        FAKE_BASE
    }

    fn memory(&self) -> &[u8] {
        &self.memory
    }

    fn memory_mut(&mut self) -> &mut [u8] {
        &mut self.memory
    }

    fn invoke(&mut self, len: u32) -> Result<i32, EngineError> {
        let block = &self.memory[FAKE_BASE..FAKE_BASE + len as usize];
        let decoded = codec::decode(block).map_err(|e| EngineError::Trap(e.to_string()))?;
        let password = decoded.password.to_vec();

        let digest = blake2b(32, &password);
        self.seen.lock().push(password);
        self.memory[FAKE_BASE..FAKE_BASE + 32].copy_from_slice(&digest);
        Ok(1)
    }
}

/// What a [`Scripted`] engine does after scribbling over its region.
#[derive(Clone, Copy)]
pub enum Behavior {
    Succeed,
    Reject,
    Fault,
    Panic,
}

/// Fake engine that fills its working region with `0xFF` and then behaves
/// as scripted. Bytes below the base are set to `0xAA` and never touched.
pub struct Scripted {
    memory: Vec<u8>,
    region_len: usize,
    behavior: Behavior,
}

impl Scripted {
    pub fn new(config: &EngineConfig, behavior: Behavior) -> Self {
        let mut memory = vec![0u8; FAKE_BASE + config.region_len()];
        memory[..FAKE_BASE].fill(0xAA);
        Self {
            memory,
            region_len: config.region_len(),
            behavior,
        }
    }
}

impl Engine for Scripted {
    fn base(&self) -> usize {
        FAKE_BASE
    }

    fn memory(&self) -> &[u8] {
        &self.memory
    }

    fn memory_mut(&mut self) -> &mut [u8] {
        &mut self.memory
    }

    fn invoke(&mut self, _len: u32) -> Result<i32, EngineError> {
        self.memory[FAKE_BASE..FAKE_BASE + self.region_len].fill(0xFF);

        match self.behavior {
            Behavior::Succeed => Ok(1),
            Behavior::Reject => Ok(0),
            Behavior::Fault => Err(EngineError::Trap("scripted fault".into())),
            Behavior::Panic => panic!("scripted panic"),
        }
    }
}

/// Loader that hands out its engine only once the gate is opened.
pub struct GatedLoader {
    gate: Mutex<mpsc::Receiver<()>>,
    engine: Mutex<Option<Result<Box<dyn Engine>, LoadError>>>,
}

impl GatedLoader {
    pub fn new(
        engine: Result<Box<dyn Engine>, LoadError>,
    ) -> (mpsc::Sender<()>, Self) {
        let (open, gate) = mpsc::channel();
        (
            open,
            Self {
                gate: Mutex::new(gate),
                engine: Mutex::new(Some(engine)),
            },
        )
    }
}

impl EngineLoader for GatedLoader {
    fn load(&self) -> Result<Box<dyn Engine>, LoadError> {
        let _ = self.gate.lock().recv();
        self.engine
            .lock()
            .take()
            .unwrap_or_else(|| Err(LoadError::Unavailable("engine already taken".into())))
    }
}

pub fn is_zeroed(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| b == 0)
}
