use zeroize::Zeroize;

use super::invoker::ComputeError;
use crate::engine::Engine;

/// The span `B .. B + 1024 × memory_kib` of an engine's memory, borrowed
/// for one invocation.
///
/// The span is zeroed when the guard is dropped, whether the invocation
/// returned a digest, failed, or unwound. Callers copy the digest out
/// before dropping the guard.
pub struct WorkingRegion<'a> {
    engine: &'a mut dyn Engine,
    start: usize,
    end: usize,
}

impl<'a> WorkingRegion<'a> {
    pub fn acquire(engine: &'a mut dyn Engine, len: usize) -> Result<Self, ComputeError> {
        let start = engine.base();
        let memory = engine.memory().len();

        let end = start
            .checked_add(len)
            .filter(|&end| end <= memory)
            .ok_or(ComputeError::RegionOutOfBounds {
                base: start,
                len,
                memory,
            })?;

        Ok(Self { engine, start, end })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.engine.memory()[self.start..self.end]
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.engine.memory_mut()[self.start..self.end]
    }

    pub fn engine_mut(&mut self) -> &mut dyn Engine {
        &mut *self.engine
    }
}

impl Drop for WorkingRegion<'_> {
    fn drop(&mut self) {
        let (start, end) = (self.start, self.end);
        if let Some(region) = self.engine.memory_mut().get_mut(start..end) {
            region.zeroize();
        }
    }
}
