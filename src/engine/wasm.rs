//! WebAssembly engine hosted with `wasmtime`.
//!
//! The module is compiled and instantiated from raw bytes; no imports are
//! provided, so a valid engine module is self-contained. It must export:
//!
//! | Export | Kind | Meaning |
//! |--------|------|---------|
//! | `memory` | memory | linear memory holding the working region |
//! | `B` | `i32` global | base offset of the working region |
//! | `argon2` | `(i32) -> i32` | hashes the parameter block at `B` |

use wasmtime::{Instance, Memory, Module, Store, TypedFunc, Val};

use super::{Engine, EngineError, LoadError};

pub const MEMORY_EXPORT: &str = "memory";
pub const BASE_EXPORT: &str = "B";
pub const ENTRY_EXPORT: &str = "argon2";

pub struct WasmEngine {
    store: Store<()>,
    memory: Memory,
    entry: TypedFunc<u32, i32>,
    base: usize,
}

impl WasmEngine {
    /// Compiles and instantiates an engine module.
    ///
    /// The bytes are only borrowed for compilation; the caller can drop them
    /// as soon as this returns.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LoadError> {
        let engine = wasmtime::Engine::default();
        let module = Module::new(&engine, bytes).map_err(|e| LoadError::Compile(e.to_string()))?;

        let mut store = Store::new(&engine, ());
        let instance = Instance::new(&mut store, &module, &[])
            .map_err(|e| LoadError::Instantiate(e.to_string()))?;

        let memory = instance
            .get_memory(&mut store, MEMORY_EXPORT)
            .ok_or(LoadError::MissingExport(MEMORY_EXPORT))?;

        let base = match instance
            .get_global(&mut store, BASE_EXPORT)
            .ok_or(LoadError::MissingExport(BASE_EXPORT))?
            .get(&mut store)
        {
            Val::I32(offset) => offset as u32 as usize,
            _ => {
                return Err(LoadError::BadExport {
                    name: BASE_EXPORT,
                    reason: "expected an i32 global".into(),
                });
            }
        };

        let entry = instance
            .get_typed_func::<u32, i32>(&mut store, ENTRY_EXPORT)
            .map_err(|e| LoadError::BadExport {
                name: ENTRY_EXPORT,
                reason: e.to_string(),
            })?;

        Ok(Self {
            store,
            memory,
            entry,
            base,
        })
    }
}

impl Engine for WasmEngine {
    fn base(&self) -> usize {
        self.base
    }

    fn memory(&self) -> &[u8] {
        self.memory.data(&self.store)
    }

    fn memory_mut(&mut self) -> &mut [u8] {
        self.memory.data_mut(&mut self.store)
    }

    fn invoke(&mut self, len: u32) -> Result<i32, EngineError> {
        self.entry
            .call(&mut self.store, len)
            .map_err(|e| EngineError::Trap(e.to_string()))
    }
}
