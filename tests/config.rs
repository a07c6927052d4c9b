use std::path::{Path, PathBuf};

use argon2_worker::engine::sibling_module_path;
use argon2_worker::{EngineConfig, EngineSource, HasherConfig, ModuleSource, Variant};

#[test]
fn empty_document_gives_defaults() {
    let config: HasherConfig = serde_json::from_str("{}").unwrap();

    assert_eq!(config, HasherConfig::default());
    assert_eq!(config.engine, EngineConfig::default());
    assert_eq!(config.source, EngineSource::Native);
}

#[test]
fn partial_engine_section_keeps_other_defaults() {
    let config: HasherConfig =
        serde_json::from_str(r#"{ "engine": { "memory_kib": 1024, "variant": "id" } }"#).unwrap();

    assert_eq!(
        config.engine,
        EngineConfig {
            parallelism: 1,
            memory_kib: 1024,
            iterations: 4,
            variant: Variant::Id,
        }
    );
}

#[test]
fn parses_module_sources() {
    let native: HasherConfig = serde_json::from_str(r#"{ "source": "native" }"#).unwrap();
    assert_eq!(native.source, EngineSource::Native);

    let sibling: HasherConfig =
        serde_json::from_str(r#"{ "source": { "wasm": { "sibling": "dist/hasher.min.js" } } }"#)
            .unwrap();
    assert_eq!(
        sibling.source,
        EngineSource::Wasm(ModuleSource::Sibling(PathBuf::from("dist/hasher.min.js")))
    );

    let path: HasherConfig =
        serde_json::from_str(r#"{ "source": { "wasm": { "path": "/opt/argon2.wasm" } } }"#)
            .unwrap();
    assert_eq!(
        path.source,
        EngineSource::Wasm(ModuleSource::Path(PathBuf::from("/opt/argon2.wasm")))
    );
}

#[test]
fn unknown_variant_is_rejected() {
    let parsed = serde_json::from_str::<HasherConfig>(r#"{ "engine": { "variant": "x" } }"#);
    assert!(parsed.is_err());
}

#[test]
fn config_serializes_back() {
    let config = HasherConfig {
        engine: EngineConfig {
            variant: Variant::I,
            ..EngineConfig::default()
        },
        source: EngineSource::Wasm(ModuleSource::Path(PathBuf::from("engine.wasm"))),
    };

    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains(r#""variant":"i""#));
    assert_eq!(serde_json::from_str::<HasherConfig>(&json).unwrap(), config);
}

// -------------------------------------------------------
// Sibling module paths
// -------------------------------------------------------

fn sibling(host: &str) -> PathBuf {
    sibling_module_path(Path::new(host))
}

#[test]
fn script_hosts_drop_build_qualifiers() {
    assert_eq!(sibling("dist/hasher.js"), PathBuf::from("dist/hasher.wasm"));
    assert_eq!(sibling("dist/hasher.min.js"), PathBuf::from("dist/hasher.wasm"));
    assert_eq!(sibling("hasher.es6.min.js"), PathBuf::from("hasher.wasm"));
    assert_eq!(sibling("hasher.src.es5.js"), PathBuf::from("hasher.wasm"));
}

#[test]
fn qualifiers_only_stripped_from_scripts() {
    assert_eq!(sibling("hasher.min"), PathBuf::from("hasher.wasm"));
    assert_eq!(sibling("hasher.min.mjs"), PathBuf::from("hasher.min.wasm"));
}

#[test]
fn other_hosts_replace_extension() {
    assert_eq!(sibling("bin/hasher"), PathBuf::from("bin/hasher.wasm"));
    assert_eq!(sibling("lib/libhasher.so"), PathBuf::from("lib/libhasher.wasm"));
}
