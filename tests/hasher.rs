mod common;

use std::sync::Arc;
use std::thread;

use argon2_worker::channel::HashResponse;
use argon2_worker::engine::{Engine, LoadError};
use argon2_worker::hash::blake2b;
use argon2_worker::host::CallRegistry;
use argon2_worker::{
    BootstrapState, Credentials, HashCall, HashError, Hasher, HasherConfig, ValidationError,
};
use common::{GatedLoader, Recorder, small_config};
use parking_lot::Mutex;

fn recording_hasher() -> (Hasher, Arc<Mutex<Vec<Vec<u8>>>>) {
    let config = small_config();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let engine = Mutex::new(Some(Recorder::new(&config, Arc::clone(&seen))));

    let hasher = Hasher::with_loader(config, move || -> Result<Box<dyn Engine>, LoadError> {
        engine
            .lock()
            .take()
            .map(|e| Box::new(e) as Box<dyn Engine>)
            .ok_or_else(|| LoadError::Unavailable("loaded twice".into()))
    });
    (hasher, seen)
}

// -------------------------------------------------------
// Validation
// -------------------------------------------------------

#[test]
fn short_salt_is_rejected_synchronously() {
    let hasher = Hasher::new(HasherConfig::default());

    let err = hasher.hash(Credentials::new("x", "short")).unwrap_err();

    assert!(matches!(
        err,
        HashError::Validation(ValidationError::SaltTooShort { len: 5 })
    ));
    assert_eq!(hasher.requests_sent(), 0);
    assert_eq!(hasher.workers_started(), 0);
    assert_eq!(hasher.worker_state(), BootstrapState::NotStarted);
    assert_eq!(hasher.pending_calls(), 0);
}

#[test]
fn global_hash_rejects_short_salt() {
    let err = argon2_worker::hash(Credentials::new("x", "")).unwrap_err();

    assert!(matches!(err, HashError::Validation(_)));
}

// -------------------------------------------------------
// Correlation and lifecycle
// -------------------------------------------------------

#[tokio::test]
async fn digests_are_32_bytes_and_match_the_engine() {
    let (hasher, _seen) = recording_hasher();

    let digest = hasher
        .hash(Credentials::new("pw", "saltsalt"))
        .unwrap()
        .await
        .unwrap();

    assert_eq!(digest.len(), 32);
    assert_eq!(digest.to_vec(), blake2b(32, b"pw"));
}

#[tokio::test]
async fn callids_strictly_increase() {
    let (hasher, _seen) = recording_hasher();

    let calls: Vec<HashCall> = (0..5)
        .map(|i| {
            hasher
                .hash(Credentials::new(format!("pw{i}"), "saltsalt"))
                .unwrap()
        })
        .collect();

    let callids: Vec<u64> = calls.iter().map(HashCall::callid).collect();
    assert_eq!(callids, [1, 2, 3, 4, 5]);

    for (i, call) in calls.into_iter().enumerate() {
        let digest = call.await.unwrap();
        assert_eq!(digest.to_vec(), blake2b(32, format!("pw{i}").as_bytes()));
    }

    assert_eq!(hasher.requests_sent(), 5);
    assert_eq!(hasher.pending_calls(), 0);
}

#[tokio::test]
async fn worker_starts_once_under_concurrent_first_calls() {
    let (hasher, _seen) = recording_hasher();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let hasher = hasher.clone();
            thread::spawn(move || {
                hasher
                    .hash(Credentials::new(format!("pw{i}"), "saltsalt"))
                    .unwrap()
            })
        })
        .collect();

    let calls: Vec<HashCall> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let mut callids: Vec<u64> = calls.iter().map(HashCall::callid).collect();
    callids.sort_unstable();
    assert_eq!(callids, (1..=8).collect::<Vec<u64>>());

    for call in calls {
        call.await.unwrap();
    }

    assert_eq!(hasher.workers_started(), 1);
    assert_eq!(hasher.requests_sent(), 8);
    assert_eq!(hasher.worker_state(), BootstrapState::Running);
}

/// Three calls made before the engine is ready reach it in order 3, 2, 1.
#[tokio::test]
async fn calls_made_before_engine_ready_run_most_recent_first() {
    let config = small_config();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let engine: Box<dyn Engine> = Box::new(Recorder::new(&config, Arc::clone(&seen)));
    let (open, loader) = GatedLoader::new(Ok(engine));
    let hasher = Hasher::with_loader(config, loader);

    let calls: Vec<HashCall> = ["1", "2", "3"]
        .into_iter()
        .map(|password| hasher.hash(Credentials::new(password, "saltsalt")).unwrap())
        .collect();
    assert_eq!(
        calls.iter().map(HashCall::callid).collect::<Vec<_>>(),
        [1, 2, 3]
    );

    open.send(()).unwrap();
    for call in calls {
        call.await.unwrap();
    }

    assert_eq!(*seen.lock(), [b"3".to_vec(), b"2".to_vec(), b"1".to_vec()]);
}

#[tokio::test]
async fn engine_load_failure_fails_every_call() {
    let (open, loader) = GatedLoader::new(Err(LoadError::Unavailable("offline".into())));
    let hasher = Hasher::with_loader(small_config(), loader);

    let early: Vec<HashCall> = (0..3)
        .map(|_| hasher.hash(Credentials::new("pw", "saltsalt")).unwrap())
        .collect();
    open.send(()).unwrap();

    for call in early {
        let callid = call.callid();
        let err = call.await.unwrap_err();
        assert!(matches!(err, HashError::Rejected { callid: id } if id == callid));
    }

    let late = hasher.hash(Credentials::new("pw", "saltsalt")).unwrap();
    assert!(matches!(late.await, Err(HashError::Rejected { .. })));
    assert_eq!(hasher.workers_started(), 1);
}

#[tokio::test]
async fn clones_share_the_worker_and_callids() {
    let (hasher, _seen) = recording_hasher();
    let other = hasher.clone();

    let first = hasher.hash(Credentials::new("a", "saltsalt")).unwrap();
    let second = other.hash(Credentials::new("b", "saltsalt")).unwrap();

    assert_eq!((first.callid(), second.callid()), (1, 2));
    first.await.unwrap();
    second.await.unwrap();
    assert_eq!(other.workers_started(), 1);
}

#[test]
fn unknown_responses_are_ignored() {
    let registry = CallRegistry::new();

    assert!(!registry.settle(HashResponse::completed(42, [0; 32])));
    assert!(!registry.settle(HashResponse::failed(0)));
    assert_eq!(registry.pending(), 0);
    assert_eq!(registry.last_callid(), 0);
}

#[tokio::test]
async fn duplicate_responses_are_ignored() {
    let registry = CallRegistry::new();
    let call = registry.register();
    let callid = call.callid();

    assert_eq!(callid, 1);
    assert_eq!(registry.pending(), 1);

    assert!(registry.settle(HashResponse::completed(callid, [1; 32])));
    assert!(!registry.settle(HashResponse::failed(callid)));
    assert!(!registry.settle(HashResponse::completed(callid, [2; 32])));
    assert_eq!(registry.pending(), 0);

    assert_eq!(call.await.unwrap(), [1; 32]);
}

// -------------------------------------------------------
// Full-size engine
// -------------------------------------------------------

/// "correct horse" / "12345678" at the default 64 MiB, 4-pass Argon2d.
#[tokio::test]
async fn default_parameters_are_deterministic() {
    let hasher = Hasher::new(HasherConfig::default());
    let credentials = Credentials::new("correct horse", "12345678");

    let first = hasher.hash(credentials.clone()).unwrap().await.unwrap();
    let second = hasher.hash(credentials.clone()).unwrap().await.unwrap();
    let fresh = Hasher::new(HasherConfig::default())
        .hash(credentials)
        .unwrap()
        .await
        .unwrap();

    assert_eq!(first.len(), 32);
    assert_eq!(first, second);
    assert_eq!(first, fresh);

    let other = hasher
        .hash(Credentials::new("correct horse", "87654321"))
        .unwrap()
        .await
        .unwrap();
    assert_ne!(first, other);
}
