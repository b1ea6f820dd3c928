//! End-to-end tests: registry-backed invocation through the dispatch loop.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use cronloop::{CallbackRef, CallbackRegistry, Cron, CronError, CronJob, Schedule};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cronloop=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

fn every_second() -> Schedule {
    Schedule::with_seconds("*", "*", "*", "*", "*", "*").unwrap()
}

#[tokio::test]
async fn test_registry_backed_jobs_run_on_schedule() {
    init_tracing();

    let runs: Arc<Mutex<Vec<DateTime<Utc>>>> = Arc::new(Mutex::new(Vec::new()));
    let recorded = runs.clone();

    let mut registry = CallbackRegistry::new();
    registry.insert("record", move || {
        let recorded = recorded.clone();
        async move {
            recorded.lock().push(Utc::now());
            Ok(())
        }
    });

    assert!(registry.contains("record"));

    let mut cron = Cron::new(Arc::new(registry));
    cron.register(CronJob::new(CallbackRef::new("record").unwrap(), every_second()))
        .unwrap();

    cron.run(6).await.unwrap();

    let runs = runs.lock();
    assert_eq!(runs.len(), 3);
    // consecutive runs land on consecutive due seconds
    for pair in runs.windows(2) {
        let gap = pair[1] - pair[0];
        assert!(gap >= chrono::Duration::milliseconds(900), "gap was {gap}");
        assert!(gap <= chrono::Duration::milliseconds(2100), "gap was {gap}");
    }
}

#[tokio::test]
async fn test_unknown_callback_is_isolated_from_healthy_jobs() {
    init_tracing();

    let runs = Arc::new(Mutex::new(0u32));
    let counted = runs.clone();

    let mut registry = CallbackRegistry::new();
    registry.insert("healthy", move || {
        let counted = counted.clone();
        async move {
            *counted.lock() += 1;
            Ok(())
        }
    });

    let mut cron = Cron::new(Arc::new(registry));
    // never registered in the registry; every invocation fails
    cron.register(CronJob::new(CallbackRef::new("dangling").unwrap(), every_second()))
        .unwrap();
    cron.register(CronJob::new(CallbackRef::new("healthy").unwrap(), every_second()))
        .unwrap();

    cron.run(4).await.unwrap();

    assert_eq!(*runs.lock(), 2);
}

#[tokio::test]
async fn test_schedule_errors_surface_at_registration() {
    init_tracing();

    let mut cron = Cron::new(Arc::new(CallbackRegistry::new()));

    let error = cron
        .register_job(
            CallbackRef::new("broken").unwrap(),
            "61",
            "*",
            "*",
            "*",
            "*",
        )
        .unwrap_err();
    assert!(matches!(error, CronError::OutOfRange { value: 61, .. }));

    // the failed registration left nothing behind
    assert!(cron.jobs().is_empty());
    assert!(matches!(CallbackRef::new(" "), Err(CronError::InvalidCallback)));
}
