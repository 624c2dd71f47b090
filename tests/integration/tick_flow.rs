//! End-to-end tick flow over in-memory pipeline doubles.
//!
//! Exercises the full fetch → load → evaluate pipeline and the alert
//! lifecycle invariants: firing rules, one-directional status, and
//! idempotence across ticks.

use vigil::engine::Monitor;
use vigil::types::{AlertKind, AlertStatus};

use super::mock_pipeline::{
    active_alert, FixedQuoteSource, MemoryAlertStore, RecordingNotifier,
};

#[tokio::test]
async fn max_alert_fires_and_is_persisted() {
    // MAX @ 50000 with sell=50500 must end up FIRED.
    let store = MemoryAlertStore::new(vec![active_alert("btc high", AlertKind::Max, 50_000.0)]);
    let docs = store.docs();
    let notifier = RecordingNotifier::new();
    let delivered = notifier.delivered();

    let monitor = Monitor::new(
        Box::new(FixedQuoteSource::new(50_400.0, 50_500.0)),
        Box::new(store),
        Box::new(notifier),
    );

    let report = monitor.run_tick().await.unwrap();
    assert_eq!(report.alerts_checked, 1);
    assert_eq!(report.alerts_fired, 1);

    let docs = docs.lock().unwrap();
    assert_eq!(docs[0].status, AlertStatus::Fired);
    assert!(docs[0].fired_at.is_some());

    let delivered = delivered.lock().unwrap();
    assert_eq!(delivered.as_slice(), &[("btc high".to_string(), 50_500.0)]);
}

#[tokio::test]
async fn min_alert_stays_active_when_buy_is_above_threshold() {
    // MIN @ 50000 with buy=50200 must remain ACTIVE.
    let store = MemoryAlertStore::new(vec![active_alert("btc low", AlertKind::Min, 50_000.0)]);
    let docs = store.docs();

    let monitor = Monitor::new(
        Box::new(FixedQuoteSource::new(50_200.0, 50_300.0)),
        Box::new(store),
        Box::new(RecordingNotifier::new()),
    );

    let report = monitor.run_tick().await.unwrap();
    assert_eq!(report.alerts_fired, 0);
    assert_eq!(docs.lock().unwrap()[0].status, AlertStatus::Active);
}

#[tokio::test]
async fn min_alert_fires_when_buy_drops_below_threshold() {
    let store = MemoryAlertStore::new(vec![active_alert("btc low", AlertKind::Min, 50_000.0)]);
    let docs = store.docs();

    let monitor = Monitor::new(
        Box::new(FixedQuoteSource::new(49_750.0, 49_850.0)),
        Box::new(store),
        Box::new(RecordingNotifier::new()),
    );

    let report = monitor.run_tick().await.unwrap();
    assert_eq!(report.alerts_fired, 1);
    assert_eq!(docs.lock().unwrap()[0].status, AlertStatus::Fired);
}

#[tokio::test]
async fn threshold_equality_does_not_fire() {
    let store = MemoryAlertStore::new(vec![
        active_alert("at max", AlertKind::Max, 50_000.0),
        active_alert("at min", AlertKind::Min, 50_000.0),
    ]);
    let docs = store.docs();

    let monitor = Monitor::new(
        Box::new(FixedQuoteSource::new(50_000.0, 50_000.0)),
        Box::new(store),
        Box::new(RecordingNotifier::new()),
    );

    let report = monitor.run_tick().await.unwrap();
    assert_eq!(report.alerts_checked, 2);
    assert_eq!(report.alerts_fired, 0);
    assert!(docs
        .lock()
        .unwrap()
        .iter()
        .all(|a| a.status == AlertStatus::Active));
}

#[tokio::test]
async fn fired_alerts_are_not_loaded_or_reevaluated() {
    // Tick 1 fires the alert; tick 2 must not see it again.
    let store = MemoryAlertStore::new(vec![active_alert("once", AlertKind::Max, 50_000.0)]);
    let notifier = RecordingNotifier::new();
    let delivered = notifier.delivered();

    let monitor = Monitor::new(
        Box::new(FixedQuoteSource::new(50_400.0, 50_500.0)),
        Box::new(store),
        Box::new(notifier),
    );

    let first = monitor.run_tick().await.unwrap();
    assert_eq!(first.alerts_fired, 1);

    let second = monitor.run_tick().await.unwrap();
    assert_eq!(second.alerts_checked, 0);
    assert_eq!(second.alerts_fired, 0);

    // Exactly one notification across both ticks.
    assert_eq!(delivered.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn zero_active_alerts_completes_cleanly() {
    let mut fired = active_alert("already done", AlertKind::Max, 10.0);
    fired.status = AlertStatus::Fired;

    let store = MemoryAlertStore::new(vec![fired]);
    let docs = store.docs();

    let monitor = Monitor::new(
        Box::new(FixedQuoteSource::new(50_000.0, 50_100.0)),
        Box::new(store),
        Box::new(RecordingNotifier::new()),
    );

    let report = monitor.run_tick().await.unwrap();
    assert_eq!(report.alerts_checked, 0);
    assert_eq!(report.alerts_fired, 0);
    // Nothing was touched.
    assert_eq!(docs.lock().unwrap()[0].fired_at, None);
}

#[tokio::test]
async fn quote_failure_aborts_tick_without_touching_alerts() {
    let source = FixedQuoteSource::new(50_400.0, 50_500.0);
    source.set_error("coinbase unreachable");

    let store = MemoryAlertStore::new(vec![active_alert("untouched", AlertKind::Max, 50_000.0)]);
    let docs = store.docs();

    let monitor = Monitor::new(
        Box::new(source),
        Box::new(store),
        Box::new(RecordingNotifier::new()),
    );

    let err = monitor.run_tick().await.unwrap_err();
    assert!(err.to_string().contains("coinbase unreachable"));
    assert_eq!(docs.lock().unwrap()[0].status, AlertStatus::Active);
}

#[tokio::test]
async fn store_failure_aborts_tick() {
    let store = MemoryAlertStore::new(vec![active_alert("any", AlertKind::Min, 50_000.0)]);
    store.set_error("no reachable servers");

    let monitor = Monitor::new(
        Box::new(FixedQuoteSource::new(49_000.0, 49_100.0)),
        Box::new(store),
        Box::new(RecordingNotifier::new()),
    );

    assert!(monitor.run_tick().await.is_err());
}

#[tokio::test]
async fn notifier_failure_keeps_alert_fired() {
    // Delivery failing after the update must not roll anything back
    // and must not fail the tick.
    let store = MemoryAlertStore::new(vec![active_alert("flaky hook", AlertKind::Min, 50_000.0)]);
    let docs = store.docs();

    let monitor = Monitor::new(
        Box::new(FixedQuoteSource::new(49_800.0, 49_900.0)),
        Box::new(store),
        Box::new(RecordingNotifier::failing()),
    );

    let report = monitor.run_tick().await.unwrap();
    assert_eq!(report.alerts_fired, 1);
    assert_eq!(docs.lock().unwrap()[0].status, AlertStatus::Fired);
}
