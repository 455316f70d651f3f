use super::*;
use std::io;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn counter() -> Arc<AtomicU32> {
    Arc::new(AtomicU32::new(0))
}

#[tokio::test(start_paused = true)]
async fn test_immediate_success() {
    let observer = Arc::new(StatsObserver::new());
    let start = Instant::now();

    let result = PollerBuilder::new()
        .with_interval(Duration::from_secs(5))
        .with_timeout(Duration::from_secs(60))
        .with_observer(observer.clone())
        .build()
        .until(|| async { Ok::<_, io::Error>(true) })
        .await;

    assert_eq!(result.unwrap(), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
    assert_eq!(observer.checks(), 1);
    assert_eq!(observer.satisfied(), 1);
    assert_eq!(observer.pending(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_satisfied_after_pending_checks() {
    let checks = counter();
    let checks_clone = checks.clone();
    let start = Instant::now();

    let result = poll_until(Duration::from_secs(5), Duration::from_secs(60), || {
        let checks = checks_clone.clone();
        async move {
            let n = checks.fetch_add(1, Ordering::SeqCst) + 1;
            Ok::<_, io::Error>(n >= 3)
        }
    })
    .await;

    assert_eq!(result.unwrap(), 3);
    assert_eq!(checks.load(Ordering::SeqCst), 3);
    assert_eq!(start.elapsed(), Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn test_timeout_when_never_satisfied() {
    let observer = Arc::new(StatsObserver::new());
    let start = Instant::now();

    let result = PollerBuilder::new()
        .with_interval(Duration::from_secs(5))
        .with_timeout(Duration::from_secs(20))
        .with_observer(observer.clone())
        .build()
        .until(|| async { Ok::<_, io::Error>(false) })
        .await;

    let err = result.unwrap_err();
    assert!(err.is_timeout());
    // Checks at 0s, 5s, 10s and 15s
    assert_eq!(err.attempts(), 4);
    assert_eq!(start.elapsed(), Duration::from_secs(20));
    assert_eq!(observer.timeouts(), 1);
    assert_eq!(observer.pending(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_condition_error_aborts() {
    let checks = counter();
    let checks_clone = checks.clone();
    let observer = Arc::new(StatsObserver::new());

    let result = PollerBuilder::new()
        .with_interval(Duration::from_millis(500))
        .with_timeout(Duration::from_secs(60))
        .with_observer(observer.clone())
        .build()
        .until(|| {
            let checks = checks_clone.clone();
            async move {
                if checks.fetch_add(1, Ordering::SeqCst) == 0 {
                    Ok(false)
                } else {
                    Err(io::Error::other("cluster lookup failed"))
                }
            }
        })
        .await;

    let err = result.unwrap_err();
    assert!(!err.is_timeout());
    assert_eq!(err.attempts(), 2);
    assert_eq!(observer.condition_errors(), 1);
    assert_eq!(checks.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_delayed_first_check() {
    let start = Instant::now();

    let result = PollerBuilder::new()
        .with_interval(Duration::from_secs(1))
        .with_timeout(Duration::from_secs(60))
        .with_immediate(false)
        .build()
        .until(|| async { Ok::<_, io::Error>(true) })
        .await;

    assert_eq!(result.unwrap(), 1);
    assert_eq!(start.elapsed(), Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_deadline_cuts_slow_check() {
    let result = poll_until(Duration::from_secs(1), Duration::from_secs(3), || async {
        tokio::time::sleep(Duration::from_secs(10)).await;
        Ok::<_, io::Error>(true)
    })
    .await;

    let err = result.unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(err.attempts(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_zero_timeout_makes_no_checks() {
    let checks = counter();
    let checks_clone = checks.clone();

    let result = poll_until(Duration::from_secs(1), Duration::ZERO, || {
        let checks = checks_clone.clone();
        async move {
            checks.fetch_add(1, Ordering::SeqCst);
            Ok::<_, io::Error>(true)
        }
    })
    .await;

    assert!(result.unwrap_err().is_timeout());
    assert_eq!(checks.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_with_settings() {
    let settings = crate::config::PollSettings::new(
        Duration::from_millis(500),
        Duration::from_secs(15 * 60),
    );
    let poller = PollerBuilder::new().with_settings(&settings).build();

    assert_eq!(poller.interval(), Duration::from_millis(500));
    assert_eq!(poller.timeout(), Duration::from_secs(900));
}
