//! Behavior-driven tests for the paced, retrying indicator fetcher.
//!
//! These tests verify WHEN the fetcher dispatches to the provider and how it
//! reacts to failures, measured on a virtual clock.

use std::sync::Arc;
use std::time::Duration;

use chartfeed_tests::{
    default_fetcher, snapshot, FeedConfig, FeedError, IndicatorFetcher, ManualClock, Query,
    RetryPolicy, ScriptedIndicatorSource, SourceError,
};

fn query() -> Query {
    Query::parse("EURUSD").expect("valid symbol")
}

// =============================================================================
// Pacing
// =============================================================================

#[tokio::test]
async fn when_two_fetches_run_back_to_back_dispatches_are_at_least_500ms_apart() {
    // Given: A fetcher with the default 500ms spacing
    let clock = Arc::new(ManualClock::new());
    let source = Arc::new(ScriptedIndicatorSource::always_ok(clock.clone()));
    let fetcher = default_fetcher(source.clone(), clock.clone());

    // When: Two fetches are issued immediately one after the other
    fetcher.fetch_indicators(&query()).await.expect("first");
    fetcher.fetch_indicators(&query()).await.expect("second");

    // Then: The second dispatch waited out the spacing
    let times = source.dispatch_times();
    assert_eq!(times, vec![Duration::ZERO, Duration::from_millis(500)]);
}

#[tokio::test]
async fn when_time_has_already_passed_only_the_remainder_is_waited() {
    // Given: A first dispatch followed by 320ms of unrelated work
    let clock = Arc::new(ManualClock::new());
    let source = Arc::new(ScriptedIndicatorSource::always_ok(clock.clone()));
    let fetcher = default_fetcher(source.clone(), clock.clone());
    fetcher.fetch_indicators(&query()).await.expect("first");
    clock.advance(Duration::from_millis(320));

    // When: The next fetch is issued
    fetcher.fetch_indicators(&query()).await.expect("second");

    // Then: Only 180ms of pacing was added
    assert_eq!(clock.sleeps(), vec![Duration::from_millis(180)]);
    assert_eq!(source.dispatch_times()[1], Duration::from_millis(500));
}

#[tokio::test]
async fn when_callers_run_concurrently_they_share_one_spacing_window() {
    // Given: Two clones of the fetcher used by concurrent requests
    let clock = Arc::new(ManualClock::new());
    let source = Arc::new(ScriptedIndicatorSource::always_ok(clock.clone()));
    let fetcher = default_fetcher(source.clone(), clock.clone());
    let other = fetcher.clone();

    // When: Three fetches race
    let q = query();
    let (a, b, c) = tokio::join!(
        fetcher.fetch_indicators(&q),
        other.fetch_indicators(&q),
        fetcher.fetch_indicators(&q),
    );

    // Then: Every dispatch is spaced from the previous one
    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    let times = source.dispatch_times();
    assert_eq!(times.len(), 3);
    for pair in times.windows(2) {
        assert!(pair[1] - pair[0] >= Duration::from_millis(500), "{times:?}");
    }
}

#[tokio::test]
async fn when_spacing_is_configured_the_configured_value_applies() {
    // Given: A config with 750ms spacing
    let clock = Arc::new(ManualClock::new());
    let source = Arc::new(ScriptedIndicatorSource::always_ok(clock.clone()));
    let config = FeedConfig {
        min_spacing: Duration::from_millis(750),
        ..FeedConfig::default()
    };
    let fetcher = IndicatorFetcher::from_config(source.clone(), &config, clock.clone());

    // When
    fetcher.fetch_indicators(&query()).await.expect("first");
    fetcher.fetch_indicators(&query()).await.expect("second");

    // Then
    assert_eq!(source.dispatch_times()[1], Duration::from_millis(750));
}

// =============================================================================
// Retry
// =============================================================================

#[tokio::test]
async fn when_provider_fails_twice_then_succeeds_snapshot_is_returned_after_2s_and_4s() {
    // Given: A provider that fails twice before answering
    let clock = Arc::new(ManualClock::new());
    let source = Arc::new(ScriptedIndicatorSource::new(
        clock.clone(),
        vec![
            Err(SourceError::unavailable("tradingview returned status 503")),
            Err(SourceError::unavailable("tradingview returned status 503")),
            Ok(snapshot(&[("RSI", 47.5)])),
        ],
    ));
    let fetcher = default_fetcher(source.clone(), clock.clone());

    // When
    let result = fetcher.fetch_indicators(&query()).await;

    // Then: The third answer comes back after exactly two linear backoffs
    let snapshot = result.expect("third attempt succeeds");
    assert_eq!(snapshot.get("RSI"), Some(47.5));
    assert_eq!(source.dispatch_count(), 3);
    assert_eq!(
        clock.sleeps(),
        vec![Duration::from_secs(2), Duration::from_secs(4)]
    );
    assert_eq!(
        source.dispatch_times(),
        vec![Duration::ZERO, Duration::from_secs(2), Duration::from_secs(6)]
    );
}

#[tokio::test]
async fn when_every_attempt_fails_upstream_error_carries_the_last_message() {
    // Given: A provider that never answers
    let clock = Arc::new(ManualClock::new());
    let source = Arc::new(ScriptedIndicatorSource::new(
        clock.clone(),
        vec![
            Err(SourceError::unavailable("first")),
            Err(SourceError::rate_limited("second")),
            Err(SourceError::symbol_not_found("Exchange or symbol not found.")),
        ],
    ));
    let fetcher = default_fetcher(source.clone(), clock.clone());

    // When
    let err = fetcher
        .fetch_indicators(&query())
        .await
        .expect_err("all attempts fail");

    // Then: Three dispatches, no wait after the last one
    assert_eq!(err, FeedError::upstream("Exchange or symbol not found."));
    assert_eq!(source.dispatch_count(), 3);
    assert_eq!(clock.sleeps().len(), 2);
}

#[tokio::test]
async fn when_retries_are_disabled_the_first_failure_is_final() {
    // Given: A fetcher without retries
    let clock = Arc::new(ManualClock::new());
    let source = Arc::new(ScriptedIndicatorSource::new(
        clock.clone(),
        vec![Err(SourceError::unavailable("down"))],
    ));
    let config = FeedConfig {
        retry: RetryPolicy::no_retry(),
        ..FeedConfig::default()
    };
    let fetcher = IndicatorFetcher::from_config(source.clone(), &config, clock.clone());

    // When
    let result = fetcher.fetch_indicators(&query()).await;

    // Then
    assert!(matches!(result, Err(FeedError::Upstream { .. })));
    assert_eq!(source.dispatch_count(), 1);
    assert!(clock.sleeps().is_empty());
}
