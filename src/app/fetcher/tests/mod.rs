//! Retry loop tests against a scripted source
//!
//! The scripted source replays a fixed sequence of responses, repeating the
//! last one once the script runs out, and counts requests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::{ConfigFetcher, FetchOutcome, FetchPolicy, FetchState};
use crate::app::client::ConfigSource;
use crate::errors::{FetchFailure, SourceError, SourceResult};

const VALID_BODY: &str = r#"{"id":"AC67DD","endpoint":"http://x/trivia","interval":59}"#;
const PARTIAL_BODY: &str = r#"{"id":"AC67DD"}"#;

#[derive(Debug, Clone)]
enum Scripted {
    Status(u16),
    Refused,
    Body(&'static str),
    /// Never answers
    Hang,
}

impl Scripted {
    fn respond(&self) -> SourceResult<Value> {
        match self {
            Scripted::Status(status) => Err(SourceError::Status { status: *status }),
            Scripted::Refused => Err(SourceError::Transport("connection refused".to_string())),
            Scripted::Body(body) => Ok(serde_json::from_str(body)?),
            Scripted::Hang => unreachable!("hanging responses are never produced"),
        }
    }
}

#[derive(Debug)]
struct ScriptedSource {
    script: Mutex<VecDeque<Scripted>>,
    last: Mutex<Option<Scripted>>,
    requests: AtomicU32,
    cancel_after: Option<(u32, CancellationToken)>,
}

impl ScriptedSource {
    fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            requests: AtomicU32::new(0),
            cancel_after: None,
        }
    }

    fn always(response: Scripted) -> Self {
        Self::new(vec![response])
    }

    /// Cancel `token` once `requests` requests have been served
    fn cancelling_after(mut self, requests: u32, token: CancellationToken) -> Self {
        self.cancel_after = Some((requests, token));
        self
    }

    fn requests(&self) -> u32 {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfigSource for ScriptedSource {
    async fn fetch_document(&self, _url: &Url) -> SourceResult<Value> {
        let served = self.requests.fetch_add(1, Ordering::SeqCst) + 1;

        let next = self.script.lock().unwrap().pop_front();
        let response = match next {
            Some(response) => {
                *self.last.lock().unwrap() = Some(response.clone());
                response
            }
            None => self
                .last
                .lock()
                .unwrap()
                .clone()
                .expect("script must not be empty"),
        };

        if let Some((after, token)) = &self.cancel_after {
            if served >= *after {
                token.cancel();
            }
        }

        if let Scripted::Hang = response {
            std::future::pending::<()>().await;
        }
        response.respond()
    }
}

fn policy(max_retries: u32, retry_delay: Duration) -> FetchPolicy {
    FetchPolicy::new("http://config.test/config/AC67DD", max_retries, retry_delay).unwrap()
}

#[tokio::test]
async fn test_valid_response_succeeds_on_first_attempt() {
    let fetcher = ConfigFetcher::new(ScriptedSource::always(Scripted::Body(VALID_BODY)));

    let report = fetcher
        .fetch(&policy(3, Duration::ZERO), &CancellationToken::new())
        .await;

    assert_eq!(report.attempts, 1);
    assert_eq!(report.retries_used(), 0);
    assert_eq!(report.outcome.state(), FetchState::Succeeded);
    let config = report.into_result().unwrap();
    assert_eq!(config.id, "AC67DD");
    assert_eq!(config.endpoint, "http://x/trivia");
    assert_eq!(config.interval, 59);
    assert_eq!(fetcher.source().requests(), 1);
}

#[tokio::test]
async fn test_server_errors_exhaust_transport_budget() {
    let fetcher = ConfigFetcher::new(ScriptedSource::always(Scripted::Status(500)));

    let report = fetcher
        .fetch(&policy(2, Duration::ZERO), &CancellationToken::new())
        .await;

    assert_eq!(report.attempts, 3);
    assert_eq!(fetcher.source().requests(), 3);
    assert_eq!(
        report.outcome,
        FetchOutcome::TransportExhausted {
            last_error: "Server error: HTTP 500".to_string()
        }
    );
}

#[tokio::test]
async fn test_partial_documents_exhaust_validation_budget() {
    let fetcher = ConfigFetcher::new(ScriptedSource::always(Scripted::Body(PARTIAL_BODY)));

    let report = fetcher
        .fetch(&policy(3, Duration::ZERO), &CancellationToken::new())
        .await;

    assert_eq!(report.attempts, 4);
    assert_eq!(
        report.into_result().unwrap_err(),
        FetchFailure::ValidationExhausted {
            attempts: 4,
            last_error: "Missing required keys: endpoint, interval".to_string()
        }
    );
}

#[tokio::test]
async fn test_malformed_body_is_fatal_immediately() {
    let fetcher = ConfigFetcher::new(ScriptedSource::new(vec![
        Scripted::Body("<html>502 Bad Gateway</html>"),
        Scripted::Body(VALID_BODY),
    ]));

    let report = fetcher
        .fetch(&policy(5, Duration::ZERO), &CancellationToken::new())
        .await;

    assert_eq!(report.attempts, 1);
    assert_eq!(fetcher.source().requests(), 1);
    assert!(matches!(
        report.outcome,
        FetchOutcome::MalformedResponse { .. }
    ));
}

#[tokio::test]
async fn test_malformed_body_after_retries_is_still_fatal() {
    let fetcher = ConfigFetcher::new(ScriptedSource::new(vec![
        Scripted::Status(503),
        Scripted::Body(""),
    ]));

    let report = fetcher
        .fetch(&policy(5, Duration::ZERO), &CancellationToken::new())
        .await;

    assert_eq!(report.attempts, 2);
    assert!(matches!(
        report.outcome,
        FetchOutcome::MalformedResponse { .. }
    ));
}

#[tokio::test]
async fn test_flaky_server_eventually_succeeds() {
    let fetcher = ConfigFetcher::new(ScriptedSource::new(vec![
        Scripted::Status(500),
        Scripted::Body(PARTIAL_BODY),
        Scripted::Refused,
        Scripted::Body(VALID_BODY),
    ]));

    let report = fetcher
        .fetch(&policy(10, Duration::ZERO), &CancellationToken::new())
        .await;

    assert_eq!(report.attempts, 4);
    assert!(report.outcome.is_success());
}

#[tokio::test]
async fn test_last_failure_kind_decides_exhaustion() {
    let fetcher = ConfigFetcher::new(ScriptedSource::new(vec![
        Scripted::Body(PARTIAL_BODY),
        Scripted::Refused,
    ]));

    let report = fetcher
        .fetch(&policy(1, Duration::ZERO), &CancellationToken::new())
        .await;

    assert_eq!(report.attempts, 2);
    assert_eq!(
        report.outcome,
        FetchOutcome::TransportExhausted {
            last_error: "HTTP request failed: connection refused".to_string()
        }
    );
}

#[tokio::test]
async fn test_empty_object_is_retried_not_accepted() {
    let fetcher = ConfigFetcher::new(ScriptedSource::new(vec![
        Scripted::Body("{}"),
        Scripted::Body(VALID_BODY),
    ]));

    let report = fetcher
        .fetch(&policy(1, Duration::ZERO), &CancellationToken::new())
        .await;

    assert_eq!(report.attempts, 2);
    assert!(report.outcome.is_success());
}

#[tokio::test]
async fn test_zero_retries_makes_single_attempt() {
    let fetcher = ConfigFetcher::new(ScriptedSource::always(Scripted::Refused));

    let report = fetcher
        .fetch(&policy(0, Duration::from_secs(60)), &CancellationToken::new())
        .await;

    assert_eq!(report.attempts, 1);
    assert!(matches!(
        report.outcome,
        FetchOutcome::TransportExhausted { .. }
    ));
}

#[tokio::test]
async fn test_retry_delay_is_applied_between_attempts() {
    let delay = Duration::from_millis(25);
    let fetcher = ConfigFetcher::new(ScriptedSource::always(Scripted::Status(500)));

    let started = Instant::now();
    let report = fetcher
        .fetch(&policy(2, delay), &CancellationToken::new())
        .await;
    let elapsed = started.elapsed();

    assert_eq!(report.attempts, 3);
    // Two waits between three attempts
    assert!(elapsed >= delay * 2, "elapsed {:?}", elapsed);
}

#[tokio::test]
async fn test_cancelled_before_start_makes_no_request() {
    let token = CancellationToken::new();
    token.cancel();
    let fetcher = ConfigFetcher::new(ScriptedSource::always(Scripted::Body(VALID_BODY)));

    let report = fetcher.fetch(&policy(3, Duration::ZERO), &token).await;

    assert_eq!(report.attempts, 0);
    assert_eq!(report.outcome, FetchOutcome::Cancelled);
    assert_eq!(fetcher.source().requests(), 0);
}

#[tokio::test]
async fn test_cancellation_interrupts_retry_wait() {
    let token = CancellationToken::new();
    let fetcher = ConfigFetcher::new(ScriptedSource::always(Scripted::Status(500)));

    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    // The wait would take an hour if the token were ignored
    let report = tokio::time::timeout(
        Duration::from_secs(5),
        fetcher.fetch(&policy(3, Duration::from_secs(3600)), &token),
    )
    .await
    .expect("cancellation must cut the retry wait short");

    assert_eq!(report.attempts, 1);
    assert_eq!(
        report.into_result().unwrap_err(),
        FetchFailure::Cancelled { attempts: 1 }
    );
}

#[tokio::test]
async fn test_cancellation_from_another_task() {
    let token = CancellationToken::new();
    let fetcher = ConfigFetcher::new(ScriptedSource::always(Scripted::Refused));

    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let report = fetcher
        .fetch(&policy(1000, Duration::from_millis(5)), &token)
        .await;

    assert_eq!(report.outcome, FetchOutcome::Cancelled);
    assert!(report.attempts >= 1);
    assert!(report.attempts < 1001);
}

#[tokio::test]
async fn test_cancellation_during_request_discards_valid_body() {
    let token = CancellationToken::new();
    let source =
        ScriptedSource::always(Scripted::Body(VALID_BODY)).cancelling_after(1, token.clone());
    let fetcher = ConfigFetcher::new(source);

    let report = fetcher.fetch(&policy(3, Duration::ZERO), &token).await;

    assert_eq!(report.attempts, 1);
    assert_eq!(report.outcome, FetchOutcome::Cancelled);
    assert_eq!(fetcher.source().requests(), 1);
}

#[tokio::test]
async fn test_cancellation_during_last_attempt_is_not_exhaustion() {
    let token = CancellationToken::new();
    let source = ScriptedSource::always(Scripted::Status(500)).cancelling_after(1, token.clone());
    let fetcher = ConfigFetcher::new(source);

    let report = fetcher.fetch(&policy(0, Duration::ZERO), &token).await;

    assert_eq!(
        report.into_result().unwrap_err(),
        FetchFailure::Cancelled { attempts: 1 }
    );
}

#[tokio::test]
async fn test_cancellation_aborts_hanging_request() {
    let token = CancellationToken::new();
    let fetcher = ConfigFetcher::new(ScriptedSource::always(Scripted::Hang));

    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let report = tokio::time::timeout(
        Duration::from_secs(5),
        fetcher.fetch(&policy(3, Duration::ZERO), &token),
    )
    .await
    .expect("cancellation must abort the in-flight request");

    assert_eq!(report.attempts, 1);
    assert_eq!(report.outcome, FetchOutcome::Cancelled);
}

#[tokio::test]
async fn test_unbounded_retry_budget_counts_attempts() {
    let token = CancellationToken::new();
    let source = ScriptedSource::always(Scripted::Refused).cancelling_after(3, token.clone());
    let fetcher = ConfigFetcher::new(source);
    let policy = policy(u32::MAX, Duration::ZERO);

    let report = fetcher.fetch(&policy, &token).await;

    assert_eq!(policy.max_attempts(), u32::MAX);
    assert_eq!(report.attempts, 3);
    assert_eq!(report.outcome, FetchOutcome::Cancelled);
}
