// Author: Jacques Murray

use futures_core::future::BoxFuture;
use retryer::{
    Always, AnyStop, Block, ErrorMatches, Fallback, FixedWait, IncreaseWait, MaxAttempt, MaxElapsed,
    NoBlock, OnError, ResultMatches, RetryAttempt, Retryer, WaitSum,
};
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

// A simple error for testing
#[derive(Debug, PartialEq, Eq, Clone)]
struct TestError(String);

// Implement Error for our test error
impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for TestError {}

// A stateful operation for testing
#[derive(Clone)]
struct Op {
    // Use Arc<AtomicU32> for thread-safe interior mutability
    attempts: Arc<AtomicU32>,
    succeed_on: u32,
    error_to_return: TestError,
}

impl Op {
    fn new(succeed_on: u32, error: &str) -> Self {
        Self {
            attempts: Arc::new(AtomicU32::new(0)),
            succeed_on,
            error_to_return: TestError(error.to_string()),
        }
    }

    // The operation itself - clones self so it can be called multiple times
    fn run(&self) -> impl Future<Output = Result<u32, TestError>> {
        let op = self.clone();
        async move {
            let current = op.attempts.fetch_add(1, Ordering::SeqCst) + 1;

            if current == op.succeed_on {
                Ok(current)
            } else {
                Err(TestError(format!("{} #{}", op.error_to_return.0, current)))
            }
        }
    }

    fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

/// Records every pause instead of sleeping.
#[derive(Clone, Default)]
struct RecordingBlock {
    pauses: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingBlock {
    fn pauses(&self) -> Vec<Duration> {
        self.pauses.lock().unwrap().clone()
    }
}

impl Block for RecordingBlock {
    fn block(&self, duration: Duration) -> BoxFuture<'_, ()> {
        self.pauses.lock().unwrap().push(duration);
        Box::pin(std::future::ready(()))
    }
}

/// Shared log of listener and recover calls, in order.
#[derive(Clone, Default)]
struct Journal {
    events: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }

    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn listener(&self) -> impl Fn(&RetryAttempt<u32, TestError>) + Send + Sync + 'static {
        let journal = self.clone();
        move |attempt: &RetryAttempt<u32, TestError>| {
            journal.record(format!("listen {}", attempt.attempt()))
        }
    }

    fn recover(
        &self,
    ) -> impl Fn(RetryAttempt<u32, TestError>) -> Result<u32, TestError> + Send + Sync + 'static
    {
        let journal = self.clone();
        move |attempt: RetryAttempt<u32, TestError>| {
            journal.record(format!("recover {}", attempt.attempt()));
            attempt.into_outcome()
        }
    }
}

#[tokio::test]
async fn test_default_condition_runs_once_and_propagates_failure() {
    let op = Op::new(10, "fail");
    let journal = Journal::default();
    let retryer = Retryer::new()
        .listen(journal.listener())
        .recover(journal.recover());

    let op_clone = op.clone();
    let result = retryer.retry(move || op_clone.run()).await;

    assert_eq!(result, Err(TestError("fail #1".to_string())));
    assert_eq!(op.attempts(), 1);
    assert_eq!(journal.events(), vec!["listen 1", "recover 1"]);
}

#[tokio::test]
async fn test_default_configuration_returns_value() {
    let op = Op::new(1, "fail");
    let journal = Journal::default();
    let retryer = Retryer::new()
        .listen(journal.listener())
        .recover(journal.recover());

    let op_clone = op.clone();
    let result = retryer.retry(move || op_clone.run()).await;

    assert_eq!(result, Ok(1));
    assert_eq!(op.attempts(), 1);
    assert_eq!(journal.events(), vec!["listen 1"]);
}

#[tokio::test]
async fn test_exhausted_retries_recover_once_with_last_attempt() {
    let op = Op::new(100, "fail");
    let journal = Journal::default();
    let retryer = Retryer::new()
        .condition(OnError)
        .max_attempt(3)
        .unwrap()
        .block(NoBlock)
        .listen(journal.listener())
        .recover(journal.recover());

    let op_clone = op.clone();
    let result = retryer.retry(move || op_clone.run()).await;

    // Default recover re-raises the third failure.
    assert_eq!(result, Err(TestError("fail #3".to_string())));
    assert_eq!(op.attempts(), 3);
    assert_eq!(
        journal.events(),
        vec!["listen 1", "listen 2", "listen 3", "recover 3"]
    );
}

#[tokio::test]
async fn test_success_on_third_try() {
    let op = Op::new(3, "fail");
    let journal = Journal::default();
    let block = RecordingBlock::default();
    let retryer = Retryer::new()
        .condition(OnError)
        .max_attempt(5)
        .unwrap()
        .wait(FixedWait::new(Duration::from_millis(10)))
        .block(block.clone())
        .listen(journal.listener())
        .recover(journal.recover());

    let op_clone = op.clone();
    let result = retryer.retry(move || op_clone.run()).await;

    assert_eq!(result, Ok(3));
    assert_eq!(op.attempts(), 3);
    // Blocked between 1 -> 2 and 2 -> 3 only.
    assert_eq!(block.pauses(), vec![Duration::from_millis(10); 2]);
    assert_eq!(journal.events(), vec!["listen 1", "listen 2", "listen 3"]);
}

#[tokio::test]
async fn test_waits_are_summed() {
    let op = Op::new(100, "fail");
    let block = RecordingBlock::default();
    let retryer = Retryer::new()
        .condition(OnError)
        .max_attempt(4)
        .unwrap()
        .wait(FixedWait::new(Duration::from_millis(5)))
        .wait(IncreaseWait::new(
            Duration::from_millis(100),
            Duration::from_millis(100),
        ))
        .block(block.clone());

    let op_clone = op.clone();
    let _ = retryer.retry(move || op_clone.run()).await;

    assert_eq!(
        block.pauses(),
        vec![
            Duration::from_millis(105),
            Duration::from_millis(205),
            Duration::from_millis(305),
        ]
    );
}

#[tokio::test]
async fn test_no_waits_means_zero_delay() {
    let op = Op::new(2, "fail");
    let block = RecordingBlock::default();
    let retryer = Retryer::new()
        .condition(OnError)
        .waits(WaitSum::new())
        .block(block.clone());

    let op_clone = op.clone();
    let result = retryer.retry(move || op_clone.run()).await;

    assert_eq!(result, Ok(2));
    assert_eq!(block.pauses(), vec![Duration::ZERO]);
}

#[tokio::test]
async fn test_failure_on_condition() {
    let op = Op::new(10, "PERMANENT");
    let retryer = Retryer::new()
        .condition(ErrorMatches::new(|e: &TestError| !e.0.starts_with("PERMANENT")))
        .max_attempt(5)
        .unwrap()
        .block(NoBlock);

    let op_clone = op.clone();
    let result = retryer.retry(move || op_clone.run()).await;

    assert_eq!(result, Err(TestError("PERMANENT #1".to_string())));
    // Should fail on the very first attempt
    assert_eq!(op.attempts(), 1);
}

#[tokio::test]
async fn test_or_condition_retries_on_either() {
    let polls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&polls);
    // Fails once, then reports "not ready" (0) once, then is ready.
    let operation = move || {
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            match n {
                1 => Err(TestError("transient".to_string())),
                2 => Ok(0),
                _ => Ok(n),
            }
        }
    };

    let retryer = Retryer::new()
        .condition(OnError)
        .or_condition(ResultMatches::new(|v: &u32| *v == 0))
        .max_attempt(10)
        .unwrap()
        .block(NoBlock);

    let result = retryer.retry(operation).await;

    assert_eq!(result, Ok(3));
    assert_eq!(polls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_recover_never_runs_on_terminal_success() {
    let op = Op::new(2, "fail");
    let journal = Journal::default();
    // Stops after two attempts; the second one succeeds.
    let retryer = Retryer::new()
        .condition(OnError)
        .max_attempt(2)
        .unwrap()
        .block(NoBlock)
        .recover(journal.recover());

    let op_clone = op.clone();
    let result = retryer.retry(move || op_clone.run()).await;

    assert_eq!(result, Ok(2));
    assert!(journal.events().is_empty());
}

#[tokio::test]
async fn test_fallback_replaces_terminal_failure() {
    let op = Op::new(100, "fail");
    let retryer = Retryer::new()
        .condition(OnError)
        .block(NoBlock)
        .recover(Fallback::new(7));

    let op_clone = op.clone();
    let result = retryer.retry(move || op_clone.run()).await;

    assert_eq!(result, Ok(7));
    assert_eq!(op.attempts(), 3); // the default max attempt
}

#[tokio::test]
async fn test_failure_on_max_elapsed() {
    let op = Op::new(100, "fail");
    let retryer = Retryer::new()
        .condition(OnError)
        .wait(FixedWait::new(Duration::from_millis(50)))
        .stop(
            AnyStop::new()
                .or(MaxAttempt::new(10).unwrap())
                .or(MaxElapsed::new(Duration::from_millis(90))),
        );

    let start = Instant::now();
    let op_clone = op.clone();
    let result = retryer.retry(move || op_clone.run()).await;

    assert!(result.is_err());
    // Runs at ~0ms, ~50ms and ~100ms; the third attempt is past the budget.
    assert_eq!(op.attempts(), 3);
    assert!(start.elapsed() >= Duration::from_millis(100));
}

#[tokio::test]
async fn test_sleep_block_actually_waits() {
    let op = Op::new(10, "fail");
    let retryer = Retryer::new()
        .condition(OnError)
        .max_attempt(4)
        .unwrap()
        .wait(FixedWait::new(Duration::from_millis(10)));

    let start = Instant::now();
    let op_clone = op.clone();
    let result = retryer.retry(move || op_clone.run()).await;

    assert_eq!(result, Err(TestError("fail #4".to_string())));
    assert_eq!(op.attempts(), 4);
    // Slept 3 times (10ms + 10ms + 10ms)
    assert!(start.elapsed() >= Duration::from_millis(30));
}

#[tokio::test]
async fn test_shared_retryer_across_tasks() {
    let retryer = Arc::new(
        Retryer::new()
            .condition(OnError)
            .max_attempt(5)
            .unwrap()
            .wait(FixedWait::new(Duration::from_millis(1))),
    );

    let mut handles = Vec::new();
    for succeed_on in 1..=4 {
        let retryer = Arc::clone(&retryer);
        handles.push(tokio::spawn(async move {
            let op = Op::new(succeed_on, "fail");
            let op_clone = op.clone();
            let result = retryer.retry(move || op_clone.run()).await;
            (result, op.attempts())
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let expected = i as u32 + 1;
        assert_eq!(handle.await.unwrap(), (Ok(expected), expected));
    }
}

#[tokio::test]
async fn test_panicking_listener_aborts_the_retry() {
    let op = Op::new(100, "fail");
    let retryer = Retryer::new()
        .condition(Always)
        .block(NoBlock)
        .listen(|_: &RetryAttempt<u32, TestError>| panic!("listener"));

    let op_clone = op.clone();
    let handle = tokio::spawn(async move { retryer.retry(move || op_clone.run()).await });

    assert!(handle.await.unwrap_err().is_panic());
    assert_eq!(op.attempts(), 1);
}

#[tokio::test]
async fn test_panicking_condition_aborts_the_retry() {
    let op = Op::new(100, "fail");
    let journal = Journal::default();
    let retryer = Retryer::new()
        .condition(|_: &RetryAttempt<u32, TestError>| -> bool { panic!("condition") })
        .max_attempt(5)
        .unwrap()
        .block(NoBlock)
        .recover(journal.recover());

    let op_clone = op.clone();
    let handle = tokio::spawn(async move { retryer.retry(move || op_clone.run()).await });

    assert!(handle.await.unwrap_err().is_panic());
    assert_eq!(op.attempts(), 1);
    // Recover is not a fallback for a broken policy.
    assert!(journal.events().is_empty());
}

#[test]
fn test_zero_max_attempt_is_a_config_error() {
    let err = Retryer::<u32, TestError>::new().max_attempt(0).unwrap_err();
    assert_eq!(err, retryer::ConfigError::ZeroMaxAttempts);
    assert_eq!(err.to_string(), "max attempts must be at least 1 (got 0)");
}
