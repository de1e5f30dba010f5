// Author: Jacques Murray

use retryer::{ExponentialWait, OnError, RetryAttempt, Retryer};
use std::time::{Duration, Instant};
use thiserror::Error;

// Define a proper error type
#[derive(Debug, Error)]
#[error("Operation failed: {message}")]
struct OperationError {
    message: String,
}

// A mock function that will fail 3 times before succeeding.
async fn flaky_operation() -> Result<String, OperationError> {
    // Use a static to track attempts across calls
    static ATTEMPTS: tokio::sync::Mutex<u32> = tokio::sync::Mutex::const_new(0);

    let mut attempts = ATTEMPTS.lock().await;
    *attempts += 1;

    if *attempts <= 3 {
        Err(OperationError {
            message: format!("Failed on attempt {}", *attempts),
        })
    } else {
        Ok("Got the data!".to_string())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Running Simple Retry Example ---");

    // Retry every failure with exponential backoff, at most 5 attempts.
    let retryer = Retryer::new()
        .condition(OnError)
        .wait(ExponentialWait::new(Duration::from_millis(100)))
        .max_attempt(5)?
        .listen(|attempt: &RetryAttempt<String, OperationError>| {
            match attempt.error() {
                Some(e) => println!("Attempt {}: {}", attempt.attempt(), e),
                None => println!("Attempt {}: Succeeded.", attempt.attempt()),
            }
        });

    let start = Instant::now();

    // The operation is a closure that returns the async block (Future)
    let result = retryer.retry(|| async { flaky_operation().await }).await;

    println!("\n--- Result ---");
    match result {
        Ok(data) => println!("Success: {}", data),
        Err(e) => println!("Failed: {}", e),
    }
    println!("Total time: {:?}", start.elapsed());
    Ok(())
}
