// Author: Jacques Murray

mod common;

use common::{should_retry_api_error, ApiError};
use retryer::{ErrorMatches, ExponentialWait, Recover, RetryAttempt, Retryer};
use std::time::Duration;

/// A mock API fetcher.
/// We use `httpstat.us` to force specific HTTP error codes.
async fn fetch_important_data(status_code: u16) -> Result<String, ApiError> {
    let url = format!("https://httpstat.us/{}", status_code);
    println!("Fetching {}...", url);

    let res = reqwest::get(&url).await.map_err(ApiError::Connection)?;

    let status = res.status();
    let text = res.text().await.map_err(ApiError::Connection)?;

    match status {
        s if s.is_success() => Ok(text),
        s if s.is_client_error() => Err(ApiError::ClientError(format!("{}: {}", s, text))),
        s if s.is_server_error() => Err(ApiError::ServerError(format!("{}: {}", s, text))),
        _ => Err(ApiError::ServerError("Unknown error".to_string())),
    }
}

/// Serves a placeholder once server errors are exhausted, but lets
/// client errors through.
struct ServeStale;

impl Recover<String, ApiError> for ServeStale {
    fn recover(&self, attempt: RetryAttempt<String, ApiError>) -> Result<String, ApiError> {
        match attempt.into_outcome() {
            Err(ApiError::ServerError(_)) => Ok("<stale data>".to_string()),
            other => other,
        }
    }
}

async fn run_example(code: u16, desc: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n--- Running Conditional Retry: {} ({}) ---", desc, code);

    let retryer = Retryer::new()
        .condition(ErrorMatches::new(should_retry_api_error)) // Use our custom condition
        .wait(ExponentialWait::new(Duration::from_millis(200)))
        .max_attempt(3)?
        .recover(ServeStale);

    // The operation closure captures the status code
    let operation = move || async move { fetch_important_data(code).await };

    match retryer.retry(operation).await {
        Ok(data) => println!("Success: {}", data),
        Err(e) => println!("Failed: {}", e),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Test server error (should retry, then serve stale data)
    // 503 Service Unavailable is retryable
    run_example(503, "Server Error (503)").await?;

    // 2. Test client error (should fail immediately)
    // 404 Not Found is NOT retryable
    run_example(404, "Client Error (404)").await?;
    Ok(())
}
