//! Fixed-delay retry policy.
//!
//! Submission retries are deliberately simple: a fixed attempt budget and a
//! fixed inter-attempt delay, no backoff. The policy is separate from the
//! operation it wraps so the submission logic stays testable on its own.

use std::fmt;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Outcome of a retried operation that never succeeded.
#[derive(Debug, Error)]
pub enum RetryError<E: fmt::Display + fmt::Debug> {
	/// The operation failed with an error the predicate marked non-retryable.
	#[error("{0}")]
	Fatal(E),
	/// The attempt budget ran out; carries the last underlying error.
	#[error("Exhausted {attempts} attempts: {last}")]
	Exhausted {
		/// Number of attempts made.
		attempts: u32,
		/// Error from the final attempt.
		last: E,
	},
}

/// A fixed attempt budget with a fixed delay between attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
	/// Maximum number of attempts, including the first.
	pub max_attempts: u32,
	/// Delay slept between consecutive attempts.
	pub delay: Duration,
}

impl RetryPolicy {
	/// Creates a policy. An attempt budget of zero is treated as one; the
	/// operation always runs at least once.
	pub fn new(max_attempts: u32, delay: Duration) -> Self {
		Self {
			max_attempts: max_attempts.max(1),
			delay,
		}
	}

	/// Runs `operation` until it succeeds, fails non-retryably, or the
	/// attempt budget is exhausted.
	///
	/// The operation receives the 1-based attempt number. `retryable` decides
	/// whether an error is worth another attempt; a non-retryable error
	/// aborts immediately without sleeping.
	pub async fn run<T, E, F, Fut, P>(&self, retryable: P, mut operation: F) -> Result<T, RetryError<E>>
	where
		E: fmt::Display + fmt::Debug,
		F: FnMut(u32) -> Fut,
		Fut: Future<Output = Result<T, E>>,
		P: Fn(&E) -> bool,
	{
		let mut attempt = 0;
		loop {
			attempt += 1;
			match operation(attempt).await {
				Ok(value) => return Ok(value),
				Err(err) if !retryable(&err) => return Err(RetryError::Fatal(err)),
				Err(err) => {
					if attempt >= self.max_attempts {
						return Err(RetryError::Exhausted {
							attempts: attempt,
							last: err,
						});
					}
					tracing::warn!(
						attempt,
						max_attempts = self.max_attempts,
						error = %err,
						delay_secs = self.delay.as_secs(),
						"Attempt failed, retrying"
					);
					tokio::time::sleep(self.delay).await;
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicU32, Ordering};

	fn fast_policy(max_attempts: u32) -> RetryPolicy {
		RetryPolicy::new(max_attempts, Duration::from_millis(1))
	}

	#[tokio::test]
	async fn succeeds_on_third_attempt_with_exactly_three_calls() {
		let calls = AtomicU32::new(0);
		let result = fast_policy(3)
			.run(
				|_: &&str| true,
				|attempt| {
					calls.fetch_add(1, Ordering::SeqCst);
					async move {
						if attempt < 3 {
							Err("try again")
						} else {
							Ok(attempt)
						}
					}
				},
			)
			.await;

		assert_eq!(result.unwrap(), 3);
		assert_eq!(calls.load(Ordering::SeqCst), 3);
	}

	#[tokio::test]
	async fn exhausts_budget_after_exactly_three_calls() {
		let calls = AtomicU32::new(0);
		let result: Result<(), _> = fast_policy(3)
			.run(
				|_: &&str| true,
				|_| {
					calls.fetch_add(1, Ordering::SeqCst);
					async { Err("always failing") }
				},
			)
			.await;

		assert_eq!(calls.load(Ordering::SeqCst), 3);
		match result.unwrap_err() {
			RetryError::Exhausted { attempts, last } => {
				assert_eq!(attempts, 3);
				assert_eq!(last, "always failing");
			}
			other => panic!("expected exhaustion, got {:?}", other),
		}
	}

	#[tokio::test]
	async fn non_retryable_error_aborts_after_one_call() {
		let calls = AtomicU32::new(0);
		let result: Result<(), _> = fast_policy(3)
			.run(
				|e: &&str| *e != "fatal",
				|_| {
					calls.fetch_add(1, Ordering::SeqCst);
					async { Err("fatal") }
				},
			)
			.await;

		assert_eq!(calls.load(Ordering::SeqCst), 1);
		assert!(matches!(result.unwrap_err(), RetryError::Fatal("fatal")));
	}

	#[tokio::test]
	async fn zero_budget_still_runs_once() {
		let calls = AtomicU32::new(0);
		let result = fast_policy(0)
			.run(
				|_: &&str| true,
				|_| {
					calls.fetch_add(1, Ordering::SeqCst);
					async { Ok::<_, &str>(42) }
				},
			)
			.await;

		assert_eq!(result.unwrap(), 42);
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}
}
