//! Waiting for zonal operations.
//!
//! Mutating Compute calls return an `Operation` that must be polled until its
//! status is `DONE`. Polling backs off exponentially between attempts, gives
//! up after a deadline, and tolerates a bounded run of transient failures.

use std::time::{Duration, Instant};

use crate::gcp::error::{ComputeError, Result};
use crate::gcp::gce::client::ComputeClient;
use crate::gcp::gce::types::{Operation, OperationStatus};

/// Shortest delay ever used between polls, whatever the config says.
pub const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// Timing policy for `wait_for_operation`.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay before the second poll.
    pub initial_interval: Duration,
    /// Upper bound on the delay between polls.
    pub max_interval: Duration,
    /// Growth factor applied to the delay after every unfinished poll.
    pub multiplier: f64,
    /// Maximum total time to wait for `DONE`.
    pub timeout: Duration,
    /// Consecutive transient poll failures tolerated before giving up.
    pub max_transient_errors: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(10),
            multiplier: 2.0,
            timeout: Duration::from_secs(300),
            max_transient_errors: 3,
        }
    }
}

impl PollConfig {
    /// Delay before the second poll, floored at `MIN_INTERVAL`.
    pub fn first_interval(&self) -> Duration {
        self.initial_interval.max(MIN_INTERVAL).min(self.cap())
    }

    /// The delay that follows `current`. Never below `MIN_INTERVAL`, never
    /// above `max_interval`; a product too large for `Duration` saturates at
    /// the cap.
    pub fn next_interval(&self, current: Duration) -> Duration {
        let cap = self.cap();
        // `f64::max` also maps a NaN multiplier to 1.0.
        let secs = current.max(MIN_INTERVAL).as_secs_f64() * self.multiplier.max(1.0);
        Duration::try_from_secs_f64(secs).unwrap_or(cap).min(cap)
    }

    fn cap(&self) -> Duration {
        self.max_interval.max(MIN_INTERVAL)
    }
}

/// Progress events emitted while waiting on an operation
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    Started {
        operation: String,
    },
    /// One successful poll with the status it reported
    Polling {
        operation: String,
        status: OperationStatus,
        progress: Option<u32>,
        elapsed: Duration,
    },
    Completed {
        operation: String,
        target_link: Option<String>,
    },
    Failed {
        operation: String,
        error: String,
    },
}

/// Callback type for progress updates
///
/// The CLI uses this to drive a spinner.
pub type ProgressCallback = Box<dyn Fn(ProgressEvent) + Send + Sync>;

/// Polls `operation` until it reports `DONE`.
///
/// Returns the finished operation, or
/// - `OperationFailed` if it finished with an error payload,
/// - `OperationTimeout` if `config.timeout` elapsed first,
/// - the poll error itself if it is not transient, or if more than
///   `config.max_transient_errors` transient errors happened in a row.
pub async fn wait_for_operation(
    client: &ComputeClient,
    project_id: &str,
    zone: &str,
    operation: &str,
    config: &PollConfig,
    on_progress: Option<ProgressCallback>,
) -> Result<Operation> {
    let start = Instant::now();
    let mut interval = config.first_interval();
    let mut transient_errors = 0u32;

    tracing::info!(%operation, %zone, "waiting for operation to finish");
    emit(
        &on_progress,
        ProgressEvent::Started {
            operation: operation.to_string(),
        },
    );

    loop {
        match client.get_operation(project_id, zone, operation).await {
            Ok(op) => {
                transient_errors = 0;
                emit(
                    &on_progress,
                    ProgressEvent::Polling {
                        operation: operation.to_string(),
                        status: op.status,
                        progress: op.progress,
                        elapsed: start.elapsed(),
                    },
                );

                if op.is_done() {
                    return finish(op, operation, &on_progress);
                }
                tracing::debug!(%operation, status = %op.status, "operation still in progress");
            }
            Err(e) if e.is_transient() && transient_errors < config.max_transient_errors => {
                transient_errors += 1;
                tracing::warn!(
                    %operation,
                    attempt = transient_errors,
                    error = %e,
                    "transient error while polling operation"
                );
            }
            Err(e) => {
                emit(
                    &on_progress,
                    ProgressEvent::Failed {
                        operation: operation.to_string(),
                        error: e.to_string(),
                    },
                );
                return Err(e);
            }
        }

        let elapsed = start.elapsed();
        if elapsed >= config.timeout {
            let err = ComputeError::OperationTimeout {
                name: operation.to_string(),
                timeout: config.timeout,
            };
            emit(
                &on_progress,
                ProgressEvent::Failed {
                    operation: operation.to_string(),
                    error: err.to_string(),
                },
            );
            return Err(err);
        }

        // Never sleep past the deadline; the last poll happens right at it.
        tokio::time::sleep(interval.min(config.timeout - elapsed)).await;
        interval = config.next_interval(interval);
    }
}

fn finish(
    op: Operation,
    operation: &str,
    on_progress: &Option<ProgressCallback>,
) -> Result<Operation> {
    if let Some(error) = op.error.clone() {
        tracing::error!(%operation, %error, "operation finished with errors");
        emit(
            on_progress,
            ProgressEvent::Failed {
                operation: operation.to_string(),
                error: error.to_string(),
            },
        );
        return Err(ComputeError::OperationFailed {
            name: operation.to_string(),
            error,
        });
    }

    tracing::info!(%operation, "operation done");
    emit(
        on_progress,
        ProgressEvent::Completed {
            operation: operation.to_string(),
            target_link: op.target_link.clone(),
        },
    );
    Ok(op)
}

/// Helper to emit progress events
fn emit(callback: &Option<ProgressCallback>, event: ProgressEvent) {
    if let Some(cb) = callback {
        cb(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_then_caps() {
        let config = PollConfig::default();
        let mut interval = config.first_interval();
        let mut seen = vec![interval];
        for _ in 0..5 {
            interval = config.next_interval(interval);
            seen.push(interval);
        }
        let secs: Vec<u64> = seen.iter().map(|d| d.as_secs()).collect();
        assert_eq!(secs, [1, 2, 4, 8, 10, 10]);
    }

    #[test]
    fn multiplier_below_one_never_shrinks_interval() {
        let config = PollConfig {
            multiplier: 0.5,
            ..PollConfig::default()
        };
        assert_eq!(
            config.next_interval(Duration::from_secs(3)),
            Duration::from_secs(3)
        );
    }

    #[test]
    fn zero_intervals_are_floored() {
        let config = PollConfig {
            initial_interval: Duration::ZERO,
            max_interval: Duration::ZERO,
            ..PollConfig::default()
        };
        assert_eq!(config.first_interval(), MIN_INTERVAL);
        assert_eq!(config.next_interval(Duration::ZERO), MIN_INTERVAL);
    }

    #[test]
    fn huge_multiplier_saturates_at_cap() {
        for multiplier in [f64::INFINITY, f64::MAX, 1e300, f64::NAN] {
            let config = PollConfig {
                multiplier,
                ..PollConfig::default()
            };
            let next = config.next_interval(Duration::from_secs(1));
            assert!(next <= config.max_interval, "{multiplier}: {next:?}");
            assert!(next >= Duration::from_secs(1), "{multiplier}: {next:?}");
        }
    }

    #[test]
    fn done_with_error_fails() {
        let op = Operation {
            name: "op-1".to_string(),
            status: OperationStatus::Done,
            error: Some(crate::gcp::gce::types::OperationError {
                errors: vec![crate::gcp::gce::types::OperationErrorItem {
                    code: "QUOTA_EXCEEDED".to_string(),
                    message: "Quota 'CPUS' exceeded".to_string(),
                    location: None,
                }],
            }),
            ..Operation::default()
        };
        let err = finish(op, "op-1", &None).unwrap_err();
        match err {
            ComputeError::OperationFailed { name, error } => {
                assert_eq!(name, "op-1");
                assert_eq!(error.errors[0].code, "QUOTA_EXCEEDED");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn done_without_error_reports_completion() {
        use std::sync::{Arc, Mutex};

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let callback: Option<ProgressCallback> = Some(Box::new(move |event| {
            sink.lock().unwrap().push(event);
        }));

        let op = Operation {
            name: "op-2".to_string(),
            status: OperationStatus::Done,
            target_link: Some("projects/p/zones/z/instances/vm".to_string()),
            ..Operation::default()
        };
        let done = finish(op, "op-2", &callback).unwrap();
        assert!(done.is_done());

        let events = events.lock().unwrap();
        assert!(matches!(
            events.as_slice(),
            [ProgressEvent::Completed { target_link: Some(_), .. }]
        ));
    }
}
