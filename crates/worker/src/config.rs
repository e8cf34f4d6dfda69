use std::time::Duration;

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// How often the queue is polled when idle.
    pub poll_interval: Duration,
    /// Name recorded on claimed jobs and heartbeats.
    pub worker_name: String,
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                      |
    /// |---------------------------|------------------------------|
    /// | `WORKER_POLL_INTERVAL_MS` | `1000`                       |
    /// | `WORKER_NAME`             | `{HOSTNAME}-{pid}` or `worker-{pid}` |
    pub fn from_env() -> Self {
        let poll_interval_ms: u64 = std::env::var("WORKER_POLL_INTERVAL_MS")
            .unwrap_or_else(|_| "1000".into())
            .parse()
            .expect("WORKER_POLL_INTERVAL_MS must be a valid u64");

        let worker_name = std::env::var("WORKER_NAME").unwrap_or_else(|_| {
            let host = std::env::var("HOSTNAME").unwrap_or_else(|_| "worker".into());
            format!("{host}-{}", std::process::id())
        });

        Self {
            poll_interval: Duration::from_millis(poll_interval_ms),
            worker_name,
        }
    }
}
