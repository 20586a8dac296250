//! resilient-exec
//!
//! Runs a simulated flaky operation through the resilient executor and
//! prints the outcome as JSON.
//!
//! ```text
//!   config file ──┐
//!                 ├─▶ ExecutorConfig ─▶ ResilientExecutor ─▶ Outcome ─▶ JSON
//!   CLI flags  ───┘         │                  │
//!                           │                  └─▶ TracingReporter (stderr)
//!                           └─▶ validation
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use serde::Serialize;

use resilient_executor::config::{check_config, read_config, ConfigError, ExecutorConfig};
use resilient_executor::observability::logging::init_logging;
use resilient_executor::{Outcome, ResilientExecutor};

#[derive(Parser)]
#[command(name = "resilient-exec")]
#[command(
    about = "Run a simulated flaky operation under a retry and timeout policy",
    long_about = None
)]
struct Cli {
    /// TOML config file with [retry], [timeout] and [observability] tables
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    max_attempts: Option<u32>,

    #[arg(long)]
    base_delay_ms: Option<u64>,

    #[arg(long)]
    max_delay_ms: Option<u64>,

    /// Disable full jitter
    #[arg(long)]
    no_jitter: bool,

    /// Per-attempt deadline
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Number of initial calls that fail
    #[arg(long, default_value_t = 0)]
    fail_first: u32,

    /// Simulated latency of every call
    #[arg(long, default_value_t = 10)]
    latency_ms: u64,

    /// Value returned on success
    #[arg(long, default_value_t = 42)]
    value: i64,
}

#[derive(Debug, Serialize)]
struct RunReport {
    status: &'static str,
    attempts: u32,
    calls: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Cli {
    fn apply(&self, config: &mut ExecutorConfig) {
        if let Some(n) = self.max_attempts {
            config.retry.max_attempts = n;
        }
        if let Some(ms) = self.base_delay_ms {
            config.retry.base_delay_ms = ms;
        }
        if let Some(ms) = self.max_delay_ms {
            config.retry.max_delay_ms = ms;
        }
        if self.no_jitter {
            config.retry.jitter = false;
        }
        if let Some(ms) = self.timeout_ms {
            config.timeout.per_attempt_ms = ms;
        }
    }

    /// File values, then flag overrides, validated once as a whole.
    fn resolve_config(&self) -> Result<ExecutorConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => ExecutorConfig::default(),
        };
        self.apply(&mut config);
        check_config(&config)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = cli.resolve_config()?;

    init_logging(&config.observability.log_level)?;

    tracing::info!(
        max_attempts = config.retry.max_attempts,
        base_delay_ms = config.retry.base_delay_ms,
        max_delay_ms = config.retry.max_delay_ms,
        jitter = config.retry.jitter,
        per_attempt_ms = config.timeout.per_attempt_ms,
        "Configuration loaded"
    );

    let calls = Arc::new(AtomicU32::new(0));
    let latency = Duration::from_millis(cli.latency_ms);
    let fail_first = cli.fail_first;
    let value = cli.value;

    let executor = ResilientExecutor::from_config(&config);
    let (retry, timeout) = config.policies();
    let outcome = executor
        .execute(
            || {
                let call = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    tokio::time::sleep(latency).await;
                    if call < fail_first {
                        Err(format!("simulated failure {} of {}", call + 1, fail_first))
                    } else {
                        Ok(value)
                    }
                }
            },
            &retry,
            &timeout,
        )
        .await;

    let calls = calls.load(Ordering::SeqCst);
    let report = match outcome {
        Outcome::Success { value, attempts } => RunReport {
            status: "success",
            attempts,
            calls,
            value: Some(value),
            kind: None,
            error: None,
        },
        Outcome::Failure { error, attempts } => RunReport {
            status: "failure",
            attempts,
            calls,
            value: None,
            kind: Some(error.kind().as_str()),
            error: Some(error.to_string()),
        },
    };

    println!("{}", serde_json::to_string_pretty(&report)?);

    if report.status == "success" {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
