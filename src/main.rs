//! pocreport CLI entry point
//!
//! Drives the reporter with simulated workers so its output can be seen
//! without a database.

use anyhow::{Context, Result};
use pocreport::config::cli::Cli;
use pocreport::config::{toml, validator, Config};
use pocreport::{schedule, Reporter, StaticShardCounter, TestResults};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pocreport=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_args();
    cli.validate()?;

    let config = toml::load_config(&cli)?;
    validator::validate_config(&config).context("Configuration validation failed")?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    runtime.block_on(run_test(config))
}

/// Run one simulated test: workers, periodic reports, final summary
async fn run_test(config: Config) -> Result<()> {
    let results = Arc::new(TestResults::new(
        &config.report.op_types,
        &config.report.slow_thresholds_ms,
        config.run.initial_count,
    ));
    let cluster = Arc::new(StaticShardCounter(config.report.num_shards));

    info!(
        threads = config.run.threads,
        duration_secs = config.run.duration_secs,
        log_file = ?config.report.log_file,
        "starting simulated load test"
    );

    let reporter = Reporter::new(Arc::clone(&results), config.report.clone(), cluster);
    let handle = schedule::spawn(reporter, Duration::from_millis(config.run.tick_ms));

    let stop = Arc::new(AtomicBool::new(false));
    let workers: Vec<JoinHandle<()>> = (0..config.run.threads)
        .map(|id| {
            let results = Arc::clone(&results);
            let stop = Arc::clone(&stop);
            thread::spawn(move || simulate_worker(id, &results, &stop))
        })
        .collect();

    tokio::time::sleep(Duration::from_secs(config.run.duration_secs)).await;
    stop.store(true, Ordering::Relaxed);

    tokio::task::spawn_blocking(move || {
        for worker in workers {
            if worker.join().is_err() {
                warn!("simulated worker panicked");
            }
        }
    })
    .await
    .context("Failed to join simulated workers")?;

    handle.finish().await?;
    Ok(())
}

/// Record randomly chosen operations with randomly drawn latencies
///
/// Most operations are fast; a small share lands in a slow tail so the
/// percent-under-threshold figures move.
fn simulate_worker(id: usize, results: &TestResults, stop: &AtomicBool) {
    let mut rng = rand::thread_rng();
    let num_ops = results.op_types().len();

    while !stop.load(Ordering::Relaxed) {
        let op = rng.gen_range(0..num_ops);
        let latency_us = if rng.gen_bool(0.05) {
            rng.gen_range(50_000..500_000)
        } else {
            rng.gen_range(200..40_000)
        };
        let latency = Duration::from_micros(latency_us);

        // Scaled down so the demo produces thousands of ops per second
        thread::sleep(latency / 100);
        results.record_index(op, latency);
    }

    tracing::debug!(worker = id, "simulated worker stopped");
}
