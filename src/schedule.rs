//! Timer-driven reporting schedule
//!
//! Runs the reporter on a fixed tick alongside the workers. Ticks never
//! overlap: a report that runs long delays the next tick instead of
//! stacking up behind it.

use crate::report::Reporter;
use crate::stats::ResultsView;
use anyhow::Context;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

/// Run periodic reports until `shutdown` is set, then hand the reporter back
///
/// The first tick fires immediately; the reporter's interval guard decides
/// whether it prints anything.
pub async fn run<R: ResultsView>(
    mut reporter: Reporter<R>,
    tick: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> Reporter<R> {
    let mut ticker = interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        if *shutdown.borrow() {
            break;
        }

        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() {
                    debug!("shutdown sender dropped");
                    break;
                }
            }
            _ = ticker.tick() => {
                reporter.periodic_report();
            }
        }
    }

    info!("reporter schedule stopped");
    reporter
}

/// Handle to a running reporter schedule
pub struct ReporterHandle<R: ResultsView> {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<Reporter<R>>,
}

/// Write the CSV header and start the schedule on the current runtime
pub fn spawn<R: ResultsView + 'static>(reporter: Reporter<R>, tick: Duration) -> ReporterHandle<R> {
    reporter.emit_header();

    let (shutdown, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(run(reporter, tick, shutdown_rx));

    ReporterHandle { shutdown, task }
}

impl<R: ResultsView + 'static> ReporterHandle<R> {
    /// Stop the schedule and print the final report
    pub async fn finish(self) -> anyhow::Result<Reporter<R>> {
        let _ = self.shutdown.send(true);
        let mut reporter = self.task.await.context("Reporter task failed")?;
        reporter.final_report();
        Ok(reporter)
    }
}
