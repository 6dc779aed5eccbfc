//! Job daemon: loads the ledger, schedules the daily recurrence and alert
//! runs plus the monthly dedup reset, and parks until terminated.
//!
//! Usage: `fintrack_jobs [config-path]`. Pass `--once` after the config path
//! to run both daily jobs immediately and exit instead of scheduling.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use fintrack_core::config::JobsConfig;
use fintrack_core::jobs::InMemoryAlertLedger;
use fintrack_core::notify::LogNotifier;
use fintrack_core::scheduler::{JobRunner, JobScheduler};
use fintrack_core::store::JsonStore;
use fintrack_core::time::SystemClock;

fn main() -> ExitCode {
    fintrack_core::init();

    let args = std::env::args().skip(1);
    let mut config_path: Option<PathBuf> = None;
    let mut run_once = false;
    for arg in args {
        if arg == "--once" {
            run_once = true;
        } else {
            config_path = Some(PathBuf::from(arg));
        }
    }
    let config_path = config_path.unwrap_or_else(JobsConfig::default_path);

    let config = match JobsConfig::load(&config_path) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(path = %config_path.display(), %err, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let data_file = config.resolve_data_file();
    let store = match JsonStore::open(&data_file) {
        Ok(store) => Arc::new(store),
        Err(err) => {
            tracing::error!(path = %data_file.display(), %err, "failed to open ledger store");
            return ExitCode::FAILURE;
        }
    };

    let runner = Arc::new(JobRunner::new(
        store,
        Arc::new(LogNotifier),
        Arc::new(Mutex::new(InMemoryAlertLedger::default())),
        Arc::new(SystemClock),
    ));

    if run_once {
        let mut failed = false;
        match runner.run_recurrence() {
            Ok(outcome) => tracing::info!(processed = outcome.processed, "recurring run done"),
            Err(err) => {
                tracing::error!(%err, "recurring run failed");
                failed = true;
            }
        }
        match runner.run_alert_sweep() {
            Ok(outcome) => tracing::info!(notified = outcome.notified, "alert sweep done"),
            Err(err) => {
                tracing::error!(%err, "alert sweep failed");
                failed = true;
            }
        }
        return if failed {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    let schedule = config.schedule();
    tracing::info!(
        ledger = %data_file.display(),
        recurrence_hour = schedule.recurrence_hour,
        alert_hour = schedule.alert_hour,
        "job scheduler started"
    );
    JobScheduler::start(runner, schedule).join();
    ExitCode::SUCCESS
}
