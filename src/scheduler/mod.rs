//! Fixed-cadence triggers for the background jobs.
//!
//! Three wall-clock schedules drive the core: the recurring-transaction run
//! and the budget-alert sweep once a day at configurable hours, and the
//! alert-dedup reset on the first of each month. Each job carries an atomic
//! in-flight guard so a tick that arrives while the previous run is still
//! executing is skipped, not stacked.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::domain::MonthToken;
use crate::errors::JobError;
use crate::jobs::{
    reset_alert_state, AlertLedger, AlertOutcome, BudgetAlertSweep, RecurrenceOutcome,
    RecurringProcessor,
};
use crate::notify::Notifier;
use crate::store::LedgerStore;
use crate::time::Clock;

/// Wall-clock hours (UTC) for the daily triggers.
#[derive(Debug, Clone, Copy)]
pub struct Schedule {
    pub recurrence_hour: u32,
    pub alert_hour: u32,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            recurrence_hour: 0,
            alert_hour: 9,
        }
    }
}

/// Owns the job collaborators and runs each job behind its re-entrancy guard.
pub struct JobRunner {
    store: Arc<dyn LedgerStore>,
    notifier: Arc<dyn Notifier>,
    alerts: Arc<Mutex<dyn AlertLedger>>,
    clock: Arc<dyn Clock>,
    recurrence_in_flight: AtomicBool,
    sweep_in_flight: AtomicBool,
}

impl JobRunner {
    pub fn new(
        store: Arc<dyn LedgerStore>,
        notifier: Arc<dyn Notifier>,
        alerts: Arc<Mutex<dyn AlertLedger>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            notifier,
            alerts,
            clock,
            recurrence_in_flight: AtomicBool::new(false),
            sweep_in_flight: AtomicBool::new(false),
        }
    }

    /// Runs the recurring-transaction batch for the clock's current date.
    pub fn run_recurrence(&self) -> Result<RecurrenceOutcome, JobError> {
        RecurringProcessor::run(self.store.as_ref(), self.clock.today())
    }

    /// Runs the budget-alert sweep for the clock's current date.
    pub fn run_alert_sweep(&self) -> Result<AlertOutcome, JobError> {
        let mut alerts = self
            .alerts
            .lock()
            .map_err(|_| JobError::BatchAborted("alert state lock poisoned".into()))?;
        BudgetAlertSweep::run(
            self.store.as_ref(),
            self.notifier.as_ref(),
            &mut *alerts,
            self.clock.today(),
        )
    }

    /// Clears all alert-dedup state (the monthly reset).
    pub fn run_monthly_reset(&self) -> Result<(), JobError> {
        let mut alerts = self
            .alerts
            .lock()
            .map_err(|_| JobError::BatchAborted("alert state lock poisoned".into()))?;
        reset_alert_state(&mut *alerts);
        Ok(())
    }

    /// Guarded variant: returns `None` when a recurrence run is in flight.
    pub fn try_run_recurrence(&self) -> Option<Result<RecurrenceOutcome, JobError>> {
        guarded(&self.recurrence_in_flight, "recurrence", || {
            self.run_recurrence()
        })
    }

    /// Guarded variant: returns `None` when an alert sweep is in flight.
    pub fn try_run_alert_sweep(&self) -> Option<Result<AlertOutcome, JobError>> {
        guarded(&self.sweep_in_flight, "alert sweep", || {
            self.run_alert_sweep()
        })
    }
}

fn guarded<T>(flag: &AtomicBool, job: &str, run: impl FnOnce() -> T) -> Option<T> {
    if flag.swap(true, Ordering::SeqCst) {
        tracing::warn!(job, "previous run still in flight, skipping tick");
        return None;
    }
    let result = run();
    flag.store(false, Ordering::SeqCst);
    Some(result)
}

/// Background threads driving the three schedules. Dropping the scheduler
/// requests shutdown and joins the workers.
pub struct JobScheduler {
    shutdown: Arc<AtomicBool>,
    handles: Vec<JoinHandle<()>>,
}

const SHUTDOWN_POLL: Duration = Duration::from_secs(30);

impl JobScheduler {
    pub fn start(runner: Arc<JobRunner>, schedule: Schedule) -> JobScheduler {
        let shutdown = Arc::new(AtomicBool::new(false));
        let mut handles = Vec::new();

        {
            let runner = Arc::clone(&runner);
            let shutdown = Arc::clone(&shutdown);
            let hour = schedule.recurrence_hour.min(23);
            handles.push(thread::spawn(move || {
                run_loop(&shutdown, move |now| next_daily(now, hour), || {
                    if let Some(Err(err)) = runner.try_run_recurrence() {
                        tracing::error!(%err, "recurring run aborted");
                    }
                });
            }));
        }
        {
            let runner = Arc::clone(&runner);
            let shutdown = Arc::clone(&shutdown);
            let hour = schedule.alert_hour.min(23);
            handles.push(thread::spawn(move || {
                run_loop(&shutdown, move |now| next_daily(now, hour), || {
                    if let Some(Err(err)) = runner.try_run_alert_sweep() {
                        tracing::error!(%err, "alert sweep aborted");
                    }
                });
            }));
        }
        {
            let shutdown = Arc::clone(&shutdown);
            handles.push(thread::spawn(move || {
                run_loop(&shutdown, next_month_start, || {
                    if let Err(err) = runner.run_monthly_reset() {
                        tracing::error!(%err, "monthly alert reset failed");
                    }
                });
            }));
        }

        JobScheduler { shutdown, handles }
    }

    /// Blocks until the scheduler is shut down from another thread.
    pub fn join(mut self) {
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }

    pub fn stop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for JobScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_loop(
    shutdown: &AtomicBool,
    next_tick: impl Fn(DateTime<Utc>) -> DateTime<Utc>,
    mut tick: impl FnMut(),
) {
    while !shutdown.load(Ordering::SeqCst) {
        let target = next_tick(Utc::now());
        while Utc::now() < target {
            if shutdown.load(Ordering::SeqCst) {
                return;
            }
            let remaining = (target - Utc::now()).to_std().unwrap_or(Duration::ZERO);
            thread::sleep(remaining.min(SHUTDOWN_POLL));
        }
        tick();
    }
}

/// Next occurrence of `hour:00:00` strictly after `now`.
fn next_daily(now: DateTime<Utc>, hour: u32) -> DateTime<Utc> {
    let today_at = at_midnight_hour(now.date_naive(), hour);
    if today_at > now {
        today_at
    } else {
        at_midnight_hour(now.date_naive() + chrono::Duration::days(1), hour)
    }
}

/// Next first-of-month 00:00 strictly after `now`.
fn next_month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let next = MonthToken::from_date(now.date_naive()).succ().first_day();
    at_midnight_hour(next, 0)
}

fn at_midnight_hour(date: NaiveDate, hour: u32) -> DateTime<Utc> {
    let naive = date
        .and_hms_opt(hour, 0, 0)
        .unwrap_or_else(|| date.and_hms_opt(0, 0, 0).expect("midnight always exists"));
    Utc.from_utc_datetime(&naive)
}
