use std::sync::Arc;

use chrono::Local;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::Config;
use crate::select::select_display_records;
use crate::source::ForecastSource;
use crate::state::{Dashboard, DashboardSnapshot};

/// Shared dashboard state, written by the scheduler tasks and read by the
/// presentation layer.
pub type SharedDashboard = Arc<RwLock<Dashboard>>;

/// Running pair of timer tasks plus their shared cancellation token.
///
/// The clock ticker and the data refresher are deliberately independent:
/// the countdown wraps on its own schedule and a slow fetch delays only the
/// next refresh, never the clock. They are only coupled at teardown, where
/// one token cancels both.
pub struct SchedulerHandle {
    dashboard: SharedDashboard,
    cancel: CancellationToken,
    tick_task: JoinHandle<()>,
    refresh_task: JoinHandle<()>,
}

impl SchedulerHandle {
    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.dashboard.read().await.snapshot()
    }

    pub fn dashboard(&self) -> SharedDashboard {
        Arc::clone(&self.dashboard)
    }

    /// Cancels both timer tasks, dropping any in-flight fetch, and waits for
    /// them to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.tick_task.await;
        let _ = self.refresh_task.await;
    }
}

/// Starts the clock ticker and the data refresher.
///
/// The refresher fires immediately on startup and then once per refresh
/// interval; the ticker fires every second for the lifetime of the handle.
pub fn start(source: Arc<dyn ForecastSource>, config: &Config) -> SchedulerHandle {
    let dashboard: SharedDashboard = Arc::new(RwLock::new(Dashboard::new(
        Local::now().naive_local(),
        config.countdown_start(),
    )));
    let cancel = CancellationToken::new();

    let tick_task = tokio::spawn(run_ticker(Arc::clone(&dashboard), cancel.clone()));
    let refresh_task = tokio::spawn(run_refresher(
        Arc::clone(&dashboard),
        source,
        config.clone(),
        cancel.clone(),
    ));

    SchedulerHandle {
        dashboard,
        cancel,
        tick_task,
        refresh_task,
    }
}

async fn run_ticker(dashboard: SharedDashboard, cancel: CancellationToken) {
    let mut timer = interval(Config::TICK_INTERVAL);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The interval yields immediately; the clock is already initialized, so
    // consume that first tick and start counting one second from now.
    timer.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = timer.tick() => {
                dashboard.write().await.tick(Local::now().naive_local());
            }
        }
    }

    debug!("clock ticker stopped");
}

async fn run_refresher(
    dashboard: SharedDashboard,
    source: Arc<dyn ForecastSource>,
    config: Config,
    cancel: CancellationToken,
) {
    let mut timer = interval(config.refresh_interval());
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = timer.tick() => {}
        }
        // Cancelling mid-fetch drops the request future.
        tokio::select! {
            _ = cancel.cancelled() => break,
            () = refresh_once(&dashboard, source.as_ref(), config.sample_size) => {}
        }
    }

    debug!("refresh task stopped");
}

/// One fetch-and-select pass. Failures are logged and swallowed; the
/// previous records stay on display until a later cycle succeeds.
async fn refresh_once(dashboard: &SharedDashboard, source: &dyn ForecastSource, sample_size: usize) {
    match source.fetch().await {
        Ok(all_series) => {
            let reference_time = Local::now().naive_local();
            let records = select_display_records(&all_series, reference_time, sample_size);
            debug!(
                regions = all_series.len(),
                selected = records.len(),
                "refresh cycle complete"
            );
            dashboard.write().await.complete_refresh(records);
        }
        Err(e) => warn!(error = %e, "forecast refresh failed, keeping previous records"),
    }
}
