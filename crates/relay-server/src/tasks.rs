//! Background maintenance tasks: settings file watching and rate-limit
//! window sweeping.
//!
//! Both run on an interval until their [`TaskHandle`] is stopped or dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::gate::FixedWindowLimiter;
use crate::settings_store::SettingsStore;

/// Handle for a running background task.
pub struct TaskHandle {
    name: &'static str,
    shutdown_tx: watch::Sender<bool>,
}

impl TaskHandle {
    /// Signals the task to stop.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Spawns `tick` every `period` until the returned handle stops.
fn spawn_periodic<F>(name: &'static str, period: Duration, mut tick: F) -> TaskHandle
where
    F: FnMut() + Send + 'static,
{
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        let mut timer = interval(period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(task = name, ?period, "Background task started");

        loop {
            tokio::select! {
                _ = timer.tick() => tick(),
                result = shutdown_rx.changed() => {
                    if result.is_err() || *shutdown_rx.borrow() {
                        info!(task = name, "Background task shutting down");
                        break;
                    }
                }
            }
        }
    });

    TaskHandle { name, shutdown_tx }
}

/// Reloads the settings file whenever its modification time changes.
pub fn watch_settings(store: Arc<SettingsStore>, period: Duration) -> TaskHandle {
    spawn_periodic("settings-watcher", period, move || match store.reload() {
        Ok(true) => debug!("Settings snapshot replaced"),
        Ok(false) => {},
        Err(e) => warn!(error = %e, "Settings reload failed, keeping previous snapshot"),
    })
}

/// Drops rate-limit windows whose reset time has passed.
pub fn sweep_rate_limits(limiter: Arc<FixedWindowLimiter>, window: Duration) -> TaskHandle {
    let period = window.max(Duration::from_secs(1));
    spawn_periodic("rate-limit-sweeper", period, move || {
        let removed = limiter.sweep();
        if removed > 0 {
            debug!(removed, remaining = limiter.tracked(), "Expired rate limit windows removed");
        }
    })
}
