use std::sync::{Arc, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::error::MatchmakerError;
use super::matchmaker::Matchmaker;

/// Handle to the periodic scan task spawned by [`Matchmaker::start`].
pub(crate) struct ScanTask {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl<P, K> Matchmaker<P, K>
where
    P: Send + Sync + 'static,
    K: 'static,
{
    /// Starts scanning the queue every `scan_interval`. The first scan runs one interval after
    /// this call. Must be called from within a tokio runtime.
    pub fn start(self: &Arc<Self>) -> Result<(), MatchmakerError> {
        let mut scan_task = self.scan_task.lock().unwrap_or_else(PoisonError::into_inner);
        if scan_task.as_ref().is_some_and(|task| !task.handle.is_finished()) {
            return Err(MatchmakerError::AlreadyRunning);
        }

        let (shutdown, shutdown_rx) = watch::channel(false);
        let period = self.config.scan_interval;
        let handle = tokio::spawn(scan_loop(Arc::downgrade(self), period, shutdown_rx));
        *scan_task = Some(ScanTask { shutdown, handle });

        info!(interval_ms = u64::try_from(period.as_millis()).unwrap_or(u64::MAX), "Matchmaker started");
        Ok(())
    }

    /// Stops the periodic scan. A scan already in progress finishes first; once this returns no
    /// further scan will run. Returns `false` if the matchmaker was not running.
    ///
    /// Calling this from inside the resolver would wait on the very scan that is calling it, so
    /// don't.
    pub async fn stop(&self) -> bool {
        let task = self.scan_task.lock().unwrap_or_else(PoisonError::into_inner).take();
        let Some(task) = task else {
            return false;
        };

        let _ = task.shutdown.send(true);
        if let Err(err) = task.handle.await {
            warn!(error = %err, "Scan task ended abnormally");
        }
        info!("Matchmaker stopped");
        true
    }

    pub fn is_running(&self) -> bool {
        self.scan_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
    }
}

async fn scan_loop<P, K>(
    matchmaker: Weak<Matchmaker<P, K>>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) where
    P: Send + Sync + 'static,
{
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        // Shutdown wins over a tick that came due while the previous scan was running.
        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {}
        }
        if *shutdown.borrow() {
            break;
        }

        // The matchmaker was dropped without being stopped.
        let Some(matchmaker) = matchmaker.upgrade() else {
            break;
        };
        if let Err(err) = matchmaker.run_scan().await {
            warn!(error = %err, "Scan failed, queue left for the next tick");
        }
    }
    debug!("Scan loop exited");
}
