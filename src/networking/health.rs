//! Engine readiness probe
//!
//! A background task polls `GET /health` on a fixed interval and stores the
//! answer in a shared [`ReadinessFlag`]. The controller reads the flag before
//! sending anything and refuses to submit while it is down.
//!
//! The service counts as ready only when it answers 2xx *and* reports that
//! its engine is running. Any error counts as not ready.

use super::client::EngineService;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Shared ready/not-ready flag; clones observe the same value
#[derive(Debug, Clone, Default)]
pub struct ReadinessFlag(Arc<AtomicBool>);

impl ReadinessFlag {
    pub fn new(ready: bool) -> Self {
        ReadinessFlag(Arc::new(AtomicBool::new(ready)))
    }

    pub fn is_ready(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Store a new value and return the previous one
    pub fn set(&self, ready: bool) -> bool {
        self.0.swap(ready, Ordering::AcqRel)
    }
}

/// Ask the service once whether its engine is up
pub async fn probe_once(service: &dyn EngineService) -> bool {
    match service.health().await {
        Ok(health) => health.engine,
        Err(e) => {
            debug!("[HEALTH] Probe failed: {}", e);
            false
        }
    }
}

/// Poll the service forever, updating `flag`. The first probe runs
/// immediately. Abort the returned handle to stop polling.
pub fn spawn_health_probe(
    service: Arc<dyn EngineService>,
    flag: ReadinessFlag,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let ready = probe_once(service.as_ref()).await;
            let was_ready = flag.set(ready);

            match (was_ready, ready) {
                (false, true) => info!("[HEALTH] Engine service is ready"),
                (true, false) => warn!("[HEALTH] Engine service is no longer ready"),
                _ => {}
            }
        }
    })
}
