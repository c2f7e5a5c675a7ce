use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::debug;

use crate::clock::Clock;

/// Enforces a minimum spacing between successive dispatches to one provider.
///
/// The last-dispatch instant is shared by every clone, so all callers pace
/// against one clock. The lock is held across the wait: a second caller cannot
/// compute its window until the first has claimed its slot.
#[derive(Clone)]
pub struct Pacer {
    min_spacing: Duration,
    clock: Arc<dyn Clock>,
    last_dispatch: Arc<Mutex<Option<Instant>>>,
}

impl Pacer {
    pub fn new(min_spacing: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            min_spacing,
            clock,
            last_dispatch: Arc::new(Mutex::new(None)),
        }
    }

    pub fn min_spacing(&self) -> Duration {
        self.min_spacing
    }

    /// Waits until a dispatch is allowed, then records the dispatch instant.
    ///
    /// Returns how long the caller was held back.
    pub async fn acquire(&self) -> Duration {
        let mut last_dispatch = self.last_dispatch.lock().await;

        let wait = last_dispatch
            .map(|previous| {
                let elapsed = self.clock.now().saturating_duration_since(previous);
                self.min_spacing.saturating_sub(elapsed)
            })
            .unwrap_or(Duration::ZERO);

        if !wait.is_zero() {
            debug!(wait_ms = wait.as_millis() as u64, "pacing upstream dispatch");
            self.clock.sleep(wait).await;
        }

        *last_dispatch = Some(self.clock.now());
        wait
    }

    /// Instant of the most recent dispatch, if any.
    pub async fn last_dispatch(&self) -> Option<Instant> {
        *self.last_dispatch.lock().await
    }
}
