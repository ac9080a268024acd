//! One-second scheduling source.
//!
//! The controller only sees [`TickSource`]: it arms the source when a
//! countdown starts and disarms it on pause, reset and completion. The
//! driving loop owns the [`IntervalTicker`] and awaits [`IntervalTicker::tick`],
//! which resolves once per period while armed and never while disarmed.
//!
//! ```ignore
//! let (mut ticker, handle) = IntervalTicker::new(Duration::from_secs(1));
//! let caps = Capabilities {
//!     ticker: Box::new(handle),
//!     sound: Box::new(SilentPlayer),
//!     notifier: Box::new(NoNotifier),
//! };
//! let mut controller = SessionController::new(store, caps);
//! controller.start();
//! loop {
//!     ticker.tick().await;
//!     controller.tick();
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// Scheduling capability driven by the controller.
pub trait TickSource {
    /// Begin delivering ticks, one period from now.
    fn arm(&self);

    /// Stop delivering ticks. A pending tick is cancelled.
    fn disarm(&self);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Arming {
    armed: bool,
    /// Bumped on every `arm()` so the ticker can restart its phase.
    epoch: u64,
}

/// Controller-side handle of an [`IntervalTicker`].
#[derive(Debug, Clone)]
pub struct TickerHandle {
    state: Arc<watch::Sender<Arming>>,
}

impl TickerHandle {
    pub fn is_armed(&self) -> bool {
        self.state.borrow().armed
    }
}

impl TickSource for TickerHandle {
    fn arm(&self) {
        self.state.send_modify(|s| {
            s.armed = true;
            s.epoch = s.epoch.wrapping_add(1);
        });
    }

    fn disarm(&self) {
        self.state
            .send_if_modified(|s| std::mem::replace(&mut s.armed, false));
    }
}

/// tokio-backed periodic tick source.
#[derive(Debug)]
pub struct IntervalTicker {
    state: watch::Receiver<Arming>,
    interval: Interval,
    seen_epoch: u64,
}

impl IntervalTicker {
    /// Create a disarmed ticker and its handle.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(period: Duration) -> (Self, TickerHandle) {
        let (tx, rx) = watch::channel(Arming::default());
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        (
            Self {
                state: rx,
                interval,
                seen_epoch: 0,
            },
            TickerHandle {
                state: Arc::new(tx),
            },
        )
    }

    /// Wait for the next tick. Cancel-safe.
    ///
    /// Pends forever once every handle is dropped.
    pub async fn tick(&mut self) {
        loop {
            let current = *self.state.borrow_and_update();
            if !current.armed {
                if self.state.changed().await.is_err() {
                    std::future::pending::<()>().await;
                }
                continue;
            }
            if current.epoch != self.seen_epoch {
                self.seen_epoch = current.epoch;
                self.interval.reset();
            }

            tokio::select! {
                _ = self.interval.tick() => {
                    let now = *self.state.borrow();
                    if now.armed && now.epoch == self.seen_epoch {
                        return;
                    }
                }
                changed = self.state.changed() => {
                    if changed.is_err() {
                        std::future::pending::<()>().await;
                    }
                }
            }
        }
    }
}
