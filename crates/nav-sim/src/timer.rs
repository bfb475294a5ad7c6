//! `TickTimer`: a cancelable periodic timer.
//!
//! ```text
//!              arm                      disarm / cancel
//!   disarmed ───────▶ armed ──────────────────────────▶ disarmed
//!                     │  ▲
//!                     └──┘ reset / set_repetition_interval
//! ```
//!
//! Once armed, the payload fires after `countdown`, then every
//! `repetition`.  Every arm/disarm cycle has its own *epoch*, passed to the
//! payload, so a consumer can drop firings that were already in flight when
//! the timer was disarmed.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::trace;

use nav_core::MAX_WALL_TICK_INTERVAL;

type Payload = Arc<dyn Fn(u64) + Send + Sync>;

/// Shortest repetition interval accepted.  `tokio::time::interval` panics on
/// a zero period; longer ones are capped at `MAX_WALL_TICK_INTERVAL`.
const MIN_REPETITION: Duration = Duration::from_millis(1);

pub struct TickTimer {
    countdown:  Duration,
    repetition: Duration,
    accuracy:   Duration,
    handle:     Handle,
    payload:    Payload,
    /// Held across every payload call: an aborted task may still be inside
    /// the payload when its replacement fires.
    gate:       Arc<Mutex<()>>,
    task:       Option<JoinHandle<()>>,
    epoch:      u64,
    cancelled:  bool,
}

impl TickTimer {
    /// A disarmed timer whose firings run on `handle`.
    ///
    /// `accuracy` is the leeway a firing may lag its schedule before it is
    /// reported (at `trace` level) as late.
    pub fn new<F>(
        countdown:  Duration,
        repetition: Duration,
        accuracy:   Duration,
        handle:     Handle,
        payload:    F,
    ) -> Self
    where
        F: Fn(u64) + Send + Sync + 'static,
    {
        Self {
            countdown,
            repetition: repetition.clamp(MIN_REPETITION, MAX_WALL_TICK_INTERVAL),
            accuracy,
            handle,
            payload: Arc::new(payload),
            gate: Arc::new(Mutex::new(())),
            task: None,
            epoch: 0,
            cancelled: false,
        }
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.task.is_some()
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Identifier of the current arm cycle.  Bumped by every effective
    /// `disarm`.
    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[inline]
    pub fn repetition_interval(&self) -> Duration {
        self.repetition
    }

    /// Start firing.  No-op if already armed or cancelled.
    pub fn arm(&mut self) {
        if self.cancelled || self.task.is_some() {
            return;
        }
        self.spawn();
    }

    /// Restart the countdown.  Only has an effect while armed.
    pub fn reset(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            self.spawn();
        }
    }

    /// Stop future firings.  The timer can be armed again.  Idempotent.
    pub fn disarm(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            self.epoch += 1;
        }
    }

    /// Disarm permanently.
    pub fn cancel(&mut self) {
        self.disarm();
        self.cancelled = true;
    }

    /// Change the period.  Implies [`reset`](Self::reset).
    pub fn set_repetition_interval(&mut self, repetition: Duration) {
        self.repetition = repetition.clamp(MIN_REPETITION, MAX_WALL_TICK_INTERVAL);
        self.reset();
    }

    fn spawn(&mut self) {
        let countdown = self.countdown;
        let repetition = self.repetition;
        let accuracy = self.accuracy;
        let epoch = self.epoch;
        let payload = Arc::clone(&self.payload);
        let gate = Arc::clone(&self.gate);

        let fire = move || {
            let _serial = gate.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            payload(epoch);
        };

        self.task = Some(self.handle.spawn(async move {
            if !countdown.is_zero() {
                time::sleep(countdown).await;
            }
            fire();

            let mut ticker = time::interval_at(Instant::now() + repetition, repetition);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                let scheduled = ticker.tick().await;
                let lateness = scheduled.elapsed();
                if lateness > accuracy {
                    trace!(epoch, late_ms = lateness.as_millis() as u64, "tick fired late");
                }
                fire();
            }
        }));
    }
}

impl Drop for TickTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
