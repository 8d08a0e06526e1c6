// scheduler.rs
//
// Recurring timers behind a small trait so the tracker can run on a Tokio
// runtime in the binaries and on a virtual clock in tests.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Work run on every tick of a recurring timer.
pub type TickCallback = Box<dyn FnMut() + Send + 'static>;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Owns a scheduled timer. Cancelling or dropping the handle stops the timer.
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce() + Send + 'static>>,
}

impl TimerHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Something that can run a callback every `interval` until told to stop.
pub trait Scheduler {
    fn schedule(&self, interval: Duration, callback: TickCallback) -> TimerHandle;
}

/// Runs timers as tasks on a Tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    runtime: Handle,
}

impl TokioScheduler {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    /// Scheduler bound to the runtime of the calling task, if there is one.
    pub fn try_current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, interval: Duration, mut callback: TickCallback) -> TimerHandle {
        let period = interval.max(MIN_INTERVAL);
        let task = self.runtime.spawn(async move {
            // The first tick fires one full period after scheduling, not immediately.
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                callback();
            }
        });
        TimerHandle::new(move || task.abort())
    }
}

struct ManualTimer {
    id: u64,
    interval: Duration,
    next_due: Duration,
    callback: Option<TickCallback>,
}

#[derive(Default)]
struct ManualClock {
    now: Duration,
    next_id: u64,
    timers: Vec<ManualTimer>,
}

/// Virtual-time scheduler. Nothing fires until `advance` is called.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Arc<Mutex<ManualClock>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on the virtual clock.
    pub fn elapsed(&self) -> Duration {
        self.lock().now
    }

    pub fn active_timers(&self) -> usize {
        self.lock().timers.len()
    }

    /// Moves the clock forward, firing every timer that comes due on the way,
    /// one at a time in due order.
    pub fn advance(&self, by: Duration) {
        let target = self.lock().now + by;
        loop {
            let (id, mut callback) = {
                let mut clock = self.lock();
                let next = clock
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, timer)| timer.next_due <= target && timer.callback.is_some())
                    .min_by_key(|(_, timer)| (timer.next_due, timer.id))
                    .map(|(index, _)| index);
                let Some(index) = next else {
                    clock.now = target;
                    return;
                };
                clock.now = clock.timers[index].next_due;
                let timer = &mut clock.timers[index];
                timer.next_due += timer.interval;
                match timer.callback.take() {
                    Some(callback) => (timer.id, callback),
                    None => continue,
                }
            };

            // Run without holding the clock so a callback may cancel timers.
            callback();

            let mut clock = self.lock();
            if let Some(timer) = clock.timers.iter_mut().find(|timer| timer.id == id) {
                timer.callback = Some(callback);
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualClock> {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, interval: Duration, callback: TickCallback) -> TimerHandle {
        let interval = interval.max(MIN_INTERVAL);
        let id = {
            let mut clock = self.lock();
            let id = clock.next_id;
            clock.next_id += 1;
            let next_due = clock.now + interval;
            clock.timers.push(ManualTimer {
                id,
                interval,
                next_due,
                callback: Some(callback),
            });
            id
        };

        let clock = Arc::downgrade(&self.clock);
        TimerHandle::new(move || {
            if let Some(clock) = clock.upgrade() {
                let mut clock = clock.lock().unwrap_or_else(PoisonError::into_inner);
                clock.timers.retain(|timer| timer.id != id);
            }
        })
    }
}
