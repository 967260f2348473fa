//! Repeating jobs that drive the overlay updates
use bevy_time::{Timer, TimerMode};
use core::time::Duration;
use hashbrown::HashMap;
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Handle to a job created with [`Scheduler::schedule_repeating`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(pub u64);

/// Runs jobs at a fixed cadence on the thread that owns the registry.
pub trait Scheduler {
    /// Start a new job that runs every `interval`
    fn schedule_repeating(&mut self, interval: Duration) -> TaskHandle;

    /// Stop the job. Cancelling a job that is already stopped does nothing.
    fn cancel(&mut self, handle: TaskHandle);

    /// Advance the clock of the job by `delta`, and return how many times it must run.
    ///
    /// Cancelled or unknown jobs never run.
    fn advance(&mut self, handle: TaskHandle, delta: Duration) -> u32;
}

/// [`Scheduler`] that measures the elapsed time with a [`Timer`] per job.
///
/// A job with a zero interval runs once per call to [`Scheduler::advance`].
#[derive(Debug, Default)]
pub struct TimerScheduler {
    next_handle: u64,
    timers: HashMap<TaskHandle, Option<Timer>>,
}

impl TimerScheduler {
    pub fn is_active(&self, handle: TaskHandle) -> bool {
        self.timers.contains_key(&handle)
    }

    /// Number of jobs that are currently scheduled
    pub fn active_jobs(&self) -> usize {
        self.timers.len()
    }
}

impl Scheduler for TimerScheduler {
    fn schedule_repeating(&mut self, interval: Duration) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        let timer = if interval == Duration::default() {
            None
        } else {
            Some(Timer::new(interval, TimerMode::Repeating))
        };
        self.timers.insert(handle, timer);
        trace!(?handle, ?interval, "scheduled repeating job");
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) {
        if self.timers.remove(&handle).is_some() {
            trace!(?handle, "cancelled repeating job");
        }
    }

    fn advance(&mut self, handle: TaskHandle, delta: Duration) -> u32 {
        match self.timers.get_mut(&handle) {
            Some(Some(timer)) => {
                timer.tick(delta);
                timer.times_finished_this_tick()
            }
            Some(None) => 1,
            None => 0,
        }
    }
}
