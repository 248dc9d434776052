//! Wall-clock timing of a block of work.

use std::fmt;
use std::time::{Duration, Instant};

/// Elapsed time broken into calendar-style parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Runtime {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub microseconds: u32,
}

impl From<Duration> for Runtime {
    fn from(elapsed: Duration) -> Self {
        let total = elapsed.as_secs();
        let (minutes, seconds) = (total / 60, total % 60);
        let (hours, minutes) = (minutes / 60, minutes % 60);
        let (days, hours) = (hours / 24, hours % 24);

        Self {
            days,
            hours,
            minutes,
            seconds,
            microseconds: elapsed.subsec_micros(),
        }
    }
}

impl Runtime {
    /// `H:M:S.ffffff`, prefixed with `N Days, ` when at least a day passed.
    pub fn show(&self) -> String {
        let time = format!(
            "{}:{}:{}.{:06}",
            self.hours, self.minutes, self.seconds, self.microseconds
        );
        if self.days > 0 {
            format!("{} Days, {}", self.days, time)
        } else {
            time
        }
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Days, {} Hours, {} Minutes, {} Seconds, {} Microseconds",
            self.days, self.hours, self.minutes, self.seconds, self.microseconds
        )
    }
}

/// Measures how long a set of operations takes.
///
/// ```
/// use nbkit_core::Timer;
///
/// let (sum, timer) = Timer::time(|| (1..=10).sum::<u32>());
/// assert_eq!(sum, 55);
/// assert!(timer.total_seconds().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct Timer {
    started: Instant,
    elapsed: Option<Duration>,
}

impl Timer {
    /// Start a running timer.
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            elapsed: None,
        }
    }

    /// Run `work` and return its result together with the stopped timer.
    pub fn time<R>(work: impl FnOnce() -> R) -> (R, Self) {
        let mut timer = Self::start();
        let result = work();
        timer.stop();
        (result, timer)
    }

    /// Stop the timer. Stopping again keeps the first measurement.
    pub fn stop(&mut self) -> Duration {
        *self.elapsed.get_or_insert_with(|| self.started.elapsed())
    }

    pub fn is_running(&self) -> bool {
        self.elapsed.is_none()
    }

    /// Elapsed time, `None` while still running.
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }

    /// Elapsed seconds rounded to the microsecond.
    pub fn total_seconds(&self) -> Option<f64> {
        self.elapsed
            .map(|d| (d.as_secs_f64() * 1e6).round() / 1e6)
    }

    pub fn runtime(&self) -> Option<Runtime> {
        self.elapsed.map(Runtime::from)
    }

    /// See [`Runtime::show`]. Empty while the timer is running.
    pub fn show(&self) -> String {
        self.runtime().map(|r| r.show()).unwrap_or_default()
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.runtime() {
            Some(runtime) => runtime.fmt(f),
            None => f.write_str("running"),
        }
    }
}
