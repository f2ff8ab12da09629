//! Polling waits.
//!
//! Every wait in the crate goes through [`FluentWait`]: a synchronous loop
//! that runs a probe, sleeps for the polling interval and tries again until
//! the probe is ready or the timeout elapses. Lookup failures (not found,
//! stale, driver errors) count as "not yet" and are remembered as the last
//! observed state for the timeout error.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::result::{PomError, PomResult};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for element resolution (10 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval (1 second)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;

// =============================================================================
// WAIT SETTINGS
// =============================================================================

/// Timeout and polling interval of a wait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WaitSettings {
    /// How long to keep polling
    pub timeout: Duration,
    /// Pause between attempts
    pub polling_interval: Duration,
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self::from_millis(DEFAULT_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS)
    }
}

impl WaitSettings {
    /// A single attempt, no polling
    pub const ZERO: Self = Self::new(Duration::ZERO, Duration::ZERO);

    /// Create wait settings
    #[must_use]
    pub const fn new(timeout: Duration, polling_interval: Duration) -> Self {
        Self {
            timeout,
            polling_interval,
        }
    }

    /// Create wait settings from milliseconds
    #[must_use]
    pub const fn from_millis(timeout_ms: u64, polling_ms: u64) -> Self {
        Self::new(
            Duration::from_millis(timeout_ms),
            Duration::from_millis(polling_ms),
        )
    }

    /// Whether this is a single immediate attempt
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.timeout.is_zero()
    }

    /// Timeout in milliseconds
    #[must_use]
    pub const fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    /// Polling interval in milliseconds
    #[must_use]
    pub const fn polling_ms(&self) -> u64 {
        self.polling_interval.as_millis() as u64
    }
}

// =============================================================================
// FLUENT WAIT
// =============================================================================

/// Outcome of one probe attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Poll<T> {
    /// Done, with the value to return
    Ready(T),
    /// Not yet; the observed state is kept for the timeout message
    Pending(String),
}

/// Polls a probe until it is ready or the timeout elapses
#[derive(Debug, Clone)]
pub struct FluentWait {
    settings: WaitSettings,
    message: Option<String>,
}

impl FluentWait {
    /// Wait with the given timing
    #[must_use]
    pub const fn new(settings: WaitSettings) -> Self {
        Self {
            settings,
            message: None,
        }
    }

    /// Message used when the wait times out
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Timing of this wait
    #[must_use]
    pub const fn settings(&self) -> WaitSettings {
        self.settings
    }

    /// Poll until `probe` returns `Some`
    pub fn until<T>(&self, mut probe: impl FnMut() -> PomResult<Option<T>>) -> PomResult<T> {
        self.poll(|| {
            Ok(match probe()? {
                Some(value) => Poll::Ready(value),
                None => Poll::Pending("condition not met".to_string()),
            })
        })
    }

    /// Poll until `probe` returns [`Poll::Ready`]
    ///
    /// A zero timeout makes exactly one attempt. Errors other than lookup
    /// failures end the wait immediately.
    pub fn poll<T>(&self, mut probe: impl FnMut() -> PomResult<Poll<T>>) -> PomResult<T> {
        let start = Instant::now();
        let mut attempts = 0u32;
        let mut last_state = None;
        loop {
            attempts += 1;
            match probe() {
                Ok(Poll::Ready(value)) => return Ok(value),
                Ok(Poll::Pending(state)) => last_state = Some(state),
                Err(err) if Self::ignored(&err) => last_state = Some(err.to_string()),
                Err(err) => return Err(err),
            }
            let elapsed = start.elapsed();
            if elapsed >= self.settings.timeout {
                break;
            }
            let pause = self
                .settings
                .polling_interval
                .max(Duration::from_millis(1))
                .min(self.settings.timeout - elapsed);
            std::thread::sleep(pause);
        }
        tracing::debug!(
            attempts,
            timeout_ms = self.settings.timeout_ms(),
            polling_ms = self.settings.polling_ms(),
            "wait timed out"
        );
        Err(PomError::ConditionTimeout {
            message: self.timeout_message(),
            timeout_ms: self.settings.timeout_ms(),
            polling_ms: self.settings.polling_ms(),
            last_state,
        })
    }

    fn ignored(err: &PomError) -> bool {
        err.is_recoverable()
            || matches!(err, PomError::Driver(_) | PomError::NotInteractable { .. })
    }

    fn timeout_message(&self) -> String {
        self.message.clone().unwrap_or_else(|| {
            format!(
                "Timed out after {}ms with polling interval {}ms.",
                self.settings.timeout_ms(),
                self.settings.polling_ms()
            )
        })
    }
}

/// Poll `predicate` until it holds
pub fn wait_until(settings: WaitSettings, mut predicate: impl FnMut() -> bool) -> PomResult<()> {
    FluentWait::new(settings).until(|| Ok(predicate().then_some(())))
}

/// Block the current thread
pub fn sleep(duration: Duration) {
    tracing::debug!(ms = duration.as_millis() as u64, "sleeping");
    std::thread::sleep(duration);
}
