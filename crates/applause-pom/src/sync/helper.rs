//! Waiting on conditions with a context's default timing.

use std::rc::Rc;
use std::time::Duration;

use crate::context::PageContext;
use crate::result::PomResult;
use crate::sync::condition::Condition;
use crate::wait::{self, WaitSettings};

/// Runs conditions and ad-hoc waits against one context
#[derive(Debug, Clone)]
pub struct SyncHelper {
    context: PageContext,
}

impl SyncHelper {
    /// Helper for `context`
    #[must_use]
    pub fn new(context: &PageContext) -> Self {
        Self {
            context: Rc::clone(context),
        }
    }

    /// Context the helper waits with
    #[must_use]
    pub fn context(&self) -> &PageContext {
        &self.context
    }

    /// Wait for `condition`, returning its output
    pub fn wait<C: Condition>(&self, condition: C) -> PomResult<C::Output> {
        condition.wait_then_return(&self.context)
    }

    /// Whether `condition` holds before its timeout
    pub fn matches_condition<C: Condition>(&self, condition: C) -> PomResult<bool> {
        condition.matches_condition(&self.context)
    }

    /// Poll `predicate` with the context's default timing
    pub fn wait_until(&self, predicate: impl FnMut() -> bool) -> PomResult<()> {
        wait::wait_until(self.context.wait_settings(), predicate)
    }

    /// Poll `predicate` with explicit timing
    pub fn wait_until_with(
        &self,
        settings: WaitSettings,
        predicate: impl FnMut() -> bool,
    ) -> PomResult<()> {
        wait::wait_until(settings, predicate)
    }

    /// Unconditional pause
    pub fn sleep(millis: u64) {
        wait::sleep(Duration::from_millis(millis));
    }
}
