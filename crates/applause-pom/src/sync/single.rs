//! Conditions on a single element.

use std::fmt;
use std::time::Duration;

use crate::context::PageContext;
use crate::element::UiElement;
use crate::result::PomResult;
use crate::sync::condition::{timeout_message, Condition, ConditionTiming, Predicate};
use crate::wait::{FluentWait, Poll, WaitSettings};

/// Waits until a predicate holds for one element
pub struct UiElementCondition<'a, E> {
    element: &'a E,
    predicate: Predicate<'a, E>,
    description: String,
    timing: ConditionTiming,
}

impl<E: UiElement> fmt::Debug for UiElementCondition<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiElementCondition")
            .field("element", &self.element.element_name())
            .field("description", &self.description)
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}

impl<'a, E: UiElement> UiElementCondition<'a, E> {
    /// Condition that `predicate` holds for `element`
    pub fn new(
        element: &'a E,
        predicate: Predicate<'a, E>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            element,
            predicate,
            description: description.into(),
            timing: ConditionTiming::default(),
        }
    }

    /// What the condition checks, e.g. "is visible"
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    fn subject(&self) -> String {
        format!("{} {}", self.element.element_name(), self.description)
    }
}

impl<'a, E: UiElement> Condition for UiElementCondition<'a, E> {
    type Output = &'a E;

    fn set_timeout(&mut self, timeout: Duration) {
        self.timing.timeout = Some(timeout);
    }

    fn set_polling_interval(&mut self, polling_interval: Duration) {
        self.timing.polling_interval = Some(polling_interval);
    }

    fn timing(&self) -> ConditionTiming {
        self.timing
    }

    fn wait_then_return_with(
        &self,
        _context: &PageContext,
        timeout: Duration,
        polling_interval: Duration,
    ) -> PomResult<&'a E> {
        let subject = self.subject();
        tracing::debug!("Waiting until {subject}");
        FluentWait::new(WaitSettings::new(timeout, polling_interval))
            .with_message(timeout_message(&subject, timeout, polling_interval))
            .poll(|| {
                Ok(if (self.predicate)(self.element)? {
                    Poll::Ready(self.element)
                } else {
                    Poll::Pending(format!("{subject}: not yet"))
                })
            })
    }
}
