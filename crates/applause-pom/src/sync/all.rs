//! Conditions every element of a list must meet.

use std::fmt;
use std::time::Duration;

use crate::context::PageContext;
use crate::element::UiElement;
use crate::result::PomResult;
use crate::sync::condition::{timeout_message, Condition, ConditionTiming, Predicate};
use crate::wait::{FluentWait, Poll, WaitSettings};

/// Waits until a predicate holds for every element of a slice
///
/// An empty slice matches immediately.
pub struct AllMatchCondition<'a, E> {
    elements: &'a [E],
    predicate: Predicate<'a, E>,
    description: String,
    timing: ConditionTiming,
}

impl<E> fmt::Debug for AllMatchCondition<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AllMatchCondition")
            .field("elements", &self.elements.len())
            .field("description", &self.description)
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}

impl<'a, E: UiElement> AllMatchCondition<'a, E> {
    /// Condition that `predicate` holds for all of `elements`
    pub fn new(
        elements: &'a [E],
        predicate: Predicate<'a, E>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            elements,
            predicate,
            description: description.into(),
            timing: ConditionTiming::default(),
        }
    }

    /// What the condition checks
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl<'a, E: UiElement> Condition for AllMatchCondition<'a, E> {
    type Output = &'a [E];

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
    ) -> PomResult<&'a [E]> {
        let subject = format!("entire List {}", self.description);
        tracing::debug!(count = self.elements.len(), "Waiting until {subject}");
        FluentWait::new(WaitSettings::new(timeout, polling_interval))
            .with_message(timeout_message(&subject, timeout, polling_interval))
            .poll(|| {
                for (index, element) in self.elements.iter().enumerate() {
                    if !(self.predicate)(element)? {
                        return Ok(Poll::Pending(format!(
                            "item {index} ({}) does not match",
                            element.element_name()
                        )));
                    }
                }
                Ok(Poll::Ready(self.elements))
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::builder::PageObjectBuilder;
    use crate::context::PageObjectContext;
    use crate::element::ContainerElement;
    use crate::locator::{By, Locator, Strategy};
    use crate::mock::{MockDriver, MockElement};
    use crate::result::PomError;
    use crate::sync::ui_conditions;
    use std::rc::Rc;
    use std::time::Instant;

    fn setup() -> (Rc<MockDriver>, PageContext) {
        let driver = Rc::new(MockDriver::new());
        let ctx = PageObjectContext::new(driver.clone());
        ctx.set_timeout(Duration::from_millis(200));
        ctx.set_polling_interval(Duration::from_millis(20));
        (driver, ctx)
    }

    fn rows(ctx: &PageContext) -> Vec<ContainerElement> {
        PageObjectBuilder::with_context(Rc::clone(ctx))
            .initialize_list::<ContainerElement>(Locator::class_name("row"))
            .to_vec()
            .unwrap()
    }

    fn row(id: &str) -> MockElement {
        MockElement::new(By::new(Strategy::Id, id)).matching(By::new(Strategy::ClassName, "row"))
    }

    #[test]
    fn test_all_visible() {
        let (driver, ctx) = setup();
        driver.add(row("a"));
        driver.add(row("b"));
        let rows = rows(&ctx);
        let condition = AllMatchCondition::new(
            &rows,
            Box::new(ui_conditions::visible()),
            "is visible",
        );
        assert_eq!(condition.wait_then_return(&ctx).unwrap().len(), 2);
    }

    #[test]
    fn test_one_hidden_times_out() {
        let (driver, ctx) = setup();
        driver.add(row("a"));
        driver.add(row("b").hidden());
        let rows = rows(&ctx);
        let condition = AllMatchCondition::new(
            &rows,
            Box::new(ui_conditions::visible()),
            "is visible",
        );
        let start = Instant::now();
        let err = condition.wait_then_return(&ctx).unwrap_err();
        assert!(start.elapsed() >= Duration::from_millis(200));
        match err {
            PomError::ConditionTimeout { message, last_state, .. } => {
                assert!(message.starts_with("Timed out waiting until entire List is visible."));
                assert!(last_state.unwrap().contains("item 1"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_slice_matches() {
        let (_, ctx) = setup();
        let rows: Vec<ContainerElement> = Vec::new();
        let condition = AllMatchCondition::new(
            &rows,
            Box::new(ui_conditions::visible()),
            "is visible",
        );
        assert!(condition.matches_condition(&ctx).unwrap());
    }
}
