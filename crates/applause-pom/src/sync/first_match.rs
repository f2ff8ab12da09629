//! Conditions any element of a list may meet.

use std::fmt;
use std::time::Duration;

use crate::context::PageContext;
use crate::element::UiElement;
use crate::result::PomResult;
use crate::sync::condition::{timeout_message, Condition, ConditionTiming, Predicate};
use crate::wait::{FluentWait, Poll, WaitSettings};

/// Waits until a predicate holds for some element of a slice
///
/// Elements are checked in order on every attempt and the first match is
/// returned. A lookup failure on one element counts as a miss for that
/// element only.
pub struct FirstMatchCondition<'a, E> {
    elements: &'a [E],
    predicate: Predicate<'a, E>,
    description: String,
    timing: ConditionTiming,
}

impl<E> fmt::Debug for FirstMatchCondition<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirstMatchCondition")
            .field("elements", &self.elements.len())
            .field("description", &self.description)
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}

impl<'a, E: UiElement> FirstMatchCondition<'a, E> {
    /// Condition that `predicate` holds for one of `elements`
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

    fn first_match(&self) -> PomResult<Option<&'a E>> {
        let elements: &'a [E] = self.elements;
        for element in elements {
            match (self.predicate)(element) {
                Ok(true) => return Ok(Some(element)),
                Ok(false) => {}
                Err(err) if err.is_recoverable() => {
                    tracing::trace!(
                        element = element.element_name(),
                        error = %err,
                        "skipping item"
                    );
                }
                Err(err) => return Err(err),
            }
        }
        Ok(None)
    }
}

impl<'a, E: UiElement> Condition for FirstMatchCondition<'a, E> {
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
        let subject = format!("an item in List {}", self.description);
        tracing::debug!(count = self.elements.len(), "Waiting until {subject}");
        FluentWait::new(WaitSettings::new(timeout, polling_interval))
            .with_message(timeout_message(&subject, timeout, polling_interval))
            .poll(|| {
                Ok(match self.first_match()? {
                    Some(element) => Poll::Ready(element),
                    None => Poll::Pending(format!("none of {} items match", self.elements.len())),
                })
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::builder::PageObjectBuilder;
    use crate::context::PageObjectContext;
    use crate::element::{BaseComponent, ContainerElement};
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

    fn element(ctx: &PageContext, id: &str) -> ContainerElement {
        PageObjectBuilder::with_context(Rc::clone(ctx))
            .initialize(Locator::id(id))
            .unwrap()
    }

    fn id(s: &str) -> By {
        By::new(Strategy::Id, s)
    }

    #[test]
    fn test_returns_first_in_order() {
        let (driver, ctx) = setup();
        driver.add(MockElement::new(id("a")).hidden());
        driver.add(MockElement::new(id("b")));
        driver.add(MockElement::new(id("c")));
        let items = vec![element(&ctx, "a"), element(&ctx, "b"), element(&ctx, "c")];
        let condition = FirstMatchCondition::new(
            &items,
            Box::new(ui_conditions::visible()),
            "is visible",
        );
        let found = condition.wait_then_return(&ctx).unwrap();
        assert!(std::ptr::eq(found, &items[1]));
    }

    #[test]
    fn test_missing_items_are_skipped() {
        let (driver, ctx) = setup();
        driver.add(MockElement::new(id("b")).text("ok"));
        let items = vec![element(&ctx, "missing"), element(&ctx, "b")];
        let condition = FirstMatchCondition::new(
            &items,
            Box::new(ui_conditions::text_equals("ok")),
            "text equals [ok]",
        );
        let start = Instant::now();
        let found = condition.wait_then_return(&ctx).unwrap();
        assert!(std::ptr::eq(found, &items[1]));
        assert!(start.elapsed() < Duration::from_millis(150));
    }

    #[test]
    fn test_no_match_times_out() {
        let (driver, ctx) = setup();
        driver.add(MockElement::new(id("a")).hidden());
        let items = vec![element(&ctx, "a")];
        let condition = FirstMatchCondition::new(
            &items,
            Box::new(ui_conditions::visible()),
            "is visible",
        );
        match condition.wait_then_return(&ctx).unwrap_err() {
            PomError::ConditionTimeout { message, .. } => {
                assert!(message.starts_with("Timed out waiting until an item in List is visible."));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unsupported_item_propagates() {
        let (_, ctx) = setup();
        let items = vec![BaseComponent::new("Card", Rc::clone(&ctx), None)];
        let condition = FirstMatchCondition::new(
            &items,
            Box::new(ui_conditions::visible()),
            "is visible",
        );
        assert!(matches!(
            condition.wait_then_return(&ctx).unwrap_err(),
            PomError::UnsupportedOperation { .. }
        ));
    }
}
