//! Components: page objects grouping other page objects.
//!
//! A component may wrap an underlying element (a form, a card, a row) or
//! stand alone as a whole page. Without an underlying element every
//! element operation fails with `UnsupportedOperation`.

use std::fmt;
use std::rc::Rc;

use crate::builder::{PageObject, PageObjectBuilder};
use crate::context::PageContext;
use crate::element::lazy::LazyWebElement;
use crate::element::ui::UiElement;
use crate::hooks::{self, ComponentHooks};
use crate::result::{PomError, PomResult};

/// State shared by every component
///
/// Embed it in a struct deriving `PageObject` with `#[base]`.
#[derive(Clone)]
pub struct BaseComponent {
    name: &'static str,
    context: PageContext,
    underlying: Option<LazyWebElement>,
    hooks: Option<Rc<dyn ComponentHooks>>,
}

impl fmt::Debug for BaseComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseComponent")
            .field("name", &self.name)
            .field("underlying", &self.underlying)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

impl BaseComponent {
    /// Component named `name`
    #[must_use]
    pub fn new(
        name: &'static str,
        context: PageContext,
        underlying: Option<LazyWebElement>,
    ) -> Self {
        Self {
            name,
            context,
            underlying,
            hooks: None,
        }
    }

    /// Component name
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Underlying element, if any
    #[must_use]
    pub fn underlying(&self) -> Option<&LazyWebElement> {
        self.underlying.as_ref()
    }

    /// Whether the component wraps an element
    #[must_use]
    pub fn has_underlying(&self) -> bool {
        self.underlying.is_some()
    }

    /// Install hooks
    pub fn set_hooks(&mut self, hooks: Rc<dyn ComponentHooks>) {
        self.hooks = Some(hooks);
    }

    /// Run `f` through the installed hooks, if any
    pub fn intercept<T>(&self, operation: &str, f: impl FnOnce() -> PomResult<T>) -> PomResult<T> {
        match &self.hooks {
            Some(hooks) => hooks::intercept(hooks.as_ref(), operation, f),
            None => f(),
        }
    }

    /// Rebuild `T` on this component's element so its children are searched
    /// inside the element's shadow root
    pub fn link_shadow_root<T: PageObject>(&self) -> PomResult<T> {
        let element = self.lazy_for("link shadow root for")?;
        if !element.locator().is_shadow_root() {
            tracing::warn!(
                component = self.name,
                locator = %element.locator(),
                "underlying element is not configured as a shadow root host"
            );
        }
        PageObjectBuilder::with_context(Rc::clone(&self.context)).wrap(element.clone())
    }
}

impl UiElement for BaseComponent {
    fn element_name(&self) -> &str {
        self.name
    }

    fn context(&self) -> &PageContext {
        &self.context
    }

    fn lazy_for(&self, operation: &str) -> PomResult<&LazyWebElement> {
        self.underlying
            .as_ref()
            .ok_or_else(|| PomError::unsupported(self.name, operation))
    }
}

impl PageObject for BaseComponent {
    fn build(context: &PageContext, underlying: Option<LazyWebElement>) -> PomResult<Self> {
        Ok(Self::new("BaseComponent", Rc::clone(context), underlying))
    }

    fn attach_hooks(&mut self, hooks: Rc<dyn ComponentHooks>) {
        self.set_hooks(hooks);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::context::PageObjectContext;
    use crate::locator::{By, Locator, Strategy};
    use crate::mock::{MockDriver, MockElement};
    use std::cell::RefCell;
    use std::time::Duration;

    fn setup() -> (Rc<MockDriver>, PageContext) {
        let driver = Rc::new(MockDriver::new());
        let ctx = PageObjectContext::new(driver.clone());
        ctx.set_timeout(Duration::from_millis(50));
        ctx.set_polling_interval(Duration::from_millis(10));
        (driver, ctx)
    }

    mod unsupported_tests {
        use super::*;

        #[test]
        fn test_every_operation_names_component() {
            let (_, ctx) = setup();
            let page = BaseComponent::new("CheckoutPage", ctx, None);
            let cases: Vec<(PomResult<()>, &str)> = vec![
                (page.initialize(), "initialize"),
                (page.is_displayed().map(drop), "check displayed status for"),
                (page.is_clickable().map(drop), "check clickable state for"),
                (page.is_enabled().map(drop), "check enabled status for"),
                (page.attribute("id").map(drop), "get attribute for"),
                (
                    page.set_wait(Duration::ZERO, Duration::ZERO),
                    "set wait for",
                ),
                (page.scroll_to_element(), "scroll to"),
                (page.format(["x"]).map(drop), "format"),
                (page.locator().map(drop), "get locator for"),
            ];
            for (result, operation) in cases {
                match result.unwrap_err() {
                    PomError::UnsupportedOperation {
                        component,
                        operation: op,
                    } => {
                        assert_eq!(component, "CheckoutPage");
                        assert_eq!(op, operation);
                    }
                    other => panic!("unexpected error: {other}"),
                }
            }
        }
    }

    mod delegation_tests {
        use super::*;

        #[test]
        fn test_delegates_to_underlying() {
            let (driver, ctx) = setup();
            driver.add(MockElement::new(By::new(Strategy::Id, "cart")).attr("data-count", "3"));
            let element = LazyWebElement::new(Locator::id("cart"), Rc::clone(&ctx), None);
            let cart = BaseComponent::new("Cart", ctx, Some(element));
            assert!(cart.exists().unwrap());
            assert_eq!(cart.attribute("data-count").unwrap().as_deref(), Some("3"));
            assert!(cart.is_initialized().unwrap());
        }

        #[derive(Debug, Default)]
        struct Trace(RefCell<Vec<String>>);

        impl ComponentHooks for Trace {
            fn before(&self, operation: &str) {
                self.0.borrow_mut().push(format!("before {operation}"));
            }

            fn after(&self, operation: &str) {
                self.0.borrow_mut().push(format!("after {operation}"));
            }
        }

        #[test]
        fn test_intercept_with_and_without_hooks() {
            let (_, ctx) = setup();
            let mut page = BaseComponent::new("Home", ctx, None);
            assert_eq!(page.intercept("open", || Ok(1)).unwrap(), 1);

            let trace = Rc::new(Trace::default());
            page.set_hooks(trace.clone());
            assert_eq!(page.intercept("open", || Ok(2)).unwrap(), 2);
            assert_eq!(*trace.0.borrow(), ["before open", "after open"]);
        }
    }
}
