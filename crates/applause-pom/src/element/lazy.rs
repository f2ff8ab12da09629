//! Deferred element resolution.
//!
//! A [`LazyWebElement`] holds a locator and finds the element the first time
//! something needs it:
//!
//! ```text
//!   Uninitialized ──initialize()──► Initialized
//!         ▲                              │
//!         └────── stale handle ◄─────────┘
//! ```
//!
//! Driver calls go through `run_lazily`, which initializes on demand,
//! re-resolves once when the cached handle has gone stale, and waits for
//! visibility once when the element was not interactable.
//!
//! Clones share state: a child keeps a clone of its parent and sees the
//! parent's re-resolution.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::context::PageContext;
use crate::driver::{
    Dimension, DriverError, DriverResult, ElementHandle, Point, Rect, SearchScope, WebDriver,
};
use crate::element::chain::LocatorChain;
use crate::locator::{By, Locator};
use crate::result::{PomError, PomResult};
use crate::wait::{FluentWait, WaitSettings};

#[derive(Debug, Default)]
struct State {
    underlying: Option<ElementHandle>,
    shadow_root: Option<ElementHandle>,
    format_args: Vec<String>,
    wait_override: Option<WaitSettings>,
    saved_waits: Vec<Option<WaitSettings>>,
}

struct Inner {
    locator: Locator,
    context: PageContext,
    parent: Option<LazyWebElement>,
    state: RefCell<State>,
}

/// An element resolved on first use
#[derive(Clone)]
pub struct LazyWebElement {
    inner: Rc<Inner>,
}

impl fmt::Debug for LazyWebElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("LazyWebElement")
            .field("locator", &self.inner.locator)
            .field("format_args", &state.format_args)
            .field("underlying", &state.underlying)
            .field("wait_override", &state.wait_override)
            .field("parent", &self.inner.parent)
            .finish()
    }
}

impl LazyWebElement {
    /// Element that will be looked up by `locator`, relative to `parent`
    ///
    /// Never touches the driver.
    #[must_use]
    pub fn new(locator: Locator, context: PageContext, parent: Option<LazyWebElement>) -> Self {
        Self {
            inner: Rc::new(Inner {
                locator,
                context,
                parent,
                state: RefCell::new(State::default()),
            }),
        }
    }

    /// Element whose handle is already known
    ///
    /// `locator` should find the same element again (lists pass an indexed
    /// locator) so the element can re-resolve after going stale.
    #[must_use]
    pub fn preinitialized(
        locator: Locator,
        context: PageContext,
        parent: Option<LazyWebElement>,
        handle: ElementHandle,
    ) -> Self {
        let element = Self::new(locator, context, parent);
        element.adopt(handle);
        element
    }

    /// Cache a handle found by someone else
    pub(crate) fn adopt(&self, handle: ElementHandle) {
        let mut state = self.inner.state.borrow_mut();
        state.underlying = Some(handle);
        state.shadow_root = None;
    }

    /// Locator
    #[must_use]
    pub fn locator(&self) -> &Locator {
        &self.inner.locator
    }

    /// Context
    #[must_use]
    pub fn context(&self) -> &PageContext {
        &self.inner.context
    }

    /// Parent the element is searched in
    #[must_use]
    pub fn parent(&self) -> Option<&LazyWebElement> {
        self.inner.parent.as_ref()
    }

    /// Current format arguments
    #[must_use]
    pub fn format_args(&self) -> Vec<String> {
        self.inner.state.borrow().format_args.clone()
    }

    /// Whether two values share the same underlying state
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Field name, or locator when there is none
    #[must_use]
    pub fn describe(&self) -> String {
        self.inner
            .locator
            .variable_name()
            .map_or_else(|| self.inner.locator.to_string(), str::to_string)
    }

    /// Resolved selector display, or the template when it cannot resolve yet
    #[must_use]
    pub fn describe_by(&self) -> String {
        self.inner
            .locator
            .resolve(&self.inner.state.borrow().format_args)
            .map_or_else(|_| self.inner.locator.to_string(), |by| by.to_string())
    }

    /// Resolve the locator with the current format arguments
    pub fn by(&self) -> PomResult<By> {
        self.inner
            .locator
            .resolve(&self.inner.state.borrow().format_args)
    }

    // =========================================================================
    // FORMAT & WAIT
    // =========================================================================

    /// Set the arguments substituted into a templated locator
    ///
    /// Changing the arguments drops any cached handle.
    pub fn format(&self, args: Vec<String>) -> &Self {
        let mut state = self.inner.state.borrow_mut();
        if state.format_args != args {
            state.underlying = None;
            state.shadow_root = None;
            state.format_args = args;
        }
        drop(state);
        self
    }

    /// Wait used by this element: its override, else the context default
    #[must_use]
    pub fn effective_wait(&self) -> WaitSettings {
        self.inner
            .state
            .borrow()
            .wait_override
            .unwrap_or_else(|| self.inner.context.wait_settings())
    }

    /// Element-level wait override, if any
    #[must_use]
    pub fn wait_override(&self) -> Option<WaitSettings> {
        self.inner.state.borrow().wait_override
    }

    /// Effective timeout
    #[must_use]
    pub fn wait_timeout(&self) -> Duration {
        self.effective_wait().timeout
    }

    /// Effective polling interval
    #[must_use]
    pub fn wait_polling_interval(&self) -> Duration {
        self.effective_wait().polling_interval
    }

    /// Override the wait; [`restore_default_wait`](Self::restore_default_wait)
    /// brings back the previous one
    pub fn set_wait(&self, settings: WaitSettings) {
        let mut state = self.inner.state.borrow_mut();
        let previous = state.wait_override;
        state.saved_waits.push(previous);
        state.wait_override = Some(settings);
    }

    /// Use a zero timeout and polling interval
    pub fn no_wait(&self) {
        self.set_wait(WaitSettings::ZERO);
    }

    /// Undo the most recent [`set_wait`](Self::set_wait) or
    /// [`no_wait`](Self::no_wait); with nothing to undo, fall back to the
    /// context default
    pub fn restore_default_wait(&self) {
        let mut state = self.inner.state.borrow_mut();
        state.wait_override = state.saved_waits.pop().flatten();
    }

    /// Drop every override and fall back to the context default
    pub fn clear_wait(&self) {
        let mut state = self.inner.state.borrow_mut();
        state.wait_override = None;
        state.saved_waits.clear();
    }

    /// Override the wait until the guard is dropped
    #[must_use = "the override ends when the guard is dropped"]
    pub fn scoped_wait(&self, settings: WaitSettings) -> WaitGuard {
        let previous = {
            let mut state = self.inner.state.borrow_mut();
            state.wait_override.replace(settings)
        };
        WaitGuard {
            element: self.clone(),
            previous,
        }
    }

    /// Run `f` with waiting disabled, restoring the previous wait afterwards
    /// whatever `f` returns
    pub fn with_no_wait<T>(&self, f: impl FnOnce() -> T) -> T {
        let _guard = self.scoped_wait(WaitSettings::ZERO);
        f()
    }

    // =========================================================================
    // RESOLUTION
    // =========================================================================

    /// Whether a handle is cached; never queries the driver
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.inner.state.borrow().underlying.is_some()
    }

    /// Find the element using the effective wait and cache the handle
    pub fn initialize(&self) -> PomResult<()> {
        self.by()?;
        let chain = LocatorChain::new(self);
        let handle = chain.find_element()?;
        let shadow_root = if self.inner.locator.is_shadow_root() {
            Some(self.driver().shadow_root(&handle)?)
        } else {
            None
        };
        tracing::debug!(
            element = %self.describe(),
            locator = %chain.by_chain(),
            platform = %self.inner.locator.platform(),
            "initialized element"
        );
        let mut state = self.inner.state.borrow_mut();
        state.underlying = Some(handle);
        state.shadow_root = shadow_root;
        Ok(())
    }

    /// Forget the cached handle
    pub fn reset(&self) {
        let mut state = self.inner.state.borrow_mut();
        state.underlying = None;
        state.shadow_root = None;
    }

    /// Where children of this element are searched
    pub(crate) fn search_scope(&self) -> PomResult<SearchScope> {
        let handle = self.cached()?;
        if !self.inner.locator.is_shadow_root() {
            return Ok(SearchScope::Element(handle));
        }
        let cached_root = self.inner.state.borrow().shadow_root.clone();
        let root = match cached_root {
            Some(root) => root,
            None => {
                let root = self.driver().shadow_root(&handle)?;
                self.inner.state.borrow_mut().shadow_root = Some(root.clone());
                root
            }
        };
        Ok(SearchScope::ShadowRoot(root))
    }

    fn driver(&self) -> &dyn WebDriver {
        self.inner.context.driver()
    }

    fn cached(&self) -> PomResult<ElementHandle> {
        self.inner
            .state
            .borrow()
            .underlying
            .clone()
            .ok_or_else(|| PomError::StaleElement {
                locator: self.describe_by(),
            })
    }

    fn run_lazily<T>(
        &self,
        operation: &str,
        mut op: impl FnMut(&dyn WebDriver, &ElementHandle) -> DriverResult<T>,
    ) -> PomResult<T> {
        if !self.is_initialized() {
            self.initialize()?;
        }
        let handle = self.cached()?;
        match op(self.driver(), &handle) {
            Ok(value) => Ok(value),
            Err(DriverError::StaleElementReference { .. }) => {
                tracing::debug!(
                    element = %self.describe(),
                    operation,
                    "stale element, re-resolving"
                );
                self.reset();
                self.initialize()?;
                let handle = self.cached()?;
                match op(self.driver(), &handle) {
                    Ok(value) => Ok(value),
                    Err(DriverError::StaleElementReference { .. }) => {
                        Err(PomError::ElementNotFound {
                            locator: LocatorChain::new(self).by_chain(),
                            message: format!("element went stale again during {operation}"),
                        })
                    }
                    Err(DriverError::ElementNotInteractable { .. }) => {
                        self.retry_when_visible(operation, &handle, op)
                    }
                    Err(err) => Err(err.into()),
                }
            }
            Err(DriverError::ElementNotInteractable { .. }) => {
                self.retry_when_visible(operation, &handle, op)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn retry_when_visible<T>(
        &self,
        operation: &str,
        handle: &ElementHandle,
        mut op: impl FnMut(&dyn WebDriver, &ElementHandle) -> DriverResult<T>,
    ) -> PomResult<T> {
        tracing::debug!(
            element = %self.describe(),
            operation,
            "element not interactable, waiting for visibility"
        );
        let driver = self.driver();
        FluentWait::new(self.effective_wait())
            .until(|| Ok(driver.is_displayed(handle)?.then_some(())))
            .map_err(|err| match err {
                PomError::ConditionTimeout { .. } => PomError::NotInteractable {
                    locator: self.describe_by(),
                    message: format!("still not visible, cannot {operation}"),
                },
                other => other,
            })?;
        op(driver, handle).map_err(|err| match err {
            DriverError::ElementNotInteractable { .. } => PomError::NotInteractable {
                locator: self.describe_by(),
                message: format!("cannot {operation}"),
            },
            other => other.into(),
        })
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Resolved driver handle
    pub fn underlying(&self) -> PomResult<ElementHandle> {
        if !self.is_initialized() {
            self.initialize()?;
        }
        self.cached()
    }

    /// Shadow root handle of a shadow-host element
    pub fn shadow_root(&self) -> PomResult<ElementHandle> {
        self.run_lazily("get shadow root", |d, h| d.shadow_root(h))
    }

    /// Attribute, falling back to the property of the same name
    pub fn attribute(&self, name: &str) -> PomResult<Option<String>> {
        self.run_lazily("get attribute", |d, h| d.attribute(h, name))
    }

    /// Attribute as written in the DOM
    pub fn dom_attribute(&self, name: &str) -> PomResult<Option<String>> {
        self.run_lazily("get DOM attribute", |d, h| d.dom_attribute(h, name))
    }

    /// Live DOM property
    pub fn dom_property(&self, name: &str) -> PomResult<Option<String>> {
        self.run_lazily("get DOM property", |d, h| d.dom_property(h, name))
    }

    /// Rendered text
    pub fn text(&self) -> PomResult<String> {
        self.run_lazily("get text", |d, h| d.text(h))
    }

    /// Tag name
    pub fn tag_name(&self) -> PomResult<String> {
        self.run_lazily("get tag name", |d, h| d.tag_name(h))
    }

    /// Whether rendered
    pub fn is_displayed(&self) -> PomResult<bool> {
        self.run_lazily("check displayed", |d, h| d.is_displayed(h))
    }

    /// Whether enabled
    pub fn is_enabled(&self) -> PomResult<bool> {
        self.run_lazily("check enabled", |d, h| d.is_enabled(h))
    }

    /// Whether selected
    pub fn is_selected(&self) -> PomResult<bool> {
        self.run_lazily("check selected", |d, h| d.is_selected(h))
    }

    /// Bounding rectangle
    pub fn rect(&self) -> PomResult<Rect> {
        self.run_lazily("get rect", |d, h| d.rect(h))
    }

    /// Top-left corner
    pub fn location(&self) -> PomResult<Point> {
        self.rect().map(|r| r.location())
    }

    /// Size
    pub fn size(&self) -> PomResult<Dimension> {
        self.rect().map(|r| r.dimension())
    }

    /// Computed CSS value
    pub fn css_value(&self, property: &str) -> PomResult<String> {
        self.run_lazily("get CSS value", |d, h| d.css_value(h, property))
    }

    /// Click
    pub fn click(&self) -> PomResult<()> {
        self.run_lazily("click", |d, h| d.click(h))
    }

    /// Submit the enclosing form
    pub fn submit(&self) -> PomResult<()> {
        self.run_lazily("submit", |d, h| d.submit(h))
    }

    /// Type text
    pub fn send_keys(&self, keys: &str) -> PomResult<()> {
        self.run_lazily("send keys", |d, h| d.send_keys(h, keys))
    }

    /// Clear an input
    pub fn clear(&self) -> PomResult<()> {
        self.run_lazily("clear", |d, h| d.clear(h))
    }

    /// First descendant matching `by`
    pub fn find_element(&self, by: &By) -> PomResult<ElementHandle> {
        self.run_lazily("find element", |d, h| d.find_element(&self.child_scope(d, h)?, by))
    }

    /// All descendants matching `by`
    pub fn find_elements(&self, by: &By) -> PomResult<Vec<ElementHandle>> {
        self.run_lazily("find elements", |d, h| d.find_elements(&self.child_scope(d, h)?, by))
    }

    fn child_scope(
        &self,
        driver: &dyn WebDriver,
        handle: &ElementHandle,
    ) -> DriverResult<SearchScope> {
        if self.inner.locator.is_shadow_root() {
            return Ok(SearchScope::ShadowRoot(driver.shadow_root(handle)?));
        }
        Ok(SearchScope::Element(handle.clone()))
    }

    /// Scroll the page so the element's top edge is in view
    pub fn scroll_to_element(&self) -> PomResult<()> {
        let y = self.location()?.y;
        self.driver()
            .execute_script(&format!("window.scrollTo(0, {y});"), &[])?;
        Ok(())
    }
}

/// Restores an element's previous wait override when dropped
#[derive(Debug)]
pub struct WaitGuard {
    element: LazyWebElement,
    previous: Option<WaitSettings>,
}

impl Drop for WaitGuard {
    fn drop(&mut self) {
        self.element.inner.state.borrow_mut().wait_override = self.previous;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::context::PageObjectContext;
    use crate::locator::{to_format_args, Strategy};
    use crate::mock::{MockDriver, MockElement};
    use std::time::Instant;

    fn setup(timeout_ms: u64) -> (Rc<MockDriver>, PageContext) {
        let driver = Rc::new(MockDriver::new());
        let ctx = PageObjectContext::new(driver.clone());
        ctx.set_timeout(Duration::from_millis(timeout_ms));
        ctx.set_polling_interval(Duration::from_millis(10));
        (driver, ctx)
    }

    fn id(s: &str) -> By {
        By::new(Strategy::Id, s)
    }

    mod resolution_tests {
        use super::*;

        #[test]
        fn test_construction_is_lazy() {
            let (driver, ctx) = setup(100);
            let el = LazyWebElement::new(Locator::id("submit"), ctx, None);
            assert!(!el.is_initialized());
            assert!(driver.history().is_empty());
        }

        #[test]
        fn test_initialize_twice_reuses_handle() {
            let (driver, ctx) = setup(100);
            let node = driver.add(MockElement::new(id("submit")));
            let el = LazyWebElement::new(Locator::id("submit"), ctx, None);
            el.initialize().unwrap();
            let first = el.underlying().unwrap();
            let _ = el.underlying().unwrap();
            let _ = el.text().unwrap();
            assert_eq!(first, driver.handle(node));
            assert_eq!(driver.find_count(), 1);
        }

        #[test]
        fn test_unformatted_then_formatted() {
            let (driver, ctx) = setup(100);
            driver.add(MockElement::new(id("button-submit")));
            let el = LazyWebElement::new("id=button-%s".parse().unwrap(), ctx, None);
            assert!(matches!(
                el.initialize().unwrap_err(),
                PomError::LocatorUnformatted { .. }
            ));
            el.format(to_format_args(["submit"]));
            el.initialize().unwrap();
            assert!(el.is_initialized());
            assert_eq!(el.by().unwrap().to_string(), "By.id: button-submit");
        }

        #[test]
        fn test_reformat_drops_cache() {
            let (driver, ctx) = setup(100);
            let a = driver.add(MockElement::new(id("row-a")));
            let b = driver.add(MockElement::new(id("row-b")));
            let el = LazyWebElement::new(Locator::id("row-%s"), ctx, None);
            el.format(to_format_args(["a"]));
            assert_eq!(el.underlying().unwrap(), driver.handle(a));
            el.format(to_format_args(["a"]));
            assert!(el.is_initialized());
            el.format(to_format_args(["b"]));
            assert!(!el.is_initialized());
            assert_eq!(el.underlying().unwrap(), driver.handle(b));
        }

        #[test]
        fn test_missing_element_not_found_after_timeout() {
            let (_, ctx) = setup(80);
            let el = LazyWebElement::new(Locator::id("ghost").named("ghost_field"), ctx, None);
            let start = Instant::now();
            let err = el.initialize().unwrap_err();
            assert!(start.elapsed() >= Duration::from_millis(80));
            assert!(matches!(err, PomError::ElementNotFound { .. }));
            assert!(err.to_string().contains("ghost_field"));
        }

        #[test]
        fn test_waits_for_late_element() {
            let (driver, ctx) = setup(1000);
            driver.add(MockElement::new(id("late")).available_after(Duration::from_millis(50)));
            let el = LazyWebElement::new(Locator::id("late"), ctx, None);
            el.initialize().unwrap();
            assert!(driver.find_count() > 1);
        }

        #[test]
        fn test_shadow_root_children() {
            let (driver, ctx) = setup(100);
            let host = driver.add(MockElement::new(id("host")));
            let inner = driver.add_shadow_child(host, MockElement::new(id("inner")).text("deep"));
            let parent =
                LazyWebElement::new(Locator::id("host").with_shadow_root(true), ctx.clone(), None);
            let child = LazyWebElement::new(Locator::id("inner"), ctx, Some(parent));
            assert_eq!(child.text().unwrap(), "deep");
            assert_eq!(child.underlying().unwrap(), driver.handle(inner));
        }
    }

    mod stale_tests {
        use super::*;

        #[test]
        fn test_stale_handle_reresolved_once() {
            let (driver, ctx) = setup(100);
            let node = driver.add(MockElement::new(id("banner")).text("Welcome"));
            let el = LazyWebElement::new(Locator::id("banner"), ctx, None);
            el.initialize().unwrap();
            let fresh = driver.invalidate(node);
            assert_eq!(el.text().unwrap(), "Welcome");
            assert_eq!(el.underlying().unwrap(), fresh);
            assert_eq!(driver.find_count(), 2);
        }

        #[test]
        fn test_removed_element_surfaces_not_found() {
            let (driver, ctx) = setup(50);
            let node = driver.add(MockElement::new(id("toast")));
            let el = LazyWebElement::new(Locator::id("toast"), ctx, None);
            el.initialize().unwrap();
            driver.remove(node);
            let err = el.text().unwrap_err();
            assert!(matches!(err, PomError::ElementNotFound { .. }));
        }

        #[test]
        fn test_stale_parent_reresolved_for_child() {
            let (driver, ctx) = setup(200);
            let form = driver.add(MockElement::new(id("form")));
            driver.add_child(form, MockElement::new(id("email")).text("e"));
            let parent = LazyWebElement::new(Locator::id("form"), ctx.clone(), None);
            let child = LazyWebElement::new(Locator::id("email"), ctx, Some(parent.clone()));
            parent.initialize().unwrap();
            let fresh_form = driver.invalidate(form);
            assert_eq!(child.text().unwrap(), "e");
            assert_eq!(parent.underlying().unwrap(), fresh_form);
        }

        #[test]
        fn test_preinitialized_reresolves_by_index() {
            let (driver, ctx) = setup(100);
            let by = By::new(Strategy::Css, "li");
            let _a = driver.add(MockElement::new(by.clone()).text("a"));
            let b = driver.add(MockElement::new(by).text("b"));
            let el = LazyWebElement::preinitialized(
                Locator::css("li").with_index(1),
                ctx,
                None,
                driver.handle(b),
            );
            assert!(el.is_initialized());
            driver.invalidate(b);
            assert_eq!(el.text().unwrap(), "b");
        }
    }

    mod interactable_tests {
        use super::*;

        #[test]
        fn test_click_waits_for_visibility() {
            let (driver, ctx) = setup(1000);
            driver.add(MockElement::new(id("menu")).displayed_after(Duration::from_millis(50)));
            let el = LazyWebElement::new(Locator::id("menu"), ctx, None);
            el.click().unwrap();
            assert_eq!(driver.call_count("click:"), 2);
        }

        #[test]
        fn test_click_hidden_fails_not_interactable() {
            let (driver, ctx) = setup(50);
            driver.add(MockElement::new(id("menu")).hidden());
            let el = LazyWebElement::new(Locator::id("menu"), ctx, None);
            assert!(matches!(
                el.click().unwrap_err(),
                PomError::NotInteractable { .. }
            ));
        }
    }

    mod wait_tests {
        use super::*;

        #[test]
        fn test_context_default_applies() {
            let (_, ctx) = setup(300);
            let el = LazyWebElement::new(Locator::id("a"), ctx.clone(), None);
            assert_eq!(el.wait_timeout(), Duration::from_millis(300));
            ctx.set_timeout(Duration::from_millis(700));
            assert_eq!(el.wait_timeout(), Duration::from_millis(700));
        }

        #[test]
        fn test_set_wait_then_restore() {
            let (_, ctx) = setup(300);
            let el = LazyWebElement::new(Locator::id("a"), ctx, None);
            el.set_wait(WaitSettings::from_millis(5000, 500));
            el.no_wait();
            assert_eq!(el.effective_wait(), WaitSettings::ZERO);
            el.restore_default_wait();
            assert_eq!(el.effective_wait(), WaitSettings::from_millis(5000, 500));
            el.restore_default_wait();
            assert_eq!(el.effective_wait(), WaitSettings::from_millis(300, 10));
            el.restore_default_wait();
            assert_eq!(el.wait_override(), None);
        }

        #[test]
        fn test_restore_after_failed_probe() {
            let (_, ctx) = setup(300);
            let el = LazyWebElement::new(Locator::id("ghost"), ctx, None);
            el.set_wait(WaitSettings::from_millis(40, 10));
            el.no_wait();
            assert!(el.text().is_err());
            el.restore_default_wait();
            assert_eq!(el.effective_wait(), WaitSettings::from_millis(40, 10));
        }

        #[test]
        fn test_with_no_wait_restores_on_error_and_panic() {
            let (_, ctx) = setup(300);
            let el = LazyWebElement::new(Locator::id("ghost"), ctx, None);
            el.set_wait(WaitSettings::from_millis(900, 90));

            let start = Instant::now();
            let result = el.with_no_wait(|| el.text());
            assert!(result.is_err());
            assert!(start.elapsed() < Duration::from_millis(100));
            assert_eq!(el.effective_wait(), WaitSettings::from_millis(900, 90));

            let el2 = el.clone();
            let panicked = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                el2.with_no_wait(|| panic!("probe exploded"));
            }));
            assert!(panicked.is_err());
            assert_eq!(el.effective_wait(), WaitSettings::from_millis(900, 90));
        }
    }

    #[test]
    fn test_scroll_to_element() {
        let (driver, ctx) = setup(100);
        driver.add(MockElement::new(id("footer")).rect(Rect::new(0, 1200, 800, 60)));
        let el = LazyWebElement::new(Locator::id("footer"), ctx, None);
        el.scroll_to_element().unwrap();
        assert!(driver.was_called("execute_script:window.scrollTo(0, 1200);"));
    }
}
