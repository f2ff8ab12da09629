//! Lazy collections of page objects.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::builder::{PageObject, PageObjectBuilder};
use crate::context::PageContext;
use crate::element::chain::LocatorChain;
use crate::element::lazy::LazyWebElement;
use crate::locator::{to_format_args, Locator};
use crate::result::PomResult;
use crate::wait::WaitSettings;

/// Every page object matching a locator, found on first access
///
/// Items are built around pre-found handles with indexed locators, so each
/// item re-resolves to the same position after going stale. With
/// `auto_refresh_list` the list is looked up again before every access.
pub struct LazyList<T> {
    lookup: LazyWebElement,
    items: RefCell<Option<Vec<T>>>,
}

impl<T> fmt::Debug for LazyList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyList")
            .field("item_type", &std::any::type_name::<T>())
            .field("locator", self.lookup.locator())
            .field("len", &self.items.borrow().as_ref().map(Vec::len))
            .finish()
    }
}

impl<T: PageObject> LazyList<T> {
    /// List of matches for `locator` inside `parent`
    #[must_use]
    pub fn new(locator: Locator, context: PageContext, parent: Option<LazyWebElement>) -> Self {
        Self {
            lookup: LazyWebElement::new(locator, context, parent),
            items: RefCell::new(None),
        }
    }

    /// Locator of the items
    #[must_use]
    pub fn locator(&self) -> &Locator {
        self.lookup.locator()
    }

    /// Parent the items are searched in
    #[must_use]
    pub fn parent(&self) -> Option<&LazyWebElement> {
        self.lookup.parent()
    }

    /// Set locator format arguments; changing them discards found items
    pub fn format(&self, args: Vec<String>) -> &Self {
        if self.lookup.format_args() != args {
            self.items.borrow_mut().take();
        }
        self.lookup.format(args);
        self
    }

    /// Set locator format arguments from any displayable values
    pub fn format_with<I>(&self, args: I) -> &Self
    where
        I: IntoIterator,
        I::Item: ToString,
    {
        self.format(to_format_args(args))
    }

    /// Current format arguments
    #[must_use]
    pub fn format_args(&self) -> Vec<String> {
        self.lookup.format_args()
    }

    /// Override the wait used to find the items
    pub fn set_wait(&self, timeout: Duration, polling_interval: Duration) {
        self.lookup
            .set_wait(WaitSettings::new(timeout, polling_interval));
    }

    /// Stop waiting for items
    pub fn no_wait(&self) {
        self.lookup.no_wait();
    }

    /// Undo the last wait override
    pub fn restore_default_wait(&self) {
        self.lookup.restore_default_wait();
    }

    /// Effective timeout
    #[must_use]
    pub fn wait_timeout(&self) -> Duration {
        self.lookup.wait_timeout()
    }

    /// Effective polling interval
    #[must_use]
    pub fn wait_polling_interval(&self) -> Duration {
        self.lookup.wait_polling_interval()
    }

    /// Whether the items have been found
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.items.borrow().is_some()
    }

    /// Find the items now
    ///
    /// With `throw_exception_on_empty_list` an empty result fails with
    /// `ElementNotFound` after the wait; otherwise it yields an empty list.
    pub fn initialize(&self) -> PomResult<()> {
        self.lookup.by()?;
        let context = self.lookup.context();
        let allow_empty = !context.options().throw_exception_on_empty_list;
        let chain = LocatorChain::new(&self.lookup);
        let handles = chain.find_elements(self.lookup.effective_wait(), allow_empty)?;

        let builder = PageObjectBuilder::with_context(Rc::clone(context))
            .with_optional_parent(self.lookup.parent().cloned());
        let args = self.lookup.format_args();
        let items = handles
            .into_iter()
            .enumerate()
            .map(|(i, handle)| {
                let item = builder.lazy(self.lookup.locator().with_index(i));
                item.format(args.clone());
                item.adopt(handle);
                builder.wrap(item)
            })
            .collect::<PomResult<Vec<T>>>()?;

        tracing::debug!(
            item_type = std::any::type_name::<T>(),
            locator = %chain.by_chain(),
            platform = %self.lookup.locator().platform(),
            len = items.len(),
            "initialized list"
        );
        *self.items.borrow_mut() = Some(items);
        Ok(())
    }

    /// Run `f` over the items, finding them first if needed
    pub fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> PomResult<R> {
        let refresh = self.lookup.context().options().auto_refresh_list;
        if refresh || !self.is_initialized() {
            self.initialize()?;
        }
        let items = self.items.borrow();
        Ok(f(items.as_deref().unwrap_or_default()))
    }

    /// Number of items
    pub fn len(&self) -> PomResult<usize> {
        self.with_items(<[T]>::len)
    }

    /// Whether there are no items
    pub fn is_empty(&self) -> PomResult<bool> {
        self.with_items(<[T]>::is_empty)
    }
}

impl<T: PageObject + Clone> LazyList<T> {
    /// Item at `index`
    pub fn get(&self, index: usize) -> PomResult<Option<T>> {
        self.with_items(|items| items.get(index).cloned())
    }

    /// Every item
    pub fn to_vec(&self) -> PomResult<Vec<T>> {
        self.with_items(<[T]>::to_vec)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::context::{PageObjectContext, PageObjectOptions};
    use crate::element::{ContainerElement, UiElement};
    use crate::locator::{By, Strategy};
    use crate::mock::{MockDriver, MockElement};
    use crate::platform::Platform;
    use crate::result::PomError;

    fn setup(options: PageObjectOptions) -> (Rc<MockDriver>, PageContext) {
        let driver = Rc::new(MockDriver::new());
        let options = options
            .with_timeout(Duration::from_millis(50))
            .with_polling_interval(Duration::from_millis(10));
        let ctx = PageObjectContext::with_options(driver.clone(), Platform::Web, options);
        (driver, ctx)
    }

    fn css(s: &str) -> By {
        By::new(Strategy::Css, s)
    }

    mod lookup_tests {
        use super::*;

        #[test]
        fn test_lazy_until_accessed() {
            let (driver, ctx) = setup(PageObjectOptions::default());
            driver.add(MockElement::new(css("li")).text("one"));
            let list: LazyList<ContainerElement> = LazyList::new(Locator::css("li"), ctx, None);
            assert!(!list.is_initialized());
            assert_eq!(driver.find_count(), 0);
            assert_eq!(list.len().unwrap(), 1);
            assert_eq!(list.len().unwrap(), 1);
            assert_eq!(driver.find_count(), 1);
        }

        #[test]
        fn test_items_are_indexed_and_preinitialized() {
            let (driver, ctx) = setup(PageObjectOptions::default());
            for text in ["a", "b", "c"] {
                driver.add(MockElement::new(css("li")).text(text));
            }
            let list: LazyList<ContainerElement> = LazyList::new(Locator::css("li"), ctx, None);
            let items = list.to_vec().unwrap();
            assert_eq!(items.len(), 3);
            assert!(items.iter().all(|i| i.is_initialized().unwrap()));
            assert_eq!(items[2].locator().unwrap().index(), Some(2));
            assert_eq!(items[1].text().unwrap(), "b");
        }

        #[test]
        fn test_stale_item_reresolves_by_index() {
            let (driver, ctx) = setup(PageObjectOptions::default());
            let _a = driver.add(MockElement::new(css("li")).text("a"));
            let b = driver.add(MockElement::new(css("li")).text("b"));
            let list: LazyList<ContainerElement> = LazyList::new(Locator::css("li"), ctx, None);
            let second = list.get(1).unwrap().unwrap();
            driver.invalidate(b);
            assert_eq!(second.text().unwrap(), "b");
        }

        #[test]
        fn test_formatted_list() {
            let (driver, ctx) = setup(PageObjectOptions::default());
            driver.add(MockElement::new(css("tr.row-open")));
            driver.add(MockElement::new(css("tr.row-closed")));
            driver.add(MockElement::new(css("tr.row-closed")));
            let list: LazyList<ContainerElement> =
                LazyList::new(Locator::css("tr.row-%s"), ctx, None);
            assert!(matches!(
                list.len().unwrap_err(),
                PomError::LocatorUnformatted { .. }
            ));
            list.format_with(["open"]);
            assert_eq!(list.len().unwrap(), 1);
            list.format_with(["closed"]);
            assert!(!list.is_initialized());
            assert_eq!(list.len().unwrap(), 2);
        }
    }

    mod empty_tests {
        use super::*;

        #[test]
        fn test_empty_list_fails_by_default() {
            let (_, ctx) = setup(PageObjectOptions::default());
            let list: LazyList<ContainerElement> =
                LazyList::new(Locator::css(".result").named("results"), ctx, None);
            let err = list.len().unwrap_err();
            assert!(matches!(err, PomError::ElementNotFound { .. }));
            assert!(err.to_string().contains("results"));
        }

        #[test]
        fn test_empty_list_allowed() {
            let (_, ctx) = setup(PageObjectOptions::default().with_throw_on_empty_list(false));
            let list: LazyList<ContainerElement> =
                LazyList::new(Locator::css(".result"), ctx, None);
            assert!(list.is_empty().unwrap());
            assert!(list.is_initialized());
        }
    }

    #[test]
    fn test_auto_refresh_sees_new_items() {
        let (driver, ctx) = setup(PageObjectOptions::default().with_auto_refresh_list(true));
        driver.add(MockElement::new(css("li")));
        let list: LazyList<ContainerElement> = LazyList::new(Locator::css("li"), ctx, None);
        assert_eq!(list.len().unwrap(), 1);
        driver.add(MockElement::new(css("li")));
        assert_eq!(list.len().unwrap(), 2);
        assert_eq!(driver.find_count(), 2);
    }

    #[test]
    fn test_without_refresh_keeps_snapshot() {
        let (driver, ctx) = setup(PageObjectOptions::default());
        driver.add(MockElement::new(css("li")));
        let list: LazyList<ContainerElement> = LazyList::new(Locator::css("li"), ctx, None);
        assert_eq!(list.len().unwrap(), 1);
        driver.add(MockElement::new(css("li")));
        assert_eq!(list.len().unwrap(), 1);
        list.initialize().unwrap();
        assert_eq!(list.len().unwrap(), 2);
    }
}
