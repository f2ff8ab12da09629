//! Behavior shared by every element and component.

use std::rc::Rc;
use std::time::Duration;

use crate::builder::{PageObject, PageObjectBuilder};
use crate::context::PageContext;
use crate::driver::ElementHandle;
use crate::element::lazy::LazyWebElement;
use crate::element::list::LazyList;
use crate::locator::{to_format_args, Locator};
use crate::result::PomResult;
use crate::wait::WaitSettings;

/// An element or component backed by a [`LazyWebElement`]
///
/// Implementors supply the underlying element; everything else is provided.
/// `lazy_for` fails with `UnsupportedOperation` for components that have no
/// underlying element, and every provided method propagates that failure.
pub trait UiElement {
    /// Name used in log lines and errors
    fn element_name(&self) -> &str;

    /// Context the element belongs to
    fn context(&self) -> &PageContext;

    /// Underlying element, or an error naming `operation`
    fn lazy_for(&self, operation: &str) -> PomResult<&LazyWebElement>;

    /// Underlying element
    fn lazy(&self) -> PomResult<&LazyWebElement> {
        self.lazy_for("get underlying element for")
    }

    /// Find the element now
    fn initialize(&self) -> PomResult<()> {
        self.lazy_for("initialize")?.initialize()
    }

    /// Whether a handle is cached
    fn is_initialized(&self) -> PomResult<bool> {
        Ok(self.lazy_for("initialize")?.is_initialized())
    }

    /// Set locator format arguments
    fn format<I>(&self, args: I) -> PomResult<&Self>
    where
        I: IntoIterator,
        I::Item: ToString,
        Self: Sized,
    {
        self.lazy_for("format")?.format(to_format_args(args));
        Ok(self)
    }

    /// Current format arguments
    fn format_args(&self) -> PomResult<Vec<String>> {
        Ok(self.lazy_for("get format arguments for")?.format_args())
    }

    /// Locator
    fn locator(&self) -> PomResult<Locator> {
        Ok(self.lazy_for("get locator for")?.locator().clone())
    }

    /// Parent the element is searched in
    fn parent(&self) -> PomResult<Option<LazyWebElement>> {
        Ok(self.lazy_for("get parent for")?.parent().cloned())
    }

    /// Resolved driver handle
    fn underlying_handle(&self) -> PomResult<ElementHandle> {
        self.lazy_for("get underlying element for")?.underlying()
    }

    /// Override the wait used by this element
    fn set_wait(&self, timeout: Duration, polling_interval: Duration) -> PomResult<()> {
        self.lazy_for("set wait for")?
            .set_wait(WaitSettings::new(timeout, polling_interval));
        Ok(())
    }

    /// Stop waiting for this element
    fn no_wait(&self) -> PomResult<()> {
        self.lazy_for("set wait for")?.no_wait();
        Ok(())
    }

    /// Undo the last wait override
    fn restore_default_wait(&self) -> PomResult<()> {
        self.lazy_for("set wait for")?.restore_default_wait();
        Ok(())
    }

    /// Effective timeout
    fn wait_timeout(&self) -> PomResult<Duration> {
        Ok(self.lazy_for("get wait timeout for")?.wait_timeout())
    }

    /// Effective polling interval
    fn wait_polling_interval(&self) -> PomResult<Duration> {
        Ok(self.lazy_for("get polling interval for")?.wait_polling_interval())
    }

    /// Whether the element can be found
    fn exists(&self) -> PomResult<bool> {
        let lazy = self.lazy_for("check existence of")?;
        let exists = recover(lazy.is_enabled().map(|_| true))?;
        tracing::debug!(
            element = self.element_name(),
            "{} {}",
            self.element_name(),
            if exists { "exists" } else { "does not exist" }
        );
        Ok(exists)
    }

    /// Whether the element is rendered
    fn is_displayed(&self) -> PomResult<bool> {
        let lazy = self.lazy_for("check displayed status for")?;
        let displayed = recover(lazy.is_displayed())?;
        log_probe(self.element_name(), "displayed", displayed);
        Ok(displayed)
    }

    /// Whether the element is enabled
    fn is_enabled(&self) -> PomResult<bool> {
        let lazy = self.lazy_for("check enabled status for")?;
        let enabled = recover(lazy.is_enabled())?;
        log_probe(self.element_name(), "enabled", enabled);
        Ok(enabled)
    }

    /// Whether the element is displayed and enabled
    fn is_clickable(&self) -> PomResult<bool> {
        let lazy = self.lazy_for("check clickable state for")?;
        let clickable = recover(lazy.is_displayed().and_then(|displayed| {
            if displayed {
                lazy.is_enabled()
            } else {
                Ok(false)
            }
        }))?;
        log_probe(self.element_name(), "clickable", clickable);
        Ok(clickable)
    }

    /// Attribute value
    fn attribute(&self, name: &str) -> PomResult<Option<String>> {
        self.lazy_for("get attribute for")?
            .attribute(name)
            .map_err(|err| {
                if err.is_recoverable() {
                    tracing::error!(
                        element = self.element_name(),
                        attribute = name,
                        "{} could not be initialized",
                        self.element_name()
                    );
                }
                err
            })
    }

    /// Rendered text
    fn text(&self) -> PomResult<String> {
        self.lazy_for("get text for")?.text()
    }

    /// Scroll the element into view
    fn scroll_to_element(&self) -> PomResult<()> {
        self.lazy_for("scroll to")?.scroll_to_element()
    }

    /// Child element searched inside this one
    fn child<T: PageObject>(&self, locator: Locator) -> PomResult<T>
    where
        Self: Sized,
    {
        self.child_builder("get child of")?.initialize(locator)
    }

    /// Every child element matching `locator`
    fn children<T: PageObject>(&self, locator: Locator) -> PomResult<LazyList<T>>
    where
        Self: Sized,
    {
        Ok(self.child_builder("get children of")?.initialize_list(locator))
    }

    /// Builder whose objects are searched inside this element
    fn child_builder(&self, operation: &str) -> PomResult<PageObjectBuilder> {
        Ok(PageObjectBuilder::with_context(Rc::clone(self.context()))
            .with_parent(self.lazy_for(operation)?.clone()))
    }
}

/// Treat lookup failures as "no"
fn recover(result: PomResult<bool>) -> PomResult<bool> {
    match result {
        Ok(value) => Ok(value),
        Err(err) if err.is_recoverable() => {
            tracing::trace!(error = %err, "probe failed");
            Ok(false)
        }
        Err(err) => Err(err),
    }
}

fn log_probe(name: &str, state: &str, value: bool) {
    tracing::debug!(
        element = name,
        "{name} {} {state}",
        if value { "is" } else { "is not" }
    );
}
