//! Elements that always have an underlying [`LazyWebElement`].

use crate::builder::PageObject;
use crate::context::PageContext;
use crate::driver::{Dimension, Point};
use crate::element::lazy::LazyWebElement;
use crate::element::ui::UiElement;
use crate::result::{PomError, PomResult};

/// Common state of every element kind
#[derive(Debug, Clone)]
pub struct BaseElement {
    name: &'static str,
    element: LazyWebElement,
}

impl BaseElement {
    /// Element named `name` (the kind, e.g. `Button`) around `element`
    #[must_use]
    pub fn new(name: &'static str, element: LazyWebElement) -> Self {
        Self { name, element }
    }

    /// Build for a kind, failing when there is no element
    pub fn build_named(name: &'static str, underlying: Option<LazyWebElement>) -> PomResult<Self> {
        underlying
            .map(|element| Self::new(name, element))
            .ok_or_else(|| PomError::unsupported(name, "build element"))
    }

    /// Underlying element
    #[must_use]
    pub fn element(&self) -> &LazyWebElement {
        &self.element
    }

    /// Click
    pub fn click(&self) -> PomResult<()> {
        tracing::debug!(element = self.name, locator = %self.element.describe_by(), "clicking");
        self.element.click()
    }

    /// Attribute as written in the DOM
    pub fn dom_attribute(&self, name: &str) -> PomResult<Option<String>> {
        self.element.dom_attribute(name)
    }

    /// Live DOM property
    pub fn dom_property(&self, name: &str) -> PomResult<Option<String>> {
        self.element.dom_property(name)
    }

    /// Size
    pub fn dimension(&self) -> PomResult<Dimension> {
        self.element.size()
    }

    /// Top-left corner
    pub fn location(&self) -> PomResult<Point> {
        self.element.location()
    }
}

impl UiElement for BaseElement {
    fn element_name(&self) -> &str {
        self.name
    }

    fn context(&self) -> &PageContext {
        self.element.context()
    }

    fn lazy_for(&self, _operation: &str) -> PomResult<&LazyWebElement> {
        Ok(&self.element)
    }
}

impl PageObject for BaseElement {
    fn build(_context: &PageContext, underlying: Option<LazyWebElement>) -> PomResult<Self> {
        Self::build_named("BaseElement", underlying)
    }
}
