//! Page object construction.
//!
//! Every element kind and component implements [`PageObject`]. A
//! [`PageObjectBuilder`] carries the context, the parent to search in and
//! the format arguments, and turns a locator (or an existing lazy element)
//! into a page object. Nothing is looked up while building.

use std::rc::Rc;

use crate::context::PageContext;
use crate::driver::ElementHandle;
use crate::element::lazy::LazyWebElement;
use crate::element::list::LazyList;
use crate::hooks::ComponentHooks;
use crate::locator::{to_format_args, Locator};
use crate::platform::{select_for_platform, Platform};
use crate::result::{PomError, PomResult};

/// A page, component or element that can be built around a lazy element
///
/// Derive it for components with `#[derive(PageObject)]`.
pub trait PageObject: Sized {
    /// Build the object; `underlying` is `None` for top-level pages
    fn build(context: &PageContext, underlying: Option<LazyWebElement>) -> PomResult<Self>;

    /// Runs once after [`build`](Self::build)
    fn after_init(&mut self) -> PomResult<()> {
        Ok(())
    }

    /// Receive the builder's hooks
    fn attach_hooks(&mut self, _hooks: Rc<dyn ComponentHooks>) {}
}

/// Builds page objects for one context
#[derive(Debug, Clone)]
pub struct PageObjectBuilder {
    context: PageContext,
    parent: Option<LazyWebElement>,
    format_args: Vec<String>,
    hooks: Option<Rc<dyn ComponentHooks>>,
}

impl PageObjectBuilder {
    /// Builder for top-level objects of `context`
    #[must_use]
    pub fn with_context(context: PageContext) -> Self {
        Self {
            context,
            parent: None,
            format_args: Vec::new(),
            hooks: None,
        }
    }

    /// Search built elements inside `parent`
    #[must_use]
    pub fn with_parent(mut self, parent: LazyWebElement) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Search inside `parent` when there is one
    #[must_use]
    pub fn with_optional_parent(mut self, parent: Option<LazyWebElement>) -> Self {
        self.parent = parent;
        self
    }

    /// Format arguments applied to every built element
    #[must_use]
    pub fn with_format<I>(mut self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: ToString,
    {
        self.format_args = to_format_args(args);
        self
    }

    /// Hooks handed to every built object
    #[must_use]
    pub fn with_hooks(mut self, hooks: Rc<dyn ComponentHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Context
    #[must_use]
    pub fn context(&self) -> &PageContext {
        &self.context
    }

    /// Parent built elements are searched in
    #[must_use]
    pub fn parent(&self) -> Option<&LazyWebElement> {
        self.parent.as_ref()
    }

    /// Lazy element for `locator` under this builder's parent
    #[must_use]
    pub fn lazy(&self, locator: Locator) -> LazyWebElement {
        let element = LazyWebElement::new(locator, Rc::clone(&self.context), self.parent.clone());
        if !self.format_args.is_empty() {
            element.format(self.format_args.clone());
        }
        element
    }

    /// Page object located by `locator`
    pub fn initialize<T: PageObject>(&self, locator: Locator) -> PomResult<T> {
        self.wrap(self.lazy(locator))
    }

    /// Lazy list of page objects located by `locator`
    #[must_use]
    pub fn initialize_list<T: PageObject>(&self, locator: Locator) -> LazyList<T> {
        let list = LazyList::new(locator, Rc::clone(&self.context), self.parent.clone());
        if !self.format_args.is_empty() {
            list.format(self.format_args.clone());
        }
        list
    }

    /// Page object around an element that has already been found
    ///
    /// `locator` should find the same element again after it goes stale.
    pub fn from_handle<T: PageObject>(
        &self,
        handle: ElementHandle,
        locator: Locator,
    ) -> PomResult<T> {
        let element = self.lazy(locator);
        element.adopt(handle);
        self.wrap(element)
    }

    /// Page object around an existing lazy element
    pub fn wrap<T: PageObject>(&self, element: LazyWebElement) -> PomResult<T> {
        tracing::trace!(
            page_object = std::any::type_name::<T>(),
            locator = %element.locator(),
            "building page object"
        );
        self.finish(T::build(&self.context, Some(element))?)
    }

    /// Top-level page object with no underlying element
    pub fn build<T: PageObject>(&self) -> PomResult<T> {
        tracing::trace!(page_object = std::any::type_name::<T>(), "building page");
        self.finish(T::build(&self.context, None)?)
    }

    fn finish<T: PageObject>(&self, mut object: T) -> PomResult<T> {
        if let Some(hooks) = &self.hooks {
            object.attach_hooks(Rc::clone(hooks));
        }
        object.after_init()?;
        Ok(object)
    }
}

/// The locator declared for `platform`, or its nearest fallback
///
/// Fails when no candidate applies or when more than one candidate is
/// declared for the selected platform.
pub fn select_locator(
    candidates: &[Locator],
    platform: Platform,
    field: &str,
) -> PomResult<Locator> {
    let selected = select_for_platform(candidates, platform, Locator::platform);
    match selected.matches.as_slice() {
        [locator] => Ok((*locator).clone()),
        [] => Err(PomError::InvalidLocator {
            locator: field.to_string(),
            message: format!("no locator declared for platform [{platform}]"),
        }),
        _ => Err(PomError::InvalidLocator {
            locator: field.to_string(),
            message: format!(
                "more than one locator declared for platform [{}]",
                selected.platform
            ),
        }),
    }
}

/// Index of the implementation declared for the nearest platform in the
/// context platform's fallback chain
///
/// `candidates` lists the platform each implementation is declared on. When
/// several share that platform the first one wins.
pub fn select_implementation(
    candidates: &[Platform],
    platform: Platform,
    component: &str,
) -> PomResult<usize> {
    let selected = select_for_platform(candidates, platform, |p| *p);
    let chosen = if selected.matches.is_empty() {
        None
    } else {
        candidates.iter().position(|p| *p == selected.platform)
    };
    let index = chosen.ok_or_else(|| PomError::NoImplementation {
        component: component.to_string(),
        platform: platform.to_string(),
    })?;
    tracing::debug!(
        component,
        platform = %platform,
        declared_on = %selected.platform,
        "selected implementation"
    );
    Ok(index)
}
