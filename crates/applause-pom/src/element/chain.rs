//! Parent/child locator composition.
//!
//! A child element is searched inside its nearest parent's handle (or shadow
//! root). Script locators cannot search relative to an element, so they are
//! evaluated against the whole page: JavaScript locators as-is, jQuery
//! locators by joining every ancestor's selector into one descendant
//! selector.

use crate::driver::{DriverError, ElementHandle, SearchScope};
use crate::element::lazy::LazyWebElement;
use crate::locator::{By, Strategy};
use crate::result::{PomError, PomResult};
use crate::wait::{FluentWait, Poll, WaitSettings};

/// Ancestors of an element, root first, with search helpers
#[derive(Debug)]
pub struct LocatorChain<'a> {
    element: &'a LazyWebElement,
    ancestors: Vec<LazyWebElement>,
}

impl<'a> LocatorChain<'a> {
    /// Chain for `element`
    #[must_use]
    pub fn new(element: &'a LazyWebElement) -> Self {
        let mut ancestors: Vec<LazyWebElement> =
            std::iter::successors(element.parent().cloned(), |p| p.parent().cloned()).collect();
        ancestors.reverse();
        Self { element, ancestors }
    }

    /// Number of ancestors
    #[must_use]
    pub fn len(&self) -> usize {
        self.ancestors.len()
    }

    /// Whether the element is top-level
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ancestors.is_empty()
    }

    /// Display of every link, e.g. `By.cssSelector: form -> By.id: email`
    #[must_use]
    pub fn by_chain(&self) -> String {
        self.ancestors
            .iter()
            .chain(std::iter::once(self.element))
            .map(LazyWebElement::describe_by)
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    /// The single descendant selector a jQuery lookup uses
    pub fn jquery_selector(&self) -> PomResult<String> {
        let mut parts = self.ancestor_jquery_parts()?;
        parts.push(self.jquery_part(self.element)?);
        Ok(parts.join(" "))
    }

    fn ancestor_jquery_parts(&self) -> PomResult<Vec<String>> {
        self.ancestors.iter().map(|link| self.jquery_part(link)).collect()
    }

    fn jquery_part(&self, link: &LazyWebElement) -> PomResult<String> {
        link.locator()
            .jquery_selector(&link.format_args())?
            .ok_or_else(|| PomError::InvalidLocator {
                locator: self.element.describe_by(),
                message: format!(
                    "jQuery elements require jQuery or CSS parents, parent is [{}]",
                    link.describe_by()
                ),
            })
    }

    /// Find the element with its effective wait
    pub fn find_element(&self) -> PomResult<ElementHandle> {
        let index = self.element.locator().index();
        let handles = self.search(
            self.element.effective_wait(),
            |handles: Vec<ElementHandle>| match index {
                None => handles.into_iter().next(),
                Some(i) => handles.into_iter().nth(i),
            },
        );
        handles.map_err(|err| self.not_found(err, "element"))
    }

    /// Find every match, waiting until at least one is present
    ///
    /// With `allow_empty`, a timeout yields an empty list.
    pub fn find_elements(
        &self,
        settings: WaitSettings,
        allow_empty: bool,
    ) -> PomResult<Vec<ElementHandle>> {
        match self.search(settings, |handles: Vec<ElementHandle>| {
            (!handles.is_empty()).then_some(handles)
        }) {
            Ok(handles) => Ok(handles),
            Err(err) if err.is_timeout() && allow_empty => Ok(Vec::new()),
            Err(err) => Err(self.not_found(err, "elements")),
        }
    }

    fn search<T>(
        &self,
        settings: WaitSettings,
        mut pick: impl FnMut(Vec<ElementHandle>) -> Option<T>,
    ) -> PomResult<T> {
        let locator = self.element.locator();
        let args = self.element.format_args();
        let by = locator.resolve(&args)?;
        let driver = self.element.context().driver_handle();
        let wait = FluentWait::new(settings);

        let describe_miss = |count: usize| match locator.index() {
            Some(i) if count > 0 => format!("{count} match(es) for [{by}], wanted index {i}"),
            _ => format!("no element matched [{by}]"),
        };

        if locator.strategy().is_script() {
            let script = self.script_for(&by)?;
            tracing::debug!(locator = %by, "searching by script");
            return wait.poll(|| {
                let value = driver.execute_script(&script, &[])?;
                let handles = ElementHandle::all_from_json(&value);
                let count = handles.len();
                Ok(pick(handles).map_or_else(|| Poll::Pending(describe_miss(count)), Poll::Ready))
            });
        }

        let parent = self.ancestors.last();
        if let Some(parent) = parent {
            if !parent.is_initialized() {
                initialize_within(parent, settings)?;
            }
        }
        wait.poll(|| {
            let scope = match parent {
                None => SearchScope::Document,
                Some(parent) => {
                    if !parent.is_initialized() {
                        initialize_within(parent, WaitSettings::ZERO)?;
                    }
                    match parent.search_scope() {
                        Ok(scope) => scope,
                        Err(err) => {
                            parent.reset();
                            return Ok(Poll::Pending(err.to_string()));
                        }
                    }
                }
            };
            match driver.find_elements(&scope, &by) {
                Ok(handles) => {
                    let count = handles.len();
                    Ok(pick(handles)
                        .map_or_else(|| Poll::Pending(describe_miss(count)), Poll::Ready))
                }
                Err(err @ DriverError::StaleElementReference { .. }) => {
                    if let Some(parent) = parent {
                        tracing::debug!(
                            parent = %parent.describe(),
                            "parent went stale, re-resolving"
                        );
                        parent.reset();
                    }
                    Ok(Poll::Pending(err.to_string()))
                }
                Err(err) => Err(err.into()),
            }
        })
    }

    fn script_for(&self, by: &By) -> PomResult<String> {
        match by.strategy {
            Strategy::JavaScript => {
                if !self.is_empty() {
                    tracing::warn!(
                        locator = %by,
                        "JavaScript locator has a parent element; relative search is not possible, searching the whole page"
                    );
                }
                Ok(by.selector.clone())
            }
            _ => {
                let selector = self.jquery_selector_unindexed()?;
                Ok(format!("return Sizzle({});", serde_json::to_string(&selector)?))
            }
        }
    }

    /// jQuery chain without the element's own `:nth`, which is applied to
    /// the returned matches instead
    fn jquery_selector_unindexed(&self) -> PomResult<String> {
        let mut parts = self.ancestor_jquery_parts()?;
        parts.push(
            self.element
                .locator()
                .resolve(&self.element.format_args())?
                .selector,
        );
        Ok(parts.join(" "))
    }

    fn not_found(&self, err: PomError, what: &str) -> PomError {
        match err {
            PomError::ConditionTimeout {
                timeout_ms,
                last_state,
                ..
            } => {
                let name = self
                    .element
                    .locator()
                    .variable_name()
                    .map_or(String::new(), |n| format!(" [{n}]"));
                PomError::ElementNotFound {
                    locator: self.by_chain(),
                    message: format!(
                        "Could not find {what}{name} within {timeout_ms}ms{}",
                        last_state.map_or(String::new(), |s| format!(": {s}"))
                    ),
                }
            }
            other => other,
        }
    }
}

/// Resolve an ancestor waiting no longer than `settings` allows, so the
/// child's wait bounds the whole chain
fn initialize_within(parent: &LazyWebElement, settings: WaitSettings) -> PomResult<()> {
    if parent.effective_wait().timeout <= settings.timeout {
        return parent.initialize();
    }
    let _guard = parent.scoped_wait(settings);
    parent.initialize()
}
