//! Element predicates used by the condition builders.
//!
//! Every predicate probes with the element's wait disabled, so a condition
//! polls at its own interval instead of waiting inside each probe. The
//! element's previous wait is restored however the probe ends.

use crate::element::UiElement;
use crate::result::PomResult;

/// Run `f` against `element` with its wait disabled
pub fn with_no_wait<E, F>(element: &E, f: F) -> PomResult<bool>
where
    E: UiElement,
    F: FnOnce(&E) -> PomResult<bool>,
{
    let lazy = element.lazy_for("disable wait for")?;
    lazy.with_no_wait(|| f(element))
}

/// Element can be found
pub fn present<E: UiElement>() -> impl Fn(&E) -> PomResult<bool> {
    |element: &E| with_no_wait(element, |e| e.exists())
}

/// Element cannot be found
pub fn not_present<E: UiElement>() -> impl Fn(&E) -> PomResult<bool> {
    |element: &E| with_no_wait(element, |e| e.exists()).map(|v| !v)
}

/// Element is rendered
pub fn visible<E: UiElement>() -> impl Fn(&E) -> PomResult<bool> {
    |element: &E| with_no_wait(element, |e| e.is_displayed())
}

/// Element is not rendered
pub fn not_visible<E: UiElement>() -> impl Fn(&E) -> PomResult<bool> {
    |element: &E| with_no_wait(element, |e| e.is_displayed()).map(|v| !v)
}

/// Element is displayed and enabled
pub fn clickable<E: UiElement>() -> impl Fn(&E) -> PomResult<bool> {
    |element: &E| with_no_wait(element, |e| e.is_clickable())
}

/// Element is hidden or disabled
pub fn not_clickable<E: UiElement>() -> impl Fn(&E) -> PomResult<bool> {
    |element: &E| with_no_wait(element, |e| e.is_clickable()).map(|v| !v)
}

/// Element is enabled
pub fn enabled<E: UiElement>() -> impl Fn(&E) -> PomResult<bool> {
    |element: &E| with_no_wait(element, |e| e.is_enabled())
}

/// Element is disabled
pub fn not_enabled<E: UiElement>() -> impl Fn(&E) -> PomResult<bool> {
    |element: &E| with_no_wait(element, |e| e.is_enabled()).map(|v| !v)
}

/// Attribute is set to a non-empty value
pub fn attribute_exists<E: UiElement>(
    attribute: impl Into<String>,
) -> impl Fn(&E) -> PomResult<bool> {
    let attribute = attribute.into();
    move |element: &E| {
        with_no_wait(element, |e| {
            Ok(e.attribute(&attribute)?.is_some_and(|v| !v.is_empty()))
        })
    }
}

/// Attribute equals `value`
pub fn attribute_equals<E: UiElement>(
    attribute: impl Into<String>,
    value: impl Into<String>,
) -> impl Fn(&E) -> PomResult<bool> {
    let attribute = attribute.into();
    let value = value.into();
    move |element: &E| {
        with_no_wait(element, |e| {
            Ok(e.attribute(&attribute)?.is_some_and(|v| v == value))
        })
    }
}

/// Attribute contains `substring`
pub fn attribute_contains<E: UiElement>(
    attribute: impl Into<String>,
    substring: impl Into<String>,
) -> impl Fn(&E) -> PomResult<bool> {
    let attribute = attribute.into();
    let substring = substring.into();
    move |element: &E| {
        with_no_wait(element, |e| {
            Ok(e.attribute(&attribute)?
                .is_some_and(|v| v.contains(substring.as_str())))
        })
    }
}

/// Text equals `text`
pub fn text_equals<E: UiElement>(text: impl Into<String>) -> impl Fn(&E) -> PomResult<bool> {
    let text = text.into();
    move |element: &E| with_no_wait(element, |e| Ok(e.lazy()?.text()? == text))
}

/// Text contains `substring`
pub fn text_contains<E: UiElement>(substring: impl Into<String>) -> impl Fn(&E) -> PomResult<bool> {
    let substring = substring.into();
    move |element: &E| {
        with_no_wait(element, |e| {
            Ok(e.lazy()?.text()?.contains(substring.as_str()))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::builder::PageObjectBuilder;
    use crate::context::{PageContext, PageObjectContext};
    use crate::element::{BaseComponent, ContainerElement};
    use crate::locator::{By, Locator, Strategy};
    use crate::mock::{MockDriver, MockElement};
    use crate::result::PomError;
    use crate::wait::WaitSettings;
    use std::rc::Rc;
    use std::time::{Duration, Instant};

    type C = ContainerElement;

    fn setup() -> (Rc<MockDriver>, PageContext) {
        let driver = Rc::new(MockDriver::new());
        let ctx = PageObjectContext::new(driver.clone());
        ctx.set_timeout(Duration::from_millis(500));
        ctx.set_polling_interval(Duration::from_millis(50));
        (driver, ctx)
    }

    fn element(ctx: &PageContext, id: &str) -> ContainerElement {
        PageObjectBuilder::with_context(Rc::clone(ctx))
            .initialize(Locator::id(id))
            .unwrap()
    }

    #[test]
    fn test_presence_predicates() {
        let (driver, ctx) = setup();
        driver.add(MockElement::new(By::new(Strategy::Id, "here")));
        let here = element(&ctx, "here");
        let gone = element(&ctx, "gone");
        assert!(present::<C>()(&here).unwrap());
        assert!(!not_present::<C>()(&here).unwrap());
        let start = Instant::now();
        assert!(!present::<C>()(&gone).unwrap());
        assert!(not_present::<C>()(&gone).unwrap());
        assert!(start.elapsed() < Duration::from_millis(200));
    }

    #[test]
    fn test_visibility_predicates() {
        let (driver, ctx) = setup();
        driver.add(MockElement::new(By::new(Strategy::Id, "tip")).hidden().disabled());
        let tip = element(&ctx, "tip");
        assert!(!visible::<C>()(&tip).unwrap());
        assert!(not_visible::<C>()(&tip).unwrap());
        assert!(not_clickable::<C>()(&tip).unwrap());
        assert!(not_enabled::<C>()(&tip).unwrap());
        assert!(!enabled::<C>()(&tip).unwrap());
        assert!(!clickable::<C>()(&tip).unwrap());
    }

    #[test]
    fn test_attribute_and_text_predicates() {
        let (driver, ctx) = setup();
        driver.add(
            MockElement::new(By::new(Strategy::Id, "status"))
                .attr("class", "badge badge-ok")
                .attr("title", "")
                .text("All systems go"),
        );
        let status = element(&ctx, "status");
        assert!(attribute_exists::<C>("class")(&status).unwrap());
        assert!(!attribute_exists::<C>("title")(&status).unwrap());
        assert!(!attribute_exists::<C>("data-x")(&status).unwrap());
        assert!(attribute_equals::<C>("class", "badge badge-ok")(&status).unwrap());
        assert!(attribute_contains::<C>("class", "badge-ok")(&status).unwrap());
        assert!(text_equals::<C>("All systems go")(&status).unwrap());
        assert!(text_contains::<C>("systems")(&status).unwrap());
        assert!(!text_contains::<C>("outage")(&status).unwrap());
    }

    #[test]
    fn test_prior_wait_restored() {
        let (_, ctx) = setup();
        let gone = element(&ctx, "gone");
        gone.lazy().unwrap().set_wait(WaitSettings::from_millis(900, 90));
        assert!(text_equals::<C>("x")(&gone).is_err());
        assert_eq!(
            gone.lazy().unwrap().effective_wait(),
            WaitSettings::from_millis(900, 90)
        );
        assert!(!visible::<C>()(&gone).unwrap());
        assert_eq!(
            gone.lazy().unwrap().effective_wait(),
            WaitSettings::from_millis(900, 90)
        );
    }

    #[test]
    fn test_component_without_element() {
        let (_, ctx) = setup();
        let page = BaseComponent::new("Page", ctx, None);
        assert!(matches!(
            present::<BaseComponent>()(&page).unwrap_err(),
            PomError::UnsupportedOperation { .. }
        ));
    }
}
