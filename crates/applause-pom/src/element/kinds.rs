//! Concrete element kinds.

use std::ops::Deref;
use std::rc::Rc;

use crate::builder::{PageObject, PageObjectBuilder};
use crate::context::PageContext;
use crate::driver::DriverError;
use crate::element::base::BaseElement;
use crate::element::lazy::LazyWebElement;
use crate::element::ui::UiElement;
use crate::locator::Locator;
use crate::result::{PomError, PomResult};

macro_rules! element_kind {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            base: BaseElement,
        }

        impl Deref for $name {
            type Target = BaseElement;

            fn deref(&self) -> &BaseElement {
                &self.base
            }
        }

        impl UiElement for $name {
            fn element_name(&self) -> &str {
                self.base.element_name()
            }

            fn context(&self) -> &PageContext {
                self.base.context()
            }

            fn lazy_for(&self, operation: &str) -> PomResult<&LazyWebElement> {
                self.base.lazy_for(operation)
            }
        }

        impl PageObject for $name {
            fn build(
                _context: &PageContext,
                underlying: Option<LazyWebElement>,
            ) -> PomResult<Self> {
                Ok(Self {
                    base: BaseElement::build_named(stringify!($name), underlying)?,
                })
            }
        }
    };
}

element_kind!(
    /// Generic element whose only interesting state is its text
    ContainerElement
);

element_kind!(
    /// Clickable button
    Button
);

element_kind!(
    /// Text input
    TextBox
);

element_kind!(
    /// Anchor element
    Link
);

element_kind!(
    /// Checkbox input
    Checkbox
);

element_kind!(
    /// Radio input
    RadioButton
);

impl TextBox {
    /// Type into the box
    pub fn send_keys(&self, keys: &str) -> PomResult<()> {
        self.element().send_keys(keys)
    }

    /// Empty the box
    pub fn clear_text(&self) -> PomResult<()> {
        self.element().clear()
    }

    /// Current value
    ///
    /// Reads the `value` property, falling back to the attribute on drivers
    /// without property support.
    pub fn current_text(&self) -> PomResult<Option<String>> {
        property_or_attribute(self.element(), "value")
    }
}

impl Link {
    /// Link target
    pub fn url(&self) -> PomResult<Option<String>> {
        property_or_attribute(self.element(), "href")
    }

    /// Navigate the session to the link target
    pub fn go_to_url(&self) -> PomResult<()> {
        let url = self.url()?.ok_or_else(|| PomError::InvalidLocator {
            locator: self.element().describe_by(),
            message: "link has no href".to_string(),
        })?;
        self.context().driver().navigate(&url)?;
        Ok(())
    }

    /// Inner HTML of the anchor
    pub fn text(&self) -> PomResult<String> {
        Ok(self.element().dom_property("innerHTML")?.unwrap_or_default())
    }
}

impl Checkbox {
    /// Whether checked
    pub fn is_checked(&self) -> PomResult<bool> {
        self.element().is_selected()
    }

    /// Check if unchecked
    pub fn check(&self) -> PomResult<()> {
        self.set_checked(true)
    }

    /// Uncheck if checked
    pub fn uncheck(&self) -> PomResult<()> {
        self.set_checked(false)
    }

    fn set_checked(&self, checked: bool) -> PomResult<()> {
        if self.is_checked()? != checked {
            self.click()?;
        }
        Ok(())
    }
}

impl RadioButton {
    /// Whether selected
    pub fn is_selected(&self) -> PomResult<bool> {
        self.element().is_selected()
    }

    /// The selected button of this button's group (same `name`)
    pub fn selected(&self) -> PomResult<Option<RadioButton>> {
        let name = self.dom_property("name")?.unwrap_or_default();
        let locator = Locator::name(name.clone()).on(self.context().platform());
        let group = PageObjectBuilder::with_context(Rc::clone(self.context()))
            .initialize_list::<RadioButton>(locator)
            .to_vec()?;
        for button in group {
            if button.is_selected()? {
                return Ok(Some(button));
            }
        }
        tracing::error!(name = %name, "No RadioButton with name [{name}] is currently selected");
        Ok(None)
    }
}

fn property_or_attribute(element: &LazyWebElement, name: &str) -> PomResult<Option<String>> {
    match element.dom_property(name) {
        Err(PomError::Driver(DriverError::UnsupportedCommand { .. })) => {
            tracing::debug!(property = name, "DOM properties unsupported, reading attribute");
            element.attribute(name)
        }
        other => other,
    }
}
