//! WebDriver boundary.
//!
//! The page-object model talks to a browser or Appium session only through
//! the [`WebDriver`] trait. Real Selenium/Appium bindings implement it outside
//! this crate; [`MockDriver`](crate::mock::MockDriver) implements it in memory
//! for tests.
//!
//! ```text
//! ┌──────────────┐    ┌───────────────┐    ┌──────────────────────┐
//! │ Page objects │───►│ LazyWebElement│───►│ dyn WebDriver        │
//! │ (components) │    │ LocatorChain  │    │  (session / mock)    │
//! └──────────────┘    └───────────────┘    └──────────────────────┘
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::locator::By;

/// W3C WebDriver element reference key
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Opaque reference to an element held by the driver session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Driver-assigned element id
    pub id: String,
}

impl ElementHandle {
    /// Wrap a driver element id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// W3C JSON element reference, for passing elements into scripts
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::json!({ ELEMENT_KEY: self.id })
    }

    /// Read a W3C JSON element reference
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        value
            .get(ELEMENT_KEY)
            .and_then(Value::as_str)
            .map(Self::new)
    }

    /// Element references in a script result (single reference or array)
    #[must_use]
    pub fn all_from_json(value: &Value) -> Vec<Self> {
        match value {
            Value::Array(items) => items.iter().filter_map(Self::from_json).collect(),
            other => Self::from_json(other).into_iter().collect(),
        }
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Where a lookup starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchScope {
    /// Whole document (or native app hierarchy)
    Document,
    /// Descendants of an element
    Element(ElementHandle),
    /// Inside an element's shadow root
    ShadowRoot(ElementHandle),
}

/// A point on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: i32,
    /// Y coordinate
    pub y: i32,
}

/// Element size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dimension {
    /// Width in CSS pixels
    pub width: i32,
    /// Height in CSS pixels
    pub height: i32,
}

/// Element bounding rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width
    pub width: i32,
    /// Height
    pub height: i32,
}

impl Rect {
    /// Create a rectangle
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner
    #[must_use]
    pub const fn location(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }

    /// Width and height
    #[must_use]
    pub const fn dimension(&self) -> Dimension {
        Dimension {
            width: self.width,
            height: self.height,
        }
    }
}

/// Failures reported by the driver session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// No element matched the selector
    #[error("no such element: {selector}")]
    NoSuchElement {
        /// Selector that matched nothing
        selector: String,
    },

    /// Element reference is no longer attached to the page
    #[error("stale element reference: {element}")]
    StaleElementReference {
        /// Element id
        element: String,
    },

    /// Element exists but cannot receive the interaction
    #[error("element not interactable: {element}")]
    ElementNotInteractable {
        /// Element id
        element: String,
    },

    /// Session does not support the command
    #[error("unsupported command: {command}")]
    UnsupportedCommand {
        /// Command name
        command: String,
    },

    /// Script evaluation failed
    #[error("javascript error: {message}")]
    Script {
        /// Error message
        message: String,
    },

    /// Anything else
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

impl DriverError {
    /// Errors a polling wait keeps retrying through
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::NoSuchElement { .. } | Self::StaleElementReference { .. }
        )
    }
}

/// Result type for driver calls
pub type DriverResult<T> = Result<T, DriverError>;

/// A WebDriver-like session
///
/// Every method takes `&self`: sessions are driven through a shared handle
/// by all elements of one context.
pub trait WebDriver: fmt::Debug {
    /// All matches for `by` within `scope`, possibly empty
    fn find_elements(&self, scope: &SearchScope, by: &By) -> DriverResult<Vec<ElementHandle>>;

    /// First match for `by` within `scope`
    fn find_element(&self, scope: &SearchScope, by: &By) -> DriverResult<ElementHandle> {
        self.find_elements(scope, by)?
            .into_iter()
            .next()
            .ok_or_else(|| DriverError::NoSuchElement {
                selector: by.to_string(),
            })
    }

    /// Shadow root hosted by `element`
    fn shadow_root(&self, element: &ElementHandle) -> DriverResult<ElementHandle>;

    /// Attribute, falling back to the property of the same name
    fn attribute(&self, element: &ElementHandle, name: &str) -> DriverResult<Option<String>>;

    /// Attribute exactly as written in the DOM
    fn dom_attribute(&self, element: &ElementHandle, name: &str) -> DriverResult<Option<String>>;

    /// Live DOM property
    fn dom_property(&self, element: &ElementHandle, name: &str) -> DriverResult<Option<String>>;

    /// Rendered text
    fn text(&self, element: &ElementHandle) -> DriverResult<String>;

    /// Tag name
    fn tag_name(&self, element: &ElementHandle) -> DriverResult<String>;

    /// Whether the element is rendered
    fn is_displayed(&self, element: &ElementHandle) -> DriverResult<bool>;

    /// Whether the element accepts input
    fn is_enabled(&self, element: &ElementHandle) -> DriverResult<bool>;

    /// Whether a checkbox/radio/option is selected
    fn is_selected(&self, element: &ElementHandle) -> DriverResult<bool>;

    /// Bounding rectangle
    fn rect(&self, element: &ElementHandle) -> DriverResult<Rect>;

    /// Computed CSS value
    fn css_value(&self, element: &ElementHandle, property: &str) -> DriverResult<String>;

    /// Click
    fn click(&self, element: &ElementHandle) -> DriverResult<()>;

    /// Submit the enclosing form
    fn submit(&self, element: &ElementHandle) -> DriverResult<()>;

    /// Type into the element
    fn send_keys(&self, element: &ElementHandle, keys: &str) -> DriverResult<()>;

    /// Clear an input
    fn clear(&self, element: &ElementHandle) -> DriverResult<()>;

    /// Run a script in the page; W3C element references in `args` and the
    /// result denote elements
    fn execute_script(&self, script: &str, args: &[Value]) -> DriverResult<Value>;

    /// Load a URL
    fn navigate(&self, url: &str) -> DriverResult<()>;

    /// Current URL
    fn current_url(&self) -> DriverResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_element_json_reference() {
        let handle = ElementHandle::new("abc-123");
        let value = handle.to_json();
        assert_eq!(value, json!({ ELEMENT_KEY: "abc-123" }));
        assert_eq!(ElementHandle::from_json(&value), Some(handle));
    }

    #[test]
    fn test_all_from_json() {
        let value = json!([{ ELEMENT_KEY: "a" }, 42, { ELEMENT_KEY: "b" }]);
        let handles = ElementHandle::all_from_json(&value);
        assert_eq!(handles, vec![ElementHandle::new("a"), ElementHandle::new("b")]);
        assert!(ElementHandle::all_from_json(&Value::Null).is_empty());
    }

    #[test]
    fn test_rect_parts() {
        let rect = Rect::new(10, 20, 300, 40);
        assert_eq!(rect.location(), Point { x: 10, y: 20 });
        assert_eq!(
            rect.dimension(),
            Dimension {
                width: 300,
                height: 40
            }
        );
    }

    #[test]
    fn test_transient_errors() {
        assert!(DriverError::NoSuchElement {
            selector: "x".into()
        }
        .is_transient());
        assert!(!DriverError::UnsupportedCommand {
            command: "rect".into()
        }
        .is_transient());
    }
}
