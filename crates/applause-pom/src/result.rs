//! Result and error types for the page-object model.

use thiserror::Error;

use crate::driver::DriverError;

/// Result type for page-object operations
pub type PomResult<T> = Result<T, PomError>;

/// Errors that can occur while resolving or waiting on page objects
#[derive(Debug, Error)]
pub enum PomError {
    /// Lookup did not produce an element within the configured wait
    #[error("Element not found [{locator}]: {message}")]
    ElementNotFound {
        /// Locator chain that was searched
        locator: String,
        /// Error message
        message: String,
    },

    /// Cached handle was invalidated by the driver
    #[error("Stale element reference [{locator}]")]
    StaleElement {
        /// Locator of the stale element
        locator: String,
    },

    /// Templated locator resolved without the right number of arguments
    #[error("Locator [{locator}] expects {expected} format argument(s), got {got}")]
    LocatorUnformatted {
        /// Locator template
        locator: String,
        /// Placeholders in the template
        expected: usize,
        /// Arguments supplied
        got: usize,
    },

    /// Locator cannot be used the way it was asked to
    #[error("Invalid locator [{locator}]: {message}")]
    InvalidLocator {
        /// Offending locator
        locator: String,
        /// Error message
        message: String,
    },

    /// Operation invoked on a component without an underlying element
    #[error("Cannot {operation} component [{component}] with no underlying element")]
    UnsupportedOperation {
        /// Component type name
        component: String,
        /// Operation name
        operation: String,
    },

    /// No implementation of a component is declared for the platform
    #[error("No implementation of [{component}] declared for platform [{platform}]")]
    NoImplementation {
        /// Component type name
        component: String,
        /// Platform the context runs on
        platform: String,
    },

    /// Wait predicate never matched
    #[error("{message}{}", last_state_suffix(.last_state.as_deref()))]
    ConditionTimeout {
        /// Timeout message
        message: String,
        /// Timeout in milliseconds
        timeout_ms: u64,
        /// Polling interval in milliseconds
        polling_ms: u64,
        /// Last state observed before the deadline
        last_state: Option<String>,
    },

    /// Element stayed non-interactable after waiting for visibility
    #[error("Element [{locator}] is not interactable: {message}")]
    NotInteractable {
        /// Locator of the element
        locator: String,
        /// Error message
        message: String,
    },

    /// Unclassified driver failure
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

fn last_state_suffix(state: Option<&str>) -> String {
    state.map_or_else(String::new, |s| format!(" Last observed: {s}"))
}

impl PomError {
    /// Whether a best-effort probe may treat this error as "no"
    ///
    /// Covers not-found, stale and timeout failures. Programming errors such
    /// as unformatted locators or unsupported component operations are not
    /// recoverable.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::ElementNotFound { .. }
            | Self::StaleElement { .. }
            | Self::ConditionTimeout { .. } => true,
            Self::Driver(err) => err.is_transient(),
            _ => false,
        }
    }

    /// Whether this is a condition timeout
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::ConditionTimeout { .. })
    }

    /// Whether this is an element-not-found failure
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound { .. } | Self::Driver(DriverError::NoSuchElement { .. })
        )
    }

    pub(crate) fn unsupported(component: &str, operation: &str) -> Self {
        Self::UnsupportedOperation {
            component: component.to_string(),
            operation: operation.to_string(),
        }
    }
}
