//! Applause POM: lazy page objects for WebDriver and Appium sessions
//!
//! Page objects are declared once with per-platform locators and resolved
//! against the live session only when an operation needs the element. A
//! stale element is re-found transparently, and waits are expressed with the
//! [`Until`] condition DSL.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     APPLAUSE POM Architecture                   │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Components │    │ Lazy       │    │ WebDriver  │            │
//! │   │ (derive)   │───►│ elements / │───►│ session    │            │
//! │   │            │    │ lists      │    │ (or mock)  │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! │         ▲                  ▲                                    │
//! │         │            ┌────────────┐                             │
//! │         └────────────│ Until /    │  polling conditions         │
//! │                      │ SyncHelper │                             │
//! │                      └────────────┘                             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use applause_pom::prelude::*;
//!
//! #[derive(Debug, PageObject)]
//! struct LoginPage {
//!     #[base]
//!     base: BaseComponent,
//!     #[locate(id = "username")]
//!     #[locate(accessibility_id = "username", on = "Android")]
//!     username: TextBox,
//!     #[locate(css = "button[type=submit]")]
//!     submit: Button,
//! }
//!
//! let ctx = PageObjectContext::new(driver);
//! let page: LoginPage = PageObjectBuilder::with_context(ctx.clone()).build()?;
//! page.username.send_keys("ada")?;
//! SyncHelper::new(&ctx).wait(Until::ui_element(&page.submit).clickable())?.click()?;
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

extern crate self as applause_pom;

mod builder;
mod config;
mod context;
mod driver;
pub mod element;
mod hooks;
mod locator;
mod logging;
pub mod mock;
mod platform;
mod result;
pub mod sync;
mod wait;

pub use builder::{select_implementation, select_locator, PageObject, PageObjectBuilder};
pub use config::{ConfigLoader, FrameworkConfig, PartialConfig, ENV_PREFIX};
pub use context::{PageContext, PageObjectContext, PageObjectOptions};
pub use driver::{
    Dimension, DriverError, DriverResult, ElementHandle, Point, Rect, SearchScope, WebDriver,
    ELEMENT_KEY,
};
pub use element::{
    BaseComponent, BaseElement, Button, Checkbox, ContainerElement, LazyList, LazyWebElement,
    Link, LocatorChain, RadioButton, TextBox, UiElement, WaitGuard,
};
pub use hooks::{intercept, ComponentHooks};
pub use locator::{to_format_args, By, Locator, Strategy};
pub use logging::{init_from_config, init_tracing, try_init_tracing, LogFormat, DEFAULT_FILTER};
pub use platform::{select_for_platform, Platform, PlatformMatch, UnknownPlatform};
pub use result::{PomError, PomResult};
pub use sync::{
    AllMatchCondition, Condition, ConditionBuilder, FirstMatchCondition, SyncHelper,
    UiElementCondition, Until,
};
pub use wait::{
    sleep, wait_until, FluentWait, Poll, WaitSettings, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_TIMEOUT_MS,
};

// Re-export derive macros when the `derive` feature is enabled
#[cfg(feature = "derive")]
pub use applause_pom_derive::PageObject;

/// Prelude for convenient imports
pub mod prelude {
    pub use super::builder::{PageObject, PageObjectBuilder};
    pub use super::context::{PageContext, PageObjectContext, PageObjectOptions};
    pub use super::driver::{ElementHandle, WebDriver};
    pub use super::element::{
        BaseComponent, BaseElement, Button, Checkbox, ContainerElement, LazyList,
        LazyWebElement, Link, RadioButton, TextBox, UiElement,
    };
    pub use super::hooks::ComponentHooks;
    pub use super::locator::{By, Locator, Strategy};
    pub use super::platform::Platform;
    pub use super::result::{PomError, PomResult};
    pub use super::sync::{Condition, ConditionBuilder, SyncHelper, Until};
    pub use super::wait::WaitSettings;

    #[cfg(feature = "derive")]
    pub use applause_pom_derive::PageObject;
}
