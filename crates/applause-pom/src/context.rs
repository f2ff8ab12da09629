//! Per-session page-object context.
//!
//! A context carries the driver session, the platform locators are selected
//! for, and the default wait every element falls back to. It is passed to
//! page objects explicitly as a [`PageContext`] (`Rc`), which keeps page
//! objects on the thread that owns the session.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::config::FrameworkConfig;
use crate::driver::WebDriver;
use crate::platform::Platform;
use crate::wait::{FluentWait, WaitSettings, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS};

/// Shared handle to a context
pub type PageContext = Rc<PageObjectContext>;

/// Defaults applied to every page object of a context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageObjectOptions {
    /// Default resolution timeout
    pub timeout: Duration,
    /// Default polling interval
    pub polling_interval: Duration,
    /// Fail list resolution when nothing matches
    pub throw_exception_on_empty_list: bool,
    /// Re-resolve lists before every access
    pub auto_refresh_list: bool,
}

impl Default for PageObjectOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            polling_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            throw_exception_on_empty_list: true,
            auto_refresh_list: false,
        }
    }
}

impl PageObjectOptions {
    /// Create default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set default timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set default polling interval
    #[must_use]
    pub const fn with_polling_interval(mut self, polling_interval: Duration) -> Self {
        self.polling_interval = polling_interval;
        self
    }

    /// Fail or not on empty lists
    #[must_use]
    pub const fn with_throw_on_empty_list(mut self, throw: bool) -> Self {
        self.throw_exception_on_empty_list = throw;
        self
    }

    /// Re-resolve lists on every access
    #[must_use]
    pub const fn with_auto_refresh_list(mut self, refresh: bool) -> Self {
        self.auto_refresh_list = refresh;
        self
    }

    /// Timeout and polling as wait settings
    #[must_use]
    pub const fn wait_settings(&self) -> WaitSettings {
        WaitSettings::new(self.timeout, self.polling_interval)
    }
}

/// Driver session plus page-object defaults
#[derive(Debug)]
pub struct PageObjectContext {
    driver: Rc<dyn WebDriver>,
    platform: Cell<Platform>,
    options: RefCell<PageObjectOptions>,
}

impl PageObjectContext {
    /// Context for the default platform with default options
    #[must_use]
    pub fn new(driver: Rc<dyn WebDriver>) -> PageContext {
        Self::with_options(driver, Platform::Default, PageObjectOptions::default())
    }

    /// Context with explicit platform and options
    #[must_use]
    pub fn with_options(
        driver: Rc<dyn WebDriver>,
        platform: Platform,
        options: PageObjectOptions,
    ) -> PageContext {
        Rc::new(Self {
            driver,
            platform: Cell::new(platform),
            options: RefCell::new(options),
        })
    }

    /// Context configured from a loaded framework configuration
    #[must_use]
    pub fn from_config(driver: Rc<dyn WebDriver>, config: &FrameworkConfig) -> PageContext {
        Self::with_options(driver, config.platform(), config.page_object_options())
    }

    /// Driver session
    #[must_use]
    pub fn driver(&self) -> &dyn WebDriver {
        self.driver.as_ref()
    }

    /// Shared driver handle
    #[must_use]
    pub fn driver_handle(&self) -> Rc<dyn WebDriver> {
        Rc::clone(&self.driver)
    }

    /// Platform locators are selected for
    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform.get()
    }

    /// Change the platform
    pub fn set_platform(&self, platform: Platform) {
        self.platform.set(platform);
    }

    /// Default timeout
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.options.borrow().timeout
    }

    /// Change the default timeout
    pub fn set_timeout(&self, timeout: Duration) {
        self.options.borrow_mut().timeout = timeout;
    }

    /// Default polling interval
    #[must_use]
    pub fn polling_interval(&self) -> Duration {
        self.options.borrow().polling_interval
    }

    /// Change the default polling interval
    pub fn set_polling_interval(&self, polling_interval: Duration) {
        self.options.borrow_mut().polling_interval = polling_interval;
    }

    /// Default timeout and polling interval
    #[must_use]
    pub fn wait_settings(&self) -> WaitSettings {
        self.options.borrow().wait_settings()
    }

    /// Snapshot of the options
    #[must_use]
    pub fn options(&self) -> PageObjectOptions {
        self.options.borrow().clone()
    }

    /// Replace the options
    pub fn set_options(&self, options: PageObjectOptions) {
        *self.options.borrow_mut() = options;
    }

    /// A wait using the context defaults
    #[must_use]
    pub fn wait(&self) -> FluentWait {
        FluentWait::new(self.wait_settings())
    }

    /// A wait using explicit timing
    #[must_use]
    pub fn wait_with(&self, settings: WaitSettings) -> FluentWait {
        FluentWait::new(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDriver;

    #[test]
    fn test_default_options() {
        let options = PageObjectOptions::default();
        assert_eq!(options.timeout, Duration::from_secs(10));
        assert_eq!(options.polling_interval, Duration::from_secs(1));
        assert!(options.throw_exception_on_empty_list);
        assert!(!options.auto_refresh_list);
    }

    #[test]
    fn test_context_setters() {
        let ctx = PageObjectContext::new(Rc::new(MockDriver::new()));
        assert_eq!(ctx.platform(), Platform::Default);
        ctx.set_platform(Platform::WebDesktopChrome);
        ctx.set_timeout(Duration::from_millis(250));
        ctx.set_polling_interval(Duration::from_millis(25));
        assert_eq!(ctx.platform(), Platform::WebDesktopChrome);
        assert_eq!(ctx.wait_settings(), WaitSettings::from_millis(250, 25));
        assert_eq!(ctx.wait().settings(), WaitSettings::from_millis(250, 25));
    }

    #[test]
    fn test_options_builder() {
        let options = PageObjectOptions::new()
            .with_timeout(Duration::from_secs(3))
            .with_polling_interval(Duration::from_millis(100))
            .with_throw_on_empty_list(false)
            .with_auto_refresh_list(true);
        let ctx = PageObjectContext::with_options(
            Rc::new(MockDriver::new()),
            Platform::MobileAndroid,
            options.clone(),
        );
        assert_eq!(ctx.options(), options);
        assert_eq!(ctx.platform(), Platform::MobileAndroid);
    }
}
