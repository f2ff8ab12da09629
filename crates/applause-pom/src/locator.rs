//! Locators: how to find an element, on which platform, with which template.
//!
//! A [`Locator`] is an immutable selector template. Formatting is applied at
//! resolution time with arguments owned by the element, so one locator can
//! back many elements (`id=row-%s` for every row id).
//!
//! Templates use printf-style placeholders:
//!
//! - `%s` / `%d`: next sequential argument
//! - `%2$s`: second argument by position
//! - `%%`: literal percent sign

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::platform::Platform;
use crate::result::{PomError, PomResult};

/// Element lookup strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Element id
    Id,
    /// CSS selector
    Css,
    /// XPath expression
    XPath,
    /// Class name
    ClassName,
    /// `name` attribute
    Name,
    /// Tag name
    TagName,
    /// Exact link text
    LinkText,
    /// Partial link text
    PartialLinkText,
    /// Appium accessibility id
    AccessibilityId,
    /// Android UiAutomator expression
    AndroidUiAutomator,
    /// iOS class chain
    IosClassChain,
    /// iOS NSPredicate string
    IosNsPredicate,
    /// Appium native class name
    AppiumClassName,
    /// Sizzle/jQuery selector evaluated in the page
    JQuery,
    /// JavaScript expression returning elements
    JavaScript,
}

impl Strategy {
    /// All strategies
    pub const ALL: &'static [Self] = &[
        Self::Id,
        Self::Css,
        Self::XPath,
        Self::ClassName,
        Self::Name,
        Self::TagName,
        Self::LinkText,
        Self::PartialLinkText,
        Self::AccessibilityId,
        Self::AndroidUiAutomator,
        Self::IosClassChain,
        Self::IosNsPredicate,
        Self::AppiumClassName,
        Self::JQuery,
        Self::JavaScript,
    ];

    /// Selenium-style display prefix
    #[must_use]
    pub const fn by_prefix(self) -> &'static str {
        match self {
            Self::Id => "By.id",
            Self::Css => "By.cssSelector",
            Self::XPath => "By.xpath",
            Self::ClassName => "By.className",
            Self::Name => "By.name",
            Self::TagName => "By.tagName",
            Self::LinkText => "By.linkText",
            Self::PartialLinkText => "By.partialLinkText",
            Self::AccessibilityId => "By.AccessibilityId",
            Self::AndroidUiAutomator => "By.AndroidUIAutomator",
            Self::IosClassChain => "By.IosClassChain",
            Self::IosNsPredicate => "By.IosNsPredicate",
            Self::AppiumClassName => "AppiumBy.className",
            Self::JQuery => "By.JQuery",
            Self::JavaScript => "By.JavaScript",
        }
    }

    /// Short key used by the `key=value` shorthand
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Css => "css",
            Self::XPath => "xpath",
            Self::ClassName => "class",
            Self::Name => "name",
            Self::TagName => "tag",
            Self::LinkText => "link",
            Self::PartialLinkText => "partial_link",
            Self::AccessibilityId => "accessibility_id",
            Self::AndroidUiAutomator => "android_uiautomator",
            Self::IosClassChain => "ios_class_chain",
            Self::IosNsPredicate => "ios_predicate",
            Self::AppiumClassName => "appium_class",
            Self::JQuery => "jquery",
            Self::JavaScript => "js",
        }
    }

    /// Strategy for a shorthand key (`id`, `css`, ...), case-insensitive
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.key().eq_ignore_ascii_case(key))
    }

    /// Whether the selector is evaluated by a page script
    #[must_use]
    pub const fn is_script(self) -> bool {
        matches!(self, Self::JQuery | Self::JavaScript)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A fully resolved selector, ready to hand to the driver
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct By {
    /// Lookup strategy
    pub strategy: Strategy,
    /// Resolved selector string
    pub selector: String,
}

impl By {
    /// Create a resolved selector
    #[must_use]
    pub fn new(strategy: Strategy, selector: impl Into<String>) -> Self {
        Self {
            strategy,
            selector: selector.into(),
        }
    }

    /// Parse the display form, e.g. `By.id: submit`
    pub fn parse(s: &str) -> PomResult<Self> {
        let (prefix, selector) = s.split_once(": ").ok_or_else(|| PomError::InvalidLocator {
            locator: s.to_string(),
            message: "expected '<By.strategy>: <selector>'".to_string(),
        })?;
        let strategy = Strategy::ALL
            .iter()
            .copied()
            .find(|st| st.by_prefix() == prefix)
            .ok_or_else(|| PomError::InvalidLocator {
                locator: s.to_string(),
                message: format!("unknown strategy prefix [{prefix}]"),
            })?;
        Ok(Self::new(strategy, selector))
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.strategy.by_prefix(), self.selector)
    }
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"%%|%(?:([1-9][0-9]*)\$)?[sd]").unwrap()
    })
}

/// Selector template plus platform and lookup metadata
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    strategy: Strategy,
    template: String,
    platform: Platform,
    variable_name: Option<String>,
    index: Option<usize>,
    shadow_root: bool,
}

impl Locator {
    /// Create a locator for the default platform
    #[must_use]
    pub fn new(strategy: Strategy, template: impl Into<String>) -> Self {
        Self {
            strategy,
            template: template.into(),
            platform: Platform::Default,
            variable_name: None,
            index: None,
            shadow_root: false,
        }
    }

    /// Element id locator
    #[must_use]
    pub fn id(template: impl Into<String>) -> Self {
        Self::new(Strategy::Id, template)
    }

    /// CSS selector locator
    #[must_use]
    pub fn css(template: impl Into<String>) -> Self {
        Self::new(Strategy::Css, template)
    }

    /// XPath locator
    #[must_use]
    pub fn xpath(template: impl Into<String>) -> Self {
        Self::new(Strategy::XPath, template)
    }

    /// Class name locator
    #[must_use]
    pub fn class_name(template: impl Into<String>) -> Self {
        Self::new(Strategy::ClassName, template)
    }

    /// `name` attribute locator
    #[must_use]
    pub fn name(template: impl Into<String>) -> Self {
        Self::new(Strategy::Name, template)
    }

    /// Accessibility id locator
    #[must_use]
    pub fn accessibility_id(template: impl Into<String>) -> Self {
        Self::new(Strategy::AccessibilityId, template)
    }

    /// jQuery/Sizzle selector locator
    #[must_use]
    pub fn jquery(template: impl Into<String>) -> Self {
        Self::new(Strategy::JQuery, template)
    }

    /// JavaScript expression locator
    #[must_use]
    pub fn javascript(template: impl Into<String>) -> Self {
        Self::new(Strategy::JavaScript, template)
    }

    /// Locator reproducing an already resolved selector
    #[must_use]
    pub fn from_by(by: &By) -> Self {
        Self::new(by.strategy, by.selector.clone())
    }

    /// Restrict this locator to a platform
    #[must_use]
    pub fn on(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Attach the name of the field this locator was declared on
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.variable_name = Some(name.into());
        self
    }

    /// Mark the located element as a shadow-root host
    #[must_use]
    pub const fn with_shadow_root(mut self, shadow_root: bool) -> Self {
        self.shadow_root = shadow_root;
        self
    }

    /// Copy of this locator targeting the `index`-th match
    #[must_use]
    pub fn with_index(&self, index: usize) -> Self {
        Self {
            index: Some(index),
            ..self.clone()
        }
    }

    /// Lookup strategy
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Unformatted template
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Platform this locator was declared for
    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// Field name, when declared on a page object
    #[must_use]
    pub fn variable_name(&self) -> Option<&str> {
        self.variable_name.as_deref()
    }

    /// Index into the matches, if any
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        self.index
    }

    /// Whether the located element hosts a shadow root
    #[must_use]
    pub const fn is_shadow_root(&self) -> bool {
        self.shadow_root
    }

    /// Number of arguments the template needs
    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        let mut sequential = 0;
        let mut highest_position = 0;
        for caps in placeholder_regex().captures_iter(&self.template) {
            if caps.get(0).is_some_and(|m| m.as_str() == "%%") {
                continue;
            }
            match caps.get(1).and_then(|m| m.as_str().parse::<usize>().ok()) {
                Some(position) => highest_position = highest_position.max(position),
                None => sequential += 1,
            }
        }
        sequential.max(highest_position)
    }

    /// Whether the template has placeholders
    #[must_use]
    pub fn is_templated(&self) -> bool {
        self.placeholder_count() > 0
    }

    /// Substitute `args` into the template
    ///
    /// A templated locator needs at least
    /// [`placeholder_count`](Self::placeholder_count) arguments; any beyond
    /// that are ignored.
    pub fn resolve(&self, args: &[String]) -> PomResult<By> {
        let expected = self.placeholder_count();
        if expected == 0 {
            return Ok(By::new(self.strategy, self.template.clone()));
        }
        if args.len() < expected {
            return Err(PomError::LocatorUnformatted {
                locator: self.to_string(),
                expected,
                got: args.len(),
            });
        }
        let mut next = 0;
        let selector = placeholder_regex().replace_all(&self.template, |caps: &regex::Captures| {
            if &caps[0] == "%%" {
                return "%".to_string();
            }
            let slot = caps
                .get(1)
                .and_then(|m| m.as_str().parse::<usize>().ok())
                .map_or_else(
                    || {
                        next += 1;
                        next - 1
                    },
                    |position| position - 1,
                );
            args[slot].clone()
        });
        Ok(By::new(self.strategy, selector.into_owned()))
    }

    /// Selector usable in a combined jQuery chain
    ///
    /// Only CSS and jQuery locators have one. An indexed locator gets
    /// `:nth(i)` appended.
    pub fn jquery_selector(&self, args: &[String]) -> PomResult<Option<String>> {
        if !matches!(self.strategy, Strategy::Css | Strategy::JQuery) {
            return Ok(None);
        }
        let by = self.resolve(args)?;
        Ok(Some(match self.index {
            Some(i) => format!("{}:nth({i})", by.selector),
            None => by.selector,
        }))
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy.key(), self.template)?;
        if let Some(i) = self.index {
            write!(f, "[{i}]")?;
        }
        Ok(())
    }
}

impl FromStr for Locator {
    type Err = PomError;

    /// Parse `strategy=template`; a string without a known strategy key is CSS
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(PomError::InvalidLocator {
                locator: s.to_string(),
                message: "empty locator".to_string(),
            });
        }
        if let Some((key, template)) = s.split_once('=') {
            if let Some(strategy) = Strategy::from_key(key.trim()) {
                return Ok(Self::new(strategy, template));
            }
        }
        Ok(Self::css(s))
    }
}

/// Normalize format arguments into owned strings
pub fn to_format_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: ToString,
{
    args.into_iter().map(|a| a.to_string()).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use super::Strategy;
    use proptest::prelude::*;

    mod template_tests {
        use super::*;

        #[test]
        fn test_plain_template_resolves_verbatim() {
            let loc = Locator::id("submit");
            assert_eq!(loc.placeholder_count(), 0);
            assert_eq!(loc.resolve(&[]).unwrap(), By::new(Strategy::Id, "submit"));
        }

        #[test]
        fn test_sequential_placeholders() {
            let loc = Locator::css("tr:nth-child(%d) > td.%s");
            assert_eq!(loc.placeholder_count(), 2);
            let by = loc.resolve(&to_format_args([3.to_string(), "name".into()])).unwrap();
            assert_eq!(by.selector, "tr:nth-child(3) > td.name");
        }

        #[test]
        fn test_positional_placeholders() {
            let loc = Locator::xpath("//a[@id='%2$s' or @name='%1$s' or @title='%2$s']");
            assert_eq!(loc.placeholder_count(), 2);
            let by = loc.resolve(&to_format_args(["first", "second"])).unwrap();
            assert_eq!(
                by.selector,
                "//a[@id='second' or @name='first' or @title='second']"
            );
        }

        #[test]
        fn test_literal_percent() {
            let loc = Locator::css("div[style*='width: 100%%'] #%s");
            assert_eq!(loc.placeholder_count(), 1);
            let by = loc.resolve(&to_format_args(["x"])).unwrap();
            assert_eq!(by.selector, "div[style*='width: 100%'] #x");
        }

        #[test]
        fn test_unformatted_template_fails() {
            let loc = Locator::id("button-%s");
            let err = loc.resolve(&[]).unwrap_err();
            assert!(matches!(
                err,
                PomError::LocatorUnformatted {
                    expected: 1,
                    got: 0,
                    ..
                }
            ));
        }

        #[test]
        fn test_extra_arguments_ignored() {
            let loc = Locator::id("row-%s");
            let by = loc.resolve(&to_format_args(["a", "b"])).unwrap();
            assert_eq!(by.selector, "row-a");
            let loc = Locator::xpath("//tr[%2$s]");
            let by = loc.resolve(&to_format_args(["1", "2", "3"])).unwrap();
            assert_eq!(by.selector, "//tr[2]");
        }

        #[test]
        fn test_submit_scenario() {
            let loc: Locator = "id=button-%s".parse().unwrap();
            let by = loc.resolve(&to_format_args(["submit"])).unwrap();
            assert_eq!(by.strategy, Strategy::Id);
            assert_eq!(by.selector, "button-submit");
            assert_eq!(by.to_string(), "By.id: button-submit");
        }
    }

    mod parse_tests {
        use super::*;

        #[test]
        fn test_shorthand_keys() {
            let loc: Locator = "xpath=//div[@a='b=c']".parse().unwrap();
            assert_eq!(loc.strategy(), Strategy::XPath);
            assert_eq!(loc.template(), "//div[@a='b=c']");

            let loc: Locator = "accessibility_id=Login".parse().unwrap();
            assert_eq!(loc.strategy(), Strategy::AccessibilityId);
        }

        #[test]
        fn test_bare_string_is_css() {
            let loc: Locator = "input[type=text]".parse().unwrap();
            assert_eq!(loc.strategy(), Strategy::Css);
            assert_eq!(loc.template(), "input[type=text]");
        }

        #[test]
        fn test_empty_is_invalid() {
            assert!("  ".parse::<Locator>().is_err());
        }

        #[test]
        fn test_by_display_parses_back() {
            for strategy in Strategy::ALL {
                let by = By::new(*strategy, "some: value");
                assert_eq!(By::parse(&by.to_string()).unwrap(), by);
            }
            assert!(By::parse("By.unknown: x").is_err());
            assert!(By::parse("nonsense").is_err());
        }
    }

    mod index_tests {
        use super::*;

        #[test]
        fn test_with_index_keeps_template() {
            let loc = Locator::css("li.item").on(Platform::Web).named("items");
            let third = loc.with_index(2);
            assert_eq!(third.index(), Some(2));
            assert_eq!(third.template(), "li.item");
            assert_eq!(third.platform(), Platform::Web);
            assert_eq!(loc.index(), None);
            assert_eq!(third.to_string(), "css=li.item[2]");
        }

        #[test]
        fn test_jquery_selector() {
            let loc = Locator::css("ul > li");
            assert_eq!(
                loc.jquery_selector(&[]).unwrap().as_deref(),
                Some("ul > li")
            );
            assert_eq!(
                loc.with_index(4).jquery_selector(&[]).unwrap().as_deref(),
                Some("ul > li:nth(4)")
            );
            assert_eq!(Locator::id("x").jquery_selector(&[]).unwrap(), None);
        }
    }

    proptest! {
        #[test]
        fn prop_sequential_count_matches_placeholders(n in 0usize..8) {
            let template: String = (0..n).map(|i| format!("seg{i}-%s/")).collect();
            let loc = Locator::css(template);
            prop_assert_eq!(loc.placeholder_count(), n);
        }

        #[test]
        fn prop_args_appear_in_order(args in proptest::collection::vec("[a-z0-9]{1,6}", 1..6)) {
            let template = vec!["%s"; args.len()].join("|");
            let by = Locator::id(template).resolve(&args).unwrap();
            prop_assert_eq!(by.selector, args.join("|"));
        }

        #[test]
        fn prop_too_few_arguments_is_unformatted(n in 1usize..6, missing in 1usize..6) {
            let template = vec!["%s"; n].join("-");
            let args = vec!["v".to_string(); n.saturating_sub(missing)];
            let err = Locator::id(template).resolve(&args).unwrap_err();
            let is_unformatted = matches!(err, PomError::LocatorUnformatted { .. });
            prop_assert!(is_unformatted);
        }

        #[test]
        fn prop_surplus_arguments_ignored(n in 1usize..6, extra in 1usize..3) {
            let template = vec!["%s"; n].join("-");
            let args = vec!["v".to_string(); n + extra];
            let by = Locator::id(template).resolve(&args).unwrap();
            prop_assert_eq!(by.selector, vec!["v"; n].join("-"));
        }
    }
}
