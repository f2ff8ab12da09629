//! The condition abstraction and the factory methods every builder offers.

use std::time::Duration;

use crate::context::PageContext;
use crate::element::UiElement;
use crate::result::PomResult;
use crate::sync::ui_conditions;
use crate::wait::WaitSettings;

/// Element predicate owned by a condition
pub type Predicate<'a, E> = Box<dyn Fn(&E) -> PomResult<bool> + 'a>;

/// A predicate over one or more elements, waited on with polling
pub trait Condition {
    /// Returned once the condition holds
    type Output;

    /// Override the context's default timeout
    fn set_timeout(&mut self, timeout: Duration);

    /// Override the context's default polling interval
    fn set_polling_interval(&mut self, polling_interval: Duration);

    /// Timing overrides
    fn timing(&self) -> ConditionTiming;

    /// Wait with explicit timing
    fn wait_then_return_with(
        &self,
        context: &PageContext,
        timeout: Duration,
        polling_interval: Duration,
    ) -> PomResult<Self::Output>;

    /// Wait with this condition's timing, falling back to the context's
    fn wait_then_return(&self, context: &PageContext) -> PomResult<Self::Output> {
        let settings = self.timing().resolve(context);
        self.wait_then_return_with(context, settings.timeout, settings.polling_interval)
    }

    /// Whether the condition holds before the timeout
    ///
    /// Only a timeout becomes `false`; other errors propagate.
    fn matches_condition(&self, context: &PageContext) -> PomResult<bool> {
        match self.wait_then_return(context) {
            Ok(_) => Ok(true),
            Err(err) if err.is_timeout() => Ok(false),
            Err(err) => Err(err),
        }
    }
}

/// Timeout and polling overrides of a condition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConditionTiming {
    /// Timeout override
    pub timeout: Option<Duration>,
    /// Polling interval override
    pub polling_interval: Option<Duration>,
}

impl ConditionTiming {
    /// Overrides applied on top of the context defaults
    #[must_use]
    pub fn resolve(&self, context: &PageContext) -> WaitSettings {
        WaitSettings::new(
            self.timeout.unwrap_or_else(|| context.timeout()),
            self.polling_interval
                .unwrap_or_else(|| context.polling_interval()),
        )
    }
}

pub(crate) fn timeout_message(
    subject: &str,
    timeout: Duration,
    polling_interval: Duration,
) -> String {
    format!(
        "Timed out waiting until {subject}. Waited {}s with polling interval {}s.",
        timeout.as_secs(),
        polling_interval.as_secs()
    )
}

/// Factory methods shared by the `Until` builders
pub trait ConditionBuilder<'a, E: UiElement + 'a>: Sized {
    /// Condition produced by this builder
    type Condition: Condition;

    /// Bind `predicate`, described by `description`
    fn condition(self, predicate: Predicate<'a, E>, description: String) -> Self::Condition;

    /// Caller-supplied predicate
    fn meets_custom_condition<F>(
        self,
        predicate: F,
        description: impl Into<String>,
    ) -> Self::Condition
    where
        F: Fn(&E) -> PomResult<bool> + 'a,
    {
        self.condition(Box::new(predicate), description.into())
    }

    /// Element can be found
    fn present(self) -> Self::Condition {
        self.condition(Box::new(ui_conditions::present()), "is present".into())
    }

    /// Element cannot be found
    fn not_present(self) -> Self::Condition {
        self.condition(Box::new(ui_conditions::not_present()), "is not present".into())
    }

    /// Element is rendered
    fn visible(self) -> Self::Condition {
        self.condition(Box::new(ui_conditions::visible()), "is visible".into())
    }

    /// Element is not rendered
    fn not_visible(self) -> Self::Condition {
        self.condition(Box::new(ui_conditions::not_visible()), "is not visible".into())
    }

    /// Element is displayed and enabled
    fn clickable(self) -> Self::Condition {
        self.condition(Box::new(ui_conditions::clickable()), "is clickable".into())
    }

    /// Element is hidden or disabled
    fn not_clickable(self) -> Self::Condition {
        self.condition(Box::new(ui_conditions::not_clickable()), "is not clickable".into())
    }

    /// Element is enabled
    fn enabled(self) -> Self::Condition {
        self.condition(Box::new(ui_conditions::enabled()), "is enabled".into())
    }

    /// Element is disabled
    fn not_enabled(self) -> Self::Condition {
        self.condition(Box::new(ui_conditions::not_enabled()), "is not enabled".into())
    }

    /// Attribute is set to a non-empty value
    fn attribute_exists(self, attribute: &str) -> Self::Condition {
        self.condition(
            Box::new(ui_conditions::attribute_exists(attribute.to_string())),
            format!("has attribute [{attribute}]"),
        )
    }

    /// Attribute equals `value`
    fn attribute_equals(self, attribute: &str, value: &str) -> Self::Condition {
        self.condition(
            Box::new(ui_conditions::attribute_equals(attribute.to_string(), value.to_string())),
            format!("attribute [{attribute}] equals [{value}]"),
        )
    }

    /// Attribute contains `substring`
    fn attribute_contains(self, attribute: &str, substring: &str) -> Self::Condition {
        self.condition(
            Box::new(ui_conditions::attribute_contains(
                attribute.to_string(),
                substring.to_string(),
            )),
            format!("attribute [{attribute}] contains [{substring}]"),
        )
    }

    /// Text equals `text`
    fn text_equals(self, text: &str) -> Self::Condition {
        self.condition(
            Box::new(ui_conditions::text_equals(text.to_string())),
            format!("text equals [{text}]"),
        )
    }

    /// Text contains `substring`
    fn text_contains(self, substring: &str) -> Self::Condition {
        self.condition(
            Box::new(ui_conditions::text_contains(substring.to_string())),
            format!("text contains [{substring}]"),
        )
    }
}
