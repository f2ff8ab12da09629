//! Entry points of the condition DSL.
//!
//! ```ignore
//! let button = SyncHelper::new(&ctx).wait(Until::ui_element(&page.submit).clickable())?;
//! let first = SyncHelper::new(&ctx).wait(Until::one_of(&rows).text_contains("Paid"))?;
//! ```

use crate::element::UiElement;
use crate::sync::all::AllMatchCondition;
use crate::sync::condition::{ConditionBuilder, Predicate};
use crate::sync::first_match::FirstMatchCondition;
use crate::sync::single::UiElementCondition;

/// Starts a condition on one element or a list of elements
#[derive(Debug, Clone, Copy)]
pub struct Until;

impl Until {
    /// Condition on a single element
    #[must_use]
    pub fn ui_element<E: UiElement>(element: &E) -> SingleBuilder<'_, E> {
        SingleBuilder { element }
    }

    /// Condition every element must meet
    #[must_use]
    pub fn all_of<E: UiElement>(elements: &[E]) -> AllOfBuilder<'_, E> {
        AllOfBuilder { elements }
    }

    /// Condition at least one element must meet; waits return the first match
    #[must_use]
    pub fn one_of<E: UiElement>(elements: &[E]) -> OneOfBuilder<'_, E> {
        OneOfBuilder { elements }
    }
}

/// Builder returned by [`Until::ui_element`]
#[derive(Debug)]
pub struct SingleBuilder<'a, E> {
    element: &'a E,
}

/// Builder returned by [`Until::all_of`]
#[derive(Debug)]
pub struct AllOfBuilder<'a, E> {
    elements: &'a [E],
}

/// Builder returned by [`Until::one_of`]
#[derive(Debug)]
pub struct OneOfBuilder<'a, E> {
    elements: &'a [E],
}

impl<'a, E: UiElement + 'a> ConditionBuilder<'a, E> for SingleBuilder<'a, E> {
    type Condition = UiElementCondition<'a, E>;

    fn condition(self, predicate: Predicate<'a, E>, description: String) -> Self::Condition {
        UiElementCondition::new(self.element, predicate, description)
    }
}

impl<'a, E: UiElement + 'a> ConditionBuilder<'a, E> for AllOfBuilder<'a, E> {
    type Condition = AllMatchCondition<'a, E>;

    fn condition(self, predicate: Predicate<'a, E>, description: String) -> Self::Condition {
        AllMatchCondition::new(self.elements, predicate, description)
    }
}

impl<'a, E: UiElement + 'a> ConditionBuilder<'a, E> for OneOfBuilder<'a, E> {
    type Condition = FirstMatchCondition<'a, E>;

    fn condition(self, predicate: Predicate<'a, E>, description: String) -> Self::Condition {
        FirstMatchCondition::new(self.elements, predicate, description)
    }
}
