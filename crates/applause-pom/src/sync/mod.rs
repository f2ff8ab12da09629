//! Wait conditions over page objects.
//!
//! [`Until`] starts a condition on one element ([`Until::ui_element`]) or a
//! list ([`Until::all_of`], [`Until::one_of`]); [`SyncHelper`] waits for it
//! with the context's default timing unless the condition overrides it.

pub mod all;
pub mod condition;
pub mod first_match;
pub mod helper;
pub mod single;
pub mod ui_conditions;
pub mod until;

pub use all::AllMatchCondition;
pub use condition::{Condition, ConditionBuilder, ConditionTiming, Predicate};
pub use first_match::FirstMatchCondition;
pub use helper::SyncHelper;
pub use single::UiElementCondition;
pub use until::{AllOfBuilder, OneOfBuilder, SingleBuilder, Until};
