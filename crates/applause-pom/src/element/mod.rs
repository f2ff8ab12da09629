//! Elements, components and lists.
//!
//! - [`LazyWebElement`]: a locator resolved on first use
//! - [`UiElement`]: probes and child lookup shared by everything below
//! - [`BaseElement`] and the element kinds ([`Button`], [`TextBox`], ...)
//! - [`BaseComponent`]: groups of page objects, optionally wrapping an element
//! - [`LazyList`]: every match of a locator

pub mod base;
pub mod chain;
pub mod component;
pub mod kinds;
pub mod lazy;
pub mod list;
pub mod ui;

pub use base::BaseElement;
pub use chain::LocatorChain;
pub use component::BaseComponent;
pub use kinds::{Button, Checkbox, ContainerElement, Link, RadioButton, TextBox};
pub use lazy::{LazyWebElement, WaitGuard};
pub use list::LazyList;
pub use ui::UiElement;
