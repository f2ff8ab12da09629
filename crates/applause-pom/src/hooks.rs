//! Before/after hooks around component operations.
//!
//! A component built with [`PageObjectBuilder::with_hooks`] runs its
//! operations through [`BaseComponent::intercept`], which calls the hooks
//! around the operation body.
//!
//! [`PageObjectBuilder::with_hooks`]: crate::builder::PageObjectBuilder::with_hooks
//! [`BaseComponent::intercept`]: crate::element::BaseComponent::intercept

use std::fmt;

use crate::result::PomResult;

/// Callbacks run around intercepted operations
pub trait ComponentHooks: fmt::Debug {
    /// Whether the hooks apply to `operation`
    fn applies_to(&self, _operation: &str) -> bool {
        true
    }

    /// Runs before the operation
    fn before(&self, _operation: &str) {}

    /// Runs after the operation, whether or not it succeeded
    fn after(&self, _operation: &str) {}
}

/// Run `f` between `hooks.before` and `hooks.after`
pub fn intercept<H, T>(hooks: &H, operation: &str, f: impl FnOnce() -> PomResult<T>) -> PomResult<T>
where
    H: ComponentHooks + ?Sized,
{
    if !hooks.applies_to(operation) {
        return f();
    }
    tracing::trace!(operation, "running hooked operation");
    hooks.before(operation);
    let result = f();
    hooks.after(operation);
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::result::PomError;
    use std::cell::RefCell;

    #[derive(Debug, Default)]
    struct Recorder {
        calls: RefCell<Vec<String>>,
        only: Option<&'static str>,
    }

    impl ComponentHooks for Recorder {
        fn applies_to(&self, operation: &str) -> bool {
            self.only.map_or(true, |o| o == operation)
        }

        fn before(&self, operation: &str) {
            self.calls.borrow_mut().push(format!("before:{operation}"));
        }

        fn after(&self, operation: &str) {
            self.calls.borrow_mut().push(format!("after:{operation}"));
        }
    }

    #[test]
    fn test_hooks_wrap_operation() {
        let hooks = Recorder::default();
        let value = intercept(&hooks, "login", || {
            hooks.calls.borrow_mut().push("body".to_string());
            Ok(7)
        })
        .unwrap();
        assert_eq!(value, 7);
        assert_eq!(*hooks.calls.borrow(), ["before:login", "body", "after:login"]);
    }

    #[test]
    fn test_after_runs_on_error() {
        let hooks = Recorder::default();
        let result: PomResult<()> = intercept(&hooks, "submit", || {
            Err(PomError::Config {
                message: "boom".into(),
            })
        });
        assert!(result.is_err());
        assert_eq!(*hooks.calls.borrow(), ["before:submit", "after:submit"]);
    }

    #[test]
    fn test_filtered_operations_skip_hooks() {
        let hooks = Recorder {
            only: Some("login"),
            ..Recorder::default()
        };
        intercept(&hooks, "logout", || Ok(())).unwrap();
        assert!(hooks.calls.borrow().is_empty());
    }
}
