//! Scalar functions and the two-phase contract they follow.
//!
//! A function is first *initialized* with the static types of its arguments,
//! once, at plan time. It is then *evaluated* once per row against deferred
//! arguments, always producing values of the type it resolved.

mod base_unary;
mod positive;

pub use base_unary::resolve_unary_numeric;
pub use base_unary::UnaryState;
pub use positive::UnaryPlus;

use std::fmt::Debug;
use std::sync::Arc;

use crate::datatype::SqlType;
use crate::error::Result;
use crate::scalar::TypedValue;

/// A lazily evaluated call-site argument. `get` yields the value, or `None`
/// for SQL null. Callers materialize each argument at most once per
/// evaluation.
pub trait DeferredArgument {
    fn get(&self) -> Result<Option<TypedValue>>;
}

/// An argument whose value is already known.
#[derive(Debug, Clone, PartialEq)]
pub struct DeferredValue(pub Option<TypedValue>);

impl DeferredValue {
    pub fn new(value: TypedValue) -> Self {
        Self(Some(value))
    }

    pub fn null() -> Self {
        Self(None)
    }
}

impl DeferredArgument for DeferredValue {
    fn get(&self) -> Result<Option<TypedValue>> {
        Ok(self.0.clone())
    }
}

impl<F> DeferredArgument for F
where
    F: Fn() -> Result<Option<TypedValue>>,
{
    fn get(&self) -> Result<Option<TypedValue>> {
        self()
    }
}

pub trait ScalarFunction: Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Resolves the result type from the argument types. Must be called
    /// before `evaluate`; resolving again with the same argument types
    /// returns the same type.
    fn initialize(&mut self, arg_types: &[SqlType]) -> Result<SqlType>;

    /// The resolved result type, or `NotInitialized`.
    fn return_type(&self) -> Result<SqlType>;

    fn evaluate(&self, args: &[&dyn DeferredArgument]) -> Result<Option<TypedValue>>;

    /// How a call renders in plans and column headers, given the display
    /// strings of its arguments.
    fn display_string(&self, children: &[String]) -> String;
}

pub type ScalarFunctionRef = Arc<dyn ScalarFunction>;
