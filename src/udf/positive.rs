use log::trace;

use super::{DeferredArgument, ScalarFunction, UnaryState};
use crate::datatype::SqlType;
use crate::error::{ErrorCode, Result};
use crate::scalar::{parse_double, TypedValue};

const NAME: &str = "+";

/// Unary plus. Numbers come back unchanged; text is read as a double.
#[derive(Debug, Clone, Default)]
pub struct UnaryPlus {
    state: UnaryState,
}

impl UnaryPlus {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScalarFunction for UnaryPlus {
    fn name(&self) -> &str {
        NAME
    }

    fn initialize(&mut self, arg_types: &[SqlType]) -> Result<SqlType> {
        self.state.resolve(NAME, arg_types)
    }

    fn return_type(&self) -> Result<SqlType> {
        self.state.resolved(NAME).map(|(_, output)| output)
    }

    fn evaluate(&self, args: &[&dyn DeferredArgument]) -> Result<Option<TypedValue>> {
        let (input_type, output_type) = self.state.resolved(NAME)?;
        if args.len() != 1 {
            return Err(ErrorCode::ArityError(format!(
                "operator {} takes exactly one argument, got {}",
                NAME,
                args.len()
            )));
        }

        let value = match args[0].get()? {
            Some(value) => value,
            None => return Ok(None),
        };
        if !value.has_tag_of(&input_type) {
            return Err(ErrorCode::TypeMismatch(format!(
                "operator {} resolved for {}, got a {} value",
                NAME,
                input_type,
                value.type_name()
            )));
        }
        trace!("evaluate {}({}) as {}", NAME, value, output_type);

        if input_type.is_text() {
            let text = value.as_text().ok_or_else(|| {
                ErrorCode::TypeMismatch(format!("{} value has no text", value.type_name()))
            })?;
            return Ok(Some(TypedValue::double(parse_double(text)?)));
        }
        Ok(Some(value))
    }

    fn display_string(&self, children: &[String]) -> String {
        format!("({} {})", NAME, children.join(", "))
    }
}
