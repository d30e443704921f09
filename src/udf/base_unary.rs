use log::debug;

use crate::datatype::SqlType;
use crate::error::{ErrorCode, Result};

/// Lifecycle of a unary function instance. The only transition is
/// `Unresolved -> Resolved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnaryState {
    #[default]
    Unresolved,
    Resolved { input: SqlType, output: SqlType },
}

impl UnaryState {
    /// Resolves `arg_types` for the operator `op_name`. A resolved state
    /// accepts the same input type again and rejects any other one.
    pub fn resolve(&mut self, op_name: &str, arg_types: &[SqlType]) -> Result<SqlType> {
        let output = resolve_unary_numeric(op_name, arg_types)?;
        let input = arg_types[0];
        match *self {
            UnaryState::Unresolved => {
                debug!("resolved {}({}) -> {}", op_name, input, output);
                *self = UnaryState::Resolved { input, output };
                Ok(output)
            }
            UnaryState::Resolved {
                input: resolved_input,
                output: resolved_output,
            } if resolved_input == input => Ok(resolved_output),
            UnaryState::Resolved {
                input: resolved_input,
                ..
            } => Err(ErrorCode::PlanError(format!(
                "operator {} already resolved for {}, cannot re-resolve for {}",
                op_name, resolved_input, input
            ))),
        }
    }

    pub fn resolved(&self, op_name: &str) -> Result<(SqlType, SqlType)> {
        match self {
            UnaryState::Resolved { input, output } => Ok((*input, *output)),
            UnaryState::Unresolved => Err(ErrorCode::NotInitialized(format!(
                "operator {} evaluated before initialize",
                op_name
            ))),
        }
    }
}

/// Result type of a numeric unary operator.
///
/// Integer, floating point and decimal inputs keep their type, decimal
/// precision and scale included. Char, varchar and string inputs become
/// double; their text is parsed per row.
pub fn resolve_unary_numeric(op_name: &str, arg_types: &[SqlType]) -> Result<SqlType> {
    if arg_types.len() != 1 {
        return Err(ErrorCode::ArityError(format!(
            "operator {} takes exactly one argument, got {}",
            op_name,
            arg_types.len()
        )));
    }
    let input = arg_types[0];
    match input {
        t if t.is_numeric() => Ok(t),
        t if t.is_text() => Ok(SqlType::Double),
        other => Err(ErrorCode::UnsupportedType(format!(
            "operator {} does not accept {}",
            op_name, other
        ))),
    }
}
