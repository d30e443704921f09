mod column;
mod literal;
mod unary;

pub use column::ColumnExpr;
pub use literal::PhysicalLiteralExpr;
pub use unary::{ArrayCell, PhysicalUnaryExpr};

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::record_batch::RecordBatch;

use crate::datatype::SqlType;
use crate::error::Result;
use crate::scalar::TypedValue;

pub trait PhysicalExpr: Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    /// Static type of every value this expression produces.
    fn data_type(&self) -> SqlType;

    /// Column header for this expression.
    fn display_name(&self) -> String;

    fn evaluate(&self, input: &RecordBatch) -> Result<ColumnValue>;
}

pub type PhysicalExprRef = Arc<dyn PhysicalExpr>;

/// Result of evaluating an expression over a batch: either one value per
/// row, or a single value standing for `len` rows.
#[derive(Debug, Clone)]
pub enum ColumnValue {
    Array(ArrayRef),
    Const {
        value: Option<TypedValue>,
        sql_type: SqlType,
        len: usize,
    },
}

impl ColumnValue {
    pub fn len(&self) -> usize {
        match self {
            ColumnValue::Array(array) => array.len(),
            ColumnValue::Const { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_array(self) -> Result<ArrayRef> {
        match self {
            ColumnValue::Array(array) => Ok(array),
            ColumnValue::Const {
                value,
                sql_type,
                len,
            } => TypedValue::build_array(vec![value; len], &sql_type),
        }
    }
}
