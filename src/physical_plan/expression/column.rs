use std::any::Any;
use std::sync::Arc;

use arrow::record_batch::RecordBatch;

use super::{ColumnValue, PhysicalExpr, PhysicalExprRef};
use crate::datatype::SqlType;
use crate::error::{ErrorCode, Result};

#[derive(Debug, Clone)]
pub struct ColumnExpr {
    pub name: String,
    pub idx: usize,
    pub sql_type: SqlType,
}

impl ColumnExpr {
    pub fn create(name: &str, idx: usize, sql_type: SqlType) -> PhysicalExprRef {
        Arc::new(Self {
            name: name.to_string(),
            idx,
            sql_type,
        })
    }
}

impl PhysicalExpr for ColumnExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn data_type(&self) -> SqlType {
        self.sql_type
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn evaluate(&self, input: &RecordBatch) -> Result<ColumnValue> {
        if self.idx >= input.num_columns() {
            return Err(ErrorCode::ColumnNotExists(format!(
                "column #{} ({}) not in a batch of {} columns",
                self.idx,
                self.name,
                input.num_columns()
            )));
        }
        let column = input.column(self.idx);
        if column.data_type() != &self.sql_type.to_arrow() {
            return Err(ErrorCode::TypeMismatch(format!(
                "column {} planned as {}, batch holds arrow {:?}",
                self.name,
                self.sql_type,
                column.data_type()
            )));
        }
        Ok(ColumnValue::Array(column.clone()))
    }
}

#[cfg(test)]
mod tests {
    use arrow::array::{ArrayRef, Int32Array};
    use arrow::datatypes::{DataType, Field, Schema};

    use super::*;

    fn batch() -> RecordBatch {
        let schema = Schema::new(vec![Field::new("a", DataType::Int32, true)]);
        let array: ArrayRef = Arc::new(Int32Array::from(vec![Some(1), None]));
        RecordBatch::try_new(Arc::new(schema), vec![array]).unwrap()
    }

    #[test]
    fn returns_the_column() {
        let expr = ColumnExpr::create("a", 0, SqlType::Int);
        let value = expr.evaluate(&batch()).unwrap();
        assert_eq!(value.len(), 2);
    }

    #[test]
    fn checks_index_and_type() {
        let missing = ColumnExpr::create("b", 1, SqlType::Int);
        assert!(matches!(
            missing.evaluate(&batch()),
            Err(ErrorCode::ColumnNotExists(_))
        ));
        let wrong = ColumnExpr::create("a", 0, SqlType::BigInt);
        assert!(matches!(
            wrong.evaluate(&batch()),
            Err(ErrorCode::TypeMismatch(_))
        ));
    }
}
