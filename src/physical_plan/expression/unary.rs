use std::any::Any;
use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::record_batch::RecordBatch;
use log::{debug, trace};

use super::{ColumnValue, PhysicalExpr, PhysicalExprRef};
use crate::datatype::SqlType;
use crate::error::Result;
use crate::scalar::TypedValue;
use crate::udf::{DeferredArgument, DeferredValue, ScalarFunction, ScalarFunctionRef};

/// One row of an arrow column, read only when the function asks for it.
#[derive(Debug, Clone, Copy)]
pub struct ArrayCell<'a> {
    array: &'a ArrayRef,
    row: usize,
    sql_type: &'a SqlType,
}

impl<'a> ArrayCell<'a> {
    pub fn new(array: &'a ArrayRef, row: usize, sql_type: &'a SqlType) -> Self {
        Self {
            array,
            row,
            sql_type,
        }
    }
}

impl DeferredArgument for ArrayCell<'_> {
    fn get(&self) -> Result<Option<TypedValue>> {
        TypedValue::from_array(self.array, self.row, self.sql_type)
    }
}

/// A resolved one-argument scalar function applied to a child expression.
#[derive(Debug)]
pub struct PhysicalUnaryExpr {
    func: ScalarFunctionRef,
    input: PhysicalExprRef,
    output: SqlType,
}

impl PhysicalUnaryExpr {
    /// Resolves `func` against the child's type and freezes it.
    pub fn create<F>(mut func: F, input: PhysicalExprRef) -> Result<PhysicalExprRef>
    where
        F: ScalarFunction + 'static,
    {
        let output = func.initialize(&[input.data_type()])?;
        debug!(
            "planned {} as {}",
            func.display_string(&[input.display_name()]),
            output
        );
        Ok(Arc::new(Self {
            func: Arc::new(func),
            input,
            output,
        }))
    }
}

impl PhysicalExpr for PhysicalUnaryExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn data_type(&self) -> SqlType {
        self.output
    }

    fn display_name(&self) -> String {
        self.func.display_string(&[self.input.display_name()])
    }

    fn evaluate(&self, input: &RecordBatch) -> Result<ColumnValue> {
        match self.input.evaluate(input)? {
            ColumnValue::Const { value, len, .. } => {
                // one call covers every row of the batch
                let value = self.func.evaluate(&[&DeferredValue(value)])?;
                Ok(ColumnValue::Const {
                    value,
                    sql_type: self.output,
                    len,
                })
            }
            ColumnValue::Array(array) => {
                let input_type = self.input.data_type();
                trace!(
                    "evaluate {} over {} rows",
                    self.display_name(),
                    array.len()
                );
                // each row is read from the array only if the function asks for it
                let values = (0..array.len())
                    .map(|row| {
                        let cell = ArrayCell::new(&array, row, &input_type);
                        self.func.evaluate(&[&cell])
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(ColumnValue::Array(TypedValue::build_array(
                    values,
                    &self.output,
                )?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use arrow::array::{Array, Decimal128Array, Float64Array, StringArray};
    use arrow::datatypes::{Field, Schema};

    use super::*;
    use crate::decimal::DecimalValue;
    use crate::error::ErrorCode;
    use crate::physical_plan::{ColumnExpr, PhysicalLiteralExpr};
    use crate::udf::UnaryPlus;

    fn batch_of(sql_type: SqlType, array: ArrayRef) -> RecordBatch {
        let schema = Schema::new(vec![Field::new("c", sql_type.to_arrow(), true)]);
        RecordBatch::try_new(Arc::new(schema), vec![array]).unwrap()
    }

    #[test]
    fn text_column_becomes_double_column() {
        let varchar = SqlType::varchar(12).unwrap();
        let array: ArrayRef = Arc::new(StringArray::from(vec![
            Some("32300.004747"),
            None,
            Some(" 1.5"),
        ]));
        let batch = batch_of(varchar, array);
        let expr =
            PhysicalUnaryExpr::create(UnaryPlus::new(), ColumnExpr::create("c", 0, varchar))
                .unwrap();
        assert_eq!(expr.data_type(), SqlType::Double);
        assert_eq!(expr.display_name(), "(+ c)");

        let out = expr.evaluate(&batch).unwrap().into_array().unwrap();
        let out = out.as_any().downcast_ref::<Float64Array>().unwrap();
        assert_eq!(out.value(0), 32300.004747);
        assert!(out.is_null(1));
        assert_eq!(out.value(2), 1.5);
    }

    #[test]
    fn decimal_column_keeps_metadata() {
        let decimal = SqlType::decimal(11, 6).unwrap();
        let value = TypedValue::Decimal(DecimalValue::from_str("32300.004747").unwrap());
        let array = TypedValue::build_array(vec![Some(value), None], &decimal).unwrap();
        let batch = batch_of(decimal, array);
        let expr =
            PhysicalUnaryExpr::create(UnaryPlus::new(), ColumnExpr::create("c", 0, decimal))
                .unwrap();

        let out = expr.evaluate(&batch).unwrap().into_array().unwrap();
        let out = out.as_any().downcast_ref::<Decimal128Array>().unwrap();
        assert_eq!(out.precision(), 11);
        assert_eq!(out.scale(), 6);
        assert_eq!(out.value(0), 32_300_004_747);
        assert!(out.is_null(1));
    }

    #[test]
    fn bad_text_aborts_the_batch() {
        let array: ArrayRef = Arc::new(StringArray::from(vec![Some("1"), Some("one")]));
        let batch = batch_of(SqlType::String, array);
        let expr = PhysicalUnaryExpr::create(
            UnaryPlus::new(),
            ColumnExpr::create("c", 0, SqlType::String),
        )
        .unwrap();
        assert!(matches!(
            expr.evaluate(&batch),
            Err(ErrorCode::ParseError(_))
        ));
    }

    #[test]
    fn constant_input_is_evaluated_once() {
        let literal =
            PhysicalLiteralExpr::create(Some(TypedValue::SmallInt(74)), SqlType::SmallInt)
                .unwrap();
        let expr = PhysicalUnaryExpr::create(UnaryPlus::new(), literal).unwrap();
        let batch = batch_of(
            SqlType::Int,
            Arc::new(arrow::array::Int32Array::from(vec![1, 2, 3])),
        );
        match expr.evaluate(&batch).unwrap() {
            ColumnValue::Const { value, len, .. } => {
                assert_eq!(value, Some(TypedValue::SmallInt(74)));
                assert_eq!(len, 3);
            }
            other => panic!("expected a constant, got {:?}", other),
        }
    }

    #[test]
    fn void_input_fails_at_plan_time() {
        assert!(matches!(
            PhysicalUnaryExpr::create(UnaryPlus::new(), PhysicalLiteralExpr::null()),
            Err(ErrorCode::UnsupportedType(_))
        ));
    }
}
