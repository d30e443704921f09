use std::any::Any;
use std::sync::Arc;

use arrow::record_batch::RecordBatch;

use super::{ColumnValue, PhysicalExpr, PhysicalExprRef};
use crate::datatype::SqlType;
use crate::error::{ErrorCode, Result};
use crate::scalar::TypedValue;

#[derive(Debug, Clone)]
pub struct PhysicalLiteralExpr {
    pub value: Option<TypedValue>,
    pub sql_type: SqlType,
}

impl PhysicalLiteralExpr {
    pub fn create(value: Option<TypedValue>, sql_type: SqlType) -> Result<PhysicalExprRef> {
        if let Some(v) = &value {
            if !v.has_tag_of(&sql_type) {
                return Err(ErrorCode::TypeMismatch(format!(
                    "{} literal typed as {}",
                    v.type_name(),
                    sql_type
                )));
            }
        }
        Ok(Arc::new(Self { value, sql_type }))
    }

    pub fn null() -> PhysicalExprRef {
        Arc::new(Self {
            value: None,
            sql_type: SqlType::Void,
        })
    }
}

impl PhysicalExpr for PhysicalLiteralExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn data_type(&self) -> SqlType {
        self.sql_type
    }

    fn display_name(&self) -> String {
        match &self.value {
            None => "NULL".to_string(),
            Some(v) if v.as_text().is_some() => format!("'{}'", v),
            Some(v) => v.to_string(),
        }
    }

    fn evaluate(&self, input: &RecordBatch) -> Result<ColumnValue> {
        Ok(ColumnValue::Const {
            value: self.value.clone(),
            sql_type: self.sql_type,
            len: input.num_rows(),
        })
    }
}
