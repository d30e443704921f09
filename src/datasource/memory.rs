use std::sync::Arc;

use arrow::datatypes::Schema;
use arrow::record_batch::{RecordBatch, RecordBatchOptions};

use super::{TableRef, TableSource};
use crate::error::Result;
use crate::schema::NaiveSchema;

/// Batches held in memory under a SQL schema.
#[derive(Debug, Clone)]
pub struct MemTable {
    pub schema: NaiveSchema,
    pub batches: Vec<RecordBatch>,
}

impl MemTable {
    /// Wraps `batches`, checking each one against `schema`.
    pub fn try_create(schema: NaiveSchema, batches: Vec<RecordBatch>) -> Result<TableRef> {
        for batch in &batches {
            schema.check_arrow(batch.schema().as_ref())?;
        }
        Ok(Arc::new(Self { schema, batches }))
    }

    /// A single row with no columns, the input of `SELECT` without `FROM`.
    pub fn dual() -> Result<TableRef> {
        let options = RecordBatchOptions::new().with_row_count(Some(1));
        let batch = RecordBatch::try_new_with_options(Arc::new(Schema::empty()), vec![], &options)?;
        Ok(Arc::new(Self {
            schema: NaiveSchema::empty(),
            batches: vec![batch],
        }))
    }
}

impl TableSource for MemTable {
    fn schema(&self) -> &NaiveSchema {
        &self.schema
    }

    fn scan(&self) -> Result<Vec<RecordBatch>> {
        Ok(self.batches.clone())
    }

    fn source_name(&self) -> String {
        "MemTable".into()
    }
}

#[cfg(test)]
mod tests {
    use arrow::array::Int64Array;

    use super::*;
    use crate::datatype::SqlType;
    use crate::error::ErrorCode;
    use crate::schema::NaiveField;

    #[test]
    fn dual_has_one_empty_row() {
        let batches = MemTable::dual().unwrap().scan().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].num_rows(), 1);
        assert_eq!(batches[0].num_columns(), 0);
    }

    #[test]
    fn batches_must_match_schema() {
        let schema = NaiveSchema::new(vec![NaiveField::new(None, "a", SqlType::Int, true)]);
        let arrow = Schema::new(vec![arrow::datatypes::Field::new(
            "a",
            arrow::datatypes::DataType::Int64,
            true,
        )]);
        let batch =
            RecordBatch::try_new(Arc::new(arrow), vec![Arc::new(Int64Array::from(vec![1]))])
                .unwrap();
        assert!(matches!(
            MemTable::try_create(schema, vec![batch]),
            Err(ErrorCode::TypeMismatch(_))
        ));
    }
}
