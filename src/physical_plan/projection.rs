use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::{RecordBatch, RecordBatchOptions};

use super::plan::PhysicalPlan;
use crate::error::Result;
use crate::physical_plan::PhysicalExprRef;
use crate::physical_plan::PhysicalPlanRef;
use crate::schema::NaiveSchema;

#[derive(Debug, Clone)]
pub struct ProjectionPlan {
    input: PhysicalPlanRef,
    schema: NaiveSchema,
    expr: Vec<PhysicalExprRef>,
}

impl ProjectionPlan {
    pub fn create(
        input: PhysicalPlanRef,
        schema: NaiveSchema,
        expr: Vec<PhysicalExprRef>,
    ) -> PhysicalPlanRef {
        Arc::new(Self {
            input,
            schema,
            expr,
        })
    }
}

impl PhysicalPlan for ProjectionPlan {
    fn schema(&self) -> &NaiveSchema {
        &self.schema
    }

    fn execute(&self) -> Result<Vec<RecordBatch>> {
        let input = self.input.execute()?;
        // output columns carry the resolved sql types, not the input's
        let schema = SchemaRef::from(&self.schema);
        input
            .iter()
            .map(|batch| {
                let columns = self
                    .expr
                    .iter()
                    .map(|expr| expr.evaluate(batch)?.into_array())
                    .collect::<Result<Vec<ArrayRef>>>()?;
                // keep the row count when no column is projected, e.g. `SELECT` over dual
                let options = RecordBatchOptions::new().with_row_count(Some(batch.num_rows()));
                Ok(RecordBatch::try_new_with_options(
                    schema.clone(),
                    columns,
                    &options,
                )?)
            })
            .collect()
    }
}
