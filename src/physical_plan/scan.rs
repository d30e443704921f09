use std::sync::Arc;

use arrow::record_batch::RecordBatch;

use crate::datasource::TableRef;
use crate::error::Result;
use crate::physical_plan::PhysicalPlan;
use crate::physical_plan::PhysicalPlanRef;
use crate::schema::NaiveSchema;

#[derive(Debug, Clone)]
pub struct ScanPlan {
    source: TableRef,
}

impl ScanPlan {
    pub fn create(source: TableRef) -> PhysicalPlanRef {
        Arc::new(Self { source })
    }
}

impl PhysicalPlan for ScanPlan {
    fn schema(&self) -> &NaiveSchema {
        self.source.schema()
    }

    fn execute(&self) -> Result<Vec<RecordBatch>> {
        self.source.scan()
    }
}
