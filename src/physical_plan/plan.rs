use std::fmt::Debug;
use std::sync::Arc;

use arrow::record_batch::RecordBatch;

use crate::{error::Result, schema::NaiveSchema};

pub trait PhysicalPlan: Debug + Send + Sync {
    fn schema(&self) -> &NaiveSchema;

    fn execute(&self) -> Result<Vec<RecordBatch>>;
}

pub type PhysicalPlanRef = Arc<dyn PhysicalPlan>;
