mod memory;

use std::fmt::Debug;
use std::sync::Arc;

use crate::error::Result;
use crate::schema::NaiveSchema;
use arrow::record_batch::RecordBatch;

pub type TableRef = Arc<dyn TableSource>;

pub trait TableSource: Debug + Send + Sync {
    fn schema(&self) -> &NaiveSchema;

    fn scan(&self) -> Result<Vec<RecordBatch>>;

    fn source_name(&self) -> String;
}

pub use memory::MemTable;
