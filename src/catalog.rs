use std::collections::HashMap;

use arrow::record_batch::RecordBatch;
use log::debug;

use crate::datasource::{MemTable, TableRef};
use crate::error::{ErrorCode, Result};
use crate::schema::NaiveSchema;

#[derive(Default, Debug)]
pub struct Catalog {
    pub tables: HashMap<String, TableRef>,
}

impl Catalog {
    pub fn remove_table(&mut self, table_name: &str) -> Option<TableRef> {
        self.tables.remove(table_name)
    }

    /// Registers in-memory batches under `table`, replacing any table of
    /// the same name.
    pub fn add_mem_table(
        &mut self,
        table: &str,
        schema: NaiveSchema,
        batches: Vec<RecordBatch>,
    ) -> Result<()> {
        let source = MemTable::try_create(schema.with_qualifier(table), batches)?;
        debug!("registered table {} ({} columns)", table, source.schema().fields().len());
        self.tables.insert(table.to_string(), source);
        Ok(())
    }

    pub fn get_table(&self, table: &str) -> Result<TableRef> {
        self.tables
            .get(table)
            .cloned()
            .ok_or_else(|| ErrorCode::NoSuchTable(format!("No table name: {}", table)))
    }
}
