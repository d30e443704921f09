use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use crate::error::Result;
use crate::schema::NaiveSchema;

pub fn print_result(result: &[RecordBatch]) -> Result<()> {
    println!("{}", pretty_format_batches(result)?);
    Ok(())
}

/// `name: type` for every column, one per line.
pub fn format_types(schema: &NaiveSchema) -> String {
    schema
        .fields()
        .iter()
        .map(|field| format!("{}: {}", field.name(), field.sql_type()))
        .collect::<Vec<_>>()
        .join("\n")
}
