use arrow::record_batch::RecordBatch;
use log::debug;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::physical_plan::PhysicalPlanRef;
use crate::schema::NaiveSchema;
use crate::sql::parser::SQLParser;
use crate::sql::planner::SQLPlanner;

/// Entry point for running scalar SQL: a catalog of in-memory tables plus
/// the parse, plan and execute pipeline.
#[derive(Default, Debug)]
pub struct SimpleDB {
    pub catalog: Catalog,
}

impl SimpleDB {
    /// Runs `SELECT ...` or a bare expression and returns the result batches.
    pub fn run_sql(&self, sql: &str) -> Result<Vec<RecordBatch>> {
        self.create_plan(sql)?.execute()
    }

    /// Parses and plans `sql`. Every operator in the plan is resolved by the
    /// time this returns.
    pub fn create_plan(&self, sql: &str) -> Result<PhysicalPlanRef> {
        let planner = SQLPlanner::new(&self.catalog);
        let plan = if SQLParser::is_statement(sql) {
            planner.statement_to_plan(SQLParser::parse(sql)?)?
        } else {
            planner.expr_to_plan(&SQLParser::parse_expr(sql)?)?
        };
        debug!("planned `{}`", sql.trim());
        Ok(plan)
    }

    pub fn create_mem_table(
        &mut self,
        table: &str,
        schema: NaiveSchema,
        batches: Vec<RecordBatch>,
    ) -> Result<()> {
        self.catalog.add_mem_table(table, schema, batches)
    }
}
