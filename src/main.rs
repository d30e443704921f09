use std::io::{self, Write};

use log::warn;
use simple_udf::{format_types, print_result, ReplConfig, Result, SimpleDB};

fn run_sql(db: &SimpleDB, sql: &str, config: &ReplConfig) -> Result<()> {
    let plan = db.create_plan(sql)?;
    let result = plan.execute()?;
    print_result(&result)?;
    if config.show_types {
        println!("{}", format_types(plan.schema()));
    }
    Ok(())
}

fn main() -> Result<()> {
    let db = SimpleDB::default();
    let config = ReplConfig::default();
    println!("Welcome to SimpleUDF! Try `SELECT +CAST('32300.004747' AS VARCHAR(12))`.");

    loop {
        print!("{}", config.prompt);
        io::stdout().flush()?;

        let mut sql = String::new();
        if io::stdin().read_line(&mut sql)? == 0 {
            break;
        }
        let sql = sql.trim().trim_end_matches(';');
        if sql.is_empty() {
            continue;
        }
        if sql.eq_ignore_ascii_case("exit") {
            println!("Bye.");
            break;
        }

        if let Err(e) = run_sql(&db, sql, &config) {
            warn!("query `{}` failed: {}", sql, e);
            println!("Error executing query '{}': {}", sql, e);
        }
    }

    Ok(())
}
