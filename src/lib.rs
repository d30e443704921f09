mod catalog;
mod config;
mod datasource;
mod datatype;
mod decimal;
mod db;
mod error;
pub mod physical_plan;
mod scalar;
mod schema;
mod sql;
pub mod udf;
mod utils;

pub use config::{
    KafkaSupervisorTuningConfig, KafkaSupervisorTuningSpec, ReplConfig, SupervisorTuningConfig,
};
pub use datasource::{MemTable, TableSource};
pub use datatype::SqlType;
pub use decimal::DecimalValue;
pub use db::SimpleDB;
pub use error::{ErrorCode, Result};
pub use scalar::{parse_double, TypedValue};
pub use schema::{NaiveField, NaiveSchema};
pub use sql::parser::SQLParser;
pub use udf::{DeferredArgument, DeferredValue, ScalarFunction, ScalarFunctionRef, UnaryPlus};
pub use utils::*;
