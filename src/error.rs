use arrow::error::ArrowError;
use sqlparser::parser::ParserError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ErrorCode>;

/// Errors raised while planning or evaluating scalar expressions.
///
/// `ArityError`, `UnsupportedType` and `PlanError` surface at plan-compile
/// time. `ParseError` and `TypeMismatch` surface per row. `NotInitialized`
/// means the engine evaluated a function it never resolved.
#[derive(Debug, Error)]
pub enum ErrorCode {
    #[error("arity error: {0}")]
    ArityError(String),

    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    #[error("not initialized: {0}")]
    NotInitialized(String),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("plan error: {0}")]
    PlanError(String),

    #[error("no match function: {0}")]
    NoMatchFunction(String),

    #[error("no such table: {0}")]
    NoSuchTable(String),

    #[error("column not exists: {0}")]
    ColumnNotExists(String),

    #[error("not supported: {0}")]
    NotSupported(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("arrow error: {0}")]
    ArrowError(#[from] ArrowError),

    #[error("sql parser error: {0}")]
    SqlParser(#[from] ParserError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}
