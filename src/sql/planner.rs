use log::debug;
use sqlparser::ast::{
    Expr, Ident, ObjectName, Query, SelectItem, SetExpr, Statement, TableFactor, TableWithJoins,
    UnaryOperator, Value,
};

use crate::catalog::Catalog;
use crate::datasource::{MemTable, TableRef};
use crate::datatype::SqlType;
use crate::error::{ErrorCode, Result};
use crate::physical_plan::{
    ColumnExpr, PhysicalExprRef, PhysicalLiteralExpr, PhysicalPlanRef, PhysicalUnaryExpr,
    ProjectionPlan, ScanPlan,
};
use crate::scalar::{parse_double, TypedValue};
use crate::schema::{NaiveField, NaiveSchema};
use crate::udf::UnaryPlus;

/// Turns parsed SQL into executable plans. Only projections over a single
/// table, or over no table at all, are understood.
pub struct SQLPlanner<'a> {
    catalog: &'a Catalog,
}

impl<'a> SQLPlanner<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn statement_to_plan(&self, statement: Statement) -> Result<PhysicalPlanRef> {
        match statement {
            Statement::Query(query) => self.query_to_plan(*query),
            other => Err(ErrorCode::NotSupported(format!(
                "statement not supported: {}",
                other
            ))),
        }
    }

    /// Plans `expr` as the only column of a query with no `FROM`.
    pub fn expr_to_plan(&self, expr: &Expr) -> Result<PhysicalPlanRef> {
        let source = MemTable::dual()?;
        self.plan_projection(source, vec![(self.sql_to_expr(expr, &NaiveSchema::empty())?, None)])
    }

    fn query_to_plan(&self, query: Query) -> Result<PhysicalPlanRef> {
        if !query.order_by.is_empty() || query.limit.is_some() || query.offset.is_some() {
            return Err(ErrorCode::NotSupported(
                "ORDER BY, LIMIT and OFFSET are not supported".to_string(),
            ));
        }
        let select = match query.body {
            SetExpr::Select(select) => select,
            _ => {
                return Err(ErrorCode::NotSupported(
                    "only plain SELECT queries are supported".to_string(),
                ))
            }
        };
        if select.distinct || select.selection.is_some() || !select.group_by.is_empty() {
            return Err(ErrorCode::NotSupported(
                "DISTINCT, WHERE and GROUP BY are not supported".to_string(),
            ));
        }

        // FROM first: projections resolve against the source schema
        let source = self.plan_from(&select.from)?;
        let schema = source.schema().clone();
        let mut exprs = vec![];
        for item in &select.projection {
            match item {
                SelectItem::UnnamedExpr(expr) => exprs.push((self.sql_to_expr(expr, &schema)?, None)),
                SelectItem::ExprWithAlias { expr, alias } => exprs.push((
                    self.sql_to_expr(expr, &schema)?,
                    Some(normalize_ident(alias)),
                )),
                SelectItem::Wildcard => {
                    for (idx, field) in schema.fields().iter().enumerate() {
                        exprs.push((ColumnExpr::create(field.name(), idx, field.sql_type()), None));
                    }
                }
                other => {
                    return Err(ErrorCode::NotSupported(format!(
                        "select item not supported: {}",
                        other
                    )))
                }
            }
        }
        self.plan_projection(source, exprs)
    }

    fn plan_from(&self, from: &[TableWithJoins]) -> Result<TableRef> {
        match from {
            [] => MemTable::dual(),
            [TableWithJoins { relation, joins, .. }] if joins.is_empty() => match relation {
                TableFactor::Table { name, .. } => {
                    self.catalog.get_table(&normalize_sql_object_name(name))
                }
                other => Err(ErrorCode::NotSupported(format!(
                    "table factor not supported: {}",
                    other
                ))),
            },
            _ => Err(ErrorCode::NotSupported(
                "joins and multiple tables are not supported".to_string(),
            )),
        }
    }

    fn plan_projection(
        &self,
        source: TableRef,
        exprs: Vec<(PhysicalExprRef, Option<String>)>,
    ) -> Result<PhysicalPlanRef> {
        let fields = exprs
            .iter()
            .map(|(expr, alias)| {
                let name = alias.clone().unwrap_or_else(|| expr.display_name());
                NaiveField::new(None, &name, expr.data_type(), true)
            })
            .collect::<Vec<_>>();
        let schema = NaiveSchema::new(fields);
        debug!(
            "projection over {}: {:?}",
            source.source_name(),
            schema
                .fields()
                .iter()
                .map(|f| format!("{} {}", f.name(), f.sql_type()))
                .collect::<Vec<_>>()
        );
        let exprs = exprs.into_iter().map(|(expr, _)| expr).collect();
        Ok(ProjectionPlan::create(ScanPlan::create(source), schema, exprs))
    }

    /// Resolves a SQL expression against `schema`. Operator result types are
    /// fixed here, once, before any row is read.
    pub fn sql_to_expr(&self, sql: &Expr, schema: &NaiveSchema) -> Result<PhysicalExprRef> {
        match sql {
            Expr::Identifier(id) => {
                let name = normalize_ident(id);
                let (idx, field) = schema.index_of(None, &name)?;
                Ok(ColumnExpr::create(field.name(), idx, field.sql_type()))
            }
            Expr::CompoundIdentifier(ids) => match ids.as_slice() {
                [table, column] => {
                    let table = normalize_ident(table);
                    let (idx, field) = schema.index_of(Some(table.as_str()), &normalize_ident(column))?;
                    Ok(ColumnExpr::create(field.name(), idx, field.sql_type()))
                }
                _ => Err(ErrorCode::NotSupported(format!(
                    "identifier not supported: {}",
                    sql
                ))),
            },
            Expr::Nested(expr) => self.sql_to_expr(expr, schema),
            Expr::Value(Value::Null) => Ok(PhysicalLiteralExpr::null()),
            Expr::Cast {
                expr, data_type, ..
            } => {
                let target = data_type.to_string().parse::<SqlType>()?;
                Self::cast_literal(expr, target)
            }
            Expr::UnaryOp { op, expr } => match (op, expr.as_ref()) {
                // the function is resolved here, once, against the child's type
                (UnaryOperator::Plus, inner) => {
                    let input = self.sql_to_expr(inner, schema)?;
                    PhysicalUnaryExpr::create(UnaryPlus::new(), input)
                }
                // only negative literals, there is no unary minus function
                (UnaryOperator::Minus, Expr::Value(Value::Number(n, _))) => {
                    let (value, sql_type) = number_literal(&format!("-{}", n))?;
                    PhysicalLiteralExpr::create(Some(value), sql_type)
                }
                (other, _) => Err(ErrorCode::NoMatchFunction(format!(
                    "unary operator {} is not supported",
                    other
                ))),
            },
            Expr::Value(_) => match literal_text(sql) {
                Some((text, true)) => {
                    let (value, sql_type) = number_literal(&text)?;
                    PhysicalLiteralExpr::create(Some(value), sql_type)
                }
                Some((text, false)) => {
                    PhysicalLiteralExpr::create(Some(TypedValue::String(text)), SqlType::String)
                }
                None => Err(ErrorCode::NotSupported(format!(
                    "literal not supported: {}",
                    sql
                ))),
            },
            other => Err(ErrorCode::NotSupported(format!(
                "expression not supported: {}",
                other
            ))),
        }
    }

    /// `CAST(<literal> AS <type>)`: the literal's text is read as `target`.
    fn cast_literal(expr: &Expr, target: SqlType) -> Result<PhysicalExprRef> {
        if let Expr::Value(Value::Null) = expr {
            return PhysicalLiteralExpr::create(None, target);
        }
        if target == SqlType::Void {
            return Err(ErrorCode::UnsupportedType(
                "only NULL can be cast to void".to_string(),
            ));
        }
        let text = match literal_text(expr) {
            Some((text, _)) => text,
            None => {
                return Err(ErrorCode::NotSupported(format!(
                    "CAST is only supported on literals, got {}",
                    expr
                )))
            }
        };
        PhysicalLiteralExpr::create(Some(TypedValue::parse_as(&text, &target)?), target)
    }
}

/// Text of a literal and whether it is numeric. Negative numbers are
/// literals too.
fn literal_text(expr: &Expr) -> Option<(String, bool)> {
    match expr {
        Expr::Value(Value::Number(n, _)) => Some((n.to_string(), true)),
        Expr::Value(Value::SingleQuotedString(s)) => Some((s.clone(), false)),
        Expr::Nested(inner) => literal_text(inner),
        Expr::UnaryOp {
            op: UnaryOperator::Minus,
            expr,
        } => match expr.as_ref() {
            Expr::Value(Value::Number(n, _)) => Some((format!("-{}", n), true)),
            _ => None,
        },
        _ => None,
    }
}

/// Integer literals are `int` when they fit and `bigint` otherwise;
/// anything else numeric is `double`.
fn number_literal(text: &str) -> Result<(TypedValue, SqlType)> {
    if let Ok(v) = text.parse::<i32>() {
        return Ok((TypedValue::Int(v), SqlType::Int));
    }
    if let Ok(v) = text.parse::<i64>() {
        return Ok((TypedValue::BigInt(v), SqlType::BigInt));
    }
    Ok((TypedValue::double(parse_double(text)?), SqlType::Double))
}

fn normalize_sql_object_name(sql_object_name: &ObjectName) -> String {
    sql_object_name
        .0
        .iter()
        .map(normalize_ident)
        .collect::<Vec<String>>()
        .join(".")
}

fn normalize_ident(id: &Ident) -> String {
    match id.quote_style {
        Some(_) => id.value.clone(),
        None => id.value.to_ascii_lowercase(),
    }
}
