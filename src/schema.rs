use arrow::datatypes::{Field, Schema, SchemaRef};

use crate::datatype::SqlType;
use crate::error::{ErrorCode, Result};

/// Table schema that keeps the SQL type of every column. Arrow stores char,
/// varchar and string the same way, so the arrow schema alone is not
/// enough to plan expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaiveSchema {
    pub fields: Vec<NaiveField>,
}

impl NaiveSchema {
    pub fn empty() -> Self {
        Self { fields: vec![] }
    }

    pub fn new(fields: Vec<NaiveField>) -> Self {
        Self { fields }
    }

    /// Derives SQL types from an arrow schema; text columns become `string`.
    pub fn from_arrow(qualifier: Option<&str>, schema: &Schema) -> Result<Self> {
        let fields = schema
            .fields()
            .iter()
            .map(|field| {
                Ok(NaiveField::new(
                    qualifier,
                    field.name(),
                    SqlType::try_from(field.data_type())?,
                    field.is_nullable(),
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(fields))
    }

    /// The same columns, all qualified by `qualifier`.
    pub fn with_qualifier(self, qualifier: &str) -> Self {
        Self::new(
            self.fields
                .into_iter()
                .map(|field| NaiveField {
                    qualifier: Some(qualifier.to_string()),
                    ..field
                })
                .collect(),
        )
    }

    pub fn fields(&self) -> &Vec<NaiveField> {
        &self.fields
    }

    pub fn field(&self, i: usize) -> &NaiveField {
        &self.fields[i]
    }

    /// Position and field of the column called `name`, optionally
    /// restricted to one qualifier.
    pub fn index_of(&self, qualifier: Option<&str>, name: &str) -> Result<(usize, &NaiveField)> {
        let mut matches = self.fields.iter().enumerate().filter(|(_, field)| {
            field.name() == name
                && qualifier.map_or(true, |q| field.qualifier() == Some(q))
        });
        match (matches.next(), matches.next()) {
            (Some(found), None) => Ok(found),
            (Some(_), Some(_)) => Err(ErrorCode::PlanError(format!(
                "ambiguous reference to field named '{}'",
                name
            ))),
            (None, _) => Err(ErrorCode::ColumnNotExists(format!(
                "column `{}` not exists",
                name
            ))),
        }
    }

    /// Checks that `schema` stores every column the way its SQL type says.
    pub fn check_arrow(&self, schema: &Schema) -> Result<()> {
        if schema.fields().len() != self.fields.len() {
            return Err(ErrorCode::PlanError(format!(
                "expected {} columns, batch has {}",
                self.fields.len(),
                schema.fields().len()
            )));
        }
        for (field, arrow_field) in self.fields.iter().zip(schema.fields().iter()) {
            if &field.sql_type().to_arrow() != arrow_field.data_type() {
                return Err(ErrorCode::TypeMismatch(format!(
                    "column {} is {}, batch holds arrow {:?}",
                    field.name(),
                    field.sql_type(),
                    arrow_field.data_type()
                )));
            }
        }
        Ok(())
    }
}

impl From<&NaiveSchema> for Schema {
    fn from(schema: &NaiveSchema) -> Self {
        Schema::new(
            schema
                .fields
                .iter()
                .map(|f| Field::new(f.name(), f.sql_type().to_arrow(), f.is_nullable()))
                .collect::<Vec<_>>(),
        )
    }
}

impl From<&NaiveSchema> for SchemaRef {
    fn from(schema: &NaiveSchema) -> Self {
        SchemaRef::new(schema.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaiveField {
    /// Optional qualifier (usually a table name)
    qualifier: Option<String>,
    name: String,
    sql_type: SqlType,
    nullable: bool,
}

impl NaiveField {
    pub fn new(qualifier: Option<&str>, name: &str, sql_type: SqlType, nullable: bool) -> Self {
        Self {
            qualifier: qualifier.map(|s| s.to_owned()),
            name: name.to_string(),
            sql_type,
            nullable,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sql_type(&self) -> SqlType {
        self.sql_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    pub fn qualified_name(&self) -> String {
        match &self.qualifier {
            Some(q) => format!("{}.{}", q, self.name),
            None => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use arrow::datatypes::DataType;

    use super::*;

    fn schema() -> NaiveSchema {
        NaiveSchema::new(vec![
            NaiveField::new(Some("t"), "a", SqlType::Int, true),
            NaiveField::new(Some("t"), "b", SqlType::varchar(12).unwrap(), true),
            NaiveField::new(Some("u"), "a", SqlType::Double, true),
        ])
    }

    #[test]
    fn lookup_by_name() {
        let schema = schema();
        assert_eq!(schema.index_of(None, "b").unwrap().0, 1);
        assert_eq!(schema.index_of(Some("u"), "a").unwrap().0, 2);
        assert!(matches!(
            schema.index_of(None, "a"),
            Err(ErrorCode::PlanError(_))
        ));
        assert!(matches!(
            schema.index_of(None, "z"),
            Err(ErrorCode::ColumnNotExists(_))
        ));
    }

    #[test]
    fn arrow_round_trip_loses_only_text_width() {
        let schema = schema();
        let arrow: Schema = (&schema).into();
        assert_eq!(arrow.field(1).data_type(), &DataType::Utf8);
        schema.check_arrow(&arrow).unwrap();

        let back = NaiveSchema::from_arrow(Some("t"), &arrow).unwrap();
        assert_eq!(back.field(1).sql_type(), SqlType::String);
        assert_eq!(back.field(0).qualified_name(), "t.a");
    }
}
