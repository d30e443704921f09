use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use arrow::array::{
    new_null_array, Array, ArrayRef, Decimal128Array, Float32Array, Float64Array, Int16Array,
    Int32Array, Int64Array, Int8Array, LargeStringArray, StringArray,
};
use ordered_float::OrderedFloat;

use crate::datatype::SqlType;
use crate::decimal::DecimalValue;
use crate::error::{ErrorCode, Result};

/// Collects the payloads of one variant, rejecting values with another tag.
macro_rules! collect_values {
    ($VALUES: expr, $SQL_TYPE: expr, $VARIANT: ident) => {{
        $VALUES
            .into_iter()
            .map(|value| match value {
                Some(TypedValue::$VARIANT(v)) => Ok(Some(v)),
                None => Ok(None),
                Some(other) => Err(ErrorCode::TypeMismatch(format!(
                    "{} value in a {} column",
                    other.type_name(),
                    $SQL_TYPE
                ))),
            })
            .collect::<Result<Vec<_>>>()?
    }};
}

/// A concrete, non-null value. The variant is the value's type tag; width
/// metadata (decimal precision, char length) lives on the [`SqlType`] the
/// value is read under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypedValue {
    TinyInt(i8),
    SmallInt(i16),
    Int(i32),
    BigInt(i64),
    Float(OrderedFloat<f32>),
    Double(OrderedFloat<f64>),
    Decimal(DecimalValue),
    Char(String),
    Varchar(String),
    String(String),
}

impl TypedValue {
    pub fn float(v: f32) -> Self {
        TypedValue::Float(OrderedFloat(v))
    }

    pub fn double(v: f64) -> Self {
        TypedValue::Double(OrderedFloat(v))
    }

    /// Builds a char value, truncated to `length` characters.
    pub fn char_with_length(text: &str, length: u32) -> Self {
        TypedValue::Char(truncate_chars(text, length))
    }

    /// Builds a varchar value, truncated to `length` characters.
    pub fn varchar_with_length(text: &str, length: u32) -> Self {
        TypedValue::Varchar(truncate_chars(text, length))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            TypedValue::TinyInt(_) => "tinyint",
            TypedValue::SmallInt(_) => "smallint",
            TypedValue::Int(_) => "int",
            TypedValue::BigInt(_) => "bigint",
            TypedValue::Float(_) => "float",
            TypedValue::Double(_) => "double",
            TypedValue::Decimal(_) => "decimal",
            TypedValue::Char(_) => "char",
            TypedValue::Varchar(_) => "varchar",
            TypedValue::String(_) => "string",
        }
    }

    /// Whether this value's tag is the tag of `sql_type`. Metadata is not
    /// checked.
    pub fn has_tag_of(&self, sql_type: &SqlType) -> bool {
        matches!(
            (self, sql_type),
            (TypedValue::TinyInt(_), SqlType::TinyInt)
                | (TypedValue::SmallInt(_), SqlType::SmallInt)
                | (TypedValue::Int(_), SqlType::Int)
                | (TypedValue::BigInt(_), SqlType::BigInt)
                | (TypedValue::Float(_), SqlType::Float)
                | (TypedValue::Double(_), SqlType::Double)
                | (TypedValue::Decimal(_), SqlType::Decimal { .. })
                | (TypedValue::Char(_), SqlType::Char { .. })
                | (TypedValue::Varchar(_), SqlType::Varchar { .. })
                | (TypedValue::String(_), SqlType::String)
        )
    }

    /// Text payload of char, varchar and string values. Char values drop
    /// their trailing pad.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TypedValue::Char(s) => Some(s.trim_end_matches(' ')),
            TypedValue::Varchar(s) | TypedValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Parses `text` as a value of `sql_type`. Used to type literals, so
    /// only the text form of each type is understood.
    pub fn parse_as(text: &str, sql_type: &SqlType) -> Result<Self> {
        let trimmed = text.trim();
        let value = match sql_type {
            SqlType::TinyInt => TypedValue::TinyInt(parse_number(trimmed, sql_type)?),
            SqlType::SmallInt => TypedValue::SmallInt(parse_number(trimmed, sql_type)?),
            SqlType::Int => TypedValue::Int(parse_number(trimmed, sql_type)?),
            SqlType::BigInt => TypedValue::BigInt(parse_number(trimmed, sql_type)?),
            SqlType::Float => TypedValue::float(parse_number(trimmed, sql_type)?),
            SqlType::Double => TypedValue::double(parse_double(trimmed)?),
            SqlType::Decimal { precision, scale } => {
                TypedValue::Decimal(fit_decimal(trimmed, *precision, *scale)?)
            }
            SqlType::Char { length } => TypedValue::char_with_length(text, *length),
            SqlType::Varchar { length } => TypedValue::varchar_with_length(text, *length),
            SqlType::String => TypedValue::String(text.to_string()),
            SqlType::Void => {
                return Err(ErrorCode::UnsupportedType(
                    "void has no non-null values".to_string(),
                ))
            }
        };
        Ok(value)
    }

    /// Reads row `row` of `array`, interpreting it as `sql_type`. Returns
    /// `None` for null slots.
    pub fn from_array(array: &ArrayRef, row: usize, sql_type: &SqlType) -> Result<Option<Self>> {
        if row >= array.len() {
            return Err(ErrorCode::PlanError(format!(
                "row {} out of bounds for array of length {}",
                row,
                array.len()
            )));
        }
        if array.is_null(row) {
            return Ok(None);
        }
        let value = match sql_type {
            SqlType::TinyInt => TypedValue::TinyInt(downcast::<Int8Array>(array, sql_type)?.value(row)),
            SqlType::SmallInt => {
                TypedValue::SmallInt(downcast::<Int16Array>(array, sql_type)?.value(row))
            }
            SqlType::Int => TypedValue::Int(downcast::<Int32Array>(array, sql_type)?.value(row)),
            SqlType::BigInt => TypedValue::BigInt(downcast::<Int64Array>(array, sql_type)?.value(row)),
            SqlType::Float => TypedValue::float(downcast::<Float32Array>(array, sql_type)?.value(row)),
            SqlType::Double => {
                TypedValue::double(downcast::<Float64Array>(array, sql_type)?.value(row))
            }
            SqlType::Decimal { scale, .. } => {
                let mantissa = downcast::<Decimal128Array>(array, sql_type)?.value(row);
                TypedValue::Decimal(DecimalValue::new(mantissa, *scale)?)
            }
            SqlType::Char { .. } | SqlType::Varchar { .. } | SqlType::String => {
                let text = read_text(array, row, sql_type)?;
                match sql_type {
                    SqlType::Char { .. } => TypedValue::Char(text),
                    SqlType::Varchar { .. } => TypedValue::Varchar(text),
                    _ => TypedValue::String(text),
                }
            }
            SqlType::Void => return Ok(None),
        };
        Ok(Some(value))
    }

    /// Builds an arrow array of `sql_type` from per-row values.
    pub fn build_array(values: Vec<Option<TypedValue>>, sql_type: &SqlType) -> Result<ArrayRef> {
        let array: ArrayRef = match sql_type {
            SqlType::TinyInt => Arc::new(Int8Array::from(collect_values!(values, sql_type, TinyInt))),
            SqlType::SmallInt => {
                Arc::new(Int16Array::from(collect_values!(values, sql_type, SmallInt)))
            }
            SqlType::Int => Arc::new(Int32Array::from(collect_values!(values, sql_type, Int))),
            SqlType::BigInt => Arc::new(Int64Array::from(collect_values!(values, sql_type, BigInt))),
            SqlType::Float => Arc::new(Float32Array::from(
                collect_values!(values, sql_type, Float)
                    .into_iter()
                    .map(|v| v.map(|v| v.into_inner()))
                    .collect::<Vec<_>>(),
            )),
            SqlType::Double => Arc::new(Float64Array::from(
                collect_values!(values, sql_type, Double)
                    .into_iter()
                    .map(|v| v.map(|v| v.into_inner()))
                    .collect::<Vec<_>>(),
            )),
            SqlType::Decimal { precision, scale } => {
                let mantissas = collect_values!(values, sql_type, Decimal)
                    .into_iter()
                    .map(|v| v.map(|d| decimal_mantissa(d, *precision, *scale)).transpose())
                    .collect::<Result<Vec<_>>>()?;
                Arc::new(
                    Decimal128Array::from(mantissas)
                        .with_precision_and_scale(*precision, *scale as i8)?,
                )
            }
            SqlType::Char { .. } => Arc::new(StringArray::from(collect_values!(values, sql_type, Char))),
            SqlType::Varchar { .. } => {
                Arc::new(StringArray::from(collect_values!(values, sql_type, Varchar)))
            }
            SqlType::String => Arc::new(StringArray::from(collect_values!(values, sql_type, String))),
            SqlType::Void => {
                if let Some(value) = values.iter().flatten().next() {
                    return Err(ErrorCode::TypeMismatch(format!(
                        "{} value in a void column",
                        value.type_name()
                    )));
                }
                new_null_array(&sql_type.to_arrow(), values.len())
            }
        };
        Ok(array)
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::TinyInt(v) => write!(f, "{}", v),
            TypedValue::SmallInt(v) => write!(f, "{}", v),
            TypedValue::Int(v) => write!(f, "{}", v),
            TypedValue::BigInt(v) => write!(f, "{}", v),
            TypedValue::Float(v) => write!(f, "{}", v),
            TypedValue::Double(v) => write!(f, "{}", v),
            TypedValue::Decimal(v) => write!(f, "{}", v),
            TypedValue::Char(v) | TypedValue::Varchar(v) | TypedValue::String(v) => f.write_str(v),
        }
    }
}

/// Parses a base-10 floating point literal such as `32300.004747` or
/// `1e3`, ignoring surrounding whitespace. Non-finite values are spelled
/// `Infinity` and `NaN`, optionally signed; literals too large for a double
/// become infinite.
pub fn parse_double(text: &str) -> Result<f64> {
    let invalid = || ErrorCode::ParseError(format!("'{}' is not a valid double", text));
    let trimmed = text.trim();
    let value = trimmed.parse::<f64>().map_err(|_| invalid())?;
    if value.is_finite() {
        return Ok(value);
    }
    // rust also reads `inf`, `infinity` and `nan` in any case
    let unsigned = trimmed
        .strip_prefix(|c: char| c == '+' || c == '-')
        .unwrap_or(trimmed);
    if unsigned == "Infinity" || unsigned == "NaN" || unsigned.bytes().any(|b| b.is_ascii_digit()) {
        Ok(value)
    } else {
        Err(invalid())
    }
}

fn parse_number<T: FromStr>(text: &str, sql_type: &SqlType) -> Result<T> {
    text.parse::<T>()
        .map_err(|_| ErrorCode::ParseError(format!("'{}' is not a valid {}", text, sql_type)))
}

/// Reads `text` rounded to `scale` and checks that it fits `precision`
/// digits.
fn fit_decimal(text: &str, precision: u8, scale: u8) -> Result<DecimalValue> {
    let decimal = DecimalValue::parse_with_scale(text, scale)?;
    if decimal.integer_digits() > precision.saturating_sub(scale) {
        return Err(ErrorCode::ParseError(format!(
            "{} does not fit decimal({},{})",
            text, precision, scale
        )));
    }
    Ok(decimal)
}

fn decimal_mantissa(decimal: DecimalValue, precision: u8, scale: u8) -> Result<i128> {
    let rescaled = decimal.rescale(scale)?;
    if rescaled.precision() > precision {
        return Err(ErrorCode::TypeMismatch(format!(
            "{} does not fit decimal({},{})",
            decimal, precision, scale
        )));
    }
    Ok(rescaled.raw_value())
}

fn truncate_chars(text: &str, length: u32) -> String {
    text.chars().take(length as usize).collect()
}

fn downcast<'a, T: 'static>(array: &'a ArrayRef, sql_type: &SqlType) -> Result<&'a T> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        ErrorCode::TypeMismatch(format!(
            "expected a {} column, found arrow {:?}",
            sql_type,
            array.data_type()
        ))
    })
}

fn read_text(array: &ArrayRef, row: usize, sql_type: &SqlType) -> Result<String> {
    if let Some(strings) = array.as_any().downcast_ref::<StringArray>() {
        return Ok(strings.value(row).to_string());
    }
    Ok(downcast::<LargeStringArray>(array, sql_type)?.value(row).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_match_types() {
        assert!(TypedValue::TinyInt(4).has_tag_of(&SqlType::TinyInt));
        assert!(!TypedValue::TinyInt(4).has_tag_of(&SqlType::SmallInt));
        assert!(TypedValue::Varchar("a".into()).has_tag_of(&SqlType::Varchar { length: 3 }));
        assert!(!TypedValue::String("a".into()).has_tag_of(&SqlType::Varchar { length: 3 }));
    }

    #[test]
    fn char_and_varchar_truncate() {
        assert_eq!(
            TypedValue::varchar_with_length("32300.004747", 5),
            TypedValue::Varchar("32300".to_string())
        );
        let padded = TypedValue::char_with_length("1.5   ", 12);
        assert_eq!(padded.as_text(), Some("1.5"));
    }

    #[test]
    fn parse_literals() {
        let decimal = SqlType::decimal(11, 6).unwrap();
        assert_eq!(
            TypedValue::parse_as("32300.004747", &decimal).unwrap(),
            TypedValue::Decimal(DecimalValue::from_str("32300.004747").unwrap())
        );
        assert!(matches!(
            TypedValue::parse_as("123456.5", &decimal),
            Err(ErrorCode::ParseError(_))
        ));
        assert!(matches!(
            TypedValue::parse_as("300", &SqlType::TinyInt),
            Err(ErrorCode::ParseError(_))
        ));
        assert_eq!(
            TypedValue::parse_as(" 74 ", &SqlType::SmallInt).unwrap(),
            TypedValue::SmallInt(74)
        );
    }

    #[test]
    fn parse_double_rejects_garbage() {
        assert_eq!(parse_double(" 32300.004747 ").unwrap(), 32300.004747);
        assert_eq!(parse_double("1e3").unwrap(), 1000.0);
        assert!(matches!(parse_double("abc"), Err(ErrorCode::ParseError(_))));
        assert!(matches!(parse_double(""), Err(ErrorCode::ParseError(_))));
    }

    #[test]
    fn parse_double_special_values() {
        assert_eq!(parse_double("Infinity").unwrap(), f64::INFINITY);
        assert_eq!(parse_double("-Infinity").unwrap(), f64::NEG_INFINITY);
        assert!(parse_double("NaN").unwrap().is_nan());
        assert_eq!(parse_double("1e400").unwrap(), f64::INFINITY);
        for text in ["inf", "-inf", "infinity", "INFINITY", "nan", "NAN"] {
            assert!(
                matches!(parse_double(text), Err(ErrorCode::ParseError(_))),
                "{}",
                text
            );
        }
    }

    #[test]
    fn decimals_use_all_38_digits() {
        let wide = SqlType::decimal(38, 9).unwrap();
        let text = "12345678901234567890123456789.123456789";
        let value = TypedValue::parse_as(text, &wide).unwrap();
        assert_eq!(value.to_string(), text);

        let array = TypedValue::build_array(vec![Some(value.clone())], &wide).unwrap();
        let stored = array.as_any().downcast_ref::<Decimal128Array>().unwrap();
        assert_eq!(stored.value(0), 12345678901234567890123456789123456789);
        assert_eq!(TypedValue::from_array(&array, 0, &wide).unwrap(), Some(value));

        let deep = SqlType::decimal(38, 30).unwrap();
        let value = TypedValue::parse_as("1.5", &deep).unwrap();
        let array = TypedValue::build_array(vec![Some(value.clone())], &deep).unwrap();
        assert_eq!(TypedValue::from_array(&array, 0, &deep).unwrap(), Some(value));

        assert!(matches!(
            TypedValue::parse_as("123456789012345678901234567890.5", &wide),
            Err(ErrorCode::ParseError(_))
        ));
    }

    #[test]
    fn arrays_keep_decimal_metadata() {
        let decimal = SqlType::decimal(11, 6).unwrap();
        let value = TypedValue::Decimal(DecimalValue::from_str("32300.004747").unwrap());
        let array = TypedValue::build_array(vec![Some(value.clone()), None], &decimal).unwrap();
        assert_eq!(array.data_type(), &decimal.to_arrow());
        assert_eq!(TypedValue::from_array(&array, 0, &decimal).unwrap(), Some(value));
        assert_eq!(TypedValue::from_array(&array, 1, &decimal).unwrap(), None);
    }

    #[test]
    fn build_array_rejects_foreign_tags() {
        let err = TypedValue::build_array(vec![Some(TypedValue::Int(1))], &SqlType::BigInt);
        assert!(matches!(err, Err(ErrorCode::TypeMismatch(_))));
    }
}
