use std::fmt;
use std::str::FromStr;

use arrow::datatypes::DataType;

use crate::error::{ErrorCode, Result};

pub const MAX_DECIMAL_PRECISION: u8 = 38;
pub const DEFAULT_DECIMAL_PRECISION: u8 = 10;
pub const DEFAULT_DECIMAL_SCALE: u8 = 0;
pub const MAX_CHAR_LENGTH: u32 = 255;
pub const MAX_VARCHAR_LENGTH: u32 = 65535;

/// Static type of an expression, with the width metadata some types carry.
///
/// Two types are equal only when the tag and every metadata field match, so
/// `Varchar { length: 12 }` and `Varchar { length: 20 }` are different types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    Decimal { precision: u8, scale: u8 },
    Char { length: u32 },
    Varchar { length: u32 },
    String,
    Void,
}

impl SqlType {
    pub fn decimal(precision: u8, scale: u8) -> Result<Self> {
        if precision == 0 || precision > MAX_DECIMAL_PRECISION {
            return Err(ErrorCode::UnsupportedType(format!(
                "decimal precision must be between 1 and {}, got {}",
                MAX_DECIMAL_PRECISION, precision
            )));
        }
        if scale > precision {
            return Err(ErrorCode::UnsupportedType(format!(
                "decimal scale {} cannot exceed precision {}",
                scale, precision
            )));
        }
        Ok(SqlType::Decimal { precision, scale })
    }

    pub fn char(length: u32) -> Result<Self> {
        if length == 0 || length > MAX_CHAR_LENGTH {
            return Err(ErrorCode::UnsupportedType(format!(
                "char length must be between 1 and {}, got {}",
                MAX_CHAR_LENGTH, length
            )));
        }
        Ok(SqlType::Char { length })
    }

    pub fn varchar(length: u32) -> Result<Self> {
        if length == 0 || length > MAX_VARCHAR_LENGTH {
            return Err(ErrorCode::UnsupportedType(format!(
                "varchar length must be between 1 and {}, got {}",
                MAX_VARCHAR_LENGTH, length
            )));
        }
        Ok(SqlType::Varchar { length })
    }

    /// Integer and floating point types, the ones that pass through numeric
    /// operators with no metadata at all.
    pub fn is_primitive_numeric(&self) -> bool {
        matches!(
            self,
            SqlType::TinyInt
                | SqlType::SmallInt
                | SqlType::Int
                | SqlType::BigInt
                | SqlType::Float
                | SqlType::Double
        )
    }

    pub fn is_numeric(&self) -> bool {
        self.is_primitive_numeric() || matches!(self, SqlType::Decimal { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(
            self,
            SqlType::Char { .. } | SqlType::Varchar { .. } | SqlType::String
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            SqlType::TinyInt => "tinyint",
            SqlType::SmallInt => "smallint",
            SqlType::Int => "int",
            SqlType::BigInt => "bigint",
            SqlType::Float => "float",
            SqlType::Double => "double",
            SqlType::Decimal { .. } => "decimal",
            SqlType::Char { .. } => "char",
            SqlType::Varchar { .. } => "varchar",
            SqlType::String => "string",
            SqlType::Void => "void",
        }
    }

    /// Arrow storage type. Char, varchar and string all live in `Utf8`, so
    /// the length metadata has to travel with the expression, not the array.
    pub fn to_arrow(&self) -> DataType {
        match self {
            SqlType::TinyInt => DataType::Int8,
            SqlType::SmallInt => DataType::Int16,
            SqlType::Int => DataType::Int32,
            SqlType::BigInt => DataType::Int64,
            SqlType::Float => DataType::Float32,
            SqlType::Double => DataType::Float64,
            SqlType::Decimal { precision, scale } => DataType::Decimal128(*precision, *scale as i8),
            SqlType::Char { .. } | SqlType::Varchar { .. } | SqlType::String => DataType::Utf8,
            SqlType::Void => DataType::Null,
        }
    }
}

impl TryFrom<&DataType> for SqlType {
    type Error = ErrorCode;

    fn try_from(data_type: &DataType) -> Result<Self> {
        match data_type {
            DataType::Int8 => Ok(SqlType::TinyInt),
            DataType::Int16 => Ok(SqlType::SmallInt),
            DataType::Int32 => Ok(SqlType::Int),
            DataType::Int64 => Ok(SqlType::BigInt),
            DataType::Float32 => Ok(SqlType::Float),
            DataType::Float64 => Ok(SqlType::Double),
            DataType::Decimal128(precision, scale) if *scale >= 0 => {
                SqlType::decimal(*precision, *scale as u8)
            }
            DataType::Utf8 | DataType::LargeUtf8 => Ok(SqlType::String),
            DataType::Null => Ok(SqlType::Void),
            other => Err(ErrorCode::UnsupportedType(format!(
                "arrow type {:?} has no sql counterpart",
                other
            ))),
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlType::Decimal { precision, scale } => write!(f, "decimal({},{})", precision, scale),
            SqlType::Char { length } => write!(f, "char({})", length),
            SqlType::Varchar { length } => write!(f, "varchar({})", length),
            other => f.write_str(other.name()),
        }
    }
}

/// Parses SQL type names such as `INT`, `DECIMAL(11, 6)` or
/// `CHARACTER VARYING(12)`. Case and inner whitespace are ignored.
impl FromStr for SqlType {
    type Err = ErrorCode;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        let (name, params) = match normalized.find('(') {
            Some(open) => {
                let close = normalized.rfind(')').filter(|close| *close > open).ok_or_else(|| {
                    ErrorCode::UnsupportedType(format!("malformed type name '{}'", s))
                })?;
                if !normalized[close + 1..].trim().is_empty() {
                    return Err(ErrorCode::UnsupportedType(format!(
                        "malformed type name '{}'",
                        s
                    )));
                }
                let params = normalized[open + 1..close]
                    .split(',')
                    .map(|p| {
                        p.trim().parse::<u32>().map_err(|_| {
                            ErrorCode::UnsupportedType(format!(
                                "invalid type parameter '{}' in '{}'",
                                p.trim(),
                                s
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                (normalized[..open].trim().to_string(), params)
            }
            None => (normalized, vec![]),
        };
        let name = name.split_whitespace().collect::<Vec<_>>().join(" ");

        match (name.as_str(), params.as_slice()) {
            ("tinyint", []) => Ok(SqlType::TinyInt),
            ("smallint", []) => Ok(SqlType::SmallInt),
            ("int" | "integer", []) => Ok(SqlType::Int),
            ("bigint", []) => Ok(SqlType::BigInt),
            ("float" | "real", []) => Ok(SqlType::Float),
            ("double" | "double precision", []) => Ok(SqlType::Double),
            ("decimal" | "numeric", []) => {
                SqlType::decimal(DEFAULT_DECIMAL_PRECISION, DEFAULT_DECIMAL_SCALE)
            }
            ("decimal" | "numeric", [precision]) => {
                SqlType::decimal(narrow(*precision, s)?, DEFAULT_DECIMAL_SCALE)
            }
            ("decimal" | "numeric", [precision, scale]) => {
                SqlType::decimal(narrow(*precision, s)?, narrow(*scale, s)?)
            }
            ("char" | "character", [length]) => SqlType::char(*length),
            ("varchar" | "character varying", [length]) => SqlType::varchar(*length),
            ("string" | "text", []) => Ok(SqlType::String),
            ("void", []) => Ok(SqlType::Void),
            _ => Err(ErrorCode::UnsupportedType(format!("unknown type '{}'", s))),
        }
    }
}

fn narrow(value: u32, type_name: &str) -> Result<u8> {
    u8::try_from(value).map_err(|_| {
        ErrorCode::UnsupportedType(format!(
            "type parameter {} out of range in '{}'",
            value, type_name
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_names() {
        assert_eq!("TINYINT".parse::<SqlType>().unwrap(), SqlType::TinyInt);
        assert_eq!("integer".parse::<SqlType>().unwrap(), SqlType::Int);
        assert_eq!("Double Precision".parse::<SqlType>().unwrap(), SqlType::Double);
        assert_eq!("text".parse::<SqlType>().unwrap(), SqlType::String);
    }

    #[test]
    fn parse_width_metadata() {
        assert_eq!(
            "DECIMAL(11, 6)".parse::<SqlType>().unwrap(),
            SqlType::Decimal {
                precision: 11,
                scale: 6
            }
        );
        assert_eq!(
            "decimal".parse::<SqlType>().unwrap(),
            SqlType::Decimal {
                precision: 10,
                scale: 0
            }
        );
        assert_eq!(
            "character varying(12)".parse::<SqlType>().unwrap(),
            SqlType::Varchar { length: 12 }
        );
        assert_eq!(
            "CHAR(12)".parse::<SqlType>().unwrap(),
            SqlType::Char { length: 12 }
        );
    }

    #[test]
    fn reject_out_of_range_metadata() {
        assert!(matches!(
            "decimal(39, 2)".parse::<SqlType>(),
            Err(ErrorCode::UnsupportedType(_))
        ));
        assert!(matches!(
            "decimal(5, 6)".parse::<SqlType>(),
            Err(ErrorCode::UnsupportedType(_))
        ));
        assert!(matches!(
            "char(256)".parse::<SqlType>(),
            Err(ErrorCode::UnsupportedType(_))
        ));
        assert!(matches!(
            "varchar".parse::<SqlType>(),
            Err(ErrorCode::UnsupportedType(_))
        ));
        assert!(matches!(
            "boolean".parse::<SqlType>(),
            Err(ErrorCode::UnsupportedType(_))
        ));
    }

    #[test]
    fn display_matches_parse() {
        for ty in [
            SqlType::SmallInt,
            SqlType::decimal(11, 6).unwrap(),
            SqlType::char(12).unwrap(),
            SqlType::varchar(12).unwrap(),
            SqlType::Void,
        ] {
            assert_eq!(ty.to_string().parse::<SqlType>().unwrap(), ty);
        }
    }

    #[test]
    fn arrow_mapping() {
        let decimal = SqlType::decimal(11, 6).unwrap();
        assert_eq!(decimal.to_arrow(), DataType::Decimal128(11, 6));
        assert_eq!(SqlType::try_from(&DataType::Decimal128(11, 6)).unwrap(), decimal);
        assert_eq!(SqlType::varchar(12).unwrap().to_arrow(), DataType::Utf8);
        assert_eq!(SqlType::try_from(&DataType::Utf8).unwrap(), SqlType::String);
        assert!(SqlType::try_from(&DataType::Boolean).is_err());
    }
}
