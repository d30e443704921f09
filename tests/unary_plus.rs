use std::str::FromStr;

use simple_udf::udf::resolve_unary_numeric;
use simple_udf::{DecimalValue, DeferredValue, ErrorCode, ScalarFunction, SqlType, TypedValue, UnaryPlus};

fn check(input_type: SqlType, input: TypedValue, output_type: SqlType, expected: TypedValue) {
    let mut udf = UnaryPlus::new();
    assert_eq!(udf.initialize(&[input_type]).unwrap(), output_type);
    assert_eq!(udf.return_type().unwrap(), output_type);
    let result = udf.evaluate(&[&DeferredValue::new(input)]).unwrap();
    assert_eq!(result, Some(expected));
}

#[test]
fn test_byte() {
    check(
        SqlType::TinyInt,
        TypedValue::TinyInt(4),
        SqlType::TinyInt,
        TypedValue::TinyInt(4),
    );
}

#[test]
fn test_short() {
    check(
        SqlType::SmallInt,
        TypedValue::SmallInt(74),
        SqlType::SmallInt,
        TypedValue::SmallInt(74),
    );
}

#[test]
fn test_int() {
    check(
        SqlType::Int,
        TypedValue::Int(747),
        SqlType::Int,
        TypedValue::Int(747),
    );
}

#[test]
fn test_long() {
    check(
        SqlType::BigInt,
        TypedValue::BigInt(3234747),
        SqlType::BigInt,
        TypedValue::BigInt(3234747),
    );
}

#[test]
fn test_float() {
    check(
        SqlType::Float,
        TypedValue::float(323.4747),
        SqlType::Float,
        TypedValue::float(323.4747),
    );
}

#[test]
fn test_double() {
    check(
        SqlType::Double,
        TypedValue::double(32300.004747),
        SqlType::Double,
        TypedValue::double(32300.004747),
    );
}

#[test]
fn test_decimal() {
    let decimal = SqlType::decimal(11, 6).unwrap();
    let value = TypedValue::Decimal(DecimalValue::from_str("32300.004747").unwrap());
    check(decimal, value.clone(), decimal, value);
}

#[test]
fn test_string() {
    check(
        SqlType::String,
        TypedValue::String("32300.004747".to_string()),
        SqlType::Double,
        TypedValue::double(32300.004747),
    );
}

#[test]
fn test_varchar() {
    check(
        SqlType::varchar(12).unwrap(),
        TypedValue::varchar_with_length("32300.004747", 12),
        SqlType::Double,
        TypedValue::double(32300.004747),
    );
}

#[test]
fn test_char() {
    check(
        SqlType::char(12).unwrap(),
        TypedValue::char_with_length("32300.004747", 12),
        SqlType::Double,
        TypedValue::double(32300.004747),
    );
}

#[test]
fn test_resolve_arity() {
    let mut udf = UnaryPlus::new();
    assert!(matches!(udf.initialize(&[]), Err(ErrorCode::ArityError(_))));
    assert!(matches!(
        udf.initialize(&[SqlType::Int, SqlType::Int]),
        Err(ErrorCode::ArityError(_))
    ));
    // a failed resolution leaves the function usable
    assert_eq!(udf.initialize(&[SqlType::Int]).unwrap(), SqlType::Int);
}

#[test]
fn test_void_is_unsupported() {
    assert!(matches!(
        resolve_unary_numeric("+", &[SqlType::Void]),
        Err(ErrorCode::UnsupportedType(_))
    ));
}

#[test]
fn test_reinitialize() {
    let mut udf = UnaryPlus::new();
    let varchar = SqlType::varchar(12).unwrap();
    assert_eq!(udf.initialize(&[varchar]).unwrap(), SqlType::Double);
    assert_eq!(udf.initialize(&[varchar]).unwrap(), SqlType::Double);
    assert!(udf.initialize(&[SqlType::Int]).is_err());
    assert_eq!(udf.return_type().unwrap(), SqlType::Double);
}

#[test]
fn test_shared_across_threads() {
    let mut udf = UnaryPlus::new();
    udf.initialize(&[SqlType::BigInt]).unwrap();
    let udf: simple_udf::ScalarFunctionRef = std::sync::Arc::new(udf);

    let handles = (0..4i64)
        .map(|i| {
            let udf = udf.clone();
            std::thread::spawn(move || {
                udf.evaluate(&[&DeferredValue::new(TypedValue::BigInt(i))])
                    .unwrap()
            })
        })
        .collect::<Vec<_>>();
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), Some(TypedValue::BigInt(i as i64)));
    }
}
