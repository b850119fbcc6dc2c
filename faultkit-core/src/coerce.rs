//! Viewing dynamic JSON values as concrete types

use crate::error::{self, Result};
use serde_json::{Map, Value};

/// A type a [`Value`] can be viewed as without conversion.
pub trait Coerce<'a>: Sized {
    const TYPE_NAME: &'static str;

    fn view(value: &'a Value) -> Option<Self>;
}

impl<'a> Coerce<'a> for &'a str {
    const TYPE_NAME: &'static str = "string";

    fn view(value: &'a Value) -> Option<Self> {
        value.as_str()
    }
}

impl Coerce<'_> for i64 {
    const TYPE_NAME: &'static str = "integer";

    fn view(value: &Value) -> Option<Self> {
        value.as_i64()
    }
}

impl Coerce<'_> for u64 {
    const TYPE_NAME: &'static str = "unsigned integer";

    fn view(value: &Value) -> Option<Self> {
        value.as_u64()
    }
}

impl Coerce<'_> for f64 {
    const TYPE_NAME: &'static str = "float";

    fn view(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl Coerce<'_> for bool {
    const TYPE_NAME: &'static str = "boolean";

    fn view(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl<'a> Coerce<'a> for &'a [Value] {
    const TYPE_NAME: &'static str = "array";

    fn view(value: &'a Value) -> Option<Self> {
        value.as_array().map(Vec::as_slice)
    }
}

impl<'a> Coerce<'a> for &'a Map<String, Value> {
    const TYPE_NAME: &'static str = "object";

    fn view(value: &'a Value) -> Option<Self> {
        value.as_object()
    }
}

/// The JSON type name of a value
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// View `value` as `T`.
///
/// Null fails with NullReferenceFault; any other mismatch with
/// TypeCoercionFault.
pub fn coerce<'a, T: Coerce<'a>>(value: &'a Value) -> Result<T> {
    if value.is_null() {
        return Err(
            error::null_reference(format!("cannot view null as {}", T::TYPE_NAME))
                .with_operation("coerce"),
        );
    }
    T::view(value).ok_or_else(|| {
        error::type_mismatch(type_name(value), T::TYPE_NAME).with_operation("coerce")
    })
}
