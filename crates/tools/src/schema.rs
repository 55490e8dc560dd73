//! Input parsing and schema description for one Rust type.

use crate::error::ValidationError;
use crate::traits::ToolInput;
use schemars::JsonSchema;
use serde_json::Value;
use std::marker::PhantomData;

/// Structural description of a shape, as a JSON Schema document.
pub trait Describe {
    fn describe(&self) -> Value;
}

/// Schema for `T`. Parsing and describing are independent operations on the
/// same value, both driven by `T`'s derives.
pub struct Schema<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Schema<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for Schema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ToolInput> Schema<T> {
    /// Deserializes `raw` and runs `T`'s constraint checks. `null` is read as
    /// an empty object so tools with all-optional fields accept a bare call.
    pub fn parse(&self, raw: Value) -> Result<T, ValidationError> {
        let raw = match raw {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };
        if !raw.is_object() {
            return Err(ValidationError::message("inputs must be an object"));
        }
        let value: T = serde_json::from_value(raw)?;
        value.validate()?;
        Ok(value)
    }
}

impl<T: JsonSchema> Describe for Schema<T> {
    fn describe(&self) -> Value {
        schemars::schema_for!(T).to_value()
    }
}
