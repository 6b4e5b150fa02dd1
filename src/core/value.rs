//! Helpers over the opaque, schema-free records that make up a pipeline.
//!
//! Resources, jobs and group extras are user-defined YAML, so they stay as
//! [`serde_yaml::Value`] rather than a typed schema. The merger only needs two
//! things from them: the `name` key and deep structural equality.

use serde_yaml::{Mapping, Value};

pub const NAME_KEY: &str = "name";

/// The merge key of a record, if it has a string `name`.
pub fn record_name(record: &Mapping) -> Option<&str> {
    record.get(NAME_KEY).and_then(Value::as_str)
}

/// Deep equality used for conflict detection.
///
/// Mappings compare independent of key order; sequences compare in order;
/// scalars must match in type as well as value, so `1`, `1.0` and `"1"` are
/// three different values.
pub fn structurally_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Sequence(xs), Value::Sequence(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| structurally_equal(x, y))
        }
        (Value::Mapping(x), Value::Mapping(y)) => mappings_equal(x, y),
        (Value::Tagged(x), Value::Tagged(y)) => {
            x.tag == y.tag && structurally_equal(&x.value, &y.value)
        }
        _ => false,
    }
}

pub fn mappings_equal(a: &Mapping, b: &Mapping) -> bool {
    a.len() == b.len()
        && a.iter().all(|(key, value)| {
            b.get(key)
                .map(|other| structurally_equal(value, other))
                .unwrap_or(false)
        })
}

fn numbers_equal(x: &serde_yaml::Number, y: &serde_yaml::Number) -> bool {
    if x.is_f64() != y.is_f64() {
        return false;
    }
    match (x.as_i64(), y.as_i64()) {
        (Some(a), Some(b)) => a == b,
        _ => match (x.as_u64(), y.as_u64()) {
            (Some(a), Some(b)) => a == b,
            _ => x.as_f64() == y.as_f64(),
        },
    }
}
