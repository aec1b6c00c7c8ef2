//! Lenient accessors over untrusted JSON
//!
//! Nothing here fails: a missing key, a wrong type or a non-object parent
//! all read as `None`.

use serde_json::Value;

/// Walk an object path, e.g. `["metadata", "tokens_used", "total"]`.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |current, key| current.as_object()?.get(*key))
}

/// A value at `path` that is a JSON number.
pub fn number_at(value: &Value, path: &[&str]) -> Option<f64> {
    lookup(value, path).and_then(Value::as_f64)
}

/// A value at `path` that is a JSON string.
pub fn str_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    lookup(value, path).and_then(Value::as_str)
}

/// A value that is neither absent nor `null`, as JS `??` sees it.
pub fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// JS truthiness: `false`, `0`, `NaN`, `""` and `null` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a value the way the UI stringifies it.
///
/// Strings are shown verbatim, whole floats drop their fractional part,
/// containers become compact JSON.
pub fn display(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if n.is_f64() {
                match n.as_f64() {
                    Some(f) if f == 0.0 => "0".to_string(),
                    Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 => {
                        format!("{:.0}", f)
                    }
                    Some(f) => format!("{}", f),
                    None => n.to_string(),
                }
            } else {
                n.to_string()
            }
        }
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Display an optional value, empty string when absent or null.
pub fn display_or_empty(value: Option<&Value>) -> String {
    present(value).map(display).unwrap_or_default()
}
