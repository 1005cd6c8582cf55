//! Lenient deserializers for the platform's loosely typed JSON.
//!
//! The same attribute can arrive as a string on one endpoint and a number on
//! another (`"12"` vs `12`), and flags mix booleans, `0`/`1` and `"yes"`/`"no"`.

use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// Accept a string, number or boolean as an optional string.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Scalar> = Option::deserialize(deserializer)?;

    Ok(value.map(|v| match v {
        Scalar::Bool(b) => b.to_string(),
        Scalar::Int(i) => i.to_string(),
        Scalar::Float(f) => f.to_string(),
        Scalar::String(s) => s,
    }))
}

/// Accept a number or a numeric string; anything unparseable becomes `None`.
pub fn opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Scalar> = Option::deserialize(deserializer)?;

    Ok(match value {
        Some(Scalar::Int(i)) if i >= 0 => Some(i as u64),
        Some(Scalar::Float(f)) if f >= 0.0 => Some(f as u64),
        Some(Scalar::String(s)) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    })
}

/// Deserialize a flexible boolean: `true`/`false`, integers, or the strings
/// `"true"`, `"1"`, `"yes"`, `"false"`, `"0"`, `"no"`, `""`.
pub fn flexible_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Scalar> = Option::deserialize(deserializer)?;

    match value {
        None => Ok(None),
        Some(Scalar::Bool(b)) => Ok(Some(b)),
        Some(Scalar::Int(i)) => Ok(Some(i > 0)),
        Some(Scalar::Float(f)) => Ok(Some(f > 0.0)),
        Some(Scalar::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(Some(true)),
            "false" | "0" | "no" | "" => Ok(Some(false)),
            _ => Err(de::Error::custom(format!("invalid boolean string: {}", s))),
        },
    }
}

/// Treat a `null` list as empty.
pub fn vec_or_null<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Render a JSON scalar as the string the platform expects in URLs.
pub fn value_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
