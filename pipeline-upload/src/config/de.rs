//! Lenient scalar deserializers
//!
//! Environment and dotenv values arrive as text, while TOML and JSON files may
//! carry a bare number where a string is expected (`path_prefix = 2024`), or a
//! quoted number where an integer is expected. These helpers accept either
//! representation for fields with a fixed scalar type.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    UInt(u64),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Self::Str(s) => s,
            Self::UInt(n) => n.to_string(),
            Self::Int(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(Scalar::into_string)
}

pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_string))
}

pub fn opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Scalar::UInt(n)) => Ok(Some(n)),
        Some(Scalar::Int(n)) => u64::try_from(n)
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected a non-negative integer, found {n}"))),
        Some(Scalar::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(Scalar::Str(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected an integer, found `{s}`"))),
        Some(other) => Err(D::Error::custom(format!(
            "expected an integer, found `{}`",
            other.into_string()
        ))),
    }
}
