//! Serde helper for PATCH bodies where a field can be absent, `null`, or a value.
//!
//! Use together with `#[serde(default)]`:
//! absent -> `None`, `null` -> `Some(None)`, value -> `Some(Some(v))`.

use serde::{Deserialize, Deserializer};

pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
