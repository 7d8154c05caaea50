//! Mapping-key encoding.
//!
//! Mapping entries become child elements named after their keys. String keys
//! are used as-is; every other key is escaped into a name that also records
//! the key's scalar subtype:
//!
//! | key | encoded name |
//! |-----|--------------|
//! | `"host"` | `host` |
//! | `1` (`int`) | `key_1_` |
//! | `1` (`int32`) | `key_1_-INT32` |
//! | `(2, 3.5f32)` | `key_2_3.5-FLOAT32_tuple` |
//!
//! The per-subtype markers come from [`suffix`], an exhaustive `match`, so a
//! scalar subtype can never lack an encoding. [`decode_key`] inverts the
//! scheme.

use std::collections::HashMap;
use std::str::FromStr;

use num_complex::{Complex32, Complex64};

use crate::error::Error;
use crate::value::{Scalar, ScalarKind, Value};

const KEY_PREFIX: &str = "key_";
const TUPLE_SUFFIX: &str = "tuple";
const SEPARATOR: char = '_';

/// Returns the marker appended to a scalar of the given subtype inside an
/// encoded key.
///
/// Default-width `int` and `float` and `str` have no marker.
#[must_use]
pub fn suffix(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::Int | ScalarKind::Float | ScalarKind::Str => "",
        ScalarKind::Int8 => "-INT8",
        ScalarKind::Int16 => "-INT16",
        ScalarKind::Int32 => "-INT32",
        ScalarKind::Int64 => "-INT64",
        ScalarKind::UInt8 => "-UINT8",
        ScalarKind::UInt16 => "-UINT16",
        ScalarKind::UInt32 => "-UINT32",
        ScalarKind::UInt64 => "-UINT64",
        ScalarKind::Float32 => "-FLOAT32",
        ScalarKind::Float64 => "-FLOAT64",
        ScalarKind::Bool => "-BOOL",
        ScalarKind::Complex64 => "-COMPLEX64",
        ScalarKind::Complex128 => "-COMPLEX128",
    }
}

/// Encodes a mapping key as an element name.
///
/// # Errors
///
/// Returns `Error::UnsupportedKey` if the key is not a string, a scalar, or
/// a tuple whose elements are all scalars.
///
/// # Examples
///
/// ```
/// use objxml::keys::encode_key;
/// use objxml::ToValue;
///
/// assert_eq!(encode_key(&"host".to_value()).unwrap(), "host");
/// assert_eq!(encode_key(&1_i64.to_value()).unwrap(), "key_1_");
/// assert_eq!(encode_key(&(2_i64, 3_i64).to_value()).unwrap(), "key_2_3_tuple");
/// ```
pub fn encode_key(key: &Value) -> Result<String, Error> {
    match key {
        Value::Scalar(Scalar::Str(s)) => Ok(s.clone()),
        Value::Scalar(scalar) => Ok(format!(
            "{KEY_PREFIX}{scalar}{SEPARATOR}{}",
            suffix(scalar.kind())
        )),
        Value::Tuple(items) => {
            let mut name = String::from(KEY_PREFIX);
            for item in items {
                let Value::Scalar(scalar) = item else {
                    return Err(Error::UnsupportedKey {
                        key_type: item.type_name().to_string(),
                    });
                };
                name.push_str(&scalar.to_string());
                name.push_str(suffix(scalar.kind()));
                name.push(SEPARATOR);
            }
            name.push_str(TUPLE_SUFFIX);
            Ok(name)
        }
        other => Err(Error::UnsupportedKey {
            key_type: other.type_name().to_string(),
        }),
    }
}

/// Encodes every key of a mapping, keeping the first-insertion order of the
/// encoded names.
///
/// When two keys encode to the same name, the later value replaces the
/// earlier one (which keeps its position) and a warning is logged.
///
/// # Errors
///
/// Returns the first `Error::UnsupportedKey` encountered.
pub fn make_keys_serializable(entries: &[(Value, Value)]) -> Result<Vec<(String, &Value)>, Error> {
    let mut encoded: Vec<(String, &Value)> = Vec::with_capacity(entries.len());
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(entries.len());
    for (key, value) in entries {
        let name = encode_key(key)?;
        if let Some(&pos) = positions.get(&name) {
            log::warn!("mapping key {key:?} encodes to `{name}` like an earlier key; keeping the later value");
            encoded[pos].1 = value;
        } else {
            positions.insert(name.clone(), encoded.len());
            encoded.push((name, value));
        }
    }
    Ok(encoded)
}

/// A mapping key recovered from an element name.
#[derive(Debug, Clone, PartialEq)]
pub enum Key {
    /// A name without the `key_` prefix.
    Str(String),
    /// A single non-string scalar.
    Scalar(Scalar),
    /// A tuple of scalars.
    Tuple(Vec<Scalar>),
}

impl From<Key> for Value {
    fn from(key: Key) -> Self {
        match key {
            Key::Str(s) => Value::str(s),
            Key::Scalar(scalar) => Value::Scalar(scalar),
            Key::Tuple(items) => Value::Tuple(items.into_iter().map(Value::Scalar).collect()),
        }
    }
}

/// Decodes an element name produced by [`encode_key`].
///
/// Markerless values decode as `int` when they parse as an integer and as
/// `float` otherwise; inside tuples, a markerless value that is neither
/// decodes as `str`. String keys that themselves start with `key_`, and
/// tuple elements that are strings containing `_` or looking numeric, do not
/// survive the round trip.
///
/// # Errors
///
/// Returns `Error::InvalidKeyEncoding` if a `key_` name is malformed.
///
/// # Examples
///
/// ```
/// use objxml::keys::{decode_key, Key};
/// use objxml::value::Scalar;
///
/// assert_eq!(decode_key("host").unwrap(), Key::Str("host".to_string()));
/// assert_eq!(decode_key("key_7_-INT32").unwrap(), Key::Scalar(Scalar::Int32(7)));
/// ```
pub fn decode_key(name: &str) -> Result<Key, Error> {
    let Some(body) = name.strip_prefix(KEY_PREFIX) else {
        return Ok(Key::Str(name.to_string()));
    };
    let invalid = || Error::InvalidKeyEncoding {
        name: name.to_string(),
    };

    if let Some(items) = body.strip_suffix(TUPLE_SUFFIX) {
        if items.is_empty() {
            return Ok(Key::Tuple(Vec::new()));
        }
        let items = items.strip_suffix(SEPARATOR).ok_or_else(invalid)?;
        return items
            .split(SEPARATOR)
            .map(|token| decode_token(token, true).ok_or_else(invalid))
            .collect::<Result<Vec<_>, _>>()
            .map(Key::Tuple);
    }

    let (text, marker) = body.rsplit_once(SEPARATOR).ok_or_else(invalid)?;
    let scalar = if marker.is_empty() {
        decode_markerless(text, false)
    } else {
        let kind = kind_for_marker(marker).ok_or_else(invalid)?;
        parse_scalar(text, kind)
    };
    scalar.map(Key::Scalar).ok_or_else(invalid)
}

fn kind_for_marker(marker: &str) -> Option<ScalarKind> {
    ScalarKind::ALL
        .into_iter()
        .find(|&kind| !suffix(kind).is_empty() && suffix(kind) == marker)
}

fn decode_token(token: &str, allow_str: bool) -> Option<Scalar> {
    for kind in ScalarKind::ALL {
        let marker = suffix(kind);
        if marker.is_empty() {
            continue;
        }
        if let Some(text) = token.strip_suffix(marker) {
            return parse_scalar(text, kind);
        }
    }
    decode_markerless(token, allow_str)
}

fn decode_markerless(text: &str, allow_str: bool) -> Option<Scalar> {
    if let Ok(v) = text.parse::<i64>() {
        Some(Scalar::Int(v))
    } else if let Ok(v) = text.parse::<f64>() {
        Some(Scalar::Float(v))
    } else if allow_str {
        Some(Scalar::Str(text.to_string()))
    } else {
        None
    }
}

fn parse_scalar(text: &str, kind: ScalarKind) -> Option<Scalar> {
    let scalar = match kind {
        ScalarKind::Int => Scalar::Int(text.parse().ok()?),
        ScalarKind::Int8 => Scalar::Int8(text.parse().ok()?),
        ScalarKind::Int16 => Scalar::Int16(text.parse().ok()?),
        ScalarKind::Int32 => Scalar::Int32(text.parse().ok()?),
        ScalarKind::Int64 => Scalar::Int64(text.parse().ok()?),
        ScalarKind::UInt8 => Scalar::UInt8(text.parse().ok()?),
        ScalarKind::UInt16 => Scalar::UInt16(text.parse().ok()?),
        ScalarKind::UInt32 => Scalar::UInt32(text.parse().ok()?),
        ScalarKind::UInt64 => Scalar::UInt64(text.parse().ok()?),
        ScalarKind::Float => Scalar::Float(text.parse().ok()?),
        ScalarKind::Float32 => Scalar::Float32(text.parse().ok()?),
        ScalarKind::Float64 => Scalar::Float64(text.parse().ok()?),
        ScalarKind::Bool => Scalar::Bool(text.parse().ok()?),
        ScalarKind::Str => Scalar::Str(text.to_string()),
        ScalarKind::Complex64 => Scalar::Complex64(Complex32::from_str(text).ok()?),
        ScalarKind::Complex128 => Scalar::Complex128(Complex64::from_str(text).ok()?),
    };
    Some(scalar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ToValue;
    use pretty_assertions::assert_eq;

    fn roundtrip(key: &Value) -> Value {
        let name = encode_key(key).unwrap();
        Value::from(decode_key(&name).unwrap())
    }

    #[test]
    fn test_string_key_unchanged() {
        assert_eq!(encode_key(&Value::str("host")).unwrap(), "host");
        assert_eq!(encode_key(&Value::str("two words")).unwrap(), "two words");
    }

    #[test]
    fn test_scalar_keys() {
        assert_eq!(encode_key(&1_i64.to_value()).unwrap(), "key_1_");
        assert_eq!(encode_key(&(-4_i32).to_value()).unwrap(), "key_-4_-INT32");
        assert_eq!(encode_key(&2.0_f64.to_value()).unwrap(), "key_2.0_");
        assert_eq!(encode_key(&0.5_f32.to_value()).unwrap(), "key_0.5_-FLOAT32");
        assert_eq!(encode_key(&true.to_value()).unwrap(), "key_true_-BOOL");
    }

    #[test]
    fn test_tuple_keys() {
        assert_eq!(encode_key(&(2_i64, 3_i64).to_value()).unwrap(), "key_2_3_tuple");
        assert_eq!(
            encode_key(&(1_u8, 2.5_f64, "x").to_value()).unwrap(),
            "key_1-UINT8_2.5_x_tuple"
        );
        assert_eq!(encode_key(&Value::Tuple(vec![])).unwrap(), "key_tuple");
    }

    #[test]
    fn test_suffix_table_is_exhaustive_and_distinct() {
        let mut markers: Vec<&str> = ScalarKind::ALL
            .into_iter()
            .map(suffix)
            .filter(|m| !m.is_empty())
            .collect();
        let count = markers.len();
        markers.sort_unstable();
        markers.dedup();
        assert_eq!(markers.len(), count);
        assert_eq!(count, ScalarKind::ALL.len() - 3);
    }

    #[test]
    fn test_unsupported_keys() {
        for key in [
            Value::None,
            Value::List(vec![]),
            Value::Tuple(vec![Value::Tuple(vec![])]),
            Value::Dict(vec![]),
        ] {
            assert!(
                matches!(encode_key(&key), Err(Error::UnsupportedKey { .. })),
                "{key:?}"
            );
        }
        let err = encode_key(&(1_i64, vec![2_i64]).to_value()).unwrap_err();
        assert_eq!(err.to_string(), "unsupported mapping key of type `list`");
    }

    #[test]
    fn test_make_keys_serializable_keeps_order() {
        let entries = vec![
            (Value::str("name"), Value::str("n")),
            (1_i64.to_value(), Value::str("x")),
            ((2_i64, 3_i64).to_value(), Value::str("y")),
        ];
        let encoded = make_keys_serializable(&entries).unwrap();
        let names: Vec<&str> = encoded.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["name", "key_1_", "key_2_3_tuple"]);
        assert_eq!(encoded[2].1, &Value::str("y"));
    }

    #[test]
    fn test_make_keys_serializable_collision_keeps_later_value() {
        let entries = vec![
            (1_i64.to_value(), Value::str("first")),
            (Value::str("other"), Value::str("o")),
            (Value::str("key_1_"), Value::str("second")),
        ];
        let encoded = make_keys_serializable(&entries).unwrap();
        assert_eq!(encoded.len(), 2);
        assert_eq!(encoded[0].0, "key_1_");
        assert_eq!(encoded[0].1, &Value::str("second"));
        assert_eq!(encoded[1].0, "other");
    }

    #[test]
    fn test_roundtrip_closed_key_set() {
        let keys = [
            Value::str("plain"),
            7_i64.to_value(),
            (-7_i64).to_value(),
            2.0_f64.to_value(),
            0.25_f64.to_value(),
            1e-9_f64.to_value(),
            250_u8.to_value(),
            (-3_i16).to_value(),
            1.5_f32.to_value(),
            Value::Scalar(Scalar::Float64(1.5)),
            Value::Scalar(Scalar::Int64(9)),
            false.to_value(),
            Complex64::new(1.0, -2.0).to_value(),
            (1_i64, 2.5_f32, 3_u32, -4.0_f64).to_value(),
            (Value::Scalar(Scalar::Int64(1)), Value::Scalar(Scalar::Float64(1.0))).to_value(),
            Value::Tuple(vec![]),
        ];
        for key in keys {
            assert_eq!(roundtrip(&key), key);
        }
    }

    #[test]
    fn test_decode_markerless_tuple_string() {
        assert_eq!(
            decode_key("key_1_abc_tuple").unwrap(),
            Key::Tuple(vec![Scalar::Int(1), Scalar::Str("abc".to_string())])
        );
    }

    #[test]
    fn test_decode_malformed() {
        for name in ["key_", "key_abc_", "key_1_-NOPE", "key_x-INT8_", "key_1tuple"] {
            assert!(
                matches!(decode_key(name), Err(Error::InvalidKeyEncoding { .. })),
                "{name}"
            );
        }
    }
}
