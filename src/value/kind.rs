//! Value classification.
//!
//! The engine dispatches on the [`ValueKind`] of each value rather than on
//! the value itself, so the set of shapes it handles is the closed list below
//! and every dispatch site is an exhaustive `match`.

use std::fmt;

use super::{ScalarKind, Value};

/// The category of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Absence of a value.
    None,
    /// A primitive scalar of the given subtype.
    Primitive(ScalarKind),
    Instance,
    NamedTuple,
    /// Ordered, growable sequence.
    List,
    /// Ordered, fixed-size sequence.
    Tuple,
    /// Homogeneous numeric array.
    NdArray,
    /// Key-value mapping.
    Dict,
    /// Unordered collection.
    Set,
    /// No supported shape.
    Unsupported,
}

impl ValueKind {
    /// The name written to the `type` attribute.
    ///
    /// Primitives use their subtype name; composites use their kind name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "NoneType",
            Self::Primitive(kind) => kind.name(),
            Self::Instance => "instance",
            Self::NamedTuple => "namedtuple",
            Self::List => "list",
            Self::Tuple => "tuple",
            Self::NdArray => "ndarray",
            Self::Dict => "dict",
            Self::Set => "set",
            Self::Unsupported => "unsupported",
        }
    }

    /// Returns `true` for the composite kinds the engine walks into.
    #[must_use]
    pub fn is_composite(self) -> bool {
        !matches!(self, Self::None | Self::Primitive(_) | Self::Unsupported)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classifies a value into exactly one [`ValueKind`].
///
/// # Examples
///
/// ```
/// use objxml::{classify, ScalarKind, Value, ValueKind};
/// use objxml::value::Scalar;
///
/// assert_eq!(classify(&Value::None), ValueKind::None);
/// assert_eq!(
///     classify(&Value::Scalar(Scalar::Float32(1.0))),
///     ValueKind::Primitive(ScalarKind::Float32)
/// );
/// assert_eq!(classify(&Value::Tuple(vec![])), ValueKind::Tuple);
/// ```
#[must_use]
pub fn classify(value: &Value) -> ValueKind {
    match value {
        Value::None => ValueKind::None,
        Value::Scalar(scalar) => ValueKind::Primitive(scalar.kind()),
        Value::Instance(_) => ValueKind::Instance,
        Value::NamedTuple(_) => ValueKind::NamedTuple,
        Value::List(_) => ValueKind::List,
        Value::Tuple(_) => ValueKind::Tuple,
        Value::NdArray(_) => ValueKind::NdArray,
        Value::Dict(_) => ValueKind::Dict,
        Value::Set(_) => ValueKind::Set,
        Value::Opaque { .. } => ValueKind::Unsupported,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Instance, NamedTuple, NumericArray, Scalar};

    #[test]
    fn test_every_variant_has_one_kind() {
        let cases = [
            (Value::None, ValueKind::None),
            (Value::Scalar(Scalar::Bool(true)), ValueKind::Primitive(ScalarKind::Bool)),
            (Instance::new("A", "m").into(), ValueKind::Instance),
            (NamedTuple::new("P").into(), ValueKind::NamedTuple),
            (Value::List(vec![]), ValueKind::List),
            (Value::Tuple(vec![]), ValueKind::Tuple),
            (NumericArray::from_vec(vec![1_u8]).into(), ValueKind::NdArray),
            (Value::Dict(vec![]), ValueKind::Dict),
            (Value::Set(vec![]), ValueKind::Set),
            (
                Value::Opaque {
                    type_name: "File".to_string(),
                },
                ValueKind::Unsupported,
            ),
        ];
        for (value, expected) in cases {
            assert_eq!(classify(&value), expected, "{value:?}");
        }
    }

    #[test]
    fn test_primitive_subtypes_are_exact() {
        assert_eq!(
            classify(&Value::Scalar(Scalar::Float(1.0))),
            ValueKind::Primitive(ScalarKind::Float)
        );
        assert_eq!(
            classify(&Value::Scalar(Scalar::Float64(1.0))),
            ValueKind::Primitive(ScalarKind::Float64)
        );
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ValueKind::Primitive(ScalarKind::Int).name(), "int");
        assert_eq!(ValueKind::NamedTuple.name(), "namedtuple");
        assert_eq!(ValueKind::NdArray.to_string(), "ndarray");
        assert!(ValueKind::Dict.is_composite());
        assert!(!ValueKind::Primitive(ScalarKind::Str).is_composite());
        assert!(!ValueKind::Unsupported.is_composite());
    }
}
