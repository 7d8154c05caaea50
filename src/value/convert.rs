//! Conversions from Rust values into [`Value`].

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

use num_complex::{Complex32, Complex64};

use super::{Instance, NamedTuple, NumericArray, Scalar, Value};

/// Converts a Rust value into the engine's value model.
///
/// Implemented for the primitive scalars, strings, `Option` (where `None`
/// maps to [`Value::None`]), sequences, tuples up to arity eight, sets, and
/// maps. Record types implement it by building an [`Instance`] or a
/// [`NamedTuple`] field by field.
///
/// Scalar mapping: `i64`/`isize` become `int`, `f64` becomes `float`; every
/// other numeric type keeps its width (`i32` → `int32`, `f32` → `float32`,
/// `usize` → `uint64`).
pub trait ToValue {
    /// Builds the value tree for `self`.
    fn to_value(&self) -> Value;
}

macro_rules! scalar_to_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl ToValue for $ty {
                fn to_value(&self) -> Value {
                    Value::Scalar(Scalar::$variant(*self))
                }
            }
        )*
    };
}

scalar_to_value! {
    i64 => Int,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f64 => Float,
    f32 => Float32,
    bool => Bool,
    Complex32 => Complex64,
    Complex64 => Complex128,
}

impl ToValue for isize {
    fn to_value(&self) -> Value {
        Value::Scalar(Scalar::Int(*self as i64))
    }
}

impl ToValue for usize {
    fn to_value(&self) -> Value {
        Value::Scalar(Scalar::UInt64(*self as u64))
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::str(self)
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::str(self.as_str())
    }
}

impl ToValue for char {
    fn to_value(&self) -> Value {
        Value::str(self.to_string())
    }
}

impl ToValue for Scalar {
    fn to_value(&self) -> Value {
        Value::Scalar(self.clone())
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for Instance {
    fn to_value(&self) -> Value {
        Value::Instance(self.clone())
    }
}

impl ToValue for NamedTuple {
    fn to_value(&self) -> Value {
        Value::NamedTuple(self.clone())
    }
}

impl ToValue for NumericArray {
    fn to_value(&self) -> Value {
        Value::NdArray(self.clone())
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::None, ToValue::to_value)
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Rc<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Arc<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue, const N: usize> ToValue for [T; N] {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue> ToValue for VecDeque<T> {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

/// Members appear in the set's own iteration order, which is unspecified and
/// may differ between runs.
impl<T: ToValue, S> ToValue for HashSet<T, S> {
    fn to_value(&self) -> Value {
        Value::Set(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue> ToValue for BTreeSet<T> {
    fn to_value(&self) -> Value {
        Value::Set(self.iter().map(ToValue::to_value).collect())
    }
}

impl<K: ToValue, V: ToValue, S> ToValue for HashMap<K, V, S> {
    fn to_value(&self) -> Value {
        Value::Dict(self.iter().map(|(k, v)| (k.to_value(), v.to_value())).collect())
    }
}

impl<K: ToValue, V: ToValue> ToValue for BTreeMap<K, V> {
    fn to_value(&self) -> Value {
        Value::Dict(self.iter().map(|(k, v)| (k.to_value(), v.to_value())).collect())
    }
}

macro_rules! tuple_to_value {
    ($($name:ident)+) => {
        impl<$($name: ToValue),+> ToValue for ($($name,)+) {
            #[allow(non_snake_case)]
            fn to_value(&self) -> Value {
                let ($($name,)+) = self;
                Value::Tuple(vec![$($name.to_value()),+])
            }
        }
    };
}

tuple_to_value!(A);
tuple_to_value!(A B);
tuple_to_value!(A B C);
tuple_to_value!(A B C D);
tuple_to_value!(A B C D E);
tuple_to_value!(A B C D E F);
tuple_to_value!(A B C D E F G);
tuple_to_value!(A B C D E F G H);
