//! The value model.
//!
//! Every object graph handed to the engine is first converted into a
//! [`Value`]: a closed set of variants covering the primitive scalars and the
//! composite shapes the engine knows how to walk. Conversion happens through
//! [`ToValue`], which is implemented for the std scalars and collections and
//! which user record types implement by listing their fields explicitly:
//!
//! ```
//! use objxml::{Instance, ToValue, Value};
//!
//! struct Counter {
//!     count: i64,
//!     cache: Vec<i64>,
//! }
//!
//! impl ToValue for Counter {
//!     fn to_value(&self) -> Value {
//!         Instance::new("Counter", module_path!())
//!             .field("count", &self.count)
//!             .field("cache", &self.cache)
//!             .exclude(["cache"])
//!             .into()
//!     }
//! }
//! ```
//!
//! A `Value` owns its children, so a value graph is always a tree.

mod array;
mod convert;
mod kind;

pub use array::{ArrayElement, NumericArray};
pub use convert::ToValue;
pub use kind::{classify, ValueKind};

use std::fmt;
use std::ops::Neg;

use num_complex::{Complex32, Complex64};

/// The subtype of a primitive scalar.
///
/// Subtypes are never collapsed: `Float32` and `Float64` stay distinct kinds
/// for attribute tagging even when their values render identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScalarKind {
    /// Default-width integer (`i64`, `isize`).
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    /// Default-width float (`f64`).
    Float,
    Float32,
    Float64,
    Bool,
    Str,
    /// Complex number with two `f32` parts.
    Complex64,
    /// Complex number with two `f64` parts.
    Complex128,
}

impl ScalarKind {
    /// Every scalar subtype, in declaration order.
    pub const ALL: [ScalarKind; 16] = [
        Self::Int,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::UInt8,
        Self::UInt16,
        Self::UInt32,
        Self::UInt64,
        Self::Float,
        Self::Float32,
        Self::Float64,
        Self::Bool,
        Self::Str,
        Self::Complex64,
        Self::Complex128,
    ];

    /// The subtype name written to the `type` attribute of a leaf element.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt8 => "uint8",
            Self::UInt16 => "uint16",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Float => "float",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Bool => "bool",
            Self::Str => "str",
            Self::Complex64 => "complex64",
            Self::Complex128 => "complex128",
        }
    }

    /// Returns `true` for the subtypes a numeric array may hold.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        !matches!(self, Self::Bool | Self::Str)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A primitive scalar value.
///
/// `Display` produces the canonical text form used for leaf text and for
/// encoded mapping keys. Floats use the shortest round-trip representation,
/// which always marks the value as floating point (`2.0`, `1e-7`, `inf`).
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float(f64),
    Float32(f32),
    Float64(f64),
    Bool(bool),
    Str(String),
    Complex64(Complex32),
    Complex128(Complex64),
}

impl Scalar {
    /// Returns the subtype of this scalar.
    #[must_use]
    pub fn kind(&self) -> ScalarKind {
        match self {
            Self::Int(_) => ScalarKind::Int,
            Self::Int8(_) => ScalarKind::Int8,
            Self::Int16(_) => ScalarKind::Int16,
            Self::Int32(_) => ScalarKind::Int32,
            Self::Int64(_) => ScalarKind::Int64,
            Self::UInt8(_) => ScalarKind::UInt8,
            Self::UInt16(_) => ScalarKind::UInt16,
            Self::UInt32(_) => ScalarKind::UInt32,
            Self::UInt64(_) => ScalarKind::UInt64,
            Self::Float(_) => ScalarKind::Float,
            Self::Float32(_) => ScalarKind::Float32,
            Self::Float64(_) => ScalarKind::Float64,
            Self::Bool(_) => ScalarKind::Bool,
            Self::Str(_) => ScalarKind::Str,
            Self::Complex64(_) => ScalarKind::Complex64,
            Self::Complex128(_) => ScalarKind::Complex128,
        }
    }
}

fn write_complex<T>(f: &mut fmt::Formatter<'_>, re: T, im: T) -> fmt::Result
where
    T: fmt::Debug + Copy + Default + PartialOrd + Neg<Output = T>,
{
    if im < T::default() {
        write!(f, "{re:?}-{:?}i", -im)
    } else {
        write!(f, "{re:?}+{im:?}i")
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) | Self::Int64(v) => write!(f, "{v}"),
            Self::Int8(v) => write!(f, "{v}"),
            Self::Int16(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::UInt8(v) => write!(f, "{v}"),
            Self::UInt16(v) => write!(f, "{v}"),
            Self::UInt32(v) => write!(f, "{v}"),
            Self::UInt64(v) => write!(f, "{v}"),
            Self::Float(v) | Self::Float64(v) => write!(f, "{v:?}"),
            Self::Float32(v) => write!(f, "{v:?}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Str(v) => f.write_str(v),
            Self::Complex64(c) => write_complex(f, c.re, c.im),
            Self::Complex128(c) => write_complex(f, c.re, c.im),
        }
    }
}

/// Identifies a record type: its name, defining module, and the attribute
/// names it declares as excluded from serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    name: String,
    module: String,
    excluded: Vec<String>,
}

impl ClassInfo {
    /// The record type's name, written as `class_name`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The namespace that defines the type, written as `module`.
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Attribute names the type itself declares as excluded.
    #[must_use]
    pub fn declared_exclusions(&self) -> &[String] {
        &self.excluded
    }
}

/// A record (object instance) described by an explicit field list.
///
/// Fields keep their declaration order, which is the order their elements
/// appear in the output.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    class: ClassInfo,
    fields: Vec<(String, Value)>,
}

impl Instance {
    /// Starts describing an instance of `class_name` defined in `module`.
    ///
    /// `module_path!()` is the natural argument for `module`.
    #[must_use]
    pub fn new(class_name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            class: ClassInfo {
                name: class_name.into(),
                module: module.into(),
                excluded: Vec::new(),
            },
            fields: Vec::new(),
        }
    }

    /// Appends a field.
    #[must_use]
    pub fn field<T: ToValue + ?Sized>(mut self, name: impl Into<String>, value: &T) -> Self {
        self.fields.push((name.into(), value.to_value()));
        self
    }

    /// Declares attribute names that must not be serialized.
    #[must_use]
    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.class.excluded.extend(names.into_iter().map(Into::into));
        self
    }

    /// The type description used for exclusion lookup.
    #[must_use]
    pub fn class(&self) -> &ClassInfo {
        &self.class
    }

    /// The fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }
}

/// A tuple whose fields are individually named.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedTuple {
    name: String,
    fields: Vec<(String, Value)>,
}

impl NamedTuple {
    /// Starts describing a named tuple of type `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field.
    #[must_use]
    pub fn field<T: ToValue + ?Sized>(mut self, name: impl Into<String>, value: &T) -> Self {
        self.fields.push((name.into(), value.to_value()));
        self
    }

    /// The tuple type's name, written as `namedtuple_name`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }
}

/// A value the engine can serialize.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absence of a value. A `None` record field produces no element.
    None,
    /// A primitive scalar, serialized as a leaf.
    Scalar(Scalar),
    /// A record with named fields.
    Instance(Instance),
    /// A tuple with named fields.
    NamedTuple(NamedTuple),
    /// A growable, index-addressed sequence.
    List(Vec<Value>),
    /// A fixed-size, index-addressed sequence.
    Tuple(Vec<Value>),
    /// A homogeneous numeric array.
    NdArray(NumericArray),
    /// Key-value entries in iteration order. Keys need not be strings.
    Dict(Vec<(Value, Value)>),
    /// Set members in the iteration order of the source collection.
    Set(Vec<Value>),
    /// A value with no supported shape. Serializing it is an error.
    Opaque {
        /// Name of the value's type, reported in the error.
        type_name: String,
    },
}

impl Value {
    /// Shorthand for a string scalar.
    #[must_use]
    pub fn str(s: impl Into<String>) -> Self {
        Self::Scalar(Scalar::Str(s.into()))
    }

    /// Returns `true` for [`Value::None`].
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Classifies this value. See [`classify`].
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        classify(self)
    }

    /// The runtime type name of this value: the class or tuple name for
    /// records, the opaque type name, or the kind name otherwise.
    ///
    /// This is the tag of the root element when the value is serialized.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Instance(instance) => instance.class().name(),
            Self::NamedTuple(tuple) => tuple.name(),
            Self::Opaque { type_name } => type_name,
            other => other.kind().name(),
        }
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Self::Scalar(scalar)
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        Self::Instance(instance)
    }
}

impl From<NamedTuple> for Value {
    fn from(tuple: NamedTuple) -> Self {
        Self::NamedTuple(tuple)
    }
}

impl From<NumericArray> for Value {
    fn from(array: NumericArray) -> Self {
        Self::NdArray(array)
    }
}
