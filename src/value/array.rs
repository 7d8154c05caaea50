//! Homogeneous numeric arrays.
//!
//! A `NumericArray` is a row-major buffer of same-typed numeric scalars with a
//! shape. Iterating it walks the first axis: a one-dimensional array yields
//! its scalars, a higher-dimensional array yields sub-arrays (rows), so a 2x3
//! matrix serializes as two elements of three elements each.

use num_complex::{Complex32, Complex64};

use super::{Scalar, ScalarKind, Value};
use crate::error::Error;

/// A Rust numeric type that can be stored in a [`NumericArray`].
///
/// Array elements always carry their explicit width, so an `i64` array holds
/// `int64` elements, not default-width `int`s.
pub trait ArrayElement: Copy {
    /// The element subtype.
    const KIND: ScalarKind;

    /// Wraps the value in its width-specific scalar variant.
    fn into_scalar(self) -> Scalar;
}

macro_rules! array_element {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl ArrayElement for $ty {
                const KIND: ScalarKind = ScalarKind::$variant;

                fn into_scalar(self) -> Scalar {
                    Scalar::$variant(self)
                }
            }
        )*
    };
}

array_element! {
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    Complex32 => Complex64,
    Complex64 => Complex128,
}

/// A homogeneous, possibly multi-dimensional numeric array.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericArray {
    dtype: ScalarKind,
    shape: Vec<usize>,
    data: Vec<Scalar>,
}

impl NumericArray {
    /// Builds a one-dimensional array.
    ///
    /// # Examples
    ///
    /// ```
    /// use objxml::NumericArray;
    ///
    /// let array = NumericArray::from_vec(vec![1.0_f32, 2.0, 3.0]);
    /// assert_eq!(array.shape(), [3]);
    /// assert_eq!(array.dtype().name(), "float32");
    /// ```
    #[must_use]
    pub fn from_vec<T: ArrayElement>(values: Vec<T>) -> Self {
        Self {
            dtype: T::KIND,
            shape: vec![values.len()],
            data: values.into_iter().map(ArrayElement::into_scalar).collect(),
        }
    }

    /// Builds an array of the given shape from row-major values.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArray` if the shape is empty or its product
    /// does not match the number of values.
    pub fn from_shape_vec<T: ArrayElement>(shape: Vec<usize>, values: Vec<T>) -> Result<Self, Error> {
        let data = values.into_iter().map(ArrayElement::into_scalar).collect();
        Self::from_scalars(T::KIND, shape, data)
    }

    /// Builds an array from already-wrapped scalars.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArray` if `dtype` is not numeric, if any scalar
    /// has a different subtype, or if the shape does not fit the data.
    pub fn from_scalars(dtype: ScalarKind, shape: Vec<usize>, data: Vec<Scalar>) -> Result<Self, Error> {
        if !dtype.is_numeric() {
            return Err(Error::InvalidArray {
                reason: format!("element type `{dtype}` is not numeric"),
            });
        }
        if let Some(odd) = data.iter().find(|s| s.kind() != dtype) {
            return Err(Error::InvalidArray {
                reason: format!("element of type `{}` in a `{dtype}` array", odd.kind()),
            });
        }
        if shape.is_empty() {
            return Err(Error::InvalidArray {
                reason: "zero-dimensional arrays cannot be iterated".to_string(),
            });
        }
        // Every partial product of the axes must fit, including those `elements()`
        // computes for rows of an array whose outer axis is zero.
        let Some(nonzero) = shape
            .iter()
            .filter(|&&d| d != 0)
            .try_fold(1_usize, |acc, &d| acc.checked_mul(d))
        else {
            return Err(Error::InvalidArray {
                reason: format!("shape {shape:?} has more elements than fit in memory"),
            });
        };
        let expected = if shape.contains(&0) { 0 } else { nonzero };
        if expected != data.len() {
            return Err(Error::InvalidArray {
                reason: format!(
                    "shape {shape:?} needs {expected} elements, got {}",
                    data.len()
                ),
            });
        }
        Ok(Self { dtype, shape, data })
    }

    /// The element subtype.
    #[must_use]
    pub fn dtype(&self) -> ScalarKind {
        self.dtype
    }

    /// The extent of each axis.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of axes.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Length of the first axis, i.e. the number of elements iteration yields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shape[0]
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates the first axis: scalars for 1-D arrays, rows otherwise.
    pub fn elements(&self) -> impl Iterator<Item = Value> + '_ {
        let row_shape = &self.shape[1..];
        let row_len: usize = row_shape.iter().product();
        (0..self.len()).map(move |i| {
            if row_shape.is_empty() {
                Value::Scalar(self.data[i].clone())
            } else {
                Value::NdArray(Self {
                    dtype: self.dtype,
                    shape: row_shape.to_vec(),
                    data: self.data[i * row_len..(i + 1) * row_len].to_vec(),
                })
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_uses_explicit_widths() {
        let array = NumericArray::from_vec(vec![1_i64, 2]);
        assert_eq!(array.dtype(), ScalarKind::Int64);
        let elements: Vec<Value> = array.elements().collect();
        assert_eq!(
            elements,
            vec![
                Value::Scalar(Scalar::Int64(1)),
                Value::Scalar(Scalar::Int64(2))
            ]
        );
    }

    #[test]
    fn test_rows_of_matrix() {
        let array = NumericArray::from_shape_vec(vec![2, 3], vec![1_i32, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(array.ndim(), 2);
        assert_eq!(array.len(), 2);
        let rows: Vec<Value> = array.elements().collect();
        let Value::NdArray(second) = &rows[1] else {
            panic!("expected a row, got {:?}", rows[1]);
        };
        assert_eq!(second.shape(), [3]);
        let values: Vec<String> = second
            .elements()
            .map(|v| match v {
                Value::Scalar(s) => s.to_string(),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(values, vec!["4", "5", "6"]);
    }

    #[test]
    fn test_shape_mismatch() {
        let err = NumericArray::from_shape_vec(vec![2, 2], vec![1.0_f64, 2.0, 3.0]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid numeric array: shape [2, 2] needs 4 elements, got 3"
        );
    }

    #[test]
    fn test_overflowing_shape_rejected() {
        let err = NumericArray::from_scalars(ScalarKind::Int32, vec![usize::MAX, 2], vec![]).unwrap_err();
        assert!(matches!(err, Error::InvalidArray { .. }));
        assert!(err.to_string().contains("more elements than fit"));

        let wraps_to_zero = vec![1_usize << (usize::BITS - 1), 2];
        assert!(NumericArray::from_scalars(ScalarKind::Int32, wraps_to_zero, vec![]).is_err());
        assert!(NumericArray::from_scalars(ScalarKind::Int32, vec![0, usize::MAX, 2], vec![]).is_err());
    }

    #[test]
    fn test_zero_dimensional_rejected() {
        assert!(NumericArray::from_shape_vec(vec![], vec![1_u8]).is_err());
    }

    #[test]
    fn test_mixed_elements_rejected() {
        let err = NumericArray::from_scalars(
            ScalarKind::Int32,
            vec![2],
            vec![Scalar::Int32(1), Scalar::Float32(2.0)],
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArray { .. }));
    }

    #[test]
    fn test_non_numeric_dtype_rejected() {
        let err = NumericArray::from_scalars(ScalarKind::Str, vec![0], vec![]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid numeric array: element type `str` is not numeric"
        );
    }

    #[test]
    fn test_empty_rows() {
        let array = NumericArray::from_shape_vec::<f32>(vec![2, 0], vec![]).unwrap();
        let rows: Vec<Value> = array.elements().collect();
        assert_eq!(rows.len(), 2);
        assert!(matches!(&rows[0], Value::NdArray(row) if row.is_empty()));
    }
}
