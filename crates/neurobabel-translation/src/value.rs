// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Parameter values: scalars and per-member arrays
//!
//! A parameter value is either a single `f64` shared by every member of a
//! population, or a fixed-length array with one element per member
//! (heterogeneous parameters). All arithmetic broadcasts: scalar-scalar
//! yields a scalar, scalar-array yields an array, array-array requires equal
//! lengths.

use std::fmt;

use ndarray::Array1;
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Array lengths that failed to broadcast against each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeError {
    pub expected: usize,
    pub actual: usize,
}

/// A single parameter value, scalar or array-valued
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Scalar(f64),
    Array(Array1<f64>),
}

// Serialized form is a plain number or a plain array of numbers, so
// parameter documents read like the dictionaries they describe.
impl Serialize for ParameterValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParameterValue::Scalar(x) => serializer.serialize_f64(*x),
            ParameterValue::Array(a) => serializer.collect_seq(a.iter()),
        }
    }
}

impl<'de> Deserialize<'de> for ParameterValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = ParameterValue;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number or an array of numbers")
            }

            fn visit_f64<E: de::Error>(self, x: f64) -> Result<Self::Value, E> {
                Ok(ParameterValue::Scalar(x))
            }

            fn visit_i64<E: de::Error>(self, x: i64) -> Result<Self::Value, E> {
                Ok(ParameterValue::Scalar(x as f64))
            }

            fn visit_u64<E: de::Error>(self, x: u64) -> Result<Self::Value, E> {
                Ok(ParameterValue::Scalar(x as f64))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut values = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(x) = seq.next_element::<f64>()? {
                    values.push(x);
                }
                Ok(ParameterValue::from(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl ParameterValue {
    /// Array length, or `None` for a scalar
    pub fn len(&self) -> Option<usize> {
        match self {
            ParameterValue::Scalar(_) => None,
            ParameterValue::Array(a) => Some(a.len()),
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, ParameterValue::Scalar(_))
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            ParameterValue::Scalar(x) => Some(*x),
            ParameterValue::Array(_) => None,
        }
    }

    /// Elementwise map, preserving shape
    pub fn map(&self, f: impl Fn(f64) -> f64) -> ParameterValue {
        match self {
            ParameterValue::Scalar(x) => ParameterValue::Scalar(f(*x)),
            ParameterValue::Array(a) => ParameterValue::Array(a.mapv(|x| f(x))),
        }
    }

    /// Multiply by a scale factor (standard -> native direction)
    pub fn scale(&self, factor: f64) -> ParameterValue {
        self.map(|x| x * factor)
    }

    /// Divide by a scale factor (native -> standard direction)
    pub fn unscale(&self, factor: f64) -> ParameterValue {
        self.map(|x| x / factor)
    }

    /// Combine two values elementwise with broadcasting.
    ///
    /// Array operands must have equal lengths; the scalar operand of a
    /// mixed pair is broadcast to the array's length.
    pub fn try_combine(
        &self,
        other: &ParameterValue,
        op: impl Fn(f64, f64) -> f64,
    ) -> Result<ParameterValue, ShapeError> {
        use ParameterValue::{Array, Scalar};
        match (self, other) {
            (Scalar(a), Scalar(b)) => Ok(Scalar(op(*a, *b))),
            (Scalar(a), Array(b)) => Ok(Array(b.mapv(|x| op(*a, x)))),
            (Array(a), Scalar(b)) => Ok(Array(a.mapv(|x| op(x, *b)))),
            (Array(a), Array(b)) => {
                if a.len() != b.len() {
                    return Err(ShapeError {
                        expected: a.len(),
                        actual: b.len(),
                    });
                }
                Ok(Array(Array1::from_iter(
                    a.iter().zip(b.iter()).map(|(x, y)| op(*x, *y)),
                )))
            }
        }
    }

    /// Equality within a floating-point tolerance, shapes must match
    pub fn approx_eq(&self, other: &ParameterValue, tolerance: f64) -> bool {
        use ParameterValue::{Array, Scalar};
        match (self, other) {
            (Scalar(a), Scalar(b)) => (a - b).abs() <= tolerance,
            (Array(a), Array(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= tolerance)
            }
            _ => false,
        }
    }
}

impl From<f64> for ParameterValue {
    fn from(x: f64) -> Self {
        ParameterValue::Scalar(x)
    }
}

impl From<Vec<f64>> for ParameterValue {
    fn from(v: Vec<f64>) -> Self {
        ParameterValue::Array(Array1::from_vec(v))
    }
}

impl From<Array1<f64>> for ParameterValue {
    fn from(a: Array1<f64>) -> Self {
        ParameterValue::Array(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_broadcast_over_array() {
        let a = ParameterValue::from(vec![1.0, 2.0, 3.0]);
        let b = ParameterValue::Scalar(10.0);
        let sum = a.try_combine(&b, |x, y| x + y).unwrap();
        assert_eq!(sum, ParameterValue::from(vec![11.0, 12.0, 13.0]));
    }

    #[test]
    fn test_array_length_mismatch() {
        let a = ParameterValue::from(vec![1.0, 2.0, 3.0]);
        let b = ParameterValue::from(vec![1.0, 2.0]);
        let err = a.try_combine(&b, |x, y| x + y).unwrap_err();
        assert_eq!(
            err,
            ShapeError {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn test_scale_and_unscale_round_trip() {
        let v = ParameterValue::from(vec![0.5, 1.5]);
        let back = v.scale(1000.0).unscale(1000.0);
        assert!(back.approx_eq(&v, 1e-12));
    }

    #[test]
    fn test_approx_eq_rejects_shape_change() {
        let a = ParameterValue::Scalar(1.0);
        let b = ParameterValue::from(vec![1.0]);
        assert!(!a.approx_eq(&b, 1e-9));
    }

    #[test]
    fn test_json_representation_is_plain() {
        let scalar: ParameterValue = serde_json::from_str("2.5").unwrap();
        assert_eq!(scalar, ParameterValue::Scalar(2.5));
        let integer: ParameterValue = serde_json::from_str("-3").unwrap();
        assert_eq!(integer, ParameterValue::Scalar(-3.0));
        let array: ParameterValue = serde_json::from_str("[1.0, 2.0]").unwrap();
        assert_eq!(array, ParameterValue::from(vec![1.0, 2.0]));

        assert_eq!(
            serde_json::to_string(&ParameterValue::from(vec![1.0, 2.5])).unwrap(),
            "[1.0,2.5]"
        );
    }
}
