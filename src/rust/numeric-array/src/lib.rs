// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use num_complex::Complex64;

/// A one-dimensional sample buffer that is either real or complex valued.
///
/// The variant is the single source of truth for whether a buffer carries
/// quadrature information, consumers branch on it instead of inspecting values.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericArray {
    Float64(Vec<f64>),
    Complex64(Vec<Complex64>),
}

impl NumericArray {
    pub fn len(&self) -> usize {
        match self {
            NumericArray::Float64(vec) => vec.len(),
            NumericArray::Complex64(vec) => vec.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            NumericArray::Float64(vec) => vec.is_empty(),
            NumericArray::Complex64(vec) => vec.is_empty(),
        }
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, NumericArray::Complex64(_))
    }

    /// Iterate over the values promoted to complex numbers.
    pub fn iter_complex(&self) -> impl ExactSizeIterator<Item = Complex64> + '_ {
        (0..self.len()).map(|index| match self {
            NumericArray::Float64(vec) => Complex64::new(vec[index], 0.0),
            NumericArray::Complex64(vec) => vec[index],
        })
    }

    /// Append `other` after `self`.
    ///
    /// Mixing a real with a complex buffer promotes the result to complex.
    pub fn extend(&mut self, other: &NumericArray) {
        match self {
            NumericArray::Float64(vec) => match other {
                NumericArray::Float64(tail) => vec.extend_from_slice(tail),
                NumericArray::Complex64(tail) => {
                    let mut promoted: Vec<Complex64> =
                        vec.iter().map(|x| Complex64::new(*x, 0.0)).collect();
                    promoted.extend_from_slice(tail);
                    *self = NumericArray::Complex64(promoted);
                }
            },
            NumericArray::Complex64(vec) => vec.extend(other.iter_complex()),
        }
    }
}

impl From<Vec<f64>> for NumericArray {
    fn from(value: Vec<f64>) -> Self {
        NumericArray::Float64(value)
    }
}

impl From<Vec<Complex64>> for NumericArray {
    fn from(value: Vec<Complex64>) -> Self {
        NumericArray::Complex64(value)
    }
}
