// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Catalog of envelope shapes.
//!
//! Each [`Shape`] is a stateless function of a time axis and a parameter tuple.
//! The tuple arity is fixed per shape and checked before evaluation.

use std::fmt;

use numeric_array::NumericArray;
use serde::{Deserialize, Serialize};

pub mod functions;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Shape '{shape}' expects {expected} parameters, got {actual}")]
    ParameterCount {
        shape: Shape,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Envelope shape selector.
///
/// Parameter tuples:
///
/// * `Gaussian`, `DerivativeGaussian`, `ErfGaussian`, `DerivativeErfGaussian`,
///   `Hermite`, `DerivativeHermite`: (amplitude, sigma, peak position)
/// * `Drag`, `DragErfGaussian`, `DragHermite`: (amplitude, sigma, peak position, derivative ratio)
/// * `Rectangular`: (amplitude, width, start)
/// * `GaussianEdgeRectangular`: (amplitude, width, start, edge width, edge sigma)
/// * `Linear`: (slope, intercept)
/// * `Constant`: (value)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Gaussian,
    DerivativeGaussian,
    ErfGaussian,
    DerivativeErfGaussian,
    Hermite,
    DerivativeHermite,
    Drag,
    DragErfGaussian,
    DragHermite,
    Rectangular,
    GaussianEdgeRectangular,
    Linear,
    Constant,
}

impl Shape {
    pub const ALL: [Shape; 13] = [
        Shape::Gaussian,
        Shape::DerivativeGaussian,
        Shape::ErfGaussian,
        Shape::DerivativeErfGaussian,
        Shape::Hermite,
        Shape::DerivativeHermite,
        Shape::Drag,
        Shape::DragErfGaussian,
        Shape::DragHermite,
        Shape::Rectangular,
        Shape::GaussianEdgeRectangular,
        Shape::Linear,
        Shape::Constant,
    ];

    /// Number of parameters the shape expects.
    pub fn arity(&self) -> usize {
        match self {
            Shape::Gaussian
            | Shape::DerivativeGaussian
            | Shape::ErfGaussian
            | Shape::DerivativeErfGaussian
            | Shape::Hermite
            | Shape::DerivativeHermite
            | Shape::Rectangular => 3,
            Shape::Drag | Shape::DragErfGaussian | Shape::DragHermite => 4,
            Shape::GaussianEdgeRectangular => 5,
            Shape::Linear => 2,
            Shape::Constant => 1,
        }
    }

    /// Whether the shape produces a complex (quadrature) envelope.
    pub fn is_complex(&self) -> bool {
        matches!(
            self,
            Shape::Drag | Shape::DragErfGaussian | Shape::DragHermite
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Shape::Gaussian => "gaussian",
            Shape::DerivativeGaussian => "derivative_gaussian",
            Shape::ErfGaussian => "erf_gaussian",
            Shape::DerivativeErfGaussian => "derivative_erf_gaussian",
            Shape::Hermite => "hermite",
            Shape::DerivativeHermite => "derivative_hermite",
            Shape::Drag => "drag",
            Shape::DragErfGaussian => "drag_erf_gaussian",
            Shape::DragHermite => "drag_hermite",
            Shape::Rectangular => "rectangular",
            Shape::GaussianEdgeRectangular => "gaussian_edge_rectangular",
            Shape::Linear => "linear",
            Shape::Constant => "constant",
        }
    }

    /// Check that `parameters` has the arity this shape expects.
    pub fn check_parameters(&self, parameters: &[f64]) -> Result<()> {
        if parameters.len() != self.arity() {
            return Err(Error::ParameterCount {
                shape: *self,
                expected: self.arity(),
                actual: parameters.len(),
            });
        }
        Ok(())
    }

    /// Evaluate the shape over `time`.
    ///
    /// The result has one value per entry of `time` and is complex only for the DRAG family.
    pub fn evaluate(&self, time: &[f64], parameters: &[f64]) -> Result<NumericArray> {
        use functions::*;

        self.check_parameters(parameters)?;
        let p = parameters;
        let samples = match self {
            Shape::Gaussian => gaussian(time, p[0], p[1], p[2]).into(),
            Shape::DerivativeGaussian => derivative_gaussian(time, p[0], p[1], p[2]).into(),
            Shape::ErfGaussian => erf_gaussian(time, p[0], p[1], p[2]).into(),
            Shape::DerivativeErfGaussian => derivative_erf_gaussian(time, p[0], p[1], p[2]).into(),
            Shape::Hermite => hermite(time, p[0], p[1], p[2]).into(),
            Shape::DerivativeHermite => derivative_hermite(time, p[0], p[1], p[2]).into(),
            Shape::Drag => drag(
                gaussian(time, p[0], p[1], p[2]),
                derivative_gaussian(time, p[0], p[1], p[2]),
                p[3],
            )
            .into(),
            Shape::DragErfGaussian => drag(
                erf_gaussian(time, p[0], p[1], p[2]),
                derivative_erf_gaussian(time, p[0], p[1], p[2]),
                p[3],
            )
            .into(),
            Shape::DragHermite => drag(
                hermite(time, p[0], p[1], p[2]),
                derivative_hermite(time, p[0], p[1], p[2]),
                p[3],
            )
            .into(),
            Shape::Rectangular => rectangular(time, p[0], p[1], p[2]).into(),
            Shape::GaussianEdgeRectangular => {
                gaussian_edge_rectangular(time, p[0], p[1], p[2], p[3], p[4]).into()
            }
            Shape::Linear => linear(time, p[0], p[1]).into(),
            Shape::Constant => constant(time, p[0]).into(),
        };
        Ok(samples)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn test_parameter_count() {
        let err = Shape::Gaussian.evaluate(&[0.0], &[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            Error::ParameterCount {
                shape: Shape::Gaussian,
                expected: 3,
                actual: 2
            }
        );
        assert_eq!(
            err.to_string(),
            "Shape 'gaussian' expects 3 parameters, got 2"
        );
    }

    #[test]
    fn test_output_kind_matches_shape() {
        let time = [0.0, 1.0, 2.0, 3.0];
        for shape in Shape::ALL {
            let parameters = vec![1.0; shape.arity()];
            let samples = shape.evaluate(&time, &parameters).unwrap();
            assert_eq!(samples.len(), time.len(), "{shape}");
            assert_eq!(samples.is_complex(), shape.is_complex(), "{shape}");
        }
    }

    #[test]
    fn test_drag_at_peak() {
        let samples = Shape::Drag.evaluate(&[0.0], &[1.0, 7.5, 0.0, 10.0]).unwrap();
        assert_eq!(samples, NumericArray::Complex64(vec![Complex64::new(1.0, 0.0)]));
    }

    #[test]
    fn test_serde_names() {
        for shape in Shape::ALL {
            let json = serde_json::to_string(&shape).unwrap();
            assert_eq!(json, format!("\"{}\"", shape.name()));
        }
    }
}
