// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use pulse_log::diagnostic;
use pulse_shapes::Shape;
use serde::{Deserialize, Serialize};

use crate::mixer::MixerCalibration;
use crate::quadrature::{self, DrivePair};
use crate::signal::{SampledSignal, TimeAxis};
use crate::utils::sample_count;
use crate::{Error, Result};

/// A pulse definition that can be sampled at any rate.
///
/// Times are in the unit of the sample spacing passed to the materialization
/// methods, frequencies in its reciprocal. Materializing never changes the pulse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PulseBuilder", into = "PulseBuilder")]
pub struct Pulse {
    duration: f64,
    carrier_frequency: f64,
    carrier_phase: f64,
    shape: Shape,
    parameters: Vec<f64>,
}

fn validate_duration(duration: f64) -> Result<()> {
    if !duration.is_finite() || duration < 0.0 {
        return Err(Error::InvalidDuration {
            duration,
            reason: "duration must be finite and non-negative",
        });
    }
    Ok(())
}

fn validate_shape(shape: Shape, parameters: &[f64]) -> Result<()> {
    shape
        .check_parameters(parameters)
        .map_err(|source| Error::ShapeFunctionFailure { shape, source })
}

fn validate_spacing(spacing: f64, operation: &'static str) -> Result<()> {
    if !spacing.is_finite() || spacing <= 0.0 {
        return Err(Error::InvalidSpacing {
            spacing,
            operation,
            reason: "spacing must be finite and positive",
        });
    }
    Ok(())
}

impl Pulse {
    pub fn builder() -> PulseBuilder {
        PulseBuilder::default()
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn carrier_frequency(&self) -> f64 {
        self.carrier_frequency
    }

    pub fn carrier_phase(&self) -> f64 {
        self.carrier_phase
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    pub fn with_duration(self, duration: f64) -> Result<Self> {
        validate_duration(duration)?;
        Ok(Pulse { duration, ..self })
    }

    pub fn with_carrier_frequency(self, carrier_frequency: f64) -> Self {
        Pulse {
            carrier_frequency,
            ..self
        }
    }

    pub fn with_carrier_phase(self, carrier_phase: f64) -> Self {
        Pulse {
            carrier_phase,
            ..self
        }
    }

    pub fn with_shape(self, shape: Shape, parameters: Vec<f64>) -> Result<Self> {
        validate_shape(shape, &parameters)?;
        Ok(Pulse {
            shape,
            parameters,
            ..self
        })
    }

    /// Number of samples covering the pulse at the given spacing.
    pub fn sample_count(&self, spacing: f64) -> Result<usize> {
        validate_spacing(spacing, "sample count")?;
        sample_count(self.duration, spacing)
    }

    /// Sample the envelope on the grid `start + spacing * i`.
    ///
    /// The returned buffer is complex only if the shape is.
    pub fn materialize_envelope(&self, start: f64, spacing: f64) -> Result<SampledSignal> {
        validate_spacing(spacing, "envelope materialization")?;
        let count = sample_count(self.duration, spacing)?;
        diagnostic!(
            "Materializing {} envelope: {} samples from t={} with spacing {}",
            self.shape,
            count,
            start,
            spacing
        );
        let time: Vec<f64> = TimeAxis::new(start, spacing, count).collect();
        let samples = self
            .shape
            .evaluate(&time, &self.parameters)
            .map_err(|source| Error::ShapeFunctionFailure {
                shape: self.shape,
                source,
            })?;
        SampledSignal::new(start, spacing, samples)
    }

    /// Sample the envelope modulated onto an ideal carrier.
    pub fn materialize_carrier_signal(
        &self,
        start: f64,
        spacing: f64,
    ) -> Result<SampledSignal<Vec<f64>>> {
        let envelope = self.materialize_envelope(start, spacing)?;
        Ok(quadrature::ideal_carrier_signal(
            &envelope,
            self.carrier_frequency,
            self.carrier_phase,
        ))
    }

    /// Sample the I/Q drive pair that makes `mixer` emit this pulse.
    ///
    /// The mixer local oscillator is expected at
    /// `carrier_frequency - intermediate_frequency`.
    pub fn materialize_drive_pair(
        &self,
        start: f64,
        spacing: f64,
        intermediate_frequency: f64,
        mixer: &MixerCalibration,
    ) -> Result<DrivePair> {
        mixer.validate()?;
        let envelope = self.materialize_envelope(start, spacing)?;
        quadrature::drive_pair(
            &envelope,
            intermediate_frequency,
            self.carrier_phase,
            mixer,
        )
    }

    /// Local oscillator frequency that up-converts the drive pair to the carrier.
    pub fn local_oscillator_frequency(&self, intermediate_frequency: f64) -> f64 {
        quadrature::local_oscillator_frequency(self.carrier_frequency, intermediate_frequency)
    }
}

/// Step-wise configuration of a [`Pulse`].
///
/// Every attribute must be set before [`PulseBuilder::build`] succeeds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PulseBuilder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    carrier_frequency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    carrier_phase: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    shape: Option<Shape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parameters: Option<Vec<f64>>,
}

impl PulseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn carrier_frequency(mut self, carrier_frequency: f64) -> Self {
        self.carrier_frequency = Some(carrier_frequency);
        self
    }

    pub fn carrier_phase(mut self, carrier_phase: f64) -> Self {
        self.carrier_phase = Some(carrier_phase);
        self
    }

    pub fn shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn parameters(mut self, parameters: Vec<f64>) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn build(self) -> Result<Pulse> {
        let duration = self.duration.ok_or(Error::UnconfiguredPulse("duration"))?;
        let carrier_frequency = self
            .carrier_frequency
            .ok_or(Error::UnconfiguredPulse("carrier_frequency"))?;
        let carrier_phase = self
            .carrier_phase
            .ok_or(Error::UnconfiguredPulse("carrier_phase"))?;
        let shape = self.shape.ok_or(Error::UnconfiguredPulse("shape"))?;
        let parameters = self
            .parameters
            .ok_or(Error::UnconfiguredPulse("parameters"))?;
        validate_duration(duration)?;
        validate_shape(shape, &parameters)?;
        Ok(Pulse {
            duration,
            carrier_frequency,
            carrier_phase,
            shape,
            parameters,
        })
    }
}

impl TryFrom<PulseBuilder> for Pulse {
    type Error = Error;

    fn try_from(builder: PulseBuilder) -> Result<Self> {
        builder.build()
    }
}

impl From<Pulse> for PulseBuilder {
    fn from(pulse: Pulse) -> Self {
        PulseBuilder {
            duration: Some(pulse.duration),
            carrier_frequency: Some(pulse.carrier_frequency),
            carrier_phase: Some(pulse.carrier_phase),
            shape: Some(pulse.shape),
            parameters: Some(pulse.parameters),
        }
    }
}

fn build_pulse(
    shape: Shape,
    duration: f64,
    parameters: Vec<f64>,
    carrier_frequency: f64,
    carrier_phase: f64,
) -> Result<Pulse> {
    PulseBuilder::new()
        .duration(duration)
        .carrier_frequency(carrier_frequency)
        .carrier_phase(carrier_phase)
        .shape(shape)
        .parameters(parameters)
        .build()
}

/// Gaussian pulse, parameters (amplitude, sigma, peak position).
pub fn gaussian_pulse(
    duration: f64,
    parameters: [f64; 3],
    carrier_frequency: f64,
    carrier_phase: f64,
) -> Result<Pulse> {
    build_pulse(
        Shape::Gaussian,
        duration,
        parameters.to_vec(),
        carrier_frequency,
        carrier_phase,
    )
}

/// DRAG pulse, parameters (amplitude, sigma, peak position, derivative ratio).
pub fn drag_pulse(
    duration: f64,
    parameters: [f64; 4],
    carrier_frequency: f64,
    carrier_phase: f64,
) -> Result<Pulse> {
    build_pulse(
        Shape::Drag,
        duration,
        parameters.to_vec(),
        carrier_frequency,
        carrier_phase,
    )
}

/// Rectangular pulse, parameters (amplitude, width, start).
pub fn rectangular_pulse(
    duration: f64,
    parameters: [f64; 3],
    carrier_frequency: f64,
    carrier_phase: f64,
) -> Result<Pulse> {
    build_pulse(
        Shape::Rectangular,
        duration,
        parameters.to_vec(),
        carrier_frequency,
        carrier_phase,
    )
}

/// Rectangular pulse with Gaussian edges, parameters
/// (amplitude, width, start, edge width, edge sigma).
pub fn gaussian_edge_rectangular_pulse(
    duration: f64,
    parameters: [f64; 5],
    carrier_frequency: f64,
    carrier_phase: f64,
) -> Result<Pulse> {
    build_pulse(
        Shape::GaussianEdgeRectangular,
        duration,
        parameters.to_vec(),
        carrier_frequency,
        carrier_phase,
    )
}

pub fn constant_pulse(
    duration: f64,
    value: f64,
    carrier_frequency: f64,
    carrier_phase: f64,
) -> Result<Pulse> {
    build_pulse(
        Shape::Constant,
        duration,
        vec![value],
        carrier_frequency,
        carrier_phase,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;
    use numeric_array::NumericArray;

    macro_rules! assert_approx_eq {
        ($left:expr, $right:expr, $tolerance:expr) => {
            let left = $left;
            let right = $right;
            let tolerance = $tolerance;
            let diff = (left - right).abs();
            if diff >= tolerance {
                panic!(
                    "assertion failed: values are not approximately equal\n  left: {}\n  right: {}\n  difference: {}\n  tolerance: {}",
                    left, right, diff, tolerance
                );
            }
        };
        ($left:expr, $right:expr) => {
            assert_approx_eq!($left, $right, 1e-12);
        };
    }

    #[test]
    fn test_gaussian_envelope() {
        let pulse = gaussian_pulse(10.0, [1.0, 4.0, 15.0], 10.0, 0.0).unwrap();
        let envelope = pulse.materialize_envelope(10.0, 0.5).unwrap();
        assert_eq!(envelope.len(), 20);
        assert_eq!(envelope.start(), 10.0);
        let time: Vec<f64> = envelope.time_axis().collect();
        assert_eq!(time[0], 10.0);
        assert_eq!(time[19], 10.0 + 0.5 * 19.0);

        // t = 14 is sample 8
        let NumericArray::Float64(samples) = envelope.samples() else {
            panic!("Gaussian envelope must be real");
        };
        assert_eq!(time[8], 14.0);
        assert_approx_eq!(samples[8], (-(1.0f64 / 4.0).powi(2) / 2.0).exp());
        assert_approx_eq!(samples[8], 0.9692, 1e-4);
    }

    #[test]
    fn test_sample_count_rounds_up() {
        for (duration, spacing, expected) in
            [(10.0, 0.5, 20), (10.0, 3.0, 4), (0.3, 0.1, 3), (0.0, 1.0, 0)]
        {
            let pulse = constant_pulse(duration, 1.0, 0.0, 0.0).unwrap();
            assert_eq!(pulse.sample_count(spacing).unwrap(), expected);
            let envelope = pulse.materialize_envelope(-2.0, spacing).unwrap();
            assert_eq!(envelope.len(), expected);
        }
    }

    #[test]
    fn test_sample_count_too_large() {
        let pulse = constant_pulse(1e300, 1.0, 0.0, 0.0).unwrap();
        let err = pulse.materialize_envelope(0.0, 1e-300).unwrap_err();
        assert!(matches!(err, Error::InvalidDuration { .. }));
        assert!(pulse.sample_count(1e-300).is_err());
    }

    #[test]
    fn test_drag_envelope_at_peak() {
        let pulse = drag_pulse(1.0, [1.0, 7.5, 0.0, 10.0], 0.0, 0.0).unwrap();
        let envelope = pulse.materialize_envelope(0.0, 1.0).unwrap();
        assert_eq!(
            envelope.samples(),
            &NumericArray::Complex64(vec![Complex64::new(1.0, 0.0)])
        );
    }

    #[test]
    fn test_materialization_does_not_mutate() {
        let pulse = drag_pulse(20.0, [1.0, 3.0, 10.0, 0.5], 0.1, 0.3).unwrap();
        let copy = pulse.clone();
        let coarse = pulse.materialize_envelope(0.0, 1.0).unwrap();
        let fine = pulse.materialize_envelope(0.0, 0.5).unwrap();
        assert_eq!(pulse, copy);
        assert_eq!(coarse.len(), 20);
        assert_eq!(fine.len(), 40);
        assert_eq!(pulse.materialize_envelope(0.0, 1.0).unwrap(), coarse);
    }

    #[test]
    fn test_carrier_signal_real_envelope() {
        let pulse = gaussian_pulse(10.0, [1.0, 4.0, 15.0], 0.0, 0.0).unwrap();
        let envelope = pulse.materialize_envelope(10.0, 0.5).unwrap();
        let carrier = pulse.materialize_carrier_signal(10.0, 0.5).unwrap();
        let NumericArray::Float64(samples) = envelope.samples() else {
            panic!("Gaussian envelope must be real");
        };
        assert_eq!(carrier.samples(), samples);

        let phase = 0.7;
        let frequency = 0.13;
        let pulse = pulse.with_carrier_frequency(frequency).with_carrier_phase(phase);
        let carrier = pulse.materialize_carrier_signal(10.0, 0.5).unwrap();
        for ((t, value), amplitude) in carrier.time_axis().zip(carrier.samples()).zip(samples) {
            assert_approx_eq!(
                *value,
                amplitude * (std::f64::consts::TAU * frequency * t + phase).cos()
            );
        }
    }

    #[test]
    fn test_carrier_signal_at_peak() {
        let phase = 0.4;
        let pulse = gaussian_pulse(2.0, [0.8, 1.0, 15.0], 0.0, phase).unwrap();
        let carrier = pulse.materialize_carrier_signal(15.0, 1.0).unwrap();
        assert_approx_eq!(carrier.samples()[0], 0.8 * phase.cos());
    }

    #[test]
    fn test_invalid_spacing() {
        let pulse = gaussian_pulse(10.0, [1.0, 4.0, 15.0], 0.0, 0.0).unwrap();
        for spacing in [0.0, -0.5, f64::NAN] {
            let err = pulse.materialize_envelope(0.0, spacing).unwrap_err();
            assert!(matches!(err, Error::InvalidSpacing { .. }));
        }
    }

    #[test]
    fn test_unconfigured_pulse() {
        let err = Pulse::builder()
            .duration(1.0)
            .carrier_frequency(0.0)
            .shape(Shape::Gaussian)
            .parameters(vec![1.0, 1.0, 0.0])
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::UnconfiguredPulse("carrier_phase")));
        assert_eq!(
            err.to_string(),
            "Pulse is not fully configured: 'carrier_phase' is not set"
        );

        let err = PulseBuilder::new().build().unwrap_err();
        assert!(matches!(err, Error::UnconfiguredPulse("duration")));
    }

    #[test]
    fn test_invalid_duration() {
        let err = constant_pulse(-1.0, 1.0, 0.0, 0.0).unwrap_err();
        assert!(matches!(err, Error::InvalidDuration { .. }));
        let pulse = constant_pulse(1.0, 1.0, 0.0, 0.0).unwrap();
        assert!(pulse.with_duration(f64::INFINITY).is_err());
    }

    #[test]
    fn test_shape_arity_checked_at_build() {
        let err = Pulse::builder()
            .duration(1.0)
            .carrier_frequency(0.0)
            .carrier_phase(0.0)
            .shape(Shape::Drag)
            .parameters(vec![1.0, 1.0, 0.0])
            .build()
            .unwrap_err();
        match err {
            Error::ShapeFunctionFailure { shape, source } => {
                assert_eq!(shape, Shape::Drag);
                assert_eq!(
                    source,
                    pulse_shapes::Error::ParameterCount {
                        shape: Shape::Drag,
                        expected: 4,
                        actual: 3
                    }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_with_shape() {
        let pulse = constant_pulse(4.0, 1.0, 0.0, 0.0).unwrap();
        let pulse = pulse.with_shape(Shape::Linear, vec![1.0, 0.0]).unwrap();
        let envelope = pulse.materialize_envelope(0.0, 1.0).unwrap();
        assert_eq!(
            envelope.samples(),
            &NumericArray::Float64(vec![0.0, 1.0, 2.0, 3.0])
        );
        assert!(pulse.with_shape(Shape::Linear, vec![1.0]).is_err());
    }

    #[test]
    fn test_serde() {
        let pulse: Pulse = serde_json::from_str(
            r#"{"duration": 8, "carrier_frequency": 0.1, "carrier_phase": 0, "shape": "drag", "parameters": [1, 2, 4, 0.5]}"#,
        )
        .unwrap();
        assert_eq!(pulse, drag_pulse(8.0, [1.0, 2.0, 4.0, 0.5], 0.1, 0.0).unwrap());
        let json = serde_json::to_string(&pulse).unwrap();
        assert_eq!(serde_json::from_str::<Pulse>(&json).unwrap(), pulse);

        let err = serde_json::from_str::<Pulse>(r#"{"duration": 8, "shape": "gaussian"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("carrier_frequency"));
    }
}
