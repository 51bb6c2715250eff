// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Quadrature up- and down-conversion.
//!
//! An envelope `A·exp(jφ)` is either modulated directly onto an ideal carrier,
//! or split into I and Q drive signals at an intermediate frequency. The drive
//! signals are pre-distorted so that a mixer with the given
//! [`MixerCalibration`] and a local oscillator at
//! `carrier - intermediate` emits the ideal carrier signal.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use numeric_array::NumericArray;

use crate::mixer::MixerCalibration;
use crate::signal::SampledSignal;
use crate::{Error, Result};

/// I and Q drive signals on a common sampling grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DrivePair {
    pub i: SampledSignal<Vec<f64>>,
    pub q: SampledSignal<Vec<f64>>,
}

impl DrivePair {
    /// RF signal a mixer with `mixer` emits when fed with this pair.
    pub fn recombine(
        &self,
        local_oscillator_frequency: f64,
        mixer: &MixerCalibration,
    ) -> Result<SampledSignal<Vec<f64>>> {
        recombine_drive_pair(&self.i, &self.q, local_oscillator_frequency, mixer)
    }
}

pub fn local_oscillator_frequency(carrier_frequency: f64, intermediate_frequency: f64) -> f64 {
    carrier_frequency - intermediate_frequency
}

/// Modulate `envelope` onto an impairment-free carrier.
///
/// Real envelopes give `e(t)·cos(2πft + φ)`. Complex envelopes put the
/// imaginary part on the quadrature carrier, shifted by +90°.
pub fn ideal_carrier_signal(
    envelope: &SampledSignal<NumericArray>,
    carrier_frequency: f64,
    carrier_phase: f64,
) -> SampledSignal<Vec<f64>> {
    let phase = |t: f64| TAU * carrier_frequency * t + carrier_phase;
    let samples: Vec<f64> = match envelope.samples() {
        NumericArray::Float64(values) => envelope
            .time_axis()
            .zip(values)
            .map(|(t, value)| value * phase(t).cos())
            .collect(),
        NumericArray::Complex64(values) => envelope
            .time_axis()
            .zip(values)
            .map(|(t, value)| {
                let phase_i = phase(t);
                value.re * phase_i.cos() + value.im * (phase_i + FRAC_PI_2).cos()
            })
            .collect(),
    };
    envelope.with_samples(samples)
}

/// Pre-distortion coefficients derived from a validated calibration.
struct Compensation {
    /// Amplitude scale of the I branch relative to the envelope magnitude.
    scale_i: f64,
    /// Amplitude scale of the Q branch relative to the envelope magnitude.
    scale_q: f64,
    /// Phase of the Q branch relative to the envelope phase.
    phase_q: f64,
    /// Phase of the I branch relative to the Q branch.
    phase_i_from_q: f64,
}

impl Compensation {
    fn new(mixer: &MixerCalibration) -> Result<Self> {
        mixer.validate()?;
        let shift_sign = mixer.leading_quadrature_sign();
        let phase_balance = mixer.phase_balance_radians();
        let scale_i = 1.0 / (mixer.phase_balance_degrees.abs() - 90.0).to_radians().cos();
        Ok(Compensation {
            scale_i,
            scale_q: scale_i / mixer.amplitude_balance,
            phase_q: -shift_sign * FRAC_PI_2,
            phase_i_from_q: PI - phase_balance,
        })
    }
}

fn synthesize_drive(
    envelope: &NumericArray,
    time: impl Iterator<Item = f64>,
    intermediate_frequency: f64,
    carrier_phase: f64,
    mixer: &MixerCalibration,
) -> Result<(Vec<f64>, Vec<f64>)> {
    let compensation = Compensation::new(mixer)?;
    let mut signal_i = Vec::with_capacity(envelope.len());
    let mut signal_q = Vec::with_capacity(envelope.len());
    for (t, value) in time.zip(envelope.iter_complex()) {
        let magnitude = value.norm();
        let phase_q = value.arg() + compensation.phase_q + carrier_phase;
        let phase_i = phase_q + compensation.phase_i_from_q;
        let oscillation = TAU * intermediate_frequency * t;
        signal_i.push(
            magnitude * compensation.scale_i * (oscillation + phase_i).cos() - mixer.offset_i,
        );
        signal_q.push(
            magnitude * compensation.scale_q * (oscillation + phase_q).cos() - mixer.offset_q,
        );
    }
    Ok((signal_i, signal_q))
}

/// Split `envelope` into the I/Q drive pair for `mixer`.
///
/// Real envelopes are treated as complex with zero imaginary part.
/// Both signals share the sampling grid of the envelope.
pub fn drive_pair(
    envelope: &SampledSignal<NumericArray>,
    intermediate_frequency: f64,
    carrier_phase: f64,
    mixer: &MixerCalibration,
) -> Result<DrivePair> {
    let (signal_i, signal_q) = synthesize_drive(
        envelope.samples(),
        envelope.time_axis(),
        intermediate_frequency,
        carrier_phase,
        mixer,
    )?;
    Ok(DrivePair {
        i: envelope.with_samples(signal_i),
        q: envelope.with_samples(signal_q),
    })
}

/// Split a bare envelope buffer into an I/Q drive pair.
///
/// The time axis is the sample index and the carrier phase is zero, so
/// `intermediate_frequency` is in cycles per sample.
pub fn upconvert_envelope_only(
    envelope: &NumericArray,
    intermediate_frequency: f64,
    mixer: &MixerCalibration,
) -> Result<DrivePair> {
    let time = (0..envelope.len()).map(|index| index as f64);
    let (signal_i, signal_q) =
        synthesize_drive(envelope, time, intermediate_frequency, 0.0, mixer)?;
    Ok(DrivePair {
        i: SampledSignal::new(0.0, 1.0, signal_i)?,
        q: SampledSignal::new(0.0, 1.0, signal_q)?,
    })
}

/// RF output of a mixer with `mixer` driven by `i` and `q`.
///
/// The result is sampled on the grid of `i`.
pub fn recombine_drive_pair(
    i: &SampledSignal<Vec<f64>>,
    q: &SampledSignal<Vec<f64>>,
    local_oscillator_frequency: f64,
    mixer: &MixerCalibration,
) -> Result<SampledSignal<Vec<f64>>> {
    i.check_same_spacing(q, "drive pair recombination")?;
    if i.len() != q.len() {
        return Err(Error::IncompatibleSampling {
            operation: "drive pair recombination",
            detail: format!("I has {} samples, Q has {}", i.len(), q.len()),
        });
    }
    let phase_balance = mixer.phase_balance_radians();
    let samples: Vec<f64> = i
        .time_axis()
        .zip(i.samples().iter().zip(q.samples()))
        .map(|(t, (value_i, value_q))| {
            let oscillation = TAU * local_oscillator_frequency * t;
            let mixed_i = (value_i + mixer.offset_i) * oscillation.cos();
            let mixed_q = (value_q + mixer.offset_q)
                * mixer.amplitude_balance
                * (oscillation + phase_balance).cos();
            mixed_i + mixed_q
        })
        .collect();
    Ok(i.with_samples(samples))
}
