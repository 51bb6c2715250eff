// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Pure envelope functions evaluated over an explicit time axis.
//!
//! All functions return one value per entry of `time`. Parameter order follows
//! the tuples documented on [`crate::Shape`].

use std::f64::consts::PI;

use num_complex::Complex64;
use statrs::function::erf::erf;

// Hermite envelope constants, PRB 68, 224518 (2003).
const HERMITE_AMPLITUDE: f64 = 1.67;
const HERMITE_ALPHA: f64 = 4.0;
const HERMITE_BETA: f64 = 4.0;

fn gate_time(time: &[f64]) -> f64 {
    match (time.first(), time.last()) {
        (Some(first), Some(last)) => last - first,
        _ => 0.0,
    }
}

pub fn gaussian(time: &[f64], amplitude: f64, sigma: f64, peak: f64) -> Vec<f64> {
    time.iter()
        .map(|t| amplitude * (-((t - peak) / sigma).powi(2) / 2.0).exp())
        .collect()
}

/// Derivative of [`gaussian`] with respect to time. Zero for `sigma == 0`.
pub fn derivative_gaussian(time: &[f64], amplitude: f64, sigma: f64, peak: f64) -> Vec<f64> {
    if sigma == 0.0 {
        return vec![0.0; time.len()];
    }
    time.iter()
        .map(|t| {
            -amplitude / sigma.powi(2) * (t - peak) * (-((t - peak) / sigma).powi(2) / 2.0).exp()
        })
        .collect()
}

/// Normalization shared by the erf-apodized Gaussian and its derivative.
///
/// Returns `None` when the envelope is undefined (zero sigma or zero gate time).
fn erf_gaussian_norm(gate_time: f64, sigma: f64) -> Option<f64> {
    if sigma == 0.0 {
        return None;
    }
    let edge = (-(gate_time.powi(2)) / (8.0 * sigma.powi(2))).exp();
    let norm = (2.0 * PI * sigma.powi(2)).sqrt() * erf(gate_time / (8f64.sqrt() * sigma))
        - gate_time * edge;
    (norm != 0.0).then_some(norm)
}

/// Gaussian shifted so that it starts and ends at zero, PRA 83, 012308 (2011).
///
/// Centred on the middle of the time axis, the peak parameter is not used.
/// The centre is `t[0] + tg / 2` rather than an absolute `tg / 2`, so an axis
/// that does not start at zero shifts the pulse with it. Both conventions
/// agree only for axes starting at `t = 0`.
pub fn erf_gaussian(time: &[f64], amplitude: f64, sigma: f64, _peak: f64) -> Vec<f64> {
    let tg = gate_time(time);
    let Some(norm) = erf_gaussian_norm(tg, sigma) else {
        return vec![0.0; time.len()];
    };
    let center = time.first().copied().unwrap_or_default() + tg / 2.0;
    let edge = (-(tg.powi(2)) / (8.0 * sigma.powi(2))).exp();
    time.iter()
        .map(|t| {
            amplitude * ((-(t - center).powi(2) / (2.0 * sigma.powi(2))).exp() - edge) / norm
        })
        .collect()
}

/// Time derivative of [`erf_gaussian`], centred the same way.
pub fn derivative_erf_gaussian(time: &[f64], amplitude: f64, sigma: f64, _peak: f64) -> Vec<f64> {
    let tg = gate_time(time);
    let Some(norm) = erf_gaussian_norm(tg, sigma) else {
        return vec![0.0; time.len()];
    };
    let center = time.first().copied().unwrap_or_default() + tg / 2.0;
    time.iter()
        .map(|t| {
            -(amplitude * (t - center) * (-(t - center).powi(2) / (2.0 * sigma.powi(2))).exp())
                / (norm * sigma.powi(2))
        })
        .collect()
}

/// Hermite envelope whose width is fixed by the gate time; `sigma` is not used.
///
/// Scaled by `amplitude`. Hermite formulations without an amplitude factor
/// correspond to `amplitude = 1`.
pub fn hermite(time: &[f64], amplitude: f64, _sigma: f64, peak: f64) -> Vec<f64> {
    let tg = gate_time(time);
    if tg == 0.0 {
        return vec![0.0; time.len()];
    }
    let sigma = tg / (2.0 * HERMITE_ALPHA);
    time.iter()
        .map(|t| {
            let polynomial = 1.0 - HERMITE_BETA * ((t - peak) / (HERMITE_ALPHA * sigma)).powi(2);
            amplitude
                * polynomial
                * HERMITE_AMPLITUDE
                * (-(t - peak).powi(2) / (2.0 * sigma.powi(2))).exp()
                / sigma
        })
        .collect()
}

/// Time derivative of [`hermite`], also scaled by `amplitude`.
pub fn derivative_hermite(time: &[f64], amplitude: f64, _sigma: f64, peak: f64) -> Vec<f64> {
    let tg = gate_time(time);
    if tg == 0.0 {
        return vec![0.0; time.len()];
    }
    let sigma = tg / (2.0 * HERMITE_ALPHA);
    time.iter()
        .map(|t| {
            let polynomial = 2.0 * HERMITE_BETA / HERMITE_ALPHA.powi(2) + 1.0
                - HERMITE_BETA * ((t - peak) / (HERMITE_ALPHA * sigma)).powi(2);
            -amplitude
                * HERMITE_AMPLITUDE
                * (t - peak)
                * polynomial
                * (-(t - peak).powi(2) / (2.0 * sigma.powi(2))).exp()
                / sigma.powi(3)
        })
        .collect()
}

/// Combine an in-phase envelope with its derivative into a DRAG envelope.
///
/// The quadrature component is `-ratio * derivative`.
pub fn drag(base: Vec<f64>, derivative: Vec<f64>, ratio: f64) -> Vec<Complex64> {
    base.into_iter()
        .zip(derivative)
        .map(|(re, d)| Complex64::new(re, -ratio * d))
        .collect()
}

/// `amplitude` where `start <= |t| <= start + width`, zero elsewhere.
pub fn rectangular(time: &[f64], amplitude: f64, width: f64, start: f64) -> Vec<f64> {
    time.iter()
        .map(|t| {
            let t = t.abs();
            if t >= start && t <= width + start {
                amplitude
            } else {
                0.0
            }
        })
        .collect()
}

/// Rectangle with Gaussian rising and falling edges.
///
/// The rectangle spans `width` starting at `start`; `edge_width` of it on each
/// side is replaced by a Gaussian of `edge_sigma` peaking where the flat top begins or ends.
pub fn gaussian_edge_rectangular(
    time: &[f64],
    amplitude: f64,
    width: f64,
    start: f64,
    edge_width: f64,
    edge_sigma: f64,
) -> Vec<f64> {
    let flat_start = start + edge_width;
    let flat_width = width - 2.0 * edge_width;
    let flat_end = flat_start + flat_width;

    let rising = gaussian(time, amplitude, edge_sigma, flat_start);
    let falling = gaussian(time, amplitude, edge_sigma, flat_end);
    let flat = rectangular(time, amplitude, flat_width, flat_start);
    time.iter()
        .zip(rising)
        .zip(falling)
        .zip(flat)
        .map(|(((t, up), down), flat)| {
            let up = if *t < flat_start { up } else { 0.0 };
            let down = if *t > flat_end { down } else { 0.0 };
            up + flat + down
        })
        .collect()
}

pub fn linear(time: &[f64], slope: f64, intercept: f64) -> Vec<f64> {
    time.iter().map(|t| slope * t + intercept).collect()
}

pub fn constant(time: &[f64], value: f64) -> Vec<f64> {
    vec![value; time.len()]
}
