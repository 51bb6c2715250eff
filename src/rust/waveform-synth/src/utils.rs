// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use crate::{Error, Result};

/// Number of samples needed to cover `duration` with `spacing`.
///
/// Exact multiples yield exactly `duration / spacing`, anything else rounds up.
/// The quotient is taken from the remainder so that round-off in the division
/// itself (e.g. `0.3 / 0.1`) does not add a spurious sample.
pub(crate) fn sample_count(duration: f64, spacing: f64) -> Result<usize> {
    let remainder = duration % spacing;
    let quotient = ((duration - remainder) / spacing).round();
    let count = if remainder > 0.0 {
        quotient + 1.0
    } else {
        quotient
    };
    // `usize::MAX as f64` rounds up, so equality already overflows.
    if count.is_nan() || count >= usize::MAX as f64 {
        return Err(Error::InvalidDuration {
            duration,
            reason: "too many samples at the requested spacing",
        });
    }
    Ok(count.max(0.0) as usize)
}

/// Sign of `value` as -1, 0 or +1.
///
/// Unlike [`f64::signum`], zero maps to zero.
pub(crate) fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Whether `value` lies within `tolerance` of an integer multiple of `period`.
pub(crate) fn is_near_multiple_of(value: f64, period: f64, tolerance: f64) -> bool {
    let remainder = value.rem_euclid(period);
    remainder <= tolerance || period - remainder <= tolerance
}
