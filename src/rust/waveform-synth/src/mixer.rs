// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use pulse_log::warn;
use serde::{Deserialize, Serialize};

use crate::utils::{is_near_multiple_of, sign};
use crate::{Error, Result};

/// Phase balances closer than this to a multiple of 180° are treated as degenerate.
const DEGENERATE_PHASE_TOLERANCE_DEGREES: f64 = 1e-9;

/// Deviation of a physical I/Q mixer from the ideal one.
///
/// * `amplitude_balance`: gain of the Q branch relative to the I branch.
/// * `phase_balance_degrees`: phase between the branches, nominally ±90°. The
///   sign selects which quadrature leads.
/// * `offset_i`, `offset_q`: additive DC offsets, in envelope amplitude units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixerCalibration {
    pub amplitude_balance: f64,
    pub phase_balance_degrees: f64,
    pub offset_i: f64,
    pub offset_q: f64,
}

impl Default for MixerCalibration {
    fn default() -> Self {
        Self::ideal()
    }
}

impl MixerCalibration {
    pub fn new(
        amplitude_balance: f64,
        phase_balance_degrees: f64,
        offset_i: f64,
        offset_q: f64,
    ) -> Self {
        MixerCalibration {
            amplitude_balance,
            phase_balance_degrees,
            offset_i,
            offset_q,
        }
    }

    /// Balanced branches in quadrature without offsets.
    pub const fn ideal() -> Self {
        MixerCalibration {
            amplitude_balance: 1.0,
            phase_balance_degrees: 90.0,
            offset_i: 0.0,
            offset_q: 0.0,
        }
    }

    pub fn phase_balance_radians(&self) -> f64 {
        self.phase_balance_degrees.to_radians()
    }

    /// Sign of the sine of the phase balance: +1 if Q lags, -1 if Q leads.
    ///
    /// Zero for multiples of 180°, where no quadrature leads.
    pub fn leading_quadrature_sign(&self) -> f64 {
        if is_near_multiple_of(
            self.phase_balance_degrees,
            180.0,
            DEGENERATE_PHASE_TOLERANCE_DEGREES,
        ) {
            return 0.0;
        }
        sign(self.phase_balance_radians().sin())
    }

    /// Check that the calibration can be compensated for.
    ///
    /// The pre-distortion divides by the amplitude balance and by
    /// `cos(|phase balance| - 90°)`, which vanishes exactly where the phase
    /// balance is a multiple of 180°.
    pub fn validate(&self) -> Result<()> {
        let values = [
            ("amplitude balance", self.amplitude_balance),
            ("phase balance", self.phase_balance_degrees),
            ("I offset", self.offset_i),
            ("Q offset", self.offset_q),
        ];
        for (name, value) in values {
            if !value.is_finite() {
                return Err(Error::DegenerateMixerCalibration(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        if self.amplitude_balance == 0.0 {
            return Err(Error::DegenerateMixerCalibration(
                "amplitude balance must be nonzero".to_string(),
            ));
        }
        if self.leading_quadrature_sign() == 0.0 {
            warn!(
                "Phase balance of {}° defines no leading quadrature",
                self.phase_balance_degrees
            );
            return Err(Error::DegenerateMixerCalibration(format!(
                "phase balance of {}° is a multiple of 180°, the I/Q compensation is undefined",
                self.phase_balance_degrees
            )));
        }
        Ok(())
    }
}
