// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use pulse_shapes::Shape;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid sample spacing {spacing} in {operation}: {reason}")]
    InvalidSpacing {
        spacing: f64,
        operation: &'static str,
        reason: &'static str,
    },

    #[error("Invalid pulse duration {duration}: {reason}")]
    InvalidDuration { duration: f64, reason: &'static str },

    #[error("Incompatible sampling in {operation}: {detail}")]
    IncompatibleSampling {
        operation: &'static str,
        detail: String,
    },

    #[error("Degenerate mixer calibration: {0}")]
    DegenerateMixerCalibration(String),

    #[error("Pulse is not fully configured: '{0}' is not set")]
    UnconfiguredPulse(&'static str),

    #[error("Shape function '{shape}' failed")]
    ShapeFunctionFailure {
        shape: Shape,
        #[source]
        source: pulse_shapes::Error,
    },

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
