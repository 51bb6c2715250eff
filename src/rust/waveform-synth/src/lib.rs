// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Synthesis of I/Q control waveforms.
//!
//! A [`Pulse`] materializes its envelope into a [`SampledSignal`] at a caller
//! chosen sampling grid. The [`quadrature`] module turns envelopes into the
//! ideal carrier signal or into an I/Q drive pair pre-distorted for a
//! [`MixerCalibration`], and recombines drive pairs into the RF signal a
//! physical mixer would emit.

pub mod error;
pub mod library;
pub mod mixer;
pub mod pulse;
pub mod quadrature;
pub mod signal;
pub(crate) mod utils;

pub use error::{Error, Result};
pub use library::{SamplingGrid, WaveformLibrary};
pub use mixer::MixerCalibration;
pub use numeric_array::NumericArray;
pub use pulse::{Pulse, PulseBuilder};
pub use pulse_shapes::Shape;
pub use quadrature::DrivePair;
pub use signal::{SampleBuffer, SampledSignal, TimeAxis};
