// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Batch materialization of named pulses.
//!
//! The pulses of a [`WaveformLibrary`] share one sampling grid, intermediate
//! frequency and mixer calibration. Each pulse is materialized independently,
//! so entries are processed in parallel.

use anyhow::Context;
use indexmap::IndexMap;
use numeric_array::NumericArray;
use pulse_log::{diagnostic, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::mixer::MixerCalibration;
use crate::pulse::Pulse;
use crate::quadrature::DrivePair;
use crate::signal::SampledSignal;
use crate::{Error, Result};

/// Where the first sample sits and how far apart samples are.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingGrid {
    #[serde(default)]
    pub start: f64,
    pub spacing: f64,
}

impl SamplingGrid {
    pub fn new(start: f64, spacing: f64) -> Self {
        SamplingGrid { start, spacing }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveformLibrary {
    sampling: SamplingGrid,
    #[serde(default)]
    intermediate_frequency: f64,
    #[serde(default)]
    mixer: MixerCalibration,
    #[serde(default)]
    pulses: IndexMap<String, Pulse>,
}

impl WaveformLibrary {
    pub fn new(sampling: SamplingGrid) -> Self {
        WaveformLibrary {
            sampling,
            intermediate_frequency: 0.0,
            mixer: MixerCalibration::ideal(),
            pulses: IndexMap::new(),
        }
    }

    /// Parse a library from its JSON description.
    ///
    /// ```json
    /// {
    ///     "sampling": {"start": 0.0, "spacing": 0.5},
    ///     "intermediate_frequency": 0.05,
    ///     "mixer": {"amplitude_balance": 1.02, "phase_balance_degrees": 88.5},
    ///     "pulses": {
    ///         "x90": {"duration": 40, "carrier_frequency": 0.2, "carrier_phase": 0,
    ///                 "shape": "drag", "parameters": [0.5, 8, 20, 0.3]}
    ///     }
    /// }
    /// ```
    pub fn from_json(document: &str) -> Result<Self> {
        let library: WaveformLibrary =
            serde_json::from_str(document).context("Failed to parse waveform library")?;
        if library.sampling.spacing == 0.0 || !library.sampling.spacing.is_finite() {
            return Err(Error::InvalidSpacing {
                spacing: library.sampling.spacing,
                operation: "waveform library",
                reason: "spacing must be finite and nonzero",
            });
        }
        info!(
            "Loaded waveform library with {} pulses",
            library.pulses.len()
        );
        Ok(library)
    }

    pub fn with_intermediate_frequency(mut self, intermediate_frequency: f64) -> Self {
        self.intermediate_frequency = intermediate_frequency;
        self
    }

    pub fn with_mixer(mut self, mixer: MixerCalibration) -> Self {
        self.mixer = mixer;
        self
    }

    pub fn sampling(&self) -> SamplingGrid {
        self.sampling
    }

    pub fn intermediate_frequency(&self) -> f64 {
        self.intermediate_frequency
    }

    pub fn mixer(&self) -> &MixerCalibration {
        &self.mixer
    }

    /// Add a pulse, returning the pulse previously registered under `name`.
    pub fn insert(&mut self, name: impl Into<String>, pulse: Pulse) -> Option<Pulse> {
        self.pulses.insert(name.into(), pulse)
    }

    pub fn get(&self, name: &str) -> Option<&Pulse> {
        self.pulses.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pulses.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pulses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }

    /// Apply `f` to every pulse in parallel, keeping insertion order.
    ///
    /// Failures are reported with the name of the pulse that caused them.
    fn materialize_all<T, F>(&self, what: &str, f: F) -> Result<IndexMap<String, T>>
    where
        T: Send,
        F: Fn(&Pulse) -> Result<T> + Sync,
    {
        diagnostic!("Materializing {} for {} pulses", what, self.pulses.len());
        let entries: Vec<(&String, &Pulse)> = self.pulses.iter().collect();
        let results = entries
            .par_iter()
            .map(|(name, pulse)| -> Result<(String, T)> {
                let output = f(pulse)
                    .with_context(|| format!("Failed to materialize {what} of pulse '{name}'"))?;
                Ok(((*name).clone(), output))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(results.into_iter().collect())
    }

    pub fn materialize_envelopes(&self) -> Result<IndexMap<String, SampledSignal<NumericArray>>> {
        let SamplingGrid { start, spacing } = self.sampling;
        self.materialize_all("envelope", |pulse| {
            pulse.materialize_envelope(start, spacing)
        })
    }

    pub fn materialize_carrier_signals(
        &self,
    ) -> Result<IndexMap<String, SampledSignal<Vec<f64>>>> {
        let SamplingGrid { start, spacing } = self.sampling;
        self.materialize_all("carrier signal", |pulse| {
            pulse.materialize_carrier_signal(start, spacing)
        })
    }

    pub fn materialize_drive_pairs(&self) -> Result<IndexMap<String, DrivePair>> {
        let SamplingGrid { start, spacing } = self.sampling;
        self.mixer.validate()?;
        self.materialize_all("drive pair", |pulse| {
            pulse.materialize_drive_pair(start, spacing, self.intermediate_frequency, &self.mixer)
        })
    }

    /// Local oscillator frequency needed to up-convert the drive pair of `name`.
    pub fn local_oscillator_frequency(&self, name: &str) -> Option<f64> {
        self.get(name)
            .map(|pulse| pulse.local_oscillator_frequency(self.intermediate_frequency))
    }
}
