// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use numeric_array::NumericArray;

use crate::{Error, Result};

/// A buffer of samples that can back a [`SampledSignal`].
pub trait SampleBuffer: Clone {
    fn sample_len(&self) -> usize;

    /// Append `other` after the current samples.
    fn append(&mut self, other: &Self);
}

impl SampleBuffer for NumericArray {
    fn sample_len(&self) -> usize {
        self.len()
    }

    fn append(&mut self, other: &Self) {
        self.extend(other);
    }
}

impl SampleBuffer for Vec<f64> {
    fn sample_len(&self) -> usize {
        self.len()
    }

    fn append(&mut self, other: &Self) {
        self.extend_from_slice(other);
    }
}

/// A uniformly sampled function of time.
///
/// Sample `i` is located at `start + spacing * i`. The number of samples is
/// always the length of the owned buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledSignal<S = NumericArray> {
    start: f64,
    spacing: f64,
    samples: S,
}

impl<S: SampleBuffer> SampledSignal<S> {
    pub fn new(start: f64, spacing: f64, samples: S) -> Result<Self> {
        if spacing == 0.0 || !spacing.is_finite() {
            return Err(Error::InvalidSpacing {
                spacing,
                operation: "signal construction",
                reason: "spacing must be finite and nonzero",
            });
        }
        Ok(SampledSignal {
            start,
            spacing,
            samples,
        })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    pub fn samples(&self) -> &S {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.sample_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Time of the sample at `index`.
    pub fn time_at(&self, index: usize) -> f64 {
        self.start + self.spacing * index as f64
    }

    /// End of the half-open time interval covered by the signal.
    pub fn end(&self) -> f64 {
        self.time_at(self.len())
    }

    /// Time axis of the current buffer, evaluated lazily.
    pub fn time_axis(&self) -> TimeAxis {
        TimeAxis::new(self.start, self.spacing, self.len())
    }

    /// Replace the sample buffer, returning the previous one.
    pub fn replace_samples(&mut self, samples: S) -> S {
        std::mem::replace(&mut self.samples, samples)
    }

    /// A signal on the same sampling grid carrying `samples`.
    pub fn with_samples<T: SampleBuffer>(&self, samples: T) -> SampledSignal<T> {
        SampledSignal {
            start: self.start,
            spacing: self.spacing,
            samples,
        }
    }

    pub fn check_same_spacing(&self, other: &Self, operation: &'static str) -> Result<()> {
        if self.spacing != other.spacing {
            return Err(Error::IncompatibleSampling {
                operation,
                detail: format!(
                    "sample spacing {} does not match {}",
                    self.spacing, other.spacing
                ),
            });
        }
        Ok(())
    }

    /// Append the samples of `other` after the samples of `self`.
    ///
    /// The result starts where `self` starts. `other` is left untouched.
    pub fn concatenate(&self, other: &Self) -> Result<Self> {
        self.check_same_spacing(other, "concatenation")?;
        let mut samples = self.samples.clone();
        samples.append(&other.samples);
        Ok(self.with_samples(samples))
    }
}

/// Lazy, finite time axis `start, start + spacing, ...` of a fixed length.
///
/// Cloning an axis restarts it from the position the clone was taken at.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    start: f64,
    spacing: f64,
    index: usize,
    len: usize,
}

impl TimeAxis {
    pub fn new(start: f64, spacing: f64, len: usize) -> Self {
        TimeAxis {
            start,
            spacing,
            index: 0,
            len,
        }
    }
}

impl Iterator for TimeAxis {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.len {
            return None;
        }
        let time = self.start + self.spacing * self.index as f64;
        self.index += 1;
        Some(time)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TimeAxis {}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn test_zero_spacing() {
        let err = SampledSignal::new(0.0, 0.0, vec![1.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidSpacing { spacing, .. } if spacing == 0.0));
        assert!(SampledSignal::new(0.0, f64::NAN, vec![1.0]).is_err());
    }

    #[test]
    fn test_time_axis() {
        let signal = SampledSignal::new(10.0, 0.5, vec![0.0; 4]).unwrap();
        let axis = signal.time_axis();
        assert_eq!(axis.len(), 4);
        assert_eq!(axis.clone().collect::<Vec<_>>(), vec![10.0, 10.5, 11.0, 11.5]);
        // restartable
        assert_eq!(axis.collect::<Vec<_>>().len(), 4);
        assert_eq!(signal.end(), 12.0);
    }

    #[test]
    fn test_negative_spacing() {
        let signal = SampledSignal::new(1.0, -0.5, vec![0.0; 3]).unwrap();
        assert_eq!(signal.time_axis().collect::<Vec<_>>(), vec![1.0, 0.5, 0.0]);
    }

    #[test]
    fn test_replace_samples_updates_length() {
        let mut signal = SampledSignal::new(0.0, 1.0, vec![1.0, 2.0]).unwrap();
        let old = signal.replace_samples(vec![3.0; 5]);
        assert_eq!(old, vec![1.0, 2.0]);
        assert_eq!(signal.len(), 5);
        assert_eq!(signal.time_axis().last(), Some(4.0));
    }

    #[test]
    fn test_concatenate() {
        let a = SampledSignal::new(0.0, 0.5, vec![1.0, 2.0]).unwrap();
        let b = SampledSignal::new(7.0, 0.5, vec![3.0]).unwrap();
        let joined = a.concatenate(&b).unwrap();
        assert_eq!(joined.len(), a.len() + b.len());
        assert_eq!(joined.samples(), &vec![1.0, 2.0, 3.0]);
        assert_eq!(joined.start(), 0.0);
        assert_eq!(joined.spacing(), 0.5);
        assert_eq!(b.samples(), &vec![3.0]);
    }

    #[test]
    fn test_concatenate_mismatched_spacing() {
        let a = SampledSignal::new(0.0, 0.5, vec![1.0]).unwrap();
        let b = SampledSignal::new(0.0, 0.25, vec![1.0]).unwrap();
        let err = a.concatenate(&b).unwrap_err();
        assert!(matches!(err, Error::IncompatibleSampling { .. }));
    }

    #[test]
    fn test_concatenate_real_and_complex() {
        let a = SampledSignal::new(0.0, 1.0, NumericArray::Float64(vec![1.0])).unwrap();
        let b = SampledSignal::new(
            1.0,
            1.0,
            NumericArray::Complex64(vec![Complex64::new(0.0, 2.0)]),
        )
        .unwrap();
        let joined = a.concatenate(&b).unwrap();
        assert!(joined.samples().is_complex());
        assert_eq!(joined.len(), 2);
    }
}
