// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Logging for waveform synthesis.
//!
//! Records are emitted through `log` under targets of the form
//! `pulse_synth::<module path>`, so an application can filter all synthesis
//! output with a single `pulse_synth` prefix. Mixer calibrations that cannot be
//! compensated are reported with [`warn!`], library loading with [`info!`].
//! Per-pulse sample counts and batch sizes go through [`diagnostic!`], which is
//! silent until [`init_logging`] enables it.

use std::sync::{atomic::AtomicBool, atomic::Ordering};

#[doc(hidden)]
pub use log as _log;

#[macro_export]
macro_rules! info {
    ($msg:literal, $($arg:tt)+) => {
        pulse_log::_log::info!(target: concat!("pulse_synth::", module_path!()), $msg, $($arg)+);
    };
    ($msg:literal) => {
        pulse_log::_log::info!(target: concat!("pulse_synth::", module_path!()), $msg);
    };
}

#[macro_export]
macro_rules! warn {
    ($msg:literal, $($arg:tt)+) => {
        pulse_log::_log::warn!(target: concat!("pulse_synth::", module_path!()), $msg, $($arg)+);
    };
    ($msg:literal) => {
        pulse_log::_log::warn!(target: concat!("pulse_synth::", module_path!()), $msg);
    };
}

/// Debug record for a single materialization, emitted only with diagnostics on.
#[macro_export]
macro_rules! diagnostic {
    ($msg:literal, $($arg:tt)+) => {
        if pulse_log::is_diagnostics_enabled() {
            pulse_log::_log::debug!(target: concat!("pulse_synth::", module_path!()), $msg, $($arg)+);
        }
    };
    ($msg:literal) => {
        if pulse_log::is_diagnostics_enabled() {
            pulse_log::_log::debug!(target: concat!("pulse_synth::", module_path!()), $msg);
        }
    };
}

static DIAGNOSTICS_ENABLED: AtomicBool = AtomicBool::new(false);

#[inline]
pub fn is_diagnostics_enabled() -> bool {
    DIAGNOSTICS_ENABLED.load(Ordering::Acquire)
}

/// Switch diagnostics for materialization on or off.
///
/// Records still go to the `log` implementation registered by the application.
pub fn init_logging(with_diagnostics: bool) {
    DIAGNOSTICS_ENABLED.store(with_diagnostics, Ordering::Release);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_switch() {
        init_logging(true);
        assert!(is_diagnostics_enabled());
        init_logging(false);
        assert!(!is_diagnostics_enabled());
    }
}
