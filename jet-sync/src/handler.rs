//! Startup wiring: run the configured synchronizers once per process.

use std::sync::{Mutex, PoisonError};

use jet_core::JetConfig;

use crate::synchronizer::Synchronizer;
use crate::SyncError;

/// A run-once gate. The guarded closure runs until it first succeeds; every
/// later call is a no-op.
#[derive(Debug, Default)]
pub struct StartupGate {
    configured: Mutex<bool>,
}

impl StartupGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_configured(&self) -> bool {
        *self.configured.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` unless a previous call already succeeded.
    ///
    /// Concurrent callers wait on the lock, so `f` never runs twice at once.
    /// Returns `Ok(true)` when `f` ran and succeeded, `Ok(false)` when the gate
    /// was already closed. A failing `f` leaves the gate open.
    pub fn run_once<F>(&self, f: F) -> Result<bool, SyncError>
    where
        F: FnOnce() -> Result<(), SyncError>,
    {
        let mut configured = self.configured.lock().unwrap_or_else(PoisonError::into_inner);
        if *configured {
            return Ok(false);
        }
        f()?;
        *configured = true;
        Ok(true)
    }
}

/// Runs the enabled synchronizers when the host application starts.
#[derive(Debug, Default)]
pub struct ApplicationHandler {
    gate: StartupGate,
}

impl ApplicationHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_configured(&self) -> bool {
        self.gate.is_configured()
    }

    /// Synchronize every kind `config` enables, in the order given.
    ///
    /// Returns `Ok(false)` without doing anything when the CMS is not
    /// installed or synchronization already happened in this process.
    pub fn on_started(
        &self,
        config: &JetConfig,
        synchronizers: &mut [&mut dyn Synchronizer],
    ) -> Result<bool, SyncError> {
        if !config.installed {
            tracing::info!("CMS is not installed; skipping type synchronization");
            return Ok(false);
        }

        self.gate.run_once(|| {
            tracing::info!("begin synchronizing types");
            for synchronizer in synchronizers.iter_mut() {
                let kind = synchronizer.kind();
                if !config.is_enabled(kind) {
                    tracing::debug!("{kind} synchronization disabled");
                    continue;
                }
                tracing::info!("{kind} synchronization enabled; synchronizing {kind}");
                synchronizer.run()?;
            }
            tracing::info!("finished synchronizing types");
            Ok(())
        })
    }
}
