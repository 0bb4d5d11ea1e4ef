//! Training progress logging.
//!
//! [`TrainingLogger`] forwards progress to `tracing`, gated by [`Verbosity`].
//! The library never installs a subscriber; binaries and tests choose one.

use std::fmt::Debug;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::EpochStats;

/// Verbosity level for training output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// No output.
    #[default]
    Silent,
    /// Warnings only.
    Warning,
    /// Per-epoch progress.
    Info,
    /// Configuration and detailed progress.
    Debug,
}

/// Structured logger for one training run.
#[derive(Debug)]
pub struct TrainingLogger {
    verbosity: Verbosity,
    n_epochs: usize,
    started: Option<Instant>,
    epoch_started: Option<Instant>,
}

impl TrainingLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            n_epochs: 0,
            started: None,
            epoch_started: None,
        }
    }

    #[inline]
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    #[inline]
    fn enabled(&self, level: Verbosity) -> bool {
        self.verbosity != Verbosity::Silent && self.verbosity >= level
    }

    pub fn start_training(&mut self, n_epochs: usize) {
        self.n_epochs = n_epochs;
        self.started = Some(Instant::now());
        if self.enabled(Verbosity::Info) {
            info!(n_epochs, "starting BPR training");
        }
    }

    /// Log the run configuration (Debug level).
    pub fn log_config<C: Debug>(&self, config: &C) {
        if self.enabled(Verbosity::Debug) {
            debug!(?config, "training configuration");
        }
    }

    pub fn start_epoch(&mut self) {
        self.epoch_started = Some(Instant::now());
    }

    pub fn log_epoch(&self, epoch: usize, stats: &EpochStats) {
        let mean_loss = stats.mean_loss();
        if !mean_loss.is_finite() && stats.n_pairs > 0 && self.enabled(Verbosity::Warning) {
            warn!(epoch, mean_loss, "non-finite training loss");
        }
        if self.enabled(Verbosity::Info) {
            let elapsed_ms = self
                .epoch_started
                .map_or(0, |t| t.elapsed().as_millis() as u64);
            info!(
                epoch,
                n_epochs = self.n_epochs,
                n_pairs = stats.n_pairs,
                mean_loss,
                elapsed_ms,
                "epoch finished"
            );
        }
    }

    pub fn finish_training(&self) {
        if self.enabled(Verbosity::Info) {
            let elapsed_ms = self.started.map_or(0, |t| t.elapsed().as_millis() as u64);
            info!(n_epochs = self.n_epochs, elapsed_ms, "training finished");
        }
    }
}
