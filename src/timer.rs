//! Per-operation phase timer.
//!
//! Pipelines (ingest, build, combine, query) split their work into named
//! phases such as `read`, `process`, `write`. A `Timer` accumulates wall
//! time per phase; switching phases stops the previous one. Each operation
//! owns its timer, so parallel pipelines never share timing state.

use std::fmt;
use std::time::{Duration, Instant};

/// Accumulates wall-clock time per named phase, in insertion order.
#[derive(Debug, Default)]
pub struct Timer {
    phases: Vec<(&'static str, Duration)>,
    running: Option<(&'static str, Instant)>,
}

impl Timer {
    /// Create a stopped timer with no recorded phases.
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to the named phase, ending the current one if any.
    pub fn active(&mut self, phase: &'static str) {
        self.stop();
        self.running = Some((phase, Instant::now()));
    }

    /// Stop timing; the current phase's elapsed time is accumulated.
    pub fn stop(&mut self) {
        if let Some((phase, start)) = self.running.take() {
            let elapsed = start.elapsed();
            match self.phases.iter_mut().find(|(name, _)| *name == phase) {
                Some((_, total)) => *total += elapsed,
                None => self.phases.push((phase, elapsed)),
            }
        }
    }

    /// Fold another timer's accumulated phases into this one.
    ///
    /// Used to aggregate per-batch timers produced by parallel workers.
    pub fn merge(&mut self, mut other: Timer) {
        other.stop();
        for (phase, elapsed) in other.phases {
            match self.phases.iter_mut().find(|(name, _)| *name == phase) {
                Some((_, total)) => *total += elapsed,
                None => self.phases.push((phase, elapsed)),
            }
        }
    }

    /// Total time across all recorded phases.
    pub fn total(&self) -> Duration {
        self.phases.iter().map(|(_, d)| *d).sum()
    }

    /// Elapsed time of one phase, if recorded.
    pub fn get(&self, phase: &str) -> Option<Duration> {
        self.phases
            .iter()
            .find(|(name, _)| *name == phase)
            .map(|(_, d)| *d)
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (phase, elapsed) in &self.phases {
            writeln!(f, "{:>12}: {:.3}s", phase, elapsed.as_secs_f64())?;
        }
        writeln!(f, "{:>12}: {:.3}s", "total", self.total().as_secs_f64())
    }
}
