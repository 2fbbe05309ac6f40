//! Sample source abstraction and synthetic GSR generator

use sample_ring::Sample;
use std::time::Instant;
use thiserror::Error;

/// Per-acquisition error types.
///
/// These are recoverable: the sampling loop skips the failed cycle and
/// keeps running. Only `open` failures surface to the caller, at connect
/// time.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("acquisition timed out")]
    Timeout,

    #[error("device read failed: {0}")]
    Read(String),

    #[error("device unavailable: {0}")]
    Unavailable(String),
}

/// A device or generator yielding one timestamped sample per call.
///
/// `acquire` is called once per sampling period from the producer thread
/// and is expected to be roughly as fast as one period. A hardware-backed
/// implementation should bound each call with its own timeout so a stalled
/// device cannot delay shutdown past one period.
pub trait SampleSource: Send {
    /// Open the device at `target`. Called once, before streaming starts.
    fn open(&mut self, target: &str) -> Result<(), SourceError> {
        let _ = target;
        Ok(())
    }

    /// Produce the next sample.
    fn acquire(&mut self) -> Result<Sample, SourceError>;

    /// Free-form description for diagnostics.
    fn describe(&self) -> String {
        "unknown source".to_string()
    }
}

const TWO_PI: f64 = std::f64::consts::TAU;

/// Synthetic GSR generator used when no sensor dock is present.
///
/// Produces a plausible skin-conductance signal in microsiemens: an ~8 µS
/// baseline with slow drift, respiratory and cardiac sinusoid components,
/// and LCG noise, clamped positive. Timestamps count seconds from the
/// generator's construction (monotonic clock).
pub struct SyntheticGsr {
    epoch: Instant,
    phase: f64,
    phase_step: f64,
    rng: u32,
}

impl SyntheticGsr {
    /// Create a generator advancing its phase at `rate_hz` calls per second
    pub fn new(rate_hz: f64) -> Self {
        Self {
            epoch: Instant::now(),
            phase: 0.0,
            phase_step: TWO_PI / rate_hz.max(1.0),
            rng: 0x1234_5678,
        }
    }

    fn next_noise(&mut self) -> f64 {
        self.rng = self.rng.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        ((self.rng >> 16) as f64 / 32_768.0 - 1.0) * 0.2
    }
}

impl SampleSource for SyntheticGsr {
    fn acquire(&mut self) -> Result<Sample, SourceError> {
        let t = self.epoch.elapsed().as_secs_f64();

        let baseline = 8.0 + 2.0 * (self.phase * 0.1).sin();
        let respiratory = 1.5 * (self.phase * 0.5).sin();
        let cardiac = 0.5 * (self.phase * 2.0).sin();
        let value = (baseline + respiratory + cardiac + self.next_noise()).max(0.1);

        self.phase += self.phase_step;
        if self.phase > TWO_PI {
            self.phase -= TWO_PI;
        }

        Ok(Sample::new(t, value))
    }

    fn describe(&self) -> String {
        "synthetic GSR generator".to_string()
    }
}
