//! Fixed-rate sampling loop

use crate::source::SampleSource;
use sample_ring::SampleRing;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::warn;

/// How long to sleep while waiting for the next deadline. Short enough that
/// the stop flag is honored well within one sampling period.
const YIELD_SLICE: Duration = Duration::from_micros(100);

/// Configuration for the sampling loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Target sampling rate in Hz (default: 128.0)
    pub rate_hz: f64,
    /// Ring capacity in samples, rounded up to a power of two
    pub ring_capacity: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            rate_hz: 128.0,
            ring_capacity: sample_ring::DEFAULT_CAPACITY,
        }
    }
}

impl SamplerConfig {
    /// Config with a non-default target rate
    pub fn with_rate(rate_hz: f64) -> Self {
        Self {
            rate_hz,
            ..Default::default()
        }
    }

    /// Sampling period derived from the target rate
    pub fn period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.rate_hz.max(1.0))
    }
}

/// Produce one sample per period until `running` clears, then hand the
/// source back for a later restart.
///
/// The deadline advances by exactly one period per produced sample instead
/// of being recomputed from "now + period", so scheduling jitter does not
/// accumulate into phase drift: the long-run rate converges on the target.
/// A failed acquisition skips that period and the loop keeps going.
pub(crate) fn run_sampling_loop(
    mut source: Box<dyn SampleSource>,
    ring: Arc<SampleRing>,
    running: Arc<AtomicBool>,
    period: Duration,
) -> Box<dyn SampleSource> {
    let mut next_deadline = Instant::now();

    while running.load(Ordering::SeqCst) {
        if Instant::now() < next_deadline {
            thread::sleep(YIELD_SLICE);
            continue;
        }

        match source.acquire() {
            Ok(sample) => ring.push(sample),
            Err(e) => warn!("sample acquisition failed, skipping cycle: {e}"),
        }

        next_deadline += period;
    }

    source
}
