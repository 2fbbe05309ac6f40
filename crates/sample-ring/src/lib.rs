//! Lock-Free Sample Ring
//!
//! Provides a high-performance SPSC ring buffer holding the most recent
//! timestamped biosignal samples. When the consumer falls behind, the
//! oldest unread samples are overwritten (drop-oldest).

mod ring;

pub use ring::{SampleRing, DEFAULT_CAPACITY};

use serde::{Deserialize, Serialize};

/// One timestamped biosignal sample.
///
/// `timestamp` is seconds since an arbitrary monotonic epoch; `value` is a
/// calibrated physical unit (microsiemens for GSR). Immutable once written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Capture time in seconds since the producer's monotonic epoch
    pub timestamp: f64,
    /// Calibrated sensor value
    pub value: f64,
}

impl Sample {
    /// Create a new sample
    pub fn new(timestamp: f64, value: f64) -> Self {
        Self { timestamp, value }
    }
}
