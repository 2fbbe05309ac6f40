//! Webcam Streaming
//!
//! Repeatedly acquires fixed-size RGB frames from a pluggable source on a
//! best-effort cadence and publishes each into a double-buffered
//! latest-frame store. Only the newest frame is meaningful to a live
//! preview consumer, so a failed acquisition simply leaves the previous
//! frame visible.

mod capture;
mod source;
mod stream;

pub use capture::CaptureConfig;
pub use source::{FrameSource, SyntheticPattern};
pub use stream::WebcamStream;

use thiserror::Error;

/// Capture error types
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("frame acquisition failed: {0}")]
    Acquire(String),

    #[error("capture timeout")]
    Timeout,

    #[error("capture worker lost, stream must be recreated")]
    WorkerLost,
}
