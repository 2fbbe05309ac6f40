//! GSR Biosignal Streaming
//!
//! Drives a pluggable sample source at a fixed target rate from a dedicated
//! producer thread, pushing into a lock-free sample ring that the consumer
//! drains at its own cadence. Wraps the loop in a connect/start/stop
//! lifecycle with synchronous, join-on-stop shutdown.

mod sampler;
mod source;
mod stream;

pub use sampler::SamplerConfig;
pub use source::{SampleSource, SourceError, SyntheticGsr};
pub use stream::GsrStream;

use thiserror::Error;

/// Stream lifecycle error types
#[derive(Error, Debug)]
pub enum GsrError {
    #[error("failed to connect to {target}: {reason}")]
    Connection { target: String, reason: String },

    #[error("device not connected, call connect() first")]
    NotConnected,
}
