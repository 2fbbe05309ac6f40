//! Console Supervisor
//!
//! The lifecycle caller for the capture pipeline: owns logging setup and
//! runtime configuration, connects and starts both streams, and polls the
//! consumer side on its own cadence. Thin and replaceable by design; the
//! streaming core lives in `gsr-stream` and `webcam-stream`.

use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Runtime configuration for the supervisor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// GSR device target (e.g. "COM3", "/dev/ttyUSB0")
    pub gsr_target: String,
    /// Biosignal sampling rate in Hz
    pub sample_rate_hz: f64,
    /// Preview frame width in pixels
    pub frame_width: u32,
    /// Preview frame height in pixels
    pub frame_height: u32,
    /// Preview capture rate in frames per second
    pub frame_fps: u32,
    /// Consumer poll interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            gsr_target: "COM3".to_string(),
            sample_rate_hz: 128.0,
            frame_width: 640,
            frame_height: 480,
            frame_fps: 60,
            poll_interval_ms: 50,
        }
    }
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
