//! GSR stream lifecycle controller

use crate::sampler::{run_sampling_loop, SamplerConfig};
use crate::source::{SampleSource, SyntheticGsr};
use crate::GsrError;
use sample_ring::{Sample, SampleRing};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, error, info};

/// Lifecycle controller for one GSR stream.
///
/// States: disconnected -> connected -> running -> connected -> ...
/// `start` spawns the producer thread, `stop` signals it and joins it before
/// returning, so no thread ever outlives the stream. At most one producer
/// thread exists at a time; `start`/`stop` are idempotent.
///
/// The stream exclusively owns the ring: the producer thread holds the write
/// handle and the caller drains through
/// [`pop_latest_samples`](GsrStream::pop_latest_samples), which is valid in
/// any state and returns an empty Vec when nothing is buffered.
pub struct GsrStream {
    config: SamplerConfig,
    ring: Arc<SampleRing>,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<Box<dyn SampleSource>>>,
    source: Option<Box<dyn SampleSource>>,
    target: Option<String>,
    info: String,
}

impl GsrStream {
    /// Create a stream around the given source
    pub fn new(source: Box<dyn SampleSource>, config: SamplerConfig) -> Self {
        let ring = Arc::new(SampleRing::new(config.ring_capacity));
        Self {
            config,
            ring,
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
            source: Some(source),
            target: None,
            info: String::new(),
        }
    }

    /// Create a stream backed by the synthetic GSR generator
    pub fn synthetic(config: SamplerConfig) -> Self {
        let source = SyntheticGsr::new(config.rate_hz);
        Self::new(Box::new(source), config)
    }

    /// Connect to the device at `target` (e.g. `COM3`, `/dev/ttyUSB0`).
    ///
    /// Fails if the target is invalid or the device handshake fails; the
    /// stream stays disconnected in that case. Reconnecting a running
    /// stream is rejected: stop first.
    pub fn connect(&mut self, target: &str) -> Result<(), GsrError> {
        if self.is_running() {
            return Err(GsrError::Connection {
                target: target.to_string(),
                reason: "stream is running, stop before reconnecting".to_string(),
            });
        }
        if target.trim().is_empty() {
            return Err(GsrError::Connection {
                target: target.to_string(),
                reason: "empty target".to_string(),
            });
        }

        let source = self.source.as_mut().ok_or(GsrError::NotConnected)?;
        source.open(target).map_err(|e| GsrError::Connection {
            target: target.to_string(),
            reason: e.to_string(),
        })?;

        self.info = format!(
            "{} - target: {} - {} Hz",
            source.describe(),
            target,
            self.config.rate_hz
        );
        self.target = Some(target.to_string());
        info!("connected to GSR device at {target}");
        Ok(())
    }

    /// Start streaming. No-op when already running; fails when disconnected.
    pub fn start(&mut self) -> Result<(), GsrError> {
        if self.is_running() {
            debug!("start() ignored, stream already running");
            return Ok(());
        }
        if self.target.is_none() {
            return Err(GsrError::NotConnected);
        }
        let source = self.source.take().ok_or(GsrError::NotConnected)?;

        self.running.store(true, Ordering::SeqCst);
        let ring = self.ring.clone();
        let running = self.running.clone();
        let period = self.config.period();
        self.worker = Some(std::thread::spawn(move || {
            run_sampling_loop(source, ring, running, period)
        }));

        info!("GSR streaming started at {} Hz", self.config.rate_hz);
        Ok(())
    }

    /// Stop streaming and join the producer thread. No-op when not running.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            debug!("stop() ignored, stream not running");
            return;
        };

        self.running.store(false, Ordering::SeqCst);
        match worker.join() {
            Ok(source) => self.source = Some(source),
            Err(_) => error!("sampling worker panicked, source lost"),
        }
        info!("GSR streaming stopped");
    }

    /// Drain all samples buffered since the previous call, in write order.
    ///
    /// Valid in any state; empty when nothing is new (or not running).
    pub fn pop_latest_samples(&self) -> Vec<Sample> {
        self.ring.pop_all()
    }

    /// Whether `connect` has succeeded
    pub fn is_connected(&self) -> bool {
        self.target.is_some()
    }

    /// Whether the producer thread is live
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Free-form device description for diagnostics
    pub fn device_info(&self) -> String {
        if self.is_connected() {
            self.info.clone()
        } else {
            "not connected".to_string()
        }
    }

    /// Total samples produced since construction
    pub fn total_samples(&self) -> u64 {
        self.ring.total_pushed()
    }
}

impl Drop for GsrStream {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceError;
    use std::time::Duration;

    struct RefusingSource;

    impl SampleSource for RefusingSource {
        fn open(&mut self, _target: &str) -> Result<(), SourceError> {
            Err(SourceError::Unavailable("no dock present".to_string()))
        }

        fn acquire(&mut self) -> Result<Sample, SourceError> {
            Err(SourceError::Read("unreachable".to_string()))
        }
    }

    fn connected_stream() -> GsrStream {
        let mut stream = GsrStream::synthetic(SamplerConfig::with_rate(500.0));
        stream.connect("COM3").unwrap();
        stream
    }

    #[test]
    fn test_connect_rejects_empty_target() {
        let mut stream = GsrStream::synthetic(SamplerConfig::default());
        let err = stream.connect("  ").unwrap_err();
        assert!(matches!(err, GsrError::Connection { .. }));
        assert!(!stream.is_connected());
    }

    #[test]
    fn test_connect_surfaces_handshake_failure() {
        let mut stream = GsrStream::new(Box::new(RefusingSource), SamplerConfig::default());
        let err = stream.connect("COM9").unwrap_err();
        assert!(err.to_string().contains("no dock present"));
        assert!(!stream.is_connected());
    }

    #[test]
    fn test_start_requires_connect() {
        let mut stream = GsrStream::synthetic(SamplerConfig::default());
        assert!(matches!(stream.start(), Err(GsrError::NotConnected)));
        assert!(!stream.is_running());
    }

    #[test]
    fn test_lifecycle_idempotence() {
        let mut stream = connected_stream();

        // stop before start is a no-op
        stream.stop();
        assert!(!stream.is_running());

        stream.start().unwrap();
        assert!(stream.is_running());
        // second start is a no-op on a running stream
        stream.start().unwrap();
        assert!(stream.is_running());

        stream.stop();
        assert!(!stream.is_running());
        assert!(stream.is_connected());
        stream.stop();
        assert!(!stream.is_running());
    }

    #[test]
    fn test_restart_after_stop_produces_again() {
        let mut stream = connected_stream();

        stream.start().unwrap();
        std::thread::sleep(Duration::from_millis(50));
        stream.stop();
        let first_total = stream.total_samples();
        assert!(first_total > 0);

        stream.start().unwrap();
        std::thread::sleep(Duration::from_millis(50));
        stream.stop();
        assert!(stream.total_samples() > first_total);
    }

    #[test]
    fn test_pop_returns_ordered_samples_while_running() {
        let mut stream = connected_stream();
        stream.start().unwrap();
        std::thread::sleep(Duration::from_millis(100));

        let samples = stream.pop_latest_samples();
        assert!(!samples.is_empty());
        for pair in samples.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
        stream.stop();
    }

    #[test]
    fn test_pop_when_idle_is_empty() {
        let stream = GsrStream::synthetic(SamplerConfig::default());
        assert!(stream.pop_latest_samples().is_empty());
    }

    #[test]
    fn test_connect_while_running_rejected() {
        let mut stream = connected_stream();
        stream.start().unwrap();
        assert!(stream.connect("COM4").is_err());
        stream.stop();
        // After stopping, reconnecting is allowed again
        stream.connect("COM4").unwrap();
    }

    #[test]
    fn test_device_info() {
        let mut stream = GsrStream::synthetic(SamplerConfig::with_rate(128.0));
        assert_eq!(stream.device_info(), "not connected");

        stream.connect("/dev/ttyUSB0").unwrap();
        let info = stream.device_info();
        assert!(info.contains("/dev/ttyUSB0"));
        assert!(info.contains("128"));
    }
}
