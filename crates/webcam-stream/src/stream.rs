//! Webcam capture lifecycle controller

use crate::capture::{run_capture_loop, CaptureConfig};
use crate::source::{FrameSource, SyntheticPattern};
use crate::CaptureError;
use frame_store::{SharedFrameStore, VideoFrame};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, error, info};

/// Lifecycle controller for one webcam stream.
///
/// Owns the capture thread and the frame store. `start`/`stop` are
/// idempotent; `stop` joins the thread before returning, so no thread ever
/// outlives the stream. Frame dimensions come from the source and are fixed
/// for the stream's lifetime.
pub struct WebcamStream {
    config: CaptureConfig,
    store: Arc<SharedFrameStore>,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<Box<dyn FrameSource>>>,
    source: Option<Box<dyn FrameSource>>,
    info: String,
}

impl WebcamStream {
    /// Create a stream around the given source. The store is sized from the
    /// source's dimensions; `config` supplies the capture cadence.
    pub fn new(source: Box<dyn FrameSource>, config: CaptureConfig) -> Self {
        let (width, height) = source.dimensions();
        let info = source.describe();
        Self {
            config,
            store: Arc::new(SharedFrameStore::new(width, height)),
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
            source: Some(source),
            info,
        }
    }

    /// Create a stream backed by the synthetic moving-gradient pattern
    pub fn synthetic(config: CaptureConfig) -> Self {
        let source = SyntheticPattern::new(config.width, config.height);
        Self::new(Box::new(source), config)
    }

    /// Start capturing. No-op when already running.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        if self.is_running() {
            debug!("start() ignored, capture already running");
            return Ok(());
        }
        let source = self.source.take().ok_or(CaptureError::WorkerLost)?;

        self.running.store(true, Ordering::SeqCst);
        let store = self.store.clone();
        let running = self.running.clone();
        let period = self.config.period();
        self.worker = Some(std::thread::spawn(move || {
            run_capture_loop(source, store, running, period)
        }));

        info!(
            "webcam capture started: {} @ {} fps",
            self.info, self.config.fps
        );
        Ok(())
    }

    /// Stop capturing and join the capture thread. No-op when not running.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            debug!("stop() ignored, capture not running");
            return;
        };

        self.running.store(false, Ordering::SeqCst);
        match worker.join() {
            Ok(source) => self.source = Some(source),
            Err(_) => error!("capture worker panicked, source lost"),
        }
        info!("webcam capture stopped");
    }

    /// Copy out the most recent frame.
    ///
    /// Valid in any state: before the first capture this is an all-black
    /// frame with sequence 0, and after the source stalls it is the last
    /// good frame.
    pub fn get_latest_frame(&self) -> VideoFrame {
        self.store.latest()
    }

    /// Shared handle to the frame store, for scoped zero-copy reads
    pub fn frame_store(&self) -> Arc<SharedFrameStore> {
        self.store.clone()
    }

    /// Whether the capture thread is live
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Free-form camera description for diagnostics
    pub fn device_info(&self) -> String {
        self.info.clone()
    }
}

impl Drop for WebcamStream {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_stream() -> WebcamStream {
        WebcamStream::synthetic(CaptureConfig {
            width: 16,
            height: 8,
            fps: 200,
        })
    }

    #[test]
    fn test_latest_frame_before_start_is_blank() {
        let stream = test_stream();
        let frame = stream.get_latest_frame();
        assert_eq!(frame.sequence, 0);
        assert_eq!(frame.width, 16);
        assert_eq!(frame.height, 8);
        assert_eq!(frame.data.len(), 16 * 8 * 3);
    }

    #[test]
    fn test_capture_publishes_frames() {
        let mut stream = test_stream();
        stream.start().unwrap();
        std::thread::sleep(Duration::from_millis(100));
        stream.stop();

        let frame = stream.get_latest_frame();
        assert!(frame.sequence >= 2, "sequence was {}", frame.sequence);
        assert!(frame.data.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_start_stop_idempotence() {
        let mut stream = test_stream();

        stream.stop();
        assert!(!stream.is_running());

        stream.start().unwrap();
        stream.start().unwrap();
        assert!(stream.is_running());

        stream.stop();
        stream.stop();
        assert!(!stream.is_running());
    }

    #[test]
    fn test_restart_continues_publishing() {
        let mut stream = test_stream();
        stream.start().unwrap();
        std::thread::sleep(Duration::from_millis(50));
        stream.stop();
        let seq = stream.get_latest_frame().sequence;
        assert!(seq > 0);

        stream.start().unwrap();
        std::thread::sleep(Duration::from_millis(50));
        stream.stop();
        assert!(stream.get_latest_frame().sequence > seq);
    }

    #[test]
    fn test_scoped_read_through_store_handle() {
        let mut stream = test_stream();
        stream.start().unwrap();
        std::thread::sleep(Duration::from_millis(50));

        let store = stream.frame_store();
        let seq = store.with_latest(|bytes, seq| {
            assert_eq!(bytes.len(), 16 * 8 * 3);
            seq
        });
        assert!(seq > 0);
        stream.stop();
    }
}
