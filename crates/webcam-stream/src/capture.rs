//! Best-effort frame capture loop

use crate::source::FrameSource;
use frame_store::SharedFrameStore;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, error};

/// Capture configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Target capture rate in frames per second
    pub fps: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self::vga()
    }
}

impl CaptureConfig {
    /// 640x480 @ 60 fps, the default preview configuration
    pub fn vga() -> Self {
        Self {
            width: 640,
            height: 480,
            fps: 60,
        }
    }

    /// 320x240 @ 30 fps, for constrained targets and tests
    pub fn qvga() -> Self {
        Self {
            width: 320,
            height: 240,
            fps: 30,
        }
    }

    /// Nominal delay between capture cycles
    pub fn period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }
}

/// Capture frames until `running` clears, then hand the source back.
///
/// Best-effort cadence: one acquisition attempt, then one period of sleep.
/// Unlike the biosignal loop there is no deadline bookkeeping, because only
/// the newest frame matters. Acquisition runs into a privately owned back
/// buffer with no lock held; publication is an O(1) swap. A failed
/// acquisition leaves the previous frame visible.
pub(crate) fn run_capture_loop(
    mut source: Box<dyn FrameSource>,
    store: Arc<SharedFrameStore>,
    running: Arc<AtomicBool>,
    period: Duration,
) -> Box<dyn FrameSource> {
    let mut back = store.alloc_back_buffer();

    while running.load(Ordering::SeqCst) {
        match source.acquire(&mut back) {
            Ok(()) => {
                back = match store.swap_in(back) {
                    Ok(prev) => prev,
                    Err(e) => {
                        // Dimensions are fixed at construction, so this is a
                        // source contract violation; keep the loop alive.
                        error!("frame publish rejected: {e}");
                        store.alloc_back_buffer()
                    }
                };
            }
            Err(e) => debug!("frame acquisition failed, keeping previous frame: {e}"),
        }

        thread::sleep(period);
    }

    source
}
