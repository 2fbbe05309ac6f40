//! Physiological Capture Pipeline - Main Entry Point

use gsr_stream::{GsrStream, SamplerConfig};
use monitor::{init_logging, MonitorConfig};
use std::time::{Duration, Instant};
use tracing::info;
use webcam_stream::{CaptureConfig, WebcamStream};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Physio Capture Pipeline v{} ===", env!("CARGO_PKG_VERSION"));
    let config = MonitorConfig::default();
    info!("configuration: {}", serde_json::to_string(&config)?);

    let mut gsr = GsrStream::synthetic(SamplerConfig {
        rate_hz: config.sample_rate_hz,
        ..Default::default()
    });
    gsr.connect(&config.gsr_target)?;
    gsr.start()?;
    info!("{}", gsr.device_info());

    let mut webcam = WebcamStream::synthetic(CaptureConfig {
        width: config.frame_width,
        height: config.frame_height,
        fps: config.frame_fps,
    });
    webcam.start()?;
    let frames = webcam.frame_store();

    let mut poll = tokio::time::interval(Duration::from_millis(config.poll_interval_ms));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut consumed: u64 = 0;
    let mut window_count: u64 = 0;
    let mut window_start = Instant::now();

    loop {
        tokio::select! {
            _ = poll.tick() => {
                let samples = gsr.pop_latest_samples();
                consumed += samples.len() as u64;
                window_count += samples.len() as u64;

                let elapsed = window_start.elapsed();
                if elapsed >= Duration::from_secs(1) {
                    let rate = window_count as f64 / elapsed.as_secs_f64();
                    info!(
                        "gsr: {:.1} Hz observed ({} total) | frame seq {}",
                        rate,
                        consumed,
                        frames.sequence()
                    );
                    window_count = 0;
                    window_start = Instant::now();
                }
            }
            _ = &mut ctrl_c => {
                info!("ctrl-c received, shutting down");
                break;
            }
        }
    }

    gsr.stop();
    webcam.stop();
    info!("shutdown complete: {consumed} samples consumed");
    Ok(())
}
