//! Latest-Frame Store
//!
//! Single-slot store publishing the most recent video frame for a live
//! preview consumer. Only the newest frame is ever meaningful, so there is
//! no frame history: the producer swaps a freshly filled buffer in under a
//! short mutex hold, and readers take the same mutex for a copy-out or a
//! scoped borrowed view.

mod frame;
mod store;

pub use frame::VideoFrame;
pub use store::SharedFrameStore;

use thiserror::Error;

/// Frame store error types
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}
