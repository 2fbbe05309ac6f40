//! Double-buffered latest-frame slot

use crate::{FrameError, VideoFrame};
use std::sync::Mutex;

struct Published {
    data: Box<[u8]>,
    sequence: u64,
}

/// Shared single-slot store for the most recent frame.
///
/// The producer fills its own back buffer with no lock held (acquisition may
/// be slow), then calls [`swap_in`](SharedFrameStore::swap_in), which holds
/// the mutex only for an O(1) pointer swap and hands the previous buffer
/// back for reuse. Readers take the same mutex for a copy-out or a scoped
/// view, so they always observe a complete, non-torn frame.
///
/// Dimensions are fixed at construction; a buffer of any other length is
/// rejected and the published frame stays untouched.
pub struct SharedFrameStore {
    width: u32,
    height: u32,
    published: Mutex<Published>,
}

impl SharedFrameStore {
    /// Create a store for `width` x `height` RGB frames, initially black.
    pub fn new(width: u32, height: u32) -> Self {
        let len = VideoFrame::expected_len(width, height);
        Self {
            width,
            height,
            published: Mutex::new(Published {
                data: vec![0u8; len].into_boxed_slice(),
                sequence: 0,
            }),
        }
    }

    /// Allocate a back buffer of the right size for [`swap_in`](Self::swap_in)
    pub fn alloc_back_buffer(&self) -> Box<[u8]> {
        vec![0u8; VideoFrame::expected_len(self.width, self.height)].into_boxed_slice()
    }

    /// Publish a filled frame buffer, returning the previously published one.
    ///
    /// O(1) under the lock. The returned buffer is the producer's next back
    /// buffer; steady-state capture allocates nothing.
    pub fn swap_in(&self, mut frame: Box<[u8]>) -> Result<Box<[u8]>, FrameError> {
        let expected = VideoFrame::expected_len(self.width, self.height);
        if frame.len() != expected {
            return Err(FrameError::SizeMismatch {
                expected,
                actual: frame.len(),
            });
        }

        let mut published = self.published.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::swap(&mut published.data, &mut frame);
        published.sequence += 1;
        Ok(frame)
    }

    /// Copy out the most recently published frame.
    ///
    /// Before the first publish this is an all-black frame with sequence 0.
    pub fn latest(&self) -> VideoFrame {
        let published = self.published.lock().unwrap_or_else(|e| e.into_inner());
        VideoFrame::new(
            published.data.to_vec(),
            self.width,
            self.height,
            published.sequence,
        )
    }

    /// Run `f` over a borrowed view of the published frame bytes.
    ///
    /// The view is valid only for the duration of the call; the store's
    /// mutex is held throughout, so keep `f` short.
    pub fn with_latest<R>(&self, f: impl FnOnce(&[u8], u64) -> R) -> R {
        let published = self.published.lock().unwrap_or_else(|e| e.into_inner());
        f(&published.data, published.sequence)
    }

    /// Publish count so far (0 = nothing published yet)
    pub fn sequence(&self) -> u64 {
        self.published
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .sequence
    }

    /// Frame width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_frame_is_black_with_sequence_zero() {
        let store = SharedFrameStore::new(4, 2);
        let frame = store.latest();
        assert_eq!(frame.width, 4);
        assert_eq!(frame.height, 2);
        assert_eq!(frame.sequence, 0);
        assert_eq!(frame.data, vec![0u8; 4 * 2 * 3]);
    }

    #[test]
    fn test_swap_in_publishes_and_returns_old_buffer() {
        let store = SharedFrameStore::new(2, 2);
        let mut back = store.alloc_back_buffer();
        back.fill(0xAB);

        let returned = store.swap_in(back).unwrap();
        assert_eq!(returned.len(), 2 * 2 * 3);
        assert!(returned.iter().all(|&b| b == 0));

        let frame = store.latest();
        assert_eq!(frame.sequence, 1);
        assert!(frame.data.iter().all(|&b| b == 0xAB));
    }

    #[test]
    fn test_swap_in_rejects_wrong_size() {
        let store = SharedFrameStore::new(4, 4);
        let err = store.swap_in(vec![0u8; 5].into_boxed_slice()).unwrap_err();
        assert_eq!(
            err,
            FrameError::SizeMismatch {
                expected: 4 * 4 * 3,
                actual: 5,
            }
        );
        // Rejected publish leaves the store untouched
        assert_eq!(store.sequence(), 0);
    }

    #[test]
    fn test_reader_keeps_seeing_last_published_frame() {
        let store = SharedFrameStore::new(2, 1);
        let mut back = store.alloc_back_buffer();
        back.fill(42);
        store.swap_in(back).unwrap();

        // No further publishes: repeated reads stay identical
        let first = store.latest();
        let second = store.latest();
        assert_eq!(first, second);
        assert_eq!(first.sequence, 1);
    }

    #[test]
    fn test_with_latest_scoped_view() {
        let store = SharedFrameStore::new(1, 1);
        let mut back = store.alloc_back_buffer();
        back.copy_from_slice(&[1, 2, 3]);
        store.swap_in(back).unwrap();

        let (sum, seq) = store.with_latest(|bytes, seq| {
            (bytes.iter().map(|&b| b as u32).sum::<u32>(), seq)
        });
        assert_eq!(sum, 6);
        assert_eq!(seq, 1);
    }

    #[test]
    fn test_sequence_increments_per_publish() {
        let store = SharedFrameStore::new(1, 1);
        let mut back = store.alloc_back_buffer();
        for i in 1..=5u64 {
            back = store.swap_in(back).unwrap();
            assert_eq!(store.sequence(), i);
        }
    }
}
