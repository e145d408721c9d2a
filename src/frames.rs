//! Mapping a time window onto frame indices.

use crate::{conversion::seconds_to_frame_number, error::GifferError};

/// An inclusive range of frame indices.
///
/// # Example
///
/// ```
/// use giffer::FrameRange;
///
/// let range = FrameRange::from_times(30.0, 1.0, 3.0)?;
/// assert_eq!((range.start_frame, range.end_frame), (30, 90));
/// assert_eq!(range.frame_numbers(2).count(), 31);
/// # Ok::<(), giffer::GifferError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use]
pub struct FrameRange {
    /// First frame of the clip.
    pub start_frame: u64,
    /// Last frame of the clip (inclusive).
    pub end_frame: u64,
}

impl FrameRange {
    /// Convert a start/end time in seconds into frame indices using
    /// `floor(fps × time)` for both ends.
    ///
    /// The result is not checked against the length of the video; frames
    /// past the end show up later as read failures.
    ///
    /// # Errors
    ///
    /// [`GifferError::InvalidRange`] if `start` is negative or not strictly
    /// before `end`.
    pub fn from_times(frames_per_second: f64, start: f64, end: f64) -> Result<Self, GifferError> {
        if !(start >= 0.0 && start < end) {
            return Err(GifferError::InvalidRange { start, end });
        }
        Ok(Self {
            start_frame: seconds_to_frame_number(start, frames_per_second),
            end_frame: seconds_to_frame_number(end, frames_per_second),
        })
    }

    /// The indices visited when stepping through the range `step` frames at a
    /// time, starting at `start_frame`. A `step` of 0 is treated as 1.
    pub fn frame_numbers(self, step: u64) -> impl Iterator<Item = u64> {
        (self.start_frame..=self.end_frame).step_by(step.max(1) as usize)
    }

    /// Number of frames [`frame_numbers`](FrameRange::frame_numbers) yields.
    pub fn stepped_len(self, step: u64) -> u64 {
        if self.end_frame < self.start_frame {
            return 0;
        }
        (self.end_frame - self.start_frame) / step.max(1) + 1
    }
}
