//! Progress reporting.
//!
//! The pipeline calls a [`ProgressCallback`] after every frame it appends to
//! the GIF. Callbacks observe only; they cannot stop the run.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use giffer::{ClipOptions, ClipRequest, ProgressCallback, ProgressInfo};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("{}/{} frames ({:.0}%)", info.current, info.total, info.percentage);
//!     }
//! }
//!
//! let options = ClipOptions::new().with_progress(Arc::new(PrintProgress));
//! ClipRequest::new("input.mp4", 1.0, 3.0, "out.gif")
//!     .with_options(options)
//!     .run()?;
//! # Ok::<(), giffer::GifferError>(())
//! ```

use std::time::{Duration, Instant};

/// A snapshot of pipeline progress.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Frames appended to the GIF so far.
    pub current: u64,
    /// Frames the clip will contain in total.
    pub total: u64,
    /// Completion percentage (0.0 – 100.0).
    pub percentage: f32,
    /// Wall-clock time since the first frame was requested.
    pub elapsed: Duration,
    /// Source frame index of the frame just appended.
    pub current_frame: u64,
}

/// Receives progress updates while a clip is encoded.
pub trait ProgressCallback: Send + Sync {
    fn on_progress(&self, info: &ProgressInfo);
}

/// The default callback: ignores everything.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Builds [`ProgressInfo`] snapshots for one run.
pub(crate) struct ProgressTracker {
    total: u64,
    current: u64,
    started: Instant,
}

impl ProgressTracker {
    pub(crate) fn new(total: u64) -> Self {
        Self {
            total,
            current: 0,
            started: Instant::now(),
        }
    }

    /// Record one appended frame and return the snapshot to report.
    pub(crate) fn advance(&mut self, current_frame: u64) -> ProgressInfo {
        self.current += 1;
        let percentage = if self.total == 0 {
            100.0
        } else {
            (self.current as f64 / self.total as f64 * 100.0).min(100.0) as f32
        };
        ProgressInfo {
            current: self.current,
            total: self.total,
            percentage,
            elapsed: self.started.elapsed(),
            current_frame,
        }
    }
}
