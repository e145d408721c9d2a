//! Clip request and option builders.
//!
//! [`ClipRequest`] names the input, the time window and the output;
//! [`ClipOptions`] carries everything else, with defaults matching the
//! command line.
//!
//! # Example
//!
//! ```no_run
//! use giffer::{CaptionColor, CaptionOptions, ClipOptions, ClipRequest, FontFace};
//!
//! let caption = CaptionOptions::new("hello")
//!     .with_color(CaptionColor::Yellow)
//!     .with_font_face(FontFace::Duplex)
//!     .with_text_height(24);
//!
//! let options = ClipOptions::new()
//!     .with_max_dimension(320)
//!     .with_loops(3)
//!     .with_caption(caption);
//!
//! let report = ClipRequest::new("input.mp4", 12.5, 15.0, "clip.gif")
//!     .with_options(options)
//!     .run()?;
//! println!("wrote {} frames", report.frames_written);
//! # Ok::<(), giffer::GifferError>(())
//! ```

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    error::GifferError,
    font::FontFace,
    palette::CaptionColor,
    pipeline::{self, ClipReport},
    progress::{NoOpProgress, ProgressCallback},
    source::VideoSource,
};

/// Default distance between successive source frames kept in the GIF.
pub const DEFAULT_FRAME_STEP: u64 = 2;

/// Default stroke width of caption text.
pub const DEFAULT_STROKE_WIDTH: u32 = 2;

/// Default caption height in pixels.
pub const DEFAULT_TEXT_HEIGHT: u32 = 15;

/// Caption text and styling.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionOptions {
    /// The text to burn in.
    pub text: String,
    /// Text colour.
    pub color: CaptionColor,
    /// Stroke width in pixels.
    pub stroke_width: u32,
    /// Maximum height of the text above the baseline, in pixels.
    pub text_height: u32,
    /// Named font style.
    pub font_face: FontFace,
    /// Font file to use instead of looking one up for `font_face`.
    pub font_file: Option<PathBuf>,
}

impl CaptionOptions {
    /// Caption `text` with default styling: white, stroke 2, 15 px, simplex.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: CaptionColor::default(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            text_height: DEFAULT_TEXT_HEIGHT,
            font_face: FontFace::default(),
            font_file: None,
        }
    }

    pub fn with_color(mut self, color: CaptionColor) -> Self {
        self.color = color;
        self
    }

    /// Set the stroke width (values below 1 are clamped to 1).
    pub fn with_stroke_width(mut self, stroke_width: u32) -> Self {
        self.stroke_width = stroke_width.max(1);
        self
    }

    /// Set the target text height (values below 1 are clamped to 1).
    pub fn with_text_height(mut self, text_height: u32) -> Self {
        self.text_height = text_height.max(1);
        self
    }

    pub fn with_font_face(mut self, font_face: FontFace) -> Self {
        self.font_face = font_face;
        self
    }

    pub fn with_font_file(mut self, font_file: impl Into<PathBuf>) -> Self {
        self.font_file = Some(font_file.into());
        self
    }
}

/// Everything about a clip besides its input, window and output.
#[derive(Clone)]
pub struct ClipOptions {
    pub(crate) max_dimension: Option<u32>,
    pub(crate) loops: u16,
    pub(crate) frame_step: u64,
    pub(crate) frame_delay: Option<u16>,
    pub(crate) caption: Option<CaptionOptions>,
    pub(crate) progress: Arc<dyn ProgressCallback>,
}

impl Debug for ClipOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ClipOptions")
            .field("max_dimension", &self.max_dimension)
            .field("loops", &self.loops)
            .field("frame_step", &self.frame_step)
            .field("frame_delay", &self.frame_delay)
            .field("caption", &self.caption)
            .finish_non_exhaustive()
    }
}

impl Default for ClipOptions {
    fn default() -> Self {
        Self {
            max_dimension: None,
            loops: 0,
            frame_step: DEFAULT_FRAME_STEP,
            frame_delay: None,
            caption: None,
            progress: Arc::new(NoOpProgress),
        }
    }
}

impl ClipOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the larger side of the output at `max_dimension` pixels.
    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = Some(max_dimension);
        self
    }

    /// Number of times the GIF repeats; 0 loops forever.
    pub fn with_loops(mut self, loops: u16) -> Self {
        self.loops = loops;
        self
    }

    /// Keep every `frame_step`-th source frame. Validated when the clip runs.
    pub fn with_frame_step(mut self, frame_step: u64) -> Self {
        self.frame_step = frame_step;
        self
    }

    /// Show each frame for `centiseconds` instead of the clip duration.
    pub fn with_frame_delay(mut self, centiseconds: u16) -> Self {
        self.frame_delay = Some(centiseconds);
        self
    }

    pub fn with_caption(mut self, caption: CaptionOptions) -> Self {
        self.caption = Some(caption);
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = progress;
        self
    }

    pub fn caption(&self) -> Option<&CaptionOptions> {
        self.caption.as_ref()
    }
}

/// One clip to cut: input video, time window in seconds, output GIF.
#[derive(Debug, Clone)]
pub struct ClipRequest {
    pub input: PathBuf,
    pub start: f64,
    pub end: f64,
    pub output: PathBuf,
    pub options: ClipOptions,
}

impl ClipRequest {
    pub fn new(
        input: impl AsRef<Path>,
        start: f64,
        end: f64,
        output: impl AsRef<Path>,
    ) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            start,
            end,
            output: output.as_ref().to_path_buf(),
            options: ClipOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ClipOptions) -> Self {
        self.options = options;
        self
    }

    /// Check the parts of the request that do not need the video.
    ///
    /// # Errors
    ///
    /// - [`GifferError::InvalidRange`] unless `0 <= start < end`.
    /// - [`GifferError::InvalidFrameStep`] if the frame step is zero.
    pub fn validate(&self) -> Result<(), GifferError> {
        if !(self.start >= 0.0 && self.start < self.end) {
            return Err(GifferError::InvalidRange {
                start: self.start,
                end: self.end,
            });
        }
        if self.options.frame_step == 0 {
            return Err(GifferError::InvalidFrameStep);
        }
        Ok(())
    }

    /// Clip duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Open the input video and produce the GIF.
    ///
    /// # Errors
    ///
    /// Any [`GifferError`] from validation, decoding, caption fitting or
    /// encoding. On failure no output file is left behind.
    pub fn run(&self) -> Result<ClipReport, GifferError> {
        self.validate()?;
        let mut source = VideoSource::open(&self.input)?;
        pipeline::run(&mut source, self)
    }
}
