//! # giffer
//!
//! Cut a time range out of a video and save it as a looping animated GIF.
//!
//! Frames are decoded with FFmpeg via
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next), optionally shrunk so
//! the larger side fits a maximum, optionally captioned, and streamed into a
//! GIF with the [`gif`](https://crates.io/crates/gif) crate.
//!
//! ## Quick Start
//!
//! ```no_run
//! use giffer::{ClipOptions, ClipRequest};
//!
//! let report = ClipRequest::new("input.mp4", 1.0, 3.0, "clip.gif")
//!     .with_options(ClipOptions::new().with_max_dimension(320))
//!     .run()?;
//! println!("{} frames at {}", report.frames_written, report.dimensions);
//! # Ok::<(), giffer::GifferError>(())
//! ```
//!
//! ## How a clip is built
//!
//! 1. The start and end times become frame indices with `floor(fps × t)`.
//! 2. The first frame is decoded to learn the native size, and the output size
//!    is derived from `--max-dimension` (never larger than the source).
//! 3. A caption, if any, is fitted once: the largest font scale in tenths
//!    whose text is no taller than the requested height.
//! 4. Every `frame_step`-th frame in the range is decoded, resized with area
//!    averaging, captioned, and appended to the GIF.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed. Captions need at least one
//! installed TrueType/OpenType font, or an explicit font file.

pub mod caption;
pub mod configuration;
mod conversion;
pub mod dimensions;
pub mod error;
pub mod ffmpeg;
pub mod font;
pub mod frames;
pub mod gif;
pub mod palette;
pub mod pipeline;
pub mod progress;
pub mod resize;
pub mod source;

pub use caption::{
    BOTTOM_MARGIN, Caption, CaptionLayout, TextExtent, TextMask, TextMeasure, fit_caption,
    fit_caption_in_frame,
};
pub use configuration::{
    CaptionOptions, ClipOptions, ClipRequest, DEFAULT_FRAME_STEP, DEFAULT_STROKE_WIDTH,
    DEFAULT_TEXT_HEIGHT,
};
pub use conversion::seconds_to_frame_number;
pub use dimensions::{Dimensions, output_dimensions};
pub use error::GifferError;
pub use ffmpeg::FfmpegLogLevel;
pub use font::{CaptionFont, FontFace, NOMINAL_PIXEL_SIZE};
pub use frames::FrameRange;
pub use crate::gif::{GifWriter, seconds_to_frame_delay};
pub use palette::CaptionColor;
pub use pipeline::{ClipReport, load_caption_font, native_dimensions};
pub use progress::{ProgressCallback, ProgressInfo};
pub use resize::AreaResizer;
pub use source::{FrameSource, VideoSource};
