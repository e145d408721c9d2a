//! Error types for the `giffer` crate.
//!
//! [`GifferError`] is the single error type returned by every fallible
//! operation. Each variant renders a message meant to be shown to the user
//! as-is, so the binary never needs to print anything beyond `Display`.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use thiserror::Error;

use crate::font::FontFace;

/// The unified error type for all `giffer` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GifferError {
    /// The input video could not be opened.
    #[error("Unable to open the input file {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::VideoSource::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The input opened but the first frame could not be decoded.
    #[error("Unable to read the input file {path}")]
    UnreadableInput {
        /// Path of the input video.
        path: PathBuf,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in {path}")]
    NoVideoStream {
        /// Path of the input video.
        path: PathBuf,
    },

    /// The video stream does not declare a usable frame rate.
    #[error("Unable to determine the frame rate of {path}")]
    UnknownFrameRate {
        /// Path of the input video.
        path: PathBuf,
    },

    /// The requested maximum dimension is larger than the source.
    #[error(
        "Can't scale video to larger than the input dimensions \
         (requested {requested}px, input is at most {native}px)"
    )]
    UpscaleNotSupported {
        /// The `--max-dimension` that was asked for.
        requested: u32,
        /// The larger of the native width and height.
        native: u32,
    },

    /// A frame inside the requested clip could not be read.
    #[error("Unable to read frame {frame_number} from the video file {path}")]
    FrameRead {
        /// Path of the input video.
        path: PathBuf,
        /// The frame index that was expected next.
        frame_number: u64,
    },

    /// A frame was decoded but could not be converted to an image.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// The caption fits the target height but is wider than the frame.
    #[error(
        "Caption will not fit: it is {text_width}px wide at the requested text size, \
         but the output is only {max_width}px wide"
    )]
    CaptionTooWide {
        /// Rendered width of the caption in pixels.
        text_width: u32,
        /// Width of the output frames.
        max_width: u32,
    },

    /// The caption plus its bottom margin is taller than the frame.
    #[error(
        "Caption will not fit: it needs {caption_height}px including the bottom margin, \
         but the output is only {frame_height}px tall"
    )]
    CaptionTooTall {
        /// Height above and below the baseline plus the bottom margin.
        caption_height: u32,
        /// Height of the output frames.
        frame_height: u32,
    },

    /// No font scale in (0, 10] brings the caption under the target height.
    #[error("Invalid caption scale: no font scale renders text within {target_height}px")]
    InvalidScale {
        /// The requested caption height.
        target_height: u32,
    },

    /// The colour name is not in the palette.
    #[error(
        "Unsupported color '{0}' (expected one of: red, orange, yellow, green, blue, purple, white, black, gray)"
    )]
    UnsupportedColor(String),

    /// The font face name is not one of the known faces.
    #[error(
        "Unsupported font face '{0}' (expected one of: simplex, plain, duplex, complex, \
         triplex, complex_small, script_simplex, script_complex)"
    )]
    UnsupportedFont(String),

    /// No installed font could be found for a font face.
    #[error("No installed font matches the {0} font face; pass --font-file to use a specific font")]
    FontUnavailable(FontFace),

    /// A font file could not be read or parsed.
    #[error("Failed to load font: {0}")]
    FontLoad(String),

    /// The start and end times do not describe a forward clip.
    #[error("Invalid time range: start ({start}s) must be non-negative and less than end ({end}s)")]
    InvalidRange {
        /// Requested start time in seconds.
        start: f64,
        /// Requested end time in seconds.
        end: f64,
    },

    /// A frame step of zero was provided.
    #[error("Frame step must be greater than zero")]
    InvalidFrameStep,

    /// GIF encoding failed.
    #[error("GIF encoding error: {0}")]
    GifEncodeError(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),
}

impl From<FfmpegError> for GifferError {
    fn from(error: FfmpegError) -> Self {
        GifferError::FfmpegError(error.to_string())
    }
}
