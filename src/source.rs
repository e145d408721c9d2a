//! Sequential frame decoding.
//!
//! [`FrameSource`] is the decode cursor the pipeline drives: seek once, then
//! read frames one after another. [`VideoSource`] implements it on top of
//! FFmpeg, converting every decoded frame to packed RGB24.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
};

use ffmpeg_next::{
    Error as FfmpegError, Packet, Rational,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::RgbImage;

use crate::{conversion, dimensions::Dimensions, error::GifferError};

/// Consecutive failed packet reads tolerated before decoding gives up.
const MAX_CONSECUTIVE_READ_ERRORS: u32 = 8;

/// A forward-only cursor over decoded RGB frames.
pub trait FrameSource {
    /// Path (or other label) used in error messages.
    fn path(&self) -> &Path;

    /// Declared frame rate of the video.
    fn frames_per_second(&self) -> f64;

    /// Position the cursor so the next [`read_frame`](FrameSource::read_frame)
    /// returns frame `frame_number`.
    fn seek(&mut self, frame_number: u64) -> Result<(), GifferError>;

    /// Decode the next frame, or `Ok(None)` at end of stream.
    fn read_frame(&mut self) -> Result<Option<RgbImage>, GifferError>;
}

/// A video file opened for decoding its best video stream.
///
/// # Example
///
/// ```no_run
/// use giffer::{FrameSource, VideoSource};
///
/// let mut source = VideoSource::open("input.mp4")?;
/// source.seek(120)?;
/// if let Some(frame) = source.read_frame()? {
///     println!("frame 120 is {}x{}", frame.width(), frame.height());
/// }
/// # Ok::<(), giffer::GifferError>(())
/// ```
pub struct VideoSource {
    input_context: Input,
    decoder: VideoDecoder,
    /// Built on the first decoded frame, rebuilt if the frame layout changes.
    scaler: Option<(Pixel, u32, u32, ScalingContext)>,
    stream_index: usize,
    time_base: Rational,
    /// Timestamp of frame 0, in `time_base` units.
    origin: i64,
    frames_per_second: f64,
    width: u32,
    height: u32,
    path: PathBuf,
    decoded_frame: VideoFrame,
    rgb_frame: VideoFrame,
    /// Number given to the next decoded frame if it carries no timestamp.
    next_frame_number: u64,
    /// Frames numbered below this are dropped after a seek.
    skip_before: Option<u64>,
    read_failures: ReadFailures,
    eof_sent: bool,
}

impl Debug for VideoSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VideoSource")
            .field("path", &self.path)
            .field("stream_index", &self.stream_index)
            .field("frames_per_second", &self.frames_per_second)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl VideoSource {
    /// Open `path` and prepare a decoder for its best video stream.
    ///
    /// # Errors
    ///
    /// - [`GifferError::FileOpen`] if FFmpeg cannot open the file.
    /// - [`GifferError::NoVideoStream`] if there is no video stream.
    /// - [`GifferError::UnknownFrameRate`] if the stream has no usable rate.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GifferError> {
        let path = path.as_ref().to_path_buf();
        log::debug!("Opening video file: {}", path.display());

        ffmpeg_next::init().map_err(|error| GifferError::FileOpen {
            path: path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| GifferError::FileOpen {
                path: path.clone(),
                reason: error.to_string(),
            })?;

        let stream = input_context
            .streams()
            .best(Type::Video)
            .ok_or_else(|| GifferError::NoVideoStream { path: path.clone() })?;
        let stream_index = stream.index();
        let time_base = stream.time_base();
        let origin = conversion::stream_origin(stream.start_time());

        let frames_per_second = [stream.avg_frame_rate(), stream.rate()]
            .into_iter()
            .find(|rate| rate.numerator() > 0 && rate.denominator() > 0)
            .map(|rate| f64::from(rate.numerator()) / f64::from(rate.denominator()))
            .ok_or_else(|| GifferError::UnknownFrameRate { path: path.clone() })?;

        let decoder_context =
            CodecContext::from_parameters(stream.parameters()).map_err(|error| {
                GifferError::FileOpen {
                    path: path.clone(),
                    reason: format!("Failed to read video codec parameters: {error}"),
                }
            })?;
        let decoder = decoder_context
            .decoder()
            .video()
            .map_err(|error| GifferError::FileOpen {
                path: path.clone(),
                reason: format!("Failed to create video decoder: {error}"),
            })?;

        let width = decoder.width();
        let height = decoder.height();

        log::info!(
            "Opened video file: {} (stream={}, {}x{}, {:.3} fps)",
            path.display(),
            stream_index,
            width,
            height,
            frames_per_second,
        );

        Ok(Self {
            input_context,
            decoder,
            scaler: None,
            stream_index,
            time_base,
            origin,
            frames_per_second,
            width,
            height,
            path,
            decoded_frame: VideoFrame::empty(),
            rgb_frame: VideoFrame::empty(),
            next_frame_number: 0,
            skip_before: None,
            read_failures: ReadFailures::default(),
            eof_sent: false,
        })
    }

    /// Frame size reported by the stream parameters.
    pub fn stream_dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Convert the current decoded frame to RGB24 at its own size. Resizing
    /// is left to the caller.
    fn convert_decoded_frame(&mut self) -> Result<RgbImage, GifferError> {
        let format = self.decoded_frame.format();
        let width = self.decoded_frame.width();
        let height = self.decoded_frame.height();

        let reusable = matches!(
            &self.scaler,
            Some((cached_format, cached_width, cached_height, _))
                if *cached_format == format && *cached_width == width && *cached_height == height
        );
        if !reusable {
            let context = ScalingContext::get(
                format,
                width,
                height,
                Pixel::RGB24,
                width,
                height,
                ScalingFlags::BILINEAR,
            )?;
            self.scaler = Some((format, width, height, context));
            self.width = width;
            self.height = height;
        }

        if let Some((_, _, _, scaler)) = self.scaler.as_mut() {
            scaler.run(&self.decoded_frame, &mut self.rgb_frame)?;
        }
        let buffer = conversion::frame_to_buffer(&self.rgb_frame, width, height, 3);
        RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
            GifferError::VideoDecodeError(
                "Failed to construct RGB image from decoded frame data".to_string(),
            )
        })
    }

    fn decoded_frame_number(&self) -> u64 {
        let timestamp = [self.decoded_frame.timestamp(), self.decoded_frame.pts()]
            .into_iter()
            .flatten()
            .find(|&timestamp| timestamp != conversion::NO_TIMESTAMP);
        conversion::decoded_frame_number(
            timestamp,
            self.origin,
            self.time_base,
            self.frames_per_second,
            self.next_frame_number,
        )
    }
}

/// Counts packet reads that failed in a row.
///
/// A damaged packet is skipped, but a demuxer whose I/O has failed returns
/// the same error on every call; after [`MAX_CONSECUTIVE_READ_ERRORS`] the
/// error is returned instead of retrying forever.
#[derive(Debug, Default)]
struct ReadFailures {
    consecutive: u32,
}

impl ReadFailures {
    fn clear(&mut self) {
        self.consecutive = 0;
    }

    fn record(&mut self, error: FfmpegError) -> Result<(), GifferError> {
        self.consecutive += 1;
        if self.consecutive >= MAX_CONSECUTIVE_READ_ERRORS {
            log::debug!("Giving up after {} failed packet reads: {error}", self.consecutive);
            return Err(GifferError::from(error));
        }
        log::debug!("Skipping unreadable packet: {error}");
        Ok(())
    }
}

impl FrameSource for VideoSource {
    fn path(&self) -> &Path {
        &self.path
    }

    fn frames_per_second(&self) -> f64 {
        self.frames_per_second
    }

    /// Seeks to the keyframe at or before `frame_number`, then lets
    /// [`read_frame`](FrameSource::read_frame) decode forward and drop
    /// everything earlier than the target.
    fn seek(&mut self, frame_number: u64) -> Result<(), GifferError> {
        let timestamp = conversion::seek_timestamp(
            frame_number,
            self.frames_per_second,
            self.origin,
            self.time_base,
        );
        log::debug!("Seeking to frame {frame_number} (timestamp {timestamp}us)");

        self.input_context.seek(timestamp, ..timestamp)?;
        self.decoder.flush();
        self.eof_sent = false;
        self.read_failures.clear();
        // Until a timestamped frame says otherwise, assume the seek was exact.
        self.next_frame_number = frame_number;
        self.skip_before = Some(frame_number);
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Option<RgbImage>, GifferError> {
        loop {
            if self.decoder.receive_frame(&mut self.decoded_frame).is_ok() {
                let frame_number = self.decoded_frame_number();
                self.next_frame_number = frame_number + 1;
                if let Some(target) = self.skip_before {
                    if frame_number < target {
                        continue;
                    }
                    self.skip_before = None;
                }
                return self.convert_decoded_frame().map(Some);
            }

            if self.eof_sent {
                return Ok(None);
            }

            let mut packet = Packet::empty();
            match packet.read(&mut self.input_context) {
                Ok(()) => {
                    self.read_failures.clear();
                    if packet.stream() == self.stream_index {
                        self.decoder.send_packet(&packet)?;
                    }
                }
                Err(FfmpegError::Eof) => {
                    self.decoder.send_eof()?;
                    self.eof_sent = true;
                }
                Err(error) => self.read_failures.record(error)?,
            }
        }
    }
}
