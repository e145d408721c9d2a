//! The clip pipeline: locate frames, decode, transform, encode.
//!
//! [`run`] drives any [`FrameSource`]; [`ClipRequest::run`] is the usual way
//! in and supplies a [`VideoSource`](crate::VideoSource).

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    caption::Caption,
    configuration::{CaptionOptions, ClipRequest},
    dimensions::{Dimensions, output_dimensions},
    error::GifferError,
    font::CaptionFont,
    frames::FrameRange,
    gif::{GifWriter, seconds_to_frame_delay},
    progress::ProgressTracker,
    resize::AreaResizer,
    source::FrameSource,
};

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipReport {
    /// Path of the GIF that was written.
    pub output: PathBuf,
    /// Source frames covered by the clip.
    pub range: FrameRange,
    /// Distance between consecutive source frames kept.
    pub frame_step: u64,
    /// Size of the source frames.
    pub native: Dimensions,
    /// Size of the GIF.
    pub dimensions: Dimensions,
    /// Number of frames in the GIF.
    pub frames_written: u64,
    /// Repeat count written to the GIF (0 = forever).
    pub loops: u16,
    /// Delay of every frame, in hundredths of a second.
    pub frame_delay: u16,
    /// Font scale chosen for the caption, if there was one.
    pub caption_scale: Option<f64>,
}

/// Decode the first frame of `source` and return its size.
///
/// # Errors
///
/// [`GifferError::UnreadableInput`] if no frame can be decoded.
pub fn native_dimensions<S: FrameSource + ?Sized>(
    source: &mut S,
) -> Result<Dimensions, GifferError> {
    match source.read_frame() {
        Ok(Some(frame)) => Ok(Dimensions::new(frame.width(), frame.height())),
        Ok(None) => Err(GifferError::UnreadableInput {
            path: source.path().to_path_buf(),
        }),
        Err(error) => {
            log::debug!("First frame of {} failed to decode: {error}", source.path().display());
            Err(GifferError::UnreadableInput {
                path: source.path().to_path_buf(),
            })
        }
    }
}

/// Load the font a caption asks for: its font file if given, otherwise an
/// installed font matching its face.
pub fn load_caption_font(options: &CaptionOptions) -> Result<CaptionFont, GifferError> {
    match &options.font_file {
        Some(path) => CaptionFont::from_file(path, options.font_face),
        None => CaptionFont::system(options.font_face),
    }
}

/// Run the whole clip against `source`, writing `request.output`.
///
/// Nothing is written until the frame range, the output size and the caption
/// layout are known to be valid. Once the GIF is created, any failure closes
/// it and deletes it, so callers never see a truncated file.
///
/// # Errors
///
/// Any [`GifferError`] raised along the way; see the variants for details.
pub fn run<S: FrameSource + ?Sized>(
    source: &mut S,
    request: &ClipRequest,
) -> Result<ClipReport, GifferError> {
    request.validate()?;
    let options = &request.options;

    let range = FrameRange::from_times(source.frames_per_second(), request.start, request.end)?;
    let native = native_dimensions(source)?;
    let dimensions = output_dimensions(native, options.max_dimension)?;

    let caption = match &options.caption {
        Some(caption_options) => {
            let font = load_caption_font(caption_options)?;
            Some(Caption::prepare(&font, caption_options, dimensions)?)
        }
        None => None,
    };

    // Every frame gets the same delay: the clip length, unless overridden.
    let frame_delay = options
        .frame_delay
        .unwrap_or_else(|| seconds_to_frame_delay(request.duration()));

    log::info!(
        "Clipping frames {}..={} (step {}) of {} at {dimensions} (native {native})",
        range.start_frame,
        range.end_frame,
        options.frame_step,
        source.path().display(),
    );

    source.seek(range.start_frame)?;

    let mut writer = GifWriter::create(&request.output, dimensions, options.loops, frame_delay)?;
    let encoded = encode_frames(source, &mut writer, request, range, dimensions, caption.as_ref());
    let frames_written = writer.frames_written();

    let finished = encoded.and_then(|()| writer.finish());
    if let Err(error) = finished {
        remove_partial_output(&request.output);
        return Err(error);
    }

    log::info!(
        "Wrote {} frame(s) to {}",
        frames_written,
        request.output.display()
    );

    Ok(ClipReport {
        output: request.output.clone(),
        range,
        frame_step: options.frame_step,
        native,
        dimensions,
        frames_written,
        loops: options.loops,
        frame_delay,
        caption_scale: caption.map(|caption| caption.layout().scale),
    })
}

fn encode_frames<S: FrameSource + ?Sized>(
    source: &mut S,
    writer: &mut GifWriter,
    request: &ClipRequest,
    range: FrameRange,
    dimensions: Dimensions,
    caption: Option<&Caption>,
) -> Result<(), GifferError> {
    let step = request.options.frame_step;
    let progress = &request.options.progress;
    let mut tracker = ProgressTracker::new(range.stepped_len(step));
    let mut resizer = AreaResizer::new(dimensions);

    for frame_number in range.frame_numbers(step) {
        let frame = match source.read_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => return Err(missing_frame(source.path(), frame_number)),
            Err(error) => {
                log::debug!("Reading frame {frame_number} failed: {error}");
                return Err(missing_frame(source.path(), frame_number));
            }
        };

        let mut frame = resizer.resize(frame)?;
        if let Some(caption) = caption {
            caption.draw(&mut frame);
        }
        writer.append(&frame)?;
        progress.on_progress(&tracker.advance(frame_number));

        if frame_number + step <= range.end_frame {
            skip_frames(source, step - 1, frame_number);
        }
    }

    Ok(())
}

/// Read and drop `count` frames. Failures here are ignored: if the stream
/// really is over, the next real read reports it.
fn skip_frames<S: FrameSource + ?Sized>(source: &mut S, count: u64, after: u64) {
    for offset in 1..=count {
        match source.read_frame() {
            Ok(Some(_)) => {}
            Ok(None) => {
                log::trace!("End of stream while skipping frame {}", after + offset);
                return;
            }
            Err(error) => {
                log::trace!("Ignoring failed read of skipped frame {}: {error}", after + offset);
            }
        }
    }
}

fn missing_frame(path: &Path, frame_number: u64) -> GifferError {
    GifferError::FrameRead {
        path: path.to_path_buf(),
        frame_number,
    }
}

fn remove_partial_output(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => log::debug!("Removed incomplete output {}", path.display()),
        Err(error) => log::warn!(
            "Could not remove incomplete output {}: {error}",
            path.display()
        ),
    }
}
