//! Animated GIF output.
//!
//! [`GifWriter`] streams frames into a GIF file one at a time. Every frame is
//! quantized to its own 256-colour palette by the `gif` crate and shown for
//! the same delay.
//!
//! # Example
//!
//! ```no_run
//! use giffer::{Dimensions, GifWriter};
//! use image::RgbImage;
//!
//! let size = Dimensions::new(64, 48);
//! let mut writer = GifWriter::create("out.gif", size, 0, 10)?;
//! writer.append(&RgbImage::new(64, 48))?;
//! writer.finish()?;
//! # Ok::<(), giffer::GifferError>(())
//! ```

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use gif::{Encoder, Frame, Repeat};
use image::RgbImage;

use crate::{dimensions::Dimensions, error::GifferError};

/// Quantizer speed handed to `gif` (1 = best quality, 30 = fastest).
const QUANTIZE_SPEED: i32 = 10;

/// Convert a per-frame display time in seconds to GIF centiseconds,
/// rounded and clamped to what the format can store.
pub fn seconds_to_frame_delay(seconds: f64) -> u16 {
    (seconds * 100.0).round().clamp(0.0, f64::from(u16::MAX)) as u16
}

/// An open GIF file accepting frames of one fixed size.
///
/// The GIF trailer is written by [`finish`](GifWriter::finish), or when the
/// writer is dropped, so the file is closed on every exit path.
pub struct GifWriter {
    encoder: Encoder<BufWriter<File>>,
    path: PathBuf,
    dimensions: Dimensions,
    frame_delay: u16,
    frames_written: u64,
}

impl std::fmt::Debug for GifWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GifWriter")
            .field("path", &self.path)
            .field("dimensions", &self.dimensions)
            .field("frame_delay", &self.frame_delay)
            .field("frames_written", &self.frames_written)
            .finish_non_exhaustive()
    }
}

impl GifWriter {
    /// Create (or truncate) `path` and write the GIF header.
    ///
    /// `loops` is the number of repetitions, with 0 meaning forever.
    /// `frame_delay` is in hundredths of a second.
    ///
    /// # Errors
    ///
    /// [`GifferError::GifEncodeError`] if the file cannot be created or the
    /// size does not fit the GIF format.
    pub fn create<P: AsRef<Path>>(
        path: P,
        dimensions: Dimensions,
        loops: u16,
        frame_delay: u16,
    ) -> Result<Self, GifferError> {
        let path = path.as_ref().to_path_buf();
        log::debug!(
            "Creating GIF file {} ({dimensions}, loops={loops}, delay={frame_delay}cs)",
            path.display(),
        );

        let (width, height) = gif_size(dimensions)?;
        let file = File::create(&path)
            .map_err(|e| GifferError::GifEncodeError(format!("Failed to create GIF file: {e}")))?;

        let mut encoder = Encoder::new(BufWriter::new(file), width, height, &[]).map_err(|e| {
            GifferError::GifEncodeError(format!("Failed to create GIF encoder: {e}"))
        })?;

        let repeat = match loops {
            0 => Repeat::Infinite,
            n => Repeat::Finite(n),
        };
        encoder
            .set_repeat(repeat)
            .map_err(|e| GifferError::GifEncodeError(format!("Failed to set GIF repeat: {e}")))?;

        Ok(Self {
            encoder,
            path,
            dimensions,
            frame_delay,
            frames_written: 0,
        })
    }

    /// Quantize and append one frame.
    ///
    /// # Errors
    ///
    /// [`GifferError::GifEncodeError`] if the frame size differs from the
    /// writer's or the write fails.
    pub fn append(&mut self, image: &RgbImage) -> Result<(), GifferError> {
        let size = Dimensions::new(image.width(), image.height());
        if size != self.dimensions {
            return Err(GifferError::GifEncodeError(format!(
                "Frame is {size} but the GIF is {}",
                self.dimensions
            )));
        }
        let (width, height) = gif_size(size)?;

        let mut frame = Frame::from_rgb_speed(width, height, image.as_raw(), QUANTIZE_SPEED);
        frame.delay = self.frame_delay;

        self.encoder
            .write_frame(&frame)
            .map_err(|e| GifferError::GifEncodeError(format!("Failed to write GIF frame: {e}")))?;
        self.frames_written += 1;
        Ok(())
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Write the trailer and flush the file.
    pub fn finish(self) -> Result<(), GifferError> {
        let mut writer = self
            .encoder
            .into_inner()
            .map_err(|e| GifferError::GifEncodeError(format!("Failed to finish GIF: {e}")))?;
        writer.flush()?;
        log::debug!(
            "Finished GIF file {} ({} frames)",
            self.path.display(),
            self.frames_written
        );
        Ok(())
    }
}

fn gif_size(dimensions: Dimensions) -> Result<(u16, u16), GifferError> {
    match (
        u16::try_from(dimensions.width),
        u16::try_from(dimensions.height),
    ) {
        (Ok(width), Ok(height)) => Ok((width, height)),
        _ => Err(GifferError::GifEncodeError(format!(
            "{dimensions} exceeds the GIF size limit of 65535x65535"
        ))),
    }
}
