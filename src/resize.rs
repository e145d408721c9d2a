//! Area-averaging downscaling of RGB frames.

use ffmpeg_next::{
    format::Pixel,
    frame::Video as VideoFrame,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::RgbImage;

use crate::{conversion, dimensions::Dimensions, error::GifferError};

/// Resizes RGB frames to a fixed output size using swscale's area filter.
///
/// The scaling context and both frame buffers are built on first use and
/// reused for as long as the input size stays the same.
pub struct AreaResizer {
    output: Dimensions,
    context: Option<(Dimensions, ScalingContext)>,
    source_frame: VideoFrame,
    scaled_frame: VideoFrame,
}

impl std::fmt::Debug for AreaResizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AreaResizer")
            .field("output", &self.output)
            .field("input", &self.context.as_ref().map(|(input, _)| *input))
            .finish()
    }
}

impl AreaResizer {
    /// A resizer producing frames of `output` size.
    pub fn new(output: Dimensions) -> Self {
        Self {
            output,
            context: None,
            source_frame: VideoFrame::empty(),
            scaled_frame: VideoFrame::empty(),
        }
    }

    pub fn output(&self) -> Dimensions {
        self.output
    }

    /// Resize `image` to the output size. Images already at that size are
    /// returned unchanged.
    ///
    /// # Errors
    ///
    /// [`GifferError::FfmpegError`] if swscale rejects the sizes.
    pub fn resize(&mut self, image: RgbImage) -> Result<RgbImage, GifferError> {
        let input = Dimensions::new(image.width(), image.height());
        if input == self.output {
            return Ok(image);
        }

        if !matches!(&self.context, Some((cached, _)) if *cached == input) {
            let context = ScalingContext::get(
                Pixel::RGB24,
                input.width,
                input.height,
                Pixel::RGB24,
                self.output.width,
                self.output.height,
                ScalingFlags::AREA,
            )?;
            self.context = Some((input, context));
            self.source_frame = VideoFrame::new(Pixel::RGB24, input.width, input.height);
        }

        conversion::buffer_to_frame(
            image.as_raw(),
            &mut self.source_frame,
            input.width,
            input.height,
            3,
        );
        if let Some((_, context)) = self.context.as_mut() {
            context.run(&self.source_frame, &mut self.scaled_frame)?;
        }

        let Dimensions { width, height } = self.output;
        let buffer = conversion::frame_to_buffer(&self.scaled_frame, width, height, 3);
        RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
            GifferError::VideoDecodeError("Resized frame has an unexpected size".to_string())
        })
    }
}
