//! Caption fitting and burn-in.
//!
//! A caption is laid out once per clip: [`fit_caption`] picks the font scale,
//! the text is rasterized into a [`TextMask`] at that scale, and the same mask
//! is blended onto every frame by [`Caption::draw`].

use image::{Rgb, RgbImage};

use crate::{
    configuration::CaptionOptions, dimensions::Dimensions, error::GifferError, font::CaptionFont,
};

/// Gap in pixels between the lowest point of the caption and the bottom edge.
pub const BOTTOM_MARGIN: u32 = 4;

/// Largest scale tried by [`fit_caption`], in tenths.
const MAX_SCALE_TENTHS: u32 = 100;

/// Pixel box occupied by a line of rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextExtent {
    /// Width in pixels.
    pub width: u32,
    /// Height above the baseline in pixels.
    pub height: u32,
    /// Depth below the baseline in pixels.
    pub baseline: u32,
}

/// Measures a line of text at a given font scale and stroke width.
///
/// Implemented by [`CaptionFont`]; anything with deterministic metrics can be
/// used to drive [`fit_caption`].
pub trait TextMeasure {
    /// Return the box `text` occupies at `scale`.
    fn measure(&self, text: &str, scale: f64, stroke_width: u32) -> TextExtent;
}

/// The chosen scale and the box the caption occupies at that scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptionLayout {
    /// Text box at [`scale`](CaptionLayout::scale).
    pub extent: TextExtent,
    /// Font scale, a multiple of 0.1 in (0, 10].
    pub scale: f64,
}

/// Find the largest font scale whose text height is within `target_height`.
///
/// Scales are tried from 10.0 downwards in steps of 0.1. The first scale
/// whose height fits is the answer, provided the text is no wider than
/// `max_width` at that scale; a caption that is too wide there is rejected
/// rather than shrunk further.
///
/// # Errors
///
/// - [`GifferError::CaptionTooWide`] if the text fits the height but not the
///   width.
/// - [`GifferError::InvalidScale`] if no scale above zero gets the text down
///   to `target_height`.
pub fn fit_caption<M: TextMeasure + ?Sized>(
    measure: &M,
    text: &str,
    target_height: u32,
    max_width: u32,
    stroke_width: u32,
) -> Result<CaptionLayout, GifferError> {
    for tenths in (1..=MAX_SCALE_TENTHS).rev() {
        let scale = f64::from(tenths) / 10.0;
        let extent = measure.measure(text, scale, stroke_width);

        if extent.height > target_height {
            continue;
        }
        if extent.width > max_width {
            return Err(GifferError::CaptionTooWide {
                text_width: extent.width,
                max_width,
            });
        }

        log::debug!(
            "Caption fits at scale {scale:.1}: {}x{} (+{} below baseline)",
            extent.width,
            extent.height,
            extent.baseline,
        );
        return Ok(CaptionLayout { extent, scale });
    }

    Err(GifferError::InvalidScale { target_height })
}

/// Fit `options.text` onto frames of `output` size.
///
/// Runs [`fit_caption`] against the frame width, then checks that the text,
/// including descenders and [`BOTTOM_MARGIN`], is no taller than the frame.
///
/// # Errors
///
/// Anything [`fit_caption`] returns, or [`GifferError::CaptionTooTall`].
pub fn fit_caption_in_frame<M: TextMeasure + ?Sized>(
    measure: &M,
    options: &CaptionOptions,
    output: Dimensions,
) -> Result<CaptionLayout, GifferError> {
    let layout = fit_caption(
        measure,
        &options.text,
        options.text_height,
        output.width,
        options.stroke_width,
    )?;

    let caption_height = layout.extent.height + layout.extent.baseline + BOTTOM_MARGIN;
    if caption_height > output.height {
        return Err(GifferError::CaptionTooTall {
            caption_height,
            frame_height: output.height,
        });
    }
    Ok(layout)
}

/// An 8-bit coverage mask for a rasterized line of text.
///
/// Row `height - baseline` is the text baseline; the last `baseline` rows
/// hold descenders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMask {
    width: u32,
    height: u32,
    baseline: u32,
    coverage: Vec<u8>,
}

impl TextMask {
    /// An empty mask of the given size.
    pub fn blank(width: u32, height: u32, baseline: u32) -> Self {
        Self {
            width,
            height,
            baseline,
            coverage: vec![0; width as usize * height as usize],
        }
    }

    /// Wrap existing coverage values.
    ///
    /// Returns `None` if `coverage` is not exactly `width × height` long.
    pub fn from_coverage(
        width: u32,
        height: u32,
        baseline: u32,
        coverage: Vec<u8>,
    ) -> Option<Self> {
        (coverage.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            baseline,
            coverage,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Rows below the baseline.
    pub fn baseline(&self) -> u32 {
        self.baseline
    }

    /// Coverage at `(x, y)`, or 0 outside the mask.
    pub fn coverage_at(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.coverage[(y * self.width + x) as usize]
    }

    /// Merge a glyph bitmap into the mask with its top-left at `(left, top)`,
    /// keeping the maximum coverage where glyphs overlap. Parts falling
    /// outside the mask are clipped.
    pub fn stamp(&mut self, left: i32, top: i32, width: usize, height: usize, bitmap: &[u8]) {
        for glyph_y in 0..height {
            let y = top + glyph_y as i32;
            if y < 0 || y >= self.height as i32 {
                continue;
            }
            for glyph_x in 0..width {
                let x = left + glyph_x as i32;
                if x < 0 || x >= self.width as i32 {
                    continue;
                }
                let index = y as usize * self.width as usize + x as usize;
                let value = bitmap[glyph_y * width + glyph_x];
                self.coverage[index] = self.coverage[index].max(value);
            }
        }
    }

    /// Thicken the strokes by `radius` pixels in every direction (square
    /// max filter, applied horizontally then vertically).
    pub fn dilate(&mut self, radius: u32) {
        if radius == 0 || self.coverage.is_empty() {
            return;
        }
        let width = self.width as usize;
        let height = self.height as usize;
        let radius = radius as usize;

        let mut horizontal = vec![0u8; self.coverage.len()];
        for y in 0..height {
            let row = &self.coverage[y * width..(y + 1) * width];
            for x in 0..width {
                let from = x.saturating_sub(radius);
                let to = (x + radius).min(width - 1);
                horizontal[y * width + x] = row[from..=to].iter().copied().max().unwrap_or(0);
            }
        }

        for x in 0..width {
            for y in 0..height {
                let from = y.saturating_sub(radius);
                let to = (y + radius).min(height - 1);
                self.coverage[y * width + x] = (from..=to)
                    .map(|row| horizontal[row * width + x])
                    .max()
                    .unwrap_or(0);
            }
        }
    }

    /// Alpha-blend `color` onto `frame` using the mask as alpha, with the
    /// mask's top-left corner at `(left, top)`. Clipped to the frame.
    pub fn blend_onto(&self, frame: &mut RgbImage, left: i64, top: i64, color: Rgb<u8>) {
        let frame_width = i64::from(frame.width());
        let frame_height = i64::from(frame.height());

        for mask_y in 0..self.height {
            let y = top + i64::from(mask_y);
            if y < 0 || y >= frame_height {
                continue;
            }
            for mask_x in 0..self.width {
                let x = left + i64::from(mask_x);
                if x < 0 || x >= frame_width {
                    continue;
                }
                let alpha = u32::from(self.coverage_at(mask_x, mask_y));
                if alpha == 0 {
                    continue;
                }
                let pixel = frame.get_pixel_mut(x as u32, y as u32);
                for channel in 0..3 {
                    let under = u32::from(pixel.0[channel]);
                    let over = u32::from(color.0[channel]);
                    pixel.0[channel] = ((over * alpha + under * (255 - alpha) + 127) / 255) as u8;
                }
            }
        }
    }
}

/// A caption ready to be burned into frames of one fixed size.
#[derive(Debug, Clone)]
pub struct Caption {
    layout: CaptionLayout,
    mask: TextMask,
    color: Rgb<u8>,
}

impl Caption {
    /// Fit `options.text` to frames of `output` size and rasterize it.
    ///
    /// # Errors
    ///
    /// Any error from [`fit_caption_in_frame`].
    pub fn prepare(
        font: &CaptionFont,
        options: &CaptionOptions,
        output: Dimensions,
    ) -> Result<Self, GifferError> {
        let layout = fit_caption_in_frame(font, options, output)?;
        let mask = font.rasterize(&options.text, layout.scale, options.stroke_width);
        Ok(Self::from_parts(layout, mask, options.color.rgb()))
    }

    /// Assemble a caption from an already computed layout and mask.
    pub fn from_parts(layout: CaptionLayout, mask: TextMask, color: Rgb<u8>) -> Self {
        Self {
            layout,
            mask,
            color,
        }
    }

    pub fn layout(&self) -> CaptionLayout {
        self.layout
    }

    /// Left edge and baseline row of the caption on a `width × height` frame.
    ///
    /// The caption is centred horizontally; its baseline sits
    /// `baseline + BOTTOM_MARGIN` pixels above the bottom edge.
    pub fn origin(&self, width: u32, height: u32) -> (i64, i64) {
        let extent = self.layout.extent;
        let left = (i64::from(width) - i64::from(extent.width)) / 2;
        let baseline_y = i64::from(height) - i64::from(extent.baseline) - i64::from(BOTTOM_MARGIN);
        (left, baseline_y)
    }

    /// Burn the caption into `frame`.
    pub fn draw(&self, frame: &mut RgbImage) {
        let (left, baseline_y) = self.origin(frame.width(), frame.height());
        let top = baseline_y - i64::from(self.mask.height() - self.mask.baseline());
        self.mask.blend_onto(frame, left, top, self.color);
    }
}
