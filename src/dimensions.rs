//! Output size calculation.

use std::fmt;

use crate::error::GifferError;

/// Width and height of a frame in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The larger of width and height.
    pub fn max_side(self) -> u32 {
        self.width.max(self.height)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Compute the output size for frames of `native` size.
///
/// With no `max_dimension` the native size is returned unchanged. Otherwise
/// both sides are multiplied by `max_dimension / max(width, height)` and
/// floored independently, so the larger side lands exactly on
/// `max_dimension` and the smaller side may lose up to a pixel of aspect
/// ratio. The result never goes below 1×1.
///
/// # Errors
///
/// [`GifferError::UpscaleNotSupported`] if `max_dimension` exceeds the
/// larger native side.
///
/// # Example
///
/// ```
/// use giffer::{Dimensions, output_dimensions};
///
/// let output = output_dimensions(Dimensions::new(1920, 1080), Some(640))?;
/// assert_eq!(output, Dimensions::new(640, 360));
/// # Ok::<(), giffer::GifferError>(())
/// ```
pub fn output_dimensions(
    native: Dimensions,
    max_dimension: Option<u32>,
) -> Result<Dimensions, GifferError> {
    let Some(requested) = max_dimension else {
        return Ok(native);
    };

    let native_max = native.max_side();
    if requested > native_max {
        return Err(GifferError::UpscaleNotSupported {
            requested,
            native: native_max,
        });
    }

    // floor(side × requested / native_max) without float rounding.
    let scale = |side: u32| {
        (u64::from(side) * u64::from(requested))
            .checked_div(u64::from(native_max))
            .unwrap_or(0) as u32
    };
    Ok(Dimensions::new(
        scale(native.width).max(1),
        scale(native.height).max(1),
    ))
}
