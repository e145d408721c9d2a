//! Named caption colours.

use std::{fmt, str::FromStr};

use image::Rgb;

use crate::error::GifferError;

/// One of the fixed caption colours accepted by `--color`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaptionColor {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    #[default]
    White,
    Black,
    Gray,
}

impl CaptionColor {
    /// Every colour in the palette.
    pub const ALL: [CaptionColor; 9] = [
        CaptionColor::Red,
        CaptionColor::Orange,
        CaptionColor::Yellow,
        CaptionColor::Green,
        CaptionColor::Blue,
        CaptionColor::Purple,
        CaptionColor::White,
        CaptionColor::Black,
        CaptionColor::Gray,
    ];

    /// The name accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            CaptionColor::Red => "red",
            CaptionColor::Orange => "orange",
            CaptionColor::Yellow => "yellow",
            CaptionColor::Green => "green",
            CaptionColor::Blue => "blue",
            CaptionColor::Purple => "purple",
            CaptionColor::White => "white",
            CaptionColor::Black => "black",
            CaptionColor::Gray => "gray",
        }
    }

    /// The colour as an RGB pixel.
    pub fn rgb(self) -> Rgb<u8> {
        match self {
            CaptionColor::Red => Rgb([255, 0, 0]),
            CaptionColor::Orange => Rgb([255, 165, 0]),
            CaptionColor::Yellow => Rgb([255, 255, 0]),
            CaptionColor::Green => Rgb([0, 255, 0]),
            CaptionColor::Blue => Rgb([0, 0, 255]),
            CaptionColor::Purple => Rgb([128, 0, 128]),
            CaptionColor::White => Rgb([255, 255, 255]),
            CaptionColor::Black => Rgb([0, 0, 0]),
            CaptionColor::Gray => Rgb([128, 128, 128]),
        }
    }
}

impl fmt::Display for CaptionColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CaptionColor {
    type Err = GifferError;

    /// Case-insensitive; `grey` is accepted as an alias for `gray`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        let normalized = if normalized == "grey" {
            "gray".to_string()
        } else {
            normalized
        };
        Self::ALL
            .into_iter()
            .find(|color| color.name() == normalized)
            .ok_or_else(|| GifferError::UnsupportedColor(value.to_string()))
    }
}
