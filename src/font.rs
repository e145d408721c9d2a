//! Caption fonts.
//!
//! The eight named [`FontFace`]s describe a style (sans, serif or script,
//! regular or heavy, normal or small) rather than a specific file. They are
//! resolved against the installed system fonts with `fontdb` and rasterized
//! with `fontdue`. A font file can be supplied instead when the system has
//! nothing suitable.

use std::{fmt, fs, path::Path, str::FromStr};

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use fontdue::{Font, FontSettings};

use crate::{
    caption::{TextExtent, TextMask, TextMeasure},
    error::GifferError,
};

/// Pixel size of a face at scale 1.0 (before its size factor).
pub const NOMINAL_PIXEL_SIZE: f32 = 22.0;

const SANS_FAMILIES: &[Family<'static>] = &[
    Family::Name("DejaVu Sans"),
    Family::Name("Liberation Sans"),
    Family::Name("Noto Sans"),
    Family::Name("Helvetica"),
    Family::Name("Arial"),
    Family::SansSerif,
];

const SERIF_FAMILIES: &[Family<'static>] = &[
    Family::Name("DejaVu Serif"),
    Family::Name("Liberation Serif"),
    Family::Name("Noto Serif"),
    Family::Name("Times New Roman"),
    Family::Serif,
    Family::SansSerif,
];

const SCRIPT_FAMILIES: &[Family<'static>] = &[
    Family::Name("URW Chancery L"),
    Family::Name("Z003"),
    Family::Name("Apple Chancery"),
    Family::Name("Comic Sans MS"),
    Family::Cursive,
    Family::Serif,
    Family::SansSerif,
];

/// One of the named caption font styles accepted by `--font-face`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontFace {
    /// Regular sans-serif.
    #[default]
    Simplex,
    /// Small sans-serif.
    Plain,
    /// Heavy sans-serif.
    Duplex,
    /// Regular serif.
    Complex,
    /// Heavy serif.
    Triplex,
    /// Small serif.
    ComplexSmall,
    /// Regular handwriting style.
    ScriptSimplex,
    /// Heavy handwriting style.
    ScriptComplex,
}

impl FontFace {
    /// Every face, in the order they are listed in help text.
    pub const ALL: [FontFace; 8] = [
        FontFace::Simplex,
        FontFace::Plain,
        FontFace::Duplex,
        FontFace::Complex,
        FontFace::Triplex,
        FontFace::ComplexSmall,
        FontFace::ScriptSimplex,
        FontFace::ScriptComplex,
    ];

    /// The name accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            FontFace::Simplex => "simplex",
            FontFace::Plain => "plain",
            FontFace::Duplex => "duplex",
            FontFace::Complex => "complex",
            FontFace::Triplex => "triplex",
            FontFace::ComplexSmall => "complex_small",
            FontFace::ScriptSimplex => "script_simplex",
            FontFace::ScriptComplex => "script_complex",
        }
    }

    /// Multiplier applied to [`NOMINAL_PIXEL_SIZE`] for this face.
    pub fn size_factor(self) -> f32 {
        match self {
            FontFace::Plain => 0.55,
            FontFace::ComplexSmall => 0.7,
            _ => 1.0,
        }
    }

    fn weight(self) -> Weight {
        match self {
            FontFace::Duplex | FontFace::Triplex | FontFace::ScriptComplex => Weight::BOLD,
            _ => Weight::NORMAL,
        }
    }

    fn families(self) -> &'static [Family<'static>] {
        match self {
            FontFace::Simplex | FontFace::Plain | FontFace::Duplex => SANS_FAMILIES,
            FontFace::Complex | FontFace::Triplex | FontFace::ComplexSmall => SERIF_FAMILIES,
            FontFace::ScriptSimplex | FontFace::ScriptComplex => SCRIPT_FAMILIES,
        }
    }
}

impl fmt::Display for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FontFace {
    type Err = GifferError;

    /// Case-insensitive; `-` and `_` are interchangeable.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|face| face.name() == normalized)
            .ok_or_else(|| GifferError::UnsupportedFont(value.to_string()))
    }
}

/// A loaded font bound to the [`FontFace`] it stands in for.
pub struct CaptionFont {
    font: Font,
    face: FontFace,
}

impl fmt::Debug for CaptionFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptionFont")
            .field("face", &self.face)
            .field("name", &self.font.name())
            .finish_non_exhaustive()
    }
}

impl CaptionFont {
    /// Find an installed font matching `face`.
    ///
    /// # Errors
    ///
    /// [`GifferError::FontUnavailable`] if no installed font matches any of
    /// the face's families, or [`GifferError::FontLoad`] if the match cannot
    /// be parsed.
    pub fn system(face: FontFace) -> Result<Self, GifferError> {
        let mut database = Database::new();
        database.load_system_fonts();

        let query = Query {
            families: face.families(),
            weight: face.weight(),
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = database
            .query(&query)
            .ok_or(GifferError::FontUnavailable(face))?;

        let font = database
            .with_face_data(id, |data, index| parse_font(data, index))
            .ok_or(GifferError::FontUnavailable(face))??;

        log::debug!("Resolved {face} font face to {:?}", font.name());
        Ok(Self { font, face })
    }

    /// Load a TTF/OTF file and use it for `face`.
    ///
    /// The face still contributes its size factor; its family and weight are
    /// ignored.
    pub fn from_file<P: AsRef<Path>>(path: P, face: FontFace) -> Result<Self, GifferError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|error| {
            GifferError::FontLoad(format!("cannot read {}: {error}", path.display()))
        })?;
        Self::from_bytes(&bytes, face)
    }

    /// Parse font data already in memory.
    pub fn from_bytes(bytes: &[u8], face: FontFace) -> Result<Self, GifferError> {
        let font = parse_font(bytes, 0)?;
        Ok(Self { font, face })
    }

    /// Pixel size used to render at `scale`.
    pub fn pixel_size(&self, scale: f64) -> f32 {
        scale as f32 * NOMINAL_PIXEL_SIZE * self.face.size_factor()
    }

    /// Rasterize `text` into a coverage mask laid out exactly as
    /// [`measure`](TextMeasure::measure) describes it.
    pub fn rasterize(&self, text: &str, scale: f64, stroke_width: u32) -> TextMask {
        let extent = self.measure(text, scale, stroke_width);
        let pixel_size = self.pixel_size(scale);
        let radius = stroke_width / 2;

        let mut mask = TextMask::blank(
            extent.width,
            extent.height + extent.baseline,
            extent.baseline,
        );
        let baseline_row = extent.height as i32;

        let mut pen_x = radius as f32;
        let mut previous = None;
        for character in text.chars() {
            if let Some(left) = previous {
                pen_x += self
                    .font
                    .horizontal_kern(left, character, pixel_size)
                    .unwrap_or(0.0);
            }
            let (metrics, bitmap) = self.font.rasterize(character, pixel_size);
            let left = (pen_x + metrics.xmin as f32).round() as i32;
            let top = baseline_row - metrics.ymin - metrics.height as i32;
            mask.stamp(left, top, metrics.width, metrics.height, &bitmap);

            pen_x += metrics.advance_width;
            previous = Some(character);
        }

        mask.dilate(radius);
        mask
    }

    fn advance_width(&self, text: &str, pixel_size: f32) -> f32 {
        let mut width = 0.0;
        let mut previous = None;
        for character in text.chars() {
            if let Some(left) = previous {
                width += self
                    .font
                    .horizontal_kern(left, character, pixel_size)
                    .unwrap_or(0.0);
            }
            width += self.font.metrics(character, pixel_size).advance_width;
            previous = Some(character);
        }
        width
    }

    fn ascent_descent(&self, pixel_size: f32) -> (f32, f32) {
        match self.font.horizontal_line_metrics(pixel_size) {
            Some(line) => (line.ascent, -line.descent),
            None => (pixel_size * 0.8, pixel_size * 0.2),
        }
    }
}

impl TextMeasure for CaptionFont {
    /// Width is the advance of the whole string; height is the font ascent;
    /// baseline is the font descent. The stroke adds `stroke / 2` pixels on
    /// every side.
    fn measure(&self, text: &str, scale: f64, stroke_width: u32) -> TextExtent {
        let pixel_size = self.pixel_size(scale);
        let radius = stroke_width / 2;
        let (ascent, descent) = self.ascent_descent(pixel_size);

        TextExtent {
            width: self.advance_width(text, pixel_size).ceil() as u32 + 2 * radius,
            height: ascent.ceil().max(0.0) as u32 + radius,
            baseline: descent.ceil().max(0.0) as u32 + radius,
        }
    }
}

fn parse_font(data: &[u8], collection_index: u32) -> Result<Font, GifferError> {
    let settings = FontSettings {
        collection_index,
        ..FontSettings::default()
    };
    Font::from_bytes(data, settings).map_err(|reason| GifferError::FontLoad(reason.to_string()))
}
