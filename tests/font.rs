//! Text measurement and rasterization with installed fonts.
//!
//! These tests need at least one TrueType/OpenType font on the system and
//! return early when none is found.

use giffer::{CaptionFont, FontFace, GifferError, TextMeasure, fit_caption};

fn system_font(face: FontFace) -> Option<CaptionFont> {
    match CaptionFont::system(face) {
        Ok(font) => Some(font),
        Err(error) => {
            eprintln!("No system font for {face}, skipping: {error}");
            None
        }
    }
}

#[test]
fn larger_scale_measures_larger() {
    let Some(font) = system_font(FontFace::Simplex) else {
        return;
    };
    let small = font.measure("Hello", 1.0, 2);
    let large = font.measure("Hello", 2.0, 2);

    assert!(large.width > small.width);
    assert!(large.height > small.height);
    assert!(large.baseline >= small.baseline);
}

#[test]
fn longer_text_measures_wider() {
    let Some(font) = system_font(FontFace::Simplex) else {
        return;
    };
    assert!(font.measure("Hello there", 1.0, 2).width > font.measure("Hello", 1.0, 2).width);
}

#[test]
fn stroke_adds_half_its_width_per_side() {
    let Some(font) = system_font(FontFace::Simplex) else {
        return;
    };
    let thin = font.measure("Wide", 1.5, 0);
    let thick = font.measure("Wide", 1.5, 4);

    assert_eq!(thick.width, thin.width + 4);
    assert_eq!(thick.height, thin.height + 2);
    assert_eq!(thick.baseline, thin.baseline + 2);
}

#[test]
fn mask_matches_measured_extent() {
    let Some(font) = system_font(FontFace::Simplex) else {
        return;
    };
    let extent = font.measure("Mask", 2.0, 2);
    let mask = font.rasterize("Mask", 2.0, 2);

    assert_eq!(mask.width(), extent.width);
    assert_eq!(mask.height(), extent.height + extent.baseline);
    assert_eq!(mask.baseline(), extent.baseline);

    let inked = (0..mask.height())
        .flat_map(|y| (0..mask.width()).map(move |x| (x, y)))
        .filter(|&(x, y)| mask.coverage_at(x, y) > 0)
        .count();
    assert!(inked > 0, "rasterized text should cover some pixels");
}

#[test]
fn fitting_is_deterministic_and_within_target() {
    let Some(font) = system_font(FontFace::Simplex) else {
        return;
    };
    let first = fit_caption(&font, "Deterministic", 15, 640, 2).unwrap();
    let second = fit_caption(&font, "Deterministic", 15, 640, 2).unwrap();

    assert_eq!(first, second);
    assert!(first.extent.height <= 15);
    assert!(first.scale > 0.0 && first.scale <= 10.0);
    assert!(font.measure("Deterministic", first.scale + 0.1, 2).height > 15);
}

#[test]
fn plain_face_renders_smaller_than_simplex() {
    let (Some(simplex), Some(plain)) = (
        system_font(FontFace::Simplex),
        system_font(FontFace::Plain),
    ) else {
        return;
    };
    assert!(plain.pixel_size(1.0) < simplex.pixel_size(1.0));
}

#[test]
fn missing_font_file_is_a_load_error() {
    let result = CaptionFont::from_file("tests/fixtures/no_such_font.ttf", FontFace::Simplex);
    assert!(matches!(result, Err(GifferError::FontLoad(_))));
}

#[test]
fn garbage_font_bytes_are_rejected() {
    let result = CaptionFont::from_bytes(b"definitely not a font", FontFace::Simplex);
    assert!(matches!(result, Err(GifferError::FontLoad(_))));
}
