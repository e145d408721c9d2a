//! Caption fitting, masks and placement.

use std::cell::RefCell;

use giffer::{
    BOTTOM_MARGIN, Caption, CaptionLayout, CaptionOptions, Dimensions, GifferError, TextExtent,
    TextMask, TextMeasure, fit_caption, fit_caption_in_frame,
};
use image::{Rgb, RgbImage};

/// Metrics that grow linearly with scale: one pixel of height per tenth, and
/// half that per character of width. The stroke widens the text only.
#[derive(Default)]
struct LinearMeasure {
    scales: RefCell<Vec<f64>>,
}

impl TextMeasure for LinearMeasure {
    fn measure(&self, text: &str, scale: f64, stroke_width: u32) -> TextExtent {
        self.scales.borrow_mut().push(scale);
        let tenths = (scale * 10.0).round() as u32;
        TextExtent {
            width: text.chars().count() as u32 * tenths / 2 + stroke_width,
            height: tenths,
            baseline: tenths / 4,
        }
    }
}

/// Metrics that never shrink below a fixed height.
struct FixedMeasure(u32);

impl TextMeasure for FixedMeasure {
    fn measure(&self, _text: &str, _scale: f64, _stroke_width: u32) -> TextExtent {
        TextExtent {
            width: 10,
            height: self.0,
            baseline: 2,
        }
    }
}

#[test]
fn picks_largest_scale_within_height() {
    let measure = LinearMeasure::default();
    let layout = fit_caption(&measure, "hello", 15, 640, 2).unwrap();

    assert_eq!(layout.scale, 1.5);
    assert_eq!(layout.extent.height, 15);
    assert_eq!(layout.extent.width, 5 * 15 / 2 + 2);
}

#[test]
fn search_starts_at_ten_and_descends() {
    let measure = LinearMeasure::default();
    fit_caption(&measure, "hi", 15, 640, 2).unwrap();

    let scales = measure.scales.borrow();
    assert_eq!(scales.first(), Some(&10.0));
    assert!(scales.windows(2).all(|pair| pair[1] < pair[0]));
    assert_eq!(scales.last(), Some(&1.5));
}

#[test]
fn scale_is_capped_at_ten() {
    let measure = LinearMeasure::default();
    let layout = fit_caption(&measure, "x", 500, 640, 1).unwrap();
    assert_eq!(layout.scale, 10.0);
    assert_eq!(measure.scales.borrow().len(), 1);
}

#[test]
fn smallest_scale_is_one_tenth() {
    let measure = LinearMeasure::default();
    let layout = fit_caption(&measure, "x", 1, 640, 1).unwrap();
    assert_eq!(layout.scale, 0.1);
}

#[test]
fn same_inputs_give_same_layout() {
    let first = fit_caption(&LinearMeasure::default(), "repeatable", 24, 320, 2).unwrap();
    let second = fit_caption(&LinearMeasure::default(), "repeatable", 24, 320, 2).unwrap();
    assert_eq!(first, second);
}

#[test]
fn too_wide_text_is_rejected_not_shrunk() {
    let measure = LinearMeasure::default();
    let text = "x".repeat(100);
    let result = fit_caption(&measure, &text, 15, 640, 2);

    match result {
        Err(GifferError::CaptionTooWide {
            text_width,
            max_width,
        }) => {
            assert_eq!(text_width, 100 * 15 / 2 + 2);
            assert_eq!(max_width, 640);
        }
        other => panic!("Expected CaptionTooWide, got {other:?}"),
    }
    // Width is checked only at the first scale that fits the height.
    assert_eq!(measure.scales.borrow().last(), Some(&1.5));
}

#[test]
fn width_equal_to_frame_is_accepted() {
    let measure = LinearMeasure::default();
    // 4 chars × 10 tenths / 2 + 0 = 20
    let layout = fit_caption(&measure, "abcd", 10, 20, 0).unwrap();
    assert_eq!(layout.extent.width, 20);
}

#[test]
fn unreachable_height_is_invalid_scale() {
    let result = fit_caption(&FixedMeasure(40), "text", 30, 640, 2);
    match result {
        Err(GifferError::InvalidScale { target_height }) => assert_eq!(target_height, 30),
        other => panic!("Expected InvalidScale, got {other:?}"),
    }
}

#[test]
fn caption_taller_than_frame_is_rejected() {
    let options = CaptionOptions::new("hi").with_text_height(15);
    // 15 px above the baseline, 3 below, 4 px margin.
    let measure = LinearMeasure::default();
    let result = fit_caption_in_frame(&measure, &options, Dimensions::new(100, 21));

    match result {
        Err(GifferError::CaptionTooTall {
            caption_height,
            frame_height,
        }) => {
            assert_eq!(caption_height, 15 + 3 + BOTTOM_MARGIN);
            assert_eq!(frame_height, 21);
        }
        other => panic!("Expected CaptionTooTall, got {other:?}"),
    }
}

#[test]
fn caption_exactly_filling_frame_height_fits() {
    let options = CaptionOptions::new("hi").with_text_height(15);
    let measure = LinearMeasure::default();
    let layout = fit_caption_in_frame(&measure, &options, Dimensions::new(100, 22)).unwrap();
    assert_eq!(layout.scale, 1.5);
}

#[test]
fn frame_width_limits_caption_in_frame() {
    let options = CaptionOptions::new("x".repeat(100)).with_text_height(15);
    let measure = LinearMeasure::default();
    let result = fit_caption_in_frame(&measure, &options, Dimensions::new(640, 480));
    assert!(matches!(result, Err(GifferError::CaptionTooWide { max_width: 640, .. })));
}

#[test]
fn stamp_keeps_maximum_and_clips() {
    let mut mask = TextMask::blank(4, 3, 1);
    mask.stamp(-1, 0, 2, 2, &[10, 20, 30, 40]);
    mask.stamp(0, 1, 1, 1, &[5]);

    // Column -1 is clipped away.
    assert_eq!(mask.coverage_at(0, 0), 20);
    assert_eq!(mask.coverage_at(0, 1), 40);
    assert_eq!(mask.coverage_at(1, 0), 0);
    assert_eq!(mask.coverage_at(9, 9), 0);
}

#[test]
fn dilate_spreads_a_dot_into_a_square() {
    let mut mask = TextMask::blank(5, 5, 0);
    mask.stamp(2, 2, 1, 1, &[200]);
    mask.dilate(1);

    for y in 0..5 {
        for x in 0..5 {
            let inside = (1..=3).contains(&x) && (1..=3).contains(&y);
            assert_eq!(mask.coverage_at(x, y), if inside { 200 } else { 0 }, "({x}, {y})");
        }
    }
}

#[test]
fn dilate_by_zero_is_a_no_op() {
    let mut mask = TextMask::blank(3, 3, 0);
    mask.stamp(1, 1, 1, 1, &[255]);
    let before = mask.clone();
    mask.dilate(0);
    assert_eq!(mask, before);
}

#[test]
fn from_coverage_checks_length() {
    assert!(TextMask::from_coverage(2, 2, 0, vec![0; 4]).is_some());
    assert!(TextMask::from_coverage(2, 2, 0, vec![0; 3]).is_none());
}

#[test]
fn blend_respects_coverage() {
    let mask = TextMask::from_coverage(3, 1, 0, vec![0, 255, 128]).unwrap();
    let mut frame = RgbImage::from_pixel(3, 1, Rgb([0, 0, 0]));
    mask.blend_onto(&mut frame, 0, 0, Rgb([255, 255, 255]));

    assert_eq!(frame.get_pixel(0, 0), &Rgb([0, 0, 0]));
    assert_eq!(frame.get_pixel(1, 0), &Rgb([255, 255, 255]));
    assert_eq!(frame.get_pixel(2, 0), &Rgb([128, 128, 128]));
}

#[test]
fn blend_clips_to_frame() {
    let mask = TextMask::from_coverage(2, 2, 0, vec![255; 4]).unwrap();
    let mut frame = RgbImage::from_pixel(2, 2, Rgb([0, 0, 0]));
    mask.blend_onto(&mut frame, -1, 1, Rgb([255, 0, 0]));

    assert_eq!(frame.get_pixel(0, 1), &Rgb([255, 0, 0]));
    assert_eq!(frame.get_pixel(1, 1), &Rgb([0, 0, 0]));
    assert_eq!(frame.get_pixel(0, 0), &Rgb([0, 0, 0]));
}

fn solid_caption(width: u32, height: u32, baseline: u32) -> Caption {
    let layout = CaptionLayout {
        extent: TextExtent {
            width,
            height: height - baseline,
            baseline,
        },
        scale: 1.0,
    };
    let coverage = vec![255; (width * height) as usize];
    let mask = TextMask::from_coverage(width, height, baseline, coverage).unwrap();
    Caption::from_parts(layout, mask, Rgb([255, 255, 0]))
}

#[test]
fn origin_is_centred_above_bottom_margin() {
    let caption = solid_caption(100, 10, 3);
    let (left, baseline_y) = caption.origin(640, 480);

    assert_eq!(left, 270);
    assert_eq!(baseline_y, 480 - 3 - i64::from(BOTTOM_MARGIN));
}

#[test]
fn draw_places_mask_bottom_at_margin() {
    let caption = solid_caption(100, 10, 3);
    let mut frame = RgbImage::from_pixel(640, 480, Rgb([0, 0, 0]));
    caption.draw(&mut frame);

    let yellow = Rgb([255, 255, 0]);
    let black = Rgb([0, 0, 0]);
    let bottom = 480 - BOTTOM_MARGIN - 1;
    let top = bottom - 9;

    assert_eq!(frame.get_pixel(270, top), &yellow);
    assert_eq!(frame.get_pixel(369, bottom), &yellow);
    assert_eq!(frame.get_pixel(270, top - 1), &black);
    assert_eq!(frame.get_pixel(270, bottom + 1), &black);
    assert_eq!(frame.get_pixel(269, top), &black);
    assert_eq!(frame.get_pixel(370, top), &black);
}

#[test]
fn caption_wider_than_frame_is_clipped_when_drawn() {
    let caption = solid_caption(50, 6, 1);
    let mut frame = RgbImage::from_pixel(20, 20, Rgb([0, 0, 0]));
    caption.draw(&mut frame);

    assert_eq!(frame.get_pixel(0, 20 - BOTTOM_MARGIN - 1), &Rgb([255, 255, 0]));
    assert_eq!(frame.get_pixel(19, 20 - BOTTOM_MARGIN - 1), &Rgb([255, 255, 0]));
}
