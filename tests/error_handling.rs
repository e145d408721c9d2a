//! Error handling integration tests.
//!
//! These tests check that opening bad inputs yields the right error and that
//! no GIF is left behind when a clip fails.

use std::path::Path;

use giffer::{ClipOptions, ClipRequest, GifferError, VideoSource};

#[test]
fn open_nonexistent_file() {
    let result = VideoSource::open("this_file_does_not_exist.mp4");
    let error = result.unwrap_err();

    assert!(matches!(error, GifferError::FileOpen { .. }));
    let message = error.to_string();
    assert!(
        message.contains("Unable to open the input file"),
        "Error message should mention the input file: {message}",
    );
}

#[test]
fn open_invalid_file() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let invalid_file_path = temporary_directory.path().join("invalid.mp4");
    std::fs::write(&invalid_file_path, b"this is not a media file")
        .expect("Failed to write invalid file");

    let result = VideoSource::open(&invalid_file_path);
    assert!(result.is_err(), "Expected error for invalid media file");
}

#[test]
fn failed_run_leaves_no_output() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let output = temporary_directory.path().join("out.gif");

    let result = ClipRequest::new("this_file_does_not_exist.mp4", 0.0, 1.0, &output).run();

    assert!(matches!(result, Err(GifferError::FileOpen { .. })));
    assert!(!output.exists());
}

#[test]
fn validation_happens_before_open() {
    let request = ClipRequest::new("this_file_does_not_exist.mp4", 2.0, 1.0, "out.gif");
    assert!(matches!(request.run(), Err(GifferError::InvalidRange { .. })));

    let request = ClipRequest::new("this_file_does_not_exist.mp4", 0.0, 1.0, "out.gif")
        .with_options(ClipOptions::new().with_frame_step(0));
    assert!(matches!(request.run(), Err(GifferError::InvalidFrameStep)));
}

#[test]
fn upscale_request_on_real_video() {
    let path = "tests/fixtures/sample_video.mp4";
    if !Path::new(path).exists() {
        return;
    }

    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let output = temporary_directory.path().join("big.gif");
    let result = ClipRequest::new(path, 0.0, 1.0, &output)
        .with_options(ClipOptions::new().with_max_dimension(100_000))
        .run();

    assert!(matches!(result, Err(GifferError::UpscaleNotSupported { .. })));
    assert!(!output.exists());
}

#[test]
fn window_beyond_video_end() {
    let path = "tests/fixtures/sample_video.mp4";
    if !Path::new(path).exists() {
        return;
    }

    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let output = temporary_directory.path().join("late.gif");
    // An hour is far beyond the fixture's length.
    let result = ClipRequest::new(path, 3600.0, 3601.0, &output).run();

    assert!(matches!(
        result,
        Err(GifferError::FrameRead { .. } | GifferError::FfmpegError(_))
    ));
    assert!(!output.exists());
}
