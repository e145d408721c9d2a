//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use giffer::{FrameSource, GifferError};
use image::{Rgb, RgbImage};

/// An in-memory video: `total_frames` solid-colour frames at `fps`.
pub struct SyntheticSource {
    pub path: PathBuf,
    pub fps: f64,
    pub total_frames: u64,
    pub width: u32,
    pub height: u32,
    /// Reads of this frame index return an error (the frame is consumed).
    pub corrupt_frame: Option<u64>,
    /// Every frame index handed out or failed, in order.
    pub reads: Vec<u64>,
    next: u64,
}

impl SyntheticSource {
    pub fn new(fps: f64, seconds: f64, width: u32, height: u32) -> Self {
        Self {
            path: PathBuf::from("synthetic.mp4"),
            fps,
            total_frames: (fps * seconds) as u64,
            width,
            height,
            corrupt_frame: None,
            reads: Vec::new(),
            next: 0,
        }
    }

    /// The ten-second 30 fps 640×480 source used throughout the tests.
    pub fn standard() -> Self {
        Self::new(30.0, 10.0, 640, 480)
    }
}

impl FrameSource for SyntheticSource {
    fn path(&self) -> &Path {
        &self.path
    }

    fn frames_per_second(&self) -> f64 {
        self.fps
    }

    fn seek(&mut self, frame_number: u64) -> Result<(), GifferError> {
        self.next = frame_number;
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Option<RgbImage>, GifferError> {
        let index = self.next;
        if index >= self.total_frames {
            return Ok(None);
        }
        self.next += 1;
        self.reads.push(index);

        if self.corrupt_frame == Some(index) {
            return Err(GifferError::VideoDecodeError(format!("corrupt frame {index}")));
        }

        let shade = (index % 256) as u8;
        Ok(Some(RgbImage::from_pixel(
            self.width,
            self.height,
            Rgb([shade, 255 - shade, 64]),
        )))
    }
}

/// Structural summary of a decoded GIF.
#[derive(Debug, PartialEq)]
pub struct GifSummary {
    pub width: u16,
    pub height: u16,
    pub repeat: gif::Repeat,
    pub delays: Vec<u16>,
    pub frames: Vec<Vec<u8>>,
}

impl GifSummary {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

/// Decode every frame of the GIF at `path` to RGBA.
pub fn read_gif(path: &Path) -> GifSummary {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::RGBA);
    let file = File::open(path).expect("open GIF");
    let mut decoder = options.read_info(file).expect("read GIF header");

    let width = decoder.width();
    let height = decoder.height();
    let mut delays = Vec::new();
    let mut frames = Vec::new();
    while let Some(frame) = decoder.read_next_frame().expect("decode GIF frame") {
        delays.push(frame.delay);
        frames.push(frame.buffer.to_vec());
    }

    GifSummary {
        width,
        height,
        repeat: decoder.repeat(),
        delays,
        frames,
    }
}

/// A path to a fixture video, or `None` if it has not been generated.
pub fn fixture(name: &str) -> Option<PathBuf> {
    let path = Path::new("tests/fixtures").join(name);
    path.exists().then_some(path)
}
