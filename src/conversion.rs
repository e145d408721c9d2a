//! Internal conversion helpers.
//!
//! Moving pixels between FFmpeg frames and packed buffers, and mapping
//! between frame numbers and stream timestamps.
//!
//! Frame numbers count from the first frame of the stream, whatever its
//! timestamp. Containers such as MPEG-TS start their clocks well above zero,
//! so every conversion here is taken relative to the stream's start.

use ffmpeg_next::{Rational, frame::Video as VideoFrame};

/// FFmpeg's `AV_NOPTS_VALUE`: a timestamp that was never set.
pub(crate) const NO_TIMESTAMP: i64 = i64::MIN;

/// Microseconds per second (`AV_TIME_BASE`), the unit of container seeks.
const MICROSECONDS: f64 = 1_000_000.0;

/// Pack plane 0 of `video_frame` into a `width × height` buffer with no row
/// padding.
pub(crate) fn frame_to_buffer(
    video_frame: &VideoFrame,
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
) -> Vec<u8> {
    let packed_row = width as usize * bytes_per_pixel;
    let rows = height as usize;
    video_frame
        .data(0)
        .chunks(video_frame.stride(0).max(packed_row))
        .take(rows)
        .flat_map(|row| &row[..packed_row])
        .copied()
        .collect()
}

/// Write a packed `width × height` buffer into plane 0 of `video_frame`.
pub(crate) fn buffer_to_frame(
    buffer: &[u8],
    video_frame: &mut VideoFrame,
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
) {
    let packed_row = width as usize * bytes_per_pixel;
    let stride = video_frame.stride(0).max(packed_row);
    let plane = video_frame.data_mut(0);

    for (source, target) in buffer
        .chunks_exact(packed_row)
        .zip(plane.chunks_mut(stride))
        .take(height as usize)
    {
        target[..packed_row].copy_from_slice(source);
    }
}

/// Convert a time in seconds to a frame number: `floor(fps × seconds)`.
///
/// Negative products saturate to zero.
pub fn seconds_to_frame_number(seconds: f64, frames_per_second: f64) -> u64 {
    (seconds * frames_per_second).floor() as u64
}

/// The stream's first timestamp, or 0 if the container does not say.
pub(crate) fn stream_origin(start_time: i64) -> i64 {
    if start_time == NO_TIMESTAMP {
        0
    } else {
        start_time
    }
}

/// Container seek target (microseconds) for `frame_number`, where frame 0
/// sits at `origin` in `time_base` units.
pub(crate) fn seek_timestamp(
    frame_number: u64,
    frames_per_second: f64,
    origin: i64,
    time_base: Rational,
) -> i64 {
    let offset = frame_number as f64 / frames_per_second;
    let origin = origin as f64 * f64::from(time_base);
    ((origin + offset) * MICROSECONDS).round() as i64
}

/// Frame number of a decoded frame.
///
/// Frames with a timestamp are placed by their distance from `origin`,
/// rounded to the nearest frame so timestamps a hair below a boundary (common
/// with 1001-based rates) land on the right index. Frames without one are
/// taken to be `expected`, the frame after the previous one.
pub(crate) fn decoded_frame_number(
    timestamp: Option<i64>,
    origin: i64,
    time_base: Rational,
    frames_per_second: f64,
    expected: u64,
) -> u64 {
    match timestamp {
        Some(timestamp) if timestamp != NO_TIMESTAMP => {
            let ticks = timestamp.saturating_sub(origin) as f64;
            (ticks * f64::from(time_base) * frames_per_second)
                .round()
                .max(0.0) as u64
        }
        _ => expected,
    }
}
