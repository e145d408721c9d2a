//! FFmpeg console verbosity.
//!
//! FFmpeg prints its own warnings straight to stderr, independent of the
//! `log` facade the rest of the crate uses. Damaged or unusual inputs can make
//! it very chatty, which drowns out the one-line error the CLI is supposed to
//! print, so callers pick a level here before opening a video.

use std::{fmt, str::FromStr};

use ffmpeg_next::util::log::Level;

/// FFmpeg internal log verbosity, from silent to most verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FfmpegLogLevel {
    /// Print nothing.
    Quiet,
    /// Only unrecoverable errors.
    Fatal,
    /// Recoverable errors. This is the default for `giffer`.
    #[default]
    Error,
    /// Warnings (FFmpeg's own default).
    Warning,
    /// Informational messages.
    Info,
    /// Debugging output.
    Debug,
}

impl FfmpegLogLevel {
    /// Every level, in the order accepted on the command line.
    pub const ALL: [FfmpegLogLevel; 6] = [
        FfmpegLogLevel::Quiet,
        FfmpegLogLevel::Fatal,
        FfmpegLogLevel::Error,
        FfmpegLogLevel::Warning,
        FfmpegLogLevel::Info,
        FfmpegLogLevel::Debug,
    ];

    /// The lowercase name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            FfmpegLogLevel::Quiet => "quiet",
            FfmpegLogLevel::Fatal => "fatal",
            FfmpegLogLevel::Error => "error",
            FfmpegLogLevel::Warning => "warning",
            FfmpegLogLevel::Info => "info",
            FfmpegLogLevel::Debug => "debug",
        }
    }

    /// Install this level as FFmpeg's process-wide log level.
    pub fn apply(self) {
        let level = match self {
            FfmpegLogLevel::Quiet => Level::Quiet,
            FfmpegLogLevel::Fatal => Level::Fatal,
            FfmpegLogLevel::Error => Level::Error,
            FfmpegLogLevel::Warning => Level::Warning,
            FfmpegLogLevel::Info => Level::Info,
            FfmpegLogLevel::Debug => Level::Debug,
        };
        ffmpeg_next::util::log::set_level(level);
    }
}

impl fmt::Display for FfmpegLogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FfmpegLogLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        let alias = match normalized.as_str() {
            "warn" => "warning",
            "silent" | "off" => "quiet",
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|level| level.name() == alias)
            .ok_or_else(|| format!("unknown FFmpeg log level '{value}'"))
    }
}
