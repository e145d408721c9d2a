use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

use giffer::{
    CaptionColor, CaptionOptions, ClipOptions, ClipReport, ClipRequest, DEFAULT_FRAME_STEP,
    FfmpegLogLevel, FontFace, GifferError, ProgressCallback, ProgressInfo,
};

const CLI_AFTER_HELP: &str = "Examples:\n  giffer -i input.mp4 -s 12.5 -e 15 -o clip.gif\n  giffer -i input.mp4 -s 0 -e 4 -o small.gif --max-dimension 320 --loops 3\n  giffer -i input.mp4 -s 60 -e 63 -o captioned.gif --subtitle \"nope\" --color yellow --font-face duplex";

/// Takes a video file, extracts the frames from start to end and saves them
/// as a GIF. The input's frame rate decides which frames are extracted.
#[derive(Debug, Parser)]
#[command(name = "giffer", version, about, after_help = CLI_AFTER_HELP)]
struct Cli {
    /// The input video file.
    #[arg(short, long)]
    input: PathBuf,

    /// The starting time (in seconds) of the snippet.
    #[arg(short, long, allow_negative_numbers = true)]
    start: f64,

    /// The ending time (in seconds) of the snippet.
    #[arg(short, long, allow_negative_numbers = true)]
    end: f64,

    /// The name of the output file.
    #[arg(short, long)]
    output: PathBuf,

    /// The maximum dimension of the output file.
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    max_dimension: Option<u32>,

    /// The number of times the GIF should loop (0 loops forever).
    #[arg(short, long, default_value_t = 0)]
    loops: u16,

    /// Caption to burn into the bottom of every frame.
    #[arg(long, visible_alias = "st")]
    subtitle: Option<String>,

    /// Caption colour (red, orange, yellow, green, blue, purple, white, black, gray).
    #[arg(short, long, default_value = "white")]
    color: String,

    /// Caption stroke width in pixels.
    #[arg(long, visible_alias = "lw", default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..))]
    line_width: u32,

    /// Maximum caption height in pixels.
    #[arg(short, long, default_value_t = 15, value_parser = clap::value_parser!(u32).range(1..))]
    text_size: u32,

    /// Caption font (simplex, plain, duplex, complex, triplex, complex_small,
    /// script_simplex, script_complex).
    #[arg(short, long, default_value = "simplex")]
    font_face: String,

    /// Font file to use for the caption instead of an installed font.
    #[arg(long)]
    font_file: Option<PathBuf>,

    /// Keep every Nth source frame.
    #[arg(long, default_value_t = DEFAULT_FRAME_STEP, value_parser = clap::value_parser!(u64).range(1..))]
    frame_step: u64,

    /// Show each frame for this many hundredths of a second instead of the
    /// clip duration.
    #[arg(long)]
    frame_delay: Option<u16>,

    /// Show additional logging output.
    #[arg(short, long)]
    verbose: bool,

    /// Show a progress bar while encoding.
    #[arg(long)]
    progress: bool,

    /// FFmpeg log level (quiet, fatal, error, warning, info, debug).
    #[arg(long, default_value = "error")]
    ffmpeg_log_level: FfmpegLogLevel,

    /// Print a JSON summary instead of a status line.
    #[arg(long)]
    json: bool,
}

struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new(0);
        let style =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
        bar.set_style(style.progress_chars("##-"));
        Ok(Self { bar })
    }
}

impl ProgressCallback for BarProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.bar.set_length(info.total);
        self.bar.set_position(info.current);
        self.bar.set_message(format!("frame {}", info.current_frame));
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

/// Turn the parsed arguments into a request. Colour and font names are
/// checked here, before anything touches the input or output files.
fn build_request(cli: &Cli) -> Result<ClipRequest, GifferError> {
    let color: CaptionColor = cli.color.parse()?;
    let font_face: FontFace = cli.font_face.parse()?;

    let mut options = ClipOptions::new()
        .with_loops(cli.loops)
        .with_frame_step(cli.frame_step);
    if let Some(max_dimension) = cli.max_dimension {
        options = options.with_max_dimension(max_dimension);
    }
    if let Some(frame_delay) = cli.frame_delay {
        options = options.with_frame_delay(frame_delay);
    }
    if let Some(text) = &cli.subtitle {
        let mut caption = CaptionOptions::new(text.as_str())
            .with_color(color)
            .with_stroke_width(cli.line_width)
            .with_text_height(cli.text_size)
            .with_font_face(font_face);
        if let Some(font_file) = &cli.font_file {
            caption = caption.with_font_file(font_file);
        }
        options = options.with_caption(caption);
    }

    let request =
        ClipRequest::new(&cli.input, cli.start, cli.end, &cli.output).with_options(options);
    request.validate()?;
    Ok(request)
}

fn print_report(report: &ClipReport, as_json: bool) {
    if as_json {
        let summary = json!({
            "output": report.output.display().to_string(),
            "start_frame": report.range.start_frame,
            "end_frame": report.range.end_frame,
            "frame_step": report.frame_step,
            "frames": report.frames_written,
            "width": report.dimensions.width,
            "height": report.dimensions.height,
            "native_width": report.native.width,
            "native_height": report.native.height,
            "loops": report.loops,
            "frame_delay_cs": report.frame_delay,
            "caption_scale": report.caption_scale,
        });
        println!("{summary}");
        return;
    }

    println!(
        "{} {}",
        "success:".green().bold(),
        format!(
            "Wrote {} frame(s) at {} to {}",
            report.frames_written,
            report.dimensions,
            report.output.display()
        )
        .green()
    );
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    cli.ffmpeg_log_level.apply();

    let mut request = build_request(&cli)?;

    let bar = if cli.progress {
        let progress = Arc::new(BarProgress::new()?);
        request.options = request.options.with_progress(progress.clone());
        Some(progress)
    } else {
        None
    };

    let report = request.run()?;

    if let Some(progress) = bar {
        progress.bar.finish_with_message("done");
    }
    print_report(&report, cli.json);
    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
