use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use subtitle_align::{
    compute_report, format_slides_with_text, match_slides_to_segments, parse_slide_timestamps,
    parse_slides_with_text, parse_srt, retime_slides, to_srt, AlignerConfig, AlignmentInput,
    AsrWord, MatchStrategy, Meta, SubtitleAlignerBuilder,
};
use tracing_subscriber::filter::LevelFilter;

#[path = "align_subtitles/json_report_formatter.rs"]
mod json_report_formatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyChoice {
    Global,
    Windowed,
}

impl From<StrategyChoice> for MatchStrategy {
    fn from(choice: StrategyChoice) -> Self {
        match choice {
            StrategyChoice::Global => MatchStrategy::Global,
            StrategyChoice::Windowed => MatchStrategy::Windowed,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "align_subtitles")]
#[command(about = "Time script text against ASR word timings and emit subtitles")]
struct Args {
    /// JSON aligner config; missing fields take their defaults.
    #[arg(long, env = "SUBTITLE_ALIGN_CONFIG", global = true)]
    config: Option<PathBuf>,
    #[arg(long, env = "SUBTITLE_ALIGN_MAX_CHARS", global = true)]
    max_chars: Option<usize>,
    #[arg(long, env = "SUBTITLE_ALIGN_STRATEGY", value_enum, global = true)]
    strategy: Option<StrategyChoice>,
    /// Log level for stderr output (error, warn, info, debug, trace, off).
    #[arg(long, env = "SUBTITLE_ALIGN_LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Align a script against ASR words and write SRT.
    Srt {
        /// Script file, or the script text itself when no such file exists.
        #[arg(long)]
        script: String,
        /// JSON array of `{word, start, end}` objects.
        #[arg(long)]
        words: PathBuf,
        /// Audio length in seconds, used only when the word list is empty.
        #[arg(long)]
        duration: Option<f64>,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Attach subtitle text to slide boundaries.
    MatchSlides {
        #[arg(long)]
        timestamps: PathBuf,
        #[arg(long)]
        srt: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Re-time slides against the ASR words of new audio.
    RetimeSlides {
        #[arg(long)]
        slides: PathBuf,
        #[arg(long)]
        words: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() {
    let args = Args::parse();
    if let Err(err) = tracing_init(&args.log_level).and_then(|()| run(&args)) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn tracing_init(log_level: &str) -> Result<(), String> {
    let filter = LevelFilter::from_str(log_level)
        .map_err(|err| format!("Invalid --log-level '{log_level}': {err}"))?;
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_max_level(filter)
        .init();
    Ok(())
}

fn run(args: &Args) -> Result<(), String> {
    let config = load_config(args)?;

    match &args.command {
        Command::Srt {
            script,
            words,
            duration,
            out,
            report,
        } => {
            let script = read_script(script)?;
            let words = read_words(words)?;
            let strategy = config.strategy;
            let max_chars = config.max_chars;
            let min_duration = config.min_duration_secs;
            let low_confidence = config.low_confidence_ratio;
            let aligner = SubtitleAlignerBuilder::new(config)
                .build()
                .map_err(|err| err.to_string())?;

            let output = aligner
                .align(&AlignmentInput {
                    script,
                    words,
                    total_duration: *duration,
                })
                .map_err(|err| err.to_string())?;
            tracing::info!(
                segments = output.segments.len(),
                strategy = strategy.as_str(),
                "aligned script"
            );
            write_text(out.as_deref(), &to_srt(&output.segments))?;

            if let Some(report_path) = report {
                let mut alignment_report = compute_report(&output, min_duration, low_confidence);
                alignment_report.meta = Some(Meta {
                    generated_at: Utc::now().to_rfc3339(),
                    strategy: strategy.as_str().to_string(),
                    max_chars,
                });
                json_report_formatter::write_json(report_path, &alignment_report, "report")?;
                tracing::info!(path = %report_path.display(), "wrote alignment report");
            }
        }
        Command::MatchSlides {
            timestamps,
            srt,
            out,
        } => {
            let slides = parse_slide_timestamps(&read_file(timestamps)?)
                .map_err(|err| err.to_string())?;
            let segments = parse_srt(&read_file(srt)?);
            let matched = match_slides_to_segments(&slides, &segments);
            tracing::info!(
                slides = matched.len(),
                segments = segments.len(),
                "matched slides to subtitles"
            );
            write_text(out.as_deref(), &format_slides_with_text(&matched))?;
        }
        Command::RetimeSlides { slides, words, out } => {
            let slides = parse_slides_with_text(&read_file(slides)?);
            let words = read_words(words)?;
            let retimed = retime_slides(&slides, &words, &config.scoring);
            write_text(out.as_deref(), &format_slides_with_text(&retimed))?;
        }
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<AlignerConfig, String> {
    let mut config = match &args.config {
        Some(path) => AlignerConfig::load(path).map_err(|err| err.to_string())?,
        None => AlignerConfig::default(),
    };
    if let Some(max_chars) = args.max_chars {
        config.max_chars = max_chars;
    }
    if let Some(strategy) = args.strategy {
        config.strategy = strategy.into();
    }
    Ok(config)
}

fn read_file(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|err| format!("Failed to read '{}': {err}", path.display()))
}

fn read_script(script: &str) -> Result<String, String> {
    let path = Path::new(script);
    if path.is_file() {
        read_file(path)
    } else {
        Ok(script.to_string())
    }
}

fn read_words(path: &Path) -> Result<Vec<AsrWord>, String> {
    let data = read_file(path)?;
    serde_json::from_str(&data)
        .map_err(|err| format!("Failed to parse ASR words '{}': {err}", path.display()))
}

/// Writes to `path`, or stdout when no path is given.
fn write_text(path: Option<&Path>, content: &str) -> Result<(), String> {
    match path {
        Some(path) => {
            fs::write(path, content)
                .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote output");
            Ok(())
        }
        None => {
            print!("{content}");
            Ok(())
        }
    }
}
