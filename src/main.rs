//! blinkear CLI
//!
//! Usage:
//!   blinkear --frame '[{"x":..,"y":..}, ...]'   # Single frame
//!   blinkear --ears 0.3,0.3,0.5                 # Replay average EAR values
//!   blinkear --interactive                      # One frame JSON per stdin line
//!   blinkear --serve                            # HTTP API server
//!   blinkear --frame '...' --json               # JSON output

use clap::Parser;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use blinkear::core::{run_server, FrameAnalyzer};
use blinkear::logging::{init_tracing, LogConfig};
use blinkear::types::{FrameInput, FrameOutput, TrackerConfig};
use blinkear::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "blinkear",
    version = VERSION,
    about = "Detect blinks from facial landmarks using the eye aspect ratio",
    long_about = "blinkear computes the eye aspect ratio (EAR) of both eyes from a\n\
                  468-point face mesh and smooths it over consecutive frames.\n\n\
                  A blink is confirmed when at least --min-frames frames fall in\n\
                  the partial-closure band [ear-low, ear-high) and the next frame\n\
                  leaves it.\n\n\
                  Modes:\n  \
                  --frame        Evaluate one frame of keypoints\n  \
                  --ears         Replay a comma-separated list of average EARs\n  \
                  --interactive  Read one frame JSON per line from stdin\n  \
                  --serve        HTTP API server mode"
)]
struct Args {
    /// Keypoint frame as JSON (array of {x, y} or {"keypoints": [...]})
    #[arg(short, long)]
    frame: Option<String>,

    /// Comma-separated average EAR values to replay
    #[arg(short, long, value_delimiter = ',')]
    ears: Option<Vec<f64>>,

    /// Interactive mode - read frames from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Tracker config file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override lower band bound
    #[arg(long)]
    ear_low: Option<f64>,

    /// Override upper band bound
    #[arg(long)]
    ear_high: Option<f64>,

    /// Override band frames needed to confirm a blink
    #[arg(long)]
    min_frames: Option<u32>,

    /// Clear the band counter when a blink is confirmed
    #[arg(long)]
    reset_on_confirm: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Show per-eye breakdown
    #[arg(long)]
    verbose: bool,

    /// Log filter when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    fn tracker_config(&self) -> Result<TrackerConfig, blinkear::types::ConfigError> {
        let mut config = match &self.config {
            Some(path) => TrackerConfig::load(path)?,
            None => TrackerConfig::default(),
        };
        if let Some(low) = self.ear_low {
            config.ear_low = low;
        }
        if let Some(high) = self.ear_high {
            config.ear_high = high;
        }
        if let Some(frames) = self.min_frames {
            config.min_consecutive_frames = frames;
        }
        if self.reset_on_confirm {
            config.reset_on_confirm = true;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }
    init_tracing(&LogConfig {
        log_level: args.log_level.clone(),
        ansi: !args.no_color,
    });

    let config = match args.tracker_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error [{}]: {}", e.code(), e);
            process::exit(2);
        }
    };

    if args.serve {
        run_serve(config, &args).await;
    } else if args.interactive {
        run_interactive(config, &args);
    } else if let Some(ref ears) = args.ears {
        run_replay(ears, config, &args);
    } else if let Some(ref frame) = args.frame {
        run_single(frame, config, &args);
    } else {
        // Default to interactive if no mode specified
        run_interactive(config, &args);
    }
}

fn new_analyzer(config: TrackerConfig) -> FrameAnalyzer {
    match FrameAnalyzer::with_config(config) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            eprintln!("Config error [{}]: {}", e.code(), e);
            process::exit(2);
        }
    }
}

/// Run single frame evaluation
fn run_single(frame: &str, config: TrackerConfig, args: &Args) {
    let mut analyzer = new_analyzer(config);

    let input: FrameInput = match serde_json::from_str(frame) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Invalid frame JSON: {}", e);
            process::exit(1);
        }
    };

    match analyzer.process(input.keypoints()) {
        Ok(output) => print_output(&output, args),
        Err(e) => {
            eprintln!("Frame rejected [{}]: {}", e.code(), e);
            process::exit(1);
        }
    }
}

/// Replay precomputed average EARs through one tracker
fn run_replay(ears: &[f64], config: TrackerConfig, args: &Args) {
    let mut analyzer = new_analyzer(config);
    for &ear in ears {
        let output = analyzer.process_ear(ear);
        print_output(&output, args);
    }
    if !args.json {
        print_summary(&analyzer);
    }
}

/// Run interactive mode
fn run_interactive(config: TrackerConfig, args: &Args) {
    let mut analyzer = new_analyzer(config);

    if !args.json {
        print_header(&analyzer);
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("{} failed to read stdin: {}", "⚠".yellow(), e);
                break;
            }
        };
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }
        if line.is_empty() {
            continue;
        }

        let input: FrameInput = match serde_json::from_str(line) {
            Ok(input) => input,
            Err(e) => {
                eprintln!("{} invalid frame JSON: {}", "⚠".yellow(), e);
                continue;
            }
        };

        match analyzer.process(input.keypoints()) {
            Ok(output) => print_output(&output, args),
            Err(e) => eprintln!("{} frame rejected [{}]: {}", "⚠".yellow(), e.code(), e),
        }
        if let Err(e) = stdout.flush() {
            eprintln!("{} failed to flush stdout: {}", "⚠".yellow(), e);
            break;
        }
    }

    if !args.json {
        print_summary(&analyzer);
    }
}

/// Print one frame result in the selected format
fn print_output(output: &FrameOutput, args: &Args) {
    if args.json {
        match serde_json::to_string(output) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize output: {}", e),
        }
    } else if args.verbose {
        print_verbose(output);
    } else if args.no_color {
        println!("{}", output.to_parseable_string());
    } else {
        println!("{}", output.to_terminal_string());
    }
}

/// Print header
fn print_header(analyzer: &FrameAnalyzer) {
    let config = analyzer.tracker().config();
    println!("{}", format!("blinkear v{} - Interactive Mode", VERSION).bold());
    println!(
        "Band [{:.2}, {:.2}), confirm after {} frame(s){}",
        config.ear_low,
        config.ear_high,
        config.min_consecutive_frames,
        if config.reset_on_confirm {
            ", reset on confirm"
        } else {
            ""
        }
    );
    println!(
        "Paste one frame JSON per line ({} keypoints minimum). Type 'quit' to exit.",
        analyzer.required_keypoints()
    );
    println!();
}

/// Print verbose output
fn print_verbose(output: &FrameOutput) {
    let fmt_ear = |ear: Option<f64>| match ear {
        Some(value) => format!("{:.4}", value),
        None => "-".to_string(),
    };
    println!("┌─────────────────────────────────────");
    println!("│ left EAR:  {}", fmt_ear(output.left_ear));
    println!("│ right EAR: {}", fmt_ear(output.right_ear));
    println!("│ avg EAR:   {:.4}", output.avg_ear);
    println!("├─────────────────────────────────────");
    println!(
        "│ Phase: {} | Count: {}",
        output.phase.to_string().color(output.phase.color()),
        output.consecutive_low_count
    );
    println!(
        "│ Blinking: {}",
        if output.blinking {
            "yes".green().bold()
        } else {
            "no".normal()
        }
    );
    println!("│ Reason: {}", output.reason);
    println!("└─────────────────────────────────────");
}

/// Print session summary
fn print_summary(analyzer: &FrameAnalyzer) {
    let tracker = analyzer.tracker();
    println!();
    println!(
        "Frames: {} | Blinks confirmed: {}",
        tracker.frames_processed(),
        tracker.blinks_confirmed()
    );
}

/// Run HTTP API server
async fn run_serve(config: TrackerConfig, args: &Args) {
    println!("{}", format!("blinkear v{} - API Server", VERSION).bold());
    println!();

    if let Err(e) = run_server(&args.addr, config).await {
        eprintln!("Server error: {}", e);
        process::exit(1);
    }
}
