//! Replays JSON-lines hand frames through the gesture pipeline and
//! forwards validated commands over OSC.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};

use gesture_pilot::config::Config;
use gesture_pilot::ingest::FrameReader;
use gesture_pilot::osc::CommandClient;
use gesture_pilot::tracker::{HandReport, HandTracker};

#[derive(Parser, Debug)]
#[command(name = "gesture_pilot", about = "Hand gesture to drone command pipeline")]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// JSON-lines input file (stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Do not send OSC messages
    #[arg(long)]
    no_osc: bool,
}

fn open_input(path: Option<&PathBuf>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(p) => {
            let file = File::open(p).with_context(|| format!("failed to open {}", p.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

fn emit(report: &HandReport, osc: Option<&CommandClient>) {
    debug!(
        "{} raw={} ({:.2}) smoothed={} ({:.2}) {}/{}",
        report.handedness,
        report.raw.gesture,
        report.raw.confidence,
        report.smoothed.gesture,
        report.smoothed.confidence,
        report.progress.frames,
        report.progress.required,
    );

    if let Some(osc) = osc {
        if let Err(e) = osc.send_report(report) {
            warn!("OSC send failed: {:#}", e);
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, load_err) = Config::load_or_default(&cli.config);

    let log_path = gesture_pilot::logging::init(&config.log, "gesture_pilot=info")?;

    info!("gesture_pilot v{}", env!("CARGO_PKG_VERSION"));
    if let Some(e) = load_err {
        warn!("{:#}; using defaults", e);
    }
    if let Some(path) = &log_path {
        info!("Log: {}", path.display());
    }

    let osc = if config.osc.enabled && !cli.no_osc {
        info!("OSC target: {}", config.osc.addr);
        Some(CommandClient::new(&config.osc.addr)?)
    } else {
        info!("OSC disabled");
        None
    };

    let input = open_input(cli.input.as_ref())?;
    let mut tracker = HandTracker::from_config(&config);
    let mut frames = 0usize;
    let mut skipped = 0usize;
    let mut commands = 0usize;

    for (line_no, frame) in FrameReader::new(input) {
        let frame = match frame {
            Ok(f) => f,
            Err(e) => {
                warn!("skipping line {}: {:#}", line_no, e);
                skipped += 1;
                continue;
            }
        };
        frames += 1;

        for report in tracker.process_frame(&frame.hands) {
            if let Some(cmd) = &report.command {
                commands += 1;
                info!(
                    "[{} ms] {} {} -> {} (confidence {:.2}){}",
                    frame.timestamp_ms,
                    report.handedness,
                    cmd.gesture,
                    cmd.text,
                    cmd.confidence,
                    if cmd.critical { " CRITICAL" } else { "" },
                );
            }
            emit(&report, osc.as_ref());
        }
    }

    info!("{} frames, {} commands, {} lines skipped", frames, commands, skipped);
    Ok(())
}
