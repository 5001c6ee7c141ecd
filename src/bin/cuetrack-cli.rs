use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process::ExitCode;

use anyhow::{Context, Result, ensure};
use clap::{Parser, Subcommand};

use cuetrack::{
    IngestPolicy, Opts, OutputType, SimulatedMedia, SyncController, SyncOutcome, Transcription,
};

fn main() -> Result<ExitCode> {
    cuetrack::init_logging();
    let params = Params::parse();
    let opts = Opts {
        ingest: params.ingest,
        output_type: match &params.command {
            Command::Export { output_type } => *output_type,
            _ => OutputType::default(),
        },
    };
    let transcript = load(&params.transcript_path, &opts)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match params.command {
        Command::Active { at } => {
            if let Some(seg) = transcript.active_at(at) {
                print_segment(&mut out, seg)?;
            }
        }
        Command::Search { query } => {
            for seg in transcript.search(&query) {
                print_segment(&mut out, seg)?;
            }
        }
        Command::Export { .. } => {
            cuetrack::export(&transcript, out, opts.output_type)?;
        }
        Command::Check => {
            let issues = transcript.issues();
            for issue in &issues {
                writeln!(out, "{issue}")?;
            }
            if !issues.is_empty() {
                return Ok(ExitCode::FAILURE);
            }
            writeln!(out, "ok: {} segments", transcript.len())?;
        }
        Command::Replay { step } => replay(transcript, step, &mut out)?,
    }

    Ok(ExitCode::SUCCESS)
}

#[derive(Parser, Debug)]
#[command(name = "cuetrack")]
#[command(about = "Inspect, search, and export video transcripts")]
struct Params {
    /// Transcription payload (JSON array of segments, or an object with a `segments` array).
    #[arg(short = 't', long = "transcript")]
    transcript_path: String,

    #[arg(long = "ingest", value_enum, default_value_t = IngestPolicy::Lenient)]
    ingest: IngestPolicy,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the segment active at a playback time.
    Active {
        /// Playback position in seconds.
        #[arg(long = "at")]
        at: f64,
    },

    /// Print segments whose text contains the query (case-insensitive).
    Search { query: String },

    /// Write the transcript as captions to stdout.
    Export {
        #[arg(
            short = 'o',
            long = "output-type",
            value_enum,
            default_value_t = OutputType::Vtt
        )]
        output_type: OutputType,
    },

    /// Report malformed segments; exits non-zero if any are found.
    Check,

    /// Simulate playback and print every scroll the sync controller requests.
    Replay {
        /// Seconds between simulated time updates.
        #[arg(long = "step", default_value_t = 0.25)]
        step: f64,
    },
}

fn load(path: &str, opts: &Opts) -> Result<Transcription> {
    let file = File::open(path).with_context(|| format!("failed to open transcript '{path}'"))?;
    let transcript = Transcription::from_json(BufReader::new(file), opts.ingest)
        .with_context(|| format!("failed to load transcript '{path}'"))?;
    Ok(transcript)
}

fn print_segment(out: &mut impl Write, seg: &cuetrack::Segment) -> Result<()> {
    writeln!(
        out,
        "{}\t{:.3}\t{:.3}\t{}",
        seg.id, seg.start_seconds, seg.end_seconds, seg.text
    )?;
    Ok(())
}

fn replay(transcript: Transcription, step: f64, out: &mut impl Write) -> Result<()> {
    ensure!(step > 0.0 && step.is_finite(), "step must be a positive number of seconds");

    let duration = transcript
        .segments()
        .iter()
        .map(|s| s.end_seconds)
        .fold(0.0, f64::max);

    let mut controller = SyncController::new(Some(SimulatedMedia::new()), |_: &str| {});
    controller.mount(Some(transcript));

    let mut tick: u64 = 0;
    loop {
        let time = tick as f64 * step;
        if time > duration {
            break;
        }
        tick += 1;

        let Some(kind) = controller.media_mut().and_then(|m| m.advance_to(time)) else {
            continue;
        };
        match controller.handle(kind) {
            SyncOutcome::Activated { segment_id } => {
                writeln!(out, "{time:.3}\tscroll\t{segment_id}")?;
            }
            SyncOutcome::Cleared => writeln!(out, "{time:.3}\tclear")?,
            SyncOutcome::Unchanged | SyncOutcome::Ignored => {}
        }
    }

    Ok(())
}
