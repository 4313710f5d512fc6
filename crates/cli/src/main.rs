//! Wordalign CLI — forced alignment of transcripts against audio.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use wordalign_core::{do_alignment, AlignOptions, HtkEngine, RulePronouncer};

#[derive(Parser, Debug)]
#[command(
    name = "wordalign",
    about = "Align a transcript against a recording, producing word-level timestamps",
    version,
)]
struct Cli {
    /// Input WAV file
    wavfile: PathBuf,

    /// Transcript: plain text lines, or a .json dialog document
    trsfile: PathBuf,

    /// Output file (JSON or TextGrid)
    outfile: PathBuf,

    /// Acoustic model directory
    #[arg(long, default_value = "model")]
    model_dir: PathBuf,

    /// Sample rate model to use, one of 8000, 11025, 16000
    #[arg(short = 'r', long)]
    samplerate: Option<u32>,

    /// Start of the portion of the WAV to align, in seconds
    #[arg(short = 's', long, default_value_t = 0.0)]
    start: f64,

    /// End of the portion of the WAV to align, in seconds (default: end)
    #[arg(short = 'e', long)]
    end: Option<f64>,

    /// Export JSON alignment [use --no-json to disable]
    #[arg(long, default_value_t = true)]
    json: bool,

    /// Disable JSON export
    #[arg(long, overrides_with = "json")]
    no_json: bool,

    /// Export Praat TextGrid alignment
    #[arg(long, default_value_t = false)]
    textgrid: bool,

    /// Add phoneme information to the JSON output
    #[arg(long, default_value_t = false)]
    phonemes: bool,

    /// Detect breaths in speech
    #[arg(long, default_value_t = false)]
    breaths: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let opts = AlignOptions {
        sample_rate_override: cli.samplerate,
        start: cli.start,
        end: cli.end,
        json: cli.json && !cli.no_json,
        textgrid: cli.textgrid,
        phonemes: cli.phonemes,
        breaths: cli.breaths,
        ..AlignOptions::default()
    };

    let engine = HtkEngine::new(&cli.model_dir);
    let base_dictionary = cli.model_dir.join("dict");

    let alignments = do_alignment(
        &cli.wavfile,
        &cli.trsfile,
        &cli.outfile,
        &base_dictionary,
        &engine,
        &RulePronouncer,
        &opts,
    )?;

    log::info!(
        "Aligned {} words -> {}",
        alignments.iter().filter(|w| w.word.is_some()).count(),
        cli.outfile.display()
    );
    Ok(())
}
