//! End-to-end alignment run.
//!
//! Fully sequential: normalize the transcript, write the label file and
//! merged dictionary, stage the audio, invoke the external engine, parse
//! its phone output, reconstruct word alignments, render. All per-run
//! state lives in values created here and passed between stages, so
//! repeated runs in one process are safe.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::audio;
use crate::engine::{AlignRequest, AlignmentEngine};
use crate::label::{reader, writer};
use crate::output::{json, textgrid};
use crate::reconstruct::{self, PAUSE_LABEL};
use crate::transcript::dictionary::{self, Dictionary};
use crate::transcript::normalize::normalize;
use crate::transcript::pronounce::Pronounce;
use crate::transcript::read_transcript;
use crate::types::WordAlignment;

/// Configuration for one alignment run, owned by the caller (CLI).
#[derive(Debug, Clone)]
pub struct AlignOptions {
    /// Force a specific acoustic-model sample rate
    pub sample_rate_override: Option<u32>,
    /// Start of the portion of the audio to align, in seconds
    pub start: f64,
    /// End of the portion of the audio to align, in seconds
    pub end: Option<f64>,
    /// Write structured JSON output
    pub json: bool,
    /// Write Praat TextGrid output
    pub textgrid: bool,
    /// Include per-phone detail in the JSON output
    pub phonemes: bool,
    /// Insert optional breath tokens between words
    pub breaths: bool,
    /// Local override dictionary merged over the base dictionary
    pub local_dictionary: Option<PathBuf>,
}

impl Default for AlignOptions {
    fn default() -> Self {
        Self {
            sample_rate_override: None,
            start: 0.0,
            end: None,
            json: true,
            textgrid: false,
            phonemes: false,
            breaths: false,
            local_dictionary: Some(PathBuf::from("dict.local")),
        }
    }
}

/// Align a transcript against a recording and write the selected outputs.
///
/// `base_dictionary` is the aligner's pronouncing dictionary;
/// `engine` performs the actual forced alignment. Returns the
/// reconstructed alignments, which are also rendered to `outfile`.
pub fn do_alignment(
    wavfile: &Path,
    trsfile: &Path,
    outfile: &Path,
    base_dictionary: &Path,
    engine: &dyn AlignmentEngine,
    pronouncer: &dyn Pronounce,
    opts: &AlignOptions,
) -> Result<Vec<WordAlignment>> {
    if let Some(rate) = opts.sample_rate_override {
        audio::validate_sample_rate(rate)?;
    }

    let work = tempfile::tempdir().context("Failed to create working directory")?;
    let work_dir = work.path();

    let lines = read_transcript(trsfile)?;
    log::info!("Read {} transcript lines from {}", lines.len(), trsfile.display());

    let mut dict = Dictionary::load(base_dictionary)?;
    if let Some(local) = &opts.local_dictionary {
        if local.exists() {
            let text = fs::read_to_string(local)
                .with_context(|| format!("Failed to read local dictionary: {}", local.display()))?;
            dict.add_text(&text);
        }
    }

    let between: Vec<String> = if opts.breaths {
        vec![PAUSE_LABEL.to_string(), "{BR}".to_string()]
    } else {
        vec![PAUSE_LABEL.to_string()]
    };

    let normalized = normalize(&lines, &dict, pronouncer, Some(PAUSE_LABEL), &between)?;
    log::info!(
        "Normalized {} tokens, {} words, {} new pronunciations",
        normalized.tokens.len(),
        normalized.metadata.len(),
        normalized.new_pronunciations.len()
    );

    let label_file = work_dir.join("tmp.mlf");
    writer::write_label_file(&label_file, &normalized.tokens)?;

    let generated_dict = work_dir.join("dict.tmp");
    dictionary::write_generated(&generated_dict, &normalized.new_pronunciations)?;

    let merged_dict = work_dir.join("dict");
    dictionary::write_merged(
        base_dictionary,
        opts.local_dictionary.as_deref(),
        &generated_dict,
        &merged_dict,
    )?;

    let staged_wav = work_dir.join("sound.wav");
    let sample_rate = audio::prepare_audio(
        wavfile,
        &staged_wav,
        opts.sample_rate_override,
        opts.start,
        opts.end,
    )?;

    let aligned_mlf = work_dir.join("aligned.mlf");
    engine.align(&AlignRequest {
        work_dir,
        wav: &staged_wav,
        label_file: &label_file,
        dictionary: &merged_dict,
        output: &aligned_mlf,
        sample_rate,
    })?;

    let segments = reader::read_phone_alignment(&aligned_mlf, sample_rate, opts.start)?;
    let include_phones = opts.phonemes || opts.textgrid;
    let alignments = reconstruct::reconstruct(&segments, &normalized.metadata, include_phones)?;

    if opts.json {
        let rendered = if opts.phonemes {
            alignments.clone()
        } else {
            alignments
                .iter()
                .cloned()
                .map(|mut wa| {
                    wa.phones = None;
                    wa
                })
                .collect()
        };
        json::write_json(outfile, &rendered)?;
    }
    if opts.textgrid {
        textgrid::write_textgrid(outfile, &alignments)?;
    }

    Ok(alignments)
}
