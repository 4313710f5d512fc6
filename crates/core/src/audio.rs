//! Audio staging for the aligner.
//!
//! The acoustic models only exist for a few sample rates, so input audio
//! is resampled (and optionally trimmed) with sox when needed; otherwise
//! it is copied into the working directory unchanged.

use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};

use crate::error::AlignError;

/// Sample rates with acoustic models available.
pub const MODEL_SAMPLE_RATES: [u32; 3] = [8000, 11025, 16000];

/// Rate audio is resampled to when its native rate has no model.
pub const DEFAULT_RESAMPLE_RATE: u32 = 11025;

/// Check a user-supplied sample-rate override against the model set.
pub fn validate_sample_rate(rate: u32) -> Result<()> {
    if !MODEL_SAMPLE_RATES.contains(&rate) {
        return Err(AlignError::InvalidSampleRate {
            rate,
            supported: MODEL_SAMPLE_RATES.to_vec(),
        }
        .into());
    }
    Ok(())
}

/// Stage the input WAV for alignment and return the rate it ends up at.
///
/// Resamples via sox when the native rate has no acoustic model, when an
/// override asks for a different rate, or when a trim range is requested.
pub fn prepare_audio(
    orig: &Path,
    out: &Path,
    sr_override: Option<u32>,
    start: f64,
    end: Option<f64>,
) -> Result<u32> {
    let reader = hound::WavReader::open(orig)
        .with_context(|| format!("Failed to open WAV file: {}", orig.display()))?;
    let native_rate = reader.spec().sample_rate;
    drop(reader);

    let needs_trim = start != 0.0 || end.is_some();
    let needs_resample = !MODEL_SAMPLE_RATES.contains(&native_rate)
        || sr_override.map(|r| r != native_rate).unwrap_or(false);

    if !needs_resample && !needs_trim {
        fs::copy(orig, out)
            .with_context(|| format!("Failed to stage WAV file: {}", out.display()))?;
        return Ok(native_rate);
    }

    let target = sr_override.unwrap_or(DEFAULT_RESAMPLE_RATE);
    log::info!(
        "Resampling {} from {} to {} Hz",
        orig.display(),
        native_rate,
        target
    );

    let mut cmd = Command::new("sox");
    cmd.arg(orig)
        .arg("-r")
        .arg(target.to_string())
        .arg(out);
    if needs_trim {
        cmd.arg("trim").arg(start.to_string());
        if let Some(end) = end {
            cmd.arg((end - start).to_string());
        }
    }

    let status = cmd
        .status()
        .context("Failed to run sox; is it installed?")?;
    if !status.success() {
        bail!("sox exited with {} while resampling {}", status, orig.display());
    }

    Ok(target)
}
