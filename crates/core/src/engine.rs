//! External alignment engine interface.
//!
//! The pipeline only depends on the `AlignmentEngine` trait: given a label
//! file, staged audio, and a dictionary, leave a phone-alignment file at
//! the requested path or fail. `HtkEngine` drives the HTK tools (`HCopy`
//! for feature extraction, `HVite` for Viterbi decoding) the hidden-Markov
//! aligner ships with.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};

/// One alignment invocation, staged in a per-run working directory.
#[derive(Debug)]
pub struct AlignRequest<'a> {
    pub work_dir: &'a Path,
    pub wav: &'a Path,
    pub label_file: &'a Path,
    pub dictionary: &'a Path,
    pub output: &'a Path,
    pub sample_rate: u32,
}

/// The opaque forced-alignment collaborator. Synchronous and atomic:
/// either it completes and leaves a valid phone-alignment file, or the
/// whole run aborts.
pub trait AlignmentEngine {
    fn align(&self, req: &AlignRequest<'_>) -> Result<()>;
}

/// HTK-based engine. `model_dir` holds per-sample-rate HMM subdirectories
/// (`8000/`, `11025/`, `16000/`, each with `config`, `macros`, `hmmdefs`)
/// plus the phone set (`monophones` or `hmmnames`).
#[derive(Debug)]
pub struct HtkEngine {
    pub model_dir: PathBuf,
}

impl HtkEngine {
    pub fn new(model_dir: &Path) -> Self {
        Self {
            model_dir: model_dir.to_path_buf(),
        }
    }

    fn phone_set(&self) -> PathBuf {
        let monophones = self.model_dir.join("monophones");
        if monophones.exists() {
            monophones
        } else {
            self.model_dir.join("hmmnames")
        }
    }
}

/// Whether the HTK tools are on the PATH.
pub fn htk_available() -> bool {
    Command::new("HVite")
        .arg("-V")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

impl AlignmentEngine for HtkEngine {
    fn align(&self, req: &AlignRequest<'_>) -> Result<()> {
        let hmm_dir = self.model_dir.join(req.sample_rate.to_string());
        let feature_file = req.work_dir.join("tmp.plp");

        // HCopy and HVite address their inputs through script files
        let code_scp = req.work_dir.join("codetr.scp");
        let test_scp = req.work_dir.join("test.scp");
        fs::write(
            &code_scp,
            format!("{} {}\n", req.wav.display(), feature_file.display()),
        )
        .context("Failed to write feature script file")?;
        fs::write(&test_scp, format!("{}\n", feature_file.display()))
            .context("Failed to write test script file")?;

        let status = Command::new("HCopy")
            .arg("-T")
            .arg("1")
            .arg("-C")
            .arg(hmm_dir.join("config"))
            .arg("-S")
            .arg(&code_scp)
            .status()
            .context("Failed to run HCopy; is HTK installed?")?;
        if !status.success() {
            bail!("HCopy exited with {}", status);
        }

        let status = Command::new("HVite")
            .arg("-T")
            .arg("1")
            .arg("-a")
            .arg("-m")
            .arg("-I")
            .arg(req.label_file)
            .arg("-H")
            .arg(hmm_dir.join("macros"))
            .arg("-H")
            .arg(hmm_dir.join("hmmdefs"))
            .arg("-S")
            .arg(&test_scp)
            .arg("-i")
            .arg(req.output)
            .arg("-p")
            .arg("0.0")
            .arg("-s")
            .arg("5.0")
            .arg(req.dictionary)
            .arg(self.phone_set())
            .status()
            .context("Failed to run HVite; is HTK installed?")?;
        if !status.success() {
            bail!("HVite exited with {}", status);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_set_falls_back_to_hmmnames() {
        let dir = tempfile::tempdir().unwrap();
        let engine = HtkEngine::new(dir.path());
        assert_eq!(engine.phone_set(), dir.path().join("hmmnames"));

        fs::write(dir.path().join("monophones"), "sp\n").unwrap();
        assert_eq!(engine.phone_set(), dir.path().join("monophones"));
    }

    #[test]
    fn test_htk_available_does_not_panic() {
        // just exercises the probe; HTK may or may not be installed
        let _ = htk_available();
    }
}
