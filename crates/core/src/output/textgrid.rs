//! Praat TextGrid output.
//!
//! Builds a TextGrid with two parallel interval tiers, `phone` and
//! `word`, over the alignment's time span, and writes it in Praat's
//! long text format.

use std::path::Path;

use anyhow::{anyhow, Result};
use textgrid::{Interval, TextGrid, Tier, TierType};

use crate::types::WordAlignment;

/// Build the two-tier TextGrid for an alignment.
///
/// The phone tier is populated from each word's phone breakdown, so the
/// reconstruction must have been run with phone detail enabled for the
/// phone tier to be non-empty.
pub fn build(alignments: &[WordAlignment]) -> Result<TextGrid> {
    let (first, last) = match (alignments.first(), alignments.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(anyhow!("Cannot build a TextGrid from an empty alignment")),
    };
    let xmin = first.start;
    let xmax = last.end;

    let mut word_intervals = Vec::with_capacity(alignments.len());
    let mut phone_intervals = Vec::new();
    for wa in alignments {
        word_intervals.push(Interval {
            xmin: wa.start,
            xmax: wa.end,
            text: wa.aligned_word.clone(),
        });
        if let Some(phones) = &wa.phones {
            for p in phones {
                phone_intervals.push(Interval {
                    xmin: p.start,
                    xmax: p.end,
                    text: p.label.clone(),
                });
            }
        }
    }

    let mut grid =
        TextGrid::new(xmin, xmax).map_err(|err| anyhow!("Failed to build TextGrid: {err}"))?;
    for (name, intervals) in [("phone", phone_intervals), ("word", word_intervals)] {
        grid.add_tier(Tier {
            name: name.to_string(),
            tier_type: TierType::IntervalTier,
            xmin,
            xmax,
            intervals,
            points: Vec::new(),
        })
        .map_err(|err| anyhow!("Failed to add {name} tier: {err}"))?;
    }
    Ok(grid)
}

/// Write the alignment as a TextGrid file.
pub fn write_textgrid(path: &Path, alignments: &[WordAlignment]) -> Result<()> {
    build(alignments)?
        .to_file(path, false)
        .map_err(|err| anyhow!("Failed to write TextGrid '{}': {err}", path.display()))?;
    Ok(())
}
