//! Structured tree graph layout
//!
//! A unit's binary decision path `(L0, A0, L1, A1, Y)` maps to six vertical
//! positions. The root sits at 0 and each decision moves the branch up (1) or
//! down (0) by half the previous step, starting at 1.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::longitudinal::sample::LongitudinalSample;
use crate::utils::{log_operation_complete, log_operation_start};

/// Number of decisions in a path
pub const PATH_LENGTH: usize = 5;

/// Vertical positions of a decision path, root first
#[must_use]
pub fn tree_positions(path: [bool; PATH_LENGTH]) -> [f64; PATH_LENGTH + 1] {
    let mut positions = [0.0; PATH_LENGTH + 1];
    let mut step = 1.0;
    for (k, &up) in path.iter().enumerate() {
        positions[k + 1] = positions[k] + if up { step } else { -step };
        step /= 2.0;
    }
    positions
}

/// Write `id,pos0,...,pos5` for every unit of a sample, `id` being the row index
pub fn write_positions_csv(path: &Path, sample: &LongitudinalSample) -> Result<()> {
    log_operation_start("Writing tree positions to", path);
    let mut file = BufWriter::new(File::create(path)?);

    writeln!(file, "id,pos0,pos1,pos2,pos3,pos4,pos5")?;
    for (i, positions) in sample.positions().enumerate() {
        write!(file, "{i}")?;
        for p in positions {
            write!(file, ",{p}")?;
        }
        writeln!(file)?;
    }
    file.flush()?;

    log_operation_complete("wrote", path, sample.len(), None);
    Ok(())
}
