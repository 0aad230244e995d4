//! Before/after delta records for the learning-data log.

use std::fmt::{self, Write as _};
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::Path;

use scenario_optim::ObjectState;

use crate::error::Result;

/// State of one participating slot at the start and end of a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotDelta {
    /// Slot index.
    pub slot: usize,
    /// Snapshot taken when the step began.
    pub initial: ObjectState,
    /// State after the scene settled.
    pub current: ObjectState,
}

/// One labeled training sample.
///
/// Formats as a single line: for each slot, initial position and rotation,
/// final position and rotation, initial bounding box, final bounding box;
/// then a trailing `1`/`0` success bit. Numbers use six fractional digits.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaRecord {
    /// Copy the record was taken from.
    pub copy: usize,
    /// Participating slots in variant order.
    pub slots: Vec<SlotDelta>,
    /// Success label.
    pub success: bool,
}

impl DeltaRecord {
    /// Number of values written per slot.
    pub const VALUES_PER_SLOT: usize = 24;

    /// The record as one log line, without the newline.
    #[must_use]
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DeltaRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut line = String::new();
        for delta in &self.slots {
            let values = delta
                .initial
                .pose
                .to_components()
                .into_iter()
                .chain(delta.current.pose.to_components())
                .chain(delta.initial.bbox.to_components())
                .chain(delta.current.bbox.to_components());
            for value in values {
                write!(line, "{value:.6} ")?;
            }
        }
        line.push(if self.success { '1' } else { '0' });
        f.write_str(&line)
    }
}

/// Append `records` to `path`, one per line, creating the file if needed.
pub fn append_records(path: &Path, records: &[DeltaRecord]) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut text = String::new();
    for record in records {
        text.push_str(&record.to_line());
        text.push('\n');
    }
    file.write_all(text.as_bytes())?;
    Ok(())
}
