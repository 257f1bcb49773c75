//! Line-by-line comparison of two texts
//!
//! Lines are paired by position, not aligned: line N of the left text is
//! compared with line N of the right text. When one side runs out of lines
//! first, it is shown as an explicit `<Empty Line>` marker so a length
//! mismatch stays visible.
//!
//! ## Line splitting
//!
//! A trailing newline is implied when missing, so the last line is never
//! dropped. `"a\nb"` and `"a\nb\n"` both split into `["a", "b"]`; the empty
//! text splits into a single blank line.
//!
//! ## Examples
//!
//! ```rust
//! use versa::diff::{compare_lines, LineStatus};
//! use versa::types::MatchMode;
//!
//! let diff = compare_lines("hello\nworld", "hello\nmars", MatchMode::Exact);
//! assert_eq!(diff.len(), 2);
//! assert!(matches!(diff.records()[0].status, LineStatus::Identical(_)));
//! assert_eq!(diff.to_string(), "Line 1: <Identical>\nLine 2: world <<>> mars\n");
//! ```

use crate::types::MatchMode;
use serde::Serialize;
use std::fmt;
use tracing::trace;

/// Marker shown for a side that has no line at this position
pub const EMPTY_LINE_MARKER: &str = "<Empty Line>";

/// One side of a divergent line pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LineSide {
    /// A line that exists on this side (possibly blank)
    Line(String),
    /// This side has no line at this position
    Missing,
}

impl LineSide {
    /// Text of the line, `None` when missing
    pub fn text(&self) -> Option<&str> {
        match self {
            LineSide::Line(text) => Some(text),
            LineSide::Missing => None,
        }
    }
}

impl fmt::Display for LineSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineSide::Line(text) => f.write_str(text),
            LineSide::Missing => f.write_str(EMPTY_LINE_MARKER),
        }
    }
}

/// Comparison result for one line position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LineStatus {
    /// Both sides carry the same line
    Identical(String),
    /// The sides differ, or one side is missing
    Divergent {
        /// Line from the first text
        left: LineSide,
        /// Line from the second text
        right: LineSide,
    },
}

/// One record of a line diff
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineRecord {
    /// 1-based line number
    pub number: usize,
    /// Outcome at this line
    pub status: LineStatus,
}

impl LineRecord {
    /// Whether this line is identical on both sides
    pub fn is_identical(&self) -> bool {
        matches!(self.status, LineStatus::Identical(_))
    }
}

impl fmt::Display for LineRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            LineStatus::Identical(_) => write!(f, "Line {}: <Identical>", self.number),
            LineStatus::Divergent { left, right } => {
                write!(f, "Line {}: {} <<>> {}", self.number, left, right)
            }
        }
    }
}

/// Line-by-line comparison of two texts
///
/// Records run from line 1 until both texts are exhausted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineDiff {
    records: Vec<LineRecord>,
}

impl LineDiff {
    /// All records in line order
    pub fn records(&self) -> &[LineRecord] {
        &self.records
    }

    /// Number of compared line positions
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the diff has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether every line is identical
    pub fn is_identical(&self) -> bool {
        self.records.iter().all(LineRecord::is_identical)
    }

    /// Number of lines that differ
    pub fn divergent_count(&self) -> usize {
        self.records.iter().filter(|r| !r.is_identical()).count()
    }

    /// Iterate records in line order
    pub fn iter(&self) -> std::slice::Iter<'_, LineRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a LineDiff {
    type Item = &'a LineRecord;
    type IntoIter = std::slice::Iter<'a, LineRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl fmt::Display for LineDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in &self.records {
            writeln!(f, "{}", record)?;
        }
        Ok(())
    }
}

/// Split text into lines, implying a trailing newline when absent
pub fn split_lines(content: &str) -> Vec<&str> {
    content
        .strip_suffix('\n')
        .unwrap_or(content)
        .split('\n')
        .collect()
}

/// Compare two texts line by line
///
/// `mode` decides line identity the same way it decides duplicate content:
/// hashes first, confirmed by text under [`MatchMode::Exact`].
pub fn compare_lines(left: &str, right: &str, mode: MatchMode) -> LineDiff {
    let left_lines = split_lines(left);
    let right_lines = split_lines(right);
    let total = left_lines.len().max(right_lines.len());

    let records = (0..total)
        .map(|idx| {
            let status = match (left_lines.get(idx), right_lines.get(idx)) {
                (Some(l), Some(r)) if mode.same(l, r) => LineStatus::Identical(l.to_string()),
                (l, r) => LineStatus::Divergent {
                    left: to_side(l),
                    right: to_side(r),
                },
            };
            trace!("Line {}: identical = {}", idx + 1, matches!(status, LineStatus::Identical(_)));
            LineRecord {
                number: idx + 1,
                status,
            }
        })
        .collect();

    LineDiff { records }
}

fn to_side(line: Option<&&str>) -> LineSide {
    match line {
        Some(text) => LineSide::Line(text.to_string()),
        None => LineSide::Missing,
    }
}
