//! Core interval type for breakpoint and variant positions.

use crate::error::{FilterError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A genomic interval with chromosome, start, and end positions.
///
/// Uses half-open coordinates `[start, end)` everywhere. A single variant
/// position `pos` is represented as `[pos, pos + 1)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Interval {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
}

impl Interval {
    /// Create a new interval without checking `end >= start`.
    #[inline]
    pub fn new(chrom: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            end,
        }
    }

    /// Create a new interval, rejecting `end < start`.
    pub fn try_new(chrom: impl Into<String>, start: u64, end: u64) -> Result<Self> {
        let chrom = chrom.into();
        if end < start {
            return Err(FilterError::Validation(format!(
                "interval {}:{}-{} ends before it starts",
                chrom, start, end
            )));
        }
        Ok(Self { chrom, start, end })
    }

    /// The 1bp interval covering a single position.
    #[inline]
    pub fn point(chrom: impl Into<String>, pos: u64) -> Self {
        Self::new(chrom, pos, pos.saturating_add(1))
    }

    /// Returns true if the interval has zero length.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Check if this interval overlaps with another.
    ///
    /// Intervals on different chromosomes never overlap, and sharing a
    /// single boundary coordinate is not an overlap.
    #[inline]
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.chrom == other.chrom && self.end.min(other.end) > self.start.max(other.start)
    }

    /// Return a copy extended by `amount` bases in the given direction.
    ///
    /// Upstream extension clamps `start` at zero.
    pub fn extend(&self, direction: Direction, amount: u64) -> Interval {
        let (start, end) = match direction {
            Direction::Upstream => (self.start.saturating_sub(amount), self.end),
            Direction::Downstream => (self.start, self.end.saturating_add(amount)),
            Direction::Both => (
                self.start.saturating_sub(amount),
                self.end.saturating_add(amount),
            ),
        };
        Interval::new(self.chrom.clone(), start, end)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
    }
}

impl FromStr for Interval {
    type Err = FilterError;

    /// Parse `chrom:start-end`.
    fn from_str(text: &str) -> Result<Self> {
        // Contig names may themselves contain ':' (e.g. HLA alleles)
        let colon = memchr::memrchr(b':', text.as_bytes())
            .ok_or_else(|| FilterError::invalid_interval(text, "missing ':'"))?;
        let chrom = &text[..colon];
        let range = &text[colon + 1..];
        if chrom.is_empty() {
            return Err(FilterError::invalid_interval(text, "empty chromosome"));
        }

        let dash = memchr::memchr(b'-', range.as_bytes())
            .ok_or_else(|| FilterError::invalid_interval(text, "missing '-'"))?;
        let start = parse_coordinate(text, &range[..dash], "start")?;
        let end = parse_coordinate(text, &range[dash + 1..], "end")?;

        Interval::try_new(chrom, start, end)
    }
}

fn parse_coordinate(text: &str, field: &str, name: &str) -> Result<u64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FilterError::invalid_interval(
            text,
            format!("invalid {} coordinate '{}'", name, field),
        ));
    }
    field.parse().map_err(|_| {
        FilterError::invalid_interval(text, format!("{} coordinate '{}' out of range", name, field))
    })
}

/// Orders by chromosome name (plain string order, so "chr10" < "chr2"),
/// then start, then end.
impl Ord for Interval {
    fn cmp(&self, other: &Self) -> Ordering {
        self.chrom
            .cmp(&other.chrom)
            .then(self.start.cmp(&other.start))
            .then(self.end.cmp(&other.end))
    }
}

impl PartialOrd for Interval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Direction for [`Interval::extend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Upstream,
    Downstream,
    Both,
}

impl FromStr for Direction {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "up" | "upstream" => Ok(Direction::Upstream),
            "down" | "downstream" => Ok(Direction::Downstream),
            "both" => Ok(Direction::Both),
            _ => Err(FilterError::InvalidArgument(format!(
                "direction must be up, down, or both (got '{}')",
                s
            ))),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Upstream => write!(f, "up"),
            Direction::Downstream => write!(f, "down"),
            Direction::Both => write!(f, "both"),
        }
    }
}
