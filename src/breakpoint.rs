//! Streaming parser for four-column SV breakpoint tables.
//!
//! Each data line holds `breakpoint1`, `breakpoint2`, `svtype` and
//! `sampleName`, separated by tabs, with breakpoints written as
//! `chrom:start-end`.

use crate::error::{FilterError, Result};
use crate::interval::{Direction, Interval};
use rustc_hash::{FxHashMap, FxHashSet};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Number of columns in a breakpoint table row.
pub const BREAKPOINT_FIELDS: usize = 4;

/// One row of a breakpoint table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakpointRecord {
    pub bp1: Interval,
    pub bp2: Interval,
    pub svtype: String,
    pub sample: String,
}

impl BreakpointRecord {
    /// Parse a single tab-separated row. Trailing whitespace, including a
    /// trailing tab, is ignored. `line_number` is only used for errors.
    pub fn parse_line(line: &str, line_number: usize) -> Result<Self> {
        let fields: Vec<&str> = line.trim_end().split('\t').collect();
        if fields.len() != BREAKPOINT_FIELDS {
            return Err(FilterError::MalformedRow {
                line: line_number,
                fields: fields.len(),
            });
        }

        Ok(Self {
            bp1: fields[0].parse()?,
            bp2: fields[1].parse()?,
            svtype: fields[2].to_string(),
            sample: fields[3].to_string(),
        })
    }
}

/// A streaming breakpoint table reader.
pub struct BreakpointReader<R: Read> {
    reader: BufReader<R>,
    line_number: usize,
    buffer: String,
}

impl BreakpointReader<File> {
    /// Open a breakpoint table from a path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file))
    }
}

impl<R: Read> BreakpointReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
            buffer: String::with_capacity(256),
        }
    }

    /// Read the next row, skipping blank and `#` lines.
    pub fn read_record(&mut self) -> Result<Option<BreakpointRecord>> {
        loop {
            self.buffer.clear();
            let bytes_read = self.reader.read_line(&mut self.buffer)?;
            if bytes_read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let line = self.buffer.trim_end_matches(['\n', '\r']);
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            return BreakpointRecord::parse_line(line, self.line_number).map(Some);
        }
    }

    /// Get an iterator over all records.
    pub fn records(self) -> BreakpointRecordIter<R> {
        BreakpointRecordIter { reader: self }
    }
}

/// Iterator over breakpoint rows.
pub struct BreakpointRecordIter<R: Read> {
    reader: BreakpointReader<R>,
}

impl<R: Read> Iterator for BreakpointRecordIter<R> {
    type Item = Result<BreakpointRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_record().transpose()
    }
}

/// Parse breakpoint rows from a string (useful for testing).
pub fn parse_breakpoints(content: &str) -> Result<Vec<BreakpointRecord>> {
    BreakpointReader::new(content.as_bytes()).records().collect()
}

/// The set of first breakpoints that survived an upstream filter.
///
/// Built once per run and only queried afterwards.
#[derive(Debug, Clone, Default)]
pub struct BreakpointSet {
    intervals: FxHashSet<Interval>,
}

impl BreakpointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the first breakpoint of every row.
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<BreakpointRecord>>,
    {
        let mut set = Self::new();
        for record in records {
            set.insert(record?.bp1);
        }
        Ok(set)
    }

    /// Load the first breakpoints of a table on disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_records(BreakpointReader::from_path(path)?.records())
    }

    pub fn insert(&mut self, interval: Interval) -> bool {
        self.intervals.insert(interval)
    }

    #[inline]
    pub fn contains(&self, interval: &Interval) -> bool {
        self.intervals.contains(interval)
    }

    /// Exact membership of the point interval `[pos, pos + 1)`.
    #[inline]
    pub fn contains_position(&self, chrom: &str, pos: u64) -> bool {
        self.contains(&Interval::point(chrom, pos))
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Group the breakpoints by chromosome, each widened by `window` bases
    /// on both sides.
    pub fn windowed(&self, window: u64) -> WindowedBreakpoints {
        let mut by_chrom: FxHashMap<String, Vec<Interval>> = FxHashMap::default();
        for interval in &self.intervals {
            by_chrom
                .entry(interval.chrom.clone())
                .or_default()
                .push(interval.extend(Direction::Both, window));
        }
        for intervals in by_chrom.values_mut() {
            intervals.sort_unstable();
        }
        WindowedBreakpoints { by_chrom }
    }
}

/// Breakpoints widened by a fixed window, answering overlap queries.
#[derive(Debug, Clone)]
pub struct WindowedBreakpoints {
    by_chrom: FxHashMap<String, Vec<Interval>>,
}

impl WindowedBreakpoints {
    /// True if the point at `pos` overlaps any widened breakpoint.
    pub fn overlaps_position(&self, chrom: &str, pos: u64) -> bool {
        let Some(intervals) = self.by_chrom.get(chrom) else {
            return false;
        };
        let query = Interval::point(chrom, pos);
        intervals
            .iter()
            .take_while(|iv| iv.start <= pos)
            .any(|iv| iv.overlaps(&query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_row() {
        let records = parse_breakpoints("chr1:1000-1001\tchr2:5000-5001\tBND\tSAMPLE1\n").unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].bp1, Interval::new("chr1", 1000, 1001));
        assert_eq!(records[0].bp2, Interval::new("chr2", 5000, 5001));
        assert_eq!(records[0].svtype, "BND");
        assert_eq!(records[0].sample, "SAMPLE1");
    }

    #[test]
    fn test_crlf_and_comments() {
        let content = "# bp1\tbp2\tsvtype\tsample\r\n\nchr1:1-2\tchr1:9-10\tDEL\tS\r\n";
        let records = parse_breakpoints(content).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sample, "S");
    }

    #[test]
    fn test_malformed_row() {
        let content = "chr1:1-2\tchr1:9-10\tDEL\tS\nchr1:1-2\tchr1:9-10\tDEL\n";
        let err = parse_breakpoints(content).unwrap_err();
        assert!(matches!(err, FilterError::MalformedRow { line: 2, fields: 3 }));

        let err = parse_breakpoints("a\tb\tc\td\te\n").unwrap_err();
        assert!(matches!(err, FilterError::MalformedRow { line: 1, fields: 5 }));
    }

    #[test]
    fn test_trailing_whitespace() {
        let content = "chr1:1000-1001\tchr2:5000-5001\tBND\tSAMPLE1\t\n\
chr3:10-11\tchr4:20-21\tDEL\tSAMPLE2  \r\n";
        let records = parse_breakpoints(content).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sample, "SAMPLE1");
        assert_eq!(records[1].bp1, Interval::new("chr3", 10, 11));
        assert_eq!(records[1].sample, "SAMPLE2");
    }

    #[test]
    fn test_bad_interval_in_row() {
        let err = parse_breakpoints("chr1:1-2\tchr1-9-10\tDEL\tS\n").unwrap_err();
        assert!(matches!(err, FilterError::InvalidInterval { .. }));
    }

    #[test]
    fn test_set_uses_first_breakpoint_only() {
        let content = "chr1:1000-1001\tchr2:5000-5001\tBND\tS1\nchr3:10-11\tchr4:20-21\tBND\tS1\n";
        let set = BreakpointSet::from_records(BreakpointReader::new(content.as_bytes()).records())
            .unwrap();

        assert_eq!(set.len(), 2);
        assert!(set.contains_position("chr1", 1000));
        assert!(set.contains_position("chr3", 10));
        assert!(!set.contains_position("chr2", 5000));
        assert!(!set.contains_position("chr1", 1001));
    }

    #[test]
    fn test_windowed_overlap() {
        let mut set = BreakpointSet::new();
        set.insert(Interval::new("chr1", 1000, 1001));
        let windowed = set.windowed(10);

        assert!(windowed.overlaps_position("chr1", 990));
        assert!(windowed.overlaps_position("chr1", 1010));
        assert!(!windowed.overlaps_position("chr1", 989));
        assert!(!windowed.overlaps_position("chr1", 1011));
        assert!(!windowed.overlaps_position("chr2", 1000));
    }
}
