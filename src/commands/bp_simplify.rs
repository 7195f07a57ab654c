//! Breakpoint table simplifier.
//!
//! Rewrites a `bp1 bp2 svtype sample` table as `chr1 pos1 chr2 pos2`,
//! keeping only the start coordinate of each breakpoint.

use crate::breakpoint::BreakpointReader;
use crate::config::{AtomicOutput, OutputConfig, TSV_EXTENSIONS};
use crate::error::Result;
use crate::streaming::TsvWriter;
use log::info;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Marker replacing the `.tsv` extension in the output name.
pub const OUTPUT_MARKER: &str = ".simplebp.tsv";

/// Column names of the simplified table.
pub const HEADER: [&str; 4] = ["chr1", "pos1", "chr2", "pos2"];

/// Breakpoint simplifier.
#[derive(Debug, Clone, Default)]
pub struct BreakpointSimplifyCommand;

impl BreakpointSimplifyCommand {
    pub fn new() -> Self {
        Self
    }

    /// Simplify `input` into the output directory. Returns the output path
    /// and the number of rows written.
    pub fn run<P: AsRef<Path>>(&self, input: P, config: &OutputConfig) -> Result<(PathBuf, usize)> {
        let input = input.as_ref();
        let output_path = config.output_path(input, TSV_EXTENSIONS, OUTPUT_MARKER)?;
        info!("Writing {}", output_path.display());

        let reader = BreakpointReader::from_path(input)?;
        let output = AtomicOutput::create(&output_path)?;
        let rows = self.simplify(reader, output.file()?)?;

        Ok((output.persist()?, rows))
    }

    /// Streaming transform from a breakpoint reader to any writer.
    pub fn simplify<R: Read, W: Write>(&self, reader: BreakpointReader<R>, output: W) -> Result<usize> {
        let mut writer = TsvWriter::new(output);
        writer.write_row(&HEADER)?;

        let mut rows = 0;
        for result in reader.records() {
            let record = result?;
            writer.write_position_pair(
                &record.bp1.chrom,
                record.bp1.start,
                &record.bp2.chrom,
                record.bp2.start,
            )?;
            rows += 1;
        }

        writer.flush()?;
        Ok(rows)
    }
}
