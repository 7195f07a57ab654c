//! Breakpoint-set VCF filter.
//!
//! Keeps the SV records of a VCF whose first breakpoint appears in a
//! breakpoint table, typically the intersection of two SV callers.

use crate::breakpoint::BreakpointSet;
use crate::config::{AtomicOutput, OutputConfig, VCF_EXTENSIONS};
use crate::error::Result;
use crate::streaming::{filter_variants, FilterStats, VariantSink, VariantView};
use crate::vcf::{VcfReader, VcfWriter};
use log::{debug, info};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Marker replacing the VCF extension in the output name.
pub const OUTPUT_MARKER: &str = ".intersectFiltered.vcf";

/// Breakpoint filter configuration.
#[derive(Debug, Clone, Default)]
pub struct BreakpointFilterCommand {
    /// Keep records within this many bases of a breakpoint instead of
    /// requiring an exact `[pos, pos + 1)` match.
    pub window: Option<u64>,
}

impl BreakpointFilterCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window(mut self, window: Option<u64>) -> Self {
        self.window = window;
        self
    }

    /// Filter `vcf` against the first breakpoints of `table`.
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        vcf: P,
        table: Q,
        config: &OutputConfig,
    ) -> Result<(PathBuf, FilterStats)> {
        let vcf = vcf.as_ref();
        let breakpoints = BreakpointSet::from_path(table)?;
        info!("Loaded {} breakpoints", breakpoints.len());

        let output_path = config.output_path(vcf, VCF_EXTENSIONS, OUTPUT_MARKER)?;
        info!("Writing {}", output_path.display());

        let mut reader = VcfReader::from_path(vcf)?;
        let header = reader.header().clone();
        let raw_header = reader.raw_header().to_string();

        let output = AtomicOutput::create(&output_path)?;
        let stats = {
            let mut writer = VcfWriter::new(BufWriter::new(output.file()?), &header, &raw_header)?;
            self.filter(reader.variants(), &breakpoints, &mut writer)?
        };

        Ok((output.persist()?, stats))
    }

    /// Core filter pass over any variant stream.
    pub fn filter<V, I, S>(
        &self,
        records: I,
        breakpoints: &BreakpointSet,
        sink: &mut S,
    ) -> Result<FilterStats>
    where
        V: VariantView,
        I: IntoIterator<Item = Result<V>>,
        S: VariantSink<V>,
    {
        match self.window {
            None => filter_variants(records, sink, |variant| {
                let keep = breakpoints.contains_position(variant.chrom(), variant.position()?);
                if !keep {
                    debug!("no breakpoint support: {}", variant.locus());
                }
                Ok(keep)
            }),
            Some(window) => {
                let windowed = breakpoints.windowed(window);
                filter_variants(records, sink, |variant| {
                    let keep = windowed.overlaps_position(variant.chrom(), variant.position()?);
                    if !keep {
                        debug!("no breakpoint within {}bp: {}", window, variant.locus());
                    }
                    Ok(keep)
                })
            }
        }
    }
}
