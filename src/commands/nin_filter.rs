//! Normal-VAF ("not in normal") filter.
//!
//! Drops somatic calls whose allele fraction in the matched normal sample
//! exceeds a threshold. Everything else is written through unchanged.

use crate::config::{nin_filter_marker, AtomicOutput, OutputConfig, VCF_EXTENSIONS};
use crate::error::{FilterError, Result};
use crate::streaming::{filter_variants, FilterStats, VariantSink, VariantView};
use crate::vcf::{VcfReader, VcfWriter};
use log::info;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Default FORMAT field holding the per-sample allele fraction.
pub const DEFAULT_FORMAT_KEY: &str = "FA";

/// How the normal sample column is identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalSample {
    /// Explicit 0-based sample column.
    Column(usize),
    /// The tumor sample's name; the normal is the other column of a
    /// tumor/normal pair.
    OtherThan(String),
}

impl NormalSample {
    /// Resolve to a 0-based sample column.
    pub fn resolve<S: AsRef<str>>(&self, samples: &[S]) -> Result<usize> {
        match self {
            NormalSample::Column(index) => {
                if *index >= samples.len() {
                    return Err(FilterError::InvalidArgument(format!(
                        "normal column {} out of range for {} sample(s)",
                        index,
                        samples.len()
                    )));
                }
                Ok(*index)
            }
            NormalSample::OtherThan(name) => {
                let position = samples
                    .iter()
                    .position(|s| s.as_ref() == name)
                    .ok_or_else(|| FilterError::SampleNotFound {
                        name: name.clone(),
                        available: samples.iter().map(|s| s.as_ref().to_string()).collect(),
                    })?;
                if samples.len() != 2 {
                    return Err(FilterError::InvalidArgument(format!(
                        "resolving the normal by sample name needs exactly 2 samples, found {}",
                        samples.len()
                    )));
                }
                Ok(1 - position)
            }
        }
    }
}

/// Normal-VAF filter configuration.
#[derive(Debug, Clone)]
pub struct NinFilterCommand {
    pub normal: NormalSample,
    /// Records whose normal allele fraction is above this are dropped
    pub threshold: f64,
    /// FORMAT field to read
    pub format_key: String,
}

impl NinFilterCommand {
    pub fn new(normal: NormalSample, threshold: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(FilterError::InvalidArgument(format!(
                "threshold must be within [0, 1], got {}",
                threshold
            )));
        }
        Ok(Self {
            normal,
            threshold,
            format_key: DEFAULT_FORMAT_KEY.to_string(),
        })
    }

    pub fn with_format_key(mut self, key: impl Into<String>) -> Self {
        self.format_key = key.into();
        self
    }

    /// Output path for `input` under `config`.
    pub fn output_path(&self, input: &Path, config: &OutputConfig) -> Result<PathBuf> {
        config.output_path(input, VCF_EXTENSIONS, &nin_filter_marker(self.threshold))
    }

    /// Filter a VCF file into the output directory. Returns the output path
    /// and pass statistics.
    pub fn run<P: AsRef<Path>>(
        &self,
        input: P,
        config: &OutputConfig,
    ) -> Result<(PathBuf, FilterStats)> {
        let input = input.as_ref();
        let output_path = self.output_path(input, config)?;
        info!("Writing {}", output_path.display());

        let mut reader = VcfReader::from_path(input)?;
        let normal_index = self.normal.resolve(&reader.sample_names())?;
        let header = reader.header().clone();
        let raw_header = reader.raw_header().to_string();

        let output = AtomicOutput::create(&output_path)?;
        let stats = {
            let mut writer = VcfWriter::new(BufWriter::new(output.file()?), &header, &raw_header)?;
            self.filter(reader.variants(), normal_index, &mut writer)?
        };

        Ok((output.persist()?, stats))
    }

    /// Core filter pass over any variant stream.
    pub fn filter<V, I, S>(&self, records: I, normal_index: usize, sink: &mut S) -> Result<FilterStats>
    where
        V: VariantView,
        I: IntoIterator<Item = Result<V>>,
        S: VariantSink<V>,
    {
        filter_variants(records, sink, |variant| {
            let Some(fraction) = self.normal_fraction(variant, normal_index)? else {
                return Ok(true);
            };
            if fraction > self.threshold {
                info!(
                    "filtered: {} normal {}={}",
                    variant.locus(),
                    self.format_key,
                    fraction
                );
                Ok(false)
            } else {
                Ok(true)
            }
        })
    }

    /// Largest allele fraction of the normal sample across ALT alleles.
    fn normal_fraction<V: VariantView>(&self, variant: &V, normal_index: usize) -> Result<Option<f64>> {
        let values = variant.sample_values(&self.format_key, normal_index)?;
        Ok(values.and_then(|v| v.into_iter().reduce(f64::max)))
    }
}
