//! The single-pass keep/drop filter shared by the VCF commands.
//!
//! Records are pulled from a fallible iterator, judged by a predicate and
//! either handed unchanged to a [`VariantSink`] or dropped. Input order is
//! preserved and the first error aborts the pass.

use crate::error::Result;

/// Read-only access to the parts of a variant record the filters need.
pub trait VariantView {
    /// Chromosome (reference sequence) name.
    fn chrom(&self) -> &str;

    /// 1-based position of the record.
    fn position(&self) -> Result<u64>;

    /// Numeric values of a FORMAT field for one sample column.
    ///
    /// Returns `Ok(None)` if the field is absent from the record or the
    /// value is missing (`.`). Multi-valued fields yield every non-missing
    /// value.
    fn sample_values(&self, key: &str, sample: usize) -> Result<Option<Vec<f64>>>;

    /// Short identity for diagnostics.
    fn locus(&self) -> String {
        match self.position() {
            Ok(pos) => format!("{}:{}", self.chrom(), pos),
            Err(_) => format!("{}:?", self.chrom()),
        }
    }
}

/// Destination for records that survive a filter.
pub trait VariantSink<V> {
    fn write_variant(&mut self, variant: &V) -> Result<()>;

    /// Flush buffered output. Called once after the last record.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<V: Clone> VariantSink<V> for Vec<V> {
    fn write_variant(&mut self, variant: &V) -> Result<()> {
        self.push(variant.clone());
        Ok(())
    }
}

/// Statistics from a filter pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilterStats {
    /// Number of records read
    pub records_read: usize,
    /// Number of records forwarded to the sink
    pub records_kept: usize,
}

impl FilterStats {
    /// Number of records dropped by the predicate.
    pub fn records_dropped(&self) -> usize {
        self.records_read - self.records_kept
    }
}

impl std::fmt::Display for FilterStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Read: {}, Kept: {}, Dropped: {}",
            self.records_read,
            self.records_kept,
            self.records_dropped()
        )
    }
}

/// Run one pass over `records`, forwarding those for which `keep` is true.
pub fn filter_variants<V, I, S, F>(records: I, sink: &mut S, mut keep: F) -> Result<FilterStats>
where
    I: IntoIterator<Item = Result<V>>,
    S: VariantSink<V>,
    F: FnMut(&V) -> Result<bool>,
{
    let mut stats = FilterStats::default();

    for result in records {
        let variant = result?;
        stats.records_read += 1;

        if keep(&variant)? {
            sink.write_variant(&variant)?;
            stats.records_kept += 1;
        }
    }

    sink.finish()?;
    Ok(stats)
}
