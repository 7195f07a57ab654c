//! VCF input and output through noodles.
//!
//! Records are read lazily; the filters only look at the chromosome,
//! position and one FORMAT field, and kept records are written back under
//! the input's header text, copied line for line. Records themselves are
//! re-serialised by noodles, so numeric fields may be reformatted (a QUAL of
//! `50.00` comes back as `50`).

use crate::error::{FilterError, Result};
use crate::streaming::{VariantSink, VariantView};
use noodles::vcf;
use noodles::vcf::variant::io::Write as _;
use noodles::vcf::variant::record::samples::series::value::Array;
use noodles::vcf::variant::record::samples::series::Value;
use noodles::vcf::variant::record::samples::Series as _;
use std::io::{BufRead, Read, Write};
use std::path::Path;

/// An open VCF file with its parsed header and the header text as read.
pub struct VcfReader<R> {
    reader: vcf::io::Reader<R>,
    header: vcf::Header,
    raw_header: String,
}

impl VcfReader<Box<dyn BufRead>> {
    /// Open a plain or bgzip-compressed VCF.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = vcf::io::reader::Builder::default().build_from_path(path)?;
        Self::from_reader(reader)
    }
}

impl<R: BufRead> VcfReader<R> {
    pub fn new(inner: R) -> Result<Self> {
        Self::from_reader(vcf::io::Reader::new(inner))
    }

    fn from_reader(mut reader: vcf::io::Reader<R>) -> Result<Self> {
        let mut raw_header = String::new();
        reader.header_reader().read_to_string(&mut raw_header)?;
        if !raw_header.is_empty() && !raw_header.ends_with('\n') {
            raw_header.push('\n');
        }

        let header = raw_header
            .parse::<vcf::Header>()
            .map_err(|e| FilterError::Vcf {
                position: "header".to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            reader,
            header,
            raw_header,
        })
    }

    pub fn header(&self) -> &vcf::Header {
        &self.header
    }

    /// Header lines exactly as they appear in the input, `#CHROM` included.
    pub fn raw_header(&self) -> &str {
        &self.raw_header
    }

    /// Sample column names, in file order.
    pub fn sample_names(&self) -> Vec<String> {
        self.header.sample_names().iter().cloned().collect()
    }

    /// Iterate over the records, each paired with the header.
    pub fn variants(&mut self) -> impl Iterator<Item = Result<VcfVariant<'_>>> + '_ {
        let header = &self.header;
        self.reader.records().map(move |result| {
            result
                .map(|record| VcfVariant { header, record })
                .map_err(FilterError::from)
        })
    }
}

/// A VCF record with the header needed to decode its sample fields.
#[derive(Clone)]
pub struct VcfVariant<'h> {
    header: &'h vcf::Header,
    record: vcf::Record,
}

impl VcfVariant<'_> {
    fn decode_error(&self, message: impl std::fmt::Display) -> FilterError {
        FilterError::Vcf {
            position: self.locus(),
            message: message.to_string(),
        }
    }
}

impl VariantView for VcfVariant<'_> {
    fn chrom(&self) -> &str {
        self.record.reference_sequence_name()
    }

    fn position(&self) -> Result<u64> {
        let position = self
            .record
            .variant_start()
            .ok_or_else(|| FilterError::Vcf {
                position: format!("{}:.", self.chrom()),
                message: "missing position".to_string(),
            })?
            .map_err(|e| FilterError::Vcf {
                position: format!("{}:?", self.chrom()),
                message: e.to_string(),
            })?;
        Ok(usize::from(position) as u64)
    }

    fn sample_values(&self, key: &str, sample: usize) -> Result<Option<Vec<f64>>> {
        let samples = self.record.samples();
        let Some(series) = samples.select(key) else {
            return Ok(None);
        };

        let value = match series.get(self.header, sample) {
            None => {
                return Err(self.decode_error(format!("no sample column {}", sample)));
            }
            Some(None) => return Ok(None),
            Some(Some(result)) => result.map_err(|e| self.decode_error(e))?,
        };

        let values = match value {
            Value::Float(n) => vec![f64::from(n)],
            Value::Integer(n) => vec![f64::from(n)],
            Value::String(s) => parse_numeric_list(&s).map_err(|e| self.decode_error(e))?,
            Value::Array(Array::Float(values)) => {
                let mut out = Vec::new();
                for v in values.iter() {
                    if let Some(n) = v.map_err(|e| self.decode_error(e))? {
                        out.push(f64::from(n));
                    }
                }
                out
            }
            Value::Array(Array::Integer(values)) => {
                let mut out = Vec::new();
                for v in values.iter() {
                    if let Some(n) = v.map_err(|e| self.decode_error(e))? {
                        out.push(f64::from(n));
                    }
                }
                out
            }
            _ => {
                return Err(self.decode_error(format!("FORMAT field {} is not numeric", key)));
            }
        };

        if values.is_empty() {
            Ok(None)
        } else {
            Ok(Some(values))
        }
    }
}

/// Parse a comma-separated list of numbers, skipping `.` entries. Used when
/// the header does not declare the FORMAT field's type.
fn parse_numeric_list(s: &str) -> std::result::Result<Vec<f64>, String> {
    s.split(',')
        .filter(|v| *v != ".")
        .map(|v| {
            v.parse::<f64>()
                .map_err(|_| format!("invalid numeric value '{}'", v))
        })
        .collect()
}

/// Writes kept records under the input's header.
pub struct VcfWriter<'h, W: Write> {
    writer: vcf::io::Writer<W>,
    header: &'h vcf::Header,
}

impl<'h, W: Write> VcfWriter<'h, W> {
    /// Create the writer and copy `raw_header` to the output unchanged.
    /// `header` must be the parsed form of `raw_header`; it is used to encode
    /// the records.
    pub fn new(mut inner: W, header: &'h vcf::Header, raw_header: &str) -> Result<Self> {
        inner.write_all(raw_header.as_bytes())?;
        let writer = vcf::io::Writer::new(inner);
        Ok(Self { writer, header })
    }
}

impl<W: Write> VariantSink<VcfVariant<'_>> for VcfWriter<'_, W> {
    fn write_variant(&mut self, variant: &VcfVariant<'_>) -> Result<()> {
        self.writer
            .write_variant_record(self.header, &variant.record)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.get_mut().flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VCF: &str = "##fileformat=VCFv4.2\n\
##contig=<ID=chr1,length=100000>\n\
##FORMAT=<ID=FA,Number=A,Type=Float,Description=\"Allele fraction\">\n\
##FORMAT=<ID=DP,Number=1,Type=Integer,Description=\"Depth\">\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tNORMAL\tTUMOR\n\
chr1\t100\t.\tA\tT\t.\tPASS\t.\tFA:DP\t0.02:30\t0.40:25\n\
chr1\t200\t.\tC\tG,T\t.\tPASS\t.\tFA:DP\t0.01,0.03:40\t.:20\n\
chr1\t300\t.\tG\tA\t.\tPASS\t.\tDP\t12\t15\n";

    #[test]
    fn test_read_header_and_samples() {
        let reader = VcfReader::new(VCF.as_bytes()).unwrap();
        assert_eq!(reader.sample_names(), vec!["NORMAL", "TUMOR"]);
    }

    #[test]
    fn test_positions_and_values() {
        let mut reader = VcfReader::new(VCF.as_bytes()).unwrap();
        let variants: Vec<_> = reader.variants().collect::<Result<_>>().unwrap();

        assert_eq!(variants.len(), 3);
        assert_eq!(variants[0].chrom(), "chr1");
        assert_eq!(variants[0].position().unwrap(), 100);
        assert_eq!(variants[0].locus(), "chr1:100");

        let normal = variants[0].sample_values("FA", 0).unwrap().unwrap();
        assert!((normal[0] - 0.02).abs() < 1e-6);
        let tumor = variants[0].sample_values("FA", 1).unwrap().unwrap();
        assert!((tumor[0] - 0.40).abs() < 1e-6);

        let multi = variants[1].sample_values("FA", 0).unwrap().unwrap();
        assert_eq!(multi.len(), 2);
        assert_eq!(variants[1].sample_values("FA", 1).unwrap(), None);

        assert_eq!(variants[2].sample_values("FA", 0).unwrap(), None);
        let depth = variants[2].sample_values("DP", 1).unwrap().unwrap();
        assert_eq!(depth, vec![15.0]);
    }

    #[test]
    fn test_writer_round_trip() {
        let mut reader = VcfReader::new(VCF.as_bytes()).unwrap();
        let header = reader.header().clone();
        let raw_header = reader.raw_header().to_string();
        let mut output = Vec::new();
        {
            let mut writer = VcfWriter::new(&mut output, &header, &raw_header).unwrap();
            for variant in reader.variants() {
                let variant = variant.unwrap();
                if variant.position().unwrap() != 200 {
                    writer.write_variant(&variant).unwrap();
                }
            }
            writer.finish().unwrap();
        }

        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("##fileformat=VCFv4.2\n"));
        assert!(text.contains("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tNORMAL\tTUMOR"));
        let positions: Vec<&str> = text
            .lines()
            .filter(|l| !l.starts_with('#'))
            .map(|l| l.split('\t').nth(1).unwrap())
            .collect();
        assert_eq!(positions, vec!["100", "300"]);
    }

    #[test]
    fn test_header_copied_verbatim() {
        // noodles would move the unstructured line below the contigs and
        // quote the extra contig field if the header were re-encoded
        let raw = "##fileformat=VCFv4.1\n\
##FORMAT=<ID=FA,Number=A,Type=Float,Description=\"Allele fraction\">\n\
##contig=<ID=chr1,length=249250621,assembly=hg19>\n\
##MuTect=\"analysis_type=MuTect input_file=[normal.bam, tumor.bam]\"\n\
##reference=file:///ref/hg19.fa\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tNORMAL\tTUMOR\n";
        let input = format!("{}chr1\t100\t.\tA\tT\t.\tPASS\t.\tFA\t0.02\t0.40\n", raw);

        let mut reader = VcfReader::new(input.as_bytes()).unwrap();
        assert_eq!(reader.raw_header(), raw);
        assert_eq!(reader.sample_names(), vec!["NORMAL", "TUMOR"]);

        let header = reader.header().clone();
        let raw_header = reader.raw_header().to_string();
        let mut output = Vec::new();
        {
            let mut writer = VcfWriter::new(&mut output, &header, &raw_header).unwrap();
            for variant in reader.variants() {
                writer.write_variant(&variant.unwrap()).unwrap();
            }
            writer.finish().unwrap();
        }

        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with(raw));
        assert_eq!(text.lines().count(), raw.lines().count() + 1);
    }

    #[test]
    fn test_header_without_trailing_newline() {
        let raw = "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO";
        let reader = VcfReader::new(raw.as_bytes()).unwrap();
        assert_eq!(reader.raw_header(), format!("{}\n", raw));
    }

    #[test]
    fn test_parse_numeric_list() {
        assert_eq!(parse_numeric_list("0.1,.,0.3").unwrap(), vec![0.1, 0.3]);
        assert!(parse_numeric_list("abc").is_err());
    }
}
