//! Buffered tab-separated output.
//!
//! Uses itoa for integer formatting to avoid allocation per row.

use crate::error::Result;
use std::io::{BufWriter, Write};

/// Buffer size for TsvWriter (256KB default).
const DEFAULT_BUFFER_SIZE: usize = 256 * 1024;

/// Buffered writer for tab-separated rows.
pub struct TsvWriter<W: Write> {
    writer: BufWriter<W>,
    itoa_buf: itoa::Buffer,
}

impl<W: Write> TsvWriter<W> {
    /// Create a new TsvWriter with default buffer.
    pub fn new(output: W) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, output)
    }

    /// Create a new TsvWriter with specified buffer size.
    pub fn with_capacity(capacity: usize, output: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, output),
            itoa_buf: itoa::Buffer::new(),
        }
    }

    /// Write `fields` joined by tabs, followed by a newline.
    #[inline]
    pub fn write_row(&mut self, fields: &[&str]) -> Result<()> {
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                self.writer.write_all(b"\t")?;
            }
            self.writer.write_all(field.as_bytes())?;
        }
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Write a `chrom1\tpos1\tchrom2\tpos2` row.
    #[inline]
    pub fn write_position_pair(
        &mut self,
        chrom1: &str,
        pos1: u64,
        chrom2: &str,
        pos2: u64,
    ) -> Result<()> {
        self.writer.write_all(chrom1.as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.writer
            .write_all(self.itoa_buf.format(pos1).as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.writer.write_all(chrom2.as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.writer
            .write_all(self.itoa_buf.format(pos2).as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Flush the output buffer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_row() {
        let mut output = Vec::new();
        {
            let mut writer = TsvWriter::new(&mut output);
            writer.write_row(&["chr1", "pos1", "chr2", "pos2"]).unwrap();
            writer.flush().unwrap();
        }
        assert_eq!(output, b"chr1\tpos1\tchr2\tpos2\n");
    }

    #[test]
    fn test_write_position_pair() {
        let mut output = Vec::new();
        {
            let mut writer = TsvWriter::new(&mut output);
            writer
                .write_position_pair("chr1", 1000, "chr2", 5000)
                .unwrap();
            writer.flush().unwrap();
        }
        assert_eq!(output, b"chr1\t1000\tchr2\t5000\n");
    }
}
