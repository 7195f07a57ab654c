//! Output configuration for a single run.
//!
//! Every command writes one file into an explicit output directory, named
//! after its input with a command-specific marker in place of the
//! extension. Nothing here reads process-wide state.

use crate::error::{FilterError, Result};
use std::ffi::OsStr;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Extensions recognised on VCF inputs, longest first.
pub const VCF_EXTENSIONS: &[&str] = &[".vcf.gz", ".vcf"];

/// Extensions recognised on breakpoint tables.
pub const TSV_EXTENSIONS: &[&str] = &[".tsv"];

/// Where a command writes its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub output_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

impl OutputConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Output path for `input`, see [`output_path`].
    pub fn output_path(&self, input: &Path, extensions: &[&str], replacement: &str) -> Result<PathBuf> {
        output_path(input, &self.output_dir, extensions, replacement)
    }
}

/// Derive an output path from the input's file name.
///
/// The first of `extensions` that ends the file name is replaced by
/// `replacement`; if none matches, `replacement` is appended.
///
/// ```
/// use somafilt::config::{output_path, VCF_EXTENSIONS};
/// use std::path::Path;
///
/// let out = output_path(
///     Path::new("/data/tumor.vcf.gz"),
///     Path::new("out"),
///     VCF_EXTENSIONS,
///     ".intersectFiltered.vcf",
/// )
/// .unwrap();
/// assert_eq!(out, Path::new("out/tumor.intersectFiltered.vcf"));
/// ```
pub fn output_path(
    input: &Path,
    output_dir: &Path,
    extensions: &[&str],
    replacement: &str,
) -> Result<PathBuf> {
    let name = input
        .file_name()
        .and_then(OsStr::to_str)
        .ok_or_else(|| {
            FilterError::InvalidArgument(format!(
                "input path '{}' has no usable file name",
                input.display()
            ))
        })?;

    let stem = extensions
        .iter()
        .find_map(|ext| name.strip_suffix(ext))
        .unwrap_or(name);

    Ok(output_dir.join(format!("{}{}", stem, replacement)))
}

/// Marker inserted by the normal-VAF filter, e.g. `.nin_filter_0.01.vcf`.
pub fn nin_filter_marker(threshold: f64) -> String {
    let mut buf = ryu::Buffer::new();
    format!(".nin_filter_{}.vcf", buf.format(threshold))
}

/// An output file that only appears under its final name once complete.
///
/// Data is written to a temporary file in the destination directory and
/// renamed by [`AtomicOutput::persist`]. Dropping it without persisting
/// removes the temporary file.
pub struct AtomicOutput {
    temp: NamedTempFile,
    path: PathBuf,
}

impl AtomicOutput {
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dir.is_dir() {
            return Err(FilterError::InvalidArgument(format!(
                "output directory '{}' does not exist",
                dir.display()
            )));
        }
        let temp = NamedTempFile::new_in(&dir)?;
        Ok(Self { temp, path })
    }

    /// Final path of the output.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Handle to write through.
    pub fn file(&self) -> Result<File> {
        Ok(self.temp.reopen()?)
    }

    /// Move the finished file to its final path.
    pub fn persist(self) -> Result<PathBuf> {
        self.temp
            .persist(&self.path)
            .map_err(|e| FilterError::Io(e.error))?;
        Ok(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_vcf_output_names() {
        let dir = Path::new("out");
        let marker = nin_filter_marker(0.01);
        assert_eq!(marker, ".nin_filter_0.01.vcf");

        assert_eq!(
            output_path(Path::new("a/sample.vcf"), dir, VCF_EXTENSIONS, &marker).unwrap(),
            Path::new("out/sample.nin_filter_0.01.vcf")
        );
        assert_eq!(
            output_path(Path::new("sample.vcf.gz"), dir, VCF_EXTENSIONS, &marker).unwrap(),
            Path::new("out/sample.nin_filter_0.01.vcf")
        );
        assert_eq!(
            output_path(Path::new("sample.bcf"), dir, VCF_EXTENSIONS, &marker).unwrap(),
            Path::new("out/sample.bcf.nin_filter_0.01.vcf")
        );
    }

    #[test]
    fn test_tsv_output_name() {
        let out = output_path(
            Path::new("calls.filtered.tsv"),
            Path::new("."),
            TSV_EXTENSIONS,
            ".simplebp.tsv",
        )
        .unwrap();
        assert_eq!(out, Path::new("./calls.filtered.simplebp.tsv"));
    }

    #[test]
    fn test_threshold_marker_keeps_decimal_point() {
        assert_eq!(nin_filter_marker(1.0), ".nin_filter_1.0.vcf");
        assert_eq!(nin_filter_marker(0.05), ".nin_filter_0.05.vcf");
    }

    #[test]
    fn test_atomic_output_persist() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("result.tsv");

        let output = AtomicOutput::create(&target).unwrap();
        assert!(!target.exists());
        output.file().unwrap().write_all(b"chr1\t1\n").unwrap();
        let path = output.persist().unwrap();

        assert_eq!(path, target);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "chr1\t1\n");
    }

    #[test]
    fn test_atomic_output_dropped_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("result.tsv");
        {
            let output = AtomicOutput::create(&target).unwrap();
            output.file().unwrap().write_all(b"partial").unwrap();
        }
        assert!(!target.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("result.tsv");
        assert!(matches!(
            AtomicOutput::create(target),
            Err(FilterError::InvalidArgument(_))
        ));
    }
}
