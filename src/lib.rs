//! somafilt: post-processing filters for somatic variant calls
//!
//! This library provides the interval model and streaming filters used to
//! clean up SNV and structural-variant call files.
//!
//! # Features
//!
//! - **Normal-VAF filter**: drop calls with too much variant support in the
//!   matched normal sample
//! - **Breakpoint filter**: keep SV records whose breakpoint is listed in a
//!   breakpoint table
//! - **Breakpoint simplifier**: reduce breakpoint tables to start positions
//!
//! # Example
//!
//! ```rust,no_run
//! use somafilt::commands::{NinFilterCommand, NormalSample};
//! use somafilt::config::OutputConfig;
//!
//! let cmd = NinFilterCommand::new(NormalSample::OtherThan("TUMOR".into()), 0.01).unwrap();
//! let (path, stats) = cmd.run("calls.vcf", &OutputConfig::new("out")).unwrap();
//! println!("{}: {}", path.display(), stats);
//! ```

pub mod breakpoint;
pub mod commands;
pub mod config;
pub mod error;
pub mod interval;
pub mod streaming;
pub mod vcf;

// Re-export commonly used types
pub use breakpoint::{BreakpointReader, BreakpointRecord, BreakpointSet};
pub use error::{FilterError, Result};
pub use interval::{Direction, Interval};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::breakpoint::{BreakpointReader, BreakpointRecord, BreakpointSet};
    pub use crate::commands::{
        BreakpointFilterCommand, BreakpointSimplifyCommand, NinFilterCommand, NormalSample,
    };
    pub use crate::config::OutputConfig;
    pub use crate::error::{FilterError, Result};
    pub use crate::interval::{Direction, Interval};
    pub use crate::streaming::{filter_variants, FilterStats, VariantSink, VariantView};
}
