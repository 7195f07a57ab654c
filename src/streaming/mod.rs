//! Shared streaming components.
//!
//! - The keep/drop filter pass used by the VCF commands
//! - Buffered TSV output
//!
//! Every command reads its input exactly once, in order.

pub mod filter;
pub mod output;

pub use filter::{filter_variants, FilterStats, VariantSink, VariantView};
pub use output::TsvWriter;
