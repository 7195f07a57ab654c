//! Command implementations for somafilt.

pub mod bp_filter;
pub mod bp_simplify;
pub mod nin_filter;

pub use bp_filter::BreakpointFilterCommand;
pub use bp_simplify::BreakpointSimplifyCommand;
pub use nin_filter::{NinFilterCommand, NormalSample};
