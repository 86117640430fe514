//! CLI command handling

pub mod consume;
pub mod output;

pub use consume::*;
pub use output::*;
