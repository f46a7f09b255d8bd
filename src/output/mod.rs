//! Output: report rendering and the CSV record file

pub mod csv;
pub mod formatter;
pub mod human;
pub mod json;

pub use formatter::{format_plan, format_report, OutputFormat};
