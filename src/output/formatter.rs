//! Output formatting

use crate::fleet::{ContainerPlan, Report};
use crate::output::human::{format_human, format_plan_human};
use crate::output::json::{format_json, format_plan_json};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

pub fn format_report(report: &Report, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Human => format_human(report),
        OutputFormat::Json => format_json(report),
    }
}

pub fn format_plan(plans: &[ContainerPlan], format: &OutputFormat) -> String {
    match format {
        OutputFormat::Human => format_plan_human(plans),
        OutputFormat::Json => format_plan_json(plans),
    }
}
