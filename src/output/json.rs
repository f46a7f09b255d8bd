//! JSON output formatting

use serde_json::{json, Value};

use crate::fleet::{ContainerPlan, Report};

pub fn format_json(report: &Report) -> String {
    let data: Value = json!({
        "operation": report.operation,
        "started_at": report.started_at,
        "finished_at": report.finished_at,
        "summary": {
            "succeeded": report.succeeded(),
            "skipped": report.skipped(),
            "failed": report.failed(),
        },
        "items": serde_json::to_value(&report.items).unwrap_or(json!(null)),
    });

    serde_json::to_string_pretty(&data).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_plan_json(plans: &[ContainerPlan]) -> String {
    serde_json::to_string_pretty(&json!({ "containers": plans }))
        .unwrap_or_else(|_| "{}".to_string())
}
