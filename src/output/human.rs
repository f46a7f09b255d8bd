//! Human-readable output formatting

use crate::fleet::{ContainerPlan, Operation, Outcome, Report};

pub fn format_human(report: &Report) -> String {
    let title = match report.operation {
        Operation::Launch => "Launch Report",
        Operation::Clean => "Cleanup Report",
    };
    let mut output = format!("{}\n{}\n", title, "-".repeat(title.len()));

    if report.items.is_empty() {
        output.push_str("No containers configured\n");
        return output;
    }

    output.push_str(&format!("{:<24} {:<10} {}\n", "NAME", "STATUS", "DETAIL"));
    output.push_str(&"-".repeat(60));
    output.push('\n');
    for item in &report.items {
        let detail = match &item.outcome {
            Outcome::Launched { record } => record.url.clone(),
            Outcome::Removed => "stopped and removed".to_string(),
            Outcome::Skipped { reason } => reason.clone(),
            Outcome::Failed {
                error,
                left_running_on: Some(port),
                ..
            } => format!(
                "{} (left running on port {}, run `devfleet clean` to remove)",
                first_line(error),
                port
            ),
            Outcome::Failed { error, .. } => first_line(error),
        };
        output.push_str(&format!(
            "{:<24} {:<10} {}\n",
            truncate(&item.name, 24),
            item.outcome.label(),
            detail
        ));
    }

    match report.operation {
        Operation::Launch => {
            let launched = report.launched();
            if !launched.is_empty() {
                output.push_str("\nCode-server containers launched:\n");
                for rec in launched {
                    output.push_str(&format!(
                        "  {} -> {} (pass: {})\n",
                        rec.name, rec.url, rec.password
                    ));
                }
            }
        }
        Operation::Clean => {}
    }

    output.push_str(&format!(
        "\n{} succeeded, {} skipped, {} failed\n",
        report.succeeded(),
        report.skipped(),
        report.failed()
    ));
    output
}

pub fn format_plan_human(plans: &[ContainerPlan]) -> String {
    if plans.is_empty() {
        return "No containers configured".to_string();
    }
    let mut output = String::from("Fleet Plan\n----------\n");
    output.push_str(&format!(
        "{:<24} {:>6}  {}\n",
        "NAME", "PORT", "DEVICES"
    ));
    output.push_str(&"-".repeat(60));
    output.push('\n');
    for plan in plans {
        let devices: Vec<&str> = plan
            .devices
            .iter()
            .map(|d| d.path_on_host.as_str())
            .collect();
        output.push_str(&format!(
            "{:<24} {:>6}  {}\n",
            truncate(&plan.name, 24),
            plan.port,
            devices.join(", ")
        ));
    }
    output
}

fn first_line(s: &str) -> String {
    s.lines().next().unwrap_or_default().to_string()
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FleetError;
    use crate::fleet::ManagedContainer;

    #[test]
    fn test_launch_report_lists_urls_and_passwords() {
        let mut report = Report::new(Operation::Launch);
        report.push(
            "codeserver_dev_128",
            128,
            Outcome::Launched {
                record: ManagedContainer {
                    name: "codeserver_dev_128".into(),
                    port: 8080,
                    password: "hunter2".into(),
                    url: "http://127.0.0.1:8080".into(),
                },
            },
        );
        report.push(
            "codeserver_dev_136",
            136,
            Outcome::failed(&FleetError::ImageNotFound("code-server".into())),
        );

        let text = format_human(&report);
        assert!(text.starts_with("Launch Report\n"));
        assert!(text.contains("codeserver_dev_128 -> http://127.0.0.1:8080 (pass: hunter2)"));
        assert!(text.contains("Image 'code-server' not found locally"));
        assert!(text.contains("1 succeeded, 0 skipped, 1 failed"));
    }

    #[test]
    fn test_failure_after_create_points_at_clean() {
        let mut report = Report::new(Operation::Launch);
        report.push(
            "codeserver_dev_128",
            128,
            Outcome::failed_left_running(
                &FleetError::Exec {
                    exit_code: Some(127),
                    stderr: "curl: not found".into(),
                },
                8080,
            ),
        );
        let text = format_human(&report);
        assert!(text.contains("left running on port 8080, run `devfleet clean` to remove"));
    }

    #[test]
    fn test_clean_report_shows_skips() {
        let mut report = Report::new(Operation::Clean);
        report.push(
            "codeserver_dev_128",
            128,
            Outcome::Skipped {
                reason: "not found".into(),
            },
        );
        let text = format_human(&report);
        assert!(text.starts_with("Cleanup Report\n"));
        assert!(text.contains("skipped"));
        assert!(text.contains("0 succeeded, 1 skipped, 0 failed"));
    }

    #[test]
    fn test_plan_table() {
        let cfg = crate::config::FleetConfig {
            render_ids: vec![128, 136],
            ..Default::default()
        };
        let plans = crate::fleet::plan(&cfg).unwrap();
        let text = format_plan_human(&plans);
        assert!(text.contains("codeserver_dev_136"));
        assert!(text.contains("8180"));
        assert!(text.contains("/dev/kfd, /dev/dri/renderD136"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a_very_long_container_name", 10), "a_very_...");
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("κκκκκκκκκκκκ128", 10), "κκκκκκκ...");
        assert_eq!(truncate("κκκ", 3), "κκκ");
    }

    #[test]
    fn test_plan_table_with_multibyte_names() {
        let cfg = crate::config::FleetConfig {
            prefix: "κ".repeat(24),
            render_ids: vec![128],
            ..Default::default()
        };
        let plans = crate::fleet::plan(&cfg).unwrap();
        let text = format_plan_human(&plans);
        assert!(text.contains(&format!("{}...", "κ".repeat(21))));
    }
}
