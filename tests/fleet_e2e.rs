//! End-to-end launch and clean passes against the in-memory runtime.

use devfleet::config::FleetConfig;
use devfleet::error::FleetError;
use devfleet::fleet::{clean, launch_and_save, Outcome};
use devfleet::runtime::{FailOn, InMemoryRuntime};

fn config_in(dir: &tempfile::TempDir, ids: Vec<u32>) -> FleetConfig {
    FleetConfig {
        render_ids: ids,
        output: dir.path().join("code_server_containers.csv"),
        ..FleetConfig::default()
    }
}

fn read_rows(path: &std::path::Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

#[test]
fn launching_two_ids_writes_header_and_two_rows() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_in(&dir, vec![128, 136]);
    let mut runtime = InMemoryRuntime::new();

    let report = launch_and_save(&cfg, &mut runtime, "203.0.113.9").unwrap();
    assert_eq!(report.succeeded(), 2);

    let rows = read_rows(&cfg.output);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], vec!["Container Name", "Password", "Access URL"]);
    assert_eq!(rows[1][0], "codeserver_dev_128");
    assert!(rows[1][2].contains(":8080"));
    assert_eq!(rows[2][0], "codeserver_dev_136");
    assert!(rows[2][2].contains(":8180"));
    assert_eq!(rows[2][2], "http://203.0.113.9:8180");
    assert_eq!(rows[1][1].len(), 16);
}

#[test]
fn create_failure_for_one_id_still_attempts_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_in(&dir, vec![128, 136, 144]);
    let mut runtime = InMemoryRuntime::new();
    runtime.fail(FailOn::Create, "codeserver_dev_136", |_| FleetError::Api {
        explanation: "Conflict. The container name is already in use".into(),
    });

    let report = launch_and_save(&cfg, &mut runtime, "127.0.0.1").unwrap();
    assert_eq!(report.failed(), 1);
    assert!(report.has_failures());
    assert_eq!(report.exit_code(false), 1);
    assert_eq!(report.exit_code(true), 0);

    let rows = read_rows(&cfg.output);
    let names: Vec<&str> = rows[1..].iter().map(|r| r[0].as_str()).collect();
    assert_eq!(names, vec!["codeserver_dev_128", "codeserver_dev_144"]);
    assert!(rows[2][2].ends_with(":8280"));
}

#[test]
fn launch_then_clean_leaves_nothing_behind() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_in(&dir, vec![128, 136]);
    let mut runtime = InMemoryRuntime::new();

    launch_and_save(&cfg, &mut runtime, "127.0.0.1").unwrap();
    assert_eq!(runtime.names().len(), 2);

    let report = clean(&cfg, &mut runtime).unwrap();
    assert!(report
        .items
        .iter()
        .all(|item| item.outcome == Outcome::Removed));
    assert!(runtime.names().is_empty());

    // A second pass finds nothing and only skips.
    let again = clean(&cfg, &mut runtime).unwrap();
    assert_eq!(again.skipped(), 2);
    assert_eq!(again.exit_code(false), 0);
}

#[test]
fn every_id_failing_still_writes_header() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_in(&dir, vec![128]);
    let mut runtime = InMemoryRuntime::new();
    runtime.fail(FailOn::Create, "codeserver_dev_128", |_| {
        FleetError::ImageNotFound("code-server".into())
    });

    let report = launch_and_save(&cfg, &mut runtime, "127.0.0.1").unwrap();
    assert_eq!(report.failed(), 1);
    assert_eq!(read_rows(&cfg.output).len(), 1);
}
