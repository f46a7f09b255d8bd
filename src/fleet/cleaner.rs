//! Clean pass: stop and remove every configured container

use tracing::{error, info, warn};

use super::naming;
use super::report::{Operation, Outcome, Report};
use crate::config::FleetConfig;
use crate::error::Result;
use crate::runtime::ContainerRuntime;

/// Stop then remove each configured container.
///
/// A container that does not exist is skipped with a warning. Any other
/// runtime error is recorded and the loop continues.
pub fn clean(config: &FleetConfig, runtime: &mut dyn ContainerRuntime) -> Result<Report> {
    let plans = naming::plan(config)?;
    let mut report = Report::new(Operation::Clean);

    for plan in &plans {
        let outcome = match clean_one(config, runtime, &plan.name) {
            Ok(()) => Outcome::Removed,
            Err(e) if e.is_not_found() => {
                warn!(container = %plan.name, "container not found, skipping");
                Outcome::Skipped {
                    reason: "not found".to_string(),
                }
            }
            Err(e) => {
                error!(container = %plan.name, error = %e, "cleanup failed");
                Outcome::failed(&e)
            }
        };
        report.push(plan.name.clone(), plan.render_id, outcome);
    }

    report.finish();
    Ok(report)
}

fn clean_one(config: &FleetConfig, runtime: &mut dyn ContainerRuntime, name: &str) -> Result<()> {
    let handle = runtime.get(name)?;

    info!(container = %name, timeout_secs = config.stop_timeout_secs, "stopping container");
    runtime.stop(&handle, config.stop_timeout())?;

    info!(container = %name, "removing container");
    runtime.remove(&handle)
}
