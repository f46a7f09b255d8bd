//! Launch pass: one code-server container per configured render id

use tracing::{debug, error, info, warn};

use super::naming::{self, ContainerPlan};
use super::password::generate_password;
use super::report::{ManagedContainer, Operation, Outcome, Report};
use crate::config::FleetConfig;
use crate::error::{FleetError, Result};
use crate::output::csv::write_records;
use crate::runtime::{ContainerHandle, ContainerRuntime, CreateOptions, ExecOptions};

/// Installs code-server only when it is not already on PATH
pub const INSTALL_SCRIPT: &str =
    "which code-server || curl -fsSL https://code-server.dev/install.sh | sh";

/// Background start command for the server on `port`, logging under `workdir`
pub fn start_script(port: u16, workdir: &str) -> String {
    format!(
        "nohup code-server --bind-addr 0.0.0.0:{port} --auth password > {dir}/code-server-{port}.log 2>&1 &",
        port = port,
        dir = workdir.trim_end_matches('/'),
    )
}

pub fn access_url(public_ip: &str, port: u16) -> String {
    format!("http://{}:{}", public_ip, port)
}

/// Container creation request for one planned container
pub fn create_options(config: &FleetConfig, plan: &ContainerPlan, password: &str) -> CreateOptions {
    CreateOptions {
        image: config.image.clone(),
        name: plan.name.clone(),
        detach: true,
        tty: true,
        devices: plan.devices.clone(),
        volumes: config.volumes.clone(),
        env: vec![("PASSWORD".to_string(), password.to_string())],
        group_add: vec!["video".to_string()],
        security_opt: vec!["seccomp=unconfined".to_string()],
        ipc_mode: Some("host".to_string()),
        network_mode: Some("host".to_string()),
        cap_add: vec!["SYS_PTRACE".to_string()],
        working_dir: Some(config.workdir.clone()),
    }
}

/// Launch every configured container.
///
/// Each container is attempted independently: a failure is logged, recorded
/// in the report, and the loop moves on. Nothing is retried or rolled back.
pub fn launch(
    config: &FleetConfig,
    runtime: &mut dyn ContainerRuntime,
    public_ip: &str,
) -> Result<Report> {
    let plans = naming::plan(config)?;
    let mut report = Report::new(Operation::Launch);

    for plan in &plans {
        let outcome = match launch_one(config, runtime, plan, public_ip) {
            Ok(record) => {
                info!(container = %record.name, url = %record.url, "code-server ready");
                debug!(container = %record.name, password = %record.password, "code-server credentials");
                Outcome::Launched { record }
            }
            Err(LaunchError::Create(e)) => {
                error!(container = %plan.name, error = %e, "launch failed");
                Outcome::failed(&e)
            }
            Err(LaunchError::Provision(e)) => {
                error!(container = %plan.name, error = %e, "launch failed");
                warn!(
                    container = %plan.name,
                    port = plan.port,
                    "container left running, run `devfleet clean` to remove it"
                );
                Outcome::failed_left_running(&e, plan.port)
            }
        };
        report.push(plan.name.clone(), plan.render_id, outcome);
    }

    report.finish();
    Ok(report)
}

/// [`launch`], then overwrite the CSV file named in the config with the
/// launched records (an empty fleet still gets a header row).
pub fn launch_and_save(
    config: &FleetConfig,
    runtime: &mut dyn ContainerRuntime,
    public_ip: &str,
) -> Result<Report> {
    let report = launch(config, runtime, public_ip)?;
    write_records(&config.output, &report.launched())?;
    info!(path = %config.output.display(), "container info saved");
    Ok(report)
}

/// Where a single launch stopped: before or after the container existed
enum LaunchError {
    Create(FleetError),
    Provision(FleetError),
}

fn launch_one(
    config: &FleetConfig,
    runtime: &mut dyn ContainerRuntime,
    plan: &ContainerPlan,
    public_ip: &str,
) -> std::result::Result<ManagedContainer, LaunchError> {
    let password = generate_password(config.password_length);

    info!(container = %plan.name, image = %config.image, "launching container");
    let handle = runtime
        .create(&create_options(config, plan, &password))
        .map_err(LaunchError::Create)?;

    install_code_server(config, runtime, &handle).map_err(LaunchError::Provision)?;

    info!(container = %plan.name, port = plan.port, "starting code-server");
    let start = ExecOptions::bash(start_script(plan.port, &config.workdir))
        .detached()
        .in_dir(config.workdir.clone());
    runtime.exec(&handle, &start).map_err(LaunchError::Provision)?;

    Ok(ManagedContainer {
        name: plan.name.clone(),
        port: plan.port,
        password,
        url: access_url(public_ip, plan.port),
    })
}

fn install_code_server(
    config: &FleetConfig,
    runtime: &mut dyn ContainerRuntime,
    handle: &ContainerHandle,
) -> Result<()> {
    info!(container = %handle.name, "installing code-server if not already present");
    let install = ExecOptions::bash(INSTALL_SCRIPT).in_dir(config.workdir.clone());
    runtime.exec(handle, &install)?;
    Ok(())
}
