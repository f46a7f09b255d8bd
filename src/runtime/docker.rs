//! `docker` CLI backend
//!
//! Every operation is a single invocation of the docker binary. Failures are
//! classified from the daemon's stderr into not-found, missing-image and
//! generic API errors.

use std::process::{Command, Output, Stdio};
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use tracing::debug;

use super::types::{ContainerHandle, CreateOptions, ExecOptions, ExecOutput};
use super::ContainerRuntime;
use crate::error::{FleetError, Result};

const DOCKER_BIN: &str = "docker";

/// Verify that the Docker daemon is reachable.
pub fn ensure_available(binary: &str) -> Result<()> {
    let status = Command::new(binary)
        .args(["version", "--format", "{{.Server.Version}}"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| {
            FleetError::RuntimeUnavailable(format!(
                "failed to invoke `{}`, is it installed and on PATH? ({})",
                binary, e
            ))
        })?;

    if !status.success() {
        return Err(FleetError::RuntimeUnavailable(format!(
            "docker daemon is not running ({})",
            status
        )));
    }
    Ok(())
}

fn not_found_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)no such (container|object)").expect("valid regex"))
}

fn missing_image_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(no such image|unable to find image|pull access denied)")
            .expect("valid regex")
    })
}

/// Turn docker's stderr into a typed error.
///
/// `subject` is the container name, or the image for `docker run`.
pub fn classify_docker_error(subject: &str, stderr: &str) -> FleetError {
    let text = stderr.trim();
    if not_found_re().is_match(text) {
        return FleetError::NotFound(subject.to_string());
    }
    if missing_image_re().is_match(text) {
        return FleetError::ImageNotFound(subject.to_string());
    }

    let explanation = text
        .lines()
        .map(|l| {
            l.trim_start_matches("Error response from daemon: ")
                .trim_start_matches("Error: ")
        })
        .collect::<Vec<_>>()
        .join("\n");
    FleetError::Api {
        explanation: if explanation.is_empty() {
            "docker exited without an error message".to_string()
        } else {
            explanation
        },
    }
}

/// Runtime backed by the local `docker` binary
#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: String,
}

impl DockerCli {
    pub fn new() -> Self {
        Self {
            binary: DOCKER_BIN.to_string(),
        }
    }

    /// Use a different executable, e.g. `podman`
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Arguments for `docker run`.
    ///
    /// Environment values are not placed on the command line; `--env KEY`
    /// makes docker read them from its own environment, which [`Self::create`]
    /// sets on the child process.
    pub fn run_args(opts: &CreateOptions) -> Vec<String> {
        let mut args = vec!["run".to_string()];
        if opts.detach {
            args.push("--detach".to_string());
        }
        if opts.tty {
            args.push("--tty".to_string());
        }
        args.extend(["--pull".to_string(), "never".to_string()]);
        args.extend(["--name".to_string(), opts.name.clone()]);

        for dev in &opts.devices {
            args.push("--device".to_string());
            args.push(format!(
                "{}:{}:{}",
                dev.path_on_host, dev.path_in_container, dev.cgroup_permissions
            ));
        }
        for vol in &opts.volumes {
            args.push("--volume".to_string());
            args.push(format!(
                "{}:{}:{}",
                vol.host.display(),
                vol.container.display(),
                vol.mode.as_str()
            ));
        }
        for (key, _) in &opts.env {
            args.push("--env".to_string());
            args.push(key.clone());
        }
        for group in &opts.group_add {
            args.push("--group-add".to_string());
            args.push(group.clone());
        }
        for sec in &opts.security_opt {
            args.push("--security-opt".to_string());
            args.push(sec.clone());
        }
        if let Some(ref ipc) = opts.ipc_mode {
            args.push("--ipc".to_string());
            args.push(ipc.clone());
        }
        if let Some(ref net) = opts.network_mode {
            args.push("--network".to_string());
            args.push(net.clone());
        }
        for cap in &opts.cap_add {
            args.push("--cap-add".to_string());
            args.push(cap.clone());
        }
        if let Some(ref wd) = opts.working_dir {
            args.push("--workdir".to_string());
            args.push(wd.clone());
        }
        args.push(opts.image.clone());
        args
    }

    /// Arguments for `docker exec`
    pub fn exec_args(target: &str, opts: &ExecOptions) -> Vec<String> {
        let mut args = vec!["exec".to_string()];
        if opts.detach {
            args.push("--detach".to_string());
        }
        if let Some(ref wd) = opts.workdir {
            args.push("--workdir".to_string());
            args.push(wd.clone());
        }
        args.push(target.to_string());
        args.extend(opts.command.iter().cloned());
        args
    }

    fn output(&self, args: &[String], env: &[(String, String)]) -> Result<Output> {
        debug!(binary = %self.binary, ?args, "invoking docker");
        let output = Command::new(&self.binary)
            .args(args)
            .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                FleetError::RuntimeUnavailable(format!("failed to spawn `{}`: {}", self.binary, e))
            })?;
        Ok(output)
    }

    fn checked(&self, subject: &str, args: &[String]) -> Result<String> {
        let output = self.output(args, &[])?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(classify_docker_error(
                subject,
                &String::from_utf8_lossy(&output.stderr),
            ))
        }
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerRuntime for DockerCli {
    fn create(&mut self, opts: &CreateOptions) -> Result<ContainerHandle> {
        let output = self.output(&Self::run_args(opts), &opts.env)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(match classify_docker_error(&opts.image, &stderr) {
                // "No such object" from run refers to the image, not a container
                FleetError::NotFound(_) => FleetError::ImageNotFound(opts.image.clone()),
                other => other,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let id = stdout.lines().last().unwrap_or_default().trim().to_string();
        Ok(ContainerHandle {
            id: if id.is_empty() { opts.name.clone() } else { id },
            name: opts.name.clone(),
        })
    }

    fn exec(&mut self, handle: &ContainerHandle, opts: &ExecOptions) -> Result<ExecOutput> {
        let output = self.output(&Self::exec_args(&handle.id, opts), &[])?;
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if output.status.success() {
            return Ok(ExecOutput {
                exit_code: if opts.detach { None } else { output.status.code() },
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr,
            });
        }

        // docker exec forwards the command's exit status; daemon-side
        // failures (missing container, stopped container) come back as
        // "Error response from daemon".
        if stderr.contains("Error response from daemon") || not_found_re().is_match(&stderr) {
            return Err(classify_docker_error(&handle.name, &stderr));
        }
        Err(FleetError::Exec {
            exit_code: output.status.code(),
            stderr: stderr.trim().to_string(),
        })
    }

    fn get(&mut self, name: &str) -> Result<ContainerHandle> {
        let args: Vec<String> = ["inspect", "--type", "container", "--format", "{{.Id}}", name]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let id = self.checked(name, &args)?;
        Ok(ContainerHandle {
            id,
            name: name.to_string(),
        })
    }

    fn stop(&mut self, handle: &ContainerHandle, timeout: Duration) -> Result<()> {
        let args = vec![
            "stop".to_string(),
            "-t".to_string(),
            timeout.as_secs().to_string(),
            handle.id.clone(),
        ];
        self.checked(&handle.name, &args).map(|_| ())
    }

    fn remove(&mut self, handle: &ContainerHandle) -> Result<()> {
        let args = vec!["rm".to_string(), handle.id.clone()];
        self.checked(&handle.name, &args).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MountMode, VolumeMount};
    use crate::runtime::DeviceMapping;
    use std::path::PathBuf;

    fn sample_options() -> CreateOptions {
        CreateOptions {
            image: "code-server".to_string(),
            name: "codeserver_dev_128".to_string(),
            detach: true,
            tty: true,
            devices: vec![
                DeviceMapping::passthrough("/dev/kfd"),
                DeviceMapping::passthrough("/dev/dri/renderD128"),
            ],
            volumes: vec![VolumeMount {
                host: PathBuf::from("/srv/models"),
                container: PathBuf::from("/models"),
                mode: MountMode::Rw,
            }],
            env: vec![("PASSWORD".to_string(), "s3cr3t!".to_string())],
            group_add: vec!["video".to_string()],
            security_opt: vec!["seccomp=unconfined".to_string()],
            ipc_mode: Some("host".to_string()),
            network_mode: Some("host".to_string()),
            cap_add: vec!["SYS_PTRACE".to_string()],
            working_dir: Some("/workspace".to_string()),
        }
    }

    fn has_pair(args: &[String], flag: &str, value: &str) -> bool {
        args.windows(2).any(|w| w[0] == flag && w[1] == value)
    }

    #[test]
    fn test_run_args_cover_all_options() {
        let args = DockerCli::run_args(&sample_options());
        assert_eq!(args[0], "run");
        assert!(args.contains(&"--detach".to_string()));
        assert!(args.contains(&"--tty".to_string()));
        assert!(has_pair(&args, "--pull", "never"));
        assert!(has_pair(&args, "--name", "codeserver_dev_128"));
        assert!(has_pair(&args, "--device", "/dev/kfd:/dev/kfd:rwm"));
        assert!(has_pair(
            &args,
            "--device",
            "/dev/dri/renderD128:/dev/dri/renderD128:rwm"
        ));
        assert!(has_pair(&args, "--volume", "/srv/models:/models:rw"));
        assert!(has_pair(&args, "--group-add", "video"));
        assert!(has_pair(&args, "--security-opt", "seccomp=unconfined"));
        assert!(has_pair(&args, "--ipc", "host"));
        assert!(has_pair(&args, "--network", "host"));
        assert!(has_pair(&args, "--cap-add", "SYS_PTRACE"));
        assert!(has_pair(&args, "--workdir", "/workspace"));
        assert_eq!(args.last().map(String::as_str), Some("code-server"));
    }

    #[test]
    fn test_run_args_keep_secrets_off_command_line() {
        let args = DockerCli::run_args(&sample_options());
        assert!(has_pair(&args, "--env", "PASSWORD"));
        assert!(!args.iter().any(|a| a.contains("s3cr3t!")));
    }

    #[test]
    fn test_exec_args_detached_with_workdir() {
        let opts = ExecOptions::bash("echo hi").detached().in_dir("/workspace");
        let args = DockerCli::exec_args("abc123", &opts);
        assert_eq!(
            args,
            vec!["exec", "--detach", "--workdir", "/workspace", "abc123", "bash", "-c", "echo hi"]
        );
    }

    #[test]
    fn test_classify_not_found() {
        let err = classify_docker_error(
            "codeserver_dev_128",
            "Error response from daemon: No such container: codeserver_dev_128\n",
        );
        assert!(matches!(err, FleetError::NotFound(ref n) if n == "codeserver_dev_128"));

        let err = classify_docker_error("x", "Error: No such object: x");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_classify_missing_image() {
        let err = classify_docker_error(
            "code-server",
            "Error response from daemon: No such image: code-server:latest",
        );
        assert!(matches!(err, FleetError::ImageNotFound(ref i) if i == "code-server"));
    }

    #[test]
    fn test_classify_api_error_strips_prefix() {
        let err = classify_docker_error(
            "codeserver_dev_128",
            "docker: Error response from daemon: Conflict. The container name is already in use.",
        );
        match err {
            FleetError::Api { explanation } => {
                assert!(explanation.contains("Conflict. The container name is already in use."));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_classify_empty_stderr() {
        let err = classify_docker_error("x", "  ");
        assert!(matches!(err, FleetError::Api { .. }));
    }

    #[test]
    fn test_missing_binary_is_runtime_unavailable() {
        let err = ensure_available("definitely-not-a-docker-binary-12345").unwrap_err();
        assert!(matches!(err, FleetError::RuntimeUnavailable(_)));
    }

    #[test]
    fn test_spawn_failure_maps_to_runtime_unavailable() {
        let mut docker = DockerCli::with_binary("definitely-not-a-docker-binary-12345");
        let err = docker.get("codeserver_dev_128").unwrap_err();
        assert!(matches!(err, FleetError::RuntimeUnavailable(_)));
    }
}
