//! Request and response types exchanged with a container runtime

use serde::{Deserialize, Serialize};

use crate::config::VolumeMount;

/// A host device node exposed inside the container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceMapping {
    pub path_on_host: String,
    pub path_in_container: String,
    pub cgroup_permissions: String,
}

impl DeviceMapping {
    /// Map a device to the same path inside the container with `rwm` access
    pub fn passthrough(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            path_on_host: path.clone(),
            path_in_container: path,
            cgroup_permissions: "rwm".to_string(),
        }
    }
}

/// Everything needed to create and start one container
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateOptions {
    pub image: String,
    pub name: String,
    pub detach: bool,
    pub tty: bool,
    pub devices: Vec<DeviceMapping>,
    pub volumes: Vec<VolumeMount>,
    pub env: Vec<(String, String)>,
    pub group_add: Vec<String>,
    pub security_opt: Vec<String>,
    pub ipc_mode: Option<String>,
    pub network_mode: Option<String>,
    pub cap_add: Vec<String>,
    pub working_dir: Option<String>,
}

/// Reference to a container known to the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHandle {
    pub id: String,
    pub name: String,
}

/// A command to run inside an existing container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOptions {
    pub command: Vec<String>,
    /// Return immediately instead of waiting for the command
    pub detach: bool,
    pub workdir: Option<String>,
}

impl ExecOptions {
    /// Run `script` through `bash -c`
    pub fn bash(script: impl Into<String>) -> Self {
        Self {
            command: vec!["bash".to_string(), "-c".to_string(), script.into()],
            detach: false,
            workdir: None,
        }
    }

    pub fn detached(mut self) -> Self {
        self.detach = true;
        self
    }

    pub fn in_dir(mut self, dir: impl Into<String>) -> Self {
        self.workdir = Some(dir.into());
        self
    }
}

/// Result of an exec; detached execs carry no exit code or output
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}
