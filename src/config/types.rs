//! Fleet configuration types
//!
//! The identifier list and naming convention are shared by the launcher and
//! the cleaner, so both read them from one [`FleetConfig`].

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FleetError, Result};

/// Access mode of a bind mount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MountMode {
    Rw,
    Ro,
}

impl MountMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MountMode::Rw => "rw",
            MountMode::Ro => "ro",
        }
    }
}

/// A host directory bound into every container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeMount {
    pub host: PathBuf,
    pub container: PathBuf,
    #[serde(default = "default_mount_mode")]
    pub mode: MountMode,
}

fn default_mount_mode() -> MountMode {
    MountMode::Rw
}

/// How the public address for access URLs is discovered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpLookup {
    /// Command and arguments whose stdout is the public address
    pub command: Vec<String>,
    pub timeout_secs: u64,
    /// Address used when the lookup fails
    pub fallback: String,
}

impl Default for IpLookup {
    fn default() -> Self {
        Self {
            command: vec![
                "curl".to_string(),
                "--silent".to_string(),
                "ifconfig.me".to_string(),
            ],
            timeout_secs: 10,
            fallback: "127.0.0.1".to_string(),
        }
    }
}

impl IpLookup {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Everything the launcher and cleaner need to know about the fleet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    /// Prepended to each render id to form the container name
    pub prefix: String,
    /// Render device ids, one container per id, in launch order
    pub render_ids: Vec<u32>,
    /// Port of the first container; each following one adds 100
    pub base_port: u16,
    /// Local image to run
    pub image: String,
    pub volumes: Vec<VolumeMount>,
    pub password_length: usize,
    /// Working directory inside the container
    pub workdir: String,
    pub stop_timeout_secs: u64,
    /// CSV file the launcher writes
    pub output: PathBuf,
    pub ip_lookup: IpLookup,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            prefix: "codeserver_dev_".to_string(),
            render_ids: vec![128, 136, 144, 152, 160, 168, 176, 184],
            base_port: 8080,
            image: "code-server".to_string(),
            volumes: vec![VolumeMount {
                host: PathBuf::from("/home/shepande/models"),
                container: PathBuf::from("/models"),
                mode: MountMode::Rw,
            }],
            password_length: 16,
            workdir: "/workspace".to_string(),
            stop_timeout_secs: 5,
            output: PathBuf::from("code_server_containers.csv"),
            ip_lookup: IpLookup::default(),
        }
    }
}

impl FleetConfig {
    pub fn stop_timeout(&self) -> Duration {
        Duration::from_secs(self.stop_timeout_secs)
    }

    /// Reject configurations that cannot produce a consistent fleet
    pub fn validate(&self) -> Result<()> {
        if self.render_ids.is_empty() {
            return Err(FleetError::Config("render_ids must not be empty".to_string()));
        }

        let mut seen = std::collections::HashSet::new();
        for id in &self.render_ids {
            if !seen.insert(id) {
                return Err(FleetError::Config(format!("duplicate render id {}", id)));
            }
        }

        if self.password_length == 0 {
            return Err(FleetError::Config(
                "password_length must be at least 1".to_string(),
            ));
        }

        if let Some(bad) = self
            .prefix
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(*c, '_' | '.' | '-')))
        {
            return Err(FleetError::Config(format!(
                "prefix may only contain [A-Za-z0-9_.-], found {:?}",
                bad
            )));
        }

        if self.image.trim().is_empty() {
            return Err(FleetError::Config("image must not be empty".to_string()));
        }

        let last_index = self.render_ids.len() - 1;
        crate::fleet::naming::port_for(self.base_port, last_index)?;

        if self.ip_lookup.command.is_empty() {
            return Err(FleetError::Config(
                "ip_lookup.command must name a program".to_string(),
            ));
        }

        Ok(())
    }
}
