//! Container runtime backends
//!
//! [`ContainerRuntime`] is the capability surface the launcher and cleaner
//! need. [`DockerCli`] drives the local `docker` binary; [`InMemoryRuntime`]
//! keeps containers in a map and is used for tests and `--dry-run`.

mod docker;
mod memory;
mod types;

pub use docker::{classify_docker_error, ensure_available, DockerCli};
pub use memory::{Call, FailOn, InMemoryRuntime, StoredContainer};
pub use types::{ContainerHandle, CreateOptions, DeviceMapping, ExecOptions, ExecOutput};

use std::time::Duration;

use crate::error::Result;

/// Operations a container runtime must support.
pub trait ContainerRuntime {
    /// Create and start a container.
    fn create(&mut self, opts: &CreateOptions) -> Result<ContainerHandle>;

    /// Run a command inside a running container.
    fn exec(&mut self, handle: &ContainerHandle, opts: &ExecOptions) -> Result<ExecOutput>;

    /// Look up a container by name. A missing container is `FleetError::NotFound`.
    fn get(&mut self, name: &str) -> Result<ContainerHandle>;

    /// Stop a container, killing it after `timeout`.
    fn stop(&mut self, handle: &ContainerHandle, timeout: Duration) -> Result<()>;

    fn remove(&mut self, handle: &ContainerHandle) -> Result<()>;
}
