//! In-memory runtime.
//!
//! Keeps created containers in a map, records every call in order, and can be
//! primed to fail a given operation for a given container. Used by the test
//! suite and by `--dry-run`, where nothing should touch the real daemon.

use std::collections::BTreeMap;
use std::time::Duration;

use super::types::{ContainerHandle, CreateOptions, ExecOptions, ExecOutput};
use super::ContainerRuntime;
use crate::error::{FleetError, Result};

/// One call made against the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create(String),
    Exec { name: String, command: Vec<String>, detach: bool },
    Get(String),
    Stop { name: String, timeout: Duration },
    Remove(String),
}

/// Operation to fail for a primed container name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Create,
    Exec,
    Get,
    Stop,
    Remove,
}

struct Primed {
    op: FailOn,
    name: String,
    error: fn(&str) -> FleetError,
}

impl std::fmt::Debug for Primed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Primed")
            .field("op", &self.op)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Test-double runtime holding containers in memory
#[derive(Debug, Default)]
pub struct InMemoryRuntime {
    /// Running containers, keyed by name
    containers: BTreeMap<String, StoredContainer>,
    /// Every call, in order
    pub calls: Vec<Call>,
    failures: Vec<Primed>,
    next_id: u64,
}

/// What the runtime remembers about a created container
#[derive(Debug, Clone)]
pub struct StoredContainer {
    pub id: String,
    pub options: CreateOptions,
    pub execs: Vec<ExecOptions>,
    pub running: bool,
}

impl InMemoryRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with containers that already exist under the given names.
    pub fn with_containers(names: &[&str]) -> Self {
        let mut runtime = Self::new();
        for name in names {
            let opts = CreateOptions {
                name: name.to_string(),
                ..CreateOptions::default()
            };
            runtime.insert(opts);
        }
        runtime
    }

    /// Make `op` fail for container `name` with the error built by `error`.
    pub fn fail(&mut self, op: FailOn, name: &str, error: fn(&str) -> FleetError) {
        self.failures.push(Primed {
            op,
            name: name.to_string(),
            error,
        });
    }

    pub fn container(&self, name: &str) -> Option<&StoredContainer> {
        self.containers.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.containers.keys().map(|s| s.as_str()).collect()
    }

    fn insert(&mut self, options: CreateOptions) -> ContainerHandle {
        self.next_id += 1;
        let id = format!("{:012x}", self.next_id);
        let handle = ContainerHandle {
            id: id.clone(),
            name: options.name.clone(),
        };
        self.containers.insert(
            options.name.clone(),
            StoredContainer {
                id,
                options,
                execs: Vec::new(),
                running: true,
            },
        );
        handle
    }

    fn check(&self, op: FailOn, name: &str) -> Result<()> {
        match self.failures.iter().find(|p| p.op == op && p.name == name) {
            Some(primed) => Err((primed.error)(name)),
            None => Ok(()),
        }
    }
}

impl ContainerRuntime for InMemoryRuntime {
    fn create(&mut self, opts: &CreateOptions) -> Result<ContainerHandle> {
        self.calls.push(Call::Create(opts.name.clone()));
        self.check(FailOn::Create, &opts.name)?;
        if self.containers.contains_key(&opts.name) {
            return Err(FleetError::Api {
                explanation: format!(
                    "Conflict. The container name \"/{}\" is already in use",
                    opts.name
                ),
            });
        }
        Ok(self.insert(opts.clone()))
    }

    fn exec(&mut self, handle: &ContainerHandle, opts: &ExecOptions) -> Result<ExecOutput> {
        self.calls.push(Call::Exec {
            name: handle.name.clone(),
            command: opts.command.clone(),
            detach: opts.detach,
        });
        self.check(FailOn::Exec, &handle.name)?;
        let container = self
            .containers
            .get_mut(&handle.name)
            .ok_or_else(|| FleetError::NotFound(handle.name.clone()))?;
        if !container.running {
            return Err(FleetError::Api {
                explanation: format!("container {} is not running", handle.id),
            });
        }
        container.execs.push(opts.clone());
        Ok(ExecOutput {
            exit_code: if opts.detach { None } else { Some(0) },
            ..ExecOutput::default()
        })
    }

    fn get(&mut self, name: &str) -> Result<ContainerHandle> {
        self.calls.push(Call::Get(name.to_string()));
        self.check(FailOn::Get, name)?;
        self.containers
            .get(name)
            .map(|c| ContainerHandle {
                id: c.id.clone(),
                name: name.to_string(),
            })
            .ok_or_else(|| FleetError::NotFound(name.to_string()))
    }

    fn stop(&mut self, handle: &ContainerHandle, timeout: Duration) -> Result<()> {
        self.calls.push(Call::Stop {
            name: handle.name.clone(),
            timeout,
        });
        self.check(FailOn::Stop, &handle.name)?;
        let container = self
            .containers
            .get_mut(&handle.name)
            .ok_or_else(|| FleetError::NotFound(handle.name.clone()))?;
        container.running = false;
        Ok(())
    }

    fn remove(&mut self, handle: &ContainerHandle) -> Result<()> {
        self.calls.push(Call::Remove(handle.name.clone()));
        self.check(FailOn::Remove, &handle.name)?;
        match self.containers.get(&handle.name) {
            None => Err(FleetError::NotFound(handle.name.clone())),
            Some(c) if c.running => Err(FleetError::Api {
                explanation: format!(
                    "cannot remove container \"/{}\": container is running",
                    handle.name
                ),
            }),
            Some(_) => {
                self.containers.remove(&handle.name);
                Ok(())
            }
        }
    }
}
