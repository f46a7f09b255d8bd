//! devfleet - launch and tear down GPU-bound code-server containers
//!
//! Each configured render id gets one container named `prefix + id`, bound to
//! `/dev/kfd` and `/dev/dri/renderD<id>`, serving code-server on
//! `base_port + 100 * index`.
//!
//! # Example
//!
//! ```no_run
//! use devfleet::{launch_and_save, FleetConfig, DockerCli};
//!
//! let config = FleetConfig::default();
//! let mut docker = DockerCli::new();
//! let report = launch_and_save(&config, &mut docker, "127.0.0.1").unwrap();
//! println!("{} launched", report.succeeded());
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod fleet;
pub mod host;
pub mod output;
pub mod runtime;

pub use config::FleetConfig;
pub use error::{FleetError, Result};
pub use fleet::{clean, launch, launch_and_save, plan, Outcome, Report};
pub use output::{format_plan, format_report, OutputFormat};
pub use runtime::{ContainerRuntime, DockerCli, InMemoryRuntime};
