//! Fleet configuration: YAML file, built-in defaults and CLI overrides

mod loader;
mod types;

pub use loader::{load, parse, Overrides, DEFAULT_CONFIG_FILE};
pub use types::{FleetConfig, IpLookup, MountMode, VolumeMount};
