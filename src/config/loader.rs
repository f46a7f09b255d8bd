use std::path::{Path, PathBuf};

use tracing::debug;

use super::types::FleetConfig;
use crate::error::{FleetError, Result};

/// File picked up from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "devfleet.yaml";

/// Values given on the command line that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub render_ids: Option<Vec<u32>>,
    pub base_port: Option<u16>,
    pub image: Option<String>,
    pub output: Option<PathBuf>,
}

/// Load the fleet configuration.
///
/// An explicit path must exist. Without one, `devfleet.yaml` in `dir` is used
/// if present, otherwise the built-in defaults.
pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<FleetConfig> {
    let path = match explicit {
        Some(p) => {
            if !p.exists() {
                return Err(FleetError::Config(format!(
                    "config file not found: {}",
                    p.display()
                )));
            }
            Some(p.to_path_buf())
        }
        None => {
            let candidate = dir.join(DEFAULT_CONFIG_FILE);
            candidate.exists().then_some(candidate)
        }
    };

    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading fleet config");
            let contents = std::fs::read_to_string(&path)?;
            parse(&contents)
        }
        None => {
            debug!("no config file, using defaults");
            Ok(FleetConfig::default())
        }
    }
}

/// Parse YAML text; missing fields fall back to their defaults.
pub fn parse(contents: &str) -> Result<FleetConfig> {
    if contents.trim().is_empty() {
        return Ok(FleetConfig::default());
    }
    Ok(serde_yaml::from_str(contents)?)
}

impl FleetConfig {
    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(ids) = overrides.render_ids {
            self.render_ids = ids;
        }
        if let Some(port) = overrides.base_port {
            self.base_port = port;
        }
        if let Some(image) = overrides.image {
            self.image = image;
        }
        if let Some(output) = overrides.output {
            self.output = output;
        }
        self
    }
}
