//! Error types for devfleet

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FleetError {
    #[error("Container '{0}' not found")]
    NotFound(String),

    #[error("Image '{0}' not found locally")]
    ImageNotFound(String),

    #[error("Docker API error: {explanation}")]
    Api { explanation: String },

    #[error("Command failed inside container (exit {exit_code:?}): {stderr}")]
    Exec { exit_code: Option<i32>, stderr: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Container runtime unavailable: {0}")]
    RuntimeUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FleetError {
    /// Whether this error means the target container simply does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, FleetError::NotFound(_))
    }

    /// Short machine-readable category used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            FleetError::NotFound(_) => "not_found",
            FleetError::ImageNotFound(_) => "image_not_found",
            FleetError::Api { .. } => "api",
            FleetError::Exec { .. } => "exec",
            FleetError::Config(_) => "config",
            FleetError::RuntimeUnavailable(_) => "runtime_unavailable",
            FleetError::Io(_) => "io",
            FleetError::Csv(_) => "csv",
            FleetError::Yaml(_) => "yaml",
            FleetError::Json(_) => "json",
        }
    }
}

pub type Result<T> = std::result::Result<T, FleetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_predicate() {
        assert!(FleetError::NotFound("x".into()).is_not_found());
        assert!(!FleetError::Api {
            explanation: "boom".into()
        }
        .is_not_found());
    }

    #[test]
    fn test_api_error_carries_explanation() {
        let err = FleetError::Api {
            explanation: "conflict: name in use".into(),
        };
        assert!(err.to_string().contains("conflict: name in use"));
    }
}
