use thiserror::Error;

/// Errors raised while building [`crate::AppConfig`] from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Field-level problems with a calculation form.
///
/// A form that fails validation is never sent to the calculate endpoint.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("origin city is required")]
    MissingOrigin,

    #[error("destination city is required")]
    MissingDestination,

    #[error("tariff type is required")]
    MissingTariffType,

    #[error("weight is required")]
    MissingWeight,

    #[error("weight must be a positive number, got {0}")]
    NonPositiveWeight(f64),

    #[error("city \"{city}\" has no coordinates")]
    MissingCoordinates { city: String },
}

impl ValidationError {
    /// Name of the form field the message belongs to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingOrigin => "origin",
            Self::MissingDestination => "destination",
            Self::MissingTariffType => "tariff_type",
            Self::MissingWeight | Self::NonPositiveWeight(_) => "weight",
            Self::MissingCoordinates { .. } => "city",
        }
    }
}
