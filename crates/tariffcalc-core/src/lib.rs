pub mod app_config;
pub mod availability;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod matching;
pub mod tariff;
pub mod types;
pub mod validation;

pub use app_config::{AppConfig, Environment};
pub use availability::{AvailabilityIndex, IndexState, PointMatch, ServiceKind};
pub use config::{load_app_config, load_app_config_from_env};
pub use eligibility::{
    evaluate, evaluate_disable, evaluate_warning, EligibilityResult, WarningMessage,
};
pub use error::{ConfigError, ValidationError};
pub use matching::{CityKey, MatchKind};
pub use tariff::{Requirement, TariffType};
pub use types::{City, CityName, CitySelection, Language, LocalizedCity, PointId, ServicePoint};
pub use validation::{CalculateTariffRequest, CalculationForm};
