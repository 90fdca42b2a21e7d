pub mod app_config;
pub mod config;
pub mod dates;
pub mod extraction;

use thiserror::Error;

pub use app_config::{AppConfig, StrategyMode};
pub use config::{load_app_config, load_app_config_from_env};
pub use dates::{CanonicalDate, DateCounts, InvalidDate};
pub use extraction::{
    DateListResult, DateListSuccess, ExtractionFailure, ExtractionResult, ExtractionSuccess,
    StrategyKind,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
