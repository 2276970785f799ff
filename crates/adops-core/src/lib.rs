mod app_config;
mod config;
mod entry;
pub mod operators;
pub mod pipeline;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use entry::{DailyEntry, EntryError};
pub use operators::{load_operators, OperatorConfig, OperatorId, OperatorsFile};
pub use pipeline::{
    aggregate, compute_commission, leaderboard, rank, with_full_roster, CommissionRecord,
    CommissionStatus, OperatorAggregate, Period, RankedEntry,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
    #[error("failed to read operators file at {path}: {source}")]
    OperatorsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse operators file: {0}")]
    OperatorsFileParse(#[from] serde_yaml::Error),
    #[error("operators config validation failed: {0}")]
    Validation(String),
}
