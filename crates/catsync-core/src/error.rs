use thiserror::Error;

/// Reference-integrity failures in the category tree.
///
/// These indicate corrupt source data and are surfaced to the caller rather
/// than defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryError {
    #[error("category {id} is not a known folder")]
    UnknownCategory { id: String },

    #[error("category {id} references unknown parent {parent_id}")]
    UnknownParent { id: String, parent_id: String },

    #[error("cycle in category tree starting at {start_id}: walk exceeded {bound} folders")]
    Cycle { start_id: String, bound: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read rules file {path}: {source}")]
    RulesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rules file: {0}")]
    RulesFileParse(#[from] serde_yaml::Error),

    #[error("rules validation failed: {0}")]
    Validation(String),
}
