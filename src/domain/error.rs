//! Domain error types.

/// Top-level error type for netrank.
#[derive(Debug, thiserror::Error)]
pub enum NetrankError {
    #[error("validation error: {reason}")]
    Validation { reason: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("missing required column: {column}")]
    MissingColumn { column: String },

    #[error("unknown broker profile: {name}")]
    UnknownProfile { name: String },

    #[error("unknown objective: {name}")]
    UnknownObjective { name: String },

    #[error("unknown earnings phase: {label}")]
    UnknownPhase { label: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&NetrankError> for std::process::ExitCode {
    fn from(err: &NetrankError) -> Self {
        let code: u8 = match err {
            NetrankError::Io(_) => 1,
            NetrankError::ConfigParse { .. }
            | NetrankError::ConfigMissing { .. }
            | NetrankError::ConfigInvalid { .. } => 2,
            NetrankError::Validation { .. }
            | NetrankError::Data { .. }
            | NetrankError::MissingColumn { .. } => 3,
            NetrankError::UnknownProfile { .. }
            | NetrankError::UnknownObjective { .. }
            | NetrankError::UnknownPhase { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
