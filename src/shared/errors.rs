use thiserror::Error;

/// Errors produced by the customs engine.
#[derive(Debug, Error)]
pub enum CustomsError {
    /// A raw input field failed validation. Carries the offending field
    /// name and a human-readable reason.
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// The tariff table has no entry for a combination the calculation
    /// needed. A deployment defect, not a user error.
    #[error("tariff table has no {entry} entry for {key}")]
    MissingTariff { entry: &'static str, key: String },

    /// The tariff table violates a structural invariant.
    #[error("tariff table invalid: {0}")]
    Configuration(String),
}

impl CustomsError {
    /// Whether the caller can recover by correcting its input and
    /// re-submitting (as opposed to a configuration defect).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CustomsError::InvalidInput { .. })
    }
}

/// Result type for engine operations
pub type CustomsResult<T> = Result<T, CustomsError>;

/// Errors raised while loading configuration from disk.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid tariff table: {0}")]
    Invalid(#[from] CustomsError),
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_is_recoverable() {
        let err = CustomsError::InvalidInput {
            field: "price",
            reason: "not a number".to_string(),
        };
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "invalid price: not a number");
    }

    #[test]
    fn missing_tariff_is_not_recoverable() {
        let err = CustomsError::MissingTariff {
            entry: "excise rate",
            key: "diesel".to_string(),
        };
        assert!(!err.is_recoverable());
    }
}
