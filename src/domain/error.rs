//! Domain error types.

/// Top-level error type for fxledger.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("ordering violation: {reason}")]
    OrderingViolation { reason: String },

    #[error("validation failed on {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("division undefined: {context}")]
    DivisionUndefined { context: String },

    #[error("cannot parse {input:?}: {reason}")]
    Parse { input: String, reason: String },

    #[error("insufficient {code} balance: need {required}, have {available}")]
    InsufficientBalance {
        code: String,
        required: String,
        available: String,
    },

    #[error("order limit for {code}: {reason}")]
    OrderLimit { code: String, reason: String },

    #[error("no quote for {from}/{to}")]
    RateUnavailable { from: String, to: String },

    #[error("storage error: {reason}")]
    Storage { reason: String },

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

impl LedgerError {
    pub(crate) fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        LedgerError::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub(crate) fn ordering(reason: impl Into<String>) -> Self {
        LedgerError::OrderingViolation {
            reason: reason.into(),
        }
    }

    pub(crate) fn division(context: impl Into<String>) -> Self {
        LedgerError::DivisionUndefined {
            context: context.into(),
        }
    }

    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        LedgerError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn storage(reason: impl Into<String>) -> Self {
        LedgerError::Storage {
            reason: reason.into(),
        }
    }
}

impl From<&LedgerError> for std::process::ExitCode {
    fn from(err: &LedgerError) -> Self {
        let code: u8 = match err {
            LedgerError::Io(_) => 1,
            LedgerError::ConfigParse { .. }
            | LedgerError::ConfigMissing { .. }
            | LedgerError::ConfigInvalid { .. } => 2,
            LedgerError::Storage { .. } | LedgerError::RateUnavailable { .. } => 3,
            LedgerError::Validation { .. } | LedgerError::Parse { .. } => 4,
            LedgerError::TypeMismatch { .. }
            | LedgerError::OrderingViolation { .. }
            | LedgerError::DivisionUndefined { .. }
            | LedgerError::InsufficientBalance { .. }
            | LedgerError::OrderLimit { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
