use thiserror::Error;

pub type AcoResult<T> = Result<T, AcoError>;

/// Errors raised while building a colony. Everything is validated up front,
/// so nothing here surfaces once iterations are running.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AcoError {
    /// Node data cannot form an open path.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A parameter lies outside its documented domain.
    #[error("invalid config: `{field}` {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

impl AcoError {
    pub(crate) fn input(reason: impl Into<String>) -> Self {
        AcoError::InvalidInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        AcoError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

/// Non-fatal: a tour whose cost cannot carry a deposit (zero, negative or
/// non-finite). The deposit is skipped and the iteration carries on.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("degenerate tour with cost {cost}, deposit skipped")]
pub struct DegenerateTour {
    pub cost: f64,
}
