use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MiningError {
    /// The action is not allowed in the current session state. Nothing changed.
    #[error("cannot {action}: {reason}")]
    InvalidTransition {
        action: &'static str,
        reason: &'static str,
    },
    /// Storage could not be read or written; progress is kept in memory only.
    #[error("storage unavailable: {0}")]
    PersistenceUnavailable(String),
}

