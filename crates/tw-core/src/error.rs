use thiserror::Error;

pub type TwResult<T> = Result<T, TwError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TwError {
    /// A rule violation. The reason is shown to the player and the turn stays retryable.
    #[error("Illegal action: {reason}")]
    IllegalAction { reason: String },

    /// The game was configured with something the engine cannot interpret.
    #[error("Invalid configuration: {what}")]
    Config { what: String },

    #[error("{what} not found: {name}")]
    NotFound { what: &'static str, name: String },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}

impl TwError {
    pub fn illegal(reason: impl Into<String>) -> Self {
        TwError::IllegalAction {
            reason: reason.into(),
        }
    }

    pub fn config(what: impl Into<String>) -> Self {
        TwError::Config { what: what.into() }
    }

    /// True for player-facing rule violations.
    pub fn is_illegal_action(&self) -> bool {
        matches!(self, TwError::IllegalAction { .. })
    }
}
