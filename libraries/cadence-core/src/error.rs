/// Engine error types for Cadence
use thiserror::Error;

/// Result type alias for audio engine calls
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Error reported by an audio engine when it rejects a command or query
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The command needs a track that does not exist (empty queue, end of queue)
    #[error("No track available")]
    NoTrack,

    /// The engine refused the command
    #[error("Engine rejected command: {0}")]
    Rejected(String),

    /// The engine is not set up or has gone away
    #[error("Engine unavailable: {0}")]
    Unavailable(String),
}

impl EngineError {
    /// Create a rejected error
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    /// Create an unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}
