//! Error types for the board codec, the oracle boundary and the turn coordinator.

use derive_more::{Display, Error, From};
use tracing::instrument;

/// Malformed board text, side token or search budget.
///
/// Raised at the boundary before any oracle is invoked.
#[derive(Debug, Clone, Display, Error)]
#[display("Format error: {} at {}:{}", message, file, line)]
pub struct FormatError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl FormatError {
    /// Creates a new format error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Oracle reply that is neither a board dump nor a known sentinel.
#[derive(Debug, Clone, Display, Error)]
#[display("Unrecognized oracle reply {:?}: {} at {}:{}", reply, message, file, line)]
pub struct ParseError {
    /// The raw reply, trimmed.
    pub reply: String,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ParseError {
    /// Creates a new parse error with caller location tracking.
    #[track_caller]
    #[instrument(skip(reply, message))]
    pub fn new(reply: impl Into<String>, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            reply: reply.into(),
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// The external computation failed to start, exited abnormally,
/// timed out or could not be reached.
#[derive(Debug, Clone, Display, Error)]
#[display("Oracle process error: {} at {}:{}", message, file, line)]
pub struct ProcessError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ProcessError {
    /// Creates a new process error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// A board update from the oracle that is not a single legal move.
#[derive(Debug, Clone, Display, Error)]
#[display("Rejected board update: {} at {}:{}", message, file, line)]
pub struct UpdateError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl UpdateError {
    /// Creates a new update error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Failure of one oracle round trip.
#[derive(Debug, Clone, Display, Error, From)]
pub enum OracleError {
    /// Request rejected before reaching the oracle.
    #[display("{}", _0)]
    Format(FormatError),
    /// Oracle could not produce output.
    #[display("{}", _0)]
    Process(ProcessError),
    /// Oracle output could not be classified.
    #[display("{}", _0)]
    Parse(ParseError),
}

/// Failure of a coordinator transition. The previous state stays valid.
#[derive(Debug, Clone, Display, Error, From)]
pub enum TurnError {
    /// The oracle round trip failed.
    #[display("{}", _0)]
    Oracle(OracleError),
    /// The oracle replied with an impossible board.
    #[display("{}", _0)]
    InvalidUpdate(UpdateError),
}
