//! Request/response protocol spoken with the move-selection oracle.

use crate::budget::SearchBudget;
use crate::codec::{self, Separator};
use crate::error::{FormatError, OracleError, ParseError};
use crate::outcome::{Outcome, SentinelTable};
use crate::types::{Board, Side};
use async_trait::async_trait;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// One question to the oracle: pick a move for `side` on `board`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize, derive_new::new)]
pub struct MoveRequest {
    /// Position to move from.
    board: Board,
    /// Side the oracle moves for.
    side: Side,
    /// Effort bound for the search.
    budget: SearchBudget,
}

impl MoveRequest {
    /// Validates untrusted wire text and builds a request from it.
    ///
    /// `game` must match `[ox.;]*` and decode to a legal board, `side` must
    /// be exactly `x` or `o`, and `budget` (if present) a positive integer.
    /// An absent budget becomes [`SearchBudget::DEFAULT`].
    ///
    /// # Errors
    ///
    /// Returns `FormatError` for any violation; nothing is sent anywhere.
    pub fn from_wire(game: &str, side: &str, budget: Option<&str>) -> Result<Self, FormatError> {
        Self::from_wire_or(game, side, budget, SearchBudget::default())
    }

    /// Like [`MoveRequest::from_wire`], with `fallback` used when no budget is given.
    #[instrument(skip(fallback), fields(fallback = %fallback))]
    pub fn from_wire_or(
        game: &str,
        side: &str,
        budget: Option<&str>,
        fallback: SearchBudget,
    ) -> Result<Self, FormatError> {
        if let Some(bad) = game.chars().find(|c| !matches!(c, 'o' | 'x' | '.' | ';')) {
            warn!(character = ?bad, "Rejecting board text outside the wire alphabet");
            return Err(FormatError::new(format!(
                "board text contains forbidden character {:?}",
                bad
            )));
        }
        let board = codec::decode(game)?;
        let side = Side::from_token(side)
            .ok_or_else(|| FormatError::new(format!("side must be 'x' or 'o', got {:?}", side)))?;
        let budget = match budget {
            Some(text) => SearchBudget::parse(text)?,
            None => fallback,
        };
        Ok(Self::new(board, side, budget))
    }
}

/// Classified oracle reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveResult {
    /// The oracle moved; this is the resulting board.
    BoardUpdate(Board),
    /// The oracle reported that the game is over.
    TerminalOutcome(Outcome),
}

/// Classifies raw oracle output.
///
/// Surrounding whitespace is ignored. Six newline-separated rows of seven
/// cells are a board update; a literal from `sentinels` is a terminal
/// outcome; anything else is a `ParseError`.
#[instrument(skip(raw, sentinels), fields(len = raw.len()))]
pub fn classify_reply(raw: &str, sentinels: &SentinelTable) -> Result<MoveResult, ParseError> {
    let reply = raw.trim();
    let rows: Vec<&str> = reply.lines().map(str::trim_end).collect();
    let normalized = rows.join("\n");

    if let Ok(board) = codec::decode_with(&normalized, Separator::Newline) {
        debug!("Reply is a board update");
        return Ok(MoveResult::BoardUpdate(board));
    }

    if let Some(outcome) = sentinels.lookup(reply) {
        debug!(?outcome, "Reply is a terminal sentinel");
        return Ok(MoveResult::TerminalOutcome(outcome));
    }

    warn!(reply = %reply, "Oracle reply matches neither a board nor a sentinel");
    Err(ParseError::new(reply, "expected a 6x7 board dump or a terminal sentinel"))
}

/// An external move-selection engine.
///
/// Implementations are stateless from the caller's side: every request is
/// answered independently and nothing is cached.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Asks the oracle to move for `request.side()` on `request.board()`.
    async fn request(&self, request: &MoveRequest) -> Result<MoveResult, OracleError>;
}

#[async_trait]
impl<O: Oracle + ?Sized> Oracle for Arc<O> {
    async fn request(&self, request: &MoveRequest) -> Result<MoveResult, OracleError> {
        (**self).request(request).await
    }
}

#[async_trait]
impl<O: Oracle + ?Sized> Oracle for Box<O> {
    async fn request(&self, request: &MoveRequest) -> Result<MoveResult, OracleError> {
        (**self).request(request).await
    }
}
