//! Terminal outcomes and the sentinel vocabulary oracles use to report them.

use crate::types::Side;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Outcome of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// X has four in a row.
    #[display("X wins")]
    XWin,
    /// O has four in a row.
    #[display("O wins")]
    OWin,
    /// Board full without a winner.
    #[display("Draw")]
    Draw,
    /// The oracle found no move to make.
    #[display("No legal move")]
    NoLegalMove,
}

impl Outcome {
    /// Returns the winning side if there is one.
    pub fn winner(self) -> Option<Side> {
        match self {
            Outcome::XWin => Some(Side::X),
            Outcome::OWin => Some(Side::O),
            Outcome::Draw | Outcome::NoLegalMove => None,
        }
    }
}

/// Translation table from oracle sentinel literals to [`Outcome`].
///
/// Different oracle builds spell terminal results differently; every
/// spelling in use gets an entry here instead of a string comparison at
/// the call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentinelTable {
    entries: HashMap<String, Outcome>,
}

impl SentinelTable {
    /// Creates an empty table.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Adds or replaces an entry.
    pub fn with(mut self, literal: impl Into<String>, outcome: Outcome) -> Self {
        self.insert(literal, outcome);
        self
    }

    /// Adds or replaces an entry in place.
    #[instrument(skip(self, literal))]
    pub fn insert(&mut self, literal: impl Into<String>, outcome: Outcome) {
        let literal = literal.into();
        debug!(literal = %literal, ?outcome, "Registering sentinel");
        self.entries.insert(literal, outcome);
    }

    /// Looks up an exact sentinel literal.
    pub fn lookup(&self, literal: &str) -> Option<Outcome> {
        self.entries.get(literal).copied()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SentinelTable {
    fn default() -> Self {
        Self::empty()
            .with("X Win", Outcome::XWin)
            .with("O Win", Outcome::OWin)
            .with("Draw", Outcome::Draw)
            .with("No choice", Outcome::NoLegalMove)
    }
}
