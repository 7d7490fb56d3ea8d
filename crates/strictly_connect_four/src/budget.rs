//! Search budget passed to the oracle.

use crate::error::FormatError;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Positive integer bounding the oracle's per-move effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(try_from = "u32", into = "u32")]
#[display("{}", _0)]
pub struct SearchBudget(NonZeroU32);

impl SearchBudget {
    /// Budget used when the caller supplies none.
    pub const DEFAULT: u32 = 200;

    /// Largest budget accepted at the boundary.
    pub const MAX: u32 = 100_000;

    /// Creates a budget, rejecting zero and values above [`SearchBudget::MAX`].
    pub fn new(value: u32) -> Result<Self, FormatError> {
        if value > Self::MAX {
            return Err(FormatError::new(format!(
                "search budget {} exceeds maximum {}",
                value,
                Self::MAX
            )));
        }
        NonZeroU32::new(value)
            .map(Self)
            .ok_or_else(|| FormatError::new("search budget must be positive"))
    }

    /// Parses a budget from query-string text.
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        let value: u32 = text
            .parse()
            .map_err(|_| FormatError::new(format!("search budget {:?} is not an integer", text)))?;
        Self::new(value)
    }

    /// Returns the budget as an integer.
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self(NonZeroU32::new(Self::DEFAULT).unwrap_or(NonZeroU32::MIN))
    }
}

impl TryFrom<u32> for SearchBudget {
    type Error = FormatError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SearchBudget> for u32 {
    fn from(budget: SearchBudget) -> Self {
        budget.get()
    }
}
