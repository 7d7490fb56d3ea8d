//! Turn coordinator: sequences human clicks and oracle replies.
//!
//! The coordinator never mutates a [`GameState`] in place. Every transition
//! takes the current state by reference and returns the next one, so a
//! failed oracle round trip leaves the caller holding the last good state.
//!
//! ```text
//! Idle ──start──▶ PlayerTurn ──click──▶ EngineTurn ──engine_turn──▶ PlayerTurn ...
//!                      │                     │
//!                      └──── finish-check ───┴──▶ Terminal(outcome)
//! ```

use crate::budget::SearchBudget;
use crate::error::{TurnError, UpdateError};
use crate::outcome::Outcome;
use crate::protocol::{MoveRequest, MoveResult, Oracle};
use crate::types::{Board, COLS, Cell, ROWS, Side};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Who moves first, chosen before the game starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FirstMover {
    /// The human moves first.
    Human,
    /// The engine moves first.
    Engine,
}

/// Coordinator phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the first-mover choice.
    Idle,
    /// Awaiting a human click.
    PlayerTurn,
    /// Awaiting the oracle's move.
    EngineTurn,
    /// Game over. Only a reset leaves this phase.
    Terminal(Outcome),
}

/// Snapshot of one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameState {
    /// The board.
    board: Board,
    /// Side whose move is next.
    side_to_move: Side,
    /// Coordinator phase.
    phase: Phase,
}

impl GameState {
    /// Creates an idle game on an empty board.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            side_to_move: Side::X,
            phase: Phase::Idle,
        }
    }

    /// Returns the outcome once the game is over.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Terminal(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Checks if the game is over.
    pub fn is_finished(&self) -> bool {
        self.outcome().is_some()
    }

    fn finished(self, outcome: Outcome) -> Self {
        Self {
            phase: Phase::Terminal(outcome),
            ..self
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks that `after` is `before` plus exactly one piece for `side`.
///
/// Returns the column the piece was dropped into.
///
/// # Errors
///
/// Returns `UpdateError` if any existing piece changed, if the number of
/// new pieces is not one, if the new piece belongs to the wrong side, or if
/// it floats above an empty cell.
#[instrument(skip(before, after))]
pub fn validate_update(before: &Board, after: &Board, side: Side) -> Result<usize, UpdateError> {
    let mut added = Vec::new();
    for row in 0..ROWS {
        for col in 0..COLS {
            let old = before.rows()[row][col];
            let new = after.rows()[row][col];
            match (old, new) {
                (Cell::Empty, Cell::Empty) => {}
                (Cell::Empty, Cell::Occupied(owner)) => added.push((row, col, owner)),
                (old, new) if old == new => {}
                (old, new) => {
                    return Err(UpdateError::new(format!(
                        "cell ({}, {}) changed from {:?} to {:?}",
                        row, col, old, new
                    )));
                }
            }
        }
    }

    let (row, col, owner) = match added.as_slice() {
        [single] => *single,
        _ => {
            return Err(UpdateError::new(format!(
                "expected exactly one new piece, found {}",
                added.len()
            )));
        }
    };
    if owner != side {
        return Err(UpdateError::new(format!(
            "new piece at ({}, {}) belongs to {}, expected {}",
            row, col, owner, side
        )));
    }
    if before.lowest_empty_row(col) != Some(row) {
        return Err(UpdateError::new(format!(
            "new piece at ({}, {}) is not at the lowest empty row",
            row, col
        )));
    }
    Ok(col)
}

/// Drives a game between a human and an [`Oracle`].
#[derive(Debug, Clone)]
pub struct TurnCoordinator<O> {
    oracle: O,
    budget: SearchBudget,
    human: Side,
}

impl<O: Oracle> TurnCoordinator<O> {
    /// Creates a coordinator with the default budget, the human playing O.
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            budget: SearchBudget::default(),
            human: Side::O,
        }
    }

    /// Sets the search budget passed with every request.
    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Sets the side the human plays.
    pub fn with_human_side(mut self, side: Side) -> Self {
        self.human = side;
        self
    }

    /// Returns the oracle.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Returns the active search budget.
    pub fn budget(&self) -> SearchBudget {
        self.budget
    }

    /// Side played by the human.
    pub fn human_side(&self) -> Side {
        self.human
    }

    /// Side played by the oracle.
    pub fn engine_side(&self) -> Side {
        self.human.opponent()
    }

    /// Returns a fresh idle game.
    pub fn reset(&self) -> GameState {
        info!("Resetting game");
        GameState::new()
    }

    /// Leaves `Idle` according to the first-mover choice.
    ///
    /// Has no effect outside `Idle`.
    #[instrument(skip(self, state), fields(phase = ?state.phase))]
    pub fn start(&self, state: &GameState, first: FirstMover) -> GameState {
        if state.phase != Phase::Idle {
            debug!("Ignoring start outside idle phase");
            return *state;
        }
        let (side_to_move, phase) = match first {
            FirstMover::Human => (self.human, Phase::PlayerTurn),
            FirstMover::Engine => (self.engine_side(), Phase::EngineTurn),
        };
        info!(?first, side = %side_to_move, "Game started");
        GameState {
            board: Board::new(),
            side_to_move,
            phase,
        }
    }

    /// Applies a human click on `column`, then runs the finish-check.
    ///
    /// Clicks outside `PlayerTurn`, on a full column or off the board are
    /// ignored: the same state comes back and the oracle is not called.
    #[instrument(skip(self, state), fields(phase = ?state.phase))]
    pub async fn click(&self, state: &GameState, column: usize) -> Result<GameState, TurnError> {
        if state.phase != Phase::PlayerTurn {
            debug!("Ignoring click outside player turn");
            return Ok(*state);
        }
        let (board, row) = match state.board.drop_piece(column, self.human) {
            Ok(placed) => placed,
            Err(e) => {
                debug!(error = %e, "Ignoring illegal click");
                return Ok(*state);
            }
        };
        info!(column, row, side = %self.human, "Human move applied");

        let moved = GameState {
            board,
            side_to_move: self.engine_side(),
            phase: Phase::EngineTurn,
        };
        self.finish_check(moved, self.human).await
    }

    /// Asks the oracle for its move and applies it, then runs the finish-check.
    ///
    /// Has no effect outside `EngineTurn`.
    #[instrument(skip(self, state), fields(phase = ?state.phase, budget = %self.budget))]
    pub async fn engine_turn(&self, state: &GameState) -> Result<GameState, TurnError> {
        if state.phase != Phase::EngineTurn {
            debug!("Ignoring engine turn outside engine phase");
            return Ok(*state);
        }
        let engine = self.engine_side();
        let request = MoveRequest::new(state.board, engine, self.budget);

        match self.oracle.request(&request).await? {
            MoveResult::TerminalOutcome(outcome) => {
                info!(%outcome, "Oracle reported game over");
                Ok(state.finished(outcome))
            }
            MoveResult::BoardUpdate(board) => {
                let column = validate_update(&state.board, &board, engine).inspect_err(|e| {
                    warn!(error = %e, "Oracle returned an impossible board");
                })?;
                info!(column, side = %engine, "Engine move applied");
                let moved = GameState {
                    board,
                    side_to_move: self.human,
                    phase: Phase::PlayerTurn,
                };
                self.finish_check(moved, engine).await
            }
        }
    }

    /// Runs engine turns until the game is waiting on the human or over.
    pub async fn advance(&self, state: &GameState) -> Result<GameState, TurnError> {
        let mut current = *state;
        while current.phase == Phase::EngineTurn {
            current = self.engine_turn(&current).await?;
        }
        Ok(current)
    }

    /// Asks the oracle, from the side that just moved, whether the game ended.
    ///
    /// A board reply means play continues and is discarded.
    #[instrument(skip(self, state))]
    async fn finish_check(&self, state: GameState, mover: Side) -> Result<GameState, TurnError> {
        let request = MoveRequest::new(state.board, mover, self.budget);
        match self.oracle.request(&request).await? {
            MoveResult::TerminalOutcome(outcome) => {
                info!(%outcome, "Finish-check ended the game");
                Ok(state.finished(outcome))
            }
            MoveResult::BoardUpdate(_) => {
                debug!("Finish-check: game continues");
                Ok(state)
            }
        }
    }
}
