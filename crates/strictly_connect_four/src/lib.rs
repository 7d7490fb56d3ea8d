//! Strictly Connect-Four - board codec, oracle protocol and turn coordinator
//!
//! A human plays 6x7 Connect-Four against an external move-selection engine
//! (the *oracle*) that is queried once per move over a text boundary.
//!
//! # Architecture
//!
//! - **Codec**: `Board` ⇄ `xxo....;.......;...` wire text
//! - **Protocol**: `MoveRequest`, reply classification, the `Oracle` trait
//! - **Outcomes**: one `Outcome` taxonomy plus a `SentinelTable` per oracle build
//! - **Coordinator**: immutable `GameState` threaded through `TurnCoordinator`
//!
//! # Example
//!
//! ```no_run
//! use strictly_connect_four::{FirstMover, GameState, Oracle, TurnCoordinator};
//!
//! # async fn example(oracle: impl Oracle) -> Result<(), strictly_connect_four::TurnError> {
//! let coordinator = TurnCoordinator::new(oracle);
//! let state = coordinator.start(&GameState::new(), FirstMover::Human);
//! let state = coordinator.click(&state, 3).await?;
//! let state = coordinator.advance(&state).await?;
//! println!("{}", state.board().display());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod budget;
mod codec;
mod coordinator;
mod error;
mod outcome;
mod protocol;
mod types;

// Crate-level exports - Board types
pub use types::{Board, COLS, Cell, DropError, ROWS, Side};

// Crate-level exports - Codec
pub use codec::{Separator, decode, decode_with, encode, encode_with};

// Crate-level exports - Oracle protocol
pub use budget::SearchBudget;
pub use outcome::{Outcome, SentinelTable};
pub use protocol::{MoveRequest, MoveResult, Oracle, classify_reply};

// Crate-level exports - Turn coordination
pub use coordinator::{FirstMover, GameState, Phase, TurnCoordinator, validate_update};

// Crate-level exports - Errors
pub use error::{FormatError, OracleError, ParseError, ProcessError, TurnError, UpdateError};
