//! Line-oriented terminal host for the turn coordinator.

use anyhow::Result;
use strictly_connect_four::{
    COLS, FirstMover, GameState, Oracle, Outcome, Phase, Side, TurnCoordinator,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, instrument};

/// Renders a game for a human playing `human`.
///
/// Pure projection: the state is only read.
pub fn render(state: &GameState, human: Side) -> String {
    let status = match state.phase() {
        Phase::Idle => "Choose who moves first.".to_string(),
        Phase::PlayerTurn => format!("Your move ({}). Column 1-{}, or q to quit:", human, COLS),
        Phase::EngineTurn => "Engine is thinking...".to_string(),
        Phase::Terminal(outcome) => match outcome {
            Outcome::Draw => "Game over: draw.".to_string(),
            Outcome::NoLegalMove => "Game over: no legal move left.".to_string(),
            won => match won.winner() {
                Some(side) if side == human => "Game over: you win!".to_string(),
                _ => "Game over: engine wins.".to_string(),
            },
        },
    };
    format!("{}\n{}\n", state.board().display(), status)
}

/// Parsed line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Drop into a zero-based column.
    Column(usize),
    /// Leave the game.
    Quit,
    /// Anything else.
    Unknown,
}

/// Parses a line of player input. Columns are entered one-based.
pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return Command::Quit;
    }
    match line.parse::<usize>() {
        Ok(n) if (1..=COLS).contains(&n) => Command::Column(n - 1),
        _ => Command::Unknown,
    }
}

/// Plays one game, reading columns from `input` and writing renders to `output`.
///
/// Returns the last state, finished or not (the player may quit or run out
/// of input). Oracle failures end the game with an error.
#[instrument(skip(coordinator, input, output))]
pub async fn play<O, R, W>(
    coordinator: &TurnCoordinator<O>,
    first: FirstMover,
    mut input: R,
    mut output: W,
) -> Result<GameState>
where
    O: Oracle,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let human = coordinator.human_side();
    let mut state = coordinator.start(&GameState::new(), first);

    loop {
        if *state.phase() == Phase::EngineTurn {
            output.write_all(render(&state, human).as_bytes()).await?;
            output.flush().await?;
            state = coordinator.advance(&state).await?;
        }

        output.write_all(render(&state, human).as_bytes()).await?;
        output.flush().await?;

        if let Some(outcome) = state.outcome() {
            info!(%outcome, "Game finished");
            return Ok(state);
        }

        let mut line = String::new();
        if input.read_line(&mut line).await? == 0 {
            debug!("Input closed");
            return Ok(state);
        }

        match parse_command(&line) {
            Command::Quit => {
                info!("Player quit");
                return Ok(state);
            }
            Command::Column(column) => {
                // A full column leaves the state unchanged and the next pass re-renders it.
                state = coordinator.click(&state, column).await?;
            }
            Command::Unknown => {
                output
                    .write_all(format!("Enter a column from 1 to {}.\n", COLS).as_bytes())
                    .await?;
            }
        }
    }
}
