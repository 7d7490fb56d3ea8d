//! Strictly Connect-Four server - oracle clients, HTTP gateway and terminal host
//!
//! # Architecture
//!
//! - **ProcessOracle**: one subprocess per move, structured arguments, bounded by a timeout
//! - **HttpOracle**: the same contract spoken to a remote gateway
//! - **Gateway**: axum router exposing `GET /solve/{game}/{next_player}`
//! - **Terminal**: line-oriented host driving the `TurnCoordinator`

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Module declarations
pub mod cli;
mod config;
mod gateway;
mod http_oracle;
mod process_oracle;
mod terminal;

// Crate-level exports - Configuration
pub use config::{ConfigError, GatewayConfig, OracleConfig, ServerConfig};

// Crate-level exports - Oracle clients
pub use http_oracle::HttpOracle;
pub use process_oracle::{OracleReply, ProcessOracle};

// Crate-level exports - HTTP gateway
pub use gateway::{ErrorResponse, GatewayError, GatewayState, SolveParams, SolveResponse, router};

// Crate-level exports - Terminal host
pub use terminal::{Command as PlayerCommand, parse_command, play, render};
