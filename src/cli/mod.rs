//! Command-line interface for discography-player.
//!
//! One-shot commands print a single view; `session` (the default) runs the
//! interactive player.

mod commands;

pub use commands::{Cli, run_command};
