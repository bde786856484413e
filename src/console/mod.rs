//! Text front end helpers: prompt command parsing and plain-text rendering.
//!
//! Kept free of I/O so the binary only wires stdin/stdout to these functions.

pub mod command;
pub mod render;


pub use command::{Command, CommandError, HELP, parse_command};
pub use render::{render_json, render_outcome, render_pair, render_status, render_view};
