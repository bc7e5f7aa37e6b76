// Library interface for askmed-cli, so integration tests can reach the
// command parser and renderer.

pub mod commands;
pub mod render;
pub mod theme;

pub use commands::{handle_command, CommandResult};
pub use theme::Theme;
