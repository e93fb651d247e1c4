//! Command module - Strategy pattern for CLI commands.
//!
//! Each command is a separate module implementing the `CommandExecutor` trait.

mod analyze;
mod capacity;
mod compare;
mod decode;
mod encode;

pub use analyze::AnalyzeCommand;
pub use capacity::CapacityCommand;
pub use compare::CompareCommand;
pub use decode::DecodeCommand;
pub use encode::EncodeCommand;

use anyhow::Result;

/// Trait for command execution - Strategy pattern.
///
/// Each command struct holds its parsed arguments and implements
/// this trait to define its execution logic.
pub trait CommandExecutor {
    /// Executes the command with its parsed arguments.
    fn execute(&self) -> Result<()>;
}
