// Command handlers for the scaffold CLI

pub mod create;
pub mod list;
pub mod show;

pub use create::CreateCommand;
pub use list::ListCommand;
pub use show::ShowCommand;

use crate::error::CliResult;

/// Trait for command handlers
pub trait Command {
    /// Execute the command
    fn execute(&self) -> CliResult<()>;
}
