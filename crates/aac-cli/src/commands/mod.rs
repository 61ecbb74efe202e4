// Command handlers for the aac CLI

pub mod debug;
pub mod describe;
pub mod presets;
pub mod select;
pub mod suggest;

pub use debug::DebugCommand;
pub use describe::DescribeCommand;
pub use presets::PresetsCommand;
pub use select::SelectCommand;
pub use suggest::SuggestCommand;

use crate::error::CliResult;
use std::io::Write;

/// Trait for command handlers
pub trait Command {
    /// Execute the command, writing its output to `out`
    fn execute(&self, out: &mut dyn Write) -> CliResult<()>;
}
