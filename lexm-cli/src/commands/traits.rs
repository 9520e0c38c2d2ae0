//! Command trait shared by the lexm subcommands.

use std::io::Write;

use lexm_lex::LexConfig;

use crate::error::Result;

/// Standard command trait that all lexm commands implement.
pub trait Command: Sized {
    /// The arguments type for this command.
    type Args;

    /// Create a command from its arguments and the loaded configuration.
    fn new(args: Self::Args, config: LexConfig) -> Self;

    /// Execute the command, writing results to `out`.
    fn run(&self, out: &mut dyn Write) -> Result<()>;

    /// The command name, used in log events.
    fn name() -> &'static str;
}
