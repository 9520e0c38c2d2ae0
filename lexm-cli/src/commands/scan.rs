//! Scan command implementation.
//!
//! Tokenizes a file or inline text with names, numbers and symbols and
//! prints every committed lexeme.

use std::io::Write;
use std::path::PathBuf;

use lexm_lex::{GlobalState, LexConfig, Lexeme, Scanner};
use lexm_util::Handler;
use tracing::info;

use crate::commands::common::{statement_tokens, OutputFormat};
use crate::commands::traits::Command;
use crate::error::{CliError, Result};

/// Arguments for the scan command.
#[derive(Debug, Clone, Default)]
pub struct ScanArgs {
    /// File to scan.
    pub file: Option<PathBuf>,
    /// Inline source, used instead of a file.
    pub text: Option<String>,
    /// Output format.
    pub format: OutputFormat,
    /// Words names may not take.
    pub reserved: Vec<String>,
    /// Fail if any input was unrecognized.
    pub deny_unrecognized: bool,
}

/// Scan command handler.
pub struct ScanCommand {
    args: ScanArgs,
    config: LexConfig,
}

impl ScanCommand {
    /// Read the source named by the arguments.
    fn read_source(&self) -> Result<String> {
        match (&self.args.text, &self.args.file) {
            (Some(text), None) => Ok(text.clone()),
            (None, Some(path)) => std::fs::read_to_string(path).map_err(|source| CliError::Read {
                path: path.clone(),
                source,
            }),
            (Some(_), Some(_)) => Err(CliError::Validation(
                "give either a file or --text, not both".to_string(),
            )),
            (None, None) => Err(CliError::Validation(
                "nothing to scan: give a file or --text".to_string(),
            )),
        }
    }

    /// Scan `source`, collecting diagnostics in `handler`.
    fn scan(&self, source: &str, handler: &Handler) -> Result<Vec<Lexeme>> {
        let syntax = statement_tokens(&self.config.numeric)?;
        let mut scanner = Scanner::with_config(&syntax, &self.config.tokenizer).with_handler(handler);
        if !self.args.reserved.is_empty() {
            let global = GlobalState::with_reserved(self.args.reserved.iter().map(String::as_str));
            scanner.tokenizer_mut().set_global(Some(global));
        }
        Ok(scanner.scan(source))
    }

    fn write_lexemes(&self, out: &mut dyn Write, lexemes: &[Lexeme]) -> Result<()> {
        match self.args.format {
            OutputFormat::Text => {
                for lexeme in lexemes {
                    writeln!(out, "{}", lexeme)?;
                }
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, lexemes)?;
                writeln!(out)?;
            }
        }
        Ok(())
    }
}

impl Command for ScanCommand {
    type Args = ScanArgs;

    fn new(args: ScanArgs, config: LexConfig) -> Self {
        Self { args, config }
    }

    fn run(&self, out: &mut dyn Write) -> Result<()> {
        let source = self.read_source()?;
        let handler = Handler::new();
        let lexemes = self.scan(&source, &handler)?;
        self.write_lexemes(out, &lexemes)?;

        let unrecognized = handler.warning_count();
        info!(lexemes = lexemes.len(), unrecognized, "scan complete");
        for diagnostic in handler.take() {
            eprintln!("{}", diagnostic);
        }
        if self.args.deny_unrecognized && unrecognized > 0 {
            return Err(CliError::Unrecognized(unrecognized));
        }
        Ok(())
    }

    fn name() -> &'static str {
        "scan"
    }
}
