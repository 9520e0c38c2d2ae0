//! Generate command implementation.
//!
//! Produces random numeric literals from a seeded generator, optionally
//! checking that each one reads back as generated.

use std::io::Write;
use std::sync::Arc;

use lexm_lex::micro::MAX_GENERATED;
use lexm_lex::token::numeric::NumericToken;
use lexm_lex::{extract, generate, LexConfig, Lexeme, TokenGenerator};
use lexm_util::{DiagnosticBuilder, DiagnosticCode, Handler};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::commands::common::{numeric_token, write_records, LiteralRecord, OutputFormat};
use crate::commands::traits::Command;
use crate::error::{CliError, Result};

/// Arguments for the generate command.
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    /// Generator seed; random if absent.
    pub seed: Option<u64>,
    /// Number of literals.
    pub count: usize,
    /// Minimum requested length.
    pub min: usize,
    /// Maximum requested length.
    pub max: usize,
    /// Re-extract every literal and fail on mismatches.
    pub check: bool,
    /// Output format.
    pub format: OutputFormat,
}

impl Default for GenerateArgs {
    fn default() -> Self {
        Self {
            seed: None,
            count: 10,
            min: 1,
            max: 12,
            check: false,
            format: OutputFormat::Text,
        }
    }
}

/// Generate command handler.
pub struct GenerateCommand {
    args: GenerateArgs,
    config: LexConfig,
}

impl GenerateCommand {
    fn validate_args(&self) -> Result<()> {
        let GenerateArgs { min, max, .. } = self.args;
        if min == 0 || min > max {
            return Err(CliError::Validation(format!(
                "length range {min}..={max} is empty or starts at zero"
            )));
        }
        if max > MAX_GENERATED {
            return Err(CliError::Validation(format!(
                "--max may not exceed {MAX_GENERATED}"
            )));
        }
        Ok(())
    }

    /// Generate the literals with `seed`.
    fn literals(&self, seed: u64) -> Result<Vec<Lexeme>> {
        let token = numeric_token(&self.config.numeric)?;
        let mut rng = StdRng::seed_from_u64(seed);
        Ok((0..self.args.count)
            .map(|_| generate(&token, None, self.args.min, self.args.max, &mut rng))
            .collect())
    }

    /// Report every literal that does not read back. Returns the failure count.
    fn check(&self, token: &Arc<NumericToken>, literals: &[Lexeme], handler: &Handler) -> usize {
        let mut failures = 0;
        for literal in literals {
            if let Some(problem) = round_trip_problem(token, literal) {
                failures += 1;
                DiagnosticBuilder::error(format!("{:?} does not read back", literal.text))
                    .code(DiagnosticCode::E_ROUND_TRIP)
                    .span(literal.span())
                    .note(problem)
                    .emit(handler);
            }
        }
        failures
    }
}

/// Describe how `literal` fails to survive extraction or serialization.
fn round_trip_problem(token: &Arc<NumericToken>, literal: &Lexeme) -> Option<String> {
    let Some(value) = literal.value else {
        return Some("generator stopped before reaching a valid literal".to_string());
    };
    let extracted = extract(token, &literal.text);
    if extracted.text != literal.text {
        return Some(format!("extraction stopped at {:?}", extracted.text));
    }
    if extracted.value.map(|v| v.kind()) != Some(value.kind()) {
        return Some(format!("read back as {:?}", extracted.value));
    }
    // non-finite floats have no literal form
    let serialized = token.serialize(&value)?;
    let reread = extract(token, &serialized);
    if reread.text != serialized || reread.value.map(|v| v.kind()) != Some(value.kind()) {
        return Some(format!("serialized form {serialized:?} reads back as {:?}", reread.value));
    }
    None
}

impl Command for GenerateCommand {
    type Args = GenerateArgs;

    fn new(args: GenerateArgs, config: LexConfig) -> Self {
        Self { args, config }
    }

    fn run(&self, out: &mut dyn Write) -> Result<()> {
        self.validate_args()?;
        let seed = self.args.seed.unwrap_or_else(rand::random);
        info!(seed, count = self.args.count, "generating literals");
        let literals = self.literals(seed)?;

        let records: Vec<_> = literals.iter().map(LiteralRecord::from_lexeme).collect();
        write_records(out, self.args.format, &records)?;

        if self.args.check {
            let token = numeric_token(&self.config.numeric)?;
            let handler = Handler::new();
            let failures = self.check(&token, &literals, &handler);
            debug!(failures, "round trip checked");
            for diagnostic in handler.take() {
                eprintln!("{}", diagnostic);
            }
            if failures > 0 {
                return Err(CliError::RoundTrip(failures));
            }
        }
        Ok(())
    }

    fn name() -> &'static str {
        "generate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(args: GenerateArgs) -> String {
        let mut out = Vec::new();
        GenerateCommand::new(args, LexConfig::default())
            .run(&mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_seed_is_reproducible() {
        let args = GenerateArgs {
            seed: Some(11),
            count: 20,
            ..GenerateArgs::default()
        };
        let first = output(args.clone());
        assert_eq!(first, output(args));
        assert_eq!(first.lines().count(), 20);
    }

    #[test]
    fn test_check_passes() {
        let args = GenerateArgs {
            seed: Some(3),
            count: 50,
            check: true,
            ..GenerateArgs::default()
        };
        assert_eq!(output(args).lines().count(), 50);
    }

    #[test]
    fn test_rejects_bad_ranges() {
        for (min, max) in [(0, 4), (5, 4), (1, MAX_GENERATED + 1)] {
            let args = GenerateArgs {
                min,
                max,
                ..GenerateArgs::default()
            };
            let result = GenerateCommand::new(args, LexConfig::default()).run(&mut Vec::new());
            assert!(matches!(result, Err(CliError::Validation(_))), "{min}..={max}");
        }
    }

    #[test]
    fn test_check_reports_unreadable_literal() {
        let token = numeric_token(&LexConfig::default().numeric).unwrap();
        let broken = Lexeme::unrecognized(0, 2, 1, 0, "0x");
        let command = GenerateCommand::new(GenerateArgs::default(), LexConfig::default());
        let handler = Handler::new();
        assert_eq!(command.check(&token, &[broken], &handler), 1);
        let diagnostics = handler.take();
        assert_eq!(diagnostics[0].code, Some(DiagnosticCode::E_ROUND_TRIP));
    }
}
