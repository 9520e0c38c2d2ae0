//! Extract command implementation.
//!
//! Runs the numeric token over each argument on its own and reports
//! whether it is a literal, and what it decodes to.

use std::io::Write;

use lexm_lex::{extract_with, LexConfig};
use tracing::{debug, warn};

use crate::commands::common::{numeric_token, write_records, LiteralRecord, OutputFormat};
use crate::commands::traits::Command;
use crate::error::{CliError, Result};

/// Arguments for the extract command.
#[derive(Debug, Clone, Default)]
pub struct ExtractArgs {
    /// Candidate literals.
    pub literals: Vec<String>,
    /// Output format.
    pub format: OutputFormat,
}

/// Extract command handler.
pub struct ExtractCommand {
    args: ExtractArgs,
    config: LexConfig,
}

impl ExtractCommand {
    /// Build one record per argument.
    fn records(&self) -> Result<Vec<LiteralRecord>> {
        let token = numeric_token(&self.config.numeric)?;
        let encoding = self.config.tokenizer.encoding;
        let records = self
            .args
            .literals
            .iter()
            .map(|literal| {
                let lexeme = extract_with(&token, literal, None, encoding);
                if lexeme.text == *literal {
                    return LiteralRecord::from_lexeme(&lexeme);
                }
                // only a prefix was a literal
                debug!(literal = %literal, prefix = %lexeme.text, "partial literal");
                LiteralRecord {
                    text: literal.clone(),
                    valid: false,
                    kind: None,
                    value: None,
                }
            })
            .collect();
        Ok(records)
    }
}

impl Command for ExtractCommand {
    type Args = ExtractArgs;

    fn new(args: ExtractArgs, config: LexConfig) -> Self {
        Self { args, config }
    }

    fn run(&self, out: &mut dyn Write) -> Result<()> {
        if self.args.literals.is_empty() {
            return Err(CliError::Validation("no literals given".to_string()));
        }
        let records = self.records()?;
        let invalid = records.iter().filter(|r| !r.valid).count();
        if invalid > 0 {
            warn!(invalid, "some arguments are not numeric literals");
        }
        write_records(out, self.args.format, &records)
    }

    fn name() -> &'static str {
        "extract"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexm_lex::{FloatWidth, Value};

    fn records(literals: &[&str], config: LexConfig) -> Vec<LiteralRecord> {
        let args = ExtractArgs {
            literals: literals.iter().map(|s| s.to_string()).collect(),
            format: OutputFormat::Text,
        };
        ExtractCommand::new(args, config).records().unwrap()
    }

    #[test]
    fn test_extract_values() {
        let records = records(&["42", "0x7FFFFFFF", "1.5d"], LexConfig::default());
        assert_eq!(records[0].value, Some(Value::I8(42)));
        assert_eq!(records[1].value, Some(Value::I32(i32::MAX)));
        assert_eq!(records[2].value, Some(Value::F64(1.5)));
        assert!(records.iter().all(|r| r.valid));
    }

    #[test]
    fn test_partial_literal_is_invalid() {
        let records = records(&["12abc"], LexConfig::default());
        assert!(!records[0].valid);
        assert_eq!(records[0].text, "12abc");
        assert_eq!(records[0].value, None);
    }

    #[test]
    fn test_config_changes_default_float() {
        let mut config = LexConfig::default();
        config.numeric.default_float = FloatWidth::F64;
        let records = records(&["2.5"], config);
        assert_eq!(records[0].value, Some(Value::F64(2.5)));
    }

    #[test]
    fn test_text_output() {
        let args = ExtractArgs {
            literals: vec!["255u".to_string(), "x".to_string()],
            format: OutputFormat::Text,
        };
        let mut out = Vec::new();
        ExtractCommand::new(args, LexConfig::default())
            .run(&mut out)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "255u\tu8\t255\nx\tinvalid\n");
    }

    #[test]
    fn test_requires_literals() {
        let command = ExtractCommand::new(ExtractArgs::default(), LexConfig::default());
        assert!(matches!(
            command.run(&mut Vec::new()),
            Err(CliError::Validation(_))
        ));
    }
}
