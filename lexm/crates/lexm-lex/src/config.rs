//! Tokenizer and numeric literal configuration.
//!
//! Both halves load from a single TOML document, by default `lexm.toml`:
//!
//! ```toml
//! [tokenizer]
//! select = "return-all"
//! interleaved = false
//! encoding = "utf8"
//! line = 1
//!
//! [[tokenizer.policies]]
//! category = "whitespace"
//! flags = ["trim"]
//!
//! [[tokenizer.policies]]
//! category = "symbol"
//! flags = ["terminate"]
//!
//! [numeric]
//! separator = "_"
//! fraction = "."
//! default-float = "f64"
//! ```
//!
//! Policy rules apply in order, so a later rule for a narrower category
//! overrides an earlier aggregate.

use crate::charset::{CharCategory, Encoding};
use crate::error::{ConfigError, Result};
use crate::tokenizer::{CharPolicy, Mode, PolicyFlag, PolicyTable, Select};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name
pub const CONFIG_FILE: &str = "lexm.toml";

/// Width of floating literals without an `f`/`d` suffix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloatWidth {
    /// 32-bit
    #[default]
    F32,
    /// 64-bit
    F64,
}

/// Characters every numeric literal already gives a meaning to.
const NUMERIC_GRAMMAR: &str = "0123456789abcdefABCDEFxXlLiIsSuU+-";

/// Configuration of the numeric literal token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct NumericConfig {
    /// Digit separator, ignored by the value
    pub separator: char,
    /// Separator between integral and fraction digits
    pub fraction: char,
    /// Width of unsuffixed floats
    pub default_float: FloatWidth,
}

impl Default for NumericConfig {
    fn default() -> Self {
        Self {
            separator: '\'',
            fraction: '.',
            default_float: FloatWidth::F32,
        }
    }
}

impl NumericConfig {
    /// Check that both separators are free characters.
    pub fn validate(&self) -> Result<()> {
        for (role, c) in [
            ("digit separator", self.separator),
            ("fraction separator", self.fraction),
        ] {
            if !c.is_ascii() {
                return Err(ConfigError::NonAsciiSeparator { role, c });
            }
            if NUMERIC_GRAMMAR.contains(c) {
                return Err(ConfigError::ReservedSeparator { role, c });
            }
        }
        if self.separator == self.fraction {
            return Err(ConfigError::SameSeparators(self.separator));
        }
        Ok(())
    }
}

/// Policy flags assigned to one character category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRule {
    /// Category the flags apply to
    pub category: CharCategory,
    /// Flags, empty to pass
    #[serde(default)]
    pub flags: Vec<PolicyFlag>,
}

impl PolicyRule {
    /// Rule assigning `flags` to `category`.
    pub fn new(category: CharCategory, flags: impl IntoIterator<Item = PolicyFlag>) -> Self {
        Self {
            category,
            flags: flags.into_iter().collect(),
        }
    }
}

/// Configuration of a [`Tokenizer`](crate::tokenizer::Tokenizer).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TokenizerConfig {
    /// Result selection
    pub select: Select,
    /// Start candidates while others are active
    pub interleaved: bool,
    /// Source offset of the first unit
    pub offset: usize,
    /// Number of the first line
    pub line: u32,
    /// Encoding of the unit stream
    pub encoding: Encoding,
    /// Category policies, applied in order over an all-pass table
    pub policies: Vec<PolicyRule>,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            select: Select::default(),
            interleaved: false,
            offset: 0,
            line: 1,
            encoding: Encoding::default(),
            policies: vec![
                PolicyRule::new(CharCategory::Whitespace, [PolicyFlag::Trim]),
                PolicyRule::new(CharCategory::Newline, [PolicyFlag::Trim]),
            ],
        }
    }
}

impl TokenizerConfig {
    /// Scanning mode described by this configuration
    pub fn mode(&self) -> Mode {
        Mode::new(self.select).interleaved(self.interleaved)
    }

    /// Build the policy table.
    pub fn policy_table(&self) -> PolicyTable {
        let mut table = PolicyTable::pass_all();
        for rule in &self.policies {
            let policy: CharPolicy = rule.flags.iter().copied().collect();
            table.set_category(rule.category, policy);
        }
        table
    }
}

/// A complete `lexm.toml`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexConfig {
    /// Tokenizer section
    pub tokenizer: TokenizerConfig,
    /// Numeric literal section
    pub numeric: NumericConfig,
}

impl LexConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: LexConfig = toml::from_str(text)?;
        config.numeric.validate()?;
        Ok(config)
    }

    /// Read and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write to `path` as TOML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = self.to_toml_string()?;
        std::fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::CharPolicy;

    #[test]
    fn test_default_config() {
        let config = LexConfig::default();
        assert!(config.numeric.validate().is_ok());
        assert_eq!(config.tokenizer.line, 1);
        assert_eq!(config.tokenizer.mode(), Mode::default());
        assert_eq!(config.tokenizer.policy_table(), PolicyTable::default());
    }

    #[test]
    fn test_parse_partial_document() {
        let config = LexConfig::from_toml_str(
            r#"
            [tokenizer]
            select = "return-first"
            interleaved = true

            [[tokenizer.policies]]
            category = "symbol"
            flags = ["terminate", "trim"]

            [numeric]
            separator = "_"
            default-float = "f64"
            "#,
        )
        .unwrap();
        assert_eq!(config.tokenizer.select, Select::ReturnFirst);
        assert!(config.tokenizer.interleaved);
        assert_eq!(config.tokenizer.encoding, Encoding::Utf8);
        assert_eq!(config.numeric.separator, '_');
        assert_eq!(config.numeric.fraction, '.');
        assert_eq!(config.numeric.default_float, FloatWidth::F64);
        let table = config.tokenizer.policy_table();
        assert_eq!(table.get(';'), CharPolicy::TERMINATE | CharPolicy::TRIM);
        // an explicit policy list replaces the defaults
        assert_eq!(table.get(' '), CharPolicy::PASS);
    }

    #[test]
    fn test_rejects_grammar_separator() {
        for separator in ['e', 'x', '-', '5', 'U'] {
            let config = NumericConfig {
                separator,
                ..NumericConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::ReservedSeparator { .. })),
                "{separator:?}"
            );
        }
    }

    #[test]
    fn test_rejects_same_separators() {
        let config = NumericConfig {
            separator: '.',
            ..NumericConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::SameSeparators('.'))));
    }

    #[test]
    fn test_rejects_non_ascii_separator() {
        let config = NumericConfig {
            fraction: '·',
            ..NumericConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonAsciiSeparator { .. })
        ));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = LexConfig::from_toml_str("[tokenizer]\nselect = \"sometimes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut config = LexConfig::default();
        config.tokenizer.encoding = Encoding::Utf16;
        config.numeric.fraction = ',';
        config.save(&path).unwrap();
        assert_eq!(LexConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = LexConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
