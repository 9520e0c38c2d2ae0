//! Configuration module for the lexm CLI.
//!
//! Finds and loads the `lexm.toml` shared with the library.

use std::path::{Path, PathBuf};

use lexm_lex::{LexConfig, CONFIG_FILE};
use tracing::debug;

use crate::error::{CliError, Result};

/// Load configuration from `path`, or from the working directory.
///
/// Returns the default configuration if no path is given and the working
/// directory has no `lexm.toml`.
pub fn load(path: Option<&Path>) -> Result<LexConfig> {
    match path {
        Some(path) => load_from_path(path),
        None => match find_config_file() {
            Some(path) => load_from_path(&path),
            None => Ok(LexConfig::default()),
        },
    }
}

/// Load configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<LexConfig> {
    if !path.exists() {
        return Err(CliError::ConfigNotFound(path.to_path_buf()));
    }
    debug!(path = %path.display(), "loading configuration");
    Ok(LexConfig::load(path)?)
}

/// Check for config in the current directory.
fn find_config_file() -> Option<PathBuf> {
    let path = PathBuf::from(CONFIG_FILE);
    path.exists().then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexm_lex::{FloatWidth, Select};
    use tempfile::TempDir;

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE);

        let mut original = LexConfig::default();
        original.tokenizer.select = Select::ReturnFirst;
        original.numeric.default_float = FloatWidth::F64;
        original.save(&config_path).unwrap();

        let loaded = load(Some(&config_path)).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_load_from_nonexistent_path() {
        let result = load(Some(Path::new("/nonexistent/path/lexm.toml")));
        assert!(matches!(result, Err(CliError::ConfigNotFound(_))));
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE);
        std::fs::write(&config_path, "[numeric]\nseparator = \"x\"\n").unwrap();

        let result = load_from_path(&config_path);
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
