//! Scanning modes.

use serde::{Deserialize, Serialize};

/// When the tokenizer reports finished lexemes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Select {
    /// As soon as any candidate finalizes
    ReturnFirst,
    /// After a step in which at least one candidate finalized
    ReturnSet,
    /// Once every active candidate has finalized
    #[default]
    ReturnAll,
}

/// Selection policy plus whether new candidates may start while others
/// are still active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Mode {
    /// Result selection
    pub select: Select,
    /// Start candidates at every position, not just when idle
    pub interleaved: bool,
}

impl Mode {
    /// Exclusive scanning with the given selection.
    pub const fn new(select: Select) -> Self {
        Self {
            select,
            interleaved: false,
        }
    }

    /// The same selection with interleaving switched on or off.
    pub const fn interleaved(self, interleaved: bool) -> Self {
        Self {
            select: self.select,
            interleaved,
        }
    }
}

impl From<Select> for Mode {
    fn from(select: Select) -> Self {
        Mode::new(select)
    }
}
