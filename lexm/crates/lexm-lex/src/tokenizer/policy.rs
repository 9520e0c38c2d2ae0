//! Per-character handling policies.

use crate::charset::{CharCategory, SUBSTITUTE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Set of flags controlling how the tokenizer treats one character.
///
/// An empty policy passes the character to the candidates.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CharPolicy(u8);

impl CharPolicy {
    /// Pass the character through
    pub const PASS: Self = Self(0);
    /// Drop while no candidate is active
    pub const TRIM: Self = Self(1);
    /// Emit the character as an unrecognized lexeme
    pub const DISALLOW: Self = Self(1 << 1);
    /// Drop unconditionally
    pub const IGNORE: Self = Self(1 << 2);
    /// End every active candidate without advancing it
    pub const TERMINATE: Self = Self(1 << 3);

    /// Raw flag bits
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether every flag of `other` is set
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    /// Whether no flag is set
    #[inline]
    pub const fn is_pass(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for CharPolicy {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for CharPolicy {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for CharPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_pass() {
            return f.write_str("PASS");
        }
        let names = [
            (Self::TRIM, "TRIM"),
            (Self::DISALLOW, "DISALLOW"),
            (Self::IGNORE, "IGNORE"),
            (Self::TERMINATE, "TERMINATE"),
        ];
        let mut first = true;
        for (flag, name) in names {
            if self.contains(flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// A single policy flag, as written in configuration files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyFlag {
    /// See [`CharPolicy::TRIM`]
    Trim,
    /// See [`CharPolicy::DISALLOW`]
    Disallow,
    /// See [`CharPolicy::IGNORE`]
    Ignore,
    /// See [`CharPolicy::TERMINATE`]
    Terminate,
}

impl From<PolicyFlag> for CharPolicy {
    fn from(flag: PolicyFlag) -> Self {
        match flag {
            PolicyFlag::Trim => CharPolicy::TRIM,
            PolicyFlag::Disallow => CharPolicy::DISALLOW,
            PolicyFlag::Ignore => CharPolicy::IGNORE,
            PolicyFlag::Terminate => CharPolicy::TERMINATE,
        }
    }
}

impl FromIterator<PolicyFlag> for CharPolicy {
    fn from_iter<I: IntoIterator<Item = PolicyFlag>>(iter: I) -> Self {
        iter.into_iter()
            .fold(CharPolicy::PASS, |acc, flag| acc | flag.into())
    }
}

/// Policy lookup for every ASCII character.
#[derive(Clone, PartialEq, Eq)]
pub struct PolicyTable([CharPolicy; 128]);

impl PolicyTable {
    /// A table passing every character.
    pub fn pass_all() -> Self {
        Self([CharPolicy::PASS; 128])
    }

    /// Policy for `c`. Non-ASCII characters share the substitute's entry.
    #[inline]
    pub fn get(&self, c: char) -> CharPolicy {
        let c = if c.is_ascii() { c } else { SUBSTITUTE };
        self.0[c as usize]
    }

    /// Replace the policy of one character.
    pub fn set(&mut self, c: char, policy: CharPolicy) {
        let c = if c.is_ascii() { c } else { SUBSTITUTE };
        self.0[c as usize] = policy;
    }

    /// Replace the policy of every member of `category`.
    ///
    /// `NotAscii` addresses the substitute character, since that is what
    /// non-ASCII glyphs become.
    pub fn set_category(&mut self, category: CharCategory, policy: CharPolicy) {
        if category == CharCategory::NotAscii {
            self.set(SUBSTITUTE, policy);
            return;
        }
        for c in category.chars() {
            self.set(c, policy);
        }
    }
}

impl Default for PolicyTable {
    /// Whitespace and newlines are trimmed, everything else passes.
    fn default() -> Self {
        let mut table = Self::pass_all();
        table.set_category(CharCategory::Whitespace, CharPolicy::TRIM);
        table.set_category(CharCategory::Newline, CharPolicy::TRIM);
        table
    }
}

impl fmt::Debug for PolicyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.0
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| !p.is_pass())
                    .map(|(i, p)| (char::from(i as u8), p)),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_combine() {
        let policy = CharPolicy::TRIM | CharPolicy::TERMINATE;
        assert!(policy.contains(CharPolicy::TRIM));
        assert!(policy.contains(CharPolicy::TERMINATE));
        assert!(!policy.contains(CharPolicy::IGNORE));
        assert!(!policy.contains(CharPolicy::PASS));
        assert_eq!(format!("{policy:?}"), "TRIM | TERMINATE");
    }

    #[test]
    fn test_flags_from_config() {
        let policy: CharPolicy = [PolicyFlag::Disallow, PolicyFlag::Ignore].into_iter().collect();
        assert_eq!(policy, CharPolicy::DISALLOW | CharPolicy::IGNORE);
    }

    #[test]
    fn test_default_table() {
        let table = PolicyTable::default();
        assert_eq!(table.get(' '), CharPolicy::TRIM);
        assert_eq!(table.get('\n'), CharPolicy::TRIM);
        assert_eq!(table.get('\x0B'), CharPolicy::TRIM);
        assert_eq!(table.get('!'), CharPolicy::PASS);
    }

    #[test]
    fn test_later_categories_refine_earlier() {
        let mut table = PolicyTable::pass_all();
        table.set_category(CharCategory::Word, CharPolicy::DISALLOW);
        table.set_category(CharCategory::Digit, CharPolicy::PASS);
        assert_eq!(table.get('_'), CharPolicy::DISALLOW);
        assert_eq!(table.get('7'), CharPolicy::PASS);
    }

    #[test]
    fn test_not_ascii_maps_to_substitute() {
        let mut table = PolicyTable::pass_all();
        table.set_category(CharCategory::NotAscii, CharPolicy::IGNORE);
        assert_eq!(table.get('é'), CharPolicy::IGNORE);
        assert_eq!(table.get(SUBSTITUTE), CharPolicy::IGNORE);
    }
}
