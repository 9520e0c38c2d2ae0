//! Character classification and code-unit handling.
//!
//! Tokens only ever see ASCII: every glyph outside the ASCII range is
//! collapsed into the [`SUBSTITUTE`] character, while source offsets keep
//! counting the code units of the configured [`Encoding`].

use serde::{Deserialize, Serialize};

/// Placeholder handed to tokens for any non-ASCII glyph (ASCII SUB).
pub const SUBSTITUTE: char = '\u{1a}';

/// Broad ASCII character classes used to assign tokenizer policies.
///
/// The first eight variants partition the ASCII range (plus `NotAscii`);
/// `Letter`, `Alphanumeric` and `Word` are aggregates. [`CharCategory::of`]
/// only ever returns an aggregate for `_`, which belongs to `Word` alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CharCategory {
    /// Anything above 0x7F
    NotAscii,
    /// Space, horizontal tab and vertical tab
    Whitespace,
    /// Line feed, form feed and carriage return
    Newline,
    /// The substitute character 0x1A
    Substitute,
    /// Remaining control characters and DEL
    Control,
    /// `a-z`
    LowercaseLetter,
    /// `A-Z`
    UppercaseLetter,
    /// `0-9`
    Digit,
    /// Printable characters that are not word characters
    Symbol,
    /// `a-zA-Z`
    Letter,
    /// `a-zA-Z0-9`
    Alphanumeric,
    /// `a-zA-Z0-9_`
    Word,
}

impl CharCategory {
    /// Every category, primary classes first.
    pub const ALL: [CharCategory; 12] = [
        CharCategory::NotAscii,
        CharCategory::Whitespace,
        CharCategory::Newline,
        CharCategory::Substitute,
        CharCategory::Control,
        CharCategory::LowercaseLetter,
        CharCategory::UppercaseLetter,
        CharCategory::Digit,
        CharCategory::Symbol,
        CharCategory::Letter,
        CharCategory::Alphanumeric,
        CharCategory::Word,
    ];

    /// Classify a character into its primary category.
    ///
    /// # Example
    ///
    /// ```
    /// use lexm_lex::charset::CharCategory;
    ///
    /// assert_eq!(CharCategory::of(' '), CharCategory::Whitespace);
    /// assert_eq!(CharCategory::of('!'), CharCategory::Symbol);
    /// assert_eq!(CharCategory::of('_'), CharCategory::Word);
    /// assert_eq!(CharCategory::of('é'), CharCategory::NotAscii);
    /// ```
    pub fn of(c: char) -> Self {
        match c {
            _ if !c.is_ascii() => CharCategory::NotAscii,
            ' ' | '\t' | '\x0B' => CharCategory::Whitespace,
            '\n' | '\x0C' | '\r' => CharCategory::Newline,
            SUBSTITUTE => CharCategory::Substitute,
            _ if c.is_ascii_control() => CharCategory::Control,
            'a'..='z' => CharCategory::LowercaseLetter,
            'A'..='Z' => CharCategory::UppercaseLetter,
            '0'..='9' => CharCategory::Digit,
            '_' => CharCategory::Word,
            _ => CharCategory::Symbol,
        }
    }

    /// Whether `c` is a member of this category (aggregates included).
    pub fn contains(self, c: char) -> bool {
        match self {
            CharCategory::Letter => c.is_ascii_alphabetic(),
            CharCategory::Alphanumeric => c.is_ascii_alphanumeric(),
            CharCategory::Word => c.is_ascii_alphanumeric() || c == '_',
            primary => CharCategory::of(c) == primary,
        }
    }

    /// The ASCII members of this category; empty for `NotAscii`.
    pub fn chars(self) -> impl Iterator<Item = char> {
        (0u8..=0x7F).map(char::from).filter(move |&c| self.contains(c))
    }
}

/// Encoding of the unit stream fed to the tokenizer.
///
/// Only affects how code units are grouped into glyphs; offsets are always
/// counted in units of this encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    /// Bytes of UTF-8; offsets match `str` byte indices
    #[default]
    Utf8,
    /// UTF-16 code units
    Utf16,
    /// Unicode scalar values
    Utf32,
    /// One unit per character, non-ASCII pre-substituted
    Ascii,
}

impl Encoding {
    /// Number of units in the glyph led by `unit`, or 0 for a continuation unit.
    pub fn glyph_units(self, unit: u32) -> usize {
        match self {
            Encoding::Utf8 => match unit {
                0x00..=0x7F => 1,
                0x80..=0xBF => 0,
                0xC0..=0xDF => 2,
                0xE0..=0xEF => 3,
                0xF0..=0xF7 => 4,
                _ => 0,
            },
            Encoding::Utf16 => match unit {
                0xD800..=0xDBFF => 2,
                0xDC00..=0xDFFF => 0,
                _ => 1,
            },
            Encoding::Utf32 | Encoding::Ascii => 1,
        }
    }

    /// Whether `unit` continues a glyph started by an earlier unit.
    #[inline]
    pub fn is_continuation(self, unit: u32) -> bool {
        self.glyph_units(unit) == 0
    }

    /// Split `source` into units of this encoding.
    ///
    /// # Example
    ///
    /// ```
    /// use lexm_lex::charset::Encoding;
    ///
    /// assert_eq!(Encoding::Utf8.units("aé").len(), 3);
    /// assert_eq!(Encoding::Utf16.units("a😀").len(), 3);
    /// assert_eq!(Encoding::Utf32.units("a😀").len(), 2);
    /// ```
    pub fn units(self, source: &str) -> Vec<u32> {
        match self {
            Encoding::Utf8 => source.bytes().map(u32::from).collect(),
            Encoding::Utf16 => source.encode_utf16().map(u32::from).collect(),
            Encoding::Utf32 => source.chars().map(u32::from).collect(),
            Encoding::Ascii => source.chars().map(|c| u32::from(to_ascii(c))).collect(),
        }
    }

    /// Number of units `c` occupies.
    pub fn unit_len(self, c: char) -> usize {
        match self {
            Encoding::Utf8 => c.len_utf8(),
            Encoding::Utf16 => c.len_utf16(),
            Encoding::Utf32 | Encoding::Ascii => 1,
        }
    }

    /// Append the units of `c` to `out`.
    pub fn encode_char(self, c: char, out: &mut Vec<u32>) {
        match self {
            Encoding::Utf8 => {
                let mut buf = [0u8; 4];
                out.extend(c.encode_utf8(&mut buf).bytes().map(u32::from));
            }
            Encoding::Utf16 => {
                let mut buf = [0u16; 2];
                out.extend(c.encode_utf16(&mut buf).iter().copied().map(u32::from));
            }
            Encoding::Utf32 => out.push(u32::from(c)),
            Encoding::Ascii => out.push(u32::from(to_ascii(c))),
        }
    }
}

/// Map the lead unit of a glyph to the character tokens see.
#[inline]
pub fn lead_to_char(unit: u32) -> char {
    if unit < 0x80 {
        char::from(unit as u8)
    } else {
        SUBSTITUTE
    }
}

/// The character tokens see in place of `c`.
#[inline]
pub fn to_ascii(c: char) -> char {
    if c.is_ascii() {
        c
    } else {
        SUBSTITUTE
    }
}

/// Checks if a character is a valid digit in the given base (2..=16).
///
/// # Example
///
/// ```
/// use lexm_lex::charset::is_digit_in_base;
///
/// assert!(is_digit_in_base('7', 8));
/// assert!(!is_digit_in_base('8', 8));
/// assert!(is_digit_in_base('F', 16));
/// ```
#[inline]
pub fn is_digit_in_base(c: char, base: u32) -> bool {
    c.to_digit(base).is_some()
}

/// The digits of `base`, lowercase first, then the uppercase hex letters.
pub fn base_digits(base: u32) -> impl Iterator<Item = char> {
    let lower = (0..base).filter_map(move |d| char::from_digit(d, base));
    let upper = (10..base)
        .filter_map(move |d| char::from_digit(d, base))
        .map(|c| c.to_ascii_uppercase());
    lower.chain(upper)
}

/// Checks if a character can start an ASCII identifier.
#[inline]
pub fn is_ascii_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Checks if a character can continue an ASCII identifier.
#[inline]
pub fn is_ascii_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_categories_partition_ascii() {
        for c in (0u8..=0x7F).map(char::from) {
            let primaries = CharCategory::ALL[..9]
                .iter()
                .filter(|cat| cat.contains(c))
                .count();
            if c == '_' {
                assert_eq!(primaries, 0);
                assert_eq!(CharCategory::of(c), CharCategory::Word);
            } else {
                assert_eq!(primaries, 1, "{:?} in {} primary categories", c, primaries);
            }
        }
    }

    #[test]
    fn test_whitespace_members() {
        let members: Vec<char> = CharCategory::Whitespace.chars().collect();
        assert_eq!(members, vec!['\t', '\x0B', ' ']);
        assert_eq!(CharCategory::of('!'), CharCategory::Symbol);
    }

    #[test]
    fn test_aggregates() {
        assert!(CharCategory::Letter.contains('q'));
        assert!(!CharCategory::Letter.contains('7'));
        assert!(CharCategory::Alphanumeric.contains('7'));
        assert!(CharCategory::Word.contains('_'));
        assert_eq!(CharCategory::Word.chars().count(), 63);
        assert_eq!(CharCategory::NotAscii.chars().count(), 0);
    }

    #[test]
    fn test_utf8_glyph_units() {
        let units = Encoding::Utf8.units("é€😀");
        let leads: Vec<usize> = units
            .iter()
            .map(|&u| Encoding::Utf8.glyph_units(u))
            .filter(|&n| n > 0)
            .collect();
        assert_eq!(leads, vec![2, 3, 4]);
        assert_eq!(units.len(), 9);
    }

    #[test]
    fn test_utf16_surrogates() {
        let units = Encoding::Utf16.units("😀");
        assert_eq!(units.len(), 2);
        assert_eq!(Encoding::Utf16.glyph_units(units[0]), 2);
        assert!(Encoding::Utf16.is_continuation(units[1]));
    }

    #[test]
    fn test_encode_char_matches_units() {
        for enc in [Encoding::Utf8, Encoding::Utf16, Encoding::Utf32, Encoding::Ascii] {
            let mut out = Vec::new();
            for c in "x€y".chars() {
                enc.encode_char(c, &mut out);
            }
            assert_eq!(out, enc.units("x€y"));
        }
    }

    #[test]
    fn test_lead_to_char_substitutes() {
        assert_eq!(lead_to_char(u32::from(b'a')), 'a');
        assert_eq!(lead_to_char(0xC3), SUBSTITUTE);
        assert_eq!(lead_to_char(0x1F600), SUBSTITUTE);
    }

    #[test]
    fn test_base_digits() {
        assert_eq!(base_digits(2).collect::<String>(), "01");
        assert_eq!(base_digits(8).collect::<String>(), "01234567");
        assert_eq!(base_digits(16).collect::<String>(), "0123456789abcdefABCDEF");
    }
}
