//! Numeric literal recognizer.
//!
//! Accepts signed and unsigned integers in base 2, 8, 10 and 16, decimal
//! floating-point numbers with fraction and exponent parts, a digit
//! separator, and C-like type suffixes:
//!
//! | Form | Meaning |
//! |---|---|
//! | `0b101`, `0x1F`, `017` | binary, hex, octal (bare leading zero) |
//! | `1'000` | digit separator, ignored by the value |
//! | `1.5`, `.5`, `1.` | fraction, forces a float |
//! | `2e3`, `2e-3` | exponent, always base 10; negative forces a float |
//! | `s`, `i`, `l`, `ll` | 8, 16, 32, 64-bit integer |
//! | `u` | unsigned, before or after the width suffix |
//! | `f`, `d` | 32 or 64-bit float |
//!
//! Without a width suffix an integer takes the narrowest of 8, 16 and 32
//! bits that holds its magnitude. It is never widened to 64 bits.
//!
//! # Example
//!
//! ```
//! use lexm_lex::micro::extract;
//! use lexm_lex::token::numeric::NumericToken;
//! use lexm_lex::Value;
//! use std::sync::Arc;
//!
//! let token = Arc::new(NumericToken::default());
//! assert_eq!(extract(&token, "0X2f6Su").value, Some(Value::U8(246)));
//! assert_eq!(extract(&token, "-0b''11").value, Some(Value::I8(-3)));
//! ```

use super::fsm::{Machine, MachineState, StateId, StateMachine};
use super::GlobalState;
use crate::charset::{base_digits, is_digit_in_base};
use crate::config::{FloatWidth, NumericConfig};
use crate::error::ConfigError;
use crate::value::Value;
use std::borrow::Cow;

/// States of the numeric grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumState {
    /// Nothing consumed yet
    Begin,
    /// A single leading `0`
    LeadZero,
    /// The first non-zero digit
    LeadDigit,
    /// `b`/`x` after a leading zero
    BaseSpecifier,
    /// A digit of the current base, or the separator
    Digit,
    /// `+`/`-` for the literal or its exponent
    Sign,
    /// The fraction separator
    Fraction,
    /// `e`/`E`
    Exponent,
    /// `u`/`U`
    SignSpecifier,
    /// `s`, `i` or `l`
    IprecSpecifier,
    /// The second `l` of `ll`
    LlprecSpecifier,
    /// `f` or `d`, nothing may follow
    FprecSpecifier,
}

impl StateId for NumState {
    const ALL: &'static [Self] = &[
        NumState::Begin,
        NumState::LeadZero,
        NumState::LeadDigit,
        NumState::BaseSpecifier,
        NumState::Digit,
        NumState::Sign,
        NumState::Fraction,
        NumState::Exponent,
        NumState::SignSpecifier,
        NumState::IprecSpecifier,
        NumState::LlprecSpecifier,
        NumState::FprecSpecifier,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Radix of the literal being read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Base {
    /// `0b`
    Binary,
    /// bare leading `0`
    Octal,
    /// default
    Decimal,
    /// `0x`
    Hex,
}

impl Base {
    /// Numeric radix
    pub fn radix(self) -> u32 {
        match self {
            Base::Binary => 2,
            Base::Octal => 8,
            Base::Decimal => 10,
            Base::Hex => 16,
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Which accumulator digits currently go to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Part {
    /// Before any fraction separator or exponent
    Integral = 0,
    /// After the fraction separator
    Fraction = 1,
    /// After `e`
    Exponent = 2,
}

/// Explicit sign of the literal or its exponent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Sign {
    /// No sign seen, positive
    #[default]
    Unknown,
    /// `+`
    Positive,
    /// `-`
    Negative,
}

/// Type chosen so far by suffixes and float markers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumberType {
    /// Integer of inferred width
    Unknown,
    /// Float of configured default width
    UnknownFloat,
    /// `s`
    Byte,
    /// `i`
    Short,
    /// `l`
    Int,
    /// `ll`
    Long,
    /// `f`
    Float,
    /// `d`
    Double,
}

impl NumberType {
    fn is_integral(self) -> bool {
        matches!(
            self,
            NumberType::Unknown
                | NumberType::Byte
                | NumberType::Short
                | NumberType::Int
                | NumberType::Long
        )
    }
}

/// Match state of a numeric literal.
#[derive(Clone, Debug)]
pub struct NumericState {
    at: NumState,
    valid: bool,
    base: Base,
    part: Part,
    parts: [i64; 3],
    fraction_digits: i32,
    sign: Sign,
    exp_sign: Sign,
    unsigned: bool,
    ty: NumberType,
}

impl Default for NumericState {
    fn default() -> Self {
        Self {
            at: NumState::Begin,
            valid: false,
            base: Base::Decimal,
            part: Part::Integral,
            parts: [0; 3],
            fraction_digits: 0,
            sign: Sign::Unknown,
            exp_sign: Sign::Unknown,
            unsigned: false,
            ty: NumberType::Unknown,
        }
    }
}

impl NumericState {
    /// Current base
    pub fn base(&self) -> Base {
        self.base
    }

    /// Current part
    pub fn part(&self) -> Part {
        self.part
    }

    /// Type chosen so far
    pub fn number_type(&self) -> NumberType {
        self.ty
    }

    /// Whether a `u` suffix was seen
    pub fn is_unsigned(&self) -> bool {
        self.unsigned
    }
}

impl MachineState for NumericState {
    type Id = NumState;

    fn current(&self) -> NumState {
        self.at
    }

    fn set_current(&mut self, id: NumState) {
        self.at = id;
    }

    fn is_valid(&self) -> bool {
        self.valid
    }
}

/// The numeric literal state table.
#[derive(Debug)]
pub struct NumericGrammar {
    config: NumericConfig,
    digits: [Box<[char]>; 4],
}

/// Numeric literal token.
pub type NumericToken = StateMachine<NumericGrammar>;

impl NumericGrammar {
    /// Build the grammar for `config`.
    pub fn new(config: NumericConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: NumericConfig) -> Self {
        let digits_of = |base: Base| -> Box<[char]> {
            base_digits(base.radix())
                .chain(std::iter::once(config.separator))
                .collect()
        };
        let digits = [
            digits_of(Base::Binary),
            digits_of(Base::Octal),
            digits_of(Base::Decimal),
            digits_of(Base::Hex),
        ];
        Self { config, digits }
    }

    /// The configuration in use
    pub fn config(&self) -> &NumericConfig {
        &self.config
    }

    fn decode_integral(&self, s: &NumericState) -> Value {
        let mut v = s.parts[Part::Integral as usize];
        if s.part == Part::Exponent {
            let exp = u32::try_from(s.parts[Part::Exponent as usize]).unwrap_or(u32::MAX);
            v = v.wrapping_mul(10i64.wrapping_pow(exp));
        }
        let ty = match s.ty {
            NumberType::Unknown => infer_width(v, s.unsigned),
            explicit => explicit,
        };
        if s.sign == Sign::Negative {
            v = v.wrapping_neg();
        }
        // two's-complement reinterpretation, so `-5u` reads as 251u8
        match (ty, s.unsigned) {
            (NumberType::Byte, false) => Value::I8(v as i8),
            (NumberType::Byte, true) => Value::U8(v as u8),
            (NumberType::Short, false) => Value::I16(v as i16),
            (NumberType::Short, true) => Value::U16(v as u16),
            (NumberType::Int, false) => Value::I32(v as i32),
            (NumberType::Int, true) => Value::U32(v as u32),
            (_, false) => Value::I64(v),
            (_, true) => Value::U64(v as u64),
        }
    }

    fn decode_float(&self, s: &NumericState) -> Value {
        let mut v = s.parts[Part::Integral as usize] as f64;
        if s.fraction_digits > 0 {
            v += s.parts[Part::Fraction as usize] as f64 / 10f64.powi(s.fraction_digits);
        }
        if s.part == Part::Exponent {
            let exp = 10f64.powf(s.parts[Part::Exponent as usize] as f64);
            if s.exp_sign == Sign::Negative && exp > 0.0 {
                v /= exp;
            } else {
                v *= exp;
            }
        }
        if s.sign == Sign::Negative {
            v = -v;
        }
        let width = match s.ty {
            NumberType::Double => FloatWidth::F64,
            NumberType::Float => FloatWidth::F32,
            _ => self.config.default_float,
        };
        match width {
            FloatWidth::F32 => Value::F32(v as f32),
            FloatWidth::F64 => Value::F64(v),
        }
    }
}

impl Default for NumericGrammar {
    fn default() -> Self {
        Self::build(NumericConfig::default())
    }
}

impl NumericToken {
    /// Numeric token with a custom separator, fraction character or
    /// default float width.
    pub fn with_config(config: NumericConfig) -> Result<Self, ConfigError> {
        NumericGrammar::new(config).map(StateMachine::new)
    }
}

fn infer_width(magnitude: i64, unsigned: bool) -> NumberType {
    let (byte_max, short_max) = if unsigned {
        (i64::from(u8::MAX), i64::from(u16::MAX))
    } else {
        (i64::from(i8::MAX), i64::from(i16::MAX))
    };
    if magnitude > short_max {
        NumberType::Int
    } else if magnitude > byte_max {
        NumberType::Short
    } else {
        NumberType::Byte
    }
}

impl Machine for NumericGrammar {
    type State = NumericState;

    fn name(&self) -> &str {
        "numeric"
    }

    fn fresh_state(&self, _global: Option<&GlobalState>) -> NumericState {
        NumericState::default()
    }

    fn targets(&self, from: NumState) -> &'static [NumState] {
        use NumState::*;
        match from {
            Begin => &[LeadZero, LeadDigit, Sign, Fraction],
            LeadZero => &[
                BaseSpecifier,
                Digit,
                Fraction,
                Exponent,
                SignSpecifier,
                IprecSpecifier,
                FprecSpecifier,
            ],
            LeadDigit => &[
                Digit,
                Fraction,
                Exponent,
                SignSpecifier,
                IprecSpecifier,
                FprecSpecifier,
            ],
            BaseSpecifier => &[Digit],
            Digit => &[
                Digit,
                Exponent,
                Fraction,
                FprecSpecifier,
                SignSpecifier,
                IprecSpecifier,
            ],
            Sign => &[LeadZero, LeadDigit, Fraction, Digit],
            Fraction => &[Digit, Exponent, FprecSpecifier],
            Exponent => &[Sign, Digit],
            SignSpecifier => &[IprecSpecifier],
            IprecSpecifier => &[LlprecSpecifier, SignSpecifier],
            LlprecSpecifier => &[SignSpecifier],
            FprecSpecifier => &[],
        }
    }

    fn allows(&self, from: NumState, to: NumState, s: &NumericState) -> bool {
        use NumState::*;
        let decimal = s.base == Base::Decimal;
        match (from, to) {
            (Digit, Digit) => true,
            (Digit, Exponent) => s.valid && decimal && s.part < Part::Exponent,
            (Digit, Fraction) => s.valid && decimal && s.part < Part::Fraction,
            (Digit, FprecSpecifier) => s.valid && decimal,
            (Digit, SignSpecifier | IprecSpecifier) => s.valid && s.ty == NumberType::Unknown,
            (Sign, Digit) => s.part == Part::Exponent,
            (Sign, _) => s.part == Part::Integral,
            (Fraction, Exponent) => s.valid && s.part < Part::Exponent,
            (Fraction, FprecSpecifier) => s.valid,
            (SignSpecifier, IprecSpecifier) => s.ty == NumberType::Unknown,
            (IprecSpecifier, LlprecSpecifier) => s.ty == NumberType::Int,
            (IprecSpecifier | LlprecSpecifier, SignSpecifier) => !s.unsigned,
            _ => true,
        }
    }

    fn entry_chars(&self, to: NumState, s: &NumericState) -> Cow<'static, [char]> {
        use NumState::*;
        match to {
            Begin => Cow::Borrowed(&[]),
            LeadZero => Cow::Borrowed(&['0']),
            LeadDigit => Cow::Borrowed(&['1', '2', '3', '4', '5', '6', '7', '8', '9']),
            BaseSpecifier => Cow::Borrowed(&['B', 'X', 'b', 'x']),
            Digit => Cow::Owned(self.digits[s.base.slot()].to_vec()),
            Sign => Cow::Borrowed(&['+', '-']),
            Fraction => Cow::Owned(vec![self.config.fraction]),
            Exponent => Cow::Borrowed(&['E', 'e']),
            SignSpecifier => Cow::Borrowed(&['U', 'u']),
            IprecSpecifier => Cow::Borrowed(&['I', 'L', 'S', 'i', 'l', 's']),
            LlprecSpecifier => Cow::Borrowed(&['L', 'l']),
            FprecSpecifier => Cow::Borrowed(&['D', 'F', 'd', 'f']),
        }
    }

    fn can_enter(&self, to: NumState, s: &NumericState, _text: &str, c: char, _pos: usize) -> bool {
        use NumState::*;
        match to {
            Begin => false,
            LeadZero => c == '0',
            LeadDigit => matches!(c, '1'..='9'),
            BaseSpecifier => matches!(c, 'b' | 'B' | 'x' | 'X'),
            Digit => c == self.config.separator || is_digit_in_base(c, s.base.radix()),
            Sign => matches!(c, '+' | '-'),
            Fraction => c == self.config.fraction,
            Exponent => matches!(c, 'e' | 'E'),
            SignSpecifier => matches!(c, 'u' | 'U'),
            IprecSpecifier => matches!(c, 'i' | 'I' | 'l' | 'L' | 's' | 'S'),
            LlprecSpecifier => matches!(c, 'l' | 'L'),
            FprecSpecifier => matches!(c, 'f' | 'F' | 'd' | 'D'),
        }
    }

    fn on_enter(&self, to: NumState, s: &mut NumericState, _text: &str, c: char, _pos: usize) {
        match to {
            NumState::Begin => {}
            NumState::LeadZero => {
                s.valid = true;
                s.base = Base::Octal;
            }
            NumState::LeadDigit => {
                s.valid = true;
                s.parts[Part::Integral as usize] = digit_value(c);
            }
            NumState::BaseSpecifier => {
                s.valid = false;
                s.base = if c.eq_ignore_ascii_case(&'b') {
                    Base::Binary
                } else {
                    Base::Hex
                };
            }
            NumState::Digit => {
                if c == self.config.separator {
                    return;
                }
                s.valid = true;
                let slot = &mut s.parts[s.part as usize];
                let radix = i64::from(s.base.radix());
                let digit = digit_value(c);
                if s.part == Part::Fraction {
                    // digits past i64 precision cannot change an f64 anyway
                    if let Some(next) = slot.checked_mul(radix).and_then(|v| v.checked_add(digit)) {
                        *slot = next;
                        s.fraction_digits += 1;
                    }
                } else {
                    *slot = slot.wrapping_mul(radix).wrapping_add(digit);
                }
            }
            NumState::Sign => {
                let sign = if c == '-' { Sign::Negative } else { Sign::Positive };
                if s.part == Part::Exponent {
                    s.exp_sign = sign;
                    if sign == Sign::Negative {
                        s.ty = NumberType::UnknownFloat;
                    }
                } else {
                    s.sign = sign;
                }
            }
            NumState::Fraction => {
                s.ty = NumberType::UnknownFloat;
                s.base = Base::Decimal;
                s.part = Part::Fraction;
            }
            NumState::Exponent => {
                s.valid = false;
                s.part = Part::Exponent;
            }
            NumState::SignSpecifier => s.unsigned = true,
            NumState::IprecSpecifier => {
                s.ty = match c.to_ascii_lowercase() {
                    's' => NumberType::Byte,
                    'i' => NumberType::Short,
                    _ => NumberType::Int,
                };
            }
            NumState::LlprecSpecifier => s.ty = NumberType::Long,
            NumState::FprecSpecifier => {
                s.ty = if c.eq_ignore_ascii_case(&'d') {
                    NumberType::Double
                } else {
                    NumberType::Float
                };
            }
        }
    }

    fn decode(&self, s: &NumericState, _text: &str) -> Option<Value> {
        if s.ty.is_integral() {
            Some(self.decode_integral(s))
        } else {
            Some(self.decode_float(s))
        }
    }

    fn serialize(&self, value: &Value) -> Option<String> {
        let text = match *value {
            Value::I8(v) => format!("{v}s"),
            Value::U8(v) => format!("{v}su"),
            Value::I16(v) => format!("{v}i"),
            Value::U16(v) => format!("{v}iu"),
            Value::I32(v) => format!("{v}l"),
            Value::U32(v) => format!("{v}lu"),
            Value::I64(v) => format!("{v}ll"),
            Value::U64(v) => format!("{v}llu"),
            Value::F32(v) if v.is_finite() => {
                format!("{}f", self.float_body(v == 0.0, v.is_sign_negative(), format!("{v:e}")))
            }
            Value::F64(v) if v.is_finite() => {
                format!("{}d", self.float_body(v == 0.0, v.is_sign_negative(), format!("{v:e}")))
            }
            Value::F32(_) | Value::F64(_) => return None,
        };
        Some(text)
    }
}

impl NumericGrammar {
    fn float_body(&self, zero: bool, negative: bool, scientific: String) -> String {
        let body = if zero {
            // `0e0` would read as an octal integer
            let sign = if negative { "-" } else { "" };
            format!("{sign}0.0")
        } else {
            scientific
        };
        body.replace('.', &self.config.fraction.to_string())
    }
}

fn digit_value(c: char) -> i64 {
    c.to_digit(16).map_or(0, i64::from)
}
