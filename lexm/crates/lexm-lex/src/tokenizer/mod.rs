//! Streaming tokenizer.
//!
//! This module organizes the tokenizer into smaller components:
//! - `core` - The [`Tokenizer`] driver and its candidate bookkeeping
//! - `mode` - Result selection and interleaving
//! - `policy` - Per-character handling flags

mod core;
mod mode;
mod policy;

pub use self::core::Tokenizer;
pub use mode::{Mode, Select};
pub use policy::{CharPolicy, PolicyFlag, PolicyTable};
