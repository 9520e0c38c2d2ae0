//! lexm-util - Foundation types shared by the lexm crates
//!
//! This crate provides the small set of types every other lexm crate leans
//! on: source spans, the incrementally built line table used for seeking,
//! and the diagnostics layer used to surface unrecognized input.
//!
//! # Module Structure
//!
//! - [`span`] - Source spans and the line-start table
//! - [`diagnostic`] - Diagnostic levels, codes, builder and handler
//!
//! # Example
//!
//! ```
//! use lexm_util::{Handler, LineTable, Span};
//!
//! let mut lines = LineTable::new(1, 0);
//! lines.push(6);
//! assert_eq!(lines.lookup(8), (2, 6));
//!
//! let handler = Handler::new();
//! handler.warning("unrecognized input", Span::new(8, 9, 2, 3));
//! assert_eq!(handler.warning_count(), 1);
//! ```

#![warn(missing_docs)]

pub mod diagnostic;
pub mod span;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticCode, Handler, Level};
pub use span::{LineTable, Span};
