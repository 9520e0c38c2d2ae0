//! Command modules for the lexm CLI.
//!
//! Each subcommand lives in its own file and implements [`traits::Command`].

pub mod common;
pub mod traits;

pub mod extract;
pub mod generate;
pub mod scan;

// Re-export command types
pub use extract::{ExtractArgs, ExtractCommand};
pub use generate::{GenerateArgs, GenerateCommand};
pub use scan::{ScanArgs, ScanCommand};
