//! Parsing of photo capture times and camera clock corrections.
pub mod error;
mod parsing;

pub use parsing::{DEFAULT_CORRECTION, parse_correction, parse_naive};
