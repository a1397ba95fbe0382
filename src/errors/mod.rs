//! Error types for the lexer crate.
//!
//! Lexical problems are reported in-band as `TokenKind::Error` tokens and
//! never through this module. The types here cover the conditions that do
//! stop a run:
//!
//! - A consumer dropping the token stream while push mode is still running
//! - A spawned lexer thread panicking
//! - Strict helpers turning the first `Error` token into a hard error
//! - The binary failing to read its input

pub mod errors;
