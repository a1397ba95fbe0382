//! Lexical analysis of configuration files.
//!
//! The lexer is a state machine whose states are plain functions. Each
//! state consumes characters through the position primitives of `Lexer`,
//! emits the tokens it recognised and returns the next state.
//!
//! - `lexer`: the engine (position tracking, emission, driver, push and
//!   pull consumption)
//! - `grammar`: the INI states plugged into the engine by default
//! - `tokens`: the token record and its kinds

pub mod grammar;
pub mod lexer;
pub mod tokens;
