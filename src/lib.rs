#![allow(clippy::module_inception)]

use std::sync::Arc;

use crate::{
    errors::errors::{Error, ErrorTip},
    lexer::{
        lexer::{Lexer, DEFAULT_CAPACITY},
        tokens::Token,
    },
};

pub mod errors;
pub mod lexer;
pub mod macros;

extern crate regex;

/// Name used for documents that do not come from a file.
pub const ANONYMOUS: &str = "<input>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub file: Arc<str>,
    pub line: u32,
    pub col: u32,
}

impl Position {
    pub fn null() -> Self {
        Position {
            file: Arc::from("<null>"),
            line: 0,
            col: 0,
        }
    }
}

/// Lexes a whole document in pull mode, failing on the first `Error` token.
pub fn tokenize(source: &str, file: Option<&str>) -> Result<Vec<Token>, Error> {
    let (mut lex, _) = Lexer::new(file.unwrap_or(ANONYMOUS), source, DEFAULT_CAPACITY);
    let mut tokens = vec![];

    while let Some(token) = lex.next_token() {
        if let Some(error) = Error::from_token(&token) {
            return Err(error);
        }
        tokens.push(token);
    }

    Ok(tokens)
}

/// Lexes a whole document in pull mode, keeping errors as tokens.
pub fn collect_tokens(source: &str, file: Option<&str>) -> Vec<Token> {
    let (lex, _) = Lexer::new(file.unwrap_or(ANONYMOUS), source, DEFAULT_CAPACITY);
    lex.collect()
}

/// Returns the text of the 1-based `line`, without its line ending.
pub fn get_line(source: &str, line: u32) -> Option<&str> {
    let index = (line as usize).checked_sub(1)?;
    let text = source.split('\n').nth(index)?;

    Some(text.strip_suffix('\r').unwrap_or(text))
}

pub fn render_error(error: &Error, source: &str) -> String {
    /*
        Error: Lexical (invalid key: "1st" (3))
        -> settings.ini
           |
        20 | 1st = value
           | ^
    */

    let position = error.get_position();
    let mut out = String::new();

    if let ErrorTip::None = error.get_tip() {
        out.push_str(&format!("Error: {}\n", error.get_error_name()));
    } else {
        out.push_str(&format!(
            "Error: {} ({})\n",
            error.get_error_name(),
            error.get_tip()
        ));
    }
    out.push_str(&format!("-> {}\n", position.file));

    if let Some(line_text) = get_line(source, position.line) {
        let line_string = position.line.to_string();
        let padding = line_string.len() + 2;
        let arrows = position.col.max(1) as usize;

        out.push_str(&format!("{:>padding$}\n", "|"));
        out.push_str(&format!("{} | {}\n", line_string, line_text.trim_end()));
        out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));
    }

    out
}

pub fn display_error(error: &Error, source: &str) {
    eprint!("{}", render_error(error, source));
}
