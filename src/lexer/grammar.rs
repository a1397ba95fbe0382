//! Transition functions recognising INI documents.
//!
//! Every state starts with an empty pending span and leaves one behind,
//! either by emitting or by discarding what it consumed.

use lazy_static::lazy_static;
use regex::Regex;

use crate::MK_STATE;

use super::{
    lexer::{Lexer, StateFn},
    tokens::TokenKind,
};

lazy_static! {
    static ref SECTION_NAME: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").unwrap();
    static ref KEY_NAME: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9_.-]*$").unwrap();
}

/// Run of blanks at the end of what has been scanned so far.
#[derive(Default, Clone, Copy)]
struct Blanks {
    runes: u32,
    bytes: usize,
}

impl Blanks {
    fn track(&mut self, c: char, width: usize) {
        if is_blank(c) {
            self.runes += 1;
            self.bytes += width;
        } else {
            *self = Blanks::default();
        }
    }
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r')
}

fn is_comment(c: char) -> bool {
    matches!(c, ';' | '#')
}

fn skip_blanks(lexer: &mut Lexer) {
    while let Some((c, width)) = lexer.advance() {
        if !is_blank(c) {
            lexer.retreat(1, width);
            break;
        }
    }
    lexer.discard();
}

/// Consumes the rest of the line, stopping in front of the `\n`.
fn scan_line(lexer: &mut Lexer) -> Blanks {
    let mut trailing = Blanks::default();

    while let Some((c, width)) = lexer.advance() {
        if c == '\n' {
            lexer.retreat(1, width);
            break;
        }
        trailing.track(c, width);
    }

    trailing
}

/// Emits the pending span, minus `trailing`, as `kind` when it matches
/// `pattern` and as an error otherwise. The trailing span is dropped.
fn emit_name(lexer: &mut Lexer, kind: TokenKind, pattern: &Regex, message: &str, trailing: Blanks) {
    let valid = {
        let pending = lexer.pending();
        pattern.is_match(&pending[..pending.len() - trailing.bytes])
    };

    if valid {
        lexer.emit_trimmed(kind, trailing.runes, trailing.bytes);
    } else {
        lexer.retreat(trailing.runes, trailing.bytes);
        lexer.emit_error(message);
        lexer.skip_forward(trailing.runes, trailing.bytes);
    }
    lexer.discard();
}

/// Consumes what follows a backslash. Returns `true` when only blanks
/// separate it from the end of the line, leaving the cursor on the `\n`.
/// Otherwise the character right after the backslash is escaped.
fn escape(lexer: &mut Lexer, trailing: &mut Blanks) -> bool {
    loop {
        match lexer.advance() {
            Some(('\n', width)) => {
                lexer.retreat(1, width);
                return true;
            }
            Some((c, width)) if is_blank(c) => trailing.track(c, width),
            Some((_, width)) => {
                // the blanks were the escaped characters
                if trailing.runes > 0 {
                    lexer.retreat(1, width);
                }
                return false;
            }
            None => return false,
        }
    }
}

fn fail(lexer: &mut Lexer, message: &str) -> Option<StateFn> {
    lexer.emit_error(message);
    MK_STATE!(preamble)
}

/// Start of a line. This is the entry state of every INI document.
pub fn preamble(lexer: &mut Lexer) -> Option<StateFn> {
    skip_blanks(lexer);

    match lexer.peek() {
        None => {
            lexer.emit_eof();
            None
        }
        Some('\n') => {
            lexer.advance();
            lexer.emit_eol();
            MK_STATE!(preamble)
        }
        Some('[') => MK_STATE!(section),
        Some(c) if is_comment(c) => MK_STATE!(comment),
        Some(_) => MK_STATE!(key),
    }
}

fn comment(lexer: &mut Lexer) -> Option<StateFn> {
    let trailing = scan_line(lexer);

    lexer.emit_trimmed(TokenKind::Comment, trailing.runes, trailing.bytes);
    lexer.discard();
    MK_STATE!(preamble)
}

fn section(lexer: &mut Lexer) -> Option<StateFn> {
    // opening bracket
    lexer.advance();
    lexer.discard();
    skip_blanks(lexer);

    loop {
        match lexer.advance() {
            None => return fail(lexer, "unterminated section header"),
            Some(('\n', width)) => {
                lexer.retreat(1, width);
                return fail(lexer, "unterminated section header");
            }
            Some((c, width)) if c == ']' || c == '"' || is_blank(c) => {
                lexer.retreat(1, width);
                emit_name(
                    lexer,
                    TokenKind::Section,
                    &SECTION_NAME,
                    "invalid section name",
                    Blanks::default(),
                );
                return MK_STATE!(section_end);
            }
            Some(_) => {}
        }
    }
}

fn section_end(lexer: &mut Lexer) -> Option<StateFn> {
    skip_blanks(lexer);

    if lexer.peek() == Some('"') {
        lexer.advance();
        lexer.discard();
        return MK_STATE!(subsection);
    }

    close_header(lexer)
}

fn subsection(lexer: &mut Lexer) -> Option<StateFn> {
    loop {
        match lexer.advance() {
            Some(('"', width)) => {
                lexer.emit_trimmed(TokenKind::Subsection, 1, width);
                lexer.discard();
                skip_blanks(lexer);
                return close_header(lexer);
            }
            Some(('\\', _)) => match lexer.advance() {
                None => return fail(lexer, "unterminated subsection"),
                Some(('\n', width)) => {
                    lexer.retreat(1, width);
                    return fail(lexer, "unterminated subsection");
                }
                Some(_) => {}
            },
            Some(('\n', width)) => {
                lexer.retreat(1, width);
                return fail(lexer, "unterminated subsection");
            }
            None => return fail(lexer, "unterminated subsection"),
            Some(_) => {}
        }
    }
}

fn close_header(lexer: &mut Lexer) -> Option<StateFn> {
    match lexer.advance() {
        Some((']', _)) => {
            lexer.discard();
            MK_STATE!(header_tail)
        }
        Some(('\n', width)) => {
            lexer.retreat(1, width);
            fail(lexer, "unterminated section header")
        }
        None => fail(lexer, "unterminated section header"),
        Some(_) => {
            scan_line(lexer);
            fail(lexer, "unexpected text in section header")
        }
    }
}

fn header_tail(lexer: &mut Lexer) -> Option<StateFn> {
    skip_blanks(lexer);

    match lexer.peek() {
        None | Some('\n') => MK_STATE!(preamble),
        Some(c) if is_comment(c) => MK_STATE!(comment),
        Some(_) => {
            scan_line(lexer);
            fail(lexer, "unexpected text after section header")
        }
    }
}

fn key(lexer: &mut Lexer) -> Option<StateFn> {
    let mut trailing = Blanks::default();

    loop {
        match lexer.advance() {
            Some(('=', width)) => {
                // the separator goes with the trailing blanks
                let trimmed = Blanks {
                    runes: trailing.runes + 1,
                    bytes: trailing.bytes + width,
                };
                emit_name(lexer, TokenKind::Key, &KEY_NAME, "invalid key", trimmed);
                return MK_STATE!(value);
            }
            Some(('\n', width)) => {
                lexer.retreat(1, width);
                emit_name(lexer, TokenKind::Key, &KEY_NAME, "invalid key", trailing);
                return MK_STATE!(preamble);
            }
            None => {
                emit_name(lexer, TokenKind::Key, &KEY_NAME, "invalid key", trailing);
                return MK_STATE!(preamble);
            }
            Some((c, width)) => trailing.track(c, width),
        }
    }
}

fn value(lexer: &mut Lexer) -> Option<StateFn> {
    skip_blanks(lexer);

    let mut trailing = Blanks::default();
    let mut quoted = false;
    let mut continued = false;

    loop {
        match lexer.advance() {
            None => break,
            Some(('\n', width)) => {
                lexer.retreat(1, width);
                break;
            }
            Some(('\\', width)) => {
                trailing.track('\\', width);
                if escape(lexer, &mut trailing) {
                    continued = true;
                    break;
                }
            }
            Some((c, width)) if is_comment(c) && !quoted => {
                lexer.retreat(1, width);
                lexer.emit_trimmed_if_nonempty(TokenKind::Value, trailing.runes, trailing.bytes);
                lexer.discard();
                return MK_STATE!(comment);
            }
            Some((c, width)) => {
                if c == '"' {
                    quoted = !quoted;
                }
                trailing.track(c, width);
            }
        }
    }

    if quoted {
        return fail(lexer, "unterminated quote");
    }

    lexer.emit_trimmed_if_nonempty(TokenKind::Value, trailing.runes, trailing.bytes);
    lexer.discard();

    if continued {
        lexer.advance();
        lexer.emit_eol();
        return MK_STATE!(continuation);
    }
    MK_STATE!(preamble)
}

/// A line following a value that ended in a backslash, kept verbatim.
fn continuation(lexer: &mut Lexer) -> Option<StateFn> {
    skip_blanks(lexer);

    let mut trailing = Blanks::default();
    let mut continued = false;

    loop {
        match lexer.advance() {
            None => break,
            Some(('\n', width)) => {
                lexer.retreat(1, width);
                break;
            }
            Some(('\\', width)) => {
                trailing.track('\\', width);
                if escape(lexer, &mut trailing) {
                    continued = true;
                    break;
                }
            }
            Some((c, width)) => trailing.track(c, width),
        }
    }

    lexer.emit_trimmed_if_nonempty(TokenKind::Raw, trailing.runes, trailing.bytes);
    lexer.discard();

    if continued {
        lexer.advance();
        lexer.emit_eol();
        return MK_STATE!(continuation);
    }
    MK_STATE!(preamble)
}
