use std::fmt::Display;

use thiserror::Error;

use crate::{
    lexer::tokens::{Token, TokenKind},
    Position,
};

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    /// Lifts an `Error` token into a hard error. Any other kind is not an
    /// error and yields `None`.
    pub fn from_token(token: &Token) -> Option<Self> {
        if token.kind != TokenKind::Error {
            return None;
        }

        Some(Error::new(
            ErrorImpl::Lexical {
                message: token.value.clone(),
            },
            token.position(),
        ))
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::Lexical { .. } => "Lexical",
            ErrorImpl::StreamClosed => "StreamClosed",
            ErrorImpl::LexerPanicked => "LexerPanicked",
            ErrorImpl::Io { .. } => "Io",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::Lexical { message } => ErrorTip::Suggestion(message.clone()),
            ErrorImpl::StreamClosed => ErrorTip::Suggestion(String::from(
                "The token stream was dropped before the lexer reached the end of input",
            )),
            ErrorImpl::LexerPanicked => ErrorTip::None,
            ErrorImpl::Io { message, .. } => ErrorTip::Suggestion(message.clone()),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.position.file, self.position.line, self.position.col, self.internal_error
        )
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.internal_error)
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorImpl {
    #[error("lexical error: {message}")]
    Lexical { message: String },
    #[error("token stream closed before the lexer finished")]
    StreamClosed,
    #[error("lexer thread panicked")]
    LexerPanicked,
    #[error("failed to read {path:?}: {message}")]
    Io { path: String, message: String },
}
