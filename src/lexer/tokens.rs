use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display, str::FromStr, sync::Arc};

use crate::Position;

lazy_static! {
    pub static ref KIND_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("UNDEFINED", TokenKind::Undefined);
        map.insert("SEC", TokenKind::Section);
        map.insert("SUB", TokenKind::Subsection);
        map.insert("COM", TokenKind::Comment);
        map.insert("KEY", TokenKind::Key);
        map.insert("VAL", TokenKind::Value);
        map.insert("RAW", TokenKind::Raw);
        map.insert("EOL", TokenKind::EOL);
        map.insert("ERROR", TokenKind::Error);
        map.insert("EOF", TokenKind::EOF);
        map
    };
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    #[default]
    Undefined,
    Section,
    Subsection,
    Comment,
    Key,
    Value,
    Raw,
    EOL,
    Error,
    EOF,
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Undefined => "UNDEFINED",
            TokenKind::Section => "SEC",
            TokenKind::Subsection => "SUB",
            TokenKind::Comment => "COM",
            TokenKind::Key => "KEY",
            TokenKind::Value => "VAL",
            TokenKind::Raw => "RAW",
            TokenKind::EOL => "EOL",
            TokenKind::Error => "ERROR",
            TokenKind::EOF => "EOF",
        }
    }

    /// Kinds whose text is a verbatim slice of the input.
    pub fn carries_source(&self) -> bool {
        !matches!(
            self,
            TokenKind::Undefined | TokenKind::EOL | TokenKind::Error | TokenKind::EOF
        )
    }
}

impl From<u32> for TokenKind {
    fn from(value: u32) -> Self {
        match value {
            1 => TokenKind::Section,
            2 => TokenKind::Subsection,
            3 => TokenKind::Comment,
            4 => TokenKind::Key,
            5 => TokenKind::Value,
            6 => TokenKind::Raw,
            7 => TokenKind::EOL,
            8 => TokenKind::Error,
            9 => TokenKind::EOF,
            _ => TokenKind::Undefined,
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl Display for UnknownKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown token kind `{}`", self.0)
    }
}

impl FromStr for TokenKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KIND_LOOKUP
            .get(s)
            .copied()
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub file: Arc<str>,
    pub line: u32,
    pub col: u32,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {:?} @{}:{}:{}",
            self.kind, self.value, self.file, self.line, self.col
        )
    }
}

impl Token {
    pub fn position(&self) -> Position {
        Position {
            file: Arc::clone(&self.file),
            line: self.line,
            col: self.col,
        }
    }

    pub fn is_one_of_many(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }
}
