//! Utility macros for the lexer.
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_STATE!` - Wraps a transition function into a `StateFn`

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The token's text
/// * `$file` - The shared source name
/// * `$line`, `$col` - Where the token starts
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Key, "name".to_string(), file, 1, 1);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $file:expr, $line:expr, $col:expr) => {
        Token {
            kind: $kind,
            value: $value,
            file: $file,
            line: $line,
            col: $col,
        }
    };
}

/// Wraps a transition function into `Some(StateFn(..))`, the shape every
/// state returns to keep the machine running.
///
/// # Example
///
/// ```ignore
/// fn comment(lexer: &mut Lexer) -> Option<StateFn> {
///     // ...
///     MK_STATE!(preamble)
/// }
/// ```
#[macro_export]
macro_rules! MK_STATE {
    ($state:expr) => {
        Some($crate::lexer::lexer::StateFn($state))
    };
}
