use std::{borrow::Cow, collections::VecDeque, sync::Arc, thread};

use crossbeam::channel::{self, Receiver, Sender};
use log::{debug, trace, warn};

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, MK_TOKEN,
};

use super::{
    grammar,
    tokens::{Token, TokenKind},
};

pub const DEFAULT_CAPACITY: usize = 64;

/// A lexer state. It consumes input through the lexer primitives, emits
/// whatever it recognised and hands back the state to run next. `None`
/// halts the machine.
#[derive(Clone, Copy)]
pub struct StateFn(pub fn(&mut Lexer) -> Option<StateFn>);

/// Receiving end of push mode. Closes once the lexer is finished.
pub type TokenStream = Receiver<Token>;

/// Decodes `input` lossily, replacing malformed sequences with U+FFFD.
pub fn decode<'a>(name: &str, input: &'a [u8]) -> Cow<'a, str> {
    let text = String::from_utf8_lossy(input);

    if matches!(text, Cow::Owned(_)) {
        warn!("{}: input is not valid UTF-8, malformed bytes replaced", name);
    }

    text
}

pub struct Lexer {
    name: Arc<str>,
    input: Arc<str>,

    start: usize,
    line: u32,
    col: u32,

    pos: usize,
    runes: u32,

    next_state: Option<StateFn>,
    queue: VecDeque<Token>,
    tokens: Option<Sender<Token>>,
}

impl Lexer {
    /// Creates a lexer for an INI document, starting in `grammar::preamble`.
    pub fn new(name: &str, input: &str, capacity: usize) -> (Lexer, TokenStream) {
        Lexer::with_state(name, input, capacity, StateFn(grammar::preamble))
    }

    /// Creates a lexer driven by an arbitrary entry state.
    pub fn with_state(
        name: &str,
        input: &str,
        capacity: usize,
        initial: StateFn,
    ) -> (Lexer, TokenStream) {
        let (sender, receiver) = channel::bounded(capacity);

        let lexer = Lexer {
            name: Arc::from(name),
            input: Arc::from(input),

            start: 0,
            line: 1,
            col: 1,

            pos: 0,
            runes: 0,

            next_state: Some(initial),
            queue: VecDeque::new(),
            tokens: Some(sender),
        };

        (lexer, receiver)
    }

    /// Creates a lexer over raw bytes. Malformed sequences decode to
    /// U+FFFD and reach the grammar like any other character.
    pub fn from_bytes(name: &str, input: &[u8], capacity: usize) -> (Lexer, TokenStream) {
        Lexer::new(name, &decode(name, input), capacity)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn col(&self) -> u32 {
        self.col
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// Text consumed since the last emission.
    pub fn pending(&self) -> &str {
        &self.input[self.start..self.pos]
    }

    /// Whether the machine has halted.
    pub fn is_done(&self) -> bool {
        self.next_state.is_none()
    }

    pub fn current_position(&self) -> Position {
        Position {
            file: Arc::clone(&self.name),
            line: self.line,
            col: self.col,
        }
    }

    // Driver

    /// Runs the current state once. Returns `false` when there was no
    /// state left to run.
    pub fn step(&mut self) -> bool {
        match self.next_state.take() {
            Some(StateFn(state)) => {
                self.next_state = state(self);
                true
            }
            None => false,
        }
    }

    /// Push mode: runs the machine to completion, feeding the stream
    /// returned at construction. The stream closes when this returns.
    pub fn run(mut self) -> Result<(), Error> {
        debug!("{}: lexing {} bytes", self.name, self.input.len());

        while self.step() {
            self.flush()?;
        }
        // tokens staged by steps taken before `run`
        self.flush()?;

        debug!("{}: finished at line {}", self.name, self.line);
        Ok(())
    }

    /// Push mode on a dedicated thread.
    pub fn spawn(self) -> thread::JoinHandle<Result<(), Error>> {
        thread::spawn(move || self.run())
    }

    /// Pull mode: steps the machine on the caller's thread until a token
    /// is available. Returns `None` once the machine halted and every
    /// token was handed out.
    pub fn next_token(&mut self) -> Option<Token> {
        loop {
            if let Some(token) = self.queue.pop_front() {
                return Some(token);
            }

            if !self.step() {
                // closes the stream for anyone still holding it
                self.tokens = None;
                return None;
            }
        }
    }

    fn flush(&mut self) -> Result<(), Error> {
        let Some(sender) = &self.tokens else {
            return Ok(());
        };

        while let Some(token) = self.queue.pop_front() {
            if sender.send(token).is_err() {
                debug!("{}: token stream dropped by consumer", self.name);
                return Err(Error::new(ErrorImpl::StreamClosed, self.current_position()));
            }
        }

        Ok(())
    }

    // Position tracking

    /// Decodes the next character, returning it with its width in bytes.
    /// `None` at the end of input, in which case nothing moves.
    pub fn advance(&mut self) -> Option<(char, usize)> {
        let c = self.input.get(self.pos..)?.chars().next()?;
        let width = c.len_utf8();

        self.pos += width;
        self.runes += 1;
        Some((c, width))
    }

    /// Steps back over characters returned by `advance`. The counts must
    /// describe exactly what was consumed.
    pub fn retreat(&mut self, runes: u32, bytes: usize) {
        debug_assert!(bytes <= self.pos - self.start && runes <= self.runes);

        self.runes -= runes;
        self.pos -= bytes;
    }

    /// Moves forward again over a span previously given up with `retreat`.
    pub fn skip_forward(&mut self, runes: u32, bytes: usize) {
        debug_assert!(self.pos + bytes <= self.input.len());

        self.runes += runes;
        self.pos += bytes;
    }

    /// Drops the pending span without emitting it.
    pub fn discard(&mut self) {
        self.start = self.pos;
        self.col += self.runes;
        self.runes = 0;
    }

    /// Looks at the next character without consuming it.
    pub fn peek(&mut self) -> Option<char> {
        let (c, width) = self.advance()?;
        self.retreat(1, width);
        Some(c)
    }

    // Emission

    fn push(&mut self, kind: TokenKind, value: String) {
        let token = MK_TOKEN!(kind, value, Arc::clone(&self.name), self.line, self.col);
        trace!("{}", token);
        self.queue.push_back(token);
    }

    pub fn emit(&mut self, kind: TokenKind) {
        let value = self.input[self.start..self.pos].to_string();
        self.push(kind, value);

        self.start = self.pos;
        self.col += self.runes;
        self.runes = 0;
    }

    /// Emits the pending span minus its last `runes`/`bytes`, which stay
    /// pending for whatever comes next.
    pub fn emit_trimmed(&mut self, kind: TokenKind, runes: u32, bytes: usize) {
        let end = self.pos - bytes;
        let value = self.input[self.start..end].to_string();
        self.push(kind, value);

        self.start = end;
        self.col += self.runes - runes;
        self.runes = runes;
    }

    pub fn emit_if_nonempty(&mut self, kind: TokenKind) {
        if !self.is_empty() {
            self.emit(kind);
        }
    }

    pub fn emit_trimmed_if_nonempty(&mut self, kind: TokenKind, runes: u32, bytes: usize) {
        if !self.is_empty_trimmed(bytes) {
            self.emit_trimmed(kind, runes, bytes);
        }
    }

    pub fn emit_eol(&mut self) {
        self.emit(TokenKind::EOL);
        self.line += 1;
        self.col = 1;
    }

    pub fn emit_eof(&mut self) {
        self.emit(TokenKind::EOF);
    }

    /// Emits the pending span as an `Error` token described by `message`.
    pub fn emit_error(&mut self, message: &str) {
        let text = &self.input[self.start..self.pos];
        let value = format!("{}: {:?} ({})", message, text, text.len());
        self.push(TokenKind::Error, value);

        self.start = self.pos;
        self.col += self.runes;
        self.runes = 0;
    }

    fn is_empty(&self) -> bool {
        self.start == self.pos
    }

    fn is_empty_trimmed(&self, bytes: usize) -> bool {
        self.start + bytes == self.pos
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}
