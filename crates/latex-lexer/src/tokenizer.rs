use std::fmt;

use crate::item::{Action, Item, ItemKind};
use crate::token::{Position, Span, Token, TokenKind};
use crate::TokenizeError;

/// Character-classification regime in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Text,
    InlineMath,
    DisplayMath,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Text => f.write_str("text"),
            Mode::InlineMath => f.write_str("inline math"),
            Mode::DisplayMath => f.write_str("display math"),
        }
    }
}

/// One step of a tokenizer run, reported to a trace sink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TraceEvent<'a> {
    /// `item` was popped and offered `ch`. `mode` is the mode before handling.
    Dispatch {
        ch: char,
        at: Position,
        item: ItemKind,
        mode: Mode,
    },
    /// A token was appended to the output.
    Commit(&'a Token),
    /// `item` was left open at end of input and is being flushed.
    Unwind { item: ItemKind },
}

impl fmt::Display for TraceEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::Dispatch { ch, at, item, mode } => {
                write!(f, "dispatch {ch:?} at {at} to {item} ({mode})")
            }
            TraceEvent::Commit(token) => write!(f, "commit {token}"),
            TraceEvent::Unwind { item } => write!(f, "unwind {item}"),
        }
    }
}

/// Stack-driven LaTeX tokenizer.
///
/// Feeds the source one character at a time to the item on top of a work
/// stack. An item that cannot take the character declines it, and the
/// character is retried on the item below, so a single character can close
/// several nested contexts at once. At end of input the remaining stack is
/// flushed top to bottom.
///
/// A tokenizer is consumed by [`LatexTokenizer::tokenize`]; build a fresh one
/// per source.
pub struct LatexTokenizer<'t> {
    stack: Vec<Item>,
    mode: Mode,
    toks: Vec<Token>,
    /// Position of the character being dispatched.
    cursor: Position,
    /// Position just after it.
    next: Position,
    trace: Option<&'t mut dyn FnMut(&TraceEvent<'_>)>,
}

impl<'t> LatexTokenizer<'t> {
    /// Create a tokenizer whose stack holds one empty text run.
    pub fn new() -> Self {
        Self {
            stack: vec![Item::text()],
            mode: Mode::Text,
            toks: Vec::new(),
            cursor: Position::start(),
            next: Position::start(),
            trace: None,
        }
    }

    /// Create a tokenizer that reports every step to `sink`.
    pub fn with_trace(sink: &'t mut dyn FnMut(&TraceEvent<'_>)) -> Self {
        let mut tokenizer = Self::new();
        tokenizer.trace = Some(sink);
        tokenizer
    }

    /// Tokenize the entire source.
    pub fn tokenize(mut self, source: &str) -> Result<Vec<Token>, TokenizeError> {
        for c in source.chars() {
            self.next = self.cursor.advance(c);
            self.tokenize_char(c)?;
            self.cursor = self.next;
        }

        while let Some(item) = self.stack.pop() {
            self.emit_trace(&TraceEvent::Unwind { item: item.kind() });
            item.flush(&mut self)?;
        }

        Ok(self.toks)
    }

    /// Pop items until one consumes `c`.
    fn tokenize_char(&mut self, c: char) -> Result<(), TokenizeError> {
        while let Some(item) = self.stack.pop() {
            self.emit_trace(&TraceEvent::Dispatch {
                ch: c,
                at: self.cursor,
                item: item.kind(),
                mode: self.mode,
            });
            if let Some(mode) = item.mode() {
                self.mode = mode;
            }
            match item.handle(self, c)? {
                Action::Consumed => return Ok(()),
                Action::Decline => continue,
            }
        }

        Err(TokenizeError::UnhandledCharacter {
            ch: c,
            at: self.cursor,
        })
    }

    // --- Item interface ---

    pub(crate) fn push(&mut self, item: Item) {
        self.stack.push(item);
    }

    pub(crate) fn pop(&mut self) -> Option<Item> {
        self.stack.pop()
    }

    pub(crate) fn commit(&mut self, kind: TokenKind, span: Span) {
        self.toks.push(Token::new(kind, span));
        if let (Some(sink), Some(token)) = (self.trace.as_mut(), self.toks.last()) {
            sink(&TraceEvent::Commit(token));
        }
    }

    pub(crate) fn mode(&self) -> Mode {
        self.mode
    }

    pub(crate) fn cursor(&self) -> Position {
        self.cursor
    }

    pub(crate) fn next_offset(&self) -> usize {
        self.next.offset
    }

    /// Span of the current character.
    pub(crate) fn here(&self) -> Span {
        self.span_from(self.cursor)
    }

    /// Span from `start` through the current character.
    pub(crate) fn span_from(&self, start: Position) -> Span {
        Span::between(start, self.next.offset)
    }

    /// Span from `start` up to, not including, the current character.
    pub(crate) fn span_before(&self, start: Position) -> Span {
        Span::between(start, self.cursor.offset)
    }

    fn emit_trace(&mut self, event: &TraceEvent<'_>) {
        if let Some(sink) = self.trace.as_mut() {
            sink(event);
        }
    }
}

impl Default for LatexTokenizer<'_> {
    fn default() -> Self {
        Self::new()
    }
}
