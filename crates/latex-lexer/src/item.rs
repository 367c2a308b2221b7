//! Lexical items: the in-progress recognition contexts that live on the
//! tokenizer's work stack.
//!
//! Each item is asked to handle one character at a time. It either consumes
//! the character (pushing whatever items represent the next state) or declines
//! it, in which case it has already committed its own tokens and the character
//! is retried against the item below.

use std::fmt;

use crate::token::{Position, Span, TokenKind};
use crate::tokenizer::{LatexTokenizer, Mode};
use crate::{MathKind, TokenizeError};

/// Outcome of offering a character to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    /// The character was consumed.
    Consumed,
    /// The item was already complete; retry the character one level down.
    Decline,
}

/// Public tag for an item, used in trace output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Text,
    Command,
    Number,
    LeftQuote,
    RightQuote,
    Space,
    InlineMath,
    DisplayMath,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ItemKind::Text => "Text",
            ItemKind::Command => "Command",
            ItemKind::Number => "Number",
            ItemKind::LeftQuote => "LeftQuote",
            ItemKind::RightQuote => "RightQuote",
            ItemKind::Space => "Space",
            ItemKind::InlineMath => "InlineMath",
            ItemKind::DisplayMath => "DisplayMath",
        };
        f.write_str(name)
    }
}

/// Accumulated characters plus the source range they came from.
#[derive(Debug, Default)]
pub(crate) struct Run {
    text: String,
    start: Position,
    end: usize,
}

impl Run {
    fn starting_with(c: char, at: Position) -> Self {
        let mut run = Run::default();
        run.push(c, at);
        run
    }

    fn push(&mut self, c: char, at: Position) {
        if self.text.is_empty() {
            self.start = at;
        }
        self.text.push(c);
        self.end = at.offset + c.len_utf8();
    }

    fn span(&self) -> Span {
        Span::between(self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QuoteSide {
    Left,
    Right,
}

impl QuoteSide {
    fn mark(self) -> char {
        match self {
            QuoteSide::Left => '`',
            QuoteSide::Right => '\'',
        }
    }
}

/// How an inline math region was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Opener {
    Dollar,
    Bracket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    /// Opener seen, nothing after it yet.
    Begin,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DisplayPhase {
    Begin,
    Body,
    /// One closing `$` seen at the given position; the next must be `$` too.
    Closing(Position),
}

/// A stack-resident recognition context.
#[derive(Debug)]
pub(crate) enum Item {
    Text(Run),
    /// `name` excludes the backslash at `start`; `end` is the offset past the
    /// last consumed character.
    Command {
        name: String,
        start: Position,
        end: usize,
    },
    Number(Run),
    Quote {
        side: QuoteSide,
        start: Position,
    },
    Space {
        start: Position,
    },
    InlineMath {
        opener: Opener,
        phase: Phase,
        start: Position,
    },
    DisplayMath {
        phase: DisplayPhase,
        start: Position,
    },
}

impl Item {
    pub(crate) fn text() -> Self {
        Item::Text(Run::default())
    }

    fn command(at: Position) -> Self {
        Item::Command {
            name: String::new(),
            start: at,
            end: at.offset + 1,
        }
    }

    pub(crate) fn kind(&self) -> ItemKind {
        match self {
            Item::Text(_) => ItemKind::Text,
            Item::Command { .. } => ItemKind::Command,
            Item::Number(_) => ItemKind::Number,
            Item::Quote {
                side: QuoteSide::Left,
                ..
            } => ItemKind::LeftQuote,
            Item::Quote {
                side: QuoteSide::Right,
                ..
            } => ItemKind::RightQuote,
            Item::Space { .. } => ItemKind::Space,
            Item::InlineMath { .. } => ItemKind::InlineMath,
            Item::DisplayMath { .. } => ItemKind::DisplayMath,
        }
    }

    /// The mode this item imposes while it handles a character, if any.
    pub(crate) fn mode(&self) -> Option<Mode> {
        match self {
            Item::Text(_) => Some(Mode::Text),
            Item::InlineMath { .. } => Some(Mode::InlineMath),
            Item::DisplayMath { .. } => Some(Mode::DisplayMath),
            _ => None,
        }
    }

    /// Offer `c` to this item.
    pub(crate) fn handle(
        self,
        tz: &mut LatexTokenizer<'_>,
        c: char,
    ) -> Result<Action, TokenizeError> {
        match self {
            Item::Text(run) => Ok(handle_text(tz, run, c)),
            Item::Command { name, start, end } => handle_command(tz, name, start, end, c),
            Item::Number(run) => Ok(handle_number(tz, run, c)),
            Item::Quote { side, start } => Ok(handle_quote(tz, side, start, c)),
            Item::Space { start } => Ok(handle_space(tz, start, c)),
            Item::InlineMath {
                opener,
                phase,
                start,
            } => handle_inline_math(tz, opener, phase, start, c),
            Item::DisplayMath { phase, start } => handle_display_math(tz, phase, start, c),
        }
    }

    /// Commit whatever this item still holds at end of input.
    pub(crate) fn flush(self, tz: &mut LatexTokenizer<'_>) -> Result<(), TokenizeError> {
        match self {
            Item::Text(run) => commit_text(tz, run),
            Item::Command { name, start, end } => {
                tz.commit(command_token(name), Span::between(start, end));
            }
            Item::Number(run) => {
                let span = run.span();
                tz.commit(TokenKind::Number(run.text), span);
            }
            Item::Quote { side, start } => {
                tz.commit(single_quote(side), Span::between(start, start.offset + 1));
            }
            Item::Space { start } => {
                if tz.mode() == Mode::Text {
                    tz.commit(TokenKind::Space, tz.span_before(start));
                }
            }
            Item::InlineMath { start, .. } => {
                return Err(TokenizeError::UnterminatedMathRegion {
                    kind: MathKind::Inline,
                    at: start,
                });
            }
            Item::DisplayMath { start, .. } => {
                return Err(TokenizeError::UnterminatedMathRegion {
                    kind: MathKind::Display,
                    at: start,
                });
            }
        }
        Ok(())
    }
}

fn commit_text(tz: &mut LatexTokenizer<'_>, run: Run) {
    if !run.text.is_empty() {
        let span = run.span();
        tz.commit(TokenKind::Text(run.text), span);
    }
}

/// A command with no name is a bare backslash.
fn command_token(name: String) -> TokenKind {
    if name.is_empty() {
        TokenKind::Command("\\".to_string())
    } else {
        TokenKind::Command(name)
    }
}

fn single_quote(side: QuoteSide) -> TokenKind {
    match side {
        QuoteSide::Left => TokenKind::LQuote,
        QuoteSide::Right => TokenKind::RQuote,
    }
}

// --- Text mode ---

fn handle_text(tz: &mut LatexTokenizer<'_>, mut run: Run, c: char) -> Action {
    let at = tz.cursor();

    if c == '$' {
        commit_text(tz, run);
        tz.push(Item::text());
        tz.push(Item::InlineMath {
            opener: Opener::Dollar,
            phase: Phase::Begin,
            start: at,
        });
    } else if let Some(kind) = TokenKind::from_text_char(c) {
        commit_text(tz, run);
        tz.commit(kind, tz.here());
        tz.push(Item::text());
    } else if c == '`' || c == '\'' {
        let side = if c == '`' {
            QuoteSide::Left
        } else {
            QuoteSide::Right
        };
        commit_text(tz, run);
        tz.push(Item::text());
        tz.push(Item::Quote { side, start: at });
    } else if c == '\\' {
        commit_text(tz, run);
        tz.push(Item::text());
        tz.push(Item::command(at));
    } else if c.is_whitespace() {
        commit_text(tz, run);
        tz.push(Item::text());
        tz.push(Item::Space { start: at });
    } else if c.is_numeric() && run.text.is_empty() {
        // Digits only start a number at a word boundary; `x2` stays one run.
        tz.push(Item::text());
        tz.push(Item::Number(Run::starting_with(c, at)));
    } else {
        run.push(c, at);
        tz.push(Item::Text(run));
    }

    Action::Consumed
}

fn handle_quote(
    tz: &mut LatexTokenizer<'_>,
    side: QuoteSide,
    start: Position,
    c: char,
) -> Action {
    if c == side.mark() {
        let double = match side {
            QuoteSide::Left => TokenKind::LDQuote,
            QuoteSide::Right => TokenKind::RDQuote,
        };
        tz.commit(double, tz.span_from(start));
        Action::Consumed
    } else {
        tz.commit(single_quote(side), Span::between(start, start.offset + 1));
        Action::Decline
    }
}

fn handle_number(tz: &mut LatexTokenizer<'_>, mut run: Run, c: char) -> Action {
    if c.is_numeric() {
        run.push(c, tz.cursor());
        tz.push(Item::Number(run));
        Action::Consumed
    } else {
        let span = run.span();
        tz.commit(TokenKind::Number(run.text), span);
        Action::Decline
    }
}

fn handle_space(tz: &mut LatexTokenizer<'_>, start: Position, c: char) -> Action {
    if c.is_whitespace() {
        tz.push(Item::Space { start });
        return Action::Consumed;
    }
    // Whitespace only survives as a token in text mode.
    if tz.mode() == Mode::Text {
        tz.commit(TokenKind::Space, tz.span_before(start));
    }
    Action::Decline
}

// --- Commands ---

fn handle_command(
    tz: &mut LatexTokenizer<'_>,
    mut name: String,
    start: Position,
    end: usize,
    c: char,
) -> Result<Action, TokenizeError> {
    if name.is_empty() {
        match c {
            '[' => return open_bracket_math(tz, start),
            ']' => return close_bracket_math(tz, start),
            _ => {}
        }
        if let Some(kind) = TokenKind::from_escape(c) {
            tz.commit(kind, tz.span_from(start));
            return Ok(Action::Consumed);
        }
    }

    if c.is_alphabetic() {
        name.push(c);
        let end = tz.next_offset();
        tz.push(Item::Command { name, start, end });
        Ok(Action::Consumed)
    } else {
        tz.commit(command_token(name), Span::between(start, end));
        Ok(Action::Decline)
    }
}

/// `\[` opens inline math. The text run beneath is closed first.
fn open_bracket_math(
    tz: &mut LatexTokenizer<'_>,
    start: Position,
) -> Result<Action, TokenizeError> {
    match tz.pop() {
        Some(Item::Text(run)) => commit_text(tz, run),
        _ => {
            return Err(TokenizeError::MismatchedMathDelimiter {
                found: "\\[",
                at: start,
            })
        }
    }
    tz.commit(TokenKind::StartInlineMath, tz.span_from(start));
    tz.push(Item::text());
    tz.push(Item::InlineMath {
        opener: Opener::Bracket,
        phase: Phase::Body,
        start,
    });
    Ok(Action::Consumed)
}

/// `\]` closes the bracket-opened inline math directly beneath.
fn close_bracket_math(
    tz: &mut LatexTokenizer<'_>,
    start: Position,
) -> Result<Action, TokenizeError> {
    match tz.pop() {
        Some(Item::InlineMath {
            opener: Opener::Bracket,
            ..
        }) => {
            tz.commit(TokenKind::EndInlineMath, tz.span_from(start));
            Ok(Action::Consumed)
        }
        _ => Err(TokenizeError::MismatchedMathDelimiter {
            found: "\\]",
            at: start,
        }),
    }
}

// --- Math mode ---

fn handle_inline_math(
    tz: &mut LatexTokenizer<'_>,
    opener: Opener,
    phase: Phase,
    start: Position,
    c: char,
) -> Result<Action, TokenizeError> {
    if phase == Phase::Begin {
        if opener == Opener::Dollar && c == '$' {
            // `$$`: this was display math all along.
            tz.push(Item::DisplayMath {
                phase: DisplayPhase::Begin,
                start,
            });
            return Ok(Action::Consumed);
        }
        tz.commit(
            TokenKind::StartInlineMath,
            Span::between(start, start.offset + 1),
        );
    }

    if c == '$' {
        return match opener {
            Opener::Dollar => {
                tz.commit(TokenKind::EndInlineMath, tz.here());
                Ok(Action::Consumed)
            }
            Opener::Bracket => Err(TokenizeError::MismatchedMathDelimiter {
                found: "$",
                at: tz.cursor(),
            }),
        };
    }

    let math = Item::InlineMath {
        opener,
        phase: Phase::Body,
        start,
    };
    tokenize_math_char(tz, math, c);
    Ok(Action::Consumed)
}

fn handle_display_math(
    tz: &mut LatexTokenizer<'_>,
    phase: DisplayPhase,
    start: Position,
    c: char,
) -> Result<Action, TokenizeError> {
    match phase {
        DisplayPhase::Begin => {
            tz.commit(
                TokenKind::StartDisplayMath,
                Span::between(start, start.offset + 2),
            );
        }
        DisplayPhase::Closing(first) => {
            if c == '$' {
                tz.commit(TokenKind::EndDisplayMath, tz.span_from(first));
                return Ok(Action::Consumed);
            }
            return Err(TokenizeError::MalformedDisplayMathClose { at: first });
        }
        DisplayPhase::Body => {}
    }

    if c == '$' {
        tz.push(Item::DisplayMath {
            phase: DisplayPhase::Closing(tz.cursor()),
            start,
        });
        return Ok(Action::Consumed);
    }

    let math = Item::DisplayMath {
        phase: DisplayPhase::Body,
        start,
    };
    tokenize_math_char(tz, math, c);
    Ok(Action::Consumed)
}

/// Classify one character of a math body and re-push the math item.
///
/// Math never accumulates runs: every digit and every ordinary character
/// becomes its own token, and whitespace is dropped.
fn tokenize_math_char(tz: &mut LatexTokenizer<'_>, math: Item, c: char) {
    let here = tz.here();
    if let Some(kind) = TokenKind::from_math_char(c) {
        tz.commit(kind, here);
        tz.push(math);
    } else if c.is_whitespace() {
        tz.push(math);
    } else if c.is_numeric() {
        tz.commit(TokenKind::Number(c.to_string()), here);
        tz.push(math);
    } else if c == '\\' {
        tz.push(math);
        tz.push(Item::command(tz.cursor()));
    } else {
        tz.commit(TokenKind::Text(c.to_string()), here);
        tz.push(math);
    }
}
