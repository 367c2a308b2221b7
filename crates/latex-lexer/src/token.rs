use std::fmt;

use serde::Serialize;

/// Characters that become `Punct` tokens in every mode.
pub const PUNCT_CHARS: &str = ".,?;:";

/// Characters that become `Symbol` tokens inside math.
pub const SYMBOL_CHARS: &str = "+-<>";

/// Characters that math mode splits off as standalone tokens.
pub const MATH_SPECIAL_CHARS: &str = "+-<>.,?;:[]()^_{}'";

/// A point in source text: byte offset plus 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// The position of the first character of a source.
    pub fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// The position just after `c`, assuming `c` sits at `self`.
    pub fn advance(self, c: char) -> Self {
        let offset = self.offset + c.len_utf8();
        if c == '\n' {
            Self {
                offset,
                line: self.line + 1,
                column: 1,
            }
        } else {
            Self {
                offset,
                line: self.line,
                column: self.column + 1,
            }
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// The source range a token was read from.
///
/// `start..end` are byte offsets (end exclusive); `line` and `column` locate
/// the first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Span from `start` up to the byte offset `end`.
    pub fn between(start: Position, end: usize) -> Self {
        Self::new(start.offset, end, start.line, start.column)
    }
}

/// Token classification for LaTeX source.
///
/// Run-like variants embed the text they were read from; everything else is a
/// bare tag. Serializes as `{"kind": "...", "text": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text")]
pub enum TokenKind {
    // Runs (carry text)
    Text(String),
    Number(String),
    Command(String),
    Symbol(String),
    Punct(String),

    // Delimiters
    LBrack,
    RBrack,
    LCurly,
    RCurly,
    LParen,
    RParen,

    // Quotes
    LQuote,
    RQuote,
    LDQuote,
    RDQuote,

    VBar,
    Space,
    Super,
    Sub,

    // Bare braces in text
    LGroup,
    RGroup,

    // Math regions
    StartInlineMath,
    EndInlineMath,
    StartDisplayMath,
    EndDisplayMath,
}

impl TokenKind {
    /// The variant name, as printed by the CLI.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Text(_) => "Text",
            TokenKind::Number(_) => "Number",
            TokenKind::Command(_) => "Command",
            TokenKind::Symbol(_) => "Symbol",
            TokenKind::Punct(_) => "Punct",
            TokenKind::LBrack => "LBrack",
            TokenKind::RBrack => "RBrack",
            TokenKind::LCurly => "LCurly",
            TokenKind::RCurly => "RCurly",
            TokenKind::LParen => "LParen",
            TokenKind::RParen => "RParen",
            TokenKind::LQuote => "LQuote",
            TokenKind::RQuote => "RQuote",
            TokenKind::LDQuote => "LDQuote",
            TokenKind::RDQuote => "RDQuote",
            TokenKind::VBar => "VBar",
            TokenKind::Space => "Space",
            TokenKind::Super => "Super",
            TokenKind::Sub => "Sub",
            TokenKind::LGroup => "LGroup",
            TokenKind::RGroup => "RGroup",
            TokenKind::StartInlineMath => "StartInlineMath",
            TokenKind::EndInlineMath => "EndInlineMath",
            TokenKind::StartDisplayMath => "StartDisplayMath",
            TokenKind::EndDisplayMath => "EndDisplayMath",
        }
    }

    /// The text payload, for the run-like kinds.
    pub fn text(&self) -> Option<&str> {
        match self {
            TokenKind::Text(s)
            | TokenKind::Number(s)
            | TokenKind::Command(s)
            | TokenKind::Symbol(s)
            | TokenKind::Punct(s) => Some(s),
            _ => None,
        }
    }

    /// Single-character tokens recognized in text mode.
    pub fn from_text_char(c: char) -> Option<TokenKind> {
        match c {
            c if PUNCT_CHARS.contains(c) => Some(TokenKind::Punct(c.to_string())),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            '{' => Some(TokenKind::LGroup),
            '}' => Some(TokenKind::RGroup),
            _ => None,
        }
    }

    /// Single-character tokens recognized in math mode.
    ///
    /// Braces are `LCurly`/`RCurly` here, not groups, and `'` is a prime.
    pub fn from_math_char(c: char) -> Option<TokenKind> {
        match c {
            c if PUNCT_CHARS.contains(c) => Some(TokenKind::Punct(c.to_string())),
            c if SYMBOL_CHARS.contains(c) => Some(TokenKind::Symbol(c.to_string())),
            '[' => Some(TokenKind::LBrack),
            ']' => Some(TokenKind::RBrack),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            '{' => Some(TokenKind::LCurly),
            '}' => Some(TokenKind::RCurly),
            '^' => Some(TokenKind::Super),
            '_' => Some(TokenKind::Sub),
            '\'' => Some(TokenKind::RQuote),
            _ => None,
        }
    }

    /// Escaped delimiters: `\{`, `\}` and `\|`.
    pub fn from_escape(c: char) -> Option<TokenKind> {
        match c {
            '{' => Some(TokenKind::LCurly),
            '}' => Some(TokenKind::RCurly),
            '|' => Some(TokenKind::VBar),
            _ => None,
        }
    }
}

/// A token produced by the LaTeX tokenizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    #[serde(flatten)]
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind.text() {
            Some(text) => write!(f, "[{}:{}]", self.kind.name(), text.replace('\n', "\\n")),
            None => write!(f, "[{}]", self.kind.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_position_advance() {
        let p = Position::start().advance('a');
        assert_eq!(
            p,
            Position {
                offset: 1,
                line: 1,
                column: 2,
            }
        );
        let p = p.advance('\n');
        assert_eq!(
            p,
            Position {
                offset: 2,
                line: 2,
                column: 1,
            }
        );
        let p = p.advance('é');
        assert_eq!(
            p,
            Position {
                offset: 4,
                line: 2,
                column: 2,
            }
        );
    }

    #[test]
    fn test_text_chars() {
        assert_eq!(
            TokenKind::from_text_char(';'),
            Some(TokenKind::Punct(";".into()))
        );
        assert_eq!(TokenKind::from_text_char('{'), Some(TokenKind::LGroup));
        assert_eq!(TokenKind::from_text_char(')'), Some(TokenKind::RParen));
        assert_eq!(TokenKind::from_text_char('+'), None);
        assert_eq!(TokenKind::from_text_char('['), None);
    }

    #[test]
    fn test_math_chars_cover_special_set() {
        for c in MATH_SPECIAL_CHARS.chars() {
            assert!(TokenKind::from_math_char(c).is_some(), "missing {c:?}");
        }
        assert_eq!(TokenKind::from_math_char('x'), None);
        assert_eq!(TokenKind::from_math_char('|'), None);
    }

    #[test]
    fn test_math_braces_are_curly() {
        assert_eq!(TokenKind::from_math_char('{'), Some(TokenKind::LCurly));
        assert_eq!(TokenKind::from_math_char('^'), Some(TokenKind::Super));
        assert_eq!(
            TokenKind::from_math_char('-'),
            Some(TokenKind::Symbol("-".into()))
        );
    }

    #[test]
    fn test_display() {
        let span = Span::new(0, 0, 1, 1);
        assert_eq!(Token::new(TokenKind::Space, span).to_string(), "[Space]");
        assert_eq!(
            Token::new(TokenKind::Text("a\nb".into()), span).to_string(),
            "[Text:a\\nb]"
        );
    }

    #[test]
    fn test_serialize_shape() {
        let tok = Token::new(TokenKind::Command("frac".into()), Span::new(0, 5, 1, 1));
        let json = serde_json::to_value(&tok).unwrap();
        assert_eq!(json["kind"], "Command");
        assert_eq!(json["text"], "frac");
        assert_eq!(json["span"]["end"], 5);

        let json = serde_json::to_value(&TokenKind::LDQuote).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "LDQuote" }));
    }
}
