//! LaTeX Lexer
//!
//! Converts raw LaTeX source into a flat stream of typed tokens: text runs,
//! commands, numbers, punctuation, grouping delimiters, quotes, whitespace and
//! math-region delimiters. The tokenizer tracks whether it is in plain text,
//! inline math or display math, since classification differs between them.
//!
//! This is a lexer only: no macro expansion, no AST, and no brace balancing
//! beyond detecting math regions left open.
//!
//! # Example
//!
//! ```
//! use latex_lexer::{tokenize, TokenKind};
//!
//! let tokens = tokenize("$x$").unwrap();
//! let kinds: Vec<_> = tokens.into_iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     vec![
//!         TokenKind::StartInlineMath,
//!         TokenKind::Text("x".into()),
//!         TokenKind::EndInlineMath,
//!     ]
//! );
//! ```

pub mod document;
mod item;
pub mod token;
pub mod tokenizer;

use std::fmt;

pub use document::AnnotatedLatex;
pub use item::ItemKind;
pub use token::{Position, Span, Token, TokenKind};
pub use tokenizer::{LatexTokenizer, Mode, TraceEvent};

/// Which kind of math region an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathKind {
    Inline,
    Display,
}

impl fmt::Display for MathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathKind::Inline => f.write_str("inline"),
            MathKind::Display => f.write_str("display"),
        }
    }
}

/// Tokenizer error with position information.
///
/// Any error aborts the whole call; no partial token stream is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TokenizeError {
    /// Input ended while a math region was still open. `at` is its opener.
    #[error("Unterminated {kind} math opened at {at}")]
    UnterminatedMathRegion { kind: MathKind, at: Position },

    /// A single `$` inside display math that is not followed by a second `$`.
    #[error("Stray `$` inside display math at {at}")]
    MalformedDisplayMathClose { at: Position },

    /// A math delimiter that does not match the region it appears in.
    #[error("Mismatched math delimiter `{found}` at {at}")]
    MismatchedMathDelimiter { found: &'static str, at: Position },

    /// No lexical item accepted the character.
    #[error("Unhandled character {ch:?} at {at}")]
    UnhandledCharacter { ch: char, at: Position },
}

impl TokenizeError {
    /// Where in the source the error was detected.
    pub fn position(&self) -> Position {
        match self {
            TokenizeError::UnterminatedMathRegion { at, .. }
            | TokenizeError::MalformedDisplayMathClose { at }
            | TokenizeError::MismatchedMathDelimiter { at, .. }
            | TokenizeError::UnhandledCharacter { at, .. } => *at,
        }
    }
}

/// Tokenize a LaTeX source string.
pub fn tokenize(source: &str) -> Result<Vec<Token>, TokenizeError> {
    LatexTokenizer::new().tokenize(source)
}
