//! Annotated LaTeX sources.
//!
//! Problem files open with a header block of `%%` lines carrying metadata
//! (source, author, tags). The header is kept aside and only the body is
//! tokenized.

use std::fs;
use std::io;
use std::path::Path;

use crate::{tokenize, Token, TokenizeError};

const HEADER_MARKER: &str = "%%";

/// A LaTeX source split into its `%%` header and its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedLatex {
    header: Vec<String>,
    body: String,
}

impl AnnotatedLatex {
    /// Split `text` at the first line that does not start with `%%`.
    pub fn parse(text: &str) -> Self {
        let mut header = Vec::new();
        let mut lines = text.lines().peekable();

        while let Some(line) = lines.peek() {
            let Some(rest) = line.strip_prefix(HEADER_MARKER) else {
                break;
            };
            header.push(rest.strip_prefix(' ').unwrap_or(rest).to_string());
            lines.next();
        }

        let body = lines.collect::<Vec<_>>().join("\n");
        Self { header, body }
    }

    /// Read and split the file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// Header lines with the `%%` marker stripped.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Tokenize the body. Spans are relative to the body, not the file.
    pub fn tokenize(&self) -> Result<Vec<Token>, TokenizeError> {
        tokenize(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TokenKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_no_header() {
        let doc = AnnotatedLatex::parse("Prove it.");
        assert!(doc.header().is_empty());
        assert_eq!(doc.body(), "Prove it.");
    }

    #[test]
    fn test_header_is_split_off() {
        let doc =
            AnnotatedLatex::parse("%% source: IMO 1986\n%%tags: geometry\nLet $n$ be odd.\n");
        assert_eq!(doc.header(), &["source: IMO 1986", "tags: geometry"]);
        assert_eq!(doc.body(), "Let $n$ be odd.");
    }

    #[test]
    fn test_later_comment_lines_stay_in_body() {
        let doc = AnnotatedLatex::parse("%% a\nbody\n%% not header\n");
        assert_eq!(doc.header(), &["a"]);
        assert_eq!(doc.body(), "body\n%% not header");
    }

    #[test]
    fn test_single_percent_is_body() {
        let doc = AnnotatedLatex::parse("% comment\ntext");
        assert!(doc.header().is_empty());
        assert_eq!(doc.body(), "% comment\ntext");
    }

    #[test]
    fn test_body_lines_keep_separators() {
        let doc = AnnotatedLatex::parse("%% h\nfirst\nsecond");
        let kinds: Vec<_> = doc
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Text("first".into()),
                TokenKind::Space,
                TokenKind::Text("second".into()),
            ]
        );
    }

    #[test]
    fn test_tokenize_error_propagates() {
        let doc = AnnotatedLatex::parse("%% h\n$x");
        assert!(doc.tokenize().is_err());
    }

    #[test]
    fn test_open_missing_file() {
        let result = AnnotatedLatex::open("/nonexistent/problem.tex");
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }
}
