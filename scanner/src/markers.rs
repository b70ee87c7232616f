use std::convert::Infallible;

use errors::{ConfigError, ScanError, TokenError};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{span::Span, Spanned, ESCAPE};

/// The open and close tokens delimiting an expression
///
/// Both tokens are non-empty and never change after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Markers {
    open_token: String,
    close_token: String,
}

/// A piece of scanned text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
    /// Text copied through unchanged
    Text(String),
    /// An escaped open token, emitted as the literal open token
    EscapedOpen,
    /// A closed expression with escaped close tokens unescaped
    ///
    /// The span covers both tokens.
    Expression(String),
    /// An open token never closed, emitted verbatim through the end of the text
    Unterminated(String),
}

/// What the scanner found at a given point in the text
pub(crate) enum Event<'a> {
    Text(&'a str, Span),
    EscapedOpen(Span),
    Expression(&'a str, Span),
    Unterminated(&'a str, Span),
}

impl Markers {
    pub fn new(
        open_token: impl Into<String>,
        close_token: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let open_token = open_token.into();
        let close_token = close_token.into();

        if open_token.is_empty() {
            return Err(ConfigError::EmptyOpenToken);
        }

        if close_token.is_empty() {
            return Err(ConfigError::EmptyCloseToken);
        }

        Ok(Self {
            open_token,
            close_token,
        })
    }

    pub(crate) fn from_static(open_token: &'static str, close_token: &'static str) -> Self {
        debug_assert!(!open_token.is_empty() && !close_token.is_empty());

        Self {
            open_token: open_token.to_string(),
            close_token: close_token.to_string(),
        }
    }

    pub fn open_token(&self) -> &str {
        &self.open_token
    }

    pub fn close_token(&self) -> &str {
        &self.close_token
    }

    /// Split text in to segments without resolving any expression
    pub fn scan(&self, text: &str) -> Vec<Spanned<Segment>> {
        let mut segments = vec![];

        let result: Result<(), Infallible> = self.walk(text, |event| {
            segments.push(match event {
                Event::Text(text, span) => (Segment::Text(text.to_string()), span),
                Event::EscapedOpen(span) => (Segment::EscapedOpen, span),
                Event::Expression(expression, span) => {
                    (Segment::Expression(expression.to_string()), span)
                }
                Event::Unterminated(text, span) => (Segment::Unterminated(text.to_string()), span),
            });

            Ok(())
        });

        match result {
            Ok(()) => segments,
            Err(never) => match never {},
        }
    }

    /// Report unterminated and blank expressions
    pub fn check(&self, text: &str) -> Result<(), Vec<Spanned<TokenError>>> {
        let errs: Vec<Spanned<TokenError>> = self
            .scan(text)
            .into_iter()
            .filter_map(|(segment, span)| match segment {
                Segment::Unterminated(_) => Some((
                    ScanError::UnterminatedExpression(self.open_token.clone()).into(),
                    span,
                )),
                Segment::Expression(expression) if expression.trim().is_empty() => {
                    Some((ScanError::EmptyExpression.into(), span))
                }
                _ => None,
            })
            .collect();

        if errs.is_empty() {
            Ok(())
        } else {
            Err(errs)
        }
    }

    /// Single left to right pass over the text, reporting each piece to `visit`
    ///
    /// An error from `visit` stops the pass and is returned as is.
    pub(crate) fn walk<E>(
        &self,
        text: &str,
        visit: impl FnMut(Event<'_>) -> Result<(), E>,
    ) -> Result<(), E> {
        self.walk_from(text, text.find(self.open_token.as_str()), visit)
    }

    /// [Markers::walk] starting from an already located first open token
    pub(crate) fn walk_from<E>(
        &self,
        text: &str,
        first_open: Option<usize>,
        mut visit: impl FnMut(Event<'_>) -> Result<(), E>,
    ) -> Result<(), E> {
        let open = self.open_token.as_str();
        let close = self.close_token.as_str();
        let bytes = text.as_bytes();

        let mut offset = 0;
        let mut expression = String::new();
        let mut next_open = first_open;

        while let Some(start) = next_open {
            // A backslash already consumed by the previous token can't escape this one
            if start > offset && bytes[start - 1] == ESCAPE {
                visit_text(&mut visit, text, offset..start - 1)?;
                offset = start + open.len();
                trace!(start, "escaped open token");
                visit(Event::EscapedOpen(start - 1..offset))?;
            } else {
                visit_text(&mut visit, text, offset..start)?;
                offset = start + open.len();
                expression.clear();

                let mut next_close = find_from(text, close, offset);

                while let Some(end) = next_close {
                    if end > offset && bytes[end - 1] == ESCAPE {
                        expression.push_str(&text[offset..end - 1]);
                        expression.push_str(close);
                        offset = end + close.len();
                        next_close = find_from(text, close, offset);
                    } else {
                        expression.push_str(&text[offset..end]);
                        break;
                    }
                }

                match next_close {
                    Some(end) => {
                        offset = end + close.len();
                        visit(Event::Expression(&expression, start..offset))?;
                    }
                    None => {
                        debug!(start, "unterminated expression, copying rest of text");
                        visit(Event::Unterminated(&text[start..], start..text.len()))?;
                        offset = text.len();
                    }
                }
            }

            next_open = find_from(text, open, offset);
        }

        visit_text(&mut visit, text, offset..text.len())
    }
}

fn visit_text<E>(
    visit: &mut impl FnMut(Event<'_>) -> Result<(), E>,
    text: &str,
    span: Span,
) -> Result<(), E> {
    if span.is_empty() {
        return Ok(());
    }

    visit(Event::Text(&text[span.clone()], span))
}

fn find_from(text: &str, pattern: &str, from: usize) -> Option<usize> {
    text.get(from..)?.find(pattern).map(|idx| idx + from)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn markers() -> Markers {
        Markers::new("${", "}").unwrap()
    }

    #[test]
    fn it_should_reject_empty_tokens() {
        assert_eq!(Err(ConfigError::EmptyOpenToken), Markers::new("", "}"));
        assert_eq!(Err(ConfigError::EmptyCloseToken), Markers::new("${", ""));
    }

    #[test]
    fn it_should_scan_text_without_tokens() {
        assert_eq!(
            vec![(Segment::Text("plain text".to_string()), 0..10)],
            markers().scan("plain text")
        );
    }

    #[test]
    fn it_should_scan_nothing_from_empty_text() {
        assert_eq!(Vec::<Spanned<Segment>>::new(), markers().scan(""));
    }

    #[test]
    fn it_should_scan_expressions() {
        assert_eq!(
            vec![
                (Segment::Text("a ".to_string()), 0..2),
                (Segment::Expression("x".to_string()), 2..6),
                (Segment::Text(" b".to_string()), 6..8),
            ],
            markers().scan("a ${x} b")
        );
    }

    #[test]
    fn it_should_scan_adjacent_expressions() {
        assert_eq!(
            vec![
                (Segment::Expression("a".to_string()), 0..4),
                (Segment::Expression("b".to_string()), 4..8),
            ],
            markers().scan("${a}${b}")
        );
    }

    #[test]
    fn it_should_scan_escaped_open_token() {
        assert_eq!(
            vec![
                (Segment::Text("a ".to_string()), 0..2),
                (Segment::EscapedOpen, 2..5),
                (Segment::Text("x} b".to_string()), 5..9),
            ],
            markers().scan("a \\${x} b")
        );
    }

    #[test]
    fn it_should_unescape_close_token_in_expression() {
        assert_eq!(
            vec![(Segment::Expression("a}b".to_string()), 0..7)],
            markers().scan("${a\\}b}")
        );
    }

    #[test]
    fn it_should_not_unescape_close_token_directly_after_open_token() {
        // The backslash before the close token is the open token itself
        let markers = Markers::new("\\", "\\").unwrap();

        assert_eq!(
            vec![
                (Segment::Text("a".to_string()), 0..1),
                (Segment::Expression("".to_string()), 1..3),
                (Segment::Text("b".to_string()), 3..4),
            ],
            markers.scan("a\\\\b")
        );
    }

    #[test]
    fn it_should_scan_unterminated_expression() {
        assert_eq!(
            vec![
                (Segment::Text("a ".to_string()), 0..2),
                (Segment::Unterminated("${x b".to_string()), 2..7),
            ],
            markers().scan("a ${x b")
        );
    }

    #[test]
    fn it_should_keep_escapes_in_unterminated_expression() {
        assert_eq!(
            vec![(Segment::Unterminated("${a\\} ${b".to_string()), 0..9)],
            markers().scan("${a\\} ${b")
        );
    }

    #[test]
    fn it_should_scan_multibyte_text() {
        assert_eq!(
            vec![
                (Segment::Text("héllo ".to_string()), 0..7),
                (Segment::Expression("wörld".to_string()), 7..16),
                (Segment::Text(" ✓".to_string()), 16..20),
            ],
            markers().scan("héllo ${wörld} ✓")
        );
    }

    #[test]
    fn it_should_scan_multi_char_close_token() {
        let markers = Markers::new("{{", "}}").unwrap();

        assert_eq!(
            vec![
                (Segment::Expression("a}b".to_string()), 0..7),
                (Segment::Text(" ".to_string()), 7..8),
                (Segment::Expression("c}}d".to_string()), 8..17),
            ],
            markers.scan("{{a}b}} {{c\\}}d}}")
        );
    }

    #[test]
    fn it_should_check_valid_text() {
        assert_eq!(Ok(()), markers().check("a ${x} \\${y} b"));
    }

    #[test]
    fn it_should_check_unterminated_and_empty_expressions() {
        assert_eq!(
            Err(vec![
                (ScanError::EmptyExpression.into(), 2..6),
                (
                    ScanError::UnterminatedExpression("${".to_string()).into(),
                    7..12
                ),
            ]),
            markers().check("a ${ } ${x b")
        );
    }
}
