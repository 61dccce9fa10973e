//! Delimiter-bounded span extraction.
//!
//! A span is the shortest non-empty run of text between a left delimiter and
//! the next right delimiter on the same line. Delimiters are literal strings
//! and are not balanced: `{a {b}` yields the span `a {b`. Nesting is not
//! supported.

/// A piece of raw view source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'a> {
    /// Text outside any span, passed through unchanged.
    Text(&'a str),
    /// A delimited span.
    Span {
        /// The span including its delimiters.
        raw: &'a str,
        /// The text between the delimiters.
        inner: &'a str,
    },
}

/// Split `source` into text and spans.
///
/// # Example
///
/// ```
/// use vellum::syntax::{extract, Piece};
///
/// let pieces = extract("Hello {name}!", "{", "}");
/// assert_eq!(
///     pieces,
///     vec![
///         Piece::Text("Hello "),
///         Piece::Span { raw: "{name}", inner: "name" },
///         Piece::Text("!"),
///     ]
/// );
/// ```
pub fn extract<'a>(source: &'a str, left: &str, right: &str) -> Vec<Piece<'a>> {
    let mut pieces = Vec::new();
    if left.is_empty() || right.is_empty() {
        if !source.is_empty() {
            pieces.push(Piece::Text(source));
        }
        return pieces;
    }

    let mut text_start = 0;
    let mut cursor = 0;

    while let Some(offset) = source[cursor..].find(left) {
        let open = cursor + offset;
        match span_end(source, open + left.len(), right) {
            Some(close) => {
                if open > text_start {
                    pieces.push(Piece::Text(&source[text_start..open]));
                }
                let end = close + right.len();
                pieces.push(Piece::Span {
                    raw: &source[open..end],
                    inner: &source[open + left.len()..close],
                });
                text_start = end;
                cursor = end;
            }
            None => {
                // Retry one character later so overlapping delimiters still match.
                let step = source[open..].chars().next().map_or(1, char::len_utf8);
                cursor = open + step;
            }
        }
    }

    if text_start < source.len() {
        pieces.push(Piece::Text(&source[text_start..]));
    }

    pieces
}

/// Byte offset of the right delimiter closing a span whose inner text starts
/// at `inner_start`, or `None` if the span would be empty or cross a line.
fn span_end(source: &str, inner_start: usize, right: &str) -> Option<usize> {
    let rest = &source[inner_start..];
    let line_end = rest.find('\n').unwrap_or(rest.len());
    let line = &rest[..line_end];

    let first = line.chars().next()?;
    let search_from = first.len_utf8();
    line[search_from..]
        .find(right)
        .map(|pos| inner_start + search_from + pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans<'a>(pieces: &[Piece<'a>]) -> Vec<&'a str> {
        pieces
            .iter()
            .filter_map(|p| match p {
                Piece::Span { inner, .. } => Some(*inner),
                Piece::Text(_) => None,
            })
            .collect()
    }

    #[test]
    fn plain_text_is_single_piece() {
        assert_eq!(
            extract("no tags here", "{", "}"),
            vec![Piece::Text("no tags here")]
        );
    }

    #[test]
    fn empty_source_has_no_pieces() {
        assert!(extract("", "{", "}").is_empty());
    }

    #[test]
    fn spans_are_non_greedy() {
        let pieces = extract("{a} and {b}", "{", "}");
        assert_eq!(spans(&pieces), vec!["a", "b"]);
        assert_eq!(pieces[1], Piece::Text(" and "));
    }

    #[test]
    fn empty_delimiters_pair_is_not_a_span() {
        let pieces = extract("x {} y", "{", "}");
        assert_eq!(pieces, vec![Piece::Text("x {} y")]);
    }

    #[test]
    fn spans_do_not_cross_lines() {
        let pieces = extract("{a\nb} {c}", "{", "}");
        assert_eq!(spans(&pieces), vec!["c"]);
        assert_eq!(pieces[0], Piece::Text("{a\nb} "));
    }

    #[test]
    fn left_delimiter_inside_span_is_plain_text() {
        let pieces = extract("{a {b}", "{", "}");
        assert_eq!(spans(&pieces), vec!["a {b"]);
    }

    #[test]
    fn multi_character_delimiters() {
        let pieces = extract("<p>{{ name }}</p>", "{{", "}}");
        assert_eq!(spans(&pieces), vec![" name "]);
        assert_eq!(pieces[0], Piece::Text("<p>"));
        assert_eq!(pieces[2], Piece::Text("</p>"));
    }

    #[test]
    fn first_inner_character_may_be_right_delimiter() {
        let pieces = extract("{}}", "{", "}");
        assert_eq!(spans(&pieces), vec!["}"]);
    }

    #[test]
    fn unclosed_delimiter_is_text() {
        let pieces = extract("a { b", "{", "}");
        assert_eq!(pieces, vec![Piece::Text("a { b")]);
    }

    #[test]
    fn handles_multibyte_text() {
        let pieces = extract("héllo {naïve} wörld", "{", "}");
        assert_eq!(spans(&pieces), vec!["naïve"]);
        assert_eq!(pieces[2], Piece::Text(" wörld"));
    }
}
