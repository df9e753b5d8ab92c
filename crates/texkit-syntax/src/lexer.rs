use crate::SyntaxKind;

/// A lexer for BibTeX source code.
///
/// ## Overview
///
/// The lexer performs **character-level scanning** of `.bib` source, producing
/// a stream of ([`SyntaxKind`], `&str`) tuples. It handles:
///
/// - **Punctuation**: `@`, `{`, `}`, `(`, `)`, `,`, `=`, `#`, `"`
/// - **Numbers**: runs of ASCII digits
/// - **Identifiers**: everything else up to the next special character,
///   including `:`, `-`, `/` and `.` so that citation keys stay whole.
///   A backslash always takes the following character with it (`\"`, `\{`).
/// - **Comments**: `%` through end of line
/// - **Whitespace**: consecutive whitespace collapsed into single tokens
///
/// The lexer is context free: whether an identifier is an entry type, a key
/// or a word inside a braced value is decided by the parser.
///
/// ## Examples
///
/// ```
/// use texkit_syntax::lexer::Lexer;
/// use texkit_syntax::SyntaxKind;
///
/// let tokens: Vec<_> = Lexer::new("@book{knuth:84,").collect();
///
/// assert_eq!(tokens[0], (SyntaxKind::At, "@"));
/// assert_eq!(tokens[1], (SyntaxKind::Ident, "book"));
/// assert_eq!(tokens[3], (SyntaxKind::Ident, "knuth:84"));
/// ```
pub struct Lexer<'a> {
    /// The input source text being lexed.
    input: &'a str,
    /// Current byte position in the input.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new `Lexer` for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    /// Returns the next token (kind, text).
    /// If EOF, returns (SyntaxKind::Eof, "").
    pub fn next_token(&mut self) -> (SyntaxKind, &'a str) {
        let Some(c) = self.input[self.position..].chars().next() else {
            return (SyntaxKind::Eof, "");
        };
        let start = self.position;
        self.position += c.len_utf8();

        let kind = match c {
            '@' => SyntaxKind::At,
            '{' => SyntaxKind::LBrace,
            '}' => SyntaxKind::RBrace,
            '(' => SyntaxKind::LParen,
            ')' => SyntaxKind::RParen,
            ',' => SyntaxKind::Comma,
            '=' => SyntaxKind::Equals,
            '#' => SyntaxKind::Concat,
            '"' => SyntaxKind::Quote,
            '%' => {
                self.eat_while(|n| n != '\n' && n != '\r');
                SyntaxKind::CommentText
            }
            c if c.is_whitespace() => {
                self.eat_while(char::is_whitespace);
                SyntaxKind::Whitespace
            }
            c if c.is_ascii_digit() => {
                self.eat_while(|n| n.is_ascii_digit());
                if self.peek_char().is_some_and(is_ident_char) {
                    // 2020a, 1984knuth
                    self.eat_ident();
                    SyntaxKind::Ident
                } else {
                    SyntaxKind::Number
                }
            }
            '\\' => {
                self.eat_escaped();
                self.eat_ident();
                SyntaxKind::Ident
            }
            _ => {
                self.eat_ident();
                SyntaxKind::Ident
            }
        };

        (kind, &self.input[start..self.position])
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(n) = self.peek_char() {
            if !predicate(n) {
                break;
            }
            self.position += n.len_utf8();
        }
    }

    /// Consumes the character following a backslash, whatever it is.
    fn eat_escaped(&mut self) {
        if let Some(n) = self.peek_char() {
            self.position += n.len_utf8();
        }
    }

    fn eat_ident(&mut self) {
        while let Some(n) = self.peek_char() {
            if n == '\\' {
                self.position += n.len_utf8();
                self.eat_escaped();
            } else if is_ident_char(n) {
                self.position += n.len_utf8();
            } else {
                break;
            }
        }
    }
}

fn is_ident_char(c: char) -> bool {
    !c.is_whitespace()
        && !matches!(c, '@' | '{' | '}' | '(' | ')' | ',' | '=' | '#' | '"' | '%')
}

impl<'a> Iterator for Lexer<'a> {
    type Item = (SyntaxKind, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let (kind, text) = self.next_token();
        if kind == SyntaxKind::Eof {
            None
        } else {
            Some((kind, text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<(SyntaxKind, &str)> {
        let lexer = Lexer::new(input);
        lexer.collect()
    }

    #[test]
    fn test_entry_header() {
        let input = r"@article{key1, % the key";
        let tokens = tokenize(input);
        assert_eq!(
            tokens,
            vec![
                (SyntaxKind::At, "@"),
                (SyntaxKind::Ident, "article"),
                (SyntaxKind::LBrace, "{"),
                (SyntaxKind::Ident, "key1"),
                (SyntaxKind::Comma, ","),
                (SyntaxKind::Whitespace, " "),
                (SyntaxKind::CommentText, "% the key"),
            ]
        );
    }

    #[test]
    fn test_field_tokens() {
        let input = r#"year = 1984 # "a""#;
        let tokens = tokenize(input);
        assert_eq!(
            tokens,
            vec![
                (SyntaxKind::Ident, "year"),
                (SyntaxKind::Whitespace, " "),
                (SyntaxKind::Equals, "="),
                (SyntaxKind::Whitespace, " "),
                (SyntaxKind::Number, "1984"),
                (SyntaxKind::Whitespace, " "),
                (SyntaxKind::Concat, "#"),
                (SyntaxKind::Whitespace, " "),
                (SyntaxKind::Quote, "\""),
                (SyntaxKind::Ident, "a"),
                (SyntaxKind::Quote, "\""),
            ]
        );
    }

    #[test]
    fn test_lexer_empty_input() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_lexer_only_whitespace() {
        let input = "   \n\t ";
        assert_eq!(tokenize(input), vec![(SyntaxKind::Whitespace, "   \n\t ")]);
    }

    #[test]
    fn test_digits_followed_by_letters_are_one_ident() {
        assert_eq!(tokenize("2020a"), vec![(SyntaxKind::Ident, "2020a")]);
        assert_eq!(tokenize("2020"), vec![(SyntaxKind::Number, "2020")]);
    }

    #[test]
    fn test_escaped_quote_stays_in_ident() {
        assert_eq!(tokenize(r#"O\"Hare"#), vec![(SyntaxKind::Ident, r#"O\"Hare"#)]);
    }

    #[test]
    fn test_key_punctuation() {
        let input = "doe-2001:intro/part.1";
        assert_eq!(tokenize(input), vec![(SyntaxKind::Ident, input)]);
    }

    #[test]
    fn test_lexer_multi_byte_text() {
        let input = "Ærøskøbing";
        assert_eq!(tokenize(input), vec![(SyntaxKind::Ident, "Ærøskøbing")]);
    }

    #[test]
    fn test_lexer_comment_with_carriage_return() {
        let input = "% comment\rnext";
        let tokens = tokenize(input);
        assert_eq!(tokens[0], (SyntaxKind::CommentText, "% comment"));
    }

    #[test]
    fn test_trailing_backslash() {
        assert_eq!(tokenize("\\"), vec![(SyntaxKind::Ident, "\\")]);
    }
}
