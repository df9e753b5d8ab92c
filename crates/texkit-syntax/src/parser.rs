use crate::{lexer::Lexer, SyntaxKind, SyntaxNode};
use rowan::{GreenNode, GreenNodeBuilder, TextRange, TextSize};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

/// Recursive-descent parser that folds the token stream into a rowan tree.
///
/// Every token ends up in the tree, so `parse(text).syntax().to_string()`
/// always reproduces `text`. Text outside of `@` entries is kept at the root
/// level unchanged, as BibTeX itself ignores it.
pub struct Parser<'a> {
    tokens: Vec<(SyntaxKind, &'a str)>,
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
    current_offset: TextSize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            tokens: Lexer::new(input).collect(),
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
            current_offset: TextSize::from(0),
        }
    }

    pub fn parse(mut self) -> ParseResult {
        self.builder.start_node(SyntaxKind::Root.into());
        loop {
            match self.peek() {
                SyntaxKind::Eof => break,
                SyntaxKind::At => self.parse_entry(),
                SyntaxKind::CommentText => self.parse_comment(),
                _ => self.bump(),
            }
        }
        self.builder.finish_node();
        ParseResult {
            green_node: self.builder.finish(),
            errors: self.errors,
        }
    }

    fn peek(&self) -> SyntaxKind {
        self.nth(0)
    }

    fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens
            .get(self.pos + n)
            .map(|(k, _)| *k)
            .unwrap_or(SyntaxKind::Eof)
    }

    fn peek_text(&self) -> &'a str {
        self.tokens.get(self.pos).map(|(_, t)| *t).unwrap_or("")
    }

    /// Offset (in tokens) of the next non-trivia token, counted from `from`.
    fn next_significant(&self, from: usize) -> usize {
        let mut n = from;
        while self.nth(n).is_trivia() {
            n += 1;
        }
        n
    }

    fn bump(&mut self) {
        if let Some(&(kind, text)) = self.tokens.get(self.pos) {
            self.builder.token(kind.into(), text);
            self.current_offset += TextSize::of(text);
            self.pos += 1;
        }
    }

    fn bump_trivia(&mut self) {
        loop {
            match self.peek() {
                SyntaxKind::Whitespace => self.bump(),
                SyntaxKind::CommentText => self.parse_comment(),
                _ => break,
            }
        }
    }

    fn error(&mut self, message: String) {
        let start = self.current_offset;
        let len = TextSize::of(self.peek_text());
        let range = TextRange::at(start, len);
        self.errors.push(SyntaxError { message, range });
    }

    fn parse_comment(&mut self) {
        self.builder.start_node(SyntaxKind::Comment.into());
        self.bump();
        self.builder.finish_node();
    }

    fn parse_entry(&mut self) {
        self.builder.start_node(SyntaxKind::Entry.into());
        self.bump(); // Consume '@'
        self.bump_trivia();

        if self.peek() != SyntaxKind::Ident {
            self.error("Expected entry type after '@'".into());
            self.builder.finish_node();
            return;
        }
        let entry_type = self.peek_text().to_lowercase();
        self.builder.start_node(SyntaxKind::EntryType.into());
        self.bump();
        self.builder.finish_node();
        self.bump_trivia();

        let closer = match self.peek() {
            SyntaxKind::LBrace => SyntaxKind::RBrace,
            SyntaxKind::LParen => SyntaxKind::RParen,
            _ => {
                self.error("Expected '{' or '(' after entry type".into());
                self.builder.finish_node();
                return;
            }
        };
        self.bump();

        match entry_type.as_str() {
            "comment" => self.parse_raw_body(closer),
            "preamble" => {
                self.bump_trivia();
                self.parse_value();
                self.bump_trivia();
            }
            "string" => self.parse_fields(closer),
            _ => {
                self.parse_id(closer);
                self.parse_fields(closer);
            }
        }

        if self.peek() == closer {
            self.bump();
        } else if closer == SyntaxKind::RBrace {
            self.error("Expected '}'".into());
        } else {
            self.error("Expected ')'".into());
        }
        self.builder.finish_node();
    }

    fn parse_id(&mut self, closer: SyntaxKind) {
        let key = self.next_significant(0);
        let has_key = matches!(self.nth(key), SyntaxKind::Ident | SyntaxKind::Number)
            && self.nth(self.next_significant(key + 1)) != SyntaxKind::Equals;

        if !has_key {
            self.bump_trivia();
            self.error("Expected entry key".into());
            if self.peek() == SyntaxKind::Comma {
                self.bump();
            }
            return;
        }

        self.builder.start_node(SyntaxKind::Id.into());
        self.bump_trivia();
        while matches!(self.peek(), SyntaxKind::Ident | SyntaxKind::Number) {
            self.bump();
        }
        let separator = self.next_significant(0);
        if self.nth(separator) == SyntaxKind::Comma {
            self.bump_trivia();
            self.bump();
        } else if self.nth(separator) != closer {
            self.error("Expected ',' after entry key".into());
        }
        self.builder.finish_node();
    }

    fn parse_fields(&mut self, closer: SyntaxKind) {
        loop {
            self.bump_trivia();
            match self.peek() {
                k if k == closer => break,
                SyntaxKind::Eof | SyntaxKind::At => break,
                SyntaxKind::Ident => self.parse_field(),
                SyntaxKind::Comma => self.bump(),
                _ => {
                    self.error("Unexpected token in entry".into());
                    self.builder.start_node(SyntaxKind::Error.into());
                    self.bump();
                    self.builder.finish_node();
                }
            }
        }
    }

    fn parse_field(&mut self) {
        self.builder.start_node(SyntaxKind::Field.into());
        self.builder.start_node(SyntaxKind::FieldName.into());
        self.bump();
        self.builder.finish_node();
        self.bump_trivia();

        if self.peek() == SyntaxKind::Equals {
            self.bump();
            self.bump_trivia();
            self.parse_value();
        } else {
            self.error("Expected '=' after field name".into());
        }

        let separator = self.next_significant(0);
        if self.nth(separator) == SyntaxKind::Comma {
            self.bump_trivia();
            self.bump();
        }
        self.builder.finish_node();
    }

    fn parse_value(&mut self) {
        self.builder.start_node(SyntaxKind::Value.into());
        loop {
            match self.peek() {
                SyntaxKind::LBrace => self.parse_braced(),
                SyntaxKind::Quote => self.parse_quoted(),
                SyntaxKind::Number | SyntaxKind::Ident => self.bump(),
                _ => {
                    self.error("Expected field value".into());
                    break;
                }
            }
            if self.nth(self.next_significant(0)) == SyntaxKind::Concat {
                self.bump_trivia();
                self.bump(); // Consume '#'
                self.bump_trivia();
            } else {
                break;
            }
        }
        self.builder.finish_node();
    }

    fn parse_braced(&mut self) {
        self.builder.start_node(SyntaxKind::BracedString.into());
        self.bump(); // Consume '{'
        let mut depth = 1usize;
        loop {
            match self.peek() {
                SyntaxKind::Eof => {
                    self.error("Unclosed '{'".into());
                    break;
                }
                SyntaxKind::LBrace => depth += 1,
                SyntaxKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        self.bump();
                        break;
                    }
                }
                _ => {}
            }
            self.bump();
        }
        self.builder.finish_node();
    }

    fn parse_quoted(&mut self) {
        self.builder.start_node(SyntaxKind::QuotedString.into());
        self.bump(); // Consume '"'
        let mut depth = 0usize;
        loop {
            match self.peek() {
                SyntaxKind::Eof => {
                    self.error("Unclosed '\"'".into());
                    break;
                }
                SyntaxKind::Quote if depth == 0 => {
                    self.bump();
                    break;
                }
                SyntaxKind::LBrace => depth += 1,
                SyntaxKind::RBrace if depth == 0 => {
                    // The entry closes before the string does.
                    self.error("Unclosed '\"'".into());
                    break;
                }
                SyntaxKind::RBrace => depth -= 1,
                _ => {}
            }
            self.bump();
        }
        self.builder.finish_node();
    }

    /// Body of `@comment{...}`: balanced tokens, no structure.
    fn parse_raw_body(&mut self, closer: SyntaxKind) {
        let mut depth = 0usize;
        loop {
            match self.peek() {
                SyntaxKind::Eof => break,
                k if k == closer && depth == 0 => break,
                SyntaxKind::LBrace => depth += 1,
                SyntaxKind::RBrace => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.bump();
        }
    }
}

pub struct ParseResult {
    pub green_node: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl ParseResult {
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green_node.clone())
    }
}

pub fn parse(input: &str) -> ParseResult {
    Parser::new(input).parse()
}
