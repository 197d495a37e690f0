//! Tokenizer for bet lines
//!
//! Splits a folded line into runs of digits, runs of letters, slashes and
//! single separator characters. The [`Lexer`] is a cursor over byte offsets
//! so the grammar can save a position, try an alternative and rewind.

/// Class of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Digits,
    Letters,
    Slash,
    /// Any other character: `.`, `,`, `-`, spaces, ...
    Separator,
}

/// A token borrowed from the line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Byte offset of the first character
    pub start: usize,
}

impl Token<'_> {
    /// Byte offset just past the token
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    /// Whether this is a separator made of whitespace
    pub fn is_space(&self) -> bool {
        self.kind == TokenKind::Separator && self.text.chars().all(char::is_whitespace)
    }
}

fn kind_of(c: char) -> TokenKind {
    if c.is_ascii_digit() {
        TokenKind::Digits
    } else if c.is_alphabetic() {
        TokenKind::Letters
    } else if c == '/' {
        TokenKind::Slash
    } else {
        TokenKind::Separator
    }
}

/// Rewindable cursor over the tokens of one line
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Lexer { text, pos: 0 }
    }

    /// Current position, for [`Lexer::reset`]
    pub fn mark(&self) -> usize {
        self.pos
    }

    /// Rewind (or advance) to a position returned by [`Lexer::mark`] or [`Token::end`]
    pub fn reset(&mut self, mark: usize) {
        self.pos = mark.min(self.text.len());
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Unread text
    pub fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// Token starting at the current position
    pub fn peek(&self) -> Option<Token<'a>> {
        self.token_at(self.pos)
    }

    /// Token starting at an arbitrary byte offset
    pub fn token_at(&self, start: usize) -> Option<Token<'a>> {
        let rest = self.text.get(start..)?;
        let first = rest.chars().next()?;
        let kind = kind_of(first);

        let len = match kind {
            TokenKind::Digits | TokenKind::Letters => rest
                .char_indices()
                .find(|(_, c)| kind_of(*c) != kind)
                .map(|(i, _)| i)
                .unwrap_or(rest.len()),
            TokenKind::Slash | TokenKind::Separator => first.len_utf8(),
        };

        Some(Token {
            kind,
            text: &rest[..len],
            start,
        })
    }

    /// Consume and return the next token
    pub fn bump(&mut self) -> Option<Token<'a>> {
        let token = self.peek()?;
        self.pos = token.end();
        Some(token)
    }

    /// Consume the next token if it has the given kind
    pub fn eat(&mut self, kind: TokenKind) -> Option<Token<'a>> {
        match self.peek() {
            Some(token) if token.kind == kind => self.bump(),
            _ => None,
        }
    }

    /// Skip separator characters, returning how many were skipped
    pub fn skip_separators(&mut self) -> usize {
        let mut skipped = 0;
        while self.eat(TokenKind::Separator).is_some() {
            skipped += 1;
        }
        skipped
    }

    /// Skip whitespace only
    pub fn skip_spaces(&mut self) {
        while let Some(token) = self.peek() {
            if !token.is_space() {
                break;
            }
            self.pos = token.end();
        }
    }
}

/// Every token of `text`, in order
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut lexer = Lexer::new(text);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.bump() {
        tokens.push(token);
    }
    tokens
}
