//! Grammar of a bet line
//!
//! ```text
//! line    := segment+
//! segment := group suffix+
//! group   := item (gap* item)*
//! item    := keo | NUMBER | KEYWORD
//! keo     := NUMBER "/" NUMBER ("keo" | "k") NUMBER | NUMBER "keo" NUMBER
//! suffix  := gap* ALIAS " "* amount unit?
//! amount  := NUMBER ([.,] NUMBER)?
//! ```
//!
//! Parsing is recursive descent over a [`Lexer`]. Three places backtrack:
//! an alias may join letter runs across single spaces and may end inside a
//! digit run (`b7l10`, `dao310`), longest candidate first; a fraction is
//! only read as part of an amount when it is not the start of the next
//! number group (`10.36b5`, `10.36.47b5`); a unit marker is only dropped
//! when it does not start a valid suffix.

use crate::core::catalog::Catalog;
use crate::core::lexer::{Lexer, TokenKind};
use crate::core::number_sets::NumberSet;
use crate::types::BetCodeError;

/// Unit markers that may follow an amount
pub const UNITS: &[&str] = &["n", "k", "ng", "nghin", "ngan"];

const MAX_WORD_LEN: usize = 16;

/// Words the grammar needs to recognise
pub trait Vocabulary {
    /// Whether `word` (folded, no spaces) is a bet-type alias
    fn is_alias(&self, word: &str) -> bool;

    /// Number set named by `word`, if it is a combination keyword
    fn keyword(&self, word: &str) -> Option<NumberSet>;
}

impl Vocabulary for Catalog {
    fn is_alias(&self, word: &str) -> bool {
        self.rules().is_alias(word)
    }

    fn keyword(&self, word: &str) -> Option<NumberSet> {
        Catalog::keyword(self, word)
    }
}

/// One entry of a number group, before expansion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumberItem {
    /// A digit run as typed
    Digits(String),
    /// A kéo sequence; `next` is absent for the step-one form
    Sequence {
        start: String,
        next: Option<String>,
        end: String,
    },
    Keyword(NumberSet),
}

/// A bet-type alias with its amount
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suffix {
    pub alias: String,
    /// Amount text with `.` as decimal separator
    pub amount: String,
}

/// A number group and the suffixes applied to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub items: Vec<NumberItem>,
    pub suffixes: Vec<Suffix>,
}

/// Syntax tree of one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSyntax {
    pub segments: Vec<Segment>,
}

/// Parse a folded bet line
///
/// # Errors
///
/// Returns the first grammar error: a line without numbers, numbers without
/// a bet type, an unknown bet-type word, or a bet type without an amount.
pub fn parse<V: Vocabulary + ?Sized>(text: &str, vocab: &V) -> Result<LineSyntax, BetCodeError> {
    let mut parser = Parser {
        lexer: Lexer::new(text),
        vocab,
        line: text,
    };

    let mut segments = Vec::new();
    loop {
        parser.skip_gaps();
        if parser.lexer.is_at_end() {
            break;
        }
        segments.push(parser.segment()?);
    }

    if segments.is_empty() {
        return Err(BetCodeError::EmptyNumbers {
            line: text.to_string(),
        });
    }

    Ok(LineSyntax { segments })
}

struct Parser<'a, V: ?Sized> {
    lexer: Lexer<'a>,
    vocab: &'a V,
    line: &'a str,
}

impl<'a, V: Vocabulary + ?Sized> Parser<'a, V> {
    fn skip_gaps(&mut self) {
        while self.lexer.eat(TokenKind::Separator).is_some()
            || self.lexer.eat(TokenKind::Slash).is_some()
        {}
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.lexer.peek().map(|token| token.kind)
    }

    fn segment(&mut self) -> Result<Segment, BetCodeError> {
        let items = self.group();
        if items.is_empty() {
            return Err(self.leading_error());
        }

        let mut suffixes = Vec::new();
        loop {
            let mark = self.lexer.mark();
            self.skip_gaps();
            match self.peek_kind() {
                None => break,
                Some(TokenKind::Letters) => {
                    if let Some(suffix) = self.suffix() {
                        suffixes.push(suffix);
                        continue;
                    }
                    if !suffixes.is_empty() && self.keyword().is_some() {
                        self.lexer.reset(mark);
                        break;
                    }
                    return Err(self.letters_error());
                }
                Some(_) => {
                    self.lexer.reset(mark);
                    break;
                }
            }
        }

        if suffixes.is_empty() {
            return Err(BetCodeError::MissingBetType {
                line: self.line.to_string(),
            });
        }

        Ok(Segment { items, suffixes })
    }

    fn group(&mut self) -> Vec<NumberItem> {
        let mut items = Vec::new();
        loop {
            let mark = self.lexer.mark();
            self.skip_gaps();
            match self.peek_kind() {
                Some(TokenKind::Digits) => {
                    if let Some(sequence) = self.sequence() {
                        items.push(sequence);
                    } else if let Some(token) = self.lexer.bump() {
                        items.push(NumberItem::Digits(token.text.to_string()));
                    }
                }
                Some(TokenKind::Letters) => {
                    let word_start = self.lexer.mark();
                    if self.suffix().is_some() {
                        self.lexer.reset(mark);
                        break;
                    }
                    self.lexer.reset(word_start);
                    match self.keyword() {
                        Some(set) => items.push(NumberItem::Keyword(set)),
                        None => {
                            self.lexer.reset(mark);
                            break;
                        }
                    }
                }
                _ => {
                    self.lexer.reset(mark);
                    break;
                }
            }
        }
        items
    }

    fn sequence(&mut self) -> Option<NumberItem> {
        let mark = self.lexer.mark();
        let parsed = self.try_sequence();
        if parsed.is_none() {
            self.lexer.reset(mark);
        }
        parsed
    }

    fn try_sequence(&mut self) -> Option<NumberItem> {
        let start = self.lexer.eat(TokenKind::Digits)?.text.to_string();
        let next = match self.lexer.eat(TokenKind::Slash) {
            Some(_) => Some(self.lexer.eat(TokenKind::Digits)?.text.to_string()),
            None => None,
        };

        self.lexer.skip_spaces();
        let word = self.lexer.eat(TokenKind::Letters)?.text;
        let is_keo = word == "keo" || (next.is_some() && word == "k");
        if !is_keo {
            return None;
        }
        self.lexer.skip_spaces();
        let end = self.lexer.eat(TokenKind::Digits)?.text.to_string();

        Some(NumberItem::Sequence { start, next, end })
    }

    /// Longest keyword at the cursor, joining letter runs across one space, `-` or `_`
    fn keyword(&mut self) -> Option<NumberSet> {
        let mark = self.lexer.mark();
        let mut joined = String::new();
        let mut ends = Vec::new();
        let mut pos = mark;

        while let Some(token) = self.lexer.token_at(pos) {
            if token.kind != TokenKind::Letters || joined.len() > MAX_WORD_LEN {
                break;
            }
            for (i, c) in token.text.char_indices() {
                joined.push(c);
                ends.push(token.start + i + c.len_utf8());
            }
            pos = token.end();

            match (self.lexer.token_at(pos), self.lexer.token_at(pos + 1)) {
                (Some(gap), Some(next))
                    if gap.kind == TokenKind::Separator
                        && matches!(gap.text, " " | "-" | "_")
                        && next.kind == TokenKind::Letters =>
                {
                    pos = next.start;
                }
                _ => break,
            }
        }

        let chars: Vec<(usize, char)> = joined.char_indices().collect();
        for len in (1..=chars.len()).rev() {
            let prefix_end = chars
                .get(len)
                .map(|(i, _)| *i)
                .unwrap_or(joined.len());
            if let Some(set) = self.vocab.keyword(&joined[..prefix_end]) {
                self.lexer.reset(ends[len - 1]);
                return Some(set);
            }
        }
        None
    }

    /// Alias candidates at the cursor as (alias, position after it), shortest first
    fn alias_candidates(&self) -> Vec<(String, usize)> {
        let mut text = String::new();
        let mut candidates = Vec::new();
        let mut pos = self.lexer.mark();

        while let Some(token) = self.lexer.token_at(pos) {
            if text.len() > MAX_WORD_LEN {
                break;
            }
            match token.kind {
                TokenKind::Letters => {
                    text.push_str(token.text);
                    pos = token.end();
                    if self.vocab.is_alias(&text) {
                        candidates.push((text.clone(), pos));
                    }
                }
                TokenKind::Digits if !text.is_empty() => {
                    for i in 1..token.text.len() {
                        let candidate = format!("{}{}", text, &token.text[..i]);
                        if self.vocab.is_alias(&candidate) {
                            candidates.push((candidate, token.start + i));
                        }
                    }
                    text.push_str(token.text);
                    pos = token.end();
                    if self.vocab.is_alias(&text) {
                        candidates.push((text.clone(), pos));
                    }
                }
                TokenKind::Separator if token.is_space() && !text.is_empty() => {
                    match self.lexer.token_at(token.end()) {
                        Some(next) if next.kind == TokenKind::Letters => pos = next.start,
                        _ => break,
                    }
                }
                _ => break,
            }
        }

        candidates
    }

    fn suffix(&mut self) -> Option<Suffix> {
        let mark = self.lexer.mark();
        for (alias, after) in self.alias_candidates().into_iter().rev() {
            self.lexer.reset(after);
            self.lexer.skip_spaces();
            if let Some(amount) = self.amount() {
                self.unit();
                return Some(Suffix { alias, amount });
            }
        }
        self.lexer.reset(mark);
        None
    }

    fn at_unit(&self) -> bool {
        matches!(
            self.lexer.peek(),
            Some(token) if token.kind == TokenKind::Letters && UNITS.contains(&token.text)
        )
    }

    fn amount(&mut self) -> Option<String> {
        let whole = self.lexer.eat(TokenKind::Digits)?.text;
        let mark = self.lexer.mark();

        if let Some(sep) = self.lexer.eat(TokenKind::Separator) {
            if matches!(sep.text, "." | ",") {
                let fraction_start = self.lexer.mark();
                if let Some(fraction) = self.lexer.eat(TokenKind::Digits) {
                    let alias_next =
                        self.peek_kind() == Some(TokenKind::Letters) && !self.at_unit();
                    if !alias_next && !self.opens_group(fraction_start) {
                        return Some(format!("{}.{}", whole, fraction.text));
                    }
                }
            }
            self.lexer.reset(mark);
        }

        Some(whole.to_string())
    }

    /// Whether a group of two or more numbers and a bet type starts at `start`
    ///
    /// The first number must be tied to the next item by a separator other
    /// than a space, as in `10.36.47b5`. The cursor is left unchanged.
    fn opens_group(&mut self, start: usize) -> bool {
        let mark = self.lexer.mark();
        let opens = self.scan_group(start);
        self.lexer.reset(mark);
        opens
    }

    fn scan_group(&mut self, start: usize) -> bool {
        self.lexer.reset(start);
        if self.lexer.eat(TokenKind::Digits).is_none() {
            return false;
        }
        let tied = matches!(
            self.lexer.peek(),
            Some(token) if matches!(token.kind, TokenKind::Separator | TokenKind::Slash)
                && !token.is_space()
        );
        if !tied {
            return false;
        }

        let mut items = 1;
        loop {
            self.skip_gaps();
            let Some(token) = self.lexer.peek() else {
                return false;
            };
            match token.kind {
                TokenKind::Digits => {
                    self.lexer.bump();
                    items += 1;
                }
                TokenKind::Letters
                    if token.text == "keo" || self.vocab.keyword(token.text).is_some() =>
                {
                    self.lexer.bump();
                    items += 1;
                }
                TokenKind::Letters => {
                    if items < 2 {
                        return false;
                    }
                    return self.alias_candidates().into_iter().any(|(_, after)| {
                        self.lexer.reset(after);
                        self.lexer.skip_spaces();
                        self.peek_kind() == Some(TokenKind::Digits)
                    });
                }
                _ => return false,
            }
        }
    }

    fn unit(&mut self) {
        let mark = self.lexer.mark();
        self.lexer.skip_spaces();
        if self.at_unit() {
            let unit = self.lexer.mark();
            if self.suffix().is_none() {
                self.lexer.reset(unit);
                self.lexer.bump();
                return;
            }
        }
        self.lexer.reset(mark);
    }

    /// Error for a segment that does not start with numbers
    fn leading_error(&mut self) -> BetCodeError {
        match self.peek_kind() {
            Some(TokenKind::Letters) => {
                let mark = self.lexer.mark();
                if self.suffix().is_some() {
                    self.lexer.reset(mark);
                    BetCodeError::EmptyNumbers {
                        line: self.line.to_string(),
                    }
                } else {
                    self.letters_error()
                }
            }
            _ => BetCodeError::EmptyNumbers {
                line: self.line.to_string(),
            },
        }
    }

    /// Error for letters that do not form an alias followed by an amount
    fn letters_error(&self) -> BetCodeError {
        if let Some((alias, _)) = self.alias_candidates().pop() {
            return BetCodeError::missing_amount(&alias);
        }
        let word = self.lexer.peek().map(|token| token.text).unwrap_or_default();
        BetCodeError::unrecognized_bet_type(word)
    }
}
