use crate::token::{Token, TokenKind, Tokenizer};

/// Tokens strictly before the cursor plus a read position that only moves
/// backwards.
///
/// Only constructed when at least one token precedes the cursor, so the read
/// position always points at a real token.
#[derive(Debug, Clone)]
pub struct TokenIterator {
    tokens: Vec<Token>,
    index: usize,
}

impl TokenIterator {
    /// Tokenize `source` up to `cursor` and position the iterator on the last
    /// token that starts before it.
    ///
    /// Also returns the distance from the start of that token to the cursor,
    /// which tells whether the cursor sits inside the token or after it.
    /// Returns `None` when no token starts before the cursor.
    pub fn scan(source: &str, cursor: usize) -> Option<(Self, usize)> {
        let cursor = floor_char_boundary(source, cursor);
        let mut tokens = Vec::with_capacity(cursor / 4);
        let mut last_start = 0;

        for (tok, span) in Tokenizer::new(source) {
            if span.start.offset >= cursor {
                break;
            }
            last_start = span.start.offset;
            tokens.push(tok);
        }

        let iter = Self::from_tokens(tokens)?;
        Some((iter, cursor - last_start))
    }

    /// Build an iterator positioned on the last of `tokens`.
    pub fn from_tokens(tokens: Vec<Token>) -> Option<Self> {
        let index = tokens.len().checked_sub(1)?;
        Some(Self { tokens, index })
    }

    pub fn current(&self) -> &Token {
        &self.tokens[self.index]
    }

    pub fn kind(&self) -> TokenKind {
        self.current().kind
    }

    pub fn index(&self) -> usize {
        self.index
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Move one token back. Returns false (and stays put) at the first token.
    pub fn step_back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Reassemble the tokens in `start..end` into source text.
    pub fn text(&self, start: usize, end: usize) -> String {
        join_literals(&self.tokens[start..end])
    }
}

/// Concatenate token texts in order. Whitespace and comments are not restored.
pub fn join_literals(tokens: &[Token]) -> String {
    tokens.iter().map(Token::literal).collect()
}

fn floor_char_boundary(s: &str, idx: usize) -> usize {
    let mut idx = idx.min(s.len());
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}
