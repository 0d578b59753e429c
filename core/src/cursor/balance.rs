use tracing::trace;

use super::TokenIterator;
use crate::token::TokenKind;

/// Closing delimiter -> opening delimiter.
const BRACKET_PAIRS: [(TokenKind, TokenKind); 3] = [
    (TokenKind::RParen, TokenKind::LParen),
    (TokenKind::RBrack, TokenKind::LBrack),
    (TokenKind::RBrace, TokenKind::LBrace),
];

pub fn opener_for(close: TokenKind) -> Option<TokenKind> {
    BRACKET_PAIRS
        .iter()
        .find(|(c, _)| *c == close)
        .map(|(_, open)| *open)
}

impl TokenIterator {
    /// Walk back to the `open` token that balances the current position,
    /// skipping nested `open`/`close` pairs.
    ///
    /// The current token counts as the closer unless it already is `open`.
    /// Returns false when the start of the token stream is reached first; the
    /// iterator is then left on the oldest token.
    pub fn scan_to_opener(&mut self, open: TokenKind, close: TokenKind) -> bool {
        if self.kind() == open {
            return true;
        }
        let mut balance = 1usize;
        while balance != 0 {
            if !self.step_back() {
                trace!(%open, %close, balance, "ran out of tokens while balancing");
                return false;
            }
            let kind = self.kind();
            if kind == close {
                balance += 1;
            } else if kind == open {
                balance -= 1;
            }
        }
        true
    }

    /// On a `)`, `]` or `}`, move to its matching opener, honouring nesting.
    pub fn scan_to_matching_bracket(&mut self) -> bool {
        let close = self.kind();
        match opener_for(close) {
            Some(open) => self.scan_to_opener(open, close),
            None => false,
        }
    }

    /// Move to the `{` that opens the enclosing block.
    pub fn scan_to_open_brace(&mut self) -> bool {
        self.scan_to_opener(TokenKind::LBrace, TokenKind::RBrace)
    }
}
