use tracing::trace;

use super::TokenIterator;
use crate::token::TokenKind;

/// How an accepted token is consumed by the expression walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Take the token itself.
    Take,
    /// Take the token and everything back to its matching opener.
    Balance,
}

/// Transition table of the backward expression walk.
///
/// `prev` is the kind of the token to the right of `current` that was already
/// accepted. Returns `None` when `current` cannot precede it in a primary
/// expression such as `Point{1, 2}.m["foo"].s[i:j].Call(a, b).`, which reduces
/// to `ident`, `ident[]`, `ident{}` and `ident()` chained by dots.
pub fn accepts(current: TokenKind, prev: TokenKind) -> Option<Step> {
    use TokenKind::*;
    match (current, prev) {
        // a selector needs a name after it
        (Period, Ident) => Some(Step::Take),
        (Ident, Period | LBrack | LBrace | LParen) => Some(Step::Take),
        // only `T{...}.m` is valid for a brace literal inside an expression
        (RBrace, Period) => Some(Step::Balance),
        (RParen | RBrack, Period | LBrack | LParen) => Some(Step::Balance),
        _ => None,
    }
}

impl TokenIterator {
    /// Starting from the current token, walk back over the longest primary
    /// expression that ends right before it and return its text.
    ///
    /// The current token itself is not part of the result. If the walk reaches
    /// the first token, everything before the starting position is returned.
    pub fn extract_expression(&mut self) -> String {
        let orig = self.index();
        let mut prev = self.kind();

        loop {
            if !self.step_back() {
                return self.text(0, orig);
            }
            let current = self.kind();
            let Some(step) = accepts(current, prev) else {
                trace!(%current, %prev, "expression walk stopped");
                break;
            };
            if step == Step::Balance {
                // an unmatched closer leaves us on the first token
                self.scan_to_matching_bracket();
            }
            prev = self.kind();
        }

        self.text(self.index() + 1, orig)
    }

    /// Recover the type name in front of the enclosing `{ ... }` block, e.g.
    /// `lib.Struct` for `&lib.Struct{Whatever: 1, Hel#}` and `X` for `X{#}`.
    ///
    /// Anonymous literals such as `struct{ a int }{#}` yield `None`.
    pub fn extract_struct_type(&mut self) -> Option<String> {
        if !self.scan_to_open_brace() {
            return None;
        }
        if !self.step_back() || self.kind() != TokenKind::Ident {
            return None;
        }
        let base = self.current().literal().to_string();

        if !self.step_back() || self.kind() != TokenKind::Period {
            return Some(base);
        }
        if !self.step_back() || self.kind() != TokenKind::Ident {
            return Some(base);
        }
        Some(format!("{}.{}", self.current().literal(), base))
    }
}
