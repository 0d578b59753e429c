//! Cursor context classification.
//!
//! Given a buffer and a byte offset, decide from the tokens before the cursor
//! whether the user is typing an import path, a selector after `expr.`, a field
//! inside a composite literal, or none of these, and extract the text a
//! completion engine needs for each case.

mod balance;
mod extract;
mod iter;


use serde::Serialize;
use tracing::debug;

use crate::token::TokenKind;

pub use balance::opener_for;
pub use extract::{Step, accepts};
pub use iter::{TokenIterator, join_literals};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ContextKind {
    Unknown,
    Import,
    Select,
    CompositeLiteral,
}

impl ContextKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ContextKind::Unknown => "unknown",
            ContextKind::Import => "import",
            ContextKind::Select => "select",
            ContextKind::CompositeLiteral => "compositeLiteral",
        }
    }
}

impl std::fmt::Display for ContextKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the cursor is, and what was extracted around it.
///
/// `partial` is the part of the identifier already typed at the cursor; an
/// empty string means nothing has been typed yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "context", rename_all = "camelCase")]
pub enum CursorContext {
    /// No context could be recognised.
    Unknown { partial: String },
    /// Inside the string of an import declaration; `path` is the text between
    /// the opening quote and the cursor.
    Import { path: String },
    /// After `expr.`; `expr` is `None` when nothing usable precedes the period.
    Select { expr: Option<String>, partial: String },
    /// Inside a `T{...}` field list; `type_name` is `None` for anonymous
    /// literals or when no opening brace was found.
    CompositeLiteral {
        #[serde(rename = "typeName")]
        type_name: Option<String>,
        partial: String,
    },
}

impl CursorContext {
    fn unknown() -> Self {
        CursorContext::Unknown { partial: String::new() }
    }

    pub fn kind(&self) -> ContextKind {
        match self {
            CursorContext::Unknown { .. } => ContextKind::Unknown,
            CursorContext::Import { .. } => ContextKind::Import,
            CursorContext::Select { .. } => ContextKind::Select,
            CursorContext::CompositeLiteral { .. } => ContextKind::CompositeLiteral,
        }
    }

    /// Preceding expression or enclosing type name, `""` when absent.
    pub fn expression(&self) -> &str {
        match self {
            CursorContext::Select { expr, .. } => expr.as_deref().unwrap_or(""),
            CursorContext::CompositeLiteral { type_name, .. } => type_name.as_deref().unwrap_or(""),
            CursorContext::Unknown { .. } | CursorContext::Import { .. } => "",
        }
    }

    /// Text typed at the cursor: the identifier prefix, or the import path
    /// prefix for `Import`.
    pub fn partial(&self) -> &str {
        match self {
            CursorContext::Unknown { partial }
            | CursorContext::Select { partial, .. }
            | CursorContext::CompositeLiteral { partial, .. } => partial,
            CursorContext::Import { path } => path,
        }
    }
}

/// Classify the cursor at byte offset `cursor` in `source`.
///
/// Never fails: anything that cannot be recognised degrades to
/// [`CursorContext::Unknown`]. Offsets past the end are clamped and offsets
/// inside a multi-byte character are moved to its start.
pub fn classify(source: &str, cursor: usize) -> CursorContext {
    let Some((mut iter, offset)) = TokenIterator::scan(source, cursor) else {
        debug!(cursor, "no tokens before cursor");
        return CursorContext::unknown();
    };
    let tokens = iter.len();
    let ctx = classify_tokens(&mut iter, offset);
    debug!(
        cursor,
        tokens,
        kind = %ctx.kind(),
        expr = ctx.expression(),
        partial = ctx.partial(),
        "classified cursor"
    );
    ctx
}

fn classify_tokens(iter: &mut TokenIterator, offset: usize) -> CursorContext {
    if iter.kind() == TokenKind::String {
        return classify_string(iter, offset);
    }

    let mut partial = String::new();
    let tok = iter.current();
    if matches!(
        tok.kind,
        TokenKind::Ident | TokenKind::Type | TokenKind::Const | TokenKind::Var | TokenKind::Func | TokenKind::Package
    ) {
        let lit = tok.literal();
        if tok.kind == TokenKind::Ident {
            // Cursor separated from the word by whitespace: no context at all.
            if offset > lit.len() {
                return CursorContext::unknown();
            }
            partial.push_str(&lit[..offset]);
        } else {
            partial.push_str(lit);
        }

        if !iter.step_back() {
            return CursorContext::Unknown { partial };
        }
    }

    match iter.kind() {
        TokenKind::Period => {
            let expr = iter.extract_expression();
            CursorContext::Select {
                expr: (!expr.is_empty()).then_some(expr),
                partial,
            }
        }
        // &Struct{Hello: 1, Wor#}
        TokenKind::Comma | TokenKind::LBrace => CursorContext::CompositeLiteral {
            type_name: iter.extract_struct_type(),
            partial,
        },
        _ => CursorContext::Unknown { partial },
    }
}

fn classify_string(iter: &mut TokenIterator, offset: usize) -> CursorContext {
    let tok = iter.current().clone();
    let lit = tok.literal();

    // The cursor has to be inside the quotes. An unterminated literal runs up
    // to the cursor, so its very end still counts.
    let inside = offset < lit.len() || (offset == lit.len() && tok.is_unterminated_string());
    if !inside || !in_import_decl(iter) {
        return CursorContext::unknown();
    }

    CursorContext::Import {
        path: lit.get(1..offset).unwrap_or_default().to_string(),
    }
}

/// Walk back from an import path string to the `import` keyword, allowing an
/// alias, a `(` group opener and earlier `"path";` entries of the group.
fn in_import_decl(iter: &mut TokenIterator) -> bool {
    loop {
        if !iter.step_back() {
            return false;
        }
        // alias such as `f "fmt"` or `. "fmt"`
        if matches!(iter.kind(), TokenKind::Ident | TokenKind::Period) && !iter.step_back() {
            return false;
        }
        if iter.kind() == TokenKind::Semicolon {
            if !iter.step_back() || iter.kind() != TokenKind::String {
                return false;
            }
            continue;
        }
        if iter.kind() == TokenKind::LParen && !iter.step_back() {
            return false;
        }
        return iter.kind() == TokenKind::Import;
    }
}
