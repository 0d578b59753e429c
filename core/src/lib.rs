//! Lexical cursor context analysis for Go source.
//!
//! [`classify`] looks at the tokens before a cursor and reports whether the
//! cursor is in an import path, after a selector, or inside a composite
//! literal, together with the text a completion engine needs for each case.

pub mod cursor;
pub mod token;

pub use cursor::{ContextKind, CursorContext, classify};
