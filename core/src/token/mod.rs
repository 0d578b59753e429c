//! Go lexer: token kinds, the streaming tokenizer and source positions.

mod lexer;
mod position;


pub use lexer::{Token, TokenKind, Tokenizer};
pub use position::{Position, Span, offset_to_position, position_to_offset};
