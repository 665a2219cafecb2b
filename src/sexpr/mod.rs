//! The tree parser: turns parenthesised tree text into [`Node`]s.
pub(crate) mod char_lexer;
mod node;
mod parser;
mod tokens;

pub use node::*;
pub use parser::{parse, Imbalance, Tree, MAX_DEPTH};
pub use tokens::{tokenize, Token, TokenKind};

/// Tokenizes and parses tree text in one go.
pub fn read(text: &str) -> Tree {
    parse(&tokenize(text))
}
