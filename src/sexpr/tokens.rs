//! Tokens of the tree text. Parentheses are always tokens of their own; everything else is
//! split on whitespace.
use std::fmt::{self, Display};

use crate::span::Span;

use super::char_lexer::CharLexer;

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub source: Span,
    pub kind: TokenKind,
}
impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            TokenKind::Open => f.write_str("("),
            TokenKind::Close => f.write_str(")"),
            TokenKind::Atom(text) => f.write_str(text),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Open,
    Close,
    Atom(String),
}

fn is_paren(ch: &char) -> bool {
    *ch == '(' || *ch == ')'
}

pub fn tokenize(text: &str) -> Vec<Token> {
    let mut lexer = CharLexer::new(text);
    let mut tokens = vec![];

    loop {
        lexer.consume_while(|c| c.is_whitespace());
        let start = lexer.byte_position();
        let kind = match lexer.peek() {
            None => break,
            Some('(') => {
                lexer.try_next();
                TokenKind::Open
            }
            Some(')') => {
                lexer.try_next();
                TokenKind::Close
            }
            Some(_) => {
                TokenKind::Atom(lexer.consume_while(|c| !c.is_whitespace() && !is_paren(c)))
            }
        };
        tokens.push(Token {
            source: Span::new(start, lexer.byte_position()),
            kind,
        });
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Bytes;

    fn texts(source: &str) -> Vec<String> {
        tokenize(source).iter().map(ToString::to_string).collect()
    }

    #[test]
    fn parentheses_are_isolated() {
        assert_eq!(vec!["(", "=", "x", "5", ")"], texts("(= x 5)"));
        assert_eq!(vec!["(", "(", "a", ")", ")"], texts("((a))"));
    }

    #[test]
    fn whitespace_of_any_kind_separates_atoms() {
        assert_eq!(vec!["(", "main", "x", ")"], texts("  (main\n\tx )\r\n"));
    }

    #[test]
    fn tokens_record_their_source_range() {
        let tokens = tokenize("(<= i 10)");
        assert_eq!(Span::new(Bytes::new(1), Bytes::new(3)), tokens[1].source);
        assert_eq!("<=", tokens[1].source.lookup("(<= i 10)"));
    }

    #[test]
    fn empty_input_has_no_tokens() {
        assert!(tokenize(" \n ").is_empty());
    }
}
