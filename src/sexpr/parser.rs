//! Recursive-descent parsing of a token stream into a [`Tree`].
//!
//! Parsing never fails. Unbalanced input produces a partial tree, and the first imbalance that
//! was encountered is recorded on the [`Tree`] so that callers can reject it.
use crate::span::Span;

use super::{node::*, tokens::*};

/// How deeply lists may be nested. Anything deeper is skipped and reported as
/// [`Imbalance::TooDeep`], which keeps the parser and everything walking the tree off the end
/// of the stack.
pub const MAX_DEPTH: usize = 256;

/// The top-level nodes parsed from a token stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    pub nodes: Vec<Node>,
    pub imbalance: Option<Imbalance>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Imbalance {
    /// A `)` without a matching `(`. Parsing stops at this token.
    UnmatchedClose(Span),
    /// A `(` that is still open at the end of the input.
    Unclosed(Span),
    /// A `(` nested more than [`MAX_DEPTH`] levels deep.
    TooDeep(Span),
}

pub fn parse(tokens: &[Token]) -> Tree {
    Parser::new(tokens).run()
}

struct Parser<'t> {
    tokens: std::slice::Iter<'t, Token>,
    imbalance: Option<Imbalance>,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens: tokens.iter(),
            imbalance: None,
        }
    }

    fn run(mut self) -> Tree {
        let mut nodes = vec![];
        while let Some(token) = self.tokens.next() {
            match &token.kind {
                TokenKind::Open => nodes.push(Node::List(self.list(token.source, 1))),
                TokenKind::Close => {
                    self.note(Imbalance::UnmatchedClose(token.source));
                    break;
                }
                TokenKind::Atom(text) => nodes.push(atom(text, token.source)),
            }
        }

        Tree {
            nodes,
            imbalance: self.imbalance,
        }
    }

    /// Parses the items of a list whose opening parenthesis has already been consumed.
    fn list(&mut self, open: Span, depth: usize) -> List {
        if depth > MAX_DEPTH {
            self.note(Imbalance::TooDeep(open));
            return self.skip(open);
        }

        let mut items = vec![];
        let mut span = open;
        loop {
            let Some(token) = self.tokens.next() else {
                self.note(Imbalance::Unclosed(open));
                return List { items, span };
            };
            span = span.to(token.source);
            match &token.kind {
                TokenKind::Open => {
                    let inner = self.list(token.source, depth + 1);
                    span = span.to(inner.span);
                    items.push(Node::List(inner));
                }
                TokenKind::Close => return List { items, span },
                TokenKind::Atom(text) => items.push(atom(text, token.source)),
            }
        }
    }

    /// Skips to the `)` closing `open` without building anything, returning an empty list.
    fn skip(&mut self, open: Span) -> List {
        let mut span = open;
        let mut open_lists = 1usize;
        for token in self.tokens.by_ref() {
            span = span.to(token.source);
            match token.kind {
                TokenKind::Open => open_lists += 1,
                TokenKind::Close => {
                    open_lists -= 1;
                    if open_lists == 0 {
                        break;
                    }
                }
                TokenKind::Atom(_) => (),
            }
        }
        if open_lists > 0 {
            self.note(Imbalance::Unclosed(open));
        }
        List { items: vec![], span }
    }

    fn note(&mut self, imbalance: Imbalance) {
        self.imbalance.get_or_insert(imbalance);
    }
}

fn atom(text: &str, span: Span) -> Node {
    Node::Atom(Atom {
        text: text.to_string(),
        span,
    })
}
