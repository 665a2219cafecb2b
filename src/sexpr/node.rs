//! The expression tree produced by the tree parser.
use std::fmt::{self, Display, Formatter};

use crate::span::Span;

/// A node of the expression tree: either a single atom or a parenthesised list of nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Atom(Atom),
    List(List),
}
impl Node {
    pub fn span(&self) -> Span {
        match self {
            Node::Atom(atom) => atom.span,
            Node::List(list) => list.span,
        }
    }

    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Node::Atom(atom) => Some(atom),
            Node::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Node::Atom(_) => None,
            Node::List(list) => Some(list),
        }
    }
}
impl Display for Node {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Node::Atom(atom) => atom.fmt(f),
            Node::List(list) => list.fmt(f),
        }
    }
}

/// A terminal token: an identifier, a numeric literal or a boolean literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    pub text: String,
    pub span: Span,
}
impl Display for Atom {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub items: Vec<Node>,
    /// Runs from the opening parenthesis to the closing one, or to the last item if the list
    /// was never closed.
    pub span: Span,
}
impl List {
    /// The leading atom of the list, which selects the kind of form it is.
    pub fn tag(&self) -> Option<&str> {
        self.items
            .first()
            .and_then(Node::as_atom)
            .map(|atom| atom.text.as_str())
    }

    /// Everything after the tag.
    pub fn args(&self) -> &[Node] {
        self.items.get(1..).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
impl Display for List {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str("(")?;
        for (idx, item) in self.items.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            item.fmt(f)?;
        }
        f.write_str(")")
    }
}
