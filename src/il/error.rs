//! Errors raised while converting tree text to TAC, or while reading TAC text back in.
use thiserror::Error;

use crate::{
    error::{Location, PositionalError},
    listing::Position,
    span::Span,
};

/// The tree text does not describe a well-formed program.
#[derive(Debug, Error, PartialEq)]
#[error("malformed expression: {reason}")]
pub struct ConvertError {
    location: Location,
    reason: Reason,
}

impl ConvertError {
    pub fn new(span: Span, reason: Reason) -> Self {
        Self {
            location: Location::Source(span),
            reason,
        }
    }

    /// An error about the shape of the input as a whole.
    pub fn whole_input(reason: Reason) -> Self {
        Self {
            location: Location::Input,
            reason,
        }
    }

    pub fn reason(&self) -> &Reason {
        &self.reason
    }
}

impl PositionalError for ConvertError {
    fn location(&self) -> Location {
        self.location
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Reason {
    #[error("`)` without a matching `(`")]
    UnmatchedClose,
    #[error("`(` is never closed")]
    Unclosed,
    #[error("the program must be a single `(main ...)` form")]
    MissingMain,
    #[error("`{form}` expects {expected} elements, found {found}")]
    Arity {
        form: String,
        expected: &'static str,
        found: usize,
    },
    #[error("`{0}` is neither an identifier nor a literal")]
    NotAnIdentifier(String),
    #[error("`{0}` is not an assignable name")]
    NotAssignable(String),
    /// TAC values are names or literals, so a form that lowers to neither cannot be an operand,
    /// even though it is accepted as a statement.
    #[error("`{0}` has no value and cannot be used as an operand")]
    NoValue(String),
    #[error("`for` expects `(for init assign (++ cond var) body)`")]
    ForShape,
    #[error("lists are nested more than {} levels deep", crate::sexpr::MAX_DEPTH)]
    TooDeep,
}

/// A line of TAC text matches none of the canonical instruction shapes.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("could not parse instruction on line {}: `{line}`", .position.line_number())]
pub struct TextError {
    position: Position,
    line: String,
}

impl TextError {
    pub fn new<S: Into<String>>(position: Position, line: S) -> Self {
        Self {
            position,
            line: line.into(),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn line(&self) -> &str {
        &self.line
    }
}

impl PositionalError for TextError {
    fn location(&self) -> Location {
        Location::Line(self.position)
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}
