use std::fmt::{self, Display, Formatter};

use crate::{listing::Position, span::Span};

/// Where in the input an error was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// A byte range in tree text.
    Source(Span),
    /// A line in a TAC listing.
    Line(Position),
    /// The error concerns the input as a whole.
    Input,
}
impl Display for Location {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Location::Source(span) => write!(f, "bytes {:?}", span),
            Location::Line(position) => write!(f, "line {}", position.line_number()),
            Location::Input => f.write_str("input"),
        }
    }
}

pub trait PositionalError {
    fn location(&self) -> Location;
    fn describe(&self) -> String;
}
