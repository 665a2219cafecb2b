use std::ops::Add;

/// A position in a listing, indicated by a zero-based line index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position(pub usize);

impl Position {
    /// The one-based line number of this position, as shown to users.
    pub fn line_number(&self) -> usize {
        self.0 + 1
    }
}

impl Add<usize> for Position {
    type Output = Self;

    fn add(self, rhs: usize) -> Self::Output {
        Self(self.0 + rhs)
    }
}
