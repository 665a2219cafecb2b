//! Generic logic for code listings.
//!
//! Removing a line from a [`Listing`] leaves a tombstone behind, so every surviving line keeps
//! the [`Position`] it was pushed at. Removed lines only disappear when the listing is
//! projected with [`Listing::into_vec`] or iterated.
mod position;

use std::slice::Iter;

pub use position::Position;

#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T> {
    lines: Vec<Option<T>>,
}

impl<T> Listing<T> {
    pub fn new() -> Self {
        Self { lines: vec![] }
    }

    pub fn push(&mut self, line: T) {
        self.lines.push(Some(line));
    }

    /// Marks the line at `position` as removed.
    pub fn remove(&mut self, position: Position) {
        if let Some(line) = self.lines.get_mut(position.0) {
            *line = None;
        }
    }

    pub fn is_removed(&self, position: Position) -> bool {
        matches!(self.lines.get(position.0), Some(None))
    }

    pub fn get(&self, position: Position) -> Option<&T> {
        self.lines.get(position.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, position: Position) -> Option<&mut T> {
        self.lines.get_mut(position.0).and_then(Option::as_mut)
    }

    /// Every position ever pushed, removed or not.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        (0..self.lines.len()).map(Position)
    }

    /// Iterates over the surviving lines together with their original positions.
    pub fn iter_lines(&self) -> LinesIter<T> {
        LinesIter {
            inner: self.lines.iter(),
            position: Position(0),
        }
    }

    pub fn iter_instructions(&self) -> impl Iterator<Item = &T> {
        self.iter_lines().map(|(_, line)| line)
    }

    /// The number of lines ever pushed, including removed ones.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Projects the surviving lines, dropping tombstones.
    pub fn into_vec(self) -> Vec<T> {
        self.lines.into_iter().flatten().collect()
    }
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for Listing<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().map(Some).collect(),
        }
    }
}

pub struct LinesIter<'item, T> {
    inner: Iter<'item, Option<T>>,
    position: Position,
}

impl<'item, T> Iterator for LinesIter<'item, T> {
    type Item = (Position, &'item T);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.inner.next()?;
            let current = self.position;
            self.position = current + 1;
            if let Some(line) = line {
                return Some((current, line));
            }
        }
    }
}
