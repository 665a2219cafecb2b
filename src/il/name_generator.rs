use super::Name;

/// Hands out temporaries `t1`, `t2`, ... for a single conversion run.
pub struct NameGenerator {
    index: usize,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self { index: 0 }
    }

    /// Generates a new unique temporary name.
    pub fn next_temp(&mut self) -> Name {
        self.index += 1;
        Name::new(format!("t{}", self.index))
    }
}
