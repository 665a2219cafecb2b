//! What the optimiser knows about each name at a point in the pass.
use std::collections::{HashMap, HashSet};

use super::{Literal, Name, TacListing};

/// The value a name is known to hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Unknown,
    Constant(Literal),
    CopyOf(Name),
}

/// One [`Binding`] per name. Names without an entry are [`Binding::Unknown`].
#[derive(Debug, Default)]
pub struct Bindings {
    map: HashMap<Name, Binding>,
}
impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &Name) -> Binding {
        self.map.get(name).cloned().unwrap_or(Binding::Unknown)
    }

    pub fn bind(&mut self, name: Name, binding: Binding) {
        match binding {
            Binding::Unknown => {
                self.map.remove(&name);
            }
            binding => {
                self.map.insert(name, binding);
            }
        }
    }

    /// Forgets what is known about `name`, returning the binding it had.
    pub fn forget(&mut self, name: &Name) -> Binding {
        self.map.remove(name).unwrap_or(Binding::Unknown)
    }

    /// Forgets every name that is a copy of `name`. Returns those names in sorted order.
    pub fn forget_copies_of(&mut self, name: &Name) -> Vec<Name> {
        let mut aliases: Vec<Name> = self
            .map
            .iter()
            .filter(|(_, binding)| matches!(binding, Binding::CopyOf(source) if source == name))
            .map(|(alias, _)| alias.clone())
            .collect();
        aliases.sort();

        for alias in &aliases {
            self.map.remove(alias);
        }
        aliases
    }
}

/// Names assigned more than once anywhere in the listing.
pub fn mutable_names(listing: &TacListing) -> HashSet<Name> {
    let mut counts: HashMap<&Name, usize> = HashMap::new();
    for instr in listing.iter_instructions() {
        if let Some(target) = instr.write() {
            *counts.entry(target).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| name.clone())
        .collect()
}
