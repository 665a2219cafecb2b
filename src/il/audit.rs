//! The optimiser's record of what it did, in pass order.
use std::fmt::{self, Display, Formatter};

use crate::{listing::Position, prelude::*};

use super::{BinOp, Label, Literal, Name};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A name was assigned a literal and is now known to hold it.
    ConstantBound { target: Name, value: Literal },
    /// A read of `from` was replaced with the literal it holds. `target` is set when the
    /// read was the source of a simple assignment.
    ConstantPropagated {
        from: Name,
        to: Literal,
        target: Option<Name>,
    },
    /// A name was assigned another name and is now known to be a copy of it.
    CopyBound { target: Name, source: Name },
    /// A read of `from` was replaced with the name it copies.
    CopyPropagated {
        from: Name,
        to: Name,
        target: Option<Name>,
    },
    Folded {
        lhs: Literal,
        op: BinOp,
        rhs: Literal,
        result: Literal,
    },
    /// `ifFalse False` became an unconditional jump.
    JumpSimplified { label: Label },
    /// `ifFalse True` was removed.
    DeadBranchEliminated,
    /// A binding of a name assigned more than once was dropped after one of its assignments.
    MutableInvalidated { name: Name, was: BindingKind },
    /// A copy was dropped because the name it copies was reassigned.
    CopyInvalidated { alias: Name, of: Name },
}

/// The kind of binding that was invalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Constant,
    Copy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub position: Position,
    pub action: Action,
}
impl LogEntry {
    /// Whether this entry changed an instruction, as opposed to recording what became known.
    pub fn is_rewrite(&self) -> bool {
        matches!(
            self.action,
            Action::ConstantPropagated { .. }
                | Action::CopyPropagated { .. }
                | Action::Folded { .. }
                | Action::JumpSimplified { .. }
                | Action::DeadBranchEliminated
        )
    }
}
impl Display for LogEntry {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let n = self.position.line_number();
        match &self.action {
            Action::ConstantBound { target, value } => write!(
                f,
                "Constant propagated: '{target}' assigned constant '{value}' in instruction {n}"
            ),
            Action::ConstantPropagated { from, to, target } => {
                write!(f, "Constant propagated: '{from}' -> '{to}'")?;
                if let Some(target) = target {
                    write!(f, " for '{target}'")?;
                }
                write!(f, " in instruction {n}")
            }
            Action::CopyBound { target, source } => write!(
                f,
                "Copy relationship established: '{target}' copies '{source}' in instruction {n}"
            ),
            Action::CopyPropagated { from, to, target } => {
                write!(f, "Copy propagated: '{from}' -> '{to}'")?;
                if let Some(target) = target {
                    write!(f, " for '{target}'")?;
                }
                write!(f, " in instruction {n}")
            }
            Action::Folded {
                lhs,
                op,
                rhs,
                result,
            } => write!(
                f,
                "Constant folded: '{lhs} {op} {rhs}' -> '{result}' in instruction {n}"
            ),
            Action::JumpSimplified { label } => write!(
                f,
                "Conditional jump simplified: 'ifFalse False' -> 'goto {label}' in instruction {n}"
            ),
            Action::DeadBranchEliminated => write!(
                f,
                "Dead code eliminated: 'ifFalse True' removed in instruction {n}"
            ),
            Action::MutableInvalidated { name, was } => {
                let kind = match was {
                    BindingKind::Constant => "constant",
                    BindingKind::Copy => "copy",
                };
                write!(
                    f,
                    "Variable '{name}' marked mutable; {kind} invalidated at instruction {n}"
                )
            }
            Action::CopyInvalidated { alias, of } => write!(
                f,
                "Copy invalidated: '{alias}' no longer copies '{of}' at instruction {n}"
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptimisationLog {
    entries: Vec<LogEntry>,
}
impl OptimisationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, position: Position, action: Action) {
        let entry = LogEntry { position, action };
        trace!("{}", entry);
        self.entries.push(entry);
    }

    /// The entries that changed an instruction.
    pub fn rewrites(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(|entry| entry.is_rewrite())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Each entry rendered on its own line.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }
}
impl Display for OptimisationLog {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_reported_one_based() {
        let entry = LogEntry {
            position: Position(0),
            action: Action::DeadBranchEliminated,
        };
        assert_eq!(
            "Dead code eliminated: 'ifFalse True' removed in instruction 1",
            entry.to_string()
        );
        assert!(entry.is_rewrite());
    }

    #[test]
    fn propagation_into_an_assignment_names_the_target() {
        let entry = LogEntry {
            position: Position(1),
            action: Action::ConstantPropagated {
                from: Name::new("x"),
                to: Literal::Int(5),
                target: Some(Name::new("y")),
            },
        };
        assert_eq!(
            "Constant propagated: 'x' -> '5' for 'y' in instruction 2",
            entry.to_string()
        );
    }

    #[test]
    fn bindings_are_not_rewrites() {
        let entry = LogEntry {
            position: Position(0),
            action: Action::CopyBound {
                target: Name::new("y"),
                source: Name::new("x"),
            },
        };
        assert!(!entry.is_rewrite());
    }
}
