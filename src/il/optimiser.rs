//! A single forward pass of local optimisations over a TAC listing.
//!
//! The pass performs constant propagation, copy propagation, constant folding and
//! dead-branch elimination in source order. It never builds a control-flow graph and never
//! iterates to a fixed point. Names assigned more than once anywhere in the listing are
//! never read from a binding, which keeps the pass sound across jumps.
use std::collections::HashSet;

use crate::{listing::Position, prelude::*};

use super::{
    audit::{Action, BindingKind, OptimisationLog},
    binding::{mutable_names, Binding, Bindings},
    fold::fold,
    Literal, Name, TacInstr, TacListing, Value,
};

/// An optimised listing, together with a record of every change made to it.
#[derive(Debug)]
pub struct Optimised {
    /// Removed instructions are left as tombstones, so positions still match the input.
    pub listing: TacListing,
    pub log: OptimisationLog,
}

pub fn optimise(listing: TacListing) -> Optimised {
    let mut optimiser = Optimiser::new(&listing);
    let listing = optimiser.run(listing);

    debug!(
        "Optimiser made {} changes ({} log entries)",
        optimiser.log.rewrites().count(),
        optimiser.log.len()
    );
    Optimised {
        listing,
        log: optimiser.log,
    }
}

/// What to do with an instruction once it has been processed.
enum Outcome {
    Keep,
    Replace(TacInstr),
    Remove,
}

struct Optimiser {
    mutable: HashSet<Name>,
    bindings: Bindings,
    log: OptimisationLog,
}
impl Optimiser {
    fn new(listing: &TacListing) -> Self {
        let mutable = mutable_names(listing);
        trace!("Mutable names: {:?}", mutable);

        Self {
            mutable,
            bindings: Bindings::new(),
            log: OptimisationLog::new(),
        }
    }

    fn run(&mut self, mut listing: TacListing) -> TacListing {
        for position in listing.positions() {
            let Some(instr) = listing.get_mut(position) else {
                continue;
            };

            match self.step(position, instr) {
                Outcome::Keep => (),
                Outcome::Replace(replacement) => *instr = replacement,
                Outcome::Remove => listing.remove(position),
            }

            if let Some(target) = listing.get(position).and_then(TacInstr::write).cloned() {
                self.purge_if_mutable(position, &target);
            }
        }
        listing
    }

    fn step(&mut self, position: Position, instr: &mut TacInstr) -> Outcome {
        match instr {
            TacInstr::Bin(target, op, lhs, rhs) => {
                self.substitute(position, lhs, None);
                self.substitute(position, rhs, None);

                let folded = match (lhs.as_literal(), rhs.as_literal()) {
                    (Some(lhs), Some(rhs)) if !self.is_mutable(target) => {
                        fold(*op, lhs, rhs).map(|result| (lhs, rhs, result))
                    }
                    _ => None,
                };

                self.assigned(position, target);
                match folded {
                    Some((lhs, rhs, result)) => {
                        self.log.record(
                            position,
                            Action::Folded {
                                lhs,
                                op: *op,
                                rhs,
                                result,
                            },
                        );
                        self.bindings
                            .bind(target.clone(), Binding::Constant(result));
                        Outcome::Replace(TacInstr::Assign(target.clone(), Value::Literal(result)))
                    }
                    None => Outcome::Keep,
                }
            }
            TacInstr::Assign(target, source) => {
                let binding = self.classify_source(position, target, source);
                self.assigned(position, target);
                self.bindings.bind(target.clone(), binding);
                Outcome::Keep
            }
            TacInstr::IfFalse(cond, label) => {
                self.substitute(position, cond, None);
                match cond.as_literal() {
                    Some(Literal::Bool(false)) => {
                        self.log
                            .record(position, Action::JumpSimplified { label: *label });
                        Outcome::Replace(TacInstr::Goto(*label))
                    }
                    Some(Literal::Bool(true)) => {
                        self.log.record(position, Action::DeadBranchEliminated);
                        Outcome::Remove
                    }
                    _ => Outcome::Keep,
                }
            }
            TacInstr::Goto(_) | TacInstr::Label(_) => Outcome::Keep,
        }
    }

    /// Decide what the target of `target = source` is known to hold, propagating into
    /// `source` where possible.
    fn classify_source(&mut self, position: Position, target: &Name, source: &mut Value) -> Binding {
        let name = match source {
            Value::Literal(lit) => {
                self.log.record(
                    position,
                    Action::ConstantBound {
                        target: target.clone(),
                        value: *lit,
                    },
                );
                return Binding::Constant(*lit);
            }
            Value::Name(name) => name.clone(),
        };

        match self.bindings.get(&name) {
            Binding::Constant(lit) if !self.is_mutable(&name) => {
                self.log.record(
                    position,
                    Action::ConstantPropagated {
                        from: name,
                        to: lit,
                        target: Some(target.clone()),
                    },
                );
                *source = Value::Literal(lit);
                Binding::Constant(lit)
            }
            Binding::CopyOf(alias) => {
                self.log.record(
                    position,
                    Action::CopyPropagated {
                        from: name,
                        to: alias.clone(),
                        target: Some(target.clone()),
                    },
                );
                *source = Value::Name(alias.clone());
                self.copy_of(target, alias)
            }
            _ => {
                if &name != target {
                    self.log.record(
                        position,
                        Action::CopyBound {
                            target: target.clone(),
                            source: name.clone(),
                        },
                    );
                }
                self.copy_of(target, name)
            }
        }
    }

    /// A name is never recorded as a copy of itself.
    fn copy_of(&self, target: &Name, source: Name) -> Binding {
        if &source == target {
            Binding::Unknown
        } else {
            Binding::CopyOf(source)
        }
    }

    /// Replace a read of a name with what it is bound to.
    fn substitute(&mut self, position: Position, value: &mut Value, target: Option<&Name>) {
        let Value::Name(name) = value else {
            return;
        };
        if self.is_mutable(name) {
            return;
        }

        match self.bindings.get(name) {
            Binding::Constant(lit) => {
                self.log.record(
                    position,
                    Action::ConstantPropagated {
                        from: name.clone(),
                        to: lit,
                        target: target.cloned(),
                    },
                );
                *value = Value::Literal(lit);
            }
            Binding::CopyOf(alias) => {
                self.log.record(
                    position,
                    Action::CopyPropagated {
                        from: name.clone(),
                        to: alias.clone(),
                        target: target.cloned(),
                    },
                );
                *value = Value::Name(alias);
            }
            Binding::Unknown => (),
        }
    }

    /// `target` is about to be overwritten: whatever it held before is gone, and so is every
    /// name that was a copy of it.
    fn assigned(&mut self, position: Position, target: &Name) {
        self.bindings.forget(target);
        for alias in self.bindings.forget_copies_of(target) {
            self.log.record(
                position,
                Action::CopyInvalidated {
                    alias,
                    of: target.clone(),
                },
            );
        }
    }

    /// Drop the binding of a name assigned more than once, as soon as it has been assigned.
    fn purge_if_mutable(&mut self, position: Position, target: &Name) {
        if !self.is_mutable(target) {
            return;
        }

        let was = match self.bindings.forget(target) {
            Binding::Unknown => return,
            Binding::Constant(_) => BindingKind::Constant,
            Binding::CopyOf(_) => BindingKind::Copy,
        };
        self.log.record(
            position,
            Action::MutableInvalidated {
                name: target.clone(),
                was,
            },
        );
    }

    fn is_mutable(&self, name: &Name) -> bool {
        self.mutable.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::il::{parse_tac, render};

    macro_rules! assert_optimises {
        ($tac:expr, $expected:expr) => {{
            let optimised = optimise(parse_tac($tac).unwrap());
            let lines: Vec<_> = optimised
                .listing
                .into_vec()
                .iter()
                .map(ToString::to_string)
                .collect();
            let expected: &[&str] = &$expected;

            assert_eq!(expected, lines);
            optimised.log
        }};
    }

    #[test]
    fn constants_are_propagated_into_assignments() {
        let log = assert_optimises!("x = 5\ny = x", ["x = 5", "y = 5"]);
        assert_eq!(
            vec![
                "Constant propagated: 'x' assigned constant '5' in instruction 1",
                "Constant propagated: 'x' -> '5' for 'y' in instruction 2",
            ],
            log.lines()
        );
    }

    #[test]
    fn folding_follows_propagation() {
        let log = assert_optimises!(
            "a = 2\nt1 = a * 3\nt2 = t1 + 1\nb = t2",
            ["a = 2", "t1 = 6", "t2 = 7", "b = 7"]
        );
        assert!(log
            .lines()
            .contains(&"Constant folded: '2 * 3' -> '6' in instruction 2".to_string()));
    }

    #[test]
    fn copies_are_propagated() {
        let log = assert_optimises!(
            "y = x\nt1 = y + 1\nz = y",
            ["y = x", "t1 = x + 1", "z = x"]
        );
        assert_eq!(
            vec![
                "Copy relationship established: 'y' copies 'x' in instruction 1",
                "Copy propagated: 'y' -> 'x' in instruction 2",
                "Copy propagated: 'y' -> 'x' for 'z' in instruction 3",
            ],
            log.lines()
        );
    }

    #[test]
    fn copy_chains_collapse_to_the_original() {
        assert_optimises!("b = a\nc = b\nd = c", ["b = a", "c = a", "d = a"]);
    }

    #[test]
    fn false_condition_becomes_goto() {
        let log = assert_optimises!("ifFalse False goto L1\nL1:", ["goto L1", "L1:"]);
        assert_eq!(
            vec!["Conditional jump simplified: 'ifFalse False' -> 'goto L1' in instruction 1"],
            log.lines()
        );
    }

    #[test]
    fn true_condition_is_removed() {
        let log = assert_optimises!("ifFalse True goto L1", []);
        assert_eq!(
            vec!["Dead code eliminated: 'ifFalse True' removed in instruction 1"],
            log.lines()
        );
    }

    #[test]
    fn folded_comparison_decides_the_branch() {
        assert_optimises!(
            "t1 = 3 > 5\nifFalse t1 goto L1\ny = 1\nL1:",
            ["t1 = False", "goto L1", "y = 1", "L1:"]
        );
    }

    #[test]
    fn removed_instructions_keep_original_positions() {
        let optimised = optimise(parse_tac("ifFalse True goto L1\nx = 1\nL1:").unwrap());
        assert!(optimised.listing.is_removed(Position(0)));
        assert_eq!(
            "Constant propagated: 'x' assigned constant '1' in instruction 2",
            optimised.log.lines()[1]
        );
        assert_eq!("x = 1\nL1:", render(&optimised.listing));
    }

    #[test]
    fn division_by_zero_is_left_alone() {
        let log = assert_optimises!("t1 = 1 / 0\nx = t1", ["t1 = 1 / 0", "x = t1"]);
        assert!(log.rewrites().next().is_none());
    }

    #[test]
    fn unresolved_operands_are_not_folded() {
        assert_optimises!(
            "t2 = x <= 1\nifFalse t2 goto L1\nt1 = 10\ngoto L2\nL1:\nt1 = 20\nL2:\nr = t1",
            [
                "t2 = x <= 1",
                "ifFalse t2 goto L1",
                "t1 = 10",
                "goto L2",
                "L1:",
                "t1 = 20",
                "L2:",
                "r = t1",
            ]
        );
    }

    #[test]
    fn mutable_names_are_never_propagated() {
        let log = assert_optimises!(
            "i = 0\nL1:\nt1 = i < 3\nifFalse t1 goto L2\nt2 = i + 1\ni = t2\ngoto L1\nL2:",
            [
                "i = 0",
                "L1:",
                "t1 = i < 3",
                "ifFalse t1 goto L2",
                "t2 = i + 1",
                "i = t2",
                "goto L1",
                "L2:",
            ]
        );
        assert!(log
            .lines()
            .contains(&"Variable 'i' marked mutable; constant invalidated at instruction 1".to_string()));
        assert!(log
            .rewrites()
            .all(|entry| !entry.to_string().contains("'i' ->")));
    }

    #[test]
    fn mutable_targets_are_not_folded() {
        assert_optimises!("x = 1 + 2\nx = 4", ["x = 1 + 2", "x = 4"]);
    }

    #[test]
    fn copies_of_a_reassigned_name_are_dropped() {
        let log = assert_optimises!(
            "y = x\nx = 5\nz = y",
            ["y = x", "x = 5", "z = y"]
        );
        assert!(log.lines().contains(
            &"Copy invalidated: 'y' no longer copies 'x' at instruction 2".to_string()
        ));
    }

    #[test]
    fn labels_and_gotos_are_untouched() {
        let log = assert_optimises!("L1:\ngoto L1", ["L1:", "goto L1"]);
        assert!(log.is_empty());
    }

    #[test]
    fn second_pass_has_nothing_to_do() {
        let source = "a = 4\nb = a\nt1 = b * 2\nc = t1\nt2 = c > 7\nifFalse t2 goto L1\nd = e\nf = d\nL1:";
        let first = optimise(parse_tac(source).unwrap());
        let once = render(&first.listing);

        let second = optimise(parse_tac(&once).unwrap());
        assert_eq!(once, render(&second.listing));
        assert!(second.log.rewrites().next().is_none());
    }
}
