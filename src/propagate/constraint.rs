//! Fixpoint equality propagation through derivation relationships.
//!
//! Each round rebuilds the map of known numeric equalities from the
//! original atoms plus everything derived so far, then walks every
//! relationship forward (operands known, derive the target) and in
//! reverse (target known, solve for the unknown operand). A variable can
//! accumulate several known values, and derivation fans out over all of
//! them; conflicting values are exactly what the final baseline re-run
//! turns into a verdict. The loop only ever adds facts and is capped at
//! `relationships.len() + 1` rounds, so termination is structural.

use crate::model::{Atom, DerivedConstraint, Term};
use crate::propagate::relation::{DeriveOp, Relationship};
use log::debug;
use std::collections::BTreeMap;

/// A known numeric equality with its provenance chain.
#[derive(Debug, Clone)]
struct Known {
    value: f64,
    path: Vec<String>,
}

/// Rebuilt once per round: variable name to every equality known for it.
/// Declared atoms come before derived facts.
type KnownMap<'a> = BTreeMap<&'a str, Vec<Known>>;

fn known_equalities<'a>(atoms: &'a [Atom], derived: &'a [DerivedConstraint]) -> KnownMap<'a> {
    let mut known: KnownMap = BTreeMap::new();
    for atom in atoms {
        if let Some((variable, value)) = atom.equality_binding() {
            if let Some(number) = value.as_number() {
                known
                    .entry(variable)
                    .or_default()
                    .push(Known { value: number, path: Vec::new() });
            }
        }
    }
    for constraint in derived {
        known.entry(constraint.variable.as_str()).or_default().push(Known {
            value: constraint.value,
            path: constraint.path.clone(),
        });
    }
    known
}

fn known_values<'k>(known: &'k KnownMap, name: &str) -> &'k [Known] {
    known.get(name).map(Vec::as_slice).unwrap_or(&[])
}

pub(crate) fn propagate(atoms: &[Atom], relationships: &[Relationship]) -> Vec<DerivedConstraint> {
    let mut derived: Vec<DerivedConstraint> = Vec::new();
    let round_cap = relationships.len() + 1;

    for round in 0..round_cap {
        let known = known_equalities(atoms, &derived);
        let mut candidates: Vec<DerivedConstraint> = Vec::new();

        for relationship in relationships {
            forward(relationship, &known, &mut candidates);
            reverse(relationship, &known, &mut candidates);
        }

        let mut fresh: Vec<DerivedConstraint> = Vec::new();
        for candidate in candidates {
            push_if_new(&mut fresh, candidate, atoms, &derived);
        }

        if fresh.is_empty() {
            debug!("equality propagation reached a fixpoint after {} round(s)", round);
            break;
        }
        debug!("equality propagation round {}: {} new fact(s)", round + 1, fresh.len());
        derived.extend(fresh);
    }

    derived
}

/// Derive the target from known operands.
fn forward(relationship: &Relationship, known: &KnownMap, out: &mut Vec<DerivedConstraint>) {
    let target = relationship.target.as_str();
    match relationship.operands.as_slice() {
        // Identity: the target mirrors its operand.
        [Term::Variable(name)] => {
            for source in known_values(known, name) {
                out.push(fact(target, source.value, via(&source.path, name)));
            }
        }
        [constant @ Term::Constant(_)] => {
            if let Some(value) = constant.as_number() {
                out.push(fact(target, value, Vec::new()));
            }
        }
        [a, b] => match (a.as_variable(), b.as_variable()) {
            (Some(x), None) => {
                let constant = match b.as_number() {
                    Some(c) => c,
                    None => return,
                };
                for source in known_values(known, x) {
                    if let Some(value) = relationship.op.apply(source.value, constant) {
                        out.push(fact(target, value, via(&source.path, x)));
                    }
                }
            }
            (None, Some(y)) => {
                let constant = match a.as_number() {
                    Some(c) => c,
                    None => return,
                };
                for source in known_values(known, y) {
                    let value = match relationship.op {
                        DeriveOp::Add => Some(constant + source.value),
                        // Direction-aware: const - var.
                        DeriveOp::Subtract => Some(constant - source.value),
                        DeriveOp::Multiply => Some(constant * source.value),
                        // A variable in the divisor is unsupported.
                        DeriveOp::Divide | DeriveOp::Identity => None,
                    };
                    if let Some(value) = value {
                        out.push(fact(target, value, via(&source.path, y)));
                    }
                }
            }
            // Two-variable operands: addition only. Subtract, multiply
            // and divide over two variables derive nothing.
            (Some(x), Some(y)) => {
                if relationship.op != DeriveOp::Add {
                    return;
                }
                for sx in known_values(known, x) {
                    for sy in known_values(known, y) {
                        let mut path = via(&sx.path, x);
                        path.extend(via(&sy.path, y));
                        out.push(fact(target, sx.value + sy.value, path));
                    }
                }
            }
            // Both operands literal: plain constant folding.
            (None, None) => {
                if let (Some(a), Some(b)) = (a.as_number(), b.as_number()) {
                    if let Some(value) = relationship.op.apply(a, b) {
                        out.push(fact(target, value, Vec::new()));
                    }
                }
            }
        },
        _ => {}
    }
}

/// Solve a relationship with a known target for its unknown operand.
fn reverse(relationship: &Relationship, known: &KnownMap, out: &mut Vec<DerivedConstraint>) {
    let targets = known_values(known, relationship.target.as_str());
    if targets.is_empty() {
        return;
    }
    let through = relationship.target.as_str();

    match relationship.operands.as_slice() {
        [Term::Variable(name)] => {
            if known.contains_key(name.as_str()) {
                return;
            }
            for target in targets {
                out.push(fact(name, target.value, via(&target.path, through)));
            }
        }
        [Term::Constant(_)] => {}
        [a, b] => match (a.as_variable(), b.as_variable()) {
            (Some(x), None) if !known.contains_key(x) => {
                let constant = match b.as_number() {
                    Some(c) => c,
                    None => return,
                };
                for target in targets {
                    let value = match relationship.op {
                        DeriveOp::Add => Some(target.value - constant),
                        // var - const = T  =>  var = T + const.
                        DeriveOp::Subtract => Some(target.value + constant),
                        DeriveOp::Multiply => (constant != 0.0).then(|| target.value / constant),
                        // var / const = T  =>  var = T * const.
                        DeriveOp::Divide => (constant != 0.0).then(|| target.value * constant),
                        DeriveOp::Identity => None,
                    };
                    if let Some(value) = value {
                        out.push(fact(x, value, via(&target.path, through)));
                    }
                }
            }
            (None, Some(y)) if !known.contains_key(y) => {
                let constant = match a.as_number() {
                    Some(c) => c,
                    None => return,
                };
                for target in targets {
                    let value = match relationship.op {
                        DeriveOp::Add => Some(target.value - constant),
                        // const - var = T  =>  var = const - T.
                        DeriveOp::Subtract => Some(constant - target.value),
                        DeriveOp::Multiply => (constant != 0.0).then(|| target.value / constant),
                        // const / var cannot be solved here.
                        DeriveOp::Divide | DeriveOp::Identity => None,
                    };
                    if let Some(value) = value {
                        out.push(fact(y, value, via(&target.path, through)));
                    }
                }
            }
            (Some(x), Some(y)) => {
                if relationship.op != DeriveOp::Add {
                    return;
                }
                // Solve for whichever side is entirely unknown.
                match (known.get(x), known.get(y)) {
                    (Some(sx), None) => {
                        for target in targets {
                            for source in sx {
                                out.push(fact(y, target.value - source.value, via(&target.path, through)));
                            }
                        }
                    }
                    (None, Some(sy)) => {
                        for target in targets {
                            for source in sy {
                                out.push(fact(x, target.value - source.value, via(&target.path, through)));
                            }
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        },
        _ => {}
    }
}

fn fact(variable: &str, value: f64, path: Vec<String>) -> DerivedConstraint {
    DerivedConstraint { variable: variable.to_string(), value, path }
}

fn via(path: &[String], step: &str) -> Vec<String> {
    let mut extended = path.to_vec();
    extended.push(step.to_string());
    extended
}

/// Deduplicate against the declared atoms, earlier rounds, and the
/// current round before admitting a fact.
fn push_if_new(
    fresh: &mut Vec<DerivedConstraint>,
    candidate: DerivedConstraint,
    atoms: &[Atom],
    derived: &[DerivedConstraint],
) {
    let declared = atoms.iter().any(|atom| {
        atom.equality_binding()
            .and_then(|(variable, value)| value.as_number().map(|v| (variable, v)))
            == Some((candidate.variable.as_str(), candidate.value))
    });
    let seen = |c: &DerivedConstraint| c.variable == candidate.variable && c.value == candidate.value;
    if !declared && !derived.iter().any(seen) && !fresh.iter().any(seen) {
        fresh.push(candidate);
    }
}

/// Folds derived facts back into atom form for the final baseline re-run.
pub(crate) fn merged_atoms(atoms: &[Atom], derived: &[DerivedConstraint]) -> Vec<Atom> {
    atoms
        .iter()
        .cloned()
        .chain(derived.iter().map(DerivedConstraint::as_atom))
        .collect()
}
