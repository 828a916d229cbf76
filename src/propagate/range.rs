//! Fixpoint interval propagation seeded from input-field domains.

use crate::engine::error::Contradiction;
use crate::model::{Atom, CompareOp, DomainSpec, FieldSpec, Term};
use crate::propagate::interval::Interval;
use crate::propagate::relation::{DeriveOp, Relationship};
use log::debug;
use std::collections::BTreeMap;

/// Variable name to its computed interval. Ephemeral, one per call.
pub type RangeMap = BTreeMap<String, Interval>;

/// Seeds ranges from numeric `Range` domains and pushes them through the
/// relationships until nothing changes (capped at `relationships.len() + 1`
/// rounds). The first interval computed for a target sticks; propagation
/// only adds knowledge.
pub(crate) fn propagate_ranges(fields: &[FieldSpec], relationships: &[Relationship]) -> RangeMap {
    let mut ranges: RangeMap = fields
        .iter()
        .filter_map(|field| match field.domain {
            Some(DomainSpec::Range { min, max }) => {
                Some((field.name.clone(), Interval::new(min, max)))
            }
            // Enumerated and opaque domains carry no usable interval.
            _ => None,
        })
        .collect();

    let round_cap = relationships.len() + 1;
    for round in 0..round_cap {
        let mut changed = false;
        for relationship in relationships {
            if ranges.contains_key(&relationship.target) {
                continue;
            }
            if let Some(interval) = transform(relationship, &ranges) {
                ranges.insert(relationship.target.clone(), interval);
                changed = true;
            }
        }
        if !changed {
            debug!("range propagation reached a fixpoint after {} round(s)", round);
            break;
        }
    }

    ranges
}

/// Maps an operand interval through one relationship.
fn transform(relationship: &Relationship, ranges: &RangeMap) -> Option<Interval> {
    match relationship.operands.as_slice() {
        [Term::Variable(name)] => ranges.get(name).copied(),
        [constant @ Term::Constant(_)] => constant.as_number().map(Interval::point),
        [a, b] => match (a.as_variable(), b.as_variable()) {
            (Some(x), None) => {
                let range = ranges.get(x)?;
                let constant = b.as_number()?;
                match relationship.op {
                    DeriveOp::Add => Some(range.shift(constant)),
                    DeriveOp::Subtract => Some(range.shift(-constant)),
                    DeriveOp::Multiply => Some(range.scale(constant)),
                    DeriveOp::Divide => range.scale_inverse(constant),
                    DeriveOp::Identity => None,
                }
            }
            (None, Some(y)) => {
                let range = ranges.get(y)?;
                let constant = a.as_number()?;
                match relationship.op {
                    DeriveOp::Add => Some(range.shift(constant)),
                    // const - [lo, hi] reflects the interval.
                    DeriveOp::Subtract => Some(range.reflect(constant)),
                    DeriveOp::Multiply => Some(range.scale(constant)),
                    // Dividing by a variable is unsupported.
                    DeriveOp::Divide | DeriveOp::Identity => None,
                }
            }
            // Interval arithmetic over two variable operands is not
            // propagated; equality propagation covers the add case.
            (Some(_), Some(_)) => None,
            (None, None) => {
                let value = relationship.op.apply(a.as_number()?, b.as_number()?)?;
                Some(Interval::point(value))
            }
        },
        _ => None,
    }
}

/// Scans every `variable op number` atom against the computed ranges and
/// reports the first comparison that can never hold.
pub(crate) fn check_range_violations(atoms: &[Atom], ranges: &RangeMap) -> Option<Contradiction> {
    for atom in atoms {
        let (variable, value, op) = match atom.numeric_comparison() {
            Some(parts) => parts,
            None => continue,
        };
        let range = match ranges.get(variable) {
            Some(range) => range,
            None => continue,
        };
        let impossible = match op {
            CompareOp::Gt => range.hi <= value,
            CompareOp::Ge => range.hi < value,
            CompareOp::Lt => range.lo >= value,
            CompareOp::Le => range.lo > value,
            CompareOp::Eq => !range.contains(value),
            CompareOp::Ne => false,
        };
        if impossible {
            return Some(Contradiction::RangeViolation {
                variable: variable.to_string(),
                op,
                value,
                lo: range.lo,
                hi: range.hi,
            });
        }
    }
    None
}
