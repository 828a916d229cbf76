//! Per-variable interval contradiction from ground comparisons.

use crate::engine::error::Contradiction;
use crate::model::{Atom, CompareOp};
use std::collections::BTreeMap;

/// Folds every `variable op number` atom into a running `(lower, upper)`
/// pair per variable and reports the first variable whose interval is
/// empty. Equality atoms tighten both ends at once, which is what catches
/// a variable pinned to two different constants.
///
/// The `+1`/`-1` tightening for strict operators assumes integer-typed
/// variables and is only applied when the bound constant is itself
/// integral; fractional constants tighten without adjustment, so a
/// float-valued bound can only under-approximate, never falsely conflict.
pub(crate) fn check_bounds(atoms: &[Atom]) -> Option<Contradiction> {
    let mut bounds: BTreeMap<&str, (f64, f64)> = BTreeMap::new();

    for atom in atoms {
        let (variable, value, op) = match atom.numeric_comparison() {
            Some(parts) => parts,
            None => continue,
        };
        let entry = bounds
            .entry(variable)
            .or_insert((f64::NEG_INFINITY, f64::INFINITY));

        match op {
            CompareOp::Gt => entry.0 = entry.0.max(strict_above(value)),
            CompareOp::Ge => entry.0 = entry.0.max(value),
            CompareOp::Lt => entry.1 = entry.1.min(strict_below(value)),
            CompareOp::Le => entry.1 = entry.1.min(value),
            CompareOp::Eq => {
                entry.0 = entry.0.max(value);
                entry.1 = entry.1.min(value);
            }
            // A single excluded point never empties an interval.
            CompareOp::Ne => {}
        }
    }

    bounds.into_iter().find_map(|(variable, (lower, upper))| {
        (upper < lower).then(|| Contradiction::EmptyBounds {
            variable: variable.to_string(),
            lower,
            upper,
        })
    })
}

/// Smallest admissible value above `v` under integer semantics.
fn strict_above(v: f64) -> f64 {
    if v.fract() == 0.0 {
        v + 1.0
    } else {
        v
    }
}

/// Largest admissible value below `v` under integer semantics.
fn strict_below(v: f64) -> f64 {
    if v.fract() == 0.0 {
        v - 1.0
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Term;
    use rstest::rstest;

    fn atom(lhs: &str, op: CompareOp, value: f64) -> Atom {
        Atom::new(op, Term::variable(lhs), Term::number(value))
    }

    #[rstest]
    // x > 10 and x < 5 leave nothing in between.
    #[case(vec![atom("x", CompareOp::Gt, 10.0), atom("x", CompareOp::Lt, 5.0)], true)]
    // Meeting exactly at one point is fine.
    #[case(vec![atom("x", CompareOp::Ge, 5.0), atom("x", CompareOp::Le, 5.0)], false)]
    // Strict integer tightening: x > 5 means x >= 6.
    #[case(vec![atom("x", CompareOp::Gt, 5.0), atom("x", CompareOp::Le, 5.0)], true)]
    #[case(vec![atom("x", CompareOp::Gt, 4.0), atom("x", CompareOp::Lt, 6.0)], false)]
    // Equality folds as both bounds.
    #[case(vec![atom("x", CompareOp::Eq, 5.0), atom("x", CompareOp::Eq, 10.0)], true)]
    #[case(vec![atom("x", CompareOp::Eq, 5.0), atom("x", CompareOp::Lt, 3.0)], true)]
    #[case(vec![atom("x", CompareOp::Eq, 5.0), atom("x", CompareOp::Le, 5.0)], false)]
    // Fractional constants get no integer adjustment (conservative).
    #[case(vec![atom("x", CompareOp::Gt, 2.5), atom("x", CompareOp::Lt, 2.6)], false)]
    // Independent variables do not interact.
    #[case(vec![atom("x", CompareOp::Gt, 10.0), atom("y", CompareOp::Lt, 5.0)], false)]
    fn test_bound_fold(#[case] atoms: Vec<Atom>, #[case] expect_conflict: bool) {
        assert_eq!(check_bounds(&atoms).is_some(), expect_conflict);
    }

    #[test]
    fn test_variable_on_the_right_is_flipped() {
        // 10 < x, written constant-first, is the same fact as x > 10.
        let atoms = vec![
            Atom { op: CompareOp::Lt, lhs: Term::number(10.0), rhs: Term::variable("x") },
            atom("x", CompareOp::Lt, 5.0),
        ];
        assert!(check_bounds(&atoms).is_some());
    }

    #[test]
    fn test_no_numeric_atoms_means_no_conflict() {
        let atoms = vec![Atom::new(
            CompareOp::Gt,
            Term::variable("x"),
            Term::variable("y"),
        )];
        assert_eq!(check_bounds(&atoms), None);
    }

    #[test]
    fn test_report_carries_the_empty_interval() {
        let atoms = vec![atom("x", CompareOp::Gt, 10.0), atom("x", CompareOp::Lt, 5.0)];
        match check_bounds(&atoms) {
            Some(Contradiction::EmptyBounds { variable, lower, upper }) => {
                assert_eq!(variable, "x");
                assert_eq!(lower, 11.0);
                assert_eq!(upper, 4.0);
            }
            other => panic!("expected EmptyBounds, got {:?}", other),
        }
    }
}
