//! The orchestrator that composes every check into the `unsat` verdict.

use crate::checks::{check_bounds, check_domains, check_equality, check_strict_order};
use crate::engine::error::Contradiction;
use crate::model::{Atom, Declaration, DerivedConstraint, FieldSpec};
use crate::propagate::{
    check_range_violations, extract_relationships, merged_atoms, propagate, propagate_ranges,
    RangeMap,
};

/// Everything one analysis run learned, for diagnostics.
///
/// `contradiction` alone decides the verdict; `derived` and `ranges` feed
/// the derivation trace and carry no semantic weight of their own.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Analysis {
    pub contradiction: Option<Contradiction>,
    pub derived: Vec<DerivedConstraint>,
    pub ranges: RangeMap,
}

impl Analysis {
    fn contradicted(contradiction: Contradiction) -> Self {
        Self { contradiction: Some(contradiction), ..Self::default() }
    }
}

/// The static constraint-satisfiability checker.
///
/// Borrows the ground facts the analyzer extracted from one schema and
/// decides whether they can ever hold simultaneously. All working state
/// is allocated fresh inside each call, so a shared checker is safe to
/// use from independent callers without locking.
pub struct UnsatChecker<'a> {
    atoms: &'a [Atom],
    declarations: &'a [Declaration],
    fields: &'a [FieldSpec],
}

impl<'a> UnsatChecker<'a> {
    pub fn new(
        atoms: &'a [Atom],
        declarations: &'a [Declaration],
        fields: &'a [FieldSpec],
    ) -> Self {
        Self { atoms, declarations, fields }
    }

    /// `true` when no assignment of input values can satisfy every
    /// declared fact at once. Total: never panics, never errors.
    pub fn unsat(&self) -> bool {
        self.check().is_some()
    }

    /// The verdict with its reason. `None` means satisfiable as far as
    /// this engine can tell.
    pub fn check(&self) -> Option<Contradiction> {
        self.analysis().contradiction
    }

    /// Runs the full pipeline, cheapest checks first, short-circuiting on
    /// the first contradiction:
    ///
    /// 1. baseline (bounds, equality, strict-order) over the raw atoms;
    /// 2. relationship extraction; no relationships, no further work;
    /// 3. range propagation and the impossibility scan;
    /// 4. equality propagation through the derivation chains;
    /// 5. derived facts against the declared field domains;
    /// 6. baseline again over atoms plus derived facts.
    pub fn analysis(&self) -> Analysis {
        if let Some(found) = baseline(self.atoms) {
            return Analysis::contradicted(found);
        }

        let relationships = extract_relationships(self.declarations);
        if relationships.is_empty() {
            return Analysis::default();
        }

        let ranges = propagate_ranges(self.fields, &relationships);
        if let Some(found) = check_range_violations(self.atoms, &ranges) {
            return Analysis { contradiction: Some(found), derived: Vec::new(), ranges };
        }

        let derived = propagate(self.atoms, &relationships);

        if let Some(found) = check_domains(self.atoms, &derived, self.fields) {
            return Analysis { contradiction: Some(found), derived, ranges };
        }

        let contradiction = baseline(&merged_atoms(self.atoms, &derived));
        Analysis { contradiction, derived, ranges }
    }

    /// Renders the human-readable derivation trace for this input. Purely
    /// diagnostic; the verdict is unaffected.
    pub fn trace(&self) -> String {
        super::trace::render(&self.analysis(), self.atoms)
    }
}

fn baseline(atoms: &[Atom]) -> Option<Contradiction> {
    check_bounds(atoms)
        .or_else(|| check_equality(atoms))
        .or_else(|| check_strict_order(atoms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CompareOp, DomainSpec, Expr, Term, Value};
    use rstest::rstest;
    use test_log::test;

    fn atom(lhs: &str, op: CompareOp, rhs: Term) -> Atom {
        Atom::new(op, Term::variable(lhs), rhs)
    }

    fn num(value: f64) -> Term {
        Term::number(value)
    }

    fn chain_declarations() -> Vec<Declaration> {
        vec![
            Declaration::new("v1", Expr::call("add", vec![Expr::variable("seed"), Expr::number(1.0)])),
            Declaration::new("v2", Expr::call("add", vec![Expr::variable("v1"), Expr::number(2.0)])),
            Declaration::new("v3", Expr::call("add", vec![Expr::variable("v2"), Expr::number(3.0)])),
        ]
    }

    fn verdict(atoms: &[Atom], declarations: &[Declaration], fields: &[FieldSpec]) -> bool {
        UnsatChecker::new(atoms, declarations, fields).unsat()
    }

    #[rstest]
    // No comparisons against constants, no relationships: nothing to refute.
    #[case(vec![atom("x", CompareOp::Gt, Term::variable("y"))], false)]
    // Bound contradiction.
    #[case(vec![atom("x", CompareOp::Gt, num(10.0)), atom("x", CompareOp::Lt, num(5.0))], true)]
    // Direct equality/strict conflict.
    #[case(vec![atom("x", CompareOp::Eq, num(5.0)), atom("x", CompareOp::Gt, num(5.0))], true)]
    // Transitive equality conflict, no direct x/z atom.
    #[case(vec![
        atom("x", CompareOp::Eq, Term::variable("y")),
        atom("y", CompareOp::Eq, Term::variable("z")),
        atom("x", CompareOp::Gt, Term::variable("z")),
    ], true)]
    // Strict-order cycle.
    #[case(vec![
        atom("a", CompareOp::Gt, Term::variable("b")),
        atom("b", CompareOp::Gt, Term::variable("c")),
        atom("c", CompareOp::Gt, Term::variable("a")),
    ], true)]
    // A consistent set stays satisfiable.
    #[case(vec![
        atom("a", CompareOp::Gt, Term::variable("b")),
        atom("a", CompareOp::Ge, num(10.0)),
        atom("b", CompareOp::Lt, num(10.0)),
    ], false)]
    #[test_log::test]
    fn test_baseline_verdicts(#[case] atoms: Vec<Atom>, #[case] expected: bool) {
        assert_eq!(verdict(&atoms, &[], &[]), expected);
    }

    #[test]
    fn test_propagation_contradicts_declared_value() {
        // v1 = seed + 1, v2 = v1 + 2, v3 = v2 + 3; seed == 0 forces
        // v3 == 6, so v3 == 10 can never hold.
        let atoms = vec![
            atom("seed", CompareOp::Eq, num(0.0)),
            atom("v3", CompareOp::Eq, num(10.0)),
        ];
        assert!(verdict(&atoms, &chain_declarations(), &[]));
    }

    #[test]
    fn test_propagation_agreeing_value_is_satisfiable() {
        let atoms = vec![
            atom("seed", CompareOp::Eq, num(0.0)),
            atom("v3", CompareOp::Eq, num(6.0)),
        ];
        assert!(!verdict(&atoms, &chain_declarations(), &[]));
    }

    #[test]
    fn test_range_violation_through_domain() {
        // age ranges over 18..=65; age > 70 is dead even with no
        // relationship touching age.
        let fields = vec![FieldSpec::new("age", Some(DomainSpec::Range { min: 18.0, max: 65.0 }))];
        let atoms = vec![atom("age", CompareOp::Gt, num(70.0))];
        let unrelated = vec![Declaration::new("bonus", Expr::variable("base"))];
        assert!(verdict(&atoms, &unrelated, &fields));
    }

    #[test]
    fn test_no_relationships_short_circuits_before_ranges() {
        // Cheap-first ordering: with zero extractable relationships the
        // pipeline stops after the baseline, range knowledge unused.
        let fields = vec![FieldSpec::new("age", Some(DomainSpec::Range { min: 18.0, max: 65.0 }))];
        let atoms = vec![atom("age", CompareOp::Gt, num(70.0))];
        assert!(!verdict(&atoms, &[], &fields));
    }

    #[test]
    fn test_derived_value_violates_field_domain() {
        // Enumerated domains seed no interval, so only the domain check
        // can see this: doubled == 8 forces tier == 4 via the reverse
        // derivation, and 4 is not an admissible tier.
        let fields = vec![FieldSpec::new(
            "tier",
            Some(DomainSpec::OneOf(vec![
                Value::Number(1.0),
                Value::Number(2.0),
                Value::Number(3.0),
            ])),
        )];
        let declarations = vec![Declaration::new(
            "doubled",
            Expr::call("mul", vec![Expr::variable("tier"), Expr::number(2.0)]),
        )];
        let atoms = vec![atom("doubled", CompareOp::Eq, num(8.0))];
        let found = UnsatChecker::new(&atoms, &declarations, &fields).check();
        assert!(matches!(found, Some(Contradiction::DomainViolation { .. })));

        let fine = vec![atom("doubled", CompareOp::Eq, num(4.0))];
        assert!(!verdict(&fine, &declarations, &fields));
    }

    #[test]
    fn test_range_check_fires_before_propagation() {
        // A ranged field caught by the interval scan reports a range
        // violation, not a domain violation.
        let fields = vec![FieldSpec::new("age", Some(DomainSpec::Range { min: 18.0, max: 65.0 }))];
        let declarations = vec![Declaration::new(
            "doubled",
            Expr::call("mul", vec![Expr::variable("age"), Expr::number(2.0)]),
        )];
        let atoms = vec![atom("doubled", CompareOp::Eq, num(200.0))];
        let found = UnsatChecker::new(&atoms, &declarations, &fields).check();
        assert!(matches!(found, Some(Contradiction::RangeViolation { .. })));
    }

    #[test]
    fn test_derived_facts_join_the_baseline_checks() {
        // alias = x copies x == 5 onto alias; alias > 5 then conflicts.
        let declarations = vec![Declaration::new("alias", Expr::variable("x"))];
        let atoms = vec![
            atom("x", CompareOp::Eq, num(5.0)),
            atom("alias", CompareOp::Gt, num(5.0)),
        ];
        assert!(verdict(&atoms, &declarations, &[]));
    }

    #[test]
    fn test_empty_input_is_satisfiable() {
        assert!(!verdict(&[], &[], &[]));
    }

    #[test]
    fn test_idempotence() {
        let atoms = vec![
            atom("seed", CompareOp::Eq, num(0.0)),
            atom("v3", CompareOp::Eq, num(10.0)),
        ];
        let declarations = chain_declarations();
        let checker = UnsatChecker::new(&atoms, &declarations, &[]);
        let first = checker.unsat();
        for _ in 0..3 {
            assert_eq!(checker.unsat(), first);
        }
    }

    #[test]
    fn test_monotonicity_adding_atoms_preserves_unsat() {
        let mut atoms = vec![
            atom("x", CompareOp::Gt, num(10.0)),
            atom("x", CompareOp::Lt, num(5.0)),
        ];
        assert!(verdict(&atoms, &[], &[]));

        atoms.push(atom("y", CompareOp::Eq, num(1.0)));
        atoms.push(atom("x", CompareOp::Eq, Term::variable("y")));
        assert!(verdict(&atoms, &[], &[]));
    }

    #[test]
    fn test_string_and_bool_atoms_flow_through_untouched() {
        let atoms = vec![
            atom("color", CompareOp::Eq, Term::Constant(Value::Str("red".into()))),
            atom("active", CompareOp::Eq, Term::Constant(Value::Bool(true))),
        ];
        assert!(!verdict(&atoms, &[], &[]));
    }

    #[test]
    fn test_contradiction_report_serializes() {
        let atoms = vec![
            atom("x", CompareOp::Gt, num(10.0)),
            atom("x", CompareOp::Lt, num(5.0)),
        ];
        let found = UnsatChecker::new(&atoms, &[], &[]).check().unwrap();
        let json = serde_json::to_value(&found).unwrap();
        assert_eq!(json["EmptyBounds"]["variable"], "x");
    }
}
