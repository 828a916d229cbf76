use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A literal payload carried by a [`Term::Constant`].
///
/// Numeric literals are `f64` throughout the engine; the strict-bound
/// integer adjustment in the bounds check only applies to integral values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Number(f64),
    Str(String),
    Bool(bool),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "\"{}\"", s),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// One side of a ground relation: a named variable or a literal constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Term {
    Variable(String),
    Constant(Value),
}

impl Term {
    pub fn variable(name: impl Into<String>) -> Self {
        Term::Variable(name.into())
    }

    pub fn number(value: f64) -> Self {
        Term::Constant(Value::Number(value))
    }

    pub fn as_variable(&self) -> Option<&str> {
        match self {
            Term::Variable(name) => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Term::Constant(value) => value.as_number(),
            _ => None,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Term::Constant(_))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(name) => write!(f, "{}", name),
            Term::Constant(value) => write!(f, "{}", value),
        }
    }
}

/// The comparison operator of an [`Atom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl CompareOp {
    /// The operator that preserves meaning when both sides swap.
    /// `Eq`/`Ne` are order-independent.
    pub fn flipped(self) -> Self {
        match self {
            CompareOp::Gt => CompareOp::Lt,
            CompareOp::Lt => CompareOp::Gt,
            CompareOp::Ge => CompareOp::Le,
            CompareOp::Le => CompareOp::Ge,
            other => other,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Ge => ">=",
            CompareOp::Le => "<=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A ground binary relation asserted to hold: `lhs op rhs`.
///
/// Construction through [`Atom::new`] normalizes the fact so that a
/// variable lands on the left side whenever one side is a constant. The
/// checks still tolerate un-normalized atoms built by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    pub op: CompareOp,
    pub lhs: Term,
    pub rhs: Term,
}

impl Atom {
    pub fn new(op: CompareOp, lhs: Term, rhs: Term) -> Self {
        if lhs.is_constant() && matches!(rhs, Term::Variable(_)) {
            Self { op: op.flipped(), lhs: rhs, rhs: lhs }
        } else {
            Self { op, lhs, rhs }
        }
    }

    /// Views the atom as `variable op number`, flipping the operator when
    /// the variable sits on the right. `None` for any other shape.
    pub fn numeric_comparison(&self) -> Option<(&str, f64, CompareOp)> {
        match (&self.lhs, &self.rhs) {
            (Term::Variable(name), Term::Constant(c)) => {
                c.as_number().map(|v| (name.as_str(), v, self.op))
            }
            (Term::Constant(c), Term::Variable(name)) => {
                c.as_number().map(|v| (name.as_str(), v, self.op.flipped()))
            }
            _ => None,
        }
    }

    /// Views an equality atom as `variable == constant`, any constant kind.
    pub fn equality_binding(&self) -> Option<(&str, &Value)> {
        if self.op != CompareOp::Eq {
            return None;
        }
        match (&self.lhs, &self.rhs) {
            (Term::Variable(name), Term::Constant(value))
            | (Term::Constant(value), Term::Variable(name)) => Some((name.as_str(), value)),
            _ => None,
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op, self.rhs)
    }
}

/// An equality fact inferred by constraint propagation.
///
/// `path` records the chain of source variables the value travelled
/// through, oldest first. Used for diagnostics only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedConstraint {
    pub variable: String,
    pub value: f64,
    pub path: Vec<String>,
}

impl DerivedConstraint {
    pub fn as_atom(&self) -> Atom {
        Atom::new(
            CompareOp::Eq,
            Term::variable(self.variable.clone()),
            Term::number(self.value),
        )
    }
}

/// One derived-value declaration from the schema: `name = expr`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    pub expr: super::Expr,
}

impl Declaration {
    pub fn new(name: impl Into<String>, expr: super::Expr) -> Self {
        Self { name: name.into(), expr }
    }
}

/// The declared legal value set for an input field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DomainSpec {
    /// An inclusive numeric range.
    Range { min: f64, max: f64 },
    /// An explicit enumeration of admissible values.
    OneOf(Vec<Value>),
    /// A custom validator that cannot be evaluated statically.
    /// Conservatively admits everything.
    Opaque,
}

impl DomainSpec {
    pub fn admits(&self, value: &Value) -> bool {
        match self {
            DomainSpec::Range { min, max } => match value.as_number() {
                Some(v) => *min <= v && v <= *max,
                None => false,
            },
            DomainSpec::OneOf(allowed) => allowed.contains(value),
            DomainSpec::Opaque => true,
        }
    }
}

/// An input field as declared in the schema, with its optional domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub domain: Option<DomainSpec>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, domain: Option<DomainSpec>) -> Self {
        Self { name: name.into(), domain }
    }
}

/// A dense index for an interned [`Term`], valid within one [`TermTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermId(pub u32);

impl TermId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn new(idx: usize) -> Self {
        Self(idx as u32)
    }
}

/// Hashable identity of a term. Numeric constants are keyed by their bit
/// pattern with `-0.0` folded into `0.0` so `x == 0.0` and `x == -0.0`
/// intern to the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum TermKey {
    Var(String),
    Num(u64),
    Str(String),
    Bool(bool),
}

impl TermKey {
    fn of(term: &Term) -> Self {
        match term {
            Term::Variable(name) => TermKey::Var(name.clone()),
            Term::Constant(Value::Number(n)) => {
                let canonical = if *n == 0.0 { 0.0 } else { *n };
                TermKey::Num(canonical.to_bits())
            }
            Term::Constant(Value::Str(s)) => TermKey::Str(s.clone()),
            Term::Constant(Value::Bool(b)) => TermKey::Bool(*b),
        }
    }
}

/// Interns terms to dense ids for the union-find table and the order graph.
/// Allocated fresh per check; nothing outlives the call.
#[derive(Debug, Default)]
pub struct TermTable {
    ids: HashMap<TermKey, TermId>,
    terms: Vec<Term>,
}

impl TermTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, term: &Term) -> TermId {
        let key = TermKey::of(term);
        if let Some(&id) = self.ids.get(&key) {
            return id;
        }
        let id = TermId::new(self.terms.len());
        self.ids.insert(key, id);
        self.terms.push(term.clone());
        id
    }

    pub fn resolve(&self, id: TermId) -> &Term {
        &self.terms[id.index()]
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atom_normalization_flips_operator() {
        // 10 < x  becomes  x > 10
        let atom = Atom::new(CompareOp::Lt, Term::number(10.0), Term::variable("x"));
        assert_eq!(atom.op, CompareOp::Gt);
        assert_eq!(atom.lhs, Term::variable("x"));
        assert_eq!(atom.rhs, Term::number(10.0));
    }

    #[test]
    fn test_atom_normalization_keeps_equality_sides_swapped_only() {
        let atom = Atom::new(CompareOp::Eq, Term::number(5.0), Term::variable("x"));
        assert_eq!(atom.op, CompareOp::Eq);
        assert_eq!(atom.lhs, Term::variable("x"));
    }

    #[test]
    fn test_numeric_comparison_tolerates_unnormalized_atoms() {
        // Built by hand, variable on the right.
        let atom = Atom { op: CompareOp::Ge, lhs: Term::number(3.0), rhs: Term::variable("y") };
        let (name, value, op) = atom.numeric_comparison().unwrap();
        assert_eq!(name, "y");
        assert_eq!(value, 3.0);
        assert_eq!(op, CompareOp::Le);
    }

    #[test]
    fn test_numeric_comparison_ignores_non_numeric_shapes() {
        let var_var = Atom::new(CompareOp::Gt, Term::variable("x"), Term::variable("y"));
        assert!(var_var.numeric_comparison().is_none());

        let string_side = Atom::new(
            CompareOp::Eq,
            Term::variable("x"),
            Term::Constant(Value::Str("green".into())),
        );
        assert!(string_side.numeric_comparison().is_none());
    }

    #[test]
    fn test_domain_admits() {
        let range = DomainSpec::Range { min: 18.0, max: 65.0 };
        assert!(range.admits(&Value::Number(18.0)));
        assert!(range.admits(&Value::Number(65.0)));
        assert!(!range.admits(&Value::Number(70.0)));
        assert!(!range.admits(&Value::Str("18".into())));

        let one_of = DomainSpec::OneOf(vec![Value::Str("red".into()), Value::Number(2.0)]);
        assert!(one_of.admits(&Value::Str("red".into())));
        assert!(one_of.admits(&Value::Number(2.0)));
        assert!(!one_of.admits(&Value::Number(3.0)));

        assert!(DomainSpec::Opaque.admits(&Value::Bool(false)));
    }

    #[test]
    fn test_term_table_dedupes_and_resolves() {
        let mut table = TermTable::new();
        let a = table.intern(&Term::variable("x"));
        let b = table.intern(&Term::number(0.0));
        let c = table.intern(&Term::variable("x"));
        let d = table.intern(&Term::number(-0.0));

        assert_eq!(a, c);
        assert_eq!(b, d);
        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve(a), &Term::variable("x"));
    }
}
