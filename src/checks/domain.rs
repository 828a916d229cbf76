//! Tests equality facts against declared input-field domains.

use crate::engine::error::Contradiction;
use crate::model::{Atom, DerivedConstraint, DomainSpec, FieldSpec, Value};
use std::collections::BTreeMap;

/// A derived (or declared) equality on a domained input field proves the
/// schema demands a value that could never legally occur. Opaque domains
/// cannot be evaluated statically and always pass.
pub(crate) fn check_domains(
    atoms: &[Atom],
    derived: &[DerivedConstraint],
    fields: &[FieldSpec],
) -> Option<Contradiction> {
    let domains: BTreeMap<&str, &DomainSpec> = fields
        .iter()
        .filter_map(|f| f.domain.as_ref().map(|d| (f.name.as_str(), d)))
        .collect();
    if domains.is_empty() {
        return None;
    }

    for constraint in derived {
        if let Some(domain) = domains.get(constraint.variable.as_str()) {
            let value = Value::Number(constraint.value);
            if !domain.admits(&value) {
                return Some(violation(&constraint.variable, &value));
            }
        }
    }

    // Declared equalities get the same treatment as derived ones.
    for atom in atoms {
        if let Some((variable, value)) = atom.equality_binding() {
            if let Some(domain) = domains.get(variable) {
                if !domain.admits(value) {
                    return Some(violation(variable, value));
                }
            }
        }
    }

    None
}

fn violation(variable: &str, value: &Value) -> Contradiction {
    Contradiction::DomainViolation {
        variable: variable.to_string(),
        value: value.to_string(),
    }
}
