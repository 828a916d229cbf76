//! Human-readable rendering of one analysis run.
//!
//! Purely diagnostic: the log is rebuilt from the provenance the
//! propagators already carry, so rendering can never change a verdict.

use crate::engine::checker::Analysis;
use crate::model::Atom;
use std::fmt::Write;

pub(crate) fn render(analysis: &Analysis, atoms: &[Atom]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "DERIVATION TRACE");
    let _ = writeln!(output, "--------------------------------------------------");

    if atoms.is_empty() {
        let _ = writeln!(output, "facts: (none)");
    } else {
        let _ = writeln!(output, "facts:");
        for atom in atoms {
            let _ = writeln!(output, "  {}", atom);
        }
    }

    if !analysis.ranges.is_empty() {
        let _ = writeln!(output, "ranges:");
        for (variable, interval) in &analysis.ranges {
            let _ = writeln!(output, "  {} in {}", variable, interval);
        }
    }

    if !analysis.derived.is_empty() {
        let _ = writeln!(output, "derived:");
        // Variable-by-variable, not discovery order.
        let mut ordered: Vec<_> = analysis.derived.iter().collect();
        ordered.sort_by(|a, b| a.variable.cmp(&b.variable));
        for constraint in ordered {
            if constraint.path.is_empty() {
                let _ = writeln!(output, "  {} == {}", constraint.variable, constraint.value);
            } else {
                let _ = writeln!(
                    output,
                    "  {} == {}  (via {})",
                    constraint.variable,
                    constraint.value,
                    constraint.path.join(" -> ")
                );
            }
        }
    }

    match &analysis.contradiction {
        Some(found) => {
            let _ = writeln!(output, "verdict: UNSATISFIABLE");
            let _ = writeln!(output, "  {}", found);
        }
        None => {
            let _ = writeln!(output, "verdict: satisfiable");
        }
    }

    output
}
