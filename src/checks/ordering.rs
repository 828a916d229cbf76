//! Cycle detection over the strict-inequality order graph.

use crate::engine::error::Contradiction;
use crate::model::{Atom, CompareOp, TermId, TermTable};
use petgraph::graphmap::DiGraphMap;

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    White,
    Gray, // Used for back-edge (cycle) detection
    Black,
}

/// Builds the "is less than" digraph (`x > y` adds `y -> x`, `x < y`
/// adds `x -> y`) and runs a 3-color DFS over every vertex. A back-edge
/// into a gray vertex means the strict ordering loops onto itself, which
/// no assignment can satisfy. Returns on the first cycle found.
pub(crate) fn check_strict_order(atoms: &[Atom]) -> Option<Contradiction> {
    let mut table = TermTable::new();
    let mut graph: DiGraphMap<TermId, ()> = DiGraphMap::new();

    for atom in atoms {
        // Edge u -> v reads "u is less than v". Constants participate as
        // ordinary vertices, so x > 5 together with x < 5 also closes a loop.
        let (less, greater) = match atom.op {
            CompareOp::Gt => (&atom.rhs, &atom.lhs),
            CompareOp::Lt => (&atom.lhs, &atom.rhs),
            _ => continue,
        };
        let u = table.intern(less);
        let v = table.intern(greater);
        graph.add_edge(u, v, ());
    }

    let mut state = vec![VisitState::White; table.len()];
    for node in graph.nodes() {
        if state[node.index()] == VisitState::White {
            if let Some(found) = visit(node, &graph, &mut state, &table) {
                return Some(found);
            }
        }
    }

    None
}

fn visit(
    node: TermId,
    graph: &DiGraphMap<TermId, ()>,
    state: &mut [VisitState],
    table: &TermTable,
) -> Option<Contradiction> {
    match state[node.index()] {
        VisitState::Black => return None,
        VisitState::Gray => {
            return Some(Contradiction::OrderCycle {
                through: table.resolve(node).to_string(),
            })
        }
        VisitState::White => state[node.index()] = VisitState::Gray,
    }

    for successor in graph.neighbors(node) {
        if let Some(found) = visit(successor, graph, state, table) {
            return Some(found);
        }
    }

    state[node.index()] = VisitState::Black;
    None
}
