//! Equality contradiction: direct conflicts and conflicts reachable only
//! through the transitive closure of declared equalities.

use crate::engine::error::Contradiction;
use crate::model::{Atom, CompareOp, Term, TermId, TermTable};
use std::collections::{BTreeMap, BTreeSet};

/// Union-find over interned term ids, path compression + union by rank.
/// Allocated fresh per check.
struct UnionFind {
    parent: Vec<u32>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len as u32).collect(),
            rank: vec![0; len],
        }
    }

    fn find(&mut self, x: u32) -> u32 {
        let mut root = x;
        while self.parent[root as usize] != root {
            // Path halving keeps the walk iterative and the trees shallow.
            let grandparent = self.parent[self.parent[root as usize] as usize];
            self.parent[root as usize] = grandparent;
            root = grandparent;
        }
        root
    }

    fn union(&mut self, a: u32, b: u32) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra as usize].cmp(&self.rank[rb as usize]) {
            std::cmp::Ordering::Less => self.parent[ra as usize] = rb,
            std::cmp::Ordering::Greater => self.parent[rb as usize] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb as usize] = ra;
                self.rank[ra as usize] += 1;
            }
        }
    }
}

fn ordered(a: TermId, b: TermId) -> (TermId, TermId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Collects unordered pairs from `==`, `>`/`<` and `!=` atoms, then looks
/// for a pair that is simultaneously equal and strictly ordered (directly
/// or via an equivalence class), a class spanned by a `!=` atom, or a
/// class that binds two different constants together.
pub(crate) fn check_equality(atoms: &[Atom]) -> Option<Contradiction> {
    let mut table = TermTable::new();
    let mut equal_pairs: BTreeSet<(TermId, TermId)> = BTreeSet::new();
    let mut strict_pairs: BTreeSet<(TermId, TermId)> = BTreeSet::new();
    let mut distinct_pairs: BTreeSet<(TermId, TermId)> = BTreeSet::new();

    for atom in atoms {
        let bucket = match atom.op {
            CompareOp::Eq => &mut equal_pairs,
            CompareOp::Gt | CompareOp::Lt => &mut strict_pairs,
            CompareOp::Ne => &mut distinct_pairs,
            CompareOp::Ge | CompareOp::Le => continue,
        };
        let lhs = table.intern(&atom.lhs);
        let rhs = table.intern(&atom.rhs);
        if lhs != rhs {
            bucket.insert(ordered(lhs, rhs));
        }
    }

    // Direct conflict: the same pair declared equal and strictly ordered.
    if let Some(&(a, b)) = equal_pairs.intersection(&strict_pairs).next() {
        return Some(conflict(&table, a, b));
    }

    let mut uf = UnionFind::new(table.len());
    for &(a, b) in &equal_pairs {
        uf.union(a.0, b.0);
    }

    let mut classes: BTreeMap<u32, Vec<TermId>> = BTreeMap::new();
    for idx in 0..table.len() {
        let id = TermId::new(idx);
        classes.entry(uf.find(id.0)).or_default().push(id);
    }

    for members in classes.values().filter(|m| m.len() >= 2) {
        for (i, &a) in members.iter().enumerate() {
            for &b in &members[i + 1..] {
                let pair = ordered(a, b);
                if strict_pairs.contains(&pair) {
                    return Some(conflict(&table, a, b));
                }
                if distinct_pairs.contains(&pair) {
                    return Some(Contradiction::ExclusionConflict {
                        lhs: table.resolve(a).to_string(),
                        rhs: table.resolve(b).to_string(),
                    });
                }
                if let (Term::Constant(_), Term::Constant(_)) =
                    (table.resolve(a), table.resolve(b))
                {
                    return Some(Contradiction::ConstantConflict {
                        lhs: table.resolve(a).to_string(),
                        rhs: table.resolve(b).to_string(),
                    });
                }
            }
        }
    }

    None
}

fn conflict(table: &TermTable, a: TermId, b: TermId) -> Contradiction {
    Contradiction::EqualityConflict {
        lhs: table.resolve(a).to_string(),
        rhs: table.resolve(b).to_string(),
    }
}
