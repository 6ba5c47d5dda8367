//! Homomorphism existence as a CNF instance.
//!
//! Variable `n2·i + 1 + j` (1-based, as in DIMACS) is true iff node `i` of
//! the source pattern maps to node `j` of the target. The solver itself lives
//! behind [`SatBackend`]; this module only builds clauses and reads models.

use crate::arc_consistency::{ArcConsistency, Consistency};
use crate::error::{LiftingError, Result};
use crate::pattern::{Color, Pattern};
use std::fmt::Write;
use tracing::debug;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cnf {
    pub num_vars: usize,
    pub clauses: Vec<Vec<i32>>,
}

impl Cnf {
    /// Clause set in DIMACS text, one `0`-terminated clause per line.
    pub fn to_dimacs(&self) -> String {
        let mut out = format!("p cnf {} {}\n", self.num_vars, self.clauses.len());
        for clause in &self.clauses {
            for lit in clause {
                let _ = write!(out, "{lit} ");
            }
            out.push_str("0\n");
        }
        out
    }

    /// Does `assignment[v - 1]` (the value of variable `v`) satisfy every
    /// clause? A literal over a variable the assignment does not cover is
    /// false.
    pub fn is_satisfied_by(&self, assignment: &[bool]) -> bool {
        self.clauses.iter().all(|clause| {
            clause.iter().any(|&lit| {
                (lit.unsigned_abs() as usize)
                    .checked_sub(1)
                    .and_then(|v| assignment.get(v))
                    .is_some_and(|&value| value == (lit > 0))
            })
        })
    }
}

pub struct HomomorphismEncoding {
    n1: usize,
    n2: usize,
    cnf: Cnf,
}

impl HomomorphismEncoding {
    /// Exactly-one clauses per source node, plus for every `c`-edge
    /// `i1 → i2` and target node `j` the clause
    /// `¬x(i1,j) ∨ ⋁ { x(i2,j2) : j → j2 is a c-edge }`.
    pub fn new(source: &Pattern, target: &Pattern) -> Self {
        let n1 = source.num_nodes();
        let n2 = target.num_nodes();
        let var = |i: usize, j: usize| (n2 * i + 1 + j) as i32;
        let mut clauses: Vec<Vec<i32>> = Vec::new();

        for i in 0..n1 {
            clauses.push((0..n2).map(|j| var(i, j)).collect());
            for j in 0..n2 {
                for k in j + 1..n2 {
                    clauses.push(vec![-var(i, j), -var(i, k)]);
                }
            }
        }

        for color in Color::BOTH {
            for (i1, i2) in source.relation(color).edges() {
                for j in 0..n2 {
                    let mut clause: Vec<i32> = target
                        .successors(color, j)
                        .iter()
                        .map(|j2| var(i2, j2))
                        .collect();
                    clause.push(-var(i1, j));
                    clauses.push(clause);
                }
            }
        }

        let cnf = Cnf {
            num_vars: n1 * n2,
            clauses,
        };
        debug!(
            source = n1,
            target = n2,
            vars = cnf.num_vars,
            clauses = cnf.clauses.len(),
            "homomorphism encoding"
        );
        HomomorphismEncoding { n1, n2, cnf }
    }

    pub fn var(&self, i: usize, j: usize) -> i32 {
        (self.n2 * i + 1 + j) as i32
    }

    pub fn cnf(&self) -> &Cnf {
        &self.cnf
    }

    /// Reads the map `i ↦ j` from a model given as signed literals. Literals
    /// outside the encoding's variables are ignored.
    pub fn decode_model(&self, model: &[i32]) -> Result<Vec<usize>> {
        let mut images: Vec<Vec<usize>> = vec![Vec::new(); self.n1];
        for &lit in model {
            if lit <= 0 || lit as usize > self.cnf.num_vars {
                continue;
            }
            let v = lit as usize - 1;
            images[v / self.n2].push(v % self.n2);
        }
        images
            .into_iter()
            .enumerate()
            .map(|(node, js)| match js.as_slice() {
                [j] => Ok(*j),
                _ => Err(LiftingError::InvalidModel {
                    node,
                    assigned: js.len(),
                }),
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveResult {
    /// A satisfying assignment as signed literals.
    Sat(Vec<i32>),
    Unsat,
    /// The backend gave up, e.g. on a timeout.
    Unknown,
}

/// An external solver.
pub trait SatBackend {
    fn solve(&mut self, cnf: &Cnf) -> SolveResult;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchResult {
    Found(Vec<usize>),
    NotFound,
    Unknown,
}

/// Arc consistency first; only a consistent pair reaches the backend. A
/// returned map is checked edge by edge before it is reported.
pub fn search_homomorphism<B: SatBackend + ?Sized>(
    source: &Pattern,
    target: &Pattern,
    backend: &mut B,
) -> Result<SearchResult> {
    if ArcConsistency::new(source, target).run() == Consistency::Inconsistent {
        debug!("arc consistency rules out a homomorphism");
        return Ok(SearchResult::NotFound);
    }

    let encoding = HomomorphismEncoding::new(source, target);
    let model = match backend.solve(encoding.cnf()) {
        SolveResult::Sat(model) => model,
        SolveResult::Unsat => return Ok(SearchResult::NotFound),
        SolveResult::Unknown => return Ok(SearchResult::Unknown),
    };

    let map = encoding.decode_model(&model)?;
    for color in Color::BOTH {
        if let Some((from, to)) = source
            .relation(color)
            .edges()
            .find(|&(x, y)| !target.has_edge(color, map[x], map[y]))
        {
            return Err(LiftingError::NotAHomomorphism { color, from, to });
        }
    }
    Ok(SearchResult::Found(map))
}
