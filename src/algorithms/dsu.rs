//! Disjoint-set union with path compression and union by rank
//!
//! `find` is recursive: the base case, every descent and every parent
//! rewrite made while unwinding are recorded separately. `union` records
//! both finds, the root-equality check and the one rank branch that fires.
//! Ties attach the second root under the first and bump the first root's rank.

use super::errors::{check_index, check_limit, ValidationError};
use super::list;
use crate::constants::MAX_ELEMENTS;
use crate::trace::{produce_with, Annotation, Grid, GridRow, Recorder, StateView, Trace};

pub const PSEUDOCODE: &[&str] = &[
    "find(x):",
    "  if parent[x] == x: return x",
    "  root = find(parent[x])",
    "  parent[x] = root",
    "  return root",
    "",
    "union(a, b):",
    "  ra = find(a)",
    "  rb = find(b)",
    "  if ra == rb: return",
    "  if rank[ra] < rank[rb]:",
    "    parent[ra] = rb",
    "  else if rank[ra] > rank[rb]:",
    "    parent[rb] = ra",
    "  else:",
    "    parent[rb] = ra",
    "    rank[ra] += 1",
];

/// Indices into [`PSEUDOCODE`]
pub mod lines {
    pub const FIND_BASE: usize = 1;
    pub const FIND_RECURSE: usize = 2;
    pub const COMPRESS: usize = 3;
    pub const FIND_RETURN: usize = 4;
    pub const UNION: usize = 6;
    pub const UNION_FIND_A: usize = 7;
    pub const UNION_FIND_B: usize = 8;
    pub const SAME_ROOT: usize = 9;
    pub const RANK_LESS: usize = 10;
    pub const ATTACH_A: usize = 11;
    pub const RANK_GREATER: usize = 12;
    pub const ATTACH_B: usize = 13;
    pub const RANK_TIE: usize = 14;
    pub const TIE_ATTACH: usize = 15;
    pub const RANK_INCREMENT: usize = 16;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DsuOp {
    Union(usize, usize),
    Find(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DsuInput {
    pub size: usize,
    pub ops: Vec<DsuOp>,
}

/// Parent and rank tables
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DsuState {
    pub parent: Vec<usize>,
    pub rank: Vec<usize>,
}

impl DsuState {
    pub fn new(size: usize) -> Self {
        DsuState {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    /// Number of disjoint sets (elements that are their own parent)
    pub fn set_count(&self) -> usize {
        self.parent
            .iter()
            .enumerate()
            .filter(|&(i, &p)| i == p)
            .count()
    }

    /// Follow parent links to the root without modifying anything
    pub fn root_of(&self, mut x: usize) -> usize {
        while self.parent[x] != x {
            x = self.parent[x];
        }
        x
    }
}

impl StateView for DsuState {
    fn grid(&self) -> Grid {
        let nodes: Vec<usize> = (0..self.parent.len()).collect();
        Grid::new(vec![
            GridRow::indexed("node", &nodes),
            GridRow::indexed("parent", &self.parent),
            GridRow::indexed("rank", &self.rank),
        ])
    }
}

fn validate(input: &DsuInput) -> Result<&DsuInput, ValidationError> {
    check_limit("element count", input.size, MAX_ELEMENTS)?;
    for op in &input.ops {
        match *op {
            DsuOp::Union(a, b) => {
                check_index("disjoint set", a, input.size)?;
                check_index("disjoint set", b, input.size)?;
            }
            DsuOp::Find(x) => check_index("disjoint set", x, input.size)?,
        }
    }
    Ok(input)
}

/// Run every operation in order and record the trace
pub fn trace(input: &DsuInput) -> Trace<DsuState> {
    trace_with(input, Recorder::new())
}

/// [`trace`] into a caller-supplied recorder
pub fn trace_with(input: &DsuInput, recorder: Recorder<DsuState>) -> Trace<DsuState> {
    produce_with("dsu", validate(input), recorder, |input, rec| {
        let mut run = DsuRun {
            state: DsuState::new(input.size),
            rec,
            path: Vec::new(),
        };
        run.rec.record(
            &run.state,
            None,
            format!("Start: {} singleton sets", input.size),
            [],
        );

        let mut last_result = String::from("none");
        for op in &input.ops {
            last_result = match *op {
                DsuOp::Find(x) => {
                    let root = run.find(x);
                    format!("find({}) = {}", x, root)
                }
                DsuOp::Union(a, b) => {
                    if run.union(a, b) {
                        format!("union({}, {}) merged two sets", a, b)
                    } else {
                        format!("union({}, {}) found one set", a, b)
                    }
                }
            };
        }

        let sets = run.state.set_count();
        run.rec.record_annotated(
            &run.state,
            None,
            format!("All operations complete: {} disjoint sets", sets),
            [],
            &[
                Annotation::new("last result", last_result),
                Annotation::new("sets", sets.to_string()),
            ],
        );
    })
}

struct DsuRun<'r> {
    state: DsuState,
    rec: &'r mut Recorder<DsuState>,
    path: Vec<usize>, // Nodes on the current find recursion
}

impl DsuRun<'_> {
    fn note(&mut self, line: usize, message: String, highlight: impl IntoIterator<Item = usize>) {
        let path = Annotation::new("find path", list(&self.path));
        self.rec
            .record_annotated(&self.state, Some(line), message, highlight, &[path]);
    }

    fn find(&mut self, x: usize) -> usize {
        self.path.push(x);
        let p = self.state.parent[x];
        if p == x {
            self.note(
                lines::FIND_BASE,
                format!("find({}): parent[{}] == {}, {} is a root", x, x, x, x),
                [x],
            );
            self.path.pop();
            return x;
        }

        self.note(
            lines::FIND_RECURSE,
            format!("find({}): parent[{}] = {}, descend into find({})", x, x, p, p),
            [x, p],
        );
        let root = self.find(p);

        if self.state.parent[x] != root {
            self.state.parent[x] = root;
            self.note(
                lines::COMPRESS,
                format!("Path compression: parent[{}] {} -> {}", x, p, root),
                [x, root],
            );
        }
        self.note(
            lines::FIND_RETURN,
            format!("find({}) returns {}", x, root),
            [x, root],
        );
        self.path.pop();
        root
    }

    /// Returns true when two distinct sets were merged
    fn union(&mut self, a: usize, b: usize) -> bool {
        self.note(lines::UNION, format!("union({}, {})", a, b), [a, b]);

        let ra = self.find(a);
        self.note(
            lines::UNION_FIND_A,
            format!("ra = find({}) = {}", a, ra),
            [a, ra],
        );
        let rb = self.find(b);
        self.note(
            lines::UNION_FIND_B,
            format!("rb = find({}) = {}", b, rb),
            [b, rb],
        );

        if ra == rb {
            self.note(
                lines::SAME_ROOT,
                format!("ra == rb == {}: already in the same set", ra),
                [ra],
            );
            return false;
        }
        self.note(
            lines::SAME_ROOT,
            format!("ra = {} != rb = {}: different sets", ra, rb),
            [ra, rb],
        );

        let (rank_a, rank_b) = (self.state.rank[ra], self.state.rank[rb]);
        if rank_a < rank_b {
            self.note(
                lines::RANK_LESS,
                format!("rank[{}] = {} < rank[{}] = {}", ra, rank_a, rb, rank_b),
                [ra, rb],
            );
            self.state.parent[ra] = rb;
            self.note(
                lines::ATTACH_A,
                format!("parent[{}] = {}", ra, rb),
                [ra, rb],
            );
        } else if rank_a > rank_b {
            self.note(
                lines::RANK_GREATER,
                format!("rank[{}] = {} > rank[{}] = {}", ra, rank_a, rb, rank_b),
                [ra, rb],
            );
            self.state.parent[rb] = ra;
            self.note(
                lines::ATTACH_B,
                format!("parent[{}] = {}", rb, ra),
                [ra, rb],
            );
        } else {
            self.note(
                lines::RANK_TIE,
                format!("rank[{}] == rank[{}] == {}", ra, rb, rank_a),
                [ra, rb],
            );
            self.state.parent[rb] = ra;
            self.note(
                lines::TIE_ATTACH,
                format!("parent[{}] = {}", rb, ra),
                [ra, rb],
            );
            self.state.rank[ra] += 1;
            self.note(
                lines::RANK_INCREMENT,
                format!("rank[{}] is now {}", ra, self.state.rank[ra]),
                [ra],
            );
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_of_equal_ranks_increments_first_root() {
        let trace = trace(&DsuInput {
            size: 2,
            ops: vec![DsuOp::Union(0, 1)],
        });
        let last = trace.last();
        assert_eq!(last.state.parent, vec![0, 0]);
        assert_eq!(last.state.rank, vec![1, 0]);
        assert_eq!(trace.steps_at_line(lines::RANK_INCREMENT).count(), 1);
    }

    #[test]
    fn unequal_ranks_never_increment() {
        let trace = trace(&DsuInput {
            size: 3,
            ops: vec![DsuOp::Union(0, 1), DsuOp::Union(2, 0)],
        });
        // second union: rank[2] = 0 < rank[0] = 1
        assert_eq!(trace.steps_at_line(lines::RANK_LESS).count(), 1);
        assert_eq!(trace.steps_at_line(lines::RANK_INCREMENT).count(), 1);
        assert_eq!(trace.last().state.parent[2], 0);
    }

    #[test]
    fn out_of_range_is_rejected() {
        let trace = trace(&DsuInput {
            size: 2,
            ops: vec![DsuOp::Find(5)],
        });
        assert!(trace.is_rejected());
        assert_eq!(trace.len(), 1);
    }
}
