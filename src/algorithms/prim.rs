//! Prim's minimum spanning tree with a linear minimum-key scan
//!
//! Each outer iteration records the scan over non-tree vertices, the vertex
//! picked, the tree edge it brings in, and a relax check per neighbour (plus
//! the key/parent update when the check passes). If the smallest remaining
//! key is infinite the graph is disconnected: the run stops there and flags
//! the tree as incomplete.

use super::errors::{check_limit, ValidationError};
use super::{check_vertices, list};
use crate::constants::{MAX_ELEMENTS, MAX_VERTICES};
use crate::trace::view::or_placeholder;
use crate::trace::{produce_with, Annotation, Grid, GridCell, GridRow, Recorder, StateView, Trace};

pub const PSEUDOCODE: &[&str] = &[
    "prim(G, s):",
    "  key[v] = inf, parent[v] = nil, inMST[v] = false",
    "  key[s] = 0",
    "  repeat |V| times:",
    "    u = vertex not in MST with minimum key",
    "    if key[u] == inf: graph is disconnected, stop",
    "    inMST[u] = true",
    "    if parent[u] != nil: add edge (parent[u], u)",
    "    for each (v, w) adjacent to u:",
    "      if not inMST[v] and w < key[v]:",
    "        key[v] = w, parent[v] = u",
];

/// Indices into [`PSEUDOCODE`]
pub mod lines {
    pub const INIT: usize = 1;
    pub const START_KEY: usize = 2;
    pub const ITERATION: usize = 3;
    pub const SCAN: usize = 4;
    pub const DISCONNECTED: usize = 5;
    pub const INCLUDE: usize = 6;
    pub const ADD_EDGE: usize = 7;
    pub const NEIGHBORS: usize = 8;
    pub const RELAX_CHECK: usize = 9;
    pub const RELAX_UPDATE: usize = 10;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedEdge {
    pub from: usize,
    pub to: usize,
    pub weight: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimInput {
    pub vertices: usize,
    pub edges: Vec<WeightedEdge>,
    pub start: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrimState {
    pub key: Vec<Option<i64>>, // None is infinity
    pub parent: Vec<Option<usize>>,
    pub in_mst: Vec<bool>,
    pub mst_edges: Vec<WeightedEdge>,
    pub total_weight: i128, // Wide enough for any sum of i64 weights
    pub complete: bool,
}

impl PrimState {
    fn new(vertices: usize) -> Self {
        PrimState {
            key: vec![None; vertices],
            parent: vec![None; vertices],
            in_mst: vec![false; vertices],
            mst_edges: Vec::new(),
            total_weight: 0,
            complete: false,
        }
    }
}

impl StateView for PrimState {
    fn grid(&self) -> Grid {
        let vertices: Vec<usize> = (0..self.key.len()).collect();
        let keys: Vec<String> = self.key.iter().map(|k| or_placeholder(*k, "∞")).collect();
        let parents: Vec<String> = self
            .parent
            .iter()
            .map(|p| or_placeholder(*p, "-"))
            .collect();
        let members: Vec<&str> = self
            .in_mst
            .iter()
            .map(|&m| if m { "✓" } else { "·" })
            .collect();
        let edges = self
            .mst_edges
            .iter()
            .map(|e| GridCell::plain(format!("{}-{}({})", e.from, e.to, e.weight)))
            .collect();
        Grid::new(vec![
            GridRow::indexed("vertex", &vertices),
            GridRow::indexed("key", &keys),
            GridRow::indexed("parent", &parents),
            GridRow::indexed("in MST", &members),
            GridRow::new("edges", edges),
        ])
    }
}

fn validate(input: &PrimInput) -> Result<&PrimInput, ValidationError> {
    check_limit("vertex count", input.vertices, MAX_VERTICES)?;
    check_limit("edge count", input.edges.len(), MAX_ELEMENTS)?;
    check_vertices(
        input.vertices,
        input.edges.iter().flat_map(|e| [e.from, e.to]),
    )?;
    if input.vertices > 0 {
        check_vertices(input.vertices, [input.start])?;
    }
    Ok(input)
}

/// Grow a spanning tree from `input.start`
pub fn trace(input: &PrimInput) -> Trace<PrimState> {
    trace_with(input, Recorder::new())
}

/// [`trace`] into a caller-supplied recorder
pub fn trace_with(input: &PrimInput, recorder: Recorder<PrimState>) -> Trace<PrimState> {
    produce_with("prim", validate(input), recorder, |input, rec| {
        let mut adjacency = vec![Vec::new(); input.vertices];
        for edge in &input.edges {
            adjacency[edge.from].push((edge.to, edge.weight));
            if edge.from != edge.to {
                adjacency[edge.to].push((edge.from, edge.weight));
            }
        }

        let mut run = PrimRun {
            state: PrimState::new(input.vertices),
            rec,
        };
        run.note(
            lines::INIT,
            format!("{} vertices, {} edges: every key starts at ∞", input.vertices, input.edges.len()),
            [],
        );
        if input.vertices == 0 {
            run.state.complete = true;
            run.finish("Empty graph: the spanning tree is empty".to_string());
            return;
        }
        run.prim(&adjacency, input.start);
    })
}

struct PrimRun<'r> {
    state: PrimState,
    rec: &'r mut Recorder<PrimState>,
}

impl PrimRun<'_> {
    fn note(&mut self, line: usize, message: String, highlight: impl IntoIterator<Item = usize>) {
        self.rec.record(&self.state, Some(line), message, highlight);
    }

    fn finish(&mut self, message: String) {
        let edges: Vec<String> = self
            .state
            .mst_edges
            .iter()
            .map(|e| format!("{}-{}", e.from, e.to))
            .collect();
        self.rec.record_annotated(
            &self.state,
            None,
            message,
            [],
            &[
                Annotation::new("total weight", self.state.total_weight.to_string()),
                Annotation::new("tree edges", list(&edges)),
                Annotation::new("complete", self.state.complete.to_string()),
            ],
        );
    }

    fn prim(&mut self, adjacency: &[Vec<(usize, i64)>], start: usize) {
        let n = adjacency.len();
        self.state.key[start] = Some(0);
        self.note(lines::START_KEY, format!("key[{}] = 0", start), [start]);

        for iteration in 0..n {
            self.note(
                lines::ITERATION,
                format!("Iteration {} of {}", iteration + 1, n),
                [],
            );

            let Some(u) = self.scan_min() else {
                self.state.complete = false;
                self.note(
                    lines::DISCONNECTED,
                    "Every remaining key is ∞: the graph is disconnected".to_string(),
                    (0..n).filter(|&v| !self.state.in_mst[v]).collect::<Vec<_>>(),
                );
                let reached = self.state.in_mst.iter().filter(|&&m| m).count();
                self.finish(format!(
                    "MST incomplete: only {} of {} vertices reachable from {}",
                    reached, n, start
                ));
                return;
            };

            self.state.in_mst[u] = true;
            self.note(lines::INCLUDE, format!("Add vertex {} to the tree", u), [u]);

            if let Some(p) = self.state.parent[u] {
                let weight = self.state.key[u].unwrap_or_default();
                self.state.mst_edges.push(WeightedEdge {
                    from: p,
                    to: u,
                    weight,
                });
                self.state.total_weight += i128::from(weight);
                self.note(
                    lines::ADD_EDGE,
                    format!("Tree edge {}-{} (weight {})", p, u, weight),
                    [p, u],
                );
            } else {
                self.note(
                    lines::ADD_EDGE,
                    format!("{} is the root: no tree edge", u),
                    [u],
                );
            }

            self.note(
                lines::NEIGHBORS,
                format!("Relax the {} edges of {}", adjacency[u].len(), u),
                [u],
            );
            for &(v, w) in &adjacency[u] {
                self.relax(u, v, w);
            }
        }

        self.state.complete = true;
        self.finish(format!(
            "MST complete: {} edges, total weight {}",
            self.state.mst_edges.len(),
            self.state.total_weight
        ));
    }

    /// Linear scan for the non-tree vertex with the smallest finite key
    fn scan_min(&mut self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for v in 0..self.state.key.len() {
            if self.state.in_mst[v] {
                continue;
            }
            let key = self.state.key[v];
            let better = match (key, best.and_then(|b| self.state.key[b])) {
                (Some(k), Some(current)) => k < current,
                (Some(_), None) => true,
                (None, _) => false,
            };
            if better {
                best = Some(v);
            }
            let min_text = best.map_or_else(
                || "none yet".to_string(),
                |b| format!("{} (key {})", b, or_placeholder(self.state.key[b], "∞")),
            );
            self.note(
                lines::SCAN,
                format!(
                    "key[{}] = {}; minimum so far: {}",
                    v,
                    or_placeholder(key, "∞"),
                    min_text
                ),
                [v],
            );
        }
        best
    }

    fn relax(&mut self, u: usize, v: usize, w: i64) {
        if self.state.in_mst[v] {
            self.note(
                lines::RELAX_CHECK,
                format!("Edge {}-{}: {} is already in the tree, skip", u, v, v),
                [u, v],
            );
            return;
        }

        let key = self.state.key[v];
        let improves = key.map_or(true, |k| w < k);
        self.note(
            lines::RELAX_CHECK,
            format!(
                "Edge {}-{}: weight {} < key[{}] = {}? {}",
                u,
                v,
                w,
                v,
                or_placeholder(key, "∞"),
                if improves { "yes" } else { "no" }
            ),
            [u, v],
        );
        if improves {
            self.state.key[v] = Some(w);
            self.state.parent[v] = Some(u);
            self.note(
                lines::RELAX_UPDATE,
                format!("key[{}] = {}, parent[{}] = {}", v, w, v, u),
                [u, v],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(from: usize, to: usize, weight: i64) -> WeightedEdge {
        WeightedEdge { from, to, weight }
    }

    #[test]
    fn finds_minimum_weight_tree() {
        let trace = trace(&PrimInput {
            vertices: 4,
            edges: vec![edge(0, 1, 1), edge(1, 2, 2), edge(0, 2, 4), edge(2, 3, 3), edge(1, 3, 6)],
            start: 0,
        });
        let last = trace.last();
        assert!(last.state.complete);
        assert_eq!(last.state.total_weight, 6);
        assert_eq!(last.state.mst_edges.len(), 3);
        assert_eq!(last.annotation("tree edges"), Some("[0-1, 1-2, 2-3]"));
    }

    #[test]
    fn disconnected_graph_stops_early() {
        let trace = trace(&PrimInput {
            vertices: 3,
            edges: vec![edge(0, 1, 5)],
            start: 0,
        });
        let last = trace.last();
        assert!(!last.state.complete);
        assert!(!trace.is_rejected());
        assert_eq!(trace.steps_at_line(lines::DISCONNECTED).count(), 1);
        assert!(last.message.contains("incomplete"));
    }

    #[test]
    fn total_weight_does_not_overflow() {
        let trace = trace(&PrimInput {
            vertices: 3,
            edges: vec![edge(0, 1, i64::MAX), edge(1, 2, i64::MAX)],
            start: 0,
        });
        let last = trace.last();
        assert!(last.state.complete);
        assert_eq!(last.state.total_weight, 2 * i128::from(i64::MAX));
        assert_eq!(
            last.annotation("total weight"),
            Some("18446744073709551614")
        );
    }

    #[test]
    fn unknown_vertex_is_rejected() {
        let trace = trace(&PrimInput {
            vertices: 2,
            edges: vec![edge(0, 4, 1)],
            start: 0,
        });
        assert_eq!(
            trace.rejection(),
            Some(&ValidationError::InvalidVertex { vertex: 4, count: 2 })
        );
    }
}
