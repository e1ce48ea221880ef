//! DFS cycle detection for undirected and directed graphs
//!
//! Both variants share the visited set and the per-neighbour checks but
//! differ in the back-edge test:
//! - undirected: a visited neighbour that is not the vertex we came from
//! - directed: a neighbour still on the recursion stack
//!
//! The search stops at the first back edge. Nothing is explored after that,
//! so the reported edge and cycle are the first ones found in adjacency order.

use super::errors::{check_limit, ValidationError};
use super::{check_vertices, list};
use crate::constants::{MAX_ELEMENTS, MAX_VERTICES};
use crate::trace::view::or_placeholder;
use crate::trace::{produce_with, Annotation, Grid, GridCell, GridRow, Recorder, StateView, Trace};
use rustc_hash::FxHashSet;

pub const PSEUDOCODE: &[&str] = &[
    "hasCycle(G):",
    "  for each vertex s: if not visited[s] and dfs(s): return true",
    "  return false",
    "",
    "dfs(u):",
    "  visited[u] = true; onStack[u] = true   (directed)",
    "  for each neighbour v of u:",
    "    if not visited[v]:",
    "      parent[v] = u; if dfs(v): return true",
    "    else if v != parent[u]   (undirected)",
    "         or onStack[v]       (directed):",
    "      back edge (u, v): cycle found, return true",
    "  onStack[u] = false   (directed)",
    "  return false",
];

/// Indices into [`PSEUDOCODE`]
pub mod lines {
    pub const START_FROM: usize = 1;
    pub const NO_CYCLE: usize = 2;
    pub const ENTER: usize = 5;
    pub const NEIGHBOR: usize = 6;
    pub const UNVISITED: usize = 7;
    pub const DESCEND: usize = 8;
    pub const VISITED_CHECK: usize = 9;
    pub const BACK_EDGE: usize = 11;
    pub const LEAVE: usize = 12;
    pub const RETURN_FALSE: usize = 13;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphInput {
    pub vertices: usize,
    pub edges: Vec<(usize, usize)>,
    pub directed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CycleState {
    pub directed: bool,
    pub visited: Vec<bool>,
    pub parent: Vec<Option<usize>>,
    pub on_stack: Vec<bool>,
    pub call_stack: Vec<usize>,
    pub back_edge: Option<(usize, usize)>,
    pub cycle: Vec<usize>,
}

impl CycleState {
    fn new(vertices: usize, directed: bool) -> Self {
        CycleState {
            directed,
            visited: vec![false; vertices],
            parent: vec![None; vertices],
            on_stack: vec![false; vertices],
            call_stack: Vec::new(),
            back_edge: None,
            cycle: Vec::new(),
        }
    }
}

impl StateView for CycleState {
    fn grid(&self) -> Grid {
        let vertices: Vec<usize> = (0..self.visited.len()).collect();
        let flag = |v: &bool| if *v { "✓" } else { "·" };
        let visited: Vec<&str> = self.visited.iter().map(flag).collect();
        let mut rows = vec![
            GridRow::indexed("vertex", &vertices),
            GridRow::indexed("visited", &visited),
        ];
        if self.directed {
            let on_stack: Vec<&str> = self.on_stack.iter().map(flag).collect();
            rows.push(GridRow::indexed("on stack", &on_stack));
        } else {
            let parents: Vec<String> = self
                .parent
                .iter()
                .map(|p| or_placeholder(*p, "-"))
                .collect();
            rows.push(GridRow::indexed("parent", &parents));
        }
        rows.push(GridRow::new(
            "dfs stack",
            self.call_stack
                .iter()
                .map(|&v| GridCell::entity(v.to_string(), v))
                .collect(),
        ));
        if !self.cycle.is_empty() {
            rows.push(GridRow::new(
                "cycle",
                self.cycle
                    .iter()
                    .map(|&v| GridCell::entity(v.to_string(), v))
                    .collect(),
            ));
        }
        Grid::new(rows)
    }
}

fn validate(input: &GraphInput) -> Result<&GraphInput, ValidationError> {
    check_limit("vertex count", input.vertices, MAX_VERTICES)?;
    check_limit("edge count", input.edges.len(), MAX_ELEMENTS)?;
    check_vertices(input.vertices, input.edges.iter().flat_map(|&(a, b)| [a, b]))?;

    let mut seen = FxHashSet::default();
    for &(from, to) in &input.edges {
        let key = if input.directed || from <= to {
            (from, to)
        } else {
            (to, from)
        };
        if !seen.insert(key) {
            return Err(ValidationError::DuplicateEdge { from, to });
        }
    }
    Ok(input)
}

/// Search the graph for a cycle, stopping at the first one found
pub fn trace(input: &GraphInput) -> Trace<CycleState> {
    trace_with(input, Recorder::new())
}

/// [`trace`] into a caller-supplied recorder
pub fn trace_with(input: &GraphInput, recorder: Recorder<CycleState>) -> Trace<CycleState> {
    let algorithm = if input.directed {
        "cycle-directed"
    } else {
        "cycle-undirected"
    };
    produce_with(algorithm, validate(input), recorder, |input, rec| {
        let mut adjacency = vec![Vec::new(); input.vertices];
        for &(from, to) in &input.edges {
            adjacency[from].push(to);
            if !input.directed && from != to {
                adjacency[to].push(from);
            }
        }

        let mut run = CycleRun {
            state: CycleState::new(input.vertices, input.directed),
            rec,
            adjacency,
        };
        let kind = if input.directed { "directed" } else { "undirected" };
        run.note(
            None,
            format!("Search a {} graph with {} vertices for a cycle", kind, input.vertices),
            [],
        );

        for s in 0..input.vertices {
            if run.state.visited[s] {
                continue;
            }
            run.note(
                Some(lines::START_FROM),
                format!("{} is unvisited: start a DFS from it", s),
                [s],
            );
            if run.dfs(s) {
                run.report_cycle();
                return;
            }
        }

        run.note(
            Some(lines::NO_CYCLE),
            "Every vertex explored: no cycle".to_string(),
            [],
        );
        run.rec.record_annotated(
            &run.state,
            None,
            "No cycle found".to_string(),
            [],
            &[Annotation::new("cycle", "none")],
        );
    })
}

struct CycleRun<'r> {
    state: CycleState,
    rec: &'r mut Recorder<CycleState>,
    adjacency: Vec<Vec<usize>>,
}

impl CycleRun<'_> {
    fn note(
        &mut self,
        line: Option<usize>,
        message: String,
        highlight: impl IntoIterator<Item = usize>,
    ) {
        let stack = Annotation::new("dfs stack", list(&self.state.call_stack));
        self.rec
            .record_annotated(&self.state, line, message, highlight, &[stack]);
    }

    /// Returns true as soon as a back edge is found below `u`
    fn dfs(&mut self, u: usize) -> bool {
        self.state.visited[u] = true;
        self.state.call_stack.push(u);
        if self.state.directed {
            self.state.on_stack[u] = true;
        }
        self.note(Some(lines::ENTER), format!("Enter dfs({})", u), [u]);

        let neighbours = self.adjacency[u].clone();
        for v in neighbours {
            self.note(
                Some(lines::NEIGHBOR),
                format!("Check neighbour {} of {}", v, u),
                [u, v],
            );

            if !self.state.visited[v] {
                self.note(
                    Some(lines::UNVISITED),
                    format!("{} is not visited", v),
                    [v],
                );
                self.state.parent[v] = Some(u);
                self.note(
                    Some(lines::DESCEND),
                    format!("parent[{}] = {}, descend into dfs({})", v, u, v),
                    [u, v],
                );
                if self.dfs(v) {
                    return true;
                }
                continue;
            }

            if self.is_back_edge(u, v) {
                self.state.back_edge = Some((u, v));
                self.note(
                    Some(lines::BACK_EDGE),
                    format!("Back edge {} -> {}: cycle found", u, v),
                    [u, v],
                );
                return true;
            }
        }

        if self.state.directed {
            self.state.on_stack[u] = false;
            self.note(
                Some(lines::LEAVE),
                format!("Done with {}: remove it from the recursion stack", u),
                [u],
            );
        }
        self.state.call_stack.pop();
        self.note(
            Some(lines::RETURN_FALSE),
            format!("dfs({}) returns false", u),
            [u],
        );
        false
    }

    /// Record the visited-neighbour test and return its outcome
    fn is_back_edge(&mut self, u: usize, v: usize) -> bool {
        if self.state.directed {
            let on_stack = self.state.on_stack[v];
            let message = if on_stack {
                format!("{} is visited and on the recursion stack", v)
            } else {
                format!("{} is visited but already finished: not a cycle", v)
            };
            self.note(Some(lines::VISITED_CHECK), message, [u, v]);
            on_stack
        } else {
            let parent = self.state.parent[u];
            let is_parent = parent == Some(v);
            let message = if is_parent {
                format!("{} is visited but is the parent of {}: skip", v, u)
            } else {
                format!("{} is visited and is not the parent of {}", v, u)
            };
            self.note(Some(lines::VISITED_CHECK), message, [u, v]);
            !is_parent
        }
    }

    /// Cut the cycle out of the DFS stack and record the terminal step
    fn report_cycle(&mut self) {
        let Some((u, v)) = self.state.back_edge else {
            return;
        };
        let start = self
            .state
            .call_stack
            .iter()
            .position(|&x| x == v)
            .unwrap_or(0);
        let mut cycle = self.state.call_stack[start..].to_vec();
        cycle.push(v);
        self.state.cycle = cycle;

        let path = self
            .state
            .cycle
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ");
        self.rec.record_annotated(
            &self.state,
            None,
            format!("Cycle found via back edge {} -> {}: {}", u, v, path),
            self.state.cycle.clone(),
            &[
                Annotation::new("back edge", format!("{} -> {}", u, v)),
                Annotation::new("cycle", path),
            ],
        );
    }
}
