//! Command-line arguments and raw-text input parsing
//!
//! Every subcommand takes its data as compact comma-separated text, e.g.
//! `4,10,3,5,1` for an array or `0-1:4,1-2:3` for weighted edges. The text is
//! turned into a typed producer input here; anything malformed fails with an
//! [`InputError`] before a producer runs.

use crate::algorithms::backtracking::{self, ChoiceInput, ChoiceMode};
use crate::algorithms::bucket_sort::{self, BucketInput};
use crate::algorithms::cycle::{self, GraphInput};
use crate::algorithms::dsu::{self, DsuInput, DsuOp};
use crate::algorithms::hash_table::{self, HashInput, HashOp};
use crate::algorithms::heap::{self, HeapOp};
use crate::algorithms::nqueens::{self, QueensInput};
use crate::algorithms::prim::{self, PrimInput, WeightedEdge};
use crate::algorithms::tree_traversal::{self, TraversalOrder, TreeInput};
use crate::constants::DEFAULT_SPEED_MS;
use crate::trace::{Grid, StateView, Trace};
use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(name = "algotrace", version, about)]
pub struct Cli {
    /// Auto-play delay between steps in milliseconds
    #[arg(long, default_value_t = DEFAULT_SPEED_MS)]
    pub speed: u64,

    /// Write tracing output to this file (RUST_LOG sets the filter)
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,

    /// Print every step to stdout instead of starting the viewer
    #[arg(long)]
    pub print: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Union-find: ops like `u0:1,u2:3,f0`
    Dsu {
        #[arg(long)]
        size: usize,
        ops: String,
    },
    /// Build a min-heap from an array like `4,10,3,5,1`
    HeapBuild { values: String },
    /// Inserts and extract-mins on a min-heap: ops like `i5,x`
    HeapOps {
        ops: String,
        /// Starting heap, which must already be a valid min-heap
        #[arg(long, default_value = "")]
        initial: String,
    },
    /// Prim's MST over weighted edges like `0-1:4,1-2:3`
    Prim {
        #[arg(long)]
        vertices: usize,
        edges: String,
        #[arg(long, default_value_t = 0)]
        start: usize,
    },
    /// Place N non-attacking queens
    Nqueens { n: usize },
    /// DFS cycle detection over edges like `0-1,1-2`
    Cycle {
        #[arg(long)]
        vertices: usize,
        edges: String,
        #[arg(long)]
        directed: bool,
    },
    /// Bucket sort of non-negative integers
    BucketSort {
        values: String,
        #[arg(long, default_value_t = 4)]
        buckets: usize,
    },
    /// Traverse a level-order tree like `1,2,_,4` (`_` is a missing node)
    Tree {
        nodes: String,
        #[arg(long, value_enum, default_value_t = Order::Inorder)]
        order: Order,
    },
    /// Every subset of a list like `1,2,3`
    Subsets { items: String },
    /// Every permutation of a list like `1,2,3`
    Permutations { items: String },
    /// Separate-chaining hash table: ops like `i3=7,s3,d3`
    HashTable {
        ops: String,
        #[arg(long, default_value_t = 7)]
        capacity: usize,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Pre,
    Inorder,
    Post,
    Level,
}

impl From<Order> for TraversalOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Pre => TraversalOrder::Preorder,
            Order::Inorder => TraversalOrder::Inorder,
            Order::Post => TraversalOrder::Postorder,
            Order::Level => TraversalOrder::LevelOrder,
        }
    }
}

/// Raw-text parse failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("'{token}' is not a valid number")]
    BadNumber { token: String },

    #[error("'{token}' is not a valid {expected}")]
    BadToken {
        token: String,
        expected: &'static str,
    },
}

/// A typed producer input, ready to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Dsu(DsuInput),
    HeapBuild(Vec<i64>),
    HeapOps { initial: Vec<i64>, ops: Vec<HeapOp> },
    Prim(PrimInput),
    Queens(QueensInput),
    Cycle(GraphInput),
    BucketSort(BucketInput),
    Tree(TreeInput),
    Choice(ChoiceInput),
    HashTable(HashInput),
}

impl Command {
    /// Parse the raw text arguments into a typed request
    pub fn request(&self) -> Result<Request, InputError> {
        let request = match self {
            Command::Dsu { size, ops } => Request::Dsu(DsuInput {
                size: *size,
                ops: parse_dsu_ops(ops)?,
            }),
            Command::HeapBuild { values } => Request::HeapBuild(parse_values(values)?),
            Command::HeapOps { ops, initial } => Request::HeapOps {
                initial: parse_values(initial)?,
                ops: parse_heap_ops(ops)?,
            },
            Command::Prim {
                vertices,
                edges,
                start,
            } => Request::Prim(PrimInput {
                vertices: *vertices,
                edges: parse_weighted_edges(edges)?,
                start: *start,
            }),
            Command::Nqueens { n } => Request::Queens(QueensInput { n: *n }),
            Command::Cycle {
                vertices,
                edges,
                directed,
            } => Request::Cycle(GraphInput {
                vertices: *vertices,
                edges: parse_edges(edges)?,
                directed: *directed,
            }),
            Command::BucketSort { values, buckets } => Request::BucketSort(BucketInput {
                values: parse_values(values)?,
                bucket_count: *buckets,
            }),
            Command::Tree { nodes, order } => Request::Tree(TreeInput {
                nodes: parse_tree(nodes)?,
                order: (*order).into(),
            }),
            Command::Subsets { items } => Request::Choice(ChoiceInput {
                items: parse_values(items)?,
                mode: ChoiceMode::Subsets,
            }),
            Command::Permutations { items } => Request::Choice(ChoiceInput {
                items: parse_values(items)?,
                mode: ChoiceMode::Permutations,
            }),
            Command::HashTable { ops, capacity } => Request::HashTable(HashInput {
                capacity: *capacity,
                ops: parse_hash_ops(ops)?,
            }),
        };
        Ok(request)
    }
}

impl Request {
    /// The pseudocode listing the trace's cursor lines index into
    pub fn pseudocode(&self) -> &'static [&'static str] {
        match self {
            Request::Dsu(_) => dsu::PSEUDOCODE,
            Request::HeapBuild(_) | Request::HeapOps { .. } => heap::PSEUDOCODE,
            Request::Prim(_) => prim::PSEUDOCODE,
            Request::Queens(_) => nqueens::PSEUDOCODE,
            Request::Cycle(_) => cycle::PSEUDOCODE,
            Request::BucketSort(_) => bucket_sort::PSEUDOCODE,
            Request::Tree(_) => tree_traversal::PSEUDOCODE,
            Request::Choice(_) => backtracking::PSEUDOCODE,
            Request::HashTable(_) => hash_table::PSEUDOCODE,
        }
    }

    /// Run the producer once and project its states for display
    pub fn run(&self) -> Trace<Grid> {
        match self {
            Request::Dsu(input) => dsu::trace(input).map_states(StateView::grid),
            Request::HeapBuild(values) => heap::build(values).map_states(StateView::grid),
            Request::HeapOps { initial, ops } => {
                heap::operations(initial, ops).map_states(StateView::grid)
            }
            Request::Prim(input) => prim::trace(input).map_states(StateView::grid),
            Request::Queens(input) => nqueens::trace(input).map_states(StateView::grid),
            Request::Cycle(input) => cycle::trace(input).map_states(StateView::grid),
            Request::BucketSort(input) => bucket_sort::trace(input).map_states(StateView::grid),
            Request::Tree(input) => tree_traversal::trace(input).map_states(StateView::grid),
            Request::Choice(input) => backtracking::trace(input).map_states(StateView::grid),
            Request::HashTable(input) => hash_table::trace(input).map_states(StateView::grid),
        }
    }
}

/// Comma-separated tokens with surrounding whitespace and empties removed
fn tokens(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|t| !t.is_empty())
}

fn number<T: FromStr>(token: &str) -> Result<T, InputError> {
    token.trim().parse().map_err(|_| InputError::BadNumber {
        token: token.to_string(),
    })
}

/// Split an operation token into its leading tag and the rest
fn tagged(token: &str) -> (Option<char>, &str) {
    let mut chars = token.chars();
    let tag = chars.next();
    (tag, chars.as_str())
}

fn bad(token: &str, expected: &'static str) -> InputError {
    InputError::BadToken {
        token: token.to_string(),
        expected,
    }
}

/// `4,10,3,5,1`
pub fn parse_values(raw: &str) -> Result<Vec<i64>, InputError> {
    tokens(raw).map(number).collect()
}

fn parse_pair(token: &str) -> Result<(usize, usize), InputError> {
    let (a, b) = token.split_once('-').ok_or_else(|| bad(token, "edge"))?;
    Ok((number(a)?, number(b)?))
}

/// `0-1,1-2`
pub fn parse_edges(raw: &str) -> Result<Vec<(usize, usize)>, InputError> {
    tokens(raw).map(parse_pair).collect()
}

/// `0-1:4,1-2:3`
pub fn parse_weighted_edges(raw: &str) -> Result<Vec<WeightedEdge>, InputError> {
    tokens(raw)
        .map(|token| {
            let (pair, weight) = token
                .split_once(':')
                .ok_or_else(|| bad(token, "weighted edge"))?;
            let (from, to) = parse_pair(pair)?;
            Ok(WeightedEdge {
                from,
                to,
                weight: number(weight)?,
            })
        })
        .collect()
}

/// `u0:1,f0`
pub fn parse_dsu_ops(raw: &str) -> Result<Vec<DsuOp>, InputError> {
    tokens(raw)
        .map(|token| match tagged(token) {
            (Some('u'), rest) => {
                let (a, b) = rest
                    .split_once(':')
                    .ok_or_else(|| bad(token, "union operation"))?;
                Ok(DsuOp::Union(number(a)?, number(b)?))
            }
            (Some('f'), rest) => Ok(DsuOp::Find(number(rest)?)),
            _ => Err(bad(token, "dsu operation")),
        })
        .collect()
}

/// `i5,x`
pub fn parse_heap_ops(raw: &str) -> Result<Vec<HeapOp>, InputError> {
    tokens(raw)
        .map(|token| match tagged(token) {
            (Some('i'), rest) => Ok(HeapOp::Insert(number(rest)?)),
            (Some('x'), "") => Ok(HeapOp::ExtractMin),
            _ => Err(bad(token, "heap operation")),
        })
        .collect()
}

/// `i3=7,s3,d3`
pub fn parse_hash_ops(raw: &str) -> Result<Vec<HashOp>, InputError> {
    tokens(raw)
        .map(|token| match tagged(token) {
            (Some('i'), rest) => {
                let (key, value) = rest
                    .split_once('=')
                    .ok_or_else(|| bad(token, "insert operation"))?;
                Ok(HashOp::Insert(number(key)?, number(value)?))
            }
            (Some('s'), rest) => Ok(HashOp::Search(number(rest)?)),
            (Some('d'), rest) => Ok(HashOp::Delete(number(rest)?)),
            _ => Err(bad(token, "hash table operation")),
        })
        .collect()
}

/// `1,2,_,4`
pub fn parse_tree(raw: &str) -> Result<Vec<Option<i64>>, InputError> {
    tokens(raw)
        .map(|token| match token {
            "_" => Ok(None),
            value => number(value).map(Some),
        })
        .collect()
}

/// Plain-text dump of a whole trace for `--print`
pub fn dump(trace: &Trace<Grid>, pseudocode: &[&str]) -> String {
    let mut out = String::new();
    let total = trace.len();
    for (i, step) in trace.iter().enumerate() {
        let _ = writeln!(out, "[{}/{}] {}", i + 1, total, step.message);
        if let Some(code) = step.cursor_line.and_then(|line| pseudocode.get(line)) {
            let _ = writeln!(out, "  > {}", code.trim());
        }
        for line in step.state.to_text().lines() {
            let _ = writeln!(out, "    {}", line);
        }
        if !step.highlight.is_empty() {
            let ids: Vec<String> = step.highlight.iter().map(ToString::to_string).collect();
            let _ = writeln!(out, "    highlight: {}", ids.join(", "));
        }
        for annotation in &step.annotations {
            let _ = writeln!(out, "    {}: {}", annotation.label, annotation.value);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_values_with_spaces() {
        assert_eq!(parse_values(" 4, 10,3 ,5,1"), Ok(vec![4, 10, 3, 5, 1]));
        assert_eq!(parse_values(""), Ok(Vec::new()));
        assert!(parse_values("4,x").is_err());
    }

    #[test]
    fn parses_edges() {
        assert_eq!(parse_edges("0-1,1-2"), Ok(vec![(0, 1), (1, 2)]));
        assert_eq!(
            parse_weighted_edges("0-1:4"),
            Ok(vec![WeightedEdge {
                from: 0,
                to: 1,
                weight: 4
            }])
        );
        assert_eq!(
            parse_edges("0:1"),
            Err(InputError::BadToken {
                token: "0:1".to_string(),
                expected: "edge"
            })
        );
    }

    #[test]
    fn parses_operations() {
        assert_eq!(
            parse_dsu_ops("u0:1,f0"),
            Ok(vec![DsuOp::Union(0, 1), DsuOp::Find(0)])
        );
        assert_eq!(
            parse_heap_ops("i5,x"),
            Ok(vec![HeapOp::Insert(5), HeapOp::ExtractMin])
        );
        assert_eq!(
            parse_hash_ops("i3=7,s3,d-3"),
            Ok(vec![HashOp::Insert(3, 7), HashOp::Search(3), HashOp::Delete(-3)])
        );
        assert!(parse_heap_ops("x1").is_err());
        assert!(parse_dsu_ops("q0").is_err());
    }

    #[test]
    fn parses_tree_with_gaps() {
        assert_eq!(
            parse_tree("1,2,_,4"),
            Ok(vec![Some(1), Some(2), None, Some(4)])
        );
    }

    #[test]
    fn subcommands_parse() {
        let cli = Cli::try_parse_from(["algotrace", "--speed", "50", "nqueens", "4"])
            .unwrap();
        assert_eq!(cli.speed, 50);
        assert_eq!(cli.command, Command::Nqueens { n: 4 });

        let cli = Cli::try_parse_from([
            "algotrace", "cycle", "--vertices", "3", "0-1,1-2,2-0",
        ])
        .unwrap();
        assert_eq!(
            cli.command.request(),
            Ok(Request::Cycle(GraphInput {
                vertices: 3,
                edges: vec![(0, 1), (1, 2), (2, 0)],
                directed: false,
            }))
        );
    }

    #[test]
    fn dump_lists_every_step() {
        let request = Request::HeapBuild(vec![3, 1]);
        let trace = request.run();
        let text = dump(&trace, request.pseudocode());
        assert!(text.starts_with("[1/"));
        let headers = text.lines().filter(|l| l.starts_with('[')).count();
        assert_eq!(headers, trace.len());
    }
}
