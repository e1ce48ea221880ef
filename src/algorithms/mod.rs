//! Trace producers, one module per algorithm family
//!
//! Each module follows the same layout:
//! - an input type, validated up front (see [`errors`])
//! - a working-state type that implements [`StateView`](crate::trace::StateView)
//! - a `PSEUDOCODE` listing and a `lines` module naming its indices
//! - one or more entry points that run the algorithm once through
//!   [`produce`](crate::trace::produce) and return the finished trace
//!
//! Producers never fail past their own boundary. Bad input becomes a one-step
//! rejected trace; "no solution" or "not found" outcomes are ordinary
//! terminal steps.
//!
//! - [`dsu`]: union-find with path compression and union by rank
//! - [`heap`]: binary min-heap insert, extract-min and build
//! - [`prim`]: Prim's minimum spanning tree with a linear key scan
//! - [`nqueens`]: N-Queens backtracking
//! - [`cycle`]: DFS cycle detection for undirected and directed graphs
//! - [`bucket_sort`]: bucket sort with per-bucket insertion sort
//! - [`tree_traversal`]: pre/in/post/level-order binary tree traversal
//! - [`backtracking`]: subset and permutation generation
//! - [`hash_table`]: separate-chaining hash table operations

pub mod backtracking;
pub mod bucket_sort;
pub mod cycle;
pub mod dsu;
pub mod errors;
pub mod hash_table;
pub mod heap;
pub mod nqueens;
pub mod prim;
pub mod tree_traversal;

use errors::ValidationError;

/// Check that every endpoint names an existing vertex
pub(crate) fn check_vertices(
    vertices: usize,
    endpoints: impl IntoIterator<Item = usize>,
) -> Result<(), ValidationError> {
    for vertex in endpoints {
        if vertex >= vertices {
            return Err(ValidationError::InvalidVertex {
                vertex,
                count: vertices,
            });
        }
    }
    Ok(())
}

/// Render a list of values as `[a, b, c]`
pub(crate) fn list<T: ToString>(values: &[T]) -> String {
    let parts: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("[{}]", parts.join(", "))
}
