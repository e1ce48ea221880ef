//! Binary tree traversals over a level-order array
//!
//! The tree is given as `nodes[i]` with children at `2i + 1` and `2i + 2`;
//! `None` marks a missing node. Node ids are those array positions.

use super::errors::{check_limit, ValidationError};
use super::list;
use crate::constants::MAX_ELEMENTS;
use crate::trace::{produce_with, Annotation, Grid, GridCell, GridRow, Recorder, StateView, Trace};
use std::collections::VecDeque;
use std::fmt;

pub const PSEUDOCODE: &[&str] = &[
    "preorder(node):",
    "  if node is null: return",
    "  visit(node)",
    "  preorder(node.left)",
    "  preorder(node.right)",
    "inorder(node):",
    "  if node is null: return",
    "  inorder(node.left)",
    "  visit(node)",
    "  inorder(node.right)",
    "postorder(node):",
    "  if node is null: return",
    "  postorder(node.left)",
    "  postorder(node.right)",
    "  visit(node)",
    "levelOrder(root):",
    "  queue = [root]",
    "  while queue is not empty:",
    "    node = queue.popFront(); visit(node)",
    "    if node.left: queue.push(node.left)",
    "    if node.right: queue.push(node.right)",
];

/// Indices into [`PSEUDOCODE`]
pub mod lines {
    pub const PRE_NULL: usize = 1;
    pub const PRE_VISIT: usize = 2;
    pub const PRE_LEFT: usize = 3;
    pub const PRE_RIGHT: usize = 4;
    pub const IN_NULL: usize = 6;
    pub const IN_LEFT: usize = 7;
    pub const IN_VISIT: usize = 8;
    pub const IN_RIGHT: usize = 9;
    pub const POST_NULL: usize = 11;
    pub const POST_LEFT: usize = 12;
    pub const POST_RIGHT: usize = 13;
    pub const POST_VISIT: usize = 14;
    pub const LEVEL_INIT: usize = 16;
    pub const LEVEL_LOOP: usize = 17;
    pub const LEVEL_VISIT: usize = 18;
    pub const LEVEL_LEFT: usize = 19;
    pub const LEVEL_RIGHT: usize = 20;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalOrder {
    Preorder,
    Inorder,
    Postorder,
    LevelOrder,
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TraversalOrder::Preorder => "preorder",
            TraversalOrder::Inorder => "inorder",
            TraversalOrder::Postorder => "postorder",
            TraversalOrder::LevelOrder => "level order",
        };
        f.write_str(name)
    }
}

/// Pseudocode lines used by one recursive traversal
struct RecursiveLines {
    null: usize,
    visit: usize,
    left: usize,
    right: usize,
}

impl TraversalOrder {
    fn recursive_lines(self) -> RecursiveLines {
        match self {
            TraversalOrder::Preorder => RecursiveLines {
                null: lines::PRE_NULL,
                visit: lines::PRE_VISIT,
                left: lines::PRE_LEFT,
                right: lines::PRE_RIGHT,
            },
            TraversalOrder::Inorder => RecursiveLines {
                null: lines::IN_NULL,
                visit: lines::IN_VISIT,
                left: lines::IN_LEFT,
                right: lines::IN_RIGHT,
            },
            // Level order is iterative and never reads these
            TraversalOrder::Postorder | TraversalOrder::LevelOrder => RecursiveLines {
                null: lines::POST_NULL,
                visit: lines::POST_VISIT,
                left: lines::POST_LEFT,
                right: lines::POST_RIGHT,
            },
        }
    }
}

/// Which child of a node a step moves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Side {
    /// Array position of this child of `parent`
    fn child_of(self, parent: usize) -> usize {
        match self {
            Side::Left => 2 * parent + 1,
            Side::Right => 2 * parent + 2,
        }
    }

    fn recursive_line(self, plan: &RecursiveLines) -> usize {
        match self {
            Side::Left => plan.left,
            Side::Right => plan.right,
        }
    }

    fn level_line(self) -> usize {
        match self {
            Side::Left => lines::LEVEL_LEFT,
            Side::Right => lines::LEVEL_RIGHT,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Left => "left",
            Side::Right => "right",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeInput {
    pub nodes: Vec<Option<i64>>,
    pub order: TraversalOrder,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TreeState {
    pub nodes: Vec<Option<i64>>,
    pub visited: Vec<usize>,
    pub frontier: Vec<usize>, // Recursion stack, or queue for level order
}

impl TreeState {
    /// Values in visiting order
    pub fn visited_values(&self) -> Vec<i64> {
        self.visited
            .iter()
            .filter_map(|&id| self.nodes.get(id).copied().flatten())
            .collect()
    }
}

impl StateView for TreeState {
    fn grid(&self) -> Grid {
        let mut rows = Vec::new();
        let mut start = 0;
        let mut width = 1;
        let mut depth = 0;
        while start < self.nodes.len() {
            let end = (start + width).min(self.nodes.len());
            let cells = (start..end)
                .map(|id| match self.nodes[id] {
                    Some(v) => GridCell::entity(v.to_string(), id),
                    None => GridCell::plain("·"),
                })
                .collect();
            rows.push(GridRow::new(format!("depth {}", depth), cells));
            start = end;
            width *= 2;
            depth += 1;
        }
        let cell = |&id: &usize| {
            GridCell::entity(
                self.nodes[id].map_or_else(String::new, |v| v.to_string()),
                id,
            )
        };
        rows.push(GridRow::new(
            "visited",
            self.visited.iter().map(cell).collect(),
        ));
        rows.push(GridRow::new(
            "frontier",
            self.frontier.iter().map(cell).collect(),
        ));
        Grid::new(rows)
    }
}

fn validate(input: &TreeInput) -> Result<&TreeInput, ValidationError> {
    check_limit("tree size", input.nodes.len(), MAX_ELEMENTS)?;
    for index in 1..input.nodes.len() {
        if input.nodes[index].is_some() && input.nodes[(index - 1) / 2].is_none() {
            return Err(ValidationError::OrphanNode { index });
        }
    }
    Ok(input)
}

/// Traverse the tree in the requested order
pub fn trace(input: &TreeInput) -> Trace<TreeState> {
    trace_with(input, Recorder::new())
}

/// [`trace`] into a caller-supplied recorder
pub fn trace_with(input: &TreeInput, recorder: Recorder<TreeState>) -> Trace<TreeState> {
    produce_with("tree-traversal", validate(input), recorder, |input, rec| {
        let mut run = TreeRun {
            state: TreeState {
                nodes: input.nodes.clone(),
                visited: Vec::new(),
                frontier: Vec::new(),
            },
            rec,
        };
        run.note(None, format!("{} traversal", input.order), []);

        let root_present = input.nodes.first().copied().flatten().is_some();
        if !root_present {
            let line = match input.order {
                TraversalOrder::LevelOrder => lines::LEVEL_LOOP,
                order => order.recursive_lines().null,
            };
            run.note(Some(line), "The tree is empty".to_string(), []);
        } else if input.order == TraversalOrder::LevelOrder {
            run.level_order();
        } else {
            let plan = input.order.recursive_lines();
            run.walk(0, input.order, &plan);
        }

        let values = list(&run.state.visited_values());
        run.rec.record_annotated(
            &run.state,
            None,
            format!("{} visits {}", input.order, values),
            [],
            &[Annotation::new("order", values)],
        );
    })
}

struct TreeRun<'r> {
    state: TreeState,
    rec: &'r mut Recorder<TreeState>,
}

impl TreeRun<'_> {
    fn note(
        &mut self,
        line: Option<usize>,
        message: String,
        highlight: impl IntoIterator<Item = usize>,
    ) {
        self.rec.record(&self.state, line, message, highlight);
    }

    fn value(&self, id: usize) -> Option<i64> {
        self.state.nodes.get(id).copied().flatten()
    }

    fn visit(&mut self, id: usize, line: usize) {
        self.state.visited.push(id);
        let value = self.value(id).unwrap_or_default();
        self.note(Some(line), format!("Visit {}", value), [id]);
    }

    /// Descend into a child, or record the null check if it is missing
    fn child(&mut self, parent: usize, side: Side, order: TraversalOrder, plan: &RecursiveLines) {
        let id = side.child_of(parent);
        let line = side.recursive_line(plan);
        let parent_value = self.value(parent).unwrap_or_default();

        match self.value(id) {
            Some(v) => {
                self.note(
                    Some(line),
                    format!("Go {} from {} to {}", side, parent_value, v),
                    [parent, id],
                );
                self.walk(id, order, plan);
            }
            None => {
                self.note(
                    Some(line),
                    format!("Go {} from {}", side, parent_value),
                    [parent],
                );
                self.note(
                    Some(plan.null),
                    format!("The {} child of {} is null: return", side, parent_value),
                    [parent],
                );
            }
        }
    }

    fn walk(&mut self, id: usize, order: TraversalOrder, plan: &RecursiveLines) {
        self.state.frontier.push(id);
        match order {
            TraversalOrder::Preorder => {
                self.visit(id, plan.visit);
                self.child(id, Side::Left, order, plan);
                self.child(id, Side::Right, order, plan);
            }
            TraversalOrder::Inorder => {
                self.child(id, Side::Left, order, plan);
                self.visit(id, plan.visit);
                self.child(id, Side::Right, order, plan);
            }
            TraversalOrder::Postorder | TraversalOrder::LevelOrder => {
                self.child(id, Side::Left, order, plan);
                self.child(id, Side::Right, order, plan);
                self.visit(id, plan.visit);
            }
        }
        self.state.frontier.pop();
    }

    fn level_order(&mut self) {
        let mut queue = VecDeque::from([0]);
        self.state.frontier = vec![0];
        self.note(Some(lines::LEVEL_INIT), "queue = [root]".to_string(), [0]);

        while let Some(id) = queue.pop_front() {
            self.note(
                Some(lines::LEVEL_LOOP),
                format!("Queue holds {} node(s)", queue.len() + 1),
                [id],
            );
            self.state.frontier = queue.iter().copied().collect();
            self.visit(id, lines::LEVEL_VISIT);

            for side in [Side::Left, Side::Right] {
                let (child, line) = (side.child_of(id), side.level_line());
                if let Some(v) = self.value(child) {
                    queue.push_back(child);
                    self.state.frontier = queue.iter().copied().collect();
                    self.note(
                        Some(line),
                        format!("Enqueue {} child {}", side, v),
                        [id, child],
                    );
                } else {
                    self.note(
                        Some(line),
                        format!("No {} child", side),
                        [id],
                    );
                }
            }
        }

        self.note(
            Some(lines::LEVEL_LOOP),
            "Queue is empty: done".to_string(),
            [],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(order: TraversalOrder) -> TreeInput {
        //        1
        //      2   3
        //     4 5 _ 6
        TreeInput {
            nodes: vec![Some(1), Some(2), Some(3), Some(4), Some(5), None, Some(6)],
            order,
        }
    }

    #[test]
    fn all_orders_visit_correctly() {
        let cases = [
            (TraversalOrder::Preorder, vec![1, 2, 4, 5, 3, 6]),
            (TraversalOrder::Inorder, vec![4, 2, 5, 1, 3, 6]),
            (TraversalOrder::Postorder, vec![4, 5, 2, 6, 3, 1]),
            (TraversalOrder::LevelOrder, vec![1, 2, 3, 4, 5, 6]),
        ];
        for (order, expected) in cases {
            let trace = trace(&tree(order));
            assert_eq!(trace.last().state.visited_values(), expected, "{}", order);
        }
    }

    #[test]
    fn orphan_is_rejected() {
        let trace = trace(&TreeInput {
            nodes: vec![Some(1), None, Some(3), Some(4)],
            order: TraversalOrder::Inorder,
        });
        assert_eq!(
            trace.rejection(),
            Some(&ValidationError::OrphanNode { index: 3 })
        );
    }

    #[test]
    fn empty_tree_traces() {
        let trace = trace(&TreeInput {
            nodes: Vec::new(),
            order: TraversalOrder::Preorder,
        });
        assert_eq!(trace.len(), 3);
        assert!(trace.last().state.visited.is_empty());
    }

    #[test]
    fn missing_children_name_their_side() {
        let trace = trace(&TreeInput {
            nodes: vec![Some(1), Some(2)],
            order: TraversalOrder::Inorder,
        });
        let null_checks: Vec<&str> = trace
            .steps_at_line(lines::IN_NULL)
            .map(|step| step.message.as_str())
            .collect();
        assert_eq!(
            null_checks,
            vec![
                "The left child of 2 is null: return",
                "The right child of 2 is null: return",
                "The right child of 1 is null: return",
            ]
        );
        assert_eq!(Side::Left.child_of(3), 7);
        assert_eq!(Side::Right.child_of(3), 8);
    }
}
