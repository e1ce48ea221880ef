//! Binary min-heap operations
//!
//! `heapify_up` and `heapify_down` record index computation, each
//! comparison, the swap and the loop continuation or termination as separate
//! steps. `build` walks from the last non-leaf index down to the root, one
//! top-level `heapifyDown(i)` call per index.

use super::errors::{check_limit, ValidationError};
use super::list;
use crate::constants::MAX_ELEMENTS;
use crate::trace::{produce, produce_with, Annotation, Grid, GridRow, Recorder, StateView, Trace};

pub const PSEUDOCODE: &[&str] = &[
    "heapifyUp(i):",
    "  while i > 0:",
    "    p = (i - 1) / 2",
    "    if a[i] >= a[p]: break",
    "    swap(a[i], a[p])",
    "    i = p",
    "",
    "heapifyDown(i):",
    "  loop:",
    "    l = 2i + 1, r = 2i + 2, smallest = i",
    "    if l < n and a[l] < a[smallest]: smallest = l",
    "    if r < n and a[r] < a[smallest]: smallest = r",
    "    if smallest == i: break",
    "    swap(a[i], a[smallest])",
    "    i = smallest",
    "",
    "insert(v):",
    "  a.push(v); heapifyUp(n - 1)",
    "extractMin():",
    "  if n == 0: return none",
    "  min = a[0]; a[0] = a[n - 1]; a.pop()",
    "  heapifyDown(0); return min",
    "buildHeap(a):",
    "  for i = n/2 - 1 down to 0:",
    "    heapifyDown(i)",
];

/// Indices into [`PSEUDOCODE`]
pub mod lines {
    pub const UP_LOOP: usize = 1;
    pub const UP_PARENT: usize = 2;
    pub const UP_COMPARE: usize = 3;
    pub const UP_SWAP: usize = 4;
    pub const UP_CONTINUE: usize = 5;
    pub const DOWN_LOOP: usize = 8;
    pub const DOWN_CHILDREN: usize = 9;
    pub const DOWN_COMPARE_LEFT: usize = 10;
    pub const DOWN_COMPARE_RIGHT: usize = 11;
    pub const DOWN_STOP: usize = 12;
    pub const DOWN_SWAP: usize = 13;
    pub const DOWN_CONTINUE: usize = 14;
    pub const INSERT: usize = 17;
    pub const EXTRACT_EMPTY: usize = 19;
    pub const EXTRACT_MOVE_LAST: usize = 20;
    pub const EXTRACT_RETURN: usize = 21;
    pub const BUILD_LOOP: usize = 23;
    pub const BUILD_CALL: usize = 24;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapOp {
    Insert(i64),
    ExtractMin,
}

/// The heap array
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeapState {
    pub items: Vec<i64>,
}

impl StateView for HeapState {
    fn grid(&self) -> Grid {
        let indices: Vec<usize> = (0..self.items.len()).collect();
        Grid::new(vec![
            GridRow::indexed("index", &indices),
            GridRow::indexed("heap", &self.items),
        ])
    }
}

/// First index that breaks the min-heap property, if any
pub fn heap_violation(items: &[i64]) -> Option<usize> {
    (1..items.len()).find(|&i| items[i] < items[(i - 1) / 2])
}

fn validate_heap(items: &[i64]) -> Result<(), ValidationError> {
    check_limit("heap size", items.len(), MAX_ELEMENTS)?;
    if let Some(index) = heap_violation(items) {
        return Err(ValidationError::NotAHeap {
            index,
            child: items[index],
            parent: items[(index - 1) / 2],
        });
    }
    Ok(())
}

/// Turn an arbitrary array into a min-heap
pub fn build(values: &[i64]) -> Trace<HeapState> {
    build_with(values, Recorder::new())
}

/// [`build`] into a caller-supplied recorder
pub fn build_with(values: &[i64], recorder: Recorder<HeapState>) -> Trace<HeapState> {
    let valid = check_limit("array length", values.len(), MAX_ELEMENTS).map(|_| values);
    produce_with("heap-build", valid, recorder, |values, rec| {
        let mut run = HeapRun {
            state: HeapState {
                items: values.to_vec(),
            },
            rec,
        };
        run.note(None, format!("buildHeap({})", list(values)), []);
        run.build();
        run.rec.record_annotated(
            &run.state,
            None,
            format!("Done: {} is a min-heap", list(&run.state.items)),
            [],
            &[Annotation::new("heap", list(&run.state.items))],
        );
    })
}

/// Apply inserts and extract-mins to an existing min-heap
pub fn operations(initial: &[i64], ops: &[HeapOp]) -> Trace<HeapState> {
    operations_with(initial, ops, Recorder::new())
}

/// [`operations`] into a caller-supplied recorder
pub fn operations_with(
    initial: &[i64],
    ops: &[HeapOp],
    recorder: Recorder<HeapState>,
) -> Trace<HeapState> {
    let valid = validate_heap(initial)
        .and_then(|_| check_limit("heap size", initial.len() + ops.len(), MAX_ELEMENTS))
        .map(|_| (initial, ops));
    produce_with("heap-ops", valid, recorder, |(initial, ops), rec| {
        let mut run = HeapRun {
            state: HeapState {
                items: initial.to_vec(),
            },
            rec,
        };
        run.note(None, format!("Start with heap {}", list(initial)), []);

        let mut extracted = Vec::new();
        for op in ops {
            match *op {
                HeapOp::Insert(value) => run.insert(value),
                HeapOp::ExtractMin => {
                    if let Some(min) = run.extract_min() {
                        extracted.push(min);
                    }
                }
            }
        }

        run.rec.record_annotated(
            &run.state,
            None,
            format!("All operations complete: heap {}", list(&run.state.items)),
            [],
            &[Annotation::new("extracted", list(&extracted))],
        );
    })
}

/// Trace a single `heapifyUp(i)` on an array that is a heap except at `i`
pub fn heapify_up(items: &[i64], index: usize) -> Trace<HeapState> {
    let valid = check_limit("heap size", items.len(), MAX_ELEMENTS)
        .and_then(|_| super::errors::check_index("heap", index, items.len()))
        .map(|_| (items, index));
    produce("heapify-up", valid, |(items, index), rec| {
        let mut run = HeapRun {
            state: HeapState {
                items: items.to_vec(),
            },
            rec,
        };
        run.note(None, format!("heapifyUp({})", index), [index]);
        run.sift_up(index);
        run.note(None, format!("Done: {}", list(&run.state.items)), []);
    })
}

/// Trace a single `heapifyDown(i)` on an array whose subtrees below `i` are heaps
pub fn heapify_down(items: &[i64], index: usize) -> Trace<HeapState> {
    let valid = check_limit("heap size", items.len(), MAX_ELEMENTS)
        .and_then(|_| super::errors::check_index("heap", index, items.len()))
        .map(|_| (items, index));
    produce("heapify-down", valid, |(items, index), rec| {
        let mut run = HeapRun {
            state: HeapState {
                items: items.to_vec(),
            },
            rec,
        };
        run.note(None, format!("heapifyDown({})", index), [index]);
        run.sift_down(index);
        run.note(None, format!("Done: {}", list(&run.state.items)), []);
    })
}

struct HeapRun<'r> {
    state: HeapState,
    rec: &'r mut Recorder<HeapState>,
}

impl HeapRun<'_> {
    fn note(
        &mut self,
        line: Option<usize>,
        message: String,
        highlight: impl IntoIterator<Item = usize>,
    ) {
        self.rec.record(&self.state, line, message, highlight);
    }

    fn sift_up(&mut self, mut i: usize) {
        loop {
            if i == 0 {
                self.note(
                    Some(lines::UP_LOOP),
                    "i == 0: reached the root, stop".to_string(),
                    [0],
                );
                return;
            }
            self.note(
                Some(lines::UP_LOOP),
                format!("i = {} > 0: keep going", i),
                [i],
            );

            let p = (i - 1) / 2;
            self.note(
                Some(lines::UP_PARENT),
                format!("parent of {} is ({} - 1) / 2 = {}", i, i, p),
                [i, p],
            );

            let (child, parent) = (self.state.items[i], self.state.items[p]);
            if child >= parent {
                self.note(
                    Some(lines::UP_COMPARE),
                    format!("a[{}] = {} >= a[{}] = {}: heap order holds, stop", i, child, p, parent),
                    [i, p],
                );
                return;
            }
            self.note(
                Some(lines::UP_COMPARE),
                format!("a[{}] = {} < a[{}] = {}: must swap", i, child, p, parent),
                [i, p],
            );

            self.state.items.swap(i, p);
            self.note(
                Some(lines::UP_SWAP),
                format!("Swapped a[{}] and a[{}]", i, p),
                [i, p],
            );

            i = p;
            self.note(
                Some(lines::UP_CONTINUE),
                format!("Move up to index {}", i),
                [i],
            );
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.state.items.len();
        loop {
            let (l, r) = (2 * i + 1, 2 * i + 2);
            let mut smallest = i;
            self.note(
                Some(lines::DOWN_CHILDREN),
                format!("i = {}: left child {}, right child {}", i, l, r),
                [i],
            );

            if l < n {
                let (left, current) = (self.state.items[l], self.state.items[smallest]);
                if left < current {
                    smallest = l;
                    self.note(
                        Some(lines::DOWN_COMPARE_LEFT),
                        format!("a[{}] = {} < {}: smallest = {}", l, left, current, l),
                        [i, l],
                    );
                } else {
                    self.note(
                        Some(lines::DOWN_COMPARE_LEFT),
                        format!("a[{}] = {} >= {}: smallest stays {}", l, left, current, smallest),
                        [i, l],
                    );
                }
            } else {
                self.note(
                    Some(lines::DOWN_COMPARE_LEFT),
                    format!("left child {} is past the end ({})", l, n),
                    [i],
                );
            }

            if r < n {
                let (right, current) = (self.state.items[r], self.state.items[smallest]);
                if right < current {
                    smallest = r;
                    self.note(
                        Some(lines::DOWN_COMPARE_RIGHT),
                        format!("a[{}] = {} < {}: smallest = {}", r, right, current, r),
                        [i, r],
                    );
                } else {
                    self.note(
                        Some(lines::DOWN_COMPARE_RIGHT),
                        format!("a[{}] = {} >= {}: smallest stays {}", r, right, current, smallest),
                        [i, r],
                    );
                }
            } else {
                self.note(
                    Some(lines::DOWN_COMPARE_RIGHT),
                    format!("right child {} is past the end ({})", r, n),
                    [i],
                );
            }

            if smallest == i {
                self.note(
                    Some(lines::DOWN_STOP),
                    format!("smallest == {}: heap order holds, stop", i),
                    [i],
                );
                return;
            }
            self.note(
                Some(lines::DOWN_STOP),
                format!("smallest = {} != {}: continue", smallest, i),
                [i, smallest],
            );

            self.state.items.swap(i, smallest);
            self.note(
                Some(lines::DOWN_SWAP),
                format!("Swapped a[{}] and a[{}]", i, smallest),
                [i, smallest],
            );

            i = smallest;
            self.note(
                Some(lines::DOWN_CONTINUE),
                format!("Move down to index {}", i),
                [i],
            );
        }
    }

    fn insert(&mut self, value: i64) {
        self.state.items.push(value);
        let last = self.state.items.len() - 1;
        self.note(
            Some(lines::INSERT),
            format!("insert({}): appended at index {}", value, last),
            [last],
        );
        self.sift_up(last);
    }

    fn extract_min(&mut self) -> Option<i64> {
        if self.state.items.is_empty() {
            self.note(
                Some(lines::EXTRACT_EMPTY),
                "extractMin(): heap is empty, nothing to extract".to_string(),
                [],
            );
            return None;
        }

        let min = self.state.items[0];
        let last = self.state.items.len() - 1;
        self.state.items.swap(0, last);
        self.state.items.pop();
        self.note(
            Some(lines::EXTRACT_MOVE_LAST),
            format!("extractMin(): took {}, moved a[{}] to the root", min, last),
            [0],
        );

        if !self.state.items.is_empty() {
            self.sift_down(0);
        }
        self.note(
            Some(lines::EXTRACT_RETURN),
            format!("extractMin() returns {}", min),
            [],
        );
        Some(min)
    }

    fn build(&mut self) {
        let n = self.state.items.len();
        if n < 2 {
            self.note(
                Some(lines::BUILD_LOOP),
                format!("n = {}: no non-leaf nodes, already a heap", n),
                [],
            );
            return;
        }

        let start = n / 2 - 1;
        self.note(
            Some(lines::BUILD_LOOP),
            format!("Last non-leaf index is {}/2 - 1 = {}", n, start),
            [start],
        );
        for i in (0..=start).rev() {
            self.note(
                Some(lines::BUILD_CALL),
                format!("heapifyDown({})", i),
                [i],
            );
            self.sift_down(i);
        }
    }
}
