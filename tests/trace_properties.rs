// Property tests over every producer and the playback controller

use algotrace::algorithms::backtracking::{self, ChoiceInput, ChoiceMode};
use algotrace::algorithms::bucket_sort::{self, BucketInput};
use algotrace::algorithms::cycle::{self, GraphInput};
use algotrace::algorithms::dsu::{self, DsuInput, DsuOp};
use algotrace::algorithms::hash_table::{self, HashInput, HashOp};
use algotrace::algorithms::heap::{self, HeapOp};
use algotrace::algorithms::nqueens::{self, QueensInput};
use algotrace::algorithms::prim::{self, PrimInput, WeightedEdge};
use algotrace::algorithms::tree_traversal::{self, TraversalOrder, TreeInput};
use algotrace::playback::{Mode, Playback};
use algotrace::trace::{Recorder, StateView, Step, Trace};
use proptest::prelude::*;
use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Every step's cursor line must point into the listing
fn assert_lines_in_range<S>(trace: &Trace<S>, pseudocode: &[&str]) {
    assert!(!trace.is_empty());
    for step in trace {
        if let Some(line) = step.cursor_line {
            assert!(line < pseudocode.len(), "line {} out of range", line);
        }
    }
}

/// Run a producer twice, once with a recorder that copies every step the
/// moment it is appended. The copies must match the finished trace and the
/// two runs must be identical.
fn check_run<S>(pseudocode: &[&str], run: impl Fn(Recorder<S>) -> Trace<S>) -> Trace<S>
where
    S: Clone + PartialEq + Debug + 'static,
{
    let seen: Rc<RefCell<Vec<Step<S>>>> = Rc::default();
    let sink = Rc::clone(&seen);
    let observed = run(Recorder::new().observed(move |step| sink.borrow_mut().push(step.clone())));

    if !observed.is_rejected() {
        assert_eq!(observed.steps(), seen.borrow().as_slice());
    }
    assert_eq!(observed, run(Recorder::new()));
    assert_lines_in_range(&observed, pseudocode);
    observed
}

/// Level-order node arrays with every present node's parent present
fn tree_nodes() -> impl Strategy<Value = Vec<Option<i64>>> {
    prop::collection::vec(prop::option::of(-50i64..50), 0..16).prop_map(|mut nodes| {
        for i in 1..nodes.len() {
            if nodes[(i - 1) / 2].is_none() {
                nodes[i] = None;
            }
        }
        nodes
    })
}

fn dsu_ops(size: usize) -> impl Strategy<Value = Vec<DsuOp>> {
    let op = prop_oneof![
        (0..size, 0..size).prop_map(|(a, b)| DsuOp::Union(a, b)),
        (0..size).prop_map(DsuOp::Find),
    ];
    prop::collection::vec(op, 0..12)
}

fn heap_ops() -> impl Strategy<Value = Vec<HeapOp>> {
    let op = prop_oneof![
        (-50i64..50).prop_map(HeapOp::Insert),
        Just(HeapOp::ExtractMin),
    ];
    prop::collection::vec(op, 0..10)
}

fn hash_ops() -> impl Strategy<Value = Vec<HashOp>> {
    let op = prop_oneof![
        (-20i64..20, any::<i64>()).prop_map(|(k, v)| HashOp::Insert(k, v)),
        (-20i64..20).prop_map(HashOp::Search),
        (-20i64..20).prop_map(HashOp::Delete),
    ];
    prop::collection::vec(op, 0..12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn dsu_is_deterministic(size in 1usize..8, seed in any::<u64>()) {
        let ops: Vec<DsuOp> = (0..6u64)
            .map(|i| {
                let a = ((seed >> (i * 4)) as usize) % size;
                let b = ((seed >> (i * 4 + 2)) as usize) % size;
                if i % 3 == 2 { DsuOp::Find(a) } else { DsuOp::Union(a, b) }
            })
            .collect();
        let input = DsuInput { size, ops };
        check_run(dsu::PSEUDOCODE, |rec| dsu::trace_with(&input, rec));
    }

    #[test]
    fn dsu_random_ops_end_consistent(ops in dsu_ops(6)) {
        let trace = dsu::trace(&DsuInput { size: 6, ops });
        let last = &trace.last().state;
        for x in 0..6 {
            // Every parent chain ends at a root
            let root = last.root_of(x);
            prop_assert_eq!(last.parent[root], root);
        }
    }

    #[test]
    fn heap_build_keeps_its_input_frozen(values in prop::collection::vec(-100i64..100, 0..20)) {
        let trace = check_run(heap::PSEUDOCODE, |rec| heap::build_with(&values, rec));
        prop_assert_eq!(&trace.first().state.items, &values);
        prop_assert_eq!(heap::heap_violation(&trace.last().state.items), None);

        let mut sorted_in = values.clone();
        sorted_in.sort_unstable();
        for step in &trace {
            let mut sorted_step = step.state.items.clone();
            sorted_step.sort_unstable();
            prop_assert_eq!(&sorted_step, &sorted_in);
        }
    }

    #[test]
    fn heap_operations_keep_heap_order(ops in heap_ops()) {
        let trace = check_run(heap::PSEUDOCODE, |rec| heap::operations_with(&[1, 5, 3], &ops, rec));
        prop_assert!(!trace.is_rejected());
        prop_assert_eq!(heap::heap_violation(&trace.last().state.items), None);
    }

    #[test]
    fn bucket_sort_sorts(values in prop::collection::vec(0i64..1000, 0..30), k in 1usize..8) {
        let input = BucketInput { values: values.clone(), bucket_count: k };
        let trace = check_run(bucket_sort::PSEUDOCODE, |rec| bucket_sort::trace_with(&input, rec));
        let mut expected = values.clone();
        expected.sort_unstable();
        if !values.is_empty() {
            prop_assert_eq!(&trace.last().state.output, &expected);
        }
        prop_assert!(trace.first().state.buckets.is_empty());
    }

    #[test]
    fn cycle_detection_is_deterministic(
        vertices in 1usize..7,
        pairs in prop::collection::vec((0usize..7, 0usize..7), 0..10),
        directed in any::<bool>(),
    ) {
        let mut edges: Vec<(usize, usize)> = Vec::new();
        for (a, b) in pairs {
            let (a, b) = (a % vertices, b % vertices);
            let dup = edges.iter().any(|&(x, y)| {
                (x, y) == (a, b) || (!directed && (y, x) == (a, b))
            });
            if !dup {
                edges.push((a, b));
            }
        }
        let input = GraphInput { vertices, edges, directed };
        let trace = check_run(cycle::PSEUDOCODE, |rec| cycle::trace_with(&input, rec));
        prop_assert!(!trace.is_rejected());
        prop_assert!(trace.steps_at_line(cycle::lines::BACK_EDGE).count() <= 1);
    }

    #[test]
    fn prim_never_panics(
        vertices in 1usize..6,
        raw in prop::collection::vec((0usize..6, 0usize..6, any::<i64>()), 0..10),
    ) {
        let edges = raw
            .into_iter()
            .map(|(a, b, w)| WeightedEdge { from: a % vertices, to: b % vertices, weight: w })
            .collect();
        let input = PrimInput { vertices, edges, start: 0 };
        let trace = check_run(prim::PSEUDOCODE, |rec| prim::trace_with(&input, rec));
        let last = &trace.last().state;
        prop_assert_eq!(last.mst_edges.len() + 1 == vertices, last.complete);
        let total: i128 = last.mst_edges.iter().map(|e| i128::from(e.weight)).sum();
        prop_assert_eq!(last.total_weight, total);
    }

    #[test]
    fn hash_table_matches_a_map(ops in hash_ops(), capacity in 1usize..6) {
        let input = HashInput { capacity, ops: ops.clone() };
        let trace = check_run(hash_table::PSEUDOCODE, |rec| hash_table::trace_with(&input, rec));
        let mut model = std::collections::BTreeMap::new();
        for op in ops {
            match op {
                HashOp::Insert(k, v) => { model.insert(k, v); }
                HashOp::Delete(k) => { model.remove(&k); }
                HashOp::Search(_) => {}
            }
        }
        let last = &trace.last().state;
        prop_assert_eq!(last.len(), model.len());
        for (k, v) in model {
            prop_assert_eq!(last.get(k), Some(v));
        }
    }

    #[test]
    fn nqueens_is_deterministic(n in 0usize..=5) {
        let trace = check_run(nqueens::PSEUDOCODE, |rec| {
            nqueens::trace_with(&QueensInput { n }, rec)
        });
        prop_assert!(trace.last().state.board.iter().flatten().all(|&q| !q));
    }

    #[test]
    fn tree_traversal_is_deterministic(nodes in tree_nodes(), order_index in 0usize..4) {
        let order = [
            TraversalOrder::Preorder,
            TraversalOrder::Inorder,
            TraversalOrder::Postorder,
            TraversalOrder::LevelOrder,
        ][order_index];
        let present = nodes.iter().flatten().count();
        let input = TreeInput { nodes, order };
        let trace = check_run(tree_traversal::PSEUDOCODE, |rec| {
            tree_traversal::trace_with(&input, rec)
        });
        prop_assert!(!trace.is_rejected());
        prop_assert_eq!(trace.last().state.visited.len(), present);
    }

    #[test]
    fn backtracking_is_deterministic(
        items in prop::collection::vec(-9i64..9, 0..5),
        permutations in any::<bool>(),
    ) {
        let mode = if permutations { ChoiceMode::Permutations } else { ChoiceMode::Subsets };
        let expected: usize = if permutations {
            (1..=items.len()).product()
        } else {
            1 << items.len()
        };
        let input = ChoiceInput { items, mode };
        let trace = check_run(backtracking::PSEUDOCODE, |rec| {
            backtracking::trace_with(&input, rec)
        });
        let count = expected.to_string();
        prop_assert_eq!(trace.last().annotation("count"), Some(count.as_str()));
    }

    #[test]
    fn playback_cursor_moves_one_step_at_a_time(actions in prop::collection::vec(0u8..8, 0..40)) {
        let trace = nqueens::trace(&QueensInput { n: 4 }).map_states(StateView::grid);
        let len = trace.len();
        let t0 = Instant::now();
        let mut playback = Playback::with_speed(trace, 5);
        let mut now = t0;

        for action in actions {
            let before = playback.cursor();
            match action {
                0 => { playback.play_at(now); }
                1 => { playback.pause(); }
                2 => {
                    let moved = playback.step();
                    if moved { prop_assert_eq!(playback.cursor(), before + 1); }
                }
                3 => {
                    let moved = playback.step_back();
                    if moved { prop_assert_eq!(playback.cursor() + 1, before); }
                }
                4 => { playback.jump_to_start(); }
                5 => { playback.jump_to_end(); }
                6 => { playback.reset(); playback.restart(); }
                _ => {
                    now += Duration::from_millis(7);
                    playback.poll_at(now);
                    prop_assert!(playback.cursor() >= before);
                }
            }
            prop_assert!(playback.cursor() < len);
            prop_assert_eq!(playback.mode() == Mode::Playing, playback.pending_deadline().is_some());
            prop_assert_eq!(playback.mode() == Mode::Finished, playback.cursor() == len - 1);
        }
    }
}

#[test]
fn every_producer_yields_a_non_empty_trace() {
    let tree = tree_traversal::trace(&TreeInput {
        nodes: vec![Some(1), None, Some(2)],
        order: TraversalOrder::Postorder,
    });
    assert_lines_in_range(&tree, tree_traversal::PSEUDOCODE);

    let perms = backtracking::trace(&ChoiceInput {
        items: vec![1, 2],
        mode: ChoiceMode::Permutations,
    });
    assert_lines_in_range(&perms, backtracking::PSEUDOCODE);

    let queens = nqueens::trace(&QueensInput { n: 5 });
    assert_lines_in_range(&queens, nqueens::PSEUDOCODE);

    // Empty inputs still record a start and a terminal step
    let prim_empty = prim::trace(&PrimInput { vertices: 0, edges: Vec::new(), start: 0 });
    assert!(!prim_empty.is_rejected());
    assert_eq!(prim_empty.len(), 2);
    assert!(prim_empty.last().state.complete);
    assert_eq!(prim_empty.last().annotation("total weight"), Some("0"));

    let cycle_empty = cycle::trace(&GraphInput { vertices: 0, edges: Vec::new(), directed: false });
    assert!(!cycle_empty.is_rejected());
    assert_eq!(cycle_empty.len(), 3);
    assert_eq!(cycle_empty.last().annotation("cycle"), Some("none"));

    let tree_empty = tree_traversal::trace(&TreeInput {
        nodes: Vec::new(),
        order: TraversalOrder::LevelOrder,
    });
    assert!(!tree_empty.is_rejected());
    assert_eq!(tree_empty.len(), 3);
    assert_eq!(tree_empty.last().annotation("order"), Some("[]"));

    let hash_empty = hash_table::trace(&HashInput { capacity: 3, ops: Vec::new() });
    assert!(!hash_empty.is_rejected());
    assert_eq!(hash_empty.len(), 2);
    assert_eq!(hash_empty.last().annotation("size"), Some("0"));

    for mode in [ChoiceMode::Subsets, ChoiceMode::Permutations] {
        let choice_empty = backtracking::trace(&ChoiceInput { items: Vec::new(), mode });
        assert!(!choice_empty.is_rejected());
        assert!(choice_empty.len() >= 2);
        assert_eq!(choice_empty.last().annotation("count"), Some("1"));
    }

    // Rejected input still yields one step
    let rejected = backtracking::trace(&ChoiceInput {
        items: vec![0; 20],
        mode: ChoiceMode::Subsets,
    });
    assert_eq!(rejected.len(), 1);
    assert!(rejected.is_rejected());
    assert_eq!(rejected.first().cursor_line, None);
}
