// End-to-end scenarios: producer output checked step by step

use algotrace::algorithms::cycle::{self, GraphInput};
use algotrace::algorithms::dsu::{self, DsuInput, DsuOp};
use algotrace::algorithms::heap;
use algotrace::algorithms::nqueens::{self, QueensInput};
use algotrace::algorithms::prim::{self, PrimInput, WeightedEdge};
use algotrace::playback::{Mode, Playback};
use algotrace::trace::{produce, StateView};
use std::time::{Duration, Instant};

#[test]
fn test_dsu_find_on_root_needs_no_compression() {
    let trace = dsu::trace(&DsuInput {
        size: 5,
        ops: vec![DsuOp::Union(0, 1), DsuOp::Union(2, 3), DsuOp::Find(0)],
    });

    let last = trace.last();
    assert_eq!(last.annotation("last result"), Some("find(0) = 0"));
    assert_eq!(last.annotation("sets"), Some("3"));
    assert_eq!(trace.steps_at_line(dsu::lines::COMPRESS).count(), 0);
    assert_eq!(last.state.parent, vec![0, 0, 2, 2, 4]);
    assert_eq!(last.state.rank, vec![1, 0, 1, 0, 0]);
}

#[test]
fn test_dsu_compression_rewrites_long_path() {
    // The three unions leave the path 0 -> 1 -> 3
    let trace = dsu::trace(&DsuInput {
        size: 4,
        ops: vec![
            DsuOp::Union(1, 0),
            DsuOp::Union(3, 2),
            DsuOp::Union(3, 1),
            DsuOp::Find(0),
        ],
    });
    let last = trace.last();
    assert_eq!(last.annotation("last result"), Some("find(0) = 3"));
    assert_eq!(last.state.parent[0], 3);
    assert!(trace.steps_at_line(dsu::lines::COMPRESS).count() >= 1);
}

#[test]
fn test_heap_build_scenario() {
    let trace = heap::build(&[4, 10, 3, 5, 1]);
    assert_eq!(trace.last().state.items, vec![1, 4, 3, 5, 10]);
    assert_eq!(trace.steps_at_line(heap::lines::BUILD_CALL).count(), 2);
    assert_eq!(trace.first().state.items, vec![4, 10, 3, 5, 1]);
}

#[test]
fn test_nqueens_four_has_two_solutions() {
    let trace = nqueens::trace(&QueensInput { n: 4 });
    let solutions: Vec<_> = trace.steps_at_line(nqueens::lines::SOLUTION).collect();
    assert_eq!(solutions.len(), 2);
    assert_eq!(solutions[0].annotation("solution"), Some("[1, 3, 0, 2]"));
    assert_eq!(solutions[0].state.placement(), Some(vec![1, 3, 0, 2]));
    assert_eq!(solutions[1].annotation("solution"), Some("[2, 0, 3, 1]"));
    assert_eq!(trace.last().annotation("solutions"), Some("2"));
}

#[test]
fn test_nqueens_zero_has_one_empty_solution() {
    let trace = nqueens::trace(&QueensInput { n: 0 });
    assert_eq!(trace.steps_at_line(nqueens::lines::SOLUTION).count(), 1);
}

#[test]
fn test_undirected_triangle_back_edge_skips_parent() {
    let trace = cycle::trace(&GraphInput {
        vertices: 3,
        edges: vec![(0, 1), (1, 2), (2, 0)],
        directed: false,
    });

    let last = trace.last();
    assert_eq!(last.state.back_edge, Some((2, 0)));
    assert_ne!(last.state.parent[2], Some(0));
    assert_eq!(last.state.cycle, vec![0, 1, 2, 0]);
    assert_eq!(last.annotation("back edge"), Some("2 -> 0"));
    assert_eq!(last.annotation("cycle"), Some("0 -> 1 -> 2 -> 0"));

    // Reaching 0 from 1 is the tree edge back to the parent, not a cycle
    let skipped = trace
        .steps_at_line(cycle::lines::VISITED_CHECK)
        .filter(|s| s.message.contains("parent of"))
        .count();
    assert!(skipped >= 1);
}

#[test]
fn test_prim_totals_and_disconnection() {
    let edges = vec![
        WeightedEdge { from: 0, to: 1, weight: 4 },
        WeightedEdge { from: 1, to: 2, weight: 3 },
        WeightedEdge { from: 0, to: 2, weight: 1 },
    ];
    let trace = prim::trace(&PrimInput {
        vertices: 3,
        edges: edges.clone(),
        start: 0,
    });
    let last = trace.last();
    assert_eq!(last.state.total_weight, 4);
    assert!(last.state.complete);

    let split = prim::trace(&PrimInput {
        vertices: 4,
        edges,
        start: 0,
    });
    assert!(!split.last().state.complete);
    assert!(!split.is_rejected());
}

#[test]
fn test_playback_of_five_steps() {
    let trace = produce("five", Ok(5), |n, rec| {
        for i in 0..n {
            rec.record(&i, None, format!("step {}", i), []);
        }
    });
    let t0 = Instant::now();
    let mut playback = Playback::with_speed(trace, 10);
    assert!(playback.play_at(t0));

    playback.poll_at(t0 + Duration::from_millis(50));
    assert_eq!(playback.mode(), Mode::Finished);
    assert_eq!(playback.cursor(), 4);
    assert_eq!(playback.pending_deadline(), None);
}

#[test]
fn test_playback_over_real_trace() {
    let trace = heap::build(&[4, 10, 3, 5, 1]).map_states(StateView::grid);
    let mut playback = Playback::new(trace);
    while playback.step() {}
    assert_eq!(playback.mode(), Mode::Finished);
    assert_eq!(playback.current().annotation("heap"), Some("[1, 4, 3, 5, 10]"));
}
