//! # Introduction
//!
//! algotrace runs a textbook algorithm once on a given input, records every
//! meaningful moment of the run as an immutable step, and replays the steps
//! forward and backward in a terminal UI built with
//! [ratatui](https://docs.rs/ratatui), next to the algorithm's pseudocode.
//!
//! ## Pipeline
//!
//! ```text
//! CLI text → typed input → producer → Trace<State> → Trace<Grid> → Playback → TUI
//! ```
//!
//! 1. [`cli`]: parses raw text such as `4,10,3,5,1` into producer inputs.
//! 2. [`algorithms`]: one trace producer per algorithm family.
//! 3. [`trace`]: steps, the recorder producers write into, and the
//!    [`trace::Grid`] display projection.
//! 4. [`playback`]: the cursor/auto-play state machine.
//! 5. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Algorithms
//!
//! Union-find, binary min-heap, Prim's MST, N-Queens, DFS cycle detection,
//! bucket sort, binary tree traversals, subsets/permutations and a
//! separate-chaining hash table.

pub mod algorithms;
pub mod cli;
pub mod constants;
pub mod playback;
pub mod trace;
pub mod ui;
