// Defaults and limits for producers and playback

/// Delay between auto-play advances when none is given on the command line
pub const DEFAULT_SPEED_MS: u64 = 500;

/// Fastest accepted auto-play delay
pub const MIN_SPEED_MS: u64 = 1;

/// Slowest accepted auto-play delay
pub const MAX_SPEED_MS: u64 = 10_000;

/// Amount `+`/`-` change the auto-play delay by in the TUI
pub const SPEED_STEP_MS: u64 = 100;

/// How long the TUI waits for a key before checking the playback timer
pub const EVENT_POLL_MS: u64 = 15;

/// Largest N-Queens board; beyond this the backtracking trace gets unwieldy
pub const MAX_QUEENS: usize = 6;

/// Largest item list accepted by the subset/permutation producers
pub const MAX_CHOICE_ITEMS: usize = 6;

/// Largest vertex count accepted by the graph producers
pub const MAX_VERTICES: usize = 64;

/// Largest element count accepted by the array-shaped producers
pub const MAX_ELEMENTS: usize = 256;
