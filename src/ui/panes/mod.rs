//! Stateless render functions for each visible pane
//!
//! - [`pseudocode`]: listing with the current line marked
//! - [`state`]: the step's state grid with highlighted entities
//! - [`details`]: step message and annotations
//! - [`status`]: status bar with keybindings and playback mode

pub mod details;
pub mod pseudocode;
pub mod state;
pub mod status;

pub use details::render_details_pane;
pub use pseudocode::{render_pseudocode_pane, PseudocodeScrollState};
pub use state::render_state_pane;
pub use status::{render_status_bar, StatusRenderData};
