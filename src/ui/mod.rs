//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! - **[`app`]**: session state and the keyboard/timer event loop
//! - **[`panes`]**: stateless render functions (pseudocode, state, details, status bar)
//! - **[`theme`]**: the colour palette shared by all panes
//!
//! Every algorithm is shown the same way, through the [`Grid`](crate::trace::Grid)
//! projection of its step states.

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
