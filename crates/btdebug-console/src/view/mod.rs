//! Pure view layer: snapshot (+ local UI state) in, view values and
//! ratatui widgets out.

pub mod node;
pub mod selection;
pub mod sidebar;
pub mod spawner;
pub mod window;

pub use node::{render_node, NodeView, StatusColor};
pub use window::{draw_window, window_mode, window_title, WindowMode};
