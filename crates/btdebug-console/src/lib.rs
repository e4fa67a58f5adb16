//! BT Debug Console
//!
//! Terminal panel for inspecting a behavior-tree driven mob: its tree with
//! per-node status, its blackboard, and a sidebar for picking debug targets
//! and spawning new mobs.

pub mod config;
pub mod console;
pub mod demo;
pub mod link;
pub mod state;
pub mod view;
