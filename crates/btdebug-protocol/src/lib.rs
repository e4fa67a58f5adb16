//! BT Debug Protocol - Snapshot and command types
//!
//! Wire model shared by the debugger console and the simulation backend:
//! full state snapshots flow backend → console, named commands flow
//! console → backend. Both directions are newline-delimited JSON.

pub mod command;
pub mod constants;
pub mod error;
pub mod snapshot;

pub use command::*;
pub use constants::*;
pub use error::*;
pub use snapshot::{Blackboard, NodeState, Snapshot, SpawnCatalog, TreeNode};
