/// Status code reported by the engine for a node that failed.
pub const NODE_FAILURE: i64 = 0;
/// Status code reported by the engine for a node that succeeded.
pub const NODE_SUCCESS: i64 = 1;
/// Status code reported by the engine for a node still in progress.
pub const NODE_RUNNING: i64 = 2;

pub const ACTION_SPAWN_MOB: &str = "spawn_mob";
pub const ACTION_START_SELECTING: &str = "start_selecting";
pub const ACTION_DELETE_SELECTED: &str = "delete_selected";
pub const ACTION_CLEAR_SELECTION: &str = "clear_selection";

/// Parameter carrying the catalog path of the entity to spawn.
pub const PARAM_PATH: &str = "path";
