//! Backend → console state snapshots.
//!
//! A snapshot is the complete display state for one refresh. It replaces the
//! previous snapshot wholesale; there is no partial-update protocol. Decoding
//! is lenient: `null` or missing fields decode to their empty value, so an
//! engine that omits data produces an empty panel rather than an error.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::constants::{NODE_FAILURE, NODE_RUNNING, NODE_SUCCESS};
use crate::ProtocolError;

/// Blackboard keys mapped to their display value.
pub type Blackboard = BTreeMap<String, String>;

/// Category name → (entry display name → spawn path).
pub type SpawnCatalog = BTreeMap<String, BTreeMap<String, String>>;

/// Outcome of a node's last evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeState {
    Failure,
    Success,
    Running,
    /// Absent or unrecognised status code.
    Unknown,
}

impl NodeState {
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(NODE_FAILURE) => NodeState::Failure,
            Some(NODE_SUCCESS) => NodeState::Success,
            Some(NODE_RUNNING) => NodeState::Running,
            _ => NodeState::Unknown,
        }
    }

    pub fn code(&self) -> Option<i64> {
        match self {
            NodeState::Failure => Some(NODE_FAILURE),
            NodeState::Success => Some(NODE_SUCCESS),
            NodeState::Running => Some(NODE_RUNNING),
            NodeState::Unknown => None,
        }
    }
}

/// One node of the behavior tree as reported by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Behavior-tree variant tag (selector, sequence, action, ...).
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub node_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    /// Raw status code; see [`NodeState::from_code`].
    #[serde(default, deserialize_with = "status_code")]
    pub state: Option<i64>,
    /// Children in evaluation order. Absent entries are kept in place so
    /// that sibling positions stay stable.
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<Option<TreeNode>>,
}

impl TreeNode {
    pub fn new(node_type: &str, name: &str, state: NodeState) -> Self {
        Self {
            node_type: node_type.to_string(),
            name: name.to_string(),
            state: state.code(),
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: TreeNode) -> Self {
        self.children.push(Some(child));
        self
    }

    pub fn node_state(&self) -> NodeState {
        NodeState::from_code(self.state)
    }

    /// Present children paired with their index in the unfiltered list.
    pub fn present_children(&self) -> impl Iterator<Item = (usize, &TreeNode)> {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(i, child)| child.as_ref().map(|c| (i, c)))
    }

    pub fn is_leaf(&self) -> bool {
        self.present_children().next().is_none()
    }

    /// Number of present nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self
            .present_children()
            .map(|(_, child)| child.node_count())
            .sum::<usize>()
    }
}

/// Complete display state pushed by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Whether a debug target is currently active.
    #[serde(default, deserialize_with = "truthy")]
    pub has_ai: bool,
    /// Whether the backend is waiting for the user to pick a target.
    #[serde(default, deserialize_with = "truthy")]
    pub selecting: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    pub mob_name: String,
    #[serde(default, deserialize_with = "blackboard")]
    pub blackboard: Blackboard,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tree: Option<TreeNode>,
    #[serde(default, deserialize_with = "count")]
    pub selected_count: u64,
    #[serde(default, deserialize_with = "string_list")]
    pub selected_mobs: Vec<String>,
    #[serde(default, deserialize_with = "spawn_catalog")]
    pub spawn_categories: SpawnCatalog,
}

impl Snapshot {
    /// Decode one snapshot. Tree depth is not limited: the recursion limit
    /// is lifted and the stack grows on demand while descending.
    pub fn from_json(input: &str) -> Result<Self, ProtocolError> {
        let mut de = serde_json::Deserializer::from_str(input);
        de.disable_recursion_limit();
        let snapshot = Snapshot::deserialize(serde_stacker::Deserializer::new(&mut de))?;
        de.end()?;
        Ok(snapshot)
    }

    /// Encode as a single JSON line (without the trailing newline).
    pub fn to_json_line(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn has_selection(&self) -> bool {
        self.selected_count > 0
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Text shown for an engine-provided scalar.
fn display_value(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .map(display_value)
        .unwrap_or_default())
}

// The engine encodes booleans as 0/1 as often as true/false.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    })
}

fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .and_then(|v| {
            v.as_u64()
                .or_else(|| v.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
        })
        .unwrap_or(0))
}

fn status_code<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|v| {
        v.as_i64()
            .or_else(|| v.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
    }))
}

fn blackboard<'de, D>(deserializer: D) -> Result<Blackboard, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeMap<String, Value>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| (key, display_value(value)))
        .collect())
}

fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .filter(|v| !v.is_null())
        .map(display_value)
        .collect())
}

fn spawn_catalog<'de, D>(deserializer: D) -> Result<SpawnCatalog, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Option<BTreeMap<String, Value>>>>::deserialize(
        deserializer,
    )?
    .unwrap_or_default();

    Ok(raw
        .into_iter()
        .map(|(category, entries)| {
            let entries = entries
                .unwrap_or_default()
                .into_iter()
                .filter(|(_, path)| !path.is_null())
                .map(|(name, path)| (name, display_value(path)))
                .collect();
            (category, entries)
        })
        .collect())
}
