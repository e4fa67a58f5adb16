//! In-process demo backend.
//!
//! Simulates a handful of mobs whose behavior trees re-roll their leaf
//! statuses every tick, so the console can be exercised without a running
//! simulation. It speaks the same channels as the TCP link.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::{mpsc, watch};

use btdebug_protocol::{Blackboard, Command, NodeState, Snapshot, SpawnCatalog, TreeNode};

use crate::link::{BackendChannels, CommandSender, LinkStatus};

const CATALOG: &[(&str, &[(&str, &str)])] = &[
    (
        "Animals",
        &[
            ("Rat", "/mob/living/basic/rat"),
            ("Bat", "/mob/living/basic/bat"),
            ("Cat", "/mob/living/basic/pet/cat"),
        ],
    ),
    (
        "Humanoids",
        &[
            ("Human", "/mob/living/carbon/human"),
            ("Monkey", "/mob/living/carbon/human/species/monkey"),
        ],
    ),
];

#[derive(Debug, Clone)]
struct DemoMob {
    id: u32,
    name: String,
    tree: TreeNode,
    blackboard: Blackboard,
    ticks: u64,
}

/// Simulated world state behind the demo backend.
#[derive(Debug, Clone)]
pub struct DemoWorld {
    mobs: Vec<DemoMob>,
    selected: BTreeSet<u32>,
    selecting: bool,
    next_id: u32,
    catalog: SpawnCatalog,
}

impl Default for DemoWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoWorld {
    pub fn new() -> Self {
        let catalog = CATALOG
            .iter()
            .map(|(category, entries)| {
                let entries = entries
                    .iter()
                    .map(|(name, path)| (name.to_string(), path.to_string()))
                    .collect();
                (category.to_string(), entries)
            })
            .collect();

        Self {
            mobs: Vec::new(),
            selected: BTreeSet::new(),
            selecting: false,
            next_id: 1,
            catalog,
        }
    }

    pub fn mob_count(&self) -> usize {
        self.mobs.len()
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::SpawnMob { path } => {
                let id = self.next_id;
                self.next_id += 1;
                let name = format!("{} #{}", self.display_name(&path), id);
                tracing::info!(path = %path, name = %name, "Demo mob spawned");
                self.mobs.push(DemoMob {
                    id,
                    name,
                    tree: demo_tree(),
                    blackboard: Blackboard::new(),
                    ticks: 0,
                });
            }
            Command::StartSelecting => self.selecting = true,
            Command::DeleteSelected => {
                let selected = std::mem::take(&mut self.selected);
                self.mobs.retain(|m| !selected.contains(&m.id));
                tracing::info!(deleted = selected.len(), "Demo mobs deleted");
            }
            Command::ClearSelection => self.selected.clear(),
        }
    }

    /// Advance the simulation by one step.
    pub fn tick<R: Rng>(&mut self, rng: &mut R) {
        if self.selecting {
            // Stand-in for the user clicking a mob in game.
            if let Some(mob) = self.mobs.iter().find(|m| !self.selected.contains(&m.id)) {
                self.selected.insert(mob.id);
                self.selecting = false;
            }
        }

        for mob in &mut self.mobs {
            mob.ticks += 1;
            reroll(&mut mob.tree, rng);
            let blackboard = blackboard_for(mob, rng);
            mob.blackboard = blackboard;
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let selected: Vec<&DemoMob> = self
            .mobs
            .iter()
            .filter(|m| self.selected.contains(&m.id))
            .collect();
        let target = selected.first();

        Snapshot {
            has_ai: target.is_some(),
            selecting: self.selecting,
            mob_name: target.map(|m| m.name.clone()).unwrap_or_default(),
            blackboard: target.map(|m| m.blackboard.clone()).unwrap_or_default(),
            tree: target.map(|m| m.tree.clone()),
            selected_count: selected.len() as u64,
            selected_mobs: selected.iter().map(|m| m.name.clone()).collect(),
            spawn_categories: self.catalog.clone(),
        }
    }

    fn display_name(&self, path: &str) -> String {
        self.catalog
            .values()
            .flat_map(|entries| entries.iter())
            .find(|(_, p)| p.as_str() == path)
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| path.rsplit('/').next().unwrap_or(path).to_string())
    }
}

fn demo_tree() -> TreeNode {
    let action = |name: &str| TreeNode::new("Action", name, NodeState::Running);
    TreeNode::new("Selector", "Root", NodeState::Running)
        .with_child(
            TreeNode::new("Sequence", "Flee", NodeState::Running)
                .with_child(TreeNode::new("Condition", "Threatened", NodeState::Running))
                .with_child(action("RunAway")),
        )
        .with_child(
            TreeNode::new("Sequence", "Forage", NodeState::Running)
                .with_child(TreeNode::new("Condition", "Hungry", NodeState::Running))
                .with_child(action("FindFood"))
                .with_child(action("Eat")),
        )
        .with_child(action("Wander"))
}

/// Roll fresh leaf statuses and derive composite statuses from them.
fn reroll<R: Rng>(node: &mut TreeNode, rng: &mut R) -> NodeState {
    if node.is_leaf() {
        let state = match rng.gen_range(0..3) {
            0 => NodeState::Failure,
            1 => NodeState::Success,
            _ => NodeState::Running,
        };
        node.state = state.code();
        return state;
    }

    let mut child_states = Vec::with_capacity(node.children.len());
    for child in node.children.iter_mut().flatten() {
        child_states.push(reroll(child, rng));
    }

    // A selector stops at the first child that did not fail, a sequence at
    // the first child that did not succeed.
    let stop_on = if node.node_type == "Sequence" {
        NodeState::Success
    } else {
        NodeState::Failure
    };
    let state = child_states
        .into_iter()
        .find(|s| *s != stop_on)
        .unwrap_or(stop_on);
    node.state = state.code();
    state
}

fn blackboard_for<R: Rng>(mob: &DemoMob, rng: &mut R) -> Blackboard {
    let mut blackboard = Blackboard::new();
    blackboard.insert("ticks".to_string(), mob.ticks.to_string());
    blackboard.insert("hunger".to_string(), rng.gen_range(0..100).to_string());
    if rng.gen_bool(0.5) {
        blackboard.insert("threat".to_string(), "assistant".to_string());
    }
    blackboard
}

/// Start the demo backend task. Must be called inside a tokio runtime.
pub fn spawn_demo(tick: Duration) -> BackendChannels {
    let world = DemoWorld::new();
    let (snapshot_tx, snapshots) = watch::channel(Arc::new(world.snapshot()));
    let (_status_tx, status) = watch::channel(LinkStatus::Demo);
    let (commands, command_rx) = CommandSender::channel();

    tokio::spawn(run_demo(world, snapshot_tx, command_rx, tick));

    BackendChannels {
        snapshots,
        status,
        commands,
    }
}

async fn run_demo(
    mut world: DemoWorld,
    snapshot_tx: watch::Sender<Arc<Snapshot>>,
    mut command_rx: mpsc::UnboundedReceiver<Command>,
    tick: Duration,
) {
    let mut rng = StdRng::from_entropy();
    let mut interval = tokio::time::interval(tick);
    tracing::info!(tick_ms = tick.as_millis() as u64, "Demo backend running");

    loop {
        tokio::select! {
            _ = interval.tick() => world.tick(&mut rng),
            command = command_rx.recv() => match command {
                Some(command) => world.apply(command),
                None => break,
            },
        }
        if snapshot_tx.send(Arc::new(world.snapshot())).is_err() {
            break;
        }
    }
    tracing::debug!("Demo backend stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn fresh_world_has_no_target() {
        let world = DemoWorld::new();
        let snap = world.snapshot();
        assert!(!snap.has_ai);
        assert_eq!(snap.selected_count, 0);
        assert_eq!(snap.spawn_categories.len(), 2);
    }

    #[test]
    fn spawn_then_pick_gives_target() {
        let mut world = DemoWorld::new();
        world.apply(Command::SpawnMob {
            path: "/mob/living/basic/rat".to_string(),
        });
        assert_eq!(world.mob_count(), 1);
        assert!(!world.snapshot().has_ai);

        world.apply(Command::StartSelecting);
        assert!(world.snapshot().selecting);

        world.tick(&mut rng());
        let snap = world.snapshot();
        assert!(snap.has_ai);
        assert!(!snap.selecting);
        assert_eq!(snap.mob_name, "Rat #1");
        assert_eq!(snap.selected_mobs, vec!["Rat #1"]);
        assert_eq!(snap.tree.as_ref().map(TreeNode::node_count), Some(9));
    }

    #[test]
    fn delete_and_clear_selection() {
        let mut world = DemoWorld::new();
        let mut rng = rng();
        for _ in 0..2 {
            world.apply(Command::SpawnMob {
                path: "/mob/living/carbon/human".to_string(),
            });
            world.apply(Command::StartSelecting);
            world.tick(&mut rng);
        }
        assert_eq!(world.snapshot().selected_count, 2);

        world.apply(Command::ClearSelection);
        assert_eq!(world.snapshot().selected_count, 0);
        assert_eq!(world.mob_count(), 2);

        world.apply(Command::StartSelecting);
        world.tick(&mut rng);
        world.apply(Command::DeleteSelected);
        assert_eq!(world.mob_count(), 1);
        assert!(!world.snapshot().has_ai);
    }

    #[test]
    fn unknown_path_uses_last_segment() {
        let mut world = DemoWorld::new();
        world.apply(Command::SpawnMob {
            path: "/mob/living/basic/goose".to_string(),
        });
        world.apply(Command::StartSelecting);
        world.tick(&mut rng());
        assert_eq!(world.snapshot().mob_name, "goose #1");
    }

    #[test]
    fn composite_status_follows_children() {
        let mut rng = rng();
        let mut tree = demo_tree();
        for _ in 0..20 {
            let root = reroll(&mut tree, &mut rng);
            let children: Vec<NodeState> =
                tree.present_children().map(|(_, c)| c.node_state()).collect();
            let expected = children
                .iter()
                .copied()
                .find(|s| *s != NodeState::Failure)
                .unwrap_or(NodeState::Failure);
            assert_eq!(root, expected);
        }
    }
}
