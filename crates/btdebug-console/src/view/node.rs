//! Behavior tree rendering.
//!
//! [`render_node`] maps a snapshot tree onto a [`NodeView`] tree. It is a
//! pure function of its input: no state survives between calls, and the
//! only bound on depth is the snapshot itself.

use btdebug_protocol::{NodeState, TreeNode};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Color class of a node, derived from its status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusColor {
    Success,
    Failure,
    Running,
    Neutral,
}

impl StatusColor {
    pub fn for_state(state: NodeState) -> Self {
        match state {
            NodeState::Success => StatusColor::Success,
            NodeState::Failure => StatusColor::Failure,
            NodeState::Running => StatusColor::Running,
            NodeState::Unknown => StatusColor::Neutral,
        }
    }

    pub fn for_code(code: Option<i64>) -> Self {
        Self::for_state(NodeState::from_code(code))
    }

    pub fn color(self) -> Color {
        match self {
            StatusColor::Success => Color::Green,
            StatusColor::Failure => Color::Red,
            StatusColor::Running => Color::Blue,
            StatusColor::Neutral => Color::DarkGray,
        }
    }
}

/// Rendered form of one tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeView {
    /// Index of this node in its parent's unfiltered children list.
    pub key: usize,
    pub name: String,
    pub node_type: String,
    pub color: StatusColor,
    pub children: Vec<NodeView>,
}

impl NodeView {
    /// Number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(NodeView::count).sum::<usize>()
    }

    /// Depth-first pre-order walk, paired with each node's depth.
    pub fn preorder(&self) -> Vec<(usize, &NodeView)> {
        let mut out = Vec::new();
        self.collect_preorder(0, &mut out);
        out
    }

    fn collect_preorder<'a>(&'a self, depth: usize, out: &mut Vec<(usize, &'a NodeView)>) {
        out.push((depth, self));
        for child in &self.children {
            child.collect_preorder(depth + 1, out);
        }
    }
}

/// Render a snapshot tree. An absent node renders nothing.
pub fn render_node(node: Option<&TreeNode>) -> Option<NodeView> {
    node.map(|n| build_view(n, 0))
}

fn build_view(node: &TreeNode, key: usize) -> NodeView {
    // Keys come from the unfiltered position; absent children are dropped here.
    let children = node
        .present_children()
        .map(|(index, child)| build_view(child, index))
        .collect();

    NodeView {
        key,
        name: node.name.clone(),
        node_type: node.node_type.clone(),
        color: StatusColor::for_code(node.state),
        children,
    }
}

/// Lay out a rendered tree as indented display lines, parent before children.
pub fn tree_lines(root: &NodeView) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    push_tree_lines(root, "", true, true, &mut lines);
    lines
}

fn push_tree_lines(
    node: &NodeView,
    prefix: &str,
    is_last: bool,
    is_root: bool,
    lines: &mut Vec<Line<'static>>,
) {
    let branch = if is_root {
        " ".to_string()
    } else if is_last {
        format!("{}└─ ", prefix)
    } else {
        format!("{}├─ ", prefix)
    };

    lines.push(Line::from(vec![
        Span::styled(branch, Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!(" {} ", node.name),
            Style::default()
                .fg(Color::White)
                .bg(node.color.color())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {}", node.node_type),
            Style::default().fg(Color::Gray),
        ),
    ]));

    let child_prefix = if is_root {
        " ".to_string()
    } else if is_last {
        format!("{}   ", prefix)
    } else {
        format!("{}│  ", prefix)
    };

    for (i, child) in node.children.iter().enumerate() {
        let is_child_last = i == node.children.len() - 1;
        push_tree_lines(child, &child_prefix, is_child_last, false, lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str, state: NodeState) -> TreeNode {
        TreeNode::new("Leaf", name, state)
    }

    #[test]
    fn color_is_total_over_codes() {
        assert_eq!(StatusColor::for_code(Some(1)), StatusColor::Success);
        assert_eq!(StatusColor::for_code(Some(0)), StatusColor::Failure);
        assert_eq!(StatusColor::for_code(Some(2)), StatusColor::Running);
        for code in [-1, 3, 99, i64::MIN, i64::MAX] {
            assert_eq!(StatusColor::for_code(Some(code)), StatusColor::Neutral);
        }
        assert_eq!(StatusColor::for_code(None), StatusColor::Neutral);
    }

    #[test]
    fn absent_root_renders_nothing() {
        assert!(render_node(None).is_none());
    }

    #[test]
    fn absent_children_keep_original_keys() {
        let mut root = TreeNode::new("Selector", "Root", NodeState::Running);
        root.children = vec![
            None,
            Some(leaf("A", NodeState::Success)),
            None,
            Some(leaf("B", NodeState::Failure)),
        ];

        let view = render_node(Some(&root)).unwrap();
        let keys: Vec<usize> = view.children.iter().map(|c| c.key).collect();
        let names: Vec<&str> = view.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(keys, vec![1, 3]);
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn node_count_matches_snapshot() {
        let root = TreeNode::new("Selector", "Root", NodeState::Running)
            .with_child(
                TreeNode::new("Sequence", "S1", NodeState::Success)
                    .with_child(leaf("a", NodeState::Success))
                    .with_child(leaf("b", NodeState::Success))
                    .with_child(leaf("c", NodeState::Running)),
            )
            .with_child(
                TreeNode::new("Sequence", "S2", NodeState::Failure)
                    .with_child(leaf("d", NodeState::Failure)),
            );
        let view = render_node(Some(&root)).unwrap();
        assert_eq!(view.count(), root.node_count());
        assert_eq!(view.count(), 7);

        let order: Vec<(usize, &str)> = view
            .preorder()
            .into_iter()
            .map(|(depth, n)| (depth, n.name.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                (0, "Root"),
                (1, "S1"),
                (2, "a"),
                (2, "b"),
                (2, "c"),
                (1, "S2"),
                (2, "d"),
            ]
        );
    }

    #[test]
    fn deep_chain_renders_every_level() {
        let mut node = leaf("bottom", NodeState::Success);
        for depth in 0..500 {
            node = TreeNode::new("Decorator", &format!("d{depth}"), NodeState::Running)
                .with_child(node);
        }
        let view = render_node(Some(&node)).unwrap();
        assert_eq!(view.count(), 501);
        assert_eq!(tree_lines(&view).len(), 501);
    }

    #[test]
    fn lines_follow_preorder() {
        let root = TreeNode::new("Selector", "Root", NodeState::Running)
            .with_child(leaf("Flee", NodeState::Success))
            .with_child(leaf("Idle", NodeState::Failure));
        let view = render_node(Some(&root)).unwrap();
        let lines = tree_lines(&view);
        assert_eq!(lines.len(), 3);
        let text: Vec<String> = lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert!(text[0].contains("Root"));
        assert!(text[1].contains("├─") && text[1].contains("Flee"));
        assert!(text[2].contains("└─") && text[2].contains("Idle"));
        assert_eq!(lines[1].spans[1].style.bg, Some(Color::Green));
        assert_eq!(lines[2].spans[1].style.bg, Some(Color::Red));
    }
}
