//! The label-assignment and narrowing trie.
//!
//! [`SearchTree`] owns an arena of trie nodes over label characters. Leaves
//! hold one candidate payload each; branch nodes hold children keyed by the
//! next label character. `assign` grows the tree one candidate at a time
//! (in arbitrary discovery order), choosing the keyboard-proximity-shortest
//! free label via the configured [`KeyboardHeuristic`]; `narrow` walks the
//! tree downward destructively as the user types, abandoning non-matching
//! siblings; `freeze` collects the current leaves with their full label
//! strings.
//!
//! Nodes are arena-allocated (`Vec` plus integer links) rather than
//! heap-linked: children are owned downward and the parent link is just an
//! index used by the upward rotation chain. Narrowed-away siblings stay in
//! the arena unreachable until `reset` drops the whole arena.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error};

use crate::heuristics::KeyboardHeuristic;
use crate::layout::{lower_char, KeyboardLayout, ROOT_SENTINEL};

const INSERT_LIMIT: u32 = 100;
const ROTATE_LIMIT: u32 = 100;
const COLLECT_LIMIT: u32 = 1000;

/// Internal guard violations. None of these are expected in normal
/// operation; on any of them the caller must abandon the current search
/// session (`reset`) rather than keep narrowing a possibly corrupt tree.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// The key probe loop exceeded its spin bound without finding a usable
    /// cell.
    #[error("max spin exceeded while probing for a free key")]
    MaxSpin,
    /// Insertion retried/descended more times than the trie could ever
    /// legitimately need.
    #[error("insertion depth guard exceeded")]
    InsertDepth,
    /// The rotation chain walked more ancestors than the trie can hold.
    #[error("rotation chain guard exceeded")]
    RotateDepth,
    /// Leaf collection recursed past the depth guard.
    #[error("label collection depth guard exceeded")]
    CollectDepth,
    /// An invariant the rotation machinery relies on was violated.
    #[error("corrupt tree: {0}")]
    Corrupt(&'static str),
}

type NodeId = usize;

/// Per-node bookkeeping for the key search confined to that node. Each node
/// remembers its own scan progress independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct NodeContext {
    /// Last probed grid cell, `None` before the first probe.
    position: Option<(i32, i32)>,
    /// Current search radius.
    depth: i32,
    /// Rotation countdown; reloaded to the child count when it runs out.
    counter: i32,
    /// Whether this node's child slots are believed exhausted at the
    /// tracked radius.
    full: bool,
}

/// A node is either an unused slot, a leaf holding exactly one unresolved
/// candidate, or a branch. The "value XOR children" invariant is the enum
/// itself.
#[derive(Debug, Clone)]
enum NodeKind<T> {
    Empty,
    Leaf(T),
    Branch(Vec<NodeId>),
}

#[derive(Debug, Clone)]
struct Node<T> {
    id: char,
    parent: Option<NodeId>,
    kind: NodeKind<T>,
    ctx: NodeContext,
}

/// The label trie plus the keyboard configuration driving label choice.
///
/// Constructed once per session; `reset` discards all trie content and is
/// the sole teardown. Single-threaded by design: `assign` runs to
/// completion for a whole scan before any `narrow` occurs.
pub struct SearchTree<T> {
    nodes: Vec<Node<T>>,
    /// The caller-visible root. `narrow` moves it downward; the nodes above
    /// and beside it become unreachable garbage until `reset`.
    view: NodeId,
    layouts: Vec<KeyboardLayout>,
    heuristic: Arc<dyn KeyboardHeuristic>,
    /// Maximum search radius; `<= 0` means unbounded within the layout's
    /// own bounds.
    layout_depth: i32,
}

impl<T> SearchTree<T> {
    /// Build a tree over a single keyboard layout.
    pub fn new(
        layout: KeyboardLayout,
        heuristic: Arc<dyn KeyboardHeuristic>,
        max_radius: i32,
    ) -> Self {
        Self::with_layouts(vec![layout], heuristic, max_radius)
    }

    /// Build a tree over several layouts (multi-language setups). The
    /// layout a typed character belongs to is recognized by exact
    /// membership; the first layout is the fallback.
    pub fn with_layouts(
        layouts: Vec<KeyboardLayout>,
        heuristic: Arc<dyn KeyboardHeuristic>,
        max_radius: i32,
    ) -> Self {
        let layouts = if layouts.is_empty() {
            vec![KeyboardLayout::parse("", "")]
        } else {
            layouts
        };
        let mut tree = Self {
            nodes: Vec::new(),
            view: 0,
            layouts,
            heuristic,
            layout_depth: max_radius,
        };
        tree.reset();
        tree
    }

    /// Drop all trie content and start from a fresh root. Called at every
    /// session boundary: abort, jump committed, dead end, or restart.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.nodes.push(Node {
            id: ROOT_SENTINEL,
            parent: None,
            kind: NodeKind::Empty,
            ctx: NodeContext::default(),
        });
        self.view = 0;
    }

    /// The character at (or nearest to) a layout's geometric center.
    pub fn mid_layout_char(&self, layout_index: Option<usize>) -> Option<char> {
        self.layouts
            .get(layout_index.unwrap_or(0))
            .and_then(KeyboardLayout::mid_char)
    }

    /// Narrow the caller-visible tree to the child matching the typed
    /// character. A leaf-only view is kept as-is; a mismatch on a branch
    /// resets the whole tree ("nothing found").
    pub fn narrow(&mut self, input: char) {
        let input = lower_char(input);
        let node = self.view;

        let has_children =
            matches!(&self.nodes[node].kind, NodeKind::Branch(c) if !c.is_empty());

        if self.nodes[node].id == input && !has_children {
            return;
        }
        if !has_children {
            return;
        }
        if let Some(child) = self.find_child(node, input) {
            self.view = child;
            return;
        }

        debug!(%input, "no child matches; resetting");
        self.reset();
    }

    /// Insert `value` under a freshly chosen, never-before-used label path
    /// seeded from the typed character.
    pub fn assign(&mut self, input: char, value: T) -> Result<(), EngineError> {
        let root = self.view;
        let mut node = root;
        let mut input = lower_char(input);

        for _ in 0..INSERT_LIMIT {
            if self.nodes[node].ctx.full {
                // believed exhausted here: rebalance by descending into the
                // least-recently-extended child
                let first = self.first_child(node)?;
                input = self.nodes[first].id;
                node = first;
                continue;
            }

            let ctx = self.nodes[node].ctx;
            let (ch, i_pos, i_depth) = self.next_key(input, ctx.depth, ctx.position)?;
            self.nodes[node].ctx.position = Some(i_pos);
            self.nodes[node].ctx.depth = i_depth;

            if matches!(self.nodes[node].kind, NodeKind::Leaf(_)) {
                // a lone unresolved candidate sits here; its label grows one
                // character by nesting it under the node's own id
                self.promote_leaf(node)?;
            }

            if self.find_child(node, ch).is_none() {
                if matches!(self.nodes[node].kind, NodeKind::Empty) {
                    if self.nodes[node].parent.is_some() {
                        self.nodes[node].kind = NodeKind::Leaf(value);
                        return Ok(());
                    }
                    // first-ever insertion: the root becomes a branch
                    self.nodes[node].kind = NodeKind::Branch(Vec::new());
                }

                let (_, n_pos, n_depth) = self.next_key(ch, 0, None)?;
                let child = self.alloc(
                    ch,
                    node,
                    NodeKind::Leaf(value),
                    NodeContext {
                        position: Some(n_pos),
                        depth: n_depth,
                        counter: 0,
                        full: false,
                    },
                );
                if let NodeKind::Branch(children) = &mut self.nodes[node].kind {
                    children.push(child);
                }
                return Ok(());
            }

            // genuine collision at this radius
            if !self.nodes[node].ctx.full {
                self.rotate(node)?;
                node = root;
                continue;
            }

            let first = self.first_child(node)?;
            input = self.nodes[first].id;
            node = first;
        }

        error!("insertion depth guard exceeded");
        Err(EngineError::InsertDepth)
    }

    /// Collect every leaf under the current view, paired with its full
    /// label string. Order follows child order, not document order;
    /// callers re-sort before rendering.
    pub fn freeze(&self) -> Result<Vec<(String, T)>, EngineError>
    where
        T: Clone,
    {
        let mut out = Vec::new();
        self.collect(self.view, "", 0, &mut out)?;
        Ok(out)
    }

    fn collect(
        &self,
        node: NodeId,
        prefix: &str,
        depth: u32,
        out: &mut Vec<(String, T)>,
    ) -> Result<(), EngineError>
    where
        T: Clone,
    {
        if depth > COLLECT_LIMIT {
            return Err(EngineError::CollectDepth);
        }

        let n = &self.nodes[node];
        // the root sentinel contributes nothing to the label
        let id = if n.parent.is_none() {
            prefix.to_string()
        } else {
            format!("{prefix}{}", n.id)
        };

        match &n.kind {
            NodeKind::Branch(children) => {
                for &child in children {
                    self.collect(child, &id, depth + 1, out)?;
                }
            }
            NodeKind::Leaf(value) => out.push((id, value.clone())),
            NodeKind::Empty => {}
        }
        Ok(())
    }

    /// Probe for the next usable key around `input`, skipping empty cells.
    /// The spin bound caps attempts at the cell count of the current and
    /// next ring, clamped by the grid perimeter.
    fn next_key(
        &self,
        input: char,
        depth: i32,
        pos: Option<(i32, i32)>,
    ) -> Result<(char, (i32, i32), i32), EngineError> {
        let layout = self.layout_for(input);
        let mid = layout.coord(input);
        let w = layout.width() as i32;
        let h = layout.height() as i32;

        let ring = 1 + 2 * depth.max(0);
        let max_spin = (ring * ring + 1).min(2 * (w + h));

        let mut k_pos = pos;
        let mut k_depth = depth;
        let mut spins = 0;

        loop {
            if spins > max_spin {
                error!(%input, k_depth, "max spin");
                return Err(EngineError::MaxSpin);
            }
            spins += 1;

            let (ix, iy, i_depth) = self.heuristic.next_char(
                k_pos.unwrap_or(mid),
                mid,
                k_depth,
                w,
                h,
                self.layout_depth,
            );

            k_pos = Some((ix, iy));
            k_depth = i_depth;

            if let Some(ch) = layout.from(ix, iy) {
                return Ok((ch, (ix, iy), k_depth));
            }
        }
    }

    /// Cycle a node's children (pop the tail, front-insert it) and count
    /// down the rotation counter; when it runs out the node is marked full
    /// and the rotation propagates to the parent chain.
    fn rotate(&mut self, start: NodeId) -> Result<(), EngineError> {
        let mut current = Some(start);

        for _ in 0..=ROTATE_LIMIT {
            let Some(idx) = current else {
                return Ok(());
            };
            let node = &mut self.nodes[idx];
            let NodeKind::Branch(children) = &mut node.kind else {
                return Ok(());
            };
            let Some(last) = children.pop() else {
                return Err(EngineError::Corrupt("rotated branch has no children"));
            };
            children.insert(0, last);

            node.ctx.counter -= 1;
            if node.ctx.counter > 0 {
                return Ok(());
            }
            node.ctx.counter = children.len() as i32;
            node.ctx.full = true;

            current = node.parent;
        }

        Err(EngineError::RotateDepth)
    }

    /// Detach a leaf's payload into a child keyed by the node's own id; the
    /// node becomes a branch.
    fn promote_leaf(&mut self, node: NodeId) -> Result<(), EngineError> {
        let id = self.nodes[node].id;
        let (_, n_pos, n_depth) = self.next_key(id, 0, None)?;

        let old = std::mem::replace(&mut self.nodes[node].kind, NodeKind::Branch(Vec::new()));
        let NodeKind::Leaf(value) = old else {
            return Err(EngineError::Corrupt("promoted node is not a leaf"));
        };

        let child = self.alloc(
            id,
            node,
            NodeKind::Leaf(value),
            NodeContext {
                position: Some(n_pos),
                depth: n_depth,
                counter: 0,
                full: false,
            },
        );
        if let NodeKind::Branch(children) = &mut self.nodes[node].kind {
            children.push(child);
        }
        Ok(())
    }

    fn alloc(&mut self, id: char, parent: NodeId, kind: NodeKind<T>, ctx: NodeContext) -> NodeId {
        let idx = self.nodes.len();
        self.nodes.push(Node {
            id,
            parent: Some(parent),
            kind,
            ctx,
        });
        idx
    }

    fn find_child(&self, node: NodeId, id: char) -> Option<NodeId> {
        match &self.nodes[node].kind {
            NodeKind::Branch(children) => children
                .iter()
                .copied()
                .find(|&child| self.nodes[child].id == id),
            _ => None,
        }
    }

    fn first_child(&self, node: NodeId) -> Result<NodeId, EngineError> {
        match &self.nodes[node].kind {
            NodeKind::Branch(children) if !children.is_empty() => Ok(children[0]),
            _ => Err(EngineError::Corrupt("full node must contain children")),
        }
    }

    fn layout_for(&self, ch: char) -> &KeyboardLayout {
        self.layouts
            .iter()
            .find(|layout| layout.contains(ch))
            .unwrap_or(&self.layouts[0])
    }
}
