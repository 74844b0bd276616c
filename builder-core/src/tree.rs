//! Persistent component tree.
//!
//! Every mutation returns a new [`Tree`]; the receiver stays a valid
//! snapshot. Nodes are shared behind [`Arc`], so a mutation copies only the
//! nodes on the root-to-target path and every untouched subtree keeps its
//! identity in both versions.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{BuilderError, BuilderResult, ComponentNode, NodeId, Style};

/// Ordered sequence of root-level component nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    roots: Vec<Arc<ComponentNode>>,
}

impl Tree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from root nodes.
    #[must_use]
    pub fn from_roots(roots: impl IntoIterator<Item = ComponentNode>) -> Self {
        Self {
            roots: roots.into_iter().map(Arc::new).collect(),
        }
    }

    /// Root-level nodes in order.
    pub fn roots(&self) -> impl Iterator<Item = &ComponentNode> {
        self.roots.iter().map(|n| &**n)
    }

    /// Shared handles to the root-level nodes.
    #[must_use]
    pub fn root_handles(&self) -> &[Arc<ComponentNode>] {
        &self.roots
    }

    /// Whether the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Append `node` under `parent`, or to the roots when `parent` is `None`.
    ///
    /// An unresolvable parent leaves the tree unchanged.
    #[must_use]
    pub fn insert(&self, parent: Option<NodeId>, node: ComponentNode) -> Tree {
        let mut next = self.clone();
        let Some(parent) = parent else {
            next.roots.push(Arc::new(node));
            return next;
        };
        let Some(path) = path_where(&self.roots, &|n| n.id == parent) else {
            tracing::debug!("insert: parent {parent} not in tree, ignoring");
            return next;
        };
        modify_at(&mut next.roots, &path, |p| p.children.push(Arc::new(node)));
        next
    }

    /// Remove the node with `id` and its whole subtree. Absent ids are a no-op.
    #[must_use]
    pub fn remove_by_id(&self, id: NodeId) -> Tree {
        self.remove_where(&|n| n.id == id)
    }

    /// Remove the hint node, wherever it is. No-op when there is none.
    #[must_use]
    pub fn remove_hint(&self) -> Tree {
        self.remove_where(&|n| n.is_hint)
    }

    /// Depth-first lookup.
    #[must_use]
    pub fn find_by_id(&self, id: NodeId) -> Option<&ComponentNode> {
        find_where(&self.roots, &|n| n.id == id)
    }

    /// Whether a node with `id` exists.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.find_by_id(id).is_some()
    }

    /// Total node count, nested nodes included.
    #[must_use]
    pub fn count_nodes(&self) -> usize {
        self.roots().map(ComponentNode::subtree_len).sum()
    }

    /// The hint node, if one exists.
    #[must_use]
    pub fn hint(&self) -> Option<&ComponentNode> {
        find_where(&self.roots, &|n| n.is_hint)
    }

    /// Number of hint nodes. The drag-drop protocol keeps this at most one.
    #[must_use]
    pub fn hint_count(&self) -> usize {
        fn count(nodes: &[Arc<ComponentNode>]) -> usize {
            nodes
                .iter()
                .map(|n| usize::from(n.is_hint) + count(&n.children))
                .sum()
        }
        count(&self.roots)
    }

    /// Parent of `id`. `None` when the node is a root or absent.
    #[must_use]
    pub fn parent_of(&self, id: NodeId) -> Option<&ComponentNode> {
        let path = path_where(&self.roots, &|n| n.id == id)?;
        let (_, ancestors) = path.split_last()?;
        node_at(&self.roots, ancestors)
    }

    /// Whether `id` is a root-level node.
    #[must_use]
    pub fn is_root(&self, id: NodeId) -> bool {
        self.roots.iter().any(|n| n.id == id)
    }

    /// Whether `id` is `ancestor` or lies inside its subtree.
    #[must_use]
    pub fn is_within(&self, id: NodeId, ancestor: NodeId) -> bool {
        self.find_by_id(ancestor)
            .is_some_and(|a| a.id == id || find_where(&a.children, &|n| n.id == id).is_some())
    }

    /// Replace the style of `id` with `f(old_style)`. Absent ids are a no-op.
    #[must_use]
    pub fn update_style<F>(&self, id: NodeId, f: F) -> Tree
    where
        F: FnOnce(&Style) -> Style,
    {
        let mut next = self.clone();
        match path_where(&self.roots, &|n| n.id == id) {
            Some(path) => modify_at(&mut next.roots, &path, |node| node.style = f(&node.style)),
            None => tracing::debug!("update_style: node {id} not in tree, ignoring"),
        }
        next
    }

    /// Copy of the tree with every hint node removed.
    ///
    /// Editors never hold more than one hint, but trees arriving from a host
    /// may.
    #[must_use]
    pub fn without_hint(&self) -> Tree {
        if self.hint().is_none() {
            return self.clone();
        }
        Tree {
            roots: strip_hints(&self.roots),
        }
    }

    /// Check that no node id appears twice.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::InvalidDocument`] naming the first repeated id.
    pub fn validate_ids(&self) -> BuilderResult<()> {
        let mut seen = HashSet::new();
        match self.walk().find(|node| !seen.insert(node.id)) {
            Some(node) => Err(BuilderError::InvalidDocument(format!(
                "node {} appears more than once",
                node.id
            ))),
            None => Ok(()),
        }
    }

    /// Depth-first pre-order traversal of every node.
    pub fn walk(&self) -> impl Iterator<Item = &ComponentNode> {
        let mut stack: Vec<&ComponentNode> = self.roots.iter().rev().map(|n| &**n).collect();
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev().map(|c| &**c));
            Some(node)
        })
    }

    fn remove_where(&self, pred: &dyn Fn(&ComponentNode) -> bool) -> Tree {
        let mut next = self.clone();
        let Some(path) = path_where(&self.roots, pred) else {
            return next;
        };
        match path.split_last() {
            Some((&index, [])) => {
                next.roots.remove(index);
            }
            Some((&index, parent_path)) => {
                modify_at(&mut next.roots, parent_path, |p| {
                    p.children.remove(index);
                });
            }
            None => {}
        }
        next
    }
}

/// Index path from the roots to the first node matching `pred`.
fn path_where(
    nodes: &[Arc<ComponentNode>],
    pred: &dyn Fn(&ComponentNode) -> bool,
) -> Option<Vec<usize>> {
    for (index, node) in nodes.iter().enumerate() {
        if pred(node) {
            return Some(vec![index]);
        }
        if let Some(mut rest) = path_where(&node.children, pred) {
            rest.insert(0, index);
            return Some(rest);
        }
    }
    None
}

fn find_where<'a>(
    nodes: &'a [Arc<ComponentNode>],
    pred: &dyn Fn(&ComponentNode) -> bool,
) -> Option<&'a ComponentNode> {
    nodes.iter().find_map(|node| {
        if pred(node) {
            Some(&**node)
        } else {
            find_where(&node.children, pred)
        }
    })
}

fn node_at<'a>(nodes: &'a [Arc<ComponentNode>], path: &[usize]) -> Option<&'a ComponentNode> {
    let (&first, rest) = path.split_first()?;
    let node = nodes.get(first)?;
    if rest.is_empty() {
        Some(&**node)
    } else {
        node_at(&node.children, rest)
    }
}

/// Drop hint nodes at every depth, sharing subtrees that hold none.
fn strip_hints(nodes: &[Arc<ComponentNode>]) -> Vec<Arc<ComponentNode>> {
    nodes
        .iter()
        .filter(|node| !node.is_hint)
        .map(|node| {
            if find_where(&node.children, &|n| n.is_hint).is_none() {
                return Arc::clone(node);
            }
            let mut copy = (**node).clone();
            copy.children = strip_hints(&node.children);
            Arc::new(copy)
        })
        .collect()
}

/// Copy-on-write walk: clones each node on `path` only if it is shared.
fn modify_at<F>(nodes: &mut [Arc<ComponentNode>], path: &[usize], f: F)
where
    F: FnOnce(&mut ComponentNode),
{
    let Some((&first, rest)) = path.split_first() else {
        return;
    };
    let Some(slot) = nodes.get_mut(first) else {
        return;
    };
    let node = Arc::make_mut(slot);
    if rest.is_empty() {
        f(node);
    } else {
        modify_at(&mut node.children, rest, f);
    }
}
