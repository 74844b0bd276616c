//! Palette drag-and-drop.
//!
//! While a palette entry is dragged over the canvas, a hidden hint node marks
//! where the dropped component would land. The controller keeps at most one
//! hint in the tree, relocates it as the pointer crosses containers, and turns
//! it into a real node on drop.

use crate::defaults::{default_style, hint_style, DropContext};
use crate::measure::MeasurementProvider;
use crate::{ComponentNode, NodeId, PositionMode, Subtype, Tag, Tree};

/// Drag-and-drop session state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// A palette entry is being dragged, not over any container.
    Dragging {
        /// Dragged kind.
        tag: Tag,
        /// Position mode for the new node.
        position: PositionMode,
    },
    /// The drag is over a container holding the hint.
    HoveringTarget {
        /// Dragged kind.
        tag: Tag,
        /// Position mode for the new node.
        position: PositionMode,
        /// Hovered container.
        target: NodeId,
    },
    /// Dropped; waiting for the caller to pick an input or button kind.
    AwaitingSubtypeSelection {
        /// Dropped kind.
        tag: Tag,
        /// Position mode for the new node.
        position: PositionMode,
        /// Container the node goes into; `None` for root level.
        target: Option<NodeId>,
    },
    /// A node was just inserted. Transient: the controller returns to
    /// [`DragState::Idle`] in the same step.
    Committed,
}

impl DragState {
    /// Dragged kind, if a drag is in progress.
    #[must_use]
    pub const fn tag(&self) -> Option<Tag> {
        match *self {
            Self::Dragging { tag, .. }
            | Self::HoveringTarget { tag, .. }
            | Self::AwaitingSubtypeSelection { tag, .. } => Some(tag),
            Self::Idle | Self::Committed => None,
        }
    }

    /// Hovered container, if any.
    #[must_use]
    pub const fn target(&self) -> Option<NodeId> {
        match *self {
            Self::HoveringTarget { target, .. } => Some(target),
            Self::AwaitingSubtypeSelection { target, .. } => target,
            Self::Idle | Self::Dragging { .. } | Self::Committed => None,
        }
    }
}

/// Result of one drag event.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct DragStep {
    /// Replacement tree, when the event changed it.
    pub tree: Option<Tree>,
    /// Whether the hint was created, moved or removed.
    pub hint_changed: bool,
}

impl DragStep {
    fn unchanged() -> Self {
        Self::default()
    }

    fn hint(tree: Tree) -> Self {
        Self {
            tree: Some(tree),
            hint_changed: true,
        }
    }
}

/// What a drop did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Nothing happened: no drag, or the drop was not allowed.
    Ignored,
    /// Waiting for [`DragDropController::resolve_subtype`].
    AwaitingSubtype,
    /// The pending insertion was abandoned.
    Cancelled,
    /// A node was inserted.
    Committed(NodeId),
}

/// Result of a drop or subtype resolution.
#[derive(Debug, Clone)]
#[must_use]
pub struct DropStep {
    /// Tree and hint changes.
    pub step: DragStep,
    /// What the drop did.
    pub outcome: DropOutcome,
}

/// The drag-and-drop state machine.
#[derive(Debug, Clone, Default)]
pub struct DragDropController {
    state: DragState,
}

impl DragDropController {
    /// Create an idle controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Whether a drag is in progress or waiting for a sub-type.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self.state, DragState::Idle | DragState::Committed)
    }

    /// A palette entry was grabbed.
    pub fn drag_start(&mut self, tag: Tag, position: PositionMode) {
        if self.is_active() {
            tracing::warn!("drag start while {:?}; previous drag discarded", self.state);
        }
        tracing::debug!("drag start: {tag} ({})", position.as_str());
        self.state = DragState::Dragging { tag, position };
    }

    /// The drag entered `target`, coming from `origin`.
    pub fn drag_enter(
        &mut self,
        tree: &Tree,
        target: NodeId,
        origin: Option<NodeId>,
        measure: &dyn MeasurementProvider,
    ) -> DragStep {
        let (tag, position, current) = match self.state {
            DragState::Dragging { tag, position } => (tag, position, None),
            DragState::HoveringTarget {
                tag,
                position,
                target,
            } => (tag, position, Some(target)),
            _ => return DragStep::unchanged(),
        };
        if !is_container(tree, target) {
            return DragStep::unchanged();
        }
        if let Some(current) = current {
            // Re-entering the hovered container from inside it
            let from_inside = origin.is_some_and(|o| tree.is_within(o, current));
            if target == current || (from_inside && tree.is_within(current, target)) {
                return DragStep::unchanged();
            }
        }

        self.state = DragState::HoveringTarget {
            tag,
            position,
            target,
        };
        if tree.hint().is_some() {
            return DragStep::unchanged();
        }
        tracing::debug!("hint created under {target}");
        DragStep::hint(place_hint(tree, tag, position, target, measure))
    }

    /// The drag left `from`; `related` is the node entered next.
    pub fn drag_leave(
        &mut self,
        tree: &Tree,
        from: NodeId,
        related: Option<NodeId>,
        measure: &dyn MeasurementProvider,
    ) -> DragStep {
        let DragState::HoveringTarget {
            tag,
            position,
            target,
        } = self.state
        else {
            return DragStep::unchanged();
        };

        if let Some(next) = related.filter(|&r| is_container(tree, r)) {
            self.state = DragState::HoveringTarget {
                tag,
                position,
                target: next,
            };
            // dragenter on `next` may already have fired and retargeted
            // without moving the hint
            let hint_parent = tree
                .hint()
                .and_then(|hint| tree.parent_of(hint.id))
                .map(|parent| parent.id);
            if hint_parent == Some(next) {
                return DragStep::unchanged();
            }
            tracing::debug!("hint moved from {from} to {next}");
            let without = tree.remove_hint();
            return DragStep::hint(place_hint(&without, tag, position, next, measure));
        }

        if related.is_some_and(|r| tree.is_within(r, target)) {
            return DragStep::unchanged();
        }

        tracing::debug!("drag left {from}; hint cleared");
        self.state = DragState::Dragging { tag, position };
        if tree.hint().is_none() {
            return DragStep::unchanged();
        }
        DragStep::hint(tree.remove_hint())
    }

    /// The pointer was released. `subtype` is the kind chosen up front, if
    /// the caller already has one.
    pub fn drop(
        &mut self,
        tree: &Tree,
        subtype: Option<Subtype>,
        measure: &dyn MeasurementProvider,
    ) -> DropStep {
        let (tag, position, target) = match self.state {
            DragState::Dragging { tag, position } => (tag, position, None),
            DragState::HoveringTarget {
                tag,
                position,
                target,
            } => (tag, position, Some(target)),
            _ => {
                return DropStep {
                    step: DragStep::unchanged(),
                    outcome: DropOutcome::Ignored,
                }
            }
        };

        let had_hint = tree.hint().is_some();
        let cleared = tree.remove_hint();
        let cleared_step = || {
            if had_hint {
                DragStep::hint(cleared.clone())
            } else {
                DragStep::unchanged()
            }
        };

        if cleared.is_empty() && tag != Tag::Section {
            tracing::debug!("{tag} dropped on an empty canvas; only a Section may start a form");
            self.state = DragState::Idle;
            return DropStep {
                step: cleared_step(),
                outcome: DropOutcome::Ignored,
            };
        }

        let subtype = subtype.filter(|s| s.applies_to(tag));
        if tag.requires_subtype() && subtype.is_none() {
            tracing::debug!("{tag} dropped; awaiting sub-type selection");
            self.state = DragState::AwaitingSubtypeSelection {
                tag,
                position,
                target,
            };
            return DropStep {
                step: cleared_step(),
                outcome: DropOutcome::AwaitingSubtype,
            };
        }

        let outcome = self.commit(&cleared, tag, subtype, position, target, measure);
        finish(cleared, had_hint, outcome)
    }

    /// Answer a pending sub-type selection. `None` cancels the insertion.
    pub fn resolve_subtype(
        &mut self,
        tree: &Tree,
        choice: Option<Subtype>,
        measure: &dyn MeasurementProvider,
    ) -> DropStep {
        let DragState::AwaitingSubtypeSelection {
            tag,
            position,
            target,
        } = self.state
        else {
            return DropStep {
                step: DragStep::unchanged(),
                outcome: DropOutcome::Ignored,
            };
        };
        self.state = DragState::Idle;

        let Some(subtype) = choice.filter(|s| s.applies_to(tag)) else {
            if choice.is_some() {
                tracing::warn!("sub-type {choice:?} does not apply to {tag}; insertion cancelled");
            } else {
                tracing::debug!("sub-type selection closed; insertion cancelled");
            }
            return DropStep {
                step: DragStep::unchanged(),
                outcome: DropOutcome::Cancelled,
            };
        };

        let outcome = self.commit(tree, tag, Some(subtype), position, target, measure);
        finish(tree.clone(), false, outcome)
    }

    /// The drag ended. Clears any hint; a pending sub-type selection survives.
    pub fn drag_end(&mut self, tree: &Tree) -> DragStep {
        if !matches!(self.state, DragState::AwaitingSubtypeSelection { .. }) {
            self.state = DragState::Idle;
        }
        if tree.hint().is_none() {
            return DragStep::unchanged();
        }
        tracing::debug!("drag ended; hint cleared");
        DragStep::hint(tree.remove_hint())
    }

    /// Drop the hovered target if it no longer exists in `tree`.
    pub fn forget_missing(&mut self, tree: &Tree) {
        match self.state {
            DragState::HoveringTarget {
                tag,
                position,
                target,
            } if !tree.contains(target) => {
                self.state = DragState::Dragging { tag, position };
            }
            DragState::AwaitingSubtypeSelection {
                target: Some(target),
                ..
            } if !tree.contains(target) => {
                tracing::debug!("drop target {target} removed; pending insertion cancelled");
                self.state = DragState::Idle;
            }
            _ => {}
        }
    }

    fn commit(
        &mut self,
        tree: &Tree,
        tag: Tag,
        subtype: Option<Subtype>,
        position: PositionMode,
        target: Option<NodeId>,
        measure: &dyn MeasurementProvider,
    ) -> Option<(Tree, NodeId)> {
        if target.is_some_and(|t| !tree.contains(t)) {
            tracing::debug!("drop target vanished; {tag} not inserted");
            self.state = DragState::Idle;
            return None;
        }
        let ctx = DropContext {
            tag,
            subtype,
            position,
            target: target.and_then(|t| measure.content_box(t)),
            node_count: tree.count_nodes(),
        };
        let node = ComponentNode::new(tag).with_style(default_style(&ctx));
        let id = node.id;
        let next = tree.insert(target, node);

        self.state = DragState::Committed;
        match target {
            Some(t) => tracing::info!("inserted {tag} {id} into {t}"),
            None => tracing::info!("inserted {tag} {id} at root"),
        }
        self.state = DragState::Idle;
        Some((next, id))
    }
}

fn finish(fallback: Tree, had_hint: bool, committed: Option<(Tree, NodeId)>) -> DropStep {
    match committed {
        Some((tree, id)) => DropStep {
            step: DragStep {
                tree: Some(tree),
                hint_changed: had_hint,
            },
            outcome: DropOutcome::Committed(id),
        },
        None => DropStep {
            step: DragStep {
                tree: had_hint.then_some(fallback),
                hint_changed: had_hint,
            },
            outcome: DropOutcome::Ignored,
        },
    }
}

/// Whether `id` is a real node that may receive children.
fn is_container(tree: &Tree, id: NodeId) -> bool {
    tree.find_by_id(id)
        .is_some_and(|n| !n.is_hint && n.tag.accepts_children())
}

fn place_hint(
    tree: &Tree,
    tag: Tag,
    position: PositionMode,
    target: NodeId,
    measure: &dyn MeasurementProvider,
) -> Tree {
    let ctx = DropContext {
        tag,
        subtype: None,
        position,
        target: measure.content_box(target),
        node_count: tree.count_nodes(),
    };
    tree.insert(Some(target), ComponentNode::hint(tag, hint_style(&ctx)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::{BoxSize, StaticMeasurements};
    use crate::node::InputKind;

    fn section_with_div() -> (Tree, NodeId, NodeId) {
        let div = ComponentNode::new(Tag::Div);
        let div_id = div.id;
        let section = ComponentNode::new(Tag::Section).with_child(div);
        let section_id = section.id;
        (Tree::from_roots([section]), section_id, div_id)
    }

    #[test]
    fn test_section_onto_empty_canvas() {
        let mut dnd = DragDropController::new();
        let measure = StaticMeasurements::new();
        dnd.drag_start(Tag::Section, PositionMode::Relative);

        let result = dnd.drop(&Tree::new(), None, &measure);
        let DropOutcome::Committed(id) = result.outcome else {
            panic!("expected commit, got {:?}", result.outcome);
        };
        let tree = result.step.tree.expect("tree");
        let node = tree.find_by_id(id).expect("node");
        assert_eq!(node.style.get_str("width"), Some("100%"));
        assert_eq!(node.style.get_str("height"), Some("100%"));
        assert_eq!(dnd.state(), DragState::Idle);
    }

    #[test]
    fn test_non_section_onto_empty_canvas_is_ignored() {
        let mut dnd = DragDropController::new();
        dnd.drag_start(Tag::Div, PositionMode::Relative);
        let result = dnd.drop(&Tree::new(), None, &StaticMeasurements::new());
        assert_eq!(result.outcome, DropOutcome::Ignored);
        assert!(result.step.tree.is_none());
        assert_eq!(dnd.state(), DragState::Idle);
    }

    #[test]
    fn test_enter_creates_single_hint() {
        let (tree, section, div) = section_with_div();
        let measure = StaticMeasurements::new();
        let mut dnd = DragDropController::new();
        dnd.drag_start(Tag::Div, PositionMode::Relative);

        let step = dnd.drag_enter(&tree, section, None, &measure);
        assert!(step.hint_changed);
        let tree = step.tree.expect("tree");
        assert_eq!(tree.hint_count(), 1);
        assert_eq!(tree.parent_of(tree.hint().expect("hint").id).map(|p| p.id), Some(section));

        // A second enter never adds another hint
        let step = dnd.drag_enter(&tree, div, Some(section), &measure);
        assert!(step.tree.is_none());
        assert_eq!(dnd.state().target(), Some(div));
    }

    #[test]
    fn test_enter_ignores_non_containers() {
        let input = ComponentNode::new(Tag::Input);
        let input_id = input.id;
        let tree = Tree::from_roots([ComponentNode::new(Tag::Section).with_child(input)]);
        let mut dnd = DragDropController::new();
        dnd.drag_start(Tag::Div, PositionMode::Relative);
        let step = dnd.drag_enter(&tree, input_id, None, &StaticMeasurements::new());
        assert!(step.tree.is_none());
        assert!(matches!(dnd.state(), DragState::Dragging { .. }));
    }

    #[test]
    fn test_enter_from_inside_target_is_suppressed() {
        let (tree, section, div) = section_with_div();
        let measure = StaticMeasurements::new();
        let mut dnd = DragDropController::new();
        dnd.drag_start(Tag::Div, PositionMode::Relative);
        let tree = dnd.drag_enter(&tree, div, None, &measure).tree.expect("tree");

        let step = dnd.drag_enter(&tree, section, Some(div), &measure);
        assert!(step.tree.is_none());
        assert_eq!(dnd.state().target(), Some(div));
    }

    #[test]
    fn test_leave_into_container_relocates_hint() {
        let (tree, section, div) = section_with_div();
        let measure = StaticMeasurements::new();
        let mut dnd = DragDropController::new();
        dnd.drag_start(Tag::Div, PositionMode::Relative);
        let tree = dnd.drag_enter(&tree, section, None, &measure).tree.expect("tree");

        let step = dnd.drag_leave(&tree, section, Some(div), &measure);
        assert!(step.hint_changed);
        let tree = step.tree.expect("tree");
        assert_eq!(tree.hint_count(), 1);
        let hint = tree.hint().expect("hint").id;
        assert_eq!(tree.parent_of(hint).map(|p| p.id), Some(div));
        assert_eq!(dnd.state().target(), Some(div));
    }

    #[test]
    fn test_enter_before_leave_still_relocates_hint() {
        let left = ComponentNode::new(Tag::Div);
        let right = ComponentNode::new(Tag::Div);
        let (left_id, right_id) = (left.id, right.id);
        let tree = Tree::from_roots([ComponentNode::new(Tag::Section)
            .with_child(left)
            .with_child(right)]);
        let measure = StaticMeasurements::new();
        let mut dnd = DragDropController::new();
        dnd.drag_start(Tag::Heading, PositionMode::Relative);
        let tree = dnd.drag_enter(&tree, left_id, None, &measure).tree.expect("tree");

        // Browsers deliver dragenter on the new container first
        assert!(dnd
            .drag_enter(&tree, right_id, Some(left_id), &measure)
            .tree
            .is_none());
        assert_eq!(dnd.state().target(), Some(right_id));

        let step = dnd.drag_leave(&tree, left_id, Some(right_id), &measure);
        assert!(step.hint_changed);
        let tree = step.tree.expect("tree");
        assert_eq!(tree.hint_count(), 1);
        let hint = tree.hint().expect("hint").id;
        assert_eq!(tree.parent_of(hint).map(|p| p.id), Some(right_id));

        // A repeated leave toward the same container changes nothing
        let again = dnd.drag_leave(&tree, left_id, Some(right_id), &measure);
        assert!(again.tree.is_none());
    }

    #[test]
    fn test_leave_outside_clears_hint() {
        let (tree, section, _) = section_with_div();
        let measure = StaticMeasurements::new();
        let mut dnd = DragDropController::new();
        dnd.drag_start(Tag::Div, PositionMode::Relative);
        let tree = dnd.drag_enter(&tree, section, None, &measure).tree.expect("tree");

        let step = dnd.drag_leave(&tree, section, None, &measure);
        let tree = step.tree.expect("tree");
        assert_eq!(tree.hint_count(), 0);
        assert!(matches!(dnd.state(), DragState::Dragging { .. }));
    }

    #[test]
    fn test_input_awaits_subtype_then_commits() {
        let (tree, _, div) = section_with_div();
        let measure = StaticMeasurements::new().with_box(div, BoxSize::new(400.0, 100.0));
        let mut dnd = DragDropController::new();
        dnd.drag_start(Tag::Input, PositionMode::Relative);
        let tree = dnd.drag_enter(&tree, div, None, &measure).tree.expect("tree");

        let pending = dnd.drop(&tree, None, &measure);
        assert_eq!(pending.outcome, DropOutcome::AwaitingSubtype);
        let tree = pending.step.tree.expect("hint removed");
        assert_eq!(tree.hint_count(), 0);

        // The drag-end that follows a drop leaves the selection pending
        assert!(dnd.drag_end(&tree).tree.is_none());
        assert!(matches!(dnd.state(), DragState::AwaitingSubtypeSelection { .. }));

        let result = dnd.resolve_subtype(&tree, Some(Subtype::Input(InputKind::Text)), &measure);
        let DropOutcome::Committed(id) = result.outcome else {
            panic!("expected commit");
        };
        let tree = result.step.tree.expect("tree");
        assert_eq!(tree.parent_of(id).map(|p| p.id), Some(div));
        let style = &tree.find_by_id(id).expect("input").style;
        assert_eq!(style.get_str("width"), Some("50%"));
        assert_eq!(style.get_str("height"), Some("40%"));
        assert_eq!(style.get_str("type"), Some("text"));
    }

    #[test]
    fn test_cancelled_subtype_inserts_nothing() {
        let (tree, _, div) = section_with_div();
        let measure = StaticMeasurements::new();
        let mut dnd = DragDropController::new();
        dnd.drag_start(Tag::Button, PositionMode::Relative);
        let tree = dnd.drag_enter(&tree, div, None, &measure).tree.expect("tree");
        let tree = dnd.drop(&tree, None, &measure).step.tree.expect("tree");

        let result = dnd.resolve_subtype(&tree, None, &measure);
        assert_eq!(result.outcome, DropOutcome::Cancelled);
        assert!(result.step.tree.is_none());
        assert_eq!(tree.count_nodes(), 2);
        assert_eq!(dnd.state(), DragState::Idle);
    }

    #[test]
    fn test_drag_end_removes_hint() {
        let (tree, section, _) = section_with_div();
        let measure = StaticMeasurements::new();
        let mut dnd = DragDropController::new();
        dnd.drag_start(Tag::Image, PositionMode::Absolute);
        let tree = dnd.drag_enter(&tree, section, None, &measure).tree.expect("tree");

        let tree = dnd.drag_end(&tree).tree.expect("tree");
        assert_eq!(tree.hint_count(), 0);
        assert_eq!(dnd.state(), DragState::Idle);
    }

    #[test]
    fn test_removed_target_is_forgotten() {
        let (tree, section, div) = section_with_div();
        let measure = StaticMeasurements::new();
        let mut dnd = DragDropController::new();
        dnd.drag_start(Tag::Div, PositionMode::Relative);
        let tree = dnd.drag_enter(&tree, div, None, &measure).tree.expect("tree");

        let tree = tree.remove_by_id(div);
        dnd.forget_missing(&tree);
        assert!(matches!(dnd.state(), DragState::Dragging { .. }));
        assert!(tree.contains(section));
    }
}
