//! Editor state and the surface exposed to a rendering layer.
//!
//! [`FormEditor`] owns the single [`Tree`]. Every committed mutation replaces
//! it wholesale and is reported to the registered [`EditorObserver`]s; the
//! rendering layer only ever reads snapshots.

use std::rc::Rc;

use crate::drag_drop::{DragDropController, DragState, DragStep, DropOutcome};
use crate::event::{EditorEvent, Point};
use crate::listener::{NoopCapture, PointerCapture};
use crate::measure::{BoxSize, MeasurementProvider};
use crate::mutator::{apply_patch, gradient_of, gradient_patch, seed_derived, spacing_of, spacing_patch};
use crate::resize::{ResizeCommit, ResizeEngine, ResizeHandle};
use crate::schema::{FormDocument, FormId};
use crate::serialize::export_markup;
use crate::spacing::{Direction, Spacing, SpacingProperty, SpacingValue};
use crate::style::keys;
use crate::{BuilderResult, Gradient, NodeId, Style, Subtype, Tag, Tree};

/// Callbacks fired by the editor. Every method defaults to a no-op.
pub trait EditorObserver {
    /// The tree was replaced after a committed mutation.
    fn on_tree_changed(&self, _tree: &Tree) {}

    /// The hint was created, moved or cleared. Carries the current hint id.
    fn on_hint_changed(&self, _hint: Option<NodeId>) {}

    /// A resize or style edit was finalized on `node`.
    fn on_style_committed(&self, _node: NodeId, _patch: &Style) {}
}

/// Asks the user which input or button kind to insert.
pub trait SubtypePicker {
    /// Pick a sub-type for `tag`, or `None` if the selection was dismissed.
    fn pick(&mut self, tag: Tag) -> Option<Subtype>;
}

/// What an event did, for hosts that want more than observer callbacks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventResponse {
    /// Nothing visible happened.
    None,
    /// The drag state or hint changed.
    Dragged,
    /// A drop was handled.
    Dropped(DropOutcome),
    /// A resize session started.
    ResizeStarted,
    /// Live pixel size of the node being resized.
    Resizing(BoxSize),
    /// A resize was committed to the tree.
    Resized(NodeId),
    /// A node was deleted.
    Deleted(NodeId),
}

/// The form editor.
pub struct FormEditor {
    tree: Tree,
    drag: DragDropController,
    resize: ResizeEngine,
    picker: Option<Box<dyn SubtypePicker>>,
    observers: Vec<Rc<dyn EditorObserver>>,
}

impl FormEditor {
    /// Create an editor with an empty tree, registering pointer listeners
    /// through `capture`.
    #[must_use]
    pub fn new(capture: Rc<dyn PointerCapture>) -> Self {
        Self {
            tree: Tree::new(),
            drag: DragDropController::new(),
            resize: ResizeEngine::new(capture),
            picker: None,
            observers: Vec::new(),
        }
    }

    /// Start from an existing tree. Hint nodes are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BuilderError::InvalidDocument`] if a node id appears more
    /// than once.
    pub fn with_tree(mut self, tree: Tree) -> BuilderResult<Self> {
        let tree = tree.without_hint();
        tree.validate_ids()?;
        self.tree = tree;
        Ok(self)
    }

    /// Current tree snapshot.
    #[must_use]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Current drag state.
    #[must_use]
    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    /// Whether a resize session is in flight.
    #[must_use]
    pub fn is_resizing(&self) -> bool {
        self.resize.is_active()
    }

    /// Install the collaborator consulted when a drop needs a sub-type.
    pub fn set_subtype_picker(&mut self, picker: Box<dyn SubtypePicker>) {
        self.picker = Some(picker);
    }

    /// Register an observer.
    pub fn add_observer(&mut self, observer: Rc<dyn EditorObserver>) {
        self.observers.push(observer);
    }

    /// Process an input event.
    pub fn process_event(
        &mut self,
        event: &EditorEvent,
        measure: &dyn MeasurementProvider,
    ) -> EventResponse {
        if event.is_drag() && self.resize.is_active() {
            tracing::debug!("drag event ignored during resize");
            return EventResponse::None;
        }
        match *event {
            EditorEvent::DragStart { tag, position } => {
                self.drag.drag_start(tag, position);
                EventResponse::Dragged
            }
            EditorEvent::DragEnter { target, origin } => {
                let step = self.drag.drag_enter(&self.tree, target, origin, measure);
                self.apply_drag_step(step)
            }
            EditorEvent::DragLeave { from, related } => {
                let step = self.drag.drag_leave(&self.tree, from, related, measure);
                self.apply_drag_step(step)
            }
            EditorEvent::Drop { subtype } => EventResponse::Dropped(self.drop(subtype, measure)),
            EditorEvent::DragEnd => {
                let step = self.drag.drag_end(&self.tree);
                self.apply_drag_step(step)
            }
            EditorEvent::ResizeStart { node, handle, at } => {
                if self.begin_resize(node, handle, at, measure) {
                    EventResponse::ResizeStarted
                } else {
                    EventResponse::None
                }
            }
            EditorEvent::PointerMove { at } => self
                .resize
                .pointer_move(at)
                .map_or(EventResponse::None, EventResponse::Resizing),
            EditorEvent::PointerUp { at } => self
                .end_resize(at)
                .map_or(EventResponse::None, EventResponse::Resized),
            EditorEvent::Delete { node } => {
                if self.remove_node(node) {
                    EventResponse::Deleted(node)
                } else {
                    EventResponse::None
                }
            }
        }
    }

    /// Drop the dragged entry. Consults the sub-type picker when the kind
    /// needs one and none was given.
    pub fn drop(&mut self, subtype: Option<Subtype>, measure: &dyn MeasurementProvider) -> DropOutcome {
        let result = self.drag.drop(&self.tree, subtype, measure);
        self.apply_drag_step(result.step);
        if result.outcome != DropOutcome::AwaitingSubtype {
            return result.outcome;
        }
        let Some(tag) = self.drag.state().tag() else {
            return result.outcome;
        };
        match self.picker.as_mut() {
            Some(picker) => {
                let choice = picker.pick(tag);
                self.resolve_subtype(choice, measure)
            }
            None => result.outcome,
        }
    }

    /// Answer a pending sub-type selection. `None` cancels the insertion.
    pub fn resolve_subtype(
        &mut self,
        choice: Option<Subtype>,
        measure: &dyn MeasurementProvider,
    ) -> DropOutcome {
        let result = self.drag.resolve_subtype(&self.tree, choice, measure);
        self.apply_drag_step(result.step);
        result.outcome
    }

    /// Start resizing `node` from `handle`.
    pub fn begin_resize(
        &mut self,
        node: NodeId,
        handle: ResizeHandle,
        at: Point,
        measure: &dyn MeasurementProvider,
    ) -> bool {
        if self.drag.is_active() {
            tracing::debug!("resize ignored during drag");
            return false;
        }
        self.resize.begin(&self.tree, node, handle, at, measure)
    }

    /// Release the pointer, committing the active resize if it moved.
    pub fn end_resize(&mut self, at: Point) -> Option<NodeId> {
        let ResizeCommit { node, patch, .. } = self.resize.pointer_up(at)?;
        self.commit_style(node, &patch).then_some(node)
    }

    /// Abort the active resize.
    pub fn cancel_resize(&mut self) {
        self.resize.cancel();
    }

    /// Delete `id` and its subtree. Returns whether anything was removed.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        if !self.tree.contains(id) {
            tracing::debug!("remove_node: {id} not in tree");
            return false;
        }
        let hint_inside = self.tree.hint().is_some_and(|h| self.tree.is_within(h.id, id));
        if self
            .resize
            .session()
            .is_some_and(|s| self.tree.is_within(s.node(), id))
        {
            self.resize.cancel();
        }
        let next = self.tree.remove_by_id(id);
        self.drag.forget_missing(&next);
        self.replace_tree(next);
        if hint_inside {
            self.notify_hint();
        }
        tracing::info!("removed node {id}");
        true
    }

    /// Merge `patch` into the style of `id`. Returns whether the node exists.
    pub fn merge_style(&mut self, id: NodeId, patch: &Style) -> bool {
        self.commit_style(id, &seed_derived(patch))
    }

    /// Set `display`, seeding the flex or grid sub-properties.
    pub fn set_display(&mut self, id: NodeId, display: &str) -> bool {
        self.merge_style(id, &Style::new().with(keys::DISPLAY, display))
    }

    /// Gradient state of `id`.
    #[must_use]
    pub fn gradient(&self, id: NodeId) -> Option<Gradient> {
        self.tree.find_by_id(id).map(gradient_of)
    }

    /// Write `gradient` as the `backgroundImage` of `id`.
    pub fn set_gradient(&mut self, id: NodeId, gradient: &Gradient) -> bool {
        self.merge_style(id, &gradient_patch(gradient))
    }

    /// Padding or margin of `id`, malformed values reading as zeros.
    #[must_use]
    pub fn spacing(&self, id: NodeId, property: SpacingProperty) -> Option<Spacing> {
        self.tree.find_by_id(id).map(|n| spacing_of(n, property))
    }

    /// Edit one or more sides of the padding or margin of `id`.
    ///
    /// Returns `false` for absent nodes and for margin edits on root-level nodes.
    pub fn edit_spacing(
        &mut self,
        id: NodeId,
        property: SpacingProperty,
        direction: Direction,
        value: SpacingValue,
    ) -> bool {
        match spacing_patch(&self.tree, id, property, direction, value) {
            Some(patch) => self.commit_style(id, &patch),
            None => false,
        }
    }

    /// Export the current tree as markup.
    #[must_use]
    pub fn export_markup(&self) -> String {
        export_markup(&self.tree.without_hint())
    }

    /// Snapshot the tree as a form document.
    #[must_use]
    pub fn to_document(&self, id: FormId, name: &str) -> FormDocument {
        FormDocument::from_tree(id, name, &self.tree)
    }

    /// Replace the tree with a loaded document, ending any session.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BuilderError::InvalidDocument`] if a node id appears more
    /// than once; the current tree is kept.
    pub fn load_document(&mut self, doc: &FormDocument) -> BuilderResult<()> {
        let tree = doc.tree.without_hint();
        tree.validate_ids()?;
        self.resize.cancel();
        self.drag = DragDropController::new();
        self.replace_tree(tree);
        tracing::info!("loaded form {} ({})", doc.id, doc.name);
        Ok(())
    }

    fn commit_style(&mut self, id: NodeId, patch: &Style) -> bool {
        if !self.tree.contains(id) {
            tracing::debug!("style edit on missing node {id} ignored");
            return false;
        }
        let next = apply_patch(&self.tree, id, patch);
        self.replace_tree(next);
        for observer in &self.observers {
            observer.on_style_committed(id, patch);
        }
        true
    }

    fn apply_drag_step(&mut self, step: DragStep) -> EventResponse {
        let changed = step.tree.is_some() || step.hint_changed;
        if let Some(tree) = step.tree {
            self.replace_tree(tree);
        }
        if step.hint_changed {
            self.notify_hint();
        }
        if changed {
            EventResponse::Dragged
        } else {
            EventResponse::None
        }
    }

    fn replace_tree(&mut self, tree: Tree) {
        self.tree = tree;
        for observer in &self.observers {
            observer.on_tree_changed(&self.tree);
        }
    }

    fn notify_hint(&self) {
        let hint = self.tree.hint().map(|h| h.id);
        for observer in &self.observers {
            observer.on_hint_changed(hint);
        }
    }
}

impl Default for FormEditor {
    fn default() -> Self {
        Self::new(Rc::new(NoopCapture))
    }
}

impl std::fmt::Debug for FormEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormEditor")
            .field("tree", &self.tree)
            .field("drag", &self.drag)
            .field("resize", &self.resize)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}
