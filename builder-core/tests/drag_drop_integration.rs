//! Drag-and-drop Integration Tests
//!
//! Exercises the full palette flow through the editor:
//! - Starting a form with a Section
//! - Hint placement and relocation across containers
//! - Sub-type selection for inputs and buttons
//! - Export after a session

use std::cell::RefCell;
use std::rc::Rc;

use builder_core::{
    export_markup, BoxSize, DragState, DropOutcome, EditorEvent, EditorObserver, FormEditor,
    InputKind, NodeId, PositionMode, StaticMeasurements, Subtype, Tag, Tree,
};

/// Observer that records every hint id it is told about.
#[derive(Default)]
struct HintLog(RefCell<Vec<Option<NodeId>>>);

impl EditorObserver for HintLog {
    fn on_hint_changed(&self, hint: Option<NodeId>) {
        self.0.borrow_mut().push(hint);
    }
}

fn start(editor: &mut FormEditor, tag: Tag, measure: &StaticMeasurements) {
    editor.process_event(
        &EditorEvent::DragStart {
            tag,
            position: PositionMode::Relative,
        },
        measure,
    );
}

fn enter(editor: &mut FormEditor, target: NodeId, measure: &StaticMeasurements) {
    editor.process_event(
        &EditorEvent::DragEnter {
            target,
            origin: None,
        },
        measure,
    );
}

/// Drop a Section onto the empty canvas and return its id.
fn new_form(editor: &mut FormEditor, measure: &StaticMeasurements) -> NodeId {
    start(editor, Tag::Section, measure);
    match editor.drop(None, measure) {
        DropOutcome::Committed(id) => id,
        other => panic!("section drop should commit, got {other:?}"),
    }
}

/// Drop a Div into `parent` and return its id.
fn add_div(editor: &mut FormEditor, parent: NodeId, measure: &StaticMeasurements) -> NodeId {
    start(editor, Tag::Div, measure);
    enter(editor, parent, measure);
    match editor.drop(None, measure) {
        DropOutcome::Committed(id) => id,
        other => panic!("div drop should commit, got {other:?}"),
    }
}

// ============================================================================
// Starting a form
// ============================================================================

#[test]
fn test_section_on_empty_canvas_fills_canvas() {
    let mut editor = FormEditor::default();
    let measure = StaticMeasurements::new();
    let id = new_form(&mut editor, &measure);

    let tree = editor.tree();
    assert_eq!(tree.roots().count(), 1);
    let root = tree.find_by_id(id).expect("root");
    assert_eq!(root.tag, Tag::Section);
    assert_eq!(root.style.get_str("width"), Some("100%"));
    assert_eq!(root.style.get_str("height"), Some("100%"));
    assert_eq!(editor.drag_state(), DragState::Idle);
}

#[test]
fn test_only_section_can_start_a_form() {
    let measure = StaticMeasurements::new();
    for tag in [Tag::Div, Tag::Heading, Tag::Input, Tag::Button, Tag::Image] {
        let mut editor = FormEditor::default();
        start(&mut editor, tag, &measure);
        assert_eq!(editor.drop(None, &measure), DropOutcome::Ignored, "{tag}");
        assert!(editor.tree().is_empty());
    }
}

// ============================================================================
// Hint lifecycle
// ============================================================================

#[test]
fn test_hint_follows_pointer_across_containers() {
    let mut editor = FormEditor::default();
    let log = Rc::new(HintLog::default());
    editor.add_observer(log.clone());
    let measure = StaticMeasurements::new();
    let section = new_form(&mut editor, &measure);
    let left = add_div(&mut editor, section, &measure);
    let right = add_div(&mut editor, section, &measure);
    log.0.borrow_mut().clear();

    start(&mut editor, Tag::Heading, &measure);
    enter(&mut editor, left, &measure);
    editor.process_event(
        &EditorEvent::DragLeave {
            from: left,
            related: Some(right),
        },
        &measure,
    );

    let tree = editor.tree();
    assert_eq!(tree.hint_count(), 1);
    let hint = tree.hint().expect("hint").id;
    assert_eq!(tree.parent_of(hint).map(|p| p.id), Some(right));
    assert_eq!(log.0.borrow().len(), 2);

    editor.process_event(
        &EditorEvent::DragLeave {
            from: right,
            related: None,
        },
        &measure,
    );
    assert_eq!(editor.tree().hint_count(), 0);
    assert_eq!(log.0.borrow().last(), Some(&None));

    editor.process_event(&EditorEvent::DragEnd, &measure);
    assert_eq!(editor.drag_state(), DragState::Idle);
}

#[test]
fn test_hint_follows_browser_event_order() {
    let mut editor = FormEditor::default();
    let measure = StaticMeasurements::new();
    let section = new_form(&mut editor, &measure);
    let left = add_div(&mut editor, section, &measure);
    let right = add_div(&mut editor, section, &measure);

    start(&mut editor, Tag::Heading, &measure);
    enter(&mut editor, left, &measure);
    // dragenter on the next container arrives before dragleave on the old one
    editor.process_event(
        &EditorEvent::DragEnter {
            target: right,
            origin: Some(left),
        },
        &measure,
    );
    editor.process_event(
        &EditorEvent::DragLeave {
            from: left,
            related: Some(right),
        },
        &measure,
    );

    let tree = editor.tree();
    assert_eq!(tree.hint_count(), 1);
    let hint = tree.hint().expect("hint").id;
    assert_eq!(tree.parent_of(hint).map(|p| p.id), Some(right));

    let outcome = editor.drop(None, &measure);
    let DropOutcome::Committed(heading) = outcome else {
        panic!("expected commit, got {outcome:?}");
    };
    assert_eq!(editor.tree().parent_of(heading).map(|p| p.id), Some(right));
    assert_eq!(editor.tree().hint_count(), 0);
}

#[test]
fn test_leave_into_own_child_keeps_hint() {
    let mut editor = FormEditor::default();
    let measure = StaticMeasurements::new();
    let section = new_form(&mut editor, &measure);

    start(&mut editor, Tag::Image, &measure);
    enter(&mut editor, section, &measure);
    let hint = editor.tree().hint().expect("hint").id;

    // Crossing onto the hint itself is still inside the hovered section
    editor.process_event(
        &EditorEvent::DragLeave {
            from: section,
            related: Some(hint),
        },
        &measure,
    );
    assert_eq!(editor.tree().hint().map(|h| h.id), Some(hint));
}

#[test]
fn test_export_never_contains_hint() {
    let mut editor = FormEditor::default();
    let measure = StaticMeasurements::new();
    let section = new_form(&mut editor, &measure);

    start(&mut editor, Tag::Div, &measure);
    enter(&mut editor, section, &measure);
    assert_eq!(editor.tree().hint_count(), 1);

    let markup = editor.export_markup();
    assert_eq!(markup.matches("<Div").count(), 0);
    assert!(!markup.contains("hidden"));
}

// ============================================================================
// Sub-type selection
// ============================================================================

#[test]
fn test_input_over_measured_div_sizes_relative_to_target() {
    let mut editor = FormEditor::default();
    let mut measure = StaticMeasurements::new();
    let section = new_form(&mut editor, &measure);
    let div = add_div(&mut editor, section, &measure);
    measure.set_box(div, BoxSize::new(400.0, 100.0));

    start(&mut editor, Tag::Input, &measure);
    enter(&mut editor, div, &measure);
    assert_eq!(editor.drop(None, &measure), DropOutcome::AwaitingSubtype);
    assert!(matches!(
        editor.drag_state(),
        DragState::AwaitingSubtypeSelection { tag: Tag::Input, .. }
    ));
    assert_eq!(editor.tree().hint_count(), 0);

    let outcome = editor.resolve_subtype(Some(Subtype::Input(InputKind::Text)), &measure);
    let DropOutcome::Committed(id) = outcome else {
        panic!("expected commit, got {outcome:?}");
    };

    let tree = editor.tree();
    let children: Vec<_> = tree.find_by_id(div).expect("div").children().collect();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].id, id);
    assert_eq!(children[0].style.get_str("width"), Some("50%"));
    assert_eq!(children[0].style.get_str("height"), Some("40%"));
}

#[test]
fn test_cancelled_selection_materializes_nothing() {
    let mut editor = FormEditor::default();
    let measure = StaticMeasurements::new();
    let section = new_form(&mut editor, &measure);
    let before = editor.tree().clone();

    start(&mut editor, Tag::Button, &measure);
    enter(&mut editor, section, &measure);
    assert_eq!(editor.drop(None, &measure), DropOutcome::AwaitingSubtype);
    editor.process_event(&EditorEvent::DragEnd, &measure);
    assert_eq!(editor.resolve_subtype(None, &measure), DropOutcome::Cancelled);

    assert_eq!(editor.tree(), &before);
    assert_eq!(editor.drag_state(), DragState::Idle);
}

#[test]
fn test_fill_colors_differ_between_siblings() {
    let mut editor = FormEditor::default();
    let measure = StaticMeasurements::new();
    let section = new_form(&mut editor, &measure);
    let a = add_div(&mut editor, section, &measure);
    let b = add_div(&mut editor, section, &measure);

    let tree = editor.tree();
    let color = |id| {
        tree.find_by_id(id)
            .and_then(|n| n.style.get_str("backgroundColor"))
            .map(str::to_string)
    };
    assert!(color(a).is_some());
    assert_ne!(color(a), color(b));
}

// ============================================================================
// Export
// ============================================================================

#[test]
fn test_export_single_section() {
    let tree = Tree::new().insert(None, builder_core::ComponentNode::new(Tag::Section));
    let markup = export_markup(&tree);
    assert_eq!(markup.matches("<Section").count(), 1);
    assert_eq!(markup.matches("</Section>").count(), 1);
    assert!(markup.find("<Section") < markup.find("</Section>"));
}
