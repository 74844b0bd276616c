//! Scripted editing session.
//!
//! Replays the gestures a user would make on the canvas (palette drags,
//! a sub-type pick, a resize, style edits) against fixed measurements, then
//! saves the result.

use anyhow::bail;
use builder_core::{
    BoxSize, ButtonKind, DropOutcome, EditorEvent, FormDocument, FormEditor, FormId,
    FormRepository, FormStore, Gradient, InputKind, NodeId, Point, PositionMode, ResizeHandle,
    StaticMeasurements, Subtype, SubtypePicker, Tag,
};
use builder_core::{Direction, SpacingProperty, SpacingValue};

/// Height the demo reports for freshly dropped containers.
const ROW_HEIGHT_PX: f64 = 100.0;

/// Always answers with the kind the script wants.
struct ScriptedPicker;

impl SubtypePicker for ScriptedPicker {
    fn pick(&mut self, tag: Tag) -> Option<Subtype> {
        match tag {
            Tag::Input => Some(Subtype::Input(InputKind::Email)),
            Tag::Button => Some(Subtype::Button(ButtonKind::Button)),
            Tag::Section | Tag::Div | Tag::Heading | Tag::Image => None,
        }
    }
}

/// Build a sample form and store it under `name`. Returns its id.
///
/// # Errors
///
/// Returns an error if a scripted step is rejected or the form cannot be saved.
pub fn run_demo(store: &FormStore, name: &str, canvas: BoxSize) -> anyhow::Result<FormId> {
    let mut editor = FormEditor::default();
    editor.set_subtype_picker(Box::new(ScriptedPicker));
    let mut measure = StaticMeasurements::new().with_canvas(canvas);

    let section = drop_into(&mut editor, &measure, Tag::Section, None, None)?;
    measure.set_box(section, canvas);

    drop_into(&mut editor, &measure, Tag::Heading, Some(section), None)?;

    let row = drop_into(&mut editor, &measure, Tag::Div, Some(section), None)?;
    measure.set_box(row, BoxSize::new(canvas.width, ROW_HEIGHT_PX));

    drop_into(&mut editor, &measure, Tag::Input, Some(row), None)?;
    drop_into(
        &mut editor,
        &measure,
        Tag::Button,
        Some(row),
        Some(Subtype::Button(ButtonKind::Submit)),
    )?;

    editor.set_display(row, "flex");
    editor.edit_spacing(row, SpacingProperty::Padding, Direction::All, SpacingValue::Px(16.0));
    editor.set_gradient(section, &Gradient::linear("to bottom", "#ffffff", "#e2e8f0"));

    // Make the row taller by dragging its bottom edge
    if editor.begin_resize(row, ResizeHandle::Bottom, Point::new(0.0, 0.0), &measure) {
        editor.process_event(
            &EditorEvent::PointerMove {
                at: Point::new(0.0, 60.0),
            },
            &measure,
        );
        editor.end_resize(Point::new(0.0, 60.0));
    } else {
        tracing::warn!("demo resize of {row} did not start");
    }

    let doc = FormDocument::from_tree(FormId::new(), name, editor.tree());
    let id = store.create(doc)?;
    tracing::info!(
        "demo form {id} saved with {} nodes",
        editor.tree().count_nodes()
    );
    Ok(id)
}

/// Drag `tag` from the palette into `target` (or onto the canvas) and drop it.
fn drop_into(
    editor: &mut FormEditor,
    measure: &StaticMeasurements,
    tag: Tag,
    target: Option<NodeId>,
    subtype: Option<Subtype>,
) -> anyhow::Result<NodeId> {
    editor.process_event(
        &EditorEvent::DragStart {
            tag,
            position: PositionMode::Relative,
        },
        measure,
    );
    if let Some(target) = target {
        editor.process_event(
            &EditorEvent::DragEnter {
                target,
                origin: None,
            },
            measure,
        );
    }
    let outcome = editor.drop(subtype, measure);
    editor.process_event(&EditorEvent::DragEnd, measure);
    match outcome {
        DropOutcome::Committed(id) => Ok(id),
        other => bail!("dropping {tag} was not committed: {other:?}"),
    }
}
