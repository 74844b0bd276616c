//! WebAssembly bindings for builder-core.
//!
//! The browser rendering layer drives a [`WasmEditor`] with pointer and drag
//! events and supplies measurements as JSON (see [`StaticMeasurements`]).
//! Node ids cross the boundary as UUID strings.

use std::rc::Rc;
use std::str::FromStr;

use wasm_bindgen::prelude::*;

use crate::drag_drop::DropOutcome;
use crate::listener::NoopCapture;
use crate::measure::StaticMeasurements;
use crate::{
    Direction, EditorEvent, FormEditor, NodeId, Point, PositionMode, ResizeHandle, SpacingProperty,
    SpacingValue, Style, Subtype, Tag, Tree,
};

/// Initialize the builder WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// Editor instance for WASM.
#[wasm_bindgen]
pub struct WasmEditor {
    editor: FormEditor,
    measure: StaticMeasurements,
}

#[wasm_bindgen]
impl WasmEditor {
    /// Create an editor with an empty tree.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        Self {
            editor: FormEditor::new(Rc::new(NoopCapture)),
            measure: StaticMeasurements::new(),
        }
    }

    /// Replace the current measurements.
    ///
    /// # Errors
    ///
    /// Returns an error string if JSON parsing fails.
    #[wasm_bindgen(js_name = setMeasurements)]
    pub fn set_measurements(&mut self, json: &str) -> Result<(), String> {
        self.measure = serde_json::from_str(json).map_err(|e| e.to_string())?;
        Ok(())
    }

    /// Get the current tree as JSON.
    #[wasm_bindgen(js_name = getTreeJson)]
    #[must_use]
    pub fn get_tree_json(&self) -> String {
        serde_json::to_string(self.editor.tree()).unwrap_or_default()
    }

    /// Replace the tree from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if JSON parsing fails or a node id appears
    /// more than once.
    #[wasm_bindgen(js_name = loadTreeJson)]
    pub fn load_tree_json(&mut self, json: &str) -> Result<(), String> {
        let tree: Tree = serde_json::from_str(json).map_err(|e| e.to_string())?;
        self.editor = FormEditor::new(Rc::new(NoopCapture))
            .with_tree(tree)
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    /// Process an editor event serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if the event cannot be parsed.
    #[wasm_bindgen(js_name = processEventJson)]
    pub fn process_event_json(&mut self, json: &str) -> Result<String, String> {
        let event: EditorEvent = serde_json::from_str(json).map_err(|e| e.to_string())?;
        let response = self.editor.process_event(&event, &self.measure);
        Ok(format!("{response:?}"))
    }

    /// Start dragging a palette entry.
    ///
    /// # Errors
    ///
    /// Returns an error string for an unknown tag.
    #[wasm_bindgen(js_name = dragStart)]
    pub fn drag_start(&mut self, tag: &str, absolute: bool) -> Result<(), String> {
        let tag = Tag::from_str(tag)?;
        let position = if absolute {
            PositionMode::Absolute
        } else {
            PositionMode::Relative
        };
        self.editor
            .process_event(&EditorEvent::DragStart { tag, position }, &self.measure);
        Ok(())
    }

    /// The drag entered a node.
    ///
    /// # Errors
    ///
    /// Returns an error string for malformed node ids.
    #[wasm_bindgen(js_name = dragEnter)]
    pub fn drag_enter(&mut self, target: &str, origin: Option<String>) -> Result<(), String> {
        let event = EditorEvent::DragEnter {
            target: parse_node(target)?,
            origin: origin.as_deref().map(parse_node).transpose()?,
        };
        self.editor.process_event(&event, &self.measure);
        Ok(())
    }

    /// The drag left a node.
    ///
    /// # Errors
    ///
    /// Returns an error string for malformed node ids.
    #[wasm_bindgen(js_name = dragLeave)]
    pub fn drag_leave(&mut self, from: &str, related: Option<String>) -> Result<(), String> {
        let event = EditorEvent::DragLeave {
            from: parse_node(from)?,
            related: related.as_deref().map(parse_node).transpose()?,
        };
        self.editor.process_event(&event, &self.measure);
        Ok(())
    }

    /// Drop the dragged entry. Returns `"ignored"`, `"awaiting-subtype"`,
    /// `"cancelled"` or the id of the inserted node.
    #[wasm_bindgen]
    pub fn drop(&mut self, subtype: Option<String>) -> String {
        let tag = self.editor.drag_state().tag();
        let subtype = tag.zip(subtype).and_then(|(tag, label)| Subtype::parse(tag, &label));
        outcome_label(self.editor.drop(subtype, &self.measure))
    }

    /// Answer a pending sub-type selection; `None` cancels it.
    #[wasm_bindgen(js_name = resolveSubtype)]
    pub fn resolve_subtype(&mut self, subtype: Option<String>) -> String {
        let tag = self.editor.drag_state().tag();
        let choice = tag.zip(subtype).and_then(|(tag, label)| Subtype::parse(tag, &label));
        outcome_label(self.editor.resolve_subtype(choice, &self.measure))
    }

    /// The drag ended.
    #[wasm_bindgen(js_name = dragEnd)]
    pub fn drag_end(&mut self) {
        self.editor.process_event(&EditorEvent::DragEnd, &self.measure);
    }

    /// Press a resize handle. Returns whether a session started.
    ///
    /// # Errors
    ///
    /// Returns an error string for a malformed id or unknown handle.
    #[wasm_bindgen(js_name = resizeStart)]
    pub fn resize_start(&mut self, node: &str, handle: &str, x: f64, y: f64) -> Result<bool, String> {
        let handle: ResizeHandle =
            serde_json::from_value(serde_json::Value::String(handle.to_string()))
                .map_err(|e| e.to_string())?;
        Ok(self
            .editor
            .begin_resize(parse_node(node)?, handle, Point::new(x, y), &self.measure))
    }

    /// Move the pointer.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.editor.process_event(
            &EditorEvent::PointerMove {
                at: Point::new(x, y),
            },
            &self.measure,
        );
    }

    /// Release the pointer. Returns whether a resize was committed.
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, x: f64, y: f64) -> bool {
        self.editor.end_resize(Point::new(x, y)).is_some()
    }

    /// Delete a node and its subtree.
    ///
    /// # Errors
    ///
    /// Returns an error string for a malformed id.
    #[wasm_bindgen(js_name = removeNode)]
    pub fn remove_node(&mut self, node: &str) -> Result<bool, String> {
        Ok(self.editor.remove_node(parse_node(node)?))
    }

    /// Merge a JSON style patch into a node.
    ///
    /// # Errors
    ///
    /// Returns an error string for a malformed id or patch, or a key that is
    /// not a plain property name.
    #[wasm_bindgen(js_name = mergeStyle)]
    pub fn merge_style(&mut self, node: &str, patch: &str) -> Result<bool, String> {
        let patch: Style = serde_json::from_str(patch).map_err(|e| e.to_string())?;
        patch.check_keys().map_err(|e| e.to_string())?;
        Ok(self.editor.merge_style(parse_node(node)?, &patch))
    }

    /// Edit padding or margin. `value` of `undefined` clears the sides.
    ///
    /// # Errors
    ///
    /// Returns an error string for a malformed id, property or direction.
    #[wasm_bindgen(js_name = editSpacing)]
    pub fn edit_spacing(
        &mut self,
        node: &str,
        property: &str,
        direction: &str,
        value: Option<f64>,
    ) -> Result<bool, String> {
        let property = match property {
            "padding" => SpacingProperty::Padding,
            "margin" => SpacingProperty::Margin,
            other => return Err(format!("unknown spacing property: {other}")),
        };
        let direction = Direction::from_str(direction).map_err(|e| e.to_string())?;
        let value = value.map_or(SpacingValue::Cleared, SpacingValue::Px);
        Ok(self
            .editor
            .edit_spacing(parse_node(node)?, property, direction, value))
    }

    /// Export the tree as markup.
    #[wasm_bindgen(js_name = exportMarkup)]
    #[must_use]
    pub fn export_markup(&self) -> String {
        self.editor.export_markup()
    }
}

impl Default for WasmEditor {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_node(input: &str) -> Result<NodeId, String> {
    NodeId::parse(input).map_err(|e| format!("invalid node id {input:?}: {e}"))
}

fn outcome_label(outcome: DropOutcome) -> String {
    match outcome {
        DropOutcome::Ignored => "ignored".to_string(),
        DropOutcome::AwaitingSubtype => "awaiting-subtype".to_string(),
        DropOutcome::Cancelled => "cancelled".to_string(),
        DropOutcome::Committed(id) => id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_drop_on_empty_canvas() {
        let mut editor = WasmEditor::new();
        editor.drag_start("section", false).expect("valid tag");
        let id = editor.drop(None);
        assert!(NodeId::parse(&id).is_ok());
        assert!(editor.export_markup().starts_with("<Section"));
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let mut editor = WasmEditor::new();
        assert!(editor.drag_start("table", false).is_err());
    }

    #[test]
    fn tree_json_roundtrip() {
        let mut editor = WasmEditor::new();
        editor.drag_start("Section", false).expect("valid tag");
        editor.drop(None);
        let json = editor.get_tree_json();
        let mut other = WasmEditor::new();
        other.load_tree_json(&json).expect("valid tree");
        assert_eq!(other.get_tree_json(), json);
    }

    #[test]
    fn tree_json_with_duplicate_ids_is_rejected() {
        let div = crate::ComponentNode::new(Tag::Div);
        let tree = Tree::from_roots([crate::ComponentNode::new(Tag::Section)
            .with_child(div.clone())
            .with_child(div)]);
        let json = serde_json::to_string(&tree).expect("encode");

        let mut editor = WasmEditor::new();
        assert!(editor.load_tree_json(&json).is_err());
        assert_eq!(editor.get_tree_json(), "[]");
    }

    #[test]
    fn merge_style_rejects_markup_in_keys() {
        let mut editor = WasmEditor::new();
        editor.drag_start("section", false).expect("valid tag");
        let id = editor.drop(None);

        assert!(editor.merge_style(&id, r#"{"a}}><Div":"x"}"#).is_err());
        assert_eq!(editor.merge_style(&id, r#"{"color":"red"}"#), Ok(true));
        assert!(editor.export_markup().contains(r#"color: "red""#));
    }

    #[test]
    fn measurements_from_json() {
        let mut editor = WasmEditor::new();
        assert!(editor
            .set_measurements(r#"{"canvas":{"width":800.0,"height":600.0}}"#)
            .is_ok());
        assert!(editor.set_measurements("{ nope").is_err());
    }

    #[test]
    fn input_drop_awaits_then_resolves() {
        let mut editor = WasmEditor::new();
        editor.drag_start("Section", false).expect("valid tag");
        let section = editor.drop(None);

        editor.drag_start("Input", false).expect("valid tag");
        editor.drag_enter(&section, None).expect("valid id");
        assert_eq!(editor.drop(None), "awaiting-subtype");
        let id = editor.resolve_subtype(Some("email".into()));
        assert!(NodeId::parse(&id).is_ok());
    }
}
