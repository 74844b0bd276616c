//! Geometry supplied by the rendering layer.
//!
//! The engine never lays anything out itself. Whatever renders the tree
//! measures it and answers these queries; tests and the CLI use
//! [`StaticMeasurements`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::style::keys;
use crate::{NodeId, Style};

/// Content-box size of an element in pixels, excluding border and padding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxSize {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl BoxSize {
    /// Create a box size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Bounding box of a sibling element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiblingBox {
    /// Sibling node.
    pub id: NodeId,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

/// Display mode of a container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Display {
    /// Normal block flow.
    #[default]
    Block,
    /// Flexbox.
    Flex,
    /// CSS grid.
    Grid,
}

/// Flex main axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[allow(missing_docs)]
pub enum FlexDirection {
    #[default]
    Row,
    RowReverse,
    Column,
    ColumnReverse,
}

impl FlexDirection {
    /// Whether the main axis is horizontal.
    #[must_use]
    pub const fn is_row(self) -> bool {
        matches!(self, FlexDirection::Row | FlexDirection::RowReverse)
    }
}

/// Layout mode of a parent container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutMode {
    /// Display mode.
    pub display: Display,
    /// Flex main axis; ignored unless `display` is flex.
    #[serde(default)]
    pub flex_direction: FlexDirection,
    /// `justifyContent` value, if set.
    #[serde(default)]
    pub justify_content: Option<String>,
    /// `alignItems` value, if set.
    #[serde(default)]
    pub align_items: Option<String>,
}

impl LayoutMode {
    /// Read the layout mode from a container's inline style.
    ///
    /// Only `display`, `flexDirection`, `justifyContent` and `alignItems`
    /// are consulted; grid templates are not.
    #[must_use]
    pub fn from_style(style: &Style) -> Self {
        let display = match style.get_str(keys::DISPLAY) {
            Some("flex" | "inline-flex") => Display::Flex,
            Some("grid" | "inline-grid") => Display::Grid,
            _ => Display::Block,
        };
        let flex_direction = match style.get_str(keys::FLEX_DIRECTION) {
            Some("row-reverse") => FlexDirection::RowReverse,
            Some("column") => FlexDirection::Column,
            Some("column-reverse") => FlexDirection::ColumnReverse,
            _ => FlexDirection::Row,
        };
        Self {
            display,
            flex_direction,
            justify_content: style.get_str(keys::JUSTIFY_CONTENT).map(str::to_string),
            align_items: style.get_str(keys::ALIGN_ITEMS).map(str::to_string),
        }
    }

    /// Row-oriented flex parents make siblings compete for width; every other
    /// layout makes them compete for height.
    #[must_use]
    pub const fn siblings_compete_horizontally(&self) -> bool {
        matches!(self.display, Display::Flex) && self.flex_direction.is_row()
    }

    /// Whether children are centered on each axis, as `(horizontal, vertical)`.
    #[must_use]
    pub fn centered_axes(&self) -> (bool, bool) {
        let justify = self.justify_content.as_deref() == Some("center");
        let align = self.align_items.as_deref() == Some("center");
        match self.display {
            Display::Flex if self.flex_direction.is_row() => (justify, align),
            Display::Flex => (align, justify),
            Display::Grid => (justify, align),
            Display::Block => (false, false),
        }
    }
}

/// Geometry capability consumed by the resize engine and drag-drop controller.
pub trait MeasurementProvider {
    /// Content-box size of a node. `None` when it is not rendered.
    fn content_box(&self, id: NodeId) -> Option<BoxSize>;

    /// Content-box size of the canvas, the parent of root-level nodes.
    fn canvas_box(&self) -> Option<BoxSize>;

    /// Boxes of the node's siblings in order, excluding the node itself.
    fn sibling_boxes(&self, id: NodeId) -> Vec<SiblingBox>;

    /// Layout mode of the node's parent.
    fn parent_layout(&self, id: NodeId) -> LayoutMode;
}

/// A deterministic provider backed by fixed tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StaticMeasurements {
    canvas: Option<BoxSize>,
    boxes: HashMap<NodeId, BoxSize>,
    siblings: HashMap<NodeId, Vec<SiblingBox>>,
    layouts: HashMap<NodeId, LayoutMode>,
}

impl StaticMeasurements {
    /// Create an empty provider: nothing is measured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the canvas content box.
    #[must_use]
    pub fn with_canvas(mut self, size: BoxSize) -> Self {
        self.canvas = Some(size);
        self
    }

    /// Set a node's content box.
    #[must_use]
    pub fn with_box(mut self, id: NodeId, size: BoxSize) -> Self {
        self.boxes.insert(id, size);
        self
    }

    /// Set a node's sibling boxes.
    #[must_use]
    pub fn with_siblings(mut self, id: NodeId, siblings: Vec<SiblingBox>) -> Self {
        self.siblings.insert(id, siblings);
        self
    }

    /// Set the layout mode of a node's parent.
    #[must_use]
    pub fn with_parent_layout(mut self, id: NodeId, layout: LayoutMode) -> Self {
        self.layouts.insert(id, layout);
        self
    }

    /// Set a node's content box in place.
    pub fn set_box(&mut self, id: NodeId, size: BoxSize) {
        self.boxes.insert(id, size);
    }
}

impl MeasurementProvider for StaticMeasurements {
    fn content_box(&self, id: NodeId) -> Option<BoxSize> {
        self.boxes.get(&id).copied()
    }

    fn canvas_box(&self) -> Option<BoxSize> {
        self.canvas
    }

    fn sibling_boxes(&self, id: NodeId) -> Vec<SiblingBox> {
        self.siblings
            .get(&id)
            .map(|boxes| boxes.iter().filter(|b| b.id != id).copied().collect())
            .unwrap_or_default()
    }

    fn parent_layout(&self, id: NodeId) -> LayoutMode {
        self.layouts.get(&id).cloned().unwrap_or_default()
    }
}
