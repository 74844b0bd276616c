//! Input events for editor interaction.

use serde::{Deserialize, Serialize};

use crate::resize::ResizeHandle;
use crate::{NodeId, PositionMode, Subtype, Tag};

/// Pointer position in canvas coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X position in pixels.
    pub x: f64,
    /// Y position in pixels.
    pub y: f64,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An input event delivered by the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditorEvent {
    /// A palette entry was grabbed.
    #[serde(rename_all = "camelCase")]
    DragStart {
        /// Kind being dragged.
        tag: Tag,
        /// Position mode for the new node.
        #[serde(default)]
        position: PositionMode,
    },
    /// The drag entered a node.
    #[serde(rename_all = "camelCase")]
    DragEnter {
        /// Entered node.
        target: NodeId,
        /// Node the pointer came from, if any.
        #[serde(default)]
        origin: Option<NodeId>,
    },
    /// The drag left a node.
    #[serde(rename_all = "camelCase")]
    DragLeave {
        /// Node that was left.
        from: NodeId,
        /// Node entered next, if any.
        #[serde(default)]
        related: Option<NodeId>,
    },
    /// The pointer was released over the current target or the empty canvas.
    #[serde(rename_all = "camelCase")]
    Drop {
        /// Sub-type chosen up front, if any.
        #[serde(default)]
        subtype: Option<Subtype>,
    },
    /// The drag ended, with or without a drop.
    DragEnd,
    /// A resize handle was pressed.
    #[serde(rename_all = "camelCase")]
    ResizeStart {
        /// Node being resized.
        node: NodeId,
        /// Pressed handle.
        handle: ResizeHandle,
        /// Pointer position.
        at: Point,
    },
    /// The pointer moved.
    PointerMove {
        /// Pointer position.
        at: Point,
    },
    /// The pointer was released.
    PointerUp {
        /// Pointer position.
        at: Point,
    },
    /// A node was deleted.
    Delete {
        /// Deleted node.
        node: NodeId,
    },
}

impl EditorEvent {
    /// Whether this event belongs to a drag-and-drop gesture.
    #[must_use]
    pub fn is_drag(&self) -> bool {
        matches!(
            self,
            Self::DragStart { .. }
                | Self::DragEnter { .. }
                | Self::DragLeave { .. }
                | Self::Drop { .. }
                | Self::DragEnd
        )
    }
}
