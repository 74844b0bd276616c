//! Pointer-driven, sibling-constrained resize.
//!
//! A session starts when a handle is pressed, tracks pixel dimensions while
//! the pointer moves, and on release converts them back to percentages of
//! the parent's content box. Pixel state exists only inside the session.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::event::Point;
use crate::listener::{ListenerGuard, PointerCapture};
use crate::measure::{BoxSize, LayoutMode, MeasurementProvider};
use crate::style::{keys, Dimension};
use crate::{NodeId, Style, Tag, Tree};

/// Default minimum width and height of a resized node, in pixels.
pub const DEFAULT_MIN_SIZE: f64 = 100.0;

/// Edge or corner a resize is dragged from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[allow(missing_docs)]
pub enum ResizeHandle {
    Top,
    Right,
    Bottom,
    Left,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeHandle {
    /// Sign applied to the horizontal pointer delta; zero if the handle does
    /// not resize width.
    #[must_use]
    pub const fn horizontal_sign(self) -> f64 {
        match self {
            Self::Right | Self::TopRight | Self::BottomRight => 1.0,
            Self::Left | Self::TopLeft | Self::BottomLeft => -1.0,
            Self::Top | Self::Bottom => 0.0,
        }
    }

    /// Sign applied to the vertical pointer delta; zero if the handle does
    /// not resize height.
    #[must_use]
    pub const fn vertical_sign(self) -> f64 {
        match self {
            Self::Bottom | Self::BottomLeft | Self::BottomRight => 1.0,
            Self::Top | Self::TopLeft | Self::TopRight => -1.0,
            Self::Left | Self::Right => 0.0,
        }
    }

    /// Handles wired for a node kind.
    #[must_use]
    pub const fn available_for(tag: Tag) -> &'static [ResizeHandle] {
        match tag {
            Tag::Div => &[
                Self::Top,
                Self::Right,
                Self::Bottom,
                Self::Left,
                Self::BottomRight,
            ],
            Tag::Section | Tag::Input | Tag::Button | Tag::Image => {
                &[Self::Right, Self::Bottom, Self::BottomRight]
            }
            Tag::Heading => &[],
        }
    }
}

/// Minimum size of a resized node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeLimits {
    /// Minimum width in pixels.
    pub min_width: f64,
    /// Minimum height in pixels.
    pub min_height: f64,
}

impl Default for ResizeLimits {
    fn default() -> Self {
        Self {
            min_width: DEFAULT_MIN_SIZE,
            min_height: DEFAULT_MIN_SIZE,
        }
    }
}

impl ResizeLimits {
    /// Limits for a node kind.
    #[must_use]
    pub fn for_tag(tag: Tag) -> Self {
        match tag {
            Tag::Div => Self {
                min_width: 50.0,
                min_height: 50.0,
            },
            Tag::Input | Tag::Button => Self {
                min_width: 60.0,
                min_height: 30.0,
            },
            Tag::Section | Tag::Heading | Tag::Image => Self::default(),
        }
    }
}

/// Style change produced by a completed resize.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeCommit {
    /// Resized node.
    pub node: NodeId,
    /// `width`/`height` as percentages of the parent's content box.
    pub patch: Style,
    /// Final size in pixels.
    pub size: BoxSize,
}

/// One in-flight resize.
#[derive(Debug)]
pub struct ResizeSession {
    node: NodeId,
    handle: ResizeHandle,
    start: Point,
    start_size: BoxSize,
    parent: BoxSize,
    min: BoxSize,
    max: BoxSize,
    centered: (bool, bool),
    current: Option<BoxSize>,
    _listeners: ListenerGuard,
}

impl ResizeSession {
    /// Start a session on `node` from `handle` at pointer position `start`.
    ///
    /// Returns `None` if the node is absent, the handle is not wired for its
    /// kind, or the parent's content box is not measured.
    #[must_use]
    pub fn begin(
        tree: &Tree,
        node: NodeId,
        handle: ResizeHandle,
        start: Point,
        limits: ResizeLimits,
        measure: &dyn MeasurementProvider,
        capture: Rc<dyn PointerCapture>,
    ) -> Option<Self> {
        let target = tree.find_by_id(node)?;
        if !ResizeHandle::available_for(target.tag).contains(&handle) {
            tracing::debug!("{handle:?} handle is not available on {}", target.tag);
            return None;
        }
        let parent = match tree.parent_of(node) {
            Some(parent) => measure.content_box(parent.id),
            None => measure.canvas_box(),
        };
        let Some(parent) = parent else {
            tracing::debug!("parent of {node} is not measured; resize ignored");
            return None;
        };

        let own = measure.content_box(node);
        let start_size = BoxSize::new(
            current_extent(target.style.width(), parent.width, own.map(|b| b.width), limits.min_width),
            current_extent(target.style.height(), parent.height, own.map(|b| b.height), limits.min_height),
        );

        let layout = measure.parent_layout(node);
        let max = available_space(parent, &layout, measure, node);

        Some(Self {
            node,
            handle,
            start,
            start_size,
            parent,
            min: BoxSize::new(limits.min_width, limits.min_height),
            max,
            centered: layout.centered_axes(),
            current: None,
            _listeners: ListenerGuard::acquire(capture),
        })
    }

    /// Node being resized.
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Pixel size at session start.
    #[must_use]
    pub fn start_size(&self) -> BoxSize {
        self.start_size
    }

    /// Largest size the node may take.
    #[must_use]
    pub fn max_size(&self) -> BoxSize {
        self.max
    }

    /// Track the pointer and return the clamped pixel size.
    pub fn pointer_move(&mut self, to: Point) -> BoxSize {
        let (centered_x, centered_y) = self.centered;
        let mut dx = to.x - self.start.x;
        let mut dy = to.y - self.start.y;
        // Centered content grows on both sides at once
        if centered_x {
            dx *= 2.0;
        }
        if centered_y {
            dy *= 2.0;
        }

        let mut size = self.start_size;
        let sx = self.handle.horizontal_sign();
        let sy = self.handle.vertical_sign();
        if sx != 0.0 {
            size.width = clamp(self.start_size.width + sx * dx, self.min.width, self.max.width);
        }
        if sy != 0.0 {
            size.height = clamp(self.start_size.height + sy * dy, self.min.height, self.max.height);
        }
        self.current = Some(size);
        size
    }

    /// End the session. Returns the style patch, or `None` if the pointer
    /// never moved.
    #[must_use]
    pub fn finish(self) -> Option<ResizeCommit> {
        let size = self.current?;
        let mut patch = Style::new();
        if self.handle.horizontal_sign() != 0.0 && self.parent.width > 0.0 {
            let pct = size.width / self.parent.width * 100.0;
            patch.set(keys::WIDTH, Dimension::Percent(pct).to_string());
        }
        if self.handle.vertical_sign() != 0.0 && self.parent.height > 0.0 {
            let pct = size.height / self.parent.height * 100.0;
            patch.set(keys::HEIGHT, Dimension::Percent(pct).to_string());
        }
        if patch.is_empty() {
            return None;
        }
        Some(ResizeCommit {
            node: self.node,
            patch,
            size,
        })
    }
}

/// Pixel extent of a node on one axis from its style intent.
fn current_extent(intent: Dimension, parent: f64, measured: Option<f64>, min: f64) -> f64 {
    intent
        .to_pixels(parent)
        .or(measured)
        .unwrap_or(min)
}

/// Parent content box minus the siblings competing on the layout's axis.
fn available_space(
    parent: BoxSize,
    layout: &LayoutMode,
    measure: &dyn MeasurementProvider,
    node: NodeId,
) -> BoxSize {
    let siblings = measure.sibling_boxes(node);
    let siblings = siblings.iter().filter(|b| b.id != node);
    if layout.siblings_compete_horizontally() {
        let taken: f64 = siblings.map(|b| b.width).sum();
        BoxSize::new(parent.width - taken, parent.height)
    } else {
        let taken: f64 = siblings.map(|b| b.height).sum();
        BoxSize::new(parent.width, parent.height - taken)
    }
}

/// Clamp to `[min, max]`; when the space left is below the floor, the floor wins.
fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// Owns the single active resize session.
pub struct ResizeEngine {
    active: Option<ResizeSession>,
    capture: Rc<dyn PointerCapture>,
}

impl ResizeEngine {
    /// Create an engine registering listeners through `capture`.
    #[must_use]
    pub fn new(capture: Rc<dyn PointerCapture>) -> Self {
        Self {
            active: None,
            capture,
        }
    }

    /// Whether a session is in flight.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// The active session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&ResizeSession> {
        self.active.as_ref()
    }

    /// Handle press. Returns whether a session started.
    pub fn begin(
        &mut self,
        tree: &Tree,
        node: NodeId,
        handle: ResizeHandle,
        at: Point,
        measure: &dyn MeasurementProvider,
    ) -> bool {
        if let Some(stale) = self.active.take() {
            tracing::warn!("resize of {} still active at new press; dropping it", stale.node);
        }
        let limits = tree
            .find_by_id(node)
            .map_or_else(ResizeLimits::default, |n| ResizeLimits::for_tag(n.tag));
        self.active =
            ResizeSession::begin(tree, node, handle, at, limits, measure, Rc::clone(&self.capture));
        self.active.is_some()
    }

    /// Pointer move. Returns the live pixel size while a session is active.
    pub fn pointer_move(&mut self, to: Point) -> Option<BoxSize> {
        self.active.as_mut().map(|s| s.pointer_move(to))
    }

    /// Pointer release: ends the session and returns its commit, if any.
    pub fn pointer_up(&mut self, at: Point) -> Option<ResizeCommit> {
        let mut session = self.active.take()?;
        if session.current.is_some() || at != session.start {
            session.pointer_move(at);
        }
        let commit = session.finish();
        match &commit {
            Some(c) => tracing::info!(
                "resized {} to {}x{}px",
                c.node,
                c.size.width,
                c.size.height
            ),
            None => tracing::debug!("resize released without movement"),
        }
        commit
    }

    /// Abort the active session without committing.
    pub fn cancel(&mut self) {
        if let Some(session) = self.active.take() {
            tracing::debug!("resize of {} cancelled", session.node);
        }
    }
}

impl std::fmt::Debug for ResizeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResizeEngine")
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}
