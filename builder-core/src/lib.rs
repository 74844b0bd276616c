//! # Form Builder Core
//!
//! Component-tree engine behind a visual form builder canvas.
//! Compiles to WASM for the browser rendering layer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              builder-core.wasm              │
//! ├─────────────────────────────────────────────┤
//! │  Tree Model      │  Interaction             │
//! │  - Nodes / Tags  │  - Drag-drop + hint      │
//! │  - Copy-on-write │  - Constrained resize    │
//! │  - Style maps    │  - Listener sessions     │
//! ├─────────────────────────────────────────────┤
//! │  Style Mutator   │  Output                  │
//! │  - Seeding       │  - Markup export         │
//! │  - Gradients     │  - Form documents        │
//! │  - Spacing       │  - Form repository       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Geometry comes from the rendering layer through
//! [`measure::MeasurementProvider`]; the engine never lays anything out.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod drag_drop;
pub mod editor;
pub mod error;
pub mod event;
pub mod gradient;
pub mod listener;
pub mod measure;
pub mod mutator;
pub mod node;
pub mod resize;
pub mod schema;
pub mod serialize;
pub mod spacing;
pub mod store;
pub mod style;
pub mod tree;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use drag_drop::{DragDropController, DragState, DropOutcome};
pub use editor::{EditorObserver, EventResponse, FormEditor, SubtypePicker};
pub use error::{BuilderError, BuilderResult};
pub use event::{EditorEvent, Point};
pub use gradient::Gradient;
pub use listener::{ListenerGuard, PointerCapture};
pub use measure::{BoxSize, LayoutMode, MeasurementProvider, StaticMeasurements};
pub use node::{ButtonKind, ComponentNode, InputKind, NodeId, PositionMode, Subtype, Tag};
pub use resize::{ResizeCommit, ResizeEngine, ResizeHandle, ResizeLimits};
pub use schema::{FormDocument, FormId};
pub use serialize::export_markup;
pub use spacing::{Direction, Spacing, SpacingProperty, SpacingValue};
pub use store::{FormRepository, FormStore, FormSummary, StoreError};
pub use style::{Dimension, Style};
pub use tree::Tree;

/// Builder core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
