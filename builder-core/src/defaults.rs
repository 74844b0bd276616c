//! Default style of a freshly dropped node.

use crate::measure::BoxSize;
use crate::style::keys;
use crate::{PositionMode, Style, Subtype, Tag};

/// Fill colors for block components, cycled by node count.
pub const FILL_PALETTE: [&str; 5] = ["#f8fafc", "#f1f5f9", "#e2e8f0", "#cbd5e1", "#94a3b8"];

/// Fallback height of a generic block when the target is not measured.
pub const BLOCK_HEIGHT_PX: f64 = 100.0;
/// Fallback input width.
pub const INPUT_WIDTH_PX: f64 = 200.0;
/// Fallback input/button height.
pub const CONTROL_HEIGHT_PX: f64 = 40.0;
/// Fallback button width.
pub const BUTTON_WIDTH_PX: f64 = 100.0;
/// Fallback image width.
pub const IMAGE_WIDTH_PX: f64 = 200.0;
/// Fallback image height.
pub const IMAGE_HEIGHT_PX: f64 = 150.0;

/// Initial sizing intent for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Extent {
    /// The whole of the target's content box.
    Fill,
    /// A fixed pixel size, expressed relative to the target when it is measured.
    Px(f64),
    /// Sized by content.
    Auto,
}

impl Extent {
    fn resolve(self, target_extent: Option<f64>) -> String {
        match (self, target_extent) {
            (Extent::Fill, _) => "100%".to_string(),
            (Extent::Auto, _) => "auto".to_string(),
            (Extent::Px(px), Some(extent)) if extent > 0.0 => {
                format!("{}%", percent_of(px, extent))
            }
            (Extent::Px(px), _) => format!("{px}px"),
        }
    }
}

fn initial_extents(tag: Tag) -> (Extent, Extent) {
    match tag {
        Tag::Section => (Extent::Fill, Extent::Fill),
        Tag::Div => (Extent::Fill, Extent::Px(BLOCK_HEIGHT_PX)),
        Tag::Heading => (Extent::Auto, Extent::Auto),
        Tag::Input => (Extent::Px(INPUT_WIDTH_PX), Extent::Px(CONTROL_HEIGHT_PX)),
        Tag::Button => (Extent::Px(BUTTON_WIDTH_PX), Extent::Px(CONTROL_HEIGHT_PX)),
        Tag::Image => (Extent::Px(IMAGE_WIDTH_PX), Extent::Px(IMAGE_HEIGHT_PX)),
    }
}

/// `px` as a whole percentage of `extent`, capped at 100.
#[allow(clippy::cast_possible_truncation)]
fn percent_of(px: f64, extent: f64) -> i64 {
    ((px / extent * 100.0).round() as i64).min(100)
}

/// Fill color for the node created when the tree holds `node_count` nodes.
#[must_use]
pub fn fill_color(node_count: usize) -> &'static str {
    FILL_PALETTE[node_count % FILL_PALETTE.len()]
}

/// Everything the default style depends on.
#[derive(Debug, Clone, Copy)]
pub struct DropContext {
    /// Dropped kind.
    pub tag: Tag,
    /// Chosen sub-type for inputs and buttons.
    pub subtype: Option<Subtype>,
    /// Position mode recorded at drag start.
    pub position: PositionMode,
    /// Measured content box of the drop target; `None` at root level.
    pub target: Option<BoxSize>,
    /// Nodes in the tree before the drop.
    pub node_count: usize,
}

/// Default style for a node materialized from a drop.
#[must_use]
pub fn default_style(ctx: &DropContext) -> Style {
    let (width, height) = initial_extents(ctx.tag);
    let mut style = Style::new()
        .with(keys::POSITION, ctx.position.as_str())
        .with(keys::WIDTH, width.resolve(ctx.target.map(|b| b.width)))
        .with(keys::HEIGHT, height.resolve(ctx.target.map(|b| b.height)));

    if ctx.tag.is_block() {
        style.set(keys::BACKGROUND_COLOR, fill_color(ctx.node_count));
    }

    match ctx.tag {
        Tag::Heading => {
            style.set(keys::LEVEL, "h1");
            style.set(keys::TEXT, "Heading");
        }
        Tag::Input => {
            if let Some(subtype) = ctx.subtype.filter(|s| s.applies_to(Tag::Input)) {
                style.set(keys::TYPE, subtype.as_str());
            }
            style.set(keys::PLACEHOLDER, "Enter text");
        }
        Tag::Button => {
            let subtype = ctx.subtype.filter(|s| s.applies_to(Tag::Button));
            let kind = subtype.map_or("button", Subtype::as_str);
            style.set(keys::TYPE, kind);
            style.set(keys::TEXT, if kind == "submit" { "Submit" } else { "Button" });
        }
        Tag::Section | Tag::Div | Tag::Image => {}
    }
    style
}

/// Style of the transient preview for a drop: the default style, hidden.
#[must_use]
pub fn hint_style(ctx: &DropContext) -> Style {
    default_style(ctx).with(keys::VISIBILITY, "hidden")
}
