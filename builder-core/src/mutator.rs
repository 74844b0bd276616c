//! Style mutation on the component tree.
//!
//! All edits go through [`apply_patch`], which merges a patch over one node's
//! style and replaces only that node's root-to-node path in the tree.

use crate::spacing::{edit_shorthand, Direction, Spacing, SpacingProperty, SpacingValue};
use crate::style::keys;
use crate::{ComponentNode, Gradient, NodeId, Style, Tree};

/// Fields seeded when `display` switches to `flex`.
const FLEX_SEEDS: [(&str, &str); 4] = [
    (keys::FLEX_DIRECTION, "row"),
    (keys::JUSTIFY_CONTENT, "flex-start"),
    (keys::ALIGN_ITEMS, "stretch"),
    (keys::GAP, "0px"),
];

/// Fields seeded when `display` switches to `grid`.
const GRID_SEEDS: [(&str, &str); 3] = [
    (keys::GRID_TEMPLATE_COLUMNS, ""),
    (keys::GRID_TEMPLATE_ROWS, ""),
    (keys::GAP, "0px"),
];

/// Add the sub-properties implied by a `display` change, unless the patch
/// sets them itself.
#[must_use]
pub fn seed_derived(patch: &Style) -> Style {
    let seeds: &[(&str, &str)] = match patch.get_str(keys::DISPLAY) {
        Some("flex") => &FLEX_SEEDS,
        Some("grid") => &GRID_SEEDS,
        _ => return patch.clone(),
    };
    let mut seeded = patch.clone();
    for &(key, value) in seeds {
        if !seeded.contains_key(key) {
            seeded.set(key, value);
        }
    }
    seeded
}

/// New style for a node: `patch` (with derived fields seeded) shallow-merged
/// over `style`.
#[must_use]
pub fn merge_style(style: &Style, patch: &Style) -> Style {
    style.merged(&seed_derived(patch))
}

/// Merge `patch` into the style of node `id`. Absent ids leave the tree
/// unchanged.
#[must_use]
pub fn apply_patch(tree: &Tree, id: NodeId, patch: &Style) -> Tree {
    tree.update_style(id, |style| merge_style(style, patch))
}

/// Current gradient state of a node.
#[must_use]
pub fn gradient_of(node: &ComponentNode) -> Gradient {
    Gradient::parse(node.style.get_str(keys::BACKGROUND_IMAGE))
}

/// The patch that writes `gradient` as the node's `backgroundImage`.
#[must_use]
pub fn gradient_patch(gradient: &Gradient) -> Style {
    Style::new().with(keys::BACKGROUND_IMAGE, gradient.compose())
}

/// Current spacing of a node; malformed values read as zeros.
#[must_use]
pub fn spacing_of(node: &ComponentNode, property: SpacingProperty) -> Spacing {
    Spacing::decode_or_zero(node.style.get_str(property.key()))
}

/// The patch for one spacing edit on `id`, or `None` when the edit is not
/// allowed: the node is absent, or it is a root-level node and the edit
/// targets its margin.
#[must_use]
pub fn spacing_patch(
    tree: &Tree,
    id: NodeId,
    property: SpacingProperty,
    direction: Direction,
    value: SpacingValue,
) -> Option<Style> {
    let node = tree.find_by_id(id)?;
    if property == SpacingProperty::Margin && tree.is_root(id) {
        tracing::debug!("margin edit on root-level node {id} ignored");
        return None;
    }
    let shorthand = edit_shorthand(node.style.get_str(property.key()), direction, value);
    Some(Style::new().with(property.key(), shorthand))
}
