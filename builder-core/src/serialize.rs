//! Markup export.
//!
//! Each node becomes `<Tag style={{key: value, ...}}>children</Tag>` with
//! values JSON-encoded. Keys that are not plain identifiers are written as
//! JSON strings so they cannot break the surrounding markup. Output is a single line; indentation is left to
//! whatever formatter consumes it.

use std::fmt::Write;

use serde_json::Value;

use crate::style::is_property_name;
use crate::{ComponentNode, Tree};

/// Render the tree as markup. Hint nodes are skipped.
#[must_use]
pub fn export_markup(tree: &Tree) -> String {
    let mut out = String::new();
    for root in tree.roots() {
        write_node(&mut out, root);
    }
    out
}

fn write_node(out: &mut String, node: &ComponentNode) {
    if node.is_hint {
        tracing::warn!("hint node {} reached export; skipped", node.id);
        return;
    }
    let tag = node.tag.name();
    // Writing into a String cannot fail
    let _ = write!(out, "<{tag} style={{{{");
    for (i, (key, value)) in node.style.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        if is_property_name(key) {
            let _ = write!(out, "{key}: {value}");
        } else {
            let _ = write!(out, "{}: {value}", Value::from(key));
        }
    }
    out.push_str("}}>");
    for child in node.children() {
        write_node(out, child);
    }
    let _ = write!(out, "</{tag}>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Style, Tag};

    #[test]
    fn test_single_section() {
        let section = ComponentNode::new(Tag::Section)
            .with_style(Style::from_pairs([("width", "100%"), ("height", "100%")]));
        let markup = export_markup(&Tree::new().insert(None, section));
        assert_eq!(
            markup,
            r#"<Section style={{width: "100%", height: "100%"}}></Section>"#
        );
    }

    #[test]
    fn test_nesting_and_order() {
        let tree = Tree::from_roots([ComponentNode::new(Tag::Section)
            .with_child(ComponentNode::new(Tag::Heading))
            .with_child(ComponentNode::new(Tag::Div).with_child(ComponentNode::new(Tag::Button)))]);
        let markup = export_markup(&tree);
        assert_eq!(
            markup,
            "<Section style={{}}><Heading style={{}}></Heading>\
             <Div style={{}}><Button style={{}}></Button></Div></Section>"
        );
    }

    #[test]
    fn test_non_string_values_are_json() {
        let style: Style = [("opacity", serde_json::json!(0.5)), ("text", serde_json::json!("a \"b\""))]
            .into_iter()
            .collect();
        let tree = Tree::from_roots([ComponentNode::new(Tag::Heading).with_style(style)]);
        assert_eq!(
            export_markup(&tree),
            r#"<Heading style={{opacity: 0.5, text: "a \"b\""}}></Heading>"#
        );
    }

    #[test]
    fn test_odd_keys_are_quoted() {
        let section = ComponentNode::new(Tag::Section)
            .with_style(Style::from_pairs([("a}}><Div", "x"), ("color", "red")]));
        let markup = export_markup(&Tree::from_roots([section]));
        assert_eq!(
            markup,
            r#"<Section style={{"a}}><Div": "x", color: "red"}}></Section>"#
        );
        assert_eq!(markup.matches("<Div").count(), 1);
    }

    #[test]
    fn test_hint_is_skipped() {
        let section = ComponentNode::new(Tag::Section);
        let id = section.id;
        let tree = Tree::from_roots([section]).insert(Some(id), ComponentNode::hint(Tag::Div, Style::new()));
        assert_eq!(export_markup(&tree), "<Section style={{}}></Section>");
    }

    #[test]
    fn test_empty_tree() {
        assert_eq!(export_markup(&Tree::new()), "");
    }
}
