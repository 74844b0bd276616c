//! Component nodes - the building blocks of a form.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Style;

/// Unique identifier for a component node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Create a new unique node ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse a node ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(input: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(input).map(Self)
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The closed set of component kinds a form can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// Top-level page section. Root components must start as one.
    Section,
    /// Generic block container.
    Div,
    /// Inline heading text.
    Heading,
    /// Form input field.
    Input,
    /// Clickable or submit button.
    Button,
    /// Static image.
    Image,
}

impl Tag {
    /// Every tag, in palette order.
    pub const ALL: [Tag; 6] = [
        Tag::Section,
        Tag::Div,
        Tag::Heading,
        Tag::Input,
        Tag::Button,
        Tag::Image,
    ];

    /// Markup tag name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Tag::Section => "Section",
            Tag::Div => "Div",
            Tag::Heading => "Heading",
            Tag::Input => "Input",
            Tag::Button => "Button",
            Tag::Image => "Image",
        }
    }

    /// Whether this kind participates in box sizing.
    #[must_use]
    pub const fn is_block(self) -> bool {
        !matches!(self, Tag::Heading)
    }

    /// Whether nodes of this kind are drop containers.
    #[must_use]
    pub const fn accepts_children(self) -> bool {
        matches!(self, Tag::Section | Tag::Div)
    }

    /// Whether a drop of this kind must be disambiguated before commit.
    #[must_use]
    pub const fn requires_subtype(self) -> bool {
        matches!(self, Tag::Input | Tag::Button)
    }

    /// Whether nodes of this kind hold direct text content.
    #[must_use]
    pub const fn holds_text(self) -> bool {
        matches!(self, Tag::Heading | Tag::Button)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .into_iter()
            .find(|tag| tag.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown component tag: {s}"))
    }
}

/// How a freshly dropped node is positioned inside its parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionMode {
    /// In normal flow.
    #[default]
    Relative,
    /// Out of flow, offset against the parent.
    Absolute,
}

impl PositionMode {
    /// CSS value for the `position` style key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PositionMode::Relative => "relative",
            PositionMode::Absolute => "absolute",
        }
    }
}

/// Kind of an `Input` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum InputKind {
    Text,
    Email,
    Password,
    Number,
    Tel,
    Date,
    Checkbox,
    Radio,
    File,
}

impl InputKind {
    /// Value of the `type` style key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            InputKind::Text => "text",
            InputKind::Email => "email",
            InputKind::Password => "password",
            InputKind::Number => "number",
            InputKind::Tel => "tel",
            InputKind::Date => "date",
            InputKind::Checkbox => "checkbox",
            InputKind::Radio => "radio",
            InputKind::File => "file",
        }
    }
}

/// Kind of a `Button` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonKind {
    /// Plain clickable button.
    Button,
    /// Form submit button.
    Submit,
}

impl ButtonKind {
    /// Value of the `type` style key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ButtonKind::Button => "button",
            ButtonKind::Submit => "submit",
        }
    }
}

/// The sub-type chosen for an `Input` or `Button` drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", content = "kind")]
pub enum Subtype {
    /// Input field kind.
    Input(InputKind),
    /// Button kind.
    Button(ButtonKind),
}

impl Subtype {
    /// Parse a sub-type label for the given tag (`"text"`, `"submit"`, ...).
    ///
    /// Returns `None` when the tag takes no sub-type or the label is unknown.
    #[must_use]
    pub fn parse(tag: Tag, label: &str) -> Option<Self> {
        let value = serde_json::Value::String(label.to_ascii_lowercase());
        match tag {
            Tag::Input => serde_json::from_value(value).ok().map(Subtype::Input),
            Tag::Button => serde_json::from_value(value).ok().map(Subtype::Button),
            Tag::Section | Tag::Div | Tag::Heading | Tag::Image => None,
        }
    }

    /// Whether this sub-type belongs to the given tag.
    #[must_use]
    pub const fn applies_to(self, tag: Tag) -> bool {
        matches!(
            (self, tag),
            (Subtype::Input(_), Tag::Input) | (Subtype::Button(_), Tag::Button)
        )
    }

    /// Value of the `type` style key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Subtype::Input(kind) => kind.as_str(),
            Subtype::Button(kind) => kind.as_str(),
        }
    }
}

/// A node of the component tree.
///
/// Children are shared behind [`Arc`] so that a mutation only copies the
/// nodes on the path from the root to the changed node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentNode {
    /// Unique identifier.
    pub id: NodeId,
    /// Component kind.
    pub tag: Tag,
    /// Visual property intents.
    #[serde(default)]
    pub style: Style,
    /// Ordered children.
    #[serde(default)]
    pub children: Vec<Arc<ComponentNode>>,
    /// Transient drag preview marker.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_hint: bool,
    /// Whether the node participates in box sizing.
    pub is_block: bool,
}

impl ComponentNode {
    /// Create a new node of the given kind with an empty style.
    #[must_use]
    pub fn new(tag: Tag) -> Self {
        Self {
            id: NodeId::new(),
            tag,
            style: Style::new(),
            children: Vec::new(),
            is_hint: false,
            is_block: tag.is_block(),
        }
    }

    /// Create a transient hint node previewing a drop of `tag`.
    #[must_use]
    pub fn hint(tag: Tag, style: Style) -> Self {
        Self {
            is_hint: true,
            ..Self::new(tag).with_style(style)
        }
    }

    /// Set the ID.
    #[must_use]
    pub fn with_id(mut self, id: NodeId) -> Self {
        self.id = id;
        self
    }

    /// Set the style.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Append a child.
    #[must_use]
    pub fn with_child(mut self, child: ComponentNode) -> Self {
        self.children.push(Arc::new(child));
        self
    }

    /// Iterate over the children.
    pub fn children(&self) -> impl Iterator<Item = &ComponentNode> {
        self.children.iter().map(|c| &**c)
    }

    /// Number of nodes in this subtree, including this one.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self.children().map(ComponentNode::subtree_len).sum::<usize>()
    }
}
