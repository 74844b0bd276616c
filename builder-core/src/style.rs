//! Style intents attached to component nodes.
//!
//! A [`Style`] is an ordered map from CSS-like property names (camelCase,
//! as the rendering layer uses them) to opaque JSON values. The engine only
//! interprets a handful of keys; everything else is carried through to the
//! exported markup untouched.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{BuilderError, BuilderResult};

/// Property names with engine-understood semantics.
pub mod keys {
    /// Box width (`"50%"`, `"200px"`, `"auto"`).
    pub const WIDTH: &str = "width";
    /// Box height.
    pub const HEIGHT: &str = "height";
    /// Position mode.
    pub const POSITION: &str = "position";
    /// Display mode (`"block"`, `"flex"`, `"grid"`).
    pub const DISPLAY: &str = "display";
    /// Flex main axis.
    pub const FLEX_DIRECTION: &str = "flexDirection";
    /// Main-axis alignment.
    pub const JUSTIFY_CONTENT: &str = "justifyContent";
    /// Cross-axis alignment.
    pub const ALIGN_ITEMS: &str = "alignItems";
    /// Flex/grid gap.
    pub const GAP: &str = "gap";
    /// Grid column template.
    pub const GRID_TEMPLATE_COLUMNS: &str = "gridTemplateColumns";
    /// Grid row template.
    pub const GRID_TEMPLATE_ROWS: &str = "gridTemplateRows";
    /// Fill color.
    pub const BACKGROUND_COLOR: &str = "backgroundColor";
    /// Gradient image.
    pub const BACKGROUND_IMAGE: &str = "backgroundImage";
    /// Padding shorthand.
    pub const PADDING: &str = "padding";
    /// Margin shorthand.
    pub const MARGIN: &str = "margin";
    /// Preview marker on hint nodes.
    pub const VISIBILITY: &str = "visibility";
    /// Text content of headings and buttons.
    pub const TEXT: &str = "text";
    /// Input placeholder.
    pub const PLACEHOLDER: &str = "placeholder";
    /// Input/button sub-type.
    pub const TYPE: &str = "type";
    /// Heading level (`"h1"` .. `"h6"`).
    pub const LEVEL: &str = "level";
}

/// Ordered mapping of visual property name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Style(IndexMap<String, Value>);

impl Style {
    /// Create an empty style.
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Build a style from `(key, value)` pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        pairs.into_iter().collect()
    }

    /// Get a raw value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a string value. Non-string values yield `None`.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Set a value, keeping the key's position if it already exists.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder form of [`Style::set`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Remove a key, preserving the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    /// Whether the key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no property is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Check that every key is a plain property name.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::InvalidStyleKey`] for the first key that is not.
    pub fn check_keys(&self) -> BuilderResult<()> {
        match self.0.keys().find(|key| !is_property_name(key)) {
            Some(key) => Err(BuilderError::InvalidStyleKey(key.clone())),
            None => Ok(()),
        }
    }

    /// Shallow merge: every key of `patch` overrides, all other keys are kept.
    #[must_use]
    pub fn merged(&self, patch: &Style) -> Style {
        let mut next = self.clone();
        for (key, value) in patch.iter() {
            next.set(key, value.clone());
        }
        next
    }

    /// Parsed width intent.
    #[must_use]
    pub fn width(&self) -> Dimension {
        Dimension::from_value(self.get(keys::WIDTH))
    }

    /// Parsed height intent.
    #[must_use]
    pub fn height(&self) -> Dimension {
        Dimension::from_value(self.get(keys::HEIGHT))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Style {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A width or height intent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension {
    /// Percentage of the parent's content box.
    Percent(f64),
    /// Absolute pixels.
    Pixels(f64),
    /// Sized by content, or unset.
    Auto,
}

impl Dimension {
    /// Parse a style value. Bare numbers are pixels; anything unparseable is
    /// [`Dimension::Auto`].
    #[must_use]
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(s)) => Self::parse(s),
            Some(Value::Number(n)) => n.as_f64().map_or(Self::Auto, Self::Pixels),
            _ => Self::Auto,
        }
    }

    /// Parse `"50%"`, `"120px"`, `"120"` or `"auto"`.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if let Some(pct) = input.strip_suffix('%') {
            return pct.trim().parse().map_or(Self::Auto, Self::Percent);
        }
        let px = input.strip_suffix("px").unwrap_or(input).trim();
        px.parse().map_or(Self::Auto, Self::Pixels)
    }

    /// Resolve to pixels against the parent's content-box extent.
    #[must_use]
    pub fn to_pixels(self, parent_extent: f64) -> Option<f64> {
        match self {
            Self::Percent(pct) => Some(pct / 100.0 * parent_extent),
            Self::Pixels(px) => Some(px),
            Self::Auto => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(pct) => write!(f, "{}%", format_number(*pct)),
            Self::Pixels(px) => write!(f, "{}px", format_number(*px)),
            Self::Auto => f.write_str("auto"),
        }
    }
}

/// Whether `key` is an identifier such as `backgroundColor`, which can be
/// written unquoted in an inline style object.
#[must_use]
pub fn is_property_name(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Format with at most two decimals and no trailing zeros.
pub(crate) fn format_number(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let text = format!("{rounded:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
