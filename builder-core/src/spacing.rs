//! Padding/margin shorthand handling.
//!
//! Spacing is stored as one string of four px magnitudes in CSS order
//! (top, right, bottom, left). Editors address one side, one axis, or all
//! sides at once; [`Spacing::apply`] touches only the slots the direction
//! names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::style::format_number;
use crate::{BuilderError, BuilderResult};

/// Which spacing property an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpacingProperty {
    /// Inner spacing.
    Padding,
    /// Outer spacing.
    Margin,
}

impl SpacingProperty {
    /// Style key holding the shorthand.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            SpacingProperty::Padding => crate::style::keys::PADDING,
            SpacingProperty::Margin => crate::style::keys::MARGIN,
        }
    }
}

/// Side, axis, or all sides of a spacing shorthand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Direction {
    Top,
    Right,
    Bottom,
    Left,
    /// Top and bottom.
    Vertical,
    /// Left and right.
    Horizontal,
    All,
}

impl Direction {
    /// Which of the four slots (top, right, bottom, left) this direction edits.
    #[must_use]
    pub const fn slots(self) -> [bool; 4] {
        match self {
            Direction::Top => [true, false, false, false],
            Direction::Right => [false, true, false, false],
            Direction::Bottom => [false, false, true, false],
            Direction::Left => [false, false, false, true],
            Direction::Vertical => [true, false, true, false],
            Direction::Horizontal => [false, true, false, true],
            Direction::All => [true, true, true, true],
        }
    }
}

impl FromStr for Direction {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Direction::Top),
            "right" => Ok(Direction::Right),
            "bottom" => Ok(Direction::Bottom),
            "left" => Ok(Direction::Left),
            "vertical" => Ok(Direction::Vertical),
            "horizontal" => Ok(Direction::Horizontal),
            "all" => Ok(Direction::All),
            _ => Err(BuilderError::InvalidDirectionToken(s.to_string())),
        }
    }
}

/// A new value for the addressed slots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpacingValue {
    /// The editor field was cleared.
    Cleared,
    /// A px magnitude. Negative values clamp to zero.
    Px(f64),
}

impl SpacingValue {
    fn magnitude(self) -> f64 {
        match self {
            SpacingValue::Cleared => 0.0,
            SpacingValue::Px(px) => px.max(0.0),
        }
    }
}

/// Decoded four-sided spacing, in px.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Spacing(pub [f64; 4]);

impl Spacing {
    /// All sides zero.
    pub const ZERO: Spacing = Spacing([0.0; 4]);

    /// Decode a persisted shorthand.
    ///
    /// An absent or blank value is simply unset and decodes to zeros. A
    /// single token applies to all four sides.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::MalformedSpacingShorthand`] if the value is
    /// present but has a token count other than one or four, or a
    /// non-numeric token.
    pub fn decode(shorthand: Option<&str>) -> BuilderResult<Self> {
        let Some(raw) = shorthand.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(Self::ZERO);
        };
        let malformed = || BuilderError::MalformedSpacingShorthand(raw.to_string());
        let values = raw
            .split_whitespace()
            .map(|token| {
                let number = token.strip_suffix("px").unwrap_or(token);
                number
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(malformed)
            })
            .collect::<BuilderResult<Vec<_>>>()?;
        match values.as_slice() {
            [all] => Ok(Self([*all; 4])),
            [top, right, bottom, left] => Ok(Self([*top, *right, *bottom, *left])),
            _ => Err(malformed()),
        }
    }

    /// Decode for editing: a malformed value is replaced by zeros.
    #[must_use]
    pub fn decode_or_zero(shorthand: Option<&str>) -> Self {
        Self::decode(shorthand).unwrap_or_else(|e| {
            tracing::warn!("{e}; resetting to 0px on all sides");
            Self::ZERO
        })
    }

    /// Set the slots named by `direction`, keeping the others.
    #[must_use]
    pub fn apply(self, direction: Direction, value: SpacingValue) -> Self {
        let mut slots = self.0;
        for (slot, edit) in slots.iter_mut().zip(direction.slots()) {
            if edit {
                *slot = value.magnitude();
            }
        }
        Self(slots)
    }

    /// The value shown for `direction` in an editor: the first addressed slot.
    #[must_use]
    pub fn value_for(self, direction: Direction) -> f64 {
        self.0
            .iter()
            .zip(direction.slots())
            .find_map(|(v, edit)| edit.then_some(*v))
            .unwrap_or(0.0)
    }

    /// Re-encode as a four-value px shorthand.
    #[must_use]
    pub fn encode(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Spacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [top, right, bottom, left] = self.0.map(format_number);
        write!(f, "{top}px {right}px {bottom}px {left}px")
    }
}

/// Decode `previous`, apply one edit, and re-encode.
#[must_use]
pub fn edit_shorthand(previous: Option<&str>, direction: Direction, value: SpacingValue) -> String {
    Spacing::decode_or_zero(previous)
        .apply(direction, value)
        .encode()
}
