//! Linear-gradient background composition and recovery.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{BuilderError, BuilderResult};

/// `linear-gradient(<direction>, <start>, <end>)`; color stops may contain
/// parenthesised commas such as `rgb(1, 2, 3)`.
static LINEAR_GRADIENT: LazyLock<Regex> = LazyLock::new(|| {
    let part = r"((?:[^,()]|\([^()]*\))+)";
    Regex::new(&format!(
        r"^\s*linear-gradient\(\s*{part},\s*{part},\s*{part}\)\s*$"
    ))
    .expect("gradient pattern is a valid regex")
});

/// Editable gradient state of a node's `backgroundImage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gradient {
    /// Whether the background image is a gradient at all.
    pub enabled: bool,
    /// CSS direction, e.g. `to right` or `45deg`.
    pub direction: String,
    /// First color stop.
    pub start_color: String,
    /// Last color stop.
    pub end_color: String,
}

impl Default for Gradient {
    fn default() -> Self {
        Self {
            enabled: false,
            direction: "to right".to_string(),
            start_color: "#ffffff".to_string(),
            end_color: "#000000".to_string(),
        }
    }
}

impl Gradient {
    /// An enabled gradient.
    #[must_use]
    pub fn linear(
        direction: impl Into<String>,
        start_color: impl Into<String>,
        end_color: impl Into<String>,
    ) -> Self {
        Self {
            enabled: true,
            direction: direction.into(),
            start_color: start_color.into(),
            end_color: end_color.into(),
        }
    }

    /// Recover gradient state from a persisted `backgroundImage`.
    ///
    /// Absent, empty or malformed values all map to the disabled default.
    #[must_use]
    pub fn parse(background_image: Option<&str>) -> Self {
        match background_image.map(str::trim) {
            None | Some("") => Self::default(),
            Some(value) => Self::try_parse(value).unwrap_or_else(|e| {
                tracing::debug!("{e}; treating gradient as disabled");
                Self::default()
            }),
        }
    }

    /// Strict parse of a `linear-gradient(...)` string.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::MalformedGradientString`] if the value does not
    /// have exactly a direction and two color stops.
    pub fn try_parse(value: &str) -> BuilderResult<Self> {
        let caps = LINEAR_GRADIENT
            .captures(value)
            .ok_or_else(|| BuilderError::MalformedGradientString(value.to_string()))?;
        let part = |i: usize| caps.get(i).map_or("", |m| m.as_str()).trim().to_string();
        Ok(Self::linear(part(1), part(2), part(3)))
    }

    /// The `backgroundImage` value: the gradient when enabled, empty otherwise.
    #[must_use]
    pub fn compose(&self) -> String {
        if self.enabled {
            format!(
                "linear-gradient({}, {}, {})",
                self.direction, self.start_color, self.end_color
            )
        } else {
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_enabled() {
        let gradient = Gradient::linear("to right", "#ff0000", "#0000ff");
        assert_eq!(
            gradient.compose(),
            "linear-gradient(to right, #ff0000, #0000ff)"
        );
    }

    #[test]
    fn test_compose_disabled_is_empty() {
        let gradient = Gradient {
            enabled: false,
            ..Gradient::linear("45deg", "red", "blue")
        };
        assert_eq!(gradient.compose(), "");
    }

    #[test]
    fn test_parse_recovers_parts() {
        let gradient = Gradient::parse(Some("linear-gradient(45deg, red, #00ff00)"));
        assert!(gradient.enabled);
        assert_eq!(gradient.direction, "45deg");
        assert_eq!(gradient.start_color, "red");
        assert_eq!(gradient.end_color, "#00ff00");
    }

    #[test]
    fn test_parse_rgb_stops() {
        let gradient = Gradient::parse(Some(
            "linear-gradient(to bottom, rgb(1, 2, 3), rgba(4, 5, 6, 0.5))",
        ));
        assert!(gradient.enabled);
        assert_eq!(gradient.start_color, "rgb(1, 2, 3)");
        assert_eq!(gradient.end_color, "rgba(4, 5, 6, 0.5)");
    }

    #[test]
    fn test_compose_parse_roundtrip() {
        let gradient = Gradient::linear("to left", "#111111", "#eeeeee");
        assert_eq!(Gradient::parse(Some(&gradient.compose())), gradient);
    }

    #[test]
    fn test_absent_and_empty_are_disabled() {
        assert_eq!(Gradient::parse(None), Gradient::default());
        assert_eq!(Gradient::parse(Some("  ")), Gradient::default());
    }

    #[test]
    fn test_malformed_is_disabled_not_error() {
        for value in [
            "url(image.png)",
            "linear-gradient(red)",
            "linear-gradient(to right, red, green, blue)",
            "radial-gradient(circle, red, blue)",
        ] {
            assert!(!Gradient::parse(Some(value)).enabled, "{value}");
        }
    }

    #[test]
    fn test_try_parse_reports_malformed() {
        let err = Gradient::try_parse("url(x.png)").expect_err("should reject");
        assert!(matches!(err, BuilderError::MalformedGradientString(_)));
    }
}
