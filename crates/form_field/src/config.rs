//! Field configuration: appearance, label floating policy, palette, and app-wide defaults.

use serde::{Deserialize, Serialize};

use crate::error::FormFieldError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Visual style of the field container.
pub enum FieldAppearance {
    /// Filled container with a bottom line ripple.
    #[default]
    Fill,
    /// Bordered container with a notch for the floating label.
    Outline,
}

impl FieldAppearance {
    /// Stable token used in class names.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Fill => "fill",
            Self::Outline => "outline",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// When the label floats above the control.
pub enum FloatLabelMode {
    /// Float when the control asks for it (focused or non-empty).
    #[default]
    Auto,
    /// Always float.
    Always,
    /// Accepted for configuration compatibility; behaves like [`FloatLabelMode::Auto`].
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// How the subscript region reserves space.
pub enum SubscriptSizing {
    /// Always reserve one line.
    #[default]
    Fixed,
    /// Grow with the rendered messages.
    Dynamic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Theme palette applied to the field.
pub enum ThemePalette {
    /// Primary palette.
    #[default]
    Primary,
    /// Accent palette.
    Accent,
    /// Warning palette.
    Warn,
}

impl ThemePalette {
    /// Host class for the palette.
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Primary => "mat-primary",
            Self::Accent => "mat-accent",
            Self::Warn => "mat-warn",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Whether development-time configuration checks run.
pub enum ValidationMode {
    /// Hint collections are validated on every change.
    Enabled,
    /// Validation is skipped (production builds).
    Skipped,
}

impl ValidationMode {
    /// `Enabled` in debug builds, `Skipped` in release builds.
    pub const fn from_build() -> Self {
        if cfg!(debug_assertions) {
            Self::Enabled
        } else {
            Self::Skipped
        }
    }

    /// Whether checks run.
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

impl Default for ValidationMode {
    fn default() -> Self {
        Self::from_build()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
/// Application-wide defaults; unset values fall back to the built-in defaults.
pub struct FormFieldDefaults {
    /// Default appearance.
    #[serde(default)]
    pub appearance: Option<FieldAppearance>,
    /// Default label floating policy.
    #[serde(default)]
    pub float_label: Option<FloatLabelMode>,
    /// Whether the required marker is hidden by default.
    #[serde(default)]
    pub hide_required_marker: Option<bool>,
    /// Default palette.
    #[serde(default)]
    pub color: Option<ThemePalette>,
    /// Default subscript sizing.
    #[serde(default)]
    pub subscript_sizing: Option<SubscriptSizing>,
}

impl FormFieldDefaults {
    /// Parses defaults from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`FormFieldError::InvalidDefaults`] for malformed JSON or unknown keys.
    pub fn from_json(raw: &str) -> Result<Self, FormFieldError> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Resolved configuration of one field.
pub struct FormFieldConfig {
    /// Container appearance.
    pub appearance: FieldAppearance,
    /// Label floating policy.
    pub float_label: FloatLabelMode,
    /// Hides the required asterisk on the label.
    pub hide_required_marker: bool,
    /// Theme palette.
    pub color: ThemePalette,
    /// Subscript sizing.
    pub subscript_sizing: SubscriptSizing,
    /// Implicit start-aligned hint text.
    pub hint_label: Option<String>,
    /// Development checks.
    pub validation: ValidationMode,
}

impl FormFieldConfig {
    /// Builds a config from application defaults.
    pub fn from_defaults(defaults: &FormFieldDefaults) -> Self {
        Self {
            appearance: defaults.appearance.unwrap_or_default(),
            float_label: defaults.float_label.unwrap_or_default(),
            hide_required_marker: defaults.hide_required_marker.unwrap_or(false),
            color: defaults.color.unwrap_or_default(),
            subscript_sizing: defaults.subscript_sizing.unwrap_or_default(),
            hint_label: None,
            validation: ValidationMode::from_build(),
        }
    }

    /// Sets the appearance.
    pub fn with_appearance(mut self, appearance: FieldAppearance) -> Self {
        self.appearance = appearance;
        self
    }

    /// Sets the label floating policy.
    pub fn with_float_label(mut self, float_label: FloatLabelMode) -> Self {
        self.float_label = float_label;
        self
    }

    /// Sets the implicit hint text.
    pub fn with_hint_label(mut self, hint_label: impl Into<String>) -> Self {
        self.hint_label = Some(hint_label.into());
        self
    }

    /// Sets the validation mode.
    pub fn with_validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_resolve_missing_values_to_builtins() {
        let defaults =
            FormFieldDefaults::from_json(r#"{"appearance":"outline","hide-required-marker":true}"#)
                .expect("parse defaults");
        let config = FormFieldConfig::from_defaults(&defaults);

        assert_eq!(config.appearance, FieldAppearance::Outline);
        assert_eq!(config.float_label, FloatLabelMode::Auto);
        assert!(config.hide_required_marker);
        assert_eq!(config.color, ThemePalette::Primary);
        assert_eq!(config.subscript_sizing, SubscriptSizing::Fixed);
    }

    #[test]
    fn unknown_default_keys_are_rejected() {
        let err = FormFieldDefaults::from_json(r#"{"apperance":"outline"}"#)
            .expect_err("typo should fail");
        assert!(matches!(err, FormFieldError::InvalidDefaults(_)));
    }

    #[test]
    fn validation_follows_build_profile() {
        assert_eq!(
            ValidationMode::from_build().is_enabled(),
            cfg!(debug_assertions)
        );
    }
}
