//! Class names of the rendering protocol and host class derivation.

use crate::config::{FieldAppearance, FloatLabelMode, FormFieldConfig, SubscriptSizing};

/// Label floated above the control.
pub const FLOATING_LABEL_FLOAT_ABOVE: &str = "mdc-floating-label--float-above";
/// Label carries the required marker.
pub const FLOATING_LABEL_REQUIRED: &str = "mdc-floating-label--required";
/// Line ripple expanded under a focused control.
pub const LINE_RIPPLE_ACTIVE: &str = "mdc-line-ripple--active";
/// Line ripple collapsing after blur.
pub const LINE_RIPPLE_DEACTIVATING: &str = "mdc-line-ripple--deactivating";
/// Outline border broken around the floating label.
pub const NOTCHED_OUTLINE_NOTCHED: &str = "mdc-notched-outline--notched";
/// Outline rendered without a label.
pub const NOTCHED_OUTLINE_NO_LABEL: &str = "mdc-notched-outline--no-label";
/// Outline wired to a label.
pub const NOTCHED_OUTLINE_UPGRADED: &str = "mdc-notched-outline--upgraded";
/// Text-field wrapper of a focused control.
pub const TEXT_FIELD_FOCUSED: &str = "mdc-text-field--focused";
/// Inline custom property bounding the notch width on the field root.
pub const NOTCH_MAX_WIDTH_PROPERTY: &str = "--mat-form-field-notch-max-width";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Booleans the orchestrator derives from the control and configuration.
pub struct DerivedState {
    /// Control focus.
    pub focused: bool,
    /// Control emptiness.
    pub empty: bool,
    /// Control disabled.
    pub disabled: bool,
    /// Control error state.
    pub invalid: bool,
    /// Control autofilled.
    pub autofilled: bool,
    /// Label should float (before the floating-label guard).
    pub label_should_float: bool,
    /// Appearance is outline.
    pub has_outline: bool,
    /// A floating label is rendered.
    pub has_floating_label: bool,
    /// An icon prefix container is rendered.
    pub has_icon_prefix: bool,
    /// An icon suffix container is rendered.
    pub has_icon_suffix: bool,
}

impl DerivedState {
    /// Whether the floating label is actually floated.
    pub fn label_floated(&self) -> bool {
        self.has_floating_label && self.label_should_float
    }
}

/// Classes for the field root element, in stable order.
pub fn field_host_classes(
    state: &DerivedState,
    config: &FormFieldConfig,
    control_type: Option<&str>,
) -> Vec<String> {
    let mut classes = vec!["mat-mdc-form-field".to_string()];
    let mut push = |enabled: bool, name: &str| {
        if enabled {
            classes.push(name.to_string());
        }
    };
    push(
        state.has_floating_label && config.float_label == FloatLabelMode::Always,
        "mat-mdc-form-field-label-always-float",
    );
    push(state.has_icon_prefix, "mat-mdc-form-field-has-icon-prefix");
    push(state.has_icon_suffix, "mat-mdc-form-field-has-icon-suffix");
    push(state.invalid, "mat-form-field-invalid");
    push(state.disabled, "mat-form-field-disabled");
    push(state.autofilled, "mat-form-field-autofilled");
    push(
        config.appearance == FieldAppearance::Fill,
        "mat-form-field-appearance-fill",
    );
    push(
        config.appearance == FieldAppearance::Outline,
        "mat-form-field-appearance-outline",
    );
    push(
        state.has_floating_label && !state.label_floated(),
        "mat-form-field-hide-placeholder",
    );
    push(state.focused, "mat-focused");
    push(true, config.color.class_name());
    if let Some(control_type) = control_type.filter(|raw| !raw.is_empty()) {
        classes.push(format!("mat-form-field-type-{control_type}"));
    }
    classes
}

/// Classes for the `mdc-text-field` wrapper element, in stable order.
pub fn text_field_classes(state: &DerivedState, config: &FormFieldConfig) -> Vec<&'static str> {
    let mut classes = vec!["mat-mdc-text-field-wrapper", "mdc-text-field"];
    match config.appearance {
        FieldAppearance::Fill => classes.push("mdc-text-field--filled"),
        FieldAppearance::Outline => classes.push("mdc-text-field--outlined"),
    }
    if !state.has_floating_label {
        classes.push("mdc-text-field--no-label");
    }
    if state.disabled {
        classes.push("mdc-text-field--disabled");
    }
    if state.invalid {
        classes.push("mdc-text-field--invalid");
    }
    if state.focused {
        classes.push(TEXT_FIELD_FOCUSED);
    }
    classes
}

/// Classes for the subscript wrapper.
pub fn subscript_classes(sizing: SubscriptSizing) -> Vec<&'static str> {
    let mut classes = vec!["mat-mdc-form-field-subscript-wrapper", "mat-mdc-form-field-bottom-align"];
    if sizing == SubscriptSizing::Dynamic {
        classes.push("mat-mdc-form-field-subscript-dynamic-size");
    }
    classes
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::ThemePalette;

    #[test]
    fn host_classes_for_focused_invalid_outline_field() {
        let state = DerivedState {
            focused: true,
            invalid: true,
            label_should_float: true,
            has_outline: true,
            has_floating_label: true,
            has_icon_prefix: true,
            ..DerivedState::default()
        };
        let config = FormFieldConfig {
            appearance: FieldAppearance::Outline,
            color: ThemePalette::Warn,
            ..FormFieldConfig::default()
        };

        assert_eq!(
            field_host_classes(&state, &config, Some("mat-input")),
            vec![
                "mat-mdc-form-field",
                "mat-mdc-form-field-has-icon-prefix",
                "mat-form-field-invalid",
                "mat-form-field-appearance-outline",
                "mat-focused",
                "mat-warn",
                "mat-form-field-type-mat-input",
            ]
        );
    }

    #[test]
    fn docked_label_hides_placeholder_and_always_float_is_flagged() {
        let docked = DerivedState {
            has_floating_label: true,
            ..DerivedState::default()
        };
        let classes = field_host_classes(&docked, &FormFieldConfig::default(), None);
        assert!(classes.contains(&"mat-form-field-hide-placeholder".to_string()));

        let config = FormFieldConfig::default().with_float_label(FloatLabelMode::Always);
        let floated = DerivedState {
            label_should_float: true,
            ..docked
        };
        let classes = field_host_classes(&floated, &config, None);
        assert!(classes.contains(&"mat-mdc-form-field-label-always-float".to_string()));
        assert!(!classes.contains(&"mat-form-field-hide-placeholder".to_string()));
    }

    #[test]
    fn text_field_wrapper_reflects_appearance_and_label() {
        let state = DerivedState {
            disabled: true,
            ..DerivedState::default()
        };
        assert_eq!(
            text_field_classes(&state, &FormFieldConfig::default()),
            vec![
                "mat-mdc-text-field-wrapper",
                "mdc-text-field",
                "mdc-text-field--filled",
                "mdc-text-field--no-label",
                "mdc-text-field--disabled",
            ]
        );
    }

    #[test]
    fn dynamic_subscript_adds_sizing_class() {
        assert!(subscript_classes(SubscriptSizing::Dynamic)
            .contains(&"mat-mdc-form-field-subscript-dynamic-size"));
        assert!(!subscript_classes(SubscriptSizing::Fixed)
            .contains(&"mat-mdc-form-field-subscript-dynamic-size"));
    }
}
