//! Hint/error subscript region: which messages show, hint validation, and described-by ids.

use form_field_contract::ControlState;
use serde::{Deserialize, Serialize};

use crate::{
    config::{SubscriptSizing, ValidationMode},
    error::FormFieldError,
    ids::{IdGenerator, ERROR_ID_PREFIX, HINT_ID_PREFIX},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Alignment slot of a hint.
pub enum HintAlign {
    /// Leading slot; the implicit hint label also lives here.
    #[default]
    Start,
    /// Trailing slot.
    End,
}

impl HintAlign {
    /// Stable `align` token.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Projected hint message.
pub struct HintEntry {
    /// Element id.
    pub id: String,
    /// Alignment slot.
    pub align: HintAlign,
    /// Text content, if any.
    pub text: Option<String>,
}

impl HintEntry {
    /// Creates a hint with a generated id.
    pub fn new(ids: &IdGenerator, align: HintAlign, text: impl Into<String>) -> Self {
        Self {
            id: ids.next_id(HINT_ID_PREFIX),
            align,
            text: Some(text.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Projected error message.
pub struct ErrorEntry {
    /// Element id.
    pub id: String,
    /// Text content, if any.
    pub text: Option<String>,
}

impl ErrorEntry {
    /// Creates an error with a generated id.
    pub fn new(ids: &IdGenerator, text: impl Into<String>) -> Self {
        Self {
            id: ids.next_id(ERROR_ID_PREFIX),
            text: Some(text.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Which message kind the subscript region renders.
pub enum DisplayedMessages {
    /// Error messages.
    Error,
    /// Hint messages.
    Hint,
}

/// Errors show only when some exist and the control is in an error state.
pub fn displayed_messages(errors: &[ErrorEntry], state: &ControlState) -> DisplayedMessages {
    if !errors.is_empty() && state.error_state {
        DisplayedMessages::Error
    } else {
        DisplayedMessages::Hint
    }
}

/// Rejects a second hint in either alignment slot. A non-empty `hint_label` occupies the
/// start slot.
///
/// # Errors
///
/// Returns [`FormFieldError::DuplicatedHint`] naming the first slot declared twice.
pub fn validate_hints(
    hints: &[HintEntry],
    hint_label: Option<&str>,
    mode: ValidationMode,
) -> Result<(), FormFieldError> {
    if !mode.is_enabled() {
        return Ok(());
    }
    let mut start_taken = has_hint_label(hint_label);
    let mut end_taken = false;
    for hint in hints {
        let slot = match hint.align {
            HintAlign::Start => &mut start_taken,
            HintAlign::End => &mut end_taken,
        };
        if *slot {
            return Err(FormFieldError::DuplicatedHint { align: hint.align });
        }
        *slot = true;
    }
    Ok(())
}

/// Ordered `aria-describedby` ids for the control.
///
/// Author supplied ids come first. Hints contribute the start hint (or the implicit hint
/// label) followed by the end hint; errors contribute every error id in order.
pub fn described_by_ids(
    displayed: DisplayedMessages,
    hints: &[HintEntry],
    hint_label_id: Option<&str>,
    errors: &[ErrorEntry],
    user_described_by: Option<&str>,
) -> Vec<String> {
    let mut ids: Vec<String> = user_described_by
        .map(|raw| raw.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();
    match displayed {
        DisplayedMessages::Hint => {
            let start = hints.iter().find(|hint| hint.align == HintAlign::Start);
            let end = hints.iter().find(|hint| hint.align == HintAlign::End);
            if let Some(start) = start {
                ids.push(start.id.clone());
            } else if let Some(hint_label_id) = hint_label_id {
                ids.push(hint_label_id.to_string());
            }
            if let Some(end) = end {
                ids.push(end.id.clone());
            }
        }
        DisplayedMessages::Error => ids.extend(errors.iter().map(|error| error.id.clone())),
    }
    ids
}

fn has_hint_label(hint_label: Option<&str>) -> bool {
    hint_label.is_some_and(|label| !label.is_empty())
}

#[derive(Debug, Clone)]
/// Hint/error collections of one field plus the implicit hint label.
pub struct SubscriptManager {
    hints: Vec<HintEntry>,
    errors: Vec<ErrorEntry>,
    hint_label: Option<String>,
    hint_label_id: String,
    sizing: SubscriptSizing,
    validation: ValidationMode,
}

impl SubscriptManager {
    /// Creates an empty subscript region; `hint_label_id` is reserved up front.
    pub fn new(hint_label_id: String, validation: ValidationMode) -> Self {
        Self {
            hints: Vec::new(),
            errors: Vec::new(),
            hint_label: None,
            hint_label_id,
            sizing: SubscriptSizing::default(),
            validation,
        }
    }

    /// Starts with an implicit hint text; nothing is projected yet, so it cannot conflict.
    pub fn with_hint_label(mut self, hint_label: Option<String>) -> Self {
        self.hint_label = hint_label;
        self
    }

    /// Starts with the given subscript sizing.
    pub fn with_sizing(mut self, sizing: SubscriptSizing) -> Self {
        self.sizing = sizing;
        self
    }

    /// Replaces the hint collection.
    ///
    /// # Errors
    ///
    /// Returns [`FormFieldError::DuplicatedHint`]; the previous hints are kept in that case.
    pub fn set_hints(&mut self, hints: Vec<HintEntry>) -> Result<(), FormFieldError> {
        validate_hints(&hints, self.hint_label.as_deref(), self.validation)?;
        self.hints = hints;
        Ok(())
    }

    /// Replaces the implicit hint text.
    ///
    /// # Errors
    ///
    /// Returns [`FormFieldError::DuplicatedHint`] when a start hint is already projected.
    pub fn set_hint_label(&mut self, hint_label: Option<String>) -> Result<(), FormFieldError> {
        validate_hints(&self.hints, hint_label.as_deref(), self.validation)?;
        self.hint_label = hint_label;
        Ok(())
    }

    /// Re-runs validation on the current collection.
    ///
    /// # Errors
    ///
    /// Returns [`FormFieldError::DuplicatedHint`].
    pub fn validate(&self) -> Result<(), FormFieldError> {
        validate_hints(&self.hints, self.hint_label.as_deref(), self.validation)
    }

    /// Replaces the error collection.
    pub fn set_errors(&mut self, errors: Vec<ErrorEntry>) {
        self.errors = errors;
    }

    /// Sets the sizing mode.
    pub fn set_sizing(&mut self, sizing: SubscriptSizing) {
        self.sizing = sizing;
    }

    /// Sizing mode.
    pub fn sizing(&self) -> SubscriptSizing {
        self.sizing
    }

    /// Projected hints.
    pub fn hints(&self) -> &[HintEntry] {
        &self.hints
    }

    /// Projected errors.
    pub fn errors(&self) -> &[ErrorEntry] {
        &self.errors
    }

    /// Implicit hint text, when set and non-empty.
    pub fn hint_label(&self) -> Option<&str> {
        self.hint_label.as_deref().filter(|label| !label.is_empty())
    }

    /// Id of the implicit hint element.
    pub fn hint_label_id(&self) -> &str {
        &self.hint_label_id
    }

    /// Message kind to render for `state`.
    pub fn displayed(&self, state: &ControlState) -> DisplayedMessages {
        displayed_messages(&self.errors, state)
    }

    /// Described-by ids for `state`.
    pub fn described_by(&self, state: &ControlState) -> Vec<String> {
        let hint_label_id = self.hint_label().map(|_| self.hint_label_id.as_str());
        described_by_ids(
            self.displayed(state),
            &self.hints,
            hint_label_id,
            &self.errors,
            state.user_aria_described_by.as_deref(),
        )
    }
}
