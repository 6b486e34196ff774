//! Configuration errors raised by form-field initialization and hint validation.

use thiserror::Error;

use crate::subscript::HintAlign;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Fatal configuration errors. Soft conditions (missing layout, destroyed parts, no prefix)
/// are never reported through this type.
pub enum FormFieldError {
    /// The field was initialized without an embedded control.
    #[error("mat-form-field must contain a MatFormFieldControl.")]
    MissingControl,
    /// More than one hint claims the same alignment slot.
    #[error("A hint was already declared for 'align=\"{}\"'.", .align.token())]
    DuplicatedHint {
        /// Alignment slot declared twice.
        align: HintAlign,
    },
    /// Default options could not be parsed.
    #[error("invalid form field defaults: {0}")]
    InvalidDefaults(String),
    /// The field was already destroyed.
    #[error("form field has been destroyed")]
    Destroyed,
}

impl From<serde_json::Error> for FormFieldError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidDefaults(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn messages_name_the_violated_invariant() {
        assert_eq!(
            FormFieldError::DuplicatedHint {
                align: HintAlign::Start
            }
            .to_string(),
            "A hint was already declared for 'align=\"start\"'."
        );
        assert_eq!(
            FormFieldError::MissingControl.to_string(),
            "mat-form-field must contain a MatFormFieldControl."
        );
    }
}
