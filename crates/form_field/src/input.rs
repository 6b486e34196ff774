//! Native text input control implementing [`FormFieldControl`].
//!
//! [`InputControl`] keeps the value/focus/validity state of an `<input>` and notifies its
//! field through `state_changes` only when an observable property actually changed.

use std::cell::RefCell;

use form_field_contract::{FormFieldControl, StateChanges};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    dom::{ElementRef, FieldElement},
    ids::{IdGenerator, INPUT_ID_PREFIX},
};

/// Control type reported to the field (`mat-form-field-type-mat-input`).
pub const INPUT_CONTROL_TYPE: &str = "mat-input";

/// Input types whose native rendering always shows content, so the label never docks.
const NEVER_EMPTY_INPUT_TYPES: [&str; 5] = ["date", "datetime-local", "month", "time", "week"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Validation bookkeeping an [`ErrorStateMatcher`] decides from.
pub struct InputValidity {
    /// Validators rejected the current value.
    pub invalid: bool,
    /// The control was blurred at least once.
    pub touched: bool,
    /// The user edited the value.
    pub dirty: bool,
    /// The enclosing form was submitted.
    pub submitted: bool,
}

/// Decides when an invalid control shows its errors.
pub trait ErrorStateMatcher {
    /// Whether `validity` should be reported as an error state.
    fn is_error_state(&self, validity: &InputValidity) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
/// Errors show once the control was touched or its form submitted.
pub struct DefaultErrorStateMatcher;

impl ErrorStateMatcher for DefaultErrorStateMatcher {
    fn is_error_state(&self, validity: &InputValidity) -> bool {
        validity.invalid && (validity.touched || validity.submitted)
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Errors show as soon as the value was edited.
pub struct ShowOnDirtyErrorStateMatcher;

impl ErrorStateMatcher for ShowOnDirtyErrorStateMatcher {
    fn is_error_state(&self, validity: &InputValidity) -> bool {
        validity.invalid && (validity.dirty || validity.submitted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct InputState {
    value: String,
    placeholder: Option<String>,
    input_type: String,
    focused: bool,
    disabled: bool,
    required: bool,
    readonly: bool,
    autofilled: bool,
    validity: InputValidity,
    described_by: Vec<String>,
    user_described_by: Option<String>,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            value: String::new(),
            placeholder: None,
            input_type: "text".to_string(),
            focused: false,
            disabled: false,
            required: false,
            readonly: false,
            autofilled: false,
            validity: InputValidity::default(),
            described_by: Vec::new(),
            user_described_by: None,
        }
    }
}

impl InputState {
    fn is_never_empty(&self) -> bool {
        NEVER_EMPTY_INPUT_TYPES.contains(&self.input_type.as_str())
    }

    fn empty(&self) -> bool {
        !self.is_never_empty() && self.value.is_empty() && !self.autofilled
    }
}

/// Text input embedded in a form field.
pub struct InputControl {
    id: String,
    state: RefCell<InputState>,
    matcher: Box<dyn ErrorStateMatcher>,
    element: RefCell<Option<ElementRef>>,
    changes: StateChanges,
}

impl InputControl {
    /// Creates an empty text input with a generated `mat-input-N` id.
    pub fn new(ids: &IdGenerator) -> Self {
        Self::with_id(ids.next_id(INPUT_ID_PREFIX))
    }

    /// Creates an empty text input with an explicit id.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: RefCell::new(InputState::default()),
            matcher: Box::new(DefaultErrorStateMatcher),
            element: RefCell::new(None),
            changes: StateChanges::new(),
        }
    }

    /// Replaces the error state policy.
    pub fn with_matcher(mut self, matcher: impl ErrorStateMatcher + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    /// Binds the native element; `aria-describedby`, `id`, and `required` are mirrored onto it.
    pub fn attach_element(&self, element: ElementRef) {
        element.set_attribute("id", &self.id);
        let state = self.state.borrow();
        write_described_by(&*element, &state.described_by);
        write_flag(&*element, "required", state.required);
        write_flag(&*element, "disabled", state.disabled);
        write_flag(&*element, "readonly", state.readonly);
        drop(state);
        *self.element.borrow_mut() = Some(element);
    }

    /// Releases the native element.
    pub fn detach_element(&self) {
        self.element.borrow_mut().take();
    }

    /// Applies `change` and emits when it reports an observable difference. The state borrow
    /// is released before listeners run so they can read the control.
    fn mutate(&self, change: impl FnOnce(&mut InputState) -> bool) {
        let changed = change(&mut *self.state.borrow_mut());
        if changed {
            self.changes.emit();
        }
    }

    fn with_element(&self, write: impl FnOnce(&dyn FieldElement)) {
        if let Some(element) = self.element.borrow().as_ref() {
            write(&**element);
        }
    }

    /// Sets the value programmatically; does not mark the control dirty.
    pub fn set_value(&self, value: impl Into<String>) {
        let value = value.into();
        self.mutate(|state| replace(&mut state.value, value));
    }

    /// Records a user edit: updates the value and marks the control dirty.
    pub fn handle_input(&self, value: impl Into<String>) {
        let value = value.into();
        self.mutate(|state| {
            let value_changed = replace(&mut state.value, value);
            let dirty_changed = replace(&mut state.validity.dirty, true);
            value_changed || dirty_changed
        });
    }

    /// Records a focus or blur event. Blurring marks the control touched. Focus on a
    /// read-only input is tracked but a disabled input never gains focus.
    pub fn focus_changed(&self, focused: bool) {
        self.mutate(|state| {
            if focused && state.disabled {
                return false;
            }
            let mut changed = replace(&mut state.focused, focused);
            if !focused {
                changed |= replace(&mut state.validity.touched, true);
            }
            if changed {
                trace!(focused, "input focus changed");
            }
            changed
        });
    }

    /// Enables or disables the input. Disabling also clears focus; no blur event follows a
    /// focused element being disabled.
    pub fn set_disabled(&self, disabled: bool) {
        self.mutate(|state| {
            let mut changed = replace(&mut state.disabled, disabled);
            if disabled {
                changed |= replace(&mut state.focused, false);
            }
            changed
        });
        self.with_element(|element| write_flag(element, "disabled", disabled));
    }

    /// Marks the input required.
    pub fn set_required(&self, required: bool) {
        self.mutate(|state| replace(&mut state.required, required));
        self.with_element(|element| write_flag(element, "required", required));
    }

    /// Marks the input read-only.
    pub fn set_readonly(&self, readonly: bool) {
        self.mutate(|state| replace(&mut state.readonly, readonly));
        self.with_element(|element| write_flag(element, "readonly", readonly));
    }

    /// Sets the placeholder text.
    pub fn set_placeholder(&self, placeholder: Option<String>) {
        self.mutate(|state| replace(&mut state.placeholder, placeholder));
    }

    /// Sets the native `type`; date-like types never count as empty.
    pub fn set_input_type(&self, input_type: impl Into<String>) {
        let input_type = input_type.into();
        self.mutate(|state| replace(&mut state.input_type, input_type));
    }

    /// Records the browser autofill animation state.
    pub fn set_autofilled(&self, autofilled: bool) {
        self.mutate(|state| replace(&mut state.autofilled, autofilled));
    }

    /// Records the validators' verdict.
    pub fn set_invalid(&self, invalid: bool) {
        self.mutate(|state| replace(&mut state.validity.invalid, invalid));
    }

    /// Records whether the enclosing form was submitted.
    pub fn set_submitted(&self, submitted: bool) {
        self.mutate(|state| replace(&mut state.validity.submitted, submitted));
    }

    /// Author supplied `aria-describedby` ids, kept ahead of hint/error ids.
    pub fn set_user_aria_described_by(&self, ids: Option<String>) {
        self.mutate(|state| replace(&mut state.user_described_by, ids));
    }

    /// Current value.
    pub fn value(&self) -> String {
        self.state.borrow().value.clone()
    }

    /// Placeholder text.
    pub fn placeholder(&self) -> Option<String> {
        self.state.borrow().placeholder.clone()
    }

    /// Validation bookkeeping.
    pub fn validity(&self) -> InputValidity {
        self.state.borrow().validity
    }

    /// Whether the input is read-only.
    pub fn readonly(&self) -> bool {
        self.state.borrow().readonly
    }
}

impl std::fmt::Debug for InputControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputControl")
            .field("id", &self.id)
            .field("state", &*self.state.borrow())
            .finish()
    }
}

impl FormFieldControl for InputControl {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn state_changes(&self) -> &StateChanges {
        &self.changes
    }

    fn focused(&self) -> bool {
        self.state.borrow().focused
    }

    fn empty(&self) -> bool {
        self.state.borrow().empty()
    }

    fn disabled(&self) -> bool {
        self.state.borrow().disabled
    }

    fn required(&self) -> bool {
        self.state.borrow().required
    }

    fn error_state(&self) -> bool {
        self.matcher.is_error_state(&self.state.borrow().validity)
    }

    fn should_label_float(&self) -> bool {
        let state = self.state.borrow();
        state.focused || !state.empty()
    }

    fn control_type(&self) -> Option<String> {
        Some(INPUT_CONTROL_TYPE.to_string())
    }

    fn autofilled(&self) -> bool {
        self.state.borrow().autofilled
    }

    fn user_aria_described_by(&self) -> Option<String> {
        self.state.borrow().user_described_by.clone()
    }

    fn described_by_ids(&self) -> Vec<String> {
        self.state.borrow().described_by.clone()
    }

    fn set_described_by_ids(&self, ids: &[String]) {
        self.state.borrow_mut().described_by = ids.to_vec();
        self.with_element(|element| write_described_by(element, ids));
    }

    fn on_container_click(&self) {
        if self.focused() {
            return;
        }
        self.with_element(|element| element.focus());
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

fn write_described_by(element: &dyn FieldElement, ids: &[String]) {
    if ids.is_empty() {
        element.remove_attribute("aria-describedby");
    } else {
        element.set_attribute("aria-describedby", &ids.join(" "));
    }
}

fn write_flag(element: &dyn FieldElement, name: &str, enabled: bool) {
    if enabled {
        element.set_attribute(name, "");
    } else {
        element.remove_attribute(name);
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{dom::MemoryElement, FieldElement};

    fn counted(control: &InputControl) -> (Rc<Cell<usize>>, form_field_contract::Subscription) {
        let count = Rc::new(Cell::new(0));
        let sink = Rc::clone(&count);
        let subscription = control
            .state_changes()
            .subscribe(move || sink.set(sink.get() + 1));
        (count, subscription)
    }

    #[test]
    fn ids_are_generated_per_generator() {
        let ids = IdGenerator::new();
        assert_eq!(InputControl::new(&ids).id(), "mat-input-0");
        assert_eq!(InputControl::new(&ids).id(), "mat-input-1");
    }

    #[test]
    fn empty_follows_value_autofill_and_type() {
        let input = InputControl::with_id("i");
        assert!(input.empty());
        assert!(!input.should_label_float());

        input.set_autofilled(true);
        assert!(!input.empty());
        input.set_autofilled(false);

        input.set_input_type("date");
        assert!(!input.empty());
        assert!(input.should_label_float());

        input.set_input_type("text");
        input.set_value("abc");
        assert!(!input.empty());
    }

    #[test]
    fn emits_only_on_effective_changes() {
        let input = InputControl::with_id("i");
        let (count, _subscription) = counted(&input);

        input.set_value("a");
        input.set_value("a");
        input.set_required(false);
        input.focus_changed(true);
        input.focus_changed(true);

        assert_eq!(count.get(), 2);
    }

    #[test]
    fn listeners_can_read_the_control_during_emit() {
        let input = Rc::new(InputControl::with_id("i"));
        let seen = Rc::new(Cell::new(false));
        let _subscription = {
            let weak = Rc::downgrade(&input);
            let seen = Rc::clone(&seen);
            input.state_changes().subscribe(move || {
                if let Some(input) = weak.upgrade() {
                    seen.set(input.snapshot().focused);
                }
            })
        };
        input.focus_changed(true);
        assert!(seen.get());
    }

    #[test]
    fn blur_marks_touched_and_default_matcher_reports_error() {
        let input = InputControl::with_id("i");
        input.set_invalid(true);
        assert!(!input.error_state());

        input.focus_changed(true);
        input.focus_changed(false);
        assert!(input.validity().touched);
        assert!(input.error_state());
    }

    #[test]
    fn dirty_matcher_reports_error_after_edit() {
        let input = InputControl::with_id("i").with_matcher(ShowOnDirtyErrorStateMatcher);
        input.set_invalid(true);
        input.set_value("programmatic");
        assert!(!input.error_state());

        input.handle_input("typed");
        assert!(input.error_state());
    }

    #[test]
    fn submitted_form_shows_errors_without_touch() {
        let input = InputControl::with_id("i");
        input.set_invalid(true);
        input.set_submitted(true);
        assert!(input.error_state());
    }

    #[test]
    fn disabling_clears_focus_and_blocks_refocus() {
        let input = InputControl::with_id("i");
        input.focus_changed(true);
        input.set_disabled(true);
        assert!(!input.focused());

        input.focus_changed(true);
        assert!(!input.focused());
    }

    #[test]
    fn described_by_ids_are_mirrored_to_the_element() {
        let input = InputControl::with_id("i");
        let element = MemoryElement::new();
        input.set_required(true);
        input.attach_element(element.handle());
        assert_eq!(element.attribute("id").as_deref(), Some("i"));
        assert_eq!(element.attribute("required").as_deref(), Some(""));

        input.set_described_by_ids(&["hint-a".to_string(), "hint-b".to_string()]);
        assert_eq!(
            element.attribute("aria-describedby").as_deref(),
            Some("hint-a hint-b")
        );

        input.set_described_by_ids(&[]);
        assert_eq!(element.attribute("aria-describedby"), None);
    }

    #[test]
    fn container_click_focuses_unfocused_input_only() {
        let input = InputControl::with_id("i");
        let element = MemoryElement::new();
        input.attach_element(element.handle());

        input.on_container_click();
        assert_eq!(element.focus_requests(), 1);

        input.focus_changed(true);
        input.on_container_click();
        assert_eq!(element.focus_requests(), 1);
    }

    #[test]
    fn reports_mat_input_control_type() {
        let input = InputControl::with_id("i");
        assert_eq!(input.control_type().as_deref(), Some(INPUT_CONTROL_TYPE));
        assert_eq!(input.snapshot().control_type.as_deref(), Some("mat-input"));
    }
}
