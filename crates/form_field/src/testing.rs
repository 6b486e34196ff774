//! Test doubles for crates that embed form fields.

use std::cell::{Cell, RefCell};

use form_field_contract::{ControlState, FormFieldControl, StateChanges};

/// Control whose state is set directly by the test.
#[derive(Debug, Default)]
pub struct StubControl {
    id: String,
    state: RefCell<ControlState>,
    described_by: RefCell<Vec<String>>,
    container_clicks: Cell<usize>,
    changes: StateChanges,
}

impl StubControl {
    /// Creates a blurred, empty control.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: RefCell::new(ControlState {
                empty: true,
                ..ControlState::default()
            }),
            ..Self::default()
        }
    }

    /// Mutates the state and fires `state_changes`.
    pub fn update(&self, mutate: impl FnOnce(&mut ControlState)) {
        mutate(&mut *self.state.borrow_mut());
        self.changes.emit();
    }

    /// Mutates the state without notifying.
    pub fn update_silently(&self, mutate: impl FnOnce(&mut ControlState)) {
        mutate(&mut *self.state.borrow_mut());
    }

    /// Number of container clicks forwarded by the field.
    pub fn container_clicks(&self) -> usize {
        self.container_clicks.get()
    }
}

impl FormFieldControl for StubControl {
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
        self.state.borrow().empty
    }

    fn disabled(&self) -> bool {
        self.state.borrow().disabled
    }

    fn required(&self) -> bool {
        self.state.borrow().required
    }

    fn error_state(&self) -> bool {
        self.state.borrow().error_state
    }

    fn should_label_float(&self) -> bool {
        self.state.borrow().should_label_float
    }

    fn control_type(&self) -> Option<String> {
        self.state.borrow().control_type.clone()
    }

    fn autofilled(&self) -> bool {
        self.state.borrow().autofilled
    }

    fn user_aria_described_by(&self) -> Option<String> {
        self.state.borrow().user_aria_described_by.clone()
    }

    fn described_by_ids(&self) -> Vec<String> {
        self.described_by.borrow().clone()
    }

    fn set_described_by_ids(&self, ids: &[String]) {
        *self.described_by.borrow_mut() = ids.to_vec();
    }

    fn on_container_click(&self) {
        self.container_clicks.set(self.container_clicks.get() + 1);
    }
}
