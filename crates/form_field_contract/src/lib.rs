//! Shared contract between the form-field synchronization engine and embedded controls.
//!
//! A control (a native input, a select, a chip list, ...) implements [`FormFieldControl`] and
//! fires its [`StateChanges`] stream whenever any observable property changes. The field only
//! reads the control through this trait and pushes back the accessibility id list through
//! [`FormFieldControl::set_described_by_ids`]; it never touches the control's own element.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Layout direction reported by the environment.
pub enum Direction {
    /// Left-to-right layout.
    #[default]
    Ltr,
    /// Right-to-left layout.
    Rtl,
}

impl Direction {
    /// Returns the stable `dir` attribute token.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }

    /// Parses a `dir` attribute value; anything other than `rtl` is treated as `ltr`.
    pub fn from_token(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("rtl") {
            Self::Rtl
        } else {
            Self::Ltr
        }
    }

    /// Sign applied to horizontal offsets in this direction.
    pub const fn sign(self) -> f64 {
        match self {
            Self::Ltr => 1.0,
            Self::Rtl => -1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Point-in-time snapshot of every property a control exposes to its form field.
pub struct ControlState {
    /// Whether the control currently has focus.
    pub focused: bool,
    /// Whether the control is disabled.
    pub disabled: bool,
    /// Whether the control has no value.
    pub empty: bool,
    /// Whether the control is required.
    pub required: bool,
    /// Whether the control is in an error state.
    pub error_state: bool,
    /// Whether the control asks for the label to float.
    pub should_label_float: bool,
    /// Whether the browser autofilled the control.
    #[serde(default)]
    pub autofilled: bool,
    /// Optional control type token used to build the `mat-form-field-type-*` class.
    #[serde(default)]
    pub control_type: Option<String>,
    /// Ids currently describing the control (`aria-describedby`).
    #[serde(default)]
    pub described_by_ids: Vec<String>,
    /// Ids the author placed on the control directly; the field keeps them first.
    #[serde(default)]
    pub user_aria_described_by: Option<String>,
}

/// Contract every control embedded in a form field implements.
///
/// Properties are polled when [`FormFieldControl::state_changes`] fires, so implementations
/// must emit after their internal state has been updated.
pub trait FormFieldControl {
    /// Stable element id used to link the label to the control.
    fn id(&self) -> String;

    /// Stream fired whenever any observable property changes.
    fn state_changes(&self) -> &StateChanges;

    /// Whether the control currently has focus.
    fn focused(&self) -> bool;

    /// Whether the control has no value.
    fn empty(&self) -> bool;

    /// Whether the control is disabled.
    fn disabled(&self) -> bool;

    /// Whether the control is required.
    fn required(&self) -> bool;

    /// Whether the control is in an error state.
    fn error_state(&self) -> bool;

    /// Whether the label should float regardless of focus.
    fn should_label_float(&self) -> bool;

    /// Optional control type token (for example `mat-input`).
    fn control_type(&self) -> Option<String> {
        None
    }

    /// Whether the browser autofilled the control.
    fn autofilled(&self) -> bool {
        false
    }

    /// Space separated ids the author put on the control's own `aria-describedby`.
    fn user_aria_described_by(&self) -> Option<String> {
        None
    }

    /// Ids last applied through [`FormFieldControl::set_described_by_ids`].
    fn described_by_ids(&self) -> Vec<String> {
        Vec::new()
    }

    /// Applies the accessibility id list to the control's accessible element.
    fn set_described_by_ids(&self, ids: &[String]);

    /// Called when the user clicks the field container outside of the control.
    fn on_container_click(&self) {}

    /// Collects every polled property into a [`ControlState`].
    fn snapshot(&self) -> ControlState {
        ControlState {
            focused: self.focused(),
            disabled: self.disabled(),
            empty: self.empty(),
            required: self.required(),
            error_state: self.error_state(),
            should_label_float: self.should_label_float(),
            autofilled: self.autofilled(),
            control_type: self.control_type(),
            described_by_ids: self.described_by_ids(),
            user_aria_described_by: self.user_aria_described_by(),
        }
    }
}

type Listener = Rc<dyn Fn()>;

#[derive(Default)]
struct Listeners {
    next_key: u64,
    entries: Vec<(u64, Listener)>,
}

#[derive(Clone, Default)]
/// Single-threaded notification stream fired by controls on every state change.
///
/// Listeners are invoked synchronously, in subscription order, on a snapshot of the listener
/// list; a listener may subscribe or unsubscribe while it runs.
pub struct StateChanges {
    inner: Rc<RefCell<Listeners>>,
}

impl StateChanges {
    /// Creates a stream with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` and returns the subscription that keeps it alive.
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        inner.next_key += 1;
        let key = inner.next_key;
        inner.entries.push((key, Rc::new(listener)));
        Subscription {
            key,
            listeners: Rc::downgrade(&self.inner),
        }
    }

    /// Notifies every current listener.
    pub fn emit(&self) {
        let snapshot: Vec<Listener> = self
            .inner
            .borrow()
            .entries
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in snapshot {
            listener();
        }
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().entries.len()
    }
}

impl fmt::Debug for StateChanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateChanges")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[must_use = "dropping a subscription unsubscribes the listener"]
/// Handle for a [`StateChanges`] listener; unsubscribes on drop.
pub struct Subscription {
    key: u64,
    listeners: Weak<RefCell<Listeners>>,
}

impl Subscription {
    /// Removes the listener. Calling this more than once is a no-op.
    pub fn unsubscribe(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners
                .borrow_mut()
                .entries
                .retain(|(key, _)| *key != self.key);
        }
        self.listeners = Weak::new();
    }

    /// Whether the listener is still registered on a live stream.
    pub fn is_active(&self) -> bool {
        self.listeners
            .upgrade()
            .map(|listeners| listeners.borrow().entries.iter().any(|(key, _)| *key == self.key))
            .unwrap_or(false)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn emit_reaches_every_listener_in_order() {
        let changes = StateChanges::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let first = {
            let log = Rc::clone(&log);
            changes.subscribe(move || log.borrow_mut().push("first"))
        };
        let second = {
            let log = Rc::clone(&log);
            changes.subscribe(move || log.borrow_mut().push("second"))
        };

        changes.emit();

        assert_eq!(*log.borrow(), vec!["first", "second"]);
        assert!(first.is_active());
        assert!(second.is_active());
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let changes = StateChanges::new();
        let hits = Rc::new(Cell::new(0));
        let subscription = {
            let hits = Rc::clone(&hits);
            changes.subscribe(move || hits.set(hits.get() + 1))
        };
        changes.emit();
        drop(subscription);
        changes.emit();

        assert_eq!(hits.get(), 1);
        assert_eq!(changes.listener_count(), 0);
    }

    #[test]
    fn unsubscribe_is_idempotent_and_survives_stream_drop() {
        let changes = StateChanges::new();
        let mut subscription = changes.subscribe(|| {});
        subscription.unsubscribe();
        subscription.unsubscribe();
        assert!(!subscription.is_active());

        let mut orphan = changes.subscribe(|| {});
        drop(changes);
        assert!(!orphan.is_active());
        orphan.unsubscribe();
    }

    #[test]
    fn listener_may_unsubscribe_itself_while_emitting() {
        let changes = StateChanges::new();
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let subscription = {
            let slot = Rc::clone(&slot);
            changes.subscribe(move || {
                slot.borrow_mut().take();
            })
        };
        *slot.borrow_mut() = Some(subscription);

        changes.emit();

        assert_eq!(changes.listener_count(), 0);
    }

    #[test]
    fn direction_tokens_and_sign() {
        assert_eq!(Direction::from_token("RTL"), Direction::Rtl);
        assert_eq!(Direction::from_token("auto"), Direction::Ltr);
        assert_eq!(Direction::Rtl.token(), "rtl");
        assert_eq!(Direction::Rtl.sign(), -Direction::Ltr.sign());
    }

    #[test]
    fn control_state_deserializes_with_optional_fields_missing() {
        let state: ControlState = serde_json::from_str(
            r#"{"focused":true,"disabled":false,"empty":true,"required":false,
                "error_state":false,"should_label_float":true}"#,
        )
        .expect("parse control state");

        assert_eq!(
            state,
            ControlState {
                focused: true,
                empty: true,
                should_label_float: true,
                ..ControlState::default()
            }
        );
    }
}
