//! Visual-state synchronization engine for Material form fields.
//!
//! A [`FormField`] wraps one embedded [`FormFieldControl`] and keeps four visual parts in step
//! with it: the [`FloatingLabel`], the [`LineRipple`] under a filled field, the
//! [`NotchedOutline`] of an outlined field, and the hint/error subscript managed by
//! [`SubscriptManager`]. Everything reaches the page through [`FieldElement`], so the engine runs
//! the same against browser elements (`form_field_web`) and [`MemoryElement`] in tests.
//!
//! Hosts drive the engine with the [`FieldEffect`]s its mutators return:
//!
//! ```
//! use std::rc::Rc;
//!
//! use form_field::{
//!     FieldAppearance, FieldEffect, FieldParts, FormField, FormFieldConfig, FormFieldControl,
//!     IdGenerator, InputControl, MemoryElement,
//! };
//!
//! let ids = IdGenerator::new();
//! let root = MemoryElement::attached_with_width(200.0);
//! let label = MemoryElement::attached_with_width(40.0);
//! let parts = FieldParts::new(root.handle())
//!     .with_floating_label(label.handle())
//!     .with_notched_outline(MemoryElement::new().handle(), MemoryElement::new().handle());
//! let mut field = FormField::new(
//!     FormFieldConfig::default().with_appearance(FieldAppearance::Outline),
//!     &ids,
//!     parts,
//! );
//!
//! let input = Rc::new(InputControl::new(&ids));
//! let control: Rc<dyn FormFieldControl> = input.clone();
//! let effects = field.initialize(Some(control)).expect("control present");
//! if effects.contains(&FieldEffect::ScheduleStableTick) {
//!     field.on_stable();
//! }
//!
//! input.set_value("hello");
//! field.handle_state_changes();
//! assert!(field.label_should_float());
//! assert_eq!(field.notch_geometry().width, 30.0);
//! ```

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod classes;
pub mod config;
pub mod dom;
pub mod error;
pub mod floating_label;
pub mod ids;
pub mod input;
pub mod line_ripple;
pub mod notched_outline;
pub mod offset;
pub mod orchestrator;
pub mod subscript;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use classes::DerivedState;
pub use config::{
    FieldAppearance, FloatLabelMode, FormFieldConfig, FormFieldDefaults, SubscriptSizing,
    ThemePalette, ValidationMode,
};
pub use dom::{measured_width, ElementRect, ElementRef, FieldElement, MemoryElement};
pub use error::FormFieldError;
pub use floating_label::FloatingLabel;
pub use form_field_contract::{ControlState, Direction, FormFieldControl, StateChanges, Subscription};
pub use ids::IdGenerator;
pub use input::{
    DefaultErrorStateMatcher, ErrorStateMatcher, InputControl, InputValidity,
    ShowOnDirtyErrorStateMatcher,
};
pub use line_ripple::LineRipple;
pub use notched_outline::{NotchGeometry, NotchState, NotchedOutline};
pub use offset::{compute_label_offset, LabelOffset};
pub use orchestrator::{
    bind_state_changes, label_should_float, FieldEffect, FieldParts, FieldPhase, FocusState,
    FormField, DETACHED_RETRY_LIMIT,
};
pub use subscript::{DisplayedMessages, ErrorEntry, HintAlign, HintEntry, SubscriptManager};
