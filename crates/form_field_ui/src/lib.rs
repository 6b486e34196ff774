//! Leptos components rendering Material form fields on top of the [`form_field`] engine.
//!
//! [`MatFormField`] renders the MDC text-field markup, builds the engine once its elements are
//! mounted, and forwards control notifications, content mutations, direction changes, and idle
//! ticks into it. [`MatInput`] is the native input control placed inside it:
//!
//! ```ignore
//! let input = Rc::new(InputControl::new(&IdGenerator::global()));
//! view! {
//!     <MatFormField control=input.clone() label="Email" appearance=FieldAppearance::Outline>
//!         <MatInput control=input required=true />
//!     </MatFormField>
//! }
//! ```

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod engine;
mod field;
mod input;

pub use field::MatFormField;
pub use input::MatInput;
