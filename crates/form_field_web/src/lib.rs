//! Browser (`wasm32`) adapters for the [`form_field`] engine.
//!
//! - [`WebElement`]: `HtmlElement`-backed [`form_field::FieldElement`].
//! - [`ContentObserver`]: mutation observers for label text, prefix/suffix content, and the
//!   document `dir` attribute.
//! - [`schedule_stable_tick`] / [`document_direction`]: host signals the engine consumes.
//!
//! Everything compiles on native targets; browser-only calls fail soft there.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod element;
pub mod host;
pub mod observer;

pub use element::{pointer_offset_x, WebElement};
pub use host::{document_direction, schedule_stable_tick};
pub use observer::{ContentObserver, ObservedChanges};
