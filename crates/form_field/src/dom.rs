//! Element handles the engine writes classes and styles to, plus an in-memory implementation.
//!
//! Every visual part talks to its element through [`FieldElement`] so the same engine drives
//! browser elements (`form_field_web::WebElement`) and detached/server-side elements
//! ([`MemoryElement`]). Measurement is allowed to be unavailable: callers go through
//! [`measured_width`], which treats a missing layout as zero.

use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet},
    fmt,
    rc::Rc,
};

/// Shared handle to an element owned by one visual part.
pub type ElementRef = Rc<dyn FieldElement>;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
/// Rendered box of an element in CSS pixels.
pub struct ElementRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Rendered width.
    pub width: f64,
    /// Rendered height.
    pub height: f64,
}

/// Minimal DOM surface the synchronization engine needs.
pub trait FieldElement {
    /// Adds a CSS class.
    fn add_class(&self, name: &str);

    /// Removes a CSS class.
    fn remove_class(&self, name: &str);

    /// Whether the class is currently present.
    fn has_class(&self, name: &str) -> bool;

    /// Writes an inline style property (including `--custom` properties).
    fn set_style(&self, property: &str, value: &str);

    /// Removes an inline style property.
    fn remove_style(&self, property: &str);

    /// Reads an inline style property.
    fn style(&self, property: &str) -> Option<String>;

    /// Writes an attribute.
    fn set_attribute(&self, name: &str, value: &str);

    /// Removes an attribute.
    fn remove_attribute(&self, name: &str);

    /// Reads an attribute.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Bounding client rect, or `None` when layout is unavailable (server rendering).
    fn bounding_rect(&self) -> Option<ElementRect>;

    /// Full scroll width of the content, or `None` when layout is unavailable.
    fn scroll_width(&self) -> Option<f64>;

    /// Whether the element is connected to a document (its root node is not itself).
    fn is_attached(&self) -> bool;

    /// Moves keyboard focus to the element.
    fn focus(&self) {}

    /// Adds or removes `name` depending on `enabled`.
    fn toggle_class(&self, name: &str, enabled: bool) {
        if enabled {
            self.add_class(name);
        } else {
            self.remove_class(name);
        }
    }
}

/// Rendered width of `element`, `0.0` when it cannot be measured.
pub fn measured_width(element: &dyn FieldElement) -> f64 {
    element
        .bounding_rect()
        .map(|rect| rect.width)
        .filter(|width| width.is_finite())
        .unwrap_or(0.0)
        .max(0.0)
}

#[derive(Debug, Default)]
struct MemoryElementState {
    classes: BTreeSet<String>,
    styles: BTreeMap<String, String>,
    attributes: BTreeMap<String, String>,
    rect: Option<ElementRect>,
    scroll_width: Option<f64>,
    attached: bool,
    style_writes: usize,
    focus_requests: usize,
}

#[derive(Clone, Default)]
/// In-memory element used for server rendering and tests.
///
/// Clones share state, so a test can keep one handle and hand another to the engine.
pub struct MemoryElement {
    inner: Rc<RefCell<MemoryElementState>>,
}

impl MemoryElement {
    /// Creates a detached element with no layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an attached element with the given rendered width.
    pub fn attached_with_width(width: f64) -> Self {
        let element = Self::new();
        element.set_attached(true);
        element.set_width(width);
        element
    }

    /// Marks the element as connected/disconnected.
    pub fn set_attached(&self, attached: bool) {
        self.inner.borrow_mut().attached = attached;
    }

    /// Sets both the bounding width and the scroll width.
    pub fn set_width(&self, width: f64) {
        let mut inner = self.inner.borrow_mut();
        inner.rect = Some(ElementRect {
            width,
            ..inner.rect.unwrap_or_default()
        });
        inner.scroll_width = Some(width);
    }

    /// Drops layout information, as on a server.
    pub fn clear_layout(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.rect = None;
        inner.scroll_width = None;
    }

    /// Sorted class list.
    pub fn classes(&self) -> Vec<String> {
        self.inner.borrow().classes.iter().cloned().collect()
    }

    /// Number of inline style writes (sets and removals) performed so far.
    pub fn style_writes(&self) -> usize {
        self.inner.borrow().style_writes
    }

    /// Number of [`FieldElement::focus`] calls.
    pub fn focus_requests(&self) -> usize {
        self.inner.borrow().focus_requests
    }

    /// Returns a shared handle usable as an [`ElementRef`].
    pub fn handle(&self) -> ElementRef {
        Rc::new(self.clone())
    }
}

impl fmt::Debug for MemoryElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("MemoryElement")
            .field("classes", &inner.classes)
            .field("styles", &inner.styles)
            .field("attached", &inner.attached)
            .finish()
    }
}

impl FieldElement for MemoryElement {
    fn add_class(&self, name: &str) {
        self.inner.borrow_mut().classes.insert(name.to_string());
    }

    fn remove_class(&self, name: &str) {
        self.inner.borrow_mut().classes.remove(name);
    }

    fn has_class(&self, name: &str) -> bool {
        self.inner.borrow().classes.contains(name)
    }

    fn set_style(&self, property: &str, value: &str) {
        let mut inner = self.inner.borrow_mut();
        inner.style_writes += 1;
        inner
            .styles
            .insert(property.to_string(), value.to_string());
    }

    fn remove_style(&self, property: &str) {
        let mut inner = self.inner.borrow_mut();
        inner.style_writes += 1;
        inner.styles.remove(property);
    }

    fn style(&self, property: &str) -> Option<String> {
        self.inner.borrow().styles.get(property).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.inner
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&self, name: &str) {
        self.inner.borrow_mut().attributes.remove(name);
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.inner.borrow().attributes.get(name).cloned()
    }

    fn bounding_rect(&self) -> Option<ElementRect> {
        self.inner.borrow().rect
    }

    fn scroll_width(&self) -> Option<f64> {
        self.inner.borrow().scroll_width
    }

    fn is_attached(&self) -> bool {
        self.inner.borrow().attached
    }

    fn focus(&self) {
        self.inner.borrow_mut().focus_requests += 1;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn measured_width_fails_soft_without_layout() {
        let element = MemoryElement::new();
        assert_eq!(measured_width(&element), 0.0);

        element.set_width(24.5);
        assert_eq!(measured_width(&element), 24.5);

        element.clear_layout();
        assert_eq!(measured_width(&element), 0.0);
    }

    #[test]
    fn measured_width_ignores_garbage_rects() {
        let element = MemoryElement::new();
        element.set_width(f64::NAN);
        assert_eq!(measured_width(&element), 0.0);
        element.set_width(-3.0);
        assert_eq!(measured_width(&element), 0.0);
    }

    #[test]
    fn clones_share_class_and_style_state() {
        let element = MemoryElement::new();
        let handle = element.handle();
        handle.toggle_class("a", true);
        handle.set_style("width", "10px");
        handle.toggle_class("a", false);
        handle.add_class("b");

        assert_eq!(element.classes(), vec!["b".to_string()]);
        assert_eq!(element.style("width").as_deref(), Some("10px"));
        assert_eq!(element.style_writes(), 1);
    }
}
