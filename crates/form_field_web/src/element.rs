//! `web_sys::HtmlElement`-backed [`FieldElement`].

use form_field::{ElementRect, ElementRef, FieldElement};
use tracing::trace;
use web_sys::HtmlElement;

#[derive(Debug, Clone)]
/// Browser element handed to the form-field engine.
///
/// DOM calls that can throw (class list, style, attribute writes) are best effort; a failed
/// write is traced and otherwise ignored.
pub struct WebElement {
    element: HtmlElement,
}

impl WebElement {
    /// Wraps a live element.
    pub fn new(element: HtmlElement) -> Self {
        Self { element }
    }

    /// Wraps a live element as a shared engine handle.
    pub fn handle(element: HtmlElement) -> ElementRef {
        std::rc::Rc::new(Self::new(element))
    }

    /// Underlying element.
    pub fn element(&self) -> &HtmlElement {
        &self.element
    }
}

impl From<HtmlElement> for WebElement {
    fn from(element: HtmlElement) -> Self {
        Self::new(element)
    }
}

impl FieldElement for WebElement {
    fn add_class(&self, name: &str) {
        if let Err(err) = self.element.class_list().add_1(name) {
            trace!(name, ?err, "classList.add failed");
        }
    }

    fn remove_class(&self, name: &str) {
        if let Err(err) = self.element.class_list().remove_1(name) {
            trace!(name, ?err, "classList.remove failed");
        }
    }

    fn has_class(&self, name: &str) -> bool {
        self.element.class_list().contains(name)
    }

    fn set_style(&self, property: &str, value: &str) {
        if let Err(err) = self.element.style().set_property(property, value) {
            trace!(property, ?err, "style.setProperty failed");
        }
    }

    fn remove_style(&self, property: &str) {
        if let Err(err) = self.element.style().remove_property(property) {
            trace!(property, ?err, "style.removeProperty failed");
        }
    }

    fn style(&self, property: &str) -> Option<String> {
        self.element
            .style()
            .get_property_value(property)
            .ok()
            .filter(|value| !value.is_empty())
    }

    fn set_attribute(&self, name: &str, value: &str) {
        if let Err(err) = self.element.set_attribute(name, value) {
            trace!(name, ?err, "setAttribute failed");
        }
    }

    fn remove_attribute(&self, name: &str) {
        if let Err(err) = self.element.remove_attribute(name) {
            trace!(name, ?err, "removeAttribute failed");
        }
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.element.get_attribute(name)
    }

    fn bounding_rect(&self) -> Option<ElementRect> {
        if !self.is_attached() {
            return None;
        }
        let rect = self.element.get_bounding_client_rect();
        Some(ElementRect {
            x: rect.x(),
            y: rect.y(),
            width: rect.width(),
            height: rect.height(),
        })
    }

    fn scroll_width(&self) -> Option<f64> {
        if !self.is_attached() {
            return None;
        }
        Some(f64::from(self.element.scroll_width()))
    }

    fn is_attached(&self) -> bool {
        let node: &web_sys::Node = self.element.as_ref();
        !node.get_root_node().is_same_node(Some(node))
    }

    fn focus(&self) {
        if let Err(err) = self.element.focus() {
            trace!(?err, "focus failed");
        }
    }
}

/// Horizontal pointer position relative to `element`'s left edge, used as the line ripple
/// center.
pub fn pointer_offset_x(event: &web_sys::MouseEvent, element: &HtmlElement) -> f64 {
    let left = element.get_bounding_client_rect().left();
    f64::from(event.client_x()) - left
}
