//! Floating label part: float state, required marker, width, and prefix offset.

use tracing::trace;

use crate::{
    classes::{FLOATING_LABEL_FLOAT_ABOVE, FLOATING_LABEL_REQUIRED},
    dom::ElementRef,
    offset::LabelOffset,
};

/// Owns the label element. Every operation is a no-op once destroyed.
pub struct FloatingLabel {
    element: Option<ElementRef>,
    floating: bool,
    required: bool,
    offset: Option<LabelOffset>,
}

impl FloatingLabel {
    /// Wraps a docked, non-required label element.
    pub fn new(element: ElementRef) -> Self {
        element.remove_class(FLOATING_LABEL_FLOAT_ABOVE);
        Self {
            element: Some(element),
            floating: false,
            required: false,
            offset: None,
        }
    }

    /// Floats or docks the label.
    pub fn set_floating(&mut self, floating: bool) {
        let Some(element) = self.element.as_ref() else {
            return;
        };
        if self.floating == floating {
            return;
        }
        trace!(floating, "floating label state changed");
        element.toggle_class(FLOATING_LABEL_FLOAT_ABOVE, floating);
        self.floating = floating;
    }

    /// Whether the label is floated.
    pub fn is_floating(&self) -> bool {
        self.floating
    }

    /// Shows or hides the required marker.
    pub fn set_required(&mut self, required: bool) {
        let Some(element) = self.element.as_ref() else {
            return;
        };
        if self.required == required {
            return;
        }
        element.toggle_class(FLOATING_LABEL_REQUIRED, required);
        self.required = required;
    }

    /// Rendered width of the label text, `0.0` when it cannot be measured.
    pub fn get_width(&self) -> f64 {
        let Some(element) = self.element.as_ref() else {
            return 0.0;
        };
        element
            .scroll_width()
            .or_else(|| element.bounding_rect().map(|rect| rect.width))
            .filter(|width| width.is_finite())
            .unwrap_or(0.0)
            .max(0.0)
    }

    /// Applies a horizontal offset, or restores the stylesheet transform with `None`.
    pub fn set_horizontal_offset(&mut self, offset: Option<LabelOffset>) {
        let Some(element) = self.element.as_ref() else {
            return;
        };
        if self.offset == offset {
            return;
        }
        match offset {
            Some(offset) => element.set_style("transform", &offset.transform()),
            None => element.remove_style("transform"),
        }
        self.offset = offset;
    }

    /// Current signed horizontal offset; `0.0` when the default transform is in effect.
    pub fn horizontal_offset(&self) -> f64 {
        self.offset.map(|offset| offset.pixels).unwrap_or(0.0)
    }

    /// Current offset override.
    pub fn offset(&self) -> Option<LabelOffset> {
        self.offset
    }

    /// Whether [`FloatingLabel::destroy`] ran.
    pub fn is_destroyed(&self) -> bool {
        self.element.is_none()
    }

    /// Releases the element.
    pub fn destroy(&mut self) {
        self.element = None;
    }
}

impl std::fmt::Debug for FloatingLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FloatingLabel")
            .field("floating", &self.floating)
            .field("required", &self.required)
            .field("offset", &self.offset)
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use form_field_contract::Direction;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{dom::MemoryElement, offset::compute_label_offset, FieldElement};

    #[test]
    fn set_floating_twice_matches_once() {
        let once = MemoryElement::new();
        let twice = MemoryElement::new();
        let mut a = FloatingLabel::new(once.handle());
        let mut b = FloatingLabel::new(twice.handle());

        a.set_floating(true);
        b.set_floating(true);
        b.set_floating(true);

        assert_eq!(once.classes(), twice.classes());
        assert_eq!(a.is_floating(), b.is_floating());
        assert!(twice.has_class(FLOATING_LABEL_FLOAT_ABOVE));
    }

    #[test]
    fn width_prefers_scroll_width_and_fails_soft() {
        let element = MemoryElement::new();
        let label = FloatingLabel::new(element.handle());
        assert_eq!(label.get_width(), 0.0);

        element.set_width(40.0);
        assert_eq!(label.get_width(), 40.0);
    }

    #[test]
    fn offset_writes_and_resets_transform() {
        let element = MemoryElement::new();
        let mut label = FloatingLabel::new(element.handle());

        label.set_horizontal_offset(Some(compute_label_offset(20.0, Direction::Ltr)));
        assert_eq!(label.horizontal_offset(), 20.0);
        assert!(element.style("transform").is_some());

        label.set_horizontal_offset(None);
        assert_eq!(label.horizontal_offset(), 0.0);
        assert_eq!(element.style("transform"), None);
    }

    #[test]
    fn operations_after_destroy_are_noops() {
        let element = MemoryElement::new();
        let mut label = FloatingLabel::new(element.handle());
        label.destroy();
        label.destroy();

        label.set_floating(true);
        label.set_required(true);
        label.set_horizontal_offset(Some(compute_label_offset(5.0, Direction::Ltr)));

        assert!(element.classes().is_empty());
        assert_eq!(element.style_writes(), 0);
        assert_eq!(label.get_width(), 0.0);
        assert!(!label.is_floating());
    }
}
