//! Notched outline: the bordered container whose top edge breaks around a floating label.

use tracing::trace;

use crate::{
    classes::{
        NOTCHED_OUTLINE_NOTCHED, NOTCHED_OUTLINE_NO_LABEL, NOTCHED_OUTLINE_UPGRADED,
        NOTCH_MAX_WIDTH_PROPERTY,
    },
    dom::ElementRef,
    offset::notch_max_width,
};

/// Scale applied to the label when it floats.
pub const LABEL_SCALE_FACTOR: f64 = 0.75;
/// Horizontal padding around the label inside the notch.
pub const NOTCH_ELEMENT_PADDING: f64 = 8.0;
/// Border width included in the notch element.
pub const NOTCH_ELEMENT_BORDER: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
/// Derived notch geometry.
pub struct NotchGeometry {
    /// Scaled label width in pixels, never negative.
    pub width: f64,
    /// Whether the notch is open.
    pub open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
/// Outline state machine.
pub enum NotchState {
    /// Continuous border.
    #[default]
    Closed,
    /// Border broken around a label of the given scaled width.
    Notched(f64),
}

/// Owns the outline container and its notch element.
pub struct NotchedOutline {
    outline: Option<ElementRef>,
    notch: Option<ElementRef>,
    has_label: bool,
    state: NotchState,
}

impl NotchedOutline {
    /// Wraps an outline; an outline without a label never opens.
    pub fn new(outline: ElementRef, notch: ElementRef, has_label: bool) -> Self {
        if has_label {
            outline.remove_class(NOTCHED_OUTLINE_NO_LABEL);
            outline.add_class(NOTCHED_OUTLINE_UPGRADED);
        } else {
            outline.remove_class(NOTCHED_OUTLINE_UPGRADED);
            outline.add_class(NOTCHED_OUTLINE_NO_LABEL);
        }
        Self {
            outline: Some(outline),
            notch: Some(notch),
            has_label,
            state: NotchState::Closed,
        }
    }

    /// Opens the notch for a label whose unscaled rendered width is `label_width`.
    ///
    /// A zero width leaves the notch open without an explicit width, matching a label whose
    /// layout is not available yet.
    pub fn notch(&mut self, label_width: f64) {
        if !self.has_label {
            return;
        }
        let (Some(outline), Some(notch)) = (self.outline.as_ref(), self.notch.as_ref()) else {
            return;
        };
        let width = scaled_notch_width(label_width);
        if self.state == NotchState::Notched(width) {
            return;
        }
        trace!(width, "notched outline opened");
        outline.add_class(NOTCHED_OUTLINE_NOTCHED);
        if width > 0.0 {
            let rendered = width + NOTCH_ELEMENT_PADDING + NOTCH_ELEMENT_BORDER;
            notch.set_style("width", &format!("{rendered}px"));
        } else {
            notch.remove_style("width");
        }
        self.state = NotchState::Notched(width);
    }

    /// Closes the notch.
    pub fn close(&mut self) {
        let (Some(outline), Some(notch)) = (self.outline.as_ref(), self.notch.as_ref()) else {
            return;
        };
        if self.state == NotchState::Closed {
            return;
        }
        trace!("notched outline closed");
        outline.remove_class(NOTCHED_OUTLINE_NOTCHED);
        notch.remove_style("width");
        self.state = NotchState::Closed;
    }

    /// Bounds the notch so it never overlaps prefix or suffix content.
    pub fn set_max_width(&self, root: &ElementRef, prefix_and_suffix_width: f64) {
        if self.outline.is_some() {
            root.set_style(NOTCH_MAX_WIDTH_PROPERTY, &notch_max_width(prefix_and_suffix_width));
        }
    }

    /// Current state.
    pub fn state(&self) -> NotchState {
        self.state
    }

    /// Current geometry.
    pub fn geometry(&self) -> NotchGeometry {
        match self.state {
            NotchState::Closed => NotchGeometry::default(),
            NotchState::Notched(width) => NotchGeometry { width, open: true },
        }
    }

    /// Whether a label is projected into the outline.
    pub fn has_label(&self) -> bool {
        self.has_label
    }

    /// Releases both elements.
    pub fn destroy(&mut self) {
        self.outline = None;
        self.notch = None;
        self.state = NotchState::Closed;
    }
}

impl std::fmt::Debug for NotchedOutline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotchedOutline")
            .field("has_label", &self.has_label)
            .field("state", &self.state)
            .field("destroyed", &self.outline.is_none())
            .finish()
    }
}

/// Notch width for an unscaled label width; never negative.
pub fn scaled_notch_width(label_width: f64) -> f64 {
    if label_width.is_finite() {
        (label_width * LABEL_SCALE_FACTOR).max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{dom::MemoryElement, FieldElement};

    fn outline(has_label: bool) -> (NotchedOutline, MemoryElement, MemoryElement) {
        let outline = MemoryElement::new();
        let notch = MemoryElement::new();
        (
            NotchedOutline::new(outline.handle(), notch.handle(), has_label),
            outline,
            notch,
        )
    }

    #[test]
    fn notch_scales_label_width() {
        let (mut part, outline, notch) = outline(true);
        part.notch(40.0);

        assert_eq!(part.state(), NotchState::Notched(30.0));
        assert_eq!(part.geometry(), NotchGeometry { width: 30.0, open: true });
        assert!(outline.has_class(NOTCHED_OUTLINE_NOTCHED));
        assert_eq!(notch.style("width").as_deref(), Some("39px"));
    }

    #[test]
    fn close_removes_class_and_width() {
        let (mut part, outline, notch) = outline(true);
        part.notch(40.0);
        part.close();

        assert_eq!(part.geometry(), NotchGeometry::default());
        assert!(!outline.has_class(NOTCHED_OUTLINE_NOTCHED));
        assert_eq!(notch.style("width"), None);
    }

    #[test]
    fn outline_without_label_stays_closed() {
        let (mut part, outline, notch) = outline(false);
        part.notch(120.0);

        assert_eq!(part.state(), NotchState::Closed);
        assert!(outline.has_class(NOTCHED_OUTLINE_NO_LABEL));
        assert_eq!(notch.style_writes(), 0);
    }

    #[test]
    fn width_is_never_negative() {
        for raw in [-10.0, f64::NAN, f64::NEG_INFINITY, 0.0] {
            assert_eq!(scaled_notch_width(raw), 0.0);
        }
        let (mut part, _, notch) = outline(true);
        part.notch(-10.0);
        assert_eq!(part.state(), NotchState::Notched(0.0));
        assert_eq!(notch.style("width"), None);
    }

    #[test]
    fn max_width_targets_field_root() {
        let (part, _, _) = outline(true);
        let root = MemoryElement::new();
        part.set_max_width(&root.handle(), 36.0);
        assert_eq!(
            root.style(NOTCH_MAX_WIDTH_PROPERTY).as_deref(),
            Some("calc(100% - 36px)")
        );
    }
}
