//! Line ripple under filled fields.

use tracing::trace;

use crate::{
    classes::{LINE_RIPPLE_ACTIVE, LINE_RIPPLE_DEACTIVATING},
    dom::ElementRef,
};

/// Owns the ripple element.
pub struct LineRipple {
    element: Option<ElementRef>,
    active: bool,
}

impl LineRipple {
    /// Wraps an inactive ripple element.
    pub fn new(element: ElementRef) -> Self {
        Self {
            element: Some(element),
            active: false,
        }
    }

    /// Expands the ripple.
    pub fn activate(&mut self) {
        let Some(element) = self.element.as_ref() else {
            return;
        };
        trace!("line ripple activated");
        element.remove_class(LINE_RIPPLE_DEACTIVATING);
        element.add_class(LINE_RIPPLE_ACTIVE);
        self.active = true;
    }

    /// Starts collapsing the ripple; [`LineRipple::handle_transition_end`] finishes it.
    pub fn deactivate(&mut self) {
        let Some(element) = self.element.as_ref() else {
            return;
        };
        trace!("line ripple deactivated");
        element.add_class(LINE_RIPPLE_DEACTIVATING);
        self.active = false;
    }

    /// Completes a pending deactivation once the opacity transition ended.
    pub fn handle_transition_end(&mut self) {
        let Some(element) = self.element.as_ref() else {
            return;
        };
        if element.has_class(LINE_RIPPLE_DEACTIVATING) {
            element.remove_class(LINE_RIPPLE_ACTIVE);
            element.remove_class(LINE_RIPPLE_DEACTIVATING);
        }
    }

    /// Centers the ripple animation on the pointer's x coordinate.
    pub fn set_ripple_center(&self, x: f64) {
        if let Some(element) = self.element.as_ref() {
            element.set_style("transform-origin", &format!("{x}px center"));
        }
    }

    /// Whether the ripple is active.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Releases the element.
    pub fn destroy(&mut self) {
        self.element = None;
        self.active = false;
    }
}

impl std::fmt::Debug for LineRipple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineRipple")
            .field("active", &self.active)
            .field("destroyed", &self.element.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{dom::MemoryElement, FieldElement};

    #[test]
    fn activation_cycle_ends_with_no_state_classes() {
        let element = MemoryElement::new();
        let mut ripple = LineRipple::new(element.handle());

        ripple.activate();
        assert_eq!(element.classes(), vec![LINE_RIPPLE_ACTIVE.to_string()]);

        ripple.deactivate();
        assert!(!ripple.is_active());
        assert_eq!(
            element.classes(),
            vec![
                LINE_RIPPLE_ACTIVE.to_string(),
                LINE_RIPPLE_DEACTIVATING.to_string()
            ]
        );

        ripple.handle_transition_end();
        assert!(element.classes().is_empty());
    }

    #[test]
    fn reactivation_cancels_deactivating() {
        let element = MemoryElement::new();
        let mut ripple = LineRipple::new(element.handle());
        ripple.activate();
        ripple.deactivate();
        ripple.activate();
        ripple.handle_transition_end();

        assert_eq!(element.classes(), vec![LINE_RIPPLE_ACTIVE.to_string()]);
    }

    #[test]
    fn ripple_center_sets_transform_origin() {
        let element = MemoryElement::new();
        let ripple = LineRipple::new(element.handle());
        ripple.set_ripple_center(42.5);
        assert_eq!(
            element.style("transform-origin").as_deref(),
            Some("42.5px center")
        );
    }
}
