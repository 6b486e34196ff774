//! Horizontal offset that keeps an outlined floating label clear of prefix content.

use form_field_contract::Direction;

/// Docked transform the offset is composed with.
pub const FLOATING_LABEL_DEFAULT_DOCKED_TRANSFORM: &str = "translateY(-50%)";

#[derive(Debug, Clone, Copy, PartialEq)]
/// Signed label shift derived from the measured prefix width.
pub struct LabelOffset {
    /// Signed shift in CSS pixels; negative in right-to-left layouts.
    pub pixels: f64,
    /// Direction the offset was computed for.
    pub direction: Direction,
}

impl LabelOffset {
    /// Inline `transform` value for the floating label.
    pub fn transform(&self) -> String {
        let sign = if self.direction == Direction::Rtl { "-1" } else { "1" };
        let width = self.pixels.abs();
        format!(
            "var(--mat-mdc-form-field-label-transform, {FLOATING_LABEL_DEFAULT_DOCKED_TRANSFORM} \
             translateX(calc({sign} * ({width}px + var(--mat-mdc-form-field-label-offset-x, 0px)))))"
        )
    }
}

/// Offset for a prefix of `prefix_width` pixels laid out in `direction`.
pub fn compute_label_offset(prefix_width: f64, direction: Direction) -> LabelOffset {
    let width = if prefix_width.is_finite() {
        prefix_width.max(0.0)
    } else {
        0.0
    };
    LabelOffset {
        pixels: direction.sign() * width,
        direction,
    }
}

/// Inline value for the notch max-width custom property.
pub fn notch_max_width(prefix_and_suffix_width: f64) -> String {
    format!("calc(100% - {}px)", prefix_and_suffix_width.max(0.0))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn rtl_offset_negates_ltr_offset() {
        for width in [0.0, 1.5, 20.0, 312.25] {
            let ltr = compute_label_offset(width, Direction::Ltr);
            let rtl = compute_label_offset(width, Direction::Rtl);
            assert_eq!(rtl.pixels, -ltr.pixels);
        }
    }

    #[test]
    fn ltr_prefix_produces_positive_shift() {
        let offset = compute_label_offset(20.0, Direction::Ltr);
        assert_eq!(offset.pixels, 20.0);
        assert_eq!(
            offset.transform(),
            "var(--mat-mdc-form-field-label-transform, translateY(-50%) \
             translateX(calc(1 * (20px + var(--mat-mdc-form-field-label-offset-x, 0px)))))"
        );
    }

    #[test]
    fn rtl_transform_flips_sign_token() {
        let offset = compute_label_offset(12.0, Direction::Rtl);
        assert!(offset.transform().contains("calc(-1 * (12px"));
    }

    #[test]
    fn garbage_widths_clamp_to_zero() {
        assert_eq!(compute_label_offset(f64::NAN, Direction::Ltr).pixels, 0.0);
        assert_eq!(compute_label_offset(-4.0, Direction::Ltr).pixels, 0.0);
        assert_eq!(notch_max_width(36.0), "calc(100% - 36px)");
    }
}
