//! Browser host signals: idle ticks and document direction.

use form_field::Direction;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};

/// Runs `callback` on the next macrotask, after the current render settled.
///
/// # Errors
///
/// Returns an error when the tick could not be scheduled; `callback` never runs then. Off
/// `wasm32` no tick can be scheduled.
pub fn schedule_stable_tick(callback: impl FnOnce() + 'static) -> Result<(), String> {
    #[cfg(target_arch = "wasm32")]
    {
        let window = web_sys::window().ok_or_else(|| "window unavailable".to_string())?;
        let callback = Closure::once_into_js(callback);
        window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), 0)
            .map(|_| ())
            .map_err(|e| format!("setTimeout failed: {e:?}"))
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = callback;
        Err("stable ticks need a browser window".to_string())
    }
}

/// Layout direction of the document (`<html dir>`, then `<body dir>`), `ltr` when unset.
pub fn document_direction() -> Direction {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(document) = web_sys::window().and_then(|window| window.document()) else {
            return Direction::Ltr;
        };
        let from_root = document
            .document_element()
            .and_then(|root| root.get_attribute("dir"));
        let from_body = || document.body().and_then(|body| body.get_attribute("dir"));
        from_root
            .filter(|dir| !dir.is_empty())
            .or_else(from_body)
            .map(|dir| Direction::from_token(&dir))
            .unwrap_or_default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Direction::Ltr
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn native_builds_default_to_ltr() {
        assert_eq!(document_direction(), Direction::Ltr);
    }

    #[test]
    fn native_builds_never_run_stable_ticks() {
        let ran = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ran);
        assert!(schedule_stable_tick(move || flag.set(true)).is_err());
        assert!(!ran.get());
    }
}
