//! Glue between Leptos reactivity and the form-field engine.

use std::{cell::RefCell, rc::Rc};

use form_field::{ElementRef, FieldEffect, FormField};
use form_field_web::{schedule_stable_tick, WebElement};
use leptos::*;
use wasm_bindgen::{JsCast, JsValue};

/// Engine slot owned by one rendered field.
pub(crate) type EngineSlot = StoredValue<Option<Rc<RefCell<FormField>>>>;

/// Wraps any rendered element as an engine handle.
pub(crate) fn to_element(value: &JsValue) -> Option<ElementRef> {
    value
        .dyn_ref::<web_sys::HtmlElement>()
        .cloned()
        .map(WebElement::handle)
}

/// Carries out effects returned by the engine.
///
/// `MarkForCheck` bumps `revision`, re-running every view that reads derived field state.
/// `ScheduleStableTick` defers [`FormField::on_stable`] to the next macrotask.
pub(crate) fn apply_effects(
    field: &Rc<RefCell<FormField>>,
    effects: Vec<FieldEffect>,
    revision: RwSignal<u64>,
) {
    for effect in effects {
        match effect {
            FieldEffect::MarkForCheck => {
                let _ = revision.try_update(|value| *value = value.wrapping_add(1));
            }
            FieldEffect::ScheduleStableTick => schedule_tick(field, revision),
        }
    }
}

fn schedule_tick(field: &Rc<RefCell<FormField>>, revision: RwSignal<u64>) {
    let weak = Rc::downgrade(field);
    let scheduled = schedule_stable_tick(move || {
        let Some(field) = weak.upgrade() else {
            return;
        };
        let Ok(mut engine) = field.try_borrow_mut() else {
            tracing::trace!("field busy at stable tick; retrying");
            schedule_tick(&field, revision);
            return;
        };
        let effects = engine.on_stable();
        drop(engine);
        apply_effects(&field, effects, revision);
    });
    if let Err(err) = scheduled {
        tracing::warn!(%err, "stable tick dropped");
        match field.try_borrow_mut() {
            Ok(mut engine) => engine.stable_tick_dropped(),
            Err(_) => tracing::warn!("field busy; pending offset update waits for the next change"),
        }
    }
}

/// Runs `mutate` against the engine, if it exists, then applies the returned effects.
pub(crate) fn drive(
    engine: EngineSlot,
    revision: RwSignal<u64>,
    mutate: impl FnOnce(&mut FormField) -> Vec<FieldEffect>,
) {
    let Some(field) = engine.try_get_value().flatten() else {
        return;
    };
    let Ok(mut guard) = field.try_borrow_mut() else {
        tracing::trace!("field busy; mutation dropped");
        return;
    };
    let effects = mutate(&mut guard);
    drop(guard);
    apply_effects(&field, effects, revision);
}

/// Reads the engine, if it exists and is not mid-update.
pub(crate) fn read<T>(engine: EngineSlot, view: impl FnOnce(&FormField) -> T) -> Option<T> {
    let field = engine.try_get_value().flatten()?;
    let guard = field.try_borrow().ok()?;
    Some(view(&guard))
}
