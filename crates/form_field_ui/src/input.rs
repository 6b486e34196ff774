//! `matInput`: native `<input>` bound to an [`InputControl`].

use std::rc::Rc;

use form_field::{FormFieldControl, InputControl};
use leptos::*;

use crate::engine::to_element;

/// Animation names the autofill stylesheet starts on `:-webkit-autofill` enter and leave.
const AUTOFILL_START_ANIMATION: &str = "cdk-text-field-autofill-start";
const AUTOFILL_END_ANIMATION: &str = "cdk-text-field-autofill-end";

/// Autofill transition signalled by an `animationstart` event, if any.
pub(crate) fn autofill_transition(animation_name: &str) -> Option<bool> {
    match animation_name {
        AUTOFILL_START_ANIMATION => Some(true),
        AUTOFILL_END_ANIMATION => Some(false),
        _ => None,
    }
}

#[component]
/// Native text input feeding focus, value, validity, and autofill into `control`.
pub fn MatInput(
    control: Rc<InputControl>,
    #[prop(optional, into)] placeholder: MaybeSignal<String>,
    #[prop(optional)] input_type: Option<&'static str>,
    #[prop(optional, into)] required: MaybeSignal<bool>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional, into)] readonly: MaybeSignal<bool>,
    #[prop(optional, into)] invalid: MaybeSignal<bool>,
    #[prop(optional, into)] submitted: MaybeSignal<bool>,
) -> impl IntoView {
    let placeholder = Signal::derive(move || placeholder.get());
    let disabled = Signal::derive(move || disabled.get());
    let readonly = Signal::derive(move || readonly.get());
    let input_ref = create_node_ref::<html::Input>();
    control.set_input_type(input_type.unwrap_or("text"));

    {
        let control = Rc::clone(&control);
        create_effect(move |_| {
            if let Some(element) = input_ref.get().and_then(|input| to_element(&input)) {
                control.attach_element(element);
            }
        });
    }
    {
        let control = Rc::clone(&control);
        on_cleanup(move || control.detach_element());
    }

    {
        let control = Rc::clone(&control);
        create_effect(move |_| {
            let text = placeholder.get();
            control.set_placeholder((!text.is_empty()).then_some(text));
        });
    }
    {
        let control = Rc::clone(&control);
        create_effect(move |_| control.set_required(required.get()));
    }
    {
        let control = Rc::clone(&control);
        create_effect(move |_| control.set_disabled(disabled.get()));
    }
    {
        let control = Rc::clone(&control);
        create_effect(move |_| control.set_readonly(readonly.get()));
    }
    {
        let control = Rc::clone(&control);
        create_effect(move |_| control.set_invalid(invalid.get()));
    }
    {
        let control = Rc::clone(&control);
        create_effect(move |_| control.set_submitted(submitted.get()));
    }

    let on_focus = {
        let control = Rc::clone(&control);
        move |_: web_sys::FocusEvent| control.focus_changed(true)
    };
    let on_blur = {
        let control = Rc::clone(&control);
        move |_: web_sys::FocusEvent| control.focus_changed(false)
    };
    let on_input = {
        let control = Rc::clone(&control);
        move |ev: web_sys::Event| control.handle_input(event_target_value(&ev))
    };
    let on_animation_start = {
        let control = Rc::clone(&control);
        move |ev: web_sys::AnimationEvent| {
            if let Some(autofilled) = autofill_transition(&ev.animation_name()) {
                control.set_autofilled(autofilled);
            }
        }
    };

    view! {
        <input
            class="mat-mdc-input-element mdc-text-field__input"
            id=control.id()
            type=input_type.unwrap_or("text")
            node_ref=input_ref
            placeholder=move || placeholder.get()
            disabled=move || disabled.get()
            readonly=move || readonly.get()
            data-ui-kind="mat-input"
            on:focus=on_focus
            on:blur=on_blur
            on:input=on_input
            on:animationstart=on_animation_start
        />
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn autofill_animation_names_map_to_transitions() {
        assert_eq!(autofill_transition("cdk-text-field-autofill-start"), Some(true));
        assert_eq!(autofill_transition("cdk-text-field-autofill-end"), Some(false));
        assert_eq!(autofill_transition("mdc-ripple"), None);
    }
}
