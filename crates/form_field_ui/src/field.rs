//! `<mat-form-field>` rendering and engine wiring.

use std::{cell::RefCell, rc::Rc};

use form_field::{
    bind_state_changes, classes::subscript_classes, DisplayedMessages, ErrorEntry,
    FieldAppearance, FieldParts, FloatLabelMode, FormField, FormFieldConfig,
    FormFieldControl, HintAlign, HintEntry, IdGenerator, SubscriptSizing, ThemePalette,
};
use form_field_web::{document_direction, pointer_offset_x, ContentObserver, ObservedChanges};
use leptos::*;
use wasm_bindgen::JsCast;

use crate::engine::{apply_effects, drive, read, to_element, EngineSlot};

/// Empty text means "no hint label".
pub(crate) fn hint_label_value(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// An unset prop falls back to the field defaults.
pub(crate) fn prop_or<T>(prop: Option<MaybeSignal<T>>, fallback: T) -> MaybeSignal<T> {
    prop.unwrap_or(MaybeSignal::Static(fallback))
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One rendered subscript message.
pub(crate) struct SubscriptLine {
    pub(crate) id: String,
    pub(crate) text: String,
    pub(crate) class: &'static str,
}

/// Messages to render below the control: every error, or the start hint (explicit or
/// implicit) followed by the end hint.
pub(crate) fn subscript_lines(
    displayed: DisplayedMessages,
    hints: &[HintEntry],
    hint_label: Option<(&str, &str)>,
    errors: &[ErrorEntry],
) -> Vec<SubscriptLine> {
    let line = |id: &str, text: Option<&str>, class| SubscriptLine {
        id: id.to_string(),
        text: text.unwrap_or_default().to_string(),
        class,
    };
    match displayed {
        DisplayedMessages::Error => errors
            .iter()
            .map(|error| line(&error.id, error.text.as_deref(), "mat-mdc-form-field-error"))
            .collect(),
        DisplayedMessages::Hint => {
            let mut lines = Vec::new();
            let start = hints.iter().find(|hint| hint.align == HintAlign::Start);
            if let Some(start) = start {
                lines.push(line(&start.id, start.text.as_deref(), "mat-mdc-form-field-hint"));
            } else if let Some((id, text)) = hint_label {
                lines.push(line(id, Some(text), "mat-mdc-form-field-hint"));
            }
            if let Some(end) = hints.iter().find(|hint| hint.align == HintAlign::End) {
                lines.push(line(
                    &end.id,
                    end.text.as_deref(),
                    "mat-mdc-form-field-hint mat-mdc-form-field-hint-end",
                ));
            }
            lines
        }
    }
}

#[component]
/// Material form field around one control.
///
/// The embedded control is rendered through `children`; `control` is the same control seen
/// through [`FormFieldControl`]. The field floats its label, cuts the outline notch, drives the
/// line ripple, and renders hints or errors from the control's state.
pub fn MatFormField(
    control: Rc<dyn FormFieldControl>,
    #[prop(optional, into)] label: Option<String>,
    #[prop(optional)] defaults: Option<FormFieldConfig>,
    #[prop(optional, into)] appearance: Option<MaybeSignal<FieldAppearance>>,
    #[prop(optional, into)] float_label: Option<MaybeSignal<FloatLabelMode>>,
    #[prop(optional, into)] hide_required_marker: Option<MaybeSignal<bool>>,
    #[prop(optional, into)] color: Option<MaybeSignal<ThemePalette>>,
    #[prop(optional, into)] subscript_sizing: Option<MaybeSignal<SubscriptSizing>>,
    #[prop(optional, into)] hint_label: MaybeSignal<String>,
    #[prop(optional, into)] hints: MaybeSignal<Vec<HintEntry>>,
    #[prop(optional, into)] errors: MaybeSignal<Vec<ErrorEntry>>,
    #[prop(optional)] icon_prefix: Option<Children>,
    #[prop(optional)] text_prefix: Option<Children>,
    #[prop(optional)] icon_suffix: Option<Children>,
    #[prop(optional)] text_suffix: Option<Children>,
    children: Children,
) -> impl IntoView {
    let defaults = defaults.unwrap_or_default();
    let appearance = prop_or(appearance, defaults.appearance);
    let float_label = prop_or(float_label, defaults.float_label);
    let hide_required_marker = prop_or(hide_required_marker, defaults.hide_required_marker);
    let color = prop_or(color, defaults.color);
    let subscript_sizing = prop_or(subscript_sizing, defaults.subscript_sizing);
    let appearance = Signal::derive(move || appearance.get());
    let float_label = Signal::derive(move || float_label.get());
    let hide_required_marker = Signal::derive(move || hide_required_marker.get());
    let color = Signal::derive(move || color.get());
    let subscript_sizing = Signal::derive(move || subscript_sizing.get());
    let hint_label = Signal::derive(move || hint_label.get());
    let hints = Signal::derive(move || hints.get());
    let errors = Signal::derive(move || errors.get());

    let engine: EngineSlot = store_value(None);
    let observers = store_value(Vec::<ContentObserver>::new());
    let revision = create_rw_signal(0_u64);

    let root_ref = create_node_ref::<html::Div>();
    let wrapper_ref = create_node_ref::<html::Div>();
    let outline_ref = create_node_ref::<html::Div>();
    let notch_ref = create_node_ref::<html::Div>();
    let label_ref = create_node_ref::<html::Label>();
    let ripple_ref = create_node_ref::<html::Div>();
    let icon_prefix_ref = create_node_ref::<html::Div>();
    let text_prefix_ref = create_node_ref::<html::Div>();
    let icon_suffix_ref = create_node_ref::<html::Div>();
    let text_suffix_ref = create_node_ref::<html::Div>();

    let has_label = label.is_some();
    let has_icon_prefix = icon_prefix.is_some();
    let has_text_prefix = text_prefix.is_some();
    let has_icon_suffix = icon_suffix.is_some();
    let has_text_suffix = text_suffix.is_some();
    let control_id = control.id();

    {
        let control = Rc::clone(&control);
        create_effect(move |_| {
            let (Some(root), Some(wrapper), Some(outline), Some(notch), Some(ripple)) = (
                root_ref.get(),
                wrapper_ref.get(),
                outline_ref.get(),
                notch_ref.get(),
                ripple_ref.get(),
            ) else {
                return;
            };
            let label_node = label_ref.get();
            if has_label && label_node.is_none() {
                return;
            }
            // Every projected container must be rendered before the engine is built.
            let slot = |present: bool, node: Option<HtmlElement<html::Div>>| {
                if present {
                    node.map(Some)
                } else {
                    Some(None)
                }
            };
            let (Some(icon_prefix), Some(text_prefix), Some(icon_suffix), Some(text_suffix)) = (
                slot(has_icon_prefix, icon_prefix_ref.get()),
                slot(has_text_prefix, text_prefix_ref.get()),
                slot(has_icon_suffix, icon_suffix_ref.get()),
                slot(has_text_suffix, text_suffix_ref.get()),
            ) else {
                return;
            };
            if engine.with_value(Option::is_some) {
                return;
            }
            let (Some(root), Some(wrapper), Some(outline), Some(notch), Some(ripple)) = (
                to_element(&root),
                to_element(&wrapper),
                to_element(&outline),
                to_element(&notch),
                to_element(&ripple),
            ) else {
                tracing::warn!("form field elements are not html elements");
                return;
            };
            let container = |node: &Option<HtmlElement<html::Div>>| {
                node.as_ref().and_then(|node| to_element(node))
            };

            let mut parts = FieldParts::new(Rc::clone(&root))
                .with_text_field(wrapper)
                .with_line_ripple(ripple)
                .with_prefixes(container(&icon_prefix), container(&text_prefix))
                .with_suffixes(container(&icon_suffix), container(&text_suffix));
            let label_element = label_node.as_ref().and_then(|label| to_element(label));
            if let Some(label_element) = label_element.clone() {
                parts = parts.with_floating_label(label_element);
            }
            parts = parts.with_notched_outline(outline, notch);

            let config = FormFieldConfig {
                appearance: appearance.get_untracked(),
                float_label: float_label.get_untracked(),
                hide_required_marker: hide_required_marker.get_untracked(),
                color: color.get_untracked(),
                subscript_sizing: subscript_sizing.get_untracked(),
                hint_label: hint_label_value(&hint_label.get_untracked()),
                ..defaults.clone()
            };
            let mut field = FormField::new(config, &IdGenerator::global(), parts);
            if let Some(label_element) = label_element.as_ref() {
                label_element.set_attribute("id", field.label_id());
            }
            if let Err(err) = field.set_hints(hints.get_untracked()) {
                tracing::error!(%err, "invalid form field hints");
            }
            field.set_errors(errors.get_untracked());
            let mut effects = field.set_direction(document_direction());
            match field.initialize(Some(Rc::clone(&control))) {
                Ok(initial) => effects.extend(initial),
                Err(err) => {
                    tracing::error!(%err, "form field initialization failed");
                    return;
                }
            };
            if root.is_attached() {
                effects.extend(field.on_attached());
            }

            let field = Rc::new(RefCell::new(field));
            let weak = Rc::downgrade(&field);
            let bound = bind_state_changes(&field, move |effects| {
                if let Some(field) = weak.upgrade() {
                    apply_effects(&field, effects, revision);
                }
            });
            if let Err(err) = bound {
                tracing::error!(%err, "form field could not subscribe to its control");
            }
            engine.set_value(Some(Rc::clone(&field)));
            apply_effects(&field, effects, revision);

            let mut started = Vec::new();
            if let Some(label) = label_node.as_ref() {
                started.push(ContentObserver::observe(
                    label,
                    ObservedChanges::Content,
                    move || {
                        drive(engine, revision, |field| {
                            field.on_label_content_changed();
                            Vec::new()
                        })
                    },
                ));
            }
            for node in [&icon_prefix, &text_prefix, &icon_suffix, &text_suffix]
                .into_iter()
                .flatten()
            {
                started.push(ContentObserver::observe(
                    node,
                    ObservedChanges::Content,
                    move || drive(engine, revision, FormField::request_label_offset_update),
                ));
            }
            started.push(ContentObserver::observe_document_direction(move || {
                drive(engine, revision, |field| field.set_direction(document_direction()))
            }));
            observers.set_value(
                started
                    .into_iter()
                    .filter_map(|observer| {
                        observer
                            .map_err(|err| tracing::warn!(%err, "content observer unavailable"))
                            .ok()
                    })
                    .collect(),
            );
        });
    }

    create_effect(move |_| {
        let appearance = appearance.get();
        drive(engine, revision, |field| field.set_appearance(appearance));
    });
    create_effect(move |_| {
        let mode = float_label.get();
        drive(engine, revision, |field| field.set_float_label(mode));
    });
    create_effect(move |_| {
        let hide = hide_required_marker.get();
        drive(engine, revision, |field| field.set_hide_required_marker(hide));
    });
    create_effect(move |_| {
        let palette = color.get();
        drive(engine, revision, |field| field.set_color(palette));
    });
    create_effect(move |_| {
        let sizing = subscript_sizing.get();
        drive(engine, revision, |field| field.set_subscript_sizing(sizing));
    });
    create_effect(move |_| {
        let label = hint_label_value(&hint_label.get());
        drive(engine, revision, |field| {
            field.set_hint_label(label).unwrap_or_else(|err| {
                tracing::error!(%err, "invalid hint label");
                Vec::new()
            })
        });
    });
    create_effect(move |_| {
        let next = hints.get();
        drive(engine, revision, |field| {
            field.set_hints(next).unwrap_or_else(|err| {
                tracing::error!(%err, "invalid form field hints");
                Vec::new()
            })
        });
    });
    create_effect(move |_| {
        let next = errors.get();
        drive(engine, revision, |field| field.set_errors(next));
    });

    on_cleanup(move || {
        observers.set_value(Vec::new());
        if let Some(field) = engine.try_get_value().flatten() {
            if let Ok(mut field) = field.try_borrow_mut() {
                field.destroy();
            }
        }
        engine.set_value(None);
    });

    let on_container_click = move |_: web_sys::MouseEvent| {
        // Clone the control out so no field borrow is held while it emits.
        if let Some(control) = read(engine, FormField::control).flatten() {
            control.on_container_click();
        }
    };
    let on_pointerdown = move |ev: web_sys::PointerEvent| {
        let Some(target) = ev
            .current_target()
            .and_then(|target| target.dyn_into::<web_sys::HtmlElement>().ok())
        else {
            return;
        };
        let x = pointer_offset_x(&ev, &target);
        read(engine, |field| {
            if let Some(ripple) = field.line_ripple() {
                ripple.set_ripple_center(x);
            }
        });
    };
    let on_transition_end = move |_: web_sys::TransitionEvent| {
        drive(engine, revision, |field| {
            field.on_line_ripple_transition_end();
            Vec::new()
        });
    };

    let subscript_class = move || subscript_classes(subscript_sizing.get()).join(" ");
    let subscript = move || {
        revision.get();
        let lines = read(engine, |field| {
            let subscript = field.subscript();
            let hint_label = subscript
                .hint_label()
                .map(|text| (subscript.hint_label_id(), text));
            subscript_lines(
                field.displayed_messages(),
                subscript.hints(),
                hint_label,
                subscript.errors(),
            )
        })
        .unwrap_or_default();
        lines
            .into_iter()
            .map(|line| {
                view! {
                    <div class=line.class id=line.id>
                        {line.text}
                    </div>
                }
            })
            .collect_view()
    };

    view! {
        <div class="mat-mdc-form-field" node_ref=root_ref data-ui-kind="form-field">
            <div
                class="mat-mdc-text-field-wrapper mdc-text-field"
                node_ref=wrapper_ref
                on:click=on_container_click
                on:pointerdown=on_pointerdown
            >
                <div class="mat-mdc-form-field-flex">
                    <div class="mdc-notched-outline" node_ref=outline_ref>
                        <div class="mdc-notched-outline__leading"></div>
                        <div class="mdc-notched-outline__notch" node_ref=notch_ref></div>
                        <div class="mdc-notched-outline__trailing"></div>
                    </div>
                    {icon_prefix.map(|children| view! {
                        <div class="mat-mdc-form-field-icon-prefix" node_ref=icon_prefix_ref>
                            {children()}
                        </div>
                    })}
                    {text_prefix.map(|children| view! {
                        <div class="mat-mdc-form-field-text-prefix" node_ref=text_prefix_ref>
                            {children()}
                        </div>
                    })}
                    <div class="mat-mdc-form-field-infix">
                        {label.map(|text| view! {
                            <label
                                class="mdc-floating-label mat-mdc-floating-label"
                                for=control_id.clone()
                                node_ref=label_ref
                            >
                                {text}
                            </label>
                        })}
                        {children()}
                    </div>
                    {text_suffix.map(|children| view! {
                        <div class="mat-mdc-form-field-text-suffix" node_ref=text_suffix_ref>
                            {children()}
                        </div>
                    })}
                    {icon_suffix.map(|children| view! {
                        <div class="mat-mdc-form-field-icon-suffix" node_ref=icon_suffix_ref>
                            {children()}
                        </div>
                    })}
                </div>
                <div
                    class="mdc-line-ripple"
                    node_ref=ripple_ref
                    on:transitionend=on_transition_end
                ></div>
            </div>
            <div class=subscript_class>
                <div class="mat-mdc-form-field-hint-wrapper">{subscript}</div>
            </div>
        </div>
    }
}
