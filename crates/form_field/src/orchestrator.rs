//! Field orchestrator: derives field state from the control and pushes it to the visual parts.
//!
//! [`FormField`] owns the floating label, line ripple, and notched outline and reads the
//! embedded control only through [`FormFieldControl`]. Mutators never re-render anything
//! themselves; they return [`FieldEffect`]s for the host:
//!
//! - [`FieldEffect::MarkForCheck`]: derived state changed, re-render bindings that read it.
//! - [`FieldEffect::ScheduleStableTick`]: call [`FormField::on_stable`] once the host is idle.
//!
//! Offset updates are coalesced behind a dirty flag so any number of structural changes
//! between two idle ticks measure the prefix once.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use form_field_contract::{ControlState, Direction, FormFieldControl, Subscription};
use tracing::{debug, trace};

use crate::{
    classes::{field_host_classes, text_field_classes, DerivedState},
    config::{
        FieldAppearance, FloatLabelMode, FormFieldConfig, SubscriptSizing, ThemePalette,
    },
    dom::{measured_width, ElementRef},
    error::FormFieldError,
    floating_label::FloatingLabel,
    ids::{IdGenerator, HINT_ID_PREFIX, LABEL_ID_PREFIX},
    line_ripple::LineRipple,
    notched_outline::{NotchGeometry, NotchedOutline},
    offset::compute_label_offset,
    subscript::{DisplayedMessages, ErrorEntry, HintEntry, SubscriptManager},
};

/// Idle ticks spent waiting on a detached root before the field stops polling and waits for
/// [`FormField::on_attached`] or another structural change.
pub const DETACHED_RETRY_LIMIT: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Side effects the host must carry out after a mutator returns.
pub enum FieldEffect {
    /// Re-render bindings that read derived field state.
    MarkForCheck,
    /// Invoke [`FormField::on_stable`] on the next idle tick.
    ScheduleStableTick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Lifecycle phase of a field.
pub enum FieldPhase {
    /// Created, waiting for [`FormField::initialize`].
    Uninitialized,
    /// Synchronizing with a control.
    Active,
    /// Torn down; every operation is a no-op.
    Destroyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Focus as last observed by the field.
pub enum FocusState {
    /// No state change processed yet.
    #[default]
    Unknown,
    /// Control focused.
    Focused,
    /// Control blurred.
    Blurred,
}

/// `true` when the control asks for a floating label or the mode forces it.
pub fn label_should_float(control_should_float: bool, mode: FloatLabelMode) -> bool {
    control_should_float || mode == FloatLabelMode::Always
}

/// Elements and visual parts rendered for one field.
pub struct FieldParts {
    root: ElementRef,
    text_field: Option<ElementRef>,
    floating_label: Option<FloatingLabel>,
    line_ripple: Option<LineRipple>,
    notched_outline: Option<NotchedOutline>,
    icon_prefix: Option<ElementRef>,
    text_prefix: Option<ElementRef>,
    icon_suffix: Option<ElementRef>,
    text_suffix: Option<ElementRef>,
}

impl FieldParts {
    /// Parts of a field rendered into `root` with no label, ripple, or outline.
    pub fn new(root: ElementRef) -> Self {
        Self {
            root,
            text_field: None,
            floating_label: None,
            line_ripple: None,
            notched_outline: None,
            icon_prefix: None,
            text_prefix: None,
            icon_suffix: None,
            text_suffix: None,
        }
    }

    /// Sets the `mdc-text-field` wrapper element.
    pub fn with_text_field(mut self, element: ElementRef) -> Self {
        self.text_field = Some(element);
        self
    }

    /// Adds a floating label.
    pub fn with_floating_label(mut self, element: ElementRef) -> Self {
        self.floating_label = Some(FloatingLabel::new(element));
        self
    }

    /// Adds a line ripple.
    pub fn with_line_ripple(mut self, element: ElementRef) -> Self {
        self.line_ripple = Some(LineRipple::new(element));
        self
    }

    /// Adds a notched outline; call after [`FieldParts::with_floating_label`] so the outline
    /// knows whether a label is projected.
    pub fn with_notched_outline(mut self, outline: ElementRef, notch: ElementRef) -> Self {
        let has_label = self.floating_label.is_some();
        self.notched_outline = Some(NotchedOutline::new(outline, notch, has_label));
        self
    }

    /// Sets the prefix containers.
    pub fn with_prefixes(mut self, icon: Option<ElementRef>, text: Option<ElementRef>) -> Self {
        self.icon_prefix = icon;
        self.text_prefix = text;
        self
    }

    /// Sets the suffix containers.
    pub fn with_suffixes(mut self, icon: Option<ElementRef>, text: Option<ElementRef>) -> Self {
        self.icon_suffix = icon;
        self.text_suffix = text;
        self
    }

    fn has_prefix(&self) -> bool {
        self.icon_prefix.is_some() || self.text_prefix.is_some()
    }

    fn destroy(&mut self) {
        if let Some(label) = self.floating_label.as_mut() {
            label.destroy();
        }
        if let Some(ripple) = self.line_ripple.as_mut() {
            ripple.destroy();
        }
        if let Some(outline) = self.notched_outline.as_mut() {
            outline.destroy();
        }
        self.text_field = None;
        self.icon_prefix = None;
        self.text_prefix = None;
        self.icon_suffix = None;
        self.text_suffix = None;
    }
}

/// Visual-state synchronization engine of one form field.
pub struct FormField {
    config: FormFieldConfig,
    label_id: String,
    parts: FieldParts,
    subscript: SubscriptManager,
    control: Option<Rc<dyn FormFieldControl>>,
    subscription: Option<Subscription>,
    phase: FieldPhase,
    focus: FocusState,
    direction: Direction,
    derived: DerivedState,
    control_type: Option<String>,
    described_by: Option<Vec<String>>,
    applied_root_classes: Vec<String>,
    applied_wrapper_classes: Vec<&'static str>,
    needs_label_offset_update: bool,
    stable_tick_scheduled: bool,
    detached_retries: u32,
}

impl FormField {
    /// Creates an uninitialized field; label and hint-label ids are drawn from `ids`.
    pub fn new(config: FormFieldConfig, ids: &IdGenerator, parts: FieldParts) -> Self {
        let label_id = ids.next_id(LABEL_ID_PREFIX);
        let subscript = SubscriptManager::new(ids.next_id(HINT_ID_PREFIX), config.validation)
            .with_hint_label(config.hint_label.clone())
            .with_sizing(config.subscript_sizing);
        let derived = DerivedState {
            has_outline: config.appearance == FieldAppearance::Outline,
            has_floating_label: parts.floating_label.is_some(),
            has_icon_prefix: parts.icon_prefix.is_some(),
            has_icon_suffix: parts.icon_suffix.is_some(),
            ..DerivedState::default()
        };
        Self {
            config,
            label_id,
            parts,
            subscript,
            control: None,
            subscription: None,
            phase: FieldPhase::Uninitialized,
            focus: FocusState::Unknown,
            direction: Direction::default(),
            derived,
            control_type: None,
            described_by: None,
            applied_root_classes: Vec::new(),
            applied_wrapper_classes: Vec::new(),
            needs_label_offset_update: false,
            stable_tick_scheduled: false,
            detached_retries: 0,
        }
    }

    /// Attaches the control and performs the first synchronization.
    ///
    /// # Errors
    ///
    /// - [`FormFieldError::MissingControl`] when `control` is `None`.
    /// - [`FormFieldError::DuplicatedHint`] when the projected hints are invalid.
    /// - [`FormFieldError::Destroyed`] after [`FormField::destroy`].
    pub fn initialize(
        &mut self,
        control: Option<Rc<dyn FormFieldControl>>,
    ) -> Result<Vec<FieldEffect>, FormFieldError> {
        match self.phase {
            FieldPhase::Destroyed => return Err(FormFieldError::Destroyed),
            FieldPhase::Active => return Ok(Vec::new()),
            FieldPhase::Uninitialized => {}
        }
        let control = control.ok_or(FormFieldError::MissingControl)?;
        self.subscript.validate()?;
        debug!(label_id = %self.label_id, control_id = %control.id(), "form field initialized");
        self.control = Some(control);
        self.phase = FieldPhase::Active;

        let mut effects = self.sync_from_control();
        self.refresh_outline_notch_width();
        if self.has_outline() || self.needs_label_offset_update {
            effects.extend(self.request_label_offset_update());
        }
        Ok(effects)
    }

    /// Recompute-and-notify entry point, run on every control `state_changes` event.
    ///
    /// Focus is updated first, then the described-by ids, then the visual parts.
    pub fn handle_state_changes(&mut self) -> Vec<FieldEffect> {
        if self.phase != FieldPhase::Active {
            return Vec::new();
        }
        self.sync_from_control()
    }

    fn sync_from_control(&mut self) -> Vec<FieldEffect> {
        let Some(control) = self.control.clone() else {
            return Vec::new();
        };
        let state = control.snapshot();
        self.update_focus_state(state.focused);
        self.sync_described_by_ids(&*control, &state);
        self.control_type = state.control_type.clone();
        self.apply_visual_state(&state);
        vec![FieldEffect::MarkForCheck]
    }

    fn update_focus_state(&mut self, focused: bool) {
        match (focused, self.focus) {
            (true, FocusState::Unknown | FocusState::Blurred) => {
                trace!("form field focused");
                self.focus = FocusState::Focused;
                if let Some(ripple) = self.parts.line_ripple.as_mut() {
                    ripple.activate();
                }
            }
            (false, FocusState::Unknown | FocusState::Focused) => {
                trace!("form field blurred");
                self.focus = FocusState::Blurred;
                if let Some(ripple) = self.parts.line_ripple.as_mut() {
                    ripple.deactivate();
                }
            }
            _ => {}
        }
    }

    fn sync_described_by_ids(&mut self, control: &dyn FormFieldControl, state: &ControlState) {
        let ids = self.subscript.described_by(state);
        if self.described_by.as_ref() == Some(&ids) {
            return;
        }
        trace!(?ids, "described-by ids changed");
        control.set_described_by_ids(&ids);
        self.described_by = Some(ids);
    }

    fn derive(&self, state: &ControlState) -> DerivedState {
        DerivedState {
            focused: state.focused,
            empty: state.empty,
            disabled: state.disabled,
            invalid: state.error_state,
            autofilled: state.autofilled,
            label_should_float: label_should_float(
                state.should_label_float,
                self.config.float_label,
            ),
            has_outline: self.config.appearance == FieldAppearance::Outline,
            has_floating_label: self.parts.floating_label.is_some(),
            has_icon_prefix: self.parts.icon_prefix.is_some(),
            has_icon_suffix: self.parts.icon_suffix.is_some(),
        }
    }

    fn apply_visual_state(&mut self, state: &ControlState) {
        self.derived = self.derive(state);
        let floated = self.derived.label_floated();
        if let Some(label) = self.parts.floating_label.as_mut() {
            label.set_floating(floated);
            label.set_required(state.required && !self.config.hide_required_marker);
        }
        self.refresh_outline_notch_width();
        self.apply_host_classes();
    }

    fn apply_host_classes(&mut self) {
        let root_classes =
            field_host_classes(&self.derived, &self.config, self.control_type.as_deref());
        for stale in self
            .applied_root_classes
            .iter()
            .filter(|class| !root_classes.contains(class))
        {
            self.parts.root.remove_class(stale);
        }
        for class in &root_classes {
            self.parts.root.add_class(class);
        }
        self.applied_root_classes = root_classes;

        let Some(wrapper) = self.parts.text_field.as_ref() else {
            return;
        };
        let wrapper_classes = text_field_classes(&self.derived, &self.config);
        for stale in self
            .applied_wrapper_classes
            .iter()
            .filter(|class| !wrapper_classes.contains(class))
        {
            wrapper.remove_class(stale);
        }
        for class in &wrapper_classes {
            wrapper.add_class(class);
        }
        self.applied_wrapper_classes = wrapper_classes;
    }

    /// Re-measures the label and opens or closes the notch. Runs after label content
    /// mutations and on first attachment.
    pub fn refresh_outline_notch_width(&mut self) {
        let open = self.has_outline() && self.derived.label_floated();
        let width = self
            .parts
            .floating_label
            .as_ref()
            .map(FloatingLabel::get_width)
            .unwrap_or(0.0);
        let Some(outline) = self.parts.notched_outline.as_mut() else {
            return;
        };
        if open {
            outline.notch(width);
        } else {
            outline.close();
        }
    }

    /// Marks the prefix offset dirty. Returns [`FieldEffect::ScheduleStableTick`] only when no
    /// tick is pending yet.
    pub fn request_label_offset_update(&mut self) -> Vec<FieldEffect> {
        self.detached_retries = 0;
        self.schedule_label_offset_update()
    }

    fn schedule_label_offset_update(&mut self) -> Vec<FieldEffect> {
        if self.phase == FieldPhase::Destroyed {
            return Vec::new();
        }
        self.needs_label_offset_update = true;
        if self.stable_tick_scheduled {
            return Vec::new();
        }
        self.stable_tick_scheduled = true;
        vec![FieldEffect::ScheduleStableTick]
    }

    /// The host could not run a tick it was asked for. A pending offset update is kept and the
    /// next request schedules a fresh tick.
    pub fn stable_tick_dropped(&mut self) {
        if self.stable_tick_scheduled {
            debug!(label_id = %self.label_id, "stable tick dropped by host");
        }
        self.stable_tick_scheduled = false;
    }

    /// Whether a [`FieldEffect::ScheduleStableTick`] was handed out and has not run yet.
    pub fn stable_tick_pending(&self) -> bool {
        self.stable_tick_scheduled
    }

    /// Idle-tick hook: runs a pending offset update once.
    pub fn on_stable(&mut self) -> Vec<FieldEffect> {
        self.stable_tick_scheduled = false;
        if self.phase != FieldPhase::Active || !self.needs_label_offset_update {
            return Vec::new();
        }
        self.needs_label_offset_update = false;
        self.update_outline_label_offset()
    }

    fn update_outline_label_offset(&mut self) -> Vec<FieldEffect> {
        if !self.has_outline() || self.parts.floating_label.is_none() {
            return Vec::new();
        }
        if !self.parts.root.is_attached() {
            if self.detached_retries >= DETACHED_RETRY_LIMIT {
                debug!(label_id = %self.label_id, "field still detached; waiting for attachment");
                self.needs_label_offset_update = true;
                return Vec::new();
            }
            self.detached_retries += 1;
            trace!(label_id = %self.label_id, "field detached; deferring label offset update");
            return self.schedule_label_offset_update();
        }
        self.detached_retries = 0;
        // Anything measured while detached read zero.
        self.refresh_outline_notch_width();
        let direction = self.direction;
        let parts = &mut self.parts;
        let Some(label) = parts.floating_label.as_mut() else {
            return Vec::new();
        };
        if !(parts.icon_prefix.is_some() || parts.text_prefix.is_some()) {
            label.set_horizontal_offset(None);
            return Vec::new();
        }
        let width_of = |element: &Option<ElementRef>| {
            element
                .as_ref()
                .map(|element| measured_width(element.as_ref()))
                .unwrap_or(0.0)
        };
        let prefix_width = width_of(&parts.icon_prefix) + width_of(&parts.text_prefix);
        let suffix_width = width_of(&parts.icon_suffix) + width_of(&parts.text_suffix);
        let offset = compute_label_offset(prefix_width, direction);
        trace!(pixels = offset.pixels, "label offset updated");
        label.set_horizontal_offset(Some(offset));
        if let Some(outline) = parts.notched_outline.as_ref() {
            outline.set_max_width(&parts.root, prefix_width + suffix_width);
        }
        Vec::new()
    }

    fn resync(&mut self, mut effects: Vec<FieldEffect>) -> Vec<FieldEffect> {
        if self.phase == FieldPhase::Active {
            effects.extend(self.sync_from_control());
        } else if self.phase == FieldPhase::Uninitialized {
            self.apply_host_classes();
            effects.push(FieldEffect::MarkForCheck);
        }
        dedup_effects(effects)
    }

    /// Changes the appearance; switching to outline schedules an offset update.
    pub fn set_appearance(&mut self, appearance: FieldAppearance) -> Vec<FieldEffect> {
        if self.phase == FieldPhase::Destroyed || self.config.appearance == appearance {
            return Vec::new();
        }
        self.config.appearance = appearance;
        self.derived.has_outline = appearance == FieldAppearance::Outline;
        let mut effects = Vec::new();
        if appearance == FieldAppearance::Outline {
            effects.extend(self.request_label_offset_update());
        } else if let Some(label) = self.parts.floating_label.as_mut() {
            label.set_horizontal_offset(None);
        }
        self.resync(effects)
    }

    /// Changes the label floating policy.
    pub fn set_float_label(&mut self, mode: FloatLabelMode) -> Vec<FieldEffect> {
        if self.phase == FieldPhase::Destroyed || self.config.float_label == mode {
            return Vec::new();
        }
        self.config.float_label = mode;
        self.resync(Vec::new())
    }

    /// Shows or hides the required marker.
    pub fn set_hide_required_marker(&mut self, hide: bool) -> Vec<FieldEffect> {
        if self.phase == FieldPhase::Destroyed || self.config.hide_required_marker == hide {
            return Vec::new();
        }
        self.config.hide_required_marker = hide;
        self.resync(Vec::new())
    }

    /// Changes the palette.
    pub fn set_color(&mut self, color: ThemePalette) -> Vec<FieldEffect> {
        if self.phase == FieldPhase::Destroyed || self.config.color == color {
            return Vec::new();
        }
        self.config.color = color;
        self.resync(Vec::new())
    }

    /// Changes the subscript sizing.
    pub fn set_subscript_sizing(&mut self, sizing: SubscriptSizing) -> Vec<FieldEffect> {
        if self.phase == FieldPhase::Destroyed || self.config.subscript_sizing == sizing {
            return Vec::new();
        }
        self.config.subscript_sizing = sizing;
        self.subscript.set_sizing(sizing);
        vec![FieldEffect::MarkForCheck]
    }

    /// Replaces the implicit hint text.
    ///
    /// # Errors
    ///
    /// Returns [`FormFieldError::DuplicatedHint`] when a start hint is already projected.
    pub fn set_hint_label(
        &mut self,
        hint_label: Option<String>,
    ) -> Result<Vec<FieldEffect>, FormFieldError> {
        if self.phase == FieldPhase::Destroyed {
            return Ok(Vec::new());
        }
        self.subscript.set_hint_label(hint_label.clone())?;
        self.config.hint_label = hint_label;
        Ok(self.resync(Vec::new()))
    }

    /// Replaces the projected hints.
    ///
    /// # Errors
    ///
    /// Returns [`FormFieldError::DuplicatedHint`] for a second hint in either slot.
    pub fn set_hints(&mut self, hints: Vec<HintEntry>) -> Result<Vec<FieldEffect>, FormFieldError> {
        if self.phase == FieldPhase::Destroyed {
            return Ok(Vec::new());
        }
        self.subscript.set_hints(hints)?;
        Ok(self.resync(Vec::new()))
    }

    /// Replaces the projected errors.
    pub fn set_errors(&mut self, errors: Vec<ErrorEntry>) -> Vec<FieldEffect> {
        if self.phase == FieldPhase::Destroyed {
            return Vec::new();
        }
        self.subscript.set_errors(errors);
        self.resync(Vec::new())
    }

    /// Records a directionality change.
    pub fn set_direction(&mut self, direction: Direction) -> Vec<FieldEffect> {
        if self.phase == FieldPhase::Destroyed || self.direction == direction {
            return Vec::new();
        }
        self.direction = direction;
        self.request_label_offset_update()
    }

    /// Replaces the prefix containers after projected content changed.
    pub fn set_prefix_containers(
        &mut self,
        icon: Option<ElementRef>,
        text: Option<ElementRef>,
    ) -> Vec<FieldEffect> {
        if self.phase == FieldPhase::Destroyed {
            return Vec::new();
        }
        self.parts.icon_prefix = icon;
        self.parts.text_prefix = text;
        let effects = self.request_label_offset_update();
        self.resync(effects)
    }

    /// Replaces the suffix containers after projected content changed.
    pub fn set_suffix_containers(
        &mut self,
        icon: Option<ElementRef>,
        text: Option<ElementRef>,
    ) -> Vec<FieldEffect> {
        if self.phase == FieldPhase::Destroyed {
            return Vec::new();
        }
        self.parts.icon_suffix = icon;
        self.parts.text_suffix = text;
        let effects = self.request_label_offset_update();
        self.resync(effects)
    }

    /// The field root was newly connected to a document.
    pub fn on_attached(&mut self) -> Vec<FieldEffect> {
        self.refresh_outline_notch_width();
        self.request_label_offset_update()
    }

    /// The label's text content changed.
    pub fn on_label_content_changed(&mut self) {
        self.refresh_outline_notch_width();
    }

    /// Forwards a click on the field container to the control.
    pub fn on_container_click(&self) {
        if let Some(control) = self.control.as_ref() {
            control.on_container_click();
        }
    }

    /// Forwards the ripple's `transitionend` event.
    pub fn on_line_ripple_transition_end(&mut self) {
        if let Some(ripple) = self.parts.line_ripple.as_mut() {
            ripple.handle_transition_end();
        }
    }

    /// Releases every element, drops the control subscription, and enters
    /// [`FieldPhase::Destroyed`]. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        if self.phase == FieldPhase::Destroyed {
            return;
        }
        debug!(label_id = %self.label_id, "form field destroyed");
        if let Some(mut subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.parts.destroy();
        self.control = None;
        self.phase = FieldPhase::Destroyed;
        self.needs_label_offset_update = false;
        self.stable_tick_scheduled = false;
        self.detached_retries = 0;
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> FieldPhase {
        self.phase
    }

    /// Last observed focus.
    pub fn focus_state(&self) -> FocusState {
        self.focus
    }

    /// Derived booleans from the last synchronization.
    pub fn derived(&self) -> DerivedState {
        self.derived
    }

    /// Whether the label should float.
    pub fn label_should_float(&self) -> bool {
        self.derived.label_should_float
    }

    /// Whether the appearance is outline.
    pub fn has_outline(&self) -> bool {
        self.config.appearance == FieldAppearance::Outline
    }

    /// Current notch geometry; closed when there is no outline.
    pub fn notch_geometry(&self) -> NotchGeometry {
        self.parts
            .notched_outline
            .as_ref()
            .map(NotchedOutline::geometry)
            .unwrap_or_default()
    }

    /// Current signed label offset in pixels.
    pub fn label_horizontal_offset(&self) -> f64 {
        self.parts
            .floating_label
            .as_ref()
            .map(FloatingLabel::horizontal_offset)
            .unwrap_or(0.0)
    }

    /// Whether an offset update is pending.
    pub fn needs_label_offset_update(&self) -> bool {
        self.needs_label_offset_update
    }

    /// Whether the field has any prefix container.
    pub fn has_prefix(&self) -> bool {
        self.parts.has_prefix()
    }

    /// Id of the floating label element.
    pub fn label_id(&self) -> &str {
        &self.label_id
    }

    /// Id of the implicit hint element.
    pub fn hint_label_id(&self) -> &str {
        self.subscript.hint_label_id()
    }

    /// Embedded control, once initialized. Hosts clone it out before calling into the control
    /// so no field borrow is held while the control emits.
    pub fn control(&self) -> Option<Rc<dyn FormFieldControl>> {
        self.control.clone()
    }

    /// Resolved configuration.
    pub fn config(&self) -> &FormFieldConfig {
        &self.config
    }

    /// Hint and error collections.
    pub fn subscript(&self) -> &SubscriptManager {
        &self.subscript
    }

    /// Message kind currently rendered.
    pub fn displayed_messages(&self) -> DisplayedMessages {
        let state = self
            .control
            .as_ref()
            .map(|control| control.snapshot())
            .unwrap_or_default();
        self.subscript.displayed(&state)
    }

    /// Ids last pushed to the control.
    pub fn described_by_ids(&self) -> &[String] {
        self.described_by.as_deref().unwrap_or_default()
    }

    /// Root classes last applied.
    pub fn host_classes(&self) -> &[String] {
        &self.applied_root_classes
    }

    /// Floating label part, when rendered.
    pub fn floating_label(&self) -> Option<&FloatingLabel> {
        self.parts.floating_label.as_ref()
    }

    /// Line ripple part, when rendered.
    pub fn line_ripple(&self) -> Option<&LineRipple> {
        self.parts.line_ripple.as_ref()
    }

    /// Notched outline part, when rendered.
    pub fn notched_outline(&self) -> Option<&NotchedOutline> {
        self.parts.notched_outline.as_ref()
    }
}

impl std::fmt::Debug for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormField")
            .field("label_id", &self.label_id)
            .field("phase", &self.phase)
            .field("focus", &self.focus)
            .field("derived", &self.derived)
            .field("needs_label_offset_update", &self.needs_label_offset_update)
            .finish()
    }
}

fn dedup_effects(effects: Vec<FieldEffect>) -> Vec<FieldEffect> {
    let mut unique = Vec::with_capacity(effects.len());
    for effect in effects {
        if !unique.contains(&effect) {
            unique.push(effect);
        }
    }
    unique
}

/// Subscribes `field` to its control's `state_changes`, handing every batch of effects to
/// `on_effects`. The subscription lives in the field and ends with [`FormField::destroy`].
///
/// Notifications fired while the field is already borrowed are replayed once the running
/// update finishes.
///
/// # Errors
///
/// Returns [`FormFieldError::MissingControl`] when the field has not been initialized.
pub fn bind_state_changes(
    field: &Rc<RefCell<FormField>>,
    on_effects: impl Fn(Vec<FieldEffect>) + 'static,
) -> Result<(), FormFieldError> {
    let control = field
        .borrow()
        .control
        .clone()
        .ok_or(FormFieldError::MissingControl)?;
    let weak = Rc::downgrade(field);
    let replay = Rc::new(Cell::new(false));
    let subscription = control.state_changes().subscribe(move || {
        let Some(field) = weak.upgrade() else {
            return;
        };
        let Ok(mut guard) = field.try_borrow_mut() else {
            trace!("state change while field busy; replaying after current update");
            replay.set(true);
            return;
        };
        let mut effects = guard.handle_state_changes();
        while replay.replace(false) {
            effects.extend(guard.handle_state_changes());
        }
        drop(guard);
        let effects = dedup_effects(effects);
        if !effects.is_empty() {
            on_effects(effects);
        }
    });
    field.borrow_mut().subscription = Some(subscription);
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        classes::{LINE_RIPPLE_ACTIVE, NOTCHED_OUTLINE_NOTCHED},
        dom::MemoryElement,
        testing::StubControl,
        FieldElement,
    };

    struct Harness {
        root: MemoryElement,
        label: MemoryElement,
        ripple: MemoryElement,
        outline: MemoryElement,
        field: FormField,
        control: Rc<StubControl>,
    }

    fn harness(config: FormFieldConfig) -> Harness {
        let root = MemoryElement::new();
        root.set_attached(true);
        let label = MemoryElement::new();
        let ripple = MemoryElement::new();
        let outline = MemoryElement::new();
        let parts = FieldParts::new(root.handle())
            .with_floating_label(label.handle())
            .with_line_ripple(ripple.handle())
            .with_notched_outline(outline.handle(), MemoryElement::new().handle());
        let field = FormField::new(config, &IdGenerator::new(), parts);
        Harness {
            root,
            label,
            ripple,
            outline,
            field,
            control: Rc::new(StubControl::new("input-0")),
        }
    }

    impl Harness {
        fn init(&mut self) -> Vec<FieldEffect> {
            let control: Rc<dyn FormFieldControl> = self.control.clone();
            self.field.initialize(Some(control)).expect("initialize")
        }
    }

    #[test]
    fn label_should_float_is_pure_in_control_flag_and_mode() {
        for mode in [FloatLabelMode::Auto, FloatLabelMode::Always, FloatLabelMode::Never] {
            for control_flag in [false, true] {
                let expected = mode == FloatLabelMode::Always || control_flag;
                assert_eq!(label_should_float(control_flag, mode), expected);
            }
        }
    }

    #[test]
    fn initialize_without_control_is_fatal() {
        let mut h = harness(FormFieldConfig::default());
        assert_eq!(h.field.initialize(None), Err(FormFieldError::MissingControl));
        assert_eq!(h.field.phase(), FieldPhase::Uninitialized);
    }

    #[test]
    fn initialize_fails_on_destroyed_field() {
        let mut h = harness(FormFieldConfig::default());
        h.field.destroy();
        let control: Rc<dyn FormFieldControl> = h.control.clone();
        assert_eq!(h.field.initialize(Some(control)), Err(FormFieldError::Destroyed));
    }

    #[test]
    fn first_sync_blurs_unknown_focus_and_deactivates_ripple() {
        let mut h = harness(FormFieldConfig::default());
        let effects = h.init();

        assert_eq!(effects, vec![FieldEffect::MarkForCheck]);
        assert_eq!(h.field.focus_state(), FocusState::Blurred);
        assert!(!h.ripple.has_class(LINE_RIPPLE_ACTIVE));
        assert!(h.root.has_class("mat-form-field-appearance-fill"));
    }

    #[test]
    fn repeated_focus_events_activate_ripple_once() {
        let mut h = harness(FormFieldConfig::default());
        h.init();
        h.control.update(|state| state.focused = true);
        h.field.handle_state_changes();
        h.ripple.remove_class(LINE_RIPPLE_ACTIVE);
        h.field.handle_state_changes();

        assert_eq!(h.field.focus_state(), FocusState::Focused);
        assert!(!h.ripple.has_class(LINE_RIPPLE_ACTIVE));
    }

    #[test]
    fn required_marker_respects_hide_flag() {
        let mut h = harness(FormFieldConfig::default());
        h.init();
        h.control.update(|state| state.required = true);
        h.field.handle_state_changes();
        assert!(h.label.has_class(crate::classes::FLOATING_LABEL_REQUIRED));

        h.field.set_hide_required_marker(true);
        assert!(!h.label.has_class(crate::classes::FLOATING_LABEL_REQUIRED));
    }

    #[test]
    fn switching_to_fill_closes_notch_and_clears_offset() {
        let mut h = harness(FormFieldConfig::default().with_appearance(FieldAppearance::Outline));
        h.label.set_width(40.0);
        h.control.update(|state| state.should_label_float = true);
        h.init();
        assert!(h.outline.has_class(NOTCHED_OUTLINE_NOTCHED));

        h.field.set_appearance(FieldAppearance::Fill);
        assert!(!h.outline.has_class(NOTCHED_OUTLINE_NOTCHED));
        assert_eq!(h.field.label_horizontal_offset(), 0.0);
        assert!(h.root.has_class("mat-form-field-appearance-fill"));
        assert!(!h.root.has_class("mat-form-field-appearance-outline"));
    }

    #[test]
    fn offset_requests_coalesce_into_one_tick() {
        let mut h = harness(FormFieldConfig::default().with_appearance(FieldAppearance::Outline));
        let effects = h.init();
        assert!(effects.contains(&FieldEffect::ScheduleStableTick));

        assert_eq!(h.field.set_direction(Direction::Rtl), Vec::new());
        assert_eq!(h.field.on_attached(), Vec::new());
        assert!(h.field.needs_label_offset_update());

        assert_eq!(h.field.on_stable(), Vec::new());
        assert!(!h.field.needs_label_offset_update());
        assert_eq!(h.field.on_stable(), Vec::new());
    }

    #[test]
    fn dropped_tick_lets_the_next_request_schedule_again() {
        let mut h = harness(FormFieldConfig::default().with_appearance(FieldAppearance::Outline));
        let effects = h.init();
        assert!(effects.contains(&FieldEffect::ScheduleStableTick));
        assert_eq!(h.field.set_direction(Direction::Rtl), Vec::new());

        h.field.stable_tick_dropped();

        assert!(!h.field.stable_tick_pending());
        assert!(h.field.needs_label_offset_update());
        assert_eq!(
            h.field.set_direction(Direction::Ltr),
            vec![FieldEffect::ScheduleStableTick]
        );
    }

    #[test]
    fn detached_root_stops_polling_until_attached() {
        let mut h = harness(FormFieldConfig::default().with_appearance(FieldAppearance::Outline));
        h.root.set_attached(false);
        let mut effects = h.init();
        let mut ticks = 0;
        while effects.contains(&FieldEffect::ScheduleStableTick) {
            effects = h.field.on_stable();
            ticks += 1;
            assert!(ticks <= DETACHED_RETRY_LIMIT + 1);
        }

        assert_eq!(ticks, DETACHED_RETRY_LIMIT + 1);
        assert!(h.field.needs_label_offset_update());
        assert!(!h.field.stable_tick_pending());

        h.root.set_attached(true);
        assert_eq!(h.field.on_attached(), vec![FieldEffect::ScheduleStableTick]);
        assert_eq!(h.field.on_stable(), Vec::new());
        assert!(!h.field.needs_label_offset_update());
    }

    #[test]
    fn destroy_is_idempotent_and_stops_everything() {
        let mut h = harness(FormFieldConfig::default());
        h.init();
        h.field.destroy();
        h.field.destroy();

        h.control.update(|state| state.focused = true);
        assert_eq!(h.field.handle_state_changes(), Vec::new());
        assert_eq!(h.field.request_label_offset_update(), Vec::new());
        assert_eq!(h.field.set_errors(Vec::new()), Vec::new());
        assert!(!h.ripple.has_class(LINE_RIPPLE_ACTIVE));
        assert!(h.field.floating_label().is_some_and(FloatingLabel::is_destroyed));
    }

    #[test]
    fn bound_field_reacts_to_control_and_unbinds_on_destroy() {
        let mut h = harness(FormFieldConfig::default());
        h.init();
        let control = h.control.clone();
        let ripple = h.ripple.clone();
        let field = Rc::new(RefCell::new(h.field));
        let batches = Rc::new(Cell::new(0));
        {
            let batches = Rc::clone(&batches);
            bind_state_changes(&field, move |_| batches.set(batches.get() + 1))
                .expect("bind state changes");
        }

        control.update(|state| state.focused = true);
        assert!(ripple.has_class(LINE_RIPPLE_ACTIVE));
        assert_eq!(batches.get(), 1);
        assert_eq!(control.state_changes().listener_count(), 1);

        field.borrow_mut().destroy();
        assert_eq!(control.state_changes().listener_count(), 0);
        control.update(|state| state.focused = false);
        assert_eq!(batches.get(), 1);
    }
}
