//! DOM mutation observers feeding label-content, prefix/suffix, and direction changes back
//! into the engine.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};

/// What a [`ContentObserver`] watches on its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservedChanges {
    /// Child list and text changes anywhere below the target.
    Content,
    /// Changes to the named attributes of the target itself.
    Attributes(Vec<String>),
}

/// Mutation observer that disconnects when dropped.
///
/// Off `wasm32` the observer is inert and never fires.
pub struct ContentObserver {
    #[cfg(target_arch = "wasm32")]
    observer: web_sys::MutationObserver,
    #[cfg(target_arch = "wasm32")]
    _callback: Closure<dyn FnMut()>,
}

impl ContentObserver {
    /// Starts observing `target`, calling `on_change` once per mutation batch.
    ///
    /// # Errors
    ///
    /// Returns an error when the browser refuses to create or start the observer.
    pub fn observe(
        target: &web_sys::Node,
        changes: ObservedChanges,
        on_change: impl FnMut() + 'static,
    ) -> Result<Self, String> {
        #[cfg(target_arch = "wasm32")]
        {
            let callback = Closure::<dyn FnMut()>::wrap(Box::new(on_change));
            let observer = web_sys::MutationObserver::new(callback.as_ref().unchecked_ref())
                .map_err(|e| format!("MutationObserver construction failed: {e:?}"))?;
            let init = web_sys::MutationObserverInit::new();
            match &changes {
                ObservedChanges::Content => {
                    init.set_child_list(true);
                    init.set_character_data(true);
                    init.set_subtree(true);
                }
                ObservedChanges::Attributes(names) => {
                    let filter = names
                        .iter()
                        .map(|name| wasm_bindgen::JsValue::from_str(name))
                        .collect::<js_sys::Array>();
                    init.set_attributes(true);
                    init.set_attribute_filter(&filter);
                }
            }
            observer
                .observe_with_options(target, &init)
                .map_err(|e| format!("MutationObserver.observe failed: {e:?}"))?;
            tracing::trace!(?changes, "content observer attached");
            Ok(Self {
                observer,
                _callback: callback,
            })
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (target, changes, on_change);
            Ok(Self {})
        }
    }

    /// Watches the `dir` attribute of the document element.
    ///
    /// # Errors
    ///
    /// Returns an error when there is no document or the observer cannot start.
    pub fn observe_document_direction(on_change: impl FnMut() + 'static) -> Result<Self, String> {
        #[cfg(target_arch = "wasm32")]
        {
            let root = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.document_element())
                .ok_or_else(|| "document element unavailable".to_string())?;
            Self::observe(
                root.as_ref(),
                ObservedChanges::Attributes(vec!["dir".to_string()]),
                on_change,
            )
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = on_change;
            Ok(Self {})
        }
    }

    /// Stops observing. Dropping the observer does the same.
    pub fn disconnect(&self) {
        #[cfg(target_arch = "wasm32")]
        self.observer.disconnect();
    }
}

impl Drop for ContentObserver {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl std::fmt::Debug for ContentObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentObserver").finish_non_exhaustive()
    }
}
