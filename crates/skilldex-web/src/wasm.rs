#![forbid(unsafe_code)]

use std::cell::Cell;
use std::rc::{Rc, Weak};

use skilldex_core::logging::init_logging;
use skilldex_core::{NavOrigin, RenderOutcome, Route, Skilldex, SkilldexConfig, SystemClock};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget};

use crate::action::Action;
use crate::console::BrowserConsoleSink;
use crate::dom::{self, Dom};
use crate::fetch::HttpSource;
use crate::lifecycle::Lifecycle;
use crate::storage::LocalStorageBackend;

type App = Skilldex<HttpSource, LocalStorageBackend, SystemClock>;

/// Shared by the exported handle, event listeners and pending renders.
struct Runtime {
    app: App,
    dom: Dom,
    lifecycle: Cell<Lifecycle>,
}

impl Runtime {
    fn is_live(&self) -> bool {
        self.lifecycle.get().is_live()
    }

    fn present(&self, outcome: RenderOutcome) {
        if !self.is_live() {
            return;
        }
        if let RenderOutcome::Rendered(page) = outcome {
            self.dom.present(&page);
        }
    }

    fn navigate(self: &Rc<Self>, route: Route, origin: NavOrigin) {
        let runtime = Rc::clone(self);
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = runtime.app.navigate(route, origin).await;
            runtime.present(outcome);
        });
    }

    fn dispatch(self: &Rc<Self>, action: Action) {
        match action {
            Action::ShowSkill(id) => self.navigate(Route::Skill(id), NavOrigin::Link),
            Action::Home => self.navigate(Route::List, NavOrigin::Link),
            Action::Sort(column) => {
                if let Some(page) = self.app.sort_by(column) {
                    self.dom.present(&page);
                }
            }
            Action::ToggleFilter(on) => {
                if let Some(page) = self.app.set_filter(on) {
                    self.dom.present(&page);
                }
            }
            Action::ToggleScaling => {
                if let Some(toggle) = self.app.toggle_scaling() {
                    self.dom.apply_scaling(toggle);
                }
            }
        }
    }
}

/// A registered DOM listener, removed on [`SkilldexWeb::destroy`].
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn install(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }

    fn remove(self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// Skill browser bound to the current document.
///
/// ```js
/// const browser = new SkilldexWeb({ skills_path: "skills.json" });
/// browser.start();
/// ```
#[wasm_bindgen]
pub struct SkilldexWeb {
    runtime: Rc<Runtime>,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl SkilldexWeb {
    /// `options` is a plain object with any subset of the configuration
    /// fields; missing fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<JsValue>) -> Result<SkilldexWeb, JsValue> {
        let config = read_config(options)?;
        init_logging(BrowserConsoleSink, config.level());

        let dom = Dom::attach(&config.elements)?;
        let app = Skilldex::new(config, HttpSource, LocalStorageBackend::new(), SystemClock);
        Ok(Self {
            runtime: Rc::new(Runtime {
                app,
                dom,
                lifecycle: Cell::new(Lifecycle::Created),
            }),
            listeners: Vec::new(),
        })
    }

    /// Install event listeners and render the page for the current URL.
    /// Calling it while running has no effect; after `destroy()` it starts
    /// afresh.
    pub fn start(&mut self) -> Result<(), JsValue> {
        if !self.runtime.lifecycle.get().can_start() {
            return Ok(());
        }
        let document: &EventTarget = self.runtime.dom.document();
        let window: &EventTarget = self.runtime.dom.window();

        let weak = Rc::downgrade(&self.runtime);
        self.listeners.push(Listener::install(document, "click", move |event| {
            on_event(&weak, &event, "click");
        })?);
        let weak = Rc::downgrade(&self.runtime);
        self.listeners.push(Listener::install(document, "change", move |event| {
            on_event(&weak, &event, "change");
        })?);
        let weak = Rc::downgrade(&self.runtime);
        self.listeners.push(Listener::install(window, "popstate", move |_event| {
            if let Some(runtime) = weak.upgrade() {
                let route = Route::from_query(&runtime.dom.query(), &runtime.app.config().query_param);
                runtime.navigate(route, NavOrigin::History);
            }
        })?);

        self.runtime.lifecycle.set(Lifecycle::Running);
        let runtime = Rc::clone(&self.runtime);
        wasm_bindgen_futures::spawn_local(async move {
            let query = runtime.dom.query();
            let outcome = runtime.app.start(&query).await;
            runtime.present(outcome);
        });
        Ok(())
    }

    /// Remove listeners and stop presenting. Pending renders are dropped.
    pub fn destroy(&mut self) {
        self.runtime.lifecycle.set(Lifecycle::Destroyed);
        for listener in self.listeners.drain(..) {
            listener.remove();
        }
    }
}

fn on_event(runtime: &Weak<Runtime>, event: &Event, event_type: &str) {
    let Some(runtime) = runtime.upgrade() else {
        return;
    };
    if !runtime.is_live() {
        return;
    }
    let Some(action) = dom::action_for(event) else {
        return;
    };
    if action.event_type() != event_type {
        return;
    }
    if action.is_navigation() {
        event.prevent_default();
    }
    tracing::debug!(?action, "dispatch");
    runtime.dispatch(action);
}

fn read_config(options: Option<JsValue>) -> Result<SkilldexConfig, JsValue> {
    let Some(options) = options.filter(|o| !o.is_undefined() && !o.is_null()) else {
        return Ok(SkilldexConfig::default());
    };
    let json: String = js_sys::JSON::stringify(&options)?.into();
    SkilldexConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))
}
