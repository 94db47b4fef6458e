//! Presenting pages into the document.

use skilldex_core::config::ElementIds;
use skilldex_core::detail_view::{HIDDEN_CLASS, SCALING_CONTAINER_ID, SCALING_TOGGLE_ID, ScalingToggle};
use skilldex_core::{HistoryUpdate, Page};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Window};

use crate::action::{
    ACTION_ATTR, ACTION_SELECTOR, Action, COLUMN_ATTR, SKILL_ID_ATTR, history_url,
};

/// Best-effort text for a thrown JS value.
pub(crate) fn js_error_message(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{value:?}")
}

fn js_error(message: impl AsRef<str>) -> JsValue {
    JsValue::from_str(message.as_ref())
}

/// The three elements a page renders into.
#[derive(Debug)]
pub(crate) struct Dom {
    window: Window,
    document: Document,
    title: Element,
    breadcrumb: Element,
    content: Element,
}

impl Dom {
    pub(crate) fn attach(ids: &ElementIds) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
        let document = window.document().ok_or_else(|| js_error("no document"))?;
        let find = |id: &str| {
            document
                .get_element_by_id(id)
                .ok_or_else(|| js_error(format!("missing element #{id}")))
        };
        Ok(Self {
            title: find(&ids.title)?,
            breadcrumb: find(&ids.breadcrumb)?,
            content: find(&ids.content)?,
            window,
            document,
        })
    }

    pub(crate) fn window(&self) -> &Window {
        &self.window
    }

    pub(crate) fn document(&self) -> &Document {
        &self.document
    }

    /// Current `location.search`, empty when unreadable.
    pub(crate) fn query(&self) -> String {
        self.window.location().search().unwrap_or_default()
    }

    pub(crate) fn present(&self, page: &Page) {
        self.title.set_text_content(Some(page.title.as_str()));
        self.document.set_title(&page.title);
        self.breadcrumb.set_inner_html(&page.breadcrumb_html);
        self.content.set_inner_html(&page.content_html);
        if let Err(e) = self.apply_history(&page.history) {
            tracing::warn!(error = %js_error_message(&e), "history update failed");
        }
    }

    fn apply_history(&self, update: &HistoryUpdate) -> Result<(), JsValue> {
        let (query, replace) = match update {
            HistoryUpdate::None => return Ok(()),
            HistoryUpdate::Push(query) => (query, false),
            HistoryUpdate::Replace(query) => (query, true),
        };
        let pathname = self.window.location().pathname()?;
        let url = history_url(&pathname, query);
        let history = self.window.history()?;
        if replace {
            history.replace_state_with_url(&JsValue::NULL, "", Some(url.as_str()))
        } else {
            history.push_state_with_url(&JsValue::NULL, "", Some(url.as_str()))
        }
    }

    /// Update the scaling section in place.
    pub(crate) fn apply_scaling(&self, toggle: ScalingToggle) {
        if let Some(container) = self.document.get_element_by_id(SCALING_CONTAINER_ID)
            && let Err(e) = container
                .class_list()
                .toggle_with_force(HIDDEN_CLASS, toggle.hidden)
        {
            tracing::debug!(error = %js_error_message(&e), "scaling toggle failed");
        }
        if let Some(button) = self.document.get_element_by_id(SCALING_TOGGLE_ID) {
            button.set_text_content(Some(toggle.label));
        }
    }
}

/// Action of the element an event targeted, if any.
pub(crate) fn action_for(event: &web_sys::Event) -> Option<Action> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let element = target.closest(ACTION_SELECTOR).ok()??;
    let action = element.get_attribute(ACTION_ATTR)?;
    let checked = element
        .dyn_ref::<web_sys::HtmlInputElement>()
        .is_some_and(web_sys::HtmlInputElement::checked);
    Action::parse(
        &action,
        element.get_attribute(SKILL_ID_ATTR).as_deref(),
        element.get_attribute(COLUMN_ATTR).as_deref(),
        checked,
    )
}
