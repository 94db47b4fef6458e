//! `fetch`-backed [`SkillSource`].

use skilldex_core::error::FetchError;
use skilldex_core::source::SkillSource;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{RequestInit, Response};

use crate::dom::js_error_message;

/// Resolves resource paths relative to the page URL.
#[derive(Debug, Default)]
pub(crate) struct HttpSource;

impl HttpSource {
    async fn request(&self, method: &str, path: &str) -> Result<Response, FetchError> {
        let window = web_sys::window().ok_or_else(|| FetchError::Network("no window".into()))?;
        let init = RequestInit::new();
        init.set_method(method);

        let value = JsFuture::from(window.fetch_with_str_and_init(path, &init))
            .await
            .map_err(|e| FetchError::Network(js_error_message(&e)))?;
        let response: Response = value
            .dyn_into()
            .map_err(|_| FetchError::Network("fetch did not return a Response".into()))?;
        if !response.ok() {
            return Err(FetchError::Status(response.status()));
        }
        Ok(response)
    }
}

impl SkillSource for HttpSource {
    fn name(&self) -> &str {
        "fetch"
    }

    async fn get_text(&self, path: &str) -> Result<String, FetchError> {
        let response = self.request("GET", path).await?;
        let promise = response
            .text()
            .map_err(|e| FetchError::Body(js_error_message(&e)))?;
        let text = JsFuture::from(promise)
            .await
            .map_err(|e| FetchError::Body(js_error_message(&e)))?;
        text.as_string()
            .ok_or_else(|| FetchError::Body("body is not text".into()))
    }

    async fn probe(&self, path: &str) -> Result<(), FetchError> {
        self.request("HEAD", path).await.map(|_| ())
    }
}
