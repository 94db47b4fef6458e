#![forbid(unsafe_code)]

//! WASM frontend for Skilldex.
//!
//! Binds [`skilldex_core::Skilldex`] to the browser:
//! - `fetch` for the JSON resources (GET for bodies, HEAD for availability),
//! - `localStorage` for the availability cache,
//! - the document for presenting pages, plus `history` and `popstate` for
//!   deep links.
//!
//! Everything that does not need browser types lives in [`action`] and
//! [`lifecycle`] so it can be tested natively.

pub mod action;
pub mod lifecycle;

#[cfg(target_arch = "wasm32")]
mod console;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod fetch;
#[cfg(target_arch = "wasm32")]
mod storage;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::SkilldexWeb;

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct SkilldexWeb;

#[cfg(not(target_arch = "wasm32"))]
impl SkilldexWeb {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
