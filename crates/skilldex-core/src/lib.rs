#![forbid(unsafe_code)]

//! `skilldex-core` is the host-agnostic half of Skilldex, a browser for game
//! skill data.
//!
//! Design goals:
//! - **Host seams as traits**: resource reads ([`SkillSource`]), persistence
//!   ([`StorageBackend`]) and time ([`Clock`]) are supplied by the embedder.
//! - **Pages as data**: views render to HTML strings inside a [`Page`]; the
//!   host decides how to put them in the document.
//! - **Native-testable**: no DOM or browser types, so every rule runs under
//!   `cargo test`.
//!
//! `skilldex-web` wraps [`Skilldex`] with a `wasm-bindgen` API.

pub mod app;
pub mod availability;
pub mod clock;
pub mod config;
pub mod detail_view;
pub mod error;
pub mod html;
pub mod list_view;
pub mod logging;
pub mod model;
pub mod nav;
pub mod registry;
pub mod source;
pub mod storage;
pub mod taxonomy;

pub use app::{Page, RenderOutcome, Skilldex, View};
pub use availability::{AvailabilityCache, AvailabilityPolicy};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, ElementIds, SkilldexConfig};
pub use error::{FetchError, SkilldexError, SkilldexResult};
pub use list_view::{Column, ListState, SortDirection};
pub use nav::{HistoryUpdate, NavOrigin, Route};
pub use source::{MemorySource, SkillSource};
pub use storage::{MemoryStorage, NullStorage, StorageBackend, StorageError, StorageResult};
