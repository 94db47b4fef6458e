//! Host seam for reading the static JSON resources.
//!
//! The browser host implements [`SkillSource`] on top of `fetch`; tests and
//! offline tooling use [`MemorySource`].

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::error::FetchError;

/// Read access to static resources by relative path.
///
/// Implementations are single-threaded; futures need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait SkillSource {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// GET the resource and return its body as text.
    async fn get_text(&self, path: &str) -> Result<String, FetchError>;

    /// HEAD the resource; `Ok(())` means it exists. The body is never read.
    async fn probe(&self, path: &str) -> Result<(), FetchError>;
}

/// In-memory resource map for testing and offline rendering.
///
/// Counts requests so tests can assert how many probes a code path issued.
#[derive(Default)]
pub struct MemorySource {
    files: RefCell<HashMap<String, String>>,
    gets: Cell<usize>,
    probes: Cell<usize>,
    yields: Cell<usize>,
}

/// Returns `Pending` a fixed number of times before completing.
struct YieldNow(usize);

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 == 0 {
            return Poll::Ready(());
        }
        self.0 -= 1;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a resource.
    #[must_use]
    pub fn with_file(self, path: impl Into<String>, body: impl Into<String>) -> Self {
        self.insert(path, body);
        self
    }

    pub fn insert(&self, path: impl Into<String>, body: impl Into<String>) {
        self.files.borrow_mut().insert(path.into(), body.into());
    }

    pub fn remove(&self, path: &str) -> Option<String> {
        self.files.borrow_mut().remove(path)
    }

    /// Number of GET requests served so far.
    #[must_use]
    pub fn get_count(&self) -> usize {
        self.gets.get()
    }

    /// Number of HEAD probes served so far.
    #[must_use]
    pub fn probe_count(&self) -> usize {
        self.probes.get()
    }

    /// Make every later request suspend `polls` times before answering,
    /// so callers can interleave overlapping requests.
    pub fn set_yields(&self, polls: usize) {
        self.yields.set(polls);
    }

    pub fn reset_counts(&self) {
        self.gets.set(0);
        self.probes.set(0);
    }
}

impl SkillSource for MemorySource {
    fn name(&self) -> &str {
        "MemorySource"
    }

    async fn get_text(&self, path: &str) -> Result<String, FetchError> {
        self.gets.set(self.gets.get() + 1);
        YieldNow(self.yields.get()).await;
        self.files
            .borrow()
            .get(path)
            .cloned()
            .ok_or(FetchError::Status(404))
    }

    async fn probe(&self, path: &str) -> Result<(), FetchError> {
        self.probes.set(self.probes.get() + 1);
        YieldNow(self.yields.get()).await;
        if self.files.borrow().contains_key(path) {
            Ok(())
        } else {
            Err(FetchError::Status(404))
        }
    }
}

impl fmt::Debug for MemorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySource")
            .field("files", &self.files.borrow().len())
            .field("gets", &self.gets.get())
            .field("probes", &self.probes.get())
            .finish()
    }
}
