//! Start/destroy state of an embedded browser.

/// Where a `SkilldexWeb` handle is in its life.
///
/// Events and finished renders reach the document only while
/// [`Running`](Self::Running). A destroyed handle can be started again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Created,
    Running,
    Destroyed,
}

impl Lifecycle {
    /// Whether `start` has work to do (listeners to install, a page to render).
    #[must_use]
    pub fn can_start(self) -> bool {
        self != Self::Running
    }

    #[must_use]
    pub fn is_live(self) -> bool {
        self == Self::Running
    }
}
