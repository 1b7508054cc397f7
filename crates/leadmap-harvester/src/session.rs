//! Capability surface of the browser-automation collaborator.
//!
//! The harvest controller depends only on these traits, never on a
//! specific browser product. Implementations live outside this crate
//! (`leadmap-webdriver` for a real WebDriver endpoint, a scripted fake in
//! the tests).

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Element query addressing, mirroring the two selector languages the
/// target UI is probed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator<'a> {
    Css(&'a str),
    XPath(&'a str),
}

/// Automation failures, classified by how the harvest loop recovers.
///
/// Only [`AutomationError::SessionInit`] is fatal to a run. A `Timeout` is
/// a normal, expected outcome along several paths (end of pagination,
/// absent detail pane, absent field); `Stale` and `Backend` are contained
/// at entry granularity inside the loop.
#[derive(Debug, Error)]
pub enum AutomationError {
    #[error("failed to initialize automation session: {0}")]
    SessionInit(String),

    #[error("timed out waiting for {locator}")]
    Timeout { locator: String },

    #[error("element is no longer attached to the document")]
    Stale,

    #[error("automation backend error: {0}")]
    Backend(String),
}

impl AutomationError {
    /// Builds the timeout variant for a locator.
    #[must_use]
    pub fn timeout(locator: Locator<'_>) -> Self {
        let locator = match locator {
            Locator::Css(css) => format!("css `{css}`"),
            Locator::XPath(xpath) => format!("xpath `{xpath}`"),
        };
        Self::Timeout { locator }
    }
}

/// Handle to one DOM element.
///
/// Handles are snapshots: any navigation (including history back)
/// invalidates them, surfacing as [`AutomationError::Stale`] on later use.
#[async_trait]
pub trait Element: Send + Sync {
    /// Visible text of the element.
    async fn text(&self) -> Result<String, AutomationError>;

    /// Attribute value, `None` when the attribute is absent.
    async fn attribute(&self, name: &str) -> Result<Option<String>, AutomationError>;

    /// Activates the element.
    async fn click(&self) -> Result<(), AutomationError>;

    /// First matching descendant, `None` when nothing matches.
    async fn find_within(
        &self,
        locator: Locator<'_>,
    ) -> Result<Option<Box<dyn Element>>, AutomationError>;
}

/// One live browser-automation session.
///
/// All waiting is bounded polling against a condition with a fixed timeout
/// per wait; [`Session::pause`] is the only unconditional delay, used for
/// best-effort settling after navigation and scroll-triggered reloads.
#[async_trait]
pub trait Session: Send + Sync {
    /// Navigates the session to `url`.
    async fn navigate(&self, url: &str) -> Result<(), AutomationError>;

    /// Waits (bounded) for the first element matching `locator`.
    async fn wait_for(
        &self,
        locator: Locator<'_>,
        timeout: Duration,
    ) -> Result<Box<dyn Element>, AutomationError>;

    /// Waits (bounded) for at least one element matching `locator` and
    /// returns all current matches.
    async fn wait_for_all(
        &self,
        locator: Locator<'_>,
        timeout: Duration,
    ) -> Result<Vec<Box<dyn Element>>, AutomationError>;

    /// All current matches without waiting; an empty vec is not an error.
    async fn find_all(&self, locator: Locator<'_>) -> Result<Vec<Box<dyn Element>>, AutomationError>;

    /// Scrolls the results container to its bottom edge to trigger
    /// incremental loading.
    async fn scroll_to_bottom(&self) -> Result<(), AutomationError>;

    /// Navigates one step back in session history.
    async fn navigate_back(&self) -> Result<(), AutomationError>;

    /// Unconditional settling delay.
    async fn pause(&self, duration: Duration);

    /// Releases the session and its browser resources.
    async fn quit(self: Box<Self>) -> Result<(), AutomationError>;
}
