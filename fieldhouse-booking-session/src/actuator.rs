//! The browser capability surface the session controller drives.
//!
//! The controller never manages browser process lifecycle details beyond
//! this trait. Element references are opaque handles minted by the
//! implementation, so nothing driver-specific leaks into the booking flow.

use core::fmt;
use core::time::Duration;
use std::path::Path;

use async_trait::async_trait;

/// How to locate an element on the current page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    Css(String),
    XPath(String),
    ClassName(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    pub fn xpath(selector: impl Into<String>) -> Self {
        Self::XPath(selector.into())
    }

    pub fn class_name(name: impl Into<String>) -> Self {
        Self::ClassName(name.into())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(s) => write!(f, "css `{s}`"),
            Self::XPath(s) => write!(f, "xpath `{s}`"),
            Self::ClassName(s) => write!(f, "class `{s}`"),
        }
    }
}

/// Opaque reference to an element previously found on the page. Valid until
/// the page it was found on is navigated away from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(pub u64);

#[derive(thiserror::Error, Debug)]
pub enum ActuatorError {
    #[error("timed out after {timeout:?} waiting for {locator}")]
    WaitTimeout { locator: String, timeout: Duration },
    #[error("no element matching {0}")]
    NotFound(String),
    #[error("stale element handle {0:?}")]
    StaleHandle(ElementHandle),
    #[error("driver error: {0}")]
    Driver(String),
}

impl ActuatorError {
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::WaitTimeout { .. })
    }
}

pub type Result<T> = core::result::Result<T, ActuatorError>;

/// Capability set of the browser driver: navigate, find, click, type, read,
/// screenshot, report the current URL and quit.
///
/// `find` applies a bounded wait and fails with [`ActuatorError::WaitTimeout`]
/// on expiry; a zero wait means a single immediate attempt. `find_all` and
/// `find_in` never wait.
#[async_trait]
pub trait Actuator: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<()>;

    async fn find(&self, locator: &Locator, wait: Duration) -> Result<ElementHandle>;

    /// Every current match, optionally scoped to a previously found element.
    async fn find_all(&self, scope: Option<ElementHandle>, locator: &Locator)
        -> Result<Vec<ElementHandle>>;

    /// Single immediate lookup inside a previously found element.
    async fn find_in(&self, scope: ElementHandle, locator: &Locator) -> Result<ElementHandle>;

    async fn click(&self, element: ElementHandle) -> Result<()>;

    async fn type_text(&self, element: ElementHandle, text: &str) -> Result<()>;

    async fn clear(&self, element: ElementHandle) -> Result<()>;

    async fn read_text(&self, element: ElementHandle) -> Result<String>;

    async fn attr(&self, element: ElementHandle, name: &str) -> Result<Option<String>>;

    async fn screenshot(&self, path: &Path) -> Result<()>;

    async fn current_url(&self) -> Result<String>;

    async fn quit(&self) -> Result<()>;
}
