use std::path::PathBuf;

use tracing::{info, warn};

use crate::actuator::Actuator;

/// Best-effort sink for step-named screenshots. Disabled by default; when
/// enabled, captures land in the configured directory with an optional user
/// prefix so concurrent sessions never collide.
#[derive(Debug, Clone, Default)]
pub struct ScreenshotSink {
    dir: Option<PathBuf>,
    prefix: Option<String>,
}

impl ScreenshotSink {
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            dir: None,
            prefix: None,
        }
    }

    #[must_use]
    pub fn to_dir(dir: PathBuf, prefix: Option<String>) -> Self {
        Self {
            dir: Some(dir),
            prefix,
        }
    }

    /// Captures a screenshot named after the current step. Failures are
    /// logged and swallowed; a missing screenshot never fails a booking.
    pub async fn capture<A: Actuator + ?Sized>(&self, actuator: &A, name: &str) {
        let Some(dir) = &self.dir else { return };
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let filename = match &self.prefix {
            Some(prefix) => format!("{prefix}_{name}_{timestamp}.png"),
            None => format!("{name}_{timestamp}.png"),
        };
        let path = dir.join(filename);
        if let Err(error) = std::fs::create_dir_all(dir) {
            warn!(%error, dir = %dir.display(), "could not create screenshot directory");
            return;
        }
        match actuator.screenshot(&path).await {
            Ok(()) => info!(path = %path.display(), "screenshot saved"),
            Err(error) => warn!(%error, "failed to take screenshot"),
        }
    }
}
