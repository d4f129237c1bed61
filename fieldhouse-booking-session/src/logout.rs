//! Best-effort logout, tried through an ordered list of fallback strategies.
//! Each strategy only runs if the previous one failed, and the report says
//! which one ended the session.

use core::fmt;
use core::time::Duration;

use tracing::{info, warn};

use crate::actuator::{Actuator, ActuatorError, Locator};
use crate::selectors;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutStrategy {
    /// Open the user menu and click its Logout entry.
    Menu,
    /// Click any logout link present on the page.
    DirectLink,
    /// Navigate back to the login URL and check the session is gone.
    ForcedNavigation,
}

impl fmt::Display for LogoutStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Menu => "menu",
            Self::DirectLink => "direct_link",
            Self::ForcedNavigation => "forced_navigation",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoutReport {
    pub strategy: Option<LogoutStrategy>,
    pub success: bool,
}

pub async fn logout<A: Actuator + ?Sized>(
    actuator: &A,
    login_url: &str,
    default_wait: Duration,
) -> LogoutReport {
    for strategy in [
        LogoutStrategy::Menu,
        LogoutStrategy::DirectLink,
        LogoutStrategy::ForcedNavigation,
    ] {
        match attempt(actuator, strategy, login_url, default_wait).await {
            Ok(()) => {
                info!(%strategy, "logout successful");
                return LogoutReport {
                    strategy: Some(strategy),
                    success: true,
                };
            }
            Err(error) => warn!(%strategy, %error, "logout strategy failed"),
        }
    }
    LogoutReport {
        strategy: None,
        success: false,
    }
}

async fn attempt<A: Actuator + ?Sized>(
    actuator: &A,
    strategy: LogoutStrategy,
    login_url: &str,
    default_wait: Duration,
) -> Result<(), ActuatorError> {
    match strategy {
        LogoutStrategy::Menu => {
            let menu = actuator
                .find(&Locator::xpath(selectors::USER_MENU), default_wait)
                .await?;
            actuator.click(menu).await?;
            let entry = actuator
                .find(&Locator::xpath(selectors::LOGOUT_MENU_ENTRY), default_wait)
                .await?;
            actuator.click(entry).await?;
            confirm_signed_out(actuator, default_wait).await
        }
        LogoutStrategy::DirectLink => {
            let link = actuator
                .find(&Locator::xpath(selectors::LOGOUT_DIRECT_LINK), Duration::ZERO)
                .await?;
            actuator.click(link).await?;
            confirm_signed_out(actuator, default_wait).await
        }
        LogoutStrategy::ForcedNavigation => {
            actuator.navigate(login_url).await?;
            let markers = actuator
                .find_all(None, &Locator::xpath(selectors::SIGNED_OUT_MARKER))
                .await?;
            if !markers.is_empty() {
                return Ok(());
            }
            let url = actuator.current_url().await?;
            if url.to_lowercase().contains("login") {
                Ok(())
            } else {
                Err(ActuatorError::NotFound(
                    "no signed-out marker after forced navigation".to_owned(),
                ))
            }
        }
    }
}

async fn confirm_signed_out<A: Actuator + ?Sized>(
    actuator: &A,
    default_wait: Duration,
) -> Result<(), ActuatorError> {
    actuator
        .find(&Locator::xpath(selectors::SIGNED_OUT_MARKER), default_wait)
        .await
        .map(|_| ())
}
