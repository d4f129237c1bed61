//! WebDriver-backed implementation of the session layer's [`Actuator`]
//! capability, driving Chrome through a chromedriver endpoint with
//! `thirtyfour`. This is the only crate that knows a real browser exists.

use core::sync::atomic::{AtomicU64, Ordering};
use core::time::Duration;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use fieldhouse_booking_session::{Actuator, ActuatorError, ElementHandle, Locator};
use thirtyfour::error::WebDriverError;
use thirtyfour::{By, ChromiumLikeCapabilities, DesiredCapabilities, WebDriver, WebElement};
use tracing::{debug, info};

/// How long to sleep between lookup attempts while waiting for an element.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Connection and launch options for one browser session.
#[derive(Debug, Clone)]
pub struct WebdriverOptions {
    /// The WebDriver server endpoint, typically a locally running
    /// chromedriver.
    pub server_url: String,
    pub headless: bool,
}

impl Default for WebdriverOptions {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:9515".to_owned(),
            headless: false,
        }
    }
}

/// One live browser session plus the table resolving opaque element handles
/// back to driver elements. Handles go stale on navigation, which is fine:
/// the session layer only holds them within a single page.
pub struct WebdriverActuator {
    driver: WebDriver,
    elements: Mutex<HashMap<u64, WebElement>>,
    next_id: AtomicU64,
}

impl WebdriverActuator {
    /// Starts a fresh browser session against the configured endpoint.
    pub async fn launch(options: &WebdriverOptions) -> Result<Self, ActuatorError> {
        let mut caps = DesiredCapabilities::chrome();
        caps.add_arg("--start-maximized").map_err(driver_error)?;
        if options.headless {
            // the hardening set needed to run inside CI containers
            for arg in [
                "--headless",
                "--no-sandbox",
                "--disable-dev-shm-usage",
                "--disable-gpu",
                "--window-size=1920,1080",
                "--disable-extensions",
                "--proxy-server=\"direct://\"",
                "--proxy-bypass-list=*",
            ] {
                caps.add_arg(arg).map_err(driver_error)?;
            }
        }
        let driver = WebDriver::new(&options.server_url, caps)
            .await
            .map_err(driver_error)?;
        info!(server = %options.server_url, headless = options.headless, "browser session started");
        Ok(Self {
            driver,
            elements: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        })
    }

    fn store(&self, element: WebElement) -> ElementHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.elements
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(id, element);
        ElementHandle(id)
    }

    fn resolve(&self, handle: ElementHandle) -> Result<WebElement, ActuatorError> {
        self.elements
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&handle.0)
            .cloned()
            .ok_or(ActuatorError::StaleHandle(handle))
    }

    async fn find_once(&self, locator: &Locator) -> Result<WebElement, WebDriverError> {
        self.driver.find(to_by(locator)).await
    }
}

fn to_by(locator: &Locator) -> By {
    match locator {
        Locator::Css(s) => By::Css(s.as_str()),
        Locator::XPath(s) => By::XPath(s.as_str()),
        Locator::ClassName(s) => By::ClassName(s.as_str()),
    }
}

fn driver_error(error: WebDriverError) -> ActuatorError {
    ActuatorError::Driver(error.to_string())
}

#[async_trait]
impl Actuator for WebdriverActuator {
    async fn navigate(&self, url: &str) -> Result<(), ActuatorError> {
        self.driver.goto(url).await.map_err(driver_error)
    }

    async fn find(&self, locator: &Locator, wait: Duration) -> Result<ElementHandle, ActuatorError> {
        let deadline = tokio::time::Instant::now() + wait;
        loop {
            match self.find_once(locator).await {
                Ok(element) => return Ok(self.store(element)),
                Err(WebDriverError::NoSuchElement(_)) if wait.is_zero() => {
                    return Err(ActuatorError::NotFound(locator.to_string()));
                }
                Err(WebDriverError::NoSuchElement(_)) => {
                    if tokio::time::Instant::now() >= deadline {
                        return Err(ActuatorError::WaitTimeout {
                            locator: locator.to_string(),
                            timeout: wait,
                        });
                    }
                    debug!(%locator, "element not present yet");
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
                Err(other) => return Err(driver_error(other)),
            }
        }
    }

    async fn find_all(
        &self,
        scope: Option<ElementHandle>,
        locator: &Locator,
    ) -> Result<Vec<ElementHandle>, ActuatorError> {
        let elements = match scope {
            Some(handle) => {
                let parent = self.resolve(handle)?;
                parent.find_all(to_by(locator)).await.map_err(driver_error)?
            }
            None => self
                .driver
                .find_all(to_by(locator))
                .await
                .map_err(driver_error)?,
        };
        Ok(elements.into_iter().map(|e| self.store(e)).collect())
    }

    async fn find_in(
        &self,
        scope: ElementHandle,
        locator: &Locator,
    ) -> Result<ElementHandle, ActuatorError> {
        let parent = self.resolve(scope)?;
        match parent.find(to_by(locator)).await {
            Ok(element) => Ok(self.store(element)),
            Err(WebDriverError::NoSuchElement(_)) => {
                Err(ActuatorError::NotFound(locator.to_string()))
            }
            Err(other) => Err(driver_error(other)),
        }
    }

    async fn click(&self, element: ElementHandle) -> Result<(), ActuatorError> {
        self.resolve(element)?.click().await.map_err(driver_error)
    }

    async fn type_text(&self, element: ElementHandle, text: &str) -> Result<(), ActuatorError> {
        self.resolve(element)?
            .send_keys(text)
            .await
            .map_err(driver_error)
    }

    async fn clear(&self, element: ElementHandle) -> Result<(), ActuatorError> {
        self.resolve(element)?.clear().await.map_err(driver_error)
    }

    async fn read_text(&self, element: ElementHandle) -> Result<String, ActuatorError> {
        self.resolve(element)?.text().await.map_err(driver_error)
    }

    async fn attr(
        &self,
        element: ElementHandle,
        name: &str,
    ) -> Result<Option<String>, ActuatorError> {
        self.resolve(element)?.attr(name).await.map_err(driver_error)
    }

    async fn screenshot(&self, path: &Path) -> Result<(), ActuatorError> {
        self.driver.screenshot(path).await.map_err(driver_error)
    }

    async fn current_url(&self) -> Result<String, ActuatorError> {
        self.driver
            .current_url()
            .await
            .map(|url| url.to_string())
            .map_err(driver_error)
    }

    async fn quit(&self) -> Result<(), ActuatorError> {
        self.driver.clone().quit().await.map_err(driver_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_point_at_local_chromedriver() {
        let options = WebdriverOptions::default();
        assert_eq!(options.server_url, "http://localhost:9515");
        assert!(!options.headless);
    }

    #[test]
    fn locators_map_onto_driver_selectors() {
        // only the selector text matters; By does not expose comparisons
        assert_eq!(
            format!("{:?}", to_by(&Locator::xpath("//h2"))),
            format!("{:?}", By::XPath("//h2"))
        );
        assert_eq!(
            format!("{:?}", to_by(&Locator::class_name("dateblock"))),
            format!("{:?}", By::ClassName("dateblock"))
        );
    }
}
