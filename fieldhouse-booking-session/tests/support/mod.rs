//! A scripted page standing in for a live browser.
#![allow(dead_code)]

use core::time::Duration;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use fieldhouse_booking_session::{Actuator, ActuatorError, ElementHandle, Locator};

#[derive(Default)]
pub struct FakeActuator {
    root: HashMap<String, Vec<u64>>,
    scoped: HashMap<(u64, String), Vec<u64>>,
    texts: HashMap<u64, String>,
    attrs: HashMap<(u64, String), String>,
    url: Mutex<String>,
    pub clicks: Mutex<Vec<u64>>,
    pub typed: Mutex<Vec<(u64, String)>>,
    pub cleared: Mutex<Vec<u64>>,
    pub navigations: Mutex<Vec<String>>,
    pub quits: Mutex<u32>,
}

impl FakeActuator {
    pub fn new() -> Self {
        Self {
            url: Mutex::new("https://example.com/home".to_owned()),
            ..Self::default()
        }
    }

    pub fn with_element(mut self, locator: &Locator, id: u64) -> Self {
        self.root.entry(locator.to_string()).or_default().push(id);
        self
    }

    pub fn with_scoped(mut self, scope: u64, locator: &Locator, id: u64) -> Self {
        self.scoped
            .entry((scope, locator.to_string()))
            .or_default()
            .push(id);
        self
    }

    pub fn with_text(mut self, id: u64, text: &str) -> Self {
        self.texts.insert(id, text.to_owned());
        self
    }

    pub fn with_attr(mut self, id: u64, name: &str, value: &str) -> Self {
        self.attrs.insert((id, name.to_owned()), value.to_owned());
        self
    }

    pub fn with_url(self, url: &str) -> Self {
        *self.url.lock().unwrap() = url.to_owned();
        self
    }

    pub fn clicked(&self, id: u64) -> bool {
        self.clicks.lock().unwrap().contains(&id)
    }
}

#[async_trait]
impl Actuator for FakeActuator {
    async fn navigate(&self, url: &str) -> Result<(), ActuatorError> {
        self.navigations.lock().unwrap().push(url.to_owned());
        Ok(())
    }

    async fn find(&self, locator: &Locator, wait: Duration) -> Result<ElementHandle, ActuatorError> {
        match self.root.get(&locator.to_string()).and_then(|ids| ids.first()) {
            Some(&id) => Ok(ElementHandle(id)),
            None if wait.is_zero() => Err(ActuatorError::NotFound(locator.to_string())),
            None => Err(ActuatorError::WaitTimeout {
                locator: locator.to_string(),
                timeout: wait,
            }),
        }
    }

    async fn find_all(
        &self,
        scope: Option<ElementHandle>,
        locator: &Locator,
    ) -> Result<Vec<ElementHandle>, ActuatorError> {
        let ids = match scope {
            Some(handle) => self.scoped.get(&(handle.0, locator.to_string())),
            None => self.root.get(&locator.to_string()),
        };
        Ok(ids
            .map(|ids| ids.iter().map(|&id| ElementHandle(id)).collect())
            .unwrap_or_default())
    }

    async fn find_in(
        &self,
        scope: ElementHandle,
        locator: &Locator,
    ) -> Result<ElementHandle, ActuatorError> {
        self.scoped
            .get(&(scope.0, locator.to_string()))
            .and_then(|ids| ids.first())
            .map(|&id| ElementHandle(id))
            .ok_or_else(|| ActuatorError::NotFound(locator.to_string()))
    }

    async fn click(&self, element: ElementHandle) -> Result<(), ActuatorError> {
        self.clicks.lock().unwrap().push(element.0);
        Ok(())
    }

    async fn type_text(&self, element: ElementHandle, text: &str) -> Result<(), ActuatorError> {
        self.typed.lock().unwrap().push((element.0, text.to_owned()));
        Ok(())
    }

    async fn clear(&self, element: ElementHandle) -> Result<(), ActuatorError> {
        self.cleared.lock().unwrap().push(element.0);
        Ok(())
    }

    async fn read_text(&self, element: ElementHandle) -> Result<String, ActuatorError> {
        Ok(self.texts.get(&element.0).cloned().unwrap_or_default())
    }

    async fn attr(
        &self,
        element: ElementHandle,
        name: &str,
    ) -> Result<Option<String>, ActuatorError> {
        Ok(self.attrs.get(&(element.0, name.to_owned())).cloned())
    }

    async fn screenshot(&self, _path: &Path) -> Result<(), ActuatorError> {
        Ok(())
    }

    async fn current_url(&self) -> Result<String, ActuatorError> {
        Ok(self.url.lock().unwrap().clone())
    }

    async fn quit(&self) -> Result<(), ActuatorError> {
        *self.quits.lock().unwrap() += 1;
        Ok(())
    }
}

pub fn user_context() -> fieldhouse_booking_config::UserContext {
    fieldhouse_booking_config::UserContext {
        id: "alice".to_owned(),
        credential: fieldhouse_booking_config::Credential {
            login_url: "https://example.com/login".to_owned(),
            username: "alice".to_owned(),
            password: "hunter2".to_owned(),
        },
        preference: fieldhouse_booking_config::BookingPreference {
            facility: "badminton".to_owned(),
            time: "7pm".to_owned(),
            date: "2026-08-12".to_owned(),
            court_number: Some("3".to_owned()),
            cell_number: Some("709-555-0101".to_owned()),
            booking_reason: Some("league night".to_owned()),
        },
    }
}
