//! The session controller: one browser session lifecycle from login through
//! checkout to best-effort logout and teardown.

use core::fmt;
use core::time::Duration;

use chrono::{Datelike as _, NaiveDate};
use fieldhouse_booking_config::{BookingOutcome, UserContext};
use fieldhouse_booking_matcher::{match_slots, CandidateSlot, NormalizedTime};
use tracing::{error, info, warn};

use crate::actuator::{Actuator, ActuatorError, ElementHandle, Locator};
use crate::error::{at_step, SessionError, Step};
use crate::logout::{logout, LogoutReport};
use crate::screenshot::ScreenshotSink;
use crate::{selectors, FailureKind};

/// Where a session currently stands. `LoggedOut` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Init,
    LoggedIn,
    OnBookingPage,
    DateSelected,
    SlotSelected,
    Confirmed,
    LoggedOut,
    Failed(FailureKind),
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => f.write_str("init"),
            Self::LoggedIn => f.write_str("logged_in"),
            Self::OnBookingPage => f.write_str("on_booking_page"),
            Self::DateSelected => f.write_str("date_selected"),
            Self::SlotSelected => f.write_str("slot_selected"),
            Self::Confirmed => f.write_str("confirmed"),
            Self::LoggedOut => f.write_str("logged_out"),
            Self::Failed(kind) => write!(f, "failed({kind})"),
        }
    }
}

/// Bounded wait applied to every element-dependent transition.
const DEFAULT_WAIT: Duration = Duration::from_secs(10);
/// Shorter wait for elements that are usually absent.
const SHORT_WAIT: Duration = Duration::from_secs(3);
/// The single secondary pause after search results start rendering.
const RESULTS_SETTLE: Duration = Duration::from_secs(1);

struct ScrapedSlot {
    candidate: CandidateSlot,
    handle: ElementHandle,
}

/// Owns one booking attempt for one user. Construct with the user's context
/// and sinks, call [`Self::run`], get the outcome; teardown (logout once,
/// browser quit) always happens, whatever state the attempt died in.
pub struct SessionController<A: Actuator> {
    actuator: A,
    user: UserContext,
    shots: ScreenshotSink,
    state: SessionState,
    logged_in: bool,
    logout_report: Option<LogoutReport>,
    default_wait: Duration,
    short_wait: Duration,
    settle_wait: Duration,
}

impl<A: Actuator> SessionController<A> {
    #[must_use]
    pub fn new(actuator: A, user: UserContext, shots: ScreenshotSink) -> Self {
        Self {
            actuator,
            user,
            shots,
            state: SessionState::Init,
            logged_in: false,
            logout_report: None,
            default_wait: DEFAULT_WAIT,
            short_wait: SHORT_WAIT,
            settle_wait: RESULTS_SETTLE,
        }
    }

    /// Overrides the wait ceilings, mainly so tests do not sit out real
    /// timeouts.
    #[must_use]
    pub const fn with_waits(mut self, default_wait: Duration, short_wait: Duration, settle_wait: Duration) -> Self {
        self.default_wait = default_wait;
        self.short_wait = short_wait;
        self.settle_wait = settle_wait;
        self
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// The underlying actuator, mainly for inspection from tests.
    #[must_use]
    pub const fn actuator(&self) -> &A {
        &self.actuator
    }

    #[must_use]
    pub const fn logout_report(&self) -> Option<LogoutReport> {
        self.logout_report
    }

    /// Runs the full workflow and always tears the session down afterwards.
    pub async fn run(&mut self) -> BookingOutcome {
        let success = match self.book().await {
            Ok(()) => {
                info!(user = %self.user.id, "court booked successfully");
                true
            }
            Err(booking_error) => {
                error!(user = %self.user.id, error = %booking_error, "booking attempt failed");
                self.state = SessionState::Failed(booking_error.failure_kind());
                false
            }
        };
        self.teardown().await;
        BookingOutcome {
            user_id: self.user.id.clone(),
            success,
            timestamp: chrono::Local::now().format("%Y%m%d_%H%M%S").to_string(),
            facility: self.user.preference.facility.clone(),
            time: self.user.preference.time.clone(),
        }
    }

    async fn book(&mut self) -> Result<(), SessionError> {
        self.login().await?;
        self.advance(SessionState::LoggedIn);
        self.navigate_to_booking_page().await?;
        self.advance(SessionState::OnBookingPage);
        self.select_date().await?;
        self.advance(SessionState::DateSelected);
        self.select_slot().await?;
        self.advance(SessionState::SlotSelected);
        self.confirm_booking().await?;
        self.advance(SessionState::Confirmed);
        Ok(())
    }

    fn advance(&mut self, next: SessionState) {
        info!(user = %self.user.id, from = %self.state, to = %next, "session state");
        self.state = next;
    }

    /// Logout is attempted exactly once here, no matter which state the
    /// attempt ended in; quitting the browser is unconditional.
    async fn teardown(&mut self) {
        if self.logged_in {
            let report = logout(
                &self.actuator,
                &self.user.credential.login_url,
                self.default_wait,
            )
            .await;
            self.logout_report = Some(report);
            self.logged_in = false;
            if report.success && !matches!(self.state, SessionState::Failed(_)) {
                self.advance(SessionState::LoggedOut);
            } else if !report.success {
                warn!(user = %self.user.id, "all logout strategies failed");
            }
        }
        info!(user = %self.user.id, "closing browser");
        if let Err(quit_error) = self.actuator.quit().await {
            warn!(error = %quit_error, "browser did not shut down cleanly");
        }
    }

    async fn login(&mut self) -> Result<(), SessionError> {
        let err = at_step(Step::Login);
        let url = self.user.credential.login_url.clone();
        info!(user = %self.user.id, %url, "navigating to login page");
        self.actuator.navigate(&url).await.map_err(&err)?;

        info!("attempting to log in");
        let username = self
            .actuator
            .find(&Locator::xpath(selectors::USERNAME_FIELD), self.default_wait)
            .await
            .map_err(&err)?;
        let password = self
            .actuator
            .find(&Locator::xpath(selectors::PASSWORD_FIELD), Duration::ZERO)
            .await
            .map_err(&err)?;
        let submit = self
            .actuator
            .find(&Locator::xpath(selectors::LOGIN_BUTTON), Duration::ZERO)
            .await
            .map_err(&err)?;
        self.actuator
            .type_text(username, &self.user.credential.username)
            .await
            .map_err(&err)?;
        self.actuator
            .type_text(password, &self.user.credential.password)
            .await
            .map_err(&err)?;
        self.actuator.click(submit).await.map_err(&err)?;

        // a still-alive previous session makes the site ask before resuming
        match self
            .actuator
            .find(&Locator::xpath(selectors::ACTIVE_SESSION_ALERT), self.short_wait)
            .await
        {
            Ok(_) => {
                info!("active session alert detected");
                let resume = self
                    .actuator
                    .find(&Locator::xpath(selectors::RESUME_SESSION_CONTINUE), Duration::ZERO)
                    .await
                    .map_err(&err)?;
                self.actuator.click(resume).await.map_err(&err)?;
            }
            Err(_) => info!("no active session alert, proceeding"),
        }

        self.actuator
            .find(&Locator::xpath(selectors::FACILITY_LANDING_HEADING), self.default_wait)
            .await
            .map_err(&err)?;
        self.logged_in = true;
        self.shots.capture(&self.actuator, "login").await;
        info!(user = %self.user.id, "login successful");
        Ok(())
    }

    async fn navigate_to_booking_page(&mut self) -> Result<(), SessionError> {
        let err = at_step(Step::NavigateToBookingPage);
        info!("navigating to booking page");
        let tile = self
            .actuator
            .find(&Locator::xpath(selectors::FACILITY_TILE), self.default_wait)
            .await
            .map_err(&err)?;
        self.actuator.click(tile).await.map_err(&err)?;
        self.actuator
            .find(&Locator::xpath(selectors::FACILITY_SEARCH_MARKER), self.default_wait)
            .await
            .map_err(&err)?;
        info!("booking page loaded");

        // leftover picks from an earlier visit would corrupt the new search
        match self
            .actuator
            .find(&Locator::xpath(selectors::CLEAR_SELECTION_BUTTON), self.short_wait)
            .await
        {
            Ok(clear) => {
                info!("clearing previous selections");
                self.actuator.click(clear).await.map_err(&err)?;
                self.wait_gone(&Locator::xpath(selectors::SELECTION_LIST_NONEMPTY))
                    .await
                    .map_err(&err)?;
            }
            Err(_) => info!("no previous selections to clear"),
        }
        self.shots.capture(&self.actuator, "booking_page").await;
        Ok(())
    }

    async fn select_date(&mut self) -> Result<(), SessionError> {
        let err = at_step(Step::SelectDate);
        let raw_date = self.user.preference.date.clone();
        let date = NaiveDate::parse_from_str(&raw_date, "%Y-%m-%d")
            .map_err(|_| SessionError::BadDate(raw_date.clone()))?;
        info!(date = %raw_date, "selecting date");

        let picker = self
            .actuator
            .find(&Locator::xpath(selectors::DATEPICKER_BUTTON), self.default_wait)
            .await
            .map_err(&err)?;
        self.actuator.click(picker).await.map_err(&err)?;

        let month = selectors::MONTH_NAMES[date.month0() as usize];
        let components = [
            (selectors::MONTH_DROPDOWN, month.to_owned()),
            (selectors::DAY_DROPDOWN, date.day().to_string()),
            (selectors::YEAR_DROPDOWN, date.year().to_string()),
        ];
        for (dropdown, label) in components {
            let button = self
                .actuator
                .find(&Locator::xpath(dropdown), self.default_wait)
                .await
                .map_err(&err)?;
            self.actuator.click(button).await.map_err(&err)?;
            let option = self
                .actuator
                .find(
                    &Locator::xpath(selectors::dropdown_option(&label)),
                    self.default_wait,
                )
                .await
                .map_err(&err)?;
            self.actuator.click(option).await.map_err(&err)?;
            info!(%label, "picked date component");
        }

        let done = self
            .actuator
            .find(&Locator::xpath(selectors::DATEPICKER_DONE), self.default_wait)
            .await
            .map_err(&err)?;
        self.actuator.click(done).await.map_err(&err)?;

        let search = self
            .actuator
            .find(&Locator::xpath(selectors::SEARCH_BUTTON), self.default_wait)
            .await
            .map_err(&err)?;
        self.shots.capture(&self.actuator, "date_selected").await;
        self.actuator.click(search).await.map_err(&err)?;
        info!(date = %raw_date, "date selected, search submitted");
        Ok(())
    }

    async fn select_slot(&mut self) -> Result<(), SessionError> {
        let err = at_step(Step::SelectSlot);
        let preference = self.user.preference.clone();
        let time = NormalizedTime::parse(&preference.time);
        let templates = time.templates();
        info!(
            facility = %preference.facility,
            court = preference.court_number.as_deref().unwrap_or("any"),
            slot = %templates[0],
            "looking for a court"
        );

        self.actuator
            .find(&Locator::class_name(selectors::RESULTS_DATEBLOCK), self.default_wait)
            .await
            .map_err(&err)?;
        // results keep streaming in briefly after the date block shows up
        tokio::time::sleep(self.settle_wait).await;

        let scraped = self.scrape_candidates().await.map_err(&err)?;
        let candidates: Vec<CandidateSlot> =
            scraped.iter().map(|slot| slot.candidate.clone()).collect();
        let result = match_slots(
            &preference.facility,
            &templates,
            preference.court_number.as_deref(),
            &candidates,
        );
        if !result.matched {
            return Err(SessionError::NoMatch {
                facility: preference.facility,
                time: preference.time,
            });
        }
        info!(
            court = result.court_title.as_deref().unwrap_or_default(),
            score = result.score,
            slot = result.slot_label.as_deref().unwrap_or_default(),
            "selected best matching court"
        );

        let chosen = scraped
            .iter()
            .find(|slot| {
                slot.candidate.is_available
                    && Some(slot.candidate.court_title.as_str()) == result.court_title.as_deref()
                    && Some(slot.candidate.raw_slot_label.as_str())
                        == result.slot_label.as_deref()
            })
            .ok_or_else(|| {
                err(ActuatorError::NotFound(
                    "matched slot disappeared from the page".to_owned(),
                ))
            })?;
        self.actuator.click(chosen.handle).await.map_err(&err)?;
        self.handle_slot_overlay(chosen.handle).await;
        self.shots.capture(&self.actuator, "slot_selected").await;
        Ok(())
    }

    async fn scrape_candidates(&self) -> Result<Vec<ScrapedSlot>, ActuatorError> {
        let cards = self
            .actuator
            .find_all(None, &Locator::class_name(selectors::RESULT_CARD))
            .await?;
        info!(count = cards.len(), "found court result cards");

        let mut scraped = Vec::new();
        for card in cards {
            let Ok(title_el) = self
                .actuator
                .find_in(card, &Locator::xpath(selectors::CARD_TITLE))
                .await
            else {
                // cards without a title block are decorative
                continue;
            };
            let title = self.actuator.read_text(title_el).await?;
            let description = match self
                .actuator
                .find_in(card, &Locator::xpath(selectors::CARD_DESCRIPTION))
                .await
            {
                Ok(el) => self.actuator.read_text(el).await?,
                Err(_) => String::new(),
            };

            for slot in self
                .actuator
                .find_all(Some(card), &Locator::xpath(selectors::CARD_SLOT_BUTTONS))
                .await?
            {
                let class = self.actuator.attr(slot, "class").await?.unwrap_or_default();
                let label = self.actuator.read_text(slot).await?;
                scraped.push(ScrapedSlot {
                    candidate: CandidateSlot {
                        court_title: title.clone(),
                        court_description: description.clone(),
                        raw_slot_label: label.trim().to_owned(),
                        is_available: class.contains(selectors::SLOT_AVAILABLE_CLASS),
                    },
                    handle: slot,
                });
            }
        }
        Ok(scraped)
    }

    /// Some slot buttons open a confirmation overlay instead of adding to
    /// the cart directly. Everything in here is best-effort.
    async fn handle_slot_overlay(&self, slot: ElementHandle) {
        let class = self
            .actuator
            .attr(slot, "class")
            .await
            .ok()
            .flatten()
            .unwrap_or_default();
        if class.contains(selectors::SLOT_OVERLAY_CLASS) {
            info!("waiting for booking dialog");
            if let Err(overlay_error) = self
                .actuator
                .find(&Locator::class_name(selectors::OVERLAY_CONTENT), self.default_wait)
                .await
            {
                info!(error = %overlay_error, "no booking dialog appeared");
                return;
            }
            if let Ok(buttons) = self
                .actuator
                .find_all(None, &Locator::xpath(selectors::OVERLAY_CONTINUE_BUTTONS))
                .await
            {
                if let Some(&button) = buttons.first() {
                    if let Err(click_error) = self.actuator.click(button).await {
                        info!(error = %click_error, "confirmation button vanished");
                    }
                }
            }
        }
        if let Ok(indicators) = self
            .actuator
            .find_all(None, &Locator::xpath(selectors::CART_INDICATOR))
            .await
        {
            if !indicators.is_empty() {
                info!("item appears to be added to cart");
            }
        }
    }

    async fn confirm_booking(&mut self) -> Result<(), SessionError> {
        let err = at_step(Step::ConfirmBooking);
        info!("confirming booking");

        // the slot click sometimes lands straight in the cart, so a missing
        // add-to-cart button is not fatal
        if let Err(cart_error) = self.add_to_cart_and_verify().await {
            warn!(error = %cart_error, "could not run the add-to-cart flow");
        }
        if let Err(form_error) = self.fill_checkout_questions().await {
            warn!(error = %form_error, "could not fill checkout questions");
        }

        let buttons = self
            .actuator
            .find_all(None, &Locator::xpath(selectors::CHECKOUT_CONTINUE_BUTTONS))
            .await
            .map_err(&err)?;
        if let Some(&button) = buttons.first() {
            self.actuator.click(button).await.map_err(&err)?;
            info!("checkout submitted");
        }
        self.shots.capture(&self.actuator, "checkout").await;
        Ok(())
    }

    async fn add_to_cart_and_verify(&self) -> Result<(), ActuatorError> {
        let button = self
            .actuator
            .find(&Locator::xpath(selectors::ADD_TO_CART_BUTTON), self.default_wait)
            .await?;
        self.actuator.click(button).await?;

        let header = self
            .actuator
            .find(&Locator::xpath(selectors::PROCESSING_HEADER), self.default_wait)
            .await?;
        let header_text = self.actuator.read_text(header).await?;
        info!(header = %header_text, "booking header");

        let preference = &self.user.preference;
        if let Ok(date) = NaiveDate::parse_from_str(&preference.date, "%Y-%m-%d") {
            let formatted = format!("{:02}/{:02}/{}", date.month(), date.day(), date.year());
            let date_ok = header_text.contains(&formatted);
            let facility_ok = header_text
                .to_lowercase()
                .contains(&preference.facility.to_lowercase());
            if date_ok && facility_ok {
                info!("booking details verified");
            } else {
                warn!(
                    expected_date = %formatted,
                    facility = %preference.facility,
                    header = %header_text,
                    "booking details mismatch"
                );
            }
        }
        Ok(())
    }

    async fn fill_checkout_questions(&self) -> Result<(), ActuatorError> {
        let preference = &self.user.preference;
        info!("filling required checkout information");
        let cell = self
            .actuator
            .find(&Locator::xpath(selectors::CELL_NUMBER_FIELD), self.default_wait)
            .await?;
        self.actuator.clear(cell).await?;
        self.actuator
            .type_text(cell, preference.cell_number.as_deref().unwrap_or_default())
            .await?;
        let reason = self
            .actuator
            .find(&Locator::xpath(selectors::BOOKING_REASON_FIELD), self.default_wait)
            .await?;
        self.actuator.clear(reason).await?;
        self.actuator
            .type_text(reason, preference.booking_reason.as_deref().unwrap_or_default())
            .await?;
        Ok(())
    }

    async fn wait_gone(&self, locator: &Locator) -> Result<(), ActuatorError> {
        let deadline = tokio::time::Instant::now() + self.default_wait;
        loop {
            if self.actuator.find_all(None, locator).await?.is_empty() {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(ActuatorError::WaitTimeout {
                    locator: locator.to_string(),
                    timeout: self.default_wait,
                });
            }
            tokio::time::sleep(Duration::from_millis(250)).await;
        }
    }
}
