//! The logout fallbacks run in order and report which one ended the session.

mod support;

use core::time::Duration;

use fieldhouse_booking_session::logout::logout;
use fieldhouse_booking_session::{selectors, Locator, LogoutStrategy};
use support::FakeActuator;

const LOGIN_URL: &str = "https://example.com/login";

#[tokio::test]
async fn menu_logout_is_preferred() {
    let page = FakeActuator::new()
        .with_element(&Locator::xpath(selectors::USER_MENU), 1)
        .with_element(&Locator::xpath(selectors::LOGOUT_MENU_ENTRY), 2)
        .with_element(&Locator::xpath(selectors::LOGOUT_DIRECT_LINK), 3)
        .with_element(&Locator::xpath(selectors::SIGNED_OUT_MARKER), 4);
    let report = logout(&page, LOGIN_URL, Duration::ZERO).await;

    assert!(report.success);
    assert_eq!(report.strategy, Some(LogoutStrategy::Menu));
    // the direct link was never needed
    assert!(page.clicked(1));
    assert!(page.clicked(2));
    assert!(!page.clicked(3));
}

#[tokio::test]
async fn direct_link_is_the_first_fallback() {
    let page = FakeActuator::new()
        .with_element(&Locator::xpath(selectors::LOGOUT_DIRECT_LINK), 3)
        .with_element(&Locator::xpath(selectors::SIGNED_OUT_MARKER), 4);
    let report = logout(&page, LOGIN_URL, Duration::ZERO).await;

    assert!(report.success);
    assert_eq!(report.strategy, Some(LogoutStrategy::DirectLink));
    assert!(page.clicked(3));
}

#[tokio::test]
async fn forced_navigation_is_the_last_resort() {
    let page =
        FakeActuator::new().with_element(&Locator::xpath(selectors::SIGNED_OUT_MARKER), 4);
    let report = logout(&page, LOGIN_URL, Duration::ZERO).await;

    assert!(report.success);
    assert_eq!(report.strategy, Some(LogoutStrategy::ForcedNavigation));
    assert_eq!(
        page.navigations.lock().unwrap().as_slice(),
        [LOGIN_URL.to_owned()]
    );
}

#[tokio::test]
async fn forced_navigation_accepts_a_login_url_without_the_marker() {
    let page = FakeActuator::new().with_url("https://example.com/Login?expired=1");
    let report = logout(&page, LOGIN_URL, Duration::ZERO).await;

    assert!(report.success);
    assert_eq!(report.strategy, Some(LogoutStrategy::ForcedNavigation));
}

#[tokio::test]
async fn every_strategy_failing_is_reported_as_such() {
    let page = FakeActuator::new().with_url("https://example.com/home");
    let report = logout(&page, LOGIN_URL, Duration::ZERO).await;

    assert!(!report.success);
    assert_eq!(report.strategy, None);
}
