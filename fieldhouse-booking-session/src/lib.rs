//! One complete login-to-logout browser interaction for a single user's
//! booking attempt, driven through an opaque [`actuator::Actuator`]
//! capability so that the whole flow can be exercised against a scripted
//! fake as well as a live WebDriver.

pub mod actuator;
pub mod controller;
pub mod error;
pub mod logout;
pub mod screenshot;
pub mod selectors;

pub use actuator::{Actuator, ActuatorError, ElementHandle, Locator};
pub use controller::{SessionController, SessionState};
pub use error::{FailureKind, SessionError, Step};
pub use logout::{LogoutReport, LogoutStrategy};
pub use screenshot::ScreenshotSink;
