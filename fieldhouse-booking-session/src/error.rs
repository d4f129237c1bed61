use core::fmt;

use crate::actuator::ActuatorError;

/// The browser interaction group a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Login,
    NavigateToBookingPage,
    SelectDate,
    SelectSlot,
    ConfirmBooking,
    Logout,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Login => "login",
            Self::NavigateToBookingPage => "navigate_to_booking_page",
            Self::SelectDate => "select_date",
            Self::SelectSlot => "select_slot",
            Self::ConfirmBooking => "confirm_booking",
            Self::Logout => "logout",
        })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("{step} failed: {source}")]
    Step {
        step: Step,
        #[source]
        source: ActuatorError,
    },
    #[error("no available {facility} slot matching {time}")]
    NoMatch { facility: String, time: String },
    #[error("unusable booking date `{0}`, expected yyyy-mm-dd")]
    BadDate(String),
}

impl SessionError {
    #[must_use]
    pub const fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Step { source, .. } => match source {
                ActuatorError::WaitTimeout { .. } => FailureKind::Timeout,
                ActuatorError::NotFound(_) => FailureKind::ElementNotFound,
                ActuatorError::StaleHandle(_) | ActuatorError::Driver(_) => {
                    FailureKind::Unexpected
                }
            },
            Self::NoMatch { .. } => FailureKind::NoMatch,
            Self::BadDate(_) => FailureKind::Unexpected,
        }
    }
}

/// Terminal failure classification carried by [`crate::SessionState::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    ElementNotFound,
    NoMatch,
    Unexpected,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Timeout => "timeout",
            Self::ElementNotFound => "element_not_found",
            Self::NoMatch => "no_match",
            Self::Unexpected => "unexpected_error",
        })
    }
}

pub(crate) fn at_step(step: Step) -> impl Fn(ActuatorError) -> SessionError {
    move |source| SessionError::Step { step, source }
}
