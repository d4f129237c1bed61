//! Pure decision logic for picking a court and time slot out of scraped
//! search results. No I/O happens here; the session layer feeds in structured
//! records and clicks whatever this crate selects, which keeps the whole
//! matching policy unit-testable without a browser.

pub mod slot;
pub mod time;

pub use slot::{match_slots, CandidateSlot, MatchResult};
pub use time::{Meridiem, NormalizedTime};
