//! Scoring and selection of a court/time slot among scraped search results.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// One bookable slot button as scraped from a result card. Several slots
/// usually share the same court title and description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSlot {
    pub court_title: String,
    pub court_description: String,
    pub raw_slot_label: String,
    pub is_available: bool,
}

/// Outcome of a matching pass. `court_title` and `slot_label` identify the
/// page element to activate when `matched` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched: bool,
    pub court_title: Option<String>,
    pub slot_label: Option<String>,
    pub score: u32,
}

impl MatchResult {
    const fn no_match() -> Self {
        Self {
            matched: false,
            court_title: None,
            slot_label: None,
            score: 0,
        }
    }
}

const FACILITY_SCORE: u32 = 100;
const COURT_NUMBER_SCORE: u32 = 50;
const SYNONYM_SCORE: u32 = 30;
const TIME_AVAILABLE_SCORE: u32 = 50;

struct CourtGroup<'a> {
    title: &'a str,
    description: &'a str,
    slots: Vec<&'a CandidateSlot>,
}

/// Picks the best court and slot for the desired facility and time.
///
/// Candidates are grouped per court by title and description in first-seen
/// order. Courts whose combined text lacks the facility name are discarded
/// outright, and a court without an available slot matching one of the time
/// templates cannot be booked, so it is excluded even when its base score is
/// positive. Among the rest the highest total score wins, ties going to the
/// court seen first; within the winning court the first matching slot in
/// page order is taken.
///
/// This never fails: an unparseable desired time produces templates that
/// match nothing and the result simply comes back unmatched.
#[must_use]
pub fn match_slots(
    facility: &str,
    time_templates: &[String],
    preferred_court: Option<&str>,
    candidates: &[CandidateSlot],
) -> MatchResult {
    let facility = facility.trim().to_lowercase();
    if facility.is_empty() {
        return MatchResult::no_match();
    }
    let preferred_court = preferred_court.map(str::trim).filter(|c| !c.is_empty());

    let mut groups: Vec<CourtGroup<'_>> = Vec::new();
    for candidate in candidates {
        match groups.iter_mut().find(|g| {
            g.title == candidate.court_title && g.description == candidate.court_description
        }) {
            Some(group) => group.slots.push(candidate),
            None => groups.push(CourtGroup {
                title: &candidate.court_title,
                description: &candidate.court_description,
                slots: vec![candidate],
            }),
        }
    }

    let mut best: Option<(u32, &str, &str)> = None;
    for group in &groups {
        let text = format!("{} {}", group.title, group.description).to_lowercase();
        if !text.contains(&facility) {
            continue;
        }
        let mut score = FACILITY_SCORE;

        if let Some(court) = preferred_court {
            if text.contains(&format!("{facility} {court}"))
                || text.contains(&format!("{facility} court {court}"))
            {
                score += COURT_NUMBER_SCORE;
            }
        }
        if facility.contains("badminton") && text.contains("badminton") {
            score += SYNONYM_SCORE;
        }
        if facility.contains("pickle") && text.contains("pickle") {
            score += SYNONYM_SCORE;
        }

        let Some(slot) = first_matching_slot(&group.slots, time_templates) else {
            debug!(court = group.title, score, "no available slot at the desired time");
            continue;
        };
        score += TIME_AVAILABLE_SCORE;
        debug!(court = group.title, score, slot = %slot.raw_slot_label, "candidate court");

        // strictly-greater keeps the first seen on ties
        if best.is_none_or(|(best_score, _, _)| score > best_score) {
            best = Some((score, group.title, &slot.raw_slot_label));
        }
    }

    match best {
        Some((score, title, label)) => MatchResult {
            matched: true,
            court_title: Some(title.to_owned()),
            slot_label: Some(label.to_owned()),
            score,
        },
        None => MatchResult::no_match(),
    }
}

fn first_matching_slot<'a>(
    slots: &[&'a CandidateSlot],
    time_templates: &[String],
) -> Option<&'a CandidateSlot> {
    slots.iter().copied().find(|slot| {
        if !slot.is_available {
            return false;
        }
        let label = slot.raw_slot_label.to_lowercase();
        time_templates
            .iter()
            .any(|template| label.contains(&template.to_lowercase()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::NormalizedTime;

    fn slot(title: &str, label: &str, available: bool) -> CandidateSlot {
        CandidateSlot {
            court_title: title.to_owned(),
            court_description: String::new(),
            raw_slot_label: label.to_owned(),
            is_available: available,
        }
    }

    fn templates(raw: &str) -> Vec<String> {
        NormalizedTime::parse(raw).templates()
    }

    #[test]
    fn preferred_court_wins_over_its_siblings() {
        let candidates = vec![
            slot("Badminton Court 3", "7:00 pm - 8:00 pm", true),
            slot("Badminton Court 1", "7:00 pm - 8:00 pm", true),
        ];
        let result = match_slots("badminton", &templates("7pm"), Some("3"), &candidates);
        assert!(result.matched);
        assert_eq!(result.court_title.as_deref(), Some("Badminton Court 3"));
        assert_eq!(result.slot_label.as_deref(), Some("7:00 pm - 8:00 pm"));
        assert_eq!(result.score, 230);

        // and the runner-up really was 50 behind
        let runner_up = match_slots(
            "badminton",
            &templates("7pm"),
            Some("3"),
            &candidates[1..],
        );
        assert_eq!(runner_up.score, 180);
    }

    #[test]
    fn court_number_bonus_is_exactly_fifty() {
        let with = match_slots(
            "pickleball",
            &templates("9am"),
            Some("2"),
            &[slot("Pickleball Court 2", "9:00 am - 10:00 am", true)],
        );
        let without = match_slots(
            "pickleball",
            &templates("9am"),
            None,
            &[slot("Pickleball Court 2", "9:00 am - 10:00 am", true)],
        );
        assert_eq!(with.score, without.score + 50);
    }

    #[test]
    fn irrelevant_courts_are_discarded_regardless_of_boosts() {
        // court number and time both line up, but the facility gate fails
        let result = match_slots(
            "badminton",
            &templates("7pm"),
            Some("3"),
            &[slot("Tennis Court 3", "7:00 pm - 8:00 pm", true)],
        );
        assert!(!result.matched);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn court_without_matching_open_slot_is_excluded() {
        let candidates = vec![
            // right facility, slot taken
            slot("Badminton Court 1", "7:00 pm - 8:00 pm", false),
            // right facility, wrong hour
            slot("Badminton Court 2", "5:00 pm - 6:00 pm", true),
        ];
        let result = match_slots("badminton", &templates("7pm"), None, &candidates);
        assert!(!result.matched);
    }

    #[test]
    fn ties_resolve_to_the_court_seen_first() {
        let candidates = vec![
            slot("Badminton Court 5", "7:00 pm - 8:00 pm", true),
            slot("Badminton Court 6", "7:00 pm - 8:00 pm", true),
        ];
        let result = match_slots("badminton", &templates("7pm"), None, &candidates);
        assert_eq!(result.court_title.as_deref(), Some("Badminton Court 5"));
    }

    #[test]
    fn first_matching_slot_in_page_order_is_taken() {
        let candidates = vec![
            slot("Badminton Court 1", "6:00 pm - 7:00 pm", true),
            slot("Badminton Court 1", "7:00 pm - 8:00 pm", false),
            slot("Badminton Court 1", " 7:00 pm - 8:00 pm", true),
            slot("Badminton Court 1", "7:00 pm - 8:00 pm", true),
        ];
        let result = match_slots("badminton", &templates("7pm"), None, &candidates);
        assert_eq!(result.slot_label.as_deref(), Some(" 7:00 pm - 8:00 pm"));
    }

    #[test]
    fn repeated_invocation_is_identical() {
        let candidates = vec![
            slot("Badminton Court 3", "7:00 pm - 8:00 pm", true),
            slot("Badminton Court 1", "7:00 pm - 8:00 pm", true),
        ];
        let first = match_slots("badminton", &templates("7pm"), Some("3"), &candidates);
        let second = match_slots("badminton", &templates("7pm"), Some("3"), &candidates);
        assert_eq!(first, second);
    }

    #[test]
    fn unparseable_time_fails_soft() {
        let result = match_slots(
            "badminton",
            &templates("sometime"),
            None,
            &[slot("Badminton Court 1", "7:00 pm - 8:00 pm", true)],
        );
        assert!(!result.matched);
    }

    #[test]
    fn no_candidates_is_no_match() {
        let result = match_slots("badminton", &templates("7pm"), None, &[]);
        assert_eq!(result, MatchResult::no_match());
    }
}
