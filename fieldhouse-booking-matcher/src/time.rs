//! Normalization of free-form booking times ("7pm", "7:00", "19:00") into a
//! comparable 24-hour representation plus the display strings the booking
//! site renders on its slot buttons.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Start-of-day/afternoon marker as rendered on slot buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Meridiem {
    Am,
    Pm,
}

impl fmt::Display for Meridiem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Am => f.write_str("am"),
            Self::Pm => f.write_str("pm"),
        }
    }
}

/// A parsed booking time together with the one-hour-later end boundary.
/// Bookable slots are always exactly one hour long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedTime {
    pub hour24: u32,
    pub minute: u32,
    pub hour12: u32,
    pub meridiem: Meridiem,
    pub next_hour12: u32,
    pub next_meridiem: Meridiem,
}

impl NormalizedTime {
    /// Parses a free-form time string.
    ///
    /// Accepts "7pm", "7:00pm", "7:00 p.m.", "19:00" and the like. AM/PM
    /// markers are detected by substring; with neither marker present, hours
    /// below 12 are read as morning and the rest as afternoon (this only
    /// affects the display strings since the numeric value is kept as-is).
    /// Unparseable input degrades to 0:00 rather than failing; such a time
    /// will simply never match a real slot label.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let clean = raw.trim().to_lowercase();

        let mut am = ["a.m.", "a.m", "am"].iter().any(|m| clean.contains(m));
        let mut pm = ["p.m.", "p.m", "pm"].iter().any(|m| clean.contains(m));

        let core: String = clean
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == ':')
            .collect();

        let (hour_raw, minute) = match core.split_once(':') {
            Some((h, m)) => (h.parse().unwrap_or(0), m.parse().unwrap_or(0)),
            None => (core.parse::<u32>().unwrap_or(0), 0),
        };

        let mut hour24 = hour_raw;
        if pm && hour24 < 12 {
            hour24 += 12;
        } else if am && hour24 == 12 {
            hour24 = 0;
        } else if !am && !pm {
            if hour24 < 12 {
                am = true;
            } else {
                pm = true;
            }
        }
        hour24 %= 24;

        let meridiem = if am || (hour24 < 12 && !pm) {
            Meridiem::Am
        } else {
            Meridiem::Pm
        };

        let next_hour24 = (hour24 + 1) % 24;
        let next_meridiem = if next_hour24 < 12 {
            Meridiem::Am
        } else {
            Meridiem::Pm
        };

        Self {
            hour24,
            minute,
            hour12: to_display_hour(hour24),
            meridiem,
            next_hour12: to_display_hour(next_hour24),
            next_meridiem,
        }
    }

    /// Candidate display strings for substring matching against slot labels,
    /// most specific first. The ordering is a correctness requirement: the
    /// looser templates at the tail can hit slot labels that merely start
    /// with the same hour, so a match is always taken from the earliest
    /// template that fires.
    #[must_use]
    pub fn templates(&self) -> Vec<String> {
        let Self {
            minute: mm,
            hour12: h,
            meridiem: ap,
            next_hour12: nh,
            next_meridiem: nap,
            ..
        } = *self;
        vec![
            format!("{h}:00 {ap} - {nh}:00 {nap}"),
            format!("{h}:{mm:02} {ap} - {nh}:{mm:02} {nap}"),
            format!(" {h}:00 {ap} - {nh}:00 {nap}"),
            format!(" {h}:00 {ap} -  {nh}:00 {nap}"),
            format!("{h}:{mm:02} {ap}"),
            format!("{h} {ap}"),
        ]
    }
}

const fn to_display_hour(hour24: u32) -> u32 {
    let h = hour24 % 12;
    if h == 0 {
        12
    } else {
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evening_formats_agree() {
        for raw in ["7pm", "7:00pm", "19:00", " 7 PM ", "7 p.m."] {
            let t = NormalizedTime::parse(raw);
            assert_eq!((t.hour24, t.minute), (19, 0), "input {raw:?}");
            assert_eq!(t.meridiem, Meridiem::Pm);
        }
    }

    #[test]
    fn midnight_and_noon() {
        assert_eq!(NormalizedTime::parse("12am").hour24, 0);
        assert_eq!(NormalizedTime::parse("12pm").hour24, 12);
        assert_eq!(NormalizedTime::parse("12:30 a.m.").minute, 30);
    }

    #[test]
    fn bare_hours_infer_meridiem_for_display_only() {
        let morning = NormalizedTime::parse("9");
        assert_eq!(morning.hour24, 9);
        assert_eq!(morning.meridiem, Meridiem::Am);

        let evening = NormalizedTime::parse("19");
        assert_eq!(evening.hour24, 19);
        assert_eq!(evening.meridiem, Meridiem::Pm);
    }

    #[test]
    fn most_specific_template_is_the_full_range() {
        let t = NormalizedTime::parse("7pm");
        assert_eq!(t.templates()[0], "7:00 pm - 8:00 pm");
    }

    #[test]
    fn template_order_runs_specific_to_loose() {
        let t = NormalizedTime::parse("7:30pm");
        assert_eq!(
            t.templates(),
            vec![
                "7:00 pm - 8:00 pm".to_owned(),
                "7:30 pm - 8:30 pm".to_owned(),
                " 7:00 pm - 8:00 pm".to_owned(),
                " 7:00 pm -  8:00 pm".to_owned(),
                "7:30 pm".to_owned(),
                "7 pm".to_owned(),
            ]
        );
    }

    #[test]
    fn late_slot_wraps_into_the_next_morning() {
        let t = NormalizedTime::parse("11pm");
        assert_eq!(t.hour24, 23);
        assert_eq!(t.next_hour12, 12);
        assert_eq!(t.next_meridiem, Meridiem::Am);
        assert_eq!(t.templates()[0], "11:00 pm - 12:00 am");
    }

    #[test]
    fn garbage_degrades_to_midnight() {
        let t = NormalizedTime::parse("whenever");
        assert_eq!((t.hour24, t.minute), (0, 0));
        assert_eq!(t.hour12, 12);
    }
}
