//! Scoring functions for the recommendation engine.
//!
//! Each eligible task gets three independent, bounded, additive sub-scores:
//! deadline urgency (0-40), energy match (0-30), and time efficiency (0-30).
//! The threshold ladders are ordered `(bound, score, label)` tables evaluated
//! first-match-wins; reordering a row changes semantics, so they stay tables
//! rather than nested conditionals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::EnergyLevel;

/// Score and band label for a task with no deadline.
const DEADLINE_NONE: (u8, &str) = (15, "no deadline");
/// Score and band label for a deadline already in the past.
const DEADLINE_OVERDUE: (u8, &str) = (40, "overdue");
/// Upper bounds in hours, first match wins.
const DEADLINE_LADDER: [(f64, u8, &str); 3] = [
    (24.0, 38, "due within 24 hours"),
    (48.0, 32, "due within 2 days"),
    (168.0, 24, "due this week"),
];
/// Fallback for deadlines more than a week out.
const DEADLINE_FLEXIBLE: (u8, &str) = (10, "deadline is flexible");

/// Utilization upper bounds, first match wins.
const TIME_LADDER: [(f64, u8, &str); 3] = [
    (0.3, 25, "quick task"),
    (0.6, 30, "fits well in your time"),
    (0.9, 22, "uses most of your time"),
];
/// Fallback for tasks that barely fit.
const TIME_TIGHT_FIT: (u8, &str) = (15, "tight fit");

/// The three sub-scores of one scored task, kept separate for transparency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    /// Deadline urgency contribution (0-40)
    pub deadline_score: u8,
    /// Energy match contribution (0-30)
    pub energy_match_score: u8,
    /// Time efficiency contribution (0-30)
    pub time_efficiency_score: u8,
}

impl ScoreBreakdown {
    /// Sum of the three sub-scores (0-100 under valid filtered input).
    pub fn total(&self) -> u8 {
        self.deadline_score + self.energy_match_score + self.time_efficiency_score
    }
}

/// Signed hours between `now` and `deadline` (negative when past).
///
/// Millisecond precision, so a deadline even a fraction of a second in the
/// past counts as overdue.
pub(crate) fn hours_until(deadline: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (deadline - now).num_milliseconds() as f64 / 3_600_000.0
}

/// Deadline urgency score (0-40). Closer deadlines score higher; a missing
/// deadline gets a moderate baseline rather than zero.
pub fn deadline_score(
    deadline: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> (u8, &'static str) {
    let Some(deadline) = deadline else {
        return DEADLINE_NONE;
    };

    let hours = hours_until(deadline, now);
    if hours < 0.0 {
        return DEADLINE_OVERDUE;
    }
    for &(bound, score, label) in &DEADLINE_LADDER {
        if hours <= bound {
            return (score, label);
        }
    }
    DEADLINE_FLEXIBLE
}

/// Energy match score (0-30). An exact match beats having energy to spare.
///
/// The mismatch branch (task demands more than the user has) scores zero.
/// The eligibility filter removes such tasks before scoring, so the branch
/// is only reachable when the scorer is called directly.
pub fn energy_match_score(task_energy: EnergyLevel, user_energy: EnergyLevel) -> u8 {
    if task_energy == user_energy {
        30
    } else if task_energy < user_energy {
        20
    } else {
        0
    }
}

/// Time efficiency score (0-30) on `utilization = task / available`.
///
/// Non-monotonic by design: a well-fitted task (utilization in (0.3, 0.6])
/// outranks a very quick one. Good use of the time budget beats raw
/// shortness, while quick tasks keep a respectable score for momentum.
pub fn time_efficiency_score(task_minutes: u32, available_minutes: u32) -> (u8, &'static str) {
    let utilization = f64::from(task_minutes) / f64::from(available_minutes);

    for &(bound, score, label) in &TIME_LADDER {
        if utilization <= bound {
            return (score, label);
        }
    }
    TIME_TIGHT_FIT
}
