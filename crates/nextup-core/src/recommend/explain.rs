//! Natural-language explanation for a scored task.
//!
//! Deterministic template composition, not free text: the UI displays these
//! strings verbatim, so the clause thresholds and phrasing are part of the
//! engine's contract.

use chrono::{DateTime, Utc};

use super::scoring::{hours_until, ScoreBreakdown};
use crate::recommend::RecommendationContext;
use crate::task::Task;

/// Minimum energy sub-score for the "matches your ... energy" clause.
const ENERGY_EXACT_CLAUSE_MIN: u8 = 25;
/// Minimum energy sub-score for the "doable" clause.
const ENERGY_DOABLE_CLAUSE_MIN: u8 = 15;
/// Minimum deadline sub-score for the "and is ..." phrasing.
const DEADLINE_URGENT_CLAUSE_MIN: u8 = 35;
/// Minimum deadline sub-score for the "with a deadline ..." phrasing.
const DEADLINE_SOFT_CLAUSE_MIN: u8 = 25;

/// Render a minute count as "{m} min", "{h}h", or "{h}h {m}m".
pub fn format_duration(minutes: u32) -> String {
    if minutes < 60 {
        return format!("{minutes} min");
    }
    let hours = minutes / 60;
    let mins = minutes % 60;
    if mins > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{hours}h")
    }
}

/// Render a deadline relative to `now`: "overdue", "due today",
/// "due tomorrow", or "due in {n} days".
pub fn format_relative_deadline(deadline: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = hours_until(deadline, now);

    if hours < 0.0 {
        "overdue".to_string()
    } else if hours < 24.0 {
        "due today".to_string()
    } else if hours < 48.0 {
        "due tomorrow".to_string()
    } else {
        let days = (hours / 24.0).ceil() as i64;
        format!("due in {days} days")
    }
}

/// Compose the one-sentence justification for a scored task.
///
/// Clauses are joined with ", " and the sentence ends with a period. The
/// energy and deadline clauses appear only above their sub-score thresholds;
/// the duration clause is always present.
pub(crate) fn generate_explanation(
    task: &Task,
    breakdown: &ScoreBreakdown,
    context: &RecommendationContext,
    now: DateTime<Utc>,
) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(4);

    parts.push("Recommended because".to_string());

    if breakdown.energy_match_score >= ENERGY_EXACT_CLAUSE_MIN {
        parts.push(format!("it matches your {} energy", context.current_energy));
    } else if breakdown.energy_match_score >= ENERGY_DOABLE_CLAUSE_MIN {
        parts.push("it's doable with your current energy".to_string());
    }

    parts.push(format!(
        "takes {}",
        format_duration(task.estimated_time_minutes)
    ));

    if let Some(deadline) = task.deadline {
        let relative = format_relative_deadline(deadline, now);
        if breakdown.deadline_score >= DEADLINE_URGENT_CLAUSE_MIN {
            parts.push(format!("and is {relative}"));
        } else if breakdown.deadline_score >= DEADLINE_SOFT_CLAUSE_MIN {
            parts.push(format!("with a deadline {relative}"));
        }
    }

    format!("{}.", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::EnergyLevel;
    use chrono::Duration;

    fn context(minutes: u32, energy: EnergyLevel) -> RecommendationContext {
        RecommendationContext {
            available_time_minutes: minutes,
            current_energy: energy,
        }
    }

    #[test]
    fn duration_renders_minutes_and_hours() {
        assert_eq!(format_duration(1), "1 min");
        assert_eq!(format_duration(59), "59 min");
        assert_eq!(format_duration(60), "1h");
        assert_eq!(format_duration(90), "1h 30m");
        assert_eq!(format_duration(480), "8h");
    }

    #[test]
    fn relative_deadline_bands() {
        let now = Utc::now();
        assert_eq!(format_relative_deadline(now - Duration::hours(1), now), "overdue");
        assert_eq!(format_relative_deadline(now + Duration::hours(5), now), "due today");
        assert_eq!(
            format_relative_deadline(now + Duration::hours(30), now),
            "due tomorrow"
        );
        assert_eq!(
            format_relative_deadline(now + Duration::hours(49), now),
            "due in 3 days"
        );
        assert_eq!(
            format_relative_deadline(now + Duration::hours(24 * 6), now),
            "due in 6 days"
        );
    }

    #[test]
    fn explanation_with_exact_energy_match_and_urgent_deadline() {
        let now = Utc::now();
        let task = Task::new("u1", "Pay invoice", EnergyLevel::Medium, 30)
            .with_deadline(now + Duration::hours(5));
        let breakdown = ScoreBreakdown {
            deadline_score: 38,
            energy_match_score: 30,
            time_efficiency_score: 30,
        };
        let text = generate_explanation(
            &task,
            &breakdown,
            &context(60, EnergyLevel::Medium),
            now,
        );
        assert_eq!(
            text,
            "Recommended because, it matches your medium energy, takes 30 min, and is due today."
        );
    }

    #[test]
    fn explanation_with_spare_energy_and_soft_deadline() {
        let now = Utc::now();
        let task = Task::new("u1", "Tidy desk", EnergyLevel::Low, 90)
            .with_deadline(now + Duration::hours(100));
        let breakdown = ScoreBreakdown {
            deadline_score: 24,
            energy_match_score: 20,
            time_efficiency_score: 22,
        };
        let text = generate_explanation(&task, &breakdown, &context(120, EnergyLevel::High), now);
        assert_eq!(
            text,
            "Recommended because, it's doable with your current energy, takes 1h 30m."
        );
    }

    #[test]
    fn explanation_omits_energy_and_deadline_clauses_below_thresholds() {
        let now = Utc::now();
        // Deadline far out (score 10) stays silent even though it exists.
        let task = Task::new("u1", "Read paper", EnergyLevel::High, 45)
            .with_deadline(now + Duration::days(30));
        let breakdown = ScoreBreakdown {
            deadline_score: 10,
            energy_match_score: 0,
            time_efficiency_score: 30,
        };
        let text = generate_explanation(&task, &breakdown, &context(90, EnergyLevel::Low), now);
        assert_eq!(text, "Recommended because, takes 45 min.");
    }

    #[test]
    fn explanation_with_deadline_in_soft_band() {
        let now = Utc::now();
        let task = Task::new("u1", "Draft slides", EnergyLevel::Medium, 60)
            .with_deadline(now + Duration::hours(36));
        let breakdown = ScoreBreakdown {
            deadline_score: 32,
            energy_match_score: 30,
            time_efficiency_score: 22,
        };
        let text = generate_explanation(&task, &breakdown, &context(90, EnergyLevel::Medium), now);
        assert_eq!(
            text,
            "Recommended because, it matches your medium energy, takes 1h, with a deadline due tomorrow."
        );
    }
}
