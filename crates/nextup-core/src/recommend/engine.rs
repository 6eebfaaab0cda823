//! Recommendation pipeline: filter, score, explain, rank, select.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::explain::generate_explanation;
use super::scoring::{
    deadline_score, energy_match_score, time_efficiency_score, ScoreBreakdown,
};
use crate::task::{EnergyLevel, Task};

/// Lead-in message when at least one task qualifies.
pub const RESULT_MESSAGE: &str = "Based on what you can handle right now...";

/// Message when nothing fits the context.
pub const EMPTY_RESULT_MESSAGE: &str = "No tasks fit this context. Try adjusting your available \
                                        time or energy level, or add some new tasks.";

/// Maximum number of runner-up tasks returned next to the top pick.
const MAX_ALTERNATIVES: usize = 2;

/// The user's live situation: how much time and energy they have right now.
///
/// Ephemeral input, never persisted. Callers validate raw external values
/// (positive minutes, known energy names) before building one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationContext {
    /// Time budget for the next task, in minutes
    pub available_time_minutes: u32,
    /// Self-reported energy level
    pub current_energy: EnergyLevel,
}

/// A task together with its score, sub-scores, and justification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredTask {
    /// The originating task, untouched
    pub task: Task,
    /// Sum of the three sub-scores (0-100)
    pub score: u8,
    /// The three sub-scores individually, for transparency
    pub breakdown: ScoreBreakdown,
    /// One-sentence justification for surfacing this task
    pub explanation: String,
}

/// The engine's sole output: top pick, up to two runners-up, and a summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    /// Highest-scoring eligible task, absent when nothing qualifies
    pub recommended: Option<ScoredTask>,
    /// Next-highest eligible tasks, descending by score, length <= 2
    pub alternatives: Vec<ScoredTask>,
    /// Human-readable summary line
    pub message: String,
}

/// A task is eligible when it is not completed, fits the time budget
/// (a task exactly equal to the available time still fits), and does not
/// demand more energy than the user has.
fn is_eligible(task: &Task, context: &RecommendationContext) -> bool {
    if task.completed_at.is_some() {
        return false;
    }
    if task.estimated_time_minutes > context.available_time_minutes {
        return false;
    }
    if task.energy_required.ordinal() > context.current_energy.ordinal() {
        return false;
    }
    true
}

/// Score a single task against the context at the given instant.
///
/// Assumes the task already passed the eligibility filter; calling it on an
/// ineligible task still returns a well-formed (if low) score.
pub fn score_task(task: &Task, context: &RecommendationContext, now: DateTime<Utc>) -> ScoredTask {
    let (deadline, _) = deadline_score(task.deadline, now);
    let energy = energy_match_score(task.energy_required, context.current_energy);
    let (time, _) =
        time_efficiency_score(task.estimated_time_minutes, context.available_time_minutes);

    let breakdown = ScoreBreakdown {
        deadline_score: deadline,
        energy_match_score: energy,
        time_efficiency_score: time,
    };
    let explanation = generate_explanation(task, &breakdown, context, now);

    ScoredTask {
        task: task.clone(),
        score: breakdown.total(),
        breakdown,
        explanation,
    }
}

/// Run the full pipeline with an explicit clock, for deterministic results.
///
/// Filter -> score -> rank -> select. The sort is stable, so equal scores
/// keep their original relative order; there is no further tie-break rule.
pub fn recommend_at(
    tasks: &[Task],
    context: &RecommendationContext,
    now: DateTime<Utc>,
) -> RecommendationResult {
    let mut scored: Vec<ScoredTask> = tasks
        .iter()
        .filter(|task| is_eligible(task, context))
        .map(|task| score_task(task, context, now))
        .collect();

    if scored.is_empty() {
        return RecommendationResult {
            recommended: None,
            alternatives: Vec::new(),
            message: EMPTY_RESULT_MESSAGE.to_string(),
        };
    }

    scored.sort_by(|a, b| b.score.cmp(&a.score));

    let mut iter = scored.into_iter();
    let recommended = iter.next();
    let alternatives: Vec<ScoredTask> = iter.take(MAX_ALTERNATIVES).collect();

    RecommendationResult {
        recommended,
        alternatives,
        message: RESULT_MESSAGE.to_string(),
    }
}

/// Run the full pipeline against the current wall clock.
pub fn recommend(tasks: &[Task], context: &RecommendationContext) -> RecommendationResult {
    recommend_at(tasks, context, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn task(title: &str, energy: EnergyLevel, minutes: u32) -> Task {
        Task::new("u1", title, energy, minutes)
    }

    fn context(minutes: u32, energy: EnergyLevel) -> RecommendationContext {
        RecommendationContext {
            available_time_minutes: minutes,
            current_energy: energy,
        }
    }

    #[test]
    fn empty_task_list_yields_empty_state() {
        let result = recommend_at(&[], &context(60, EnergyLevel::Medium), Utc::now());
        assert!(result.recommended.is_none());
        assert!(result.alternatives.is_empty());
        assert_eq!(result.message, EMPTY_RESULT_MESSAGE);
    }

    #[test]
    fn completed_tasks_are_never_recommended() {
        let now = Utc::now();
        let mut done = task("Done already", EnergyLevel::Low, 10);
        done.completed_at = Some(now - Duration::hours(1));
        let result = recommend_at(&[done], &context(60, EnergyLevel::High), now);
        assert!(result.recommended.is_none());
        assert_eq!(result.message, EMPTY_RESULT_MESSAGE);
    }

    #[test]
    fn task_exactly_filling_the_budget_is_eligible() {
        // Exact fit, no deadline: deadline 15 + energy 30 + time 15 (tight fit) = 60
        let now = Utc::now();
        let t = task("Exact fit", EnergyLevel::Medium, 30);
        let result = recommend_at(&[t], &context(30, EnergyLevel::Medium), now);
        let top = result.recommended.expect("task should be eligible");
        assert_eq!(top.breakdown.deadline_score, 15);
        assert_eq!(top.breakdown.energy_match_score, 30);
        assert_eq!(top.breakdown.time_efficiency_score, 15);
        assert_eq!(top.score, 60);
        assert_eq!(result.message, RESULT_MESSAGE);
    }

    #[test]
    fn task_over_the_time_budget_is_excluded() {
        let now = Utc::now();
        let t = task("Too long", EnergyLevel::Low, 31);
        let result = recommend_at(&[t], &context(30, EnergyLevel::High), now);
        assert!(result.recommended.is_none());
    }

    #[test]
    fn high_energy_task_is_excluded_for_low_energy_user() {
        let now = Utc::now();
        // Urgent and short, but still out of reach.
        let t = task("Deep work", EnergyLevel::High, 10)
            .with_deadline(now + Duration::hours(1));
        let result = recommend_at(&[t], &context(60, EnergyLevel::Low), now);
        assert!(result.recommended.is_none());
        assert!(result.alternatives.is_empty());
    }

    #[test]
    fn low_energy_task_is_offered_to_any_user() {
        let now = Utc::now();
        let t = task("Easy filing", EnergyLevel::Low, 10);
        let result = recommend_at(&[t], &context(60, EnergyLevel::High), now);
        assert!(result.recommended.is_some());
    }

    #[test]
    fn overdue_task_outranks_task_without_deadline() {
        let now = Utc::now();
        let flexible = task("No deadline", EnergyLevel::Medium, 30);
        let overdue = task("Overdue", EnergyLevel::Medium, 30)
            .with_deadline(now - Duration::hours(2));
        let result = recommend_at(
            &[flexible, overdue],
            &context(60, EnergyLevel::Medium),
            now,
        );
        let top = result.recommended.unwrap();
        assert_eq!(top.task.title, "Overdue");
        assert_eq!(top.breakdown.deadline_score, 40);
        assert_eq!(result.alternatives[0].breakdown.deadline_score, 15);
    }

    #[test]
    fn alternatives_are_capped_at_two_and_sorted() {
        let now = Utc::now();
        let tasks = vec![
            task("A", EnergyLevel::Medium, 30),
            task("B", EnergyLevel::Medium, 30).with_deadline(now + Duration::hours(5)),
            task("C", EnergyLevel::Low, 10),
            task("D", EnergyLevel::Medium, 30).with_deadline(now - Duration::hours(1)),
        ];
        let result = recommend_at(&tasks, &context(60, EnergyLevel::Medium), now);
        let top = result.recommended.unwrap();
        assert_eq!(result.alternatives.len(), 2);
        assert!(top.score >= result.alternatives[0].score);
        assert!(result.alternatives[0].score >= result.alternatives[1].score);
        for alt in &result.alternatives {
            assert_ne!(alt.task.id, top.task.id);
        }
    }

    #[test]
    fn ties_preserve_input_order() {
        let now = Utc::now();
        let first = task("First", EnergyLevel::Medium, 30);
        let second = task("Second", EnergyLevel::Medium, 30);
        let result = recommend_at(
            &[first, second],
            &context(60, EnergyLevel::Medium),
            now,
        );
        assert_eq!(result.recommended.unwrap().task.title, "First");
        assert_eq!(result.alternatives[0].task.title, "Second");
    }

    #[test]
    fn identical_inputs_yield_identical_results() {
        let now = Utc::now();
        let tasks = vec![
            task("A", EnergyLevel::Medium, 30).with_deadline(now + Duration::hours(30)),
            task("B", EnergyLevel::Low, 15),
        ];
        let ctx = context(45, EnergyLevel::Medium);
        let a = recommend_at(&tasks, &ctx, now);
        let b = recommend_at(&tasks, &ctx, now);
        assert_eq!(
            serde_json::to_value(&a).unwrap(),
            serde_json::to_value(&b).unwrap()
        );
    }

    #[test]
    fn quick_task_scores_twenty_five_on_time_axis() {
        let now = Utc::now();
        let t = task("Quick reply", EnergyLevel::Medium, 10);
        let result = recommend_at(&[t], &context(60, EnergyLevel::Medium), now);
        let top = result.recommended.unwrap();
        assert_eq!(top.breakdown.time_efficiency_score, 25);
    }

    #[test]
    fn scored_task_never_mutates_the_input() {
        let now = Utc::now();
        let t = task("Untouched", EnergyLevel::Medium, 30);
        let before = serde_json::to_value(&t).unwrap();
        let _ = recommend_at(
            &[t.clone()],
            &context(60, EnergyLevel::Medium),
            now,
        );
        assert_eq!(before, serde_json::to_value(&t).unwrap());
    }
}
