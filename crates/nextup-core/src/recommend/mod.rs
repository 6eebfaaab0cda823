//! Contextual task recommendation engine.
//!
//! Picks "the one task to do now" from a task list given two live inputs:
//! how much time the user has and how much energy they feel.
//!
//! # Philosophy
//!
//! Don't schedule the future. Filter the list down to tasks that are
//! possible right now, score the survivors along three bounded dimensions
//! (deadline urgency, energy match, time fit), and explain the top pick in
//! one sentence. The whole pipeline is a pure function of its inputs: no
//! stored state, no I/O, no learned weights.

mod engine;
mod explain;
mod scoring;

pub use engine::{
    recommend, recommend_at, score_task, RecommendationContext, RecommendationResult, ScoredTask,
    EMPTY_RESULT_MESSAGE, RESULT_MESSAGE,
};
pub use explain::{format_duration, format_relative_deadline};
pub use scoring::{deadline_score, energy_match_score, time_efficiency_score, ScoreBreakdown};
