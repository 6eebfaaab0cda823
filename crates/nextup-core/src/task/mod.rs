//! Task types for the contextual to-do model.
//!
//! A task carries the two attributes the recommendation engine matches
//! against the user's live context: an energy requirement and a duration
//! estimate. Deadlines and completion are optional timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Maximum title length accepted on create/update.
pub const MAX_TITLE_LEN: usize = 200;
/// Maximum description length accepted on create/update.
pub const MAX_DESCRIPTION_LEN: usize = 1000;
/// Smallest accepted duration estimate in minutes.
pub const MIN_ESTIMATED_MINUTES: u32 = 1;
/// Largest accepted duration estimate in minutes (8 hours).
pub const MAX_ESTIMATED_MINUTES: u32 = 480;

/// Energy level required by a task or reported by the user.
///
/// Levels are totally ordered (`Low < Medium < High`); the derived order
/// is what the eligibility filter and the energy-match scorer compare.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLevel {
    /// Low energy (e.g., end of day)
    Low,
    /// Medium energy (default)
    Medium,
    /// High energy (e.g., morning)
    High,
}

impl EnergyLevel {
    /// Integer rank used for comparisons: low=1, medium=2, high=3.
    pub fn ordinal(&self) -> u8 {
        match self {
            EnergyLevel::Low => 1,
            EnergyLevel::Medium => 2,
            EnergyLevel::High => 3,
        }
    }

    /// Lowercase display name, matching the wire representation.
    pub fn name(&self) -> &'static str {
        match self {
            EnergyLevel::Low => "low",
            EnergyLevel::Medium => "medium",
            EnergyLevel::High => "high",
        }
    }
}

impl Default for EnergyLevel {
    fn default() -> Self {
        EnergyLevel::Medium
    }
}

impl fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EnergyLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(EnergyLevel::Low),
            "medium" => Ok(EnergyLevel::Medium),
            "high" => Ok(EnergyLevel::High),
            other => Err(ValidationError::InvalidValue {
                field: "energy",
                message: format!("must be low, medium, or high (got '{other}')"),
            }),
        }
    }
}

/// A single to-do item owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier
    pub id: String,
    /// Owning user's identifier
    pub user_id: String,
    /// Display title
    pub title: String,
    /// Optional free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Energy level this task demands
    pub energy_required: EnergyLevel,
    /// Duration estimate in minutes (1..=480)
    pub estimated_time_minutes: u32,
    /// Optional deadline; absent means "no deadline"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Completion timestamp; present means the task is done
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a new open task with a fresh id.
    pub fn new(
        user_id: impl Into<String>,
        title: impl Into<String>,
        energy_required: EnergyLevel,
        estimated_time_minutes: u32,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            title: title.into(),
            description: None,
            energy_required,
            estimated_time_minutes,
            deadline: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Builder-style description setter.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder-style deadline setter.
    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Whether the task has been completed.
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Check the field constraints the persistence layer relies on.
    ///
    /// The recommendation engine assumes these hold; callers validate
    /// external input before a task reaches storage or the engine.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyField("title"));
        }
        if self.title.chars().count() > MAX_TITLE_LEN {
            return Err(ValidationError::InvalidValue {
                field: "title",
                message: format!("cannot exceed {MAX_TITLE_LEN} characters"),
            });
        }
        if let Some(description) = &self.description {
            if description.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(ValidationError::InvalidValue {
                    field: "description",
                    message: format!("cannot exceed {MAX_DESCRIPTION_LEN} characters"),
                });
            }
        }
        if self.estimated_time_minutes < MIN_ESTIMATED_MINUTES
            || self.estimated_time_minutes > MAX_ESTIMATED_MINUTES
        {
            return Err(ValidationError::InvalidValue {
                field: "estimatedTimeMinutes",
                message: format!(
                    "must be between {MIN_ESTIMATED_MINUTES} and {MAX_ESTIMATED_MINUTES} minutes"
                ),
            });
        }
        Ok(())
    }
}
