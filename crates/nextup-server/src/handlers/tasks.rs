//! Task CRUD and the recommendation endpoint.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nextup_core::recommend::{recommend, RecommendationContext, RecommendationResult};
use nextup_core::task::{EnergyLevel, Task};

use super::authenticate;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub energy_required: EnergyLevel,
    pub estimated_time_minutes: u32,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub message: String,
    pub task: Task,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    #[serde(default)]
    pub available_time_minutes: Option<u32>,
    #[serde(default)]
    pub current_energy: Option<String>,
}

/// GET /api/tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TaskListResponse>, ApiError> {
    let user_id = authenticate(&state, &headers)?;
    let tasks = state.db()?.list_tasks(&user_id)?;
    Ok(Json(TaskListResponse { tasks }))
}

/// POST /api/tasks
pub async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<TaskPayload>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let user_id = authenticate(&state, &headers)?;

    let mut task = Task::new(
        &user_id,
        body.title,
        body.energy_required,
        body.estimated_time_minutes,
    );
    task.description = body.description;
    task.deadline = body.deadline;
    task.validate()?;

    state.db()?.create_task(&task)?;
    tracing::debug!(task_id = %task.id, user_id = %user_id, "task created");

    Ok((
        StatusCode::CREATED,
        Json(TaskResponse {
            message: "Task created".to_string(),
            task,
        }),
    ))
}

/// PUT /api/tasks/:id
///
/// Full replacement of the editable fields; an absent deadline clears any
/// stored one.
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<TaskPayload>,
) -> Result<Json<TaskResponse>, ApiError> {
    let user_id = authenticate(&state, &headers)?;

    let db = state.db()?;
    let Some(mut task) = db.get_task(&user_id, &id)? else {
        return Err(ApiError::not_found("Task not found"));
    };
    task.title = body.title;
    task.description = body.description;
    task.energy_required = body.energy_required;
    task.estimated_time_minutes = body.estimated_time_minutes;
    task.deadline = body.deadline;
    task.validate()?;
    db.update_task(&task)?;

    Ok(Json(TaskResponse {
        message: "Task updated".to_string(),
        task,
    }))
}

/// DELETE /api/tasks/:id
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, ApiError> {
    let user_id = authenticate(&state, &headers)?;
    if !state.db()?.delete_task(&user_id, &id)? {
        return Err(ApiError::not_found("Task not found"));
    }
    Ok(Json(MessageResponse {
        message: "Task deleted".to_string(),
    }))
}

/// PATCH /api/tasks/:id/complete
pub async fn complete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<TaskResponse>, ApiError> {
    let user_id = authenticate(&state, &headers)?;
    let task = state
        .db()?
        .complete_task(&user_id, &id, Utc::now())?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;
    Ok(Json(TaskResponse {
        message: "Nice work! Task completed.".to_string(),
        task,
    }))
}

/// PATCH /api/tasks/:id/uncomplete
pub async fn uncomplete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<TaskResponse>, ApiError> {
    let user_id = authenticate(&state, &headers)?;
    let task = state
        .db()?
        .uncomplete_task(&user_id, &id)?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;
    Ok(Json(TaskResponse {
        message: "Task marked as incomplete".to_string(),
        task,
    }))
}

/// POST /api/tasks/recommend
pub async fn recommend_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<RecommendRequest>,
) -> Result<Json<RecommendationResult>, ApiError> {
    let user_id = authenticate(&state, &headers)?;

    // The engine assumes validated input; raw values are rejected here.
    let available_time_minutes = body
        .available_time_minutes
        .filter(|&minutes| minutes > 0)
        .ok_or_else(|| {
            ApiError::bad_request(
                "Please provide your available time and current energy level.",
            )
        })?;
    let current_energy: EnergyLevel = body
        .current_energy
        .as_deref()
        .ok_or_else(|| {
            ApiError::bad_request(
                "Please provide your available time and current energy level.",
            )
        })?
        .parse()
        .map_err(|_| ApiError::bad_request("Energy level must be low, medium, or high."))?;

    let tasks = state.db()?.list_open_tasks(&user_id)?;
    let context = RecommendationContext {
        available_time_minutes,
        current_energy,
    };
    Ok(Json(recommend(&tasks, &context)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{bearer, seeded_user, test_state};

    fn payload(title: &str, energy: EnergyLevel, minutes: u32) -> Json<TaskPayload> {
        Json(TaskPayload {
            title: title.to_string(),
            description: None,
            energy_required: energy,
            estimated_time_minutes: minutes,
            deadline: None,
        })
    }

    #[tokio::test]
    async fn create_list_complete_flow() {
        let state = test_state();
        let (_, token) = seeded_user(&state);
        let headers = bearer(&token);

        let (status, Json(created)) = create_task(
            State(state.clone()),
            headers.clone(),
            payload("Water the plants", EnergyLevel::Low, 10),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let Json(listed) = list_tasks(State(state.clone()), headers.clone())
            .await
            .unwrap();
        assert_eq!(listed.tasks.len(), 1);

        let Json(done) = complete_task(
            State(state.clone()),
            Path(created.task.id.clone()),
            headers.clone(),
        )
        .await
        .unwrap();
        assert_eq!(done.message, "Nice work! Task completed.");
        assert!(done.task.completed_at.is_some());

        let Json(reopened) = uncomplete_task(
            State(state),
            Path(created.task.id),
            headers,
        )
        .await
        .unwrap();
        assert!(reopened.task.completed_at.is_none());
    }

    #[tokio::test]
    async fn other_users_tasks_are_invisible() {
        let state = test_state();
        let (_, owner_token) = seeded_user(&state);
        let (status, Json(created)) = create_task(
            State(state.clone()),
            bearer(&owner_token),
            payload("Private", EnergyLevel::Low, 5),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let intruder = nextup_core::user::User::new("intruder@example.com", "x");
        state.db().unwrap().create_user(&intruder).unwrap();
        let intruder_token = state
            .signer
            .issue(&intruder.id, state.token_ttl)
            .unwrap();

        let err = delete_task(
            State(state),
            Path(created.task.id),
            bearer(&intruder_token),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_task_payload_is_a_bad_request() {
        let state = test_state();
        let (_, token) = seeded_user(&state);
        let err = create_task(
            State(state),
            bearer(&token),
            payload("", EnergyLevel::Low, 10),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn recommend_validates_the_context() {
        let state = test_state();
        let (_, token) = seeded_user(&state);
        let headers = bearer(&token);

        let missing = recommend_task(
            State(state.clone()),
            headers.clone(),
            Json(RecommendRequest {
                available_time_minutes: None,
                current_energy: Some("low".to_string()),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(missing.status, StatusCode::BAD_REQUEST);

        let zero = recommend_task(
            State(state.clone()),
            headers.clone(),
            Json(RecommendRequest {
                available_time_minutes: Some(0),
                current_energy: Some("low".to_string()),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(
            zero.message,
            "Please provide your available time and current energy level."
        );

        let bad_energy = recommend_task(
            State(state),
            headers,
            Json(RecommendRequest {
                available_time_minutes: Some(30),
                current_energy: Some("extreme".to_string()),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(
            bad_energy.message,
            "Energy level must be low, medium, or high."
        );
    }

    #[tokio::test]
    async fn recommend_returns_the_engine_result() {
        let state = test_state();
        let (_, token) = seeded_user(&state);
        let headers = bearer(&token);

        create_task(
            State(state.clone()),
            headers.clone(),
            payload("Stretch", EnergyLevel::Low, 5),
        )
        .await
        .unwrap();
        create_task(
            State(state.clone()),
            headers.clone(),
            payload("Deep work", EnergyLevel::High, 120),
        )
        .await
        .unwrap();

        let Json(result) = recommend_task(
            State(state),
            headers,
            Json(RecommendRequest {
                available_time_minutes: Some(30),
                current_energy: Some("low".to_string()),
            }),
        )
        .await
        .unwrap();

        let top = result.recommended.expect("stretch should qualify");
        assert_eq!(top.task.title, "Stretch");
        assert!(result.alternatives.is_empty());
    }
}
