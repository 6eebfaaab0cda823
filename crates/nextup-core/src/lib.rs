//! # Nextup Core Library
//!
//! Core business logic for Nextup, a contextual to-do app that answers one
//! question: "given the time and energy I have right now, what should I do?"
//!
//! ## Architecture
//!
//! - **Recommendation engine**: a pure filter/score/explain/rank pipeline
//!   over a snapshot of tasks and the user's live context
//! - **Storage**: SQLite-based user/task persistence and TOML configuration
//! - **Auth**: salted password hashing and HMAC-signed session tokens
//!
//! The CLI and HTTP server binaries are thin layers over this crate; the
//! engine itself never touches storage, sessions, or the network.
//!
//! ## Key Components
//!
//! - [`recommend::recommend`]: the recommendation pipeline
//! - [`TaskDb`]: user and task persistence
//! - [`TokenSigner`]: session token issue/verify

pub mod auth;
pub mod error;
pub mod recommend;
pub mod storage;
pub mod task;
pub mod user;

pub use auth::{hash_password, verify_password, TokenClaims, TokenSigner};
pub use error::{AuthError, ConfigError, CoreError, DatabaseError, ValidationError};
pub use recommend::{
    RecommendationContext, RecommendationResult, ScoreBreakdown, ScoredTask,
};
pub use storage::{Config, TaskDb};
pub use task::{EnergyLevel, Task};
pub use user::User;
