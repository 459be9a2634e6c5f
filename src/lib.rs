#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)] // may be revisited

pub mod types;
pub mod rules;
pub mod error;
pub mod catalog;
pub mod state;
pub mod rng;
pub mod persist;
pub mod leaderboard;
pub mod settings;
pub mod controller;

pub mod engine {
    pub mod answer;
    pub mod apply;
    pub mod score;
    pub mod select;
}

// Re-exports: stable minimal API surface for external callers
pub use crate::catalog::{load_catalog_from_json, Catalog, TechItem};
pub use crate::controller::{Controller, Input, Notice, SessionConfig, SessionSummary};
pub use crate::engine::answer::{hint_letter, is_correct, normalize_answer};
pub use crate::engine::apply::{apply_answer, AnswerOutcome};
pub use crate::engine::score::points_for;
pub use crate::engine::select::select_question;
pub use crate::error::GameError;
pub use crate::leaderboard::{clear_leaderboard, load_leaderboard, record_score, LeaderboardEntry};
pub use crate::persist::{FileStorage, MemoryStorage, Storage};
pub use crate::rng::rng_for_round;
pub use crate::rules::Rules;
pub use crate::settings::{load_settings, reset_settings, save_settings, Settings};
pub use crate::state::{is_terminal, GameState};
pub use crate::types::{Difficulty, GameMode, GameStatus};
