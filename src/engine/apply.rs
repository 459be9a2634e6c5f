use tracing::debug;

use crate::catalog::Catalog;
use crate::engine::score::points_for;
use crate::error::{GameError, Result};
use crate::state::GameState;
use crate::types::GameMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub points: u32,
    pub question_id: u16,
    /// Canonical name, revealed after every answer.
    pub answer: String,
}

/// Apply a submitted answer as a pure transform: returns the next state and what happened.
///
/// Correct: score via `increase_score`, combo grows.
/// Incorrect: classic loses a life; both modes reset the combo.
pub fn apply_answer(
    state: &GameState,
    catalog: &Catalog,
    text: &str,
) -> Result<(GameState, AnswerOutcome)> {
    if !state.is_playing() {
        return Err(GameError::NotPlaying);
    }
    let id = state.current_question.ok_or(GameError::NoActiveQuestion)?;
    let item = catalog.get(id).ok_or(GameError::NoActiveQuestion)?;

    if catalog.accepts(id, text) {
        let points = points_for(
            &state.rules,
            state.hint_available,
            state.consecutive_correct_answers,
        );
        debug!(id, points, combo = state.consecutive_correct_answers, "correct answer");
        let ns = state.increase_score(Some(points));
        return Ok((
            ns,
            AnswerOutcome {
                correct: true,
                points,
                question_id: id,
                answer: item.name.clone(),
            },
        ));
    }

    debug!(id, "incorrect answer");
    let mut ns = state.clone();
    if ns.mode == GameMode::Classic {
        ns = ns.decrease_lives();
    }
    ns = ns.reset_combo();
    Ok((
        ns,
        AnswerOutcome {
            correct: false,
            points: 0,
            question_id: id,
            answer: item.name.clone(),
        },
    ))
}
