use crate::rules::Rules;
use crate::types::{Difficulty, GameMode, GameStatus};

/// Mutable session state. Every transition below is pure: it takes the current
/// state by reference and returns the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub score: u32,
    pub lives: u8,
    pub time_left: u32,
    pub difficulty: Difficulty,
    pub mode: GameMode,
    pub current_question: Option<u16>,
    pub hint_available: bool,
    pub hints_used: u32,
    pub consecutive_correct_answers: u32,
    pub questions_answered: u32,
    pub status: GameStatus,
    pub rules: Rules,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}

impl GameState {
    pub fn new(rules: Rules) -> Self {
        Self {
            score: 0,
            lives: rules.starting_lives,
            time_left: rules.time_limit_secs,
            difficulty: Difficulty::default(),
            mode: GameMode::default(),
            current_question: None,
            hint_available: true,
            hints_used: 0,
            consecutive_correct_answers: 0,
            questions_answered: 0,
            status: GameStatus::Idle,
            rules,
        }
    }

    /// Counters back to their defaults, status idle. Mode and difficulty are kept.
    #[must_use]
    pub fn reset(&self) -> Self {
        Self {
            difficulty: self.difficulty,
            mode: self.mode,
            ..Self::new(self.rules)
        }
    }

    #[must_use]
    pub fn set_game_mode(&self, mode: GameMode) -> Self {
        Self {
            mode,
            ..self.clone()
        }
    }

    /// Changes the tier for the next pick; the current question stays.
    #[must_use]
    pub fn set_difficulty(&self, difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..self.clone()
        }
    }

    /// Every new question grants exactly one hint.
    #[must_use]
    pub fn set_current_question(&self, id: u16) -> Self {
        Self {
            current_question: Some(id),
            hint_available: true,
            ..self.clone()
        }
    }

    /// Adds `points` (10 when `None`) and bumps the answered and combo counters.
    #[must_use]
    pub fn increase_score(&self, points: Option<u32>) -> Self {
        let points = points.unwrap_or(self.rules.base_points);
        Self {
            score: self.score.saturating_add(points),
            questions_answered: self.questions_answered + 1,
            consecutive_correct_answers: self.consecutive_correct_answers + 1,
            ..self.clone()
        }
    }

    /// Lives never drop below zero.
    #[must_use]
    pub fn decrease_lives(&self) -> Self {
        Self {
            lives: self.lives.saturating_sub(1),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn set_time_left(&self, seconds: u32) -> Self {
        Self {
            time_left: seconds,
            ..self.clone()
        }
    }

    /// Consumes the hint for the current question. No-op once it is gone.
    #[must_use]
    pub fn use_hint(&self) -> Self {
        if !self.hint_available {
            return self.clone();
        }
        Self {
            hint_available: false,
            hints_used: self.hints_used + 1,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn set_hint_available(&self, available: bool) -> Self {
        Self {
            hint_available: available,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn increment_questions_answered(&self) -> Self {
        Self {
            questions_answered: self.questions_answered + 1,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn reset_combo(&self) -> Self {
        Self {
            consecutive_correct_answers: 0,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn start_game(&self) -> Self {
        Self {
            status: GameStatus::Playing,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn end_game(&self) -> Self {
        Self {
            status: GameStatus::Finished,
            ..self.clone()
        }
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    /// Out of lives (classic) or out of time (time attack).
    #[inline]
    pub fn is_terminal(&self) -> bool {
        match self.mode {
            GameMode::Classic => self.lives == 0,
            GameMode::TimeAttack => self.time_left == 0,
        }
    }
}

/// Free-function form of [`GameState::is_terminal`].
#[inline]
pub fn is_terminal(state: &GameState) -> bool {
    state.is_terminal()
}
