use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rules {
    pub starting_lives: u8,
    pub time_limit_secs: u32,
    pub countdown_from: u8,
    pub reveal_pause_ms: u64,
    pub base_points: u32,
    pub hinted_points: u32,
    /// Combo bonus per consecutive correct answer, in tenths of the base reward.
    pub combo_step_tenths: u32,
    pub leaderboard_size: usize,
}

impl Default for Rules {
    fn default() -> Self {
        Self::standard()
    }
}

impl Rules {
    /// 3 lives, 60 second time attack, 3..1 countdown, 1.5s reveal,
    /// 10 points (5 with hint), +10% per combo step, top 10 leaderboard.
    #[inline]
    pub const fn standard() -> Self {
        Self {
            starting_lives: 3,
            time_limit_secs: 60,
            countdown_from: 3,
            reveal_pause_ms: 1500,
            base_points: 10,
            hinted_points: 5,
            combo_step_tenths: 1,
            leaderboard_size: 10,
        }
    }

    #[inline]
    pub const fn reveal_pause(&self) -> Duration {
        Duration::from_millis(self.reveal_pause_ms)
    }
}
