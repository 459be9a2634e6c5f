//! Session controller: owns the game state, the RNG and every timer of a session.
//!
//! All transitions happen inside [`Controller::run`]. Timers are tokio tasks that only
//! post [`TimerEvent`]s back to the loop, tagged with the round epoch so a superseded
//! round can never mutate the current one.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand_pcg::Pcg64;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::catalog::Catalog;
use crate::engine::answer::hint_letter;
use crate::engine::apply::{apply_answer, AnswerOutcome};
use crate::engine::select::select_question;
use crate::error::Result;
use crate::leaderboard::record_score;
use crate::persist::Storage;
use crate::rng::rng_for_round;
use crate::rules::Rules;
use crate::state::GameState;
use crate::types::{Difficulty, GameMode, GameStatus};

const STEP: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Submit(String),
    Hint,
    SetDifficulty(Difficulty),
    PlayAgain,
    Quit,
}

impl Input {
    /// Parse a console line: `/hint`, `/easy`, `/medium`, `/hard`, `/again`, `/quit`,
    /// anything else is an answer. Blank lines yield `None`.
    pub fn from_line(line: &str) -> Option<Input> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let input = match line.to_ascii_lowercase().as_str() {
            "/hint" => Input::Hint,
            "/easy" => Input::SetDifficulty(Difficulty::Easy),
            "/medium" => Input::SetDifficulty(Difficulty::Medium),
            "/hard" => Input::SetDifficulty(Difficulty::Hard),
            "/again" => Input::PlayAgain,
            "/quit" | "/exit" => Input::Quit,
            _ => Input::Submit(line.to_string()),
        };
        Some(input)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Countdown(u8),
    Go,
    Question {
        id: u16,
        number: u32,
        /// Tier currently selected by the player; drives how obscured the glyph is.
        difficulty: Difficulty,
    },
    Hint(char),
    Answered(AnswerOutcome),
    TimeLeft(u32),
    DifficultyChanged(Difficulty),
    Finished {
        score: u32,
        questions_answered: u32,
        combo: u32,
        rank: Option<usize>,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub rules: Rules,
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Classic,
            difficulty: Difficulty::Medium,
            rules: Rules::default(),
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub score: u32,
    pub questions_answered: u32,
    pub hints_used: u32,
    pub status: GameStatus,
    pub rounds: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    Countdown,
    Tick,
    Reveal,
}

#[derive(Debug)]
struct TimerEvent {
    epoch: u64,
    kind: TimerKind,
}

/// At most one live task per slot: scheduling aborts the previous one.
#[derive(Debug, Default)]
struct TimerSlot(Option<JoinHandle<()>>);

impl TimerSlot {
    fn replace(&mut self, handle: JoinHandle<()>) {
        if let Some(old) = self.0.replace(handle) {
            old.abort();
        }
    }

    fn cancel(&mut self) {
        if let Some(h) = self.0.take() {
            h.abort();
        }
    }
}

#[derive(Debug, Default)]
struct Timers {
    countdown: TimerSlot,
    tick: TimerSlot,
    reveal: TimerSlot,
}

impl Timers {
    fn cancel_all(&mut self) {
        self.countdown.cancel();
        self.tick.cancel();
        self.reveal.cancel();
    }
}

impl Drop for Timers {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

pub struct Controller<S: Storage> {
    state: GameState,
    mode: GameMode,
    catalog: Arc<Catalog>,
    storage: S,
    seed: u64,
    rng: Pcg64,
    epoch: u64,
    /// Questions put on screen this round, answered or not.
    questions_shown: u32,
    countdown: Option<u8>,
    revealing: bool,
    timers: Timers,
    timer_tx: mpsc::UnboundedSender<TimerEvent>,
    timer_rx: mpsc::UnboundedReceiver<TimerEvent>,
    notices: mpsc::UnboundedSender<Notice>,
}

impl<S: Storage> Controller<S> {
    /// Build an idle controller and the receiving end of its notice stream.
    pub fn new(
        config: SessionConfig,
        catalog: Arc<Catalog>,
        storage: S,
    ) -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();
        let state = GameState::new(config.rules)
            .set_game_mode(config.mode)
            .set_difficulty(config.difficulty);
        let controller = Self {
            state,
            mode: config.mode,
            catalog,
            storage,
            seed: config.seed,
            rng: rng_for_round(config.seed, 0),
            epoch: 0,
            questions_shown: 0,
            countdown: None,
            revealing: false,
            timers: Timers::default(),
            timer_tx,
            timer_rx,
            notices: notice_tx,
        };
        (controller, notice_rx)
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Drive the session until `Quit` arrives or the input channel closes.
    /// Leaving mid-round does not record a score.
    pub async fn run(mut self, mut inputs: mpsc::Receiver<Input>) -> Result<SessionSummary> {
        self.begin_round();
        loop {
            tokio::select! {
                Some(ev) = self.timer_rx.recv() => self.on_timer(ev)?,
                input = inputs.recv() => match input {
                    None | Some(Input::Quit) => break,
                    Some(input) => self.on_input(input)?,
                },
            }
        }
        self.timers.cancel_all();
        debug!(round = self.epoch, status = ?self.state.status, "session closed");
        Ok(self.summary())
    }

    fn summary(&self) -> SessionSummary {
        SessionSummary {
            score: self.state.score,
            questions_answered: self.state.questions_answered,
            hints_used: self.state.hints_used,
            status: self.state.status,
            rounds: self.epoch,
        }
    }

    fn notify(&self, notice: Notice) {
        // A dropped receiver only means nobody is watching.
        let _ = self.notices.send(notice);
    }

    fn schedule_once(&self, kind: TimerKind, delay: Duration) -> JoinHandle<()> {
        let tx = self.timer_tx.clone();
        let epoch = self.epoch;
        tokio::spawn(async move {
            time::sleep(delay).await;
            let _ = tx.send(TimerEvent { epoch, kind });
        })
    }

    fn schedule_every(&self, kind: TimerKind, period: Duration) -> JoinHandle<()> {
        let tx = self.timer_tx.clone();
        let epoch = self.epoch;
        tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(TimerEvent { epoch, kind }).is_err() {
                    break;
                }
            }
        })
    }

    fn begin_round(&mut self) {
        self.timers.cancel_all();
        self.epoch += 1;
        self.rng = rng_for_round(self.seed, self.epoch);
        self.questions_shown = 0;
        self.revealing = false;
        self.state = self.state.reset().set_game_mode(self.mode).start_game();
        info!(
            round = self.epoch,
            mode = self.mode.as_str(),
            difficulty = self.state.difficulty.as_str(),
            "round started"
        );

        let from = self.state.rules.countdown_from;
        if from == 0 {
            self.countdown = None;
            self.countdown_finished();
            return;
        }
        self.countdown = Some(from);
        self.notify(Notice::Countdown(from));
        let h = self.schedule_once(TimerKind::Countdown, STEP);
        self.timers.countdown.replace(h);
    }

    fn on_timer(&mut self, ev: TimerEvent) -> Result<()> {
        if ev.epoch != self.epoch {
            debug!(kind = ?ev.kind, stale = ev.epoch, current = self.epoch, "dropping stale timer event");
            return Ok(());
        }
        match ev.kind {
            TimerKind::Countdown => self.on_countdown_step(),
            TimerKind::Tick => self.on_tick(),
            TimerKind::Reveal => self.on_reveal_done(),
        }
        Ok(())
    }

    fn on_countdown_step(&mut self) {
        let Some(n) = self.countdown else { return };
        let n = n.saturating_sub(1);
        if n > 0 {
            self.countdown = Some(n);
            self.notify(Notice::Countdown(n));
            let h = self.schedule_once(TimerKind::Countdown, STEP);
            self.timers.countdown.replace(h);
        } else {
            self.countdown = None;
            self.timers.countdown.cancel();
            self.countdown_finished();
        }
    }

    /// The first question and the time-attack clock both wait for this.
    fn countdown_finished(&mut self) {
        self.notify(Notice::Go);
        self.load_question();
        if self.mode == GameMode::TimeAttack && self.state.is_playing() {
            let h = self.schedule_every(TimerKind::Tick, STEP);
            self.timers.tick.replace(h);
        }
    }

    fn on_tick(&mut self) {
        if !self.state.is_playing() || self.countdown.is_some() || self.mode != GameMode::TimeAttack {
            return;
        }
        let left = self.state.time_left.saturating_sub(1);
        self.state = self.state.set_time_left(left);
        self.notify(Notice::TimeLeft(left));
        self.check_terminal();
    }

    fn on_reveal_done(&mut self) {
        self.revealing = false;
        if self.state.is_playing() {
            self.load_question();
        }
    }

    fn load_question(&mut self) {
        let Some(item) = select_question(&self.catalog, self.state.difficulty, &mut self.rng) else {
            // Catalogs are validated non-empty on load; nothing to show otherwise.
            error!("catalog has no items, cannot load a question");
            return;
        };
        let id = item.id;
        self.state = self.state.set_current_question(id);
        self.questions_shown += 1;
        debug!(id, difficulty = self.state.difficulty.as_str(), "question loaded");
        self.notify(Notice::Question {
            id,
            number: self.questions_shown,
            difficulty: self.state.difficulty,
        });
    }

    fn accepting_answers(&self) -> bool {
        self.state.is_playing()
            && self.countdown.is_none()
            && !self.revealing
            && self.state.current_question.is_some()
    }

    fn on_input(&mut self, input: Input) -> Result<()> {
        match input {
            Input::Submit(text) => self.submit(&text)?,
            Input::Hint => self.hint(),
            Input::SetDifficulty(d) => {
                self.state = self.state.set_difficulty(d);
                self.notify(Notice::DifficultyChanged(d));
            }
            Input::PlayAgain => {
                if self.state.status == GameStatus::Finished {
                    self.begin_round();
                } else {
                    debug!(status = ?self.state.status, "play again ignored");
                }
            }
            // handled by the run loop
            Input::Quit => {}
        }
        Ok(())
    }

    fn submit(&mut self, text: &str) -> Result<()> {
        if !self.accepting_answers() {
            debug!("answer ignored");
            return Ok(());
        }
        let (next, outcome) = apply_answer(&self.state, &self.catalog, text)?;
        self.state = next;
        self.notify(Notice::Answered(outcome));

        self.revealing = true;
        let h = self.schedule_once(TimerKind::Reveal, self.state.rules.reveal_pause());
        self.timers.reveal.replace(h);

        self.check_terminal();
        Ok(())
    }

    fn hint(&mut self) {
        if !self.accepting_answers() || !self.state.hint_available {
            return;
        }
        let letter = self
            .state
            .current_question
            .and_then(|id| self.catalog.get(id))
            .and_then(hint_letter);
        let Some(letter) = letter else { return };
        self.state = self.state.use_hint();
        self.notify(Notice::Hint(letter));
    }

    fn check_terminal(&mut self) {
        if self.state.is_playing() && self.state.is_terminal() {
            self.finish();
        }
    }

    /// Runs once per round: only reachable from `playing`, and it leaves `finished`.
    fn finish(&mut self) {
        self.state = self.state.end_game();
        self.timers.cancel_all();
        self.revealing = false;

        let score = self.state.score;
        let rank = match record_score(
            &self.storage,
            score,
            Utc::now(),
            self.state.rules.leaderboard_size,
        ) {
            Ok(recorded) => recorded.rank,
            Err(e) => {
                error!(error = %e, "failed to save score");
                None
            }
        };
        info!(round = self.epoch, score, "game finished");
        self.notify(Notice::Finished {
            score,
            questions_answered: self.state.questions_answered,
            combo: self.state.consecutive_correct_answers,
            rank,
        });
    }
}
