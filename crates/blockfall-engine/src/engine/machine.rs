use std::time::Duration;

use arrayvec::ArrayVec;

use crate::core::Position;

use super::{GameConfig, GameState, PieceGenerator, Sound, StoredSettings, rules};

/// Who drives the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum PlayMode {
    /// Player input; high scores are persisted.
    Normal,
    /// Autopilot input; high scores are never persisted.
    Demo,
}

/// Inputs to [`GameMachine::handle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    StartGame {
        mode: PlayMode,
        settings: StoredSettings,
    },
    /// Gravity timer fired.
    Tick,
    MoveLeft,
    MoveRight,
    Rotate,
    /// Hard drop: lands the piece, locking happens on the next tick.
    Drop,
    CheckLines,
    ClearAnimationTick,
    EndLevelTransition,
    CheckLevelProgression,
    CheckHighScore,
    PauseGame,
    ResumeGame,
    ToggleMute,
}

/// Logical identity of a timer. At most one timer per identity is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerId {
    Gravity,
    ClearAnimation,
    LevelTransition,
}

impl TimerId {
    pub const LEN: usize = 3;

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            TimerId::Gravity => 0,
            TimerId::ClearAnimation => 1,
            TimerId::LevelTransition => 2,
        }
    }

    /// Event delivered when this timer fires.
    #[must_use]
    pub const fn event(self) -> GameEvent {
        match self {
            TimerId::Gravity => GameEvent::Tick,
            TimerId::ClearAnimation => GameEvent::ClearAnimationTick,
            TimerId::LevelTransition => GameEvent::EndLevelTransition,
        }
    }
}

/// Side effects requested by a transition, executed by a runner such as
/// [`GameRuntime`](super::GameRuntime).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Starts a repeating timer, replacing any timer with the same identity.
    StartTimer { timer: TimerId, interval: Duration },
    /// Fires `timer` once after `duration`, replacing any timer with the same
    /// identity.
    Delay { timer: TimerId, duration: Duration },
    CancelTimer(TimerId),
    /// Queues a follow-up event behind the current one.
    Dispatch(GameEvent),
    PlaySound(Sound),
    StopSound,
    PersistHighScore(usize),
    PersistMuted(bool),
}

pub type Commands = ArrayVec<Command, 8>;

/// Synchronous game state machine.
///
/// Each event is applied to the owned [`GameState`] and answered with the
/// commands the runner must carry out. Nothing here sleeps, spawns or does
/// I/O, so transitions can be tested directly.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Command, GameConfig, GameEvent, GameMachine, PieceGenerator, PlayMode, TimerId};
///
/// let mut machine = GameMachine::new(GameConfig::default(), PieceGenerator::with_seed(1));
/// let commands = machine.handle(GameEvent::StartGame {
///     mode: PlayMode::Normal,
///     settings: Default::default(),
/// });
/// assert!(machine.state().phase().is_playing());
/// assert!(commands.iter().any(|c| matches!(
///     c,
///     Command::StartTimer { timer: TimerId::Gravity, .. }
/// )));
/// ```
#[derive(Debug, Clone)]
pub struct GameMachine {
    state: GameState,
}

impl GameMachine {
    #[must_use]
    pub fn new(config: GameConfig, generator: PieceGenerator) -> Self {
        Self {
            state: GameState::new(config, generator),
        }
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Applies `event` and returns the resulting commands in execution order.
    pub fn handle(&mut self, event: GameEvent) -> Commands {
        let mut commands = Commands::new();
        match event {
            GameEvent::StartGame { mode, settings } => self.start_game(mode, settings, &mut commands),
            GameEvent::Tick => self.tick(&mut commands),
            GameEvent::MoveLeft => self.shift(Position::LEFT),
            GameEvent::MoveRight => self.shift(Position::RIGHT),
            GameEvent::Rotate => self.rotate(),
            GameEvent::Drop => self.hard_drop(&mut commands),
            GameEvent::CheckLines => self.check_lines(&mut commands),
            GameEvent::ClearAnimationTick => self.advance_clear_animation(&mut commands),
            GameEvent::EndLevelTransition => self.end_level_transition(&mut commands),
            GameEvent::CheckLevelProgression => self.check_level_progression(&mut commands),
            GameEvent::CheckHighScore => self.check_high_score(&mut commands),
            GameEvent::PauseGame => self.pause(&mut commands),
            GameEvent::ResumeGame => self.resume(&mut commands),
            GameEvent::ToggleMute => {
                self.state.muted = !self.state.muted;
                commands.push(Command::PersistMuted(self.state.muted));
            }
        }
        commands
    }

    fn accepts_input(&self) -> bool {
        self.state.phase().is_playing() && self.state.current_piece.is_some()
    }

    fn gravity_timer(&self) -> Command {
        Command::StartTimer {
            timer: TimerId::Gravity,
            interval: self.state.gravity_interval(),
        }
    }

    fn start_game(&mut self, mode: PlayMode, settings: StoredSettings, commands: &mut Commands) {
        self.state.high_score = settings.high_score;
        self.state.muted = settings.muted;
        self.state.start_new_game(mode.is_demo());
        commands.push(Command::StopSound);
        commands.push(Command::CancelTimer(TimerId::ClearAnimation));
        commands.push(Command::CancelTimer(TimerId::LevelTransition));
        commands.push(self.gravity_timer());
    }

    fn tick(&mut self, commands: &mut Commands) {
        let state = &self.state;
        if !state.phase().is_playing() || state.level_transitioning || state.is_clearing_lines() {
            return;
        }

        if rules::can_move(state, Position::DOWN) {
            self.state.anchor = self.state.anchor + Position::DOWN;
            return;
        }

        if rules::spawn(&mut self.state) {
            commands.push(Command::Dispatch(GameEvent::CheckLines));
        } else {
            self.state.game_over = true;
            commands.push(Command::CancelTimer(TimerId::Gravity));
            commands.push(Command::PlaySound(Sound::Theme));
            commands.push(Command::Dispatch(GameEvent::CheckHighScore));
        }
    }

    fn shift(&mut self, offset: Position) {
        if self.accepts_input() && rules::can_move(&self.state, offset) {
            self.state.anchor = self.state.anchor + offset;
        }
    }

    fn rotate(&mut self) {
        if !self.accepts_input() {
            return;
        }
        let Some(piece) = self.state.current_piece else {
            return;
        };
        let rotated = piece.rotated();
        if rules::can_place(&self.state.board, &rotated, self.state.anchor) {
            self.state.current_piece = Some(rotated);
        }
    }

    fn hard_drop(&mut self, commands: &mut Commands) {
        if !self.accepts_input() {
            return;
        }
        let Some(piece) = self.state.current_piece else {
            return;
        };
        self.state.anchor = rules::landing_position(&self.state.board, &piece, self.state.anchor);
        commands.push(Command::PlaySound(Sound::Drop));
    }

    fn check_lines(&mut self, commands: &mut Commands) {
        if self.state.is_clearing_lines() {
            return;
        }
        let rows = rules::detect_full_lines(&self.state.board);
        if rows.is_empty() {
            commands.push(Command::Dispatch(GameEvent::CheckLevelProgression));
            return;
        }
        self.state.clearing_rows = rows;
        self.state.clear_progress = 0.0;
        commands.push(Command::PlaySound(Sound::LineClear));
        commands.push(Command::StartTimer {
            timer: TimerId::ClearAnimation,
            interval: self.state.config.clear_tick,
        });
    }

    fn advance_clear_animation(&mut self, commands: &mut Commands) {
        if !self.state.is_clearing_lines() {
            return;
        }
        self.state.clear_progress += self.state.config.clear_step;
        if self.state.clear_progress < 1.0 - f32::EPSILON {
            return;
        }

        commands.push(Command::CancelTimer(TimerId::ClearAnimation));
        let rows = std::mem::take(&mut self.state.clearing_rows);
        rules::remove_lines(&rows, &mut self.state);
        self.state.clear_progress = 0.0;
        commands.push(Command::Dispatch(GameEvent::CheckLevelProgression));
        commands.push(Command::Dispatch(GameEvent::CheckHighScore));
    }

    fn check_level_progression(&mut self, commands: &mut Commands) {
        if !rules::check_level_progression(&mut self.state) {
            return;
        }
        self.state.level_transitioning = true;
        commands.push(Command::CancelTimer(TimerId::Gravity));
        commands.push(Command::PlaySound(Sound::LevelUp));
        commands.push(Command::Delay {
            timer: TimerId::LevelTransition,
            duration: self.state.config.level_transition_delay,
        });
    }

    fn end_level_transition(&mut self, commands: &mut Commands) {
        if !self.state.level_transitioning {
            return;
        }
        self.state.level_transitioning = false;
        if self.state.phase().is_playing() {
            commands.push(self.gravity_timer());
        }
    }

    fn check_high_score(&mut self, commands: &mut Commands) {
        if self.state.score <= self.state.high_score {
            return;
        }
        self.state.high_score = self.state.score;
        if !self.state.demo_mode {
            commands.push(Command::PersistHighScore(self.state.high_score));
        }
    }

    fn pause(&mut self, commands: &mut Commands) {
        if !self.state.phase().is_playing() {
            return;
        }
        self.state.paused = true;
        commands.push(Command::CancelTimer(TimerId::Gravity));
    }

    fn resume(&mut self, commands: &mut Commands) {
        if !self.state.phase().is_paused() {
            return;
        }
        self.state.paused = false;
        if !self.state.level_transitioning {
            commands.push(self.gravity_timer());
        }
    }
}
