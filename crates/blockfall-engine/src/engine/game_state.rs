use std::time::Duration;

use crate::core::{Board, Piece, Position};

use super::{GameConfig, PieceGenerator};

/// Coarse lifecycle of a game.
///
/// Line clearing and level transitions are sub-states of [`GamePhase::Playing`]
/// and are queried separately on [`GameState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GamePhase {
    Idle,
    Playing,
    Paused,
    GameOver,
}

/// Complete mutable state of one game.
///
/// The active piece is stored as a [`Piece`] plus an anchor [`Position`]; the
/// board only ever holds locked blocks.
#[derive(Debug, Clone)]
pub struct GameState {
    pub(super) config: GameConfig,
    pub(super) generator: PieceGenerator,
    pub(super) board: Board,
    pub(super) current_piece: Option<Piece>,
    pub(super) next_piece: Option<Piece>,
    pub(super) anchor: Position,
    pub(super) score: usize,
    pub(super) high_score: usize,
    pub(super) level: usize,
    pub(super) lines_cleared: usize,
    pub(super) lines_to_next_level: usize,
    pub(super) game_speed: f64,
    pub(super) clearing_rows: Vec<usize>,
    pub(super) clear_progress: f32,
    pub(super) started: bool,
    pub(super) paused: bool,
    pub(super) game_over: bool,
    pub(super) level_transitioning: bool,
    pub(super) muted: bool,
    pub(super) demo_mode: bool,
    pub(super) completed_pieces: usize,
    pub(super) spawned_pieces: u64,
    pub(super) line_clear_counts: [usize; 4],
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameConfig::default(), PieceGenerator::new())
    }
}

impl GameState {
    /// Creates an idle game with an empty board and no pieces.
    #[must_use]
    pub fn new(config: GameConfig, generator: PieceGenerator) -> Self {
        let board = Board::new(config.board_width, config.board_height);
        let game_speed = config.speed_for_level(1);
        let lines_to_next_level = config.lines_per_level;
        Self {
            config,
            generator,
            board,
            current_piece: None,
            next_piece: None,
            anchor: Position::default(),
            score: 0,
            high_score: 0,
            level: 1,
            lines_cleared: 0,
            lines_to_next_level,
            game_speed,
            clearing_rows: vec![],
            clear_progress: 0.0,
            started: false,
            paused: false,
            game_over: false,
            level_transitioning: false,
            muted: false,
            demo_mode: false,
            completed_pieces: 0,
            spawned_pieces: 0,
            line_clear_counts: [0; 4],
        }
    }

    /// Resets everything except the piece generator, high score and mute flag,
    /// then draws the current and next pieces.
    pub fn start_new_game(&mut self, demo_mode: bool) {
        self.board = Board::new(self.config.board_width, self.config.board_height);
        self.score = 0;
        self.level = 1;
        self.lines_cleared = 0;
        self.lines_to_next_level = self.config.lines_per_level;
        self.game_speed = self.config.speed_for_level(1);
        self.clearing_rows.clear();
        self.clear_progress = 0.0;
        self.started = true;
        self.paused = false;
        self.game_over = false;
        self.level_transitioning = false;
        self.demo_mode = demo_mode;
        self.completed_pieces = 0;
        self.line_clear_counts = [0; 4];

        let current = self.generator.next_piece();
        self.next_piece = Some(self.generator.next_piece());
        self.anchor = self.config.spawn_position(current.kind());
        self.current_piece = Some(current);
        self.spawned_pieces += 1;
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable access to the locked blocks, for setting up positions.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[must_use]
    pub fn current_piece(&self) -> Option<&Piece> {
        self.current_piece.as_ref()
    }

    #[must_use]
    pub fn next_piece(&self) -> Option<&Piece> {
        self.next_piece.as_ref()
    }

    #[must_use]
    pub fn anchor(&self) -> Position {
        self.anchor
    }

    /// Replaces the active piece and its anchor without any placement check.
    pub fn set_falling_piece(&mut self, piece: Piece, anchor: Position) {
        self.current_piece = Some(piece);
        self.anchor = anchor;
    }

    pub fn set_next_piece(&mut self, piece: Piece) {
        self.next_piece = Some(piece);
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn high_score(&self) -> usize {
        self.high_score
    }

    pub fn set_high_score(&mut self, high_score: usize) {
        self.high_score = high_score;
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Lines cleared since the start of the game.
    #[must_use]
    pub fn lines_cleared(&self) -> usize {
        self.lines_cleared
    }

    /// Cumulative line count at which the next level is reached.
    #[must_use]
    pub fn lines_to_next_level(&self) -> usize {
        self.lines_to_next_level
    }

    /// Gravity interval in seconds.
    #[must_use]
    pub fn game_speed(&self) -> f64 {
        self.game_speed
    }

    #[must_use]
    pub fn gravity_interval(&self) -> Duration {
        Duration::from_secs_f64(self.game_speed)
    }

    /// Rows being animated away, highest index first.
    #[must_use]
    pub fn clearing_rows(&self) -> &[usize] {
        &self.clearing_rows
    }

    /// Progress of the line-clear animation in `[0.0, 1.0]`.
    #[must_use]
    pub fn clear_progress(&self) -> f32 {
        self.clear_progress
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        if !self.started {
            GamePhase::Idle
        } else if self.game_over {
            GamePhase::GameOver
        } else if self.paused {
            GamePhase::Paused
        } else {
            GamePhase::Playing
        }
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    #[must_use]
    pub fn is_clearing_lines(&self) -> bool {
        !self.clearing_rows.is_empty()
    }

    #[must_use]
    pub fn is_level_transitioning(&self) -> bool {
        self.level_transitioning
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    #[must_use]
    pub fn is_demo_mode(&self) -> bool {
        self.demo_mode
    }

    /// Number of pieces locked into the board.
    #[must_use]
    pub fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    /// Serial number of the active piece; increases on every promotion.
    #[must_use]
    pub fn spawned_pieces(&self) -> u64 {
        self.spawned_pieces
    }

    /// Histogram of simultaneous clears: singles, doubles, triples, tetrises.
    #[must_use]
    pub fn line_clear_counts(&self) -> &[usize; 4] {
        &self.line_clear_counts
    }
}
