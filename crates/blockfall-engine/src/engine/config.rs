use std::time::Duration;

use crate::core::{Board, PieceKind, Position};

/// Tunable rules and timings of a game.
///
/// The defaults describe the standard 10×20 game: spawn at column 4, one
/// second gravity at level 1 shrinking by 50 ms per level down to 200 ms, a
/// new level every 10 lines, and a 20 ms line-clear animation tick.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub board_width: usize,
    pub board_height: usize,
    pub spawn_column: i32,
    /// Spawn row per shape, indexed by [`PieceKind::index`].
    pub spawn_rows: [i32; PieceKind::LEN],
    /// Gravity interval in seconds at level 1.
    pub base_speed: f64,
    /// Seconds removed from the gravity interval per level.
    pub speed_step: f64,
    /// Upper bound on the total reduction of the gravity interval.
    pub max_speedup: f64,
    pub lines_per_level: usize,
    pub clear_tick: Duration,
    pub clear_step: f32,
    pub level_transition_delay: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: Board::DEFAULT_WIDTH,
            board_height: Board::DEFAULT_HEIGHT,
            spawn_column: 4,
            spawn_rows: [0; PieceKind::LEN],
            base_speed: 1.0,
            speed_step: 0.05,
            max_speedup: 0.8,
            lines_per_level: 10,
            clear_tick: Duration::from_millis(20),
            clear_step: 0.05,
            level_transition_delay: Duration::from_secs(1),
        }
    }
}

impl GameConfig {
    /// Anchor at which a freshly promoted piece of `kind` appears.
    #[must_use]
    pub fn spawn_position(&self, kind: PieceKind) -> Position {
        Position::new(self.spawn_rows[kind.index()], self.spawn_column)
    }

    /// Gravity interval in seconds for `level`.
    ///
    /// ```
    /// use blockfall_engine::GameConfig;
    ///
    /// let config = GameConfig::default();
    /// assert!((config.speed_for_level(2) - 0.95).abs() < 1e-9);
    /// assert!((config.speed_for_level(100) - 0.2).abs() < 1e-9);
    /// ```
    #[must_use]
    pub fn speed_for_level(&self, level: usize) -> f64 {
        #[expect(clippy::cast_precision_loss)]
        let steps = level.saturating_sub(1) as f64;
        f64::max(
            self.base_speed - steps * self.speed_step,
            self.base_speed - self.max_speedup,
        )
    }

    /// Returns a copy whose timings are all multiplied by `factor`.
    ///
    /// Scoring and level thresholds are unaffected.
    #[must_use]
    pub fn with_time_scale(&self, factor: f64) -> Self {
        Self {
            base_speed: self.base_speed * factor,
            speed_step: self.speed_step * factor,
            max_speedup: self.max_speedup * factor,
            clear_tick: self.clear_tick.mul_f64(factor),
            level_transition_delay: self.level_transition_delay.mul_f64(factor),
            ..self.clone()
        }
    }
}
