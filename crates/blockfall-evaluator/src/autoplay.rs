use blockfall_engine::{Board, GameEvent, GameState, Piece, Position, rules};

use crate::move_search::{MoveSearch, Placement};

/// Applies the rotations, shifts and hard drop that lead `piece` from `anchor`
/// to `placement`, each only if the board permits it.
///
/// Returns where the piece actually comes to rest. This matches what the game
/// does with the events [`AutoPilot::plan`] emits: a blocked rotation or shift
/// is skipped, and the drop lands from wherever the piece got to.
#[must_use]
pub fn commit_moves(
    board: &Board,
    mut piece: Piece,
    mut anchor: Position,
    placement: &Placement,
) -> (Piece, Position) {
    for _ in 0..placement.rotation {
        let rotated = piece.rotated();
        if rules::can_place(board, &rotated, anchor) {
            piece = rotated;
        }
    }

    let step = if placement.anchor.col < anchor.col {
        Position::LEFT
    } else {
        Position::RIGHT
    };
    for _ in 0..(placement.anchor.col - anchor.col).unsigned_abs() {
        if !rules::can_place(board, &piece, anchor + step) {
            break;
        }
        anchor = anchor + step;
    }

    let resting = rules::landing_position(board, &piece, anchor);
    (piece, resting)
}

/// Drives a game through ordinary input events.
///
/// For each newly spawned piece the autopilot searches for the best
/// placement once and emits the rotations, the horizontal moves and a final
/// hard drop that take the piece there. Locking is left to gravity.
#[derive(Debug, Clone)]
pub struct AutoPilot {
    search: MoveSearch,
    planned_piece: Option<u64>,
}

impl AutoPilot {
    #[must_use]
    pub fn new(search: MoveSearch) -> Self {
        Self {
            search,
            planned_piece: None,
        }
    }

    #[must_use]
    pub fn search(&self) -> &MoveSearch {
        &self.search
    }

    /// Events to send for the active piece.
    ///
    /// Empty when the piece was already planned, when there is no active
    /// piece, or while the game is not accepting input.
    pub fn plan(&mut self, state: &GameState) -> Vec<GameEvent> {
        if !state.phase().is_playing() || state.is_clearing_lines() {
            return vec![];
        }
        let Some(piece) = state.current_piece() else {
            return vec![];
        };
        if self.planned_piece == Some(state.spawned_pieces()) {
            return vec![];
        }
        self.planned_piece = Some(state.spawned_pieces());

        let Some(best) = self
            .search
            .best_move(state.board(), piece, state.next_piece())
        else {
            return vec![];
        };

        let shift = best.placement.anchor.col - state.anchor().col;
        let step = if shift < 0 {
            GameEvent::MoveLeft
        } else {
            GameEvent::MoveRight
        };

        let mut events = vec![GameEvent::Rotate; usize::from(best.rotation())];
        events.extend((0..shift.unsigned_abs()).map(|_| step));
        events.push(GameEvent::Drop);
        events
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{
        Board, GameConfig, GameMachine, Piece, PieceGenerator, PieceKind, PlayMode, Position,
    };

    use super::*;

    fn started_machine() -> GameMachine {
        let mut machine = GameMachine::new(GameConfig::default(), PieceGenerator::with_seed(21));
        machine.handle(GameEvent::StartGame {
            mode: PlayMode::Demo,
            settings: Default::default(),
        });
        machine
    }

    #[test]
    fn test_plans_once_per_piece() {
        let machine = started_machine();
        let mut pilot = AutoPilot::new(MoveSearch::default());
        let events = pilot.plan(machine.state());
        assert_eq!(events.last(), Some(&GameEvent::Drop));
        assert!(pilot.plan(machine.state()).is_empty());
    }

    #[test]
    fn test_events_reach_planned_placement() {
        let mut machine = started_machine();
        let art = format!("{}SSSSSSSSS.\n", "..........\n".repeat(19));
        *machine.state_mut().board_mut() = Board::from_ascii(&art);
        machine
            .state_mut()
            .set_falling_piece(Piece::new(PieceKind::I), Position::new(0, 4));

        let mut pilot = AutoPilot::new(MoveSearch::default());
        let best = pilot
            .search()
            .best_move(machine.state().board(), &Piece::new(PieceKind::I), None)
            .unwrap();
        let events = pilot.plan(machine.state());
        assert_eq!(events.iter().filter(|e| **e == GameEvent::Rotate).count(), 1);
        for event in events {
            machine.handle(event);
        }
        let state = machine.state();
        assert_eq!(state.anchor(), best.placement.anchor);
        assert!(state.current_piece().unwrap().has_same_blocks(&best.placement.piece));
    }

    #[test]
    fn test_commit_moves_stops_at_obstacle() {
        // a full-height wall in column 2 keeps the O piece right of it
        let art = "..S.......\n".repeat(20);
        let board = Board::from_ascii(&art);
        let placement = Placement {
            piece: Piece::new(PieceKind::O),
            rotation: 0,
            anchor: Position::new(18, 0),
        };
        let (piece, anchor) =
            commit_moves(&board, Piece::new(PieceKind::O), Position::new(0, 4), &placement);
        assert_eq!(piece, Piece::new(PieceKind::O));
        assert_eq!(anchor, Position::new(18, 3));
    }

    #[test]
    fn test_commit_moves_reaches_open_placement() {
        let board = Board::default();
        let vertical = Piece::new(PieceKind::I).rotated();
        let placement = Placement {
            piece: vertical,
            rotation: 1,
            anchor: Position::new(18, -1),
        };
        let (piece, anchor) =
            commit_moves(&board, Piece::new(PieceKind::I), Position::new(0, 4), &placement);
        assert_eq!(piece, vertical);
        assert_eq!(anchor, placement.anchor);
    }

    #[test]
    fn test_no_plan_while_paused() {
        let mut machine = started_machine();
        machine.handle(GameEvent::PauseGame);
        let mut pilot = AutoPilot::new(MoveSearch::default());
        assert!(pilot.plan(machine.state()).is_empty());
        machine.handle(GameEvent::ResumeGame);
        assert!(!pilot.plan(machine.state()).is_empty());
    }
}
