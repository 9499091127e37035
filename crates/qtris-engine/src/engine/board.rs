use rand::Rng as _;

use crate::{
    PieceCollisionError,
    core::{
        PLAYABLE_WIDTH,
        grid::{Cell, Grid},
        piece::{Piece, PieceKind},
    },
};

use super::{
    action::{Move, RotationDirection},
    game_stats::GameStats,
    piece_buffer::{PieceBuffer, PieceSeed},
};

/// Number of ticks the line clear animation lasts.
const CLEAR_FRAMES: u8 = 3;

/// Coarse phase of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GamePhase {
    /// Waiting at the starting menu for a restart.
    FirstStart,
    Running,
    GameOver,
}

/// Lifecycle of the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum PieceStatus {
    /// Chosen from the buffer but not placed on the grid yet.
    Uncreated,
    Moving,
    /// Can no longer fall; the line clear sub-phases run while in this status.
    Collided,
}

/// Sub-phase of a collided piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum LineClearStatus {
    /// The piece has not been locked yet.
    Idle,
    /// Complete lines are flashing; they disappear once the frames run out.
    ClearRunning { frames_left: u8 },
    /// Complete lines are removed and everything above falls into the gap.
    Dropping,
}

/// The falling piece together with its lifecycle status and last resolved move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePiece {
    piece: Piece,
    status: PieceStatus,
    last_move: Move,
}

impl ActivePiece {
    fn uncreated(kind: PieceKind) -> Self {
        Self {
            piece: Piece::new(kind),
            status: PieceStatus::Uncreated,
            last_move: Move::NoMove,
        }
    }

    #[must_use]
    pub fn piece(&self) -> Piece {
        self.piece
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.piece.kind()
    }

    #[must_use]
    pub fn status(&self) -> PieceStatus {
        self.status
    }

    #[must_use]
    pub fn last_move(&self) -> Move {
        self.last_move
    }

    /// Playable column of the leftmost block.
    #[must_use]
    pub fn column(&self) -> usize {
        self.piece.column()
    }

    /// Playable row of the topmost block.
    #[must_use]
    pub fn row(&self) -> usize {
        self.piece.row()
    }
}

/// Board engine: grid, active piece, upcoming pieces, counters and game phase.
///
/// The board exposes each rule step as a separate mutator so that the transition machine in
/// [`GameState`](crate::GameState) can sequence them; it does not decide on its own when a
/// tick ends. Copying a board is a plain [`Clone`].
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    grid: Grid,
    piece: ActivePiece,
    piece_buffer: PieceBuffer,
    stats: GameStats,
    phase: GamePhase,
    line_clear: LineClearStatus,
    pending_lines: Vec<usize>,
    paused: bool,
    spawn_blocked: bool,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Creates a board at the starting menu with a random piece sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a deterministic piece sequence.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::fresh(PieceBuffer::with_seed(seed), GamePhase::FirstStart)
    }

    /// Creates a running board with the given grid.
    #[must_use]
    pub fn with_grid(grid: Grid, seed: PieceSeed) -> Self {
        Self {
            grid,
            ..Self::fresh(PieceBuffer::with_seed(seed), GamePhase::Running)
        }
    }

    /// Creates a running board from ASCII art; see [`Grid::from_ascii`].
    #[must_use]
    pub fn from_ascii(art: &str, seed: PieceSeed) -> Self {
        Self::with_grid(Grid::from_ascii(art), seed)
    }

    fn fresh(mut piece_buffer: PieceBuffer, phase: GamePhase) -> Self {
        let piece = ActivePiece::uncreated(piece_buffer.pop_next());
        Self {
            grid: Grid::INITIAL,
            piece,
            piece_buffer,
            stats: GameStats::new(),
            phase,
            line_clear: LineClearStatus::Idle,
            pending_lines: vec![],
            paused: false,
            spawn_blocked: false,
        }
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns the cell at playable coordinates, row 0 at the top.
    #[must_use]
    pub fn cell(&self, column: usize, row: usize) -> Cell {
        self.grid.cell(column, row)
    }

    #[must_use]
    pub fn piece(&self) -> &ActivePiece {
        &self.piece
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.piece_buffer.next_pieces()
    }

    #[must_use]
    pub fn game_phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn line_clear_status(&self) -> LineClearStatus {
        self.line_clear
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn column_heights(&self) -> [usize; PLAYABLE_WIDTH] {
        self.grid.column_heights()
    }

    /// Places the uncreated piece at the spawn position and starts moving it.
    ///
    /// A spawn overlapping locked blocks is remembered and reported by
    /// [`Self::check_game_over`].
    pub fn spawn_piece(&mut self) {
        let piece = Piece::new(self.piece.kind());
        self.spawn_blocked = self.grid.is_colliding(piece);
        self.piece = ActivePiece {
            piece,
            status: PieceStatus::Moving,
            last_move: Move::NoMove,
        };
    }

    fn moved_piece(&self, mv: Move) -> Option<Piece> {
        let piece = self.piece.piece;
        match mv {
            Move::NoMove => Some(piece),
            Move::Down => piece.down(),
            Move::DownRight => piece.down_right(),
            Move::DownLeft => piece.down_left(),
        }
    }

    /// Checks whether the active piece would collide after the given move.
    #[must_use]
    pub fn is_blocked(&self, mv: Move) -> bool {
        self.moved_piece(mv)
            .is_none_or(|piece| self.grid.is_colliding(piece))
    }

    /// Moves the active piece and records the move, unless the result collides.
    pub fn try_move(&mut self, mv: Move) -> Result<(), PieceCollisionError> {
        let piece = self
            .moved_piece(mv)
            .filter(|piece| !self.grid.is_colliding(*piece))
            .ok_or(PieceCollisionError)?;
        self.piece.piece = piece;
        self.piece.last_move = mv;
        Ok(())
    }

    /// Records a move without applying it.
    pub fn record_move(&mut self, mv: Move) {
        self.piece.last_move = mv;
    }

    /// Stops the active piece: it can no longer fall.
    pub fn mark_collided(&mut self) {
        self.piece.status = PieceStatus::Collided;
        self.piece.last_move = Move::NoMove;
    }

    /// Rotates the active piece with wall kicks.
    pub fn rotate(&mut self, direction: RotationDirection) -> Result<(), PieceCollisionError> {
        let piece = self.piece.piece;
        let rotated = match direction {
            RotationDirection::Clockwise => piece.super_rotated_right(&self.grid),
            RotationDirection::CounterClockwise => piece.super_rotated_left(&self.grid),
        };
        self.piece.piece = rotated.ok_or(PieceCollisionError)?;
        Ok(())
    }

    /// Writes the active piece into the grid, labelling its cells with the piece kind.
    pub fn lock_piece(&mut self) {
        self.grid.fill_piece(self.piece.piece);
    }

    /// Finds the complete lines to clear and returns how many there are.
    pub fn compute_complete_lines(&mut self) -> usize {
        self.pending_lines = self.grid.complete_lines();
        self.pending_lines.len()
    }

    /// Scores the lock and enters the next line clear sub-phase.
    pub fn update_scores(&mut self) {
        self.stats.record_lock(self.pending_lines.len());
        self.line_clear = if self.pending_lines.is_empty() {
            LineClearStatus::Dropping
        } else {
            LineClearStatus::ClearRunning {
                frames_left: CLEAR_FRAMES,
            }
        };
    }

    /// Advances the line clear animation by one frame.
    pub fn play_clear_frame(&mut self) {
        if let LineClearStatus::ClearRunning { frames_left } = self.line_clear {
            let frames_left = frames_left.saturating_sub(1);
            self.line_clear = if frames_left == 0 {
                LineClearStatus::Dropping
            } else {
                LineClearStatus::ClearRunning { frames_left }
            };
        }
    }

    /// Removes the cleared lines and drops the blocks above them.
    pub fn drop_free_blocks(&mut self) {
        let lines = std::mem::take(&mut self.pending_lines);
        self.grid.remove_lines(&lines);
    }

    /// Draws the next piece kind; it is placed on the grid by the next [`Self::spawn_piece`].
    pub fn prepare_next_spawn(&mut self) {
        self.piece = ActivePiece::uncreated(self.piece_buffer.pop_next());
        self.line_clear = LineClearStatus::Idle;
    }

    /// Ends a running game on block-out or lock-out.
    ///
    /// Block-out: the last spawned piece overlapped locked blocks. Lock-out: a locked block
    /// sits in the hidden spawn rows. Returns whether the game is over.
    pub fn check_game_over(&mut self) -> bool {
        if self.phase.is_running() && (self.spawn_blocked || self.grid.has_hidden_blocks()) {
            self.phase = GamePhase::GameOver;
        }
        self.phase.is_game_over()
    }

    /// Re-initializes the board.
    ///
    /// From the starting menu the new board is running; after a game over it goes back to the
    /// starting menu. A running game is left untouched. The piece sequence continues from
    /// the current random stream.
    pub fn restart(&mut self) {
        let phase = match self.phase {
            GamePhase::FirstStart => GamePhase::Running,
            GamePhase::GameOver => GamePhase::FirstStart,
            GamePhase::Running => return,
        };
        *self = Self::fresh(self.piece_buffer.reshuffled(), phase);
    }

    pub fn toggle_pause(&mut self) {
        if self.phase.is_running() {
            self.paused = !self.paused;
        }
    }

    #[cfg(test)]
    pub(crate) fn set_piece_kind(&mut self, kind: PieceKind) {
        self.piece = ActivePiece::uncreated(kind);
    }
}
