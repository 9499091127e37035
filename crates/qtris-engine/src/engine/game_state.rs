use std::fmt;

use qtris_learning::QState;

use crate::PieceKind;

use super::{
    action::{Action, Move},
    board::{ActivePiece, Board, GamePhase, LineClearStatus},
    history::History,
};

/// One entry of a run: the board after a tick and the action that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    board: Board,
    incoming_action: Option<Action>,
}

impl Snapshot {
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The action applied to the previous snapshot; `None` for the first snapshot of a run.
    #[must_use]
    pub fn incoming_action(&self) -> Option<Action> {
        self.incoming_action
    }
}

/// Immutable game state: the current board plus the history of the run that led to it.
///
/// The only way forward is [`GameState::generate_successor_state`], which copies the board,
/// applies one tick of the game rules and returns a new state whose history ends with the
/// new snapshot. The receiver is left untouched, so the agent can look ahead freely.
///
/// # Tick
///
/// At the starting menu and after a game over only [`Action::Restart`] has an effect. While
/// running (and not paused) a tick:
///
/// 1. spawns the next piece if none is on the grid yet,
/// 2. resolves the movement intent of the action; a piece that cannot fall any further
///    becomes collided, a blocked diagonal falls back to a straight drop,
/// 3. checks for game over and stops there if the game ended,
/// 4. applies the rotation intent of the action to a moving piece,
/// 5. advances a collided piece through lock, line clear animation and drop.
#[derive(Clone, PartialEq)]
pub struct GameState {
    history: History<Snapshot>,
}

impl GameState {
    /// Starts a run from the given board.
    #[must_use]
    pub fn new(board: Board) -> Self {
        Self {
            history: History::new(Snapshot {
                board,
                incoming_action: None,
            }),
        }
    }

    fn snapshot(&self) -> &Snapshot {
        self.history.last()
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.snapshot().board
    }

    #[must_use]
    pub fn game_phase(&self) -> GamePhase {
        self.board().game_phase()
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.game_phase().is_game_over()
    }

    #[must_use]
    pub fn is_starting_menu(&self) -> bool {
        self.game_phase().is_first_start()
    }

    #[must_use]
    pub fn is_game_running(&self) -> bool {
        self.game_phase().is_running()
    }

    /// Actions available in this state.
    ///
    /// Empty at the starting menu and after a game over; otherwise the fixed
    /// [`Action::LEGAL`] set, regardless of whether each move would collide.
    #[must_use]
    pub fn legal_actions(&self) -> &'static [Action] {
        if self.is_game_running() {
            &Action::LEGAL
        } else {
            &[]
        }
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.board().stats().score()
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.board().stats().level()
    }

    #[must_use]
    pub fn lines_removed(&self) -> usize {
        self.board().stats().lines_removed()
    }

    #[must_use]
    pub fn piece(&self) -> &ActivePiece {
        self.board().piece()
    }

    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.board().next_pieces()
    }

    #[must_use]
    pub fn incoming_action(&self) -> Option<Action> {
        self.snapshot().incoming_action
    }

    /// Iterates over the snapshots of this run, oldest first; the last one is this state.
    pub fn history(&self) -> impl Iterator<Item = &Snapshot> {
        let mut snapshots: Vec<&Snapshot> = self.history.iter().collect();
        snapshots.reverse();
        snapshots.into_iter()
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Returns the state this one was generated from, or `None` for the first observation.
    #[must_use]
    pub fn previous(&self) -> Option<GameState> {
        Some(Self {
            history: self.history.previous()?,
        })
    }

    /// Returns `true` for the first snapshot of a run.
    #[must_use]
    pub fn is_first_observation(&self) -> bool {
        self.history.len() == 1
    }

    /// Checks whether both states are the very same observation, not merely equal ones.
    #[must_use]
    pub fn ptr_eq(&self, other: &GameState) -> bool {
        self.history.ptr_eq(&other.history)
    }

    /// Starts a new run from this state's board, dropping the history.
    #[must_use]
    pub fn with_fresh_history(&self) -> GameState {
        Self::new(self.board().clone())
    }

    /// Applies one tick of the game rules.
    ///
    /// Total over the action vocabulary: actions that do not apply in the current phase, or
    /// whose move or rotation would collide, leave the board as it is.
    #[must_use]
    pub fn generate_successor_state(&self, action: Action) -> GameState {
        let mut board = self.board().clone();
        advance(&mut board, action);
        Self {
            history: self.history.push(Snapshot {
                board,
                incoming_action: Some(action),
            }),
        }
    }
}

fn advance(board: &mut Board, action: Action) {
    match board.game_phase() {
        GamePhase::FirstStart | GamePhase::GameOver => {
            if action == Action::Restart {
                board.restart();
            }
        }
        GamePhase::Running => {
            if !board.is_paused() {
                advance_running(board, action);
            }
        }
    }
}

fn advance_running(board: &mut Board, action: Action) {
    if board.piece().status().is_uncreated() {
        board.spawn_piece();
    }

    if board.piece().status().is_moving() {
        resolve_movement(board, action.movement());
    }

    if board.check_game_over() {
        return;
    }

    if board.piece().status().is_moving()
        && let Some(direction) = action.rotation()
    {
        board.rotate(direction).ok();
    }

    if board.piece().status().is_collided() {
        match board.line_clear_status() {
            LineClearStatus::Idle => {
                board.lock_piece();
                board.compute_complete_lines();
                board.update_scores();
            }
            LineClearStatus::ClearRunning { .. } => board.play_clear_frame(),
            LineClearStatus::Dropping => {
                board.drop_free_blocks();
                board.prepare_next_spawn();
            }
        }
    }
}

fn resolve_movement(board: &mut Board, mv: Move) {
    if mv == Move::NoMove {
        board.record_move(Move::NoMove);
        return;
    }
    if board.is_blocked(Move::Down) {
        board.mark_collided();
        return;
    }
    if board.try_move(mv).is_err() {
        board.try_move(Move::Down).ok();
    }
}

impl QState for GameState {
    type Action = Action;

    fn legal_actions(&self) -> &[Action] {
        GameState::legal_actions(self)
    }
}

impl fmt::Debug for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameState")
            .field("phase", &self.game_phase())
            .field("score", &self.score())
            .field("lines_removed", &self.lines_removed())
            .field("piece", self.piece())
            .field("history_len", &self.history_len())
            .finish_non_exhaustive()
    }
}
