//! Board geometry shared by the game rules.
//!
//! Coordinates are "internal": they include a 2-cell sentinel margin on every side so that
//! pieces described by a 4×4 bounding box can reach every playable column. The two top
//! margin rows are the hidden spawn rows; the bottom and side margins are walls.

pub use self::{grid::*, piece::*};

pub(crate) mod grid;
pub(crate) mod piece;

pub(crate) const SENTINEL_MARGIN_LEFT: usize = 2;
pub(crate) const SENTINEL_MARGIN_RIGHT: usize = 2;
pub(crate) const SENTINEL_MARGIN_TOP: usize = 2;
pub(crate) const SENTINEL_MARGIN_BOTTOM: usize = 2;
pub(crate) const PLAYABLE_WIDTH: usize = 10;
pub(crate) const PLAYABLE_HEIGHT: usize = 20;
pub(crate) const TOTAL_WIDTH: usize = SENTINEL_MARGIN_LEFT + PLAYABLE_WIDTH + SENTINEL_MARGIN_RIGHT;
pub(crate) const TOTAL_HEIGHT: usize =
    SENTINEL_MARGIN_TOP + PLAYABLE_HEIGHT + SENTINEL_MARGIN_BOTTOM;
