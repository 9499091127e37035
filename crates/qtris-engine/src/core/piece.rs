use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::{SENTINEL_MARGIN_LEFT, SENTINEL_MARGIN_TOP, TOTAL_HEIGHT, TOTAL_WIDTH, grid::Grid};

const PIECE_SPAWN_X: u8 = 5;
const PIECE_SPAWN_Y: u8 = 0;

/// A tetromino with position, rotation, and kind.
///
/// Pieces are immutable values: movement and rotation return new `Piece` instances and never
/// look at the board. Collision checks are the job of [`Grid`].
///
/// # Coordinate System
///
/// - Position is the top-left corner of the piece's bounding box, in internal coordinates
/// - X increases rightward, Y increases downward
/// - Rotation is one of 0° (spawn), 90°, 180°, 270° clockwise
///
/// # Example
///
/// ```
/// use qtris_engine::{Piece, PieceKind};
///
/// let piece = Piece::new(PieceKind::T);
/// let moved = piece.down_right().unwrap();
/// assert_eq!(moved.column(), piece.column() + 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    position: PiecePosition,
    rotation: PieceRotation,
    kind: PieceKind,
}

impl Piece {
    /// Creates a piece of the given kind at the spawn position.
    #[must_use]
    pub const fn new(kind: PieceKind) -> Self {
        Self {
            position: PiecePosition::SPAWN,
            rotation: PieceRotation(0),
            kind,
        }
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Returns the internal `(x, y)` coordinates of the four blocks of the piece.
    #[must_use]
    pub fn blocks(&self) -> ArrayVec<(usize, usize), 4> {
        self.kind
            .cells(self.rotation)
            .iter()
            .map(|&(dx, dy)| {
                (
                    self.position.x() + usize::from(dx),
                    self.position.y() + usize::from(dy),
                )
            })
            .collect()
    }

    /// Returns the playable column of the leftmost block.
    #[must_use]
    pub fn column(&self) -> usize {
        self.blocks()
            .iter()
            .map(|&(x, _)| x.saturating_sub(SENTINEL_MARGIN_LEFT))
            .min()
            .unwrap_or_default()
    }

    /// Returns the playable row of the topmost block.
    ///
    /// Blocks still inside the hidden spawn rows report row 0.
    #[must_use]
    pub fn row(&self) -> usize {
        self.blocks()
            .iter()
            .map(|&(_, y)| y.saturating_sub(SENTINEL_MARGIN_TOP))
            .min()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn left(&self) -> Option<Self> {
        Some(self.with_position(self.position.left()?))
    }

    #[must_use]
    pub fn right(&self) -> Option<Self> {
        Some(self.with_position(self.position.right()?))
    }

    #[must_use]
    pub fn up(&self) -> Option<Self> {
        Some(self.with_position(self.position.up()?))
    }

    #[must_use]
    pub fn down(&self) -> Option<Self> {
        Some(self.with_position(self.position.down()?))
    }

    #[must_use]
    pub fn down_left(&self) -> Option<Self> {
        self.down()?.left()
    }

    #[must_use]
    pub fn down_right(&self) -> Option<Self> {
        self.down()?.right()
    }

    #[must_use]
    pub fn rotated_right(&self) -> Self {
        Self {
            rotation: self.rotation.rotated_right(),
            ..*self
        }
    }

    #[must_use]
    pub fn rotated_left(&self) -> Self {
        Self {
            rotation: self.rotation.rotated_left(),
            ..*self
        }
    }

    /// Rotates clockwise, trying simple kicks when the rotated piece collides.
    #[must_use]
    pub fn super_rotated_right(self, grid: &Grid) -> Option<Self> {
        kick(grid, self.rotated_right())
    }

    /// Rotates counter-clockwise, trying simple kicks when the rotated piece collides.
    #[must_use]
    pub fn super_rotated_left(self, grid: &Grid) -> Option<Self> {
        kick(grid, self.rotated_left())
    }

    fn with_position(self, position: PiecePosition) -> Self {
        Self { position, ..self }
    }
}

/// Simplified wall kick: the rotated piece in place, then shifted up, right, down and left.
///
/// This is not the Super Rotation System; there are no per-kind kick tables.
fn kick(grid: &Grid, piece: Piece) -> Option<Piece> {
    if !grid.is_colliding(piece) {
        return Some(piece);
    }
    [piece.up(), piece.right(), piece.down(), piece.left()]
        .into_iter()
        .flatten()
        .find(|candidate| !grid.is_colliding(*candidate))
}

/// Position of a piece's bounding box in internal coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PiecePosition {
    x: u8,
    y: u8,
}

impl PiecePosition {
    pub const SPAWN: Self = Self::new(PIECE_SPAWN_X, PIECE_SPAWN_Y);

    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        assert!((x as usize) < TOTAL_WIDTH);
        assert!((y as usize) < TOTAL_HEIGHT);
        Self { x, y }
    }

    #[must_use]
    pub fn x(self) -> usize {
        usize::from(self.x)
    }

    #[must_use]
    pub fn y(self) -> usize {
        usize::from(self.y)
    }

    #[must_use]
    pub const fn left(&self) -> Option<Self> {
        if self.x == 0 {
            None
        } else {
            Some(Self::new(self.x - 1, self.y))
        }
    }

    #[must_use]
    pub const fn right(&self) -> Option<Self> {
        if self.x as usize >= TOTAL_WIDTH - 1 {
            None
        } else {
            Some(Self::new(self.x + 1, self.y))
        }
    }

    #[must_use]
    pub const fn up(&self) -> Option<Self> {
        if self.y == 0 {
            None
        } else {
            Some(Self::new(self.x, self.y - 1))
        }
    }

    #[must_use]
    pub const fn down(&self) -> Option<Self> {
        if self.y as usize >= TOTAL_HEIGHT - 1 {
            None
        } else {
            Some(Self::new(self.x, self.y + 1))
        }
    }
}

/// Rotation state of a piece, counted in clockwise quarter turns modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PieceRotation(u8);

impl PieceRotation {
    #[must_use]
    pub fn rotated_right(self) -> Self {
        PieceRotation((self.0 + 1) % 4)
    }

    #[must_use]
    pub fn rotated_left(self) -> Self {
        PieceRotation((self.0 + 3) % 4)
    }

    #[must_use]
    pub fn quarter_turns(self) -> u8 {
        self.0
    }
}

/// The seven tetromino kinds.
///
/// The `Display` form (`"I"`, `"T"`, ...) is the piece-type tag used on the grid and as a
/// feature name by the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::Display)]
#[repr(u8)]
pub enum PieceKind {
    I = 0,
    O = 1,
    S = 2,
    Z = 3,
    J = 4,
    L = 5,
    T = 6,
}

impl PieceKind {
    /// Number of piece kinds (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
    ];

    fn cells(self, rotation: PieceRotation) -> &'static Cells {
        &PIECE_CELLS[self as usize][usize::from(rotation.0)]
    }

    /// Returns the single character tag of this piece kind.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::T => 'T',
        }
    }

    /// Parses a piece kind from its single character tag.
    ///
    /// ```
    /// use qtris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('S'), Some(PieceKind::S));
    /// assert_eq!(PieceKind::from_char('x'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'T' => Some(PieceKind::T),
            _ => None,
        }
    }
}

/// Block offsets of one rotation state, relative to the bounding box corner.
type Cells = [(u8, u8); 4];

/// Rotates block offsets 90° clockwise inside a `size`×`size` box.
const fn rotated_cells(size: u8, cells: Cells) -> Cells {
    let mut rotated = cells;
    let mut i = 0;
    while i < cells.len() {
        let (x, y) = cells[i];
        rotated[i] = (size - 1 - y, x);
        i += 1;
    }
    rotated
}

const fn all_rotations(size: u8, spawn: Cells) -> [Cells; 4] {
    let r1 = rotated_cells(size, spawn);
    let r2 = rotated_cells(size, r1);
    let r3 = rotated_cells(size, r2);
    [spawn, r1, r2, r3]
}

const PIECE_CELLS: [[Cells; 4]; PieceKind::LEN] = [
    // I: ....
    //    IIII
    all_rotations(4, [(0, 1), (1, 1), (2, 1), (3, 1)]),
    // O: OO
    //    OO
    all_rotations(2, [(0, 0), (1, 0), (0, 1), (1, 1)]),
    // S: .SS
    //    SS.
    all_rotations(3, [(1, 0), (2, 0), (0, 1), (1, 1)]),
    // Z: ZZ.
    //    .ZZ
    all_rotations(3, [(0, 0), (1, 0), (1, 1), (2, 1)]),
    // J: J..
    //    JJJ
    all_rotations(3, [(0, 0), (0, 1), (1, 1), (2, 1)]),
    // L: ..L
    //    LLL
    all_rotations(3, [(2, 0), (0, 1), (1, 1), (2, 1)]),
    // T: .T.
    //    TTT
    all_rotations(3, [(1, 0), (0, 1), (1, 1), (2, 1)]),
];
