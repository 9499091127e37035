use super::{
    PLAYABLE_HEIGHT, PLAYABLE_WIDTH, SENTINEL_MARGIN_BOTTOM, SENTINEL_MARGIN_LEFT,
    SENTINEL_MARGIN_RIGHT, SENTINEL_MARGIN_TOP, TOTAL_HEIGHT, TOTAL_WIDTH,
    piece::{Piece, PieceKind},
};

/// A single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Empty,
    /// Sentinel border.
    Wall,
    /// Locked block labelled with the kind of the piece it came from.
    Block(PieceKind),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[must_use]
    pub fn is_block(self) -> bool {
        matches!(self, Cell::Block(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GridRow {
    cells: [Cell; TOTAL_WIDTH],
}

impl GridRow {
    const OPEN: Self = {
        use Cell::{Empty as E, Wall as W};
        assert!(SENTINEL_MARGIN_LEFT == 2);
        assert!(SENTINEL_MARGIN_RIGHT == 2);
        GridRow {
            cells: [W, W, E, E, E, E, E, E, E, E, E, E, W, W],
        }
    };
    const FLOOR: Self = GridRow {
        cells: [Cell::Wall; TOTAL_WIDTH],
    };

    fn playable_cells(&self) -> &[Cell] {
        &self.cells[SENTINEL_MARGIN_LEFT..][..PLAYABLE_WIDTH]
    }

    fn is_complete(&self) -> bool {
        self.playable_cells().iter().all(|cell| cell.is_block())
    }

    fn has_blocks(&self) -> bool {
        self.playable_cells().iter().any(|cell| cell.is_block())
    }
}

/// The labelled play field: every cell is empty, a wall, or a locked block tagged with its
/// piece kind.
///
/// # Layout
///
/// - **Total dimensions**: 14×24, including 2-cell sentinel margins
/// - **Playable area**: 10×20
/// - **Hidden rows**: the 2 rows above the playable area, where pieces spawn
///
/// Rows below the playable area and the side columns are walls, so collision checks need no
/// bounds special-casing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: [GridRow; TOTAL_HEIGHT],
}

impl Grid {
    pub const PLAYABLE_WIDTH: usize = PLAYABLE_WIDTH;
    pub const PLAYABLE_HEIGHT: usize = PLAYABLE_HEIGHT;

    pub const INITIAL: Self = {
        assert!(SENTINEL_MARGIN_BOTTOM == 2);
        let mut rows = [GridRow::OPEN; TOTAL_HEIGHT];
        rows[TOTAL_HEIGHT - 2] = GridRow::FLOOR;
        rows[TOTAL_HEIGHT - 1] = GridRow::FLOOR;
        Self { rows }
    };

    /// Returns the cell at playable coordinates (`column`, `row`), row 0 at the top.
    #[must_use]
    pub fn cell(&self, column: usize, row: usize) -> Cell {
        self.rows[row + SENTINEL_MARGIN_TOP].cells[column + SENTINEL_MARGIN_LEFT]
    }

    /// Returns an iterator over the playable rows, top to bottom.
    pub fn playable_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows[SENTINEL_MARGIN_TOP..][..PLAYABLE_HEIGHT]
            .iter()
            .map(GridRow::playable_cells)
    }

    /// Checks whether any block of the piece overlaps a wall or a locked block.
    #[must_use]
    pub fn is_colliding(&self, piece: Piece) -> bool {
        piece.blocks().iter().any(|&(x, y)| {
            self.rows
                .get(y)
                .and_then(|row| row.cells.get(x))
                .is_none_or(|cell| !cell.is_empty())
        })
    }

    /// Writes the piece's blocks into the grid, labelled with the piece kind.
    pub fn fill_piece(&mut self, piece: Piece) {
        for (x, y) in piece.blocks() {
            self.rows[y].cells[x] = Cell::Block(piece.kind());
        }
    }

    /// Returns the playable row indices of all complete rows, top to bottom.
    #[must_use]
    pub fn complete_lines(&self) -> Vec<usize> {
        self.rows[SENTINEL_MARGIN_TOP..][..PLAYABLE_HEIGHT]
            .iter()
            .enumerate()
            .filter(|(_, row)| row.is_complete())
            .map(|(y, _)| y)
            .collect()
    }

    /// Removes the given playable rows and drops everything above them to fill the gap.
    ///
    /// Rows entering from the top are empty. Returns the number of rows removed.
    pub fn remove_lines(&mut self, lines: &[usize]) -> usize {
        // hidden rows shift down together with the playable area
        let rows = &mut self.rows[..SENTINEL_MARGIN_TOP + PLAYABLE_HEIGHT];
        let mut removed = 0;
        for y in (0..rows.len()).rev() {
            let is_removed = y >= SENTINEL_MARGIN_TOP && lines.contains(&(y - SENTINEL_MARGIN_TOP));
            if is_removed {
                removed += 1;
                continue;
            }
            if removed > 0 {
                rows[y + removed] = rows[y];
            }
        }
        rows[..removed].fill(GridRow::OPEN);
        removed
    }

    /// Returns the stack height of every playable column.
    ///
    /// The height of a column is measured from the floor to its topmost block, so holes
    /// below the surface do not lower it. Blocks in the hidden rows count as well.
    #[must_use]
    pub fn column_heights(&self) -> [usize; PLAYABLE_WIDTH] {
        let visible = &self.rows[..SENTINEL_MARGIN_TOP + PLAYABLE_HEIGHT];
        let mut heights = [0; PLAYABLE_WIDTH];
        for (column, height) in heights.iter_mut().enumerate() {
            let x = column + SENTINEL_MARGIN_LEFT;
            if let Some(top) = visible.iter().position(|row| row.cells[x].is_block()) {
                *height = PLAYABLE_HEIGHT + SENTINEL_MARGIN_TOP - top;
            }
        }
        heights
    }

    /// Checks whether any locked block sits in the hidden spawn rows.
    #[must_use]
    pub fn has_hidden_blocks(&self) -> bool {
        self.rows[..SENTINEL_MARGIN_TOP].iter().any(GridRow::has_blocks)
    }

    /// Builds a grid from ASCII art, for tests and fixtures.
    ///
    /// Each line is one playable row of 10 cells: `.` is empty and a piece letter
    /// (`I`, `O`, `S`, `Z`, `J`, `L`, `T`) is a locked block of that kind. Lines are aligned
    /// to the bottom of the playable area, so only the interesting rows need to be given.
    ///
    /// # Panics
    ///
    /// Panics on malformed art.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let mut grid = Self::INITIAL;
        let lines: Vec<&str> = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        assert!(
            lines.len() <= PLAYABLE_HEIGHT,
            "at most {PLAYABLE_HEIGHT} rows are allowed, got {}",
            lines.len()
        );

        let first_row = SENTINEL_MARGIN_TOP + PLAYABLE_HEIGHT - lines.len();
        for (i, line) in lines.iter().enumerate() {
            let cells: Vec<char> = line.chars().collect();
            assert_eq!(
                cells.len(),
                PLAYABLE_WIDTH,
                "each row must have exactly {PLAYABLE_WIDTH} cells, got {} at row {i}",
                cells.len()
            );
            for (column, ch) in cells.into_iter().enumerate() {
                let cell = match ch {
                    '.' => Cell::Empty,
                    _ => Cell::Block(
                        PieceKind::from_char(ch)
                            .unwrap_or_else(|| panic!("invalid cell {ch:?} at row {i}")),
                    ),
                };
                grid.rows[first_row + i].cells[column + SENTINEL_MARGIN_LEFT] = cell;
            }
        }
        grid
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::INITIAL
    }
}
