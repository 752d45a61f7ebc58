//! The board engine: mine placement, the cascade reveal, flag bookkeeping and
//! win/loss detection.

pub mod tile;

use rand::Rng;
use std::fmt::{Debug, Formatter};
use thiserror::Error;
use tile::Tile;

/// Board height of the standard game, in rows.
pub const DEFAULT_ROWS: u8 = 8;
/// Board width of the standard game, in columns.
pub const DEFAULT_COLUMNS: u8 = 10;
/// Number of mines hidden in the standard game.
pub const DEFAULT_MINES_AMOUNT: u16 = 10;

/// Relative positions of the up-to-eight neighbors of a cell.
const NEIGHBOR_OFFSETS: [(i16, i16); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// The enum represents all the variants of what can possibly go wrong when
/// operating on a [`Board`].
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The requested position lies outside the grid.
    #[error("cell ({row}, {column}) is outside the board")]
    InvalidCoordinate { row: u8, column: u8 },
    /// The move is not allowed in the current state: the target tile is
    /// already revealed, it is flagged (for a reveal), or the game has
    /// already ended.
    #[error("the requested action is not allowed in the current game state")]
    IllegalAction,
    /// A board must contain at least one cell.
    #[error("the board must contain at least one cell")]
    EmptyBoard,
    /// More mines were requested than the grid has cells.
    #[error("cannot place {requested} mines on a board with {cells} cells")]
    TooManyMines { requested: u16, cells: u16 },
}

/// Which transition [`Board::toggle_flag`] performed, so that callers can
/// update a displayed flag counter without re-querying the tile.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FlagToggle {
    /// The tile was unflagged and is now flagged.
    Placed,
    /// The tile was flagged and is now unflagged.
    Removed,
}

/// The playing field and its scalar game state.
///
/// The board exclusively owns a dense `rows × columns` grid of [`Tile`]s.
/// `flags_left` is the *flags remaining* counter shown to the player: it
/// starts at the mine count, drops by one per flag placed and grows by one
/// per flag removed, so over-flagging drives it negative.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    grid: Vec<Vec<Tile>>,
    mines_amount: u16,
    flags_left: i32,
    game_over: bool,
}

impl Board {
    /// Creates a board with randomly placed mines, drawn from the thread RNG.
    ///
    /// Fails with [`GameError::EmptyBoard`] for a zero-area grid and with
    /// [`GameError::TooManyMines`] when the mines don't fit. Zero mines is a
    /// legal (if peaceful) configuration.
    pub fn new(rows: u8, columns: u8, mines_amount: u16) -> Result<Self, GameError> {
        Self::with_rng(rows, columns, mines_amount, &mut rand::thread_rng())
    }

    /// Creates a board with randomly placed mines, drawn from the provided
    /// source. Handing in a seeded RNG makes the layout reproducible.
    pub fn with_rng(
        rows: u8,
        columns: u8,
        mines_amount: u16,
        rng: &mut impl Rng,
    ) -> Result<Self, GameError> {
        let mut board = Self::empty(rows, columns, mines_amount)?;
        board.place_mines(rng);
        board.compute_adjacent_mines();
        Ok(board)
    }

    /// Creates a board with mines at exactly the given `(row, column)`
    /// positions. Duplicates collapse into a single mine; the mine count is
    /// taken from the resulting layout.
    pub fn with_mine_positions(
        rows: u8,
        columns: u8,
        mines: &[(u8, u8)],
    ) -> Result<Self, GameError> {
        let mut board = Self::empty(rows, columns, 0)?;

        for &(row, column) in mines {
            board
                .tile_mut(row, column)
                .ok_or(GameError::InvalidCoordinate { row, column })?
                .set_mine();
        }

        let amount = board.grid.iter().flatten().filter(|t| t.is_mine()).count() as u16;
        board.mines_amount = amount;
        board.flags_left = amount as i32;
        board.compute_adjacent_mines();
        Ok(board)
    }

    fn empty(rows: u8, columns: u8, mines_amount: u16) -> Result<Self, GameError> {
        let cells = rows as u16 * columns as u16;

        if cells == 0 {
            return Err(GameError::EmptyBoard);
        }
        if mines_amount > cells {
            return Err(GameError::TooManyMines {
                requested: mines_amount,
                cells,
            });
        }

        Ok(Board {
            grid: vec![vec![Tile::default(); columns as usize]; rows as usize],
            mines_amount,
            flags_left: mines_amount as i32,
            game_over: false,
        })
    }

    /// Used by the loader, which validates a complete save file before
    /// committing it as the new board state.
    pub(crate) fn from_saved_state(
        grid: Vec<Vec<Tile>>,
        mines_amount: u16,
        flags_left: i32,
        game_over: bool,
    ) -> Self {
        Board {
            grid,
            mines_amount,
            flags_left,
            game_over,
        }
    }

    /// Starts a new game on the same configuration: fresh tiles, a full flag
    /// counter and a new random mine layout.
    pub fn reset(&mut self) {
        self.reset_with_rng(&mut rand::thread_rng());
    }

    /// Like [`Board::reset`], but drawing the new layout from the provided
    /// source.
    pub fn reset_with_rng(&mut self, rng: &mut impl Rng) {
        for tile in self.grid.iter_mut().flatten() {
            *tile = Tile::default();
        }
        self.flags_left = self.mines_amount as i32;
        self.game_over = false;
        self.place_mines(rng);
        self.compute_adjacent_mines();
    }

    /// Converts random cells into mines until the configured amount is placed.
    ///
    /// Rejection sampling: a position that already holds a mine is redrawn.
    /// This always terminates because the constructors guarantee the mines
    /// fit on the grid.
    fn place_mines(&mut self, rng: &mut impl Rng) {
        let (rows, columns) = (self.rows() as usize, self.columns() as usize);
        let mut placed = 0;

        while placed < self.mines_amount {
            let row = rng.gen_range(0..rows);
            let column = rng.gen_range(0..columns);

            let tile = &mut self.grid[row][column];
            if !tile.is_mine() {
                tile.set_mine();
                placed += 1;
            }
        }

        log::debug!(
            "placed {} mines on a {}x{} board",
            self.mines_amount,
            rows,
            columns
        );
    }

    /// Stores into every tile the number of mines among its neighbors.
    fn compute_adjacent_mines(&mut self) {
        for row in 0..self.rows() {
            for column in 0..self.columns() {
                let amount = self
                    .neighbor_positions(row, column)
                    .into_iter()
                    .filter(|&(r, c)| self.grid[r as usize][c as usize].is_mine())
                    .count() as u8;

                self.grid[row as usize][column as usize].set_adjacent_mines(amount);
            }
        }
    }

    /// In-bounds positions of the neighbors of `(row, column)`.
    fn neighbor_positions(&self, row: u8, column: u8) -> Vec<(u8, u8)> {
        let (rows, columns) = (self.rows() as i16, self.columns() as i16);

        NEIGHBOR_OFFSETS
            .iter()
            .map(|&(dr, dc)| (row as i16 + dr, column as i16 + dc))
            .filter(|&(r, c)| r >= 0 && c >= 0 && r < rows && c < columns)
            .map(|(r, c)| (r as u8, c as u8))
            .collect()
    }

    /// The board's height, in rows.
    pub fn rows(&self) -> u8 {
        self.grid.len() as u8
    }

    /// The board's width, in columns.
    pub fn columns(&self) -> u8 {
        self.grid.first().map_or(0, |row| row.len()) as u8
    }

    /// The total number of mines hidden in the grid.
    pub fn mines_amount(&self) -> u16 {
        self.mines_amount
    }

    /// The flags-remaining counter. Negative once the player has placed more
    /// flags than there are mines.
    pub fn flags_left(&self) -> i32 {
        self.flags_left
    }

    /// Whether the game has ended, by loss or by win.
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Returns a read-only tile reference by its position, or [`None`] if the
    /// position lies outside the grid.
    pub fn tile(&self, row: u8, column: u8) -> Option<&Tile> {
        self.grid
            .get(row as usize)
            .and_then(|r| r.get(column as usize))
    }

    fn tile_mut(&mut self, row: u8, column: u8) -> Option<&mut Tile> {
        self.grid
            .get_mut(row as usize)
            .and_then(|r| r.get_mut(column as usize))
    }

    /// All tiles in row-major order; the order the save format uses.
    pub(crate) fn iter_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.grid.iter().flatten()
    }

    /// Reveals the tile at `(row, column)` on the player's behalf.
    ///
    /// Fails with [`GameError::InvalidCoordinate`] outside the grid and with
    /// [`GameError::IllegalAction`] when the game is over or the target is
    /// already revealed or flagged; the board is left untouched in every
    /// failure case. A successful reveal cascades through the zero-adjacency
    /// neighborhood, and stepping on a mine ends the game with that single
    /// tile marked as lost.
    pub fn reveal(&mut self, row: u8, column: u8) -> Result<(), GameError> {
        let tile = self
            .tile(row, column)
            .ok_or(GameError::InvalidCoordinate { row, column })?;

        if self.game_over || tile.is_revealed() || tile.is_flagged() {
            return Err(GameError::IllegalAction);
        }

        self.flood_reveal(row, column);

        // The cascade never uncovers a mine, so a mined target is still
        // hidden here; it becomes the single lost tile and ends the game.
        // Every other mine stays invisible.
        let clicked = &mut self.grid[row as usize][column as usize];
        if clicked.is_mine() {
            clicked.mark_lost();
            self.game_over = true;
        }

        Ok(())
    }

    /// Reveals the tile at `(row, column)` and cascades through its
    /// zero-adjacency region.
    ///
    /// An explicit worklist bounds the depth by the board size instead of the
    /// call stack. A popped position is skipped when it holds a mine or is
    /// already revealed; a flagged tile is unflagged (returning the flag to
    /// the counter) before being revealed; expansion stops at tiles with a
    /// non-zero adjacency number.
    fn flood_reveal(&mut self, row: u8, column: u8) {
        let mut worklist = vec![(row, column)];

        while let Some((r, c)) = worklist.pop() {
            let tile = &mut self.grid[r as usize][c as usize];

            if tile.is_mine() || tile.is_revealed() {
                continue;
            }

            if tile.is_flagged() {
                tile.set_flagged(false);
                self.flags_left += 1;
            }

            tile.set_revealed();

            if tile.adjacent_mines() == 0 {
                worklist.extend(self.neighbor_positions(r, c));
            }
        }
    }

    /// Toggles the flag on the tile at `(row, column)` and reports which way
    /// it flipped.
    ///
    /// Fails with [`GameError::InvalidCoordinate`] outside the grid and with
    /// [`GameError::IllegalAction`] on a revealed tile or once the game is
    /// over, leaving the board untouched.
    pub fn toggle_flag(&mut self, row: u8, column: u8) -> Result<FlagToggle, GameError> {
        let game_over = self.game_over;
        let tile = self
            .tile_mut(row, column)
            .ok_or(GameError::InvalidCoordinate { row, column })?;

        if game_over || tile.is_revealed() {
            return Err(GameError::IllegalAction);
        }

        if tile.is_flagged() {
            tile.set_flagged(false);
            self.flags_left += 1;
            Ok(FlagToggle::Removed)
        } else {
            tile.set_flagged(true);
            self.flags_left -= 1;
            Ok(FlagToggle::Placed)
        }
    }

    /// Checks whether the player has won: every tile is either revealed or
    /// flagged.
    ///
    /// A win is terminal, so a positive answer also ends the game. Safe to
    /// call repeatedly; once true it stays true with no further effect.
    pub fn check_winner(&mut self) -> bool {
        let won = self
            .grid
            .iter()
            .flatten()
            .all(|tile| tile.is_revealed() || tile.is_flagged());

        if won {
            self.game_over = true;
        }

        won
    }
}

/// One character per tile: `F` flagged, `X` the lost mine, `*` a covered
/// mine, `#` a covered empty tile, the adjacency digit once revealed. Covered
/// tiles show their contents here, which is the point of a debug dump.
impl Debug for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in &self.grid {
            for tile in row {
                let symbol = if tile.is_lost() {
                    'X'
                } else if tile.is_flagged() {
                    'F'
                } else if tile.is_mine() {
                    '*'
                } else if tile.is_revealed() {
                    (b'0' + tile.adjacent_mines()) as char
                } else {
                    '#'
                };
                write!(f, "{} ", symbol)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
