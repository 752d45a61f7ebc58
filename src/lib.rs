//! A terminal Minesweeper: the classic 8×10 board hiding 10 mines, with
//! plain-text save files so a game in progress can be put down and resumed.
//!
//! The crate splits into the [`board`] engine, which owns the grid and all
//! game rules (mine placement, the cascade reveal, flag bookkeeping, win and
//! loss detection), and the [`savefile`] layer, which reads and writes the
//! line-oriented save format. The binary under `src/bin/main` is a thin
//! ratatui front end over the two.

pub mod board;
pub mod savefile;

pub use board::tile::Tile;
pub use board::{Board, FlagToggle, GameError};
pub use board::{DEFAULT_COLUMNS, DEFAULT_MINES_AMOUNT, DEFAULT_ROWS};
pub use savefile::{LoadError, SaveError, SaveFile};
