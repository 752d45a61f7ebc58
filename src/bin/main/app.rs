//! The terminal application state and its reaction to key presses.

use crossterm::event::{KeyCode, KeyEvent};
use std::cmp;
use std::path::PathBuf;
use sweep_rs::{Board, GameError, SaveFile};

/// The available directions to move the cursor to.
#[derive(Debug, PartialEq)]
pub enum MoveCursorDirection {
    Up,
    Left,
    Down,
    Right,
}

/// The terminal application.
///
/// Everything the renderer needs is public; the engine itself is only driven
/// from here, one key press at a time.
pub struct App {
    /// The game being played.
    pub board: Board,
    /// The `(row, column)` of the currently selected tile.
    pub cursor: (u8, u8),
    /// One line of feedback for the player: action errors, save/load
    /// outcomes, the win/loss announcement.
    pub status: Option<String>,
    /// Whether the instructions popup is currently shown.
    pub show_help: bool,
    /// Indicates that the main loop should be broken on the next tick.
    pub should_quit: bool,
    save_file: SaveFile,
}

impl App {
    pub fn new(
        rows: u8,
        columns: u8,
        mines_amount: u16,
        save_path: PathBuf,
    ) -> Result<Self, GameError> {
        Ok(App {
            board: Board::new(rows, columns, mines_amount)?,
            cursor: (0, 0),
            status: None,
            show_help: false,
            should_quit: false,
            save_file: SaveFile::new(save_path),
        })
    }

    pub fn handle_key(&mut self, key_event: KeyEvent) {
        use MoveCursorDirection::*;

        // the instructions popup swallows the next key press
        if self.show_help {
            self.show_help = false;
            return;
        }

        match key_event.code {
            KeyCode::Up => self.move_cursor(Up),
            KeyCode::Left => self.move_cursor(Left),
            KeyCode::Down => self.move_cursor(Down),
            KeyCode::Right => self.move_cursor(Right),
            KeyCode::Enter | KeyCode::Char(' ') => self.reveal_selected(),
            KeyCode::Char('f') => self.flag_selected(),
            KeyCode::Char('r') => self.reset_game(),
            KeyCode::Char('s') => self.save_game(),
            KeyCode::Char('l') => self.load_game(),
            KeyCode::Char('i') => self.show_help = true,
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        };
    }

    fn move_cursor(&mut self, direction: MoveCursorDirection) {
        use MoveCursorDirection::*;

        let (row, column) = self.cursor;
        let last_row = self.board.rows() - 1;
        let last_column = self.board.columns() - 1;

        self.cursor = match direction {
            Up => (row.saturating_sub(1), column),
            Left => (row, column.saturating_sub(1)),
            Down => (cmp::min(row + 1, last_row), column),
            Right => (row, cmp::min(column + 1, last_column)),
        };
    }

    fn reveal_selected(&mut self) {
        let (row, column) = self.cursor;

        match self.board.reveal(row, column) {
            Ok(()) => self.announce_outcome(),
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    fn flag_selected(&mut self) {
        let (row, column) = self.cursor;

        match self.board.toggle_flag(row, column) {
            Ok(_) => self.announce_outcome(),
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    /// Refreshes the status line after a successful move: the win check runs
    /// here, exactly once per move.
    fn announce_outcome(&mut self) {
        let (row, column) = self.cursor;

        if self
            .board
            .tile(row, column)
            .is_some_and(|tile| tile.is_lost())
        {
            self.status = Some("You lost! Press [r] to start over.".to_string());
        } else if self.board.check_winner() {
            self.status = Some("You win!".to_string());
        } else {
            self.status = None;
        }
    }

    fn reset_game(&mut self) {
        self.board.reset();
        self.status = None;
    }

    fn save_game(&mut self) {
        self.status = Some(match self.save_file.save(&self.board) {
            Ok(()) => format!("Game saved to {}.", self.save_file.path().display()),
            Err(err) => format!("Couldn't save: {err}"),
        });
    }

    /// Replaces the board with the saved one. A failed load reports the
    /// reason and leaves the current game exactly as it was.
    fn load_game(&mut self) {
        match self.save_file.load() {
            Ok(board) => {
                self.board = board;
                self.clamp_cursor();
                self.status = Some("Game loaded.".to_string());
            }
            Err(err) => self.status = Some(format!("Couldn't load: {err}")),
        }
    }

    /// A loaded board may be smaller than the current one; keep the cursor on
    /// the grid.
    fn clamp_cursor(&mut self) {
        self.cursor = (
            cmp::min(self.cursor.0, self.board.rows() - 1),
            cmp::min(self.cursor.1, self.board.columns() - 1),
        );
    }
}
