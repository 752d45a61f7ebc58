//! Plain-text persistence for a game in progress.
//!
//! The format is line oriented: a five-line header (flags remaining, mine
//! count, game-over flag, rows, columns) followed by one line per tile in
//! row-major order, each holding `mine revealed flagged adjacentMines` as
//! single-space-separated tokens. The mine marker is `0`/`1`, the booleans
//! are the literal words `true`/`false`.
//!
//! Loading parses the whole file into a fresh [`Board`] and only then hands
//! it over, so a malformed or truncated file can never leave the caller with
//! a half-overwritten game.

use crate::board::tile::Tile;
use crate::board::Board;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// The enum represents all the variants of why a save was not produced.
#[derive(Error, Debug)]
pub enum SaveError {
    /// A finished game cannot be saved.
    #[error("the game is over and can no longer be saved")]
    NotAllowed,
    /// The save file could not be created or written.
    #[error("could not write the save file")]
    Io(#[from] io::Error),
}

/// The enum represents all the variants of why a save file was not turned
/// into a board.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The save file could not be opened or read.
    #[error("could not read the save file")]
    Io(#[from] io::Error),
    /// The file's contents do not follow the save format: a missing line, a
    /// field that doesn't parse, or a header describing an impossible board.
    #[error("malformed save file at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

/// A handle to the on-disk location of the save.
#[derive(Debug, Clone)]
pub struct SaveFile {
    path: PathBuf,
}

impl SaveFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SaveFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the board to the file, replacing any previous save.
    ///
    /// A finished game is refused before the file is touched, so a rejected
    /// save never clobbers an existing one.
    pub fn save(&self, board: &Board) -> Result<(), SaveError> {
        if board.is_game_over() {
            return Err(SaveError::NotAllowed);
        }

        let mut writer = BufWriter::new(File::create(&self.path)?);
        write_board(board, &mut writer)?;
        writer.flush()?;

        log::debug!("saved the game to {}", self.path.display());
        Ok(())
    }

    /// Reads a board back from the file. The caller's current board stays
    /// untouched unless this returns a fully reconstructed one.
    pub fn load(&self) -> Result<Board, LoadError> {
        let file = File::open(&self.path)?;
        let board = read_board(BufReader::new(file))?;

        log::debug!("loaded a game from {}", self.path.display());
        Ok(board)
    }
}

/// Serializes the board into the text format.
///
/// Fails with [`SaveError::NotAllowed`] when the game is already over.
pub fn write_board(board: &Board, writer: &mut impl Write) -> Result<(), SaveError> {
    if board.is_game_over() {
        return Err(SaveError::NotAllowed);
    }

    writeln!(writer, "{}", board.flags_left())?;
    writeln!(writer, "{}", board.mines_amount())?;
    writeln!(writer, "{}", board.is_game_over())?;
    writeln!(writer, "{}", board.rows())?;
    writeln!(writer, "{}", board.columns())?;

    for tile in board.iter_tiles() {
        writeln!(
            writer,
            "{} {} {} {}",
            tile.is_mine() as u8,
            tile.is_revealed(),
            tile.is_flagged(),
            tile.adjacent_mines()
        )?;
    }

    Ok(())
}

/// Deserializes a board from the text format.
///
/// Every field is validated individually; the first offending line fails the
/// whole load. Content past the last expected tile line is ignored.
pub fn read_board(reader: impl BufRead) -> Result<Board, LoadError> {
    let mut save = SaveReader::new(reader);

    let flags_left: i32 = save.next_field("flags-remaining count")?;
    let mines_amount: u16 = save.next_field("mine count")?;
    let game_over: bool = save.next_field("game-over flag")?;
    let rows: u8 = save.next_field("row count")?;
    let columns: u8 = save.next_field("column count")?;

    let cells = rows as u16 * columns as u16;
    if cells == 0 {
        return Err(save.malformed("the header describes an empty board"));
    }
    if mines_amount > cells {
        return Err(save.malformed(format!(
            "{mines_amount} mines do not fit on a {rows}x{columns} board"
        )));
    }

    let mut grid = Vec::with_capacity(rows as usize);
    for _ in 0..rows {
        let mut tiles = Vec::with_capacity(columns as usize);
        for _ in 0..columns {
            tiles.push(save.next_tile()?);
        }
        grid.push(tiles);
    }

    Ok(Board::from_saved_state(grid, mines_amount, flags_left, game_over))
}

/// Line-by-line reader that tracks the current line number so parse failures
/// can point at the offending spot.
struct SaveReader<R> {
    lines: io::Lines<R>,
    line: usize,
}

impl<R: BufRead> SaveReader<R> {
    fn new(reader: R) -> Self {
        SaveReader {
            lines: reader.lines(),
            line: 0,
        }
    }

    fn next_line(&mut self) -> Result<String, LoadError> {
        self.line += 1;
        match self.lines.next() {
            Some(line) => Ok(line?),
            None => Err(self.malformed("unexpected end of file")),
        }
    }

    /// Reads one header line holding a single value of type `T`.
    fn next_field<T: FromStr>(&mut self, what: &str) -> Result<T, LoadError> {
        let line = self.next_line()?;
        self.parse_token(line.trim(), what)
    }

    /// Reads one tile line: `mine revealed flagged adjacentMines`.
    fn next_tile(&mut self) -> Result<Tile, LoadError> {
        let line = self.next_line()?;
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let &[mine, revealed, flagged, adjacent] = tokens.as_slice() else {
            return Err(self.malformed(format!(
                "expected 4 tile fields, found {}",
                tokens.len()
            )));
        };

        let mine = self.parse_mine_marker(mine)?;
        let revealed: bool = self.parse_token(revealed, "revealed flag")?;
        let flagged: bool = self.parse_token(flagged, "flagged flag")?;
        let adjacent: u8 = self.parse_token(adjacent, "adjacent-mine count")?;

        if adjacent > 8 {
            return Err(self.malformed(format!("adjacent-mine count {adjacent} exceeds 8")));
        }

        Ok(Tile::from_saved(mine, revealed, flagged, adjacent))
    }

    /// Strict parse through [`FromStr`]; for `bool` that accepts exactly the
    /// canonical `true`/`false` spellings the writer emits.
    fn parse_token<T: FromStr>(&self, token: &str, what: &str) -> Result<T, LoadError> {
        token
            .parse()
            .map_err(|_| self.malformed(format!("{what} is not valid: `{token}`")))
    }

    fn parse_mine_marker(&self, token: &str) -> Result<bool, LoadError> {
        match token {
            "0" => Ok(false),
            "1" => Ok(true),
            _ => Err(self.malformed(format!("mine marker is not valid: `{token}`"))),
        }
    }

    fn malformed(&self, reason: impl Into<String>) -> LoadError {
        LoadError::Malformed {
            line: self.line,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    /// A board that has seen a bit of everything: revealed numbered tiles,
    /// flags on a mine and on a safe tile, a dented flag counter.
    fn played_board() -> Board {
        let mines = [(0u8, 2u8), (1, 2), (2, 2), (5, 5)];
        let mut board = Board::with_mine_positions(8, 10, &mines).unwrap();

        board.reveal(0, 1).unwrap();
        board.reveal(4, 4).unwrap();
        board.toggle_flag(0, 2).unwrap();
        board.toggle_flag(7, 9).unwrap();
        board
    }

    fn serialized(board: &Board) -> String {
        let mut buffer = Vec::new();
        write_board(board, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    /// A unique scratch location per test, so parallel tests don't trample
    /// each other's files.
    fn temp_save_file() -> SaveFile {
        use std::sync::atomic::{AtomicU64, Ordering};
        static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!("sweep-rs-test-{id}"));
        std::fs::create_dir_all(&dir).unwrap();
        SaveFile::new(dir.join("status.txt"))
    }

    #[test]
    fn the_layout_is_the_expected_line_format() {
        let board = Board::with_mine_positions(1, 2, &[(0, 1)]).unwrap();

        assert_eq!(
            serialized(&board),
            "1\n1\nfalse\n1\n2\n0 false false 1\n1 false false 0\n"
        );
    }

    #[test]
    fn a_saved_board_loads_back_identically() {
        let board = played_board();

        let loaded = read_board(Cursor::new(serialized(&board))).unwrap();

        assert_eq!(loaded, board);
        assert_eq!(loaded.flags_left(), board.flags_left());
        assert_eq!(loaded.mines_amount(), board.mines_amount());
        assert!(!loaded.is_game_over());
    }

    #[test]
    fn the_lost_marker_never_survives_a_round_trip() {
        let loaded = read_board(Cursor::new(serialized(&played_board()))).unwrap();

        assert!(loaded.iter_tiles().all(|tile| !tile.is_lost()));
    }

    #[test]
    fn saving_a_finished_game_is_rejected() {
        let mut board = Board::with_mine_positions(2, 2, &[(0, 0)]).unwrap();
        board.reveal(0, 0).unwrap();
        assert!(board.is_game_over());

        let mut buffer = Vec::new();
        assert!(matches!(
            write_board(&board, &mut buffer),
            Err(SaveError::NotAllowed)
        ));
        assert!(buffer.is_empty());
    }

    #[test]
    fn a_rejected_save_leaves_the_previous_file_untouched() {
        let save_file = temp_save_file();
        let mut board = played_board();
        save_file.save(&board).unwrap();
        let saved_contents = std::fs::read_to_string(save_file.path()).unwrap();

        // lose the game, then try to save over the good file
        board.reveal(5, 5).unwrap();
        assert!(matches!(save_file.save(&board), Err(SaveError::NotAllowed)));

        assert_eq!(
            std::fs::read_to_string(save_file.path()).unwrap(),
            saved_contents
        );
    }

    #[test]
    fn a_file_round_trip_reproduces_the_board() {
        let save_file = temp_save_file();
        let board = played_board();

        save_file.save(&board).unwrap();
        let loaded = save_file.load().unwrap();

        assert_eq!(loaded, board);
    }

    #[test]
    fn loading_a_missing_file_reports_an_io_error() {
        let save_file = temp_save_file();

        assert!(matches!(save_file.load(), Err(LoadError::Io(_))));
    }

    #[test]
    fn loading_a_truncated_tile_list_fails() {
        let text = serialized(&played_board());
        let truncated = &text[..text.trim_end().rfind('\n').unwrap() + 1];

        let result = read_board(Cursor::new(truncated.to_string()));

        assert!(matches!(
            result,
            Err(LoadError::Malformed { line: 85, .. })
        ));
    }

    #[test]
    fn loading_a_non_numeric_header_field_fails() {
        let result = read_board(Cursor::new("10\nten\nfalse\n8\n10\n"));

        assert!(matches!(result, Err(LoadError::Malformed { line: 2, .. })));
    }

    #[test]
    fn non_canonical_boolean_spellings_are_rejected() {
        let result = read_board(Cursor::new("1\n1\nFalse\n1\n1\n0 false false 0\n"));

        assert!(matches!(result, Err(LoadError::Malformed { line: 3, .. })));
    }

    #[test]
    fn a_bad_mine_marker_is_rejected() {
        let result = read_board(Cursor::new("1\n1\nfalse\n1\n1\n2 false false 0\n"));

        assert!(matches!(result, Err(LoadError::Malformed { line: 6, .. })));
    }

    #[test]
    fn a_tile_line_with_the_wrong_arity_is_rejected() {
        let result = read_board(Cursor::new("1\n1\nfalse\n1\n1\n0 false false\n"));

        assert!(matches!(result, Err(LoadError::Malformed { line: 6, .. })));
    }

    #[test]
    fn an_out_of_range_adjacency_count_is_rejected() {
        let result = read_board(Cursor::new("1\n1\nfalse\n1\n1\n0 false false 9\n"));

        assert!(matches!(result, Err(LoadError::Malformed { line: 6, .. })));
    }

    #[test]
    fn a_header_describing_an_impossible_board_is_rejected() {
        // more mines than cells
        let result = read_board(Cursor::new("5\n5\nfalse\n2\n2\n"));
        assert!(matches!(result, Err(LoadError::Malformed { line: 5, .. })));

        // zero-area grid
        let result = read_board(Cursor::new("0\n0\nfalse\n0\n10\n"));
        assert!(matches!(result, Err(LoadError::Malformed { line: 5, .. })));
    }

    #[test]
    fn trailing_content_after_the_tile_list_is_ignored() {
        let mut text = serialized(&played_board());
        text.push_str("leftover junk\n");

        assert!(read_board(Cursor::new(text)).is_ok());
    }
}
