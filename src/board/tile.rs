/// A single cell of the minefield.
///
/// A tile knows whether it hides a mine, whether the player has revealed or
/// flagged it, and how many of its eight neighbors are mined. The `lost`
/// marker is special: it is set on at most one tile per game, the mine the
/// player stepped on, and it is the only way a mine ever becomes visible.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Tile {
    mine: bool,
    revealed: bool,
    flagged: bool,
    lost: bool,
    adjacent_mines: u8,
}

impl Tile {
    /// Rebuilds a tile from its persisted fields.
    ///
    /// The `lost` marker is not part of the save format and always comes back
    /// unset, so a loaded board never shows a blown mine.
    pub(crate) fn from_saved(mine: bool, revealed: bool, flagged: bool, adjacent_mines: u8) -> Self {
        Tile {
            mine,
            revealed,
            flagged,
            lost: false,
            adjacent_mines,
        }
    }

    /// Checks whether the tile hides a mine.
    pub fn is_mine(&self) -> bool {
        self.mine
    }

    pub(crate) fn set_mine(&mut self) {
        self.mine = true;
    }

    /// Checks whether the player has uncovered the tile, either directly or
    /// through a cascade.
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub(crate) fn set_revealed(&mut self) {
        self.revealed = true;
    }

    /// Checks whether the player has marked the tile as a suspected mine.
    pub fn is_flagged(&self) -> bool {
        self.flagged
    }

    pub(crate) fn set_flagged(&mut self, flagged: bool) {
        self.flagged = flagged;
    }

    /// Checks whether this is the mine that ended the game.
    pub fn is_lost(&self) -> bool {
        self.lost
    }

    pub(crate) fn mark_lost(&mut self) {
        self.lost = true;
    }

    /// The number of mines among the tile's neighbors. Only meaningful once
    /// the board has finished placing mines.
    pub fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }

    pub(crate) fn set_adjacent_mines(&mut self, amount: u8) {
        self.adjacent_mines = amount;
    }
}

#[cfg(test)]
mod test {
    use super::Tile;

    #[test]
    fn a_fresh_tile_is_fully_untouched() {
        let tile = Tile::default();

        assert!(!tile.is_mine());
        assert!(!tile.is_revealed());
        assert!(!tile.is_flagged());
        assert!(!tile.is_lost());
        assert_eq!(tile.adjacent_mines(), 0);
    }

    #[test]
    fn restoring_a_tile_keeps_every_persisted_field() {
        let tile = Tile::from_saved(true, false, true, 3);

        assert!(tile.is_mine());
        assert!(!tile.is_revealed());
        assert!(tile.is_flagged());
        assert_eq!(tile.adjacent_mines(), 3);
    }

    #[test]
    fn the_lost_marker_is_never_restored() {
        let tile = Tile::from_saved(true, true, false, 0);

        assert!(!tile.is_lost());
    }
}
