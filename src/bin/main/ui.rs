//! The renderer functions.

use crate::app::App;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::Frame;
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Row, Table, Widget};
use sweep_rs::Tile;

/// The number of terminal rows a single tile occupies, borders included.
const CELL_HEIGHT: u8 = 3;
/// The number of terminal columns a single tile occupies, borders included.
const CELL_WIDTH: u8 = 5;
/// The width of one stats block (the flag counter / the mine counter).
const STATS_BLOCK_WIDTH: u16 = 12;

const COVERED_SYMBOL: &str = "███";
const FLAG_SYMBOL: &str = " ⚑ ";
const LOST_MINE_SYMBOL: &str = " ✸ ";
const WRONG_FLAG_SYMBOL: &str = " ✗ ";

const CELL_COLOR: Color = Color::Yellow;
const CELL_PALE_COLOR: Color = Color::LightYellow;
const APP_BG_COLOR: Color = Color::White;
const REGULAR_TEXT_COLOR: Color = Color::Black;
const LEGEND_TEXT_COLOR: Color = Color::DarkGray;
const INFO_WIDGET_BLOCK_COLOR: Color = Color::LightYellow;
const INSTRUCTIONS_POPUP_BORDER_COLOR: Color = Color::LightYellow;

const LEGEND_TEXT: [&str; 6] = [
    "[↑][←][↓][→]: move the cursor",
    "[SPACE] / [ENTER]: reveal the selected cell",
    "[f]: toggle a flag on the selected cell",
    "[s] / [l] / [r]: save / load / restart",
    "[i]: instructions",
    "[q] / [ESC]: quit",
];

const INSTRUCTIONS_TEXT: [&str; 14] = [
    "Reveal every safe cell without stepping on a mine.",
    "",
    "A revealed number tells how many of the 8 surrounding",
    "cells hide mines. Revealing a cell with no mines nearby",
    "opens its whole safe neighborhood at once.",
    "",
    "Flag the cells you suspect: the flag counter starts at",
    "the number of mines and tracks the flags you have left.",
    "The game is won once every cell is revealed or flagged.",
    "",
    "A game in progress can be saved with [s] and brought",
    "back later with [l]. A finished game cannot be saved.",
    "",
    "(Press any key to close)",
];

pub fn render(app: &App, frame: &mut Frame) {
    let root = frame.size();

    // 1. The terminal background
    frame.render_widget(Block::default().bg(APP_BG_COLOR), root);

    let (board_container, (flags_info_container, mines_info_container), status_container, legend_container) =
        create_app_layout(&root, app);

    // 2. The grid of tiles
    render_board(app, frame, board_container);

    // 3. The stats
    frame.render_widget(
        build_flags_info_widget(app.board.flags_left()),
        flags_info_container,
    );
    frame.render_widget(
        build_mines_info_widget(app.board.mines_amount()),
        mines_info_container,
    );

    // 4. The status line, when there's something to tell
    if let Some(status) = &app.status {
        frame.render_widget(
            Paragraph::new(status.as_str())
                .fg(REGULAR_TEXT_COLOR)
                .alignment(Alignment::Center),
            status_container,
        );
    }

    // 5. The legend
    frame.render_widget(build_legend_widget(), legend_container);

    // 6. The instructions popup, on demand
    if app.show_help {
        render_popup(
            frame,
            INSTRUCTIONS_TEXT.map(|line| line.to_string()),
            INSTRUCTIONS_POPUP_BORDER_COLOR,
        );
    }
}

/// Stacks the board, the stats, the status line and the legend vertically,
/// centering the fixed-width parts.
fn create_app_layout(container: &Rect, app: &App) -> (Rect, (Rect, Rect), Rect, Rect) {
    let board_height = app.board.rows() as u16 * CELL_HEIGHT as u16;
    let stats_height = 3;
    let status_height = 1;
    let legend_height = LEGEND_TEXT.len() as u16;

    let app_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(Constraint::from_lengths([
            board_height,
            stats_height,
            status_height,
            legend_height,
        ]))
        .split(*container)
        .to_vec();

    let board_container =
        center_horizontally(app_layout[0], app.board.columns() as u16 * CELL_WIDTH as u16);

    let stats_container = center_horizontally(app_layout[1], 2 * STATS_BLOCK_WIDTH);
    let stats_containers = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(Constraint::from_lengths([
            STATS_BLOCK_WIDTH,
            STATS_BLOCK_WIDTH,
        ]))
        .split(stats_container)
        .to_vec();

    (
        board_container,
        (stats_containers[0], stats_containers[1]),
        app_layout[2],
        app_layout[3],
    )
}

/// Takes the horizontally centered `width` columns of the container.
fn center_horizontally(container: Rect, width: u16) -> Rect {
    let margin = container.width.saturating_sub(width) / 2;

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(Constraint::from_lengths([margin, width, margin]))
        .split(container)[1]
}

fn render_board(app: &App, frame: &mut Frame, container: Rect) {
    // the wrong-flag markers only appear once a mine has been stepped on
    let game_lost = (0..app.board.rows()).any(|row| {
        (0..app.board.columns())
            .any(|column| app.board.tile(row, column).is_some_and(|tile| tile.is_lost()))
    });

    let grid = build_grid_layout(&container, app.board.rows(), app.board.columns());

    grid.iter().enumerate().for_each(|(row_index, row)| {
        row.iter()
            .enumerate()
            .for_each(|(column_index, cell_container)| {
                let tile = app
                    .board
                    .tile(row_index as u8, column_index as u8)
                    .expect("the grid layout matches the board dimensions");
                let selected = app.cursor == (row_index as u8, column_index as u8);

                frame.render_widget(build_tile_widget(tile, selected, game_lost), *cell_container);
            });
    });
}

/// The grid layout is what's used to display the tiles of the board: the
/// container is first divided into equal rows, and then each row is divided
/// into equal cells.
fn build_grid_layout(container: &Rect, rows_amount: u8, columns_amount: u8) -> Vec<Vec<Rect>> {
    let vertical_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints((0..rows_amount).map(|_| Constraint::Length(CELL_HEIGHT.into())))
        .split(*container);

    vertical_layout
        .iter()
        .map(|row| {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints((0..columns_amount).map(|_| Constraint::Length(CELL_WIDTH.into())))
                .split(*row)
                .to_vec()
        })
        .collect::<Vec<_>>()
}

/// The function builds a widget (basically, a paragraph) that represents a
/// single tile.
///
/// A covered mine keeps looking like any other covered tile even after a
/// loss; the only mine the player ever sees is the one that was stepped on.
fn build_tile_widget(tile: &Tile, selected: bool, game_lost: bool) -> impl Widget {
    let symbol = if tile.is_lost() {
        LOST_MINE_SYMBOL.to_string()
    } else if game_lost && tile.is_flagged() && !tile.is_mine() {
        WRONG_FLAG_SYMBOL.to_string()
    } else if tile.is_flagged() {
        FLAG_SYMBOL.to_string()
    } else if !tile.is_revealed() {
        COVERED_SYMBOL.to_string()
    } else if tile.adjacent_mines() == 0 {
        "   ".to_string()
    } else {
        format!(" {} ", tile.adjacent_mines())
    };

    let color = if selected { CELL_COLOR } else { CELL_PALE_COLOR };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Thick)
        .border_style(Style::default().fg(color));

    Paragraph::new(symbol).fg(color).block(block)
}

/// Prepares a paragraph to render as an info-block showing the number of
/// flags the player still has. Goes negative when over-flagging.
fn build_flags_info_widget(flags_left: i32) -> impl Widget {
    Paragraph::new(flags_left.to_string())
        .fg(REGULAR_TEXT_COLOR)
        .alignment(Alignment::Center)
        .block(build_info_widget_block(FLAG_SYMBOL.trim()))
}

/// Prepares a paragraph to render as an info-block showing the total number
/// of mines hidden in the board.
fn build_mines_info_widget(mines_amount: u16) -> impl Widget {
    Paragraph::new(mines_amount.to_string())
        .fg(REGULAR_TEXT_COLOR)
        .alignment(Alignment::Center)
        .block(build_info_widget_block(LOST_MINE_SYMBOL.trim()))
}

fn build_info_widget_block(title: &str) -> Block {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Thick)
        .border_style(Style::default().fg(INFO_WIDGET_BLOCK_COLOR))
}

/// The function builds the ready-to-use legend block (the in-game controls).
fn build_legend_widget() -> impl Widget {
    let rows = LEGEND_TEXT.map(|legend_row| {
        let cells = legend_row.split_at(
            legend_row
                .find(':')
                .expect("every legend line holds a `:` delimiter"),
        );

        Row::new([
            Line::from(cells.0).alignment(Alignment::Right),
            Line::from(cells.1).alignment(Alignment::Left),
        ])
    });

    Table::new(rows, Constraint::from_percentages([50, 50])).fg(LEGEND_TEXT_COLOR)
}

/// Builds a popup with the provided contents and renders it in the center of
/// the screen, sized to fit the text.
fn render_popup(frame: &mut Frame, lines: impl IntoIterator<Item = String>, border_color: Color) {
    let lines: Vec<String> = lines.into_iter().collect();
    let lines_amount = lines.len() as u16;

    let block = Block::default()
        .bg(APP_BG_COLOR)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));

    let text = Paragraph::new(lines.join("\n"))
        .fg(REGULAR_TEXT_COLOR)
        .alignment(Alignment::Center)
        .block(block);

    let popup_height = lines_amount + 2;
    let popup_width = lines.iter().map(|line| line.len()).max().unwrap_or(0) as u16 + 4;
    let container = centered_rect(frame.size(), popup_width, popup_height);

    frame.render_widget(Clear, container);
    frame.render_widget(text, container);
}

fn centered_rect(container: Rect, width: u16, height: u16) -> Rect {
    let vertical_margin = container.height.saturating_sub(height) / 2;
    let horizontal_margin = container.width.saturating_sub(width) / 2;

    let row = Layout::default()
        .direction(Direction::Vertical)
        .constraints(Constraint::from_lengths([
            vertical_margin,
            height,
            vertical_margin,
        ]))
        .split(container)[1];

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(Constraint::from_lengths([
            horizontal_margin,
            width,
            horizontal_margin,
        ]))
        .split(row)[1]
}
