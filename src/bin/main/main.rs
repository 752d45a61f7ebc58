//! The terminal front end: argument parsing, terminal setup and the main
//! event loop.

pub mod app;
pub mod tui;
pub mod ui;

use app::App;
use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::event::{self, Event};
use std::path::PathBuf;
use std::time::Duration;
use sweep_rs::{DEFAULT_COLUMNS, DEFAULT_MINES_AMOUNT, DEFAULT_ROWS};

/// How long one wait for an input event may take before the UI gets redrawn
/// anyway.
const TICK_RATE: Duration = Duration::from_millis(250);

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Board height, in rows
    #[arg(short = 'H', long, default_value_t = DEFAULT_ROWS)]
    height: u8,
    /// Board width, in columns
    #[arg(short, long, default_value_t = DEFAULT_COLUMNS)]
    width: u8,
    /// Number of hidden mines
    #[arg(short, long, default_value_t = DEFAULT_MINES_AMOUNT)]
    mines: u16,
    /// Where to keep the saved game
    #[arg(short, long, default_value = "status.txt")]
    save_file: PathBuf,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let mut app = App::new(args.height, args.width, args.mines, args.save_file)
        .map_err(|err| eyre!("couldn't set up the board: {err}"))?;

    let mut tui = tui::Tui::enter()?;

    while !app.should_quit {
        tui.draw(|frame| ui::render(&app, frame))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key_event) = event::read()? {
                app.handle_key(key_event);
            }
        }
    }

    tui.exit()?;
    Ok(())
}
