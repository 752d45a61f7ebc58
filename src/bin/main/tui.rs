//! The terminal guard: raw mode and the alternate screen, restored on exit.

use color_eyre::Result;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};
use std::io::{self, Stderr};

/// Wraps the ratatui terminal so the rest of the binary never touches the
/// backend directly.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stderr>>,
}

impl Tui {
    /// Switches the host terminal into raw mode on the alternate screen. The
    /// UI is drawn to stderr, leaving stdout free.
    pub fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        crossterm::execute!(io::stderr(), EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(io::stderr()))?;

        Ok(Tui { terminal })
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }

    /// Hands the terminal back to the shell.
    pub fn exit(&mut self) -> Result<()> {
        crossterm::execute!(io::stderr(), LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }
}
