//! Terminal setup and the event loop.

use std::io::{self, Stdout};
use std::path::PathBuf;

use canvass::{Shell, Storage, Submission};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, prelude::CrosstermBackend, style::Color};
use thiserror::Error;

use crate::app::App;
use crate::draw;

/// Error type for the terminal frontend.
#[derive(Debug, Error)]
pub enum TuiError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal setup/restore error.
    #[error("Terminal error: {0}")]
    Terminal(String),
}

/// Color theme for the terminal frontend.
#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub background: Color,
    pub text: Color,
    pub highlight: Color,
    pub error: Color,
    pub success: Color,
    pub border: Color,
    pub selected_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Cyan,
            secondary: Color::Blue,
            background: Color::Reset,
            text: Color::White,
            highlight: Color::Yellow,
            error: Color::Red,
            success: Color::Green,
            border: Color::Gray,
            selected_bg: Color::DarkGray,
        }
    }
}

/// Survey builder and preview in the terminal.
#[derive(Debug, Clone)]
pub struct CanvassTui {
    /// Title shown at the top of every screen.
    title: String,
    /// Color theme for the UI.
    theme: Theme,
    /// Where F5 writes `survey.json`.
    export_dir: PathBuf,
}

impl Default for CanvassTui {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvassTui {
    pub fn new() -> Self {
        Self {
            title: "Survey Builder".to_string(),
            theme: Theme::default(),
            export_dir: PathBuf::from("."),
        }
    }

    /// Set the title shown at the top of every screen.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set a custom color theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Set the directory exports are written to.
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Run until the user quits and return every submission made on the way.
    ///
    /// The terminal is restored even when the event loop fails.
    pub fn run<S: Storage>(&self, shell: Shell<S>) -> Result<Vec<Submission>, TuiError> {
        let mut terminal = self.setup_terminal()?;
        let mut app = App::new(shell, self.export_dir.clone());

        let result = self.event_loop(&mut terminal, &mut app);
        self.restore_terminal(&mut terminal)?;
        result?;

        Ok(app.into_submissions())
    }

    fn event_loop<S: Storage>(
        &self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        app: &mut App<S>,
    ) -> Result<(), TuiError> {
        while !app.should_quit() {
            terminal.draw(|frame| draw::draw(frame, app, &self.title, &self.theme))?;

            if let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                app.handle_key(key);
            }
        }
        Ok(())
    }

    fn setup_terminal(&self) -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
        enable_raw_mode().map_err(|e| TuiError::Terminal(format!("cannot enable raw mode: {e}")))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    fn restore_terminal(
        &self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> Result<(), TuiError> {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        Ok(())
    }
}
