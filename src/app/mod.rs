use std::io::Stdout;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEvent};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::ListState;
use ratatui::Terminal;

use crate::config::AppConfig;
use crate::store::NoteStore;
use crate::ui::{self, Palette};

mod actions;
pub mod input;
pub mod state;

pub use input::Input;
pub use state::{AppState, EditSession, EditTarget, Flow, Mode, ModeKind};

pub struct App<S: NoteStore> {
    pub config: Arc<AppConfig>,
    store: S,
    state: AppState,
    list_state: ListState,
    palette: Palette,
    should_quit: bool,
}

impl<S: NoteStore> App<S> {
    pub fn new(config: Arc<AppConfig>, store: S) -> Result<Self> {
        let state = AppState::load(&store, &config.default_title, config.store.seed_attempts)
            .context("loading notes for initial state")?;
        let mut list_state = ListState::default();
        list_state.select(Some(state.selected));
        let palette = Palette::for_theme(config.theme_name());
        tracing::info!(notes = state.len(), "notebook loaded");
        Ok(Self {
            config,
            store,
            state,
            list_state,
            palette,
            should_quit: false,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;
        let result = self.event_loop(&mut terminal);
        let restored = restore_terminal(&mut terminal);
        loop_outcome(result, restored)
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            terminal
                .draw(|frame| {
                    if self.state.is_empty() {
                        self.list_state.select(None);
                    } else {
                        self.list_state.select(Some(self.state.selected));
                    }
                    ui::draw_app(
                        frame,
                        &self.state,
                        &mut self.list_state,
                        &self.palette,
                        &self.config.header,
                    );
                })
                .context("rendering frame")?;

            if self.should_quit {
                break;
            }

            let event = event::read().context("reading terminal event")?;
            if self.handle_event(event)? {
                terminal.autoresize().context("resizing terminal")?;
                terminal.clear().context("clearing terminal after resize")?;
            }
        }
        Ok(())
    }

    /// Dispatches one terminal event. Returns true when the drawing surface
    /// has to be reflowed before the next frame. Resizes never touch the
    /// edit session or the store.
    pub fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Key(key) => {
                self.handle_key(key)?;
                Ok(false)
            }
            Event::Resize(width, height) => {
                tracing::debug!(width, height, "terminal resized");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Feeds one key to the state machine. Store failures propagate and end the loop.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(input) = input::translate(key) else {
            return Ok(());
        };
        if self.state.handle_input(input, &self.store)? == Flow::Quit {
            self.should_quit = true;
        }
        Ok(())
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

/// The loop's own error wins over a failure to restore the terminal.
fn loop_outcome(result: Result<()>, restored: Result<()>) -> Result<()> {
    result?;
    restored
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen).context("switching to alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("creating terminal backend")?;
    terminal.hide_cursor().context("hiding cursor")?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    terminal.show_cursor().ok();
    disable_raw_mode().context("disabling raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("restoring screen state")?;
    Ok(())
}
