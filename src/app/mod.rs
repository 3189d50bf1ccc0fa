//! Application module
//!
//! Contains the terminal event loop: read a key, turn it into wizard actions,
//! fire due timers, redraw.
//!
//! # Module Structure
//! - `state` - Terminal-side state (input cursor, status line, quit flag)
//! - Main module - App struct and event loop

mod state;

pub use state::AppState;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::input::{handle_key, KeyOutcome};
use crate::ui::TerminalRenderer;
use crate::view::StepRenderer;
use crate::wizard::{WizardController, WizardSettings};

/// How long to wait for a key before checking timers again
pub const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Main application struct
pub struct App {
    wizard: WizardController,
    state: AppState,
}

impl App {
    /// Create a new application on the system clock
    pub fn new(settings: WizardSettings) -> Self {
        info!("Creating new App instance");
        Self::with_wizard(WizardController::new(settings))
    }

    pub fn with_wizard(wizard: WizardController) -> Self {
        Self {
            wizard,
            state: AppState::new(),
        }
    }

    pub fn wizard(&self) -> &WizardController {
        &self.wizard
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        info!("Starting main application loop");

        loop {
            // Handle input events
            if event::poll(INPUT_POLL_INTERVAL)? {
                if let Event::Key(key_event) = event::read()? {
                    if key_event.kind == KeyEventKind::Press {
                        self.handle_key_event(key_event);
                    }
                }
            }

            self.tick();
            if self.state.should_quit {
                break;
            }

            self.draw(terminal)?;
        }

        info!(step = %self.wizard.step(), "leaving application loop");
        Ok(())
    }

    /// Fire due timers and fold their events into the status line.
    pub fn tick(&mut self) {
        let events = self.wizard.poll();
        if !events.is_empty() {
            debug!(count = events.len(), "wizard events");
        }
        self.state.apply_events(&events);
    }

    /// Render the current step
    pub fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let view = self.wizard.view();
        self.state.input.sync(&view);
        let mut renderer =
            TerminalRenderer::new(terminal, &self.state.input, self.state.status_message.as_deref());
        renderer.render(&view)
    }

    /// Handle keyboard input events
    pub fn handle_key_event(&mut self, key_event: KeyEvent) {
        let outcome = {
            let view = self.wizard.view();
            handle_key(&mut self.state.input, key_event, &view)
        };

        match outcome {
            KeyOutcome::Quit => {
                info!("Quit requested");
                self.state.should_quit = true;
            }
            KeyOutcome::Actions(actions) => {
                for action in actions {
                    if let Err(e) = self.wizard.dispatch(action) {
                        warn!("action rejected: {}", e);
                        self.state.status_message = Some(e.to_string());
                    }
                }
            }
            KeyOutcome::Handled | KeyOutcome::Ignored => {}
        }
    }
}
