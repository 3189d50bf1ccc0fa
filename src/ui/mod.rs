//! User interface rendering module
//!
//! - Main module - frame layout (header, step progress, body, footer) and the
//!   terminal implementation of [`StepRenderer`]
//! - `screens` - per-step bodies

pub mod screens;

use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame, Terminal,
};

use crate::error::Result;
use crate::input::InputState;
use crate::steps::Step;
use crate::theme::{Colors, Styles};
use crate::view::{StepRenderer, StepView};

/// Draws step views onto a ratatui terminal.
pub struct TerminalRenderer<'t, B: Backend> {
    terminal: &'t mut Terminal<B>,
    input: &'t InputState,
    status: Option<&'t str>,
}

impl<'t, B: Backend> TerminalRenderer<'t, B> {
    pub fn new(terminal: &'t mut Terminal<B>, input: &'t InputState, status: Option<&'t str>) -> Self {
        Self {
            terminal,
            input,
            status,
        }
    }
}

impl<B: Backend> StepRenderer for TerminalRenderer<'_, B> {
    fn render(&mut self, view: &StepView<'_>) -> Result<()> {
        let input = self.input;
        let status = self.status;
        self.terminal.draw(|f| draw(f, view, input, status))?;
        Ok(())
    }
}

/// Render one frame for the current step.
pub fn draw(f: &mut Frame, view: &StepView<'_>, input: &InputState, status: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(1), // Step progress
            Constraint::Min(8),    // Body
            Constraint::Length(4), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], view);
    render_progress(f, chunks[1], view);

    let body = chunks[2].inner(ratatui::layout::Margin {
        horizontal: 2,
        vertical: 1,
    });
    match view.step {
        Step::Welcome => screens::render_welcome(f, body, view, input),
        Step::Employees => screens::render_employees(f, body, view, input),
        Step::BusinessAge => screens::render_business_age(f, body, view, input),
        Step::Analysis => screens::render_analysis(f, body, view),
        Step::Pricing => screens::render_pricing(f, body, view),
        Step::PersonalInfo => screens::render_personal_info(f, body, view, input),
        Step::EntityInfo => screens::render_entity_info(f, body, view, input),
        Step::Checkout => screens::render_checkout(f, body, view, input),
        Step::Confirmation => screens::render_confirmation(f, body, view),
    }

    render_footer(f, chunks[3], view, status);
}

fn render_header(f: &mut Frame, area: Rect, view: &StepView<'_>) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(view.title(), Styles::title()),
        Span::styled(format!("   {}", view.step_label()), Styles::text_muted()),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(header, area);
}

fn render_progress(f: &mut Frame, area: Rect, view: &StepView<'_>) {
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Colors::PROGRESS).bg(Colors::BG_GAUGE))
        .percent(u16::from(view.progress_percent.min(100)))
        .label(format!("{}%", view.progress_percent));
    f.render_widget(gauge, area);
}

fn render_footer(f: &mut Frame, area: Rect, view: &StepView<'_>, status: Option<&str>) {
    let mut buttons = Vec::new();
    if view.show_back {
        buttons.push(Span::styled(" < Back [Esc] ", Styles::text_secondary()));
        buttons.push(Span::raw("   "));
    }
    if let Some(label) = view.cta_label {
        let style = if view.can_proceed {
            Styles::button_active()
        } else {
            Styles::button_disabled()
        };
        buttons.push(Span::styled(format!(" {} [Enter] ", label), style));
    }

    let mut lines = vec![Line::from(buttons)];
    if let Some(status) = status {
        lines.push(Line::from(Span::styled(status.to_string(), Styles::warning())));
    } else if let Some(missing) = view.missing_label() {
        lines.push(Line::from(Span::styled(missing, Styles::text_muted())));
    } else {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(key_hints(view.step), Styles::nav_hint())));

    let footer = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(footer, area);
}

fn key_hints(step: Step) -> &'static str {
    match step {
        Step::Welcome => "Up/Down or letter: choose state  Enter: continue  Ctrl+C: quit",
        Step::Employees => "Up/Down: move  Enter: choose  Esc: back",
        Step::BusinessAge => "Up/Down: change  Left/Right/Tab: next part  Enter: continue  Esc: back",
        Step::Analysis => "Enter: continue once the analysis finishes  Esc: back",
        Step::Pricing => "Up/Down: choose plan  Enter: continue  Esc: back",
        Step::PersonalInfo | Step::Checkout => "Type to fill  Tab/Up/Down: field  Enter: continue  Esc: back",
        Step::EntityInfo => "Type to fill  Tab: field  Left/Right: entity type  Enter: continue",
        Step::Confirmation => "Enter or Esc: exit",
    }
}
