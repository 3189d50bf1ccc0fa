//! Per-step screen bodies.
//!
//! Each function draws the middle of the frame for one step. The header,
//! progress gauge and footer are drawn by the parent module.

use crate::analysis::AnalysisPhase;
use crate::catalog::format_money;
use crate::form::{Field, MONTH_NAMES};
use crate::input::{text_fields, InputState};
use crate::state_data::US_STATES;
use crate::theme::{Colors, Styles};
use crate::types::{BusinessStatus, EmployeeCount, FlowVariant};
use crate::view::{mask_card, summary_lines, StepView};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

// ============================================================================
// Shared helpers
// ============================================================================

fn choice_list<'a>(labels: Vec<String>, chosen: Option<usize>, title: &'a str) -> List<'a> {
    let items: Vec<ListItem> = labels
        .into_iter()
        .enumerate()
        .map(|(i, label)| {
            let marker = if Some(i) == chosen { "(*) " } else { "( ) " };
            let style = if Some(i) == chosen {
                Styles::success()
            } else {
                Styles::text()
            };
            ListItem::new(format!("{}{}", marker, label)).style(style)
        })
        .collect();

    List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_style(Style::default().fg(Colors::SECONDARY)),
        )
        .highlight_style(Styles::selected())
}

fn field_line(label: String, value: &str, focused: bool) -> Line<'static> {
    let marker = if focused { "> " } else { "  " };
    let label_style = if focused {
        Styles::focused()
    } else {
        Styles::text_secondary()
    };
    let cursor = if focused { "_" } else { "" };
    Line::from(vec![
        Span::styled(format!("{}{:<14}", marker, label), label_style),
        Span::styled(format!("{}{}", value, cursor), Styles::text()),
    ])
}

fn summary_paragraph(view: &StepView<'_>) -> Paragraph<'static> {
    let mut lines: Vec<Line> = summary_lines(&view.order_summary)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Styles::text())))
        .collect();
    if let Some(total) = lines.pop() {
        lines.push(total.style(Styles::title()));
    }
    Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Order Summary ")
            .title_style(Style::default().fg(Colors::SECONDARY)),
    )
}

// ============================================================================
// Welcome
// ============================================================================

pub fn render_welcome(f: &mut Frame, area: Rect, view: &StepView<'_>, input: &InputState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Intro
            Constraint::Min(5),    // State list
            Constraint::Length(2), // Usage line
        ])
        .split(area);

    let intro = Paragraph::new(vec![
        Line::from(Span::styled(
            "Stay compliant with a registered agent in your state.",
            Styles::text(),
        )),
        Line::from(Span::styled(
            "Pick your state (type a letter to jump), then press Enter.",
            Styles::text_muted(),
        )),
    ])
    .wrap(Wrap { trim: true });
    f.render_widget(intro, chunks[0]);

    let chosen = US_STATES.iter().position(|s| *s == view.form.state);
    let labels = US_STATES.iter().map(|s| s.to_string()).collect();
    let list = choice_list(labels, chosen, " State ");
    let mut list_state = ListState::default();
    list_state.select(Some(input.cursor()));
    f.render_stateful_widget(list, chunks[1], &mut list_state);

    let usage = Paragraph::new(view.content.usage_line())
        .style(Styles::text_secondary())
        .alignment(Alignment::Center);
    f.render_widget(usage, chunks[2]);
}

// ============================================================================
// Employees
// ============================================================================

pub fn render_employees(f: &mut Frame, area: Rect, view: &StepView<'_>, input: &InputState) {
    let options = EmployeeCount::options();
    let chosen = view
        .form
        .employees
        .and_then(|e| options.iter().position(|o| *o == e));
    let labels = options.iter().map(|o| o.to_string()).collect();

    let list = choice_list(labels, chosen, " Employees ");
    let mut list_state = ListState::default();
    list_state.select(Some(input.cursor()));
    f.render_stateful_widget(list, area, &mut list_state);
}

// ============================================================================
// Business Age
// ============================================================================

pub fn render_business_age(f: &mut Frame, area: Rect, view: &StepView<'_>, input: &InputState) {
    match view.variant {
        FlowVariant::DateDriven => render_date_picker(f, area, view, input),
        FlowVariant::DirectChoice => {
            let options = [BusinessStatus::New, BusinessStatus::Existing];
            let chosen = view
                .form
                .business_status
                .and_then(|s| options.iter().position(|o| *o == s));
            let labels = options.iter().map(|o| o.choice_label().to_string()).collect();

            let list = choice_list(labels, chosen, " Your business ");
            let mut list_state = ListState::default();
            list_state.select(Some(input.cursor()));
            f.render_stateful_widget(list, area, &mut list_state);
        }
    }
}

fn render_date_picker(f: &mut Frame, area: Rect, view: &StepView<'_>, input: &InputState) {
    let date = view.form.start_date;
    let parts = [
        ("Year", date.year.map(|y| y.to_string())),
        (
            "Month",
            date.month
                .and_then(|m| (m as usize).checked_sub(1))
                .and_then(|i| MONTH_NAMES.get(i))
                .map(|m| m.to_string()),
        ),
        ("Day", date.day.map(|d| d.to_string())),
    ];

    let mut spans = vec![Span::raw("  ")];
    for (i, (label, value)) in parts.iter().enumerate() {
        let style = if i == input.focus() {
            Styles::selected()
        } else {
            Styles::text()
        };
        let shown = value.clone().unwrap_or_else(|| label.to_string());
        spans.push(Span::styled(format!(" {} ", shown), style));
        spans.push(Span::raw("  "));
    }

    let mut lines = vec![
        Line::from(spans),
        Line::from(""),
        Line::from(Span::styled(
            "  Up/Down changes the highlighted part, Left/Right moves between parts.",
            Styles::text_muted(),
        )),
    ];
    if let Some(status) = view.form.business_status {
        let text = match status {
            BusinessStatus::New => "  Looks like a new business.",
            BusinessStatus::Existing => "  Looks like an established business.",
        };
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(text, Styles::success())));
    }

    let picker = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Start date ")
            .title_style(Style::default().fg(Colors::SECONDARY)),
    );
    f.render_widget(picker, area);
}

// ============================================================================
// Analysis
// ============================================================================

pub fn render_analysis(f: &mut Frame, area: Rect, view: &StepView<'_>) {
    let analysis = &view.analysis;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                                // Gauge
            Constraint::Length(analysis.total_items as u16 + 2), // Checklist
            Constraint::Min(0),                                   // Results
        ])
        .split(area);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Analyzing "))
        .gauge_style(Style::default().fg(Colors::PROGRESS).bg(Colors::BG_GAUGE))
        .percent(u16::from(analysis.progress.min(100)));
    f.render_widget(gauge, chunks[0]);

    let checklist: Vec<Line> = analysis
        .checklist
        .iter()
        .map(|item| {
            Line::from(vec![
                Span::styled("  [x] ", Styles::success()),
                Span::styled(*item, Styles::text()),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(checklist), chunks[1]);

    if analysis.phase != AnalysisPhase::Complete {
        return;
    }

    let content = &view.content;
    let quote = content.testimonial();
    let mut lines = vec![
        Line::from(Span::styled(content.headline(), Styles::title())),
        Line::from(Span::styled(content.intro(), Styles::text())),
        Line::from(""),
        Line::from(Span::styled(content.warning_title(), Styles::warning())),
        Line::from(Span::styled(content.warning_text(), Styles::text())),
    ];
    for risk in content.risks() {
        lines.push(Line::from(vec![
            Span::styled("  - ", Styles::error()),
            Span::styled(*risk, Styles::text()),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("\"{}\"", quote.quote),
        Style::default()
            .fg(Colors::FG_SECONDARY)
            .add_modifier(Modifier::ITALIC),
    )));
    lines.push(Line::from(Span::styled(
        format!("  {}, {}", quote.name, quote.company),
        Styles::text_muted(),
    )));

    let results = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(results, chunks[2]);
}

// ============================================================================
// Pricing
// ============================================================================

pub fn render_pricing(f: &mut Frame, area: Rect, view: &StepView<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(2)])
        .split(area);

    let items: Vec<ListItem> = view
        .plans
        .iter()
        .enumerate()
        .map(|(i, plan)| {
            let selected = view.form.plan_index == i;
            let mut spans = vec![
                Span::styled(
                    if selected { "(*) " } else { "( ) " },
                    if selected { Styles::success() } else { Styles::text() },
                ),
                Span::styled(format!("{:<9}", plan.duration_label()), Styles::text()),
                Span::styled(format!("{:>6}", format_money(plan.total_price)), Styles::title()),
                Span::styled(
                    format!("  {}/yr", format_money(plan.per_year_price)),
                    Styles::text_secondary(),
                ),
            ];
            if let (Some(original), Some(savings)) = (plan.original_price, plan.savings_percent()) {
                spans.push(Span::styled(
                    format!("  was {}", format_money(original)),
                    Style::default()
                        .fg(Colors::FG_MUTED)
                        .add_modifier(Modifier::CROSSED_OUT),
                ));
                spans.push(Span::styled(format!("  save {}%", savings), Styles::badge()));
            }
            if plan.best_value {
                spans.push(Span::styled("  BEST VALUE", Styles::badge()));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Plans ")
            .title_style(Style::default().fg(Colors::SECONDARY)),
    );
    f.render_widget(list, chunks[0]);

    let usage = Paragraph::new(view.content.usage_line())
        .style(Styles::text_secondary())
        .alignment(Alignment::Center);
    f.render_widget(usage, chunks[1]);
}

// ============================================================================
// Form steps
// ============================================================================

pub fn render_personal_info(f: &mut Frame, area: Rect, view: &StepView<'_>, input: &InputState) {
    let lines: Vec<Line> = text_fields(view.step)
        .iter()
        .enumerate()
        .map(|(i, field)| field_line(field.to_string(), view.form.text(*field), i == input.focus()))
        .collect();

    let form = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Contact "));
    f.render_widget(form, area);
}

pub fn render_entity_info(f: &mut Frame, area: Rect, view: &StepView<'_>, input: &InputState) {
    let type_focused = input.focus() == 1;
    let type_style = if type_focused {
        Styles::selected()
    } else {
        Styles::text()
    };
    let lines = vec![
        field_line(
            Field::EntityName.to_string(),
            &view.form.entity_name,
            input.focus() == 0,
        ),
        Line::from(vec![
            Span::styled(
                format!("{}{:<14}", if type_focused { "> " } else { "  " }, "entity type"),
                if type_focused {
                    Styles::focused()
                } else {
                    Styles::text_secondary()
                },
            ),
            Span::styled(format!("< {} >", view.form.entity_type), type_style),
        ]),
    ];

    let form = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Entity "));
    f.render_widget(form, area);
}

pub fn render_checkout(f: &mut Frame, area: Rect, view: &StepView<'_>, input: &InputState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    let form = view.form;
    let lines: Vec<Line> = text_fields(view.step)
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let focused = i == input.focus();
            let shown = match field {
                // Show what is being typed, mask it once the user moves on
                Field::CardNumber if !focused && !form.card_number.is_empty() => {
                    mask_card(&form.card_number)
                }
                Field::CardCvc => "*".repeat(form.card_cvc.chars().count()),
                _ => form.text(*field).to_string(),
            };
            field_line(field.to_string(), &shown, focused)
        })
        .collect();

    let card = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Payment "));
    f.render_widget(card, chunks[0]);
    f.render_widget(summary_paragraph(view), chunks[1]);
}

// ============================================================================
// Confirmation
// ============================================================================

pub fn render_confirmation(f: &mut Frame, area: Rect, view: &StepView<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    let form = view.form;
    let entity = if form.entity_name.trim().is_empty() {
        "your business".to_string()
    } else {
        format!("{} ({})", form.entity_name, form.entity_type)
    };
    let lines = vec![
        Line::from(Span::styled(
            format!("  Your registered agent order for {} is in.", entity),
            Styles::success(),
        )),
        Line::from(Span::styled(
            format!("  We'll serve as your agent in {}.", view.state_data.name),
            Styles::text(),
        )),
        Line::from(Span::styled(
            format!("  A receipt is on its way to {}.", form.email),
            Styles::text_secondary(),
        )),
    ];
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[0]);
    f.render_widget(summary_paragraph(view), chunks[1]);
}
