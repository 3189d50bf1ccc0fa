//! raflow - Main entry point
//!
//! Runs the signup wizard in the terminal, or one of the headless commands.

use anyhow::{Context, Result};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::stdout;
use std::path::Path;
use tracing::{debug, error, info};

use raflow::app::App;
use raflow::business_status::{classify, new_business_threshold};
use raflow::catalog::{format_money, PLANS};
use raflow::cli::{Cli, Commands};
use raflow::config_file::{FlowSettings, ReplayScript};
use raflow::logging::{init_logging, LogTarget};
use raflow::replay::replay;
use raflow::state_data::{is_known_state, state_data};
use raflow::timer::{Clock, SystemClock};
use raflow::types::FlowVariant;

/// Main application entry point
fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Initialize logging first
    init_logging(&LogTarget::for_command(cli.log_file.as_deref(), cli.is_interactive()))?;
    info!("raflow starting up");

    let settings = load_settings(cli.settings.as_deref())?;
    debug!(?settings, "settings loaded");

    match cli.command {
        None => run_tui(settings, None),
        Some(Commands::Run { variant }) => run_tui(settings, variant),
        Some(Commands::Replay { answers }) => run_replay(&answers, &settings),
        Some(Commands::Plans) => {
            print_plans();
            Ok(())
        }
        Some(Commands::StateInfo { name }) => {
            print_state_info(&name);
            Ok(())
        }
        Some(Commands::Classify { date, today }) => {
            let today = today.unwrap_or_else(|| SystemClock::new().today());
            let status = classify(date, today);
            println!(
                "{} ({} vs. cutoff {})",
                status,
                date,
                new_business_threshold(today)
            );
            Ok(())
        }
    }
}

/// Settings from `--settings`, or the defaults.
fn load_settings(path: Option<&Path>) -> Result<FlowSettings> {
    let settings = match path {
        Some(path) => {
            info!("Loading settings from: {:?}", path);
            FlowSettings::load_from_file(path)?
        }
        None => FlowSettings::default(),
    };
    settings.validate().context("Invalid settings")?;
    Ok(settings)
}

/// Run the interactive wizard
fn run_tui(settings: FlowSettings, variant: Option<FlowVariant>) -> Result<()> {
    let mut wizard_settings = settings.wizard_settings();
    if let Some(variant) = variant {
        wizard_settings.variant = variant;
    }
    info!(variant = %wizard_settings.variant, "starting terminal wizard");

    // Initialize terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    if let Err(e) = crossterm::execute!(stdout(), crossterm::terminal::EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e).context("Failed to enter alternate screen");
    }

    let result = Terminal::new(CrosstermBackend::new(stdout()))
        .context("Failed to create terminal")
        .and_then(|mut terminal| {
            let mut app = App::new(wizard_settings);
            app.run(&mut terminal)?;
            terminal.show_cursor()?;
            Ok(())
        });

    // Cleanup terminal (always attempt cleanup, even if app failed)
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(stdout(), crossterm::terminal::LeaveAlternateScreen);

    if let Err(e) = &result {
        error!("terminal wizard failed: {:#}", e);
    }
    result
}

/// Replay an answers file and print the transcript
fn run_replay(answers: &Path, settings: &FlowSettings) -> Result<()> {
    let script = ReplayScript::load_from_file(answers)?;
    let outcome = replay(&script, settings)?;
    print!("{}", outcome.transcript);

    if !outcome.completed {
        error!(step = %outcome.final_step, "replay stopped before confirmation");
        eprintln!("Replay stopped at step '{}'", outcome.final_step);
        std::process::exit(1);
    }
    Ok(())
}

fn print_plans() {
    for (i, plan) in PLANS.iter().enumerate() {
        let mut line = format!(
            "{}. {:<8} {:>5}  ({}/yr)",
            i + 1,
            plan.duration_label(),
            format_money(plan.total_price),
            format_money(plan.per_year_price)
        );
        if let (Some(original), Some(savings)) = (plan.original_price, plan.savings_percent()) {
            line.push_str(&format!("  was {}, save {}%", format_money(original), savings));
        }
        if plan.best_value {
            line.push_str("  BEST VALUE");
        }
        println!("{}", line);
    }
}

fn print_state_info(name: &str) {
    let data = state_data(name);
    println!("State:             {}", data.name);
    println!("Penalty:           {}", format_money(data.penalty));
    println!("Agent usage:       {}%", data.agent_usage_percent);
    if !is_known_state(name.trim()) {
        println!("(not an offered state, showing fallback values)");
    }
}
