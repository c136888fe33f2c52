use std::io::{Read, Write};
use std::path::PathBuf;

use clap::Parser;
use navbadge_runtime::{BadgeState, BadgeStore};
use navbadge_widgets::{DEFAULT_MAX_COUNT, TextRenderer};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use crate::error::{DemoError, Result};
use crate::screen::BadgesScreen;
use crate::script::{Step, parse_lines, parse_script};

#[derive(Debug, Parser)]
#[command(
    name = "navbadge",
    about = "Drive a bottom navigation bar with notification badges from a step script",
    version
)]
pub struct Cli {
    /// Steps to run in order, e.g. `increase increase goto:third`.
    pub steps: Vec<String>,

    /// Read steps from a file, one per line (`-` for stdin). Runs before
    /// positional steps.
    #[arg(long, value_name = "PATH")]
    pub script: Option<PathBuf>,

    /// Largest count shown verbatim; higher counts render as `N+`.
    #[arg(long, env = "NAVBADGE_MAX_COUNT", default_value_t = DEFAULT_MAX_COUNT)]
    pub max_count: u32,

    /// Maximum rendered line width in cells.
    #[arg(long, env = "NAVBADGE_WIDTH", default_value_t = 80)]
    pub width: u16,

    /// Emit one JSON object per step instead of the rendered bar.
    #[arg(long, env = "NAVBADGE_JSON")]
    pub json: bool,

    /// Start from a saved snapshot, e.g.
    /// `{"small_badge_visible":true,"large_badge_number":3}`.
    #[arg(long, value_name = "JSON")]
    pub initial_state: Option<String>,

    /// Log filter used when `NAVBADGE_LOG` is unset.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out)
}

pub fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    init_logging(&cli.log_level);
    if cli.width == 0 {
        return Err(DemoError::invalid("--width must be at least 1"));
    }

    let steps = collect_steps(&cli)?;
    let initial = match &cli.initial_state {
        Some(text) => serde_json::from_str::<BadgeState>(text)?,
        None => BadgeState::INITIAL,
    };
    tracing::info!(steps = steps.len(), ?initial, "navbadge demo starting");

    let renderer = TextRenderer::new()
        .with_max_count(cli.max_count)
        .with_max_width(cli.width);
    let mut screen = BadgesScreen::new(BadgeStore::with_state(initial), renderer);
    screen.attach();
    emit(out, "start", &screen, cli.json)?;

    for step in steps {
        apply(&mut screen, step);
        emit(out, &step.label(), &screen, cli.json)?;
    }

    screen.detach();
    out.flush()?;
    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_env("NAVBADGE_LOG").unwrap_or_else(|_| EnvFilter::new(level));
    // A subscriber may already be installed (tests, embedding).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn collect_steps(cli: &Cli) -> Result<Vec<Step>> {
    let mut steps = match &cli.script {
        Some(path) if path.as_os_str() == "-" => {
            let mut source = String::new();
            std::io::stdin().read_to_string(&mut source)?;
            parse_script(&source)?
        }
        Some(path) => parse_script(&std::fs::read_to_string(path)?)?,
        None => Vec::new(),
    };
    steps.extend(parse_lines(cli.steps.iter().map(String::as_str))?);
    Ok(steps)
}

fn apply(screen: &mut BadgesScreen<TextRenderer>, step: Step) {
    match step {
        Step::Menu(action) => screen.on_menu_action(action),
        Step::Goto(destination) => {
            screen.navigate(destination);
        }
        Step::Next => {
            screen.next();
        }
        Step::Previous => {
            screen.previous();
        }
        Step::State => {}
        Step::Detach => screen.detach(),
        Step::Attach => screen.attach(),
    }
}

fn emit(
    out: &mut dyn Write,
    label: &str,
    screen: &BadgesScreen<TextRenderer>,
    as_json: bool,
) -> Result<()> {
    let state = screen.store().state();
    if as_json {
        let record = json!({
            "step": label,
            "destination": screen.navigation().active().title(),
            "attached": screen.is_attached(),
            "version": screen.store().version(),
            "state": state,
        });
        writeln!(out, "{record}")?;
    } else {
        let line = screen.renderer().render_line(screen.navigation());
        writeln!(
            out,
            "{label:<16}{line}  (small={}, large={})",
            state.small_badge_visible(),
            state.large_badge_number()
        )?;
    }
    Ok(())
}
