//! Finboard TUI — tabbed terminal viewer for dashboard tables.
//!
//! Keys:
//! - `Tab` / `Shift-Tab`: switch tables
//! - `j` / `k` or arrows: move the row cursor
//! - `Enter`: activate the row under the cursor
//! - `q`: quit

use std::fs::File;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use finboard_core::config::{load_config, load_policy};
use finboard_tui::{handle_key, ui, App, Theme};

#[derive(Parser)]
#[command(name = "finboard-tui", about = "Finboard TUI — browse dashboard tables")]
struct Args {
    /// Dashboard config file (TOML).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Render policy file (TOML) applied to every table.
    #[arg(long)]
    policy: Option<PathBuf>,

    /// Write logs to this file (the terminal is taken by the UI).
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// CSV or JSON grid files, one tab each.
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let config = load_config(args.config.as_deref())?;
    let policy = args.policy.as_deref().map(load_policy).transpose()?;
    let mut app = App::from_paths(&args.files, policy.as_ref(), &config)?;
    let theme = Theme::default();

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app, &theme);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    theme: &Theme,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app, theme))?;

        // 50ms poll keeps the loop responsive without spinning
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                handle_key(app, key);
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
