use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{info, warn};

use projman::app::App;
use projman::config::Config;
use projman::engine::orchestrator::CloneOrchestrator;
use projman::engine::scheduler::RenderScheduler;
use projman::event::{AppEvent, EventHandler};
use projman::input;
use projman::provider::{GhCloneExecutor, GhRepoDirectory, RepoDirectory};
use projman::ui::surface::TerminalSurface;
use projman::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "projman", version, about = "Pick GitHub repositories and clone them concurrently")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, global = true, help = "Config file (default: <config dir>/projman/config.toml)")]
    config: Option<PathBuf>,

    #[arg(long, global = true, help = "Directory repositories are cloned into")]
    projects_root: Option<String>,

    #[arg(long, global = true, help = "GitHub user or organization to list")]
    owner: Option<String>,

    #[arg(long, global = true, env = "PROJMAN_LOG", help = "Write logs to this file")]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Select repositories that are not checked out yet and clone them
    Clone {
        #[arg(short, long, help = "Theme name")]
        theme: Option<String>,

        #[arg(short = 'j', long, help = "Maximum clones running at once (default: unlimited)")]
        max_concurrent: Option<usize>,

        #[arg(long, help = "Use ASCII glyphs instead of Nerd Font icons")]
        ascii: bool,
    },
    /// Report sync state of checked-out repositories
    Status {
        #[arg(long, help = "Run `git fetch` in each repository first")]
        fetch: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(root) = cli.projects_root {
        config.projects_root = root;
    }
    if cli.owner.is_some() {
        config.github_owner = cli.owner;
    }

    projman::logging::init(cli.log_file.as_deref())?;

    match cli.command {
        Command::Clone {
            theme,
            max_concurrent,
            ascii,
        } => {
            if let Some(theme) = theme {
                config.theme = theme;
            }
            if max_concurrent.is_some() {
                config.max_concurrent_clones = max_concurrent;
            }
            if ascii {
                config.icons = "ascii".to_string();
            }
            config.validate();
            run_clone(&config)
        }
        Command::Status { fetch } => {
            config.validate();
            projman::status::run(&config.git_program, &config.projects_root_path(), fetch)
        }
    }
}

fn run_clone(config: &Config) -> Result<()> {
    let candidates = GhRepoDirectory::new(config)
        .list_candidates()
        .context("failed to list candidate repositories")?;

    let orchestrator = CloneOrchestrator::new(
        Arc::new(GhCloneExecutor::new(config)),
        config.projects_root_path(),
    )
    .with_max_concurrent(config.max_concurrent_clones);
    let mut app = App::new(candidates, orchestrator);

    let theme: &'static Theme = Box::leak(Box::new(
        Theme::load(&config.theme).unwrap_or_default(),
    ));
    let mut scheduler = RenderScheduler::new(config.spinner_interval(), config.icon_set());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    let mut surface = TerminalSurface::new(terminal, theme);

    let events = EventHandler::new(config.tick_rate());
    let result = run_app(&mut surface, &mut app, &events, &mut scheduler);

    disable_raw_mode()?;
    execute!(surface.terminal_mut().backend_mut(), LeaveAlternateScreen)?;
    surface.terminal_mut().show_cursor()?;

    let in_flight = app.orchestrator.in_flight();
    if in_flight > 0 {
        if config.wait_on_quit {
            eprintln!("Waiting for {in_flight} clone(s) to finish...");
            app.orchestrator.join_all();
        } else {
            warn!(in_flight, "quitting with clones still running");
        }
    }
    let summary = app.list.summary();
    info!(
        cloned = summary.cloned,
        errored = summary.errored,
        "clone session finished"
    );

    result
}

fn run_app(
    surface: &mut TerminalSurface<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    scheduler: &mut RenderScheduler,
) -> Result<()> {
    scheduler.tick(&app.list, surface, Instant::now())?;
    loop {
        match events.next()? {
            AppEvent::Tick => scheduler.tick(&app.list, surface, Instant::now())?,
            AppEvent::Key(key) => {
                if let Some(action) = input::dispatch_key(key) {
                    app.apply(action);
                }
                if app.should_quit {
                    return Ok(());
                }
                scheduler.redraw(&app.list, surface)?;
            }
            AppEvent::Resize => scheduler.redraw(&app.list, surface)?,
        }
    }
}
