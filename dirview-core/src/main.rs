//! src/main.rs
//! Terminal directory browser: categories, paged username lists and search

use std::{
    io::{self, Stdout},
    panic::PanicHookInfo,
    path::PathBuf,
    process::Stdio,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::EventStream,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};
use tokio::{
    process::Command,
    signal,
    sync::{Notify, mpsc},
};
use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use dirview_core::{
    Logger,
    api::HttpDirectoryApi,
    config::Config,
    controller::{
        Collaborators, ControllerSettings, Effect, EventLoop, TaskResult, ViewStateController,
    },
    model::Location,
    prefs::{FilePreferenceStore, detect_system_theme},
    view::ui::UIRenderer,
};

type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

#[derive(Debug, Parser)]
#[command(name = "dirview", version, about = "Browse and search a remote username directory")]
struct Cli {
    /// Initial location, e.g. "?category=Artists" or "?search=bob"
    #[arg(short, long, default_value = "")]
    location: String,

    /// Override the API base URL from the config file
    #[arg(long)]
    api_base: Option<String>,

    /// Override the log level (e.g. "debug", "dirview_core=trace")
    #[arg(long)]
    log_level: Option<String>,

    /// Use this config file instead of the platform default
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_panic_handler();

    let app = App::new(cli)
        .await
        .context("Failed to initialize application")?;
    app.run().await.context("Application runtime error")?;

    info!("Application exited cleanly");
    Ok(())
}

struct App {
    terminal: AppTerminal,
    event_loop: EventLoop<EventStream>,
    controller: ViewStateController,
    ui_renderer: UIRenderer,
    shutdown: Arc<Notify>,
    opener_cmd: String,
    _log_guard: WorkerGuard,
}

impl App {
    async fn new(cli: Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Config::load_from(path).await,
            None => Config::load().await,
        }
        .unwrap_or_else(|e| {
            eprintln!("Failed to load config, using defaults: {e}");
            Config::default()
        });

        if let Some(base) = cli.api_base {
            config.api.base_url = base;
        }
        if let Some(level) = cli.log_level {
            config.logging.level = level;
        }

        let log_dir = config.resolved_log_dir()?;
        let log_guard = Logger::init(&config.logging, &log_dir)?;
        info!(
            api = %config.api.base_url,
            log_dir = %log_dir.display(),
            "Starting directory browser"
        );

        let api = HttpDirectoryApi::new(&config.api.base_url, config.api.timeout)?;
        let prefs = FilePreferenceStore::open(Config::data_dir()?.join("preferences.toml"));
        debug!(path = %prefs.path().display(), "Preferences loaded");
        let clipboard = clipr::sink_from_config(&config.clipboard);
        debug!(backend = clipboard.backend_name(), "Clipboard ready");

        let (task_tx, task_rx) = mpsc::unbounded_channel::<TaskResult>();

        let mut controller = ViewStateController::new(
            Collaborators {
                api: Arc::new(api),
                clipboard,
                prefs: Box::new(prefs),
            },
            ControllerSettings::from(&config.ui),
            task_tx,
        );

        let terminal = setup_terminal().context("Failed to initialize terminal")?;
        let event_loop = EventLoop::new(EventStream::new(), task_rx, config.ui.tick_rate);

        controller.initialize(Location::parse(&cli.location), detect_system_theme());

        info!("Application initialized successfully");
        Ok(Self {
            terminal,
            event_loop,
            controller,
            ui_renderer: UIRenderer::new(),
            shutdown: Arc::new(Notify::new()),
            opener_cmd: config.ui.opener_cmd,
            _log_guard: log_guard,
        })
    }

    async fn run(mut self) -> Result<()> {
        self.setup_shutdown_handler();
        info!("Starting event loop");

        self.render()?;

        loop {
            let event = tokio::select! {
                _ = self.shutdown.notified() => {
                    info!("Shutdown signal received");
                    break;
                }
                event = self.event_loop.next_event() => event,
            };

            let Some(event) = event else {
                info!("Terminal event stream closed");
                break;
            };

            let step = self.event_loop.dispatch(&mut self.controller, event);
            match step.effect {
                Effect::Quit => {
                    info!("Quit requested");
                    break;
                }
                Effect::OpenUrl(url) => self.open_url(url),
                Effect::None => {}
            }

            if self.controller.take_scroll_request() {
                self.ui_renderer.reset_scroll();
            }
            if step.redraw {
                self.render()?;
            }
        }

        self.log_final_metrics();
        info!("Event loop terminated cleanly");
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let start = Instant::now();
        let vm = self.controller.view_model();

        self.terminal
            .draw(|frame: &mut Frame<'_>| self.ui_renderer.render(frame, &vm))
            .context("Failed to draw terminal")?;

        let duration = start.elapsed();
        if duration > Duration::from_millis(16) {
            warn!("Slow render: {}ms (target: <16ms)", duration.as_millis());
        }
        Ok(())
    }

    fn open_url(&mut self, url: String) {
        info!(%url, opener = %self.opener_cmd, "Opening profile link");

        let spawned = Command::new(&self.opener_cmd)
            .arg(&url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(mut child) => {
                tokio::spawn(async move {
                    if let Err(e) = child.wait().await {
                        warn!("Opener process failed: {e}");
                    }
                });
            }
            Err(e) => {
                error!("Failed to launch {}: {e}", self.opener_cmd);
                self.controller.notify_error("Failed to open link");
            }
        }
    }

    fn log_final_metrics(&self) {
        let render = self.ui_renderer.stats();
        let lists = self.controller.lists().stats();

        info!("Final metrics:");
        info!("  Events processed: {}", self.event_loop.event_count());
        info!("  Frames rendered: {} ({} slow)", render.frames, render.slow);
        info!(
            "  List cache: {} hits, {} misses, hit rate {:.1}%, avg load {:?}",
            lists.hits(),
            lists.misses(),
            lists.hit_rate() * 100.0,
            lists.average_load_time()
        );
    }

    fn setup_shutdown_handler(&self) {
        let shutdown = Arc::clone(&self.shutdown);

        tokio::spawn(async move {
            #[cfg(unix)]
            {
                use tokio::signal::unix::{SignalKind, signal};

                let mut sigterm = match signal(SignalKind::terminate()) {
                    Ok(sigterm) => sigterm,
                    Err(e) => {
                        warn!("Failed to create SIGTERM handler: {e}");
                        return;
                    }
                };

                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                    _ = signal::ctrl_c() => info!("Received Ctrl+C"),
                }
            }

            #[cfg(not(unix))]
            {
                if let Err(e) = signal::ctrl_c().await {
                    warn!("Failed to listen for Ctrl+C: {}", e);
                    return;
                }
                info!("Received Ctrl+C");
            }

            shutdown.notify_one();
        });
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Err(e) = cleanup_terminal(&mut self.terminal) {
            warn!("Failed to cleanup terminal: {}", e);
        }
    }
}

fn setup_terminal() -> Result<AppTerminal> {
    enable_raw_mode().context("Failed to enable raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    info!("Terminal setup complete");
    Ok(terminal)
}

fn cleanup_terminal(terminal: &mut AppTerminal) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    info!("Terminal cleanup complete");
    Ok(())
}

fn setup_panic_handler() {
    let original_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info: &PanicHookInfo<'_>| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);

        error!("Application panicked: {}", panic_info);
        original_hook(panic_info);
    }));
}
