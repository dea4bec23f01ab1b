//! CAPM Lab TUI — four-panel terminal calculator.
//!
//! Panels:
//! 1. Calculator — inputs, calculate trigger, expected return
//! 2. Chart — Security Market Line with the asset highlighted
//! 3. Compare — input comparison bar chart
//! 4. Help — keyboard shortcuts and glossary

use std::fs::File;
use std::io::{self, stdout};
use std::sync::atomic::AtomicBool;
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use capmlab_core::{BetaDomain, FormatPolicy, Settings};
use capmlab_tui::app::AppState;
use capmlab_tui::worker::{self, WorkerCommand};
use capmlab_tui::{input, ui};

#[derive(Parser)]
#[command(name = "capmlab-tui", version, about = "CAPM Lab — terminal CAPM calculator")]
struct Cli {
    /// Display precision: fixed2, rounded9, trimmed9.
    #[arg(long, default_value = "fixed2")]
    format: String,

    /// Simulated "calculating" delay in milliseconds.
    #[arg(long, default_value_t = 2_000)]
    latency_ms: u64,

    /// Number of SML samples.
    #[arg(long, default_value_t = capmlab_core::DEFAULT_SAMPLE_COUNT)]
    samples: usize,

    /// Lower end of the plotted beta domain.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    beta_from: f64,

    /// Upper end of the plotted beta domain.
    #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
    beta_to: f64,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let settings = Settings::default()
            .with_format(self.format.parse::<FormatPolicy>()?)
            .with_latency_ms(self.latency_ms)
            .with_sample_count(self.samples)
            .with_domain(BetaDomain::new(self.beta_from, self.beta_to)?);
        settings.validate()?;
        Ok(settings)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = cli.settings()?;
    init_logging();
    tracing::info!(
        format = %settings.format,
        latency_ms = settings.simulated_latency_ms,
        "starting tui"
    );

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let cancel = Arc::new(AtomicBool::new(false));

    let worker_handle = worker::spawn_worker(cmd_rx, resp_tx, cancel.clone())?;

    let mut app = AppState::new(settings, cmd_tx.clone(), resp_rx, cancel);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Shutdown worker
    app.cancel_calculation();
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("tui exited");
    result
}

/// Log to a file in the temp dir; the terminal belongs to the UI.
fn init_logging() {
    let path = std::env::temp_dir().join("capmlab-tui.log");
    let Ok(file) = File::create(&path) else {
        return;
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("capmlab_tui=info,capmlab_core=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            app.apply_response(resp);
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick; keeps the spinner moving)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}
