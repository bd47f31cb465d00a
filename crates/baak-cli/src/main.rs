use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use baak_core::logging::{new_run_id, ExchangeLog};
use baak_core::{
    ChatController, Composer, HealthOutcome, HttpBackend, SubmitOutcome, TimeFormat, WidgetConfig,
};
use clap::{Parser, Subcommand};

mod repl;
mod terminal;

use repl::HtmlExport;
use terminal::TerminalView;

#[derive(Parser)]
#[command(name = "baak")]
#[command(about = "Terminal client for the BAAK campus assistant", long_about = None)]
struct Cli {
    /// Backend origin, e.g. http://127.0.0.1:8000
    #[arg(long, env = "BAAK_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Clock style for bubble timestamps (24h or 12h)
    #[arg(long, global = true)]
    time_format: Option<TimeFormat>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Config file (default: ~/.config/baak/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for per-run exchange logs
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Write the transcript as HTML to this file after every change
    #[arg(long, global = true)]
    html_out: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat (default)
    Chat,
    /// Ask a single question and print the answer
    Ask {
        #[arg(required = true)]
        question: Vec<String>,
    },
    /// Check backend status
    Health,
}

impl Cli {
    /// Config file values with command-line overrides applied.
    fn load_config(&self) -> Result<WidgetConfig> {
        let mut config = match &self.config {
            Some(path) => WidgetConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => WidgetConfig::load_default().context("Failed to load config")?,
        };

        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(time_format) = self.time_format {
            config.time_format = time_format;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(log_dir) = &self.log_dir {
            config.log_dir = Some(log_dir.clone());
        }
        Ok(config)
    }
}

/// A failed one-shot question makes the process exit non-zero.
fn require_answer(outcome: SubmitOutcome, base_url: &str) -> Result<()> {
    if outcome == SubmitOutcome::Failed {
        bail!("Could not reach the backend at {}", base_url);
    }
    Ok(())
}

fn require_report(outcome: HealthOutcome, base_url: &str) -> Result<()> {
    if outcome == HealthOutcome::Failed {
        bail!("Health check against {} failed", base_url);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = cli.load_config()?;
    log::debug!("Using backend at {}", config.base_url);

    let exchange_log = ExchangeLog::open(config.log_dir.as_deref(), &new_run_id());
    let backend = HttpBackend::from_config(&config).with_exchange_log(exchange_log);
    let view = TerminalView::new(io::stdout(), config.time_format);
    let mut controller =
        ChatController::new(backend, view, Composer::new(config.max_input_rows));
    let export = HtmlExport::new(cli.html_out.as_deref(), config.time_format);

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let stdin = io::stdin();
            if !stdin.is_terminal() {
                log::debug!("Reading questions from non-interactive input");
            }
            repl::run(&mut controller, &config.suggestions, &export, stdin.lock())?;
        }
        Commands::Ask { question } => {
            let outcome = controller.submit(&question.join(" "));
            export.write(&controller)?;
            require_answer(outcome, &config.base_url)?;
        }
        Commands::Health => {
            let outcome = controller.health_check();
            export.write(&controller)?;
            require_report(outcome, &config.base_url)?;
        }
    }

    Ok(())
}
