#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use debtlog_core::ErrorCode;
use debtlog_core::config::{self, EffectiveConfig};
use output::{CliError, OutputMode};
use std::env;
use std::io::{self, IsTerminal};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "dl",
    author,
    version,
    about = "dl: technical debt logger with derived priority scoring",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output (alias for `--format json`).
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Suppress non-essential output such as the session banner and prompt.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Output mode used before config is available.
    fn fallback_output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, self.json, "text")
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Scoring",
        about = "Compute a priority score",
        long_about = "Compute the priority of an impact/effort/risk combination without recording it.",
        after_help = "EXAMPLES:\n    # High impact, months of effort, medium risk\n    dl score --impact high --effort months --risk medium\n\n    # Emit machine-readable output\n    dl score --impact critical --effort weeks --format json"
    )]
    Score(cmd::score::ScoreArgs),

    #[command(
        next_help_heading = "Reference",
        about = "Show the assessment guide",
        long_about = "Show category indicators and the scoring scales.",
        after_help = "EXAMPLES:\n    # Full guide\n    dl guide\n\n    # One category\n    dl guide security"
    )]
    Guide(cmd::guide::GuideArgs),

    #[command(
        next_help_heading = "Session",
        about = "Start an interactive entry session",
        long_about = "Read session commands from stdin, one per line. Entries live only as long as the session.",
        after_help = "EXAMPLES:\n    # Interactive\n    dl session\n\n    # Scripted\n    printf 'add --category testing --description flaky --impact high --effort months\\nreport\\n' | dl session"
    )]
    Session(cmd::session::SessionArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    dl completions bash > ~/.local/share/bash-completion/completions/dl"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

/// Filter used when `DEBTLOG_LOG` is unset. Covers the library and the `dl` binary targets.
const fn default_log_filter(debug: bool) -> &'static str {
    if debug {
        "debtlog=debug,dl=debug,info"
    } else {
        "debtlog=info,dl=info,warn"
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("DEBTLOG_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter(env::var("DEBUG").is_ok())));

    let format = env::var("DEBTLOG_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
    }
}

/// Map a config loading failure to a coded CLI error.
fn config_error(err: &anyhow::Error) -> CliError {
    let code = if err.downcast_ref::<toml::de::Error>().is_some()
        || err.downcast_ref::<io::Error>().is_some()
    {
        ErrorCode::ConfigParseError
    } else {
        ErrorCode::InvalidConfigValue
    };
    CliError::with_details(
        format!("{err:#}"),
        code.hint().unwrap_or_else(|| code.message()),
        code.code(),
    )
}

fn load_config(cli: &Cli) -> anyhow::Result<EffectiveConfig> {
    let project_root = env::current_dir()?;
    match config::resolve_config(&project_root, cli.json) {
        Ok(config) => Ok(config),
        Err(err) => {
            output::render_error(cli.fallback_output_mode(), &config_error(&err))?;
            Err(err)
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    if let Commands::Completions(ref args) = cli.command {
        let mut command = Cli::command();
        return cmd::completions::run_completions(args.shell, &mut command, &mut io::stdout());
    }

    let config = load_config(&cli)?;
    let output = output::resolve_output_mode(cli.format, cli.json, &config.resolved_output);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Score(ref args) => cmd::score::run_score(args, output, &mut out),
        Commands::Guide(ref args) => cmd::guide::run_guide(args, output, &mut out),
        Commands::Session(ref args) => {
            let stdin = io::stdin();
            let interactive = !cli.quiet && stdin.is_terminal();
            cmd::session::run_session(
                args,
                config.report,
                output,
                interactive,
                stdin.lock(),
                &mut out,
                &mut io::stderr(),
            )
        }
        Commands::Completions(_) => Ok(()),
    }
}
