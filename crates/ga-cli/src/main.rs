mod config;
mod logging;
mod reporter;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing::{debug, info, warn};

use ga_core::ContextError;
use ga_runner::agent::ollama::{Backend, OllamaAgentFactory, OllamaClient};
use ga_runner::executor::process::ProcessExecutor;
use ga_runner::fs::FsFileReader;
use ga_runner::git::{discover_root, GitDiffSource};
use ga_runner::linter::ProcessLinter;
use ga_runner::{aggregate, ContextGatherer, Coordinator, LogObserver};

use config::{Config, Overrides};

/// Exit status for anything that prevented a review from running.
const FATAL: u8 = 2;

#[derive(Parser)]
#[command(
    name = "git-agent",
    version,
    about = "Review staged git changes with one or more local LLMs"
)]
struct Cli {
    /// Free-text note passed to every reviewer
    #[arg(trailing_var_arg = true)]
    note: Vec<String>,

    /// Comma-separated list of models to compare
    #[arg(long, env = "GIT_AGENT_MODELS")]
    models: Option<String>,

    /// Debug logging with targets and line numbers
    #[arg(short, long)]
    verbose: bool,

    /// Also write debug logs to this file, rotated daily with 7 kept
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Ollama server URL
    #[arg(long, env = "OLLAMA_HOST")]
    host: Option<String>,

    /// Ollama endpoint to use (generate or chat)
    #[arg(long)]
    backend: Option<Backend>,

    /// Truncate each file sent to the reviewers after this many lines
    #[arg(long)]
    max_lines: Option<usize>,

    /// Review unstaged working-tree changes instead of the index
    #[arg(long)]
    unstaged: bool,

    /// Config file (default: <config dir>/git-agent/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// List the models available on the Ollama server and exit
    #[arg(long)]
    list_models: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    let _guard = match logging::init(cli.verbose, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            return ExitCode::from(FATAL);
        }
    };

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::from(FATAL)
        }
    }
}

async fn run(cli: Cli) -> Result<u8> {
    let settings = Config::load(cli.config.as_deref())?.resolve(Overrides {
        host: cli.host,
        backend: cli.backend,
        models: cli.models,
        max_lines: cli.max_lines,
        unstaged: cli.unstaged,
    });
    debug!(?settings, "resolved settings");

    let client = Arc::new(OllamaClient::new(settings.ollama.clone())?);

    if cli.list_models {
        let models = client
            .list_models()
            .await
            .with_context(|| format!("cannot list models on {}", settings.ollama.host))?;
        for model in models {
            println!("{model}");
        }
        return Ok(0);
    }

    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    let root = discover_root(&cwd)
        .map_err(ContextError::from)
        .context("Failed to gather review context")?;

    let executor = Arc::new(ProcessExecutor::new());
    let gatherer = ContextGatherer::new(
        Arc::new(GitDiffSource::new(executor.clone(), &root)),
        Arc::new(FsFileReader::new(&root)),
        Arc::new(ProcessLinter::new(executor, &root)),
    )
    .staged_only(settings.staged_only)
    .max_lines(settings.max_lines);

    let context = gatherer
        .gather()
        .await
        .context("Failed to gather review context")?;

    if !client.is_available().await {
        warn!("Ollama is not reachable at {}", settings.ollama.host);
    }

    let note = cli.note.join(" ");
    info!("Running review across models: {}", settings.models.join(", "));

    let coordinator = Coordinator::new(Arc::new(OllamaAgentFactory::new(client)))
        .with_observer(Arc::new(LogObserver))
        .with_max_workers(settings.max_workers);
    let outcomes = coordinator
        .run_all(&settings.models, Arc::new(context), &note)
        .await?;

    let agg = aggregate(&outcomes);
    print!("{}", reporter::render(&settings.models, &agg));

    if agg.exit_code > 0 {
        warn!("At least one model rejected the review");
    } else if agg.all_failed() {
        warn!("No model produced a review");
    } else {
        info!("All models approved or suggested minor adjustments");
    }

    Ok(u8::try_from(agg.exit_code).unwrap_or(FATAL))
}
