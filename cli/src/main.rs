//! CLI entrypoint for agora
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use agora_application::{ConversationLogger, RunDebateInput, RunDebateUseCase};
use agora_domain::{ContextVisibility, Question, SpeakingOrder};
use agora_infrastructure::{
    ConfigLoader, DebateArchive, FileConfig, JsonlConversationLogger, ParticipantFactory,
};
use agora_presentation::{Cli, ConsoleFormatter, OutputFormat, ProgressReporter, SimpleProgress};
use anyhow::{Context, Result, bail};
use clap::Parser;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize logging based on verbosity level.
///
/// `RUST_LOG` wins when no `-v` flag is given. With a log directory the
/// same events also go to a daily-rolling file; the returned guard must
/// live until exit so buffered lines are flushed.
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = || match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    match log_dir.filter(|dir| std::fs::create_dir_all(dir).is_ok()) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "agora.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter())
                .with(stderr_layer)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter())
                .with(stderr_layer)
                .init();
            None
        }
    }
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    if cli.no_config {
        return Ok(ConfigLoader::load_defaults());
    }
    ConfigLoader::load(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = load_config(&cli)?;
    let _log_guard = init_tracing(cli.verbose, config.logging.dir.as_deref());

    info!("Starting agora");

    if !config.output.color {
        colored::control::set_override(false);
    }

    // Configuration issues: warnings are reported, errors stop the run
    let issues = config.validate();
    for issue in &issues {
        if issue.is_error() {
            error!("{}", issue);
        } else {
            warn!("{}", issue);
        }
    }
    if issues.iter().any(|i| i.is_error()) {
        bail!("Configuration has errors; fix them or run with --no-config");
    }

    let question = match &cli.question {
        Some(q) => Question::try_new(q.as_str())?,
        None => bail!("Question is required. Try: agora --offline \"Should we adopt Rust?\""),
    };

    // === Debate rules ===
    let may_override = config.judge.may_override && !cli.no_override;
    let mut debate = config.debate.to_debate_config(may_override)?;
    if let Some(threshold) = cli.threshold {
        debate = debate.with_threshold(threshold);
    }
    if cli.min_iterations.is_some() || cli.max_iterations.is_some() {
        let min = cli.min_iterations.unwrap_or(debate.min_iterations);
        let max = cli.max_iterations.unwrap_or(debate.max_iterations);
        debate = debate.with_iterations(min, max);
    }

    let (mut execution, _) = config.execution.to_execution_params();
    if cli.concurrent {
        execution = execution.with_visibility(ContextVisibility::Concurrent);
    }
    if cli.rotate {
        execution = execution.with_speaking_order(SpeakingOrder::Rotating);
    }

    // === Dependency Injection ===
    let factory = ParticipantFactory::new(&config.providers).offline(cli.offline);
    let participants = factory.build_all(&config.participants)?;
    let judge = factory.build_judge(&config.judge)?;

    let cancellation = CancellationToken::new();
    let on_interrupt = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping after the current call");
            on_interrupt.cancel();
        }
    });

    let mut use_case =
        RunDebateUseCase::new(participants.clone(), judge).with_cancellation(cancellation);

    if let Some(path) = cli
        .transcript
        .as_ref()
        .or(config.logging.conversation_log.as_ref())
    {
        match JsonlConversationLogger::new(path) {
            Some(logger) => {
                info!("Writing transcript to {}", logger.path().display());
                use_case = use_case.with_logger(Arc::new(logger) as Arc<dyn ConversationLogger>);
            }
            None => warn!("Transcript disabled: could not open {}", path.display()),
        }
    }

    let format = cli
        .output
        .or(config.output.format.map(OutputFormat::from))
        .unwrap_or(OutputFormat::Full);

    // Print header
    let chatty = !cli.quiet && format != OutputFormat::Json;
    if chatty {
        println!();
        println!("+============================================================+");
        println!("|                 Agora - Structured Debate                  |");
        println!("+============================================================+");
        println!();
        println!("Question: {}", question);
        println!(
            "Participants: {}",
            participants
                .iter()
                .map(|p| p.id().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!();
    }

    let input = RunDebateInput::new(question, debate).with_execution(execution);

    // Execute with or without progress reporting
    let outcome = if !chatty {
        use_case.execute(input).await?
    } else if std::io::stderr().is_terminal() {
        let progress = ProgressReporter::new();
        use_case.execute_with_progress(input, &progress).await?
    } else {
        use_case.execute_with_progress(input, &SimpleProgress).await?
    };

    // Output results
    let output = match format {
        OutputFormat::Full => ConsoleFormatter::format(&outcome),
        OutputFormat::Summary => ConsoleFormatter::format_summary(&outcome),
        OutputFormat::Json => ConsoleFormatter::format_json(&outcome),
    };
    println!("{}", output);

    if cli.save || config.output.save {
        let dir = config
            .output
            .save_dir
            .clone()
            .unwrap_or_else(DebateArchive::default_dir);
        let path = DebateArchive::new(dir)
            .save(&outcome)
            .context("Failed to save debate")?;
        eprintln!("Saved debate to {}", path.display());
    }

    Ok(())
}
