//! CLI entrypoint for agora
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use agora_application::{
    AuditLogger, Clock, CloseDecisionUseCase, FinalDecisionUseCase, FixedClock, NoAuditLog,
    ReconcileStagesUseCase, StageAction, StageActionUseCase, StageNotifier, StageScheduler,
};
use agora_domain::{ConsentWindow, DecisionId, ParticipantId, resolve_named};
use agora_infrastructure::{
    ConfigLoader, FileConfig, InMemoryDecisionStore, JsonlAuditLogger, SystemClock,
    TracingNotifier,
};
use agora_presentation::{Cli, Command, OutputFormatter, VoteFile, formatter_for};
use anyhow::{Context, Result, anyhow, bail};
use clap::{CommandFactory, Parser};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging based on verbosity level, optionally mirrored to a
/// daily-rolling file. The returned guard must live until exit.
fn init_logging(verbose: u8, directory: Option<&Path>) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "agora.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}

/// Everything the store-backed commands need
struct Services {
    store: Arc<InMemoryDecisionStore>,
    audit: Arc<dyn AuditLogger>,
    notifier: Arc<dyn StageNotifier>,
    clock: Arc<dyn Clock>,
}

impl Services {
    async fn open(cli: &Cli, config: &FileConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let path: PathBuf = match (&cli.store, config.store.path()) {
            (Some(path), _) => path.clone(),
            (None, Some(path)) => path.to_path_buf(),
            (None, None) => bail!("No decision store configured. Use --store or [store] path."),
        };
        let store = InMemoryDecisionStore::open(&path)
            .await
            .with_context(|| format!("Failed to open decision store {}", path.display()))?;

        let audit: Arc<dyn AuditLogger> = match config
            .audit
            .path()
            .and_then(JsonlAuditLogger::new)
        {
            Some(logger) => {
                info!("Audit log: {}", logger.path().display());
                Arc::new(logger.with_clock(Arc::clone(&clock)))
            }
            None => Arc::new(NoAuditLog),
        };

        Ok(Self {
            store: Arc::new(store),
            audit,
            notifier: Arc::new(TracingNotifier::new()),
            clock,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let _log_guard = init_logging(cli.verbose, config.logging.directory());
    for issue in config.validate() {
        warn!("{}", issue.message);
    }

    let Some(command) = cli.command.clone() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let format = config.output.format_for(cli.format.map(Into::into));
    agora_presentation::output::console::set_color(config.output.color_enabled(cli.no_color));
    let formatter = formatter_for(format);

    // === Dependency Injection ===
    let clock: Arc<dyn Clock> = match cli.now {
        Some(now) => Arc::new(FixedClock(now)),
        None => Arc::new(SystemClock),
    };

    match command {
        Command::Resolve { method, votes } => {
            let json = std::fs::read_to_string(&votes)
                .with_context(|| format!("Failed to read {}", votes.display()))?;
            let votes = VoteFile::from_json(&json)
                .with_context(|| format!("Invalid vote file {}", votes.display()))?;
            let resolution = resolve_named(&method, &votes.ballots, &votes.context)?;
            print!("{}", formatter.resolution(&resolution));
        }
        Command::Stage { start, end, mode } => {
            let now = clock.now();
            let schedule = ConsentWindow::new(start, end)?.schedule(mode.into(), now)?;
            print!("{}", formatter.schedule(&schedule, now));
        }
        command => {
            let services = Services::open(&cli, &config, clock).await?;
            run_store_command(command, &services, &config, formatter.as_ref()).await?;
        }
    }

    Ok(())
}

async fn run_store_command(
    command: Command,
    services: &Services,
    config: &FileConfig,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let Services {
        store,
        audit,
        notifier,
        clock,
    } = services;

    match command {
        Command::List => {
            let decisions = store.list().await;
            print!("{}", formatter.decisions(&decisions, clock.now()));
        }
        Command::Close { id } => {
            let use_case = CloseDecisionUseCase::new(store.clone(), audit.clone(), clock.clone());
            let resolution = use_case.execute(&DecisionId::new(id)).await?;
            print!("{}", formatter.resolution(&resolution));
        }
        Command::Reconcile { watch } => {
            let reconcile = ReconcileStagesUseCase::new(
                store.clone(),
                notifier.clone(),
                audit.clone(),
                clock.clone(),
            )
            .with_config(config.scheduler.to_scheduler_config());

            if !watch {
                let report = reconcile.execute().await?;
                print!("{}", formatter.reconcile_report(&report));
                return Ok(());
            }

            let token = CancellationToken::new();
            let on_signal = token.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Interrupted, stopping scheduler");
                    on_signal.cancel();
                }
            });

            StageScheduler::new(reconcile, token)
                .run_with(|report| {
                    if !report.is_quiet() {
                        print!("{}", formatter.reconcile_report(report));
                    }
                })
                .await;
        }
        Command::Keep { id, actor } => {
            stage_action(services, formatter, StageAction::Keep, id, actor).await?;
        }
        Command::Withdraw { id, actor } => {
            stage_action(services, formatter, StageAction::Withdraw, id, actor).await?;
        }
        Command::Finalize { id, actor, result } => {
            let use_case = FinalDecisionUseCase::new(store.clone(), audit.clone(), clock.clone());
            let id = DecisionId::new(id);
            use_case
                .execute(&id, &ParticipantId::new(actor), result.into())
                .await?;
            print!("{}", formatter.final_decision(&id, result.into()));
        }
        Command::Resolve { .. } | Command::Stage { .. } => {
            bail!("This command does not use the decision store")
        }
    }

    Ok(())
}

async fn stage_action(
    services: &Services,
    formatter: &dyn OutputFormatter,
    action: StageAction,
    id: String,
    actor: String,
) -> Result<()> {
    let use_case = StageActionUseCase::new(
        services.store.clone(),
        services.notifier.clone(),
        services.audit.clone(),
        services.clock.clone(),
    );
    let id = DecisionId::new(id);
    let transition = use_case
        .execute(&id, &ParticipantId::new(actor), action)
        .await?;
    print!("{}", formatter.transition(&id, &transition));
    Ok(())
}
