use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::{ArgGroup, Args, Parser, Subcommand};
use signal_digest::analysis::analyze;
use signal_digest::config::{RewriterConfig, ScoringConfig};
use signal_digest::db::{self, PgStore};
use signal_digest::ingest::SignalInput;
use signal_digest::pipeline::{self, GenerateOptions};
use signal_digest::priority::score_signals;
use signal_digest::report;
use signal_digest::rewrite::{OpenAiRewriter, ToneRewriter};
use signal_digest::store::{AcknowledgementLog, MemoryStore, ReportStore};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "signal-digest")]
#[command(about = "Executive summaries from weekly team status signals", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
#[command(group(
    ArgGroup::new("input")
        .args(["csv", "text", "demo"])
        .multiple(false)
))]
struct InputArgs {
    /// CSV export with Section, Feedback, Changed_Since_Last_Week, Report_Date columns
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Free text, one update per line
    #[arg(long)]
    text: Option<String>,
    /// Use the built-in demo signals
    #[arg(long)]
    demo: bool,
}

impl InputArgs {
    fn load(&self) -> anyhow::Result<Option<SignalInput>> {
        if let Some(path) = &self.csv {
            let bytes = std::fs::read(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            return Ok(Some(SignalInput::Csv(bytes)));
        }
        if let Some(text) = &self.text {
            return Ok(Some(SignalInput::Text(text.clone())));
        }
        Ok(self.demo.then_some(SignalInput::Demo))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Build, save, and write an executive report
    Generate {
        #[command(flatten)]
        input: InputArgs,
        /// Rank signals by priority score instead of plain keyword buckets
        #[arg(long)]
        prioritize: bool,
        /// Rewrite bullets in executive tone (needs OPENAI_API_KEY)
        #[arg(long)]
        auto_summarize: bool,
        /// TOML file overriding scoring weights, impact table, or vote markers
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Print engagement and feedback quality by section
    Analyze {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Show the latest report, or one by id
    Show {
        #[arg(long)]
        id: Option<Uuid>,
    },
    /// List saved reports, newest first
    List,
    /// Mark a report as acknowledged
    Acknowledge {
        id: Uuid,
        #[arg(long, default_value = "Current Leader")]
        actor: String,
    },
    /// Show acknowledgement totals
    Stats,
}

enum Backend {
    Postgres(PgStore),
    Memory(MemoryStore),
}

impl Backend {
    async fn connect() -> anyhow::Result<Self> {
        if std::env::var("DATABASE_URL").is_err() {
            tracing::warn!("DATABASE_URL not set, reports will not outlive this run");
            return Ok(Backend::Memory(MemoryStore::new()));
        }
        Ok(Backend::Postgres(Self::connect_durable().await?))
    }

    /// Saved-report commands are meaningless against a fresh in-memory store.
    async fn connect_durable() -> anyhow::Result<PgStore> {
        let database_url = require_database_url(std::env::var("DATABASE_URL").ok())?;
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await
            .context("failed to connect to Postgres")?;
        Ok(PgStore::new(pool))
    }

    fn reports(&self) -> &dyn ReportStore {
        match self {
            Backend::Postgres(store) => store,
            Backend::Memory(store) => store,
        }
    }
}

fn require_database_url(value: Option<String>) -> anyhow::Result<String> {
    match value {
        Some(url) if !url.is_empty() => Ok(url),
        _ => anyhow::bail!("DATABASE_URL must be set to a production Postgres instance"),
    }
}

fn load_scoring(path: Option<&Path>) -> anyhow::Result<ScoringConfig> {
    match path {
        Some(path) => ScoringConfig::load(path)
            .with_context(|| format!("failed to load scoring config {}", path.display())),
        None => Ok(ScoringConfig::default()),
    }
}

fn build_rewriter() -> anyhow::Result<OpenAiRewriter> {
    let api_key =
        std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY must be set for --auto-summarize")?;
    let mut config = RewriterConfig::default();
    if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
        config.base_url = base_url;
    }
    Ok(OpenAiRewriter::new(config, api_key)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::InitDb => {
            let store = Backend::connect_durable().await?;
            db::init_db(store.pool()).await?;
            println!("Schema ready.");
        }
        Commands::Generate {
            input,
            prioritize,
            auto_summarize,
            config,
            out,
        } => {
            let input = input.load()?;
            let options = GenerateOptions {
                enable_priority_scoring: prioritize,
                scoring: load_scoring(config.as_deref())?,
            };
            let rewriter = if auto_summarize {
                Some(build_rewriter()?)
            } else {
                None
            };

            let backend = Backend::connect().await?;
            let now = Utc::now();
            let (report, signals) = pipeline::generate_report(
                input.as_ref(),
                &options,
                rewriter.as_ref().map(|r| r as &dyn ToneRewriter),
                backend.reports(),
                now,
            )
            .await?;

            let scored = prioritize
                .then(|| score_signals(&signals, now.date_naive(), &options.scoring));
            let markdown =
                report::render_markdown(&report, scored.as_deref(), &analyze(&signals));
            std::fs::write(&out, markdown)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report {} written to {}.", report.id, out.display());
        }
        Commands::Analyze { input } => {
            let input = input
                .load()?
                .filter(|input| !input.is_missing())
                .ok_or(signal_digest::Error::NoInput)?;
            let signals = input.load(Utc::now().date_naive())?;
            print!("{}", report::render_analysis(&analyze(&signals)));
        }
        Commands::Show { id } => {
            let store = Backend::connect_durable().await?;
            let found = match id {
                Some(id) => store.get_by_id(id).await?,
                None => store.get_latest().await?,
            };
            match found {
                Some(report) => print!("{}", report::render_summary(&report)),
                None => println!("No report found."),
            }
        }
        Commands::List => {
            let store = Backend::connect_durable().await?;
            let reports = store.get_all().await?;
            if reports.is_empty() {
                println!("No reports saved.");
                return Ok(());
            }
            for report in reports {
                println!(
                    "- {} generated {} ({} items, {})",
                    report.id,
                    report.generated_at.format("%Y-%m-%d %H:%M"),
                    report.items.len(),
                    if report.acknowledged {
                        "acknowledged"
                    } else {
                        "unread"
                    }
                );
            }
        }
        Commands::Acknowledge { id, actor } => {
            let store = Backend::connect_durable().await?;
            let report = pipeline::acknowledge_report(&store, &store, id, &actor).await?;
            println!("Report {} acknowledged by {actor}.", report.id);
        }
        Commands::Stats => {
            let store = Backend::connect_durable().await?;
            let stats = store.stats().await?;
            println!(
                "{} of {} acknowledgements recorded ({}% reviewed, {} unread).",
                stats.acknowledged,
                stats.total,
                stats.review_percentage(),
                stats.total - stats.acknowledged
            );
        }
    }

    Ok(())
}
