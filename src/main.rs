use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use scholarlink_core::{FacultyId, RecordFilter};
use scholarlink_similarity::{HashingProvider, MatchOptions, Matcher, MatcherConfig, ReadyLoader};
use scholarlink_storage::MemoryStore;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Research-interest matching over a faculty snapshot
#[derive(Parser, Debug)]
#[command(name = "scholarlink")]
#[command(about = "Find researchers with similar interests", long_about = None)]
struct Args {
    /// Path to the faculty snapshot (JSON)
    #[arg(short, long)]
    data: PathBuf,

    /// Optional matcher configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Faculty similar to a stored record
    MatchRecord {
        id: String,
        #[command(flatten)]
        options: MatchArgs,
    },
    /// Faculty matching free text
    MatchQuery {
        text: String,
        #[command(flatten)]
        options: MatchArgs,
    },
    /// Similarity network with department clusters
    Graph {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, default_value_t = scholarlink_core::graph::DEFAULT_THRESHOLD)]
        threshold: f32,
        #[arg(long)]
        max_connections: Option<usize>,
    },
    /// Most frequent research keywords
    Topics {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, default_value_t = 10)]
        num_topics: usize,
    },
    /// Compute embeddings for records that lack one and save the snapshot
    Backfill {
        /// Recompute every embedding, not only missing ones
        #[arg(long)]
        force: bool,
        /// Write here instead of overwriting --data
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ClapArgs, Debug)]
struct FilterArgs {
    #[arg(long)]
    school: Option<String>,
    #[arg(long)]
    department: Option<String>,
}

impl FilterArgs {
    fn into_filter(self) -> RecordFilter {
        RecordFilter::new(self.school, self.department)
    }
}

#[derive(ClapArgs, Debug)]
struct MatchArgs {
    #[arg(long, default_value_t = scholarlink_similarity::config::DEFAULT_MAX_RESULTS)]
    max_results: usize,
    #[arg(long, default_value_t = scholarlink_similarity::config::DEFAULT_MIN_SIMILARITY)]
    min_similarity: f32,
    #[command(flatten)]
    filter: FilterArgs,
    /// Skip the embedding provider
    #[arg(long)]
    lexical_only: bool,
}

impl MatchArgs {
    fn into_options(self) -> MatchOptions {
        MatchOptions {
            max_results: self.max_results,
            min_similarity: self.min_similarity,
            school_filter: self.filter.school,
            department_filter: self.filter.department,
            prefer_dense: !self.lexical_only,
        }
    }
}

#[derive(Serialize)]
struct BackfillReport {
    embedded: usize,
    failed: Vec<FacultyId>,
    output: PathBuf,
}

fn parse_id(raw: &str) -> FacultyId {
    raw.parse::<u64>()
        .map(FacultyId::Integer)
        .unwrap_or_else(|_| FacultyId::String(raw.to_string()))
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<MatcherConfig> {
    let Some(path) = path else {
        return Ok(MatcherConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: MatcherConfig = serde_json::from_str(&raw)
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting scholarlink v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(args.config.as_ref())?;
    let store = MemoryStore::load_snapshot(&args.data)?;
    let provider = Arc::new(HashingProvider::new(config.native_dim));
    let matcher = Matcher::new(
        Arc::new(store.clone()),
        Arc::new(ReadyLoader(provider)),
        config,
    )?;

    match args.command {
        Command::MatchRecord { id, options } => {
            let response = matcher
                .match_by_record(&parse_id(&id), &options.into_options())
                .await?;
            print_json(&response)?;
        }
        Command::MatchQuery { text, options } => {
            let response = matcher.match_by_query(&text, &options.into_options()).await?;
            print_json(&response)?;
        }
        Command::Graph {
            filter,
            threshold,
            max_connections,
        } => {
            let graph = matcher
                .build_graph(&filter.into_filter(), Some(threshold), max_connections)
                .await?;
            print_json(&graph)?;
        }
        Command::Topics { filter, num_topics } => {
            let report = matcher.analyze_topics(&filter.into_filter(), num_topics).await?;
            print_json(&report)?;
        }
        Command::Backfill { force, output } => {
            let mut embedded = 0;
            let mut failed = Vec::new();
            for record in store.records() {
                if record.has_embedding() && !force {
                    continue;
                }
                match matcher.embed_record(&record).await {
                    Ok(vector) => {
                        store.set_embedding(&record.id, vector)?;
                        embedded += 1;
                    }
                    Err(e) => {
                        warn!("Could not embed faculty {}: {}", record.id, e);
                        failed.push(record.id);
                    }
                }
            }

            let output = output.unwrap_or(args.data);
            store.save_snapshot(&output)?;
            info!("Backfill saved to {:?}", output);
            print_json(&BackfillReport {
                embedded,
                failed,
                output,
            })?;
        }
    }

    Ok(())
}
