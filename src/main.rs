//! CLI entry point for the CuálProfe ratings toolkit.
//!
//! Reads professors and ratings from a local export or the hosted document
//! store and renders the aggregated statistics shown across the app.

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use cualprofe::config::Config;
use cualprofe::fetch::auth::{ApiKey, UrlParam};
use cualprofe::fetch::{BasicClient, HttpClient};
use cualprofe::output::{SummaryIndex, SummaryRow, append_record, print_json, print_pretty, write_json};
use cualprofe::ratings::{RatingRecord, aggregate, aggregate_by_professor, ratings_for, recent, tag_counts};
use cualprofe::search::{Professor, ProfessorSummary, paginate, search};
use cualprofe::store::{DocumentStore, FileStore, FirestoreStore, load_professors, load_ratings};
use cualprofe::views::{ViewDecision, ViewLimiter};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Source name that selects the hosted store instead of a local directory.
const FIRESTORE_SOURCE: &str = "firestore";

#[derive(Parser)]
#[command(name = "cualprofe")]
#[command(about = "Rating statistics for CuálProfe professors", long_about = None)]
struct Cli {
    /// Export directory, or "firestore" to read the hosted store
    #[arg(short, long, global = true, default_value = "export")]
    source: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the rating summary and latest ratings for one professor
    Stats {
        /// Professor document id
        #[arg(short, long)]
        professor: String,

        /// Also log the summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Aggregate every professor and append the results to a CSV file
    Report {
        /// CSV file to append results to
        #[arg(short, long, default_value = "summary.csv")]
        output: PathBuf,

        /// Optional: also write a JSON index of all summaries
        #[arg(long)]
        json_out: Option<PathBuf>,
    },
    /// Search the professor directory
    Search {
        /// Matches name, university or department
        query: Option<String>,

        #[arg(short, long, default_value_t = 1)]
        page: usize,

        #[arg(long, default_value_t = 10)]
        per_page: usize,
    },
    /// Open professor profiles in order as an anonymous visitor
    Browse {
        /// Professor ids, in viewing order
        #[arg(short, long, required = true)]
        professor: Vec<String>,

        /// Distinct profiles allowed (0 = unlimited); defaults to ANON_VIEW_LIMIT
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Tag usage across all ratings
    Tags {
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/cualprofe.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("cualprofe.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let store = open_store(&cli.source, &config)?;

    match cli.command {
        Commands::Stats { professor, json } => {
            let (professors, ratings) = load_all(store.as_ref(), &config).await?;
            show_professor(&professors, &ratings, &professor, json)?;
        }
        Commands::Report { output, json_out } => {
            let (professors, ratings) = load_all(store.as_ref(), &config).await?;
            report(&professors, &ratings, &output, json_out.as_deref())?;
        }
        Commands::Search {
            query,
            page,
            per_page,
        } => {
            let (professors, ratings) = load_all(store.as_ref(), &config).await?;
            let grouped = aggregate_by_professor(&ratings);
            let matches = search(&professors, query.as_deref().unwrap_or(""));
            let page = paginate(matches, page, per_page);

            info!(
                total = page.total,
                page = page.page,
                total_pages = page.total_pages,
                has_next = page.has_next,
                "Search results"
            );
            for p in &page.items {
                let stats = grouped.stats.get(&p.id).cloned().unwrap_or_default();
                info!(
                    professor_id = %p.id,
                    name = %p.name,
                    university = %p.university,
                    department = %p.department,
                    average_quality = stats.average_quality,
                    ratings = stats.rating_count,
                    "Professor"
                );
            }
        }
        Commands::Browse { professor, limit } => {
            let (professors, ratings) = load_all(store.as_ref(), &config).await?;
            let mut views = ViewLimiter::new(limit.unwrap_or(config.anon_view_limit));

            for id in &professor {
                match views.record_view(id) {
                    ViewDecision::Allowed => {
                        show_professor(&professors, &ratings, id, false)?;
                        info!(remaining = ?views.remaining(), "Profile opened");
                    }
                    ViewDecision::LimitReached => {
                        warn!(professor_id = %id, viewed = views.viewed(), "View limit reached, sign in to keep browsing");
                    }
                }
            }
        }
        Commands::Tags { limit } => {
            let ratings = load_ratings(store.as_ref(), &config.ratings_collection).await?;
            let counts = tag_counts(&ratings);

            info!(distinct = counts.len(), ratings = ratings.len(), "Tag usage");
            for (tag, count) in counts.iter().take(limit) {
                info!(tag = %tag, count, "Tag");
            }
        }
    }

    Ok(())
}

/// Picks the document store named by `--source`.
fn open_store(source: &str, config: &Config) -> Result<Box<dyn DocumentStore>> {
    if source != FIRESTORE_SOURCE {
        info!(dir = source, "Reading local export");
        return Ok(Box::new(FileStore::new(source)));
    }

    let project_id = config.require_project_id()?;
    let mut client: Box<dyn HttpClient> = Box::new(BasicClient::new()?);
    if let Some(key) = &config.api_key {
        client = Box::new(UrlParam::api_key(client, key.clone()));
    }
    if let Some(token) = &config.bearer_token {
        client = Box::new(ApiKey::bearer(client, token)?);
    }

    info!(project_id, base_url = %config.base_url, "Reading hosted store");
    Ok(Box::new(FirestoreStore::new(
        client,
        &config.base_url,
        project_id,
        config.page_size,
    )))
}

/// Fetches professors and ratings concurrently.
#[tracing::instrument(skip_all)]
async fn load_all(
    store: &dyn DocumentStore,
    config: &Config,
) -> Result<(Vec<Professor>, Vec<RatingRecord>)> {
    let (professors, ratings) = tokio::try_join!(
        load_professors(store, &config.professors_collection),
        load_ratings(store, &config.ratings_collection),
    )?;
    info!(
        professors = professors.len(),
        ratings = ratings.len(),
        "Collections loaded"
    );
    Ok((professors, ratings))
}

/// Logs a single professor's summary and their five latest ratings.
fn show_professor(
    professors: &[Professor],
    ratings: &[RatingRecord],
    professor_id: &str,
    json: bool,
) -> Result<()> {
    let professor = match professors.iter().find(|p| p.id == professor_id) {
        Some(p) => p.clone(),
        None => {
            warn!(professor_id, "Professor not in directory");
            Professor {
                id: professor_id.to_string(),
                ..Default::default()
            }
        }
    };

    let own = ratings_for(ratings, professor_id);
    let summary = ProfessorSummary {
        professor,
        stats: aggregate(own.iter().copied()),
    };
    let s = &summary.stats;

    info!(
        professor_id,
        name = %summary.professor.name,
        ratings = s.rating_count,
        average_quality = s.average_quality,
        average_difficulty = s.average_difficulty,
        would_take_again_percent = s.would_take_again_percent,
        distribution = ?s.distribution,
        top_tags = ?s.top_tags,
        "Professor summary"
    );

    for r in recent(own.iter().copied(), 5) {
        info!(
            created_at = ?r.created_at,
            quality = ?r.quality,
            difficulty = ?r.difficulty,
            course = r.course.as_deref().unwrap_or("-"),
            comment = r.comment.as_deref().unwrap_or(""),
            "Rating"
        );
    }

    print_pretty(&summary);
    if json {
        print_json(&summary)?;
    }
    Ok(())
}

/// Aggregates every professor, appending CSV rows and optionally writing a
/// JSON index.
fn report(
    professors: &[Professor],
    ratings: &[RatingRecord],
    output: &Path,
    json_out: Option<&Path>,
) -> Result<()> {
    let grouped = aggregate_by_professor(ratings);
    if grouped.unattributed > 0 {
        warn!(count = grouped.unattributed, "Ratings without professorId skipped");
    }

    let orphaned = grouped
        .stats
        .keys()
        .filter(|id| !professors.iter().any(|p| &p.id == *id))
        .count();
    if orphaned > 0 {
        warn!(count = orphaned, "Rated professors missing from directory");
    }

    let summaries: Vec<ProfessorSummary> = search(professors, "")
        .into_iter()
        .map(|p| ProfessorSummary {
            professor: p.clone(),
            stats: grouped.stats.get(&p.id).cloned().unwrap_or_default(),
        })
        .collect();

    let generated_at = Utc::now();
    for summary in &summaries {
        append_record(output, &SummaryRow::new(summary, generated_at))?;
    }
    info!(rows = summaries.len(), output = %output.display(), "CSV report written");

    if let Some(path) = json_out {
        let index = SummaryIndex {
            generated_at,
            professors: &summaries,
        };
        write_json(path, &index)?;
        info!(path = %path.display(), "JSON index written");
    }

    Ok(())
}
