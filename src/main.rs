use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

use entity_ranker::config::{self, Config};
use entity_ranker::entity::{load_catalog, CandidatesInfo, EntityContext, EntityScore};
use entity_ranker::output;
use entity_ranker::ranking::{CancelToken, ParallelRanker, RankError, RankingEngine};
use entity_ranker::scoring::FactorScorer;

const EXIT_SUCCESS: i32 = 0;
const EXIT_SCORING: i32 = 1;
const EXIT_INPUT: i32 = 2;
const EXIT_CANCELLED: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Args, Debug)]
struct QueryArgs {
    /// Surface form (query fragment) to resolve
    surface_form: String,

    /// Candidate catalog (JSON)
    #[arg(long)]
    candidates: PathBuf,

    /// Text surrounding the surface form, used as scoring context
    #[arg(long, default_value = "")]
    context: String,

    /// Length of the surface form (defaults to its token count)
    #[arg(long)]
    length: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the single highest ranked candidate
    Best {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Print the top-k candidates in descending score order
    Top {
        #[command(flatten)]
        query: QueryArgs,

        /// Number of results (defaults to ranking.top_k from config)
        #[arg(short)]
        k: Option<usize>,

        /// Score candidates on a bounded worker pool
        #[arg(long)]
        parallel: bool,

        /// Cancel the ranking after this long (e.g. "500ms", "2s")
        #[arg(long, value_parser = humantime::parse_duration)]
        timeout: Option<Duration>,

        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Validate the config file and exit
    Validate,
}

#[derive(Parser, Debug)]
#[command(name = "entity-ranker")]
#[command(about = "Rank candidate entities for a surface form", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging and score breakdowns
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/entity-ranker/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Everything one ranking call needs, built from CLI arguments
struct Query {
    candidates: Arc<CandidatesInfo>,
    context: EntityContext,
    surface_form: String,
    length: usize,
}

fn prepare_query(args: &QueryArgs) -> anyhow::Result<Query> {
    let catalog = load_catalog(&args.candidates)?;
    let candidates = catalog
        .candidates_for(&args.surface_form)
        .with_context(|| {
            format!(
                "No candidates for '{}' in {}",
                args.surface_form,
                args.candidates.display()
            )
        })?;
    if candidates.is_empty() {
        anyhow::bail!(
            "Empty candidate list for '{}' in {}",
            args.surface_form,
            args.candidates.display()
        );
    }
    let length = args
        .length
        .unwrap_or_else(|| args.surface_form.split_whitespace().count());

    Ok(Query {
        candidates: Arc::new(candidates),
        context: EntityContext::new(&args.context),
        surface_form: args.surface_form.clone(),
        length,
    })
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "entity_ranker=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_code(err: &RankError) -> i32 {
    match err {
        RankError::Cancelled => EXIT_CANCELLED,
        RankError::EmptyCandidates => EXIT_INPUT,
        _ => EXIT_SCORING,
    }
}

/// Non-verbose rendering of a ranking; `None` when `-k 0` asked for nothing
fn render_results(results: &[EntityScore], k: usize, tsv: bool, use_colors: bool) -> Option<String> {
    if k == 0 {
        return None;
    }
    if tsv {
        Some(output::format_tsv(results))
    } else {
        Some(output::format_ranked_table(results, use_colors))
    }
}

fn print_verbose(results: &[EntityScore], scorer: &FactorScorer, query: &Query, use_colors: bool) {
    for ranked in results {
        println!("{}", output::format_entity_detail(&ranked.entity, use_colors));
        let explained = scorer.explain(&ranked.entity, &query.context, &query.surface_form, query.length);
        println!("{}", output::format_breakdown(&explained));
        println!();
    }
}

/// Run a synchronous ranking pass on the blocking pool, handing the query back
async fn run_blocking<T, F>(scorer: FactorScorer, query: Query, rank: F) -> (Result<T, RankError>, Query)
where
    T: Send + 'static,
    F: FnOnce(&RankingEngine<FactorScorer>, &mut Query) -> Result<T, RankError> + Send + 'static,
{
    let handle = tokio::task::spawn_blocking(move || {
        let mut query = query;
        let engine = RankingEngine::new(scorer);
        let result = rank(&engine, &mut query);
        (result, query)
    });

    match handle.await {
        Ok(done) => done,
        Err(e) => {
            eprintln!("Scoring worker failed: {}", e);
            std::process::exit(EXIT_SCORING);
        }
    }
}

async fn run_best(scorer: FactorScorer, query: Query) -> (Result<EntityScore, RankError>, Query) {
    run_blocking(scorer, query, |engine, q| {
        engine.highest_ranked_entity(&q.candidates, &mut q.context, &q.surface_form, q.length)
    })
    .await
}

/// Top-k on a blocking thread so a timeout can still fire
async fn run_sequential_top_k(
    scorer: FactorScorer,
    query: Query,
    k: usize,
    cancel: CancelToken,
) -> (Result<Vec<EntityScore>, RankError>, Query) {
    run_blocking(scorer, query, move |engine, q| {
        engine.top_k_entities_with_cancel(
            &q.candidates,
            &mut q.context,
            &q.surface_form,
            q.length,
            k,
            &cancel,
        )
    })
    .await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let start_time = Instant::now();

    let config = match config::load_config(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup
    if let Err(errors) = config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let scorer = match FactorScorer::new(&config.effective_scoring()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let use_colors = output::should_use_colors();

    match cli.command {
        Commands::Validate => {
            println!("Config OK");
        }
        Commands::Best { query } => {
            let query = load_query_or_exit(&query);
            let (result, query) = run_best(scorer.clone(), query).await;
            match result {
                Ok(best) => {
                    let results = [best];
                    if cli.verbose {
                        print_verbose(&results, &scorer, &query, use_colors);
                    } else {
                        println!("{}", output::format_ranked_table(&results, use_colors));
                    }
                }
                Err(e) => {
                    eprintln!("Ranking failed: {}", e);
                    std::process::exit(exit_code(&e));
                }
            }
        }
        Commands::Top {
            query,
            k,
            parallel,
            timeout,
            tsv,
        } => {
            let query = load_query_or_exit(&query);
            let k = k.unwrap_or_else(|| config.top_k());

            let cancel = CancelToken::new();
            if let Some(timeout) = timeout {
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(timeout).await;
                    tracing::warn!(?timeout, "ranking timed out, cancelling");
                    cancel.cancel();
                });
            }

            let (result, query) = if parallel {
                run_parallel_top_k(&scorer, &config, query, k, &cancel).await
            } else {
                run_sequential_top_k(scorer.clone(), query, k, cancel).await
            };

            match result {
                Ok(results) => {
                    if cli.verbose && !tsv {
                        print_verbose(&results, &scorer, &query, use_colors);
                    } else if let Some(rendered) = render_results(&results, k, tsv, use_colors) {
                        println!("{}", rendered);
                    }
                }
                Err(e) => {
                    eprintln!("Ranking failed: {}", e);
                    std::process::exit(exit_code(&e));
                }
            }
        }
    }

    tracing::debug!(elapsed = ?start_time.elapsed(), "done");
    std::process::exit(EXIT_SUCCESS);
}

async fn run_parallel_top_k(
    scorer: &FactorScorer,
    config: &Config,
    mut query: Query,
    k: usize,
    cancel: &CancelToken,
) -> (Result<Vec<EntityScore>, RankError>, Query) {
    let ranker = ParallelRanker::new(scorer.clone()).with_workers(config.workers());
    let result = ranker
        .top_k_entities(
            Arc::clone(&query.candidates),
            &mut query.context,
            &query.surface_form,
            query.length,
            k,
            cancel,
        )
        .await;
    (result, query)
}

fn load_query_or_exit(args: &QueryArgs) -> Query {
    match prepare_query(args) {
        Ok(q) => q,
        Err(e) => {
            eprintln!("Input error: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    }
}
