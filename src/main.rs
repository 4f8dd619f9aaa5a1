use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use mythoscifi::config::Config;
use mythoscifi::db::models::Category;
use mythoscifi::db::search::parse_query_prefix;
use mythoscifi::db::{self, CharacterStore};
use mythoscifi::names::{BlendStyle, NameGenerator};
use mythoscifi::output::{csv as csv_out, terminal};
use mythoscifi::vectorize::analyzer::{CharacterAnalyzer, MatrixKind};
use mythoscifi::vectorize::tokenize::NgramRange;
use mythoscifi::vectorize::vocabulary::{StopWords, VectorizerParams};
use mythoscifi::{ingest, status};

/// MythoSciFi: blended character names from Greek mythology and sci-fi robots.
///
/// Stores both character lists in a local database, searches them by
/// description, generates pronounceable blends, and analyzes the
/// descriptions with n-gram count and TF-IDF matrices.
#[derive(Parser)]
#[command(name = "mythoscifi", version, about)]
struct Cli {
    /// Database path (overrides MYTHOSCIFI_DB_PATH)
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Vocabulary options shared by the analysis commands.
#[derive(Args, Debug, Clone)]
struct VectorizeArgs {
    /// Category whose descriptions are analyzed
    #[arg(long, value_enum, default_value = "mythology")]
    category: Category,

    /// Vocabulary size cap (0 keeps every term that passes --min-df)
    #[arg(long, default_value = "20")]
    max_features: usize,

    /// Smallest n-gram width
    #[arg(long, default_value = "2")]
    ngram_min: usize,

    /// Largest n-gram width
    #[arg(long, default_value = "2")]
    ngram_max: usize,

    /// Minimum number of descriptions a term must appear in
    #[arg(long, default_value = "2")]
    min_df: usize,

    /// Shortest word kept by the tokenizer
    #[arg(long, default_value = "3")]
    min_token_len: usize,

    /// Keep English stop-words instead of removing them
    #[arg(long)]
    keep_stop_words: bool,
}

impl VectorizeArgs {
    fn params(&self) -> VectorizerParams {
        VectorizerParams {
            max_features: (self.max_features > 0).then_some(self.max_features),
            ngram_range: NgramRange::new(self.ngram_min, self.ngram_max),
            min_df: self.min_df,
            min_token_len: self.min_token_len,
            stop_words: if self.keep_stop_words {
                StopWords::None
            } else {
                StopWords::English
            },
        }
    }

    async fn analyzer(
        &self,
        store: &dyn CharacterStore,
        count: bool,
        tfidf: bool,
    ) -> Result<CharacterAnalyzer> {
        let mut analyzer = CharacterAnalyzer::load(store, self.category).await?;
        if count {
            analyzer.build_count_matrix(self.params())?;
        }
        if tfidf {
            analyzer.build_tfidf_matrix(self.params())?;
        }
        Ok(analyzer)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Load character lists from CSV files into the database (replaces its contents)
    Populate {
        /// CSV of Greek mythology characters (name, description columns)
        #[arg(long)]
        mythology: Option<PathBuf>,

        /// CSV of fictional robots (name, description columns)
        #[arg(long)]
        robots: Option<PathBuf>,

        /// Store a random subset of this many characters
        #[arg(long)]
        num_samples: Option<usize>,

        /// Seed for the subset sampling (overrides MYTHOSCIFI_SEED)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Search characters by description. Without a query, starts an interactive prompt.
    ///
    /// Prefix a query with `robot:` or `mythology:` to search one category.
    Search {
        /// Search text
        query: Vec<String>,

        /// Only search this category
        #[arg(long, value_enum)]
        category: Option<Category>,

        /// Number of results
        #[arg(short = 'n', long, default_value = "10")]
        top: usize,

        /// Print results as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Generate blended names, optionally steered by a query
    Generate {
        /// Query to steer which characters get blended
        query: Vec<String>,

        /// Names sampled from each category
        #[arg(long, default_value = "100")]
        samples: usize,

        /// Number of names to return
        #[arg(long, default_value = "5")]
        top: usize,

        /// Seed for the pairing shuffle (overrides MYTHOSCIFI_SEED)
        #[arg(long)]
        seed: Option<u64>,

        /// Blend rule set
        #[arg(long, value_enum, default_value = "extended")]
        style: BlendStyle,

        /// Print results as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Most common n-grams, a matrix preview, and count vs TF-IDF totals
    Bigrams {
        #[command(flatten)]
        vectorize: VectorizeArgs,

        /// Number of top terms to list
        #[arg(long, default_value = "20")]
        top: usize,

        /// Characters shown in the matrix preview
        #[arg(long, default_value = "10")]
        preview: usize,
    },

    /// Top terms and most similar characters for one character
    Analyze {
        name: String,

        /// Print the analysis as JSON instead of formatted text
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        vectorize: VectorizeArgs,
    },

    /// Compare count-based and TF-IDF-based top terms
    Compare {
        /// Character names (default: Zeus Athena Poseidon)
        names: Vec<String>,

        #[command(flatten)]
        vectorize: VectorizeArgs,
    },

    /// Characters whose descriptions are most similar to one character's
    Similar {
        name: String,

        #[arg(long, default_value = "5")]
        top: usize,

        #[arg(long, value_enum, default_value = "count")]
        kind: MatrixKind,

        #[command(flatten)]
        vectorize: VectorizeArgs,
    },

    /// Save a document-term matrix to CSV
    Export {
        /// Output file (default: <output dir>/<category>_<kind>_matrix.csv)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Characters written, in load order
        #[arg(long, default_value = "50")]
        rows: usize,

        #[arg(long, value_enum, default_value = "count")]
        kind: MatrixKind,

        #[command(flatten)]
        vectorize: VectorizeArgs,
    },

    /// Show database status and character counts
    Status,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mythoscifi=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::load()?;
    if let Some(db_path) = cli.db {
        config.db_path = db_path;
    }

    match cli.command {
        Commands::Init => {
            info!("Initializing MythoSciFi database...");
            let store = db::initialize_sqlite(&config.db_path)?;
            let table_count = store.table_count().await?;
            println!("Database initialized at: {}", config.db_path);
            println!("Tables created: {table_count}");
            println!("\nNext step: load character lists with");
            println!("  mythoscifi populate --mythology characters.csv --robots robots.csv");
        }

        Commands::Populate {
            mythology,
            robots,
            num_samples,
            seed,
        } => {
            if mythology.is_none() && robots.is_none() {
                anyhow::bail!("Nothing to load. Pass --mythology and/or --robots.");
            }
            let store = db::initialize_sqlite(&config.db_path)?;

            let mut characters = Vec::new();
            if let Some(path) = &robots {
                characters.extend(ingest::load_characters_csv(path, Category::Robot)?);
            }
            if let Some(path) = &mythology {
                characters.extend(ingest::load_characters_csv(path, Category::Mythology)?);
            }
            println!("Total characters to store: {}", characters.len());

            let mut rng = seeded_rng(seed.or(config.seed));
            let stored =
                ingest::populate(store.as_ref(), characters, num_samples, &mut rng).await?;

            let stats = status::collect_stats(store.as_ref()).await?;
            println!("\n{}", "DATABASE POPULATED SUCCESSFULLY".bold().green());
            println!("Stored: {stored} characters");
            println!("  - Robots: {}", stats.robots);
            println!("  - Mythology: {}", stats.mythology);
        }

        Commands::Search {
            query,
            category,
            top,
            json,
        } => {
            let store = db::open_sqlite(&config.db_path)?;
            if query.is_empty() {
                interactive_search(&store, category, top).await?;
            } else if json {
                let joined = query.join(" ");
                let (prefix, text) = parse_query_prefix(&joined);
                let hits = store.query(text, top, prefix.or(category)).await?;
                println!("{}", serde_json::to_string_pretty(&hits)?);
            } else {
                run_search(&store, &query.join(" "), category, top).await?;
            }
        }

        Commands::Generate {
            query,
            samples,
            top,
            seed,
            style,
            json,
        } => {
            let store = db::open_sqlite(&config.db_path)?;
            let query = (!query.is_empty()).then(|| query.join(" "));
            let mut rng = seeded_rng(seed.or(config.seed));

            let generator = NameGenerator::new(Arc::clone(&store)).with_style(style);
            let names = generator
                .generate(&mut rng, query.as_deref(), samples, top)
                .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&names)?);
            } else {
                terminal::display_generated_names(query.as_deref(), &names);
            }
        }

        Commands::Bigrams {
            vectorize,
            top,
            preview,
        } => {
            let store = db::open_sqlite(&config.db_path)?;
            let analyzer = vectorize.analyzer(store.as_ref(), true, true).await?;

            let common: Vec<(String, f64)> = analyzer
                .most_common_terms(top)?
                .into_iter()
                .map(|(t, n)| (t, n as f64))
                .collect();
            terminal::display_term_chart(
                &format!("TOP {} MOST COMMON TERMS - COUNT", common.len()),
                &common,
            );
            terminal::display_matrix_table(&analyzer, MatrixKind::Count, preview, 8)?;
            terminal::display_term_chart(
                "TOP 15 TERMS - TOTAL TF-IDF SCORE",
                &analyzer.feature_totals(MatrixKind::TfIdf, 15)?,
            );
            terminal::display_matrix_stats(analyzer.characters().len(), &analyzer.matrix_stats());
        }

        Commands::Analyze {
            name,
            json,
            vectorize,
        } => {
            let store = db::open_sqlite(&config.db_path)?;
            let analyzer = vectorize.analyzer(store.as_ref(), true, false).await?;
            match analyzer.analyze(&name)? {
                Some(analysis) if json => {
                    println!("{}", serde_json::to_string_pretty(&analysis)?)
                }
                Some(analysis) => terminal::display_analysis(&analysis),
                None => println!("No {} character named '{}'.", vectorize.category, name),
            }
        }

        Commands::Compare { names, vectorize } => {
            let store = db::open_sqlite(&config.db_path)?;
            let analyzer = vectorize.analyzer(store.as_ref(), true, true).await?;
            let names = if names.is_empty() {
                vec!["Zeus".to_string(), "Athena".to_string(), "Poseidon".to_string()]
            } else {
                names
            };
            println!("\n{}", "COUNT VS TF-IDF COMPARISON".bold());
            for name in &names {
                match analyzer.compare_count_vs_tfidf(name)? {
                    Some(comparison) => terminal::display_comparison(&comparison),
                    None => println!("\n{}: not found", name),
                }
            }
        }

        Commands::Similar {
            name,
            top,
            kind,
            vectorize,
        } => {
            let store = db::open_sqlite(&config.db_path)?;
            let analyzer = vectorize
                .analyzer(
                    store.as_ref(),
                    kind == MatrixKind::Count,
                    kind == MatrixKind::TfIdf,
                )
                .await?;
            let similar = analyzer.find_similar(&name, kind, top)?;
            terminal::display_similar(&name, kind, &similar);
        }

        Commands::Export {
            out,
            rows,
            kind,
            vectorize,
        } => {
            let store = db::open_sqlite(&config.db_path)?;
            let analyzer = vectorize
                .analyzer(
                    store.as_ref(),
                    kind == MatrixKind::Count,
                    kind == MatrixKind::TfIdf,
                )
                .await?;
            let path = out.unwrap_or_else(|| {
                config
                    .output_dir
                    .join(format!("{}_{}_matrix.csv", vectorize.category, kind))
            });
            let (written, cols) = csv_out::write_matrix_csv(&path, &analyzer, kind, rows)?;
            println!("Saved matrix to {}", path.display());
            println!("  Shape: ({written}, {cols})");
        }

        Commands::Status => {
            let store = db::open_sqlite(&config.db_path)?;
            status::show(store.as_ref(), &config.db_path).await?;
        }
    }

    Ok(())
}

/// RNG from an explicit seed, or a fresh seed that gets logged so the run
/// can be reproduced.
fn seeded_rng(seed: Option<u64>) -> StdRng {
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    info!(seed, "Random seed");
    StdRng::seed_from_u64(seed)
}

async fn run_search(
    store: &Arc<dyn CharacterStore>,
    input: &str,
    category: Option<Category>,
    top: usize,
) -> Result<()> {
    let (prefix, text) = parse_query_prefix(input);
    let filter = prefix.or(category);
    let hits = store.query(text, top, filter).await?;
    terminal::display_search_hits(text, &hits);
    Ok(())
}

async fn interactive_search(
    store: &Arc<dyn CharacterStore>,
    category: Option<Category>,
    top: usize,
) -> Result<()> {
    println!("Interactive search. Prefix with 'robot:' or 'mythology:' to filter.");
    println!("Type 'quit', 'exit' or 'q' to leave.");

    let stdin = io::stdin();
    loop {
        print!("\nSearch> ");
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if matches!(input.to_lowercase().as_str(), "quit" | "exit" | "q") {
            break;
        }
        if input.is_empty() {
            continue;
        }
        run_search(store, input, category, top).await?;
    }
    Ok(())
}
