use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use data_loader::{Corpus, FileLikedStore};
use metadata_client::{
    MetadataCache, OMDB_DEFAULT_URL, OmdbProvider, ProviderConfig, YOUTUBE_DEFAULT_URL,
    YouTubeProvider,
};
use server::{
    DEFAULT_TOP_N, LikedSet, MovieRecommendation, RankingError, RankingOptions,
    RecommendationEngine,
};
use similarity::{Mood, SimilarityIndex};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// ReelRecs - Movie Recommendation Engine
#[derive(Parser)]
#[command(name = "reel-recs")]
#[command(about = "Content-based movie recommendations from plot and genre similarity", long_about = None)]
struct Cli {
    /// Path to the TMDB movies table (CSV)
    #[arg(long, env = "REEL_RECS_DATA_FILE", default_value = "tmdb_5000_movies.csv")]
    data_file: PathBuf,

    /// File holding the liked titles, one per line
    #[arg(long, env = "REEL_RECS_LIKED_FILE", default_value = "liked_movies.txt")]
    liked_file: PathBuf,

    #[command(flatten)]
    providers: ProviderArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Metadata and trailer provider settings
#[derive(Args)]
struct ProviderArgs {
    /// API key for the movie details provider
    #[arg(long, env = "OMDB_API_KEY", hide_env_values = true)]
    omdb_api_key: Option<String>,

    /// API key for the trailer search provider
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    youtube_api_key: Option<String>,

    #[arg(long, env = "OMDB_API_URL", default_value = OMDB_DEFAULT_URL)]
    omdb_api_url: String,

    #[arg(long, env = "YOUTUBE_API_URL", default_value = YOUTUBE_DEFAULT_URL)]
    youtube_api_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend movies similar to a given title
    Similar {
        /// Exact catalog title
        #[arg(long)]
        title: String,

        /// Minimum vote average (0-10)
        #[arg(long, default_value = "6.0")]
        min_rating: f32,

        /// Only keep movies sharing one of these genres (repeatable)
        #[arg(long = "genre")]
        genres: Vec<String>,

        /// Number of recommendations to return
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        limit: usize,

        /// Show the metadata card of each recommendation
        #[arg(long)]
        details: bool,

        /// Append the query and its results to this file
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Recommend top rated movies for a mood
    Mood {
        /// One of: Happy, Sad, Romantic, Excited, Relaxed, Thriller
        #[arg(long)]
        mood: String,

        /// Minimum vote average (0-10)
        #[arg(long, default_value = "6.0")]
        min_rating: f32,

        /// Number of recommendations to return
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        limit: usize,

        /// Skip movies without a poster
        #[arg(long)]
        require_poster: bool,
    },

    /// Recommend movies based on everything you liked
    ForYou {
        /// Number of recommendations to return
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        limit: usize,
    },

    /// Add a movie to your liked list
    Like {
        #[arg(long)]
        title: String,
    },

    /// Remove a movie from your liked list
    Unlike {
        #[arg(long)]
        title: String,
    },

    /// Show your liked list
    Liked,

    /// Show poster, plot, credits and trailer for a movie
    Details {
        #[arg(long)]
        title: String,
    },

    /// Search for movies by title
    Search {
        /// Case-insensitive substring
        #[arg(long)]
        title: String,
    },

    /// List the genres available for filtering
    Genres,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Load the catalog (every command needs it)
    println!("Loading catalog from {}...", cli.data_file.display());
    let start = Instant::now();
    let corpus = Arc::new(
        Corpus::load_from_csv(&cli.data_file).context("Failed to load movie catalog")?,
    );
    println!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        corpus.len(),
        start.elapsed()
    );

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Similar {
            title,
            min_rating,
            genres,
            limit,
            details,
            log_file,
        } => {
            let engine = build_engine(corpus, &cli.providers, RankingOptions::default())?;
            handle_similar(&engine, &title, min_rating, &genres, limit, details, log_file.as_deref())
                .await?
        }
        Commands::Mood {
            mood,
            min_rating,
            limit,
            require_poster,
        } => {
            let options = RankingOptions {
                mood_requires_poster: require_poster,
            };
            let engine = build_engine(corpus, &cli.providers, options)?;
            handle_mood(&engine, &mood, min_rating, limit).await?
        }
        Commands::ForYou { limit } => {
            let liked = load_liked(&cli.liked_file)?;
            let engine = build_engine(corpus, &cli.providers, RankingOptions::default())?;
            handle_for_you(&engine, &liked, limit).await?
        }
        Commands::Like { title } => handle_like(&corpus, &cli.liked_file, &title)?,
        Commands::Unlike { title } => handle_unlike(&cli.liked_file, &title)?,
        Commands::Liked => handle_liked(&cli.liked_file)?,
        Commands::Details { title } => {
            let engine = build_engine(corpus, &cli.providers, RankingOptions::default())?;
            handle_details(&engine, &title).await?
        }
        Commands::Search { title } => handle_search(&corpus, &title),
        Commands::Genres => handle_genres(&corpus),
    }

    Ok(())
}

/// Build the similarity index and the metadata cache around the catalog
fn build_engine(
    corpus: Arc<Corpus>,
    providers: &ProviderArgs,
    options: RankingOptions,
) -> Result<RecommendationEngine> {
    let start = Instant::now();
    let index = Arc::new(SimilarityIndex::build(&corpus));
    println!(
        "{} Built similarity index in {:?}",
        "✓".green(),
        start.elapsed()
    );

    let omdb_config = ProviderConfig::new(&providers.omdb_api_url, providers.omdb_api_key.clone());
    if omdb_config.api_key.is_none() {
        warn!("OMDB_API_KEY is not set; posters and details will be unavailable");
    }
    let youtube_config = ProviderConfig::new(
        &providers.youtube_api_url,
        providers.youtube_api_key.clone(),
    );
    if youtube_config.api_key.is_none() {
        warn!("YOUTUBE_API_KEY is not set; trailers will be unavailable");
    }

    let details = OmdbProvider::new(omdb_config).context("Failed to create details provider")?;
    let trailers =
        YouTubeProvider::new(youtube_config).context("Failed to create trailer provider")?;
    let cache = Arc::new(MetadataCache::new(Arc::new(details), Arc::new(trailers)));

    Ok(RecommendationEngine::new(corpus, index, cache, options))
}

fn load_liked(path: &Path) -> Result<LikedSet> {
    LikedSet::load(FileLikedStore::new(path))
        .with_context(|| format!("Failed to read liked list from {}", path.display()))
}

/// Handle the 'similar' command
async fn handle_similar(
    engine: &RecommendationEngine,
    title: &str,
    min_rating: f32,
    genres: &[String],
    limit: usize,
    details: bool,
    log_file: Option<&Path>,
) -> Result<()> {
    let start = Instant::now();
    let recommendations = match engine.similar_to_item(title, min_rating, genres, limit).await {
        Ok(recommendations) => recommendations,
        Err(err @ RankingError::NotFound { .. }) => {
            print_not_found(&err);
            bail!(err);
        }
        Err(err) => return Err(err.into()),
    };
    info!("Similar query answered in {:?}", start.elapsed());

    print_header(&format!("Movies similar to '{}':", title));
    if recommendations.is_empty() {
        println!("No movies passed the filters. Try a lower minimum rating or fewer genres.");
    }
    print_recommendations(&recommendations, "similarity");

    if details {
        for recommendation in &recommendations {
            print_details(engine, &recommendation.title).await;
        }
    }

    if let Some(path) = log_file {
        append_log(path, title, &recommendations)?;
    }
    Ok(())
}

/// Handle the 'mood' command
async fn handle_mood(
    engine: &RecommendationEngine,
    mood: &str,
    min_rating: f32,
    limit: usize,
) -> Result<()> {
    let mood: Mood = match mood.parse() {
        Ok(mood) => mood,
        Err(err) => {
            let known: Vec<&str> = Mood::ALL.iter().map(|m| m.name()).collect();
            println!("{} Available moods: {}", "✗".red(), known.join(", "));
            return Err(RankingError::from(err).into());
        }
    };

    let recommendations = engine.mood_filtered(mood, min_rating, limit).await?;
    print_header(&format!("{} picks ({}):", mood, mood.genres().join(", ")));
    if recommendations.is_empty() {
        println!("No movies match this mood. Try a lower minimum rating.");
    }
    print_recommendations(&recommendations, "rating");
    Ok(())
}

/// Handle the 'for-you' command
async fn handle_for_you(
    engine: &RecommendationEngine,
    liked: &LikedSet,
    limit: usize,
) -> Result<()> {
    if liked.is_empty() {
        println!("You have not liked any movies yet. Use `reel-recs like --title <TITLE>` first.");
        return Ok(());
    }

    let recommendations = engine.personalized(liked.titles(), limit).await?;
    print_header(&format!("Based on your {} liked movies:", liked.len()));
    if recommendations.is_empty() {
        println!("None of your liked movies are in the catalog. Like a few more to get picks.");
    }
    print_recommendations(&recommendations, "match");
    Ok(())
}

/// Handle the 'like' command
fn handle_like(corpus: &Corpus, liked_file: &Path, title: &str) -> Result<()> {
    if !corpus.contains_title(title) {
        let err = RankingError::NotFound {
            title: title.to_string(),
            suggestions: corpus
                .suggest(title, server::SUGGESTION_LIMIT)
                .into_iter()
                .map(str::to_string)
                .collect(),
        };
        print_not_found(&err);
        bail!(err);
    }

    let mut liked = load_liked(liked_file)?;
    if liked.like(title).context("Failed to save liked list")? {
        println!("{} Added '{}' to your liked movies", "✓".green(), title);
    } else {
        println!("'{}' is already in your liked movies", title);
    }
    Ok(())
}

/// Handle the 'unlike' command
fn handle_unlike(liked_file: &Path, title: &str) -> Result<()> {
    let mut liked = load_liked(liked_file)?;
    if liked.unlike(title).context("Failed to save liked list")? {
        println!("{} Removed '{}' from your liked movies", "✓".green(), title);
    } else {
        println!("'{}' is not in your liked movies", title);
    }
    Ok(())
}

/// Handle the 'liked' command
fn handle_liked(liked_file: &Path) -> Result<()> {
    let liked = load_liked(liked_file)?;
    print_header(&format!("Liked movies ({}):", liked.len()));
    if liked.is_empty() {
        println!("Nothing here yet.");
    }
    for title in liked.all() {
        println!("{}{}", "• ".green(), title);
    }
    Ok(())
}

/// Handle the 'details' command
async fn handle_details(engine: &RecommendationEngine, title: &str) -> Result<()> {
    if !engine.corpus().contains_title(title) {
        warn!("'{}' is not in the catalog, looking it up anyway", title);
    }
    print_details(engine, title).await;
    Ok(())
}

/// Handle the 'search' command
fn handle_search(corpus: &Corpus, query: &str) {
    let matches = corpus.suggest(query, corpus.len());
    print_header(&format!("Search results for '{}':", query));
    if matches.is_empty() {
        println!("No titles contain '{}'", query);
    }
    for title in matches.iter().take(20) {
        if let Some(item) = corpus.index_of(title).and_then(|i| corpus.get(i)) {
            println!(
                "{} [{}] rated {:.1}",
                item.title,
                item.genre_names.join(", "),
                item.vote_average
            );
        }
    }
    if matches.len() > 20 {
        println!("... and {} more", matches.len() - 20);
    }
}

/// Handle the 'genres' command
fn handle_genres(corpus: &Corpus) {
    print_header("Available genres:");
    for genre in corpus.all_genres() {
        let count = corpus.indices_with_any_genre(&[genre]).len();
        println!("{}{} ({} movies)", "• ".green(), genre, count);
    }
}

/// Append one query and its results, in the recommendation log format
fn append_log(path: &Path, title: &str, recommendations: &[MovieRecommendation]) -> Result<()> {
    let titles: Vec<&str> = recommendations.iter().map(|r| r.title.as_str()).collect();
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    write!(
        file,
        "\nUser liked: {}\nRecommended: {}\n",
        title,
        titles.join(", ")
    )
    .with_context(|| format!("Failed to write log file {}", path.display()))?;
    Ok(())
}

fn print_header(text: &str) {
    println!("{}", text.bold().blue());
}

fn print_not_found(err: &RankingError) {
    println!("{} {}", "✗".red(), err);
    let suggestions = err.suggestions();
    if !suggestions.is_empty() {
        println!("Did you mean:");
        for suggestion in suggestions {
            println!("  - {}", suggestion);
        }
    }
}

/// Helper function to format and print recommendations
fn print_recommendations(recommendations: &[MovieRecommendation], score_label: &str) {
    for (rank, movie) in recommendations.iter().enumerate() {
        println!(
            "{}. {} [{}] rated {:.1} - {}: {:.3}",
            (rank + 1).to_string().green(),
            movie.title.bold(),
            movie.genres.join(", "),
            movie.vote_average,
            score_label,
            movie.score
        );
    }
}

/// Print the metadata card and trailer link for one title
async fn print_details(engine: &RecommendationEngine, title: &str) {
    let (record, trailer) = engine.details(title).await;

    println!();
    println!("{}", title.bold().blue());
    println!("{}Year: {}", "• ".green(), record.year);
    println!("{}Runtime: {}", "• ".green(), record.runtime);
    println!("{}Genre: {}", "• ".green(), record.genre);
    println!("{}Rating: {}", "• ".green(), record.rating);
    println!("{}Director: {}", "• ".green(), record.director);
    println!("{}Cast: {}", "• ".green(), record.actors);
    println!("{}Poster: {}", "• ".green(), record.poster);
    println!("{}Plot: {}", "• ".cyan(), record.plot);
    match trailer {
        Some(trailer) => println!("{}Trailer: {}", "• ".cyan(), trailer.watch_url()),
        None => println!("{}Trailer not available", "• ".cyan()),
    }
}
