use data_loader::Corpus;
use std::path::Path;
use std::time::Instant;

fn main() {
    let path = Path::new("tmdb_5000_movies.csv");

    println!("Loading TMDB catalog...\n");

    let start = Instant::now();
    let corpus = Corpus::load_from_csv(path)
        .expect("Failed to load catalog");
    let elapsed = start.elapsed();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Movies: {}", corpus.len());
    println!("Genres: {}", corpus.all_genres().len());
    println!("\nPerformance: {:.0} rows/second",
             corpus.len() as f64 / elapsed.as_secs_f64());
}
