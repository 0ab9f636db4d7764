use guessbound::{GuessboundServer, WordListPaths, WordSource};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let words = WordSource::load(&WordListPaths::default());
    let (standard, easy, difficult) = words.counts();
    tracing::info!(standard, easy, difficult, "word pools loaded");

    let server = GuessboundServer::builder()
        .bind("0.0.0.0:3000")
        .words(words)
        .build()
        .await?;

    server.run().await?;
    Ok(())
}
