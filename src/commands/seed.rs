use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use wikiseed::{
    chunking::ChunkSplitter,
    config::Config,
    dump::WikimediaSource,
    embedding::{Embedder, HttpEmbedder},
    pipeline::SeedPipeline,
    store::QdrantStore,
};

pub async fn seed_dump(
    mut config: Config,
    path: PathBuf,
    collection: Option<String>,
    concurrency: Option<usize>,
    max_articles: Option<usize>,
    quiet: bool,
) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("Dump file not found: {}", path.display());
    }

    // Apply CLI overrides, then re-validate the merged configuration
    if let Some(collection) = collection {
        config.store.collection = collection;
    }
    if let Some(concurrency) = concurrency {
        config.pipeline.concurrency = concurrency;
    }
    if max_articles.is_some() {
        config.pipeline.max_articles = max_articles;
    }
    config.validate()?;

    let embedder = Arc::new(
        HttpEmbedder::new(config.embedding.clone())
            .context("Failed to initialize embedding client")?,
    );
    let store = Arc::new(
        QdrantStore::new(config.store.clone()).context("Failed to initialize Qdrant client")?,
    );
    store
        .ensure_collection(embedder.dimensions())
        .await
        .with_context(|| format!("Failed to ensure collection '{}'", store.collection()))?;

    let source = WikimediaSource::open(&path)
        .with_context(|| format!("Failed to open dump: {}", path.display()))?;
    info!("seeding from: {}", source.source_name());

    let pipeline = SeedPipeline::new(
        embedder,
        store,
        ChunkSplitter::new(config.chunking.clone()),
        config.pipeline.clone(),
    );
    let report = pipeline.run(source).await.context("Seed run failed")?;

    if !quiet {
        println!("\nSeed Complete!");
        println!("==============");
        println!("Articles processed: {}", report.articles_seen);
        println!("Chunks dispatched:  {}", report.chunks_dispatched);
        println!("Chunks stored:      {}", report.chunks_stored);
        println!("Chunk failures:     {}", report.chunk_failures);
        println!(
            "Processing rate:    {:.1} articles/sec",
            report.articles_per_second()
        );
        println!("Elapsed time:       {:.1}s", report.elapsed_seconds);
    }

    Ok(())
}
