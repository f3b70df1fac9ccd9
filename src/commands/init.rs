use anyhow::Result;
use std::path::PathBuf;
use wikiseed::config::Config;

pub async fn init_config(path: PathBuf) -> Result<()> {
    let config = Config::default();
    let config_path = path.join("wikiseed.toml");

    let toml_content = format!(
        r#"# wikiseed configuration

[embedding]
endpoint = "{}"
model = "{}"
dimensions = {}
# api_key defaults to the OPENAI_API_KEY environment variable

[store]
url = "{}"
collection = "{}"

[chunking]
max_chunk_chars = {}

[pipeline]
concurrency = {}
progress_interval = {}

[logging]
level = "info"
"#,
        config.embedding.endpoint,
        config.embedding.model,
        config.embedding.dimensions,
        config.store.url,
        config.store.collection,
        config.chunking.max_chunk_chars,
        config.pipeline.concurrency,
        config.pipeline.progress_interval,
    );

    std::fs::write(&config_path, toml_content)?;
    println!("Created configuration file: {}", config_path.display());

    Ok(())
}
