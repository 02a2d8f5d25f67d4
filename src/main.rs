use finrag::config::Settings;
use finrag::infrastructure::AppContainer;
use finrag::presentation::http::{HttpServer, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let settings = Settings::from_env()?;

    // RUST_LOG, when set, takes precedence over LOG_LEVEL.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&settings.log_level))
        .init();

    tracing::info!(
        "Starting finrag {} (upload dir {}, vector store {})",
        env!("CARGO_PKG_VERSION"),
        settings.upload_dir.display(),
        settings.vector_store_dir.display()
    );

    let container = AppContainer::new(&settings).await?;
    let server = HttpServer::from_container(&container, ServerConfig::from(&settings));

    server.run().await
}
