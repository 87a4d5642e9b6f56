use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use ephemera::application::ports::ArtifactStore;
use ephemera::application::services::{
    ArtifactLifecycle, Janitor, SearchCache, SearchService, StreamingResponder,
};
use ephemera::infrastructure::observability::{TracingConfig, init_tracing};
use ephemera::infrastructure::providers::{
    FluxImageGenerator, GeminiChatClient, GoogleTtsClient, GrokChatClient, NsfwApiClient,
    PollinationsImageGenerator, StabilityImageGenerator, YtDlpClient,
};
use ephemera::infrastructure::storage::LocalArtifactStore;
use ephemera::presentation::{AppState, Environment, RequestTimeouts, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    let json_format = settings.logging.enable_json
        || std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    init_tracing(&TracingConfig::new(
        environment.as_str(),
        settings.logging.level.clone(),
        json_format,
    ))
    .context("Failed to initialize tracing")?;

    let store = Arc::new(
        LocalArtifactStore::new(
            settings.storage.working_dir.clone(),
            settings.storage.max_size_bytes(),
            settings.storage.delete_retry_delay(),
        )
        .with_context(|| {
            format!(
                "Failed to prepare working directory {}",
                settings.storage.working_dir.display()
            )
        })?,
    );
    tracing::info!(
        working_dir = %store.working_dir().display(),
        max_size_mb = settings.storage.max_size_mb,
        delete_retry_ms = settings.storage.delete_retry_delay_ms,
        janitor_interval_secs = settings.janitor.interval().as_secs(),
        janitor_max_age_secs = settings.janitor.max_age_secs,
        "Artifact store ready"
    );
    if settings.storage.wipe_on_startup {
        let removed = store.wipe().await.context("Failed to wipe working directory")?;
        tracing::info!(removed, "Working directory wiped");
    }
    let store: Arc<dyn ArtifactStore> = store;

    let state = build_state(&settings, Arc::clone(&store));

    let shutdown = CancellationToken::new();
    let janitor = Janitor::new(
        Arc::clone(&store),
        settings.janitor.interval(),
        settings.janitor.max_age(),
    )
    .spawn(shutdown.child_token());

    let router = create_router(state);

    let ip = settings
        .server
        .host
        .parse::<std::net::IpAddr>()
        .with_context(|| format!("Invalid server host {}", settings.server.host))?;
    let addr = SocketAddr::new(ip, settings.server.port);
    tracing::info!(
        %addr,
        working_dir = %store.working_dir().display(),
        "Listening"
    );

    let listener = TcpListener::bind(addr).await?;
    let signal = shutdown.clone();
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutdown signal received");
            signal.cancel();
        })
        .await?;

    shutdown.cancel();
    if let Err(e) = janitor.await {
        tracing::error!(error = %e, "Janitor task panicked");
    }

    Ok(())
}

fn build_state(settings: &Settings, store: Arc<dyn ArtifactStore>) -> AppState {
    let providers = &settings.providers;
    let secs = Duration::from_secs;

    let yt_dlp = Arc::new(YtDlpClient::new(
        providers.yt_dlp_binary.clone(),
        providers.cookies_file.clone(),
        secs(providers.download_timeout_secs),
        secs(providers.search_timeout_secs),
    ));
    let search = SearchService::new(
        yt_dlp.clone(),
        SearchCache::new(providers.search_cache_capacity),
        secs(providers.search_timeout_secs),
    );

    AppState {
        lifecycle: Arc::new(ArtifactLifecycle::new(Arc::clone(&store))),
        responder: Arc::new(StreamingResponder::new(
            store,
            settings.streaming.chunk_size_bytes,
            settings.streaming.cleanup_grace(),
        )),
        search: Arc::new(search),
        downloader: yt_dlp,
        flux: Arc::new(FluxImageGenerator::new(
            providers.flux_api_key.clone(),
            providers.flux_base_url.clone(),
            secs(providers.flux_timeout_secs),
            secs(providers.flux_download_timeout_secs),
        )),
        stability: Arc::new(StabilityImageGenerator::new(
            providers.stability_api_key.clone(),
            providers.stability_base_url.clone(),
            secs(providers.stability_timeout_secs),
        )),
        pollinations: Arc::new(PollinationsImageGenerator::new(
            providers.pollinations_base_url.clone(),
            secs(providers.pollinations_timeout_secs),
        )),
        tts: Arc::new(GoogleTtsClient::new(
            providers.tts_base_url.clone(),
            secs(providers.tts_timeout_secs),
        )),
        grok: Arc::new(GrokChatClient::new(
            providers.grok_api_key.clone(),
            providers.grok_base_url.clone(),
            providers.grok_model.clone(),
            secs(providers.grok_timeout_secs),
        )),
        gemini: Arc::new(GeminiChatClient::new(
            providers.gemini_api_key.clone(),
            providers.gemini_base_url.clone(),
            providers.gemini_model.clone(),
            secs(providers.gemini_timeout_secs),
        )),
        nsfw: Arc::new(NsfwApiClient::new(
            providers.nsfw_api_key.clone(),
            providers.nsfw_endpoint.clone(),
            secs(providers.nsfw_timeout_secs),
        )),
        timeouts: RequestTimeouts::from_settings(providers),
        default_language: providers.tts_default_language.clone(),
    }
}
