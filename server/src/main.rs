mod config;

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tracing::info;
use uuid::Uuid;

use adapters::web::{AppState, DemoMatchmaker, Player, by_rating, router, within_rating_spread};
use adapters::{JsonFileQueueStore, MatchLog};
use application::ports::in_::Matchmaker;

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ServerConfig::from_env()?;
    let matches = Arc::new(MatchLog::<Player>::new(config.match_history));
    let matchmaker = Arc::new(build_matchmaker(&config, Arc::clone(&matches))?);
    let scan = matchmaker.config();
    info!(
        min_match_size = scan.min_match_size,
        max_match_size = scan.max_match_size,
        max_rating_spread = config.max_rating_spread,
        "Matchmaker configured"
    );
    matchmaker.start()?;

    let app = router(Arc::new(AppState::new(Arc::clone(&matchmaker), matches))).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    info!(bind = %config.bind, "Server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    matchmaker.stop().await;
    info!("Server shut down");
    Ok(())
}

fn build_matchmaker(
    config: &ServerConfig,
    matches: Arc<MatchLog<Player>>,
) -> Result<DemoMatchmaker, Box<dyn std::error::Error>> {
    let mut builder = Matchmaker::<Player, Uuid>::builder()
        .resolver(move |group| {
            matches.record(group);
        })
        .key(|player: &Player| player.id)
        .scan_interval(config.scan_interval)
        .min_match_size(config.min_match_size)
        .max_match_size(config.max_match_size)
        .ordering(by_rating)
        .compatibility(within_rating_spread(config.max_rating_spread));

    if let Some(path) = &config.queue_file {
        info!(path = %path.display(), "Queue backed by file");
        builder = builder.store(Arc::new(JsonFileQueueStore::<Player>::new(path)));
    }
    Ok(builder.build()?)
}
