use dexfeed_server::api::app_router;
use dexfeed_server::config::Config;
use dexfeed_server::{build_state, init_tracing, start_background_jobs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let config = Config::from_env();
    let state = build_state(&config).await?;

    // Scheduler jobs and change watcher run for the life of the process
    let _jobs = start_background_jobs(&state);

    let router = app_router(state, &config);
    tracing::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
