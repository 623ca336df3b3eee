use std::sync::Arc;

use devfolio_core::{
    core::{assets::MemoryAssets, identity::MemoryIdentity, mail::MemoryMail, memory::MemoryStore},
    init_openapi_route,
    repository::portfolio::RetryPolicy,
    settings::get_config,
    AppState,
};
use poem::listener::TcpListener;
use tracing::Level;

#[tokio::main]
async fn main() {
    let log_level = Level::DEBUG;
    // Logging to File
    let file_appender = tracing_appender::rolling::daily("./logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(log_level)
        .init();

    let config = get_config();
    tracing::info!("run with config: {:?}", config);

    // Init collaborator handles
    tracing::info!("Init in-memory document store, identity, assets and mail");
    let app_state = Arc::new(AppState {
        store: Arc::new(MemoryStore::new()),
        identity: Arc::new(MemoryIdentity::new()),
        assets: Arc::new(MemoryAssets::new()),
        mail: Arc::new(MemoryMail::new()),
        retry: RetryPolicy::from_config(&config),
    });

    let app = init_openapi_route(app_state.clone(), &config);
    tracing::info!("run server on {}:{}", config.host, config.port);
    poem::Server::new(TcpListener::bind(format!(
        "{}:{}",
        config.host, config.port
    )))
    .run(app)
    .await
    .unwrap()
}
