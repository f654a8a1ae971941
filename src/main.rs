use mimalloc::MiMalloc;
use tablecast::{TablecastState, config::CONFIG, service, tablecast_router, utils::logging};
use tokio::net::TcpListener;
use tracing::info;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = &*CONFIG;
    logging::init(&cfg.basic.loglevel);
    info!(
        addr = %cfg.basic.socket_addr(),
        loglevel = %cfg.basic.loglevel,
        observer_queue_capacity = cfg.sync.observer_queue_capacity,
        keep_alive_secs = cfg.sync.keep_alive_secs,
        "Configuration loaded"
    );

    let store = service::spawn(cfg.sync.observer_queue_capacity).await;
    let app = tablecast_router(TablecastState::new(store.clone(), &cfg.sync));

    let listener = TcpListener::bind(cfg.basic.socket_addr()).await?;
    info!(addr = %listener.local_addr()?, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.stop();
    info!("Shut down");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        tokio::select! {
            res = tokio::signal::ctrl_c() => res.expect("failed to listen for Ctrl+C"),
            _ = term.recv() => {}
        }
    }
    #[cfg(not(unix))]
    tokio::signal::ctrl_c()
        .await
        .expect("failed to listen for Ctrl+C");
    info!("Shutdown signal received");
}
