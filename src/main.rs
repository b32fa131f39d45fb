use tracing_subscriber::EnvFilter;

use zinchat::adapters::{RelayServer, ServerError};
use zinchat::config::{AppConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let config = load_config()?;
    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    tracing::info!(
        port = config.server.port,
        telemetry_interval_secs = config.telemetry.interval_secs,
        echo_to_sender = config.relay.echo_to_sender,
        "Starting ZinChat relay"
    );

    let result = RelayServer::new(config)?.run(shutdown_signal()).await;
    if let Err(e) = &result {
        tracing::error!("{}", e);
    }
    result
}

/// Load configuration and install the subscriber it describes.
///
/// A load failure still gets logged, through a subscriber built from the
/// default server settings.
fn load_config() -> Result<AppConfig, ServerError> {
    match AppConfig::load() {
        Ok(config) => {
            init_tracing(&config.server);
            Ok(config)
        }
        Err(e) => {
            init_tracing(&ServerConfig::default());
            tracing::error!("Failed to load configuration: {}", e);
            Err(e.into())
        }
    }
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    // A subscriber may already be installed (tests); keep the first one.
    let _ = if server.log_json {
        tracing_subscriber::fmt().with_env_filter(filter).json().try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl+c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
