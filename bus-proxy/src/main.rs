use std::net::SocketAddr;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bus_proxy::config::ServerConfig;
use bus_proxy::soap::{MockTransport, SoapClient, SoapTransport};
use bus_proxy::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    let config = ServerConfig::from_env();

    let debug = config.as_ref().is_ok_and(|c| c.debug);
    let default_filter = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match config.mock_dir.clone() {
        Some(dir) => match MockTransport::new(&dir) {
            Ok(mock) => {
                info!(dir = %dir.display(), operations = ?mock.operations(), "using mock responses");
                serve(mock, config).await
            }
            Err(e) => Err(e.to_string()),
        },
        None => match SoapClient::new(config.soap.clone()) {
            Ok(client) => {
                info!(endpoint = client.base_url(), version = %config.soap.version, "using TableData service");
                serve(client, config).await
            }
            Err(e) => Err(e.to_string()),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("{message}");
            ExitCode::FAILURE
        }
    }
}

async fn serve<T: SoapTransport + 'static>(transport: T, config: ServerConfig) -> Result<(), String> {
    info!(
        bus_stop_id = config.stop.bus_stop_id,
        snr = config.stop.snr,
        time_zone = %config.stop.time_zone,
        "serving stop"
    );

    let app = create_router(AppState::new(transport, config.stop));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("failed to bind {addr}: {e}"))?;
    info!("Bus proxy listening on http://{addr}");
    info!("  GET /api/stop-times?platform=1&count=8");
    info!("  GET /api/health");
    info!("  GET /api/debug?platform=1");

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("server error: {e}"))
}
