//! Print the next departures for each platform of the stop.
//!
//! Talks to a running proxy; see `API_URL`, `ROUTES_FILE`,
//! `BOARD_PLATFORMS` and `STOP_TIME_ZONE`.

use std::process::ExitCode;

use chrono::Utc;
use chrono_tz::Tz;
use futures::future::join_all;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use bus_proxy::board::fetch_platform;
use bus_proxy::route_names::RouteNames;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8787/api/stop-times";
const DEFAULT_ROUTES_FILE: &str = "routes.json";
const DEFAULT_PLATFORMS: &str = "1,2";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let api_url = std::env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    let routes_file =
        std::env::var("ROUTES_FILE").unwrap_or_else(|_| DEFAULT_ROUTES_FILE.to_string());
    let platforms: Vec<String> = std::env::var("BOARD_PLATFORMS")
        .unwrap_or_else(|_| DEFAULT_PLATFORMS.to_string())
        .split(',')
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();
    let tz = match std::env::var("STOP_TIME_ZONE") {
        Ok(name) => name.parse::<Tz>().unwrap_or_else(|e| {
            warn!(%name, error = %e, "unknown time zone, using Europe/Bratislava");
            chrono_tz::Europe::Bratislava
        }),
        Err(_) => chrono_tz::Europe::Bratislava,
    };

    let routes = RouteNames::load_or_empty(&routes_file);
    let client = reqwest::Client::new();

    let boards = join_all(
        platforms
            .iter()
            .map(|p| fetch_platform(&client, &api_url, p, tz)),
    )
    .await;

    let now = Utc::now().with_timezone(&tz);
    let mut failed = false;
    for (platform, board) in platforms.iter().zip(boards) {
        println!();
        match board {
            Ok(board) => print!("{}", board.render(&routes, now)),
            Err(e) => {
                failed = true;
                eprintln!("Platform {platform}: {e}");
                eprintln!("Try the API: curl '{api_url}?platform={platform}'");
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
