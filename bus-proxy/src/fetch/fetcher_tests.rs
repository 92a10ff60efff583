//! Unit tests for the online-first fetch strategy.

use super::*;
use crate::test_support::{Reply, ScriptedTransport, at, dataset};

fn fetcher(transport: ScriptedTransport) -> DualSourceFetcher<ScriptedTransport> {
    DualSourceFetcher::new(transport, StopConfig::default())
}

fn lines(result: &FetchResult) -> Vec<&str> {
    result.rows.iter().map(|r| r.line()).collect()
}

#[tokio::test]
async fn online_rows_are_used_when_present() {
    let transport = ScriptedTransport::new()
        .reply(
            ONLINE_OPERATION,
            Reply::Text(dataset(&[("527", "1", "16.10.26 10:05", "Nitra")])),
        )
        .reply(
            OFFLINE_OPERATION,
            Reply::Text(dataset(&[("601", "1", "16.10.26 10:10", "Trnava")])),
        );
    let f = fetcher(transport);

    let result = f.fetch_at("1", 8, at(2026, 10, 16, 10, 0)).await;

    assert_eq!(result.source, Source::Online);
    assert_eq!(lines(&result), vec!["527"]);
    // The offline query is never issued.
    assert_eq!(f.transport().operations(), vec![ONLINE_OPERATION]);
}

#[tokio::test]
async fn online_transport_error_falls_back_to_offline() {
    let transport = ScriptedTransport::new()
        .reply(ONLINE_OPERATION, Reply::Status(500))
        .reply(
            OFFLINE_OPERATION,
            Reply::Text(dataset(&[
                ("525", "1", "16.10.26 10:20", "Trnava"),
                ("527", "1", "16.10.26 10:05", "Nitra"),
            ])),
        );
    let f = fetcher(transport);

    let result = f.fetch_at("1", 8, at(2026, 10, 16, 10, 0)).await;

    assert_eq!(result.source, Source::Offline);
    assert_eq!(lines(&result), vec!["527", "525"]);
    assert_eq!(
        f.transport().operations(),
        vec![ONLINE_OPERATION, OFFLINE_OPERATION]
    );
}

#[tokio::test]
async fn empty_online_dataset_is_not_trusted() {
    let transport = ScriptedTransport::new()
        .reply(ONLINE_OPERATION, Reply::Text("<DS/>".to_string()))
        .reply(
            OFFLINE_OPERATION,
            Reply::Text(dataset(&[("601", "2", "16.10.26 11:00", "Trnava")])),
        );
    let f = fetcher(transport);

    let result = f.fetch_at("2", 8, at(2026, 10, 16, 10, 0)).await;

    assert_eq!(result.source, Source::Offline);
    assert_eq!(lines(&result), vec!["601"]);
}

#[tokio::test]
async fn empty_online_and_empty_offline_is_an_empty_offline_result() {
    let transport = ScriptedTransport::new()
        .reply(ONLINE_OPERATION, Reply::Text("<DS/>".to_string()))
        .reply(OFFLINE_OPERATION, Reply::Text("<DS/>".to_string()));

    let result = fetcher(transport)
        .fetch_at("1", 8, at(2026, 10, 16, 10, 0))
        .await;

    assert_eq!(result.source, Source::Offline);
    assert!(result.rows.is_empty());
}

#[tokio::test]
async fn online_rows_that_all_fail_validation_trigger_fallback() {
    let transport = ScriptedTransport::new()
        .reply(
            ONLINE_OPERATION,
            Reply::Text(dataset(&[("527", "1", "garbage", "Nitra")])),
        )
        .reply(
            OFFLINE_OPERATION,
            Reply::Text(dataset(&[("527", "1", "16.10.26 10:05", "Nitra")])),
        );

    let result = fetcher(transport)
        .fetch_at("1", 8, at(2026, 10, 16, 10, 0))
        .await;

    assert_eq!(result.source, Source::Offline);
    assert_eq!(result.rows.len(), 1);
}

#[tokio::test]
async fn online_unparseable_row_is_dropped() {
    let transport = ScriptedTransport::new().reply(
        ONLINE_OPERATION,
        Reply::Text(dataset(&[
            ("527", "1", "not a time", "Nitra"),
            ("525", "1", "16.10.26 14:30", "Trnava"),
        ])),
    );
    let f = fetcher(transport);

    let result = f.fetch_at("1", 8, at(2026, 10, 16, 10, 0)).await;

    assert_eq!(result.source, Source::Online);
    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0].scheduled_at(), at(2026, 10, 16, 14, 30));
}

#[tokio::test]
async fn both_sources_failing_is_an_empty_offline_result() {
    let transport = ScriptedTransport::new()
        .reply(ONLINE_OPERATION, Reply::Shape)
        .reply(OFFLINE_OPERATION, Reply::Status(503));
    let f = fetcher(transport);

    let result = f.fetch_at("1", 8, at(2026, 10, 16, 10, 0)).await;

    assert_eq!(result.source, Source::Offline);
    assert!(result.rows.is_empty());
    // Nothing is retried.
    assert_eq!(
        f.transport().operations(),
        vec![ONLINE_OPERATION, OFFLINE_OPERATION]
    );
}

#[tokio::test]
async fn garbage_online_payload_falls_back() {
    let transport = ScriptedTransport::new()
        .reply(ONLINE_OPERATION, Reply::Text("Chyba servera".to_string()))
        .reply(
            OFFLINE_OPERATION,
            Reply::Text(dataset(&[("527", "1", "16.10.26 10:05", "Nitra")])),
        );

    let result = fetcher(transport)
        .fetch_at("1", 8, at(2026, 10, 16, 10, 0))
        .await;

    assert_eq!(result.source, Source::Offline);
    assert_eq!(result.rows.len(), 1);
}

#[tokio::test]
async fn requests_carry_platform_count_and_window() {
    let transport = ScriptedTransport::new().reply(ONLINE_OPERATION, Reply::Status(500));
    let f = fetcher(transport);

    f.fetch_at("1;2", 12, at(2026, 10, 16, 10, 0)).await;

    let online = f.transport().params_of(ONLINE_OPERATION).unwrap();
    assert_eq!(online.get("platformNumbers"), Some("1;2"));
    assert_eq!(online.get("count"), Some("12"));
    assert_eq!(online.get("getArrivals"), Some("false"));
    assert_eq!(online.get("orderByDelay"), Some("true"));
    assert_eq!(online.get("snr"), Some("22304001"));

    let offline = f.transport().params_of(OFFLINE_OPERATION).unwrap();
    assert_eq!(offline.get("Count"), Some("12"));
    assert_eq!(offline.get("dateFrom"), Some("2026-10-16T10:00:00"));
    assert_eq!(offline.get("dateTo"), Some("2026-10-16T12:00:00"));
}

#[tokio::test]
async fn probe_reports_both_sources() {
    let transport = ScriptedTransport::new()
        .reply(ONLINE_OPERATION, Reply::Status(500))
        .reply(
            OFFLINE_OPERATION,
            Reply::Text(dataset(&[
                ("527", "1", "16.10.26 10:05", "Nitra"),
                ("527", "1", "bad", "Nitra"),
            ])),
        );
    let f = fetcher(transport);

    let (online, offline) = f.probe_at("1", 8, at(2026, 10, 16, 10, 0)).await;

    assert!(matches!(online, SourceProbe::Failed { error } if error.contains("HTTP 500")));
    match offline {
        SourceProbe::Answered {
            has_dataset,
            rows,
            peek,
        } => {
            assert!(has_dataset);
            assert_eq!(rows, 1);
            assert!(peek.starts_with("<DS>"));
        }
        other => panic!("expected an answer, got {other:?}"),
    }
}
