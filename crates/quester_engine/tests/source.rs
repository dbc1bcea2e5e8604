use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use quester_engine::{
    BatchOrigin, FetchFailure, FetchSettings, QuerySource, ReqwestTrendsFetcher, TrendsFetcher,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source_for(base_url: String) -> QuerySource {
    let settings = FetchSettings {
        base_url,
        ..FetchSettings::default()
    };
    QuerySource::new(Arc::new(ReqwestTrendsFetcher::new(settings)))
        .with_clock(Arc::new(|| 1_700_000_000_000))
}

async fn serve(body: serde_json::Value, max: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/trends"))
        .and(query_param("max", max))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn wrapped_pairs_become_flat_batch() {
    let server = serve(
        serde_json::json!({
            "terms": [["q1", 0.9], ["q2", 0.5], ["q3", 0.4], ["q4", 0.3], ["q5", 0.1]]
        }),
        "5",
    )
    .await;

    let outcome = source_for(server.uri()).request_batch(5).await;
    assert_eq!(outcome.origin, BatchOrigin::Remote);
    assert_eq!(outcome.queries, vec!["q1", "q2", "q3", "q4", "q5"]);
}

#[tokio::test]
async fn flat_list_is_truncated_not_padded() {
    let server = serve(serde_json::json!(["a", "b", "c", "d"]), "2").await;
    let outcome = source_for(server.uri()).request_batch(2).await;
    assert_eq!(outcome.queries, vec!["a", "b"]);

    let server = serve(serde_json::json!(["a", "b"]), "6").await;
    let outcome = source_for(server.uri()).request_batch(6).await;
    assert_eq!(outcome.origin, BatchOrigin::Remote);
    assert_eq!(outcome.queries, vec!["a", "b"]);
}

#[tokio::test]
async fn nested_field_is_preferred() {
    let server = serve(
        serde_json::json!({ "nested": [["n1", 3], ["n2", 2]], "terms": ["t1"] }),
        "3",
    )
    .await;
    let outcome = source_for(server.uri()).request_batch(3).await;
    assert_eq!(outcome.queries, vec!["n1", "n2"]);
}

#[tokio::test]
async fn http_error_falls_back_to_synthetic_batch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/trends"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let outcome = source_for(server.uri()).request_batch(3).await;
    assert_eq!(
        outcome.origin,
        BatchOrigin::Fallback(FetchFailure::HttpStatus(503))
    );
    assert_eq!(
        outcome.queries,
        vec![
            "Unique query 1 for rewards 1700000000000",
            "Unique query 2 for rewards 1700000000000",
            "Unique query 3 for rewards 1700000000000",
        ]
    );
}

#[tokio::test]
async fn malformed_body_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/trends"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let outcome = source_for(server.uri()).request_batch(4).await;
    assert!(matches!(
        outcome.origin,
        BatchOrigin::Fallback(FetchFailure::MalformedPayload(_))
    ));
    assert_eq!(outcome.queries.len(), 4);
}

#[tokio::test]
async fn unreachable_backend_yields_distinct_fallback() {
    let outcome = source_for("http://127.0.0.1:1".to_string())
        .request_batch(30)
        .await;

    assert!(matches!(outcome.origin, BatchOrigin::Fallback(_)));
    assert_eq!(outcome.queries.len(), 30);
    let unique: HashSet<_> = outcome.queries.iter().collect();
    assert_eq!(unique.len(), 30);
}

#[tokio::test]
async fn fetcher_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/trends"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("[]"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let err = ReqwestTrendsFetcher::new(settings)
        .fetch_terms(1)
        .await
        .unwrap_err();
    assert_eq!(err, FetchFailure::Timeout);
}

#[tokio::test]
async fn fetcher_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/trends"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "application/json")
                .set_body_string(r#"["0123456789"]"#),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        base_url: server.uri(),
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let err = ReqwestTrendsFetcher::new(settings)
        .fetch_terms(1)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        FetchFailure::TooLarge {
            max_bytes: 10,
            actual: Some(14)
        }
    );
}

#[tokio::test]
async fn base_url_trailing_slash_is_tolerated() {
    let server = serve(serde_json::json!(["x"]), "1").await;
    let outcome = source_for(format!("{}/", server.uri()))
        .request_batch(1)
        .await;
    assert_eq!(outcome.queries, vec!["x"]);
}
