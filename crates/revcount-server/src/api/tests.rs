use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use revcount_scraper::{
    ExtractionOrchestrator, MarkupDateScanner, ReviewPageClient, StructuredDateQuery,
};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

const PLACE_ID: &str = "1688300738";
const REVIEW_PATH: &str = "/restaurant/1688300738/review/visitor";
const REVIEW_PAGE: &str = r#"<ul id="_review_list">
  <li><time>8.8.금</time></li>
  <li><time>8.8.금</time></li>
  <li><time>8월 8일</time></li>
  <li><time>9.1</time></li>
  <li><time>not-a-date</time></li>
</ul>"#;

fn app_for(server: &MockServer) -> Router {
    let client = ReviewPageClient::new(&server.uri(), 5, "revcount-test/0.1").expect("client");
    let orchestrator = ExtractionOrchestrator::new(
        client,
        vec![Box::new(MarkupDateScanner), Box::new(StructuredDateQuery)],
        Duration::from_secs(10),
    );
    build_app(AppState {
        orchestrator: Arc::new(orchestrator),
        started_at: Instant::now(),
    })
}

async fn serving(status: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(REVIEW_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;
    server
}

async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response")
}

async fn json_body(response: Response) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json parse")
}

#[tokio::test]
async fn health_reports_ok_with_request_id() {
    let server = MockServer::start().await;
    let response = get(app_for(&server), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let json = json_body(response).await;
    assert_eq!(json["status"], "OK");
    assert_eq!(json["service"], "revcount");
    assert!(json["uptime"].as_f64().is_some());
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn caller_request_id_is_echoed() {
    let server = MockServer::start().await;
    let response = app_for(&server)
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "trace-me")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(
        response.headers().get("x-request-id").map(|v| v.as_bytes()),
        Some("trace-me".as_bytes())
    );
}

#[tokio::test]
async fn index_lists_endpoints_and_strategies() {
    let server = MockServer::start().await;
    let json = json_body(get(app_for(&server), "/").await).await;

    assert_eq!(json["service"], "revcount");
    assert_eq!(
        json["strategies"],
        serde_json::json!(["time_tag_extraction", "cheerio_css_selector"])
    );
    assert!(json["endpoints"].as_array().is_some_and(|e| e.len() == 5));
}

#[tokio::test]
async fn count_returns_success_payload() {
    let server = serving(200, REVIEW_PAGE).await;
    let response = get(app_for(&server), &format!("/api/reviews/{PLACE_ID}/count")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["placeId"], PLACE_ID);
    assert_eq!(json["dateCounts"], serde_json::json!({"8.8": 3, "9.1": 1}));
    assert_eq!(json["totalReviews"], 4);
    assert!(json["extractedAt"].is_string());
}

#[tokio::test]
async fn count_maps_upstream_failure_to_500() {
    let server = serving(503, "").await;
    let response = get(app_for(&server), &format!("/api/reviews/{PLACE_ID}/count")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["placeId"], PLACE_ID);
    assert!(json["error"].as_str().is_some_and(|e| e.contains("503")));
    assert!(json.get("dateCounts").is_none());
}

#[tokio::test]
async fn count_for_date_reports_target_and_count() {
    let server = serving(200, REVIEW_PAGE).await;
    let response = get(
        app_for(&server),
        &format!("/api/reviews/{PLACE_ID}/count/08.08"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["targetDate"], "8.8");
    assert_eq!(json["count"], 3);
    assert!(json["url"].as_str().is_some_and(|u| u.ends_with("?reviewSort=recent")));
}

#[tokio::test]
async fn count_for_date_rejects_malformed_date() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(REVIEW_PAGE))
        .expect(0)
        .mount(&server)
        .await;

    let response = get(
        app_for(&server),
        &format!("/api/reviews/{PLACE_ID}/count/13.40"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().is_some_and(|e| e.contains("13.40")));
}

#[tokio::test]
async fn bare_count_returns_integer_and_zero_for_missing() {
    let server = serving(200, REVIEW_PAGE).await;

    let present = json_body(get(app_for(&server), &format!("/{PLACE_ID}/9.1")).await).await;
    assert_eq!(present, serde_json::json!(1));

    let missing = json_body(get(app_for(&server), &format!("/{PLACE_ID}/12.25")).await).await;
    assert_eq!(missing, serde_json::json!(0));
}

#[tokio::test]
async fn dates_lists_raw_tokens() {
    let server = serving(200, REVIEW_PAGE).await;
    let response = get(app_for(&server), &format!("/api/reviews/{PLACE_ID}/dates")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["count"], 5);
    assert_eq!(json["dates"][2], "8월 8일");
    assert_eq!(json["method"], "time_tag_extraction");
}

#[tokio::test]
async fn dates_without_any_dates_is_500() {
    let server = serving(200, "<p>no reviews</p>").await;
    let response = get(app_for(&server), &format!("/api/reviews/{PLACE_ID}/dates")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(response).await;
    assert_eq!(json["success"], false);
    assert!(json["error"]
        .as_str()
        .is_some_and(|e| e.starts_with("no review dates found")));
}
