//! End-to-end check of a running revcount server.
//!
//! Hits each public endpoint once, in the order a client would, and records
//! whether it answered 2xx with the expected JSON shape.

use std::time::Duration;

use serde_json::Value;

/// Place used when none is given on the command line.
pub const DEFAULT_PLACE_ID: &str = "1688300738";

/// Rendered extractions can take well over a minute.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

#[derive(Debug)]
pub struct Check {
    pub label: &'static str,
    pub path: String,
    pub outcome: Result<String, String>,
}

#[derive(Debug, Default)]
pub struct SmokeReport {
    checks: Vec<Check>,
}

impl SmokeReport {
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    pub fn total(&self) -> usize {
        self.checks.len()
    }

    pub fn failed(&self) -> usize {
        self.checks.iter().filter(|c| c.outcome.is_err()).count()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    pub fn print(&self) {
        for check in self.checks() {
            match &check.outcome {
                Ok(summary) => println!("PASS  {:<12} {}  {summary}", check.label, check.path),
                Err(reason) => println!("FAIL  {:<12} {}  {reason}", check.label, check.path),
            }
        }
        println!(
            "{} passed, {} failed",
            self.total() - self.failed(),
            self.failed()
        );
    }
}

/// Runs every check against `base_url`. Individual endpoint failures are
/// recorded in the report, not returned as errors.
///
/// # Errors
///
/// Returns an error only if the HTTP client cannot be built.
pub async fn run(base_url: &str, place_id: &str) -> anyhow::Result<SmokeReport> {
    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?;
    let base_url = base_url.trim_end_matches('/');

    let plan: [(&'static str, String, fn(&Value) -> Result<String, String>); 5] = [
        ("health", "/health".to_owned(), expect_health),
        ("index", "/".to_owned(), expect_index),
        (
            "dates",
            format!("/api/reviews/{place_id}/dates"),
            |json| expect_success(json, "count"),
        ),
        (
            "count",
            format!("/api/reviews/{place_id}/count"),
            |json| expect_success(json, "totalReviews"),
        ),
        (
            "count/8.8",
            format!("/api/reviews/{place_id}/count/8.8"),
            |json| expect_success(json, "count"),
        ),
    ];

    let mut report = SmokeReport::default();
    for (label, path, validate) in plan {
        tracing::info!(label, path = %path, "smoke check");
        let outcome = fetch_json(&client, &format!("{base_url}{path}"))
            .await
            .and_then(|json| validate(&json));
        report.checks.push(Check {
            label,
            path,
            outcome,
        });
    }
    Ok(report)
}

async fn fetch_json(client: &reqwest::Client, url: &str) -> Result<Value, String> {
    let response = client.get(url).send().await.map_err(|e| e.to_string())?;
    let status = response.status();
    let body = response.text().await.map_err(|e| e.to_string())?;
    if !status.is_success() {
        return Err(format!("HTTP {}: {}", status.as_u16(), error_message(&body)));
    }
    serde_json::from_str(&body).map_err(|e| format!("invalid JSON: {e}"))
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| json["error"].as_str().map(str::to_owned))
        .unwrap_or_else(|| body.chars().take(120).collect())
}

fn expect_health(json: &Value) -> Result<String, String> {
    match json["status"].as_str() {
        Some("OK") => Ok(format!("uptime={}", json["uptime"])),
        other => Err(format!("unexpected status {other:?}")),
    }
}

fn expect_index(json: &Value) -> Result<String, String> {
    json["service"]
        .as_str()
        .map(|service| format!("service={service}"))
        .ok_or_else(|| "missing service name".to_owned())
}

fn expect_success(json: &Value, field: &str) -> Result<String, String> {
    if json["success"] != Value::Bool(true) {
        return Err(format!("success flag not set: {json}"));
    }
    Ok(format!("{field}={}", json[field]))
}
