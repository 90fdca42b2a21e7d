use super::*;

#[test]
fn parses_count_with_date_and_strategy() {
    let cli = Cli::try_parse_from([
        "revcount-cli",
        "count",
        "1688300738",
        "--date",
        "08.08",
        "--strategy",
        "Rendered",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::Count {
            place_id,
            date,
            strategy,
        } => {
            assert_eq!(place_id, "1688300738");
            assert_eq!(date, CanonicalDate::new(8, 8));
            assert_eq!(strategy, Some(StrategyMode::Rendered));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn count_without_options_uses_configured_strategy() {
    let cli = Cli::try_parse_from(["revcount-cli", "count", "42"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Count {
            date: None,
            strategy: None,
            ..
        }
    ));
}

#[test]
fn count_rejects_invalid_date() {
    let err = Cli::try_parse_from(["revcount-cli", "count", "42", "--date", "13.1"]).unwrap_err();
    assert!(err.to_string().contains("13.1"));
}

#[test]
fn dates_rejects_unknown_strategy() {
    assert!(Cli::try_parse_from(["revcount-cli", "dates", "42", "--strategy", "magic"]).is_err());
}

#[test]
fn smoke_defaults_to_local_server() {
    let cli = Cli::try_parse_from(["revcount-cli", "smoke"]).expect("expected valid cli args");
    match cli.command {
        Commands::Smoke { base_url, place_id } => {
            assert_eq!(base_url, "http://localhost:3000");
            assert_eq!(place_id, smoke::DEFAULT_PLACE_ID);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn place_id_is_required() {
    assert!(Cli::try_parse_from(["revcount-cli", "count"]).is_err());
}

mod smoke_command {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::super::run_smoke;

    async fn mount(server: &MockServer, route: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn passes_against_healthy_server() {
        let server = MockServer::start().await;
        mount(&server, "/health", json!({"status": "OK", "uptime": 2})).await;
        mount(&server, "/", json!({"service": "revcount"})).await;
        mount(&server, "/api/reviews/7/dates", json!({"success": true, "count": 1})).await;
        mount(&server, "/api/reviews/7/count", json!({"success": true, "totalReviews": 1})).await;
        mount(&server, "/api/reviews/7/count/8.8", json!({"success": true, "count": 0})).await;

        run_smoke(&server.uri(), "7")
            .await
            .expect("all checks should pass");
    }

    #[tokio::test]
    async fn fails_with_summary_when_endpoints_are_missing() {
        let server = MockServer::start().await;
        mount(&server, "/health", json!({"status": "OK", "uptime": 2})).await;

        let err = run_smoke(&server.uri(), "7").await.unwrap_err();

        assert_eq!(err.to_string(), "4 of 5 smoke checks failed");
    }
}
